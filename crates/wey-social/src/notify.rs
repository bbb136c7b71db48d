//! Notification dispatch
//!
//! The engines emit [`SocialEvent`]s through an [`EventSink`] after their state
//! change commits. Delivery is fire-and-forget: [`ChannelSink`] hands events to
//! a bounded channel without blocking, and [`NotificationWorker`] drains that
//! channel on the tokio runtime into a [`NotificationHandler`].

use crate::NotificationMetrics;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};
use wey_domain::{EventSink, SocialEvent};

/// Sink that only logs events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: SocialEvent) {
        let request = event.request();
        info!(
            "Notification {}: request {} from {} to {}",
            event.kind(),
            request.id,
            request.created_by,
            request.created_for
        );
    }
}

/// Sink that forwards events to a [`NotificationWorker`]
///
/// Never blocks; when the channel is full or the worker is gone the event is
/// dropped with a warning.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<SocialEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiving end for the worker
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SocialEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: SocialEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("Notification channel full, dropping {} event", event.kind());
            }
            Err(TrySendError::Closed(event)) => {
                warn!("Notification worker stopped, dropping {} event", event.kind());
            }
        }
    }
}

/// Delivers notifications to users (mail, push, in-app feed)
pub trait NotificationHandler {
    /// Deliver one event
    fn deliver(&mut self, event: &SocialEvent) -> Result<(), String>;
}

/// Handler that records deliveries in the log
#[derive(Debug, Default)]
pub struct LoggingHandler;

impl NotificationHandler for LoggingHandler {
    fn deliver(&mut self, event: &SocialEvent) -> Result<(), String> {
        let request = event.request();
        let recipient = match event {
            SocialEvent::FriendRequestSent { .. } => request.created_for,
            SocialEvent::FriendRequestAccepted { .. } => request.created_by,
        };
        info!("Delivered {} notification to {}", event.kind(), recipient);
        Ok(())
    }
}

/// Background worker that drains the notification channel
///
/// # Examples
///
/// ```no_run
/// use wey_social::{ChannelSink, LoggingHandler, NotificationWorker};
///
/// #[tokio::main]
/// async fn main() {
///     let (sink, receiver) = ChannelSink::channel(256);
///     let mut worker = NotificationWorker::new(LoggingHandler);
///
///     // Hand `sink` to the workflow, then run until Ctrl+C
///     worker.run(receiver).await;
/// #   drop(sink);
/// }
/// ```
pub struct NotificationWorker<H> {
    handler: H,
    metrics: NotificationMetrics,
}

impl<H: NotificationHandler> NotificationWorker<H> {
    /// Create a worker around a handler
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            metrics: NotificationMetrics::new(),
        }
    }

    /// Run until every sink is dropped or a shutdown signal (Ctrl+C) arrives
    pub async fn run(&mut self, mut receiver: mpsc::Receiver<SocialEvent>) {
        info!("Notification worker started");

        loop {
            tokio::select! {
                maybe_event = receiver.recv() => {
                    match maybe_event {
                        Some(event) => self.dispatch(&event),
                        None => {
                            debug!("All notification senders dropped");
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping notification worker");
                    break;
                }
            }
        }

        info!("Notification worker stopped.\n{}", self.metrics.summary());
    }

    /// Drain events until every sink is dropped (useful for testing)
    pub async fn run_until_closed(&mut self, mut receiver: mpsc::Receiver<SocialEvent>) {
        while let Some(event) = receiver.recv().await {
            self.dispatch(&event);
        }
    }

    fn dispatch(&mut self, event: &SocialEvent) {
        match self.handler.deliver(event) {
            Ok(()) => self.metrics.record_delivered(event.kind()),
            Err(e) => {
                error!("Failed to deliver {} notification: {}", event.kind(), e);
                self.metrics.record_failed(event.kind());
            }
        }
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &NotificationMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Get a reference to the handler
    pub fn handler(&self) -> &H {
        &self.handler
    }
}
