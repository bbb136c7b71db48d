//! Wey CLI - Command-line interface for the Wey social graph.

use clap::Parser;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wey_cli::commands::{self, SharedSink};
use wey_cli::{config, Cli, Command, Context, Formatter};
use wey_social::{ChannelSink, LoggingHandler, NotificationWorker, TracingSink};
use wey_store::SqliteStore;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();
    let formatter = Formatter::new(cli.format.into(), !cli.no_color);

    if let Err(e) = run(cli, &formatter).await {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, formatter: &Formatter) -> wey_cli::Result<()> {
    let config = config::load(cli.config.as_deref(), cli.db.as_deref())?;

    // Initialize tracing (log to stderr); RUST_LOG wins over the config file
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let store = Arc::new(SqliteStore::new(&config.database_path)?);
    debug!("Opened store at {}", config.database_path);

    // Notifications drain on a background task while the command runs
    let (sink, worker) = if config.notifications.enabled {
        let (sink, receiver) = ChannelSink::channel(config.notifications.channel_capacity);
        let handle = tokio::spawn(async move {
            let mut worker = NotificationWorker::new(LoggingHandler);
            worker.run(receiver).await;
        });
        let sink: SharedSink = Arc::new(sink);
        (sink, Some(handle))
    } else {
        let sink: SharedSink = Arc::new(TracingSink);
        (sink, None)
    };

    let ctx = Context::new(store, &config, sink);
    let result = execute(cli.command, &ctx, formatter);

    // Dropping the context closes the channel so the worker can finish
    drop(ctx);
    if let Some(handle) = worker {
        if let Err(e) = handle.await {
            eprintln!("{}", formatter.warning(&format!("Notification worker failed: {}", e)));
        }
    }

    result
}

fn execute(command: Command, ctx: &Context, formatter: &Formatter) -> wey_cli::Result<()> {
    match command {
        Command::Register(args) => commands::execute_register(args, ctx, formatter),
        Command::People => commands::execute_people(ctx, formatter),
        Command::Request(args) => commands::execute_request(args, ctx, formatter),
        Command::Respond(args) => commands::execute_respond(args, ctx, formatter),
        Command::Remove(args) => commands::execute_remove(args, ctx, formatter),
        Command::Interact(args) => commands::execute_interact(args, ctx, formatter),
        Command::Message(args) => commands::execute_message(args, ctx, formatter),
        Command::Graph(args) => commands::execute_graph(args, ctx, formatter),
        Command::Friends(args) => commands::execute_friends(args, ctx, formatter),
    }
}
