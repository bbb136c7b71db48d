//! Metrics collection for notification dispatch

use std::collections::HashMap;

/// Counters kept by the notification worker, keyed by event kind
#[derive(Debug, Clone, Default)]
pub struct NotificationMetrics {
    /// Events handed to the handler successfully
    pub delivered: HashMap<&'static str, usize>,

    /// Events the handler failed to deliver
    pub failed: HashMap<&'static str, usize>,
}

impl NotificationMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful delivery
    pub fn record_delivered(&mut self, kind: &'static str) {
        *self.delivered.entry(kind).or_insert(0) += 1;
    }

    /// Record a failed delivery
    pub fn record_failed(&mut self, kind: &'static str) {
        *self.failed.entry(kind).or_insert(0) += 1;
    }

    /// Total deliveries across all kinds
    pub fn total_delivered(&self) -> usize {
        self.delivered.values().sum()
    }

    /// Total failures across all kinds
    pub fn total_failed(&self) -> usize {
        self.failed.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        self.delivered.clear();
        self.failed.clear();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Notification Metrics Summary".to_string(),
            "============================".to_string(),
            format!("Delivered: {}", self.total_delivered()),
            format!("Failed:    {}", self.total_failed()),
        ];

        let mut kinds: Vec<_> = self
            .delivered
            .keys()
            .chain(self.failed.keys())
            .copied()
            .collect();
        kinds.sort_unstable();
        kinds.dedup();

        for kind in kinds {
            lines.push(format!(
                "  {}: {} delivered, {} failed",
                kind,
                self.delivered.get(kind).copied().unwrap_or(0),
                self.failed.get(kind).copied().unwrap_or(0)
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_kind() {
        let mut metrics = NotificationMetrics::new();
        metrics.record_delivered("new_friendrequest");
        metrics.record_delivered("new_friendrequest");
        metrics.record_failed("accepted_friendrequest");

        assert_eq!(metrics.total_delivered(), 2);
        assert_eq!(metrics.total_failed(), 1);
        assert_eq!(metrics.delivered["new_friendrequest"], 2);
    }

    #[test]
    fn test_summary_lists_kinds() {
        let mut metrics = NotificationMetrics::new();
        metrics.record_delivered("new_friendrequest");
        metrics.record_failed("accepted_friendrequest");

        let summary = metrics.summary();
        assert!(summary.contains("Delivered: 1"));
        assert!(summary.contains("accepted_friendrequest: 0 delivered, 1 failed"));
        assert!(summary.contains("new_friendrequest: 1 delivered, 0 failed"));
    }

    #[test]
    fn test_reset() {
        let mut metrics = NotificationMetrics::new();
        metrics.record_delivered("new_friendrequest");
        metrics.reset();
        assert_eq!(metrics.total_delivered(), 0);
    }
}
