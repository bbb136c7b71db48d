//! Wey Social
//!
//! Social-graph engines layered over a [`wey_domain::RelationshipStore`].
//!
//! # Overview
//!
//! - **Friendship workflow**: send, accept or reject, and remove friendships
//!   while keeping the friends relation symmetric and friend counts exact
//! - **Connection scoring**: accumulate interaction weight per pair; a pair is
//!   connected once its score exceeds 15
//! - **Connections graph**: the two-hop neighbourhood of an identity over
//!   connected pairs, as a weighted edge list
//! - **Notifications**: fire-and-forget delivery of request events through a
//!   bounded channel drained by a background worker
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use wey_domain::{Identity, RelationshipStore};
//! use wey_social::{ConnectionScorer, GraphBuilder, SocialConfig};
//! use wey_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::in_memory()?);
//! let (alice, bob) = (Identity::new("Alice"), Identity::new("Bob"));
//! store.insert_identity(&alice)?;
//! store.insert_identity(&bob)?;
//!
//! let scorer = ConnectionScorer::new(Arc::clone(&store), &SocialConfig::default());
//! for t in 0..9 {
//!     scorer.record_message(alice.id, bob.id, t)?;
//! }
//!
//! let graph = GraphBuilder::new(store).build(alice.id)?;
//! assert!(graph.contains_edge(alice.id, bob.id));
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! database_path = "wey.db"
//! message_weight = 2.0
//! log_level = "info"
//!
//! [notifications]
//! enabled = true
//! channel_capacity = 256
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod graph;
mod metrics;
mod notify;
mod scoring;
mod workflow;

pub use config::{ConfigError, NotificationConfig, SocialConfig};
pub use error::{Result, SocialError};
pub use graph::{ConnectionsGraph, GraphBuilder, GraphEdge};
pub use metrics::NotificationMetrics;
pub use notify::{ChannelSink, LoggingHandler, NotificationHandler, NotificationWorker, TracingSink};
pub use scoring::ConnectionScorer;
pub use workflow::{FriendsView, FriendshipWorkflow, SendOutcome};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix timestamp in seconds
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
