//! Command implementations.

pub mod friendship;
pub mod graph;
pub mod identity;
pub mod interaction;

pub use self::friendship::{execute_friends, execute_remove, execute_request, execute_respond};
pub use self::graph::execute_graph;
pub use self::identity::{execute_people, execute_register};
pub use self::interaction::{execute_interact, execute_message};

use std::sync::Arc;
use wey_domain::EventSink;
use wey_social::{ConnectionScorer, FriendshipWorkflow, GraphBuilder, SocialConfig};
use wey_store::SqliteStore;

/// Event sink shared by the workflow, chosen at startup.
pub type SharedSink = Arc<dyn EventSink + Send + Sync>;

/// Engines wired to one store, shared by every command.
pub struct Context {
    /// The backing store
    pub store: Arc<SqliteStore>,
    /// Friendship workflow engine
    pub workflow: FriendshipWorkflow<SqliteStore, SharedSink>,
    /// Connection scoring engine
    pub scorer: ConnectionScorer<SqliteStore>,
    /// Two-hop graph builder
    pub graphs: GraphBuilder<SqliteStore>,
}

impl Context {
    /// Wire the engines to `store`.
    pub fn new(store: Arc<SqliteStore>, config: &SocialConfig, sink: SharedSink) -> Self {
        Self {
            workflow: FriendshipWorkflow::new(Arc::clone(&store), sink),
            scorer: ConnectionScorer::new(Arc::clone(&store), config),
            graphs: GraphBuilder::new(Arc::clone(&store)),
            store,
        }
    }

    /// Context over an in-memory store that only logs events.
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        let store = Arc::new(SqliteStore::in_memory().expect("in-memory store"));
        Self::new(
            store,
            &SocialConfig::default(),
            Arc::new(wey_social::TracingSink),
        )
    }
}
