//! Connection module - scored interaction edges

use crate::id::uuid_id;
use crate::{IdentityId, IdentityPair};

uuid_id! {
    /// Unique identifier for a connection (UUIDv7)
    ConnectionId
}

/// Score a pair must exceed to count as connected
pub const CONNECTED_THRESHOLD: f64 = 15.0;

/// Score of a connection when it is first created
///
/// Matches the weight of a single message.
pub const INITIAL_SCORE: f64 = 2.0;

/// An undirected interaction edge between two distinct identities
///
/// There is exactly one connection per [`IdentityPair`]. The score only grows
/// under observed interactions; `is_connected` is derived from it on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Unique identifier
    pub id: ConnectionId,

    /// The canonicalized endpoints
    pub pair: IdentityPair,

    /// Accumulated interaction strength
    pub score: f64,

    /// When the last interaction was recorded (seconds since Unix epoch)
    pub last_interaction: u64,
}

impl Connection {
    /// Create a fresh connection seeded with [`INITIAL_SCORE`]
    pub fn new(pair: IdentityPair, at: u64) -> Self {
        Self {
            id: ConnectionId::new(),
            pair,
            score: INITIAL_SCORE,
            last_interaction: at,
        }
    }

    /// Whether the score is above [`CONNECTED_THRESHOLD`]
    pub fn is_connected(&self) -> bool {
        self.score > CONNECTED_THRESHOLD
    }

    /// The endpoint opposite to `id`, if `id` is an endpoint
    pub fn other(&self, id: IdentityId) -> Option<IdentityId> {
        self.pair.other(id)
    }
}
