//! Wey Domain Layer
//!
//! Core data model of the Wey social graph. It depends only on `uuid` and
//! defines the value objects, invariants, and trait interfaces that the store
//! and the engines build upon.
//!
//! ## Key Concepts
//!
//! - **Identity**: a person participating in the graph, with a cached friends count
//! - **Friendship**: a symmetric, irreflexive edge between two identities
//! - **FriendshipRequest**: a directed proposal (`Sent` → `Accepted` | `Rejected`)
//! - **Connection**: an undirected, scored interaction edge; connected once score > 15
//! - **IdentityPair**: the canonicalized unordered pair used as a storage key
//!
//! ## Architecture
//!
//! - Pure data and invariants only
//! - Persistence lives in `wey-store`, behaviour in `wey-social`
//! - Trait definitions for every external interaction

#![warn(missing_docs)]
#![warn(clippy::all)]

mod id;

pub mod connection;
pub mod event;
pub mod friendship;
pub mod identity;
pub mod traits;

// Re-exports for convenience
pub use connection::{Connection, ConnectionId, CONNECTED_THRESHOLD, INITIAL_SCORE};
pub use event::SocialEvent;
pub use friendship::{
    Decision, FriendshipRequest, RequestCreation, RequestDirection, RequestId, RequestStatus,
};
pub use identity::{Identity, IdentityId, IdentityPair};
pub use traits::{EventSink, RelationshipStore};
