//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{
    Connection, ConnectionId, FriendshipRequest, Identity, IdentityId, IdentityPair,
    RequestCreation, RequestDirection, RequestId, RequestStatus, SocialEvent,
};

/// Durable record of identities, friendships, requests and connections
///
/// Implemented by the infrastructure layer (wey-store).
///
/// Methods take `&self` so one store handle can be shared between concurrent
/// callers. Implementations must make every method that touches more than one
/// record atomic, and must serialize mutations on the same pair.
pub trait RelationshipStore {
    /// Error type for store operations
    type Error;

    /// Register a new identity
    fn insert_identity(&self, identity: &Identity) -> Result<(), Self::Error>;

    /// Get an identity by ID
    fn get_identity(&self, id: IdentityId) -> Result<Option<Identity>, Self::Error>;

    /// All identities symmetric-friends with `id`
    fn friends_of(&self, id: IdentityId) -> Result<Vec<Identity>, Self::Error>;

    /// Whether the symmetric edge exists
    fn are_friends(&self, pair: IdentityPair) -> Result<bool, Self::Error>;

    /// Establish the symmetric edge and recompute both friends counts
    ///
    /// Idempotent: returns `false` if the edge already existed.
    fn add_mutual_friend(&self, pair: IdentityPair) -> Result<bool, Self::Error>;

    /// Dissolve the symmetric edge and recompute both friends counts
    ///
    /// Returns `false` if there was no edge.
    fn remove_mutual_friend(&self, pair: IdentityPair) -> Result<bool, Self::Error>;

    /// A `Sent` request between the pair in either direction
    fn find_unresolved_request(
        &self,
        pair: IdentityPair,
    ) -> Result<Option<FriendshipRequest>, Self::Error>;

    /// The `Sent` request from `created_by` to `created_for`, direction significant
    fn find_sent_request(
        &self,
        created_by: IdentityId,
        created_for: IdentityId,
    ) -> Result<Option<FriendshipRequest>, Self::Error>;

    /// Create a `Sent` request unless one is already unresolved between the pair
    ///
    /// The check and the insert happen atomically.
    fn create_request(
        &self,
        requester: IdentityId,
        target: IdentityId,
        at: u64,
    ) -> Result<RequestCreation, Self::Error>;

    /// Resolve a `Sent` request to `status`
    ///
    /// Returns `false`, changing nothing, if the request is unknown or no
    /// longer `Sent`.
    fn resolve_request(&self, id: RequestId, status: RequestStatus) -> Result<bool, Self::Error>;

    /// Accept a request and befriend the pair as one atomic unit
    ///
    /// Resolves the request to `Accepted`, adds the edge idempotently and
    /// recomputes both friends counts. Returns `false`, changing nothing, if
    /// no `Sent` request with this id exists between the pair.
    fn accept_request(&self, id: RequestId, pair: IdentityPair) -> Result<bool, Self::Error>;

    /// Remove every request record between the pair, both directions
    fn delete_requests_between(&self, pair: IdentityPair) -> Result<usize, Self::Error>;

    /// Dissolve a friendship as one atomic unit
    ///
    /// Removes the edge, recomputes both counts and purges requests between
    /// the pair. Returns `false`, changing nothing, if there was no edge.
    fn dissolve_friendship(&self, pair: IdentityPair) -> Result<bool, Self::Error>;

    /// Unresolved requests addressed to or sent by `id`
    fn pending_requests(
        &self,
        id: IdentityId,
        direction: RequestDirection,
    ) -> Result<Vec<FriendshipRequest>, Self::Error>;

    /// Look up the connection of a pair without creating it
    fn get_connection(&self, pair: IdentityPair) -> Result<Option<Connection>, Self::Error>;

    /// Fetch the pair's connection, creating it seeded at the initial score
    ///
    /// The boolean is `true` when this call created the record.
    fn get_or_create_connection(
        &self,
        pair: IdentityPair,
        at: u64,
    ) -> Result<(Connection, bool), Self::Error>;

    /// Add `delta` to a connection's score and stamp the interaction time
    ///
    /// The increment happens inside the store so concurrent callers never
    /// lose updates. Returns the updated connection.
    fn update_connection_score(
        &self,
        id: ConnectionId,
        delta: f64,
        at: u64,
    ) -> Result<Connection, Self::Error>;

    /// Connections incident to `id` whose score is above the threshold
    fn connections_of(&self, id: IdentityId) -> Result<Vec<Connection>, Self::Error>;
}

/// Sink for notification events
///
/// Implemented by the application layer (wey-social). Emitting must not
/// block on delivery.
pub trait EventSink {
    /// Hand an event to the notification collaborator
    fn emit(&self, event: SocialEvent);
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn emit(&self, event: SocialEvent) {
        (**self).emit(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn emit(&self, event: SocialEvent) {
        (**self).emit(event)
    }
}
