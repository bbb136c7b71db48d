//! Friendship workflow engine
//!
//! State machine `NoRelationship → Sent → {Accepted, Rejected}`. Accepting also
//! moves the pair into the symmetric friends relation; removing a friend
//! dissolves the edge and purges the pair's request history.

use crate::{current_timestamp, Result, SocialError};
use std::sync::Arc;
use tracing::{debug, info};
use wey_domain::{
    Decision, EventSink, FriendshipRequest, Identity, IdentityId, IdentityPair, RelationshipStore,
    RequestCreation, RequestDirection, RequestStatus, SocialEvent,
};

/// Outcome of a friendship request
///
/// A duplicate is a typed no-op rather than an error, so callers can tell
/// "already pending" apart from "invalid".
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// A new request was created and a notification emitted
    Created(FriendshipRequest),

    /// An unresolved request already existed between the pair, in either direction
    Duplicate(FriendshipRequest),
}

impl SendOutcome {
    /// The request representing the pair after the call
    pub fn request(&self) -> &FriendshipRequest {
        match self {
            SendOutcome::Created(r) | SendOutcome::Duplicate(r) => r,
        }
    }

    /// Whether a new record was written
    pub fn is_created(&self) -> bool {
        matches!(self, SendOutcome::Created(_))
    }
}

/// Friends listing for a subject, as rendered by a profile screen
#[derive(Debug, Clone, PartialEq)]
pub struct FriendsView {
    /// The subject
    pub identity: Identity,

    /// The subject's friends
    pub friends: Vec<Identity>,

    /// Pending requests addressed to the subject (empty unless viewer == subject)
    pub incoming: Vec<FriendshipRequest>,

    /// Pending requests sent by the subject (empty unless viewer == subject)
    pub outgoing: Vec<FriendshipRequest>,
}

/// Friendship workflow engine
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wey_domain::{Decision, Identity, RelationshipStore};
/// use wey_social::{FriendshipWorkflow, TracingSink};
/// use wey_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(SqliteStore::in_memory()?);
/// let (alice, bob) = (Identity::new("Alice"), Identity::new("Bob"));
/// store.insert_identity(&alice)?;
/// store.insert_identity(&bob)?;
///
/// let workflow = FriendshipWorkflow::new(Arc::clone(&store), TracingSink);
/// workflow.send_request(alice.id, bob.id)?;
/// workflow.respond_to_request(bob.id, alice.id, Decision::Accept)?;
///
/// assert_eq!(workflow.friends_of(alice.id)?.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct FriendshipWorkflow<S, E> {
    store: Arc<S>,
    events: E,
}

impl<S, E> FriendshipWorkflow<S, E>
where
    S: RelationshipStore,
    S::Error: std::error::Error + Send + Sync + 'static,
    E: EventSink,
{
    /// Create a workflow over a shared store and an event sink
    pub fn new(store: Arc<S>, events: E) -> Self {
        Self { store, events }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Propose a friendship from `requester` to `target`
    ///
    /// Fails with `InvalidOperand` for a self-request and `NotFound` for an
    /// unknown identity. If a `Sent` request already exists between the pair in
    /// either direction, returns [`SendOutcome::Duplicate`] without writing.
    pub fn send_request(&self, requester: IdentityId, target: IdentityId) -> Result<SendOutcome> {
        let pair = IdentityPair::new(requester, target).ok_or_else(|| {
            SocialError::InvalidOperand("cannot send a friendship request to oneself".to_string())
        })?;
        self.require_identity(requester)?;
        self.require_identity(target)?;

        if let Some(existing) = self
            .store
            .find_unresolved_request(pair)
            .map_err(SocialError::store)?
        {
            debug!("Request {} already pending between the pair", existing.id);
            return Ok(SendOutcome::Duplicate(existing));
        }

        let creation = self
            .store
            .create_request(requester, target, current_timestamp())
            .map_err(SocialError::store)?;

        match creation {
            RequestCreation::Created(request) => {
                info!(
                    "Friendship request {} sent from {} to {}",
                    request.id, requester, target
                );
                self.events.emit(SocialEvent::FriendRequestSent {
                    request: request.clone(),
                });
                Ok(SendOutcome::Created(request))
            }
            RequestCreation::Existing(request) => Ok(SendOutcome::Duplicate(request)),
        }
    }

    /// Answer the pending request sent by `requester` to `responder`
    ///
    /// Accepting befriends the pair and recomputes both counts in one atomic
    /// store call, then emits a notification. Rejecting keeps the record with
    /// status `Rejected`. Returns the resolved request.
    ///
    /// Fails with `NotFound` when no request from `requester` is pending, and
    /// also when a concurrent response or removal resolved it first.
    pub fn respond_to_request(
        &self,
        responder: IdentityId,
        requester: IdentityId,
        decision: Decision,
    ) -> Result<FriendshipRequest> {
        let pair = IdentityPair::new(responder, requester).ok_or_else(|| {
            SocialError::InvalidOperand("cannot respond to a request from oneself".to_string())
        })?;

        let mut request = self
            .store
            .find_sent_request(requester, responder)
            .map_err(SocialError::store)?
            .ok_or_else(|| {
                SocialError::NotFound(format!(
                    "no pending friendship request from {} to {}",
                    requester, responder
                ))
            })?;

        // A concurrent response or removal may resolve the request first
        let request_id = request.id;
        let no_longer_pending = move || {
            SocialError::NotFound(format!(
                "friendship request {} is no longer pending",
                request_id
            ))
        };

        match decision {
            Decision::Accept => {
                if !self
                    .store
                    .accept_request(request.id, pair)
                    .map_err(SocialError::store)?
                {
                    return Err(no_longer_pending());
                }
                request.status = RequestStatus::Accepted;

                info!("{} accepted friendship request from {}", responder, requester);
                self.events.emit(SocialEvent::FriendRequestAccepted {
                    request: request.clone(),
                });
            }
            Decision::Reject => {
                if !self
                    .store
                    .resolve_request(request.id, RequestStatus::Rejected)
                    .map_err(SocialError::store)?
                {
                    return Err(no_longer_pending());
                }
                request.status = RequestStatus::Rejected;

                info!("{} rejected friendship request from {}", responder, requester);
            }
        }

        Ok(request)
    }

    /// Dissolve the friendship between `initiator` and `other`
    ///
    /// Removes the edge, recomputes both counts and deletes every request
    /// record between the pair, all in one atomic store call, so a new request
    /// can be sent straight away. Fails with `NotFriends` if there is no edge.
    pub fn remove_friend(&self, initiator: IdentityId, other: IdentityId) -> Result<()> {
        let pair = IdentityPair::new(initiator, other).ok_or_else(|| {
            SocialError::InvalidOperand("cannot remove oneself as a friend".to_string())
        })?;

        if !self
            .store
            .dissolve_friendship(pair)
            .map_err(SocialError::store)?
        {
            return Err(SocialError::NotFriends);
        }

        info!("{} removed {} as a friend", initiator, other);
        Ok(())
    }

    /// Friends of an identity
    pub fn friends_of(&self, id: IdentityId) -> Result<Vec<Identity>> {
        self.require_identity(id)?;
        self.store.friends_of(id).map_err(SocialError::store)
    }

    /// Unresolved requests addressed to `id`
    pub fn pending_incoming(&self, id: IdentityId) -> Result<Vec<FriendshipRequest>> {
        self.store
            .pending_requests(id, RequestDirection::Incoming)
            .map_err(SocialError::store)
    }

    /// Unresolved requests sent by `id`
    pub fn pending_outgoing(&self, id: IdentityId) -> Result<Vec<FriendshipRequest>> {
        self.store
            .pending_requests(id, RequestDirection::Outgoing)
            .map_err(SocialError::store)
    }

    /// Friends of `subject`, with pending requests when viewed by the subject
    pub fn friends_view(&self, viewer: IdentityId, subject: IdentityId) -> Result<FriendsView> {
        let identity = self.require_identity(subject)?;
        let friends = self.store.friends_of(subject).map_err(SocialError::store)?;

        let (incoming, outgoing) = if viewer == subject {
            (self.pending_incoming(subject)?, self.pending_outgoing(subject)?)
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(FriendsView {
            identity,
            friends,
            incoming,
            outgoing,
        })
    }

    fn require_identity(&self, id: IdentityId) -> Result<Identity> {
        self.store
            .get_identity(id)
            .map_err(SocialError::store)?
            .ok_or_else(|| SocialError::NotFound(format!("identity {}", id)))
    }
}
