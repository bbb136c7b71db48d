//! Friendship request module - the request/accept workflow records

use crate::id::uuid_id;
use crate::IdentityId;

uuid_id! {
    /// Unique identifier for a friendship request (UUIDv7)
    RequestId
}

/// Status of a friendship request
///
/// `Sent` is the only unresolved state. At most one `Sent` request may exist
/// between two identities, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    /// Waiting for the target to respond
    Sent,

    /// Target accepted; the pair became friends
    Accepted,

    /// Target rejected; the record is kept for audit
    Rejected,
}

impl RequestStatus {
    /// Get the status name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Sent => "sent",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// Parse a status from its stored name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sent" => Some(RequestStatus::Sent),
            "accepted" => Some(RequestStatus::Accepted),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }

    /// Whether the request still awaits a response
    pub fn is_unresolved(&self) -> bool {
        matches!(self, RequestStatus::Sent)
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid request status: {}", s))
    }
}

/// The responder's answer to a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Become friends
    Accept,

    /// Decline, keeping the record
    Reject,
}

impl Decision {
    /// The request status this decision resolves to
    pub fn status(&self) -> RequestStatus {
        match self {
            Decision::Accept => RequestStatus::Accepted,
            Decision::Reject => RequestStatus::Rejected,
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accept" | "accepted" => Ok(Decision::Accept),
            "reject" | "rejected" => Ok(Decision::Reject),
            _ => Err(format!("Invalid decision: {}", s)),
        }
    }
}

/// A directed proposal of friendship
///
/// Direction matters for display (who asked whom) but not for duplicate
/// suppression.
#[derive(Debug, Clone, PartialEq)]
pub struct FriendshipRequest {
    /// Unique identifier
    pub id: RequestId,

    /// The requester
    pub created_by: IdentityId,

    /// The target
    pub created_for: IdentityId,

    /// Current status
    pub status: RequestStatus,

    /// When the request was created (seconds since Unix epoch)
    pub created_at: u64,
}

impl FriendshipRequest {
    /// Create a new `Sent` request
    pub fn new(created_by: IdentityId, created_for: IdentityId, created_at: u64) -> Self {
        Self {
            id: RequestId::new(),
            created_by,
            created_for,
            status: RequestStatus::Sent,
            created_at,
        }
    }

    /// Whether this request is between `a` and `b`, in either direction
    pub fn involves(&self, a: IdentityId, b: IdentityId) -> bool {
        (self.created_by == a && self.created_for == b)
            || (self.created_by == b && self.created_for == a)
    }
}

/// Outcome of the store's atomic check-and-insert for requests
#[derive(Debug, Clone, PartialEq)]
pub enum RequestCreation {
    /// A new `Sent` request was persisted
    Created(FriendshipRequest),

    /// An unresolved request already existed between the pair; nothing was written
    Existing(FriendshipRequest),
}

impl RequestCreation {
    /// The request that now represents the pair, new or pre-existing
    pub fn request(&self) -> &FriendshipRequest {
        match self {
            RequestCreation::Created(r) | RequestCreation::Existing(r) => r,
        }
    }
}

/// Which side of pending requests to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDirection {
    /// Requests addressed to the identity
    Incoming,

    /// Requests sent by the identity
    Outgoing,
}
