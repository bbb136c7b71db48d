//! Notification events emitted after workflow transitions commit

use crate::FriendshipRequest;

/// An event handed to the notification collaborator
///
/// Events are emitted only after the corresponding state change is durable.
/// Delivery is fire-and-forget.
#[derive(Debug, Clone, PartialEq)]
pub enum SocialEvent {
    /// A new request was created
    FriendRequestSent {
        /// The persisted request
        request: FriendshipRequest,
    },

    /// A request was accepted and the pair are now friends
    FriendRequestAccepted {
        /// The resolved request
        request: FriendshipRequest,
    },
}

impl SocialEvent {
    /// Notification type name understood by the delivery layer
    pub fn kind(&self) -> &'static str {
        match self {
            SocialEvent::FriendRequestSent { .. } => "new_friendrequest",
            SocialEvent::FriendRequestAccepted { .. } => "accepted_friendrequest",
        }
    }

    /// The request the event refers to
    pub fn request(&self) -> &FriendshipRequest {
        match self {
            SocialEvent::FriendRequestSent { request }
            | SocialEvent::FriendRequestAccepted { request } => request,
        }
    }
}
