//! Connection scoring engine
//!
//! Observed interactions between two identities raise the score of their
//! connection. A pair counts as connected once the score exceeds the
//! threshold; the flag is derived from the score on every read.

use crate::{Result, SocialConfig, SocialError};
use std::sync::Arc;
use tracing::{debug, info};
use wey_domain::{Connection, IdentityId, IdentityPair, RelationshipStore};

/// Records interactions and maintains connection scores
pub struct ConnectionScorer<S> {
    store: Arc<S>,
    message_weight: f64,
}

impl<S> ConnectionScorer<S>
where
    S: RelationshipStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    /// Create a scorer using the configured message weight
    pub fn new(store: Arc<S>, config: &SocialConfig) -> Self {
        Self {
            store,
            message_weight: config.message_weight,
        }
    }

    /// Weight applied by [`record_message`](Self::record_message)
    pub fn message_weight(&self) -> f64 {
        self.message_weight
    }

    /// Record an interaction of `weight` between `a` and `b` at time `at`
    ///
    /// The first interaction of a pair creates its connection seeded at
    /// [`wey_domain::INITIAL_SCORE`] and its `weight` is dropped: a new pair
    /// scores exactly the seed whatever weight the creating call carries.
    /// Every later interaction adds `weight` inside the store, so concurrent
    /// callers never lose increments.
    ///
    /// Fails with `InvalidOperand` for a self-interaction or a negative or
    /// non-finite weight, and `NotFound` for an unknown identity.
    pub fn record_interaction(
        &self,
        a: IdentityId,
        b: IdentityId,
        weight: f64,
        at: u64,
    ) -> Result<Connection> {
        let pair = IdentityPair::new(a, b).ok_or_else(|| {
            SocialError::InvalidOperand("cannot record an interaction with oneself".to_string())
        })?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(SocialError::InvalidOperand(format!(
                "interaction weight must be a non-negative number, got {}",
                weight
            )));
        }
        self.require_identity(a)?;
        self.require_identity(b)?;

        let (connection, created) = self
            .store
            .get_or_create_connection(pair, at)
            .map_err(SocialError::store)?;

        if created {
            debug!("Created connection {} with initial score", connection.id);
            return Ok(connection);
        }

        let was_connected = connection.is_connected();
        let updated = self
            .store
            .update_connection_score(connection.id, weight, at)
            .map_err(SocialError::store)?;

        if updated.is_connected() && !was_connected {
            info!(
                "{} and {} are now connected (score {})",
                a, b, updated.score
            );
        } else {
            debug!("Connection {} score now {}", updated.id, updated.score);
        }

        Ok(updated)
    }

    /// Record a message from `sender` to `recipient` with the configured weight
    pub fn record_message(
        &self,
        sender: IdentityId,
        recipient: IdentityId,
        at: u64,
    ) -> Result<Connection> {
        self.record_interaction(sender, recipient, self.message_weight, at)
    }

    /// Current connection of a pair, if any interaction has been recorded
    pub fn connection(&self, a: IdentityId, b: IdentityId) -> Result<Option<Connection>> {
        let pair = IdentityPair::new(a, b).ok_or_else(|| {
            SocialError::InvalidOperand("an identity has no connection with itself".to_string())
        })?;
        self.store.get_connection(pair).map_err(SocialError::store)
    }

    fn require_identity(&self, id: IdentityId) -> Result<()> {
        match self.store.get_identity(id).map_err(SocialError::store)? {
            Some(_) => Ok(()),
            None => Err(SocialError::NotFound(format!("identity {}", id))),
        }
    }
}
