//! Wey Storage Layer
//!
//! Implements the `RelationshipStore` trait on top of SQLite.
//!
//! # Architecture
//!
//! - One `rusqlite::Connection` behind a mutex; every mutating call runs in a
//!   single `IMMEDIATE` transaction while holding the lock, so operations on
//!   the same pair are linearizable
//! - Pairs are stored canonicalized (`low_id < high_id`), which lets the schema
//!   enforce connection uniqueness, irreflexivity and the one-unresolved-request rule
//! - `friends_count` is recomputed with `COUNT(*)` in the same transaction as
//!   every edge mutation
//!
//! # Examples
//!
//! ```
//! use wey_domain::{Identity, RelationshipStore};
//! use wey_store::SqliteStore;
//!
//! let store = SqliteStore::in_memory().unwrap();
//! let alice = Identity::new("Alice");
//! store.insert_identity(&alice).unwrap();
//! assert!(store.get_identity(alice.id).unwrap().is_some());
//! ```

#![warn(missing_docs)]

use rusqlite::types::Type;
use rusqlite::{params, Connection as SqlConnection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;
use wey_domain::{
    Connection, ConnectionId, FriendshipRequest, Identity, IdentityId, IdentityPair,
    RelationshipStore, RequestCreation, RequestDirection, RequestId, RequestStatus,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Referenced record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A previous holder of the connection lock panicked
    #[error("Store lock poisoned")]
    Poisoned,
}

const IDENTITY_COLUMNS: &str = "id, name, friends_count";
const REQUEST_COLUMNS: &str = "id, created_by, created_for, status, created_at";
const CONNECTION_COLUMNS: &str = "id, low_id, high_id, score, last_interaction";

/// SQLite-based implementation of `RelationshipStore`
///
/// # Thread Safety
///
/// The store is `Send + Sync`; share it behind an `Arc`. Calls serialize on the
/// internal connection lock.
pub struct SqliteStore {
    conn: Mutex<SqlConnection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = SqlConnection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory store (useful for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(SqlConnection::open_in_memory()?)
    }

    fn with_connection(conn: SqlConnection) -> Result<Self, StoreError> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, SqlConnection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// All registered identities, ordered by name
    pub fn list_identities(&self) -> Result<Vec<Identity>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities ORDER BY name, id"
        ))?;
        let identities = stmt
            .query_map([], row_to_identity)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(identities)
    }

    /// Number of request records (any status) between the pair
    pub fn request_count_between(&self, pair: IdentityPair) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM friendship_requests WHERE low_id = ?1 AND high_id = ?2",
            params![id_bytes(pair.low().value()), id_bytes(pair.high().value())],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Current status of a request, if the record still exists
    pub fn request_status(&self, id: RequestId) -> Result<Option<RequestStatus>, StoreError> {
        let conn = self.lock()?;
        let status = conn
            .query_row(
                &format!("SELECT {REQUEST_COLUMNS} FROM friendship_requests WHERE id = ?1"),
                params![id_bytes(id.value())],
                row_to_request,
            )
            .optional()?;
        Ok(status.map(|request| request.status))
    }

    /// Number of connection records for the pair (0 or 1)
    pub fn connection_count(&self, pair: IdentityPair) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM connections WHERE low_id = ?1 AND high_id = ?2",
            params![id_bytes(pair.low().value()), id_bytes(pair.high().value())],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// Encode an id as a 16-byte big-endian BLOB
fn id_bytes(value: u128) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

fn bytes_to_u128(bytes: &[u8]) -> Result<u128, StoreError> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::InvalidData(format!("Expected 16 bytes for id, got {}", bytes.len()))
    })?;
    Ok(u128::from_be_bytes(arr))
}

fn read_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<u128> {
    let bytes: Vec<u8> = row.get(idx)?;
    bytes_to_u128(&bytes)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Blob, Box::new(e)))
}

fn row_to_identity(row: &Row<'_>) -> rusqlite::Result<Identity> {
    Ok(Identity {
        id: IdentityId::from_value(read_id(row, 0)?),
        name: row.get(1)?,
        friends_count: row.get::<_, i64>(2)? as u64,
    })
}

fn row_to_request(row: &Row<'_>) -> rusqlite::Result<FriendshipRequest> {
    let status_str: String = row.get(3)?;
    let status = RequestStatus::parse(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            Box::new(StoreError::InvalidData(format!(
                "Unknown request status: {}",
                status_str
            ))),
        )
    })?;

    Ok(FriendshipRequest {
        id: RequestId::from_value(read_id(row, 0)?),
        created_by: IdentityId::from_value(read_id(row, 1)?),
        created_for: IdentityId::from_value(read_id(row, 2)?),
        status,
        created_at: row.get::<_, i64>(4)? as u64,
    })
}

fn row_to_connection(row: &Row<'_>) -> rusqlite::Result<Connection> {
    let low = IdentityId::from_value(read_id(row, 1)?);
    let high = IdentityId::from_value(read_id(row, 2)?);
    let pair = IdentityPair::new(low, high).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Blob,
            Box::new(StoreError::InvalidData("Self-connection in storage".to_string())),
        )
    })?;

    Ok(Connection {
        id: ConnectionId::from_value(read_id(row, 0)?),
        pair,
        score: row.get(3)?,
        last_interaction: row.get::<_, i64>(4)? as u64,
    })
}

/// Recompute a cached friends count from the friendships relation
fn recount_friends(conn: &SqlConnection, id: IdentityId) -> Result<(), StoreError> {
    let id = id_bytes(id.value());
    let updated = conn.execute(
        "UPDATE identities SET friends_count =
            (SELECT COUNT(*) FROM friendships WHERE low_id = ?1 OR high_id = ?1)
         WHERE id = ?1",
        params![id],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound("identity for friends count".to_string()));
    }
    Ok(())
}

fn recount_pair(conn: &SqlConnection, pair: IdentityPair) -> Result<(), StoreError> {
    recount_friends(conn, pair.low())?;
    recount_friends(conn, pair.high())
}

fn insert_friendship(conn: &SqlConnection, pair: IdentityPair) -> Result<bool, StoreError> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO friendships (low_id, high_id) VALUES (?1, ?2)",
        params![id_bytes(pair.low().value()), id_bytes(pair.high().value())],
    )?;
    Ok(inserted > 0)
}

fn delete_friendship(conn: &SqlConnection, pair: IdentityPair) -> Result<bool, StoreError> {
    let deleted = conn.execute(
        "DELETE FROM friendships WHERE low_id = ?1 AND high_id = ?2",
        params![id_bytes(pair.low().value()), id_bytes(pair.high().value())],
    )?;
    Ok(deleted > 0)
}

fn delete_requests(conn: &SqlConnection, pair: IdentityPair) -> Result<usize, StoreError> {
    Ok(conn.execute(
        "DELETE FROM friendship_requests WHERE low_id = ?1 AND high_id = ?2",
        params![id_bytes(pair.low().value()), id_bytes(pair.high().value())],
    )?)
}

fn select_unresolved(
    conn: &SqlConnection,
    pair: IdentityPair,
) -> Result<Option<FriendshipRequest>, StoreError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {REQUEST_COLUMNS} FROM friendship_requests
                 WHERE low_id = ?1 AND high_id = ?2 AND status = 'sent'"
            ),
            params![id_bytes(pair.low().value()), id_bytes(pair.high().value())],
            row_to_request,
        )
        .optional()?)
}

fn select_connection(
    conn: &SqlConnection,
    pair: IdentityPair,
) -> Result<Option<Connection>, StoreError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {CONNECTION_COLUMNS} FROM connections WHERE low_id = ?1 AND high_id = ?2"
            ),
            params![id_bytes(pair.low().value()), id_bytes(pair.high().value())],
            row_to_connection,
        )
        .optional()?)
}

impl RelationshipStore for SqliteStore {
    type Error = StoreError;

    fn insert_identity(&self, identity: &Identity) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO identities (id, name, friends_count) VALUES (?1, ?2, 0)",
            params![id_bytes(identity.id.value()), &identity.name],
        )?;
        Ok(())
    }

    fn get_identity(&self, id: IdentityId) -> Result<Option<Identity>, Self::Error> {
        let conn = self.lock()?;
        let identity = conn
            .query_row(
                &format!("SELECT {IDENTITY_COLUMNS} FROM identities WHERE id = ?1"),
                params![id_bytes(id.value())],
                row_to_identity,
            )
            .optional()?;
        Ok(identity)
    }

    fn friends_of(&self, id: IdentityId) -> Result<Vec<Identity>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT i.id, i.name, i.friends_count FROM identities i
             JOIN friendships f
               ON (f.low_id = ?1 AND f.high_id = i.id)
               OR (f.high_id = ?1 AND f.low_id = i.id)
             ORDER BY i.name, i.id",
        )?;
        let friends = stmt
            .query_map(params![id_bytes(id.value())], row_to_identity)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(friends)
    }

    fn are_friends(&self, pair: IdentityPair) -> Result<bool, Self::Error> {
        let conn = self.lock()?;
        let exists = conn
            .query_row(
                "SELECT 1 FROM friendships WHERE low_id = ?1 AND high_id = ?2",
                params![id_bytes(pair.low().value()), id_bytes(pair.high().value())],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    fn add_mutual_friend(&self, pair: IdentityPair) -> Result<bool, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let added = insert_friendship(&tx, pair)?;
        recount_pair(&tx, pair)?;
        tx.commit()?;
        Ok(added)
    }

    fn remove_mutual_friend(&self, pair: IdentityPair) -> Result<bool, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = delete_friendship(&tx, pair)?;
        recount_pair(&tx, pair)?;
        tx.commit()?;
        Ok(removed)
    }

    fn find_unresolved_request(
        &self,
        pair: IdentityPair,
    ) -> Result<Option<FriendshipRequest>, Self::Error> {
        let conn = self.lock()?;
        select_unresolved(&conn, pair)
    }

    fn find_sent_request(
        &self,
        created_by: IdentityId,
        created_for: IdentityId,
    ) -> Result<Option<FriendshipRequest>, Self::Error> {
        let conn = self.lock()?;
        let request = conn
            .query_row(
                &format!(
                    "SELECT {REQUEST_COLUMNS} FROM friendship_requests
                     WHERE created_by = ?1 AND created_for = ?2 AND status = 'sent'"
                ),
                params![id_bytes(created_by.value()), id_bytes(created_for.value())],
                row_to_request,
            )
            .optional()?;
        Ok(request)
    }

    fn create_request(
        &self,
        requester: IdentityId,
        target: IdentityId,
        at: u64,
    ) -> Result<RequestCreation, Self::Error> {
        let pair = IdentityPair::new(requester, target).ok_or_else(|| {
            StoreError::InvalidData("Friendship request to self".to_string())
        })?;

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(existing) = select_unresolved(&tx, pair)? {
            debug!("Unresolved request {} already covers the pair", existing.id);
            return Ok(RequestCreation::Existing(existing));
        }

        let request = FriendshipRequest::new(requester, target, at);
        tx.execute(
            "INSERT INTO friendship_requests
                (id, created_by, created_for, low_id, high_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id_bytes(request.id.value()),
                id_bytes(requester.value()),
                id_bytes(target.value()),
                id_bytes(pair.low().value()),
                id_bytes(pair.high().value()),
                request.status.as_str(),
                request.created_at as i64,
            ],
        )?;
        tx.commit()?;

        Ok(RequestCreation::Created(request))
    }

    fn resolve_request(&self, id: RequestId, status: RequestStatus) -> Result<bool, Self::Error> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE friendship_requests SET status = ?2 WHERE id = ?1 AND status = 'sent'",
            params![id_bytes(id.value()), status.as_str()],
        )?;
        if updated == 0 {
            debug!("Request {} is not awaiting a response", id);
        }
        Ok(updated > 0)
    }

    fn accept_request(&self, id: RequestId, pair: IdentityPair) -> Result<bool, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let updated = tx.execute(
            "UPDATE friendship_requests SET status = 'accepted'
             WHERE id = ?1 AND low_id = ?2 AND high_id = ?3 AND status = 'sent'",
            params![
                id_bytes(id.value()),
                id_bytes(pair.low().value()),
                id_bytes(pair.high().value()),
            ],
        )?;
        if updated == 0 {
            debug!("Request {} is not awaiting a response", id);
            return Ok(false);
        }

        insert_friendship(&tx, pair)?;
        recount_pair(&tx, pair)?;
        tx.commit()?;
        Ok(true)
    }

    fn delete_requests_between(&self, pair: IdentityPair) -> Result<usize, Self::Error> {
        let conn = self.lock()?;
        delete_requests(&conn, pair)
    }

    fn dissolve_friendship(&self, pair: IdentityPair) -> Result<bool, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !delete_friendship(&tx, pair)? {
            return Ok(false);
        }
        recount_pair(&tx, pair)?;
        let purged = delete_requests(&tx, pair)?;
        tx.commit()?;

        debug!("Dissolved friendship, purged {} request records", purged);
        Ok(true)
    }

    fn pending_requests(
        &self,
        id: IdentityId,
        direction: RequestDirection,
    ) -> Result<Vec<FriendshipRequest>, Self::Error> {
        let column = match direction {
            RequestDirection::Incoming => "created_for",
            RequestDirection::Outgoing => "created_by",
        };

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {REQUEST_COLUMNS} FROM friendship_requests
             WHERE {column} = ?1 AND status = 'sent'
             ORDER BY created_at, id"
        ))?;
        let requests = stmt
            .query_map(params![id_bytes(id.value())], row_to_request)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(requests)
    }

    fn get_connection(&self, pair: IdentityPair) -> Result<Option<Connection>, Self::Error> {
        let conn = self.lock()?;
        select_connection(&conn, pair)
    }

    fn get_or_create_connection(
        &self,
        pair: IdentityPair,
        at: u64,
    ) -> Result<(Connection, bool), Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(existing) = select_connection(&tx, pair)? {
            return Ok((existing, false));
        }

        let connection = Connection::new(pair, at);
        tx.execute(
            "INSERT INTO connections (id, low_id, high_id, score, last_interaction)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id_bytes(connection.id.value()),
                id_bytes(pair.low().value()),
                id_bytes(pair.high().value()),
                connection.score,
                connection.last_interaction as i64,
            ],
        )?;
        tx.commit()?;

        Ok((connection, true))
    }

    fn update_connection_score(
        &self,
        id: ConnectionId,
        delta: f64,
        at: u64,
    ) -> Result<Connection, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let updated = tx.execute(
            "UPDATE connections SET score = score + ?2, last_interaction = ?3 WHERE id = ?1",
            params![id_bytes(id.value()), delta, at as i64],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("connection {}", id)));
        }

        let connection = tx.query_row(
            &format!("SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = ?1"),
            params![id_bytes(id.value())],
            row_to_connection,
        )?;
        tx.commit()?;

        Ok(connection)
    }

    fn connections_of(&self, id: IdentityId) -> Result<Vec<Connection>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CONNECTION_COLUMNS} FROM connections
             WHERE (low_id = ?1 OR high_id = ?1) AND score > ?2
             ORDER BY low_id, high_id"
        ))?;
        let connections = stmt
            .query_map(
                params![id_bytes(id.value()), wey_domain::CONNECTED_THRESHOLD],
                row_to_connection,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_bytes_roundtrip() {
        let value = 0x0123_4567_89ab_cdef_0011_2233_4455_6677u128;
        assert_eq!(bytes_to_u128(&id_bytes(value)).unwrap(), value);
    }

    #[test]
    fn test_id_bytes_preserve_ordering() {
        let low = 255u128;
        let high = 256u128;
        assert!(id_bytes(low) < id_bytes(high));
    }

    #[test]
    fn test_short_blob_rejected() {
        assert!(matches!(bytes_to_u128(&[1, 2, 3]), Err(StoreError::InvalidData(_))));
    }
}
