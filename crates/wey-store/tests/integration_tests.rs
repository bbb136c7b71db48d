//! Integration tests for wey-store
//!
//! These tests exercise the store contract: identities, the symmetric
//! friendship relation, request bookkeeping and scored connections.

use std::sync::Arc;
use std::thread;
use wey_domain::{
    Identity, IdentityId, IdentityPair, RelationshipStore, RequestCreation, RequestDirection,
    RequestStatus, INITIAL_SCORE,
};
use wey_store::{SqliteStore, StoreError};

fn store_with(names: &[&str]) -> (SqliteStore, Vec<IdentityId>) {
    let store = SqliteStore::in_memory().unwrap();
    let ids = names
        .iter()
        .map(|name| {
            let identity = Identity::new(*name);
            store.insert_identity(&identity).unwrap();
            identity.id
        })
        .collect();
    (store, ids)
}

fn pair(a: IdentityId, b: IdentityId) -> IdentityPair {
    IdentityPair::new(a, b).unwrap()
}

fn friends_count(store: &SqliteStore, id: IdentityId) -> u64 {
    store.get_identity(id).unwrap().unwrap().friends_count
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::in_memory();
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_insert_and_get_identity() {
    let store = SqliteStore::in_memory().unwrap();
    let alice = Identity::new("Alice");

    store.insert_identity(&alice).unwrap();

    let retrieved = store.get_identity(alice.id).unwrap().unwrap();
    assert_eq!(retrieved, alice);
    assert!(store.get_identity(IdentityId::new()).unwrap().is_none());
}

#[test]
fn test_duplicate_identity_rejected() {
    let store = SqliteStore::in_memory().unwrap();
    let alice = Identity::new("Alice");

    store.insert_identity(&alice).unwrap();
    assert!(store.insert_identity(&alice).is_err());
}

#[test]
fn test_mutual_friend_is_symmetric() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    assert!(store.add_mutual_friend(pair(a, b)).unwrap());

    let of_a: Vec<_> = store.friends_of(a).unwrap().into_iter().map(|i| i.id).collect();
    let of_b: Vec<_> = store.friends_of(b).unwrap().into_iter().map(|i| i.id).collect();
    assert_eq!(of_a, vec![b]);
    assert_eq!(of_b, vec![a]);
    assert!(store.are_friends(pair(b, a)).unwrap());
    assert_eq!(friends_count(&store, a), 1);
    assert_eq!(friends_count(&store, b), 1);
}

#[test]
fn test_add_mutual_friend_is_idempotent() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    assert!(store.add_mutual_friend(pair(a, b)).unwrap());
    assert!(!store.add_mutual_friend(pair(b, a)).unwrap());

    assert_eq!(store.friends_of(a).unwrap().len(), 1);
    assert_eq!(friends_count(&store, a), 1);
    assert_eq!(friends_count(&store, b), 1);
}

#[test]
fn test_remove_mutual_friend_recounts() {
    let (store, ids) = store_with(&["Alice", "Bob", "Carol"]);
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    store.add_mutual_friend(pair(a, b)).unwrap();
    store.add_mutual_friend(pair(a, c)).unwrap();
    assert_eq!(friends_count(&store, a), 2);

    assert!(store.remove_mutual_friend(pair(b, a)).unwrap());
    assert!(!store.remove_mutual_friend(pair(b, a)).unwrap());

    assert_eq!(friends_count(&store, a), 1);
    assert_eq!(friends_count(&store, b), 0);
    assert_eq!(friends_count(&store, c), 1);
}

#[test]
fn test_create_request_suppresses_duplicates_in_both_directions() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    let first = match store.create_request(a, b, 100).unwrap() {
        RequestCreation::Created(request) => request,
        other => panic!("Expected a new request, got {:?}", other),
    };
    assert_eq!(first.status, RequestStatus::Sent);

    match store.create_request(b, a, 200).unwrap() {
        RequestCreation::Existing(existing) => assert_eq!(existing.id, first.id),
        other => panic!("Expected the existing request, got {:?}", other),
    }

    assert_eq!(store.request_count_between(pair(a, b)).unwrap(), 1);
}

#[test]
fn test_self_request_rejected() {
    let (store, ids) = store_with(&["Alice"]);
    let result = store.create_request(ids[0], ids[0], 100);
    assert!(matches!(result, Err(StoreError::InvalidData(_))));
}

#[test]
fn test_find_sent_request_respects_direction() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    store.create_request(a, b, 100).unwrap();

    assert!(store.find_sent_request(a, b).unwrap().is_some());
    assert!(store.find_sent_request(b, a).unwrap().is_none());
    assert!(store.find_unresolved_request(pair(b, a)).unwrap().is_some());
}

#[test]
fn test_resolved_request_no_longer_blocks() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    let request = store.create_request(a, b, 100).unwrap().request().clone();
    store.resolve_request(request.id, RequestStatus::Rejected).unwrap();

    assert!(store.find_unresolved_request(pair(a, b)).unwrap().is_none());
    assert!(matches!(
        store.create_request(a, b, 200).unwrap(),
        RequestCreation::Created(_)
    ));
    assert_eq!(store.request_count_between(pair(a, b)).unwrap(), 2);
}

#[test]
fn test_resolve_unknown_request() {
    let store = SqliteStore::in_memory().unwrap();
    let resolved = store
        .resolve_request(wey_domain::RequestId::new(), RequestStatus::Accepted)
        .unwrap();
    assert!(!resolved);
}

#[test]
fn test_accept_request_befriends_atomically() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    let request = store.create_request(a, b, 100).unwrap().request().clone();
    assert!(store.accept_request(request.id, pair(a, b)).unwrap());

    assert!(store.are_friends(pair(a, b)).unwrap());
    assert_eq!(friends_count(&store, a), 1);
    assert_eq!(friends_count(&store, b), 1);
    assert!(store.find_unresolved_request(pair(a, b)).unwrap().is_none());

    // A second acceptance finds no unresolved request and changes nothing
    assert!(!store.accept_request(request.id, pair(a, b)).unwrap());
    assert_eq!(friends_count(&store, a), 1);
}

#[test]
fn test_late_reject_cannot_overwrite_acceptance() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    let request = store.create_request(a, b, 100).unwrap().request().clone();
    assert!(store.accept_request(request.id, pair(a, b)).unwrap());

    assert!(!store.resolve_request(request.id, RequestStatus::Rejected).unwrap());

    assert!(store.find_unresolved_request(pair(a, b)).unwrap().is_none());
    assert!(store.are_friends(pair(a, b)).unwrap());
    assert_eq!(store.request_status(request.id).unwrap(), Some(RequestStatus::Accepted));
}

#[test]
fn test_resolve_after_purge_changes_nothing() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    let request = store.create_request(a, b, 100).unwrap().request().clone();
    store.delete_requests_between(pair(a, b)).unwrap();

    assert!(!store.accept_request(request.id, pair(a, b)).unwrap());
    assert!(!store.are_friends(pair(a, b)).unwrap());
    assert_eq!(friends_count(&store, a), 0);
}

#[test]
fn test_dissolve_friendship_purges_requests() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    let request = store.create_request(a, b, 100).unwrap().request().clone();
    store.accept_request(request.id, pair(a, b)).unwrap();

    assert!(store.dissolve_friendship(pair(b, a)).unwrap());

    assert!(!store.are_friends(pair(a, b)).unwrap());
    assert_eq!(friends_count(&store, a), 0);
    assert_eq!(friends_count(&store, b), 0);
    assert_eq!(store.request_count_between(pair(a, b)).unwrap(), 0);
}

#[test]
fn test_dissolve_without_edge_changes_nothing() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    store.create_request(a, b, 100).unwrap();

    assert!(!store.dissolve_friendship(pair(a, b)).unwrap());
    assert_eq!(store.request_count_between(pair(a, b)).unwrap(), 1);
}

#[test]
fn test_delete_requests_between() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    let request = store.create_request(a, b, 100).unwrap().request().clone();
    store.resolve_request(request.id, RequestStatus::Rejected).unwrap();
    store.create_request(b, a, 200).unwrap();

    assert_eq!(store.delete_requests_between(pair(a, b)).unwrap(), 2);
    assert_eq!(store.request_count_between(pair(a, b)).unwrap(), 0);
}

#[test]
fn test_pending_requests_by_direction() {
    let (store, ids) = store_with(&["Alice", "Bob", "Carol"]);
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    store.create_request(b, a, 100).unwrap();
    store.create_request(c, a, 200).unwrap();
    store.create_request(a, b, 300).unwrap(); // suppressed
    let resolved = store.create_request(b, c, 400).unwrap().request().clone();
    store.resolve_request(resolved.id, RequestStatus::Rejected).unwrap();

    let incoming = store.pending_requests(a, RequestDirection::Incoming).unwrap();
    let senders: Vec<_> = incoming.iter().map(|r| r.created_by).collect();
    assert_eq!(senders, vec![b, c]);

    assert!(store.pending_requests(a, RequestDirection::Outgoing).unwrap().is_empty());
    assert_eq!(store.pending_requests(b, RequestDirection::Outgoing).unwrap().len(), 1);
    assert!(store.pending_requests(c, RequestDirection::Incoming).unwrap().is_empty());
}

#[test]
fn test_connection_unique_per_pair() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    let (first, created) = store.get_or_create_connection(pair(a, b), 10).unwrap();
    assert!(created);
    assert_eq!(first.score, INITIAL_SCORE);

    let (second, created) = store.get_or_create_connection(pair(b, a), 20).unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);
    assert_eq!(second.last_interaction, 10);

    assert_eq!(store.connection_count(pair(a, b)).unwrap(), 1);
}

#[test]
fn test_update_connection_score() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let (a, b) = (ids[0], ids[1]);

    let (conn, _) = store.get_or_create_connection(pair(a, b), 10).unwrap();
    let updated = store.update_connection_score(conn.id, 14.0, 30).unwrap();

    assert_eq!(updated.score, 16.0);
    assert_eq!(updated.last_interaction, 30);
    assert!(updated.is_connected());
    assert_eq!(store.get_connection(pair(b, a)).unwrap(), Some(updated));
}

#[test]
fn test_update_unknown_connection() {
    let store = SqliteStore::in_memory().unwrap();
    let result = store.update_connection_score(wey_domain::ConnectionId::new(), 1.0, 0);
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn test_connections_of_only_returns_connected() {
    let (store, ids) = store_with(&["Alice", "Bob", "Carol"]);
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    let (ab, _) = store.get_or_create_connection(pair(a, b), 0).unwrap();
    store.update_connection_score(ab.id, 18.0, 1).unwrap();
    let (ac, _) = store.get_or_create_connection(pair(a, c), 0).unwrap();
    store.update_connection_score(ac.id, 13.0, 1).unwrap(); // exactly 15: not connected

    let connections = store.connections_of(a).unwrap();
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0].other(a), Some(b));
    assert!(store.connections_of(c).unwrap().is_empty());
}

#[test]
fn test_concurrent_score_updates_are_not_lost() {
    let (store, ids) = store_with(&["Alice", "Bob"]);
    let store = Arc::new(store);
    let p = pair(ids[0], ids[1]);
    let (conn, _) = store.get_or_create_connection(p, 0).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    store.update_connection_score(conn.id, 1.0, t * 100 + i).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let final_conn = store.get_connection(p).unwrap().unwrap();
    assert_eq!(final_conn.score, INITIAL_SCORE + 200.0);
}

#[test]
fn test_file_backed_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wey.db");
    let alice = Identity::new("Alice");
    let bob = Identity::new("Bob");

    {
        let store = SqliteStore::new(&path).unwrap();
        store.insert_identity(&alice).unwrap();
        store.insert_identity(&bob).unwrap();
        store.add_mutual_friend(pair(alice.id, bob.id)).unwrap();
    }

    let reopened = SqliteStore::new(&path).unwrap();
    assert!(reopened.are_friends(pair(alice.id, bob.id)).unwrap());
    assert_eq!(friends_count(&reopened, alice.id), 1);
    assert_eq!(reopened.list_identities().unwrap().len(), 2);
}
