//! Two-hop connections graph builder
//!
//! Materializes the subgraph reachable from an origin within two hops over
//! connected pairs, as a flat edge list for client-side rendering. Depth is
//! capped at two, so no visited-set search is needed; edges are de-duplicated
//! by unordered pair.

use crate::{Result, SocialError};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;
use wey_domain::{IdentityId, IdentityPair, RelationshipStore};

fn serialize_id<S>(id: &IdentityId, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(id)
}

/// A weighted edge of the connections graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    /// Endpoint the traversal came from
    #[serde(serialize_with = "serialize_id")]
    pub source: IdentityId,

    /// Endpoint the traversal reached
    #[serde(serialize_with = "serialize_id")]
    pub target: IdentityId,

    /// Connection score
    pub weight: f64,
}

/// Edge list of an origin's two-hop neighbourhood
///
/// Serializes as `{"origin": "...", "edges": [{"source", "target", "weight"}]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionsGraph {
    /// The identity the traversal started from
    #[serde(serialize_with = "serialize_id")]
    pub origin: IdentityId,

    /// One edge per unordered pair, sorted by pair
    pub edges: Vec<GraphEdge>,
}

impl ConnectionsGraph {
    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no edges
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The edge between `a` and `b`, in either orientation
    pub fn edge(&self, a: IdentityId, b: IdentityId) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| {
            (e.source == a && e.target == b) || (e.source == b && e.target == a)
        })
    }

    /// Whether an edge joins `a` and `b`
    pub fn contains_edge(&self, a: IdentityId, b: IdentityId) -> bool {
        self.edge(a, b).is_some()
    }

    /// Every identity appearing in the graph
    pub fn nodes(&self) -> BTreeSet<IdentityId> {
        self.edges
            .iter()
            .flat_map(|e| [e.source, e.target])
            .collect()
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds two-hop connections graphs from a store
pub struct GraphBuilder<S> {
    store: Arc<S>,
}

impl<S> GraphBuilder<S>
where
    S: RelationshipStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    /// Create a builder over a shared store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Build the connections graph around `origin`
    ///
    /// 1. Every connected pair incident to `origin` yields a direct neighbour
    ///    and an edge `(origin, neighbour)`.
    /// 2. Every connected pair incident to a direct neighbour yields an edge
    ///    `(neighbour, secondary)`; the secondary may be the origin or another
    ///    neighbour.
    ///
    /// Edges are keyed by unordered pair. When a pair is visited twice the
    /// later visit wins.
    pub fn build(&self, origin: IdentityId) -> Result<ConnectionsGraph> {
        if self
            .store
            .get_identity(origin)
            .map_err(SocialError::store)?
            .is_none()
        {
            return Err(SocialError::NotFound(format!("identity {}", origin)));
        }

        let mut edges: BTreeMap<IdentityPair, GraphEdge> = BTreeMap::new();
        let direct = self.store.connections_of(origin).map_err(SocialError::store)?;

        for connection in &direct {
            let Some(neighbor) = connection.other(origin) else {
                continue;
            };
            edges.insert(
                connection.pair,
                GraphEdge {
                    source: origin,
                    target: neighbor,
                    weight: connection.score,
                },
            );

            let secondary = self
                .store
                .connections_of(neighbor)
                .map_err(SocialError::store)?;
            for second in secondary {
                let Some(second_friend) = second.other(neighbor) else {
                    continue;
                };
                edges.insert(
                    second.pair,
                    GraphEdge {
                        source: neighbor,
                        target: second_friend,
                        weight: second.score,
                    },
                );
            }
        }

        debug!(
            "Built connections graph for {}: {} direct neighbours, {} edges",
            origin,
            direct.len(),
            edges.len()
        );

        Ok(ConnectionsGraph {
            origin,
            edges: edges.into_values().collect(),
        })
    }
}
