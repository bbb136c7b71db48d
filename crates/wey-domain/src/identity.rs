//! Identity module - the people in the social graph

use crate::id::uuid_id;

uuid_id! {
    /// Unique identifier for an identity (UUIDv7)
    ///
    /// # Examples
    ///
    /// ```
    /// use wey_domain::IdentityId;
    ///
    /// let id = IdentityId::new();
    /// let parsed = IdentityId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    IdentityId
}

/// A person participating in the social graph
///
/// `friends_count` is a denormalized cache of the friends relation. The store
/// recomputes it from the relation after every mutation; it is never adjusted
/// incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Unique identifier
    pub id: IdentityId,

    /// Display name
    pub name: String,

    /// Cached cardinality of the friends relation
    pub friends_count: u64,
}

impl Identity {
    /// Create a new identity with no friends
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: IdentityId::new(),
            name: name.into(),
            friends_count: 0,
        }
    }
}

/// A canonicalized unordered pair of distinct identities
///
/// The lower id is always stored first, so `(a, b)` and `(b, a)` produce the
/// same pair. Construction fails for self-pairs, which makes self-friendships
/// and self-connections unrepresentable.
///
/// # Examples
///
/// ```
/// use wey_domain::{IdentityId, IdentityPair};
///
/// let a = IdentityId::from_value(1);
/// let b = IdentityId::from_value(2);
///
/// assert_eq!(IdentityPair::new(a, b), IdentityPair::new(b, a));
/// assert!(IdentityPair::new(a, a).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityPair {
    low: IdentityId,
    high: IdentityId,
}

impl IdentityPair {
    /// Canonicalize two identities into a pair, or `None` if they are equal
    pub fn new(a: IdentityId, b: IdentityId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The smaller identity of the pair
    pub fn low(&self) -> IdentityId {
        self.low
    }

    /// The larger identity of the pair
    pub fn high(&self) -> IdentityId {
        self.high
    }

    /// Whether the given identity is one of the endpoints
    pub fn contains(&self, id: IdentityId) -> bool {
        self.low == id || self.high == id
    }

    /// The opposite endpoint, or `None` if `id` is not part of the pair
    pub fn other(&self, id: IdentityId) -> Option<IdentityId> {
        if id == self.low {
            Some(self.high)
        } else if id == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_id_ordering() {
        let id1 = IdentityId::from_value(1000);
        let id2 = IdentityId::from_value(2000);

        assert!(id1 < id2);
    }

    #[test]
    fn test_identity_id_invalid_string() {
        assert!(IdentityId::from_string("not-a-valid-uuid").is_err());
        assert!(IdentityId::from_string("").is_err());
    }

    #[test]
    fn test_new_identity_has_no_friends() {
        let identity = Identity::new("Alice");
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.friends_count, 0);
    }

    #[test]
    fn test_pair_other() {
        let a = IdentityId::from_value(7);
        let b = IdentityId::from_value(3);
        let pair = IdentityPair::new(a, b).unwrap();

        assert_eq!(pair.low(), b);
        assert_eq!(pair.high(), a);
        assert_eq!(pair.other(a), Some(b));
        assert_eq!(pair.other(b), Some(a));
        assert_eq!(pair.other(IdentityId::from_value(99)), None);
        assert!(pair.contains(a));
        assert!(!pair.contains(IdentityId::from_value(99)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: canonicalization is independent of argument order
        #[test]
        fn test_pair_order_independent(a: u128, b: u128) {
            let x = IdentityId::from_value(a);
            let y = IdentityId::from_value(b);

            prop_assert_eq!(IdentityPair::new(x, y), IdentityPair::new(y, x));
        }

        /// Property: pairs exist exactly for distinct identities and keep low < high
        #[test]
        fn test_pair_irreflexive(a: u128, b: u128) {
            let x = IdentityId::from_value(a);
            let y = IdentityId::from_value(b);

            match IdentityPair::new(x, y) {
                Some(pair) => {
                    prop_assert!(a != b);
                    prop_assert!(pair.low() < pair.high());
                }
                None => prop_assert_eq!(a, b),
            }
        }
    }
}
