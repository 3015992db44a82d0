//! Canonical shape for many-to-many relations stored on a row.
//!
//! Genres, platforms, accessibility tags and user preferences are kept as a sorted,
//! de-duplicated set of foreign ids serialized into a JSON text column. Lookups of
//! the referenced taxonomy rows happen at read time and tolerate ids that no longer
//! resolve.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of foreign ids, serialized as a JSON array.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, FromJsonQueryResult,
)]
#[serde(transparent)]
pub struct IdSet(BTreeSet<i64>);

impl IdSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether `id` is a member.
    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    /// Adds `id`, returning false if it was already present.
    pub fn insert(&mut self, id: i64) -> bool {
        self.0.insert(id)
    }

    /// Removes `id`, returning false if it was absent.
    pub fn remove(&mut self, id: i64) -> bool {
        self.0.remove(&id)
    }

    /// Number of ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no ids are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<i64> for IdSet {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[i64; N]> for IdSet {
    fn from(ids: [i64; N]) -> Self {
        ids.into_iter().collect()
    }
}

impl From<Vec<i64>> for IdSet {
    fn from(ids: Vec<i64>) -> Self {
        ids.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_id_set_deduplicates_and_sorts() {
        let set = IdSet::from(vec![3, 1, 3, 2]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_id_set_serializes_as_plain_array() {
        let set = IdSet::from([2, 1]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[1,2]");

        let parsed: IdSet = serde_json::from_str("[5,4,5]").unwrap();
        assert_eq!(parsed, IdSet::from([4, 5]));
    }

    #[test]
    fn test_insert_and_remove_report_membership_changes() {
        let mut set = IdSet::new();
        assert!(set.insert(7));
        assert!(!set.insert(7));
        assert!(set.contains(7));
        assert!(set.remove(7));
        assert!(!set.remove(7));
        assert!(set.is_empty());
    }
}
