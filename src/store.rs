//! Client-side cache of sighting records
//!
//! Records are never edited in place: the whole set is replaced on resync,
//! extended by one on a successful report, and shrunk by one on delete.
//! Iteration follows insertion order, which for a resync is fetch order.

use std::collections::HashMap;

use crate::error::{Result, SightingError};
use crate::types::{Sighting, SightingId};

#[derive(Debug, Clone, Default)]
pub struct SightingStore {
    records: HashMap<SightingId, Sighting>,
    /// Insertion order of `records`
    order: Vec<SightingId>,
}

impl SightingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every record and store `sightings` verbatim.
    ///
    /// If the server sends one id twice the later record wins, keeping the
    /// position of the first.
    pub fn replace_all(&mut self, sightings: impl IntoIterator<Item = Sighting>) {
        self.records.clear();
        self.order.clear();

        for sighting in sightings {
            let id = sighting.id.clone();
            if self.records.insert(id.clone(), sighting).is_none() {
                self.order.push(id);
            }
        }
    }

    /// Insert one new record
    pub fn add(&mut self, sighting: Sighting) -> Result<()> {
        if self.records.contains_key(&sighting.id) {
            return Err(SightingError::DuplicateId(sighting.id));
        }

        self.order.push(sighting.id.clone());
        self.records.insert(sighting.id.clone(), sighting);
        Ok(())
    }

    /// Delete one record by id
    pub fn remove(&mut self, id: &SightingId) -> Result<Sighting> {
        let removed = self
            .records
            .remove(id)
            .ok_or_else(|| SightingError::NotFound(id.clone()))?;
        self.order.retain(|existing| existing != id);
        Ok(removed)
    }

    pub fn get(&self, id: &SightingId) -> Option<&Sighting> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &SightingId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Sighting> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &SightingId> + '_ {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(id: &str, reporter: &str) -> Sighting {
        Sighting {
            id: id.into(),
            lat: 35.0,
            lng: 139.0,
            timestamp: "T".into(),
            reporter_id: reporter.into(),
        }
    }

    #[test]
    fn test_replace_all_discards_previous() {
        let mut store = SightingStore::new();
        store.replace_all(vec![sighting("1", "u1"), sighting("2", "u2")]);
        store.replace_all(vec![sighting("3", "u1")]);

        assert_eq!(store.len(), 1);
        assert!(store.contains(&"3".into()));
        assert!(!store.contains(&"1".into()));
    }

    #[test]
    fn test_replace_all_idempotent() {
        let set = vec![sighting("1", "u1"), sighting("2", "u2")];
        let mut store = SightingStore::new();

        store.replace_all(set.clone());
        let first: Vec<_> = store.ids().cloned().collect();
        store.replace_all(set);
        let second: Vec<_> = store.ids().cloned().collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_iteration_follows_fetch_order() {
        let mut store = SightingStore::new();
        store.replace_all(vec![sighting("b", "u1"), sighting("a", "u1"), sighting("c", "u1")]);

        let ids: Vec<_> = store.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_repeated_id_in_fetch_keeps_one_record() {
        let mut store = SightingStore::new();
        let mut later = sighting("1", "u1");
        later.timestamp = "later".into();
        store.replace_all(vec![sighting("1", "u1"), sighting("2", "u1"), later]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.iter().count(), 2);
        assert_eq!(store.get(&"1".into()).unwrap().timestamp, "later");
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let mut store = SightingStore::new();
        store.add(sighting("42", "u1")).unwrap();

        let err = store.add(sighting("42", "u2")).unwrap_err();
        assert!(matches!(err, SightingError::DuplicateId(id) if id.as_str() == "42"));
        // Original record untouched
        assert_eq!(store.get(&"42".into()).unwrap().reporter_id.as_str(), "u1");
    }

    #[test]
    fn test_remove() {
        let mut store = SightingStore::new();
        store.replace_all(vec![sighting("1", "u1"), sighting("2", "u2")]);

        let removed = store.remove(&"1".into()).unwrap();
        assert_eq!(removed.id.as_str(), "1");
        assert_eq!(store.ids().count(), 1);

        let err = store.remove(&"1".into()).unwrap_err();
        assert!(matches!(err, SightingError::NotFound(_)));
    }
}
