//! Keyed store of bookable resources.

use std::collections::BTreeMap;

use qtty::Day;

use crate::timeline::Timeline;
use crate::EntityId;

mod resource;
pub use resource::{Capacity, Resource};

/// Resource store with O(1)-semantics lookup by id.
///
/// Ids come from a monotonic counter owned by the catalog and are never
/// reused after deletion (the source systems derived ids as `max + 1`, which
/// collides once deletions interleave with inserts).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Catalog {
    resources: BTreeMap<EntityId, Resource>,
    next_id: EntityId,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> EntityId {
        // Default/deserialized catalogs may carry next_id == 0.
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds an interval-exclusive resource (a room) and returns its id.
    pub fn add_exclusive(
        &mut self,
        key: impl Into<String>,
        name: impl Into<String>,
        rate: f64,
    ) -> EntityId {
        let id = self.next_id();
        self.resources.insert(
            id,
            Resource::new(
                id,
                key.into(),
                name.into(),
                Capacity::Exclusive {
                    rate,
                    timeline: Timeline::<Day>::new(),
                },
            ),
        );
        id
    }

    /// Adds a countable resource (a title with `copies` copies) and returns
    /// its id.
    pub fn add_countable(
        &mut self,
        key: impl Into<String>,
        name: impl Into<String>,
        copies: u32,
    ) -> EntityId {
        let id = self.next_id();
        self.resources.insert(
            id,
            Resource::new(
                id,
                key.into(),
                name.into(),
                Capacity::Countable {
                    total: copies,
                    available: copies,
                },
            ),
        );
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Resource> {
        self.resources.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Resource> {
        self.resources.get_mut(&id)
    }

    /// Removes a resource unconditionally. The desk gates this behind its
    /// active-allocation check; see `Desk::remove_resource`.
    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Resource> {
        self.resources.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterates over resources in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Resources whose catalog key matches exactly, in id order.
    pub fn find_by_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Resource> {
        self.resources.values().filter(move |r| r.key() == key)
    }

    /// Case-insensitive substring match over display names.
    pub fn find_by_partial_name(&self, fragment: &str) -> Vec<&Resource> {
        let fragment = fragment.to_lowercase();
        self.resources
            .values()
            .filter(|r| r.name().to_lowercase().contains(&fragment))
            .collect()
    }

    /// Ids of resources matching `key`, collected so the caller can mutate
    /// candidates one at a time.
    pub(crate) fn ids_by_key(&self, key: &str) -> Vec<EntityId> {
        self.find_by_key(key).map(|r| r.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut catalog = Catalog::new();
        let a = catalog.add_exclusive("individual", "Room 101", 100.0);
        let b = catalog.add_exclusive("double", "Room 102", 150.0);
        assert!(b > a);

        catalog.remove(b);
        let c = catalog.add_countable("978-0", "Some Title", 3);
        assert!(c > b, "id {} was reused after deletion", c);
    }

    #[test]
    fn test_find_by_key() {
        let mut catalog = Catalog::new();
        catalog.add_exclusive("individual", "Room 101", 100.0);
        catalog.add_exclusive("double", "Room 201", 150.0);
        catalog.add_exclusive("individual", "Room 102", 100.0);

        let singles: Vec<&Resource> = catalog.find_by_key("individual").collect();
        assert_eq!(singles.len(), 2);
        assert!(catalog.find_by_key("suite").next().is_none());
    }

    #[test]
    fn test_find_by_partial_name_is_case_insensitive() {
        let mut catalog = Catalog::new();
        catalog.add_countable("978-84", "Cien Años de Soledad", 2);
        catalog.add_countable("978-02", "The Old Man and the Sea", 1);

        let hits = catalog.find_by_partial_name("aÑos");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "Cien Años de Soledad");

        let hits = catalog.find_by_partial_name("THE");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_get_and_len() {
        let mut catalog = Catalog::new();
        assert!(catalog.is_empty());
        let id = catalog.add_exclusive("individual", "Room 101", 100.0);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(id).map(|r| r.name()), Some("Room 101"));
        assert!(catalog.get(999).is_none());
    }
}
