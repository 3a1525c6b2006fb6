//! Keyed store of clients.

use std::collections::BTreeMap;

use crate::EntityId;

mod client;
pub use client::Client;

/// Client store with O(1)-semantics lookup by id.
///
/// Same id discipline as the catalog: a monotonic counter, ids never reused.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registry {
    clients: BTreeMap<EntityId, Client>,
    next_id: EntityId,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            clients: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Registers a client and returns their id.
    pub fn add(&mut self, name: impl Into<String>, contact: impl Into<String>) -> EntityId {
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.clients
            .insert(id, Client::new(id, name.into(), contact.into()));
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    /// Removes a client unconditionally; the desk gates this behind its
    /// active-allocation check.
    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Client> {
        self.clients.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Iterates over clients in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Case-insensitive substring match over client names.
    pub fn find_by_partial_name(&self, fragment: &str) -> Vec<&Client> {
        let fragment = fragment.to_lowercase();
        self.clients
            .values()
            .filter(|c| c.name().to_lowercase().contains(&fragment))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut registry = Registry::new();
        let a = registry.add("Ana", "ana@example.com");
        let b = registry.add("Benito", "benito@example.com");
        registry.remove(a);
        let c = registry.add("Carla", "carla@example.com");
        assert!(c > b);
        assert!(registry.get(a).is_none());
    }

    #[test]
    fn test_find_by_partial_name() {
        let mut registry = Registry::new();
        registry.add("Ana García", "");
        registry.add("Benito García", "");
        registry.add("Carla", "");

        assert_eq!(registry.find_by_partial_name("garcía").len(), 2);
        assert_eq!(registry.find_by_partial_name("CARLA").len(), 1);
        assert!(registry.find_by_partial_name("diego").is_empty());
    }
}
