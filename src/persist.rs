//! Opaque load/save boundary.
//!
//! The core never interleaves persistence with allocation logic: a
//! [`Snapshot`] is taken or restored whole at explicit save/load points.
//! Failures degrade gracefully — a desk that cannot load starts empty, a
//! desk that cannot save keeps operating in memory; both paths log.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::allocation::Allocation;
use crate::catalog::Catalog;
use crate::desk::Desk;
use crate::policy::Policy;
use crate::registry::Registry;
use crate::Code;

/// Everything a desk needs to resume: both stores (with their id counters)
/// and the full allocation ledger, open and archived.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub catalog: Catalog,
    pub registry: Registry,
    pub allocations: BTreeMap<Code, Allocation>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Format(#[from] serde_json::Error),
}

/// Persistence collaborator. The on-disk representation is the store's
/// business; the core only sees snapshots.
pub trait Store {
    fn load(&self) -> Result<Snapshot, StoreError>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// Single-file JSON store.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Snapshot, StoreError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl Desk {
    /// Captures the current state as a snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            catalog: self.catalog().clone(),
            registry: self.registry().clone(),
            allocations: self.ledger().clone(),
        }
    }

    /// Rebuilds a desk from a snapshot. The policy is deployment
    /// configuration, not data, so it rides alongside.
    pub fn restore(snapshot: Snapshot, policy: Policy) -> Self {
        Desk::from_parts(
            snapshot.catalog,
            snapshot.registry,
            snapshot.allocations,
            policy,
        )
    }

    /// Loads from a store, degrading to an empty desk when the store fails
    /// (missing file on first run, corrupt snapshot). The failure is logged
    /// and the session continues in memory.
    pub fn load_from(store: &impl Store, policy: Policy) -> Self {
        match store.load() {
            Ok(snapshot) => Desk::restore(snapshot, policy),
            Err(err) => {
                log::warn!("could not load snapshot, starting empty: {err}");
                Desk::with_policy(policy)
            }
        }
    }

    /// Saves to a store. A failure is logged and reported but leaves the
    /// in-memory state untouched.
    pub fn save_to(&self, store: &impl Store) -> Result<(), StoreError> {
        store.save(&self.snapshot()).inspect_err(|err| {
            log::warn!("could not save snapshot: {err}");
        })
    }
}
