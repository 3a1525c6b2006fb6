//! The front desk: orchestrates the booking/loan protocol.

use std::collections::BTreeMap;

use qtty::{Day, Quantity};

use crate::allocation::{Allocation, Status, Terms};
use crate::catalog::{Catalog, Resource};
use crate::interval::Interval;
use crate::policy::Policy;
use crate::registry::{Client, Registry};
use crate::settlement;
use crate::{generate_code, Code, EntityId};

pub mod errors;
pub use errors::{DeskError, IneligibleReason};


/// Allocation manager over one catalog of resources and one registry of
/// clients.
///
/// The desk owns both stores and the allocation ledger; all mutation routes
/// through it so the invariants hold in every reachable state:
/// - no two active allocations on an exclusive resource conflict;
/// - `available ∈ [0, total]` for every countable resource;
/// - a client's balance is never negative, and a client with a nonzero
///   balance cannot open allocations.
///
/// Every operation either fully succeeds or returns a [`DeskError`] with the
/// state unchanged. Single-threaded by design; callers layering concurrency
/// on top must serialize mutations themselves.
#[derive(Debug, Clone, Default)]
pub struct Desk {
    catalog: Catalog,
    registry: Registry,
    ledger: BTreeMap<Code, Allocation>,
    policy: Policy,
}

impl Desk {
    /// Desk with the default policy (3 open allocations per client, 1/day
    /// fine, closed-interval conflicts).
    pub fn new() -> Self {
        Self::with_policy(Policy::default())
    }

    pub fn with_policy(policy: Policy) -> Self {
        Self {
            catalog: Catalog::new(),
            registry: Registry::new(),
            ledger: BTreeMap::new(),
            policy,
        }
    }

    pub(crate) fn from_parts(
        catalog: Catalog,
        registry: Registry,
        ledger: BTreeMap<Code, Allocation>,
        policy: Policy,
    ) -> Self {
        Self {
            catalog,
            registry,
            ledger,
            policy,
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Looks up an allocation by code, open or archived.
    pub fn allocation(&self, code: &str) -> Option<&Allocation> {
        self.ledger.get(code)
    }

    /// Iterates over every recorded allocation, in code order.
    pub fn allocations(&self) -> impl Iterator<Item = &Allocation> {
        self.ledger.values()
    }

    pub(crate) fn ledger(&self) -> &BTreeMap<Code, Allocation> {
        &self.ledger
    }

    // -------------------------------------------------------------------------
    // Catalog / registry authority
    // -------------------------------------------------------------------------

    /// Adds an interval-exclusive resource (a room type instance).
    pub fn add_exclusive(
        &mut self,
        key: impl Into<String>,
        name: impl Into<String>,
        rate: f64,
    ) -> EntityId {
        let id = self.catalog.add_exclusive(key, name, rate);
        if let Some(resource) = self.catalog.get_mut(id) {
            resource.set_overlap_policy(self.policy.overlap);
        }
        id
    }

    /// Adds a countable resource (a title with `copies` copies).
    pub fn add_countable(
        &mut self,
        key: impl Into<String>,
        name: impl Into<String>,
        copies: u32,
    ) -> EntityId {
        self.catalog.add_countable(key, name, copies)
    }

    /// Registers a client.
    pub fn register_client(
        &mut self,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> EntityId {
        self.registry.add(name, contact)
    }

    /// Removes a resource. Fails with `InUse` while it still backs an open
    /// allocation; archived history never blocks removal.
    pub fn remove_resource(&mut self, id: EntityId) -> Result<Resource, DeskError> {
        if self
            .ledger
            .values()
            .any(|a| a.is_open() && a.resource == id)
        {
            return Err(DeskError::InUse {
                entity: "resource",
                id,
            });
        }
        self.catalog.remove(id).ok_or(DeskError::NotFound {
            entity: "resource",
            key: id.to_string(),
        })
    }

    /// Removes a client. Fails with `InUse` while they hold an open
    /// allocation.
    pub fn remove_client(&mut self, id: EntityId) -> Result<Client, DeskError> {
        if self.ledger.values().any(|a| a.is_open() && a.client == id) {
            return Err(DeskError::InUse {
                entity: "client",
                id,
            });
        }
        self.registry.remove(id).ok_or(DeskError::NotFound {
            entity: "client",
            key: id.to_string(),
        })
    }

    // -------------------------------------------------------------------------
    // Allocation protocol
    // -------------------------------------------------------------------------

    /// Opens an allocation for `client_id` on the first free resource whose
    /// catalog key matches `key`, over `[start, end]` (loans read `end` as
    /// the due time).
    ///
    /// # Errors
    ///
    /// - `InvalidInterval` if `end <= start` or an endpoint is NaN
    /// - `NotFound` for an unknown client, or when no resource carries `key`
    /// - `Ineligible` for an outstanding balance or the open-allocation cap
    /// - `Unavailable` when every matching resource is taken
    ///
    /// No state changes on any error path.
    pub fn open_allocation(
        &mut self,
        client_id: EntityId,
        key: &str,
        start: Quantity<Day>,
        end: Quantity<Day>,
    ) -> Result<Allocation, DeskError> {
        let (s, e) = (start.value(), end.value());
        if s.is_nan() || e.is_nan() || e <= s {
            return Err(DeskError::InvalidInterval);
        }
        let interval = Interval::new(start, end);

        let client = self.registry.get(client_id).ok_or(DeskError::NotFound {
            entity: "client",
            key: client_id.to_string(),
        })?;

        let candidates = self.catalog.ids_by_key(key);
        if candidates.is_empty() {
            return Err(DeskError::NotFound {
                entity: "resource",
                key: key.to_string(),
            });
        }

        if client.balance() > 0.0 {
            return Err(DeskError::Ineligible {
                client: client_id,
                reason: IneligibleReason::OutstandingBalance(client.balance()),
            });
        }
        if client.active().len() >= self.policy.max_active {
            return Err(DeskError::Ineligible {
                client: client_id,
                reason: IneligibleReason::ActiveCapReached(self.policy.max_active),
            });
        }

        let code = generate_code();

        // First candidate that commits wins. A candidate that rejects the
        // interval (slot taken, no copy left) is left untouched.
        let mut opened: Option<(EntityId, Terms)> = None;
        for id in candidates {
            let Some(resource) = self.catalog.get_mut(id) else {
                continue;
            };
            let terms = match resource.rate() {
                Some(rate) => {
                    let Some(timeline) = resource.timeline_mut() else {
                        continue;
                    };
                    if timeline.add(code.clone(), interval).is_err() {
                        continue;
                    }
                    Terms::Booking {
                        cost: settlement::stay_cost(&interval, rate),
                    }
                }
                None => {
                    if !resource.checkout_copy() {
                        continue;
                    }
                    Terms::Loan { fine: 0.0 }
                }
            };
            opened = Some((id, terms));
            break;
        }

        let Some((resource_id, terms)) = opened else {
            return Err(DeskError::Unavailable {
                key: key.to_string(),
            });
        };

        let allocation = Allocation::open(code.clone(), client_id, resource_id, interval, terms);
        if let Some(client) = self.registry.get_mut(client_id) {
            client.begin(code.clone());
        }
        self.ledger.insert(code, allocation.clone());
        Ok(allocation)
    }

    /// Closes an allocation: releases the resource, settles the fine for a
    /// late loan return, and archives the code into the client's history.
    ///
    /// Idempotent: closing an already-closed allocation is a no-op. Unknown
    /// codes are `NotFound`.
    pub fn close_allocation(
        &mut self,
        code: &str,
        returned_at: Quantity<Day>,
    ) -> Result<(), DeskError> {
        let (resource_id, client_id, terms, due) = {
            let Some(allocation) = self.ledger.get(code) else {
                return Err(DeskError::NotFound {
                    entity: "allocation",
                    key: code.to_string(),
                });
            };
            if !allocation.is_open() {
                return Ok(());
            }
            (
                allocation.resource,
                allocation.client,
                allocation.terms,
                allocation.interval.end(),
            )
        };

        let fine = match terms {
            Terms::Booking { .. } => {
                // Only active slots feed availability.
                if let Some(resource) = self.catalog.get_mut(resource_id) {
                    if let Some(timeline) = resource.timeline_mut() {
                        timeline.remove(code);
                    }
                }
                0.0
            }
            Terms::Loan { .. } => {
                if let Some(resource) = self.catalog.get_mut(resource_id) {
                    resource.restore_copy();
                }
                settlement::overdue_fine(due, returned_at, self.policy.fine_per_day)
            }
        };

        if let Some(allocation) = self.ledger.get_mut(code) {
            allocation.status = Status::Closed;
            allocation.returned_at = Some(returned_at);
            if matches!(terms, Terms::Loan { .. }) {
                allocation.terms = Terms::Loan { fine };
            }
        }

        if let Some(client) = self.registry.get_mut(client_id) {
            client.finish(code);
            // A nonzero fine always lands on the ledger, never discarded.
            if fine > 0.0 {
                client.charge(fine);
            }
        }
        Ok(())
    }

    /// Pays `amount` against a client's outstanding balance.
    ///
    /// The amount must be a non-negative number: a negative or NaN amount
    /// would corrupt the fine ledger (grow the debt, or wipe it) and is
    /// rejected before the balance is touched.
    pub fn pay(&mut self, client_id: EntityId, amount: f64) -> Result<(), DeskError> {
        if amount.is_nan() || amount < 0.0 {
            return Err(DeskError::InvalidAmount { requested: amount });
        }
        let Some(client) = self.registry.get_mut(client_id) else {
            return Err(DeskError::NotFound {
                entity: "client",
                key: client_id.to_string(),
            });
        };
        if amount > client.balance() {
            return Err(DeskError::ExceedsBalance {
                requested: amount,
                balance: client.balance(),
            });
        }
        client.pay_down(amount);
        Ok(())
    }
}
