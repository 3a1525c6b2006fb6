//! Client records.

use crate::{Code, EntityId};

/// A requester: hotel guest or library patron.
///
/// Holds non-owning back-references (codes) to its allocations and the
/// outstanding-fine balance. Mutation goes through the desk, which keeps the
/// invariants: `balance >= 0`, active codes belong to open allocations.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Client {
    id: EntityId,
    name: String,
    contact: String,
    active: Vec<Code>,
    history: Vec<Code>,
    balance: f64,
}

impl Client {
    pub(crate) fn new(id: EntityId, name: String, contact: String) -> Self {
        Self {
            id,
            name,
            contact,
            active: Vec::new(),
            history: Vec::new(),
            balance: 0.0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Codes of open allocations, in open order.
    pub fn active(&self) -> &[Code] {
        &self.active
    }

    /// Codes of closed allocations, in close order.
    pub fn history(&self) -> &[Code] {
        &self.history
    }

    /// Outstanding fines, never negative.
    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub(crate) fn begin(&mut self, code: Code) {
        self.active.push(code);
    }

    /// Archives an allocation: moves its code from active to history.
    pub(crate) fn finish(&mut self, code: &str) {
        if let Some(pos) = self.active.iter().position(|c| c == code) {
            let code = self.active.remove(pos);
            self.history.push(code);
        }
    }

    pub(crate) fn charge(&mut self, amount: f64) {
        self.balance += amount;
    }

    /// Unconditional decrement; the desk validates `amount <= balance` first.
    pub(crate) fn pay_down(&mut self, amount: f64) {
        self.balance = (self.balance - amount).max(0.0);
    }
}

// `balance >= 0` holds in every reachable state, including states loaded
// from a snapshot; reject a record that breaks it.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Client {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            id: EntityId,
            name: String,
            contact: String,
            active: Vec<Code>,
            history: Vec<Code>,
            balance: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        if !raw.balance.is_finite() || raw.balance < 0.0 {
            return Err(serde::de::Error::custom(
                "client balance must be a non-negative number",
            ));
        }
        Ok(Self {
            id: raw.id,
            name: raw.name,
            contact: raw.contact,
            active: raw.active,
            history: raw.history,
            balance: raw.balance,
        })
    }
}
