//! Injectable policy constants.
//!
//! The original systems hardcode these ("≤ 3 active loans", "$1/day late
//! fee", closed-interval conflicts); keeping them in one struct makes the
//! boundary values testable and lets a deployment tune them without touching
//! allocation logic.

/// How interval endpoints are compared when deciding a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlapPolicy {
    /// `[s, e]` inclusive at both ends: touching endpoints conflict.
    /// Matches the source reservation system.
    #[default]
    Closed,
    /// `[s, e)`: back-to-back intervals are compatible (same-day
    /// checkout/check-in).
    HalfOpen,
}

/// Per-desk policy knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Policy {
    /// Maximum open allocations a single client may hold.
    pub max_active: usize,
    /// Fine charged per whole day of late return.
    pub fine_per_day: f64,
    /// Boundary policy for exclusive-resource conflicts.
    pub overlap: OverlapPolicy,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            max_active: 3,
            fine_per_day: 1.0,
            overlap: OverlapPolicy::Closed,
        }
    }
}
