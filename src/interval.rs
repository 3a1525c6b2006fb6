//! Continuous time interval carried by every allocation.

use std::fmt::Display;

use qtty::{Quantity, Unit};

use crate::policy::OverlapPolicy;

/// Continuous range `[start, end]` over which a resource is held.
///
/// For bookings both endpoints are fixed at open time; for loans `end` is the
/// due time. Endpoints are unit-typed quantities (days for the domain types).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<U: Unit> {
    start: Quantity<U>,
    end: Quantity<U>,
}

impl<U: Unit> Interval<U> {
    /// Creates interval `[start, end]`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`. Callers that take untrusted endpoints
    /// (the desk) validate first and report `InvalidInterval` instead.
    pub const fn new(start: Quantity<U>, end: Quantity<U>) -> Self {
        assert!(
            start.value() <= end.value(),
            "Interval start must be <= end"
        );
        Self { start, end }
    }

    pub const fn from_f64(start: f64, end: f64) -> Self {
        Self::new(Quantity::<U>::new(start), Quantity::<U>::new(end))
    }

    pub const fn start(&self) -> Quantity<U> {
        self.start
    }

    pub const fn end(&self) -> Quantity<U> {
        self.end
    }

    pub fn duration(&self) -> Quantity<U> {
        self.end - self.start
    }

    /// Returns true if `position` ∈ `[start, end]`.
    pub const fn contains(&self, position: Quantity<U>) -> bool {
        self.start.value() <= position.value() && position.value() <= self.end.value()
    }

    /// Closed-interval overlap: touching endpoints conflict.
    ///
    /// This is the policy of the original reservation system — a stay ending
    /// on day 10 blocks another starting on day 10.
    pub const fn overlaps(&self, other: &Interval<U>) -> bool {
        self.start.value() <= other.end.value() && other.start.value() <= self.end.value()
    }

    /// Half-open overlap: back-to-back intervals are compatible
    /// (checkout morning and check-in the same day may coexist).
    pub const fn overlaps_half_open(&self, other: &Interval<U>) -> bool {
        self.start.value() < other.end.value() && other.start.value() < self.end.value()
    }

    /// Overlap under the given boundary policy.
    pub const fn conflicts_with(&self, other: &Interval<U>, policy: OverlapPolicy) -> bool {
        match policy {
            OverlapPolicy::Closed => self.overlaps(other),
            OverlapPolicy::HalfOpen => self.overlaps_half_open(other),
        }
    }
}

impl<U: Unit> Display for Interval<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.start.value(), self.end.value())
    }
}

// =============================================================================
// Interval Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<U: Unit> serde::Serialize for Interval<U> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Interval", 2)?;
        s.serialize_field("start", &self.start.value())?;
        s.serialize_field("end", &self.end.value())?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, U: Unit> serde::Deserialize<'de> for Interval<U> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            start: f64,
            end: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        if raw.start > raw.end {
            return Err(serde::de::Error::custom("interval start must be <= end"));
        }
        Ok(Self {
            start: Quantity::<U>::new(raw.start),
            end: Quantity::<U>::new(raw.end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::Day;

    fn iv(start: f64, end: f64) -> Interval<Day> {
        Interval::from_f64(start, end)
    }

    #[test]
    fn test_interval_creation() {
        let interval = iv(2.0, 5.0);
        assert_eq!(interval.start().value(), 2.0);
        assert_eq!(interval.end().value(), 5.0);
        assert_eq!(interval.duration().value(), 3.0);
    }

    #[test]
    fn test_interval_contains() {
        let interval = iv(0.0, 10.0);
        assert!(interval.contains(Quantity::<Day>::new(5.0)));
        assert!(interval.contains(Quantity::<Day>::new(0.0)));
        assert!(interval.contains(Quantity::<Day>::new(10.0)));
        assert!(!interval.contains(Quantity::<Day>::new(10.5)));
    }

    #[test]
    fn test_closed_overlap() {
        let a = iv(0.0, 10.0);
        let b = iv(5.0, 15.0);
        let c = iv(20.0, 30.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_endpoints_by_policy() {
        let a = iv(0.0, 10.0);
        let b = iv(10.0, 20.0);

        // Closed: day-10 checkout blocks day-10 check-in.
        assert!(a.overlaps(&b));
        assert!(a.conflicts_with(&b, OverlapPolicy::Closed));

        // Half-open: back-to-back is fine.
        assert!(!a.overlaps_half_open(&b));
        assert!(!a.conflicts_with(&b, OverlapPolicy::HalfOpen));
    }

    #[test]
    fn test_half_open_still_rejects_real_overlap() {
        let a = iv(0.0, 10.0);
        let b = iv(9.5, 20.0);
        assert!(a.overlaps_half_open(&b));
    }
}
