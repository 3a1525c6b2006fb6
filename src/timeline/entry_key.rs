use crate::interval::Interval;
use crate::Code;

/// A total-order key for `f64` using IEEE-754 total order (`total_cmp`).
/// This lets us use `f64`-backed start times as `BTreeMap` keys.
///
/// NaN times are nonsense for an availability index, so inserts reject them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeKey(pub(crate) f64);

impl TimeKey {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Eq for TimeKey {}

impl Ord for TimeKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for TimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// An entry in the timeline, mapping an allocation code to its interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<U: qtty::Unit> {
    pub(crate) code: Code,
    pub(crate) interval: Interval<U>,
}

impl<U: qtty::Unit> Entry<U> {
    pub fn new(code: Code, interval: Interval<U>) -> Self {
        Self { code, interval }
    }

    /// Returns the allocation code holding this slot.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn interval(&self) -> Interval<U> {
        self.interval
    }
}
