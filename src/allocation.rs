//! Allocation records: one resource assigned to one client over an interval.

use qtty::{Day, Quantity};

use crate::interval::Interval;
use crate::{Code, EntityId};

/// Lifecycle state of an allocation. Records are never deleted; closing
/// archives them into the client's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Open,
    Closed,
}

/// Monetary terms, fixed by the capacity model of the allocated resource.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terms {
    /// Stay cost, computed eagerly at open time and immutable thereafter.
    Booking { cost: f64 },
    /// Overdue fine, zero while open, computed once at close time.
    Loan { fine: f64 },
}

/// A recorded assignment of one resource to one client.
///
/// The allocation owns its interval and settlement data; the resource and
/// client only hold its code for lookup.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    pub code: Code,
    pub client: EntityId,
    pub resource: EntityId,
    /// Booking: the reserved stay. Loan: `[checkout, due]`.
    pub interval: Interval<Day>,
    pub terms: Terms,
    pub status: Status,
    /// Actual return time, recorded when a loan or stay closes.
    pub returned_at: Option<Quantity<Day>>,
}

impl Allocation {
    pub(crate) fn open(
        code: Code,
        client: EntityId,
        resource: EntityId,
        interval: Interval<Day>,
        terms: Terms,
    ) -> Self {
        Self {
            code,
            client,
            resource,
            interval,
            terms,
            status: Status::Open,
            returned_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == Status::Open
    }

    /// Amount settled so far: booking cost, or the fine accrued at close.
    pub fn amount(&self) -> f64 {
        match self.terms {
            Terms::Booking { cost } => cost,
            Terms::Loan { fine } => fine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_allocation_starts_open_and_unreturned() {
        let alloc = Allocation::open(
            "A-1".to_string(),
            1,
            2,
            Interval::from_f64(0.0, 3.0),
            Terms::Booking { cost: 300.0 },
        );
        assert!(alloc.is_open());
        assert_eq!(alloc.returned_at, None);
        assert_eq!(alloc.amount(), 300.0);
    }

    #[test]
    fn loan_amount_is_fine() {
        let alloc = Allocation::open(
            "A-2".to_string(),
            1,
            2,
            Interval::from_f64(0.0, 14.0),
            Terms::Loan { fine: 0.0 },
        );
        assert_eq!(alloc.amount(), 0.0);
    }
}
