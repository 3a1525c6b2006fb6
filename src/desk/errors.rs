use std::fmt;

use thiserror::Error;

use crate::EntityId;

/// Why a client may not open a new allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IneligibleReason {
    /// Outstanding fines must be paid off first.
    OutstandingBalance(f64),
    /// The client already holds the maximum number of open allocations.
    ActiveCapReached(usize),
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibleReason::OutstandingBalance(balance) => {
                write!(f, "outstanding balance of {}", balance)
            }
            IneligibleReason::ActiveCapReached(cap) => {
                write!(f, "already holds {} open allocations", cap)
            }
        }
    }
}

/// Failures of the allocation protocol. All are locally recoverable: the
/// desk's state is unchanged on every error return.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeskError {
    #[error("No {entity} matching '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("Client {client} is ineligible: {reason}")]
    Ineligible {
        client: EntityId,
        reason: IneligibleReason,
    },

    #[error("No free resource for '{key}' over the requested interval")]
    Unavailable { key: String },

    #[error("Invalid interval: end must be after start")]
    InvalidInterval,

    #[error("Payment of {requested} exceeds outstanding balance of {balance}")]
    ExceedsBalance { requested: f64, balance: f64 },

    #[error("Invalid payment amount: {requested}")]
    InvalidAmount { requested: f64 },

    #[error("{entity} {id} has active allocations")]
    InUse { entity: &'static str, id: EntityId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let e = DeskError::NotFound {
            entity: "resource",
            key: "individual".to_string(),
        };
        assert_eq!(e.to_string(), "No resource matching 'individual'");
    }

    #[test]
    fn ineligible_display() {
        let e = DeskError::Ineligible {
            client: 7,
            reason: IneligibleReason::OutstandingBalance(3.0),
        };
        assert_eq!(
            e.to_string(),
            "Client 7 is ineligible: outstanding balance of 3"
        );

        let e = DeskError::Ineligible {
            client: 7,
            reason: IneligibleReason::ActiveCapReached(3),
        };
        assert!(e.to_string().contains("3 open allocations"));
    }

    #[test]
    fn exceeds_balance_display() {
        let e = DeskError::ExceedsBalance {
            requested: 5.0,
            balance: 3.0,
        };
        assert_eq!(
            e.to_string(),
            "Payment of 5 exceeds outstanding balance of 3"
        );
    }

    #[test]
    fn in_use_display() {
        let e = DeskError::InUse {
            entity: "resource",
            id: 2,
        };
        assert_eq!(e.to_string(), "resource 2 has active allocations");
    }

    #[test]
    fn invalid_amount_display() {
        let e = DeskError::InvalidAmount { requested: -5.0 };
        assert_eq!(e.to_string(), "Invalid payment amount: -5");
    }

    #[test]
    fn error_equality() {
        assert_eq!(DeskError::InvalidInterval, DeskError::InvalidInterval);
        assert_ne!(
            DeskError::InvalidInterval,
            DeskError::Unavailable {
                key: "individual".to_string()
            }
        );
    }
}
