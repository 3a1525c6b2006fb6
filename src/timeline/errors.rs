use std::fmt;

use crate::Code;

#[derive(Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Allocation code is already present in the timeline
    DuplicateCode(Code),
    /// A time value was NaN, which is not allowed
    NaNTime,
    /// New interval conflicts with an existing active allocation
    OverlapsExisting { new_code: Code, existing_code: Code },
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineError::DuplicateCode(code) => {
                write!(f, "Allocation {} already exists in timeline", code)
            }
            TimelineError::NaNTime => {
                write!(f, "Time value cannot be NaN")
            }
            TimelineError::OverlapsExisting {
                new_code,
                existing_code,
            } => {
                write!(
                    f,
                    "Allocation {} overlaps with existing allocation {}",
                    new_code, existing_code
                )
            }
        }
    }
}

impl std::error::Error for TimelineError {}
