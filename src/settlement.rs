//! Settlement math: stay cost at open, overdue fine at close.

use qtty::{Day, Quantity};

use crate::interval::Interval;

/// Whole days in a span, truncating toward zero; negative spans count as 0.
///
/// Matches the source systems, which billed on `timedelta.days`: a stay of
/// 3.9 days bills 3, a return 2.9 days late fines 2.
pub fn whole_days(span: Quantity<Day>) -> u64 {
    let days = span.value();
    if days.is_nan() || days <= 0.0 {
        0
    } else {
        days.trunc() as u64
    }
}

/// Booking cost: `whole_days(end - start) × nightly rate`, computed eagerly
/// when the allocation opens and stored immutably on it.
pub fn stay_cost(interval: &Interval<Day>, nightly_rate: f64) -> f64 {
    whole_days(interval.duration()) as f64 * nightly_rate
}

/// Overdue fine: `whole_days(max(0, returned_at - due)) × per_day`.
///
/// Exactly 0 for an on-time return (`returned_at <= due`).
pub fn overdue_fine(due: Quantity<Day>, returned_at: Quantity<Day>, per_day: f64) -> f64 {
    whole_days(returned_at - due) as f64 * per_day
}
