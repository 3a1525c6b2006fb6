//! reserva - Resource Booking & Lending core
//!
//! A time-bounded resource-allocation library: assign a shared, finite
//! resource (a hotel room, a book copy) to a client for a bounded interval,
//! prevent double-booking, and settle accounts (stay cost or overdue fine)
//! when the allocation closes.
//!
//! Two capacity models are supported:
//! - **exclusive** resources hold at most one active allocation per instant
//!   (rooms); availability is answered by an interval [`timeline::Timeline`];
//! - **countable** resources track a copy count (book titles); availability
//!   is simply `available > 0`.
//!
//! The [`desk::Desk`] orchestrates the open/close/pay protocol over a
//! [`catalog::Catalog`] of resources and a [`registry::Registry`] of clients.

pub mod allocation;
pub mod catalog;
pub mod desk;
pub mod interval;
#[cfg(feature = "serde")]
pub mod persist;
pub mod policy;
pub mod registry;
pub mod settlement;
pub mod timeline;

pub use desk::{Desk, DeskError};
pub use interval::Interval;
pub use policy::{OverlapPolicy, Policy};

/// Identifier type for resources and clients, assigned by their stores.
pub type EntityId = u64;

/// Unique code identifying a single allocation.
pub type Code = String;

/// Generates a new unique allocation code (UUID v4).
pub fn generate_code() -> Code {
    uuid::Uuid::new_v4().to_string()
}
