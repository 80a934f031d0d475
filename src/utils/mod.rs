//! Shared helpers that do not belong to a single module.

pub mod clock;
pub mod serde;

pub use clock::{Clock, FixedClock, SystemClock};
