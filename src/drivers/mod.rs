//! Input drivers.

pub mod triggers;
