//! Application core: pure domain logic, zero I/O.
//!
//! The mode/power state machine, its persistence gateway, and the intent
//! and event vocabularies.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod persistence;
pub mod ports;
pub mod service;
