//! Controller timing parameters
//!
//! Defaults match the relay and voice-module hardware this firmware was
//! built for.  Values can be overridden via NVS (see
//! [`NvsAdapter`](crate::adapters::nvs::NvsAdapter)).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Minimum gap between accepted trigger edges, across all lines (ms)
    pub debounce_interval_ms: u32,
    /// Relay-off time per pulse; one pulse steps the fixture one mode (ms)
    pub power_cycle_delay_ms: u32,
    /// Sleep between control-loop passes (ms)
    pub loop_interval_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce_interval_ms: 50,
            power_cycle_delay_ms: 400,
            loop_interval_ms: 1,
        }
    }
}
