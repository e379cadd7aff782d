//! Inbound intents to the light controller.
//!
//! The trigger debouncer turns accepted rising edges into these; the
//! [`LightController`](super::service::LightController) interprets them.

use crate::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Energise the fixture in Yellow.
    PowerOn,

    /// De-energise the fixture.  The mode is remembered.
    PowerOff,

    /// Pulse the relay until the fixture reaches the given mode.
    Select(Mode),
}
