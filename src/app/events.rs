//! Outbound diagnostic events.
//!
//! The [`LightController`](super::service::LightController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  They are
//! purely observational.

use crate::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Startup restore finished; the relay now matches `power`.
    Restored { power: bool, mode: Mode },

    /// ON intent applied: fixture energised, mode forced to Yellow.
    PoweredOn,

    /// OFF intent applied.
    PoweredOff,

    /// A mode-select intent started a pulse train.
    CycleStarted { from: Mode, target: Mode, pulses: u8 },

    /// One pulse finished and the fixture stepped to `mode`.
    PulseCompleted { mode: Mode, remaining: u8 },

    /// The last pulse of a train finished.
    ModeUpdated(Mode),
}
