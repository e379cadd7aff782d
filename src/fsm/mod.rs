//! Relay pulse sequencer.
//!
//! The fixture advances one mode per power interruption, so a mode
//! change is a train of N pulses, each one `pulse_ms` of relay-off
//! followed by re-energising:
//!
//! ```text
//!  relay  ────┐      ┌───┐      ┌────────
//!             └──────┘   └──────┘
//!             │pulse │   │pulse │
//!  state  Idle│ Cycling{2}│Cycling{1}│ Idle
//! ```
//!
//! The sequencer only tracks timing and the remaining count.  Driving the
//! relay and advancing the mode belong to the
//! [`LightController`](crate::app::service::LightController), which reacts
//! to the [`PulseStep`]s returned by [`PulseSequencer::poll`].

use log::debug;

/// Cycling state.  At most one request is ever in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Cycling {
        /// Pulses left, including the one currently running.
        remaining: u8,
        /// When the relay was last dropped for the running pulse.
        pulse_started_ms: u32,
    },
}

/// Outcome of polling the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseStep {
    /// Nothing in flight.
    Idle,
    /// A pulse is running and has not reached its delay yet.
    Waiting,
    /// The running pulse just finished.  If `remaining > 0` the next pulse
    /// has already been timed from `now`.
    Completed { remaining: u8 },
}

pub struct PulseSequencer {
    pulse_ms: u32,
    state: CycleState,
}

impl PulseSequencer {
    pub fn new(pulse_ms: u32) -> Self {
        Self {
            pulse_ms,
            state: CycleState::Idle,
        }
    }

    /// Start a train of `pulses` pulses timed from `now_ms`.
    ///
    /// Returns `false` (and changes nothing) when `pulses` is zero or a
    /// train is already running.
    pub fn begin(&mut self, pulses: u8, now_ms: u32) -> bool {
        if pulses == 0 || self.is_cycling() {
            return false;
        }
        debug!("Cycle: {} pulse(s) from t={}ms", pulses, now_ms);
        self.state = CycleState::Cycling {
            remaining: pulses,
            pulse_started_ms: now_ms,
        };
        true
    }

    /// Check the running pulse against the clock.
    pub fn poll(&mut self, now_ms: u32) -> PulseStep {
        let CycleState::Cycling {
            remaining,
            pulse_started_ms,
        } = self.state
        else {
            return PulseStep::Idle;
        };

        if now_ms.wrapping_sub(pulse_started_ms) < self.pulse_ms {
            return PulseStep::Waiting;
        }

        let remaining = remaining.saturating_sub(1);
        self.state = if remaining > 0 {
            CycleState::Cycling {
                remaining,
                pulse_started_ms: now_ms,
            }
        } else {
            CycleState::Idle
        };
        PulseStep::Completed { remaining }
    }

    pub fn is_cycling(&self) -> bool {
        matches!(self.state, CycleState::Cycling { .. })
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Pulses left in the running train (0 when idle).
    pub fn remaining_pulses(&self) -> u8 {
        match self.state {
            CycleState::Idle => 0,
            CycleState::Cycling { remaining, .. } => remaining,
        }
    }

    pub fn pulse_ms(&self) -> u32 {
        self.pulse_ms
    }
}
