//! Edge-detecting debouncer for the four voice-module trigger lines.
//!
//! ## Hardware
//!
//! The ASR voice module drives four active-high lines, one per command.
//! A command is a short HIGH pulse.  The controller samples all four
//! lines once per control tick and classifies rising edges here.
//!
//! ## Debounce policy
//!
//! | Line  | Intent            | Evaluated when      |
//! |-------|-------------------|---------------------|
//! | ON    | `PowerOn`         | always              |
//! | OFF   | `PowerOff`        | always              |
//! | WHITE | `Select(White)`   | light is on         |
//! | MIX   | `Select(Mix)`     | light is on         |
//!
//! A single acceptance timestamp is shared by all four lines: an edge on
//! any line is accepted only if more than the debounce interval has passed
//! since the last accepted edge on *any* line.  Lines are evaluated in the
//! order above, so at most one intent comes out of a tick.

use log::debug;

use crate::app::commands::AppCommand;
use crate::mode::Mode;

/// One of the four trigger inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerLine {
    On,
    Off,
    White,
    Mix,
}

impl TriggerLine {
    /// Evaluation order within a tick.
    pub const PRIORITY: [TriggerLine; 4] = [Self::On, Self::Off, Self::White, Self::Mix];

    /// The intent a debounced rising edge on this line stands for.
    pub const fn command(self) -> AppCommand {
        match self {
            Self::On => AppCommand::PowerOn,
            Self::Off => AppCommand::PowerOff,
            Self::White => AppCommand::Select(Mode::White),
            Self::Mix => AppCommand::Select(Mode::Mix),
        }
    }

    /// WHITE and MIX only mean something while the fixture is lit.
    pub const fn needs_power(self) -> bool {
        matches!(self, Self::White | Self::Mix)
    }
}

/// Levels of all four lines sampled in one tick (`true` = HIGH).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerLevels {
    pub on: bool,
    pub off: bool,
    pub white: bool,
    pub mix: bool,
}

impl TriggerLevels {
    /// All lines LOW.
    pub const IDLE: Self = Self {
        on: false,
        off: false,
        white: false,
        mix: false,
    };

    /// Levels with only `line` driven HIGH.
    pub const fn only(line: TriggerLine) -> Self {
        let mut levels = Self::IDLE;
        match line {
            TriggerLine::On => levels.on = true,
            TriggerLine::Off => levels.off = true,
            TriggerLine::White => levels.white = true,
            TriggerLine::Mix => levels.mix = true,
        }
        levels
    }

    pub const fn get(&self, line: TriggerLine) -> bool {
        match line {
            TriggerLine::On => self.on,
            TriggerLine::Off => self.off,
            TriggerLine::White => self.white,
            TriggerLine::Mix => self.mix,
        }
    }
}

pub struct TriggerDebouncer {
    debounce_ms: u32,
    previous: TriggerLevels,
    /// Shared by all lines.  Starts at 0, so nothing is accepted until the
    /// clock has passed the debounce interval after boot.
    last_trigger_ms: u32,
}

impl TriggerDebouncer {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            previous: TriggerLevels::IDLE,
            last_trigger_ms: 0,
        }
    }

    /// Classify one sample of the trigger lines.
    ///
    /// `powered` masks WHITE/MIX while the light is off; a masked edge does
    /// not touch the shared timestamp.  The previous-level memory is updated
    /// to `levels` whether or not an intent is returned, so a line has to go
    /// LOW again before it can re-trigger.
    pub fn poll(&mut self, now_ms: u32, levels: TriggerLevels, powered: bool) -> Option<AppCommand> {
        let mut accepted = None;

        for line in TriggerLine::PRIORITY {
            if line.needs_power() && !powered {
                continue;
            }
            let rising = levels.get(line) && !self.previous.get(line);
            if rising && self.guard_elapsed(now_ms) {
                debug!("{:?} edge accepted at t={}ms", line, now_ms);
                self.last_trigger_ms = now_ms;
                if accepted.is_none() {
                    accepted = Some(line.command());
                }
            }
        }

        self.previous = levels;
        accepted
    }

    /// Strictly more than the debounce interval since the last accepted edge.
    pub fn guard_elapsed(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_trigger_ms) > self.debounce_ms
    }

    pub fn last_trigger_ms(&self) -> u32 {
        self.last_trigger_ms
    }

    pub fn previous_levels(&self) -> TriggerLevels {
        self.previous
    }
}
