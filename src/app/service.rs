//! Light controller: the hexagonal core.
//!
//! [`LightController`] owns the live (power, mode) pair, the trigger
//! debouncer, the pulse sequencer and the persistence gateway.  All I/O
//! flows through port traits passed in at call sites, so the whole
//! controller runs against mock adapters on the host.
//!
//! ```text
//!  TriggerPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                  │     LightController       │
//!    RelayPort ◀── │ Debouncer · Sequencer     │
//!                  └────────────┬─────────────┘
//!                               ▼
//!                        SnapshotGateway ──▶ StoragePort
//! ```
//!
//! ## Tick priority
//!
//! While a pulse train is running the tick only services the pulse timer.
//! Trigger lines are not sampled at all until the train is finished.

use log::{debug, info};

use crate::config::ControllerConfig;
use crate::drivers::triggers::TriggerDebouncer;
use crate::fsm::{CycleState, PulseSequencer, PulseStep};
use crate::mode::Mode;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::persistence::{Snapshot, SnapshotGateway};
use super::ports::{EventSink, RelayPort, StoragePort, TriggerPort};

// ───────────────────────────────────────────────────────────────
// LightController
// ───────────────────────────────────────────────────────────────

pub struct LightController<S: StoragePort> {
    /// `true` = fixture energised.
    power: bool,
    /// Position in the fixture's colour ring.  Kept while the light is off.
    mode: Mode,
    sequencer: PulseSequencer,
    debouncer: TriggerDebouncer,
    snapshot: SnapshotGateway<S>,
    tick_count: u64,
}

impl<S: StoragePort> LightController<S> {
    /// Build the controller around a storage backend.
    ///
    /// Starts powered off in Yellow. Call [`restore`](Self::restore)
    /// before the first [`tick`](Self::tick).
    pub fn new(config: &ControllerConfig, store: S) -> Self {
        Self {
            power: false,
            mode: Mode::Yellow,
            sequencer: PulseSequencer::new(config.power_cycle_delay_ms),
            debouncer: TriggerDebouncer::new(config.debounce_interval_ms),
            snapshot: SnapshotGateway::new(store),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Seed the live state from NVS and drive the relay to match.
    pub fn restore(&mut self, hw: &mut impl RelayPort, sink: &mut impl EventSink) -> Snapshot {
        let snap = self.snapshot.load();
        self.power = snap.power;
        self.mode = snap.mode;

        hw.set_relay(self.power);
        sink.emit(&AppEvent::Restored {
            power: self.power,
            mode: self.mode,
        });
        snap
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one pass of the control loop.
    ///
    /// The `hw` parameter satisfies **both** [`TriggerPort`] and
    /// [`RelayPort`], which avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl TriggerPort + RelayPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        if self.sequencer.is_cycling() {
            self.advance_cycle(now_ms, hw, sink);
            return;
        }

        let levels = hw.read_triggers();
        if let Some(cmd) = self.debouncer.poll(now_ms, levels, self.power) {
            self.handle_command(cmd, now_ms, hw, sink);
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an intent.  Ignored while a pulse train is running.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        if self.sequencer.is_cycling() {
            debug!("{:?} ignored: cycling", cmd);
            return;
        }

        match cmd {
            AppCommand::PowerOn => {
                self.power = true;
                self.mode = Mode::Yellow;
                hw.set_relay(true);
                self.snapshot.save_power(true);
                self.snapshot.save_mode(self.mode);
                sink.emit(&AppEvent::PoweredOn);
            }
            AppCommand::PowerOff => {
                self.power = false;
                hw.set_relay(false);
                self.snapshot.save_power(false);
                sink.emit(&AppEvent::PoweredOff);
            }
            AppCommand::Select(target) => self.request_mode(target, now_ms, hw, sink),
        }
    }

    fn request_mode(
        &mut self,
        target: Mode,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        if !self.power {
            debug!("Select({}) ignored: light is off", target);
            return;
        }

        let pulses = self.mode.forward_distance(target);
        if pulses == 0 {
            debug!("Already in {}", target);
            return;
        }

        if self.sequencer.begin(pulses, now_ms) {
            hw.set_relay(false);
            sink.emit(&AppEvent::CycleStarted {
                from: self.mode,
                target,
                pulses,
            });
        }
    }

    /// Service the pulse timer.  Each finished pulse re-energises the
    /// relay and steps the mode by one; if more pulses remain the relay
    /// drops again straight away.
    fn advance_cycle(
        &mut self,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        let PulseStep::Completed { remaining } = self.sequencer.poll(now_ms) else {
            return;
        };

        hw.set_relay(true);
        self.mode = self.mode.next();
        self.snapshot.save_mode(self.mode);
        sink.emit(&AppEvent::PulseCompleted {
            mode: self.mode,
            remaining,
        });

        if remaining > 0 {
            hw.set_relay(false);
        } else {
            info!("Cycle complete in {}", self.mode);
            sink.emit(&AppEvent::ModeUpdated(self.mode));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn power(&self) -> bool {
        self.power
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_cycling(&self) -> bool {
        self.sequencer.is_cycling()
    }

    pub fn cycle_state(&self) -> CycleState {
        self.sequencer.state()
    }

    pub fn remaining_pulses(&self) -> u8 {
        self.sequencer.remaining_pulses()
    }

    /// Control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn store(&self) -> &S {
        self.snapshot.store()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.snapshot.store_mut()
    }
}
