//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing status lines to the ESP-IDF logger
//! (UART / USB-CDC in production).

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Restored { power, mode } => {
                info!("Restored: Light {}", if *power { "ON" } else { "OFF" });
                info!("Restored Mode: {}", mode.index());
            }
            AppEvent::PoweredOn => {
                info!("Light ON (Yellow)");
            }
            AppEvent::PoweredOff => {
                info!("Light OFF");
            }
            AppEvent::CycleStarted {
                from,
                target,
                pulses,
            } => {
                debug!("CYCLE | {} -> {} in {} pulse(s)", from, target, pulses);
            }
            AppEvent::PulseCompleted { mode, remaining } => {
                debug!("PULSE | now {} | {} left", mode, remaining);
            }
            AppEvent::ModeUpdated(mode) => {
                info!("Mode Updated To: {}", mode.index());
            }
        }
    }
}
