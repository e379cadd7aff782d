//! Tricolor relay controller: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  GpioAdapter          LogEventSink   NvsAdapter   Time   │
//! │  (Trigger + Relay)    (EventSink)    (Storage+Config)    │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ─────────────         │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │       LightController (pure logic)             │      │
//! │  │  Debouncer · Pulse sequencer · Snapshot        │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, PinDriver};
use log::{info, warn};

use tricolor::adapters::hardware::GpioAdapter;
use tricolor::adapters::log_sink::LogEventSink;
use tricolor::adapters::nvs::NvsAdapter;
use tricolor::adapters::time::TimeAdapter;
use tricolor::app::ports::ConfigPort;
use tricolor::app::service::LightController;
use tricolor::config::ControllerConfig;
use tricolor::error::Error;
use tricolor::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Tricolor relay v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. GPIO ───────────────────────────────────────────────
    // SAFETY: each GPIO number is claimed exactly once, here, and nothing
    // else in the firmware touches these pins.
    let (on, off, white, mix, relay) = unsafe {
        (
            AnyInputPin::new(pins::ASR_ON_GPIO),
            AnyInputPin::new(pins::ASR_OFF_GPIO),
            AnyInputPin::new(pins::ASR_WHITE_GPIO),
            AnyInputPin::new(pins::ASR_MIX_GPIO),
            AnyOutputPin::new(pins::RELAY_GPIO),
        )
    };
    let mut hw = GpioAdapter::new(
        PinDriver::input(on)?,
        PinDriver::input(off)?,
        PinDriver::input(white)?,
        PinDriver::input(mix)?,
        PinDriver::output(relay)?,
    )?;

    // ── 3. NVS + config ───────────────────────────────────────
    let nvs = NvsAdapter::new().map_err(Error::from)?;
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            ControllerConfig::default()
        }
    };
    info!(
        "Timing: debounce={}ms pulse={}ms loop={}ms",
        config.debounce_interval_ms, config.power_cycle_delay_ms, config.loop_interval_ms
    );

    // ── 4. Restore persisted state before sampling any input ──
    let mut sink = LogEventSink::new();
    let mut app = LightController::new(&config, nvs);
    app.restore(&mut hw, &mut sink);

    let clock = TimeAdapter::new();
    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        app.tick(clock.uptime_ms(), &mut hw, &mut sink);
        // Yield so the idle task can feed the task watchdog.
        FreeRtos::delay_ms(config.loop_interval_ms);
    }
}
