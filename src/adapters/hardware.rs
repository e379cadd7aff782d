//! Hardware adapter: bridges GPIO pins to the domain port traits.
//!
//! Owns the four trigger inputs and the relay output, exposing them
//! through [`TriggerPort`] and [`RelayPort`].  Pins are anything that
//! implements the `embedded-hal` 1.0 digital traits: `esp-idf-hal`
//! `PinDriver`s on target, plain mocks on the host.

use embedded_hal::digital::{Error as _, InputPin, OutputPin};
use log::warn;

use crate::app::ports::{RelayPort, TriggerPort};
use crate::drivers::triggers::{TriggerLevels, TriggerLine};
use crate::error::{Error, GpioError};

/// Concrete adapter that combines all controller I/O behind port traits.
pub struct GpioAdapter<On, Off, White, Mix, Relay> {
    on: On,
    off: Off,
    white: White,
    mix: Mix,
    relay: Relay,
    relay_level: bool,
}

impl<On, Off, White, Mix, Relay> GpioAdapter<On, Off, White, Mix, Relay>
where
    On: InputPin,
    Off: InputPin,
    White: InputPin,
    Mix: InputPin,
    Relay: OutputPin,
{
    /// Take ownership of the pins and drive the relay LOW so the fixture
    /// stays dark until the snapshot has been restored.
    pub fn new(on: On, off: Off, white: White, mix: Mix, mut relay: Relay) -> Result<Self, Error> {
        relay
            .set_low()
            .map_err(|_| Error::from(GpioError::RelayWriteFailed))?;
        Ok(Self {
            on,
            off,
            white,
            mix,
            relay,
            relay_level: false,
        })
    }

    fn sample(pin: &mut impl InputPin, line: TriggerLine) -> bool {
        match pin.is_high() {
            Ok(level) => level,
            Err(e) => {
                warn!("{:?} line: {} ({:?})", line, GpioError::TriggerReadFailed, e.kind());
                false
            }
        }
    }
}

// ── TriggerPort implementation ────────────────────────────────

impl<On, Off, White, Mix, Relay> TriggerPort for GpioAdapter<On, Off, White, Mix, Relay>
where
    On: InputPin,
    Off: InputPin,
    White: InputPin,
    Mix: InputPin,
    Relay: OutputPin,
{
    fn read_triggers(&mut self) -> TriggerLevels {
        TriggerLevels {
            on: Self::sample(&mut self.on, TriggerLine::On),
            off: Self::sample(&mut self.off, TriggerLine::Off),
            white: Self::sample(&mut self.white, TriggerLine::White),
            mix: Self::sample(&mut self.mix, TriggerLine::Mix),
        }
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<On, Off, White, Mix, Relay> RelayPort for GpioAdapter<On, Off, White, Mix, Relay>
where
    On: InputPin,
    Off: InputPin,
    White: InputPin,
    Mix: InputPin,
    Relay: OutputPin,
{
    fn set_relay(&mut self, energized: bool) {
        let result = if energized {
            self.relay.set_high()
        } else {
            self.relay.set_low()
        };
        if let Err(e) = result {
            warn!("{} ({:?})", GpioError::RelayWriteFailed, e.kind());
        }
        self.relay_level = energized;
    }

    fn relay_energized(&self) -> bool {
        self.relay_level
    }
}
