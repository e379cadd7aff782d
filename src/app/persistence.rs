//! Persistence gateway: mirrors the live (power, mode) pair into NVS.
//!
//! The fixture has no mode feedback line, so the only record of where it
//! sits in its colour ring is this snapshot.  Writes are fire-and-forget:
//! each field goes out on its own the moment it changes, a failure is
//! logged and otherwise ignored, and nothing is retried.  A power loss
//! between two writes can leave the snapshot out of step with the fixture.

use log::{info, warn};

use crate::mode::Mode;

use super::ports::{StorageError, StoragePort};

/// NVS namespace holding the snapshot.
pub const STORE_NAMESPACE: &str = "light";
pub const KEY_POWER: &str = "power";
pub const KEY_MODE: &str = "mode";

/// Durable copy of the live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub power: bool,
    pub mode: Mode,
}

/// Owns the storage backend on behalf of the controller.
pub struct SnapshotGateway<S: StoragePort> {
    store: S,
}

impl<S: StoragePort> SnapshotGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the snapshot once at startup.
    ///
    /// Missing or undecodable keys fall back to `power = false`,
    /// `mode = Yellow`; that is the normal first-boot state.
    pub fn load(&self) -> Snapshot {
        let power = match self.store.get_bool(STORE_NAMESPACE, KEY_POWER) {
            Ok(power) => power,
            Err(StorageError::NotFound) => false,
            Err(e) => {
                warn!("Snapshot: power unreadable ({}), assuming off", e);
                false
            }
        };

        let mode = match self.store.get_i32(STORE_NAMESPACE, KEY_MODE) {
            Ok(raw) => Mode::from_index(raw).unwrap_or_else(|| {
                warn!("Snapshot: stored mode {} out of range, assuming Yellow", raw);
                Mode::Yellow
            }),
            Err(StorageError::NotFound) => Mode::Yellow,
            Err(e) => {
                warn!("Snapshot: mode unreadable ({}), assuming Yellow", e);
                Mode::Yellow
            }
        };

        info!("Snapshot loaded: power={} mode={}", power, mode);
        Snapshot { power, mode }
    }

    pub fn save_power(&mut self, power: bool) {
        if let Err(e) = self.store.set_bool(STORE_NAMESPACE, KEY_POWER, power) {
            warn!("Snapshot: power write failed ({}), live state diverges", e);
        }
    }

    pub fn save_mode(&mut self, mode: Mode) {
        if let Err(e) = self
            .store
            .set_i32(STORE_NAMESPACE, KEY_MODE, i32::from(mode.index()))
        {
            warn!("Snapshot: mode write failed ({}), live state diverges", e);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
