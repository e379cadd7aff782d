//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LightController (domain)
//! ```
//!
//! Driven adapters (trigger inputs, relay, storage, diagnostic sink)
//! implement these traits.  The [`LightController`](super::service::LightController)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::config::ControllerConfig;
use crate::drivers::triggers::TriggerLevels;

// ───────────────────────────────────────────────────────────────
// Trigger port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the four voice-module trigger lines.
pub trait TriggerPort {
    /// Sample all four lines once.
    fn read_triggers(&mut self) -> TriggerLevels;
}

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the single high-trigger relay feeding the fixture.
pub trait RelayPort {
    /// `true` energises the fixture.
    fn set_relay(&mut self, energized: bool);

    /// Last level commanded through [`set_relay`](Self::set_relay).
    fn relay_energized(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → diagnostics)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`AppEvent`](super::events::AppEvent)s through this
/// port.  Nothing downstream feeds back into the controller.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists controller timing.
pub trait ConfigPort {
    /// Returns [`ControllerConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<ControllerConfig, ConfigError>;

    /// Validate and persist configuration.  Out-of-range values are
    /// rejected, not clamped.
    fn save(&mut self, config: &ControllerConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Durable key-value storage of small typed values.
///
/// Each write stands alone and is committed before returning.  There is
/// no multi-key transaction: two writes can be split by a power loss.
pub trait StoragePort {
    fn get_bool(&self, namespace: &str, key: &str) -> Result<bool, StorageError>;

    fn set_bool(&mut self, namespace: &str, key: &str, value: bool) -> Result<(), StorageError>;

    fn get_i32(&self, namespace: &str, key: &str) -> Result<i32, StorageError>;

    fn set_i32(&mut self, namespace: &str, key: &str, value: i32) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Key exists but holds a value of another type or width.
    TypeMismatch,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::TypeMismatch => write!(f, "stored value has wrong type"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
