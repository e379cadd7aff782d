//! GPIO assignments for the controller board.
//!
//! Single source of truth: the entry point builds every pin driver from
//! these numbers.

// ---------------------------------------------------------------------------
// ASR voice module outputs (active HIGH, module drives the line)
// ---------------------------------------------------------------------------

/// "Light on" command.
pub const ASR_ON_GPIO: i32 = 4;
/// "Light off" command.
pub const ASR_OFF_GPIO: i32 = 5;
/// "White" command.
pub const ASR_WHITE_GPIO: i32 = 6;
/// "Mix" command.
pub const ASR_MIX_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Relay
// ---------------------------------------------------------------------------

/// High-trigger relay feeding the fixture.  HIGH = energised.
pub const RELAY_GPIO: i32 = 18;
