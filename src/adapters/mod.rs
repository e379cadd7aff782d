//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                     |
//! |------------|--------------|---------------------------------|
//! | `hardware` | TriggerPort  | ASR trigger GPIOs (embedded-hal)|
//! |            | RelayPort    | Relay GPIO (embedded-hal)       |
//! | `log_sink` | EventSink    | Serial log output               |
//! | `nvs`      | StoragePort  | NVS / in-memory store           |
//! |            | ConfigPort   |                                 |
//! | `time`     | (clock)      | ESP32 system timer              |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
