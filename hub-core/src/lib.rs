#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Hub Core
//!
//! Core logic for a MIDI hub with beat-clock metronome: MIDI thru routing,
//! 24-PPQN clock generation at a settable tempo, transport control and a
//! three-button / six-LED user interface with tap tempo and an options menu.
//!
//! Everything here runs in a single-threaded main loop; the only state
//! shared with interrupt context lives in [`shared`] and is word-atomic.

pub mod engine;
pub mod hal;
pub mod input;
pub mod leds;
pub mod options;
pub mod shared;
pub mod tap;
pub mod tempo;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use engine::HubEngine;
pub use hal::{ButtonInputs, ByteStore, HubBoard, LedPanel, MidiPort, TempoTimer};
pub use input::Debouncer;
pub use options::{Options, MENU_SIZE};
pub use shared::{RxConsumer, RxProducer, RxQueue, SharedState, SystemClock, TickFlag, RX_CAPACITY};
pub use tempo::TempoGenerator;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Stock configuration for the hub hardware.
pub fn default_config() -> HubConfig {
    HubConfig::default()
}
