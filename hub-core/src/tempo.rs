//! Tempo generator: maps BPM onto the hardware timer reload value.
//!
//! The tempo timer counts at 500 kHz after prescaling and overflows once
//! per MIDI clock tick, 24 ticks per quarter note:
//!
//! ```text
//! counts per tick = counts_per_second / (24 * bpm / 60)
//!                 = (60 * counts_per_second / 24) / bpm
//! reload          = timer_max - counts per tick
//! ```
//!
//! The overflow interrupt rewrites the reload register before doing
//! anything else, so long-run drift stays bounded by rounding error
//! instead of accumulating interrupt latency.

use crate::shared::SharedState;
use crate::types::HubConfig;

/// Timer counting frequency after prescaling.
pub const TIMER_COUNTS_PER_SECOND: u32 = 500_000;
pub const TIMER_MAX: u16 = 0xFFFF;

/// Timer counts between overflows for a given tempo.
pub const fn counts_per_tick(bpm: u16) -> u32 {
    (60 * TIMER_COUNTS_PER_SECOND / 24) / bpm as u32
}

/// Reload value programmed into the counter after each overflow.
pub const fn reload_for(bpm: u16) -> u16 {
    TIMER_MAX - counts_per_tick(bpm) as u16
}

/// Owns the current tempo and publishes the reload value for the overflow
/// interrupt to pick up.
pub struct TempoGenerator {
    bpm: u16,
    min: u16,
    max: u16,
}

impl TempoGenerator {
    pub fn new(config: &HubConfig) -> Self {
        Self {
            bpm: config.bpm_default,
            min: config.bpm_min,
            max: config.bpm_max,
        }
    }

    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    /// Clamp and apply a new tempo. The interrupt handler picks the new
    /// reload value up at its next overflow; out-of-range requests are not
    /// errors.
    pub fn set(&mut self, bpm: i32, shared: &SharedState) {
        self.bpm = bpm.clamp(self.min as i32, self.max as i32) as u16;
        shared.set_tempo_reload(reload_for(self.bpm));
    }

    pub fn nudge(&mut self, delta: i32, shared: &SharedState) {
        self.set(self.bpm as i32 + delta, shared);
    }
}
