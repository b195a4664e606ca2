//! Button sampling, debounce and auto-repeat.

use crate::types::{button, ButtonEvent, HubConfig, Millis};

/// Tracks raw button state across main-loop iterations and turns edges
/// into debounced events with long-press and auto-repeat tagging.
///
/// The inputs are sampled every iteration; new events are only evaluated
/// once the debounce window from the most recent observed edge has closed.
/// An event always carries the full stable button mask, so chords dispatch
/// as one event no matter which button landed last.
pub struct Debouncer {
    debounce_ms: u32,
    repeat_delay_ms: u32,
    repeat_interval_ms: u32,
    last_mask: u8,
    /// Most recent observed edge; `None` until the first change.
    last_edge: Option<Millis>,
    /// When the current hold began.
    hold_since: Millis,
    /// Set once the long-press event has fired for this hold.
    repeating: bool,
    last_repeat: Millis,
}

impl Debouncer {
    pub fn new(config: &HubConfig) -> Self {
        Self {
            debounce_ms: config.debounce_ms,
            repeat_delay_ms: config.auto_repeat_delay_ms,
            repeat_interval_ms: config.auto_repeat_interval_ms,
            last_mask: 0,
            last_edge: None,
            hold_since: Millis::ZERO,
            repeating: false,
            last_repeat: Millis::ZERO,
        }
    }

    pub fn poll(&mut self, now: Millis, raw_mask: u8) -> Option<ButtonEvent> {
        if let Some(edge) = self.last_edge {
            if now.since(edge) < self.debounce_ms {
                return None;
            }
        }

        let changed = raw_mask ^ self.last_mask;
        self.last_mask = raw_mask;

        if changed != 0 {
            self.last_edge = Some(now);
            // Only a newly pressed button produces an event; a release
            // still restarts the debounce window.
            if changed & raw_mask != 0 {
                self.hold_since = now;
                self.repeating = false;
                return Some(ButtonEvent::new(raw_mask));
            }
            return None;
        }

        if raw_mask != 0 && now.since(self.hold_since) > self.repeat_delay_ms {
            if !self.repeating {
                self.repeating = true;
                self.last_repeat = now;
                return Some(ButtonEvent::new(raw_mask | button::LONG_PRESS));
            }
            if now.since(self.last_repeat) > self.repeat_interval_ms {
                self.last_repeat = now;
                return Some(ButtonEvent::new(raw_mask | button::AUTO_REPEAT));
            }
        }
        None
    }
}
