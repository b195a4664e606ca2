//! Core data types for the MIDI hub

/// Pulses per quarter note of the MIDI beat clock.
pub const PPQN: u8 = 24;

/// Firmware revision reported on the LEDs at power-on.
pub const FIRMWARE_VERSION: u8 = 6;

/// Wrapping millisecond timestamp read from the system clock.
///
/// The counter wraps at its width; durations must always be taken with
/// [`Millis::since`], never by comparing absolute values.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Milliseconds elapsed since `earlier`, tolerant of counter wraparound.
    pub const fn since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    pub const fn wrapping_add(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_add(ms))
    }
}

/// Button mask bits and event modifier tags.
pub mod button {
    pub const RUN: u8 = 0x01;
    pub const INC: u8 = 0x02;
    pub const DEC: u8 = 0x04;

    /// Set on the first event of a hold that outlasts the auto-repeat delay.
    pub const LONG_PRESS: u8 = 0x40;
    /// Set on subsequent events of a continuing hold.
    pub const AUTO_REPEAT: u8 = 0x80;

    /// All physical buttons.
    pub const MASK: u8 = RUN | INC | DEC;
}

/// Multi-button combinations that switch operating mode.
pub mod chord {
    use super::button;

    pub const MENU: u8 = button::RUN | button::INC | button::DEC;
    pub const TAP: u8 = button::RUN | button::DEC;
    pub const NO_CLOCK: u8 = button::RUN | button::INC;
    pub const TEMPO_RESET: u8 = button::INC | button::DEC;
}

/// A debounced button event: the full stable button mask plus at most one
/// hold-modifier tag describing how the event was produced.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent(u8);

impl ButtonEvent {
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Physical buttons held when the event fired.
    pub const fn buttons(self) -> u8 {
        self.0 & button::MASK
    }

    pub const fn is_long_press(self) -> bool {
        self.0 & button::LONG_PRESS != 0
    }

    pub const fn is_auto_repeat(self) -> bool {
        self.0 & button::AUTO_REPEAT != 0
    }

    /// Plain press with no hold modifier.
    pub const fn is_initial(self) -> bool {
        self.0 & (button::LONG_PRESS | button::AUTO_REPEAT) == 0
    }
}

/// MIDI beat clock messages and realtime classification.
pub mod midi {
    pub const TICK: u8 = 0xF8;
    pub const START: u8 = 0xFA;
    pub const CONTINUE: u8 = 0xFB;
    pub const STOP: u8 = 0xFC;

    /// Single-byte realtime status: top five bits set.
    pub const fn is_realtime(byte: u8) -> bool {
        (byte & 0xF8) == 0xF8
    }
}

/// Operating modes of the user interface.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Beat clock on, Inc/Dec step the tempo.
    Step,
    /// Beat clock on, tempo entered by tapping Dec.
    Tap,
    /// Beat clock off, thru routing only.
    NoClock,
    /// Beat clock off, options menu.
    Menu,
}

impl OperatingMode {
    /// Modes in which the tempo tick drives clock output and animation.
    pub const fn clock_active(&self) -> bool {
        matches!(self, OperatingMode::Step | OperatingMode::Tap)
    }
}

/// Transport state gating beat-clock output.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transport {
    /// Clock tick bytes are emitted while set.
    pub running: bool,
    /// Latched by a long Run press; forces `running` and turns single Run
    /// presses into restart requests.
    pub run_lock: bool,
    /// A START deferred to the next beat boundary.
    pub pending_restart: bool,
}

/// Timing and tempo parameters of the hub.
#[derive(Copy, Clone, Debug)]
pub struct HubConfig {
    /// Quiet window after a button edge before new events are evaluated.
    pub debounce_ms: u32,
    /// Hold time before the first long-press/auto-repeat event.
    pub auto_repeat_delay_ms: u32,
    /// Spacing of subsequent auto-repeat events.
    pub auto_repeat_interval_ms: u32,
    /// LED glow decay step period.
    pub fade_period_ms: u32,
    /// Silence that discards an in-progress tap entry.
    pub tap_timeout_ms: u32,
    pub bpm_min: u16,
    pub bpm_max: u16,
    pub bpm_default: u16,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            auto_repeat_delay_ms: 500,
            auto_repeat_interval_ms: 80,
            fade_period_ms: 30,
            tap_timeout_ms: 1000,
            bpm_min: 30,
            bpm_max: 300,
            bpm_default: 120,
        }
    }
}

impl HubConfig {
    /// Create a new configuration with validation
    pub fn new(
        debounce_ms: u32,
        auto_repeat_delay_ms: u32,
        auto_repeat_interval_ms: u32,
        bpm_min: u16,
        bpm_max: u16,
        bpm_default: u16,
    ) -> Result<Self, &'static str> {
        if debounce_ms == 0 || debounce_ms > 500 {
            return Err("Debounce must be between 1 and 500ms");
        }
        if auto_repeat_delay_ms < debounce_ms || auto_repeat_delay_ms > 2000 {
            return Err("Auto-repeat delay must be between debounce and 2000ms");
        }
        if auto_repeat_interval_ms == 0 || auto_repeat_interval_ms > 500 {
            return Err("Auto-repeat interval must be between 1 and 500ms");
        }
        if bpm_min == 0 || bpm_min >= bpm_max {
            return Err("BPM range must be nonempty");
        }
        if bpm_default < bpm_min || bpm_default > bpm_max {
            return Err("Default BPM must be inside the range");
        }

        Ok(Self {
            debounce_ms,
            auto_repeat_delay_ms,
            auto_repeat_interval_ms,
            bpm_min,
            bpm_max,
            bpm_default,
            ..Self::default()
        })
    }
}

/// LED mask showing the firmware revision in binary, LED0 = most
/// significant of six bits.
pub const fn version_led_mask() -> u8 {
    let mut mask = 0;
    let mut i = 0;
    while i < 6 {
        if FIRMWARE_VERSION & (0x20 >> i) != 0 {
            mask |= 1 << i;
        }
        i += 1;
    }
    mask
}
