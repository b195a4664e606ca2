//! Software PWM and animation patterns for the six status LEDs.

use crate::options::Options;
use crate::types::Millis;

pub const NUM_LEDS: usize = 6;

/// Top of the PWM counter range; a duty of `PWM_MAX` is fully lit.
pub const PWM_MAX: u8 = 50;
/// Dim level used for the menu's enabled-option markers.
pub const PWM_DIM: u8 = 5;
/// Span of duty values stamped by thru-traffic animation.
pub const THRU_DUTY_SPAN: u8 = 10;

/// Selectable full-brightness levels, cycled from the last menu slot.
pub const BRIGHTNESS_LEVELS: [u8; 6] = [50, 20, 10, 5, 2, 1];

/// Per-LED duty buffer with a free-running PWM counter and a periodic
/// fade decay for glow/trail effects.
pub struct LedAnimator {
    duty: [u8; NUM_LEDS],
    pwm: u8,
    last_fade: Millis,
    fade_period_ms: u32,
}

impl LedAnimator {
    pub fn new(fade_period_ms: u32) -> Self {
        Self {
            duty: [0; NUM_LEDS],
            pwm: 0,
            last_fade: Millis::ZERO,
            fade_period_ms,
        }
    }

    /// Compare each duty level against the PWM counter and advance the
    /// counter. Returns the on/off mask for this period.
    pub fn pwm_step(&mut self) -> u8 {
        let mut mask = 0;
        for (i, &duty) in self.duty.iter().enumerate() {
            if duty > self.pwm {
                mask |= 1 << i;
            }
        }
        self.pwm = if self.pwm >= PWM_MAX { 0 } else { self.pwm + 1 };
        mask
    }

    /// Decay every lit LED by one duty step per fade period.
    pub fn fade(&mut self, now: Millis) {
        if now.since(self.last_fade) > self.fade_period_ms {
            for duty in self.duty.iter_mut() {
                if *duty > 0 {
                    *duty -= 1;
                }
            }
            self.last_fade = now;
        }
    }

    /// Glow stamp driven by a thru-traffic byte.
    pub fn thru_stamp(&mut self, byte: u8) {
        self.duty[(byte % NUM_LEDS as u8) as usize] = byte % THRU_DUTY_SPAN;
    }

    pub fn duty(&self, led: usize) -> u8 {
        self.duty[led]
    }

    pub fn clear(&mut self) {
        self.duty = [0; NUM_LEDS];
    }

    /// Menu display: flashing cursor at full brightness over dim markers
    /// for enabled options; LED5 previews the brightness setting.
    pub fn menu(&mut self, flash: bool, cursor: u8, options: Options, max_duty: u8) {
        for i in 0..5u8 {
            self.duty[i as usize] = if flash && cursor == i {
                PWM_MAX
            } else if options.bit(i) {
                PWM_DIM
            } else {
                0
            };
        }
        self.duty[5] = max_duty;
    }

    /// Tap entry progress: LED0 solid, one more LED per registered tap.
    pub fn tap_progress(&mut self, count: u8, max_duty: u8) {
        self.duty[0] = PWM_MAX;
        for i in 1..NUM_LEDS {
            self.duty[i] = if count > i as u8 { max_duty } else { 0 };
        }
    }

    /// Running display: a six-step chase across the panel, or a discreet
    /// steady LED0 with a beat blink on LED5.
    pub fn running(&mut self, phase: u8, discreet: bool, max_duty: u8) {
        if discreet {
            self.duty = [max_duty, 0, 0, 0, 0, 0];
            self.duty[5] = if phase == 1 { max_duty } else { 0 };
        } else {
            let which = (phase / 4) as usize;
            for i in 0..NUM_LEDS {
                self.duty[i] = if i == which { max_duty } else { 0 };
            }
        }
    }

    /// Paused display: a flash on the downbeat only.
    pub fn paused(&mut self, phase: u8, discreet: bool, max_duty: u8) {
        let lit = if phase == 0 { max_duty } else { 0 };
        if discreet {
            self.duty = [0, 0, 0, 0, 0, lit];
        } else {
            self.duty = [lit, lit, 0, 0, lit, lit];
        }
    }
}
