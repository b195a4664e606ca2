//! Mode engine: the body of the main loop.
//!
//! One [`HubEngine::poll`] per iteration runs MIDI thru to exhaustion,
//! consumes the tempo tick (emitting clock bytes and refreshing the beat
//! animation), steps the LED PWM, then routes debounced button events
//! through the mode state machine.

use crate::hal::{ButtonInputs, HubBoard, LedPanel, MidiPort, TempoTimer};
use crate::input::Debouncer;
use crate::leds::{LedAnimator, BRIGHTNESS_LEVELS};
use crate::options::{self, Options, MENU_BRIGHTNESS_SLOT, MENU_SIZE};
use crate::shared::{RxConsumer, SharedState};
use crate::tap::TapSession;
use crate::tempo::TempoGenerator;
use crate::types::{button, chord, midi, ButtonEvent, HubConfig, Millis, OperatingMode, Transport};

/// LEDs 2 and 3, flickered around a blocking thru transmit.
const THRU_FLICKER_MASK: u8 = 0b00_1100;

pub struct HubEngine {
    mode: OperatingMode,
    transport: Transport,
    /// Position within the quarter note, 0..23.
    tick_phase: u8,
    tempo: TempoGenerator,
    tap: TapSession,
    debouncer: Debouncer,
    animator: LedAnimator,
    options: Options,
    menu_cursor: u8,
    menu_loops: u32,
    brightness: u8,
    config: HubConfig,
}

impl HubEngine {
    pub fn new(config: HubConfig) -> Self {
        Self {
            mode: OperatingMode::Step,
            transport: Transport::default(),
            tick_phase: 0,
            tempo: TempoGenerator::new(&config),
            tap: TapSession::new(config.tap_timeout_ms),
            debouncer: Debouncer::new(&config),
            animator: LedAnimator::new(config.fade_period_ms),
            options: Options::DEFAULT,
            menu_cursor: 0,
            menu_loops: 0,
            brightness: 0,
            config,
        }
    }

    /// Load persisted options, apply the default tempo and seed the tempo
    /// timer. The overflow interrupt re-arms the timer from then on.
    pub fn init<B: HubBoard>(&mut self, shared: &SharedState, board: &mut B) {
        self.options = options::load(board.store());
        self.tempo.set(self.config.bpm_default as i32, shared);
        board.tempo_timer().arm(shared.tempo_reload());
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn bpm(&self) -> u16 {
        self.tempo.bpm()
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn tick_phase(&self) -> u8 {
        self.tick_phase
    }

    pub fn menu_cursor(&self) -> u8 {
        self.menu_cursor
    }

    fn max_duty(&self) -> u8 {
        BRIGHTNESS_LEVELS[self.brightness as usize]
    }

    /// One main-loop iteration.
    pub fn poll<B: HubBoard>(
        &mut self,
        shared: &SharedState,
        rx: &mut RxConsumer<'_>,
        board: &mut B,
    ) {
        self.midi_thru(rx, board);

        let now = shared.now();
        match self.mode {
            OperatingMode::Menu => self.run_menu_display(),
            OperatingMode::NoClock => {
                // Duty values are stamped by thru traffic; here they decay.
                self.animator.fade(now);
            }
            OperatingMode::Step | OperatingMode::Tap => {
                if shared.take_tick() {
                    self.on_tempo_tick(now, board);
                }
            }
        }

        let mask = self.animator.pwm_step();
        board.leds().set(mask);

        let raw = board.buttons().read();
        if let Some(event) = self.debouncer.poll(now, raw) {
            self.dispatch(event, now, shared, board);
        }
    }

    /// Drain the receive queue, filtering and forwarding each byte.
    fn midi_thru<B: HubBoard>(&mut self, rx: &mut RxConsumer<'_>, board: &mut B) {
        loop {
            // A hardware receive overrun is recovered by cycling the
            // receiver enable; the errored byte is lost.
            if board.midi().rx_error() {
                board.midi().reset_receiver();
            }

            let Some(byte) = rx.dequeue() else { return };

            let pass = if midi::is_realtime(byte) {
                self.options.contains(Options::PASS_REALTIME)
            } else {
                self.options.contains(Options::PASS_OTHER)
            };
            if !pass {
                continue;
            }

            if self.mode == OperatingMode::NoClock && self.options.contains(Options::THRU_ANIMATE) {
                self.animator.thru_stamp(byte);
                board.midi().send(byte);
            } else {
                // Flicker the middle LEDs for the duration of the
                // blocking transmit.
                board.leds().set(THRU_FLICKER_MASK);
                board.midi().send(byte);
                board.leds().set(0);
            }
        }
    }

    fn run_menu_display(&mut self) {
        self.menu_loops = self.menu_loops.wrapping_add(1);
        let flash = (self.menu_loops & 0xF00) == 0x100;
        self.animator
            .menu(flash, self.menu_cursor, self.options, self.max_duty());
    }

    /// 24-PPQN tick: advance the phase, emit clock bytes, refresh the
    /// beat display.
    fn on_tempo_tick<B: HubBoard>(&mut self, now: Millis, board: &mut B) {
        self.tick_phase += 1;
        if self.tick_phase > 23 {
            if self.transport.pending_restart {
                board.midi().send(midi::START);
                self.transport.pending_restart = false;
            }
            self.tick_phase = 0;
        }
        if self.transport.running {
            board.midi().send(midi::TICK);
        }

        let max_duty = self.max_duty();
        let discreet = self.options.contains(Options::DISCREET);
        if self.tap.active() {
            // Tap entry overrides the transport display until it expires.
            self.animator.tap_progress(self.tap.count(), max_duty);
            self.tap.expire(now);
        } else if self.transport.running {
            self.animator.running(self.tick_phase, discreet, max_duty);
        } else {
            self.animator.paused(self.tick_phase, discreet, max_duty);
        }
    }

    fn dispatch<B: HubBoard>(
        &mut self,
        event: ButtonEvent,
        now: Millis,
        shared: &SharedState,
        board: &mut B,
    ) {
        if !event.is_initial() {
            // Hold events: run-lock latch on Run, tempo nudge on Inc/Dec.
            match event.buttons() {
                button::RUN if event.is_long_press() => self.toggle_run_lock(),
                button::INC => self.nudge_bpm(1, shared),
                button::DEC => self.nudge_bpm(-1, shared),
                _ => {}
            }
            return;
        }

        match event.buttons() {
            chord::MENU => {
                self.menu_cursor = 0;
                self.enter_mode(OperatingMode::Menu);
            }
            chord::TAP => {
                if self.mode.clock_active() {
                    self.enter_mode(OperatingMode::Tap);
                }
            }
            chord::NO_CLOCK => self.enter_mode(OperatingMode::NoClock),
            chord::TEMPO_RESET => {
                if self.mode == OperatingMode::Step {
                    self.tempo.set(self.config.bpm_default as i32, shared);
                }
            }
            button::RUN => self.on_run(board),
            button::DEC => self.on_dec(now, shared, board),
            button::INC => self.on_inc(shared, board),
            _ => {}
        }
    }

    fn on_run<B: HubBoard>(&mut self, board: &mut B) {
        match self.mode {
            OperatingMode::Step | OperatingMode::Tap => {
                if self.transport.run_lock {
                    // Locked: a Run press requests a restart on the next
                    // beat boundary instead of stopping the clock.
                    self.transport.pending_restart = true;
                } else {
                    self.transport.running = !self.transport.running;
                    if self.options.contains(Options::START_STOP) {
                        if self.transport.running {
                            self.tick_phase = 0;
                            board.midi().send(midi::START);
                        } else {
                            board.midi().send(midi::STOP);
                        }
                    }
                }
            }
            OperatingMode::NoClock => {
                board.midi().send(midi::START);
                self.transport.running = true;
            }
            OperatingMode::Menu => {
                self.enter_mode(OperatingMode::Step);
                self.transport.running = false;
            }
        }
    }

    fn toggle_run_lock(&mut self) {
        if self.transport.run_lock {
            self.transport.run_lock = false;
        } else {
            self.transport.run_lock = true;
            self.transport.running = true;
        }
    }

    fn on_dec<B: HubBoard>(&mut self, now: Millis, shared: &SharedState, board: &mut B) {
        match self.mode {
            OperatingMode::Menu => {
                if self.menu_cursor == MENU_BRIGHTNESS_SLOT {
                    self.brightness = (self.brightness + 1) % BRIGHTNESS_LEVELS.len() as u8;
                } else {
                    self.options.toggle_bit(self.menu_cursor);
                }
                options::save(board.store(), self.options);
            }
            OperatingMode::NoClock => self.enter_mode(OperatingMode::Step),
            OperatingMode::Tap => {
                if let Some(bpm) = self.tap.tap(now) {
                    self.tempo.set(bpm as i32, shared);
                }
            }
            OperatingMode::Step => self.nudge_bpm(-1, shared),
        }
    }

    fn on_inc<B: HubBoard>(&mut self, shared: &SharedState, board: &mut B) {
        match self.mode {
            OperatingMode::Menu => {
                self.menu_cursor = (self.menu_cursor + 1) % MENU_SIZE;
            }
            OperatingMode::NoClock => {
                if self.transport.running {
                    board.midi().send(midi::STOP);
                    self.transport.running = false;
                } else {
                    board.midi().send(midi::CONTINUE);
                    self.transport.running = true;
                }
            }
            OperatingMode::Tap => self.enter_mode(OperatingMode::Step),
            OperatingMode::Step => self.nudge_bpm(1, shared),
        }
    }

    /// Shared handler for single, long-press and auto-repeat Inc/Dec.
    fn nudge_bpm(&mut self, delta: i32, shared: &SharedState) {
        if self.mode == OperatingMode::Step {
            self.tempo.nudge(delta, shared);
        }
    }

    fn enter_mode(&mut self, mode: OperatingMode) {
        if self.mode == OperatingMode::Tap && mode != OperatingMode::Tap {
            self.tap.reset();
        }
        #[cfg(feature = "defmt")]
        if self.mode != mode {
            defmt::trace!("mode -> {}", mode);
        }
        self.mode = mode;
    }
}
