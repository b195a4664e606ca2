//! Hardware capability interfaces consumed by the hub core.
//!
//! The core never references register layout; boards expose exactly these
//! narrow operations. All methods are infallible: every hardware anomaly in
//! this device has a silent-recovery policy (there is no display or log
//! channel on the wire), so errors stop at the adapter layer.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::types::button;

/// Duplex MIDI serial link at 31250 baud, 8-N-1.
pub trait MidiPort {
    /// Send one byte, blocking until the transmit hardware is ready.
    fn send(&mut self, byte: u8);

    /// Hardware receive overrun/framing error flag.
    fn rx_error(&mut self) -> bool {
        false
    }

    /// Recover from a receive error by cycling the receiver enable. The
    /// errored byte is discarded, not recovered.
    fn reset_receiver(&mut self) {}
}

/// Three momentary buttons reported as a [`button`] mask.
pub trait ButtonInputs {
    fn read(&mut self) -> u8;
}

/// Six status LEDs driven as a mask, bit N = LED N.
pub trait LedPanel {
    fn set(&mut self, mask: u8);
}

/// Hardware tempo timer. The overflow interrupt rewrites the reload value
/// on every overflow; `arm` seeds it once at startup.
pub trait TempoTimer {
    fn arm(&mut self, reload: u16);
}

/// Opaque non-volatile byte store holding the options record.
pub trait ByteStore {
    fn read(&mut self, addr: u8) -> u8;
    fn write(&mut self, addr: u8, value: u8);
}

/// Complete board interface: one bundle of the five capabilities.
pub trait HubBoard {
    type Midi: MidiPort;
    type Buttons: ButtonInputs;
    type Leds: LedPanel;
    type Timer: TempoTimer;
    type Store: ByteStore;

    fn midi(&mut self) -> &mut Self::Midi;
    fn buttons(&mut self) -> &mut Self::Buttons;
    fn leds(&mut self) -> &mut Self::Leds;
    fn tempo_timer(&mut self) -> &mut Self::Timer;
    fn store(&mut self) -> &mut Self::Store;
}

/// Active-low button bank over embedded-hal input pins.
pub struct PinButtons<R, I, D> {
    run: R,
    inc: I,
    dec: D,
}

impl<R, I, D> PinButtons<R, I, D>
where
    R: InputPin,
    I: InputPin,
    D: InputPin,
{
    pub fn new(run: R, inc: I, dec: D) -> Self {
        Self { run, inc, dec }
    }
}

impl<R, I, D> ButtonInputs for PinButtons<R, I, D>
where
    R: InputPin,
    I: InputPin,
    D: InputPin,
{
    fn read(&mut self) -> u8 {
        // Pins are pulled up and grounded when pressed. A pin read error
        // reports the button released.
        let mut mask = 0;
        if self.run.is_low().unwrap_or(false) {
            mask |= button::RUN;
        }
        if self.inc.is_low().unwrap_or(false) {
            mask |= button::INC;
        }
        if self.dec.is_low().unwrap_or(false) {
            mask |= button::DEC;
        }
        mask
    }
}

/// LED bank over six embedded-hal output pins.
pub struct PinLedPanel<P> {
    pins: [P; 6],
}

impl<P: OutputPin> PinLedPanel<P> {
    pub fn new(pins: [P; 6]) -> Self {
        Self { pins }
    }
}

impl<P: OutputPin> LedPanel for PinLedPanel<P> {
    fn set(&mut self, mask: u8) {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if mask & (1 << i) != 0 {
                pin.set_high().ok();
            } else {
                pin.set_low().ok();
            }
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use heapless::Vec;

    /// Records transmitted bytes; receive errors are injectable.
    #[derive(Default)]
    pub struct MockMidiPort {
        pub sent: Vec<u8, 512>,
        rx_error: bool,
        pub receiver_resets: usize,
    }

    impl MockMidiPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn inject_rx_error(&mut self) {
            self.rx_error = true;
        }

        pub fn take_sent(&mut self) -> Vec<u8, 512> {
            core::mem::take(&mut self.sent)
        }
    }

    impl MidiPort for MockMidiPort {
        fn send(&mut self, byte: u8) {
            self.sent.push(byte).ok();
        }

        fn rx_error(&mut self) -> bool {
            self.rx_error
        }

        fn reset_receiver(&mut self) {
            self.rx_error = false;
            self.receiver_resets += 1;
        }
    }

    #[derive(Default)]
    pub struct MockButtons {
        mask: u8,
    }

    impl MockButtons {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn press(&mut self, buttons: u8) {
            self.mask |= buttons;
        }

        pub fn release(&mut self, buttons: u8) {
            self.mask &= !buttons;
        }

        pub fn release_all(&mut self) {
            self.mask = 0;
        }
    }

    impl ButtonInputs for MockButtons {
        fn read(&mut self) -> u8 {
            self.mask
        }
    }

    /// Keeps the latest mask and a bounded history of writes.
    #[derive(Default)]
    pub struct MockLedPanel {
        pub last: u8,
        pub history: Vec<u8, 128>,
    }

    impl MockLedPanel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn clear_history(&mut self) {
            self.history.clear();
        }
    }

    impl LedPanel for MockLedPanel {
        fn set(&mut self, mask: u8) {
            self.last = mask;
            self.history.push(mask).ok();
        }
    }

    #[derive(Default)]
    pub struct MockTempoTimer {
        pub last_reload: Option<u16>,
    }

    impl TempoTimer for MockTempoTimer {
        fn arm(&mut self, reload: u16) {
            self.last_reload = Some(reload);
        }
    }

    /// Byte store starting out in the erased-flash state.
    pub struct MockByteStore {
        pub cells: [u8; 64],
    }

    impl Default for MockByteStore {
        fn default() -> Self {
            Self { cells: [0xFF; 64] }
        }
    }

    impl MockByteStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl ByteStore for MockByteStore {
        fn read(&mut self, addr: u8) -> u8 {
            self.cells[addr as usize]
        }

        fn write(&mut self, addr: u8, value: u8) {
            self.cells[addr as usize] = value;
        }
    }

    /// Mock board bundling all capabilities.
    #[derive(Default)]
    pub struct MockBoard {
        pub midi: MockMidiPort,
        pub buttons: MockButtons,
        pub leds: MockLedPanel,
        pub timer: MockTempoTimer,
        pub store: MockByteStore,
    }

    impl MockBoard {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl HubBoard for MockBoard {
        type Midi = MockMidiPort;
        type Buttons = MockButtons;
        type Leds = MockLedPanel;
        type Timer = MockTempoTimer;
        type Store = MockByteStore;

        fn midi(&mut self) -> &mut Self::Midi {
            &mut self.midi
        }

        fn buttons(&mut self) -> &mut Self::Buttons {
            &mut self.buttons
        }

        fn leds(&mut self) -> &mut Self::Leds {
            &mut self.leds
        }

        fn tempo_timer(&mut self) -> &mut Self::Timer {
            &mut self.timer
        }

        fn store(&mut self) -> &mut Self::Store {
            &mut self.store
        }
    }
}
