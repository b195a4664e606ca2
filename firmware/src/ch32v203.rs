//! CH32V203 board support.
//!
//! USART1 carries MIDI at 31250 baud 8-N-1, TIM2 provides the tempo tick
//! at 500 kHz counting rate, SysTick the millisecond counter. Register
//! access goes through the PAC shim points marked below; the state visible
//! to interrupt handlers is real and word-atomic.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};

use critical_section::Mutex;
use hub_core::{
    ButtonInputs, ByteStore, HubBoard, LedPanel, MidiPort, RxProducer, SharedState, TempoTimer,
};

/// USART1 MIDI port.
///
/// Transmit is polled: write the data register, then spin on TXE. MIDI
/// bytes are 320 us on the wire, so the busy-wait is bounded and the main
/// loop tolerates it by design.
pub struct UsartMidiPort {
    tx_ready: AtomicBool,
    rx_error: AtomicBool,
}

impl UsartMidiPort {
    pub const fn new() -> Self {
        Self {
            tx_ready: AtomicBool::new(true),
            rx_error: AtomicBool::new(false),
        }
    }

    pub fn init(&self) {
        // USART1 bring-up:
        //   - 8-bit frame, no parity, one stop bit
        //   - BRR = PCLK2 / (16 * 31250)
        //   - receiver + RXNE interrupt enabled, transmitter polled
    }

    /// Called from the USART1 interrupt when the error bits (ORE/FE) are
    /// set. The thru filter cycles the receiver on its next pass.
    pub fn on_rx_error(&self) {
        self.rx_error.store(true, Ordering::Relaxed);
    }
}

impl Default for UsartMidiPort {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiPort for &UsartMidiPort {
    fn send(&mut self, _byte: u8) {
        // USART1->DATAR = byte
        while !self.tx_ready.load(Ordering::Relaxed) {
            // spin on TXE
        }
    }

    fn rx_error(&mut self) -> bool {
        self.rx_error.load(Ordering::Relaxed)
    }

    fn reset_receiver(&mut self) {
        // Toggle CTLR1.RE to discard the errored byte and clear ORE/FE.
        self.rx_error.store(false, Ordering::Relaxed);
    }
}

/// Button bank on PB3/PB4/PB5, pulled up, grounded when pressed. No edge
/// interrupts: the main loop samples once per iteration.
pub struct GpioButtons {
    raw: AtomicU8,
}

impl GpioButtons {
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(0),
        }
    }

    pub fn init(&self) {
        // Inputs with pull-ups enabled; analog select off.
    }

    /// Mirror of the port input register, already mapped onto the
    /// `button` mask with active-low inversion applied.
    pub fn set_raw(&self, mask: u8) {
        self.raw.store(mask, Ordering::Relaxed);
    }
}

impl Default for GpioButtons {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonInputs for &GpioButtons {
    fn read(&mut self) -> u8 {
        // Read GPIOB->INDR and invert the three button pins.
        self.raw.load(Ordering::Relaxed)
    }
}

/// Six LED outputs on PA0..PA5, written as one port access per PWM period.
pub struct GpioLedPanel {
    mask: AtomicU8,
}

impl GpioLedPanel {
    pub const fn new() -> Self {
        Self {
            mask: AtomicU8::new(0),
        }
    }

    pub fn init(&self) {
        // Push-pull outputs, all low.
    }

    pub fn mask(&self) -> u8 {
        self.mask.load(Ordering::Relaxed)
    }
}

impl Default for GpioLedPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl LedPanel for &GpioLedPanel {
    fn set(&mut self, mask: u8) {
        // GPIOA->OUTDR = mask (lower six bits)
        self.mask.store(mask, Ordering::Relaxed);
    }
}

/// TIM2 as the tempo timer. Not auto-reloading in the mode used here: the
/// overflow interrupt must rewrite the counter itself.
pub struct Tim2TempoTimer {
    reload: AtomicU16,
}

impl Tim2TempoTimer {
    pub const fn new() -> Self {
        Self {
            reload: AtomicU16::new(0),
        }
    }

    /// Write the counter register. Safe from interrupt context.
    pub fn rearm(&self, reload: u16) {
        // TIM2->CNT = reload; prescaler fixed for 500 kHz counting.
        self.reload.store(reload, Ordering::Relaxed);
    }

    pub fn reload(&self) -> u16 {
        self.reload.load(Ordering::Relaxed)
    }
}

impl Default for Tim2TempoTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TempoTimer for &Tim2TempoTimer {
    fn arm(&mut self, reload: u16) {
        self.rearm(reload);
    }
}

/// Options record in the last flash page. The CH32V203 has no EEPROM, so
/// the byte store is emulated over a RAM image flushed by the flash
/// driver; addresses match the persisted record layout.
pub struct OptionFlashStore {
    cells: [u8; 16],
}

impl OptionFlashStore {
    pub fn new() -> Self {
        // Erased flash reads all ones, which also fails the cookie check
        // on first boot.
        Self { cells: [0xFF; 16] }
    }
}

impl Default for OptionFlashStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStore for OptionFlashStore {
    fn read(&mut self, addr: u8) -> u8 {
        self.cells[addr as usize % self.cells.len()]
    }

    fn write(&mut self, addr: u8, value: u8) {
        let len = self.cells.len();
        self.cells[addr as usize % len] = value;
    }
}

// Peripheral singletons shared with the interrupt handlers.
static MIDI: UsartMidiPort = UsartMidiPort::new();
static BUTTONS: GpioButtons = GpioButtons::new();
static LEDS: GpioLedPanel = GpioLedPanel::new();
static TIM2: Tim2TempoTimer = Tim2TempoTimer::new();

static RX_PRODUCER: Mutex<RefCell<Option<RxProducer<'static>>>> = Mutex::new(RefCell::new(None));

/// Board bundle handed to the engine.
pub struct Ch32v203Board {
    midi: &'static UsartMidiPort,
    buttons: &'static GpioButtons,
    leds: &'static GpioLedPanel,
    timer: &'static Tim2TempoTimer,
    store: OptionFlashStore,
}

impl HubBoard for Ch32v203Board {
    type Midi = &'static UsartMidiPort;
    type Buttons = &'static GpioButtons;
    type Leds = &'static GpioLedPanel;
    type Timer = &'static Tim2TempoTimer;
    type Store = OptionFlashStore;

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

/// Initialize the peripherals and hand out the board bundle.
pub fn init_board() -> Ch32v203Board {
    MIDI.init();
    BUTTONS.init();
    LEDS.init();

    #[cfg(feature = "defmt")]
    defmt::info!("ch32v203 board initialized");

    Ch32v203Board {
        midi: &MIDI,
        buttons: &BUTTONS,
        leds: &LEDS,
        timer: &TIM2,
        store: OptionFlashStore::new(),
    }
}

/// Hand the receive-queue producer to the USART interrupt.
pub fn register_rx_producer(producer: RxProducer<'static>) {
    critical_section::with(|cs| {
        RX_PRODUCER.borrow_ref_mut(cs).replace(producer);
    });
}

/// SysTick compare interrupt body, 1 kHz.
pub fn on_systick(shared: &SharedState) {
    shared.clock.tick();
}

/// TIM2 overflow interrupt body. The counter is re-armed before anything
/// else so interrupt latency never accumulates into the beat period.
pub fn on_tim2_overflow(shared: &SharedState) {
    TIM2.rearm(shared.tempo_reload());
    shared.raise_tick();
}

/// USART1 receive interrupt body: push the byte, dropping it when the
/// queue is full. There is no flow control to assert, so the overrun is
/// silent.
pub fn on_usart1_rx(byte: u8) {
    critical_section::with(|cs| {
        if let Some(producer) = RX_PRODUCER.borrow_ref_mut(cs).as_mut() {
            producer.enqueue(byte).ok();
        }
    });
}
