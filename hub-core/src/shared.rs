//! State shared between interrupt context and the main loop.
//!
//! The millisecond clock, the tempo tick flag, the tempo timer reload value
//! and the receive queue are the only fields interrupt handlers touch. Each
//! is a single atomic word (or a lock-free SPSC queue), so the main loop
//! always observes whole values without critical sections.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use crate::types::Millis;

/// Receive queue capacity. One slot is always kept empty to tell a full
/// queue from an empty one, leaving `RX_CAPACITY - 1` usable bytes.
pub const RX_CAPACITY: usize = 20;

pub type RxQueue = heapless::spsc::Queue<u8, RX_CAPACITY>;
pub type RxProducer<'a> = heapless::spsc::Producer<'a, u8, RX_CAPACITY>;
pub type RxConsumer<'a> = heapless::spsc::Consumer<'a, u8, RX_CAPACITY>;

/// Free-running millisecond counter fed by a 1 kHz timer interrupt.
pub struct SystemClock {
    ticks: AtomicU32,
}

impl SystemClock {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
        }
    }

    /// Advance the counter by one millisecond. Interrupt context only.
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn now(&self) -> Millis {
        Millis(self.ticks.load(Ordering::Relaxed))
    }

    /// Jump the counter to an absolute value (for simulated time).
    #[cfg(any(test, feature = "test-utils"))]
    pub fn set(&self, ms: u32) {
        self.ticks.store(ms, Ordering::Relaxed);
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot signal raised by the tempo timer overflow interrupt.
///
/// A single flag is enough: the main loop polls faster than the shortest
/// tick period, and collapsing a missed overflow into one observed tick is
/// the defined overrun policy rather than a condition to compensate for.
pub struct TickFlag {
    raised: AtomicBool,
}

impl TickFlag {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Raise the flag. Interrupt context only.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consume the flag. A raised tick is observed exactly once no matter
    /// how many polls happen between overflows.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }
}

impl Default for TickFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// All interrupt-shared state, bundled for static allocation.
pub struct SharedState {
    pub clock: SystemClock,
    tick: TickFlag,
    tempo_reload: AtomicU16,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            clock: SystemClock::new(),
            tick: TickFlag::new(),
            tempo_reload: AtomicU16::new(0),
        }
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// Raise the tempo tick. Called from the timer overflow handler after
    /// it has re-armed the hardware reload register.
    pub fn raise_tick(&self) {
        self.tick.raise();
    }

    pub fn take_tick(&self) -> bool {
        self.tick.take()
    }

    /// Reload value the overflow handler writes back into the timer before
    /// any other work.
    pub fn tempo_reload(&self) -> u16 {
        self.tempo_reload.load(Ordering::Relaxed)
    }

    pub(crate) fn set_tempo_reload(&self, reload: u16) {
        self.tempo_reload.store(reload, Ordering::Relaxed);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
