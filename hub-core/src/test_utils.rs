//! Deterministic simulation harness for host-side tests.
//!
//! Drives a [`HubEngine`] against the mock board with simulated time: one
//! engine poll per simulated millisecond, scripted button edges and
//! injected receive traffic / tempo ticks.

use crate::engine::HubEngine;
use crate::hal::mock::MockBoard;
use crate::shared::{RxConsumer, RxProducer, RxQueue, SharedState};
use crate::types::HubConfig;

pub struct SimHub {
    pub shared: &'static SharedState,
    pub board: MockBoard,
    pub engine: HubEngine,
    producer: RxProducer<'static>,
    consumer: RxConsumer<'static>,
    debounce_ms: u32,
}

impl SimHub {
    /// Build a hub with freshly erased storage and run its init sequence.
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        let shared: &'static SharedState = Box::leak(Box::new(SharedState::new()));
        let queue: &'static mut RxQueue = Box::leak(Box::new(RxQueue::new()));
        let (producer, consumer) = queue.split();
        let mut board = MockBoard::new();
        let mut engine = HubEngine::new(config);
        engine.init(shared, &mut board);
        Self {
            shared,
            board,
            engine,
            producer,
            consumer,
            debounce_ms: config.debounce_ms,
        }
    }

    /// Run one main-loop iteration at the current simulated time.
    pub fn poll(&mut self) {
        self.engine
            .poll(self.shared, &mut self.consumer, &mut self.board);
    }

    /// Advance simulated time, polling once per millisecond.
    pub fn run_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.shared.clock.tick();
            self.poll();
        }
    }

    pub fn press(&mut self, buttons: u8) {
        self.board.buttons.press(buttons);
    }

    pub fn release_all(&mut self) {
        self.board.buttons.release_all();
    }

    /// Press, observe, release, and let the debounce windows pass.
    pub fn click(&mut self, buttons: u8) {
        self.press(buttons);
        self.poll();
        self.run_ms(self.debounce_ms + 1);
        self.release_all();
        self.run_ms(self.debounce_ms + 1);
    }

    /// Hold buttons long enough for the long-press event to fire.
    pub fn long_press(&mut self, buttons: u8, hold_ms: u32) {
        self.press(buttons);
        self.poll();
        self.run_ms(hold_ms);
        self.release_all();
        self.run_ms(self.debounce_ms + 1);
    }

    /// Inject received serial bytes.
    pub fn feed_rx(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.producer.enqueue(byte).ok();
        }
    }

    /// Raise the tempo tick flag, as the timer overflow interrupt would.
    pub fn fire_tick(&mut self) {
        self.shared.raise_tick();
    }

    /// Fire and consume `n` tempo ticks.
    pub fn run_ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.fire_tick();
            self.poll();
        }
    }

    /// Bytes transmitted since the last drain.
    pub fn drain_sent(&mut self) -> Vec<u8> {
        self.board.midi.take_sent().to_vec()
    }
}

impl Default for SimHub {
    fn default() -> Self {
        Self::new()
    }
}
