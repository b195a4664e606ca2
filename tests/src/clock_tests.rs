//! System clock, tick flag and receive queue behavior.

use hub_core::test_utils::SimHub;
use hub_core::{Millis, RxQueue, SystemClock, TickFlag, RX_CAPACITY};
use proptest::prelude::*;

#[test]
fn clock_is_monotonic_per_tick() {
    let clock = SystemClock::new();
    for expected in 1..=100u32 {
        clock.tick();
        assert_eq!(clock.now(), Millis(expected));
    }
}

#[test]
fn tick_flag_collapses_bursts() {
    let flag = TickFlag::new();
    flag.raise();
    flag.raise();
    flag.raise();
    assert!(flag.take());
    assert!(!flag.take());
}

#[test]
fn queue_round_trips_in_fifo_order() {
    let mut queue = RxQueue::new();
    for b in 0..(RX_CAPACITY - 1) as u8 {
        assert!(queue.enqueue(b).is_ok());
    }
    assert_eq!(queue.enqueue(0xEE), Err(0xEE));
    for b in 0..(RX_CAPACITY - 1) as u8 {
        assert_eq!(queue.dequeue(), Some(b));
    }
    assert_eq!(queue.dequeue(), None);

    // Head/tail survive the rejected push: the queue keeps working.
    assert!(queue.enqueue(0x01).is_ok());
    assert_eq!(queue.dequeue(), Some(0x01));
}

#[test]
fn engine_observes_one_tick_per_raise() {
    let mut sim = SimHub::new();
    sim.fire_tick();
    for _ in 0..5 {
        sim.poll();
    }
    assert_eq!(sim.engine.tick_phase(), 1);
}

#[test]
fn phase_cycles_over_full_quarter_notes() {
    let mut sim = SimHub::new();
    for beat in 0..4 {
        sim.run_ticks(24);
        assert_eq!(sim.engine.tick_phase(), 0, "beat {beat}");
    }
}

proptest! {
    #[test]
    fn elapsed_time_is_wraparound_safe(start: u32, delta in 0u32..10_000) {
        let t0 = Millis(start);
        let t1 = t0.wrapping_add(delta);
        prop_assert_eq!(t1.since(t0), delta);
    }
}
