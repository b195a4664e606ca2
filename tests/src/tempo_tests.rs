//! Tempo clamping and timer reload derivation.

use hub_core::tempo::{counts_per_tick, reload_for, TIMER_MAX};
use hub_core::test_utils::SimHub;
use hub_core::{button, HubConfig, SharedState, TempoGenerator};
use proptest::prelude::*;

#[test]
fn known_reload_values() {
    // 500 kHz counting, 24 PPQN: 1_250_000 / bpm counts per tick.
    assert_eq!(counts_per_tick(120), 10_416);
    assert_eq!(reload_for(120), TIMER_MAX - 10_416);
    assert_eq!(counts_per_tick(30), 41_666);
    assert_eq!(counts_per_tick(300), 4_166);
}

#[test]
fn engine_publishes_reload_on_tempo_change() {
    let mut sim = SimHub::new();
    assert_eq!(sim.shared.tempo_reload(), reload_for(120));
    sim.click(button::INC);
    assert_eq!(sim.shared.tempo_reload(), reload_for(121));
}

#[test]
fn nudges_saturate_at_the_range_ends() {
    let shared = SharedState::new();
    let mut tempo = TempoGenerator::new(&HubConfig::default());
    tempo.set(30, &shared);
    tempo.nudge(-1, &shared);
    assert_eq!(tempo.bpm(), 30);
    tempo.set(300, &shared);
    tempo.nudge(1, &shared);
    assert_eq!(tempo.bpm(), 300);
}

proptest! {
    #[test]
    fn set_reads_back_the_clamped_value(bpm in -100i32..1000) {
        let shared = SharedState::new();
        let mut tempo = TempoGenerator::new(&HubConfig::default());
        tempo.set(bpm, &shared);
        prop_assert_eq!(tempo.bpm() as i32, bpm.clamp(30, 300));
    }

    #[test]
    fn tick_period_strictly_shrinks_with_tempo(bpm in 30u16..300) {
        prop_assert!(counts_per_tick(bpm) > counts_per_tick(bpm + 1));
    }

    #[test]
    fn reload_always_fits_the_timer(bpm in 30u16..=300) {
        let counts = counts_per_tick(bpm);
        prop_assert!(counts <= TIMER_MAX as u32);
        prop_assert_eq!(reload_for(bpm) as u32 + counts, TIMER_MAX as u32);
    }
}
