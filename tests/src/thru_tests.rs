//! MIDI thru filter tests.

use hub_core::test_utils::SimHub;
use hub_core::{button, chord, midi, OperatingMode, Options};

/// LED mask the thru filter flickers around a blocking transmit.
const FLICKER: u8 = 0b00_1100;

#[test]
fn other_messages_pass_by_default() {
    let mut sim = SimHub::new();
    sim.feed_rx(&[0x90, 0x3C, 0x64]);
    sim.poll();
    assert_eq!(sim.drain_sent(), vec![0x90, 0x3C, 0x64]);
}

#[test]
fn realtime_messages_drop_by_default() {
    let mut sim = SimHub::new();
    sim.feed_rx(&[midi::TICK, midi::START]);
    sim.poll();
    assert!(sim.drain_sent().is_empty());
}

#[test]
fn thru_clock_is_never_a_local_tick() {
    let mut sim = SimHub::new();
    toggle_option(&mut sim, 0); // pass-realtime
    sim.drain_sent();

    sim.feed_rx(&[midi::TICK]);
    sim.poll();
    // Forwarded verbatim, beat phase untouched.
    assert_eq!(sim.drain_sent(), vec![midi::TICK]);
    assert_eq!(sim.engine.tick_phase(), 0);
}

#[test]
fn disabling_pass_other_filters_voice_bytes() {
    let mut sim = SimHub::new();
    toggle_option(&mut sim, 1); // toggles pass-other off
    assert!(!sim.engine.options().contains(Options::PASS_OTHER));

    sim.feed_rx(&[0x90]);
    sim.poll();
    assert!(sim.drain_sent().is_empty());
}

#[test]
fn forwarding_flickers_the_indicator_leds() {
    let mut sim = SimHub::new();
    sim.feed_rx(&[0x42]);
    sim.board.leds.clear_history();
    sim.poll();
    let history = sim.board.leds.history.clone();
    assert_eq!(&history[..2], &[FLICKER, 0]);
}

#[test]
fn no_clock_mode_animates_instead_of_flickering() {
    let mut sim = SimHub::new();
    sim.click(chord::NO_CLOCK);
    assert_eq!(sim.engine.mode(), OperatingMode::NoClock);

    sim.board.leds.clear_history();
    sim.feed_rx(&[0x47]);
    sim.poll();
    assert_eq!(sim.drain_sent(), vec![0x47]);
    assert!(sim.board.leds.history.iter().all(|&mask| mask != FLICKER));
}

#[test]
fn queue_overrun_drops_newest_bytes_silently() {
    let mut sim = SimHub::new();
    // 30 bytes into a 19-slot pipe: the tail is dropped, the rest arrive
    // in order.
    let bytes: Vec<u8> = (1..=30).collect();
    sim.feed_rx(&bytes);
    sim.poll();
    assert_eq!(sim.drain_sent(), (1..=19).collect::<Vec<u8>>());
}

#[test]
fn rx_error_recovers_by_receiver_cycle() {
    let mut sim = SimHub::new();
    sim.board.midi.inject_rx_error();
    sim.feed_rx(&[0x55]);
    sim.poll();
    assert_eq!(sim.board.midi.receiver_resets, 1);
    // The queued byte still goes through after recovery.
    assert_eq!(sim.drain_sent(), vec![0x55]);
}

/// Toggle the option at a menu cursor position and return to Step mode.
fn toggle_option(sim: &mut SimHub, cursor: u8) {
    sim.click(chord::MENU);
    for _ in 0..cursor {
        sim.click(button::INC);
    }
    sim.click(button::DEC);
    sim.click(button::RUN);
    assert_eq!(sim.engine.mode(), OperatingMode::Step);
}
