//! Options persistence and the settings menu.

use hub_core::hal::mock::MockByteStore;
use hub_core::options::{self, MAGIC_COOKIE, STORE_ADDR_COOKIE, STORE_ADDR_OPTIONS};
use hub_core::test_utils::SimHub;
use hub_core::{button, chord, OperatingMode, Options};
use rstest::rstest;

#[test]
fn options_survive_a_power_cycle() {
    let mut store = MockByteStore::new();
    options::save(&mut store, Options::from_bits(0b0001_0110));

    // Power cycle: a fresh load from the same cells, no intervening write.
    let mut rebooted = MockByteStore::new();
    rebooted.cells = store.cells;
    assert_eq!(options::load(&mut rebooted), Options::from_bits(0b0001_0110));
}

#[test]
fn corrupted_cookie_restores_defaults() {
    let mut store = MockByteStore::new();
    options::save(&mut store, Options::from_bits(0b0001_0110));
    store.cells[STORE_ADDR_COOKIE as usize] = 0x5A;
    assert_eq!(options::load(&mut store), Options::DEFAULT);
}

#[test]
fn first_boot_uses_defaults() {
    let sim = SimHub::new();
    assert_eq!(sim.engine.options(), Options::DEFAULT);
}

#[rstest]
#[case::pass_realtime(0)]
#[case::pass_other(1)]
#[case::start_stop(2)]
#[case::thru_animate(3)]
#[case::discreet(4)]
fn menu_toggle_flips_and_persists_each_bit(#[case] cursor: u8) {
    let mut sim = SimHub::new();
    sim.click(chord::MENU);
    for _ in 0..cursor {
        sim.click(button::INC);
    }
    assert_eq!(sim.engine.menu_cursor(), cursor);
    sim.click(button::DEC);

    let expected = Options::DEFAULT.bits() ^ (1 << cursor);
    assert_eq!(sim.engine.options().bits(), expected);
    assert_eq!(sim.board.store.cells[STORE_ADDR_OPTIONS as usize], expected);
    assert_eq!(sim.board.store.cells[STORE_ADDR_COOKIE as usize], MAGIC_COOKIE);

    // Toggling back restores the defaults on disk too.
    sim.click(button::DEC);
    assert_eq!(
        sim.board.store.cells[STORE_ADDR_OPTIONS as usize],
        Options::DEFAULT.bits()
    );
}

#[test]
fn cursor_wraps_around_the_menu() {
    let mut sim = SimHub::new();
    sim.click(chord::MENU);
    for _ in 0..options::MENU_SIZE {
        sim.click(button::INC);
    }
    assert_eq!(sim.engine.menu_cursor(), 0);
}

#[test]
fn brightness_slot_cycles_without_touching_flags() {
    let mut sim = SimHub::new();
    sim.click(chord::MENU);
    for _ in 0..options::MENU_BRIGHTNESS_SLOT {
        sim.click(button::INC);
    }
    sim.click(button::DEC);
    sim.click(button::DEC);
    assert_eq!(sim.engine.options(), Options::DEFAULT);
    // The record is still rewritten, cookie intact.
    assert_eq!(sim.board.store.cells[STORE_ADDR_COOKIE as usize], MAGIC_COOKIE);
}

#[test]
fn menu_exit_keeps_the_toggles() {
    let mut sim = SimHub::new();
    sim.click(chord::MENU);
    sim.click(button::DEC); // pass-realtime on
    sim.click(button::RUN);
    assert_eq!(sim.engine.mode(), OperatingMode::Step);
    assert!(sim.engine.options().contains(Options::PASS_REALTIME));
}
