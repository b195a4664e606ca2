//! Debounce and auto-repeat timing.

use hub_core::{button, Debouncer, HubConfig, Millis};
use proptest::prelude::*;

fn debouncer() -> Debouncer {
    Debouncer::new(&HubConfig::default())
}

#[test]
fn edge_inside_window_never_double_fires() {
    let mut deb = debouncer();
    assert!(deb.poll(Millis(0), button::DEC).is_some());
    // Bounce: open and close again before the window ends.
    for t in (5..95).step_by(5) {
        let mask = if t % 10 == 0 { 0 } else { button::DEC };
        assert!(deb.poll(Millis(t), mask).is_none());
    }
    // Stable and identical once the window closes: still nothing new.
    assert!(deb.poll(Millis(100), button::DEC).is_none());
}

#[test]
fn repeat_cadence_matches_configuration() {
    let config = HubConfig::default();
    let mut deb = Debouncer::new(&config);
    assert!(deb.poll(Millis(0), button::INC).is_some());

    let mut events = Vec::new();
    for t in 1..1200u32 {
        if let Some(ev) = deb.poll(Millis(t), button::INC) {
            events.push((t, ev));
        }
    }
    let (first_t, first) = events[0];
    assert_eq!(first_t, config.auto_repeat_delay_ms + 1);
    assert!(first.is_long_press());
    for window in events.windows(2).skip(1) {
        assert_eq!(window[1].0 - window[0].0, config.auto_repeat_interval_ms + 1);
        assert!(window[1].1.is_auto_repeat());
    }
}

#[test]
fn releasing_clears_the_hold() {
    let mut deb = debouncer();
    assert!(deb.poll(Millis(0), button::INC).is_some());
    assert!(deb.poll(Millis(200), 0).is_none());
    // A fresh press starts a fresh hold clock.
    assert!(deb.poll(Millis(301), button::INC).is_some());
    assert!(deb.poll(Millis(700), button::INC).is_none());
    let ev = deb.poll(Millis(803), button::INC).unwrap();
    assert!(ev.is_long_press());
}

proptest! {
    #[test]
    fn long_press_fires_across_the_wrap_boundary(offset in 0u32..600) {
        let mut deb = debouncer();
        let start = Millis(u32::MAX - offset);
        prop_assert!(deb.poll(start, button::RUN).is_some());
        prop_assert!(deb.poll(start.wrapping_add(500), button::RUN).is_none());
        let ev = deb.poll(start.wrapping_add(501), button::RUN).unwrap();
        prop_assert!(ev.is_long_press());
    }

    #[test]
    fn no_repeat_before_the_delay(hold in 101u32..500) {
        let mut deb = debouncer();
        prop_assert!(deb.poll(Millis(0), button::DEC).is_some());
        prop_assert!(deb.poll(Millis(hold), button::DEC).is_none());
    }
}
