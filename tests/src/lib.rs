//! Host-based integration tests for the MIDI hub core.
//!
//! Everything runs against the mock board through the `SimHub` harness:
//! simulated milliseconds, scripted button edges, injected serial traffic
//! and hand-fired tempo ticks.

#[cfg(test)]
mod clock_tests;
#[cfg(test)]
mod debounce_tests;
#[cfg(test)]
mod options_tests;
#[cfg(test)]
mod tempo_tests;
#[cfg(test)]
mod thru_tests;
