//! Embassy task wrappers around the hub main loop.

use embassy_time::{Duration, Timer};
use hub_core::{HubEngine, RxConsumer, SharedState};

use crate::ch32v203::{on_systick, Ch32v203Board};

/// Millisecond clock task: stands in for the SysTick interrupt while
/// Embassy owns the timebase.
#[embassy_executor::task]
pub async fn clock_task(shared: &'static SharedState) {
    loop {
        Timer::after(Duration::from_millis(1)).await;
        on_systick(shared);
    }
}

/// Main hub loop: one engine poll per iteration, yielding between
/// iterations so the clock task keeps the counter moving.
#[embassy_executor::task]
pub async fn hub_task(
    shared: &'static SharedState,
    mut rx: RxConsumer<'static>,
    mut board: Ch32v203Board,
    mut engine: HubEngine,
) {
    engine.init(shared, &mut board);

    #[cfg(feature = "defmt")]
    defmt::info!("hub running at {} bpm", engine.bpm());

    loop {
        engine.poll(shared, &mut rx, &mut board);
        Timer::after(Duration::from_micros(200)).await;
    }
}
