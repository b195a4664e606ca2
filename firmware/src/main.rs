#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;

// RISC-V runtime
use riscv_rt as _;

// Panic handler
use panic_halt as _;

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;

use hub_core::{button, default_config, version_led_mask, ButtonInputs, HubEngine, LedPanel,
    RxQueue, SharedState};
use midihub_firmware::*;

// Static resources
static SHARED: SharedState = SharedState::new();
static RX_QUEUE: StaticCell<RxQueue> = StaticCell::new();

/// Main firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    defmt::info!("midihub firmware starting");

    let mut board = init_board();

    // Holding RUN through power-on shows the firmware revision on the
    // LEDs for a few seconds before normal operation.
    if board.buttons().read() & button::RUN != 0 {
        board.leds().set(version_led_mask());
        Timer::after(Duration::from_secs(5)).await;
        board.leds().set(0);
    }

    let queue = RX_QUEUE.init(RxQueue::new());
    let (producer, consumer) = queue.split();
    register_rx_producer(producer);

    let engine = HubEngine::new(default_config());

    spawner.must_spawn(clock_task(&SHARED));
    spawner.must_spawn(hub_task(&SHARED, consumer, board, engine));

    #[cfg(feature = "defmt")]
    defmt::info!("midihub ready");
}
