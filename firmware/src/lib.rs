#![no_std]

//! Firmware library: CH32V203 board support and Embassy tasks.

pub use embassy_executor::Spawner;
pub use embassy_time::Duration;
pub use static_cell::StaticCell;

pub use hub_core::*;

pub use crate::ch32v203::*;
pub use crate::tasks::*;

pub mod ch32v203;
pub mod tasks;
