//! Module for AVR MCUs: device bring-up and program memory loading.

pub mod mcu_model;
pub mod fuses;
pub mod lock_bits;
mod device;
mod progmem;

pub use device::{init_device, DeviceState};
pub use mcu_model::{Atmega8a, DeviceDescriptor, DeviceVariant, McuModel};
