//! Bring-up of simulated AVR devices and loading of Intel HEX program images.

pub mod error;
pub mod ihex;
pub mod mcu;
