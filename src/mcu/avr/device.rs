use std::ops::Range;

use log::info;

use crate::error::{ConfigurationError, Unsupported};
use crate::ihex::RecordSource;

use super::fuses::{decode_fuses, BootLoader, ClockSource};
use super::lock_bits::LockBits;
use super::mcu_model::{DeviceDescriptor, DeviceVariant};

/// Initial machine state of a simulated AVR device.
#[derive(Debug, Clone)]
pub struct DeviceState {
    geometry: DeviceDescriptor,
    lock_bits: LockBits,

    fuse_high: u8,
    fuse_low: u8,
    boot_loader: BootLoader,
    clock_source: ClockSource,
    frequency: u32,

    pub(super) program_memory: Option<Vec<u16>>,
}

/// Builds a device from the descriptor of `variant`, with its default fuses.
pub fn init_device(variant: DeviceVariant) -> Result<DeviceState, ConfigurationError> {
    DeviceState::from_descriptor(&variant.descriptor())
}

impl DeviceState {
    pub fn from_descriptor(descriptor: &DeviceDescriptor) -> Result<DeviceState, ConfigurationError> {
        DeviceState::with_fuses(
            descriptor,
            descriptor.default_fuse_high,
            descriptor.default_fuse_low,
        )
    }

    /// Builds a device whose fuses are programmed to `high` and `low`.
    pub fn with_fuses(
        descriptor: &DeviceDescriptor,
        high: u8,
        low: u8,
    ) -> Result<DeviceState, ConfigurationError> {
        descriptor.validate()?;

        let mut device = DeviceState {
            geometry: descriptor.clone(),
            lock_bits: LockBits::unprogrammed(),
            fuse_high: 0xFF,
            fuse_low: 0xFF,
            boot_loader: BootLoader { start: 0, end: 0, size: 0 },
            clock_source: ClockSource::Internal,
            frequency: 0,
            program_memory: None,
        };
        device.set_fuse_bytes(high, low)?;

        info!(
            "Initialized {}: {} bytes flash, fuses H:0x{:02X} L:0x{:02X}",
            device.name(),
            device.geometry.flash_end - device.geometry.flash_start + 1,
            device.fuse_high,
            device.fuse_low
        );
        Ok(device)
    }

    /// Applies decoded fuses all at once, leaving the state untouched on error.
    fn set_fuse_bytes(&mut self, high: u8, low: u8) -> Result<(), ConfigurationError> {
        let config = decode_fuses(high, low)?;

        self.fuse_high = high;
        self.fuse_low = low;
        self.boot_loader = config.boot_loader;
        self.clock_source = config.clock_source;
        self.frequency = config.frequency;
        Ok(())
    }

    /// Loading data memory (RAM/EEPROM) images isn't supported.
    pub fn load_data_image<S: RecordSource>(&mut self, _source: &mut S) -> Result<(), Unsupported> {
        Err(Unsupported("data memory image loading"))
    }

    pub fn name(&self) -> &'static str {
        self.geometry.name
    }

    pub fn geometry(&self) -> &DeviceDescriptor {
        &self.geometry
    }

    pub fn flash_words(&self) -> usize {
        self.geometry.flash_words()
    }

    pub fn lock_bits(&self) -> LockBits {
        self.lock_bits
    }

    pub fn fuse_high(&self) -> u8 {
        self.fuse_high
    }

    pub fn fuse_low(&self) -> u8 {
        self.fuse_low
    }

    pub fn boot_loader(&self) -> BootLoader {
        self.boot_loader
    }

    /// Word addresses of the application section, below the boot loader.
    pub fn application_section(&self) -> Range<u16> {
        (self.geometry.flash_start / 2) as u16..self.boot_loader.start
    }

    pub fn clock_source(&self) -> ClockSource {
        self.clock_source
    }

    /// Clock frequency in kHz.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn program_memory(&self) -> Option<&[u16]> {
        self.program_memory.as_deref()
    }
}
