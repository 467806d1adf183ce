//! ATmega8A fuse bytes and their decoding.
//!
//! The high fuse byte is:
//! ```text
//! 7        6     5     4     3      2       1       0
//! RSTDISBL WDTON SPIEN CKOPT EESAVE BOOTSZ1 BOOTSZ0 BOOTRST
//! ```
//! The low fuse byte is:
//! ```text
//! 7        6     5    4    3      2      1      0
//! BODLEVEL BODEN SUT1 SUT0 CKSEL3 CKSEL2 CKSEL1 CKSEL0
//! ```
//! A fuse bit reads `0` when programmed and `1` when unprogrammed.

use bitfield::bitfield;
use log::debug;

use crate::error::ConfigurationError;

bitfield!{
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct FuseHigh(u8);
    impl Debug;
    pub bootrst, set_bootrst: 0;
    pub u8, bootsz, set_bootsz: 2, 1;
    pub eesave, set_eesave: 3;
    pub ckopt, set_ckopt: 4;
    pub spien, set_spien: 5;
    pub wdton, set_wdton: 6;
    pub rstdisbl, set_rstdisbl: 7;
}

bitfield!{
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct FuseLow(u8);
    impl Debug;
    pub u8, cksel, set_cksel: 3, 0;
    pub u8, sut, set_sut: 5, 4;
    pub boden, set_boden: 6;
    pub bodlevel, set_bodlevel: 7;
}

/// Frequency reported when it can't be derived from the fuses.
pub const FREQUENCY_UNKNOWN: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    Internal,
    External,
}

/// Boot loader section of flash, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootLoader {
    pub start: u16,
    pub end: u16,
    pub size: u16,
}

/// BOOTSZ1:0 selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootSize {
    Words1024,
    Words512,
    Words256,
    Words128,
}

impl BootSize {
    pub fn from_bits(bits: u8) -> BootSize {
        match bits {
            0b01 => BootSize::Words512,
            0b10 => BootSize::Words256,
            0b11 => BootSize::Words128,
            _ => BootSize::Words1024,
        }
    }

    pub fn section(self) -> BootLoader {
        match self {
            BootSize::Words1024 => BootLoader { start: 0xC00, end: 0xFFF, size: 1024 },
            BootSize::Words512 => BootLoader { start: 0xE00, end: 0xFFF, size: 512 },
            BootSize::Words256 => BootLoader { start: 0xF00, end: 0xFFF, size: 256 },
            BootSize::Words128 => BootLoader { start: 0xF80, end: 0xFFF, size: 128 },
        }
    }
}

/// CKSEL3:0 selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSelect {
    External,
    InternalRc1Mhz,
    InternalRc2Mhz,
    InternalRc4Mhz,
    InternalRc8Mhz,
}

impl ClockSelect {
    /// Any selector without an exact match is the 1 MHz default.
    pub fn from_bits(bits: u8) -> ClockSelect {
        match bits {
            0x0 => ClockSelect::External,
            0x2 => ClockSelect::InternalRc2Mhz,
            0x3 => ClockSelect::InternalRc4Mhz,
            0x4 => ClockSelect::InternalRc8Mhz,
            _ => ClockSelect::InternalRc1Mhz,
        }
    }

    pub fn source(self) -> ClockSource {
        match self {
            ClockSelect::External => ClockSource::External,
            _ => ClockSource::Internal,
        }
    }

    /// Frequency in kHz.
    pub fn frequency(self) -> u32 {
        match self {
            ClockSelect::External => FREQUENCY_UNKNOWN,
            ClockSelect::InternalRc1Mhz => 1000,
            ClockSelect::InternalRc2Mhz => 2000,
            ClockSelect::InternalRc4Mhz => 4000,
            ClockSelect::InternalRc8Mhz => 8000,
        }
    }
}

/// Configuration derived from a pair of fuse bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuseConfig {
    pub boot_loader: BootLoader,
    pub clock_source: ClockSource,
    /// kHz, or [FREQUENCY_UNKNOWN]
    pub frequency: u32,
}

/// Decodes the fuse bytes, rejecting an internal clock with CKOPT programmed.
pub fn decode_fuses(high: u8, low: u8) -> Result<FuseConfig, ConfigurationError> {
    let high = FuseHigh(high);
    let low = FuseLow(low);

    let boot_size = BootSize::from_bits(high.bootsz());
    let clock = ClockSelect::from_bits(low.cksel());

    // External clock isn't a crystal or RC, CKOPT doesn't apply.
    if clock.source() == ClockSource::Internal && !high.ckopt() {
        return Err(ConfigurationError::CkoptProgrammed);
    }

    debug!("Fuses {:?} {:?}: {:?}, {:?}", high, low, boot_size, clock);

    Ok(FuseConfig {
        boot_loader: boot_size.section(),
        clock_source: clock.source(),
        frequency: clock.frequency(),
    })
}
