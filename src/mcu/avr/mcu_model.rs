use std::str::FromStr;

use crate::error::ConfigurationError;

/// Static memory geometry and default fuses of one device variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub name: &'static str,

    pub flash_start: u32,
    pub flash_end: u32,
    /// SPM page size in bytes
    pub flash_page_size: u16,

    pub ram_start: u16,
    pub ram_end: u16,
    pub ram_size: u16,

    pub eeprom_start: u16,
    pub eeprom_end: u16,
    pub eeprom_size: u16,
    pub eeprom_page_size: u16,

    pub default_fuse_high: u8,
    pub default_fuse_low: u8,
}

impl DeviceDescriptor {
    /// Size of flash in 16-bit words.
    pub fn flash_words(&self) -> usize {
        ((self.flash_end - self.flash_start) as usize + 1) / 2
    }

    /// Checks that the bounds describe real, non-empty memories.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |msg: String| Err(ConfigurationError::InvalidGeometry(msg));

        if self.flash_end <= self.flash_start {
            return invalid(format!(
                "flash end 0x{:X} is not above flash start 0x{:X}",
                self.flash_end, self.flash_start
            ));
        }
        if (self.flash_end - self.flash_start + 1) % 2 != 0 {
            return invalid("flash size is not a whole number of words".to_string());
        }
        // Boot sections from the fuse map start at word 0 and end at word 0xFFF.
        if self.flash_start != 0 {
            return invalid(format!("flash starts at 0x{:X}, not 0", self.flash_start));
        }
        if self.flash_words() != 0x1000 {
            return invalid(format!(
                "boot loader sections need 4096 flash words, got {}",
                self.flash_words()
            ));
        }
        if self.ram_end < self.ram_start {
            return invalid("RAM end is below RAM start".to_string());
        }
        if self.eeprom_end < self.eeprom_start {
            return invalid("EEPROM end is below EEPROM start".to_string());
        }
        Ok(())
    }
}

pub trait McuModel {
    fn descriptor() -> DeviceDescriptor;
}

pub struct Atmega8a;

impl McuModel for Atmega8a {
    fn descriptor() -> DeviceDescriptor {
        DeviceDescriptor {
            name: "atmega8a",

            flash_start: 0x0000,
            flash_end: 0x1FFF,
            flash_page_size: 64,

            ram_start: 0x0060,
            ram_end: 0x045F,
            ram_size: 1024,

            eeprom_start: 0x0000,
            eeprom_end: 0x01FF,
            eeprom_size: 512,
            eeprom_page_size: 4,

            // 1024-word boot section, internal RC at 1 MHz
            default_fuse_high: 0xD9,
            default_fuse_low: 0xE1,
        }
    }
}

/// Device name tag, selecting a [McuModel].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceVariant {
    Atmega8a,
}

impl DeviceVariant {
    pub fn descriptor(self) -> DeviceDescriptor {
        match self {
            DeviceVariant::Atmega8a => Atmega8a::descriptor(),
        }
    }
}

impl FromStr for DeviceVariant {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atmega8a" => Ok(DeviceVariant::Atmega8a),
            _ => Err(ConfigurationError::UnknownDevice(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atmega8a_geometry_is_valid() {
        let d = Atmega8a::descriptor();
        assert_eq!(d.validate(), Ok(()));
        assert_eq!(d.flash_words(), 4096);
        assert_eq!((d.ram_end - d.ram_start + 1), d.ram_size);
        assert_eq!((d.eeprom_end - d.eeprom_start + 1), d.eeprom_size);
    }

    #[test]
    fn rejects_inverted_flash_bounds() {
        let mut d = Atmega8a::descriptor();
        d.flash_start = 0x2000;
        assert!(matches!(d.validate(), Err(ConfigurationError::InvalidGeometry(_))));
    }

    #[test]
    fn rejects_odd_flash_size() {
        let mut d = Atmega8a::descriptor();
        d.flash_end = 0x2000;
        assert!(matches!(d.validate(), Err(ConfigurationError::InvalidGeometry(_))));
    }

    #[test]
    fn rejects_flash_smaller_than_boot_section() {
        let mut d = Atmega8a::descriptor();
        d.flash_end = 0x0FFF;
        assert!(matches!(d.validate(), Err(ConfigurationError::InvalidGeometry(_))));
    }

    #[test]
    fn rejects_flash_larger_than_fuse_map() {
        let mut d = Atmega8a::descriptor();
        d.flash_end = 0x3FFF;
        assert!(matches!(d.validate(), Err(ConfigurationError::InvalidGeometry(_))));
    }

    #[test]
    fn rejects_flash_not_at_zero() {
        let mut d = Atmega8a::descriptor();
        d.flash_start = 0x0100;
        d.flash_end = 0x20FF;
        assert!(matches!(d.validate(), Err(ConfigurationError::InvalidGeometry(_))));
    }

    #[test]
    fn variant_from_name() {
        assert_eq!("atmega8a".parse::<DeviceVariant>(), Ok(DeviceVariant::Atmega8a));
        assert_eq!("ATmega8A".parse::<DeviceVariant>(), Ok(DeviceVariant::Atmega8a));
        assert_eq!(
            "atmega2560".parse::<DeviceVariant>(),
            Err(ConfigurationError::UnknownDevice("atmega2560".to_string()))
        );
    }
}
