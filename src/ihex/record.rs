use std::fmt;

/// Type of an Intel HEX record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Data,
    EndOfFile,
    /// Any other record type. Carried through but never acted upon.
    Other(u8),
}

impl From<u8> for RecordType {
    fn from(code: u8) -> RecordType {
        match code {
            0x00 => RecordType::Data,
            0x01 => RecordType::EndOfFile,
            other => RecordType::Other(other),
        }
    }
}

impl From<RecordType> for u8 {
    fn from(t: RecordType) -> u8 {
        match t {
            RecordType::Data => 0x00,
            RecordType::EndOfFile => 0x01,
            RecordType::Other(code) => code,
        }
    }
}

/// Largest payload a record can declare in its one-byte length field.
pub const MAX_DATA_LEN: usize = 255;

/// One parsed record of a hex image.
///
/// `data` holds at most [MAX_DATA_LEN] bytes. Longer payloads can be built by
/// hand, but their length and checksum wrap and the loader rejects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRecord {
    /// Byte offset within the target memory. Only the low 16 bits are encoded.
    pub address: u32,
    pub data: Vec<u8>,
    pub record_type: RecordType,
    /// Checksum as it was written in the image.
    pub checksum: u8,
}

impl HexRecord {
    /// Builds a record with a freshly computed checksum.
    pub fn new(address: u32, data: Vec<u8>, record_type: RecordType) -> HexRecord {
        let checksum = checksum(address, &data, record_type);
        HexRecord { address, data, record_type, checksum }
    }

    pub fn data_len(&self) -> u8 {
        self.data.len() as u8
    }

    /// Checksum recomputed from the record fields.
    pub fn computed_checksum(&self) -> u8 {
        checksum(self.address, &self.data, self.record_type)
    }

    /// Returns `true` if the stored checksum matches the record fields.
    pub fn is_valid(&self) -> bool {
        self.checksum == self.computed_checksum()
    }
}

/// Intel HEX checksum: two's complement of the low byte of the sum of the
/// length, address (high, low), type and data bytes.
pub fn checksum(address: u32, data: &[u8], record_type: RecordType) -> u8 {
    let [hi, lo] = (address as u16).to_be_bytes();
    let sum = data
        .iter()
        .fold(
            (data.len() as u8)
                .wrapping_add(hi)
                .wrapping_add(lo)
                .wrapping_add(record_type.into()),
            |acc, &b| acc.wrapping_add(b),
        );
    sum.wrapping_neg()
}

/// Prints the record as a line of Intel HEX.
impl fmt::Display for HexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ":{:02X}{:04X}{:02X}",
            self.data_len(),
            self.address as u16,
            u8::from(self.record_type)
        )?;
        for b in &self.data {
            write!(f, "{:02X}", b)?;
        }
        write!(f, "{:02X}", self.checksum)
    }
}
