//! Program memory binding and HEX image loading.

use log::{debug, error, info};

use crate::error::{LoadError, SizeMismatch};
use crate::ihex::{HexRecord, RecordSource, RecordType, MAX_DATA_LEN};

use super::device::DeviceState;

/// Writes `data` into little-endian words, starting at byte `offset`.
fn write_bytes(mem: &mut [u16], offset: usize, data: &[u8]) {
    for (i, &b) in data.iter().enumerate() {
        let byte = offset + i;
        let word = &mut mem[byte / 2];
        *word = if byte % 2 == 0 {
            (*word & 0xFF00) | b as u16
        } else {
            (*word & 0x00FF) | (b as u16) << 8
        };
    }
}

fn read_bytes(mem: &[u16], offset: usize, len: usize) -> Vec<u8> {
    (offset..offset + len)
        .map(|byte| {
            let word = mem[byte / 2];
            if byte % 2 == 0 { word as u8 } else { (word >> 8) as u8 }
        })
        .collect()
}

/// Byte offset of a record in program memory, checked against its size.
fn record_offset(mem: &[u16], rec: &HexRecord) -> Result<usize, LoadError> {
    if rec.data.len() > MAX_DATA_LEN {
        return Err(LoadError::RecordTooLong {
            address: rec.address,
            len: rec.data.len(),
        });
    }
    // Only the low 16 bits of the address are encoded. Records land on word boundaries.
    let offset = ((rec.address & 0xFFFF) as usize / 2) * 2;
    if offset + rec.data.len() > mem.len() * 2 {
        return Err(LoadError::OutOfBounds {
            address: rec.address,
            len: rec.data.len(),
        });
    }
    Ok(offset)
}

impl DeviceState {
    /// Binds `mem` as program memory. It must hold exactly one word per flash word.
    pub fn bind_program_memory(&mut self, mem: Vec<u16>) -> Result<(), SizeMismatch> {
        let flash_size = self.flash_words();
        if mem.len() != flash_size {
            return Err(SizeMismatch {
                expected_words: flash_size,
                actual_words: mem.len(),
            });
        }
        self.program_memory = Some(mem);
        Ok(())
    }

    /// Takes program memory back from the device.
    pub fn unbind_program_memory(&mut self) -> Option<Vec<u16>> {
        self.program_memory.take()
    }

    /// Copies every data record into program memory, then rewinds `source`
    /// and checks each record against what memory now holds.
    ///
    /// Stops at the first mismatch. Whatever was copied stays in memory.
    pub fn load_program_image<S: RecordSource>(&mut self, source: &mut S) -> Result<(), LoadError> {
        let mem = self.program_memory.as_mut().ok_or(LoadError::Unbound)?;

        let mut records = 0usize;
        let mut bytes = 0usize;
        while let Some(rec) = source.next_record() {
            let rec = rec?;
            match rec.record_type {
                RecordType::Data => {
                    let offset = record_offset(mem, &rec)?;
                    write_bytes(mem, offset, &rec.data);
                    records += 1;
                    bytes += rec.data.len();
                }
                RecordType::EndOfFile | RecordType::Other(_) => continue,
            }
        }
        debug!("Merged {} data records ({} bytes) into flash", records, bytes);

        source.rewind()?;
        while let Some(rec) = source.next_record() {
            let rec = rec?;
            if rec.record_type != RecordType::Data {
                continue;
            }

            let offset = record_offset(mem, &rec)?;
            let mem_rec = HexRecord::new(
                rec.address,
                read_bytes(mem, offset, rec.data.len()),
                rec.record_type,
            );
            if mem_rec.checksum != rec.checksum {
                error!(
                    "Checksum is not correct: 0x{:02X} (memory) != 0x{:02X} (file)",
                    mem_rec.checksum, rec.checksum
                );
                error!("File record:   {}", rec);
                error!("Memory record: {}", mem_rec);
                return Err(LoadError::ChecksumMismatch {
                    address: rec.address,
                    expected: rec.checksum,
                    computed: mem_rec.checksum,
                });
            }
        }

        info!("Loaded and verified {} bytes of {} flash", bytes, self.name());
        Ok(())
    }
}
