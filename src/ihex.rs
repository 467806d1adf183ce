//! Intel HEX records and the sources they are read from.

use mockall::*;

use crate::error::RecordError;

pub mod record;
pub mod reader;

pub use record::{checksum, HexRecord, RecordType, MAX_DATA_LEN};
pub use reader::IhexReader;

/// A rewindable, sequential source of hex records (can be mocked)
#[automock]
pub trait RecordSource {
    /// Next record in source order, or `None` once exhausted.
    fn next_record(&mut self) -> Option<Result<HexRecord, RecordError>>;
    /// Restarts the source from its first record.
    fn rewind(&mut self) -> Result<(), RecordError>;
}

/// Records kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<HexRecord>,
    cursor: usize,
}

impl MemorySource {
    pub fn new(records: Vec<HexRecord>) -> MemorySource {
        MemorySource { records, cursor: 0 }
    }

    pub fn records_mut(&mut self) -> &mut [HexRecord] {
        &mut self.records
    }
}

impl From<Vec<HexRecord>> for MemorySource {
    fn from(records: Vec<HexRecord>) -> MemorySource {
        MemorySource::new(records)
    }
}

impl RecordSource for MemorySource {
    fn next_record(&mut self) -> Option<Result<HexRecord, RecordError>> {
        let rec = self.records.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(Ok(rec))
    }

    fn rewind(&mut self) -> Result<(), RecordError> {
        self.cursor = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_rewinds() {
        let mut source = MemorySource::new(vec![
            HexRecord::new(0, vec![1, 2], RecordType::Data),
            HexRecord::new(0, vec![], RecordType::EndOfFile),
        ]);
        assert_eq!(source.next_record().unwrap().unwrap().record_type, RecordType::Data);
        assert!(source.next_record().is_some());
        assert!(source.next_record().is_none());
        source.rewind().unwrap();
        assert_eq!(source.next_record().unwrap().unwrap().data, vec![1, 2]);
    }
}
