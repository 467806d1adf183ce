use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::error::RecordError;

use super::{record::{HexRecord, RecordType}, RecordSource};

/// Line-oriented Intel HEX reader over any seekable buffered stream.
///
/// Checksums are parsed but not checked here, so a corrupted record still
/// reaches the loader, which catches it while verifying.
pub struct IhexReader<R: BufRead + Seek> {
    inner: R,
    line: usize,
    buf: String,
}

impl IhexReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        let file = File::open(path)?;
        Ok(IhexReader::new(BufReader::new(file)))
    }
}

impl<R: BufRead + Seek> IhexReader<R> {
    pub fn new(inner: R) -> IhexReader<R> {
        IhexReader {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of the last line read, starting from 1.
    pub fn line(&self) -> usize {
        self.line
    }
}

fn hex_byte(s: &[u8], line: usize) -> Result<u8, RecordError> {
    let digit = |c: u8| (c as char).to_digit(16).ok_or(RecordError::InvalidHex { line });
    Ok((digit(s[0])? << 4 | digit(s[1])?) as u8)
}

/// Parses one `:LLAAAATT<data>CC` line.
pub fn parse_record(text: &str, line: usize) -> Result<HexRecord, RecordError> {
    let body = text
        .strip_prefix(':')
        .ok_or(RecordError::MissingStartCode { line })?
        .as_bytes();
    if body.len() % 2 != 0 {
        return Err(RecordError::InvalidHex { line });
    }
    // length, two address bytes, type and checksum
    if body.len() < 10 {
        return Err(RecordError::TooShort { line });
    }

    let bytes = body
        .chunks(2)
        .map(|pair| hex_byte(pair, line))
        .collect::<Result<Vec<u8>, _>>()?;

    let declared = bytes[0];
    let data = &bytes[4..bytes.len() - 1];
    if data.len() != declared as usize {
        return Err(RecordError::LengthMismatch {
            line,
            declared,
            actual: data.len(),
        });
    }

    Ok(HexRecord {
        address: u16::from_be_bytes([bytes[1], bytes[2]]) as u32,
        data: data.to_vec(),
        record_type: RecordType::from(bytes[3]),
        checksum: bytes[bytes.len() - 1],
    })
}

impl<R: BufRead + Seek> RecordSource for IhexReader<R> {
    fn next_record(&mut self) -> Option<Result<HexRecord, RecordError>> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;

            let text = self.buf.trim_end_matches(&['\r', '\n'][..]);
            if text.trim().is_empty() {
                continue;
            }
            return Some(parse_record(text, self.line));
        }
    }

    fn rewind(&mut self) -> Result<(), RecordError> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.line = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const BLINK: &str = "\
:1000000012C019C018C017C016C015C014C013C044
:1000100012C011C010C00FC00EC00DC00CC00BC06C
:0400200011241FBECA
:00000001FF
";

    fn collect<S: RecordSource>(source: &mut S) -> Vec<HexRecord> {
        let mut v = Vec::new();
        while let Some(rec) = source.next_record() {
            v.push(rec.unwrap());
        }
        v
    }

    #[test]
    fn reads_all_records() {
        let mut reader = IhexReader::new(Cursor::new(BLINK));
        let records = collect(&mut reader);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].address, 0x0000);
        assert_eq!(records[0].data_len(), 16);
        assert_eq!(records[0].data[..2], [0x12, 0xC0]);
        assert_eq!(records[2].address, 0x0020);
        assert_eq!(records[2].data, vec![0x11, 0x24, 0x1F, 0xBE]);
        assert_eq!(records[3].record_type, RecordType::EndOfFile);
        assert!(records.iter().all(|r| r.is_valid()));
    }

    #[test]
    fn display_round_trips_lines() {
        let mut reader = IhexReader::new(Cursor::new(BLINK));
        let printed: Vec<String> = collect(&mut reader).iter().map(|r| r.to_string()).collect();
        let lines: Vec<&str> = BLINK.lines().collect();
        assert_eq!(printed, lines);
    }

    #[test]
    fn rewind_restarts_from_first_record() {
        let mut reader = IhexReader::new(Cursor::new(BLINK));
        let first = collect(&mut reader);
        assert_eq!(reader.line(), 4);
        reader.rewind().unwrap();
        assert_eq!(reader.line(), 0);
        assert_eq!(collect(&mut reader), first);
    }

    #[test]
    fn skips_blank_lines_and_crlf() {
        let text = ":0400200011241FBECA\r\n\r\n:00000001FF\r\n";
        let mut reader = IhexReader::new(Cursor::new(text));
        let records = collect(&mut reader);
        assert_eq!(records.len(), 2);
        assert_eq!(reader.line(), 3);
    }

    #[test]
    fn keeps_wrong_checksum() {
        let rec = parse_record(":0400200011241FBE00", 1).unwrap();
        assert_eq!(rec.checksum, 0x00);
        assert!(!rec.is_valid());
    }

    #[test]
    fn reports_malformed_lines() {
        assert!(matches!(
            parse_record("0400200011241FBECA", 7),
            Err(RecordError::MissingStartCode { line: 7 })
        ));
        assert!(matches!(
            parse_record(":04002000112G1FBECA", 2),
            Err(RecordError::InvalidHex { line: 2 })
        ));
        assert!(matches!(
            parse_record(":0400200011241FBEC", 2),
            Err(RecordError::InvalidHex { line: 2 })
        ));
        assert!(matches!(
            parse_record(":000000", 3),
            Err(RecordError::TooShort { line: 3 })
        ));
        assert!(matches!(
            parse_record(":0500200011241FBECA", 4),
            Err(RecordError::LengthMismatch { line: 4, declared: 5, actual: 4 })
        ));
    }

    #[test]
    fn error_carries_line_number() {
        let text = ":00000001FF\nnot a record\n";
        let mut reader = IhexReader::new(Cursor::new(text));
        assert!(reader.next_record().unwrap().is_ok());
        assert!(matches!(
            reader.next_record(),
            Some(Err(RecordError::MissingStartCode { line: 2 }))
        ));
    }
}
