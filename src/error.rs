//! Error types for device bring-up and image loading.

use std::io;

use thiserror::Error;

/// Invalid or inconsistent device configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// An internal clock source was selected while CKOPT is programmed
    #[error("CKOPT must be unprogrammed for internal clock")]
    CkoptProgrammed,

    /// Device descriptor geometry is not self-consistent
    #[error("Invalid device geometry: {0}")]
    InvalidGeometry(String),

    /// No descriptor is known under this name
    #[error("Unknown device: {0}")]
    UnknownDevice(String),
}

/// Caller-supplied program memory does not match the device flash.
#[derive(Debug, Error, PartialEq, Eq)]
#[error(
    "Program memory is limited by {} words ({} KiB), {} words ({}.{:03} KiB) doesn't match",
    .expected_words,
    .expected_words * 2 / 1024,
    .actual_words,
    .actual_words * 2 / 1024,
    .actual_words * 2 % 1024
)]
pub struct SizeMismatch {
    pub expected_words: usize,
    pub actual_words: usize,
}

/// Failure while tokenizing a hex image.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Line {line}: record doesn't start with ':'")]
    MissingStartCode { line: usize },

    #[error("Line {line}: invalid hex digits")]
    InvalidHex { line: usize },

    #[error("Line {line}: record is too short")]
    TooShort { line: usize },

    #[error("Line {line}: record declares {declared} data bytes, got {actual}")]
    LengthMismatch {
        line: usize,
        declared: u8,
        actual: usize,
    },
}

/// Failure while loading a program image into flash.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Program memory has not been bound to the device
    #[error("Program memory is not bound")]
    Unbound,

    /// A data record reaches past the end of flash
    #[error("Record at 0x{address:04X} ({len} bytes) doesn't fit into flash")]
    OutOfBounds { address: u32, len: usize },

    /// A data record carries more bytes than its length field can encode
    #[error("Record at 0x{address:04X} has {len} data bytes, at most 255 fit")]
    RecordTooLong { address: u32, len: usize },

    /// Verification found memory that doesn't match the image
    #[error(
        "Checksum is not correct at 0x{address:04X}: 0x{computed:02X} (memory) != 0x{expected:02X} (file)"
    )]
    ChecksumMismatch {
        address: u32,
        expected: u8,
        computed: u8,
    },

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// The requested operation isn't implemented for this device.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Not supported: {0}")]
pub struct Unsupported(pub &'static str);
