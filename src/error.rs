//! Error types

use crate::record::Field;

/// Error type for password field decoding
///
/// Always recoverable: the offending record is dropped and extraction
/// continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base64Error {
    /// Length after stripping padding is 1 mod 4
    InvalidLength { len: usize },

    /// Field consists of padding only
    Empty,

    /// Byte outside the base64 alphabet (or `=` before the end)
    InvalidByte { byte: u8, position: usize },

    /// Unused low bits of the final partial group are not zero
    NonZeroPadding,
}

impl std::fmt::Display for Base64Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Base64Error::InvalidLength { len } => {
                write!(f, "Invalid base64 length: {} (length mod 4 is 1)", len)
            }
            Base64Error::Empty => {
                write!(f, "Base64 data contains only padding")
            }
            Base64Error::InvalidByte { byte, position } => {
                write!(f, "Invalid base64 byte 0x{:02x} at position {}", byte, position)
            }
            Base64Error::NonZeroPadding => {
                write!(f, "Non-zero padding bits in final base64 group")
            }
        }
    }
}

impl std::error::Error for Base64Error {}

/// Error type for stream-level failures
///
/// Any of these means the input is not in the expected record format and
/// extraction stops.
#[derive(Debug)]
pub enum ParseError {
    /// Record grew past the maximum length without a `|--` sentinel
    RecordTooLong { record: usize, offset: u64 },

    /// No `-|-` delimiter after the given field
    MissingDelimiter { record: usize, field: Field },

    /// I/O error on the input or output stream
    Io(std::io::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::RecordTooLong { record, offset } => {
                write!(f, "Record {} at byte offset {} is too long (no sentinel found)", record, offset)
            }
            ParseError::MissingDelimiter { record, field } => {
                write!(f, "Record {} has no delimiter after the {} field", record, field)
            }
            ParseError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io(err)
    }
}

/// Error type for field selection strings like `001200`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// More than six positions
    TooLong { len: usize },

    /// Digit not allowed at this position
    InvalidDigit { position: usize, digit: char },
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::TooLong { len } => {
                write!(f, "Field selection has {} positions, at most 6 are allowed", len)
            }
            SelectionError::InvalidDigit { position, digit } => {
                write!(f, "Invalid digit '{}' at position {} of field selection", digit, position + 1)
            }
        }
    }
}

impl std::error::Error for SelectionError {}
