//! Record layout and field tokenizer
//!
//! A record looks like
//!
//! ```text
//! id-|-name-|-email-|-password-|-hint|--
//! ```
//!
//! Fields are not escaped, so the delimiter can also show up inside field
//! content. The tokenizer always takes the first `-|-` it finds after the
//! field start. One known record shape is split "wrong" because of this:
//!
//! ```text
//! 141660212-|--|-|--mr0@mail.com-|-EQQ=-|-|--
//! ```
//!
//! parses as id `141660212`, name ``, email `|--mr0@mail.com`, while the
//! intended split was probably name `-|` and email `-mr0@mail.com`. That
//! output is what existing consumers have, so it stays.

use crate::error::ParseError;
use std::ops::{Index, Range};

/// Field delimiter
pub const DELIMITER: &[u8; 3] = b"-|-";
/// Record terminator
pub const SENTINEL: &[u8; 3] = b"|--";
pub const DELIMITER_LEN: usize = 3;
pub const SENTINEL_LEN: usize = 3;
/// Maximum record length in bytes, sentinel included
pub const MAX_RECORD_LEN: usize = 1023;

/// The five fields of a record, in record order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Email,
    Password,
    Hint,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Id, Field::Name, Field::Email, Field::Password, Field::Hint];

    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
            Field::Hint => "hint",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Location of one field inside a record buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSpan {
    pub start: usize,
    pub len: usize,
}

impl FieldSpan {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Borrow the field bytes from the record this span was split from
    pub fn slice<'a>(&self, record: &'a [u8]) -> &'a [u8] {
        &record[self.range()]
    }
}

/// Find the start of the field following the one at `search_start`.
///
/// Returns the position just past the first `-|-` whose first byte is at or
/// after `search_start`, or `None` if there is none.
pub fn next_field_end(record: &[u8], search_start: usize) -> Option<usize> {
    record
        .get(search_start..)?
        .windows(DELIMITER_LEN)
        .position(|window| window == DELIMITER)
        .map(|offset| search_start + offset + DELIMITER_LEN)
}

/// Field spans of one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordFields {
    spans: [FieldSpan; 5],
}

impl RecordFields {
    /// Split a sentinel-terminated record into its five fields.
    ///
    /// `record_index` is only used for error reporting.
    pub fn split(record: &[u8], record_index: usize) -> Result<Self, ParseError> {
        let mut spans = [FieldSpan::default(); 5];
        let mut start = 0;

        for field in [Field::Id, Field::Name, Field::Email, Field::Password] {
            let next = next_field_end(record, start).ok_or(ParseError::MissingDelimiter {
                record: record_index,
                field,
            })?;
            spans[field.index()] = FieldSpan::new(start, next - start - DELIMITER_LEN);
            start = next;
        }

        // Hint runs up to the sentinel; the last delimiter may overlap it
        let end = record.len().saturating_sub(SENTINEL_LEN);
        spans[Field::Hint.index()] = FieldSpan::new(start, end.saturating_sub(start));

        Ok(Self { spans })
    }

    pub fn get(&self, field: Field) -> FieldSpan {
        self.spans[field.index()]
    }
}

impl Index<Field> for RecordFields {
    type Output = FieldSpan;

    fn index(&self, field: Field) -> &FieldSpan {
        &self.spans[field.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_of(record: &[u8]) -> Vec<&[u8]> {
        let fields = RecordFields::split(record, 0).unwrap();
        Field::ALL.iter().map(|&f| fields[f].slice(record)).collect()
    }

    #[test]
    fn test_next_field_end() {
        let record = b"12-|-bob-|-";
        assert_eq!(next_field_end(record, 0), Some(5));
        assert_eq!(next_field_end(record, 5), Some(11));
        assert_eq!(next_field_end(record, 11), None);
        assert_eq!(next_field_end(record, 100), None);
    }

    #[test]
    fn test_delimiter_at_search_start() {
        assert_eq!(next_field_end(b"-|-x", 0), Some(3));
    }

    #[test]
    fn test_split_simple_record() {
        let record = b"1-|-John-|-j@x.com-|-aGVsbG8=-|-likes tea|--";
        let fields = fields_of(record);
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], b"1");
        assert_eq!(fields[1], b"John");
        assert_eq!(fields[2], b"j@x.com");
        assert_eq!(fields[3], b"aGVsbG8=");
        assert_eq!(fields[4], b"likes tea");
    }

    #[test]
    fn test_split_empty_fields() {
        let record = b"7-|--|--|-pw-|-|--";
        let fields = RecordFields::split(record, 0).unwrap();
        assert!(!fields[Field::Id].is_empty());
        assert!(fields[Field::Name].is_empty());
        assert!(fields[Field::Email].is_empty());
        assert_eq!(fields[Field::Password].slice(record), b"pw");
        assert!(fields[Field::Hint].is_empty());
    }

    #[test]
    fn test_first_delimiter_wins() {
        let record = b"141660212-|--|-|--mr0@mail.com-|-EQQ=-|-|--";
        let fields = fields_of(record);
        assert_eq!(fields[0], b"141660212");
        assert_eq!(fields[1], b"");
        assert_eq!(fields[2], b"|--mr0@mail.com");
        assert_eq!(fields[3], b"EQQ=");
        assert_eq!(fields[4], b"");
    }

    #[test]
    fn test_hint_overlapping_sentinel_is_empty() {
        // Last delimiter shares its trailing '-' with the sentinel
        let record = b"1-|-a-|-b-|-c-|--";
        let fields = RecordFields::split(record, 0).unwrap();
        assert_eq!(fields[Field::Password].slice(record), b"c");
        assert!(fields[Field::Hint].is_empty());
    }

    #[test]
    fn test_missing_delimiter() {
        let err = RecordFields::split(b"1-|-John-|-j@x.com|--", 4).unwrap_err();
        match err {
            ParseError::MissingDelimiter { record, field } => {
                assert_eq!(record, 4);
                assert_eq!(field, Field::Email);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_sentinel_only_record() {
        assert!(RecordFields::split(b"123|--", 0).is_err());
    }
}
