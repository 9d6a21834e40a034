//! # cred-dump
//!
//! Streaming field extractor for pipe-delimited credential dumps.
//!
//! ## Record Format
//!
//! Each record holds five fields separated by `-|-` and ends with `|--`:
//!
//! ```text
//! 1-|-John-|-j@x.com-|-aGVsbG8=-|-hint text|--
//! ```
//!
//! The fields are id, name, email, password (base64) and hint. A record may
//! be split over several lines; line breaks are dropped before the sentinel
//! check. A record is at most 1023 bytes long.
//!
//! ## Output
//!
//! One line per record with the selected fields joined by tabs. The
//! password is decoded to lowercase hex by default, or written as stored.
//!
//! ```
//! use cred_dump::{Extractor, OutputSelection};
//!
//! let input = "1-|-John-|-j@x.com-|-aGVsbG8=-|-|--\n";
//! let mut out = Vec::new();
//! let selection = OutputSelection::default().with_email(true);
//! Extractor::new(selection).run(input.as_bytes(), &mut out, std::io::sink()).unwrap();
//! assert_eq!(out, b"j@x.com\t68656c6c6f\n");
//! ```
//!
//! ## Delimiter Ambiguity
//!
//! Fields are not escaped, so `-|-` can appear inside a field. The first
//! delimiter after a field start always wins; see [`record`] for the one
//! known record shape this splits differently than intended.
//!
//! ## Errors
//!
//! - A password that is not valid base64 drops only that record
//!   ([`Base64Error`]).
//! - An overlong record or a missing delimiter stops extraction
//!   ([`ParseError`]).

pub mod codec;
pub mod error;
pub mod extractor;
pub mod formatter;
pub mod reader;
pub mod record;
pub mod selection;

pub use codec::{base64_to_hex, decode_to_hex};
pub use error::{Base64Error, ParseError, SelectionError};
pub use extractor::{ExtractStats, Extractor};
pub use formatter::RecordFormatter;
pub use reader::{RecordRead, RecordReader};
pub use record::{
    next_field_end, Field, FieldSpan, RecordFields,
    DELIMITER, SENTINEL, MAX_RECORD_LEN,
};
pub use selection::{OutputSelection, PasswordFormat};
