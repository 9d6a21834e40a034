//! Record reader
//!
//! Records may span several physical lines. Line terminators are dropped
//! and the lines are concatenated until the accumulated text ends with the
//! `|--` sentinel.

use crate::error::ParseError;
use crate::record::{MAX_RECORD_LEN, SENTINEL};
use std::io::{BufRead, Read};
use tracing::trace;

/// Outcome of a successful [`RecordReader::next_record`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRead {
    /// A complete record of this many bytes, sentinel included
    Record(usize),
    /// Input ended; `trailing` bytes of an unterminated record were read
    EndOfStream { trailing: usize },
}

/// Reads sentinel-terminated records from a buffered byte stream
pub struct RecordReader<R> {
    inner: R,
    buf: Vec<u8>,
    records: usize,
    offset: u64,
    record_offset: u64,
}

impl<R: BufRead> RecordReader<R> {
    /// Create a new reader
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(MAX_RECORD_LEN),
            records: 0,
            offset: 0,
            record_offset: 0,
        }
    }

    /// Read the next record into the internal buffer.
    ///
    /// The record is available through [`record`](Self::record) until the
    /// next call.
    pub fn next_record(&mut self) -> Result<RecordRead, ParseError> {
        self.buf.clear();
        self.record_offset = self.offset;

        while self.buf.len() < MAX_RECORD_LEN {
            // Never read past the cap, even in the middle of a line
            let remaining = (MAX_RECORD_LEN - self.buf.len()) as u64;
            let n = (&mut self.inner).take(remaining).read_until(b'\n', &mut self.buf)?;
            if n == 0 {
                return Ok(RecordRead::EndOfStream { trailing: self.buf.len() });
            }
            self.offset += n as u64;

            while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
                self.buf.pop();
            }

            if self.buf.ends_with(SENTINEL) {
                trace!(record = self.records, len = self.buf.len(), "record read");
                self.records += 1;
                return Ok(RecordRead::Record(self.buf.len()));
            }
        }

        Err(ParseError::RecordTooLong {
            record: self.records,
            offset: self.record_offset,
        })
    }

    /// Bytes of the last record read
    pub fn record(&self) -> &[u8] {
        &self.buf
    }

    /// Number of complete records returned so far
    pub fn records_read(&self) -> usize {
        self.records
    }

    /// Byte offset in the input where the last record started
    pub fn record_offset(&self) -> u64 {
        self.record_offset
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> R {
        self.inner
    }
}
