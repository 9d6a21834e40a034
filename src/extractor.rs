//! Stream extraction driver

use crate::error::ParseError;
use crate::formatter::RecordFormatter;
use crate::reader::{RecordRead, RecordReader};
use crate::record::{RecordFields, MAX_RECORD_LEN};
use crate::selection::OutputSelection;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Counters for one extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Complete records read
    pub records: usize,
    /// Lines written to the output
    pub written: usize,
    /// Records with nothing to write or missing a required field
    pub suppressed: usize,
    /// Records dropped because the password was not valid base64
    pub bad_base64: usize,
    /// Bytes of an unterminated record at the end of the input
    pub trailing_bytes: usize,
}

/// Reads records, formats them and writes the selected fields
#[derive(Debug, Clone)]
pub struct Extractor {
    formatter: RecordFormatter,
}

impl Extractor {
    /// Create an extractor for the given selection
    pub fn new(selection: OutputSelection) -> Self {
        Self {
            formatter: RecordFormatter::new(selection),
        }
    }

    /// Process every record of `input`.
    ///
    /// Accepted lines go to `output`; one `Error: Bad base64 "<record>"`
    /// line per dropped record goes to `errors`. Stops at the first
    /// stream-level error without writing anything for the failing record.
    pub fn run<R, W, E>(&self, input: R, mut output: W, mut errors: E) -> Result<ExtractStats, ParseError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut reader = RecordReader::new(input);
        let mut line = Vec::with_capacity(MAX_RECORD_LEN * 2);
        let mut stats = ExtractStats::default();

        loop {
            match reader.next_record() {
                Ok(RecordRead::Record(_)) => {}
                Ok(RecordRead::EndOfStream { trailing }) => {
                    if trailing > 0 {
                        warn!(
                            offset = reader.record_offset(),
                            bytes = trailing,
                            "ignoring unterminated record at end of input"
                        );
                    }
                    stats.trailing_bytes = trailing;
                    break;
                }
                Err(err) => {
                    debug!(%err, "aborting extraction");
                    return Err(err);
                }
            }

            let index = stats.records;
            stats.records += 1;
            let record = reader.record();

            let fields = RecordFields::split(record, index).map_err(|err| {
                debug!(%err, offset = reader.record_offset(), "aborting extraction");
                err
            })?;

            match self.formatter.format_into(record, &fields, &mut line) {
                Ok(true) => {
                    output.write_all(&line)?;
                    stats.written += 1;
                }
                Ok(false) => stats.suppressed += 1,
                Err(err) => {
                    debug!(record = index, %err, "dropping record");
                    errors.write_all(b"Error: Bad base64 \"")?;
                    errors.write_all(record)?;
                    errors.write_all(b"\"\n")?;
                    stats.bad_base64 += 1;
                }
            }
        }

        info!(
            records = stats.records,
            written = stats.written,
            suppressed = stats.suppressed,
            bad_base64 = stats.bad_base64,
            "extraction finished"
        );
        Ok(stats)
    }

    /// Extract from the file at `input` into a newly created file at `output`
    ///
    /// Bad base64 diagnostics go to stderr.
    pub fn extract_file(&self, input: &Path, output: &Path) -> Result<ExtractStats> {
        let reader = File::open(input)
            .with_context(|| format!("Failed to open: {}", input.display()))?;
        let writer = File::create(output)
            .with_context(|| format!("Failed to create: {}", output.display()))?;

        let mut writer = BufWriter::new(writer);
        let stats = self
            .run(BufReader::new(reader), &mut writer, io::stderr().lock())
            .with_context(|| format!("{} is not in the expected record format", input.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write: {}", output.display()))?;

        Ok(stats)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(OutputSelection::default())
    }
}
