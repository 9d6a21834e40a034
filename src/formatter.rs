//! Output line formatter

use crate::codec::base64_to_hex;
use crate::error::Base64Error;
use crate::record::{Field, RecordFields};
use crate::selection::{OutputSelection, PasswordFormat};

/// Turns one tokenized record into a tab-separated output line
#[derive(Debug, Clone)]
pub struct RecordFormatter {
    selection: OutputSelection,
}

impl RecordFormatter {
    /// Create a formatter for the given selection
    pub fn new(selection: OutputSelection) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> &OutputSelection {
        &self.selection
    }

    /// Format `record` into `line`, replacing its previous contents.
    ///
    /// Returns `Ok(true)` if the line should be written, in which case
    /// `line` ends with a newline. Returns `Ok(false)` when the record is
    /// suppressed: every selected field is empty, or `require_all` is set
    /// and one of them is. A password that fails to decode as hex yields an
    /// error and leaves `line` empty.
    pub fn format_into(
        &self,
        record: &[u8],
        fields: &RecordFields,
        line: &mut Vec<u8>,
    ) -> Result<bool, Base64Error> {
        line.clear();

        // Set once a selected field has been visited, empty or not, so
        // columns stay aligned
        let mut separator = false;
        let mut not_empty = false;
        let mut suppressed = false;

        for field in Field::ALL {
            if !self.selection.is_selected(field) {
                continue;
            }
            if separator {
                line.push(b'\t');
            }

            let value = fields[field].slice(record);
            if value.is_empty() {
                if self.selection.require_all {
                    suppressed = true;
                }
            } else {
                not_empty = true;
                match field {
                    Field::Password if self.selection.password == Some(PasswordFormat::Hex) => {
                        if let Err(err) = base64_to_hex(value, line) {
                            line.clear();
                            return Err(err);
                        }
                    }
                    // Hints are the only field with embedded tabs
                    Field::Hint if separator => {
                        line.extend(value.iter().map(|&b| if b == b'\t' { b' ' } else { b }));
                    }
                    _ => line.extend_from_slice(value),
                }
            }
            separator = true;
        }

        if suppressed || !not_empty {
            line.clear();
            return Ok(false);
        }
        line.push(b'\n');
        Ok(true)
    }

    /// Format `record` into a fresh line, `None` if it is suppressed
    pub fn format(&self, record: &[u8], fields: &RecordFields) -> Result<Option<Vec<u8>>, Base64Error> {
        let mut line = Vec::new();
        let emit = self.format_into(record, fields, &mut line)?;
        Ok(emit.then_some(line))
    }
}
