//! Output field selection

use crate::error::SelectionError;
use crate::record::Field;
use std::str::FromStr;

/// How the password field is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordFormat {
    /// Decoded and written as lowercase hex
    Hex,
    /// Written as stored (base64)
    Base64,
}

/// Which fields to output and how
///
/// Built once before extraction starts and never changed afterwards.
/// The default writes the password as hex and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSelection {
    pub id: bool,
    pub name: bool,
    pub email: bool,
    pub password: Option<PasswordFormat>,
    pub hint: bool,
    /// Drop records where any selected field is empty
    pub require_all: bool,
}

impl Default for OutputSelection {
    fn default() -> Self {
        Self {
            id: false,
            name: false,
            email: false,
            password: Some(PasswordFormat::Hex),
            hint: false,
            require_all: false,
        }
    }
}

impl OutputSelection {
    /// Selection with no fields at all
    pub fn none() -> Self {
        Self {
            password: None,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, on: bool) -> Self {
        self.id = on;
        self
    }

    pub fn with_name(mut self, on: bool) -> Self {
        self.name = on;
        self
    }

    pub fn with_email(mut self, on: bool) -> Self {
        self.email = on;
        self
    }

    pub fn with_password(mut self, format: Option<PasswordFormat>) -> Self {
        self.password = format;
        self
    }

    pub fn with_hint(mut self, on: bool) -> Self {
        self.hint = on;
        self
    }

    pub fn with_require_all(mut self, on: bool) -> Self {
        self.require_all = on;
        self
    }

    /// Whether `field` is written
    pub fn is_selected(&self, field: Field) -> bool {
        match field {
            Field::Id => self.id,
            Field::Name => self.name,
            Field::Email => self.email,
            Field::Password => self.password.is_some(),
            Field::Hint => self.hint,
        }
    }

    /// Whether any field is written
    pub fn any_selected(&self) -> bool {
        Field::ALL.iter().any(|&f| self.is_selected(f))
    }
}

/// Parse a positional digit string such as `001200`.
///
/// | position | digit | meaning                     |
/// |----------|-------|-----------------------------|
/// | 1        | `1`   | id                          |
/// | 2        | `1`   | name                        |
/// | 3        | `1`   | email                       |
/// | 4        | `1`   | password as hex             |
/// | 4        | `2`   | password as base64          |
/// | 5        | `1`   | hint                        |
/// | 6        | `1`   | require all selected fields |
///
/// Missing trailing positions count as `0`. A string that selects no field
/// falls back to the password as hex.
impl FromStr for OutputSelection {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<char> = s.chars().collect();
        if digits.len() > 6 {
            return Err(SelectionError::TooLong { len: digits.len() });
        }

        let mut selection = OutputSelection::none();
        for (position, &digit) in digits.iter().enumerate() {
            let on = match (position, digit) {
                (_, '0') => false,
                (_, '1') => true,
                (3, '2') => {
                    selection.password = Some(PasswordFormat::Base64);
                    continue;
                }
                _ => return Err(SelectionError::InvalidDigit { position, digit }),
            };
            match position {
                0 => selection.id = on,
                1 => selection.name = on,
                2 => selection.email = on,
                3 => selection.password = on.then_some(PasswordFormat::Hex),
                4 => selection.hint = on,
                _ => selection.require_all = on,
            }
        }

        if !selection.any_selected() {
            selection.password = Some(PasswordFormat::Hex);
        }
        Ok(selection)
    }
}
