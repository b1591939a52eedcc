//! Setup and lock-screen input boundary.
//!
//! Input is rejected here, before the controller is ever called. Password
//! fields only take characters typed one at a time: paste is refused as a
//! deliberate bit of friction.

use chrono::{DateTime, TimeZone};

use crate::error::{Result, ValidationError};
use crate::lock::{LockController, Schedule};

/// Required unlock password length.
pub const PASSWORD_LENGTH: usize = 12;
/// Cutoff prefilled in the setup form.
pub const DEFAULT_CUTOFF: &str = "17:00";

/// A keystroke-driven text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedField {
    value: String,
    paste_protected: bool,
}

impl TypedField {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field that refuses clipboard paste.
    pub fn protected() -> Self {
        Self {
            value: String::new(),
            paste_protected: true,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_paste_protected(&self) -> bool {
        self.paste_protected
    }

    pub fn type_char(&mut self, c: char) {
        if !c.is_control() {
            self.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Insert pasted text, or refuse it on a protected field.
    pub fn paste(&mut self, text: &str) -> Result<(), ValidationError> {
        if self.paste_protected {
            return Err(ValidationError::PasteRejected);
        }
        self.value.extend(text.chars().filter(|c| !c.is_control()));
        Ok(())
    }

    /// Take the value out, leaving the field empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.value)
    }
}

/// Raw values of the setup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm<'a> {
    pub cutoff: &'a str,
    pub password: &'a str,
}

impl SetupForm<'_> {
    /// Check the form and produce what `LockController::start` needs.
    pub fn validate(
        &self,
        required_len: usize,
    ) -> Result<(Schedule, String), ValidationError> {
        let actual = self.password.chars().count();
        if actual != required_len {
            return Err(ValidationError::PasswordLength {
                expected: required_len,
                actual,
            });
        }
        let schedule: Schedule = self.cutoff.parse()?;
        Ok((schedule, self.password.to_string()))
    }

    /// Validate the form and arm `controller` with it, relative to `now`.
    ///
    /// The controller is left untouched when validation fails.
    pub fn arm<Tz: TimeZone>(
        &self,
        controller: &mut LockController,
        required_len: usize,
        now: &DateTime<Tz>,
    ) -> Result<Schedule> {
        let (schedule, password) = self.validate(required_len)?;
        controller.start_at(schedule, password, now)?;
        Ok(schedule)
    }
}
