//! Per-field validation messages for the log-in and registration forms.

use std::collections::BTreeMap;

use email_address::EmailAddress;

/// Shown under any field left empty.
pub const REQUIRED: &str = "Required";
/// Shown under an email field that is not a valid address.
pub const INVALID_EMAIL: &str = "Invalid email";

/// The validation message for each invalid field, keyed by the field name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record [REQUIRED] for `field` if `value` is blank.
    ///
    /// Returns whether the value was present.
    pub fn require(&mut self, field: &'static str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, REQUIRED);
            return false;
        }

        true
    }

    /// Record [REQUIRED] or [INVALID_EMAIL] for `field` as appropriate.
    pub fn require_email(&mut self, field: &'static str, value: &str) {
        if self.require(field, value) && !EmailAddress::is_valid(value.trim()) {
            self.add(field, INVALID_EMAIL);
        }
    }

    /// Record `message` for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
