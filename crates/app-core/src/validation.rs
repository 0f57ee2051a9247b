//! Field validation
//!
//! This module provides the per-field rules used by every form in the app.
//! Each rule reports the first violated constraint as a [`ValidationError`]
//! whose `Display` output is the message shown under the field.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum full name length in characters
pub const MIN_NAME_LENGTH: usize = 3;

/// Validation errors
///
/// One variant per rule. The `Display` impl is the user-facing message.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationError {
    /// Email left blank
    #[error("Email is required")]
    EmailRequired,

    /// Email does not look like `local@domain.tld`
    #[error("Enter a valid email address")]
    EmailInvalid,

    /// Password left blank
    #[error("Password is required")]
    PasswordRequired,

    /// Password shorter than [`MIN_PASSWORD_LENGTH`]
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    /// Full name left blank
    #[error("Name is required")]
    NameRequired,

    /// Full name shorter than [`MIN_NAME_LENGTH`]
    #[error("Name is too short")]
    NameTooShort,

    /// Phone number left blank
    #[error("Phone number is required")]
    PhoneRequired,

    /// Phone number is not 10 to 13 digits with an optional leading `+`
    #[error("Enter a valid phone number")]
    PhoneInvalid,

    /// No wilaya selected, or the selection is not a known wilaya
    #[error("Please select a wilaya")]
    WilayaRequired,

    /// Driver license not attached
    #[error("Driver license is required")]
    DriverLicenseRequired,
}

/// Result type for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Form fields known to the validation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Email address
    Email,
    /// Account password
    Password,
    /// Renter full name
    FullName,
    /// Renter phone number
    PhoneNumber,
    /// Renter region
    Wilaya,
    /// Driver license attachment flag
    DriverLicense,
}

impl Field {
    /// Label shown above the input
    pub fn label(&self) -> &'static str {
        match self {
            Field::Email => "Email",
            Field::Password => "Password",
            Field::FullName => "Full Name",
            Field::PhoneNumber => "Phone Number",
            Field::Wilaya => "Wilaya",
            Field::DriverLicense => "Driver License",
        }
    }
}

/// Raw value collected from an input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text or a dropdown selection
    Text(String),
    /// Checkbox / attachment state
    Flag(bool),
}

impl FieldValue {
    /// Text content, empty for flags
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Flag(_) => "",
        }
    }

    /// Flag content, `false` for text
    pub fn as_flag(&self) -> bool {
        matches!(self, FieldValue::Flag(true))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

// =============================================================================
// Wilaya
// =============================================================================

/// Administrative regions offered in the renter form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wilaya {
    /// Algiers
    Algiers,
    /// Oran
    Oran,
    /// Blida
    Blida,
    /// Setif
    Setif,
    /// Constantine
    Constantine,
    /// Annaba
    Annaba,
    /// Tlemcen
    Tlemcen,
    /// Batna
    Batna,
}

impl Wilaya {
    /// All wilayas in dropdown order
    pub fn all() -> [Wilaya; 8] {
        [
            Wilaya::Algiers,
            Wilaya::Oran,
            Wilaya::Blida,
            Wilaya::Setif,
            Wilaya::Constantine,
            Wilaya::Annaba,
            Wilaya::Tlemcen,
            Wilaya::Batna,
        ]
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Wilaya::Algiers => "Algiers",
            Wilaya::Oran => "Oran",
            Wilaya::Blida => "Blida",
            Wilaya::Setif => "Setif",
            Wilaya::Constantine => "Constantine",
            Wilaya::Annaba => "Annaba",
            Wilaya::Tlemcen => "Tlemcen",
            Wilaya::Batna => "Batna",
        }
    }
}

impl fmt::Display for Wilaya {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Wilaya {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Wilaya::all()
            .into_iter()
            .find(|w| w.name() == s)
            .ok_or(ValidationError::WilayaRequired)
    }
}

// =============================================================================
// Rules
// =============================================================================

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?[0-9]{10,13}$").unwrap())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate an email address
///
/// # Example
///
/// ```
/// use app_core::validation::{validate_email, ValidationError};
///
/// assert!(validate_email("a@b.com").is_ok());
/// assert_eq!(validate_email("bad@x"), Err(ValidationError::EmailInvalid));
/// ```
pub fn validate_email(email: &str) -> Result<()> {
    if is_blank(email) {
        return Err(ValidationError::EmailRequired);
    }
    if !email_regex().is_match(email) {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<()> {
    if is_blank(password) {
        return Err(ValidationError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Validate a renter's full name
pub fn validate_full_name(name: &str) -> Result<()> {
    if is_blank(name) {
        return Err(ValidationError::NameRequired);
    }
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::NameTooShort);
    }
    Ok(())
}

/// Validate a phone number
pub fn validate_phone_number(phone: &str) -> Result<()> {
    if is_blank(phone) {
        return Err(ValidationError::PhoneRequired);
    }
    if !phone_regex().is_match(phone) {
        return Err(ValidationError::PhoneInvalid);
    }
    Ok(())
}

/// Validate a wilaya selection, returning the parsed region
pub fn validate_wilaya(selection: &str) -> Result<Wilaya> {
    if is_blank(selection) {
        return Err(ValidationError::WilayaRequired);
    }
    selection.parse()
}

/// Validate the driver license attachment flag
pub fn validate_driver_license(attached: bool) -> Result<()> {
    if attached {
        Ok(())
    } else {
        Err(ValidationError::DriverLicenseRequired)
    }
}

/// Validate any field by name
pub fn validate(field: Field, value: &FieldValue) -> Result<()> {
    match field {
        Field::Email => validate_email(value.as_text()),
        Field::Password => validate_password(value.as_text()),
        Field::FullName => validate_full_name(value.as_text()),
        Field::PhoneNumber => validate_phone_number(value.as_text()),
        Field::Wilaya => validate_wilaya(value.as_text()).map(|_| ()),
        Field::DriverLicense => validate_driver_license(value.as_flag()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_blank() {
        assert_eq!(validate_email(""), Err(ValidationError::EmailRequired));
        assert_eq!(validate_email("   "), Err(ValidationError::EmailRequired));
        assert_eq!(
            ValidationError::EmailRequired.to_string(),
            "Email is required"
        );
    }

    #[test]
    fn test_email_malformed() {
        for email in ["bad@x", "no-at-sign.com", "a@b.c", "a@@b.com", "a b@c.com", "@b.com"] {
            assert_eq!(
                validate_email(email),
                Err(ValidationError::EmailInvalid),
                "{email} should be rejected"
            );
        }
        assert_eq!(
            ValidationError::EmailInvalid.to_string(),
            "Enter a valid email address"
        );
    }

    #[test]
    fn test_email_valid() {
        for email in ["a@b.com", "john.doe+cars@mail.example.dz", "X_Y%z@host-1.io"] {
            assert!(validate_email(email).is_ok(), "{email} should be accepted");
        }
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(validate_password(""), Err(ValidationError::PasswordRequired));
        assert_eq!(validate_password("12345"), Err(ValidationError::PasswordTooShort));
        assert_eq!(
            ValidationError::PasswordTooShort.to_string(),
            "Password must be at least 6 characters"
        );
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_full_name_rules() {
        assert_eq!(validate_full_name(" "), Err(ValidationError::NameRequired));
        assert_eq!(validate_full_name("Al"), Err(ValidationError::NameTooShort));
        assert_eq!(ValidationError::NameTooShort.to_string(), "Name is too short");
        assert!(validate_full_name("Ali").is_ok());
    }

    #[test]
    fn test_phone_rules() {
        assert_eq!(validate_phone_number(""), Err(ValidationError::PhoneRequired));
        assert_eq!(validate_phone_number("12345"), Err(ValidationError::PhoneInvalid));
        assert_eq!(
            validate_phone_number("+2135551234567890"),
            Err(ValidationError::PhoneInvalid)
        );
        assert_eq!(
            validate_phone_number("0555-123-456"),
            Err(ValidationError::PhoneInvalid)
        );
        assert!(validate_phone_number("0555123456").is_ok());
        assert!(validate_phone_number("+213555123456").is_ok());
    }

    #[test]
    fn test_wilaya_rules() {
        assert_eq!(validate_wilaya(""), Err(ValidationError::WilayaRequired));
        assert_eq!(validate_wilaya("Paris"), Err(ValidationError::WilayaRequired));
        assert_eq!(validate_wilaya("Oran"), Ok(Wilaya::Oran));
        assert_eq!(Wilaya::all().len(), 8);
    }

    #[test]
    fn test_driver_license_rule() {
        assert_eq!(
            validate_driver_license(false),
            Err(ValidationError::DriverLicenseRequired)
        );
        assert!(validate_driver_license(true).is_ok());
    }

    #[test]
    fn test_validate_dispatch() {
        assert_eq!(
            validate(Field::Email, &"bad@x".into()),
            Err(ValidationError::EmailInvalid)
        );
        assert!(validate(Field::Email, &"a@b.com".into()).is_ok());
        assert!(validate(Field::DriverLicense, &true.into()).is_ok());
        assert_eq!(
            validate(Field::DriverLicense, &"yes".into()),
            Err(ValidationError::DriverLicenseRequired)
        );
    }

    #[test]
    fn test_lengths_count_characters() {
        // One emoji is one character, not two code units
        assert_eq!(validate_full_name("J\u{1F600}"), Err(ValidationError::NameTooShort));
        assert_eq!(validate_full_name("Jo\u{1F600}"), Ok(()));
        assert_eq!(validate_password("abcd\u{1F600}"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_password("abcde\u{1F600}"), Ok(()));
    }
}
