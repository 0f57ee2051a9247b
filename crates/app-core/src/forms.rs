//! Form state holders
//!
//! A [`Form`] owns the raw values and current errors of a screen's inputs.
//! Keystrokes only re-check a field that already shows an error; a full
//! pass runs on submission.

use serde::{Deserialize, Serialize};

use crate::auth::Credentials;
use crate::validation::{self, Field, FieldValue, ValidationError, Wilaya};

/// A single input and its current error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    field: Field,
    value: FieldValue,
    error: Option<ValidationError>,
}

impl FormField {
    /// Create an empty field
    pub fn new(field: Field) -> Self {
        let value = match field {
            Field::DriverLicense => FieldValue::Flag(false),
            _ => FieldValue::Text(String::new()),
        };
        Self {
            field,
            value,
            error: None,
        }
    }

    /// Which field this is
    pub fn field(&self) -> Field {
        self.field
    }

    /// Current raw value
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Current error, if any
    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    /// Store a new value
    ///
    /// Re-validates only when the field currently holds an error, so a
    /// field is never flagged while the user is still typing into it.
    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        self.value = value.into();
        if self.error.is_some() {
            self.validate();
        }
    }

    /// Run the field's rule and store the outcome
    pub fn validate(&mut self) -> bool {
        self.error = validation::validate(self.field, &self.value).err();
        self.error.is_none()
    }

    /// Drop the current error without re-validating
    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// An ordered set of fields validated together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    fields: Vec<FormField>,
}

impl Form {
    /// Create a form with the given fields, in display order
    pub fn new(fields: &[Field]) -> Self {
        Self {
            fields: fields.iter().copied().map(FormField::new).collect(),
        }
    }

    /// Look up a field
    pub fn field(&self, field: Field) -> Option<&FormField> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Look up a field mutably
    pub fn field_mut(&mut self, field: Field) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.field == field)
    }

    /// Update a field's value (keystroke path)
    ///
    /// Returns false if the form has no such field.
    pub fn set_value(&mut self, field: Field, value: impl Into<FieldValue>) -> bool {
        match self.field_mut(field) {
            Some(f) => {
                f.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Text value of a field, empty if absent
    pub fn text(&self, field: Field) -> &str {
        self.field(field).map(|f| f.value.as_text()).unwrap_or("")
    }

    /// Flag value of a field, false if absent
    pub fn flag(&self, field: Field) -> bool {
        self.field(field).map(|f| f.value.as_flag()).unwrap_or(false)
    }

    /// Current error of a field
    pub fn error(&self, field: Field) -> Option<ValidationError> {
        self.field(field).and_then(|f| f.error)
    }

    /// Validate every field
    ///
    /// Every rule runs even after a failure so each field shows its own
    /// error.
    pub fn validate_all(&mut self) -> bool {
        self.fields
            .iter_mut()
            .fold(true, |valid, field| field.validate() && valid)
    }

    /// All current errors in field order
    pub fn errors(&self) -> Vec<(Field, ValidationError)> {
        self.fields
            .iter()
            .filter_map(|f| f.error.map(|e| (f.field, e)))
            .collect()
    }

    /// Whether any field currently shows an error
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }
}

// =============================================================================
// Sign In
// =============================================================================

/// Sign-in screen state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInForm {
    form: Form,
    /// "Remember Me" checkbox
    pub remember_me: bool,
    /// Password visibility toggle
    pub password_visible: bool,
}

impl Default for SignInForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SignInForm {
    /// Create an empty sign-in form
    pub fn new() -> Self {
        Self {
            form: Form::new(&[Field::Email, Field::Password]),
            remember_me: false,
            password_visible: false,
        }
    }

    /// Email keystroke
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.form.set_value(Field::Email, email.into());
    }

    /// Password keystroke
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.form.set_value(Field::Password, password.into());
    }

    /// Underlying form
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Validate everything and build credentials if valid
    pub fn submit(&mut self) -> Option<Credentials> {
        if !self.form.validate_all() {
            return None;
        }
        Some(Credentials {
            email: self.form.text(Field::Email).to_string(),
            password: self.form.text(Field::Password).to_string(),
            remember_me: self.remember_me,
        })
    }
}

// =============================================================================
// Renter Information
// =============================================================================

/// Validated renter details collected before payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenterInfo {
    /// Full name
    pub full_name: String,
    /// Phone number
    pub phone_number: String,
    /// Email address
    pub email: String,
    /// Region
    pub wilaya: Wilaya,
}

/// "Complete your booking" renter form state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenterInfoForm {
    form: Form,
    wilayas: Vec<Wilaya>,
    is_submitting: bool,
}

impl Default for RenterInfoForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RenterInfoForm {
    /// Create an empty renter form offering every wilaya
    pub fn new() -> Self {
        Self::with_wilayas(&Wilaya::all())
    }

    /// Create an empty renter form offering only `wilayas`
    pub fn with_wilayas(wilayas: &[Wilaya]) -> Self {
        Self {
            form: Form::new(&[
                Field::FullName,
                Field::PhoneNumber,
                Field::Email,
                Field::Wilaya,
                Field::DriverLicense,
            ]),
            wilayas: wilayas.to_vec(),
            is_submitting: false,
        }
    }

    /// Underlying form
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Name keystroke
    pub fn set_full_name(&mut self, name: impl Into<String>) {
        self.form.set_value(Field::FullName, name.into());
    }

    /// Phone keystroke
    pub fn set_phone_number(&mut self, phone: impl Into<String>) {
        self.form.set_value(Field::PhoneNumber, phone.into());
    }

    /// Email keystroke
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.form.set_value(Field::Email, email.into());
    }

    /// Dropdown options
    pub fn wilayas(&self) -> &[Wilaya] {
        &self.wilayas
    }

    /// Pick a wilaya from the dropdown; clears its error
    ///
    /// A wilaya outside the offered set is ignored and returns false.
    pub fn select_wilaya(&mut self, wilaya: Wilaya) -> bool {
        if !self.wilayas.contains(&wilaya) {
            tracing::debug!(%wilaya, "Wilaya not offered");
            return false;
        }
        match self.form.field_mut(Field::Wilaya) {
            Some(field) => {
                field.set_value(wilaya.name());
                field.clear_error();
                true
            }
            None => false,
        }
    }

    /// Attach the driver license; always clears its error
    pub fn attach_driver_license(&mut self) {
        if let Some(field) = self.form.field_mut(Field::DriverLicense) {
            field.set_value(true);
            field.clear_error();
        }
    }

    /// Whether a submission is in progress
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Validate everything and build renter info if valid
    ///
    /// Returns `None` while a previous submission is still in progress.
    pub fn submit(&mut self) -> Option<RenterInfo> {
        if self.is_submitting || !self.form.validate_all() {
            return None;
        }
        let wilaya = validation::validate_wilaya(self.form.text(Field::Wilaya)).ok()?;
        if !self.wilayas.contains(&wilaya) {
            if let Some(field) = self.form.field_mut(Field::Wilaya) {
                field.error = Some(ValidationError::WilayaRequired);
            }
            return None;
        }
        self.is_submitting = true;
        Some(RenterInfo {
            full_name: self.form.text(Field::FullName).to_string(),
            phone_number: self.form.text(Field::PhoneNumber).to_string(),
            email: self.form.text(Field::Email).to_string(),
            wilaya,
        })
    }

    /// Re-enable the continue button
    pub fn finish_submission(&mut self) {
        self.is_submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystroke_does_not_flag_untouched_field() {
        let mut form = SignInForm::new();
        form.set_email("bad");
        assert_eq!(form.form().error(Field::Email), None);
    }

    #[test]
    fn test_keystroke_revalidates_field_with_error() {
        let mut form = SignInForm::new();
        assert!(form.submit().is_none());
        assert_eq!(form.form().error(Field::Email), Some(ValidationError::EmailRequired));

        form.set_email("bad@x");
        assert_eq!(form.form().error(Field::Email), Some(ValidationError::EmailInvalid));

        form.set_email("a@b.com");
        assert_eq!(form.form().error(Field::Email), None);
    }

    #[test]
    fn test_stale_error_kept_on_untouched_field() {
        let mut form = SignInForm::new();
        assert!(form.submit().is_none());

        // Fixing the email must not clear the password error
        form.set_email("a@b.com");
        assert_eq!(
            form.form().error(Field::Password),
            Some(ValidationError::PasswordRequired)
        );
    }

    #[test]
    fn test_validate_all_reports_every_field() {
        let mut form = Form::new(&[Field::Email, Field::Password, Field::FullName]);
        form.set_value(Field::Password, "123");
        assert!(!form.validate_all());
        assert_eq!(
            form.errors(),
            vec![
                (Field::Email, ValidationError::EmailRequired),
                (Field::Password, ValidationError::PasswordTooShort),
                (Field::FullName, ValidationError::NameRequired),
            ]
        );
    }

    #[test]
    fn test_set_value_unknown_field() {
        let mut form = Form::new(&[Field::Email]);
        assert!(!form.set_value(Field::Wilaya, "Oran"));
    }

    #[test]
    fn test_sign_in_submit() {
        let mut form = SignInForm::new();
        form.set_email("a@b.com");
        form.set_password("secret1");
        form.remember_me = true;

        let credentials = form.submit().unwrap();
        assert_eq!(credentials.email, "a@b.com");
        assert_eq!(credentials.password, "secret1");
        assert!(credentials.remember_me);
        assert!(!form.form().has_errors());
    }

    #[test]
    fn test_renter_form_selection_clears_errors() {
        let mut form = RenterInfoForm::new();
        assert!(form.submit().is_none());
        assert_eq!(
            form.form().error(Field::Wilaya),
            Some(ValidationError::WilayaRequired)
        );
        assert_eq!(
            form.form().error(Field::DriverLicense),
            Some(ValidationError::DriverLicenseRequired)
        );

        form.select_wilaya(Wilaya::Blida);
        form.attach_driver_license();
        assert_eq!(form.form().error(Field::Wilaya), None);
        assert_eq!(form.form().error(Field::DriverLicense), None);
        assert_eq!(form.form().error(Field::FullName), Some(ValidationError::NameRequired));
    }

    #[test]
    fn test_renter_form_submit_once() {
        let mut form = RenterInfoForm::new();
        form.set_full_name("Amina Benali");
        form.set_phone_number("+213555123456");
        form.set_email("amina@example.dz");
        form.select_wilaya(Wilaya::Setif);
        form.attach_driver_license();

        let info = form.submit().unwrap();
        assert_eq!(info.wilaya, Wilaya::Setif);
        assert!(form.is_submitting());
        assert!(form.submit().is_none());

        form.finish_submission();
        assert!(form.submit().is_some());
    }

    #[test]
    fn test_renter_form_limited_wilayas() {
        let mut form = RenterInfoForm::with_wilayas(&[Wilaya::Oran]);
        assert_eq!(form.wilayas(), &[Wilaya::Oran]);
        form.set_full_name("Amina Benali");
        form.set_phone_number("+213555123456");
        form.set_email("amina@example.dz");
        form.attach_driver_license();

        assert!(!form.select_wilaya(Wilaya::Algiers));
        assert!(form.submit().is_none());
        assert_eq!(
            form.form().error(Field::Wilaya),
            Some(ValidationError::WilayaRequired)
        );

        assert!(form.select_wilaya(Wilaya::Oran));
        assert_eq!(form.submit().map(|info| info.wilaya), Some(Wilaya::Oran));
    }

    #[test]
    fn test_renter_form_rejects_value_outside_offered_set() {
        let mut form = RenterInfoForm::with_wilayas(&[Wilaya::Oran]);
        form.set_full_name("Amina Benali");
        form.set_phone_number("+213555123456");
        form.set_email("amina@example.dz");
        form.attach_driver_license();
        form.form.set_value(Field::Wilaya, "Algiers");

        assert!(form.submit().is_none());
        assert!(!form.is_submitting());
        assert_eq!(
            form.form().error(Field::Wilaya),
            Some(ValidationError::WilayaRequired)
        );
    }
}
