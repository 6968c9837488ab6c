//! Field-level validation errors for the donor's forms.
//!
//! Every form error is tied to the name of the field it is shown next to and
//! carries a label key that the page layer turns into words. Errors are kept
//! in the order they were added so the error summary lists them in page order.

use core::fmt;

use serde::Serialize;

/// A user-correctable problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldError {
    /// A required value was not entered ("Enter {label}").
    Enter { label: String },
    /// A choice was not made ("Select {label}").
    Select { label: String },
    /// A message that is complete in itself.
    Custom { label: String },
    /// A value longer than allowed.
    StringTooLong { label: String, length: usize },
}

impl FieldError {
    #[must_use]
    pub fn enter(label: impl Into<String>) -> Self {
        Self::Enter {
            label: label.into(),
        }
    }

    #[must_use]
    pub fn select(label: impl Into<String>) -> Self {
        Self::Select {
            label: label.into(),
        }
    }

    #[must_use]
    pub fn custom(label: impl Into<String>) -> Self {
        Self::Custom {
            label: label.into(),
        }
    }

    #[must_use]
    pub fn too_long(label: impl Into<String>, length: usize) -> Self {
        Self::StringTooLong {
            label: label.into(),
            length,
        }
    }

    /// The kind of error, as used by templates to pick a message pattern.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Enter { .. } => "enter",
            Self::Select { .. } => "select",
            Self::Custom { .. } => "custom",
            Self::StringTooLong { .. } => "stringTooLong",
        }
    }

    /// The label key of the error.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Enter { label }
            | Self::Select { label }
            | Self::Custom { label }
            | Self::StringTooLong { label, .. } => label,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter { label } => write!(f, "enter:{label}"),
            Self::Select { label } => write!(f, "select:{label}"),
            Self::Custom { label } => f.write_str(label),
            Self::StringTooLong { label, length } => write!(f, "stringTooLong:{label}:{length}"),
        }
    }
}

/// Ordered mapping of field name to the first error found for that field.
///
/// ```
/// use make_lpa_core::{FieldError, ValidationErrors};
///
/// let errors = ValidationErrors::new()
///     .with("address-line-1", FieldError::enter("addressLine1"))
///     .with("address-line-1", FieldError::too_long("addressLine1", 50));
///
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors.get("address-line-1"), Some(&FieldError::enter("addressLine1")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<(String, FieldError)>);

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add an error for `field`, unless the field already has one.
    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        let field = field.into();
        if !self.has(&field) {
            self.0.push((field, error));
        }
    }

    /// Builder form of [`ValidationErrors::add`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, error: FieldError) -> Self {
        self.add(field, error);
        self
    }

    /// Append every error from `other` whose field has no error yet.
    pub fn extend(&mut self, other: Self) {
        for (field, error) in other.0 {
            self.add(field, error);
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, error)| error)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn any(&self) -> bool {
        !self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.0.iter().map(|(field, error)| (field.as_str(), error))
    }

    /// Require `value` to be non-empty.
    pub fn check_entered(&mut self, field: &str, label: &str, value: &str) {
        if !self.has(field) && value.is_empty() {
            self.add(field, FieldError::enter(label));
        }
    }

    /// Require `value` to be at most `max` characters.
    pub fn check_max_length(&mut self, field: &str, label: &str, value: &str, max: usize) {
        if !self.has(field) && value.chars().count() > max {
            self.add(field, FieldError::too_long(label, max));
        }
    }
}
