/// Input validation
///
/// Request schemas derive [`validator::Validate`]; [`validate`] runs them and
/// collapses the result into [`FieldErrors`], a map from field name to the
/// list of messages for that field. The map is ordered so responses are
/// stable.
///
/// # Example
///
/// ```
/// use postboard_shared::validation::{validate, FieldErrors};
/// use validator::Validate;
///
/// #[derive(Validate)]
/// struct Input {
///     #[validate(required(message = "The title field is required."))]
///     title: Option<String>,
/// }
///
/// let errors = validate(Input { title: None }).err().unwrap();
/// assert_eq!(errors.messages("title"), ["The title field is required."]);
/// ```

use std::collections::BTreeMap;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// Field-keyed validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an error set holding one message for one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Appends a message for `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages recorded for `field` (empty if none)
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid.", field));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

/// Rejects strings that are empty or whitespace only
///
/// Attach with `custom(function = "not_blank", message = "...")`; the
/// attribute message is what ends up in [`FieldErrors`].
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Runs the schema attached to `input`
///
/// # Errors
///
/// Returns the collected [`FieldErrors`] when any rule fails.
pub fn validate<T: Validate>(input: T) -> Result<T, FieldErrors> {
    match input.validate() {
        Ok(()) => Ok(input),
        Err(errors) => Err(errors.into()),
    }
}
