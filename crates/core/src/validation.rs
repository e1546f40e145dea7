//! Field-level validation for entity create/update input.
//!
//! DTOs carry declarative `validator` rules for simple shape constraints
//! (lengths); the helpers here flatten those into [`FieldError`]s and add
//! the checks the derive cannot express (required image, known status).

use serde::Serialize;
use validator::ValidationErrors;

use crate::status::{Status, StatusId};

/// A single validation failure tied to an input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Flatten `validator` derive output into a list of [`FieldError`]s.
///
/// Falls back to a generic message for rules declared without one.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for {field}."));
            out.push(FieldError::new(field.as_ref(), message));
        }
    }
    out
}

/// Reject unknown status values. `None` means "use the entity default".
pub fn validate_status(status: Option<StatusId>) -> Result<(), FieldError> {
    match status {
        None => Ok(()),
        Some(id) => match Status::from_id(id) {
            Some(_) => Ok(()),
            None => Err(FieldError::new(
                "status",
                format!("{id} is not a valid status"),
            )),
        },
    }
}

/// Require a non-empty image reference at creation time.
pub fn validate_image_required(image: &str) -> Result<(), FieldError> {
    if image.trim().is_empty() {
        return Err(FieldError::new("image", "Image is required."));
    }
    Ok(())
}

/// Trim a title the way entities store it.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_string()
}
