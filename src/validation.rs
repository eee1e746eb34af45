//! Field validation
//!
//! Only required fields are checked: they must be non-blank, and URL-typed
//! ones must parse as a URL once a missing `https://` is prefixed.
//! Validation never touches persistence; invalid input is still autosaved.

use thiserror::Error;
use url::Url;

use crate::consts::{MSG_INVALID_URL, MSG_REQUIRED};
use crate::form::{Field, FieldKind, FormHandle};

/// Inline error shown next to a field. `Display` is the user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{}", MSG_REQUIRED)]
    Required,
    #[error("{}", MSG_INVALID_URL)]
    InvalidUrl,
}

/// Whether `s` is a URL, assuming `https://` when no http(s) scheme is given
pub fn is_valid_url(s: &str) -> bool {
    let candidate = if s.starts_with("http://") || s.starts_with("https://") {
        s.to_string()
    } else {
        format!("https://{s}")
    };
    Url::parse(&candidate).is_ok()
}

pub fn validate_field(field: &Field) -> Result<(), FieldError> {
    if !field.required {
        return Ok(());
    }
    if field.value.trim().is_empty() {
        return Err(FieldError::Required);
    }
    if field.kind == FieldKind::Url && !is_valid_url(&field.value) {
        return Err(FieldError::InvalidUrl);
    }
    Ok(())
}

/// Validate every field, replacing any previous inline errors.
/// Returns the failing fields by index; empty means the form may submit.
pub fn validate_form<F: FormHandle + ?Sized>(form: &mut F) -> Vec<(usize, FieldError)> {
    let mut errors = Vec::new();
    for (index, field) in form.fields().iter().enumerate() {
        form.clear_error(index);
        if let Err(err) = validate_field(field) {
            form.show_error(index, &err);
            errors.push((index, err));
        }
    }
    errors
}

/// Blur handler: re-check one field and update its inline error
pub fn validate_on_blur<F: FormHandle + ?Sized>(form: &mut F, index: usize) -> Option<FieldError> {
    let field = form.fields().into_iter().nth(index)?;
    form.clear_error(index);
    match validate_field(&field) {
        Ok(()) => None,
        Err(err) => {
            form.show_error(index, &err);
            Some(err)
        }
    }
}

/// Input handler: typing into a flagged field clears the flag until the
/// next blur or submit
pub fn clear_on_input<F: FormHandle + ?Sized>(form: &mut F, index: usize) {
    if form.has_error(index) {
        form.clear_error(index);
    }
}
