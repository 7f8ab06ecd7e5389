//! Form definitions backing the customer create and edit pages.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::FieldErrors;
use crate::domain::types::TypeConstraintError;

pub mod client;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid value: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

/// Collapses validator output into one message per field.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errors)| {
            let message = errors.first()?.message.as_ref()?.to_string();
            Some((field.to_string(), message))
        })
        .collect()
}
