use thiserror::Error;

use crate::domain::FieldErrors;
use crate::forms::{FormError, field_errors};
use crate::repository::errors::RepositoryError;

pub mod client;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Per-field messages to show next to the form inputs.
    #[error("form validation failed: {0:?}")]
    Form(FieldErrors),

    #[error("client not found")]
    NotFound,

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Validation(errors) => ServiceError::Form(errors),
            other => ServiceError::Repository(other),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(errors) => ServiceError::Form(field_errors(&errors)),
            FormError::TypeConstraint(err) => ServiceError::from(err),
        }
    }
}
