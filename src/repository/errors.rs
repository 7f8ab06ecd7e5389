use thiserror::Error;

use crate::domain::FieldErrors;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with an error status or `success: false`.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The backend rejected the payload with per-field messages.
    #[error("Validation error: {0:?}")]
    Validation(FieldErrors),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl RepositoryError {
    /// Message suitable for an inline error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            RepositoryError::Network(_) => "Error al conectar con el servidor",
            RepositoryError::NotFound => "Cliente no encontrado",
            _ => "Error al cargar clientes",
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Decode(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::Server {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            RepositoryError::Network(err.to_string())
        }
    }
}
