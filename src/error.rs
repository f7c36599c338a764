//! Error kinds shared by every component.
//!
//! Most variants describe something the participant did (or has not done yet)
//! and end up as a plain outbound message. Only `Database`, `Config` and
//! `Internal` are real failures that abort the current event.

use thiserror::Error;

use crate::participant::RegistrationState;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The action needs a registration step the participant has not reached.
    #[error("registration incomplete: {0:?}")]
    NotRegistered(RegistrationState),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    PermissionDenied(String),

    /// Uniqueness conflict while assigning a visible ID. Retried internally.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the error should be shown to the participant instead of
    /// failing the event.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotRegistered(_)
                | Error::NotFound(_)
                | Error::InvalidInput(_)
                | Error::PermissionDenied(_)
        )
    }
}
