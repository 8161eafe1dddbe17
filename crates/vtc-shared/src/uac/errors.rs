use crate::{envelope::EnvelopeError, errors::ConversionError};

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),
    #[error("The server did not return an authentication token")]
    MissingToken,
    #[error("The server did not return the user's profile")]
    MissingUser,
    #[error("The user's profile is invalid: {0}")]
    InvalidProfile(#[from] ConversionError),
    #[error("Unexpected Error")]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<EnvelopeError> for AuthError {
    fn from(value: EnvelopeError) -> Self {
        Self::Rejected(value.user_message())
    }
}

impl AuthError {
    /// The backend answered and refused, as opposed to not being reachable or
    /// sending something unreadable
    pub fn is_refusal(&self) -> bool {
        !matches!(self, Self::UnexpectedError(_))
    }
}
