//! Wrapper every backend response body comes in

/// Body of every backend response
///
/// Success requires both `valid == true` and `status == 200`, the HTTP status
/// of the response itself is not enough.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    /// Sent as either a string or a number depending on the endpoint
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    #[error("backend rejected the request with status {status}: {message:?}")]
    Rejected {
        status: u16,
        message: Option<String>,
        error: Option<serde_json::Value>,
    },
    #[error("backend reported success but sent no data")]
    MissingData,
}

impl EnvelopeError {
    /// Text suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            EnvelopeError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            EnvelopeError::Rejected { status, .. } => format!("Request failed (status {status})"),
            EnvelopeError::MissingData => "The server sent an empty response".to_string(),
        }
    }

    /// The backend refused the credentials (as opposed to failing to answer)
    pub fn is_rejection(&self) -> bool {
        matches!(self, EnvelopeError::Rejected { .. })
    }
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: 200,
            valid: true,
            message: None,
            data: Some(data),
            error: None,
            timestamp: None,
        }
    }

    pub fn rejected<S: Into<String>>(status: u16, message: S) -> Self {
        Self {
            status,
            valid: false,
            message: Some(message.into()),
            data: None,
            error: None,
            timestamp: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.valid && self.status == 200
    }

    /// Success may legitimately carry no data (for example logout)
    pub fn into_result(self) -> Result<Option<T>, EnvelopeError> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(EnvelopeError::Rejected {
                status: self.status,
                message: self.message,
                error: self.error,
            })
        }
    }

    pub fn into_data(self) -> Result<T, EnvelopeError> {
        self.into_result()?.ok_or(EnvelopeError::MissingData)
    }
}
