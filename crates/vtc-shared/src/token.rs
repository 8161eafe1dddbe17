//! Bearer token held by the session and inspected by the navigation guard
//!
//! Tokens are opaque unless they have the three segment shape
//! (`header.payload.signature`). For those the payload is decoded and its `exp`
//! claim (seconds since the epoch) compared to the current time. The signature
//! is never checked here, that is the backend's job.

use base64::Engine as _;
use std::fmt::Debug;
use vtc_time::Timestamp;

use crate::errors::ConversionError;

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct AuthToken(String);

#[derive(Debug, Default, serde::Deserialize, Clone, PartialEq)]
pub struct TokenClaims {
    /// Expiry in seconds since the epoch
    pub exp: Option<f64>,
    pub sub: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum TokenError {
    #[error("token is malformed: {0}")]
    Malformed(String),
    #[error("token expired at {expired_at}")]
    Expired { expired_at: Timestamp },
}

impl AuthToken {
    /// Returns true if the token has the `header.payload.signature` shape
    pub fn is_structured(&self) -> bool {
        self.0.split('.').count() == 3
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `Ok(None)` for opaque tokens
    pub fn claims(&self) -> Result<Option<TokenClaims>, TokenError> {
        let mut segments = self.0.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Ok(None);
        };
        decode_payload(payload).map(Some)
    }

    /// Local check only. Opaque tokens and structured tokens without an `exp`
    /// claim are considered valid.
    pub fn validate(&self, now: Timestamp) -> Result<(), TokenError> {
        match self.claims()? {
            Some(TokenClaims { exp: Some(exp), .. }) => {
                let expired_at = Timestamp::from_claim(exp);
                if expired_at.is_before(now) {
                    Err(TokenError::Expired { expired_at })
                } else {
                    Ok(())
                }
            }
            Some(TokenClaims { exp: None, .. }) | None => Ok(()),
        }
    }

    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.validate(now).is_ok()
    }
}

fn decode_payload(payload: &str) -> Result<TokenClaims, TokenError> {
    // Accept both the url safe and the standard alphabet with or without padding
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let bytes = base64::engine::general_purpose::STANDARD_NO_PAD
        .decode(normalized)
        .map_err(|e| TokenError::Malformed(format!("payload is not base64: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("payload is not a claims object: {e}")))
}

impl TryFrom<String> for AuthToken {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConversionError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<&str> for AuthToken {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthToken")
            .field(&if self.is_structured() {
                "[structured]"
            } else {
                "[opaque]"
            })
            .finish()
    }
}

/// Builds unsigned structured tokens for tests in this and other crates
#[doc(hidden)]
pub fn unsigned_token_with_payload(payload: &serde_json::Value) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    format!(
        "{}.{}.signature",
        engine.encode(r#"{"alg":"none","typ":"JWT"}"#),
        engine.encode(payload.to_string())
    )
}
