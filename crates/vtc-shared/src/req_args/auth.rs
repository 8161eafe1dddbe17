use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

#[derive(Clone)]
pub struct LoginReqArgs {
    pub username: String,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(username: S, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// The body sent to the backend. Contains the password in clear text so
    /// must never be logged
    pub fn to_json_body(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "password": self.password.expose_secret(),
        })
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("username", &self.username)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ForgotPasswordReqArgs {
    pub email: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct VerifyOtpReqArgs {
    pub email: String,
    pub otp: String,
}

#[derive(Clone)]
pub struct ResetPasswordReqArgs {
    pub email: String,
    pub otp: String,
    pub new_password: SecretString,
    pub new_password_check: SecretString,
}

impl ResetPasswordReqArgs {
    pub fn passwords_match(&self) -> bool {
        self.new_password.expose_secret() == self.new_password_check.expose_secret()
    }

    pub fn to_json_body(&self) -> serde_json::Value {
        serde_json::json!({
            "email": self.email,
            "otp": self.otp,
            "password": self.new_password.expose_secret(),
            "password_confirmation": self.new_password_check.expose_secret(),
        })
    }
}

impl Debug for ResetPasswordReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordReqArgs")
            .field("email", &self.email)
            .field("passwords_match", &self.passwords_match())
            .finish_non_exhaustive()
    }
}
