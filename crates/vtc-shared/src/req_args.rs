//! This module stores the expected format of the arguments for the requests
//! The structure of the module is supposed to match the path of the endpoints.
//! For example `/auth/forgot-password` maps to
//! [`auth::ForgotPasswordReqArgs`]. Types holding secrets are not serializable
//! and are converted to JSON explicitly by the client.

use std::fmt::Debug;

use crate::const_config::client::CLIENT_DEFAULT_PAGE_SIZE;

pub mod auth;

pub use auth::LoginReqArgs;

/// Query arguments of every paginated list endpoint
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct PageReqArgs {
    /// Starts at 1
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for PageReqArgs {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: CLIENT_DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl PageReqArgs {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Blank searches are dropped
    pub fn search<S: Into<String>>(mut self, search: S) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search.trim().to_string())
        };
        self
    }
}
