use std::borrow::Cow;

use reqwest::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: Cow<'static, str>,
    pub method: Method,
}

impl PathSpec {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::GET,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::POST,
        }
    }

    /// For paths only known at runtime (ie. that include an id)
    pub fn dynamic<S: Into<String>>(method: Method, path: S) -> Self {
        Self {
            path: Cow::Owned(path.into()),
            method,
        }
    }
}
