//! Decides, before anything is rendered, whether a navigation may proceed

use tracing::{debug, instrument};
use vtc_shared::token::AuthToken;
use vtc_time::Timestamp;

use crate::configuration::{NavigationSettings, UnlistedPolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin { location: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Public,
    Protected,
    /// Requests for files (bundle, images, ...) are not navigations
    Asset,
    Unlisted,
}

#[derive(Debug, Clone)]
pub struct NavigationGuard {
    settings: NavigationSettings,
}

impl From<NavigationSettings> for NavigationGuard {
    fn from(settings: NavigationSettings) -> Self {
        Self { settings }
    }
}

/// Matches the prefix exactly or as a parent of the path. The root prefix
/// only ever matches the root itself.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn is_asset(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|last_segment| last_segment.contains('.'))
}

impl NavigationGuard {
    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// Public is checked first so listing a path in both lists keeps it open
    pub fn classify(&self, path: &str) -> PathClass {
        let matches_any = |prefixes: &[String]| prefixes.iter().any(|x| matches_prefix(path, x));
        if matches_any(&self.settings.public_prefixes) {
            PathClass::Public
        } else if matches_any(&self.settings.protected_prefixes) {
            PathClass::Protected
        } else if is_asset(path) {
            PathClass::Asset
        } else {
            PathClass::Unlisted
        }
    }

    /// `credential` is the raw value of the cookie or bearer header if any
    #[instrument(ret, skip(credential), fields(has_credential = credential.is_some()))]
    pub fn decide(&self, path: &str, credential: Option<&str>, now: Timestamp) -> GuardDecision {
        let needs_credential = match self.classify(path) {
            PathClass::Public | PathClass::Asset => false,
            PathClass::Protected => true,
            PathClass::Unlisted => self.settings.unlisted == UnlistedPolicy::Deny,
        };
        if !needs_credential {
            return GuardDecision::Allow;
        }
        let Some(credential) = credential else {
            debug!("no credential");
            return self.redirect_to_login(path);
        };
        let is_valid = AuthToken::try_from(credential)
            .map_err(|e| debug!("unusable credential: {e}"))
            .and_then(|token| {
                token
                    .validate(now)
                    .map_err(|e| debug!("credential rejected: {e}"))
            })
            .is_ok();
        if is_valid {
            GuardDecision::Allow
        } else {
            self.redirect_to_login(path)
        }
    }

    pub fn login_location(&self, original_path: &str) -> String {
        format!(
            "{}?{}={}",
            self.settings.login_path,
            self.settings.redirect_param,
            urlencoding::encode(original_path)
        )
    }

    fn redirect_to_login(&self, path: &str) -> GuardDecision {
        GuardDecision::RedirectToLogin {
            location: self.login_location(path),
        }
    }
}
