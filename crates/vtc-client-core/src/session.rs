//! Who is logged in, as a state machine plus the durable copy of the token

use std::sync::Arc;

use tracing::{debug, warn};
use vtc_shared::{token::AuthToken, uac::UserProfile};

use crate::storage::TokenStorage;

/// An authenticated user together with the token the backend issued for them
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Arc<UserProfile>,
    pub token: AuthToken,
}

impl Session {
    pub fn new(user: UserProfile, token: AuthToken) -> Self {
        Self {
            user: Arc::new(user),
            token,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    /// A login or the restoration of a previous session is in flight
    #[default]
    Loading,
    Authenticated(Session),
}

/// Named transitions of [`AuthState`]
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    LoginStart,
    LoginSuccess(Session),
    LoginFailure,
    Logout,
    CheckAuthSuccess(Session),
    /// `forget_token` is set when the backend (or the local check) refused the
    /// token, as opposed to the backend not being reachable
    CheckAuthFailure { forget_token: bool },
}

impl AuthState {
    #[must_use]
    pub fn reduce(self, action: &AuthAction) -> Self {
        match action {
            AuthAction::LoginStart => Self::Loading,
            AuthAction::LoginSuccess(session) | AuthAction::CheckAuthSuccess(session) => {
                Self::Authenticated(session.clone())
            }
            AuthAction::LoginFailure
            | AuthAction::Logout
            | AuthAction::CheckAuthFailure { .. } => Self::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn user(&self) -> Option<&Arc<UserProfile>> {
        match self {
            Self::Authenticated(session) => Some(&session.user),
            Self::Unauthenticated | Self::Loading => None,
        }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        match self {
            Self::Authenticated(session) => Some(&session.token),
            Self::Unauthenticated | Self::Loading => None,
        }
    }
}

/// Owns the [`AuthState`] and keeps the persisted token in step with it
#[derive(Debug)]
pub struct SessionStore {
    state: AuthState,
    /// Bumped on every dispatched action
    revision: u64,
    restoration_started: bool,
    storage: Box<dyn TokenStorage>,
}

impl SessionStore {
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            state: AuthState::default(),
            revision: 0,
            restoration_started: false,
            storage,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[tracing::instrument(skip(self), fields(revision = self.revision))]
    pub fn dispatch(&mut self, action: AuthAction) -> &AuthState {
        match &action {
            AuthAction::LoginSuccess(session) | AuthAction::CheckAuthSuccess(session) => {
                if let Err(e) = self.storage.store(&session.token) {
                    // The session is still usable it just won't survive a restart
                    warn!("failed to persist token: {e:?}");
                }
            }
            AuthAction::LoginFailure
            | AuthAction::Logout
            | AuthAction::CheckAuthFailure { forget_token: true } => self.forget_token(),
            AuthAction::LoginStart | AuthAction::CheckAuthFailure { forget_token: false } => {}
        }
        self.state = std::mem::take(&mut self.state).reduce(&action);
        self.revision += 1;
        debug!(state = ?self.state, "auth state changed");
        &self.state
    }

    /// Returns true only for the first call. Restoration must only run once.
    pub fn begin_restoration(&mut self) -> bool {
        !std::mem::replace(&mut self.restoration_started, true)
    }

    pub fn restoration_started(&self) -> bool {
        self.restoration_started
    }

    /// Failures to read are treated as no token stored
    pub fn stored_token(&self) -> Option<AuthToken> {
        match self.storage.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("failed to load persisted token: {e:?}");
                None
            }
        }
    }

    fn forget_token(&mut self) {
        if let Err(e) = self.storage.clear() {
            warn!("failed to clear persisted token: {e:?}");
        }
    }
}
