use anyhow::{anyhow, Context};
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use futures::channel::oneshot;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
use vtc_shared::{
    const_config::{
        client::CLIENT_DEFAULT_API_BASE_URL,
        path::{PathSpec, PATH_AUTH_LOGIN, PATH_AUTH_ME},
    },
    envelope::{ApiEnvelope, EnvelopeError},
    req_args::LoginReqArgs,
    token::AuthToken,
    uac::{AuthError, CurrentUserResponseData, LoginResponseData, RawUserProfile, UserProfile},
};
use vtc_time::Timestamp;

use crate::{
    session::{AuthAction, AuthState, Session, SessionStore},
    storage::{MemoryTokenStorage, TokenStorage},
};

pub mod api;

pub const DUMMY_ARGUMENT: &[(&str, &str)] = &[];

/// Handle to the backend and to the session of the current user
///
/// Cheap to clone, every clone shares the same session
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    api_base_url: Arc<str>,
    inner: Arc<Mutex<ClientInner>>,
}

#[derive(Debug)]
struct ClientInner {
    session: SessionStore,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(CLIENT_DEFAULT_API_BASE_URL, MemoryTokenStorage::default())
    }
}

/// Why a request to the backend did not succeed
#[derive(thiserror::Error, Debug)]
pub enum ResponseError {
    #[error("{}", .0.user_message())]
    Rejected(#[from] EnvelopeError),
    #[error("request refused with status {0}")]
    Refused(StatusCode),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<ResponseError> for AuthError {
    fn from(value: ResponseError) -> Self {
        match value {
            ResponseError::Rejected(e) => e.into(),
            e @ ResponseError::Refused(_) => AuthError::Rejected(e.to_string()),
            ResponseError::Unexpected(e) => AuthError::UnexpectedError(e),
        }
    }
}

/// Result of looking at the stored token before talking to the backend
enum RestoreStart {
    Finished { is_authenticated: bool },
    FetchUser(AuthToken),
}

impl ClientInner {
    #[tracing::instrument]
    fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            session: SessionStore::new(storage),
        }
    }
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE", skip(storage))]
    pub fn new<S: Into<String> + Debug>(
        api_base_url: S,
        storage: impl TokenStorage + 'static,
    ) -> Self {
        let api_base_url: String = api_base_url.into();
        Self {
            api_client: reqwest::Client::new(),
            api_base_url: api_base_url.trim_end_matches('/').into(),
            inner: Arc::new(Mutex::new(ClientInner::new(Box::new(storage)))),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Logs in and on success persists the token. Any failure leaves the
    /// session unauthenticated and is returned so it can be shown.
    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F: UiCallBack>(
        &self,
        args: LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        let (tx, rx) = oneshot::channel();
        self.lock_inner().session.dispatch(AuthAction::LoginStart);
        let body = args.to_json_body();
        let client = self.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let outcome = process_login(resp, &client).await;
            let msg = match outcome {
                Ok(session) => {
                    client
                        .lock_inner()
                        .session
                        .dispatch(AuthAction::LoginSuccess(session));
                    Ok(())
                }
                Err(e) => {
                    client.lock_inner().session.dispatch(AuthAction::LoginFailure);
                    Err(e.into())
                }
            };
            deliver(tx, msg);
            ui_notify();
        };

        self.initiate_request_with_token(&PATH_AUTH_LOGIN, &body, None, on_done);
        rx
    }

    /// Restores the session from the stored token. Only the first call does
    /// any work, later calls resolve straight away with the current status.
    #[tracing::instrument(skip(ui_notify))]
    pub fn check_auth<F: UiCallBack>(&self, ui_notify: F) -> oneshot::Receiver<bool> {
        let (tx, rx) = oneshot::channel();
        let token = match self.start_restoration() {
            RestoreStart::Finished { is_authenticated } => {
                deliver(tx, is_authenticated);
                ui_notify();
                return rx;
            }
            RestoreStart::FetchUser(token) => token,
        };

        let client = self.clone();
        let request_token = token.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let outcome = process_current_user(resp).await;
            let is_authenticated = match outcome {
                Ok(user) => {
                    client
                        .lock_inner()
                        .session
                        .dispatch(AuthAction::CheckAuthSuccess(Session::new(user, token)));
                    true
                }
                Err(e) => {
                    let forget_token = e.is_refusal();
                    warn!(?e, forget_token, "failed to restore session");
                    client
                        .lock_inner()
                        .session
                        .dispatch(AuthAction::CheckAuthFailure { forget_token });
                    false
                }
            };
            deliver(tx, is_authenticated);
            ui_notify();
        };
        self.initiate_request_with_token(
            &PATH_AUTH_ME,
            &DUMMY_ARGUMENT,
            Some(&request_token),
            on_done,
        );
        rx
    }

    fn start_restoration(&self) -> RestoreStart {
        let mut inner = self.lock_inner();
        let session = &mut inner.session;
        if !session.begin_restoration() {
            warn!("session restoration already started, not starting it again");
            return RestoreStart::Finished {
                is_authenticated: session.state().is_authenticated(),
            };
        }
        let Some(token) = session.stored_token() else {
            info!("no stored token");
            session.dispatch(AuthAction::CheckAuthFailure {
                forget_token: false,
            });
            return RestoreStart::Finished {
                is_authenticated: false,
            };
        };
        if let Err(e) = token.validate(Timestamp::now()) {
            info!("stored token not usable: {e}");
            session.dispatch(AuthAction::CheckAuthFailure { forget_token: true });
            return RestoreStart::Finished {
                is_authenticated: false,
            };
        }
        RestoreStart::FetchUser(token)
    }

    #[tracing::instrument(skip(args, on_done))]
    // WARNING: Must skip args as it my contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn initiate_request_with_token<T, F, O>(
        &self,
        path_spec: &PathSpec,
        args: &T,
        token: Option<&AuthToken>,
        on_done: F,
    ) where
        T: serde::Serialize + Debug,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        reqwest_cross::fetch(self.build_request(path_spec, args, token), on_done)
    }

    fn build_request<T>(
        &self,
        path_spec: &PathSpec,
        args: &T,
        token: Option<&AuthToken>,
    ) -> reqwest::RequestBuilder
    where
        T: serde::Serialize + Debug,
    {
        let method = path_spec.method.clone();
        let mut request = self
            .api_client
            .request(method.clone(), self.path_to_url(&path_spec.path));
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }
        if method == Method::GET || method == Method::DELETE {
            request.query(args)
        } else {
            request.json(args)
        }
    }

    /// Sends the request and hands the outcome to `convert` before passing it
    /// on to the receiver
    fn send_request_with<T, U, V, F, C>(
        &self,
        path_spec: &PathSpec,
        args: &T,
        token: Option<&AuthToken>,
        ui_notify: F,
        convert: C,
    ) -> oneshot::Receiver<anyhow::Result<V>>
    where
        T: serde::Serialize + Debug,
        U: Debug + DeserializeOwned + 'static,
        V: Send + Debug + 'static,
        F: UiCallBack,
        C: 'static + Send + FnOnce(Result<Option<U>, ResponseError>) -> anyhow::Result<V>,
    {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = convert(process_envelope(resp).await);
            deliver(tx, msg);
            ui_notify();
        };
        self.initiate_request_with_token(path_spec, args, token, on_done);
        rx
    }

    /// Fails if the backend sends no `data`
    fn send_request_expect_data<F, T, U>(
        &self,
        path_spec: &PathSpec,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<U>>
    where
        T: serde::Serialize + Debug,
        F: UiCallBack,
        U: Send + Debug + DeserializeOwned + 'static,
    {
        let token = self.token();
        self.send_request_with(path_spec, args, token.as_ref(), ui_notify, |outcome| {
            outcome?
                .ok_or(EnvelopeError::MissingData)
                .map_err(anyhow::Error::from)
        })
    }

    fn send_request_expect_maybe_data<F, T, U>(
        &self,
        path_spec: &PathSpec,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Option<U>>>
    where
        T: serde::Serialize + Debug,
        F: UiCallBack,
        U: Send + Debug + DeserializeOwned + 'static,
    {
        let token = self.token();
        self.send_request_with(path_spec, args, token.as_ref(), ui_notify, |outcome| {
            Ok(outcome?)
        })
    }

    /// Any `data` sent back is ignored
    fn send_request_expect_ok<F, T>(
        &self,
        path_spec: &PathSpec,
        args: &T,
        token: Option<&AuthToken>,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>>
    where
        T: serde::Serialize + Debug,
        F: UiCallBack,
    {
        self.send_request_with(
            path_spec,
            args,
            token,
            ui_notify,
            |outcome: Result<Option<serde_json::Value>, ResponseError>| {
                outcome?;
                Ok(())
            },
        )
    }

    fn send_request_no_wait<T>(&self, path_spec: &PathSpec, args: &T, token: Option<&AuthToken>)
    where
        T: serde::Serialize + Debug,
    {
        self.initiate_request_with_token(path_spec, args, token, |_| async {});
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }

    /// Used only for follow up requests made while a login is in progress
    async fn fetch_current_user(&self, token: &AuthToken) -> Result<UserProfile, AuthError> {
        let response = self
            .build_request(&PATH_AUTH_ME, &DUMMY_ARGUMENT, Some(token))
            .send()
            .await;
        process_current_user(response).await
    }

    fn lock_inner(&self) -> MutexGuard<'_, ClientInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn token(&self) -> Option<AuthToken> {
        self.lock_inner().session.state().token().cloned()
    }

    pub fn auth_state(&self) -> AuthState {
        self.lock_inner().session.state().clone()
    }

    /// Changes every time the authentication state changes
    pub fn auth_revision(&self) -> u64 {
        self.lock_inner().session.revision()
    }

    pub fn user_info(&self) -> Option<Arc<UserProfile>> {
        self.lock_inner().session.state().user().cloned()
    }

    /// The user permission checks should be made against. Take a new snapshot
    /// each frame, it is replaced on login and logout.
    pub fn evaluator_snapshot(&self) -> Option<Arc<UserProfile>> {
        self.user_info()
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock_inner().session.state().is_authenticated()
    }

    pub fn is_auth_loading(&self) -> bool {
        self.lock_inner().session.state().is_loading()
    }

    /// Moves to unauthenticated and returns the token that was in use
    fn end_session(&self) -> Option<AuthToken> {
        let mut inner = self.lock_inner();
        let token = inner.session.state().token().cloned();
        inner.session.dispatch(AuthAction::Logout);
        token
    }
}

/// The UI may have gone away while the request was in flight, that is not an
/// error
fn deliver<T: Debug>(tx: oneshot::Sender<T>, msg: T) {
    if let Err(undelivered) = tx.send(msg) {
        debug!(?undelivered, "receiver dropped before the response arrived");
    }
}

#[tracing::instrument(err(Debug), skip(client))]
async fn process_login(
    response: reqwest::Result<reqwest::Response>,
    client: &Client,
) -> Result<Session, AuthError> {
    let data: LoginResponseData = process_envelope(response)
        .await?
        .ok_or(AuthError::MissingToken)?;
    let token: AuthToken = data
        .token
        .ok_or(AuthError::MissingToken)?
        .try_into()
        .map_err(|_| AuthError::MissingToken)?;
    let user = match data.user {
        Some(raw_user) => raw_user.try_into()?,
        None => {
            debug!("login response has no user, fetching it");
            client.fetch_current_user(&token).await?
        }
    };
    Ok(Session::new(user, token))
}

#[tracing::instrument(err(Debug))]
async fn process_current_user(
    response: reqwest::Result<reqwest::Response>,
) -> Result<UserProfile, AuthError> {
    let data: CurrentUserResponseData = process_envelope(response)
        .await?
        .ok_or(AuthError::MissingUser)?;
    Ok(RawUserProfile::from(data).try_into()?)
}

/// Unwraps the envelope every backend response comes in
///
/// NB: The body is not logged as it may contain a token
#[tracing::instrument(err(Debug))]
async fn process_envelope<T>(
    response: reqwest::Result<reqwest::Response>,
) -> Result<Option<T>, ResponseError>
where
    T: Debug + DeserializeOwned,
{
    let (response, status) = extract_response(response)?;
    let is_refused = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN);
    let body = response
        .bytes()
        .await
        .context("failed to read response body")?;
    match serde_json::from_slice::<ApiEnvelope<T>>(&body) {
        Ok(envelope) if is_refused => Err(EnvelopeError::Rejected {
            status: status.as_u16(),
            message: envelope.message,
            error: envelope.error,
        }
        .into()),
        Ok(envelope) => Ok(envelope.into_result()?),
        Err(_) if is_refused => Err(ResponseError::Refused(status)),
        Err(e) => Err(anyhow!(
            "unexpected response with status {status}: {e}. Body: {:?}",
            String::from_utf8_lossy(&body)
        )
        .into()),
    }
}

/// Provides a way to standardize the error message
#[tracing::instrument(ret, err(Debug))]
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<(reqwest::Response, StatusCode)> {
    if response.is_err() {
        info!("Response is err: {:#?}", response);
    }
    let response = response.context("failed to send request")?;
    let status = response.status();
    Ok((response, status))
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}
