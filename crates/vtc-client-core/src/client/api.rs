use futures::channel::oneshot;
use vtc_shared::const_config::path::PATH_AUTH_LOGOUT;

use crate::{
    client::{UiCallBack, DUMMY_ARGUMENT},
    Client,
};

pub mod password;
pub mod resources;

impl Client {
    /// Local state is cleared before the backend is told, so the user is
    /// logged out here even if the request fails
    #[tracing::instrument(skip(ui_notify))]
    pub fn logout<F: UiCallBack>(&self, ui_notify: F) -> oneshot::Receiver<anyhow::Result<()>> {
        let token = self.end_session();
        self.send_request_expect_ok(&PATH_AUTH_LOGOUT, &DUMMY_ARGUMENT, token.as_ref(), ui_notify)
    }

    #[tracing::instrument]
    pub fn logout_no_wait(&self) {
        let token = self.end_session();
        self.send_request_no_wait(&PATH_AUTH_LOGOUT, &DUMMY_ARGUMENT, token.as_ref());
    }
}
