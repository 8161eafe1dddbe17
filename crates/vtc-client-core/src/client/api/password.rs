//! Password recovery, none of these need to be logged in

use anyhow::anyhow;
use futures::channel::oneshot;
use vtc_shared::{
    const_config::path::{
        PATH_AUTH_FORGOT_PASSWORD, PATH_AUTH_RESET_PASSWORD, PATH_AUTH_VERIFY_OTP,
    },
    req_args::auth::{ForgotPasswordReqArgs, ResetPasswordReqArgs, VerifyOtpReqArgs},
};

use crate::{client::UiCallBack, Client};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn forgot_password<F: UiCallBack>(
        &self,
        args: &ForgotPasswordReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_ok(&PATH_AUTH_FORGOT_PASSWORD, args, None, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn verify_otp<F: UiCallBack>(
        &self,
        args: &VerifyOtpReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_ok(&PATH_AUTH_VERIFY_OTP, args, None, ui_notify)
    }

    /// Mismatched passwords are refused without contacting the backend
    #[tracing::instrument(skip(ui_notify))]
    pub fn reset_password<F: UiCallBack>(
        &self,
        args: &ResetPasswordReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        if !args.passwords_match() {
            let (tx, rx) = oneshot::channel();
            crate::client::deliver(tx, Err(anyhow!("Passwords do not match")));
            ui_notify();
            return rx;
        }
        self.send_request_expect_ok(
            &PATH_AUTH_RESET_PASSWORD,
            &args.to_json_body(),
            None,
            ui_notify,
        )
    }
}
