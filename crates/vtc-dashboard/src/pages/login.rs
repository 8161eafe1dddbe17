use futures::channel::oneshot;
use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;
use tracing::{error, info};
use vtc_shared::{internal_error, req_args::LoginReqArgs};

use crate::{
    router::Route,
    ui_helpers::{ui_error_label, ui_password_edit, wake_fn},
    DataShared,
};

#[derive(Debug)]
pub struct UiLogin {
    username: String,
    password: SecretString,
    login_attempt_status: LoginAttemptStatus,
}

type AwaitingType = oneshot::Receiver<anyhow::Result<()>>;

#[derive(Default)]
enum LoginAttemptStatus {
    #[default]
    NotAttempted,
    AwaitingResponse(AwaitingType),
    Failed(String),
}

impl Debug for LoginAttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAttempted => write!(f, "NotAttempted"),
            Self::AwaitingResponse(_) => write!(f, "AwaitingResponse"),
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

impl LoginAttemptStatus {
    fn is_allowed_to_login(&self) -> bool {
        match self {
            LoginAttemptStatus::NotAttempted | LoginAttemptStatus::Failed(_) => true,
            LoginAttemptStatus::AwaitingResponse(_) => false,
        }
    }
}

/// Where to go once logged in
pub fn target_after_login(redirect: Option<&str>) -> Route {
    match redirect.map(Route::parse) {
        Some(route) if !route.is_public() => route,
        _ => Route::Home,
    }
}

impl UiLogin {
    fn is_password_set(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }

    fn is_allowed_to_login(&self) -> bool {
        !self.username.trim().is_empty()
            && self.is_password_set()
            && self.login_attempt_status.is_allowed_to_login()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared, redirect: Option<&str>) {
        if data_shared.client.is_logged_in() {
            // Either restored on start up or the attempt below succeeded
            self.password = SecretString::from("");
            self.login_attempt_status = LoginAttemptStatus::NotAttempted;
            data_shared.redirect_after_frame(target_after_login(redirect));
            return;
        }

        ui.vertical_centered(|ui| {
            ui.heading("Login");
            if data_shared.client.is_auth_loading()
                && !matches!(
                    self.login_attempt_status,
                    LoginAttemptStatus::AwaitingResponse(_)
                )
            {
                ui.label("Checking for a previous session...");
            }

            self.login_prompt(ui, data_shared);
            self.check_login_attempt_status(ui);
            self.login_button(ui, data_shared);

            ui.separator();
            if ui.link("Forgot password?").clicked() {
                data_shared.navigate_after_frame(Route::ForgotPassword);
            }
        });
    }

    fn login_prompt(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let mut lost_focus = ui
            .add(egui::TextEdit::singleline(&mut self.username).hint_text("Username or email"))
            .lost_focus();

        lost_focus =
            ui_password_edit(ui, &mut self.password, "Password").lost_focus() || lost_focus;

        if lost_focus && self.is_allowed_to_login() && ui.input(|i| i.key_pressed(egui::Key::Enter))
        {
            self.send_login_attempt(ui, data_shared)
        }
    }

    fn check_login_attempt_status(&mut self, ui: &mut egui::Ui) {
        match &mut self.login_attempt_status {
            LoginAttemptStatus::NotAttempted => {}
            LoginAttemptStatus::AwaitingResponse(rx) => match rx.try_recv() {
                Ok(Some(Ok(()))) => {
                    info!("login succeeded");
                    // Redirect happens on the next frame once the session is seen
                    self.login_attempt_status = LoginAttemptStatus::NotAttempted;
                    ui.ctx().request_repaint();
                }
                Ok(Some(Err(e))) => {
                    info!("error returned from client-core: {e:?}");
                    self.login_attempt_status = LoginAttemptStatus::Failed(e.to_string());
                }
                Ok(None) => {
                    ui.spinner();
                }
                Err(e) => {
                    error!("Error receiving on channel. Canceled: {e:?}");
                    self.login_attempt_status = LoginAttemptStatus::Failed(internal_error!(e));
                }
            },
            LoginAttemptStatus::Failed(e) => {
                ui.separator();
                ui_error_label(ui, &format!("Login failed: {e}"));
                if ui.button("Clear error").clicked() {
                    self.login_attempt_status = LoginAttemptStatus::NotAttempted;
                }
                ui.separator();
            }
        }
    }

    fn login_button(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        if ui
            .add_enabled(self.is_allowed_to_login(), egui::Button::new("Login"))
            .clicked()
        {
            self.send_login_attempt(ui, data_shared);
        }
    }

    fn send_login_attempt(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let args = LoginReqArgs::new(self.username.trim(), self.password.clone());
        let rx = data_shared.client.login(args, wake_fn(ui.ctx().clone()));
        self.login_attempt_status = LoginAttemptStatus::AwaitingResponse(rx);
    }
}

impl Default for UiLogin {
    fn default() -> Self {
        Self {
            username: Default::default(),
            password: SecretString::from(""),
            login_attempt_status: Default::default(),
        }
    }
}
