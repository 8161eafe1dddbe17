use secrecy::{ExposeSecret as _, SecretString};
use vtc_shared::req_args::auth::{ForgotPasswordReqArgs, ResetPasswordReqArgs, VerifyOtpReqArgs};

use super::data_state::{AwaitingType, DataState};
use crate::{
    router::Route,
    ui_helpers::{ui_error_label, ui_password_edit, wake_fn},
    DataShared,
};

/// Request a code by email, confirm it, then choose a new password
#[derive(Debug)]
pub struct UiForgotPassword {
    step: Step,
    email: String,
    otp: String,
    new_password: SecretString,
    new_password_check: SecretString,
    request: DataState<()>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Step {
    #[default]
    Email,
    Otp,
    NewPassword,
    Done,
}

impl Step {
    fn next(self) -> Self {
        match self {
            Step::Email => Step::Otp,
            Step::Otp => Step::NewPassword,
            Step::NewPassword | Step::Done => Step::Done,
        }
    }
}

impl Default for UiForgotPassword {
    fn default() -> Self {
        Self {
            step: Default::default(),
            email: Default::default(),
            otp: Default::default(),
            new_password: SecretString::from(""),
            new_password_check: SecretString::from(""),
            request: Default::default(),
        }
    }
}

impl UiForgotPassword {
    pub fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        ui.vertical_centered(|ui| {
            ui.heading("Forgot Password");
            self.ui_step(ui);
            self.check_request(ui, data_shared);
            ui.separator();
            if ui.link("Back to login").clicked() {
                *self = Default::default();
                data_shared.navigate_after_frame(Route::Login { redirect: None });
            }
        });
    }

    fn ui_step(&mut self, ui: &mut egui::Ui) {
        let is_editable = !self.request.is_awaiting();
        match self.step {
            Step::Email => {
                ui.label("Enter the email address of your account to receive a code.");
                ui.add_enabled(
                    is_editable,
                    egui::TextEdit::singleline(&mut self.email).hint_text("Email"),
                );
            }
            Step::Otp => {
                ui.label(format!("Enter the code sent to {}", self.email));
                ui.add_enabled(
                    is_editable,
                    egui::TextEdit::singleline(&mut self.otp).hint_text("Code"),
                );
            }
            Step::NewPassword => {
                ui_password_edit(ui, &mut self.new_password, "New password");
                ui_password_edit(ui, &mut self.new_password_check, "Confirm new password");
                if !self.passwords_match() {
                    ui_error_label(ui, "Passwords do not match");
                }
            }
            Step::Done => {
                ui.label("Your password has been reset. You can now log in.");
            }
        }
    }

    fn passwords_match(&self) -> bool {
        self.new_password.expose_secret() == self.new_password_check.expose_secret()
    }

    fn can_submit(&self) -> bool {
        match self.step {
            Step::Email => !self.email.trim().is_empty(),
            Step::Otp => !self.otp.trim().is_empty(),
            Step::NewPassword => {
                !self.new_password.expose_secret().is_empty() && self.passwords_match()
            }
            Step::Done => false,
        }
    }

    fn check_request(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        match &mut self.request {
            DataState::None => {
                if self.step != Step::Done
                    && ui
                        .add_enabled(self.can_submit(), egui::Button::new("Continue"))
                        .clicked()
                {
                    let rx = self.send(ui, data_shared);
                    self.request = DataState::AwaitingResponse(rx);
                }
            }
            DataState::AwaitingResponse(rx) => {
                if let Some(new_state) = DataState::await_data(Some(ui), rx) {
                    self.request = new_state;
                }
            }
            DataState::Present(()) => {
                self.step = self.step.next();
                self.request = DataState::None;
                ui.ctx().request_repaint();
            }
            DataState::Failed(e) => {
                ui_error_label(ui, e);
                if ui.button("Try again").clicked() {
                    self.request = DataState::None;
                }
            }
        }
    }

    fn send(&self, ui: &egui::Ui, data_shared: &DataShared) -> AwaitingType<()> {
        let ui_notify = wake_fn(ui.ctx().clone());
        let email = self.email.trim().to_string();
        let client = &data_shared.client;
        AwaitingType(match self.step {
            Step::Email => client.forgot_password(&ForgotPasswordReqArgs { email }, ui_notify),
            Step::Otp => client.verify_otp(
                &VerifyOtpReqArgs {
                    email,
                    otp: self.otp.trim().to_string(),
                },
                ui_notify,
            ),
            Step::NewPassword | Step::Done => client.reset_password(
                &ResetPasswordReqArgs {
                    email,
                    otp: self.otp.trim().to_string(),
                    new_password: self.new_password.clone(),
                    new_password_check: self.new_password_check.clone(),
                },
                ui_notify,
            ),
        })
    }
}
