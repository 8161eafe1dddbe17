use secrecy::{ExposeSecret as _, SecretString};
use vtc_client_core::UiCallBack;

pub fn get_text_height(ui: &mut egui::Ui) -> f32 {
    egui::TextStyle::Body
        .resolve(ui.style())
        .size
        .max(ui.spacing().interact_size.y)
}

pub fn ui_password_edit(
    ui: &mut egui::Ui,
    password: &mut SecretString,
    hint_text: &str,
) -> egui::Response {
    let mut temp = password.expose_secret().to_owned();
    let result = ui.add(
        egui::TextEdit::singleline(&mut temp)
            .password(true)
            .hint_text(hint_text),
    );
    *password = SecretString::from(temp);
    result
}

pub fn ui_error_label(ui: &mut egui::Ui, msg: &str) {
    ui.colored_label(ui.visuals().error_fg_color, msg);
}

/// Requests a repaint when a response arrives
#[inline]
pub fn wake_fn(ctx: egui::Context) -> impl UiCallBack {
    move || ctx.request_repaint()
}
