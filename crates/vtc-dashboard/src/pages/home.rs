use strum::IntoEnumIterator as _;
use vtc_shared::{resource::ResourceKind, uac::PermissionEvaluator};

use crate::{gated::can, router::Route, DataShared};

#[derive(Debug, Default)]
pub struct UiHome;

impl UiHome {
    pub fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let Some(user) = data_shared.current_user() else {
            return;
        };
        let evaluator = PermissionEvaluator::new(Some(user.as_ref()));

        ui.heading(format!("Welcome {}", user.display_name()));
        let roles = evaluator
            .role_names()
            .map(|x| x.to_string())
            .collect::<Vec<_>>();
        if roles.is_empty() {
            ui.label("No roles assigned");
        } else {
            ui.label(format!("Roles: {}", roles.join(", ")));
        }
        ui.separator();

        let mut selected = None;
        ui.horizontal_wrapped(|ui| {
            for kind in ResourceKind::iter() {
                if can(ui, &evaluator, kind.permissions().view, |ui| {
                    ui.button(kind.title()).clicked()
                }) == Some(true)
                {
                    selected = Some(Route::Resources(kind));
                }
            }
        });
        if let Some(route) = selected {
            data_shared.navigate_after_frame(route);
        }
    }
}
