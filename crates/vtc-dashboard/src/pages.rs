use std::collections::HashMap;

use tracing::info;
use vtc_shared::{id::DbId, resource::ResourceKind};

use crate::{guard::PageGuard, router::Route, DataShared};

pub mod agent_detail;
pub mod data_state;
pub mod forgot_password;
pub mod home;
pub mod login;
pub mod resource_list;

use agent_detail::UiAgentDetail;
use forgot_password::UiForgotPassword;
use home::UiHome;
pub use login::UiLogin;
use resource_list::UiResourceList;

/// State of every page, kept while navigating between them
#[derive(Debug, Default)]
pub struct Pages {
    login: UiLogin,
    forgot_password: UiForgotPassword,
    home: UiHome,
    resource_lists: HashMap<ResourceKind, UiResourceList>,
    agent_detail: Option<UiAgentDetail>,
}

impl Pages {
    /// Shows the page of the current route. Anything not public goes through
    /// the page guard first.
    pub fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let route = data_shared.router.current().clone();
        match &route {
            Route::Login { redirect } => self.login.show(ui, data_shared, redirect.as_deref()),
            Route::ForgotPassword => self.forgot_password.show(ui, data_shared),
            _ => {
                PageGuard::show(ui, data_shared, route.required_roles(), |ui, data_shared| {
                    self.show_protected(ui, data_shared, &route)
                });
            }
        }
    }

    fn show_protected(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared, route: &Route) {
        match route {
            Route::Home => self.home.show(ui, data_shared),
            Route::Resources(kind) => self
                .resource_lists
                .entry(*kind)
                .or_insert_with(|| UiResourceList::new(*kind))
                .show(ui, data_shared),
            Route::Agent(id) => self.agent_detail_for(*id).show(ui, data_shared),
            Route::NotFound(path) => ui_not_found(ui, data_shared, path),
            // Shown without the guard
            Route::Login { .. } | Route::ForgotPassword => {}
        }
    }

    /// Only the last agent opened is kept
    fn agent_detail_for(&mut self, id: DbId) -> &mut UiAgentDetail {
        if self.agent_detail.as_ref().map(UiAgentDetail::id) != Some(id) {
            info!(?id, "opening agent detail");
            self.agent_detail = Some(UiAgentDetail::new(id));
        }
        self.agent_detail.get_or_insert_with(|| UiAgentDetail::new(id))
    }
}

fn ui_not_found(ui: &mut egui::Ui, data_shared: &mut DataShared, path: &str) {
    ui.vertical_centered(|ui| {
        ui.heading("Page not found");
        ui.label(format!("Nothing is available at {path}"));
        if ui.button("Return home").clicked() {
            data_shared.navigate_after_frame(Route::Home);
        }
    });
}
