//! Page level check of the authentication state, run every frame for the
//! current page

use tracing::{debug, info};
use vtc_client_core::AuthState;
use vtc_shared::uac::PermissionEvaluator;

use crate::{router::Route, DataShared};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Authentication has not settled yet so nothing is decided
    Loading,
    RedirectToLogin,
    Denied,
    Render,
}

pub struct PageGuard;

impl PageGuard {
    /// `required_roles` empty means any logged in user may see the page
    pub fn decide(state: &AuthState, required_roles: &[&str]) -> GuardOutcome {
        match state {
            AuthState::Loading => GuardOutcome::Loading,
            AuthState::Unauthenticated => GuardOutcome::RedirectToLogin,
            AuthState::Authenticated(session) => {
                let evaluator = PermissionEvaluator::new(Some(session.user.as_ref()));
                if evaluator.has_required_role(required_roles) {
                    GuardOutcome::Render
                } else {
                    GuardOutcome::Denied
                }
            }
        }
    }

    /// Shows the page only if the guard allows it. Returns `None` when the
    /// contents were not shown.
    pub fn show<R>(
        ui: &mut egui::Ui,
        data_shared: &mut DataShared,
        required_roles: &[&str],
        add_contents: impl FnOnce(&mut egui::Ui, &mut DataShared) -> R,
    ) -> Option<R> {
        let state = data_shared.client.auth_state();
        let outcome = Self::decide(&state, required_roles);
        match outcome {
            GuardOutcome::Loading => {
                ui.centered_and_justified(|ui| ui.spinner());
                None
            }
            GuardOutcome::RedirectToLogin => {
                let revision = data_shared.client.auth_revision();
                let route = data_shared.router.current().clone();
                if data_shared.redirect_once.should_fire(revision, &route) {
                    data_shared.redirect_after_frame(route.login_returning_here());
                }
                None
            }
            GuardOutcome::Denied => {
                if ui_access_denied(ui) {
                    data_shared.navigate_after_frame(Route::Home);
                }
                None
            }
            GuardOutcome::Render => Some(add_contents(ui, data_shared)),
        }
    }
}

/// Static denial panel for pages, returns true if "return home" was clicked
pub fn ui_access_denied(ui: &mut egui::Ui) -> bool {
    ui.vertical_centered(|ui| {
        ui.heading("Access denied");
        ui.label("You do not have access to this page.");
        ui.button("Return home").clicked()
    })
    .inner
}

/// Lets a redirect happen at most once for each settled authentication state
/// and page it was requested from
#[derive(Debug, Default)]
pub struct RedirectOnce {
    fired_for: Option<(u64, Route)>,
}

impl RedirectOnce {
    pub fn should_fire(&mut self, revision: u64, route: &Route) -> bool {
        if let Some((fired_revision, fired_route)) = &self.fired_for {
            if *fired_revision == revision && fired_route == route {
                debug!(revision, ?route, "redirect already done for this page");
                return false;
            }
        }
        info!(revision, ?route, "redirect fired");
        self.fired_for = Some((revision, route.clone()));
        true
    }
}
