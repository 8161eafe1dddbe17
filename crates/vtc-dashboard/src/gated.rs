//! Widgets that only show their contents to users with the required
//! permissions
//!
//! Both accept anything convertible into an [`AccessRequirement`]: a `&str`
//! is a single guard name and a list is checked as "any of" unless built with
//! [`AccessRequirement::all`]. Users with all access always pass.

use vtc_shared::uac::{AccessRequirement, PermissionEvaluator};

use crate::router::Route;

/// What to show instead of the contents when access is refused
#[derive(Default)]
pub struct GateOptions<'f> {
    /// Replaces the default denial panel
    pub fallback: Option<Box<dyn FnOnce(&mut egui::Ui) + 'f>>,
    /// Adds a button to the default denial panel
    pub redirect: Option<Route>,
}

impl<'f> GateOptions<'f> {
    pub fn with_fallback(fallback: impl FnOnce(&mut egui::Ui) + 'f) -> Self {
        Self {
            fallback: Some(Box::new(fallback)),
            redirect: None,
        }
    }

    pub fn with_redirect(route: Route) -> Self {
        Self {
            fallback: None,
            redirect: Some(route),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateResponse<R> {
    /// Set only if access was granted
    pub inner: Option<R>,
    /// Set when the redirect button of the denial panel was clicked
    pub redirect_to: Option<Route>,
}

impl<R> GateResponse<R> {
    pub fn is_granted(&self) -> bool {
        self.inner.is_some()
    }
}

/// Shows `add_contents` if allowed, otherwise the fallback or a denial panel
pub fn permission_guard<'r, R>(
    ui: &mut egui::Ui,
    evaluator: &PermissionEvaluator<'_>,
    requirement: impl Into<AccessRequirement<'r>>,
    options: GateOptions<'_>,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> GateResponse<R> {
    if evaluator.allows(&requirement.into()) {
        return GateResponse {
            inner: Some(add_contents(ui)),
            redirect_to: None,
        };
    }

    let GateOptions { fallback, redirect } = options;
    let redirect_to = match fallback {
        Some(fallback) => {
            fallback(ui);
            None
        }
        None => ui_denial_panel(ui, redirect),
    };
    GateResponse {
        inner: None,
        redirect_to,
    }
}

/// Shows `add_contents` if allowed and nothing at all otherwise
pub fn can<'r, R>(
    ui: &mut egui::Ui,
    evaluator: &PermissionEvaluator<'_>,
    requirement: impl Into<AccessRequirement<'r>>,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> Option<R> {
    evaluator
        .allows(&requirement.into())
        .then(|| add_contents(ui))
}

fn ui_denial_panel(ui: &mut egui::Ui, redirect: Option<Route>) -> Option<Route> {
    ui.group(|ui| {
        ui.colored_label(ui.visuals().error_fg_color, "Access denied");
        ui.label("You do not have permission to access this content.");
        let route = redirect?;
        ui.button(format!("Go to {}", route.title()))
            .clicked()
            .then_some(route)
    })
    .inner
}
