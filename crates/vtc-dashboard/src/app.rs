use futures::channel::oneshot;
use std::sync::Arc;
use strum::IntoEnumIterator as _;
use tracing::{info, instrument, warn};
use vtc_client_core::Client;
use vtc_shared::{
    const_config::client::CLIENT_DEFAULT_PAGE_SIZE,
    resource::ResourceKind,
    uac::{PermissionEvaluator, UserProfile},
};
use vtc_time::Timestamp;

use crate::{
    gated::can,
    guard::RedirectOnce,
    pages::Pages,
    router::{Route, Router},
    ui_helpers::wake_fn,
};

pub struct VtcApp {
    data_shared: DataShared,
    pages: Pages,
    restoration: Restoration,
}

#[derive(Debug, Default)]
enum Restoration {
    #[default]
    NotStarted,
    Pending(oneshot::Receiver<bool>),
    Done,
}

/// Settings kept between runs
#[derive(Debug, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Preferences {
    pub per_page: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            per_page: CLIENT_DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug)]
enum PendingNavigation {
    Push(Route),
    Replace(Route),
}

/// Passed to every page. Holds the single [`Client`] and so the session.
#[derive(Debug)]
pub struct DataShared {
    pub client: Client,
    pub router: Router,
    pub preferences: Preferences,
    pub(crate) redirect_once: RedirectOnce,
    /// Navigations requested while drawing are applied after the frame
    pending_navigation: Option<PendingNavigation>,
}

impl DataShared {
    pub fn new(client: Client, initial_route: Route) -> Self {
        Self {
            client,
            router: Router::new(initial_route),
            preferences: Default::default(),
            redirect_once: Default::default(),
            pending_navigation: None,
        }
    }

    pub fn navigate_after_frame(&mut self, route: Route) {
        self.pending_navigation = Some(PendingNavigation::Push(route));
    }

    pub fn redirect_after_frame(&mut self, route: Route) {
        self.pending_navigation = Some(PendingNavigation::Replace(route));
    }

    /// The user to build a [`PermissionEvaluator`] from, taken once per frame
    pub fn current_user(&self) -> Option<Arc<UserProfile>> {
        self.client.evaluator_snapshot()
    }

    #[instrument(skip(self), fields(pending = ?self.pending_navigation))]
    pub(crate) fn apply_pending_navigation(&mut self) {
        match self.pending_navigation.take() {
            Some(PendingNavigation::Push(route)) => self.router.navigate(route),
            Some(PendingNavigation::Replace(route)) => self.router.replace(route),
            None => {}
        }
    }
}

impl eframe::App for VtcApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        info!("Saving with key: {}", eframe::APP_KEY);
        eframe::set_value(storage, eframe::APP_KEY, &self.data_shared.preferences);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_restoration(ctx);
        self.data_shared.router.sync_from_location();
        self.top_panel(ctx);
        self.bottom_panel(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both()
                .auto_shrink([false, false])
                .show(ui, |ui| self.pages.show(ui, &mut self.data_shared));
        });
        self.data_shared.apply_pending_navigation();

        // Keeps the clock ticking
        ctx.request_repaint_after(std::time::Duration::from_secs(1));
    }
}

impl VtcApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, client: Client, initial_route: Route) -> Self {
        let mut data_shared = DataShared::new(client, initial_route);
        if let Some(storage) = cc.storage {
            info!("Storage found. Loading...");
            match eframe::get_value(storage, eframe::APP_KEY) {
                Some(preferences) => {
                    info!("Loaded succeeded");
                    data_shared.preferences = preferences;
                }
                None => warn!("Load failed"),
            }
        } else {
            info!("No storage found");
        }
        Self {
            data_shared,
            pages: Default::default(),
            restoration: Default::default(),
        }
    }

    /// Restoration is started on the first frame and only ever once
    fn poll_restoration(&mut self, ctx: &egui::Context) {
        match &mut self.restoration {
            Restoration::NotStarted => {
                let rx = self.data_shared.client.check_auth(wake_fn(ctx.clone()));
                self.restoration = Restoration::Pending(rx);
            }
            Restoration::Pending(rx) => match rx.try_recv() {
                Ok(Some(is_authenticated)) => {
                    info!(is_authenticated, "session restoration finished");
                    self.restoration = Restoration::Done;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("session restoration result lost: {e:?}");
                    self.restoration = Restoration::Done;
                }
            },
            Restoration::Done => {}
        }
    }

    fn top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);
                ui.separator();
                ui.strong("VTC Admin");
                if self.data_shared.client.is_logged_in() {
                    ui.separator();
                    self.ui_menu_pages(ui);
                }
            });
        });
    }

    fn ui_menu_pages(&mut self, ui: &mut egui::Ui) {
        let user = self.data_shared.current_user();
        let evaluator = PermissionEvaluator::new(user.as_deref());
        let mut selected = None;
        ui.menu_button("Pages", |ui| {
            if ui.button(Route::Home.title().as_ref()).clicked() {
                selected = Some(Route::Home);
            }
            ui.separator();
            for kind in ResourceKind::iter() {
                let clicked = can(ui, &evaluator, kind.permissions().view, |ui| {
                    ui.button(kind.title()).clicked()
                });
                if clicked == Some(true) {
                    selected = Some(Route::Resources(kind));
                }
            }
            if selected.is_some() {
                ui.close_menu();
            }
        });
        if let Some(route) = selected {
            self.data_shared.navigate_after_frame(route);
        }
    }

    fn bottom_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::BOTTOM), |ui| {
                ui.label(Timestamp::now().display_as_locale_datetime());
                if let Some(user) = self.data_shared.current_user() {
                    if ui.button("Logout").clicked() {
                        self.logout();
                    }
                    ui.label(format!("Logged in as {}", user.display_name()));
                }
                egui::warn_if_debug_build(ui);
            });
        });
    }

    fn logout(&mut self) {
        self.data_shared.client.logout_no_wait();
        // Drop everything that was loaded while logged in
        self.pages = Default::default();
        self.data_shared
            .router
            .replace(Route::Login { redirect: None });
    }
}
