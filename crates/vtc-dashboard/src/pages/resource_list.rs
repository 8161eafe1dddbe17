use egui_extras::{Column, TableBuilder};
use tracing::info;
use vtc_shared::{
    id::DbId,
    req_args::PageReqArgs,
    resource::{Paginated, ResourceKind, ResourceRecord},
    uac::PermissionEvaluator,
};

use super::data_state::{AwaitingType, DataState};
use crate::{
    gated::{can, permission_guard, GateOptions},
    router::Route,
    ui_helpers::{get_text_height, ui_error_label, wake_fn},
    DataShared,
};

const PAGE_SIZE_CHOICES: [u32; 4] = [10, 20, 50, 100];

/// Paginated, searchable table of one backend collection
#[derive(Debug)]
pub struct UiResourceList {
    kind: ResourceKind,
    page: u32,
    search: String,
    applied_search: String,
    data_state: DataState<Paginated<ResourceRecord>>,
    pending_delete: Option<DbId>,
    delete_state: DataState<()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowAction {
    Open(DbId),
    Delete(DbId),
}

impl UiResourceList {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            page: 1,
            search: Default::default(),
            applied_search: Default::default(),
            data_state: Default::default(),
            pending_delete: None,
            delete_state: Default::default(),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let user = data_shared.current_user();
        let evaluator = PermissionEvaluator::new(user.as_deref());
        let response = permission_guard(
            ui,
            &evaluator,
            self.kind.permissions().view,
            GateOptions::with_redirect(Route::Home),
            |ui| self.ui_contents(ui, data_shared, &evaluator),
        );
        if let Some(route) = response.redirect_to {
            data_shared.navigate_after_frame(route);
        }
    }

    fn page_args(&self, per_page: u32) -> PageReqArgs {
        PageReqArgs::default()
            .page(self.page)
            .per_page(per_page)
            .search(self.applied_search.as_str())
    }

    /// Discards the loaded page so it is requested again on the next frame
    fn reload(&mut self) {
        self.data_state = DataState::None;
    }

    fn apply_search(&mut self) {
        if self.search.trim() != self.applied_search {
            self.applied_search = self.search.trim().to_string();
            self.page = 1;
            self.reload();
        }
    }

    fn go_to_page(&mut self, page: u32) {
        self.page = page.max(1);
        self.reload();
    }

    fn ui_contents(
        &mut self,
        ui: &mut egui::Ui,
        data_shared: &mut DataShared,
        evaluator: &PermissionEvaluator<'_>,
    ) {
        ui.horizontal(|ui| {
            ui.heading(self.kind.title());
            if ui.button("Refresh").clicked() {
                self.reload();
            }
        });
        self.ui_search(ui);
        self.ui_page_size(ui, data_shared);
        ui.separator();
        self.ui_pending_delete(ui, data_shared);

        let action = if let Some(page) = self.data_state.present() {
            let action = ui_table(ui, self.kind, page, evaluator);
            self.ui_pagination(ui);
            action
        } else {
            let args = self.page_args(data_shared.preferences.per_page);
            let ctx = ui.ctx().clone();
            let kind = self.kind;
            let client = &data_shared.client;
            self.data_state.get(Some(ui), Some("Reload"), || {
                AwaitingType(client.list_page(kind, &args, wake_fn(ctx)))
            });
            None
        };

        match action {
            Some(RowAction::Open(id)) => data_shared.navigate_after_frame(Route::Agent(id)),
            Some(RowAction::Delete(id)) => {
                self.pending_delete = Some(id);
                self.delete_state = DataState::None;
            }
            None => {}
        }
    }

    fn ui_search(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let response = ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("Search"));
            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Search").clicked() || entered {
                self.apply_search();
            }
            if !self.applied_search.is_empty() && ui.button("Clear").clicked() {
                self.search.clear();
                self.apply_search();
            }
        });
    }

    fn ui_page_size(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let before = data_shared.preferences.per_page;
        egui::ComboBox::from_label("Rows per page")
            .selected_text(before.to_string())
            .show_ui(ui, |ui| {
                for choice in PAGE_SIZE_CHOICES {
                    ui.selectable_value(
                        &mut data_shared.preferences.per_page,
                        choice,
                        choice.to_string(),
                    );
                }
            });
        if data_shared.preferences.per_page != before {
            self.go_to_page(1);
        }
    }

    fn ui_pagination(&mut self, ui: &mut egui::Ui) {
        let Some(page) = self.data_state.present() else {
            return;
        };
        let (has_previous, has_next) = (page.has_previous(), page.has_next());
        let (current, count, total) = (page.page, page.page_count(), page.total);
        let mut target = None;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(has_previous, egui::Button::new("Previous"))
                .clicked()
            {
                target = Some(current.saturating_sub(1));
            }
            ui.label(format!("Page {current} of {count} ({total} total)"));
            if ui.add_enabled(has_next, egui::Button::new("Next")).clicked() {
                target = Some(current + 1);
            }
        });
        if let Some(target) = target {
            self.go_to_page(target);
        }
    }

    fn ui_pending_delete(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let Some(id) = self.pending_delete else {
            return;
        };
        ui.group(|ui| match &mut self.delete_state {
            DataState::None => {
                ui.label(format!("Delete record #{id}? This cannot be undone."));
                ui.horizontal(|ui| {
                    if ui.button("Confirm delete").clicked() {
                        let rx = data_shared
                            .client
                            .delete(self.kind, id, wake_fn(ui.ctx().clone()));
                        self.delete_state = DataState::AwaitingResponse(AwaitingType(rx));
                    }
                    if ui.button("Cancel").clicked() {
                        self.pending_delete = None;
                    }
                });
            }
            DataState::AwaitingResponse(rx) => {
                if let Some(new_state) = DataState::await_data(Some(ui), rx) {
                    self.delete_state = new_state;
                }
            }
            DataState::Present(()) => {
                info!(kind = %self.kind, ?id, "record deleted");
                self.pending_delete = None;
                self.delete_state = DataState::None;
                self.reload();
            }
            DataState::Failed(e) => {
                ui_error_label(ui, &format!("Delete failed: {e}"));
                if ui.button("Dismiss").clicked() {
                    self.pending_delete = None;
                    self.delete_state = DataState::None;
                }
            }
        });
    }
}

/// Returns what was clicked on one of the rows, if anything
fn ui_table(
    ui: &mut egui::Ui,
    kind: ResourceKind,
    page: &Paginated<ResourceRecord>,
    evaluator: &PermissionEvaluator<'_>,
) -> Option<RowAction> {
    if page.items.is_empty() {
        ui.label("No records found");
        return None;
    }

    let columns = kind.columns();
    let text_height = get_text_height(ui);
    let mut action = None;
    let table_builder = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto())
        .columns(Column::auto(), columns.len())
        .column(Column::remainder())
        .min_scrolled_height(0.0);

    let table = table_builder.header(text_height, |mut header| {
        header.col(|ui| {
            ui.strong("ID");
        });
        for (_, title) in columns {
            header.col(|ui| {
                ui.strong(*title);
            });
        }
        header.col(|ui| {
            ui.strong("Actions");
        });
    });

    table.body(|body| {
        body.rows(text_height, page.items.len(), |mut row| {
            let record = &page.items[row.index()];
            let id = record.id();
            row.col(|ui| {
                ui.label(id.map(|x| x.to_string()).unwrap_or_default());
            });
            for (key, _) in columns {
                row.col(|ui| {
                    ui.label(record.display_field(key));
                });
            }
            row.col(|ui| {
                let Some(id) = id else {
                    return;
                };
                if kind == ResourceKind::Agents && ui.button("Open").clicked() {
                    action = Some(RowAction::Open(id));
                }
                if can(ui, evaluator, kind.permissions().delete, |ui| {
                    ui.button("Delete").clicked()
                }) == Some(true)
                {
                    action = Some(RowAction::Delete(id));
                }
            });
        });
    });
    action
}
