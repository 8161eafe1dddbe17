use tracing::info;
use vtc_shared::{
    const_config::uac::{UAC_AGENT_DELETE, UAC_AGENT_UPDATE, UAC_AGENT_VIEW},
    id::DbId,
    resource::{AgentSummary, ResourceKind},
    uac::{OwnedResource as _, PermissionEvaluator},
};

use super::data_state::{AwaitingType, DataState};
use crate::{
    router::Route,
    ui_helpers::{ui_error_label, wake_fn},
    DataShared,
};

/// One agent. Viewing and editing depend on who the agent belongs to.
#[derive(Debug)]
pub struct UiAgentDetail {
    id: DbId,
    agent: DataState<AgentSummary>,
    edit: Option<AgentEdit>,
    save_state: DataState<Option<AgentSummary>>,
    confirm_delete: bool,
    delete_state: DataState<()>,
}

/// What the current user may do with the loaded agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AgentActions {
    view: bool,
    update: bool,
    delete: bool,
}

impl AgentActions {
    fn for_agent(evaluator: &PermissionEvaluator<'_>, agent: &AgentSummary) -> Self {
        Self {
            view: evaluator.can_act_on(&UAC_AGENT_VIEW, agent),
            update: evaluator.can_act_on(&UAC_AGENT_UPDATE, agent),
            delete: evaluator.can_act_on(&UAC_AGENT_DELETE, agent),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct AgentEdit {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
}

impl From<&AgentSummary> for AgentEdit {
    fn from(agent: &AgentSummary) -> Self {
        Self {
            first_name: agent.first_name.clone().unwrap_or_default(),
            last_name: agent.last_name.clone().unwrap_or_default(),
            email: agent.email.clone().unwrap_or_default(),
            phone: agent.phone.clone().unwrap_or_default(),
        }
    }
}

impl AgentEdit {
    /// Empty fields are sent as null
    fn to_json_body(&self) -> serde_json::Value {
        let field = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        serde_json::json!({
            "first_name": field(&self.first_name),
            "last_name": field(&self.last_name),
            "email": field(&self.email),
            "phone": field(&self.phone),
        })
    }
}

impl UiAgentDetail {
    pub fn new(id: DbId) -> Self {
        Self {
            id,
            agent: Default::default(),
            edit: None,
            save_state: Default::default(),
            confirm_delete: false,
            delete_state: Default::default(),
        }
    }

    pub fn id(&self) -> DbId {
        self.id
    }

    pub fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        ui.horizontal(|ui| {
            if ui.button("Back to agents").clicked() {
                data_shared.navigate_after_frame(Route::Resources(ResourceKind::Agents));
            }
            ui.heading(format!("Agent #{}", self.id));
        });
        ui.separator();

        let user = data_shared.current_user();
        let evaluator = PermissionEvaluator::new(user.as_deref());
        if !self.agent.is_present() {
            let (id, ctx, client) = (self.id, ui.ctx().clone(), &data_shared.client);
            self.agent.get(Some(ui), None, || {
                AwaitingType(client.get_one(ResourceKind::Agents, id, wake_fn(ctx)))
            });
            return;
        }
        let Some(agent) = self.agent.present() else {
            return;
        };

        let actions = AgentActions::for_agent(&evaluator, agent);
        if !actions.view {
            ui_error_label(ui, "You do not have permission to view this agent.");
            return;
        }

        if self.edit.is_some() {
            self.ui_edit(ui, data_shared);
        } else {
            ui_agent_fields(ui, agent);
            ui.horizontal(|ui| {
                if actions.update && ui.button("Edit").clicked() {
                    self.edit = Some(AgentEdit::from(agent));
                    self.save_state = DataState::None;
                }
                if actions.delete && !self.confirm_delete && ui.button("Delete").clicked() {
                    self.confirm_delete = true;
                }
            });
        }

        if actions.delete && self.confirm_delete {
            self.ui_delete(ui, data_shared);
        }
    }

    fn ui_edit(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        let is_editable = !self.save_state.is_awaiting();
        egui::Grid::new("agent_edit").num_columns(2).show(ui, |ui| {
            for (label, value) in [
                ("First Name", &mut edit.first_name),
                ("Last Name", &mut edit.last_name),
                ("Email", &mut edit.email),
                ("Phone", &mut edit.phone),
            ] {
                ui.label(label);
                ui.add_enabled(is_editable, egui::TextEdit::singleline(value));
                ui.end_row();
            }
        });
        let body = edit.to_json_body();

        match &mut self.save_state {
            DataState::None => {
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        let rx = data_shared.client.update(
                            ResourceKind::Agents,
                            self.id,
                            &body,
                            wake_fn(ui.ctx().clone()),
                        );
                        self.save_state = DataState::AwaitingResponse(AwaitingType(rx));
                    }
                    if ui.button("Cancel").clicked() {
                        self.edit = None;
                    }
                });
            }
            DataState::AwaitingResponse(rx) => {
                if let Some(new_state) = DataState::await_data(Some(ui), rx) {
                    self.save_state = new_state;
                }
            }
            DataState::Present(updated) => {
                info!(id = ?self.id, "agent updated");
                self.agent = match updated.take() {
                    Some(agent) => DataState::Present(agent),
                    // Not sent back so load it again
                    None => DataState::None,
                };
                self.edit = None;
                self.save_state = DataState::None;
            }
            DataState::Failed(e) => {
                ui_error_label(ui, &format!("Save failed: {e}"));
                if ui.button("Try again").clicked() {
                    self.save_state = DataState::None;
                }
            }
        }
    }

    fn ui_delete(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        ui.group(|ui| match &mut self.delete_state {
            DataState::None => {
                ui.label("Delete this agent? This cannot be undone.");
                ui.horizontal(|ui| {
                    if ui.button("Confirm delete").clicked() {
                        let rx = data_shared.client.delete(
                            ResourceKind::Agents,
                            self.id,
                            wake_fn(ui.ctx().clone()),
                        );
                        self.delete_state = DataState::AwaitingResponse(AwaitingType(rx));
                    }
                    if ui.button("Cancel").clicked() {
                        self.confirm_delete = false;
                    }
                });
            }
            DataState::AwaitingResponse(rx) => {
                if let Some(new_state) = DataState::await_data(Some(ui), rx) {
                    self.delete_state = new_state;
                }
            }
            DataState::Present(()) => {
                info!(id = ?self.id, "agent deleted");
                data_shared.redirect_after_frame(Route::Resources(ResourceKind::Agents));
            }
            DataState::Failed(e) => {
                ui_error_label(ui, &format!("Delete failed: {e}"));
                if ui.button("Dismiss").clicked() {
                    self.confirm_delete = false;
                    self.delete_state = DataState::None;
                }
            }
        });
    }
}

fn ui_agent_fields(ui: &mut egui::Ui, agent: &AgentSummary) {
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    egui::Grid::new("agent_fields").num_columns(2).show(ui, |ui| {
        ui.label("Name");
        ui.strong(agent.display_name());
        ui.end_row();
        ui.label("Email");
        ui.label(text(&agent.email));
        ui.end_row();
        ui.label("Phone");
        ui.label(text(&agent.phone));
        ui.end_row();
        ui.label("Partner");
        ui.label(
            agent
                .owner()
                .partner_id
                .map(|x| format!("#{x}"))
                .unwrap_or_else(|| "-".to_string()),
        );
        ui.end_row();
    });
}
