//! Editor panels. Drawing never mutates the editor; every interaction is
//! returned as a `UiAction` and applied by `Editor::apply_ui_actions`.

pub mod binding;
mod properties;
mod sidebar;

pub use binding::{
    apply_edit, parse_numeric, properties_view, Axis, KindView, ObjectView, PropertiesView,
    PropertyEdit, TransformField,
};
pub use properties::properties_panel;

use crate::app::Editor;
use crate::render::GizmoMode;
use crate::scene::{DropEvent, ObjectId};

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Select(ObjectId),
    ClearSelection,
    BeginDrag(String),
    CancelDrag,
    Drop(DropEvent),
    AddText,
    SetMode(GizmoMode),
    RemoveSelected,
    Edit(PropertyEdit),
}

pub struct UiState {
    pub show_asset_panel: bool,
    status: String,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            show_asset_panel: true,
            status: String::new(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn draw_editor_ui(ctx: &egui::Context, editor: &Editor, state: &mut UiState) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            for mode in GizmoMode::ALL {
                if ui
                    .selectable_label(editor.gizmo_mode() == mode, mode.label())
                    .clicked()
                {
                    actions.push(UiAction::SetMode(mode));
                }
            }
            ui.separator();
            let removable = editor
                .selection()
                .selected()
                .is_some_and(|id| !id.is_default_plane());
            if ui
                .add_enabled(removable, egui::Button::new("Delete"))
                .clicked()
            {
                actions.push(UiAction::RemoveSelected);
            }
            ui.checkbox(&mut state.show_asset_panel, "Assets");
            if !state.status.is_empty() {
                ui.separator();
                ui.label(&state.status);
            }
        });
    });

    if state.show_asset_panel {
        egui::SidePanel::left("asset_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                sidebar::hierarchy_panel(
                    ui,
                    &editor.scene().hierarchy(),
                    editor.selection().selected(),
                    &mut actions,
                );
                ui.separator();
                sidebar::asset_panel(ui, editor.assets(), &mut actions);
            });
    }

    egui::SidePanel::right("properties_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            let edits = properties_panel(ui, &editor.properties());
            actions.extend(edits.into_iter().map(UiAction::Edit));
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        let size = ui.available_size();
        sidebar::drop_zone(ui, size, &mut actions);
    });

    let released = ctx.input(|input| input.pointer.any_released());
    let dropped = actions
        .iter()
        .any(|action| matches!(action, UiAction::Drop(_)));
    if released && !dropped && editor.dragged_asset().is_some() {
        actions.push(UiAction::CancelDrag);
    }

    actions
}
