use super::UiAction;
use crate::assets::{AssetKind, AssetRegistry};
use crate::scene::{DropEvent, HierarchyRow, ObjectId};

/// Scene hierarchy: one selectable row per object, default plane first.
pub fn hierarchy_panel(
    ui: &mut egui::Ui,
    rows: &[HierarchyRow],
    selected: Option<&ObjectId>,
    actions: &mut Vec<UiAction>,
) {
    ui.heading("Scene");
    for row in rows {
        let is_selected = selected == Some(&row.id);
        let label = format!("{} ({})", row.name, row.kind_label);
        if ui.selectable_label(is_selected, label).clicked() && !is_selected {
            actions.push(UiAction::Select(row.id.clone()));
        }
    }
}

/// Assets grouped by kind. Each entry is a drag source carrying the asset id.
pub fn asset_panel(ui: &mut egui::Ui, assets: &AssetRegistry, actions: &mut Vec<UiAction>) {
    ui.heading("Assets");
    if ui.button("Add text").clicked() {
        actions.push(UiAction::AddText);
    }
    for kind in AssetKind::ALL {
        egui::CollapsingHeader::new(kind.label())
            .id_salt(("asset_group", kind.tag()))
            .default_open(true)
            .show(ui, |ui| {
                let mut any = false;
                for asset in assets.by_kind(kind) {
                    any = true;
                    let drag_id = egui::Id::new(("asset_drag", asset.id.as_str()));
                    let response = ui
                        .dnd_drag_source(drag_id, asset.id.clone(), |ui| {
                            ui.label(&asset.name);
                        })
                        .response;
                    if response.drag_started() {
                        actions.push(UiAction::BeginDrag(asset.id.clone()));
                    }
                }
                if !any {
                    ui.weak("None yet");
                }
            });
    }
}

/// The canvas drop target. The drop position is reported relative to the
/// zone's top-left corner together with the zone size.
pub fn drop_zone(ui: &mut egui::Ui, min_size: egui::Vec2, actions: &mut Vec<UiAction>) {
    let (inner, payload) = ui.dnd_drop_zone::<String, _>(egui::Frame::group(ui.style()), |ui| {
        ui.set_min_size(min_size);
        ui.centered_and_justified(|ui| {
            ui.weak("Drop assets here");
        });
    });
    if payload.is_none() {
        return;
    }
    let rect = inner.response.rect;
    let Some(pointer) = ui.ctx().pointer_interact_pos() else {
        return;
    };
    let local = pointer - rect.min;
    actions.push(UiAction::Drop(DropEvent::new(
        local.x,
        local.y,
        rect.width(),
        rect.height(),
    )));
}
