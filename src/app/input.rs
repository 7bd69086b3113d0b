use crate::render::GizmoMode;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Editor shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    SetMode(GizmoMode),
    ClearSelection,
    RemoveSelected,
}

pub fn command_for_key(key: PhysicalKey) -> Option<EditorCommand> {
    match key {
        PhysicalKey::Code(KeyCode::KeyW) => Some(EditorCommand::SetMode(GizmoMode::Translate)),
        PhysicalKey::Code(KeyCode::KeyE) => Some(EditorCommand::SetMode(GizmoMode::Rotate)),
        PhysicalKey::Code(KeyCode::KeyR) => Some(EditorCommand::SetMode(GizmoMode::Scale)),
        PhysicalKey::Code(KeyCode::Escape) => Some(EditorCommand::ClearSelection),
        PhysicalKey::Code(KeyCode::Delete) | PhysicalKey::Code(KeyCode::Backspace) => {
            Some(EditorCommand::RemoveSelected)
        }
        _ => None,
    }
}
