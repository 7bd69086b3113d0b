use super::Editor;
use crate::ui::{draw_editor_ui, UiState};
use std::time::Instant;

pub struct EguiFrameOutput {
    pub clipped_primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
    pub wants_pointer_input: bool,
    pub wants_keyboard_input: bool,
    /// Whether any UI action changed the editor this frame.
    pub editor_changed: bool,
}

/// Runs the editor panels on an egui context. Window integration feeds it
/// `RawInput` and paints the returned primitives.
pub struct EguiHost {
    context: egui::Context,
    state: UiState,
}

impl EguiHost {
    pub fn new() -> Self {
        Self {
            context: egui::Context::default(),
            state: UiState::new(),
        }
    }

    pub fn context(&self) -> &egui::Context {
        &self.context
    }

    pub fn state_mut(&mut self) -> &mut UiState {
        &mut self.state
    }

    /// Draw one frame and apply the resulting actions to `editor`.
    pub fn run_frame(
        &mut self,
        editor: &mut Editor,
        raw_input: egui::RawInput,
        now: Instant,
    ) -> EguiFrameOutput {
        let mut actions = Vec::new();
        let state = &mut self.state;
        let full_output = self.context.run(raw_input, |ctx| {
            actions = draw_editor_ui(ctx, editor, state);
        });
        let editor_changed = editor.apply_ui_actions(actions, now);

        let pixels_per_point = self.context.pixels_per_point();
        let clipped_primitives = self
            .context
            .tessellate(full_output.shapes, pixels_per_point);

        EguiFrameOutput {
            clipped_primitives,
            textures_delta: full_output.textures_delta,
            pixels_per_point,
            wants_pointer_input: self.context.wants_pointer_input(),
            wants_keyboard_input: self.context.wants_keyboard_input(),
            editor_changed,
        }
    }
}

impl Default for EguiHost {
    fn default() -> Self {
        Self::new()
    }
}
