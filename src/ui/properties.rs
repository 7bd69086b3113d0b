use super::binding::{Axis, KindView, ObjectView, PropertiesView, PropertyEdit, TransformField};
use crate::scene::{Color, Font};

/// Draw the properties panel for `view`. Returns the edits committed this
/// frame; the caller applies them.
pub fn properties_panel(ui: &mut egui::Ui, view: &PropertiesView) -> Vec<PropertyEdit> {
    let mut edits = Vec::new();
    ui.heading("Properties");
    ui.separator();

    let PropertiesView::Object(object) = view else {
        ui.weak("Select an object to edit its properties.");
        return edits;
    };

    ui.label(format!("Name: {}", object.name));
    ui.small(object.id.as_str());
    ui.add_space(4.0);

    egui::Grid::new("transform_grid")
        .num_columns(4)
        .spacing([6.0, 4.0])
        .show(ui, |ui| {
            for field in TransformField::ALL {
                ui.label(field.label());
                let values = field.read(&object.transform);
                for axis in Axis::ALL {
                    let value = values[axis.index()];
                    numeric_field(ui, object, field, axis, value, &mut edits);
                }
                ui.end_row();
            }
        });

    ui.separator();
    kind_controls(ui, &object.kind, &mut edits);
    edits
}

/// Text the user is typing into a numeric field, next to the value the
/// field showed when the typing started.
#[derive(Clone)]
struct PendingText {
    original: String,
    text: String,
}

/// Text field that keeps the user's raw input while focused and commits
/// it when focus leaves, only if the text was edited. An untouched field
/// keeps showing the current value, even while focused.
fn numeric_field(
    ui: &mut egui::Ui,
    object: &ObjectView,
    field: TransformField,
    axis: Axis,
    value: f32,
    edits: &mut Vec<PropertyEdit>,
) {
    let id = ui.make_persistent_id(("numeric", object.id.as_str(), field.label(), axis.label()));
    let pending = ui.data_mut(|data| data.get_temp::<PendingText>(id));
    let had_pending = pending.is_some();
    let (original, mut text) = match pending {
        Some(p) if p.text != p.original => (p.original, p.text),
        _ => {
            let shown = format!("{:.2}", value);
            (shown.clone(), shown)
        }
    };
    let response = ui.add(
        egui::TextEdit::singleline(&mut text)
            .id(id)
            .desired_width(56.0),
    );
    if response.has_focus() {
        ui.data_mut(|data| data.insert_temp(id, PendingText { original, text }));
    } else if had_pending || response.lost_focus() {
        ui.data_mut(|data| data.remove::<PendingText>(id));
        if text != original {
            edits.push(PropertyEdit::Transform {
                field,
                axis,
                input: text,
            });
        }
    }
}

fn kind_controls(ui: &mut egui::Ui, kind: &KindView, edits: &mut Vec<PropertyEdit>) {
    match kind {
        KindView::Plane | KindView::Model3D => {}
        KindView::Video {
            looping,
            chroma_key,
        } => {
            let mut looping = *looping;
            if ui.checkbox(&mut looping, "Loop").changed() {
                edits.push(PropertyEdit::Loop(looping));
            }
            ui.horizontal(|ui| {
                ui.label("Chroma key");
                if let Some(color) = color_button(ui, *chroma_key) {
                    edits.push(PropertyEdit::ChromaKey(color));
                }
            });
        }
        KindView::Image { opacity } => {
            let mut opacity = *opacity;
            let slider = egui::Slider::new(&mut opacity, 0.0..=1.0)
                .step_by(0.1)
                .text("Opacity");
            if ui.add(slider).changed() {
                edits.push(PropertyEdit::Opacity(opacity));
            }
        }
        KindView::Text {
            content,
            color,
            font,
        } => {
            let mut content = content.clone();
            ui.horizontal(|ui| {
                ui.label("Content");
                if ui.text_edit_singleline(&mut content).changed() {
                    edits.push(PropertyEdit::Content(content.clone()));
                }
            });
            ui.horizontal(|ui| {
                ui.label("Color");
                if let Some(color) = color_button(ui, *color) {
                    edits.push(PropertyEdit::TextColor(color));
                }
            });
            let mut selected = *font;
            egui::ComboBox::from_id_salt("text_font")
                .selected_text(selected.name())
                .show_ui(ui, |ui| {
                    for option in Font::ALL {
                        ui.selectable_value(&mut selected, option, option.name());
                    }
                });
            if selected != *font {
                edits.push(PropertyEdit::Font(selected));
            }
        }
    }
}

fn color_button(ui: &mut egui::Ui, color: Color) -> Option<Color> {
    let mut rgb = color.rgb();
    if ui.color_edit_button_srgb(&mut rgb).changed() {
        Some(Color(rgb))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ObjectId, Transform};
    use egui::{Event, Key, Modifiers};

    struct Panel {
        ctx: egui::Context,
        view: PropertiesView,
    }

    impl Panel {
        fn new(kind: KindView, transform: Transform) -> Self {
            Self {
                ctx: egui::Context::default(),
                view: PropertiesView::Object(ObjectView {
                    id: ObjectId::new("asset-1-2"),
                    name: "object".to_string(),
                    transform,
                    kind,
                }),
            }
        }

        fn frame(&self, events: Vec<Event>) -> Vec<PropertyEdit> {
            let mut edits = Vec::new();
            let raw_input = egui::RawInput {
                events,
                ..Default::default()
            };
            let _ = self.ctx.run(raw_input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    edits = properties_panel(ui, &self.view);
                });
            });
            edits
        }

        /// Run `frames` idle frames after `events`, collecting every edit.
        fn frames(&self, events: Vec<Event>, frames: usize) -> Vec<PropertyEdit> {
            let mut edits = self.frame(events);
            for _ in 0..frames {
                edits.extend(self.frame(Vec::new()));
            }
            edits
        }

        fn focused_is_text_edit(&self) -> Option<bool> {
            let focused = self.ctx.memory(|memory| memory.focused())?;
            Some(egui::TextEdit::load_state(&self.ctx, focused).is_some())
        }

        /// Tab through the numeric fields until a non-text widget has focus.
        fn tab_past_text_fields(&self) -> Vec<PropertyEdit> {
            let mut edits = Vec::new();
            for _ in 0..20 {
                edits.extend(self.frames(vec![key(Key::Tab, Modifiers::NONE)], 1));
                if self.focused_is_text_edit() == Some(false) {
                    return edits;
                }
            }
            panic!("no non-text widget took focus");
        }

        fn set_position_x(&mut self, x: f32) {
            if let PropertiesView::Object(object) = &mut self.view {
                object.transform.position[0] = x;
            }
        }
    }

    fn key(key: Key, modifiers: Modifiers) -> Event {
        Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    fn at_x(x: f32) -> Transform {
        Transform {
            position: [x, 0.0, 0.0],
            ..Transform::default()
        }
    }

    #[test]
    fn focus_and_blur_without_typing_commits_nothing() {
        let panel = Panel::new(KindView::Plane, at_x(0.123456));
        let mut edits = panel.frames(vec![key(Key::Tab, Modifiers::NONE)], 1);
        assert_eq!(panel.focused_is_text_edit(), Some(true));
        edits.extend(panel.frames(vec![key(Key::Escape, Modifiers::NONE)], 1));
        assert_eq!(panel.ctx.memory(|memory| memory.focused()), None);
        assert!(edits.is_empty(), "unexpected edits: {:?}", edits);
    }

    #[test]
    fn typed_value_commits_once_on_blur() {
        let panel = Panel::new(KindView::Plane, at_x(0.123456));
        let mut edits = panel.frames(vec![key(Key::Tab, Modifiers::NONE)], 1);
        edits.extend(panel.frames(
            vec![key(Key::A, Modifiers::COMMAND), Event::Text("2.5".to_string())],
            1,
        ));
        assert!(edits.is_empty(), "committed before blur: {:?}", edits);
        edits.extend(panel.frames(vec![key(Key::Escape, Modifiers::NONE)], 2));
        assert_eq!(
            edits,
            vec![PropertyEdit::Transform {
                field: TransformField::Position,
                axis: Axis::X,
                input: "2.5".to_string(),
            }]
        );
    }

    #[test]
    fn focused_untouched_field_follows_sampled_value() {
        let mut panel = Panel::new(KindView::Plane, at_x(0.0));
        let mut edits = panel.frames(vec![key(Key::Tab, Modifiers::NONE)], 1);
        // A handle drag moves the object while the field has focus.
        panel.set_position_x(4.0);
        edits.extend(panel.frames(Vec::new(), 1));
        edits.extend(panel.frames(vec![key(Key::Escape, Modifiers::NONE)], 1));
        assert!(edits.is_empty(), "stale text committed: {:?}", edits);
    }

    #[test]
    fn tabbing_through_fields_commits_nothing() {
        let panel = Panel::new(
            KindView::Video {
                looping: false,
                chroma_key: Color([0, 255, 0]),
            },
            at_x(1.0 / 3.0),
        );
        assert!(panel.tab_past_text_fields().is_empty());
    }

    #[test]
    fn loop_checkbox_emits_loop_edit() {
        let panel = Panel::new(
            KindView::Video {
                looping: false,
                chroma_key: Color([0, 255, 0]),
            },
            Transform::default(),
        );
        let mut edits = panel.tab_past_text_fields();
        edits.extend(panel.frames(vec![key(Key::Space, Modifiers::NONE)], 1));
        assert_eq!(edits, vec![PropertyEdit::Loop(true)]);
    }

    #[test]
    fn opacity_slider_steps_by_a_tenth() {
        let panel = Panel::new(KindView::Image { opacity: 1.0 }, Transform::default());
        let mut edits = panel.tab_past_text_fields();
        edits.extend(panel.frames(vec![key(Key::ArrowLeft, Modifiers::NONE)], 1));
        match edits.as_slice() {
            [PropertyEdit::Opacity(opacity)] => assert!((opacity - 0.9).abs() < 1e-4),
            other => panic!("expected one opacity edit, got {:?}", other),
        }
    }

    #[test]
    fn text_content_emits_while_typing() {
        let panel = Panel::new(
            KindView::Text {
                content: String::new(),
                color: Color([255, 255, 255]),
                font: Font::Arial,
            },
            Transform::default(),
        );
        // Nine numeric fields, then the content field.
        let mut edits = Vec::new();
        for _ in 0..10 {
            edits.extend(panel.frames(vec![key(Key::Tab, Modifiers::NONE)], 1));
        }
        assert_eq!(panel.focused_is_text_edit(), Some(true));
        edits.extend(panel.frames(vec![Event::Text("Hi".to_string())], 1));
        assert_eq!(edits, vec![PropertyEdit::Content("Hi".to_string())]);
    }
}
