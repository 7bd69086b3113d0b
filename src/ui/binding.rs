//! Two-way binding between the selected object's record and the
//! properties panel. `properties_view` reads, `apply_edit` writes; the
//! egui panel only ever sees these types.

use crate::scene::{
    Color, Font, KindProps, ObjectId, ObjectPatch, SceneStore, SelectionState, Transform,
    TransformPatch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformField {
    Position,
    Rotation,
    Scale,
}

impl TransformField {
    pub const ALL: [TransformField; 3] = [
        TransformField::Position,
        TransformField::Rotation,
        TransformField::Scale,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TransformField::Position => "Position",
            TransformField::Rotation => "Rotation",
            TransformField::Scale => "Scale",
        }
    }

    pub fn read(self, transform: &Transform) -> [f32; 3] {
        match self {
            TransformField::Position => transform.position,
            TransformField::Rotation => transform.rotation,
            TransformField::Scale => transform.scale,
        }
    }

    fn patch(self, value: [f32; 3]) -> TransformPatch {
        let mut patch = TransformPatch::default();
        match self {
            TransformField::Position => patch.position = Some(value),
            TransformField::Rotation => patch.rotation = Some(value),
            TransformField::Scale => patch.scale = Some(value),
        }
        patch
    }
}

/// A single committed edit from the properties panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEdit {
    /// Raw text of one numeric transform component.
    Transform {
        field: TransformField,
        axis: Axis,
        input: String,
    },
    Loop(bool),
    ChromaKey(Color),
    Opacity(f32),
    TextColor(Color),
    Font(Font),
    Content(String),
}

/// Numeric field commit. Anything that does not parse to a finite number
/// becomes 0; the edit is never rejected.
pub fn parse_numeric(input: &str) -> f32 {
    match input.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum KindView {
    Plane,
    Model3D,
    Video { looping: bool, chroma_key: Color },
    Image { opacity: f32 },
    Text { content: String, color: Color, font: Font },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectView {
    pub id: ObjectId,
    pub name: String,
    pub transform: Transform,
    pub kind: KindView,
}

/// What the properties panel shows for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesView {
    Empty,
    Object(ObjectView),
}

pub fn properties_view(store: &SceneStore, selection: &SelectionState) -> PropertiesView {
    let Some(id) = selection.selected() else {
        return PropertiesView::Empty;
    };
    if id.is_default_plane() {
        let plane = store.default_plane();
        return PropertiesView::Object(ObjectView {
            id: plane.id.clone(),
            name: plane.name.clone(),
            transform: plane.transform,
            kind: KindView::Plane,
        });
    }
    let Some(object) = store.object(id) else {
        return PropertiesView::Empty;
    };
    let kind = match &object.props {
        KindProps::Model3D => KindView::Model3D,
        KindProps::Video(video) => KindView::Video {
            looping: video.looping(),
            chroma_key: video.chroma_key(),
        },
        KindProps::Image(image) => KindView::Image {
            opacity: image.opacity(),
        },
        KindProps::Text(text) => KindView::Text {
            content: text.content.clone(),
            color: text.color(),
            font: text.font(),
        },
    };
    PropertiesView::Object(ObjectView {
        id: object.id.clone(),
        name: object.asset.name.clone(),
        transform: object.transform,
        kind,
    })
}

/// Write an edit into the selected record. Returns whether the store
/// changed; without a selection nothing happens.
pub fn apply_edit(store: &mut SceneStore, selection: &SelectionState, edit: &PropertyEdit) -> bool {
    let Some(id) = selection.selected() else {
        log::debug!("Ignoring property edit without a selection");
        return false;
    };

    if let PropertyEdit::Transform { field, axis, input } = edit {
        let Some(current) = store.transform(id) else {
            return false;
        };
        let mut value = field.read(&current);
        value[axis.index()] = parse_numeric(input);
        let patch = field.patch(value);
        return if id.is_default_plane() {
            store.update_default_plane(patch)
        } else {
            store.update_object(
                id,
                &ObjectPatch {
                    transform: patch,
                    ..ObjectPatch::default()
                },
            )
        };
    }

    if id.is_default_plane() {
        return false;
    }
    let mut patch = ObjectPatch::default();
    match edit {
        PropertyEdit::Transform { .. } => {}
        PropertyEdit::Loop(looping) => patch.looping = Some(*looping),
        PropertyEdit::ChromaKey(color) => patch.chroma_key = Some(*color),
        PropertyEdit::Opacity(opacity) => patch.opacity = Some(opacity.clamp(0.0, 1.0)),
        PropertyEdit::TextColor(color) => patch.text_color = Some(*color),
        PropertyEdit::Font(font) => patch.font = Some(*font),
        PropertyEdit::Content(content) => patch.content = Some(content.clone()),
    }
    store.update_object(id, &patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetDescriptor, AssetKind};
    use crate::scene::SceneObject;
    use std::sync::Arc;

    fn store_with(kind: AssetKind) -> (SceneStore, ObjectId) {
        let asset = Arc::new(AssetDescriptor {
            id: format!("{}-1", kind.tag()),
            name: "clip.mp4".to_string(),
            kind,
            source_url: None,
        });
        let id = ObjectId::new(format!("{}-2", asset.id));
        let mut store = SceneStore::new();
        store.insert(SceneObject {
            id: id.clone(),
            props: KindProps::initial(kind, &asset.name),
            asset,
            transform: Transform::default(),
        });
        (store, id)
    }

    fn selected(id: &ObjectId) -> SelectionState {
        let mut selection = SelectionState::new();
        selection.select_pointer(id.clone());
        selection
    }

    fn position_x(input: &str) -> PropertyEdit {
        PropertyEdit::Transform {
            field: TransformField::Position,
            axis: Axis::X,
            input: input.to_string(),
        }
    }

    #[test]
    fn parse_numeric_accepts_floats() {
        assert_eq!(parse_numeric("1.5"), 1.5);
        assert_eq!(parse_numeric("  -2 "), -2.0);
        assert_eq!(parse_numeric("1e2"), 100.0);
    }

    // Malformed input silently becomes 0 instead of keeping the previous
    // value. Kept as observed; it may not be what users expect.
    #[test]
    fn malformed_numeric_input_becomes_zero() {
        assert_eq!(parse_numeric("abc"), 0.0);
        assert_eq!(parse_numeric(""), 0.0);
        assert_eq!(parse_numeric("NaN"), 0.0);
        assert_eq!(parse_numeric("inf"), 0.0);

        let (mut store, id) = store_with(AssetKind::Model3D);
        let selection = selected(&id);
        assert!(apply_edit(&mut store, &selection, &position_x("3")));
        assert!(apply_edit(&mut store, &selection, &position_x("3,5")));
        assert_eq!(store.transform(&id).unwrap().position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_selection_renders_empty_and_ignores_edits() {
        let (mut store, id) = store_with(AssetKind::Video);
        let selection = SelectionState::new();
        assert_eq!(properties_view(&store, &selection), PropertiesView::Empty);
        assert!(!apply_edit(&mut store, &selection, &PropertyEdit::Loop(true)));
        assert!(!apply_edit(&mut store, &selection, &position_x("2")));
        assert_eq!(store.transform(&id), Some(Transform::default()));
    }

    #[test]
    fn fresh_objects_show_defaults() {
        let (store, id) = store_with(AssetKind::Video);
        let PropertiesView::Object(view) = properties_view(&store, &selected(&id)) else {
            panic!("expected object view");
        };
        assert_eq!(
            view.kind,
            KindView::Video {
                looping: false,
                chroma_key: Color::GREEN
            }
        );
        assert_eq!(view.name, "clip.mp4");

        let (store, id) = store_with(AssetKind::Image);
        let PropertiesView::Object(view) = properties_view(&store, &selected(&id)) else {
            panic!("expected object view");
        };
        assert_eq!(view.kind, KindView::Image { opacity: 1.0 });
    }

    #[test]
    fn default_plane_routes_through_plane_update() {
        let (mut store, id) = store_with(AssetKind::Model3D);
        let selection = selected(&ObjectId::default_plane());
        let edit = PropertyEdit::Transform {
            field: TransformField::Scale,
            axis: Axis::Y,
            input: "2.5".to_string(),
        };
        assert!(apply_edit(&mut store, &selection, &edit));
        assert_eq!(store.default_plane().transform.scale, [1.0, 2.5, 1.0]);
        assert_eq!(store.transform(&id), Some(Transform::default()));

        assert!(!apply_edit(&mut store, &selection, &PropertyEdit::Opacity(0.3)));
        match properties_view(&store, &selection) {
            PropertiesView::Object(view) => assert_eq!(view.kind, KindView::Plane),
            PropertiesView::Empty => panic!("plane should be viewable"),
        }
    }

    #[test]
    fn editing_to_current_value_changes_nothing() {
        let (mut store, id) = store_with(AssetKind::Text);
        let selection = selected(&id);
        let before = store.object(&id).unwrap().clone();
        assert!(!apply_edit(&mut store, &selection, &position_x("0")));
        assert!(!apply_edit(&mut store, &selection, &PropertyEdit::Font(Font::Arial)));
        assert!(!apply_edit(&mut store, &selection, &PropertyEdit::TextColor(Color::BLACK)));
        assert_eq!(store.object(&id).unwrap(), &before);
    }

    #[test]
    fn opacity_is_clamped() {
        let (mut store, id) = store_with(AssetKind::Image);
        let selection = selected(&id);
        assert!(apply_edit(&mut store, &selection, &PropertyEdit::Opacity(1.7)));
        assert!(!apply_edit(&mut store, &selection, &PropertyEdit::Opacity(1.0)));
        assert!(apply_edit(&mut store, &selection, &PropertyEdit::Opacity(-0.5)));
        match &store.object(&id).unwrap().props {
            KindProps::Image(image) => assert_eq!(image.opacity(), 0.0),
            other => panic!("unexpected props {:?}", other),
        }
    }

    #[test]
    fn negative_scale_is_accepted() {
        let (mut store, id) = store_with(AssetKind::Model3D);
        let selection = selected(&id);
        let edit = PropertyEdit::Transform {
            field: TransformField::Scale,
            axis: Axis::Z,
            input: "-1".to_string(),
        };
        assert!(apply_edit(&mut store, &selection, &edit));
        assert_eq!(store.transform(&id).unwrap().scale, [1.0, 1.0, -1.0]);
    }
}
