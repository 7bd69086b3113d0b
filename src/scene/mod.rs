pub mod placement;
pub mod props;
pub mod selection;
pub mod serialization;

pub use placement::{drop_position, DropEvent, Placement};
pub use props::{Color, Font, ImageProps, KindProps, TextProps, VideoProps};
pub use selection::{Selection, SelectionState};

use crate::assets::AssetDescriptor;
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_PLANE_ID: &str = "default-plane";
pub const DEFAULT_PLANE_NAME: &str = "Default Plane";

/// Identifier of a selectable object: the default plane or a placed object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn default_plane() -> Self {
        Self(DEFAULT_PLANE_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default_plane(&self) -> bool {
        self.0 == DEFAULT_PLANE_ID
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position, Euler rotation (radians, XYZ order) and scale.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        compose_transform_matrix(self.position, self.rotation, self.scale)
    }
}

pub fn compose_transform_matrix(position: [f32; 3], rotation: [f32; 3], scale: [f32; 3]) -> Mat4 {
    let rotation = Quat::from_euler(EulerRot::XYZ, rotation[0], rotation[1], rotation[2]);
    Mat4::from_scale_rotation_translation(
        Vec3::from_array(scale),
        rotation,
        Vec3::from_array(position),
    )
}

/// A placed instance of an asset.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub asset: Arc<AssetDescriptor>,
    pub transform: Transform,
    pub props: KindProps,
}

/// The always-present base object.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultPlane {
    pub id: ObjectId,
    pub name: String,
    pub transform: Transform,
}

impl Default for DefaultPlane {
    fn default() -> Self {
        Self {
            id: ObjectId::default_plane(),
            name: DEFAULT_PLANE_NAME.to_string(),
            transform: Transform::default(),
        }
    }
}

/// Partial transform update; `None` components are left as they are.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformPatch {
    pub position: Option<[f32; 3]>,
    pub rotation: Option<[f32; 3]>,
    pub scale: Option<[f32; 3]>,
}

impl TransformPatch {
    pub fn replace(transform: Transform) -> Self {
        Self {
            position: Some(transform.position),
            rotation: Some(transform.rotation),
            scale: Some(transform.scale),
        }
    }

    fn apply(&self, transform: &mut Transform) -> bool {
        let before = *transform;
        if let Some(position) = self.position {
            transform.position = position;
        }
        if let Some(rotation) = self.rotation {
            transform.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            transform.scale = scale;
        }
        *transform != before
    }
}

/// Partial update of a placed object. Kind-specific fields that do not
/// match the object's asset kind are ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectPatch {
    pub transform: TransformPatch,
    pub looping: Option<bool>,
    pub chroma_key: Option<Color>,
    pub opacity: Option<f32>,
    pub text_color: Option<Color>,
    pub font: Option<Font>,
    pub content: Option<String>,
}

impl ObjectPatch {
    fn apply(&self, object: &mut SceneObject) -> bool {
        let mut changed = self.transform.apply(&mut object.transform);
        let mut set = |changed_field: bool| changed |= changed_field;
        match &mut object.props {
            KindProps::Model3D => {}
            KindProps::Video(video) => {
                if let Some(looping) = self.looping {
                    set(video.looping.replace(looping) != Some(looping));
                }
                if let Some(key) = self.chroma_key {
                    set(video.chroma_key.replace(key) != Some(key));
                }
            }
            KindProps::Image(image) => {
                if let Some(opacity) = self.opacity {
                    set(image.opacity.replace(opacity) != Some(opacity));
                }
            }
            KindProps::Text(text) => {
                if let Some(color) = self.text_color {
                    set(text.color.replace(color) != Some(color));
                }
                if let Some(font) = self.font {
                    set(text.font.replace(font) != Some(font));
                }
                if let Some(content) = &self.content {
                    if text.content != *content {
                        text.content = content.clone();
                        set(true);
                    }
                }
            }
        }
        changed
    }
}

/// One row of the scene hierarchy listing.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyRow {
    pub id: ObjectId,
    pub name: String,
    pub kind_label: &'static str,
}

/// Authoritative collection of everything in the scene: the default plane
/// plus placed objects in insertion order.
#[derive(Debug, Default)]
pub struct SceneStore {
    default_plane: DefaultPlane,
    objects: Vec<SceneObject>,
}

impl SceneStore {
    pub fn new() -> Self {
        Self {
            default_plane: DefaultPlane::default(),
            objects: Vec::new(),
        }
    }

    pub fn default_plane(&self) -> &DefaultPlane {
        &self.default_plane
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == *id)
    }

    /// Default plane plus placed objects.
    pub fn total_len(&self) -> usize {
        self.objects.len() + 1
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        *id == self.default_plane.id || self.object(id).is_some()
    }

    pub fn transform(&self, id: &ObjectId) -> Option<Transform> {
        if *id == self.default_plane.id {
            return Some(self.default_plane.transform);
        }
        self.object(id).map(|object| object.transform)
    }

    pub fn insert(&mut self, object: SceneObject) {
        debug_assert!(!self.contains(&object.id), "duplicate object id {}", object.id);
        self.objects.push(object);
    }

    pub fn update_default_plane(&mut self, patch: TransformPatch) -> bool {
        let changed = patch.apply(&mut self.default_plane.transform);
        if changed {
            log::debug!("Default plane updated: {:?}", self.default_plane.transform);
        }
        changed
    }

    /// Returns whether anything changed. Unknown ids are ignored.
    pub fn update_object(&mut self, id: &ObjectId, patch: &ObjectPatch) -> bool {
        let Some(object) = self.objects.iter_mut().find(|object| object.id == *id) else {
            log::warn!("Update for unknown object {}", id);
            return false;
        };
        let changed = patch.apply(object);
        if changed {
            log::debug!("Object {} updated", id);
        }
        changed
    }

    /// Write a whole transform to whichever record owns `id`.
    pub fn set_transform(&mut self, id: &ObjectId, transform: Transform) -> bool {
        let patch = TransformPatch::replace(transform);
        if id.is_default_plane() {
            self.update_default_plane(patch)
        } else {
            self.update_object(
                id,
                &ObjectPatch {
                    transform: patch,
                    ..ObjectPatch::default()
                },
            )
        }
    }

    /// Remove a placed object. The default plane is never removed.
    pub fn remove_object(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|object| object.id == *id)?;
        let removed = self.objects.remove(index);
        log::info!("Removed object {} ({})", removed.id, removed.asset.name);
        Some(removed)
    }

    pub fn hierarchy(&self) -> Vec<HierarchyRow> {
        let mut rows = Vec::with_capacity(self.total_len());
        rows.push(HierarchyRow {
            id: self.default_plane.id.clone(),
            name: self.default_plane.name.clone(),
            kind_label: "Plane",
        });
        rows.extend(self.objects.iter().map(|object| HierarchyRow {
            id: object.id.clone(),
            name: object.asset.name.clone(),
            kind_label: object.asset.kind.label(),
        }));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetKind;

    fn object(id: &str, kind: AssetKind) -> SceneObject {
        let asset = Arc::new(AssetDescriptor {
            id: format!("{}-1", kind.tag()),
            name: format!("{} asset", kind.label()),
            kind,
            source_url: None,
        });
        SceneObject {
            id: ObjectId::new(id),
            props: KindProps::initial(kind, &asset.name),
            asset,
            transform: Transform::default(),
        }
    }

    #[test]
    fn new_store_holds_only_default_plane() {
        let store = SceneStore::new();
        assert_eq!(store.total_len(), 1);
        assert!(store.contains(&ObjectId::default_plane()));
        assert_eq!(store.default_plane().name, "Default Plane");
        assert_eq!(store.default_plane().transform, Transform::default());
    }

    #[test]
    fn update_object_touches_only_target() {
        let mut store = SceneStore::new();
        store.insert(object("a", AssetKind::Video));
        store.insert(object("b", AssetKind::Video));

        let patch = ObjectPatch {
            looping: Some(true),
            ..ObjectPatch::default()
        };
        assert!(store.update_object(&ObjectId::new("a"), &patch));

        let looping = |id: &str| match &store.object(&ObjectId::new(id)).unwrap().props {
            KindProps::Video(video) => video.looping(),
            _ => unreachable!(),
        };
        assert!(looping("a"));
        assert!(!looping("b"));
        assert_eq!(store.default_plane().transform, Transform::default());
    }

    #[test]
    fn writing_current_values_reports_no_change() {
        let mut store = SceneStore::new();
        store.insert(object("a", AssetKind::Image));
        let before = store.object(&ObjectId::new("a")).unwrap().clone();

        let patch = ObjectPatch {
            transform: TransformPatch::replace(before.transform),
            opacity: Some(1.0),
            ..ObjectPatch::default()
        };
        assert!(!store.update_object(&ObjectId::new("a"), &patch));
        assert_eq!(store.object(&ObjectId::new("a")).unwrap(), &before);
    }

    #[test]
    fn mismatched_kind_fields_are_ignored() {
        let mut store = SceneStore::new();
        store.insert(object("m", AssetKind::Model3D));
        let patch = ObjectPatch {
            looping: Some(true),
            opacity: Some(0.2),
            ..ObjectPatch::default()
        };
        assert!(!store.update_object(&ObjectId::new("m"), &patch));
    }

    #[test]
    fn set_transform_routes_default_plane() {
        let mut store = SceneStore::new();
        store.insert(object("a", AssetKind::Model3D));
        let moved = Transform::at([1.0, 2.0, 3.0]);

        assert!(store.set_transform(&ObjectId::default_plane(), moved));
        assert_eq!(store.default_plane().transform, moved);
        assert_eq!(
            store.transform(&ObjectId::new("a")),
            Some(Transform::default())
        );

        assert!(store.set_transform(&ObjectId::new("a"), moved));
        assert_eq!(store.transform(&ObjectId::new("a")), Some(moved));
        assert!(!store.set_transform(&ObjectId::new("missing"), moved));
    }

    #[test]
    fn remove_keeps_default_plane() {
        let mut store = SceneStore::new();
        store.insert(object("a", AssetKind::Text));
        assert!(store.remove_object(&ObjectId::default_plane()).is_none());
        assert!(store.remove_object(&ObjectId::new("a")).is_some());
        assert!(store.remove_object(&ObjectId::new("a")).is_none());
        assert_eq!(store.total_len(), 1);
    }

    #[test]
    fn hierarchy_lists_plane_first() {
        let mut store = SceneStore::new();
        store.insert(object("v", AssetKind::Video));
        store.insert(object("t", AssetKind::Text));
        let rows = store.hierarchy();
        let labels: Vec<(&str, &str)> = rows
            .iter()
            .map(|row| (row.id.as_str(), row.kind_label))
            .collect();
        assert_eq!(
            labels,
            vec![("default-plane", "Plane"), ("v", "Video"), ("t", "Text")]
        );
    }

    #[test]
    fn transform_matrix_places_origin() {
        let transform = Transform {
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, std::f32::consts::FRAC_PI_2, 0.0],
            scale: [2.0, 2.0, 2.0],
        };
        let matrix = transform.matrix();
        let origin = matrix.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
        // +X rotated a quarter turn about Y points at -Z, then doubled.
        let x = matrix.transform_vector3(Vec3::X);
        assert!((x - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
    }
}
