use crate::assets::AssetKind;
use crate::scene::{KindProps, SceneStore};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid project slug: {0:?}")]
    InvalidSlug(String),
}

pub type Result<T> = std::result::Result<T, SerializationError>;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Xyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Xyz {
    fn zero() -> Self {
        Self::from([0.0; 3])
    }

    fn one() -> Self {
        Self::from([1.0; 3])
    }
}

impl From<[f32; 3]> for Xyz {
    fn from(v: [f32; 3]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

/// Asset type tags understood by the AR playback side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectAssetKind {
    Gltf,
    Video,
    Image,
    Text,
}

impl From<AssetKind> for ProjectAssetKind {
    fn from(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Model3D => ProjectAssetKind::Gltf,
            AssetKind::Video => ProjectAssetKind::Video,
            AssetKind::Image => ProjectAssetKind::Image,
            AssetKind::Text => ProjectAssetKind::Text,
        }
    }
}

/// One placed object as the AR viewer reads it. Rotation is in degrees.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectAsset {
    #[serde(rename = "type")]
    pub kind: ProjectAssetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default = "Xyz::zero")]
    pub position: Xyz,
    #[serde(default = "Xyz::one")]
    pub scale: Xyz,
    #[serde(default = "Xyz::zero")]
    pub rotation: Xyz,
}

/// Published scene: optional marker target plus placed objects. The array
/// index doubles as the marker target index on the viewer side.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ProjectData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub assets: Vec<ProjectAsset>,
}

/// Placed objects in store order. The default plane is editor-only.
pub fn export_project(scene: &SceneStore, target: Option<String>) -> ProjectData {
    let assets = scene
        .objects()
        .iter()
        .map(|object| {
            let content = match &object.props {
                KindProps::Text(text) => Some(text.content.clone()),
                _ => None,
            };
            let rotation = object.transform.rotation.map(f32::to_degrees);
            ProjectAsset {
                kind: object.asset.kind.into(),
                url: object.asset.source_url.clone(),
                content,
                position: object.transform.position.into(),
                scale: object.transform.scale.into(),
                rotation: rotation.into(),
            }
        })
        .collect();
    ProjectData { target, assets }
}

pub fn save_project_to_file(project: &ProjectData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(project)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_project_from_file(path: &Path) -> Result<ProjectData> {
    let json = std::fs::read_to_string(path)?;
    let project: ProjectData = serde_json::from_str(&json)?;
    Ok(project)
}

/// Published projects stored as `{root}/{slug}.json`.
#[derive(Debug, Clone)]
pub struct ProjectDirectory {
    root: PathBuf,
}

impl ProjectDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn save(&self, slug: &str, project: &ProjectData) -> Result<PathBuf> {
        let path = self.path_for(slug)?;
        std::fs::create_dir_all(&self.root)?;
        save_project_to_file(project, &path)?;
        log::info!("Published project {} to {}", slug, path.display());
        Ok(path)
    }

    /// `Ok(None)` when no project was published under `slug`.
    pub fn load(&self, slug: &str) -> Result<Option<ProjectData>> {
        let path = self.path_for(slug)?;
        if !path.exists() {
            return Ok(None);
        }
        load_project_from_file(&path).map(Some)
    }

    fn path_for(&self, slug: &str) -> Result<PathBuf> {
        let valid = !slug.is_empty()
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(SerializationError::InvalidSlug(slug.to_string()));
        }
        Ok(self.root.join(format!("{}.json", slug)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetDescriptor;
    use crate::scene::{ObjectId, SceneObject, Transform};
    use std::sync::Arc;

    fn temp_path(label: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!("arscene_{}_{}_{}", label, std::process::id(), nonce));
        path
    }

    fn scene_with(kind: AssetKind, url: Option<&str>, transform: Transform) -> SceneStore {
        let asset = Arc::new(AssetDescriptor {
            id: format!("{}-1", kind.tag()),
            name: "Hello".to_string(),
            kind,
            source_url: url.map(str::to_string),
        });
        let mut scene = SceneStore::new();
        scene.insert(SceneObject {
            id: ObjectId::new("obj-1"),
            props: KindProps::initial(kind, &asset.name),
            asset,
            transform,
        });
        scene
    }

    #[test]
    fn empty_scene_exports_no_assets() {
        let project = export_project(&SceneStore::new(), None);
        assert!(project.assets.is_empty());
        let json = serde_json::to_string(&project).unwrap();
        assert_eq!(json, r#"{"assets":[]}"#);
    }

    #[test]
    fn model_exports_as_gltf_with_degrees() {
        let transform = Transform {
            position: [1.0, 0.0, -2.0],
            rotation: [0.0, std::f32::consts::PI, 0.0],
            scale: [2.0, 2.0, 2.0],
        };
        let scene = scene_with(AssetKind::Model3D, Some("https://cdn/m.glb"), transform);
        let project = export_project(&scene, Some("https://cdn/target.mind".to_string()));

        assert_eq!(project.target.as_deref(), Some("https://cdn/target.mind"));
        let asset = &project.assets[0];
        assert_eq!(asset.kind, ProjectAssetKind::Gltf);
        assert_eq!(asset.url.as_deref(), Some("https://cdn/m.glb"));
        assert!(asset.content.is_none());
        assert_eq!(asset.position, Xyz { x: 1.0, y: 0.0, z: -2.0 });
        assert!((asset.rotation.y - 180.0).abs() < 1e-4);

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["assets"][0]["type"], "gltf");
        assert_eq!(json["assets"][0]["scale"]["x"], 2.0);
    }

    #[test]
    fn text_exports_content_without_url() {
        let scene = scene_with(AssetKind::Text, None, Transform::default());
        let project = export_project(&scene, None);
        assert_eq!(project.assets[0].kind, ProjectAssetKind::Text);
        assert_eq!(project.assets[0].content.as_deref(), Some("Hello"));
        assert!(project.assets[0].url.is_none());
    }

    #[test]
    fn viewer_json_with_missing_transforms_loads_defaults() {
        let json = r#"{ "target": "t.mind", "assets": [ { "type": "video", "url": "v.mp4" } ] }"#;
        let project: ProjectData = serde_json::from_str(json).unwrap();
        assert_eq!(project.assets[0].kind, ProjectAssetKind::Video);
        assert_eq!(project.assets[0].position, Xyz::zero());
        assert_eq!(project.assets[0].scale, Xyz::one());
    }

    #[test]
    fn project_file_save_load() {
        let scene = scene_with(AssetKind::Video, Some("v.mp4"), Transform::at([0.5, 0.0, 0.5]));
        let project = export_project(&scene, None);
        let path = temp_path("project.json");

        save_project_to_file(&project, &path).unwrap();
        let loaded = load_project_from_file(&path).unwrap();
        assert_eq!(loaded, project);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn project_directory_by_slug() {
        let root = temp_path("projects");
        let projects = ProjectDirectory::new(&root);
        assert!(projects.load("summer-show").unwrap().is_none());

        let project = export_project(
            &scene_with(AssetKind::Image, Some("i.png"), Transform::default()),
            None,
        );
        let path = projects.save("summer-show", &project).unwrap();
        assert!(path.ends_with("summer-show.json"));
        assert_eq!(projects.load("summer-show").unwrap(), Some(project));

        for slug in ["", "../escape", "Upper", "a/b"] {
            assert!(matches!(
                projects.load(slug),
                Err(SerializationError::InvalidSlug(_))
            ));
        }

        let _ = std::fs::remove_dir_all(root);
    }
}
