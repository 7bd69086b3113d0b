use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Editor settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Transform sampling cadence while an object is selected.
    pub sample_interval_ms: u64,
    /// World distance covered by half of the drop target on each axis.
    pub placement_extent: f32,
    /// Edge length of the default plane's square footprint.
    pub default_plane_size: f32,
    /// Edge length used for highlight and picking of placed objects.
    pub default_object_footprint: f32,
    /// Root directory for the local asset storage.
    pub storage_root: PathBuf,
    pub camera_position: [f32; 3],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 16,
            placement_extent: 5.0,
            default_plane_size: 5.0,
            default_object_footprint: 1.0,
            storage_root: PathBuf::from("storage"),
            camera_position: [0.0, 0.0, 10.0],
        }
    }
}

impl EditorConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }
}
