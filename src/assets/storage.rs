use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid storage path: {0}")]
    InvalidPath(String),
    #[error("upload rejected: {0}")]
    Rejected(String),
}

/// Binary storage for uploaded asset media. Returns a public URL that the
/// editor treats as an opaque string.
pub trait AssetStorage: Send + Sync {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, StorageError>;
}

/// Stores uploads under a local directory and hands out `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let valid = !path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !valid {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl AssetStorage for LocalStorage {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full_path, bytes)?;
        let absolute = full_path.canonicalize().unwrap_or(full_path);
        Ok(format!("file://{}", absolute.display()))
    }
}
