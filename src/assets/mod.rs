mod storage;

pub use storage::{AssetStorage, LocalStorage, StorageError};

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Media kind of an asset. Determines which kind-specific properties a
/// placed object carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AssetKind {
    Model3D,
    Video,
    Text,
    Image,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Model3D,
        AssetKind::Video,
        AssetKind::Image,
        AssetKind::Text,
    ];

    /// Short tag used in generated ids and storage paths.
    pub fn tag(self) -> &'static str {
        match self {
            AssetKind::Model3D => "3d",
            AssetKind::Video => "video",
            AssetKind::Text => "text",
            AssetKind::Image => "image",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Model3D => "3D",
            AssetKind::Video => "Video",
            AssetKind::Text => "Text",
            AssetKind::Image => "Image",
        }
    }
}

/// Immutable description of a declared or uploaded asset.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetDescriptor {
    pub id: String,
    pub name: String,
    pub kind: AssetKind,
    pub source_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("upload of {file_name} failed: {source}")]
    Upload {
        file_name: String,
        #[source]
        source: StorageError,
    },
    #[error("file name must not be empty")]
    EmptyFileName,
    #[error("unknown asset {0}")]
    UnknownAsset(String),
}

/// Millisecond stamps that never repeat within one source, even when the
/// wall clock does not advance between calls.
#[derive(Debug, Default)]
pub struct StampSource {
    last: u64,
}

impl StampSource {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    pub fn next(&mut self) -> u64 {
        self.next_from(now_millis())
    }

    /// Stamp for a given clock reading, bumped past the previous stamp on ties.
    pub fn next_from(&mut self, now_ms: u64) -> u64 {
        let stamp = now_ms.max(self.last.saturating_add(1));
        self.last = stamp;
        stamp
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(u64);

struct PendingUpload {
    ticket: UploadTicket,
    kind: AssetKind,
    file_name: String,
    stamp: u64,
    receiver: Receiver<Result<String, StorageError>>,
}

/// Result of a background upload reported by `poll_uploads`.
#[derive(Debug)]
pub enum UploadOutcome {
    Registered(UploadTicket, Arc<AssetDescriptor>),
    Failed(UploadTicket, AssetError),
}

/// Insertion-ordered collection of assets available for dragging.
pub struct AssetRegistry {
    assets: Vec<Arc<AssetDescriptor>>,
    stamps: StampSource,
    pending: Vec<PendingUpload>,
    next_ticket: u64,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self {
            assets: Vec::new(),
            stamps: StampSource::new(),
            pending: Vec::new(),
            next_ticket: 1,
        }
    }

    pub fn assets(&self) -> &[Arc<AssetDescriptor>] {
        &self.assets
    }

    pub fn get(&self, id: &str) -> Option<&Arc<AssetDescriptor>> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    /// Assets of one kind, in insertion order.
    pub fn by_kind(&self, kind: AssetKind) -> impl Iterator<Item = &Arc<AssetDescriptor>> + '_ {
        self.assets.iter().filter(move |asset| asset.kind == kind)
    }

    pub fn register(
        &mut self,
        kind: AssetKind,
        name: impl Into<String>,
        source_url: Option<String>,
    ) -> Arc<AssetDescriptor> {
        let stamp = self.stamps.next();
        self.push(kind, name.into(), source_url, stamp)
    }

    /// Declare a text asset. Text needs no uploaded media.
    pub fn add_text(&mut self) -> Arc<AssetDescriptor> {
        self.register(AssetKind::Text, "New Text", None)
    }

    /// Store `bytes` through `storage` and register the asset once the
    /// storage returned a URL. Nothing is registered on failure.
    pub fn upload(
        &mut self,
        storage: &dyn AssetStorage,
        kind: AssetKind,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Arc<AssetDescriptor>, AssetError> {
        if file_name.is_empty() {
            return Err(AssetError::EmptyFileName);
        }
        let stamp = self.stamps.next();
        let path = storage_path(kind, file_name, stamp);
        match storage.upload(&path, bytes) {
            Ok(url) => {
                log::info!("Uploaded {} to {}", file_name, url);
                Ok(self.push(kind, file_name.to_string(), Some(url), stamp))
            }
            Err(source) => {
                log::warn!("Error uploading {}: {}", file_name, source);
                Err(AssetError::Upload {
                    file_name: file_name.to_string(),
                    source,
                })
            }
        }
    }

    /// Run an upload on a worker thread. The asset is registered by a
    /// later `poll_uploads` call once the storage has answered.
    pub fn begin_upload(
        &mut self,
        storage: Arc<dyn AssetStorage>,
        kind: AssetKind,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<UploadTicket, AssetError> {
        if file_name.is_empty() {
            return Err(AssetError::EmptyFileName);
        }
        let stamp = self.stamps.next();
        let path = storage_path(kind, &file_name, stamp);
        let ticket = UploadTicket(self.next_ticket);
        self.next_ticket += 1;

        let (sender, receiver) = mpsc::channel();
        std::thread::spawn(move || {
            let result = storage.upload(&path, &bytes);
            let _ = sender.send(result);
        });

        log::debug!("Upload {:?} started for {}", ticket, file_name);
        self.pending.push(PendingUpload {
            ticket,
            kind,
            file_name,
            stamp,
            receiver,
        });
        Ok(ticket)
    }

    pub fn pending_uploads(&self) -> usize {
        self.pending.len()
    }

    /// Collect finished background uploads without blocking.
    pub fn poll_uploads(&mut self) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for upload in std::mem::take(&mut self.pending) {
            let result = match upload.receiver.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => {
                    still_pending.push(upload);
                    continue;
                }
                Err(TryRecvError::Disconnected) => Err(StorageError::Rejected(
                    "upload worker exited without a result".to_string(),
                )),
            };
            match result {
                Ok(url) => {
                    log::info!("Uploaded {} to {}", upload.file_name, url);
                    let asset = self.push(upload.kind, upload.file_name, Some(url), upload.stamp);
                    outcomes.push(UploadOutcome::Registered(upload.ticket, asset));
                }
                Err(source) => {
                    log::warn!("Error uploading {}: {}", upload.file_name, source);
                    outcomes.push(UploadOutcome::Failed(
                        upload.ticket,
                        AssetError::Upload {
                            file_name: upload.file_name,
                            source,
                        },
                    ));
                }
            }
        }
        self.pending = still_pending;
        outcomes
    }

    fn push(
        &mut self,
        kind: AssetKind,
        name: String,
        source_url: Option<String>,
        stamp: u64,
    ) -> Arc<AssetDescriptor> {
        let asset = Arc::new(AssetDescriptor {
            id: format!("{}-{}", kind.tag(), stamp),
            name,
            kind,
            source_url,
        });
        self.assets.push(Arc::clone(&asset));
        asset
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// `assets/{tag}-{stamp}.{ext}`, the extension taken from the file name.
fn storage_path(kind: AssetKind, file_name: &str, stamp: u64) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("assets/{}-{}.{}", kind.tag(), stamp, ext),
        _ => format!("assets/{}-{}", kind.tag(), stamp),
    }
}
