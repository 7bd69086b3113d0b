use super::{KindProps, ObjectId, SceneObject, SceneStore, Transform};
use crate::assets::{AssetDescriptor, StampSource};
use std::sync::Arc;

/// Pointer position relative to the drop target's top-left corner, plus
/// the target's size, all in the same pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropEvent {
    pub pointer: [f32; 2],
    pub target_size: [f32; 2],
}

impl DropEvent {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pointer: [x, y],
            target_size: [width, height],
        }
    }

    /// Signed device coordinates in [-1, 1], vertical axis pointing up.
    pub fn normalized(&self) -> Option<[f32; 2]> {
        let [width, height] = self.target_size;
        if !(width > 0.0 && height > 0.0) {
            return None;
        }
        let nx = (self.pointer[0] / width) * 2.0 - 1.0;
        let ny = -((self.pointer[1] / height) * 2.0 - 1.0);
        Some([nx, ny])
    }
}

/// Ground-plane position for a drop. Not a camera unprojection: the target
/// maps linearly onto a square of half-size `extent` around the origin.
pub fn drop_position(event: &DropEvent, extent: f32) -> Option<[f32; 3]> {
    let [nx, ny] = event.normalized()?;
    Some([nx * extent, 0.0, ny * extent])
}

/// Turns drops into new scene objects.
pub struct Placement {
    extent: f32,
    stamps: StampSource,
}

impl Placement {
    pub fn new(extent: f32) -> Self {
        Self {
            extent,
            stamps: StampSource::new(),
        }
    }

    /// Create an object for `asset` at the drop position and append it to
    /// the store. A drop target without area places nothing.
    pub fn place(
        &mut self,
        asset: &Arc<AssetDescriptor>,
        event: &DropEvent,
        store: &mut SceneStore,
    ) -> Option<ObjectId> {
        let Some(position) = drop_position(event, self.extent) else {
            log::warn!("Ignoring drop on a target without area: {:?}", event.target_size);
            return None;
        };
        let id = ObjectId::new(format!("{}-{}", asset.id, self.stamps.next()));
        store.insert(SceneObject {
            id: id.clone(),
            asset: Arc::clone(asset),
            transform: Transform::at(position),
            props: KindProps::initial(asset.kind, &asset.name),
        });
        log::info!("Placed {} as {} at {:?}", asset.name, id, position);
        Some(id)
    }
}
