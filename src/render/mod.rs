//! Renderable mirror of the scene.
//!
//! Every object in the store has a `VisualProxy` carrying the transform the
//! viewport actually draws. The manipulation handle writes straight into
//! the selected proxy; the editor reconciles that back into the store.

mod camera;
mod gizmo;
pub mod pick;

pub use camera::OrbitCamera;
pub use gizmo::{GizmoAxis, GizmoMode, ManipulationHandle};
pub use pick::{PickHit, Ray};

use crate::assets::AssetKind;
use crate::scene::{ObjectId, SceneStore, Transform};
use glam::Vec3;

/// What a proxy looks like, enough for a viewport to pick a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyShape {
    Plane,
    Asset(AssetKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualProxy {
    pub id: ObjectId,
    pub shape: ProxyShape,
    pub transform: Transform,
    /// Edge length of the square footprint in the proxy's local XY plane.
    pub footprint: f32,
}

/// Footprint sizes used when proxies are created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxySizing {
    pub plane: f32,
    pub object: f32,
}

#[derive(Debug, Default)]
pub struct ProxySet {
    proxies: Vec<VisualProxy>,
}

impl ProxySet {
    pub fn new() -> Self {
        Self {
            proxies: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualProxy> {
        self.proxies.iter()
    }

    pub fn get(&self, id: &ObjectId) -> Option<&VisualProxy> {
        self.proxies.iter().find(|proxy| proxy.id == *id)
    }

    /// Direct access for whatever manipulates the viewport.
    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut VisualProxy> {
        self.proxies.iter_mut().find(|proxy| proxy.id == *id)
    }

    pub fn set_transform(&mut self, id: &ObjectId, transform: Transform) -> bool {
        match self.get_mut(id) {
            Some(proxy) => {
                proxy.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Rebuild the proxy list in store order. Transforms are copied from the
    /// store except for `owned_by_handle`, whose proxy keeps its live value.
    pub fn sync_from_store(
        &mut self,
        store: &SceneStore,
        sizing: ProxySizing,
        owned_by_handle: Option<&ObjectId>,
    ) {
        let mut previous = std::mem::take(&mut self.proxies);
        let mut take = |id: &ObjectId| {
            previous
                .iter()
                .position(|proxy| proxy.id == *id)
                .map(|index| previous.swap_remove(index))
        };

        let plane = store.default_plane();
        let mut next = Vec::with_capacity(store.total_len());
        next.push(Self::refreshed(
            take(&plane.id),
            &plane.id,
            ProxyShape::Plane,
            plane.transform,
            sizing.plane,
            owned_by_handle,
        ));
        for object in store.objects() {
            next.push(Self::refreshed(
                take(&object.id),
                &object.id,
                ProxyShape::Asset(object.asset.kind),
                object.transform,
                sizing.object,
                owned_by_handle,
            ));
        }
        self.proxies = next;
    }

    fn refreshed(
        existing: Option<VisualProxy>,
        id: &ObjectId,
        shape: ProxyShape,
        stored: Transform,
        footprint: f32,
        owned_by_handle: Option<&ObjectId>,
    ) -> VisualProxy {
        match existing {
            Some(mut proxy) => {
                if owned_by_handle != Some(id) {
                    proxy.transform = stored;
                }
                proxy
            }
            None => VisualProxy {
                id: id.clone(),
                shape,
                transform: stored,
                footprint,
            },
        }
    }
}

/// Outline drawn around the selected object's footprint. Always carries
/// the object's current transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub target: ObjectId,
    pub transform: Transform,
    pub footprint: f32,
}

impl Highlight {
    pub fn for_proxy(proxy: &VisualProxy) -> Self {
        Self {
            target: proxy.id.clone(),
            transform: proxy.transform,
            footprint: proxy.footprint,
        }
    }

    /// Footprint corners in world space, counter-clockwise from bottom-left.
    pub fn corners(&self) -> [Vec3; 4] {
        let half = self.footprint * 0.5;
        let matrix = self.transform.matrix();
        [
            Vec3::new(-half, -half, 0.0),
            Vec3::new(half, -half, 0.0),
            Vec3::new(half, half, 0.0),
            Vec3::new(-half, half, 0.0),
        ]
        .map(|corner| matrix.transform_point3(corner))
    }

    /// The four outline edges as world-space segments.
    pub fn edges(&self) -> [[Vec3; 2]; 4] {
        let c = self.corners();
        [[c[0], c[1]], [c[1], c[2]], [c[2], c[3]], [c[3], c[0]]]
    }
}

/// Handle overlay state for the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GizmoView {
    pub target: ObjectId,
    pub mode: GizmoMode,
    pub origin: [f32; 3],
    pub dragging: Option<GizmoAxis>,
}

/// Everything a viewport needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub proxies: Vec<VisualProxy>,
    pub highlight: Option<Highlight>,
    pub gizmo: Option<GizmoView>,
    pub camera_eye: [f32; 3],
    pub camera_target: [f32; 3],
}
