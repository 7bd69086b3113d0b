mod egui_host;
mod input;
mod sync;
mod timing;

pub use egui_host::{EguiFrameOutput, EguiHost};
pub use input::{command_for_key, EditorCommand};
pub use sync::TransformSync;
pub use timing::SampleClock;

use crate::assets::{
    AssetDescriptor, AssetError, AssetKind, AssetRegistry, AssetStorage, UploadOutcome,
    UploadTicket,
};
use crate::config::EditorConfig;
use crate::render::{
    pick::pick, GizmoAxis, GizmoMode, GizmoView, Highlight, ManipulationHandle, OrbitCamera,
    ProxySet, ProxySizing, RenderFrame, VisualProxy,
};
use crate::scene::serialization::{export_project, ProjectData};
use crate::scene::{DropEvent, ObjectId, Placement, SceneStore, SelectionState};
use crate::ui::{apply_edit, properties_view, PropertiesView, PropertyEdit, UiAction};

use std::sync::Arc;
use std::time::Instant;
use winit::keyboard::PhysicalKey;

const ORBIT_RADIANS_PER_PIXEL: f32 = 0.005;
const HANDLE_UNITS_PER_PIXEL: f32 = 0.01;

/// Owns every piece of editing-session state: assets, the scene store,
/// selection, the asset currently being dragged, proxies, handle, camera
/// and the sampling loop. Hosts drive it with input and `tick`.
pub struct Editor {
    config: EditorConfig,
    assets: AssetRegistry,
    scene: SceneStore,
    selection: SelectionState,
    placement: Placement,
    dragging: Option<Arc<AssetDescriptor>>,
    proxies: ProxySet,
    highlight: Option<Highlight>,
    handle: ManipulationHandle,
    camera: OrbitCamera,
    sync: TransformSync,
    mounted: bool,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let mut editor = Self {
            assets: AssetRegistry::new(),
            scene: SceneStore::new(),
            selection: SelectionState::new(),
            placement: Placement::new(config.placement_extent),
            dragging: None,
            proxies: ProxySet::new(),
            highlight: None,
            handle: ManipulationHandle::new(),
            camera: OrbitCamera::looking_at(config.camera_position, [0.0, 0.0, 0.0]),
            sync: TransformSync::new(config.sample_interval()),
            mounted: false,
            config,
        };
        editor.refresh_proxies();
        editor
    }

    /// Open the editor. The default plane is selected the first time.
    pub fn mount(&mut self, now: Instant) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        log::info!("Editor mounted with {} object(s)", self.scene.total_len());
        self.refresh_proxies();
        if self.selection.mount(ObjectId::default_plane()) {
            self.on_selection_changed(now);
        } else {
            self.sync.follow(self.selection.selected(), now);
        }
    }

    /// Tear down recurring work. Selection and scene are kept.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.flush_handle_target();
        self.end_handle_drag();
        self.sync.stop();
        self.dragging = None;
        self.mounted = false;
        log::info!("Editor unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.assets
    }

    pub fn scene(&self) -> &SceneStore {
        &self.scene
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn proxies(&self) -> &ProxySet {
        &self.proxies
    }

    /// Mutate a proxy the way an external manipulation widget would:
    /// directly, without telling the store. The sampling loop picks the
    /// change up for the selected object.
    pub fn proxy_mut(&mut self, id: &ObjectId) -> Option<&mut VisualProxy> {
        self.proxies.get_mut(id)
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn sync(&self) -> &TransformSync {
        &self.sync
    }

    // Assets

    pub fn add_text_asset(&mut self) -> Arc<AssetDescriptor> {
        self.assets.add_text()
    }

    pub fn upload_asset(
        &mut self,
        storage: &dyn AssetStorage,
        kind: AssetKind,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Arc<AssetDescriptor>, AssetError> {
        self.assets.upload(storage, kind, file_name, bytes)
    }

    /// Start an upload without blocking; `tick` registers it when done.
    pub fn begin_upload(
        &mut self,
        storage: Arc<dyn AssetStorage>,
        kind: AssetKind,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<UploadTicket, AssetError> {
        self.assets.begin_upload(storage, kind, file_name, bytes)
    }

    // Drag and drop

    pub fn begin_drag(&mut self, asset_id: &str) -> Result<(), AssetError> {
        let asset = self
            .assets
            .get(asset_id)
            .cloned()
            .ok_or_else(|| AssetError::UnknownAsset(asset_id.to_string()))?;
        log::debug!("Dragging {}", asset.name);
        self.dragging = Some(asset);
        Ok(())
    }

    pub fn cancel_drag(&mut self) {
        if self.dragging.take().is_some() {
            log::debug!("Drag cancelled");
        }
    }

    pub fn dragged_asset(&self) -> Option<&Arc<AssetDescriptor>> {
        self.dragging.as_ref()
    }

    /// Finish the current drag on the canvas. Without a dragged asset this
    /// does nothing. The new object is visible to the next `render`.
    pub fn drop_asset(&mut self, event: &DropEvent) -> Option<ObjectId> {
        let Some(asset) = self.dragging.take() else {
            log::debug!("Drop without a dragged asset ignored");
            return None;
        };
        let id = self.placement.place(&asset, event, &mut self.scene)?;
        self.refresh_proxies();
        Some(id)
    }

    // Selection

    pub fn select_pointer(&mut self, id: ObjectId, now: Instant) -> bool {
        if !self.scene.contains(&id) {
            log::warn!("Cannot select unknown object {}", id);
            return false;
        }
        if self.selection.is_selected(&id) {
            return false;
        }
        self.flush_handle_target();
        self.selection.select_pointer(id);
        self.on_selection_changed(now);
        true
    }

    pub fn clear_selection(&mut self, now: Instant) -> bool {
        if self.selection.selected().is_none() {
            return false;
        }
        self.flush_handle_target();
        self.selection.clear_selection();
        self.on_selection_changed(now);
        true
    }

    /// A click on the canvas: the nearest proxy under the pointer is
    /// selected, a miss clears the selection.
    pub fn click(&mut self, pixel: [f32; 2], viewport: [f32; 2], now: Instant) -> Option<ObjectId> {
        let ray = self.camera.ray_through(pixel, viewport)?;
        match pick(&ray, &self.proxies) {
            Some(hit) => {
                self.select_pointer(hit.id.clone(), now);
                Some(hit.id)
            }
            None => {
                self.clear_selection(now);
                None
            }
        }
    }

    fn on_selection_changed(&mut self, now: Instant) {
        self.end_handle_drag();
        let selected = self.selection.selected().cloned();
        self.handle.attach(selected.clone());
        if self.mounted {
            self.sync.follow(selected.as_ref(), now);
        }
        self.highlight = selected
            .as_ref()
            .and_then(|id| self.proxies.get(id))
            .map(Highlight::for_proxy);
    }

    /// Write the handle target's live transform into the store.
    fn flush_handle_target(&mut self) {
        let Some(id) = self.handle.attached() else {
            return;
        };
        if let Some(proxy) = self.proxies.get(id) {
            if self.scene.transform(id) != Some(proxy.transform) {
                self.scene.set_transform(id, proxy.transform);
            }
        }
    }

    // Manipulation

    pub fn gizmo_mode(&self) -> GizmoMode {
        self.handle.mode()
    }

    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) {
        log::debug!("Gizmo mode {}", mode.label());
        self.handle.set_mode(mode);
    }

    /// Grab a handle axis. Camera navigation is suspended until the drag
    /// ends.
    pub fn begin_handle_drag(&mut self, axis: GizmoAxis) -> bool {
        let Some(id) = self.handle.attached() else {
            return false;
        };
        let Some(proxy) = self.proxies.get(id) else {
            return false;
        };
        if !self.handle.begin_drag(axis, proxy) {
            return false;
        }
        self.camera.set_suspended(true);
        true
    }

    /// Move the grabbed axis. The new transform goes to the store and the
    /// highlight right away.
    pub fn drag_handle(&mut self, amount: f32) -> bool {
        let Some(id) = self.handle.attached().cloned() else {
            return false;
        };
        let Some(proxy) = self.proxies.get_mut(&id) else {
            return false;
        };
        if !self.handle.drag(proxy, amount) {
            return false;
        }
        let transform = proxy.transform;
        self.scene.set_transform(&id, transform);
        if let Some(highlight) = self.highlight.as_mut() {
            highlight.transform = transform;
        }
        true
    }

    pub fn end_handle_drag(&mut self) -> bool {
        let ended = self.handle.end_drag().is_some();
        self.camera.set_suspended(false);
        ended
    }

    /// Pointer motion with a button held: moves the grabbed handle axis
    /// during a manipulation, orbits the camera otherwise.
    pub fn pointer_drag(&mut self, delta: [f32; 2]) -> bool {
        if self.handle.is_dragging() {
            return self.drag_handle(delta[0] * HANDLE_UNITS_PER_PIXEL);
        }
        self.camera.orbit(
            -delta[0] * ORBIT_RADIANS_PER_PIXEL,
            delta[1] * ORBIT_RADIANS_PER_PIXEL,
        )
    }

    pub fn scroll(&mut self, delta: f32) -> bool {
        self.camera.zoom(delta)
    }

    // Properties

    pub fn properties(&self) -> PropertiesView {
        properties_view(&self.scene, &self.selection)
    }

    /// Apply a properties-panel edit. Transform edits are mirrored into the
    /// selected proxy so the next sample does not overwrite them.
    pub fn commit_property(&mut self, edit: &PropertyEdit) -> bool {
        if !apply_edit(&mut self.scene, &self.selection, edit) {
            return false;
        }
        if let PropertyEdit::Transform { .. } = edit {
            if let Some(id) = self.selection.selected() {
                if let Some(transform) = self.scene.transform(id) {
                    self.proxies.set_transform(id, transform);
                    if let Some(highlight) = self.highlight.as_mut() {
                        highlight.transform = transform;
                    }
                }
            }
        }
        true
    }

    // Scene

    /// Remove a placed object. The default plane stays; removing the
    /// selected object clears the selection first.
    pub fn remove_object(&mut self, id: &ObjectId, now: Instant) -> bool {
        if id.is_default_plane() || !self.scene.contains(id) {
            return false;
        }
        if self.selection.is_selected(id) {
            self.clear_selection(now);
        }
        let removed = self.scene.remove_object(id).is_some();
        self.refresh_proxies();
        removed
    }

    pub fn remove_selected(&mut self, now: Instant) -> bool {
        match self.selection.selected().cloned() {
            Some(id) => self.remove_object(&id, now),
            None => false,
        }
    }

    /// Published form of the scene. Pending handle changes are flushed
    /// first.
    pub fn export_project(&mut self, target: Option<String>) -> ProjectData {
        self.flush_handle_target();
        export_project(&self.scene, target)
    }

    // Frame driving

    /// Per-frame work: finished uploads are registered, the selected proxy
    /// is sampled when due and other proxies follow the store.
    pub fn tick(&mut self, now: Instant) -> Vec<UploadOutcome> {
        let outcomes = self.assets.poll_uploads();
        if self.mounted {
            self.sync
                .tick(now, &self.proxies, &mut self.scene, &mut self.highlight);
        }
        self.refresh_proxies();
        outcomes
    }

    pub fn render(&self) -> RenderFrame {
        let selected = self.selection.selected();
        let highlight = selected
            .and_then(|id| self.proxies.get(id))
            .map(Highlight::for_proxy);
        let gizmo = selected.and_then(|id| self.proxies.get(id)).map(|proxy| GizmoView {
            target: proxy.id.clone(),
            mode: self.handle.mode(),
            origin: proxy.transform.position,
            dragging: self.handle.drag_axis(),
        });
        RenderFrame {
            proxies: self.proxies.iter().cloned().collect(),
            highlight,
            gizmo,
            camera_eye: self.camera.eye(),
            camera_target: self.camera.target,
        }
    }

    pub fn handle_key(&mut self, key: PhysicalKey, now: Instant) -> bool {
        let Some(command) = command_for_key(key) else {
            return false;
        };
        match command {
            EditorCommand::SetMode(mode) => {
                self.set_gizmo_mode(mode);
                true
            }
            EditorCommand::ClearSelection => self.clear_selection(now),
            EditorCommand::RemoveSelected => self.remove_selected(now),
        }
    }

    /// Apply the actions collected from one UI frame, in order.
    pub fn apply_ui_actions(&mut self, actions: Vec<UiAction>, now: Instant) -> bool {
        let mut changed = false;
        for action in actions {
            changed |= match action {
                UiAction::Select(id) => self.select_pointer(id, now),
                UiAction::ClearSelection => self.clear_selection(now),
                UiAction::BeginDrag(asset_id) => match self.begin_drag(&asset_id) {
                    Ok(()) => true,
                    Err(err) => {
                        log::warn!("{}", err);
                        false
                    }
                },
                UiAction::CancelDrag => {
                    self.cancel_drag();
                    false
                }
                UiAction::Drop(event) => self.drop_asset(&event).is_some(),
                UiAction::AddText => {
                    self.add_text_asset();
                    true
                }
                UiAction::SetMode(mode) => {
                    self.set_gizmo_mode(mode);
                    true
                }
                UiAction::RemoveSelected => self.remove_selected(now),
                UiAction::Edit(edit) => self.commit_property(&edit),
            };
        }
        changed
    }

    fn refresh_proxies(&mut self) {
        let sizing = ProxySizing {
            plane: self.config.default_plane_size,
            object: self.config.default_object_footprint,
        };
        self.proxies
            .sync_from_store(&self.scene, sizing, self.selection.selected());
    }
}
