use super::VisualProxy;
use crate::scene::{ObjectId, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub const ALL: [GizmoMode; 3] = [GizmoMode::Translate, GizmoMode::Rotate, GizmoMode::Scale];

    pub fn label(self) -> &'static str {
        match self {
            GizmoMode::Translate => "Translate",
            GizmoMode::Rotate => "Rotate",
            GizmoMode::Scale => "Scale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    fn index(self) -> usize {
        match self {
            GizmoAxis::X => 0,
            GizmoAxis::Y => 1,
            GizmoAxis::Z => 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    axis: GizmoAxis,
    start: Transform,
}

/// Translate/rotate/scale widget bound to the selected proxy. It edits the
/// proxy transform in place and emits nothing; callers read the proxy back.
#[derive(Debug, Default)]
pub struct ManipulationHandle {
    mode: GizmoMode,
    attached: Option<ObjectId>,
    drag: Option<ActiveDrag>,
}

impl ManipulationHandle {
    pub fn new() -> Self {
        Self {
            mode: GizmoMode::Translate,
            attached: None,
            drag: None,
        }
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.mode = mode;
    }

    pub fn attached(&self) -> Option<&ObjectId> {
        self.attached.as_ref()
    }

    /// Rebind to another proxy, or detach with `None`. An active drag ends.
    pub fn attach(&mut self, target: Option<ObjectId>) {
        if self.attached != target {
            self.drag = None;
            self.attached = target;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_axis(&self) -> Option<GizmoAxis> {
        self.drag.map(|drag| drag.axis)
    }

    /// Grab one axis of the handle. Fails when nothing is attached.
    pub fn begin_drag(&mut self, axis: GizmoAxis, proxy: &VisualProxy) -> bool {
        if self.attached.as_ref() != Some(&proxy.id) {
            return false;
        }
        self.drag = Some(ActiveDrag {
            axis,
            start: proxy.transform,
        });
        true
    }

    /// Move the grabbed axis by `amount`: world units for translate,
    /// radians for rotate, relative factor for scale.
    pub fn drag(&self, proxy: &mut VisualProxy, amount: f32) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        if self.attached.as_ref() != Some(&proxy.id) {
            return false;
        }
        let axis = drag.axis.index();
        let transform = &mut proxy.transform;
        match self.mode {
            GizmoMode::Translate => transform.position[axis] += amount,
            GizmoMode::Rotate => transform.rotation[axis] += amount,
            GizmoMode::Scale => transform.scale[axis] *= 1.0 + amount,
        }
        true
    }

    /// Release the axis. Returns the transform the drag started from.
    pub fn end_drag(&mut self) -> Option<Transform> {
        self.drag.take().map(|drag| drag.start)
    }
}
