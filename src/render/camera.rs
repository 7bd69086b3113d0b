use super::pick::Ray;
use glam::{Mat4, Vec2, Vec3};

const FOV_Y_DEG: f32 = 75.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
const MIN_DISTANCE: f32 = 0.05;

/// Orbit/pan/zoom camera around a target point. While suspended (an
/// object is being manipulated) it ignores navigation input.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    suspended: bool,
}

impl OrbitCamera {
    pub fn new(target: [f32; 3], yaw: f32, pitch: f32, distance: f32) -> Self {
        Self {
            target,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            distance: distance.max(MIN_DISTANCE),
            suspended: false,
        }
    }

    /// Camera at `eye` looking at `target`.
    pub fn looking_at(eye: [f32; 3], target: [f32; 3]) -> Self {
        let forward = [target[0] - eye[0], target[1] - eye[1], target[2] - eye[2]];
        let distance = Vec3::from_array(forward).length();
        let (yaw, pitch) = forward_to_yaw_pitch(forward);
        Self::new(target, yaw, pitch, distance)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    pub fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) -> bool {
        if self.suspended {
            return false;
        }
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        wrap_angle(&mut self.yaw);
        true
    }

    /// Move the target within the view plane.
    pub fn pan(&mut self, right: f32, up: f32) -> bool {
        if self.suspended {
            return false;
        }
        let (_, right_dir, up_dir) = self.basis();
        let offset = right_dir * right + up_dir * up;
        self.target = (Vec3::from_array(self.target) + offset).to_array();
        true
    }

    pub fn zoom(&mut self, delta: f32) -> bool {
        if self.suspended {
            return false;
        }
        self.distance = (self.distance - delta).max(MIN_DISTANCE);
        true
    }

    pub fn eye(&self) -> [f32; 3] {
        let (forward, _, _) = self.basis();
        (Vec3::from_array(self.target) - forward * self.distance).to_array()
    }

    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        camera_basis(self.yaw, self.pitch)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let (_, _, up) = self.basis();
        let view = Mat4::look_at_rh(
            Vec3::from_array(self.eye()),
            Vec3::from_array(self.target),
            up,
        );
        let projection = Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect.max(1e-3), NEAR, FAR);
        projection * view
    }

    /// World-space ray through a pixel of a `viewport`-sized canvas
    /// (top-left origin).
    pub fn ray_through(&self, pixel: [f32; 2], viewport: [f32; 2]) -> Option<Ray> {
        if !(viewport[0] > 0.0 && viewport[1] > 0.0) {
            return None;
        }
        let ndc = Vec2::new(
            (pixel[0] / viewport[0]) * 2.0 - 1.0,
            -((pixel[1] / viewport[1]) * 2.0 - 1.0),
        );
        let inverse = self.view_projection(viewport[0] / viewport[1]).inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = (far - near).normalize_or_zero();
        if direction == Vec3::ZERO || !near.is_finite() {
            return None;
        }
        Some(Ray::new(near, direction))
    }
}

fn forward_to_yaw_pitch(forward: [f32; 3]) -> (f32, f32) {
    let direction = Vec3::from_array(forward).normalize_or_zero();
    if direction == Vec3::ZERO {
        return (-std::f32::consts::FRAC_PI_2, 0.0);
    }
    let yaw = direction.z.atan2(direction.x);
    let pitch = direction.y.clamp(-1.0, 1.0).asin();
    (yaw, pitch)
}

fn camera_basis(yaw: f32, pitch: f32) -> (Vec3, Vec3, Vec3) {
    let cos_pitch = pitch.cos();
    let forward = Vec3::new(yaw.cos() * cos_pitch, pitch.sin(), yaw.sin() * cos_pitch);
    let right = Vec3::new(-yaw.sin(), 0.0, yaw.cos());
    let up = right.cross(forward).normalize_or_zero();
    (forward, right, up)
}

fn wrap_angle(angle: &mut f32) {
    const TWO_PI: f32 = std::f32::consts::PI * 2.0;
    if angle.is_finite() {
        *angle = (*angle + std::f32::consts::PI).rem_euclid(TWO_PI) - std::f32::consts::PI;
    }
}
