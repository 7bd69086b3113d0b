//! CPU picking.
//!
//! Proxies are tested as thin boxes around their square footprint: the
//! ray is moved into the proxy's local space and slab-tested against
//! `[-f/2, f/2] x [-f/2, f/2] x [-d, d]`. The nearest hit wins.

use super::{ProxySet, VisualProxy};
use crate::scene::ObjectId;
use glam::Vec3;

/// Half thickness of a footprint for picking purposes.
const PICK_HALF_DEPTH: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub id: ObjectId,
    /// Distance along the ray in world units.
    pub distance: f32,
}

/// Nearest proxy hit by `ray`, if any.
pub fn pick(ray: &Ray, proxies: &ProxySet) -> Option<PickHit> {
    proxies
        .iter()
        .filter_map(|proxy| {
            intersect_proxy(ray, proxy).map(|distance| PickHit {
                id: proxy.id.clone(),
                distance,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

fn intersect_proxy(ray: &Ray, proxy: &VisualProxy) -> Option<f32> {
    let matrix = proxy.transform.matrix();
    // Zero scale collapses the proxy; there is nothing to hit.
    if matrix.determinant().abs() < 1e-12 {
        return None;
    }
    let inverse = matrix.inverse();
    let origin = inverse.transform_point3(ray.origin);
    let direction = inverse.transform_vector3(ray.direction);

    let half = proxy.footprint * 0.5;
    let min = Vec3::new(-half, -half, -PICK_HALF_DEPTH);
    let max = Vec3::new(half, half, PICK_HALF_DEPTH);
    // The local ray is an affine image of the world ray, so the parameter
    // is shared and equals world distance for a unit world direction.
    intersect_aabb(origin, direction, min, max)
}

fn intersect_aabb(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < 1e-12 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let t1 = (min[axis] - o) / d;
        let t2 = (max[axis] - o) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
    }
    if t_near <= t_far && t_far >= 0.0 {
        Some(if t_near >= 0.0 { t_near } else { t_far })
    } else {
        None
    }
}
