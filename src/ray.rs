use crate::material::Material;
use glam::Vec3;
use std::sync::Arc;

/// The ray data type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn point_at_parameter(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

/// The closest intersection found along a ray.
#[derive(Clone, Debug)]
pub struct Hit {
    pub t: f32,
    pub normal: Vec3,
    pub material: Arc<Material>,
}

impl Hit {
    pub fn new(t: f32, normal: Vec3, material: Arc<Material>) -> Self {
        Self { t, normal, material }
    }
}

/// Keeps whichever of the two hits is closer along the ray.
/// Ties go to the current hit.
pub fn closest(current: Option<Hit>, candidate: Option<Hit>) -> Option<Hit> {
    match (current, candidate) {
        (Some(current), Some(candidate)) => {
            if candidate.t < current.t {
                Some(candidate)
            } else {
                Some(current)
            }
        }
        (current, candidate) => current.or(candidate),
    }
}
