use crate::{
    material::Material,
    primitives::Intersect,
    ray::{Hit, Ray},
};
use glam::Vec3;
use std::sync::Arc;

// Squared direction lengths below this cannot be solved for
const DEGENERATE_DIRECTION: f32 = 1e-12;

#[derive(Clone, Debug)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

impl Intersect for Sphere {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        // Ray origin in the sphere's frame
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = 2.0 * ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        if a < DEGENERATE_DIRECTION {
            return None;
        }

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let d = f32::sqrt(discriminant);
        let t_near = (-b - d) / (2.0 * a);
        let t_far = (-b + d) / (2.0 * a);

        // The far root only counts when the near one is behind us
        let t = if t_near >= t_min {
            t_near
        } else if t_far >= t_min {
            t_far
        } else {
            return None;
        };

        if t >= t_max {
            return None;
        }

        let normal = (ray.point_at_parameter(t) - self.center).normalize();
        Some(Hit::new(t, normal, self.material.clone()))
    }
}
