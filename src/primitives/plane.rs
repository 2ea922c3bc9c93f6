use crate::{
    material::Material,
    primitives::Intersect,
    ray::{Hit, Ray},
};
use glam::Vec3;
use std::sync::Arc;

/// An infinite plane with unit `normal`, offset `d` from the origin along it.
#[derive(Clone, Debug)]
pub struct Plane {
    normal: Vec3,
    d: f32,
    material: Arc<Material>,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32, material: Arc<Material>) -> Self {
        Self {
            normal,
            d,
            material,
        }
    }

    fn point(&self) -> Vec3 {
        self.normal * self.d
    }
}

impl Intersect for Plane {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        let t = (self.point() - ray.origin).dot(self.normal) / ray.direction.dot(self.normal);

        // Parallel rays divide by zero
        if !t.is_finite() {
            return None;
        }

        if t < 0.0 || t < t_min || t >= t_max {
            return None;
        }

        Some(Hit::new(t, self.normal, self.material.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    fn ground(d: f32) -> Plane {
        Plane::new(Vec3::Y, d, Arc::new(Material::default()))
    }

    #[test]
    fn hits_from_above() {
        let ray = Ray::new(vec3(0.0, 3.0, 0.0), vec3(0.0, -1.0, 0.0));
        let hit = ground(-1.0)
            .intersection(ray, 0.0, f32::INFINITY)
            .expect("ray should hit the plane");

        assert!((hit.t - 4.0).abs() < 1e-6);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn normal_is_not_flipped_from_below() {
        let ray = Ray::new(vec3(1.0, -3.0, 2.0), vec3(0.0, 1.0, 0.0));
        let hit = ground(0.0)
            .intersection(ray, 0.0, f32::INFINITY)
            .expect("ray should hit the plane");

        assert!((hit.t - 3.0).abs() < 1e-6);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(vec3(0.0, 1.0, 0.0), vec3(1.0, 0.0, 0.0));
        assert!(ground(0.0).intersection(ray, 0.0, f32::INFINITY).is_none());

        // Lying in the plane gives 0/0
        let ray = Ray::new(Vec3::ZERO, vec3(1.0, 0.0, 0.0));
        assert!(ground(0.0).intersection(ray, 0.0, f32::INFINITY).is_none());
    }

    #[test]
    fn plane_behind_ray_misses() {
        let ray = Ray::new(vec3(0.0, 1.0, 0.0), vec3(0.0, 1.0, 0.0));
        assert!(ground(0.0).intersection(ray, 0.0, f32::INFINITY).is_none());
    }

    #[test]
    fn respects_t_min_and_t_max() {
        let ray = Ray::new(vec3(0.0, 2.0, 0.0), vec3(0.0, -1.0, 0.0));
        assert!(ground(0.0).intersection(ray, 2.5, f32::INFINITY).is_none());
        assert!(ground(0.0).intersection(ray, 0.0, 1.0).is_none());
        assert!(ground(0.0).intersection(ray, 0.0, 2.0).is_none());
        assert!(ground(0.0).intersection(ray, 0.0, 2.1).is_some());
    }
}
