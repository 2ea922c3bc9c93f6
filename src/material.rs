use crate::ray::{Hit, Ray};
use glam::Vec3;
use serde::Deserialize;

// Reflect vector v around normal n
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// A Phong material. Shared between primitives through an `Arc`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Material {
    pub diffuse: Vec3,
    #[serde(default)]
    pub specular: Vec3,
    #[serde(default)]
    pub shininess: f32,
}

impl Material {
    #[cfg(test)]
    pub fn new(diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess,
        }
    }

    /// Local contribution of a single unoccluded light at the hit.
    ///
    /// The specular lobe is taken around the mirror reflection of the incoming
    /// ray direction, so it expects `dir_to_light` to be normalized.
    pub fn shade(&self, ray: &Ray, hit: &Hit, dir_to_light: Vec3, light_intensity: Vec3) -> Vec3 {
        let n = hit.normal;
        let r = reflect(ray.direction, n);

        let diffuse = dir_to_light.dot(n).max(0.0) * light_intensity * self.diffuse;
        let specular =
            dir_to_light.dot(r).max(0.0).powf(self.shininess) * light_intensity * self.specular;

        diffuse + specular
    }
}
