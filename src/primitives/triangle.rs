use crate::{
    material::Material,
    primitives::Intersect,
    ray::{Hit, Ray},
};
use glam::{Mat3, Vec3};
use std::sync::Arc;

/// A smooth shaded triangle with one normal per vertex.
#[derive(Clone, Debug)]
pub struct Triangle {
    vertices: [Vec3; 3],
    normals: [Vec3; 3],
    material: Arc<Material>,
}

/// Solution of the ray/triangle system: ray distance and barycentric weights
/// of the second and third vertex.
#[derive(Clone, Copy, Debug)]
struct Barycentric {
    t: f32,
    u: f32,
    w: f32,
}

impl Triangle {
    pub fn new(vertices: [Vec3; 3], normals: [Vec3; 3], material: Arc<Material>) -> Self {
        Self {
            vertices,
            normals,
            material,
        }
    }

    /// A triangle with the face normal on every vertex
    pub fn flat(vertices: [Vec3; 3], material: Arc<Material>) -> Self {
        let [v1, v2, v3] = vertices;
        let normal = (v2 - v1).cross(v3 - v1).normalize();

        Self::new(vertices, [normal; 3], material)
    }

    // Cramer's rule on [-dir | v2 - v1 | v3 - v1] * (t, u, w) = origin - v1
    fn solve(&self, ray: Ray) -> Option<Barycentric> {
        let [v1, v2, v3] = self.vertices;
        let d = ray.direction;

        let a = Mat3::from_cols(-d, v2 - v1, v3 - v1);
        let b = ray.origin - v1;

        let det = a.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let t = Mat3::from_cols(b, a.y_axis, a.z_axis).determinant() / det;
        let u = Mat3::from_cols(a.x_axis, b, a.z_axis).determinant() / det;
        let w = Mat3::from_cols(a.x_axis, a.y_axis, b).determinant() / det;

        Some(Barycentric { t, u, w })
    }
}

impl Intersect for Triangle {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        let [n1, n2, n3] = self.normals;

        // Only the first vertex normal is checked for parallel rays
        if ray.direction.dot(n1) == 0.0 {
            return None;
        }

        let Barycentric { t, u, w } = self.solve(ray)?;

        if t < 0.0 || t < t_min || t >= t_max {
            return None;
        }

        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&w) || u + w > 1.0 {
            return None;
        }

        // Interpolated, not renormalized
        let normal = (1.0 - u - w) * n1 + u * n2 + w * n3;

        Some(Hit::new(t, normal, self.material.clone()))
    }
}
