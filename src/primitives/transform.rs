use crate::{
    primitives::Intersect,
    ray::{Hit, Ray},
};
use anyhow::{bail, Result};
use glam::Mat4;

/// Places a child object in the scene through an affine matrix.
pub struct Transform {
    inverse: Mat4,
    inverse_transpose: Mat4,
    object: Box<dyn Intersect>,
}

impl Transform {
    /// Fails when the matrix cannot be inverted
    pub fn new(matrix: Mat4, object: Box<dyn Intersect>) -> Result<Self> {
        let det = matrix.determinant();
        if det == 0.0 || !det.is_finite() {
            bail!("transform matrix is not invertible (determinant {})", det);
        }

        let inverse = matrix.inverse();
        if !inverse.is_finite() {
            bail!("transform matrix is not invertible");
        }

        Ok(Self {
            inverse,
            inverse_transpose: inverse.transpose(),
            object,
        })
    }

    // Direction is not renormalized so t is the same in both spaces
    fn to_local(&self, ray: Ray) -> Ray {
        Ray::new(
            self.inverse.transform_point3(ray.origin),
            self.inverse.transform_vector3(ray.direction),
        )
    }
}

impl Intersect for Transform {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        let local = self.to_local(ray);

        self.object
            .intersection(local, t_min, f32::INFINITY)
            .filter(|hit| hit.t < t_max)
            .map(|mut hit| {
                hit.normal = self
                    .inverse_transpose
                    .transform_vector3(hit.normal)
                    .normalize();
                hit
            })
    }

    fn has_intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> bool {
        self.object.has_intersection(self.to_local(ray), t_min, t_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        material::Material,
        primitives::{Group, Sphere},
    };
    use glam::{vec3, Vec3};
    use std::sync::Arc;

    fn sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(center, radius, Arc::new(Material::default()))
    }

    #[test]
    fn identity_matches_unwrapped_primitive() {
        let bare = sphere(vec3(0.5, -0.25, -3.0), 1.25);
        let wrapped = Transform::new(Mat4::IDENTITY, Box::new(bare.clone())).unwrap();

        for i in 0..16 {
            let angle = i as f32 * 0.15 - 1.2;
            let ray = Ray::new(
                vec3(angle, 0.3 * angle, 2.0),
                vec3(0.1 * angle, -0.05, -1.0),
            );

            let expected = bare.intersection(ray, 0.0, f32::INFINITY);
            let actual = wrapped.intersection(ray, 0.0, f32::INFINITY);

            match (expected, actual) {
                (Some(expected), Some(actual)) => {
                    assert_eq!(expected.t, actual.t);
                    assert!(expected.normal.abs_diff_eq(actual.normal, 1e-6));
                }
                (None, None) => {}
                (expected, actual) => panic!(
                    "mismatch for {:?}: {:?} vs {:?}",
                    ray,
                    expected.map(|h| h.t),
                    actual.map(|h| h.t)
                ),
            }
        }
    }

    #[test]
    fn translation_moves_object() {
        let moved = Transform::new(
            Mat4::from_translation(vec3(0.0, 0.0, -5.0)),
            Box::new(sphere(Vec3::ZERO, 1.0)),
        )
        .unwrap();

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let hit = moved
            .intersection(ray, 0.0, f32::INFINITY)
            .expect("translated sphere should be hit");

        assert!((hit.t - 4.0).abs() < 1e-5);
        assert!(hit.normal.abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn non_uniform_scale_uses_inverse_transpose_for_normals() {
        // Ellipsoid stretched along x
        let stretched = Transform::new(
            Mat4::from_scale(vec3(2.0, 1.0, 1.0)),
            Box::new(sphere(Vec3::ZERO, 1.0)),
        )
        .unwrap();

        let point = vec3(2.0_f32.sqrt(), 0.0, 0.5_f32.sqrt());
        let ray = Ray::new(point * 3.0, -point);
        let hit = stretched
            .intersection(ray, 0.0, f32::INFINITY)
            .expect("ellipsoid should be hit");

        assert!((hit.t - 2.0).abs() < 1e-4);
        // Gradient of x^2/4 + z^2 at the hit point
        let expected = vec3(point.x / 2.0, 0.0, 2.0 * point.z).normalize();
        assert!(hit.normal.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn local_hit_must_beat_caller_bound() {
        let moved = Transform::new(
            Mat4::from_translation(vec3(0.0, 0.0, -5.0)),
            Box::new(sphere(Vec3::ZERO, 1.0)),
        )
        .unwrap();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        assert!(moved.intersection(ray, 0.0, 3.0).is_none());
        assert!(moved.intersection(ray, 0.0, 4.0).is_none());
        assert!(!moved.has_intersection(ray, 0.0, 3.0));
        assert!(moved.has_intersection(ray, 0.0, f32::INFINITY));
    }

    #[test]
    fn nested_transforms_compose() {
        let mut inner = Group::new();
        inner.add(Box::new(sphere(Vec3::ZERO, 1.0)));
        let scaled = Transform::new(Mat4::from_scale(Vec3::splat(2.0)), Box::new(inner)).unwrap();
        let moved = Transform::new(
            Mat4::from_translation(vec3(0.0, 0.0, -10.0)),
            Box::new(scaled),
        )
        .unwrap();

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let hit = moved
            .intersection(ray, 0.0, f32::INFINITY)
            .expect("nested sphere should be hit");

        assert!((hit.t - 8.0).abs() < 1e-4);
        assert!(hit.normal.abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let flat = Mat4::from_scale(vec3(1.0, 0.0, 1.0));
        assert!(Transform::new(flat, Box::new(sphere(Vec3::ZERO, 1.0))).is_err());
    }
}
