use crate::ray::Ray;
use glam::{Vec2, Vec3};

#[derive(Debug)]
pub struct Camera {
    center: Vec3,
    w: Vec3,
    u: Vec3,
    v: Vec3,
    focal_distance: f32,
    aspect: f32,
}

impl Camera {
    /// `fov` is the vertical field of view in degrees
    pub fn new(center: Vec3, direction: Vec3, up: Vec3, fov: f32, aspect: f32) -> Self {
        let w = direction.normalize();
        let u = w.cross(up).normalize();
        let v = u.cross(w);
        let focal_distance = 1.0 / f32::tan(fov.to_radians() / 2.0);

        Self {
            center,
            w,
            u,
            v,
            focal_distance,
            aspect,
        }
    }

    /// Ray through a point in normalized device coordinates, both axes in [-1, 1]
    pub fn generate_ray(&self, point: Vec2) -> Ray {
        let direction =
            point.x * self.aspect * self.u + point.y * self.v + self.focal_distance * self.w;

        Ray::new(self.center, direction.normalize())
    }

    pub fn t_min(&self) -> f32 {
        0.0
    }
}
