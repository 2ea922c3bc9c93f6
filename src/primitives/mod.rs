//! This module is full of primitives that all impl Intersect

mod group;
mod plane;
mod sphere;
mod transform;
mod triangle;

pub use group::*;
pub use plane::*;
pub use sphere::*;
pub use transform::*;
pub use triangle::*;

use crate::ray::{Hit, Ray};

/// Computes whether a ray intersects the implementor
pub trait Intersect: Send + Sync {
    /// Computes the intersection between the ray and the primitive.
    ///
    /// Only an intersection with `t_min <= t < t_max` is reported, where `t_max` is
    /// the distance of the closest hit the caller has found so far.
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit>;

    /// Computes whether there is any intersection between the ray and the primitive.
    /// Could be cheaper than "intersection".
    fn has_intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> bool {
        self.intersection(ray, t_min, t_max).is_some()
    }
}
