use crate::{
    light::Illumination,
    material::reflect,
    primitives::Intersect,
    ray::{Hit, Ray},
    scene::Scene,
};
use glam::Vec3;

/// Offset for secondary rays so they do not hit the surface they start on
pub const SHADOW_EPSILON: f32 = 1e-4;
pub const REFLECTION_EPSILON: f32 = 1e-4;

pub struct TraceResult {
    pub color: Vec3,
    /// The closest hit of the traced ray itself, not of its reflections
    pub hit: Option<Hit>,
}

/// Whitted style tracer: Phong shading, hard shadows and mirror reflections.
pub struct Tracer<'a> {
    scene: &'a Scene,
    bounded_shadows: bool,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            bounded_shadows: false,
        }
    }

    /// Stop shadow rays at the light instead of searching the whole scene
    pub fn with_bounded_shadows(mut self, bounded_shadows: bool) -> Self {
        self.bounded_shadows = bounded_shadows;
        self
    }

    pub fn trace_ray(&self, ray: Ray, t_min: f32, bounces: u32) -> TraceResult {
        let hit = match self.scene.group().intersection(ray, t_min, f32::INFINITY) {
            Some(hit) => hit,
            None => {
                return TraceResult {
                    color: self.scene.background_color(ray.direction),
                    hit: None,
                }
            }
        };

        let material = &hit.material;
        let point = ray.point_at_parameter(hit.t);
        let mut color = self.scene.ambient_light() * material.diffuse;

        for light in self.scene.lights() {
            let illumination = light.illumination(point);

            if self.is_shadowed(point, &illumination) {
                continue;
            }

            color += material.shade(&ray, &hit, illumination.direction, illumination.intensity);
        }

        if bounces > 0 {
            let reflected = Ray::new(point, reflect(ray.direction, hit.normal));
            let reflection = self.trace_ray(reflected, REFLECTION_EPSILON, bounces - 1);
            color += material.specular * reflection.color;
        }

        TraceResult {
            color,
            hit: Some(hit),
        }
    }

    fn is_shadowed(&self, point: Vec3, illumination: &Illumination) -> bool {
        let shadow_ray = Ray::new(point, illumination.direction);
        let t_max = if self.bounded_shadows {
            illumination.distance
        } else {
            f32::INFINITY
        };

        self.scene
            .group()
            .has_intersection(shadow_ray, SHADOW_EPSILON, t_max)
    }
}
