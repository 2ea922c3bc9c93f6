use crate::{camera::Camera, scene::Scene, tracer::Tracer};
use anyhow::{Context, Result};
use glam::{vec2, Vec2, Vec3};
use image::{Rgb, RgbImage};
use itertools::iproduct;
use log::debug;
use rand::prelude::*;
use rayon::prelude::*;
use std::path::Path;

pub type DefaultRng = rand_xoshiro::Xoshiro256Plus;

/// Samples averaged per pixel when jittering
pub const JITTER_SAMPLES: usize = 16;
/// Supersampling factor used by the downsampling filter
pub const FILTER_FACTOR: u32 = 3;

#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub bounces: u32,
    pub jitter: bool,
    pub filter: bool,
    pub seed: u64,
    pub bounded_shadows: bool,
}

impl RenderSettings {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn samples_per_pixel(&self) -> usize {
        if self.jitter {
            JITTER_SAMPLES
        } else {
            1
        }
    }
}

/// A plain grid of linear values, one `Vec3` per pixel, row 0 at the top
#[derive(Clone, Debug, PartialEq)]
pub struct Film {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl Film {
    pub fn new(width: u32, height: u32, pixels: Vec<Vec3>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Box filters every `factor` x `factor` block into a single pixel
    pub fn downsample(&self, factor: u32) -> Film {
        let width = self.width / factor;
        let height = self.height / factor;
        let weight = 1.0 / (factor * factor) as f32;

        let pixels = iproduct!(0..height, 0..width)
            .map(|(y, x)| {
                iproduct!(0..factor, 0..factor)
                    .map(|(dy, dx)| self.get(x * factor + dx, y * factor + dy))
                    .fold(Vec3::ZERO, |sum, value| sum + value)
                    * weight
            })
            .collect();

        Film::new(width, height, pixels)
    }

    /// Converts to 8 bit RGB after mapping each value into [0, 1]
    pub fn to_image(&self, map: impl Fn(Vec3) -> Vec3) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let value = map(self.get(x, y)).clamp(Vec3::ZERO, Vec3::ONE);

            // Convert from [0, 1] to [0, 256]
            Rgb([
                (255.99 * value.x) as u8,
                (255.99 * value.y) as u8,
                (255.99 * value.z) as u8,
            ])
        })
    }

    pub fn save(&self, path: &Path, map: impl Fn(Vec3) -> Vec3) -> Result<()> {
        self.to_image(map)
            .save(path)
            .with_context(|| format!("Failed to save image: {:?}", path))
    }
}

/// Everything the pixel loop produces
pub struct Frame {
    pub color: Film,
    pub normals: Film,
    /// Ray distance of the primary hit, infinite where nothing was hit
    pub depth: Film,
}

impl Frame {
    fn downsample(&self, factor: u32) -> Frame {
        Frame {
            color: self.color.downsample(factor),
            normals: self.normals.downsample(factor),
            depth: self.depth.downsample(factor),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct PixelSample {
    color: Vec3,
    normal: Vec3,
    depth: f32,
}

/// Maps pixel coordinates onto [-1, 1], y growing upwards
pub fn ndc(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    vec2(
        2.0 * (x as f32 / (width - 1) as f32) - 1.0,
        2.0 * (y as f32 / (height - 1) as f32) - 1.0,
    )
}

fn sample(tracer: &Tracer, camera: &Camera, point: Vec2, bounces: u32) -> PixelSample {
    let ray = camera.generate_ray(point);
    let result = tracer.trace_ray(ray, camera.t_min(), bounces);

    match result.hit {
        Some(hit) => PixelSample {
            color: result.color,
            normal: hit.normal,
            depth: hit.t,
        },
        None => PixelSample {
            color: result.color,
            normal: Vec3::ZERO,
            depth: f32::INFINITY,
        },
    }
}

pub fn render(scene: &Scene, settings: &RenderSettings) -> Frame {
    let factor = if settings.filter { FILTER_FACTOR } else { 1 };
    let width = settings.width * factor;
    let height = settings.height * factor;

    debug!(
        "Rendering {}x{} with {} samples per pixel",
        width,
        height,
        settings.samples_per_pixel()
    );

    let tracer = Tracer::new(scene).with_bounded_shadows(settings.bounded_shadows);
    let camera = scene.camera();
    // Extent of a single pixel in device coordinates
    let pixel = vec2(2.0 / (width - 1) as f32, 2.0 / (height - 1) as f32);

    let mut samples = vec![PixelSample::default(); (width * height) as usize];

    samples
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(row, pixels)| {
            let y = height - 1 - row as u32;
            // Every row owns its generator so results do not depend on scheduling
            let mut rng = DefaultRng::seed_from_u64(settings.seed ^ (u64::from(y) << 32));

            for (x, out) in pixels.iter_mut().enumerate() {
                let point = ndc(x as u32, y, width, height);

                *out = if settings.jitter {
                    let weight = 1.0 / JITTER_SAMPLES as f32;
                    (0..JITTER_SAMPLES).fold(PixelSample::default(), |sum, _| {
                        let offset = vec2(rng.gen::<f32>(), rng.gen::<f32>()) * pixel;
                        let s = sample(&tracer, camera, point + offset, settings.bounces);
                        PixelSample {
                            color: sum.color + s.color * weight,
                            normal: sum.normal + s.normal * weight,
                            depth: sum.depth + s.depth * weight,
                        }
                    })
                } else {
                    sample(&tracer, camera, point, settings.bounces)
                };
            }
        });

    let film = |value: fn(&PixelSample) -> Vec3| {
        Film::new(width, height, samples.iter().map(value).collect())
    };
    let frame = Frame {
        color: film(|s| s.color),
        normals: film(|s| s.normal),
        depth: film(|s| Vec3::splat(s.depth)),
    };

    if settings.filter {
        frame.downsample(factor)
    } else {
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{material::Material, primitives::Sphere, scene::Background};
    use glam::vec3;

    fn settings() -> RenderSettings {
        RenderSettings {
            width: 8,
            height: 6,
            bounces: 2,
            jitter: false,
            filter: false,
            seed: 7,
            bounded_shadows: false,
        }
    }

    fn scene(aspect: f32) -> Scene {
        let camera = Camera::new(vec3(0.0, 0.0, 5.0), -Vec3::Z, Vec3::Y, 60.0, aspect);
        let mut scene = Scene::new(camera)
            .with_ambient(Vec3::ONE)
            .with_background(Background::Constant {
                color: vec3(0.0, 0.0, 1.0),
            });
        let red = scene.add_material(Material::new(vec3(1.0, 0.0, 0.0), Vec3::ZERO, 1.0));
        scene.add_object(Box::new(Sphere::new(Vec3::ZERO, 1.0, red)));
        scene
    }

    #[test]
    fn ndc_covers_unit_square() {
        assert_eq!(ndc(0, 0, 5, 3), vec2(-1.0, -1.0));
        assert_eq!(ndc(4, 2, 5, 3), vec2(1.0, 1.0));
        assert_eq!(ndc(2, 1, 5, 3), vec2(0.0, 0.0));
    }

    #[test]
    fn downsample_averages_blocks() {
        let pixels = (0..36).map(|i| Vec3::splat(i as f32)).collect();
        let film = Film::new(6, 6, pixels).downsample(3);

        assert_eq!(film.width(), 2);
        assert_eq!(film.height(), 2);
        // Top left block holds 0, 1, 2, 6, 7, 8, 12, 13, 14
        assert!(film.get(0, 0).abs_diff_eq(Vec3::splat(7.0), 1e-5));
        assert!(film.get(1, 1).abs_diff_eq(Vec3::splat(28.0), 1e-5));
    }

    #[test]
    fn image_values_are_clamped() {
        let film = Film::new(2, 1, vec![vec3(-1.0, 0.5, 2.0), Vec3::splat(f32::INFINITY)]);
        let image = film.to_image(|v| v);

        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 127, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn renders_object_and_background() {
        let settings = settings();
        let frame = render(&scene(settings.aspect()), &settings);

        assert_eq!(frame.color.width(), 8);
        assert_eq!(frame.color.height(), 6);

        // Corners see the background, the sphere fills the middle
        assert_eq!(frame.color.get(0, 0), vec3(0.0, 0.0, 1.0));
        assert!(frame.depth.get(0, 0).x.is_infinite());
        assert_eq!(frame.normals.get(0, 0), Vec3::ZERO);

        let center = frame.color.get(4, 3);
        assert_eq!(center, vec3(1.0, 0.0, 0.0));
        assert!(frame.depth.get(4, 3).x < 5.0);
    }

    #[test]
    fn filter_keeps_requested_size() {
        let settings = RenderSettings {
            filter: true,
            ..settings()
        };
        let frame = render(&scene(settings.aspect()), &settings);

        assert_eq!(frame.color.width(), 8);
        assert_eq!(frame.color.height(), 6);
        assert_eq!(frame.depth.width(), 8);
    }

    #[test]
    fn jittered_render_is_reproducible() {
        let settings = RenderSettings {
            jitter: true,
            ..settings()
        };
        let scene = scene(settings.aspect());

        let first = render(&scene, &settings);
        let second = render(&scene, &settings);

        assert_eq!(first.color, second.color);
        assert_eq!(first.normals, second.normals);
    }
}
