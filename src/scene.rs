use crate::{
    camera::Camera,
    description::SceneDescription,
    light::Light,
    material::Material,
    primitives::{Group, Intersect},
};
use anyhow::{Context, Result};
use glam::Vec3;
use serde::Deserialize;
use std::{path::Path, sync::Arc};

/// Color seen by rays that leave the scene
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    Constant { color: Vec3 },
    /// Blends from `bottom` to `top` with the height of the ray direction
    Gradient { bottom: Vec3, top: Vec3 },
}

impl Default for Background {
    fn default() -> Self {
        Background::Constant { color: Vec3::ZERO }
    }
}

impl Background {
    pub fn color(&self, direction: Vec3) -> Vec3 {
        match self {
            Background::Constant { color } => *color,
            Background::Gradient { bottom, top } => {
                let dir = direction.normalize();
                let t = 0.5 * (dir.y + 1.0);
                (1.0 - t) * *bottom + t * *top
            }
        }
    }
}

pub struct Scene {
    camera: Camera,
    group: Group,
    lights: Vec<Box<dyn Light>>,
    materials: Vec<Arc<Material>>,
    ambient: Vec3,
    background: Background,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            group: Group::new(),
            lights: Vec::new(),
            materials: Vec::new(),
            ambient: Vec3::ZERO,
            background: Background::default(),
        }
    }

    /// Loads a TOML scene description. `aspect` is the width over height of the image.
    pub fn from_file(path: &Path, aspect: f32) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file: {:?}", path))?;
        let description: SceneDescription = toml::from_str(&source)
            .with_context(|| format!("Failed to parse scene file: {:?}", path))?;

        description
            .build(aspect)
            .with_context(|| format!("Invalid scene: {:?}", path))
    }

    pub fn with_ambient(mut self, ambient: Vec3) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn add_object(&mut self, object: Box<dyn Intersect>) {
        self.group.add(object);
    }

    pub fn add_light(&mut self, light: Box<dyn Light>) {
        self.lights.push(light);
    }

    /// Registers a material and hands back the shared handle primitives should hold
    pub fn add_material(&mut self, material: Material) -> Arc<Material> {
        let material = Arc::new(material);
        self.materials.push(material.clone());
        material
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn ambient_light(&self) -> Vec3 {
        self.ambient
    }

    pub fn background_color(&self, direction: Vec3) -> Vec3 {
        self.background.color(direction)
    }

    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    pub fn materials(&self) -> &[Arc<Material>] {
        &self.materials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    #[test]
    fn gradient_blends_by_height() {
        let background = Background::Gradient {
            bottom: Vec3::ONE,
            top: vec3(0.5, 0.7, 1.0),
        };

        assert!(background.color(Vec3::Y).abs_diff_eq(vec3(0.5, 0.7, 1.0), 1e-6));
        assert!(background.color(-Vec3::Y).abs_diff_eq(Vec3::ONE, 1e-6));
        assert!(background
            .color(vec3(3.0, 0.0, 0.0))
            .abs_diff_eq(vec3(0.75, 0.85, 1.0), 1e-6));
    }

    #[test]
    fn constant_background_ignores_direction() {
        let background = Background::Constant {
            color: vec3(0.1, 0.2, 0.3),
        };

        assert_eq!(background.color(Vec3::X), vec3(0.1, 0.2, 0.3));
        assert_eq!(background.color(-Vec3::Z), vec3(0.1, 0.2, 0.3));
    }

    #[test]
    fn materials_are_shared_not_copied() {
        let camera = Camera::new(Vec3::ZERO, -Vec3::Z, Vec3::Y, 60.0, 1.0);
        let mut scene = Scene::new(camera);

        let handle = scene.add_material(Material::new(Vec3::ONE, Vec3::ZERO, 1.0));
        assert_eq!(scene.materials().len(), 1);
        assert!(Arc::ptr_eq(&handle, &scene.materials()[0]));
    }
}
