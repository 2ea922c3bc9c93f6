//! Serde model of the TOML scene files and its conversion into a `Scene`.

use crate::{
    camera::Camera,
    light::{DirectionalLight, Light, PointLight},
    material::Material,
    primitives::{Group, Intersect, Plane, Sphere, Transform, Triangle},
    scene::{Background, Scene},
};
use anyhow::{anyhow, bail, Context, Result};
use glam::{Mat4, Vec3};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    #[serde(default)]
    pub ambient: Vec3,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub lights: Vec<LightDescription>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraDescription {
    pub center: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightDescription {
    Directional {
        direction: Vec3,
        color: Vec3,
    },
    Point {
        position: Vec3,
        color: Vec3,
        #[serde(default)]
        falloff: f32,
    },
}

/// Objects refer to materials by their index in the material table
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        center: Vec3,
        radius: f32,
        material: usize,
    },
    Plane {
        normal: Vec3,
        offset: f32,
        material: usize,
    },
    Triangle {
        vertices: [Vec3; 3],
        normals: Option<[Vec3; 3]>,
        material: usize,
    },
    Group {
        objects: Vec<ObjectDescription>,
    },
    Transform {
        transforms: Vec<TransformOp>,
        object: Box<ObjectDescription>,
    },
}

/// A single step of a transform. Angles are in degrees, matrices row major.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformOp {
    Translate(Vec3),
    Scale(Vec3),
    UniformScale(f32),
    XRotate(f32),
    YRotate(f32),
    ZRotate(f32),
    Rotate { axis: Vec3, angle: f32 },
    Matrix([f32; 16]),
}

impl TransformOp {
    pub fn matrix(&self) -> Mat4 {
        match self {
            TransformOp::Translate(offset) => Mat4::from_translation(*offset),
            TransformOp::Scale(scale) => Mat4::from_scale(*scale),
            TransformOp::UniformScale(scale) => Mat4::from_scale(Vec3::splat(*scale)),
            TransformOp::XRotate(angle) => Mat4::from_rotation_x(angle.to_radians()),
            TransformOp::YRotate(angle) => Mat4::from_rotation_y(angle.to_radians()),
            TransformOp::ZRotate(angle) => Mat4::from_rotation_z(angle.to_radians()),
            TransformOp::Rotate { axis, angle } => {
                Mat4::from_axis_angle(axis.normalize(), angle.to_radians())
            }
            TransformOp::Matrix(rows) => Mat4::from_cols_array(rows).transpose(),
        }
    }
}

/// The first operation listed is the outermost one
pub fn compose(transforms: &[TransformOp]) -> Mat4 {
    transforms
        .iter()
        .fold(Mat4::IDENTITY, |matrix, op| matrix * op.matrix())
}

impl SceneDescription {
    pub fn build(self, aspect: f32) -> Result<Scene> {
        let camera = self.camera.build(aspect).context("Invalid camera")?;
        let mut scene = Scene::new(camera)
            .with_ambient(self.ambient)
            .with_background(self.background);

        let materials = self
            .materials
            .into_iter()
            .map(|material| scene.add_material(material))
            .collect::<Vec<_>>();

        for (index, light) in self.lights.into_iter().enumerate() {
            let light = light
                .build()
                .with_context(|| format!("Invalid light #{}", index))?;
            scene.add_light(light);
        }

        for (index, object) in self.objects.into_iter().enumerate() {
            let object = object
                .build(&materials)
                .with_context(|| format!("Invalid object #{}", index))?;
            scene.add_object(object);
        }

        Ok(scene)
    }
}

/// Normalizes `vector`, zero or non-finite vectors have no direction
fn unit(vector: Vec3, name: &str) -> Result<Vec3> {
    vector
        .try_normalize()
        .ok_or_else(|| anyhow!("{} {} has no direction", name, vector))
}

impl CameraDescription {
    pub fn build(&self, aspect: f32) -> Result<Camera> {
        let direction = unit(self.direction, "Camera direction")?;
        if direction.cross(self.up).try_normalize().is_none() {
            bail!("Camera up {} is zero or parallel to the direction", self.up);
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            bail!("Field of view must be between 0 and 180 degrees, got {}", self.fov);
        }

        Ok(Camera::new(self.center, direction, self.up, self.fov, aspect))
    }
}

impl LightDescription {
    pub fn build(self) -> Result<Box<dyn Light>> {
        let light: Box<dyn Light> = match self {
            LightDescription::Directional { direction, color } => {
                let direction = unit(direction, "Light direction")?;
                Box::new(DirectionalLight::new(direction, color))
            }
            LightDescription::Point {
                position,
                color,
                falloff,
            } => Box::new(PointLight::new(position, color, falloff)),
        };

        Ok(light)
    }
}

fn lookup(materials: &[Arc<Material>], index: usize) -> Result<Arc<Material>> {
    materials.get(index).cloned().ok_or_else(|| {
        anyhow!(
            "Material index {} is out of range, {} materials are defined",
            index,
            materials.len()
        )
    })
}

impl ObjectDescription {
    pub fn build(self, materials: &[Arc<Material>]) -> Result<Box<dyn Intersect>> {
        let object: Box<dyn Intersect> = match self {
            ObjectDescription::Sphere {
                center,
                radius,
                material,
            } => Box::new(Sphere::new(center, radius, lookup(materials, material)?)),
            ObjectDescription::Plane {
                normal,
                offset,
                material,
            } => Box::new(Plane::new(
                unit(normal, "Plane normal")?,
                offset,
                lookup(materials, material)?,
            )),
            ObjectDescription::Triangle {
                vertices,
                normals: Some(normals),
                material,
            } => Box::new(Triangle::new(
                vertices,
                normals,
                lookup(materials, material)?,
            )),
            ObjectDescription::Triangle {
                vertices,
                normals: None,
                material,
            } => Box::new(Triangle::flat(vertices, lookup(materials, material)?)),
            ObjectDescription::Group { objects } => {
                let mut group = Group::new();
                for (index, object) in objects.into_iter().enumerate() {
                    let object = object
                        .build(materials)
                        .with_context(|| format!("Invalid group member #{}", index))?;
                    group.add(object);
                }
                Box::new(group)
            }
            ObjectDescription::Transform { transforms, object } => {
                let child = object.build(materials)?;
                Box::new(Transform::new(compose(&transforms), child)?)
            }
        };

        Ok(object)
    }
}
