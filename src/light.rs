use glam::Vec3;

/// What a light contributes to a point in the scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Illumination {
    /// Unit vector from the point towards the light
    pub direction: Vec3,
    pub intensity: Vec3,
    /// Distance to the light, infinite for lights without a position
    pub distance: f32,
}

pub trait Light: Send + Sync + std::fmt::Debug {
    fn illumination(&self, point: Vec3) -> Illumination;
}

/// A light infinitely far away, shining along `direction`
#[derive(Clone, Debug)]
pub struct DirectionalLight {
    direction: Vec3,
    color: Vec3,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, color: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
            color,
        }
    }
}

impl Light for DirectionalLight {
    fn illumination(&self, _point: Vec3) -> Illumination {
        Illumination {
            direction: -self.direction,
            intensity: self.color,
            distance: f32::INFINITY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PointLight {
    position: Vec3,
    color: Vec3,
    falloff: f32,
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3, falloff: f32) -> Self {
        Self {
            position,
            color,
            falloff,
        }
    }
}

impl Light for PointLight {
    fn illumination(&self, point: Vec3) -> Illumination {
        let to_light = self.position - point;
        let distance = to_light.length();

        Illumination {
            direction: to_light / distance,
            intensity: self.color / (1.0 + self.falloff * distance * distance),
            distance,
        }
    }
}
