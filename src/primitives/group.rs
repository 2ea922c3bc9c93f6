use crate::{
    primitives::Intersect,
    ray::{closest, Hit, Ray},
};

/// An ordered collection of objects intersected as one.
#[derive(Default)]
pub struct Group {
    members: Vec<Box<dyn Intersect>>,
}

impl Group {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    pub fn add(&mut self, object: Box<dyn Intersect>) {
        self.members.push(object);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Intersect for Group {
    // Every member is tested, a later one may still be closer
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        self.members.iter().fold(None, |best, member| {
            let bound = best.as_ref().map_or(t_max, |hit: &Hit| hit.t);
            closest(best, member.intersection(ray, t_min, bound))
        })
    }

    fn has_intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> bool {
        self.members
            .iter()
            .any(|member| member.has_intersection(ray, t_min, t_max))
    }
}
