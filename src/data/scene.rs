//! Scene.

use crate::{data::Mesh, util::bbox::OptionalBoundingBox3d};

/// Scene.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Scene {
    /// Name.
    pub name: Option<String>,
    /// Meshes.
    pub meshes: Vec<Mesh>,
}

impl Scene {
    /// Creates a new empty `Scene`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the scene has nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.meshes.iter().all(|mesh| mesh.indices.is_empty())
    }

    /// Scales all meshes.
    pub fn scale(&mut self, factor: f32) {
        self.meshes.iter_mut().for_each(|mesh| mesh.scale(factor));
    }

    /// Returns bounding box of all meshes.
    pub fn bbox(&self) -> OptionalBoundingBox3d<f32> {
        self.meshes.iter().map(Mesh::bbox).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cgmath::Point3;

    use crate::primitive;

    #[test]
    fn empty_scene() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert!(scene.bbox().bounding_box().is_none());
    }

    #[test]
    fn bbox_covers_all_meshes() {
        let mut scene = primitive::cube(Point3::new(0.0, 0.0, 0.0), 0.5);
        let other = primitive::cube(Point3::new(3.0, 0.0, 0.0), 0.5);
        scene.meshes.extend(other.meshes);
        assert!(!scene.is_empty());

        let bbox = scene.bbox().bounding_box().unwrap();
        assert_eq!(bbox.min(), Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(bbox.max(), Point3::new(3.5, 0.5, 0.5));
    }

    #[test]
    fn scale_applies_to_every_mesh() {
        let mut scene = primitive::cube(Point3::new(0.0, 0.0, 0.0), 1.0);
        scene.scale(0.5);
        let bbox = scene.bbox().bounding_box().unwrap();
        assert_eq!(bbox.max(), Point3::new(0.5, 0.5, 0.5));
    }
}
