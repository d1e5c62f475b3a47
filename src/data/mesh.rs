//! Mesh.

use anyhow::{bail, ensure};
use cgmath::{InnerSpace, Point3, Vector3};
use rgb::RGB;

use crate::util::bbox::OptionalBoundingBox3d;

/// Triangle mesh.
///
/// All per-vertex attribute lists have the same length, and every three
/// consecutive elements of `indices` form a triangle.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Name.
    pub name: Option<String>,
    /// Positions.
    pub positions: Vec<[f32; 3]>,
    /// Normals.
    pub normals: Vec<[f32; 3]>,
    /// UV.
    pub uv: Vec<[f32; 2]>,
    /// Vertex colors.
    pub colors: Vec<RGB<f32>>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks the attribute lengths and the index range.
    pub fn validate(&self) -> anyhow::Result<()> {
        let len = self.positions.len();
        ensure!(
            self.normals.len() == len,
            "Normals length mismatch: positions={}, normals={}",
            len,
            self.normals.len()
        );
        ensure!(
            self.uv.len() == len,
            "UV length mismatch: positions={}, uv={}",
            len,
            self.uv.len()
        );
        ensure!(
            self.colors.len() == len,
            "Colors length mismatch: positions={}, colors={}",
            len,
            self.colors.len()
        );
        ensure!(
            self.indices.len() % 3 == 0,
            "Index count is not a multiple of 3: {}",
            self.indices.len()
        );
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= len) {
            bail!(
                "Index out of range: index={}, vertex_count={}",
                index,
                len
            );
        }
        Ok(())
    }

    /// Replaces the normals with face normals of the triangles.
    ///
    /// Vertices shared by several triangles get the normal of the last one.
    /// Vertices not referenced by any triangle get a zero vector.
    pub fn compute_flat_normals(&mut self) {
        let mut normals = vec![[0.0; 3]; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [p0, p1, p2] = [tri[0], tri[1], tri[2]]
                .map(|i| Point3::from(self.positions[i as usize]));
            let n: Vector3<f32> = (p1 - p0).cross(p2 - p0);
            let n = if n.magnitude2() > 0.0 {
                n.normalize()
            } else {
                Vector3::new(0.0, 0.0, 0.0)
            };
            for &i in tri {
                normals[i as usize] = n.into();
            }
        }
        self.normals = normals;
    }

    /// Scales the positions.
    pub fn scale(&mut self, factor: f32) {
        for p in &mut self.positions {
            for v in p.iter_mut() {
                *v *= factor;
            }
        }
    }

    /// Returns the bounding box of the positions.
    pub fn bbox(&self) -> OptionalBoundingBox3d<f32> {
        self.positions.iter().copied().map(Point3::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh {
            name: Some("tri".to_owned()),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0; 3]; 3],
            uv: vec![[0.0; 2]; 3],
            colors: vec![RGB::new(1.0, 1.0, 1.0); 3],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn counts() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        mesh.validate().unwrap();
    }

    #[test]
    fn validate_rejects_attribute_mismatch() {
        let mut mesh = triangle();
        mesh.uv.pop();
        assert!(mesh.validate().is_err());

        let mut mesh = triangle();
        mesh.colors.push(RGB::new(0.0, 0.0, 0.0));
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_indices() {
        let mut mesh = triangle();
        mesh.indices = vec![0, 1, 3];
        assert!(mesh.validate().is_err());

        let mut mesh = triangle();
        mesh.indices = vec![0, 1];
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn flat_normals_of_xy_triangle() {
        let mut mesh = triangle();
        mesh.compute_flat_normals();
        for n in &mesh.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn flat_normals_of_degenerate_triangle() {
        let mut mesh = triangle();
        mesh.positions[2] = [2.0, 0.0, 0.0];
        mesh.compute_flat_normals();
        assert_eq!(mesh.normals[0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn scale_and_bbox() {
        let mut mesh = triangle();
        mesh.scale(0.5);
        let bbox = mesh.bbox().bounding_box().unwrap();
        assert_eq!(bbox.min(), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bbox.max(), Point3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn empty_mesh_has_no_bbox() {
        assert!(Mesh::default().bbox().bounding_box().is_none());
        Mesh::default().validate().unwrap();
    }
}
