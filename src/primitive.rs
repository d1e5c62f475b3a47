//! Built-in primitive scenes.
//!
//! These are shown when no FBX file is given.

use cgmath::{Point3, Vector3};
use clap::ValueEnum;
use rgb::RGB;

use crate::data::{Mesh, Scene};

/// Red.
const RED: RGB<f32> = RGB { r: 1.0, g: 0.0, b: 0.0 };
/// Green.
const GREEN: RGB<f32> = RGB { r: 0.0, g: 1.0, b: 0.0 };
/// Blue.
const BLUE: RGB<f32> = RGB { r: 0.0, g: 0.0, b: 1.0 };
/// Black.
const BLACK: RGB<f32> = RGB { r: 0.0, g: 0.0, b: 0.0 };
/// White.
const WHITE: RGB<f32> = RGB { r: 1.0, g: 1.0, b: 1.0 };
/// Magenta.
const MAGENTA: RGB<f32> = RGB { r: 1.0, g: 0.0, b: 1.0 };

/// Built-in primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Primitive {
    /// A single red triangle.
    Triangle,
    /// A cube with one color per face.
    Cube,
}

impl Primitive {
    /// Builds the scene of the primitive, centered at the origin.
    pub fn scene(self) -> Scene {
        let origin = Point3::new(0.0, 0.0, 0.0);
        match self {
            Primitive::Triangle => triangle(RED, origin, 0.5),
            Primitive::Cube => cube(origin, 0.5),
        }
    }
}

/// Creates an isosceles triangle facing +Z.
///
/// The apex is `size` above `center`, and the base corners are `size` below
/// and `size` to the left and right.
pub fn triangle(color: RGB<f32>, center: Point3<f32>, size: f32) -> Scene {
    let Point3 { x, y, z } = center;
    let mesh = Mesh {
        name: Some("triangle".to_owned()),
        positions: vec![
            [x, y + size, z],
            [x - size, y - size, z],
            [x + size, y - size, z],
        ],
        normals: vec![[0.0, 0.0, 1.0]; 3],
        uv: vec![[0.5, 0.0], [0.0, 1.0], [1.0, 1.0]],
        colors: vec![color; 3],
        indices: vec![0, 1, 2],
    };

    Scene {
        name: Some("triangle".to_owned()),
        meshes: vec![mesh],
    }
}

/// Creates an axis-aligned cube.
///
/// Faces are colored front (-Z) blue, right (+X) red, top (+Y) green,
/// left (-X) black, bottom (-Y) white, and back (+Z) magenta.
pub fn cube(center: Point3<f32>, half_extent: f32) -> Scene {
    // (normal, u, v, color), where `u.cross(v) == normal` so that the
    // triangles are counter-clockwise seen from outside.
    let faces = [
        (-Vector3::unit_z(), -Vector3::unit_x(), Vector3::unit_y(), BLUE),
        (Vector3::unit_x(), -Vector3::unit_z(), Vector3::unit_y(), RED),
        (Vector3::unit_y(), Vector3::unit_x(), -Vector3::unit_z(), GREEN),
        (-Vector3::unit_x(), Vector3::unit_z(), Vector3::unit_y(), BLACK),
        (-Vector3::unit_y(), Vector3::unit_x(), Vector3::unit_z(), WHITE),
        (Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_y(), MAGENTA),
    ];

    let mut mesh = Mesh {
        name: Some("cube".to_owned()),
        ..Default::default()
    };
    for &(normal, u, v, color) in &faces {
        let base = mesh.positions.len() as u32;
        let corners = [
            (-u - v, [0.0, 1.0]),
            (u - v, [1.0, 1.0]),
            (u + v, [1.0, 0.0]),
            (v - u, [0.0, 0.0]),
        ];
        for &(offset, uv) in &corners {
            let p: Point3<f32> = center + (normal + offset) * half_extent;
            mesh.positions.push(p.into());
            mesh.normals.push(normal.into());
            mesh.uv.push(uv);
            mesh.colors.push(color);
        }
        mesh.indices.extend([0, 1, 2, 2, 3, 0].iter().map(|i| base + i));
    }

    Scene {
        name: Some("cube".to_owned()),
        meshes: vec![mesh],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use cgmath::InnerSpace;

    #[test]
    fn triangle_layout() {
        let scene = triangle(RED, Point3::new(0.0, 0.0, 0.0), 0.5);
        let mesh = &scene.meshes[0];
        mesh.validate().unwrap();
        assert_eq!(
            mesh.positions,
            vec![[0.0, 0.5, 0.0], [-0.5, -0.5, 0.0], [0.5, -0.5, 0.0]]
        );
        assert!(mesh.colors.iter().all(|&c| c == RED));
    }

    #[test]
    fn triangle_winding_matches_normal() {
        let mut mesh = triangle(RED, Point3::new(1.0, 2.0, 3.0), 2.0).meshes[0].clone();
        let declared = mesh.normals.clone();
        mesh.compute_flat_normals();
        assert_eq!(mesh.normals, declared);
    }

    #[test]
    fn cube_counts() {
        let scene = cube(Point3::new(0.0, 0.0, 0.0), 0.3);
        assert_eq!(scene.meshes.len(), 1);
        let mesh = &scene.meshes[0];
        mesh.validate().unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn cube_normals_point_outward() {
        let center = Point3::new(1.0, -1.0, 0.5);
        let mesh = cube(center, 0.25).meshes[0].clone();
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let n = Vector3::from(*n);
            assert_relative_eq!(n.magnitude(), 1.0);
            let outward = Point3::from(*p) - center;
            assert!(outward.dot(n) > 0.0);
        }
    }

    #[test]
    fn cube_winding_matches_normals() {
        let mut mesh = cube(Point3::new(0.0, 0.0, 0.0), 1.0).meshes[0].clone();
        let declared = mesh.normals.clone();
        mesh.compute_flat_normals();
        assert_eq!(mesh.normals, declared);
    }

    #[test]
    fn cube_face_colors() {
        let mesh = cube(Point3::new(0.0, 0.0, 0.0), 1.0).meshes[0].clone();
        let color_of_face = |normal: [f32; 3]| {
            let i = mesh
                .normals
                .iter()
                .position(|&n| n == normal)
                .expect("face exists");
            mesh.colors[i]
        };
        assert_eq!(color_of_face([0.0, 0.0, -1.0]), BLUE);
        assert_eq!(color_of_face([1.0, 0.0, 0.0]), RED);
        assert_eq!(color_of_face([0.0, 1.0, 0.0]), GREEN);
        assert_eq!(color_of_face([-1.0, 0.0, 0.0]), BLACK);
        assert_eq!(color_of_face([0.0, -1.0, 0.0]), WHITE);
        assert_eq!(color_of_face([0.0, 0.0, 1.0]), MAGENTA);
    }

    #[test]
    fn cube_extent() {
        let scene = Primitive::Cube.scene();
        let bbox = scene.bbox().bounding_box().unwrap();
        assert_eq!(bbox.min(), Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(bbox.max(), Point3::new(0.5, 0.5, 0.5));
    }
}
