//! Triangulator.

use anyhow::{anyhow, bail};
use cgmath::{Point3, Vector2};
use fbxcel_dom::v7400::data::mesh::{PolygonVertexIndex, PolygonVertices};

use crate::util::bbox::OptionalBoundingBox3d;

/// Triangulates a polygon of the FBX mesh.
///
/// This is passed to `PolygonVertices::triangulate_each`.
pub fn triangulator(
    pvs: &PolygonVertices<'_>,
    poly_pvis: &[PolygonVertexIndex],
    results: &mut Vec<[PolygonVertexIndex; 3]>,
) -> anyhow::Result<()> {
    let points = poly_pvis
        .iter()
        .map(|&pvi| {
            pvs.control_point(pvi)
                .map(Point3::from)
                .ok_or_else(|| anyhow!("Index out of range: {:?}", pvi))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let triangles = triangulate(&points)?;
    results.extend(
        triangles
            .iter()
            .map(|&[a, b, c]| [poly_pvis[a], poly_pvis[b], poly_pvis[c]]),
    );

    Ok(())
}

/// Splits a polygon into triangles.
///
/// Returns triangles as indices into `points`, with the winding of the
/// polygon kept.
/// Polygons with two or more concave corners are rejected.
pub fn triangulate(points: &[Point3<f64>]) -> anyhow::Result<Vec<[usize; 3]>> {
    let n = points.len();
    match n {
        0..=2 => {
            // A point, a line, or nothing.
            bail!("Not enough vertices in the polygon: length={}", n);
        }
        3 => Ok(vec![[0, 1, 2]]),
        4 => {
            let [p0, p1, p2, p3] = [points[0], points[1], points[2], points[3]];
            // n1 and n3 are the normals at the corners 1 and 3.
            // They point the same way if the corners are both convex, or
            // opposite ways if one of them is concave.
            // For non-planar quads either diagonal is equally inaccurate.
            let n1 = (p0 - p1).cross(p1 - p2);
            let n3 = (p2 - p3).cross(p3 - p0);
            if cgmath::dot(n1, n3) >= 0.0 {
                // Cut from p0 to p2.
                Ok(vec![[0, 1, 2], [2, 3, 0]])
            } else {
                // Cut from p1 to p3.
                Ok(vec![[0, 1, 3], [3, 1, 2]])
            }
        }
        n => {
            let points_2d = project_to_plane(points);
            // `true` if the corner turns counter-clockwise.
            let turns = (0..n)
                .map(|i| {
                    let prev = points_2d[(i + n - 1) % n];
                    let cur = points_2d[i];
                    let next = points_2d[(i + 1) % n];
                    (prev - cur).perp_dot(cur - next) > 0.0
                })
                .collect::<Vec<_>>();

            let ccw_count = turns.iter().filter(|&&v| v).count();
            if ccw_count > 1 && ccw_count < n - 1 {
                bail!(
                    "Unsupported polygon: {}-gon with two or more concave angles",
                    n
                );
            }
            // The odd corner out (if any) is the concave one. Fanning from it
            // keeps every triangle inside the polygon.
            let minor = ccw_count <= 1;
            let apex = turns.iter().position(|&v| v == minor).unwrap_or(0);
            Ok((1..n - 1)
                .map(|k| [apex, (apex + k) % n, (apex + k + 1) % n])
                .collect())
        }
    }
}

/// Drops the axis along which the polygon is thinnest.
fn project_to_plane(points: &[Point3<f64>]) -> Vec<Vector2<f64>> {
    let bbox = points
        .iter()
        .copied()
        .collect::<OptionalBoundingBox3d<f64>>()
        .bounding_box();
    let width = match bbox {
        Some(bbox) => bbox.max() - bbox.min(),
        None => return Vec::new(),
    };
    points
        .iter()
        .map(|p| {
            if width.x < width.y && width.x <= width.z {
                Vector2::new(p.y, p.z)
            } else if width.y <= width.z {
                Vector2::new(p.x, p.z)
            } else {
                Vector2::new(p.x, p.y)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Creates points on the XY plane.
    fn xy(coords: &[(f64, f64)]) -> Vec<Point3<f64>> {
        coords
            .iter()
            .map(|&(x, y)| Point3::new(x, y, 0.0))
            .collect()
    }

    #[test]
    fn degenerate() {
        assert!(triangulate(&[]).is_err());
        assert!(triangulate(&xy(&[(0.0, 0.0), (1.0, 0.0)])).is_err());
    }

    #[test]
    fn triangle_passthrough() {
        let tris = triangulate(&xy(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)])).unwrap();
        assert_eq!(tris, vec![[0, 1, 2]]);
    }

    #[test]
    fn convex_quad() {
        let square = xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert_eq!(triangulate(&square).unwrap(), vec![[0, 1, 2], [2, 3, 0]]);
    }

    #[test]
    fn concave_quad_cuts_through_concave_corner() {
        // Corner 1 is concave, so the cut must go from 1 to 3.
        let dart = xy(&[(0.0, 0.0), (1.0, 2.0), (2.0, 0.0), (1.0, 4.0)]);
        assert_eq!(triangulate(&dart).unwrap(), vec![[0, 1, 3], [3, 1, 2]]);
    }

    #[test]
    fn convex_pentagon_fans_from_first_vertex() {
        let pentagon = xy(&[(0.0, 0.0), (2.0, 0.0), (3.0, 1.0), (1.0, 2.0), (-1.0, 1.0)]);
        assert_eq!(
            triangulate(&pentagon).unwrap(),
            vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]
        );
    }

    #[test]
    fn pentagon_with_one_concave_corner_fans_from_it() {
        // Corner 2 is pushed inward.
        let pentagon = xy(&[(0.0, 0.0), (4.0, 0.0), (2.0, 1.0), (4.0, 4.0), (0.0, 4.0)]);
        assert_eq!(
            triangulate(&pentagon).unwrap(),
            vec![[2, 3, 4], [2, 4, 0], [2, 0, 1]]
        );
    }

    #[test]
    fn polygon_not_on_xy_plane() {
        // Pentagon on the YZ plane.
        let pentagon: Vec<_> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.5, 1.5), (0.0, 1.0)]
            .iter()
            .map(|&(y, z)| Point3::new(5.0, y, z))
            .collect();
        assert_eq!(triangulate(&pentagon).unwrap().len(), 3);
    }

    #[test]
    fn two_concave_corners_are_rejected() {
        // A hexagon with two notches.
        let notched = xy(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (2.0, 1.0),
            (4.0, 4.0),
            (0.0, 4.0),
            (2.0, 3.0),
        ]);
        assert!(triangulate(&notched).is_err());
    }
}
