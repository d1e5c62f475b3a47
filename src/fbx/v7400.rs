//! FBX v7400 support.

use std::convert::TryFrom;

use anyhow::{anyhow, Context};
use fbxcel_dom::v7400::{
    data::mesh::{layer::TypedLayerElementHandle, TriangleVertices},
    object::{geometry, model::TypedModelHandle, TypedObjectHandle},
    Document,
};
use log::{debug, trace, warn};
use rgb::RGB;

use crate::data::{Mesh, Scene};

use self::triangulator::triangulator;

mod triangulator;

/// Vertex color of imported meshes.
const VERTEX_COLOR: RGB<f32> = RGB {
    r: 1.0,
    g: 1.0,
    b: 1.0,
};

/// Loads the meshes from the document.
///
/// Meshes which cannot be loaded are skipped with a warning.
pub fn from_doc(doc: &Document) -> anyhow::Result<Scene> {
    let mut scene = Scene::new();

    for obj in doc.objects() {
        let mesh_obj = match obj.get_typed() {
            TypedObjectHandle::Model(TypedModelHandle::Mesh(mesh)) => mesh,
            _ => continue,
        };
        let name = mesh_obj.name().map(ToOwned::to_owned);
        debug!("Loading mesh: name={:?}", name);

        let mesh = mesh_obj
            .geometry()
            .context("Failed to get geometry")
            .and_then(|geometry_obj| load_geometry(&geometry_obj));
        match mesh {
            Ok(mut mesh) => {
                mesh.name = name;
                debug!(
                    "Successfully loaded mesh: name={:?}, vertices={}, triangles={}",
                    mesh.name,
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
                scene.meshes.push(mesh);
            }
            Err(e) => warn!("Skipping mesh: name={:?}: {:#}", name, e),
        }
    }

    Ok(scene)
}

/// Loads the geometry as a triangle mesh.
fn load_geometry(geometry_obj: &geometry::MeshHandle<'_>) -> anyhow::Result<Mesh> {
    let polygon_vertices = geometry_obj
        .polygon_vertices()
        .context("Failed to get polygon vertices")?;
    let tris = polygon_vertices
        .triangulate_each(triangulator)
        .context("Triangulation failed")?;

    let positions = tris
        .triangle_vertex_indices()
        .map(|tri_vi| {
            tris.control_point(tri_vi)
                .map(|p| [p.x as f32, p.y as f32, p.z as f32])
                .ok_or_else(|| anyhow!("Failed to get control point: tri_vi={:?}", tri_vi))
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .context("Failed to reconstruct position vertices")?;
    for (i, p) in positions.iter().enumerate() {
        trace!("Vertex {}: {:?}", i, p);
    }

    let normals = load_normals(geometry_obj, &tris).context("Failed to load normals")?;
    let uv = load_uv(geometry_obj, &tris).context("Failed to load UV")?;

    let vertex_count = u32::try_from(positions.len())
        .map_err(|_| anyhow!("Too many vertices: {}", positions.len()))?;
    let mut mesh = Mesh {
        name: None,
        colors: vec![VERTEX_COLOR; positions.len()],
        uv: uv.unwrap_or_else(|| vec![[0.0; 2]; positions.len()]),
        normals: Vec::new(),
        positions,
        indices: (0..vertex_count).collect(),
    };
    match normals {
        Some(normals) => mesh.normals = normals,
        None => {
            debug!("No normals found, computing face normals");
            mesh.compute_flat_normals();
        }
    }
    for (i, tri) in mesh.indices.chunks_exact(3).enumerate() {
        trace!("Triangle {}: {:?}", i, tri);
    }
    mesh.validate()?;

    Ok(mesh)
}

/// Loads normals from the first normal layer element, if any.
fn load_normals(
    geometry_obj: &geometry::MeshHandle<'_>,
    tris: &TriangleVertices<'_>,
) -> anyhow::Result<Option<Vec<[f32; 3]>>> {
    let handle = geometry_obj.layers().find_map(|layer| {
        layer
            .layer_element_entries()
            .find_map(|entry| match entry.typed_layer_element() {
                Ok(TypedLayerElementHandle::Normal(handle)) => Some(handle),
                _ => None,
            })
    });
    let normals = match handle {
        Some(handle) => handle.normals()?,
        None => return Ok(None),
    };

    tris.triangle_vertex_indices()
        .map(|tri_vi| {
            normals
                .normal(tris, tri_vi)
                .map(|n| [n.x as f32, n.y as f32, n.z as f32])
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .map(Some)
}

/// Loads texture coordinates from the first UV layer element, if any.
///
/// V is flipped, because FBX puts the origin at the bottom left of the image.
fn load_uv(
    geometry_obj: &geometry::MeshHandle<'_>,
    tris: &TriangleVertices<'_>,
) -> anyhow::Result<Option<Vec<[f32; 2]>>> {
    let handle = geometry_obj.layers().find_map(|layer| {
        layer
            .layer_element_entries()
            .find_map(|entry| match entry.typed_layer_element() {
                Ok(TypedLayerElementHandle::Uv(handle)) => Some(handle),
                _ => None,
            })
    });
    let uv = match handle {
        Some(handle) => handle.uv()?,
        None => return Ok(None),
    };

    tris.triangle_vertex_indices()
        .map(|tri_vi| {
            uv.uv(tris, tri_vi)
                .map(|uv| [uv.x as f32, 1.0 - uv.y as f32])
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .map(Some)
}
