//! Low-level surface builder.
//!
//! [`SurfaceData`] accumulates positions, normals and triangle indices and
//! turns them into a Bevy [`Mesh`]. Texture coordinates are left to the UV
//! projector.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use bevy::render::render_asset::RenderAssetUsages;

/// Vertex + index accumulator for procedural surfaces.
#[derive(Default)]
pub(crate) struct SurfaceData {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl SurfaceData {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index.
    pub(crate) fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.normalize_or_zero().to_array());
        index
    }

    /// Appends a counter-clockwise (front-facing) triangle.
    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub(crate) fn into_mesh(self) -> Mesh {
        // MAIN_WORLD is kept so picking can read the triangles back.
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
        .with_inserted_indices(Indices::U32(self.indices))
    }
}

/// Borrow the position buffer of a mesh, if it has one in the expected format.
pub fn mesh_positions(mesh: &Mesh) -> Option<&[[f32; 3]]> {
    match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
        VertexAttributeValues::Float32x3(positions) => Some(positions),
        _ => None,
    }
}

/// Computes vertex normals when the mesh has none.
pub fn ensure_normals(mesh: &mut Mesh) {
    if mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some() {
        return;
    }
    if mesh_positions(mesh).map_or(true, |p| p.is_empty()) {
        return;
    }
    mesh.compute_normals();
}
