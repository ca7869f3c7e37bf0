//! UV projection for synthesized surfaces.
//!
//! Texture coordinates are derived from vertex positions only, projected
//! onto the horizontal (XZ) plane. The secondary channel (`ATTRIBUTE_UV_1`)
//! is used for ambient-occlusion sampling and always mirrors the primary one.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::config::UV_SPAN_EPSILON;
use crate::geometry::{ensure_normals, mesh_positions};

/// How positions map to texture space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UvMode {
    /// `u` from X, `v` from Z, normalized over the bounding box.
    #[default]
    Planar,
    /// `u` from the angle around Y, `v` from the distance to the Y axis.
    Polar,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UvProjection {
    pub mode: UvMode,
    /// Symmetric margin shrinking the footprint toward the center. 0 = none.
    pub padding: f32,
}

impl UvProjection {
    pub fn planar() -> Self {
        Self::default()
    }

    pub fn polar() -> Self {
        Self {
            mode: UvMode::Polar,
            padding: 0.0,
        }
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }
}

/// Axis-aligned extent of a set of positions over the X and Z axes.
/// Returns `(min, max)` with `x` holding X and `y` holding Z.
pub fn horizontal_bounds(positions: &[[f32; 3]]) -> Option<(Vec2, Vec2)> {
    let first = positions.first()?;
    let start = Vec2::new(first[0], first[2]);
    Some(positions.iter().fold((start, start), |(min, max), p| {
        let xz = Vec2::new(p[0], p[2]);
        (min.min(xz), max.max(xz))
    }))
}

/// Computes one UV per position.
pub fn compute_uvs(positions: &[[f32; 3]], projection: UvProjection) -> Vec<[f32; 2]> {
    let Some((min, max)) = horizontal_bounds(positions) else {
        return Vec::new();
    };
    let padding = projection.padding;

    match projection.mode {
        UvMode::Planar => {
            let span = (max - min).max(Vec2::splat(UV_SPAN_EPSILON));
            positions
                .iter()
                .map(|p| {
                    let u = (p[0] - min.x) / span.x;
                    let v = (p[2] - min.y) / span.y;
                    [
                        u * (1.0 - padding) + padding * 0.5,
                        v * (1.0 - padding) + padding * 0.5,
                    ]
                })
                .collect()
        }
        UvMode::Polar => {
            let max_radius = positions
                .iter()
                .map(|p| Vec2::new(p[0], p[2]).length())
                .fold(0.0_f32, f32::max)
                .max(UV_SPAN_EPSILON);
            positions
                .iter()
                .map(|p| {
                    // Seam at angle = ±π.
                    let u = 0.5 + p[2].atan2(p[0]) / TAU;
                    let v = Vec2::new(p[0], p[2]).length() / max_radius;
                    [
                        (u - 0.5) * (1.0 - padding) + 0.5,
                        v * (1.0 - padding) + padding * 0.5,
                    ]
                })
                .collect()
        }
    }
}

/// Writes `ATTRIBUTE_UV_0` and an identical `ATTRIBUTE_UV_1` into the mesh.
///
/// A mesh without positions is left untouched.
pub fn project_uvs(mesh: &mut Mesh, projection: UvProjection) {
    let Some(positions) = mesh_positions(mesh) else {
        return;
    };
    let uvs = compute_uvs(positions, projection);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_1, uvs.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    ensure_normals(mesh);
}
