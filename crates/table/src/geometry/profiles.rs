//! Round profiles: capped frustums used for the circle top, trunk and footer.

use std::f32::consts::TAU;

use bevy::prelude::*;

use super::mesh_data::SurfaceData;

/// A capped frustum centered on the origin, axis along +Y.
///
/// The seam column is duplicated (`segments + 1` columns) so texture
/// coordinates can wrap without sharing a vertex across the seam.
pub(crate) fn frustum(top_radius: f32, bottom_radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let half = height / 2.0;
    let mut data = SurfaceData::new();

    // Side wall: two rings, normals tilted by the radius slope.
    let slope = if height.abs() > f32::EPSILON {
        (bottom_radius - top_radius) / height
    } else {
        0.0
    };
    let mut rings: [Vec<u32>; 2] = [Vec::new(), Vec::new()];
    for (row, ring) in rings.iter_mut().enumerate() {
        let (radius, y) = if row == 0 {
            (top_radius, half)
        } else {
            (bottom_radius, -half)
        };
        for column in 0..=segments {
            let theta = column as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            ring.push(data.push_vertex(
                Vec3::new(radius * sin, y, radius * cos),
                Vec3::new(sin, slope, cos),
            ));
        }
    }
    for column in 0..segments as usize {
        let a = rings[0][column];
        let b = rings[1][column];
        let c = rings[1][column + 1];
        let d = rings[0][column + 1];
        data.push_triangle(a, b, d);
        data.push_triangle(b, c, d);
    }

    add_cap(&mut data, top_radius, half, segments, true);
    add_cap(&mut data, bottom_radius, -half, segments, false);

    data.into_mesh()
}

fn add_cap(data: &mut SurfaceData, radius: f32, y: f32, segments: u32, top: bool) {
    if radius <= 0.0 {
        return;
    }
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let center = data.push_vertex(Vec3::new(0.0, y, 0.0), normal);
    let first = center + 1;
    for column in 0..=segments {
        let theta = column as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        data.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
    }
    for column in 0..segments {
        let i = first + column;
        if top {
            data.push_triangle(i, i + 1, center);
        } else {
            data.push_triangle(i + 1, i, center);
        }
    }
}
