//! Closed-outline extrusion for the ellipse and rectangle tops.

use std::f32::consts::{FRAC_PI_2, TAU};

use bevy::prelude::*;

use super::mesh_data::SurfaceData;

/// How side-wall normals are shared between neighbouring edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SideShading {
    /// One normal per edge; corners stay crisp.
    Flat,
    /// Normals averaged across a vertex; curved outlines look round.
    Smooth,
}

/// Counter-clockwise ellipse outline in the XY plane.
pub(crate) fn ellipse_outline(radius_x: f32, radius_y: f32, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let theta = i as f32 / segments as f32 * TAU;
            Vec2::new(radius_x * theta.cos(), radius_y * theta.sin())
        })
        .collect()
}

/// Counter-clockwise square outline of the given side, centered on the origin.
pub(crate) fn square_outline(side: f32) -> Vec<Vec2> {
    let h = side / 2.0;
    vec![
        Vec2::new(-h, -h),
        Vec2::new(h, -h),
        Vec2::new(h, h),
        Vec2::new(-h, h),
    ]
}

/// Extrudes a convex, counter-clockwise outline from z = 0 to z = `depth`.
///
/// Caps are fanned from the outline centroid, so the outline must be convex.
pub(crate) fn extrude_outline(outline: &[Vec2], depth: f32, shading: SideShading) -> Mesh {
    let mut data = SurfaceData::new();
    let n = outline.len();
    if n < 3 {
        return data.into_mesh();
    }

    let edge_normal = |i: usize| {
        let d = outline[(i + 1) % n] - outline[i];
        Vec2::new(d.y, -d.x).normalize_or_zero()
    };

    match shading {
        SideShading::Flat => {
            for i in 0..n {
                let p0 = outline[i];
                let p1 = outline[(i + 1) % n];
                let normal = edge_normal(i).extend(0.0);
                let a = data.push_vertex(p0.extend(0.0), normal);
                let b = data.push_vertex(p1.extend(0.0), normal);
                let c = data.push_vertex(p1.extend(depth), normal);
                let d = data.push_vertex(p0.extend(depth), normal);
                data.push_triangle(a, b, c);
                data.push_triangle(a, c, d);
            }
        }
        SideShading::Smooth => {
            let mut bottom = Vec::with_capacity(n);
            let mut top = Vec::with_capacity(n);
            for i in 0..n {
                let normal = (edge_normal((i + n - 1) % n) + edge_normal(i)).extend(0.0);
                bottom.push(data.push_vertex(outline[i].extend(0.0), normal));
                top.push(data.push_vertex(outline[i].extend(depth), normal));
            }
            for i in 0..n {
                let j = (i + 1) % n;
                data.push_triangle(bottom[i], bottom[j], top[j]);
                data.push_triangle(bottom[i], top[j], top[i]);
            }
        }
    }

    let centroid = outline.iter().copied().sum::<Vec2>() / n as f32;
    for (z, normal) in [(depth, Vec3::Z), (0.0, Vec3::NEG_Z)] {
        let center = data.push_vertex(centroid.extend(z), normal);
        let ring: Vec<u32> = outline
            .iter()
            .map(|p| data.push_vertex(p.extend(z), normal))
            .collect();
        for i in 0..n {
            let j = (i + 1) % n;
            if normal.z > 0.0 {
                data.push_triangle(center, ring[i], ring[j]);
            } else {
                data.push_triangle(center, ring[j], ring[i]);
            }
        }
    }

    data.into_mesh()
}

/// Moves an extrusion's depth axis onto +Y and centers it on y = 0:
/// translate by `-depth / 2` along Z, then rotate -90° about X.
pub(crate) fn center_extrusion(mesh: Mesh, depth: f32) -> Mesh {
    mesh.translated_by(Vec3::new(0.0, 0.0, -depth / 2.0))
        .rotated_by(Quat::from_rotation_x(-FRAC_PI_2))
}
