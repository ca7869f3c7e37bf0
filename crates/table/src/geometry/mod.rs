//! Geometry synthesis for the table parts.
//!
//! Each part is built procedurally from [`TableParams`]:
//!
//! - **circle top**: capped frustum, top radius `r`, bottom radius `r - bevel`
//! - **ellipse top**: ellipse outline `(1.6r, 1.0r)` extruded and re-oriented
//! - **rectangle top**: square outline of side `2r` extruded and re-oriented
//! - **trunk**: frustum from `base_top_width` down to `base_bottom_width`
//! - **footer**: thin frustum tapering by `bevel` at its bottom edge
//!
//! Every surface leaves here with normals, `UV_0`, a matching `UV_1` and
//! tangents for normal mapping.

mod extrude;
mod mesh_data;
mod profiles;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::config::{
    TableParams, ELLIPSE_CURVE_SEGMENTS, ELLIPSE_RADIUS_X_FACTOR, ELLIPSE_RADIUS_Z_FACTOR,
    RADIAL_SEGMENTS, RECTANGLE_SIDE_FACTOR,
};
use crate::parts::TopShape;
use crate::uv::{project_uvs, UvProjection};

use extrude::{center_extrusion, ellipse_outline, extrude_outline, square_outline, SideShading};
use profiles::frustum;

pub use mesh_data::{ensure_normals, mesh_positions};

/// Projection used for a top variant.
pub fn top_projection(shape: TopShape, params: &TableParams) -> UvProjection {
    let projection = if shape == TopShape::Circle && params.polar_circle_uvs {
        UvProjection::polar()
    } else {
        UvProjection::planar()
    };
    projection.with_padding(params.uv_padding)
}

/// Builds the mesh for one tabletop variant, centered on y = 0.
pub fn synthesize_top(shape: TopShape, params: &TableParams) -> Mesh {
    let r = params.top_width;
    let depth = params.bevel_height;

    let mesh = match shape {
        TopShape::Circle => frustum(r, r - params.bevel, depth, RADIAL_SEGMENTS),
        TopShape::Ellipse => {
            let outline = ellipse_outline(
                r * ELLIPSE_RADIUS_X_FACTOR,
                r * ELLIPSE_RADIUS_Z_FACTOR,
                ELLIPSE_CURVE_SEGMENTS,
            );
            center_extrusion(extrude_outline(&outline, depth, SideShading::Smooth), depth)
        }
        TopShape::Rectangle => {
            let outline = square_outline(r * RECTANGLE_SIDE_FACTOR);
            center_extrusion(extrude_outline(&outline, depth, SideShading::Flat), depth)
        }
    };

    finish_surface(mesh, top_projection(shape, params), "top")
}

/// Builds the trunk: a frustum of `base_height`, narrow at the top.
pub fn synthesize_trunk(params: &TableParams) -> Mesh {
    let mesh = frustum(
        params.base_top_width,
        params.base_bottom_width,
        params.base_height,
        RADIAL_SEGMENTS,
    );
    finish_surface(mesh, UvProjection::planar().with_padding(params.uv_padding), "trunk")
}

/// Builds the footer: a `bevel_height` slab under the trunk whose bottom
/// edge is tapered by `bevel`.
pub fn synthesize_footer(params: &TableParams) -> Mesh {
    let mesh = frustum(
        params.base_bottom_width,
        params.base_bottom_width - params.bevel,
        params.bevel_height,
        RADIAL_SEGMENTS,
    );
    finish_surface(mesh, UvProjection::planar().with_padding(params.uv_padding), "footer")
}

/// Projects UVs, then derives tangents from them.
fn finish_surface(mut mesh: Mesh, projection: UvProjection, part: &str) -> Mesh {
    project_uvs(&mut mesh, projection);
    if let Err(err) = mesh.generate_tangents() {
        warn!("No tangents for {part} mesh, normal map disabled: {err}");
    }
    mesh
}
