//! Unit tests for table geometry synthesis.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, VertexAttributeValues};

use super::*;
use crate::uv::horizontal_bounds;

fn positions(mesh: &Mesh) -> Vec<[f32; 3]> {
    mesh_positions(mesh)
        .expect("mesh should have positions")
        .to_vec()
}

fn uvs(mesh: &Mesh, attr: bevy::render::mesh::MeshVertexAttribute) -> Vec<[f32; 2]> {
    match mesh.attribute(attr) {
        Some(VertexAttributeValues::Float32x2(v)) => v.clone(),
        _ => panic!("mesh should have Float32x2 uvs"),
    }
}

fn vertical_extent(mesh: &Mesh) -> (f32, f32) {
    positions(mesh)
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p[1]), hi.max(p[1])))
}

#[test]
fn test_every_top_has_vertices_and_horizontal_extent() {
    let params = TableParams::default();
    for shape in TopShape::ALL {
        let mesh = synthesize_top(shape, &params);
        let pos = positions(&mesh);
        assert!(!pos.is_empty(), "{shape:?} top should have vertices");
        let (min, max) = horizontal_bounds(&pos).expect("bounds");
        let span = max - min;
        assert!(span.x > 0.0, "{shape:?} top should span X");
        assert!(span.y > 0.0, "{shape:?} top should span Z");
    }
}

#[test]
fn test_tops_are_centered_on_zero_with_bevel_height() {
    let params = TableParams::default();
    for shape in TopShape::ALL {
        let (lo, hi) = vertical_extent(&synthesize_top(shape, &params));
        assert!((lo + params.bevel_height / 2.0).abs() < 1e-5, "{shape:?} low: {lo}");
        assert!((hi - params.bevel_height / 2.0).abs() < 1e-5, "{shape:?} high: {hi}");
    }
}

#[test]
fn test_ellipse_radii_follow_width_factors() {
    let params = TableParams::default();
    let (min, max) = horizontal_bounds(&positions(&synthesize_top(TopShape::Ellipse, &params)))
        .expect("bounds");
    assert!((max.x - 1.6).abs() < 1e-4 && (min.x + 1.6).abs() < 1e-4);
    assert!((max.y - 1.0).abs() < 1e-4 && (min.y + 1.0).abs() < 1e-4);
}

#[test]
fn test_rectangle_side_is_twice_width() {
    let params = TableParams {
        top_width: 0.75,
        ..default()
    };
    let (min, max) = horizontal_bounds(&positions(&synthesize_top(TopShape::Rectangle, &params)))
        .expect("bounds");
    assert!(((max - min) - Vec2::splat(1.5)).length() < 1e-5);
}

#[test]
fn test_circle_bottom_is_narrower_by_bevel() {
    let params = TableParams::default();
    let pos = positions(&synthesize_top(TopShape::Circle, &params));
    let half = params.bevel_height / 2.0;
    let radius_at = |y: f32| {
        pos.iter()
            .filter(|p| (p[1] - y).abs() < 1e-6)
            .map(|p| Vec2::new(p[0], p[2]).length())
            .fold(0.0_f32, f32::max)
    };
    assert!((radius_at(half) - params.top_width).abs() < 1e-5);
    assert!((radius_at(-half) - (params.top_width - params.bevel)).abs() < 1e-5);
}

#[test]
fn test_extruded_top_cap_faces_up() {
    let mesh = synthesize_top(TopShape::Rectangle, &TableParams::default());
    let normals = match mesh.attribute(Mesh::ATTRIBUTE_NORMAL) {
        Some(VertexAttributeValues::Float32x3(v)) => v.clone(),
        _ => panic!("mesh should have normals"),
    };
    let pos = positions(&mesh);
    let top_y = vertical_extent(&mesh).1;
    // The center vertex of the upper cap points straight up.
    let center = pos
        .iter()
        .position(|p| p[0].abs() < 1e-6 && p[2].abs() < 1e-6 && (p[1] - top_y).abs() < 1e-6)
        .expect("upper cap center");
    assert!((Vec3::from(normals[center]) - Vec3::Y).length() < 1e-5);
}

#[test]
fn test_trunk_tapers_from_top_to_bottom_width() {
    let params = TableParams::default();
    let pos = positions(&synthesize_trunk(&params));
    let half = params.base_height / 2.0;
    let max_radius_at = |y: f32| {
        pos.iter()
            .filter(|p| (p[1] - y).abs() < 1e-6)
            .map(|p| Vec2::new(p[0], p[2]).length())
            .fold(0.0_f32, f32::max)
    };
    assert!((max_radius_at(half) - params.base_top_width).abs() < 1e-5);
    assert!((max_radius_at(-half) - params.base_bottom_width).abs() < 1e-5);
}

#[test]
fn test_footer_height_is_bevel_height() {
    let params = TableParams::default();
    let (lo, hi) = vertical_extent(&synthesize_footer(&params));
    assert!(((hi - lo) - params.bevel_height).abs() < 1e-6);
}

#[test]
fn test_all_parts_have_normals_and_matching_uv_channels() {
    let params = TableParams::default();
    let meshes = [
        synthesize_top(TopShape::Circle, &params),
        synthesize_top(TopShape::Ellipse, &params),
        synthesize_top(TopShape::Rectangle, &params),
        synthesize_trunk(&params),
        synthesize_footer(&params),
    ];
    for mesh in &meshes {
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
        let uv0 = uvs(mesh, Mesh::ATTRIBUTE_UV_0);
        assert_eq!(uv0.len(), positions(mesh).len());
        assert_eq!(uv0, uvs(mesh, Mesh::ATTRIBUTE_UV_1));
    }
}

#[test]
fn test_all_parts_carry_tangents_for_normal_maps() {
    let params = TableParams::default();
    let parts = [
        ("circle", synthesize_top(TopShape::Circle, &params)),
        ("ellipse", synthesize_top(TopShape::Ellipse, &params)),
        ("rectangle", synthesize_top(TopShape::Rectangle, &params)),
        ("trunk", synthesize_trunk(&params)),
        ("footer", synthesize_footer(&params)),
    ];
    for (part, mesh) in &parts {
        match mesh.attribute(Mesh::ATTRIBUTE_TANGENT) {
            Some(VertexAttributeValues::Float32x4(tangents)) => {
                assert_eq!(
                    tangents.len(),
                    positions(mesh).len(),
                    "{part} should have one tangent per vertex"
                );
            }
            _ => panic!("{part} mesh should carry Float32x4 tangents"),
        }
    }
}

#[test]
fn test_indices_reference_existing_vertices() {
    let params = TableParams::default();
    for shape in TopShape::ALL {
        let mesh = synthesize_top(shape, &params);
        let count = positions(&mesh).len() as u32;
        match mesh.indices() {
            Some(Indices::U32(idx)) => {
                assert_eq!(idx.len() % 3, 0);
                assert!(idx.iter().all(|&i| i < count), "{shape:?} index out of range");
            }
            _ => panic!("{shape:?} top should have u32 indices"),
        }
    }
}

#[test]
fn test_planar_projection_is_idempotent() {
    let params = TableParams::default();
    let mut mesh = synthesize_top(TopShape::Ellipse, &params);
    let first = uvs(&mesh, Mesh::ATTRIBUTE_UV_0);
    project_uvs(&mut mesh, UvProjection::planar());
    assert_eq!(first, uvs(&mesh, Mesh::ATTRIBUTE_UV_0));
}

#[test]
fn test_polar_option_only_changes_circle_projection() {
    let params = TableParams {
        polar_circle_uvs: true,
        ..default()
    };
    assert_eq!(
        top_projection(TopShape::Circle, &params).mode,
        crate::uv::UvMode::Polar
    );
    assert_eq!(
        top_projection(TopShape::Ellipse, &params).mode,
        crate::uv::UvMode::Planar
    );
}
