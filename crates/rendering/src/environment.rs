//! Image-based lighting and the tiled graph-paper backdrop.

use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use bevy::window::PrimaryWindow;

use table::config::{TableParams, CAMERA_FAR, CAMERA_FOV_DEGREES};
use table::loading::LoadBarrier;

use crate::textures::{load_raster, TrackedLoads};

const ENVIRONMENT_BASE_INTENSITY: f32 = 1000.0;
const ENVIRONMENT_INTENSITY_FACTOR: f32 = 0.4;
/// Backdrop tiling per axis.
const BACKDROP_REPEAT: f32 = 3.0;
/// Just inside the far plane.
const BACKDROP_DISTANCE: f32 = CAMERA_FAR * 0.9;

/// Marker for the backdrop quad parented to the camera.
#[derive(Component)]
pub struct Backdrop;

/// Startup: attaches the prefiltered environment cubemaps to the camera.
pub fn load_environment(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    params: Res<TableParams>,
    mut barrier: ResMut<LoadBarrier>,
    mut loads: ResMut<TrackedLoads>,
    cameras: Query<Entity, With<Camera3d>>,
) {
    let Ok(camera) = cameras.get_single() else {
        warn!("No camera to attach the environment map to");
        return;
    };
    let diffuse: Handle<Image> = asset_server.load(params.textures.environment_diffuse.clone());
    let specular: Handle<Image> = asset_server.load(params.textures.environment_specular.clone());
    loads.track(
        diffuse.clone(),
        params.textures.environment_diffuse.clone(),
        &mut barrier,
    );
    loads.track(
        specular.clone(),
        params.textures.environment_specular.clone(),
        &mut barrier,
    );

    commands.entity(camera).insert(EnvironmentMapLight {
        diffuse_map: diffuse,
        specular_map: specular,
        intensity: ENVIRONMENT_BASE_INTENSITY * ENVIRONMENT_INTENSITY_FACTOR,
        rotation: Quat::IDENTITY,
    });
}

/// A unit quad facing +Z whose UVs span `0..repeat`.
pub fn tiled_quad(repeat: f32) -> Mesh {
    let mut mesh = Mesh::from(Rectangle::new(1.0, 1.0));
    if let Some(VertexAttributeValues::Float32x2(uvs)) = mesh.attribute_mut(Mesh::ATTRIBUTE_UV_0) {
        for uv in uvs.iter_mut() {
            uv[0] *= repeat;
            uv[1] *= repeat;
        }
    }
    mesh
}

/// Size of the view frustum cross-section at `distance`.
pub fn backdrop_extent(fov_y: f32, aspect: f32, distance: f32) -> Vec2 {
    let height = 2.0 * distance * (fov_y / 2.0).tan();
    Vec2::new(height * aspect, height)
}

/// Startup: spawns the backdrop quad as a child of the camera.
#[allow(clippy::too_many_arguments)]
pub fn spawn_backdrop(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    params: Res<TableParams>,
    mut barrier: ResMut<LoadBarrier>,
    mut loads: ResMut<TrackedLoads>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cameras: Query<Entity, With<Camera3d>>,
) {
    let Ok(camera) = cameras.get_single() else {
        return;
    };
    let texture = load_raster(&asset_server, params.textures.backdrop.clone(), true);
    loads.track(texture.clone(), params.textures.backdrop.clone(), &mut barrier);

    let backdrop = commands
        .spawn((
            Backdrop,
            Name::new("backdrop"),
            Mesh3d(meshes.add(tiled_quad(BACKDROP_REPEAT))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color_texture: Some(texture),
                unlit: true,
                ..default()
            })),
            Transform::from_xyz(0.0, 0.0, -BACKDROP_DISTANCE),
        ))
        .id();
    commands.entity(camera).add_child(backdrop);
}

/// Keeps the backdrop covering the whole view after window resizes.
pub fn fit_backdrop_to_window(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut backdrops: Query<&mut Transform, With<Backdrop>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let aspect = window.width() / window.height().max(1.0);
    let extent = backdrop_extent(CAMERA_FOV_DEGREES.to_radians(), aspect, BACKDROP_DISTANCE);
    for mut transform in &mut backdrops {
        transform.scale = extent.extend(1.0);
    }
}
