use std::f32::consts::FRAC_PI_2;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use table::config::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE, CAMERA_NEAR,
    CAMERA_START,
};

use crate::egui_input_guard::egui_wants_pointer;

const ZOOM_SPEED: f32 = 0.1;
const ORBIT_SENSITIVITY: f32 = 0.005;
const PAN_SENSITIVITY: f32 = 0.0015;
/// Keeps the camera off the poles so `looking_at` never degenerates.
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;
/// Exponential damping speed; higher settles faster.
const DAMPING_SPEED: f32 = 10.0;
const SETTLE_EPSILON: f32 = 1e-4;

/// Orbital camera state applied to the `Camera3d` transform every frame.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Point the camera looks at.
    pub focus: Vec3,
    /// Horizontal rotation in radians.
    pub yaw: f32,
    /// Elevation angle in radians.
    pub pitch: f32,
    /// Distance from focus, within [`CAMERA_MIN_DISTANCE`, `CAMERA_MAX_DISTANCE`].
    pub distance: f32,
    /// Cleared while the scale gizmo is dragging.
    pub enabled: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_position(CAMERA_START, Vec3::ZERO)
    }
}

impl OrbitCamera {
    /// Orbit parameters that place the camera at `position` looking at `focus`.
    pub fn from_position(position: Vec3, focus: Vec3) -> Self {
        let offset = position - focus;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            focus,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            enabled: true,
        }
    }

    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.focus + Vec3::new(x, y, z)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(self.focus, Vec3::Y)
    }
}

/// Desired orbit state written by input; [`OrbitCamera`] eases toward it.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CameraTarget {
    pub focus: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for CameraTarget {
    fn default() -> Self {
        let orbit = OrbitCamera::default();
        Self {
            focus: orbit.focus,
            yaw: orbit.yaw,
            pitch: orbit.pitch,
            distance: orbit.distance,
        }
    }
}

pub fn clamp_distance(distance: f32) -> f32 {
    distance.clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE)
}

#[inline]
fn exp_lerp_factor(speed: f32, dt: f32) -> f32 {
    1.0 - (-speed * dt).exp()
}

pub fn setup_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        orbit.transform(),
    ));
    commands.insert_resource(orbit);
}

/// Left drag orbits, right drag pans. Ignored while disabled or over egui.
pub fn camera_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    orbit: Res<OrbitCamera>,
    mut target: ResMut<CameraTarget>,
    mut contexts: EguiContexts,
) {
    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    if !orbit.enabled || delta == Vec2::ZERO || egui_wants_pointer(&mut contexts) {
        return;
    }

    if buttons.pressed(MouseButton::Left) {
        target.yaw -= delta.x * ORBIT_SENSITIVITY;
        target.pitch = (target.pitch + delta.y * ORBIT_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
    } else if buttons.pressed(MouseButton::Right) {
        let rotation = orbit.transform().rotation;
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        let scale = target.distance * PAN_SENSITIVITY;
        target.focus += (-right * delta.x + up * delta.y) * scale;
    }
}

/// Scroll wheel: zoom within the distance limits.
pub fn camera_zoom(
    mut scroll_evts: EventReader<MouseWheel>,
    orbit: Res<OrbitCamera>,
    mut target: ResMut<CameraTarget>,
) {
    for evt in scroll_evts.read() {
        if !orbit.enabled {
            continue;
        }
        let dy = match evt.unit {
            MouseScrollUnit::Line => evt.y,
            MouseScrollUnit::Pixel => evt.y / 100.0,
        };
        target.distance = clamp_distance(target.distance * (1.0 - dy * ZOOM_SPEED));
    }
}

/// Eases [`OrbitCamera`] toward [`CameraTarget`] (damping).
pub fn smooth_camera_to_target(
    target: Res<CameraTarget>,
    time: Res<Time>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let factor = exp_lerp_factor(DAMPING_SPEED, dt);

    let focus_delta = target.focus - orbit.focus;
    let yaw_delta = target.yaw - orbit.yaw;
    let pitch_delta = target.pitch - orbit.pitch;
    let distance_delta = target.distance - orbit.distance;
    let settled = focus_delta.length() < SETTLE_EPSILON
        && yaw_delta.abs() < SETTLE_EPSILON
        && pitch_delta.abs() < SETTLE_EPSILON
        && distance_delta.abs() < SETTLE_EPSILON;

    if settled {
        let current = (orbit.focus, orbit.yaw, orbit.pitch, orbit.distance);
        if current != (target.focus, target.yaw, target.pitch, target.distance) {
            orbit.focus = target.focus;
            orbit.yaw = target.yaw;
            orbit.pitch = target.pitch;
            orbit.distance = target.distance;
        }
        return;
    }

    orbit.focus += focus_delta * factor;
    orbit.yaw += yaw_delta * factor;
    orbit.pitch += pitch_delta * factor;
    orbit.distance = clamp_distance(orbit.distance + distance_delta * factor);
}

/// Applies [`OrbitCamera`] to the camera transform.
pub fn apply_orbit_camera(
    orbit: Res<OrbitCamera>,
    mut query: Query<&mut Transform, With<Camera3d>>,
) {
    if !orbit.is_changed() {
        return;
    }
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    *transform = orbit.transform();
}
