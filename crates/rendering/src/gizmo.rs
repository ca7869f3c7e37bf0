//! Scale gizmo: handle drawing and screen-space drag.
//!
//! The gizmo follows the [`TransformSession`]. Each handle sits at the end of
//! an axis line from the part's origin; the center handle scales X and Z
//! together and is only offered when both axes are shown. Every drag delta is
//! snapped and then passed through [`enforce_scale`] before it reaches the
//! part's `Transform`. Orbit navigation is off for the duration of a drag.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use table::session::{
    enforce_scale, snap_scale, Attachment, ScaleAxis, SessionEffect, TransformSession,
};

use crate::camera::OrbitCamera;
use crate::egui_input_guard::egui_wants_pointer;
use crate::keyboard::ScaleModifier;

/// `#598392`
const X_AXIS_COLOR: Color = Color::srgb(0.349, 0.514, 0.573);
/// `#124559`
const Z_AXIS_COLOR: Color = Color::srgb(0.071, 0.271, 0.349);
/// `#AEC3B0`
const ACTIVE_COLOR: Color = Color::srgb(0.682, 0.765, 0.690);
/// `#EFF6E0`
const CENTER_COLOR: Color = Color::srgb(0.937, 0.965, 0.878);

/// World length of an axis line.
const HANDLE_LENGTH: f32 = 0.6;
const HANDLE_SIZE: f32 = 0.05;
/// Screen distance within which a press grabs a handle.
const HANDLE_GRAB_RADIUS_PX: f32 = 14.0;
/// Center handle: pixels of drag for a scale change of 1.
const CENTER_DRAG_PX: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub axis: ScaleAxis,
    pub start_cursor: Vec2,
    pub start_scale: Vec3,
    /// Screen direction and length of the dragged axis line.
    pub screen_axis: Vec2,
    pub screen_length: f32,
}

#[derive(Resource, Debug, Default)]
pub struct GizmoDrag {
    pub active: Option<ActiveDrag>,
}

impl GizmoDrag {
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}

/// World-space handle positions for an attachment at `origin`.
pub fn handle_positions(attachment: &Attachment, origin: Vec3) -> Vec<(ScaleAxis, Vec3)> {
    let mut handles = Vec::with_capacity(3);
    if attachment.axes.x {
        handles.push((ScaleAxis::X, origin + Vec3::X * HANDLE_LENGTH));
    }
    if attachment.axes.z {
        handles.push((ScaleAxis::Z, origin + Vec3::Z * HANDLE_LENGTH));
    }
    if attachment.axes.x && attachment.axes.z {
        handles.push((ScaleAxis::XZ, origin));
    }
    handles
}

/// Raw scale for a drag, before snapping and constraints.
pub fn dragged_scale(drag: &ActiveDrag, cursor: Vec2) -> Vec3 {
    let delta = cursor - drag.start_cursor;
    let mut scale = drag.start_scale;
    match drag.axis {
        ScaleAxis::X | ScaleAxis::Z => {
            let along = delta.dot(drag.screen_axis) / drag.screen_length.max(1.0);
            let factor = 1.0 + along;
            if drag.axis == ScaleAxis::X {
                scale.x *= factor;
            } else {
                scale.z *= factor;
            }
        }
        ScaleAxis::XZ => {
            let factor = 1.0 + (delta.x - delta.y) / CENTER_DRAG_PX;
            scale.x *= factor;
            scale.z *= factor;
        }
    }
    scale
}

/// Snaps the components an axis drives.
pub fn snap_axis(scale: Vec3, axis: ScaleAxis) -> Vec3 {
    let mut out = scale;
    if matches!(axis, ScaleAxis::X | ScaleAxis::XZ) {
        out.x = snap_scale(out.x);
    }
    if matches!(axis, ScaleAxis::Z | ScaleAxis::XZ) {
        out.z = snap_scale(out.z);
    }
    out
}

fn axis_color(axis: ScaleAxis) -> Color {
    match axis {
        ScaleAxis::X => X_AXIS_COLOR,
        ScaleAxis::Z => Z_AXIS_COLOR,
        ScaleAxis::XZ => CENTER_COLOR,
    }
}

/// Draws the handles of the current attachment.
pub fn draw_gizmo(
    mut gizmos: Gizmos,
    session: Res<TransformSession>,
    drag: Res<GizmoDrag>,
    targets: Query<&GlobalTransform>,
) {
    let Some(attachment) = session.attachment() else {
        return;
    };
    let Ok(transform) = targets.get(attachment.target) else {
        return;
    };
    let origin = transform.translation();
    let dragged = drag.active.map(|d| d.axis);

    for (axis, end) in handle_positions(attachment, origin) {
        let color = if dragged == Some(axis) {
            ACTIVE_COLOR
        } else {
            axis_color(axis)
        };
        if axis != ScaleAxis::XZ {
            gizmos.line(origin, end, color);
        }
        gizmos.cuboid(
            Transform::from_translation(end).with_scale(Vec3::splat(HANDLE_SIZE)),
            color,
        );
    }
}

/// Starts, updates and ends handle drags.
#[allow(clippy::too_many_arguments)]
pub fn drag_gizmo(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    session: Res<TransformSession>,
    modifier: Res<ScaleModifier>,
    mut drag: ResMut<GizmoDrag>,
    mut orbit: ResMut<OrbitCamera>,
    mut targets: Query<(&GlobalTransform, &mut Transform)>,
    mut contexts: EguiContexts,
) {
    if buttons.just_released(MouseButton::Left) && drag.active.take().is_some() {
        orbit.enabled = true;
        return;
    }

    let Some(attachment) = session.attachment().copied() else {
        return;
    };
    let (Ok(window), Ok((camera, camera_transform))) =
        (windows.get_single(), cameras.get_single())
    else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((global, mut transform)) = targets.get_mut(attachment.target) else {
        return;
    };

    if buttons.just_pressed(MouseButton::Left) && !egui_wants_pointer(&mut contexts) {
        let origin = global.translation();
        let Ok(origin_screen) = camera.world_to_viewport(camera_transform, origin) else {
            return;
        };
        let grabbed = handle_positions(&attachment, origin)
            .into_iter()
            .filter_map(|(axis, end)| {
                let end_screen = camera.world_to_viewport(camera_transform, end).ok()?;
                let distance = end_screen.distance(cursor);
                (distance <= HANDLE_GRAB_RADIUS_PX).then_some((axis, end_screen, distance))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2));

        if let Some((axis, end_screen)) = grabbed.map(|(axis, end, _)| (axis, end)) {
            let screen_vec = end_screen - origin_screen;
            drag.active = Some(ActiveDrag {
                axis,
                start_cursor: cursor,
                start_scale: transform.scale,
                screen_axis: screen_vec.normalize_or_zero(),
                screen_length: screen_vec.length(),
            });
            orbit.enabled = false;
        }
        return;
    }

    let Some(active) = drag.active else {
        return;
    };
    let raw = snap_axis(dragged_scale(&active, cursor), active.axis);
    let scale = enforce_scale(raw, attachment.category, Some(active.axis), modifier.0);
    if transform.scale != scale {
        transform.scale = scale;
    }
}

/// A detach ends any drag in progress.
pub fn cancel_drag_on_detach(
    mut effects: EventReader<SessionEffect>,
    mut drag: ResMut<GizmoDrag>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let detached = effects
        .read()
        .filter(|effect| matches!(effect, SessionEffect::Detach))
        .count()
        > 0;
    if detached && drag.active.take().is_some() {
        orbit.enabled = true;
    }
}
