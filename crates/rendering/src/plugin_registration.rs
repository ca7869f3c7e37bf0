use bevy::prelude::*;

use table::loading::advance_when_settled;
use table::TableSet;

use crate::*;

/// Register all rendering systems.
pub(crate) fn register_rendering_systems(app: &mut App) {
    app.add_systems(
        Startup,
        (
            camera::setup_camera,
            lighting::setup_lighting,
            textures::request_texture_sets,
            environment::load_environment,
            environment::spawn_backdrop,
        )
            .chain(),
    );
    app.add_systems(PostStartup, textures::finish_load_scheduling);

    // Asset settling feeds the readiness barrier.
    app.add_systems(
        Update,
        (textures::poll_tracked_loads, textures::build_texture_sets)
            .chain()
            .before(advance_when_settled),
    );

    // Pointer and keyboard input
    app.add_systems(
        Update,
        (
            keyboard::track_scale_modifier,
            keyboard::cancel_on_escape,
            picking::pick_on_click.before(gizmo::drag_gizmo),
            gizmo::drag_gizmo.after(keyboard::track_scale_modifier),
        )
            .in_set(TableSet::Input),
    );
    app.add_systems(
        Update,
        gizmo::cancel_drag_on_detach.after(TableSet::Session),
    );

    // Camera
    app.add_systems(
        Update,
        (
            camera::camera_drag.after(gizmo::drag_gizmo),
            camera::camera_zoom,
            camera::smooth_camera_to_target,
            camera::apply_orbit_camera,
        )
            .chain(),
    );

    app.add_systems(
        Update,
        (gizmo::draw_gizmo, environment::fit_backdrop_to_window),
    );
}
