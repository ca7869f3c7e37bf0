//! Pointer picking: turns clicks into `SessionEvent`s.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use table::assembly::TableAssembly;
use table::parts::is_pickable_name;
use table::picking::{ray_mesh_distance, resolve_part, PointerGesture};
use table::session::SessionEvent;

use crate::egui_input_guard::egui_wants_pointer;
use crate::gizmo::GizmoDrag;

/// Nearest candidate hit by `ray`.
pub fn nearest_hit<'a>(
    ray: Ray3d,
    candidates: impl IntoIterator<Item = (Entity, &'a Mesh, &'a GlobalTransform)>,
) -> Option<Entity> {
    candidates
        .into_iter()
        .filter_map(|(entity, mesh, transform)| {
            ray_mesh_distance(mesh, transform, ray).map(|distance| (entity, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity)
}

/// Classifies left press/release pairs and casts a ray on clicks.
///
/// Only the active top and the base meshes are tested; a hit resolves to
/// its named part. Misses carry the gizmo drag flag so releasing a drag
/// never deselects.
#[allow(clippy::too_many_arguments)]
pub fn pick_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    assembly: Option<Res<TableAssembly>>,
    meshes: Res<Assets<Mesh>>,
    parts: Query<(&Mesh3d, &GlobalTransform)>,
    names: Query<&Name>,
    parents: Query<&Parent>,
    gizmo: Res<GizmoDrag>,
    mut gesture: ResMut<PointerGesture>,
    mut contexts: EguiContexts,
    mut events: EventWriter<SessionEvent>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let now_ms = time.elapsed_secs_f64() * 1000.0;

    if buttons.just_pressed(MouseButton::Left) {
        if egui_wants_pointer(&mut contexts) {
            return;
        }
        gesture.on_pointer_down(cursor, now_ms);
    }

    if !buttons.just_released(MouseButton::Left) {
        return;
    }
    let Some(click) = gesture.on_pointer_up(cursor, now_ms) else {
        return;
    };
    let (Some(assembly), Ok((camera, camera_transform))) = (assembly, cameras.get_single()) else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, click.position) else {
        return;
    };

    let candidates = assembly.pick_candidates();
    let hit = nearest_hit(
        ray,
        candidates.iter().filter_map(|entity| {
            let (mesh3d, transform) = parts.get(*entity).ok()?;
            Some((*entity, meshes.get(&mesh3d.0)?, transform))
        }),
    );

    let target = hit
        .and_then(|entity| {
            resolve_part(
                entity,
                |e| names.get(e).is_ok_and(|name| is_pickable_name(name.as_str())),
                |e| parents.get(e).ok().map(Parent::get),
            )
        })
        .and_then(|part| assembly.pick_target(part));

    match target {
        Some(target) => {
            debug!("Picked {:?}", target);
            events.send(SessionEvent::Picked(target));
        }
        None => {
            events.send(SessionEvent::Missed {
                gizmo_dragging: gizmo.is_dragging(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use table::config::TableParams;
    use table::geometry::synthesize_top;
    use table::parts::TopShape;

    #[test]
    fn test_nearest_hit_prefers_closer_mesh() {
        let mesh = synthesize_top(TopShape::Rectangle, &TableParams::default());
        let near = GlobalTransform::from(Transform::from_xyz(0.0, 2.0, 0.0));
        let far = GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 0.0));
        let ray = Ray3d::new(Vec3::new(0.0, 10.0, 0.0), Dir3::NEG_Y);
        let hit = nearest_hit(
            ray,
            [
                (Entity::from_raw(1), &mesh, &far),
                (Entity::from_raw(2), &mesh, &near),
            ],
        );
        assert_eq!(hit, Some(Entity::from_raw(2)));
    }

    #[test]
    fn test_nearest_hit_none_when_all_miss() {
        let mesh = synthesize_top(TopShape::Circle, &TableParams::default());
        let transform = GlobalTransform::IDENTITY;
        let ray = Ray3d::new(Vec3::new(10.0, 10.0, 0.0), Dir3::NEG_Y);
        assert_eq!(nearest_hit(ray, [(Entity::from_raw(1), &mesh, &transform)]), None);
    }
}
