//! Picking helpers: click classification, ray/mesh intersection and the
//! walk from a hit entity to its named part.

use bevy::prelude::*;

use crate::config::{CLICK_MAX_DISTANCE_PX, CLICK_MAX_DURATION_MS};
use crate::geometry::mesh_positions;

/// A press/release pair short and still enough to count as a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub position: Vec2,
}

/// Tracks the last pointer press so the release can be classified.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PointerGesture {
    pressed: Option<(Vec2, f64)>,
}

impl PointerGesture {
    /// Records a press. `time_ms` is any monotonic clock in milliseconds.
    pub fn on_pointer_down(&mut self, position: Vec2, time_ms: f64) {
        self.pressed = Some((position, time_ms));
    }

    /// Classifies the release against the matching press. Releases without
    /// a press never click.
    pub fn on_pointer_up(&mut self, position: Vec2, time_ms: f64) -> Option<Click> {
        let (start, pressed_at) = self.pressed.take()?;
        let elapsed = time_ms - pressed_at;
        let moved = start.distance(position);
        (elapsed < CLICK_MAX_DURATION_MS && moved < CLICK_MAX_DISTANCE_PX)
            .then_some(Click { position })
    }
}

// ---------------------------------------------------------------------------
// Ray casting
// ---------------------------------------------------------------------------

/// Möller–Trumbore. Returns the ray parameter of the hit, front or back face.
pub fn ray_triangle_intersection(
    origin: Vec3,
    direction: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<f32> {
    const EPSILON: f32 = 1e-8;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON).then_some(t)
}

/// Nearest hit of a world-space ray against a mesh placed at `transform`.
///
/// The ray is moved into the mesh's local space. The returned distance is
/// measured along the world ray, so hits on different meshes compare.
pub fn ray_mesh_distance(mesh: &Mesh, transform: &GlobalTransform, ray: Ray3d) -> Option<f32> {
    let positions = mesh_positions(mesh)?;
    let world_to_local = transform.affine().inverse();
    let origin = world_to_local.transform_point3(ray.origin);
    let direction = world_to_local.transform_vector3(*ray.direction);

    let vertex = |i: usize| positions.get(i).copied().map(Vec3::from);
    let hit = |a: usize, b: usize, c: usize| {
        ray_triangle_intersection(origin, direction, vertex(a)?, vertex(b)?, vertex(c)?)
    };

    let indices: Vec<usize> = match mesh.indices() {
        Some(indices) => indices.iter().collect(),
        None => (0..positions.len()).collect(),
    };

    indices
        .chunks_exact(3)
        .filter_map(|tri| hit(tri[0], tri[1], tri[2]))
        .min_by(f32::total_cmp)
}

/// Walks from `hit` up the parent chain until `is_part` accepts an entity.
pub fn resolve_part(
    hit: Entity,
    is_part: impl Fn(Entity) -> bool,
    parent_of: impl Fn(Entity) -> Option<Entity>,
) -> Option<Entity> {
    let mut current = Some(hit);
    while let Some(entity) = current {
        if is_part(entity) {
            return Some(entity);
        }
        current = parent_of(entity);
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::TableParams;
    use crate::geometry::synthesize_top;
    use crate::parts::TopShape;

    #[test]
    fn test_quick_still_release_is_click() {
        let mut gesture = PointerGesture::default();
        gesture.on_pointer_down(Vec2::new(10.0, 10.0), 1000.0);
        let click = gesture.on_pointer_up(Vec2::new(10.0, 10.0), 1199.0);
        assert_eq!(
            click,
            Some(Click {
                position: Vec2::new(10.0, 10.0)
            })
        );
    }

    #[test]
    fn test_slow_release_is_not_click() {
        let mut gesture = PointerGesture::default();
        gesture.on_pointer_down(Vec2::ZERO, 0.0);
        assert_eq!(gesture.on_pointer_up(Vec2::ZERO, 201.0), None);
    }

    #[test]
    fn test_moved_release_is_not_click() {
        let mut gesture = PointerGesture::default();
        gesture.on_pointer_down(Vec2::ZERO, 0.0);
        assert_eq!(gesture.on_pointer_up(Vec2::new(7.0, 0.0), 50.0), None);
    }

    #[test]
    fn test_release_without_press_is_not_click() {
        let mut gesture = PointerGesture::default();
        assert_eq!(gesture.on_pointer_up(Vec2::ZERO, 10.0), None);
        gesture.on_pointer_down(Vec2::ZERO, 0.0);
        assert!(gesture.on_pointer_up(Vec2::ZERO, 10.0).is_some());
        assert_eq!(
            gesture.on_pointer_up(Vec2::ZERO, 20.0),
            None,
            "a press is consumed by its release"
        );
    }

    #[test]
    fn test_ray_hits_triangle_in_front() {
        let t = ray_triangle_intersection(
            Vec3::new(0.2, 0.2, 5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        );
        assert!((t.expect("hit") - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_triangle_behind_or_outside() {
        assert!(
            ray_triangle_intersection(Vec3::new(0.2, 0.2, 5.0), Vec3::Z, Vec3::ZERO, Vec3::X, Vec3::Y)
                .is_none()
        );
        assert!(ray_triangle_intersection(
            Vec3::new(2.0, 2.0, 5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y
        )
        .is_none());
    }

    #[test]
    fn test_ray_mesh_distance_respects_transform() {
        let mesh = synthesize_top(TopShape::Ellipse, &TableParams::default());
        let transform = GlobalTransform::from(Transform::from_xyz(0.0, 1.0, 0.0));
        let ray = Ray3d::new(Vec3::new(0.0, 5.0, 0.0), Dir3::NEG_Y);
        let distance = ray_mesh_distance(&mesh, &transform, ray).expect("top should be hit");
        // Upper face sits at 1.0 + bevel_height / 2.
        assert!((distance - (4.0 - 0.02)).abs() < 1e-4, "got {distance}");

        let away = Ray3d::new(Vec3::new(5.0, 5.0, 5.0), Dir3::Y);
        assert!(ray_mesh_distance(&mesh, &transform, away).is_none());
    }

    #[test]
    fn test_ray_mesh_distance_with_scaled_part() {
        let mesh = synthesize_top(TopShape::Rectangle, &TableParams::default());
        let transform =
            GlobalTransform::from(Transform::from_scale(Vec3::new(1.5, 1.0, 1.0)));
        // x = 1.3 is outside the unscaled top (half side 1.0) but inside when scaled.
        let ray = Ray3d::new(Vec3::new(1.3, 5.0, 0.0), Dir3::NEG_Y);
        assert!(ray_mesh_distance(&mesh, &transform, ray).is_some());
    }

    #[test]
    fn test_resolve_part_walks_to_named_ancestor() {
        let footer = Entity::from_raw(1);
        let base = Entity::from_raw(2);
        let root = Entity::from_raw(3);
        let parents: HashMap<Entity, Entity> = [(footer, base), (base, root)].into();
        let resolved = resolve_part(footer, |e| e == base, |e| parents.get(&e).copied());
        assert_eq!(resolved, Some(base));
        let none = resolve_part(footer, |_| false, |e| parents.get(&e).copied());
        assert_eq!(none, None);
    }
}
