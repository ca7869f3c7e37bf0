//! Egui input guard: keeps pointer input over the selector panels from
//! reaching the scene (orbit, picking, gizmo).

use bevy_egui::EguiContexts;

/// Returns `true` when the cursor is over an egui area or egui is handling
/// a drag/click.
#[inline]
pub fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    let ctx = contexts.ctx_mut();
    ctx.wants_pointer_input() || ctx.is_pointer_over_area()
}
