//! Keyboard: Escape ends the transform session, Shift locks scale axes.

use bevy::prelude::*;

use table::session::SessionEvent;

/// Whether the axis-lock modifier (Shift) is held.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScaleModifier(pub bool);

pub fn track_scale_modifier(keys: Res<ButtonInput<KeyCode>>, mut modifier: ResMut<ScaleModifier>) {
    let held = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    if modifier.0 != held {
        modifier.0 = held;
    }
}

pub fn cancel_on_escape(keys: Res<ButtonInput<KeyCode>>, mut events: EventWriter<SessionEvent>) {
    if keys.just_pressed(KeyCode::Escape) {
        events.send(SessionEvent::Cancel);
    }
}
