//! Transform session: the scale gizmo's attachment state machine and the
//! constraints applied while a part is being scaled.
//!
//! `TransformSession::transition` is pure. The ECS side (`apply_session_events`)
//! feeds it `SessionEvent`s, stores the new state and forwards the effects
//! so the gizmo can react to detach / attach.

use bevy::prelude::*;

use crate::config::SCALE_SNAP;
use crate::parts::PartCategory;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which gizmo handles are shown. Y is never shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisVisibility {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisVisibility {
    pub fn for_category(category: PartCategory) -> Self {
        Self {
            x: true,
            y: false,
            z: !category.is_radially_symmetric(),
        }
    }
}

/// A part the gizmo can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickTarget {
    pub entity: Entity,
    pub category: PartCategory,
}

/// The gizmo bound to one part, in scale mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub target: Entity,
    pub category: PartCategory,
    pub axes: AxisVisibility,
}

impl Attachment {
    pub fn new(target: PickTarget) -> Self {
        Self {
            target: target.entity,
            category: target.category,
            axes: AxisVisibility::for_category(target.category),
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformSession {
    #[default]
    Idle,
    Attached(Attachment),
}

/// Inputs to the session state machine.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A click resolved to an eligible part.
    Picked(PickTarget),
    /// A click hit nothing.
    Missed { gizmo_dragging: bool },
    /// Escape.
    Cancel,
    /// The visible top variant changed.
    TopSwapped { replacement: Option<PickTarget> },
}

/// Side effects a transition asks the gizmo to perform, in order.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    Detach,
    Attach(Attachment),
}

/// Axis being dragged on the gizmo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleAxis {
    X,
    Z,
    /// The center handle, scaling both horizontal axes.
    XZ,
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

impl TransformSession {
    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            TransformSession::Idle => None,
            TransformSession::Attached(attachment) => Some(attachment),
        }
    }

    /// Computes the next state and the effects that lead to it.
    pub fn transition(&self, event: SessionEvent) -> (TransformSession, Vec<SessionEffect>) {
        match (*self, event) {
            (TransformSession::Idle, SessionEvent::Picked(target)) => {
                let attachment = Attachment::new(target);
                (
                    TransformSession::Attached(attachment),
                    vec![SessionEffect::Attach(attachment)],
                )
            }
            (TransformSession::Attached(_), SessionEvent::Picked(target)) => {
                let attachment = Attachment::new(target);
                (
                    TransformSession::Attached(attachment),
                    vec![SessionEffect::Detach, SessionEffect::Attach(attachment)],
                )
            }
            (TransformSession::Attached(_), SessionEvent::Cancel)
            | (
                TransformSession::Attached(_),
                SessionEvent::Missed {
                    gizmo_dragging: false,
                },
            ) => (TransformSession::Idle, vec![SessionEffect::Detach]),
            (TransformSession::Attached(current), SessionEvent::TopSwapped { replacement })
                if current.category.is_top() =>
            {
                match replacement {
                    Some(target) => {
                        let attachment = Attachment::new(target);
                        (
                            TransformSession::Attached(attachment),
                            vec![SessionEffect::Detach, SessionEffect::Attach(attachment)],
                        )
                    }
                    None => (TransformSession::Idle, vec![SessionEffect::Detach]),
                }
            }
            (state, _) => (state, Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Scale constraints
// ---------------------------------------------------------------------------

/// Rounds a scale value to the gizmo snap step.
pub fn snap_scale(value: f32) -> f32 {
    (value / SCALE_SNAP).round() * SCALE_SNAP
}

/// Clamps `scale` to the category range, then locks the horizontal axes
/// together when the part is radially symmetric or the modifier is held.
pub fn enforce_scale(
    scale: Vec3,
    category: PartCategory,
    axis: Option<ScaleAxis>,
    modifier: bool,
) -> Vec3 {
    let bounds = category.scale_bounds();
    let mut out = Vec3::new(
        bounds.clamp(scale.x),
        bounds.clamp(scale.y),
        bounds.clamp(scale.z),
    );

    if category.is_radially_symmetric() || modifier {
        match axis {
            Some(ScaleAxis::X) => out.z = out.x,
            Some(ScaleAxis::Z) => out.x = out.z,
            Some(ScaleAxis::XZ) => {
                let m = out.x.max(out.z);
                out.x = m;
                out.z = m;
            }
            None => {}
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Runs every queued `SessionEvent` through the state machine.
pub fn apply_session_events(
    mut events: EventReader<SessionEvent>,
    mut session: ResMut<TransformSession>,
    mut effects: EventWriter<SessionEffect>,
) {
    for event in events.read() {
        let (next, emitted) = session.transition(*event);
        if next != *session {
            debug!("Transform session: {:?} -> {:?} on {:?}", *session, next, event);
            *session = next;
        }
        for effect in emitted {
            effects.send(effect);
        }
    }
}
