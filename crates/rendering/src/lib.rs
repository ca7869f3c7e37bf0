//! Engine-facing systems of the configurator: camera and orbit navigation,
//! lighting, environment, texture loading, pointer picking and the scale
//! gizmo.

use bevy::prelude::*;

pub mod camera;
pub mod egui_input_guard;
pub mod environment;
pub mod gizmo;
pub mod keyboard;
pub mod lighting;
pub mod picking;
pub mod textures;

mod plugin_registration;

use camera::{CameraTarget, OrbitCamera};
use gizmo::GizmoDrag;
use keyboard::ScaleModifier;
use textures::{TextureSetRequests, TrackedLoads};

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCamera>()
            .init_resource::<CameraTarget>()
            .init_resource::<GizmoDrag>()
            .init_resource::<ScaleModifier>()
            .init_resource::<TrackedLoads>()
            .init_resource::<TextureSetRequests>();

        plugin_registration::register_rendering_systems(app);
    }
}
