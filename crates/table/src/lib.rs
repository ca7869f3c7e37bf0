//! Core of the coffee table configurator.
//!
//! Procedural part geometry and UV projection, the material bank, the part
//! assembly and the scale-transform session. Engine-facing systems (camera,
//! texture loading, gizmo, picking input) live in the `rendering` crate; the
//! UI shell lives in `ui`.

use bevy::prelude::*;

pub mod appearance;
pub mod assembly;
pub mod config;
pub mod error;
pub mod geometry;
pub mod loading;
pub mod parts;
pub mod picking;
pub mod session;
pub mod uv;

pub use appearance::{AppearanceKind, MaterialBank, TextureChannel, TextureChannels};
pub use assembly::{TableAssembly, TableCommand};
pub use config::TableParams;
pub use error::ConfiguratorError;
pub use loading::{ConfiguratorPhase, LoadBarrier};
pub use parts::{PartCategory, PartKind, TopShape};
pub use picking::PointerGesture;
pub use session::{SessionEffect, SessionEvent, TransformSession};

/// System ordering inside `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableSet {
    /// Pointer and keyboard systems that emit `SessionEvent`s.
    Input,
    /// `TableCommand` handling.
    Commands,
    /// Session state machine.
    Session,
}

pub struct TablePlugin;

impl Plugin for TablePlugin {
    fn build(&self, app: &mut App) {
        // `init_resource` keeps a `TableParams` inserted by the binary.
        app.init_resource::<TableParams>()
            .init_resource::<LoadBarrier>()
            .init_resource::<TransformSession>()
            .init_resource::<PointerGesture>()
            .init_state::<ConfiguratorPhase>()
            .add_event::<TableCommand>()
            .add_event::<SessionEvent>()
            .add_event::<SessionEffect>()
            .configure_sets(
                Update,
                (TableSet::Input, TableSet::Commands, TableSet::Session).chain(),
            )
            .add_systems(Startup, appearance::init_material_bank)
            .add_systems(OnEnter(ConfiguratorPhase::Ready), assembly::spawn_table)
            .add_systems(
                Update,
                (
                    loading::advance_when_settled.run_if(in_state(ConfiguratorPhase::Loading)),
                    assembly::apply_table_commands.in_set(TableSet::Commands),
                    session::apply_session_events.in_set(TableSet::Session),
                ),
            );
    }
}
