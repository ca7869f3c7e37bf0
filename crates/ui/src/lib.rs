use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use table::loading::ConfiguratorPhase;
use table::TableSet;

pub mod help_overlay;
pub mod loading_overlay;
pub mod selectors;
pub mod theme;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<selectors::Selectors>()
            .init_resource::<loading_overlay::LoadingAnimation>()
            .init_resource::<help_overlay::HelpOverlayOpen>()
            .add_systems(Startup, theme::apply_configurator_theme)
            .add_systems(
                OnEnter(ConfiguratorPhase::Ready),
                selectors::apply_initial_selections,
            )
            .add_systems(
                Update,
                loading_overlay::loading_overlay_ui
                    .run_if(in_state(ConfiguratorPhase::Loading)),
            )
            .add_systems(
                Update,
                (
                    selectors::selectors_ui.in_set(TableSet::Input),
                    (
                        help_overlay::toggle_help_overlay,
                        help_overlay::help_overlay_ui,
                    )
                        .chain(),
                )
                    .run_if(in_state(ConfiguratorPhase::Ready)),
            );
    }
}
