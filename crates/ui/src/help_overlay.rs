//! Help button and the controls legend it toggles.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::theme;

/// Whether the controls legend is visible.
#[derive(Resource, Default)]
pub struct HelpOverlayOpen(pub bool);

impl HelpOverlayOpen {
    pub fn toggle(&mut self) {
        self.0 = !self.0;
    }
}

/// Control, description.
pub const CONTROLS: &[(&str, &str)] = &[
    ("Left drag", "Orbit around the table"),
    ("Right drag", "Pan"),
    ("Mouse wheel", "Zoom"),
    ("Click a part", "Show its scale handles"),
    ("Drag a handle", "Resize the part"),
    ("Shift + drag", "Keep width and depth equal"),
    ("Click empty space / Esc", "Hide the handles"),
    ("Click a selector", "Next option"),
    ("Click a dot", "Pick that option"),
];

/// F1 toggles the legend; Escape closes it.
pub fn toggle_help_overlay(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut open: ResMut<HelpOverlayOpen>,
) {
    let Some(keys) = keys else {
        return;
    };
    if keys.just_pressed(KeyCode::F1) {
        open.toggle();
    }
    if open.0 && keys.just_pressed(KeyCode::Escape) {
        open.0 = false;
    }
}

pub fn help_overlay_ui(mut contexts: EguiContexts, mut open: ResMut<HelpOverlayOpen>) {
    let ctx = contexts.ctx_mut();

    egui::Area::new(egui::Id::new("help_button"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
        .show(ctx, |ui| {
            let label = egui::RichText::new("?").size(theme::FONT_HEADING).strong();
            if ui.add(egui::Button::new(label).selected(open.0)).clicked() {
                open.toggle();
            }
        });

    if !open.0 {
        return;
    }

    let mut should_close = false;
    egui::Window::new("Controls")
        .collapsible(false)
        .resizable(false)
        .default_width(340.0)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 64.0))
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 2.0;
            for (control, action) in CONTROLS {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(*action)
                            .size(theme::FONT_BODY)
                            .color(theme::TEXT_HEADING),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(*control)
                                .size(theme::FONT_SUBTEXT)
                                .color(theme::ACCENT)
                                .monospace(),
                        );
                    });
                });
            }
            ui.add_space(8.0);
            if ui.button("Close").clicked() {
                should_close = true;
            }
        });

    if should_close {
        open.0 = false;
    }
}
