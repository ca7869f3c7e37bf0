use bevy_egui::{egui, EguiContexts};

/// Panel background, `#EFF6E0`.
pub const PANEL_FILL: egui::Color32 = egui::Color32::from_rgb(0xef, 0xf6, 0xe0);
/// Hovered widgets, `#AEC3B0`.
pub const HOVER_FILL: egui::Color32 = egui::Color32::from_rgb(0xae, 0xc3, 0xb0);
/// Pressed widgets and headings, `#124559`.
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x12, 0x45, 0x59);
/// Secondary text, `#598392`.
pub const TEXT_MUTED: egui::Color32 = egui::Color32::from_rgb(0x59, 0x83, 0x92);
pub const TEXT_HEADING: egui::Color32 = egui::Color32::from_rgb(0x01, 0x16, 0x1e);

pub const DOT_ACTIVE: egui::Color32 = egui::Color32::from_rgb(0xff, 0xe9, 0xa0);
pub const DOT_INACTIVE: egui::Color32 = egui::Color32::from_rgba_premultiplied(15, 15, 15, 77);

pub const FONT_HEADING: f32 = 22.0;
pub const FONT_BODY: f32 = 15.0;
pub const FONT_SUBTEXT: f32 = 13.0;

pub fn apply_configurator_theme(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::light();
    style.visuals.window_fill = PANEL_FILL;
    style.visuals.panel_fill = PANEL_FILL;
    style.visuals.widgets.noninteractive.bg_fill = PANEL_FILL;
    style.visuals.widgets.inactive.weak_bg_fill = PANEL_FILL;
    style.visuals.widgets.hovered.weak_bg_fill = HOVER_FILL;
    style.visuals.widgets.hovered.bg_fill = HOVER_FILL;
    style.visuals.widgets.active.weak_bg_fill = ACCENT;
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.selection.bg_fill = HOVER_FILL;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, ACCENT);

    // egui 0.31 takes u8 corner radii.
    let rounding = egui::CornerRadius::same(10);
    style.visuals.window_corner_radius = rounding;
    style.visuals.widgets.inactive.corner_radius = rounding;
    style.visuals.widgets.hovered.corner_radius = rounding;
    style.visuals.widgets.active.corner_radius = rounding;

    ctx.set_style(style);
}
