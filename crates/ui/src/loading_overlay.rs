//! Loading overlay shown until every tracked asset has settled.
//!
//! A full-screen dimmed layer swallows input while the table is not built
//! yet, with a centered message and animated dots so the page does not look
//! frozen during texture downloads.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use table::loading::LoadBarrier;

use crate::theme;

/// Animated dots state for the loading message.
#[derive(Resource)]
pub struct LoadingAnimation {
    /// Number of dots currently shown (cycles 1 -> 2 -> 3 -> 1 ...).
    pub dots: usize,
    pub timer: Timer,
}

impl Default for LoadingAnimation {
    fn default() -> Self {
        Self {
            dots: 1,
            timer: Timer::from_seconds(0.4, TimerMode::Repeating),
        }
    }
}

impl LoadingAnimation {
    pub fn advance(&mut self, delta: std::time::Duration) {
        self.timer.tick(delta);
        if self.timer.just_finished() {
            self.dots = self.dots % 3 + 1;
        }
    }

    pub fn message(&self) -> String {
        format!("Loading{}", ".".repeat(self.dots))
    }
}

/// Text under the message, e.g. `"3 / 8 assets"`.
pub fn progress_caption(barrier: &LoadBarrier) -> String {
    format!("{} / {} assets", barrier.settled(), barrier.tracked())
}

/// Runs only in `ConfiguratorPhase::Loading`.
pub fn loading_overlay_ui(
    mut contexts: EguiContexts,
    time: Res<Time>,
    barrier: Res<LoadBarrier>,
    mut animation: ResMut<LoadingAnimation>,
) {
    animation.advance(time.delta());

    let ctx = contexts.ctx_mut();
    let screen_rect = ctx.screen_rect();

    egui::Area::new(egui::Id::new("loading_overlay"))
        .fixed_pos(screen_rect.min)
        .order(egui::Order::Foreground)
        .interactable(true)
        .show(ctx, |ui| {
            ui.painter().rect_filled(
                screen_rect,
                egui::CornerRadius::ZERO,
                egui::Color32::from_black_alpha(180),
            );
            ui.allocate_rect(screen_rect, egui::Sense::click_and_drag());
        });

    egui::Window::new("loading_overlay_window")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .default_width(260.0)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(16.0);
                ui.label(
                    egui::RichText::new(animation.message())
                        .size(theme::FONT_HEADING)
                        .color(theme::TEXT_HEADING),
                );
                ui.add_space(8.0);
                ui.add(egui::ProgressBar::new(barrier.progress()).desired_width(200.0));
                ui.label(
                    egui::RichText::new(progress_caption(&barrier))
                        .size(theme::FONT_SUBTEXT)
                        .color(theme::TEXT_MUTED),
                );
                ui.add_space(16.0);
            });
        });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_dots_cycle_back_to_one() {
        let mut animation = LoadingAnimation::default();
        assert_eq!(animation.message(), "Loading.");
        for _ in 0..3 {
            animation.advance(Duration::from_millis(400));
        }
        assert_eq!(animation.dots, 1, "three ticks should wrap 1 -> 2 -> 3 -> 1");
    }

    #[test]
    fn test_partial_tick_keeps_dots() {
        let mut animation = LoadingAnimation::default();
        animation.advance(Duration::from_millis(100));
        assert_eq!(animation.dots, 1);
    }

    #[test]
    fn test_progress_caption_counts_settled() {
        let mut barrier = LoadBarrier::default();
        barrier.track();
        barrier.track();
        barrier.settle();
        assert_eq!(progress_caption(&barrier), "1 / 2 assets");
    }
}
