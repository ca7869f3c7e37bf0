//! The three selector widgets: top appearance, base appearance, top shape.
//!
//! Clicking a widget's body cycles to the next option; clicking one of its
//! dots jumps to that option. Every change emits the matching
//! [`TableCommand`].

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use table::assembly::TableCommand;

use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    TopAppearance,
    BaseAppearance,
    TopShape,
}

impl SelectorKind {
    pub fn title(self) -> &'static str {
        match self {
            SelectorKind::TopAppearance => "Top",
            SelectorKind::BaseAppearance => "Base",
            SelectorKind::TopShape => "Shape",
        }
    }

    pub fn command(self, key: &str) -> TableCommand {
        let key = key.to_string();
        match self {
            SelectorKind::TopAppearance => TableCommand::SetTopAppearance(key),
            SelectorKind::BaseAppearance => TableCommand::SetBaseAppearance(key),
            SelectorKind::TopShape => TableCommand::SetTopShape(key),
        }
    }
}

/// One option: display label and the key passed to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorOption {
    pub label: &'static str,
    pub key: &'static str,
}

const TOP_APPEARANCES: &[SelectorOption] = &[
    SelectorOption { label: "Glass", key: "glass" },
    SelectorOption { label: "Veneer Wood", key: "wood" },
    SelectorOption { label: "Plaster", key: "plaster" },
];

const BASE_APPEARANCES: &[SelectorOption] = &[
    SelectorOption { label: "Veneer Wood", key: "wood" },
    SelectorOption { label: "Plaster", key: "plaster" },
];

const TOP_SHAPES: &[SelectorOption] = &[
    SelectorOption { label: "Circle", key: "circle" },
    SelectorOption { label: "Ellipse", key: "ellipse" },
    SelectorOption { label: "Rectangle", key: "rectangle" },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub kind: SelectorKind,
    pub options: &'static [SelectorOption],
    pub selected: usize,
}

impl Selector {
    /// Creates a selector; an out-of-range default is clamped.
    pub fn new(kind: SelectorKind, options: &'static [SelectorOption], selected: usize) -> Self {
        Self {
            kind,
            options,
            selected: selected.min(options.len().saturating_sub(1)),
        }
    }

    pub fn current(&self) -> Option<SelectorOption> {
        self.options.get(self.selected).copied()
    }

    /// Advances to the next option, wrapping around.
    pub fn cycle(&mut self) -> Option<TableCommand> {
        if self.options.is_empty() {
            return None;
        }
        self.selected = (self.selected + 1) % self.options.len();
        self.command()
    }

    /// Jumps to `index`. Selecting the current or a missing option does nothing.
    pub fn select(&mut self, index: usize) -> Option<TableCommand> {
        if index == self.selected || index >= self.options.len() {
            return None;
        }
        self.selected = index;
        self.command()
    }

    pub fn command(&self) -> Option<TableCommand> {
        self.current().map(|option| self.kind.command(option.key))
    }
}

#[derive(Resource, Debug, Clone)]
pub struct Selectors(pub [Selector; 3]);

impl Default for Selectors {
    fn default() -> Self {
        Self([
            Selector::new(SelectorKind::TopAppearance, TOP_APPEARANCES, 1),
            Selector::new(SelectorKind::BaseAppearance, BASE_APPEARANCES, 1),
            Selector::new(SelectorKind::TopShape, TOP_SHAPES, 1),
        ])
    }
}

/// Applies every selector's starting option once the table exists.
pub fn apply_initial_selections(selectors: Res<Selectors>, mut commands: EventWriter<TableCommand>) {
    for command in selectors.0.iter().filter_map(Selector::command) {
        commands.send(command);
    }
}

fn dot(ui: &mut egui::Ui, active: bool) -> egui::Response {
    let size = egui::vec2(10.0, 10.0);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    let color = if active {
        theme::DOT_ACTIVE
    } else {
        theme::DOT_INACTIVE
    };
    ui.painter().circle_filled(rect.center(), 4.0, color);
    response
}

pub fn selectors_ui(
    mut contexts: EguiContexts,
    mut selectors: ResMut<Selectors>,
    mut commands: EventWriter<TableCommand>,
) {
    let ctx = contexts.ctx_mut();
    let mut emitted = Vec::new();

    egui::Area::new(egui::Id::new("selectors"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for selector in selectors.0.iter_mut() {
                    egui::Frame::window(ui.style()).show(ui, |ui| {
                        ui.set_min_width(140.0);
                        ui.vertical_centered(|ui| {
                            let label = selector.current().map_or("", |option| option.label);
                            let body = ui.add(
                                egui::Button::new(
                                    egui::RichText::new(format!(
                                        "{}\n{}",
                                        selector.kind.title(),
                                        label
                                    ))
                                    .size(theme::FONT_BODY)
                                    .color(theme::TEXT_HEADING),
                                )
                                .frame(false),
                            );
                            if body.clicked() {
                                emitted.extend(selector.cycle());
                            }

                            ui.horizontal(|ui| {
                                for index in 0..selector.options.len() {
                                    if dot(ui, index == selector.selected).clicked() {
                                        emitted.extend(selector.select(index));
                                    }
                                }
                            });
                        });
                    });
                }
            });
        });

    for command in emitted {
        commands.send(command);
    }
}
