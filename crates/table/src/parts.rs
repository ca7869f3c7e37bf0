//! Part identities: top shapes, part names and the scale bound class.

use bevy::prelude::*;

use crate::config::{BASE_SCALE_MAX, BASE_SCALE_MIN, TOP_SCALE_MAX, TOP_SCALE_MIN};

pub const TOP_NAME_PREFIX: &str = "tableTop_";
pub const BASE_NAME: &str = "tableBase";
pub const TRUNK_NAME: &str = "tableTrunk";
pub const FOOTER_NAME: &str = "tableFooter";
pub const TABLE_NAME: &str = "coffeeTable";

/// Names a pick is allowed to resolve to.
pub const PICKABLE_NAMES: [&str; 4] = [
    BASE_NAME,
    "tableTop_circle",
    "tableTop_rectangle",
    "tableTop_ellipse",
];

/// The interchangeable tabletop shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopShape {
    Circle,
    Ellipse,
    Rectangle,
}

impl TopShape {
    pub const ALL: [TopShape; 3] = [TopShape::Circle, TopShape::Ellipse, TopShape::Rectangle];

    pub fn name(self) -> &'static str {
        match self {
            TopShape::Circle => "circle",
            TopShape::Ellipse => "ellipse",
            TopShape::Rectangle => "rectangle",
        }
    }

    /// Parses a shape name. Only the canonical names are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shape| shape.name() == name)
    }

    /// Stable part name, e.g. `tableTop_ellipse`.
    pub fn part_name(self) -> String {
        format!("{TOP_NAME_PREFIX}{}", self.name())
    }

    /// Whether the outline looks the same under any rotation about Y.
    pub fn is_radially_symmetric(self) -> bool {
        matches!(self, TopShape::Circle)
    }
}

/// Role of an entity inside the table hierarchy.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Top(TopShape),
    /// The base group; owns the trunk and footer meshes.
    Base,
    Trunk,
    Footer,
}

impl PartKind {
    /// Category used for gizmo rules. Trunk and footer are decorative
    /// children and resolve to their base group when picked.
    pub fn category(self) -> PartCategory {
        match self {
            PartKind::Top(shape) => PartCategory::Top(shape),
            PartKind::Base | PartKind::Trunk | PartKind::Footer => PartCategory::Base,
        }
    }
}

/// Closed scale range for one part category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    pub min: f32,
    pub max: f32,
}

impl ScaleBounds {
    pub fn clamp(self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// What a transform session can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartCategory {
    Top(TopShape),
    Base,
}

impl PartCategory {
    pub fn is_top(self) -> bool {
        matches!(self, PartCategory::Top(_))
    }

    pub fn scale_bounds(self) -> ScaleBounds {
        match self {
            PartCategory::Top(_) => ScaleBounds {
                min: TOP_SCALE_MIN,
                max: TOP_SCALE_MAX,
            },
            PartCategory::Base => ScaleBounds {
                min: BASE_SCALE_MIN,
                max: BASE_SCALE_MAX,
            },
        }
    }

    /// Circle tops and the base must stay round under scaling.
    pub fn is_radially_symmetric(self) -> bool {
        match self {
            PartCategory::Top(shape) => shape.is_radially_symmetric(),
            PartCategory::Base => true,
        }
    }
}

pub fn is_pickable_name(name: &str) -> bool {
    PICKABLE_NAMES.contains(&name)
}
