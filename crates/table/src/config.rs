use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfiguratorError;

// =============================================================================
// Table dimensions
// =============================================================================

pub const DEFAULT_TOP_WIDTH: f32 = 1.0;
pub const DEFAULT_BASE_HEIGHT: f32 = 0.8;
pub const DEFAULT_BEVEL: f32 = 0.01;
pub const DEFAULT_BEVEL_HEIGHT: f32 = 0.04;
pub const DEFAULT_BASE_TOP_WIDTH: f32 = 0.45;
pub const DEFAULT_BASE_BOTTOM_WIDTH: f32 = 0.7;

/// Ellipse radii as multiples of the top width (major along X, minor along Z).
pub const ELLIPSE_RADIUS_X_FACTOR: f32 = 1.6;
pub const ELLIPSE_RADIUS_Z_FACTOR: f32 = 1.0;

/// Rectangle side as a multiple of the top width.
pub const RECTANGLE_SIDE_FACTOR: f32 = 2.0;

/// Radial segments used for every round profile (circle top, trunk, footer).
pub const RADIAL_SEGMENTS: u32 = 64;
/// Curve segments used when sampling the ellipse outline.
pub const ELLIPSE_CURVE_SEGMENTS: u32 = 64;

// =============================================================================
// UV projection
// =============================================================================

/// Floor applied to bounding-box spans and the polar radius.
pub const UV_SPAN_EPSILON: f32 = 1e-6;

// =============================================================================
// Scale bounds
// =============================================================================

pub const TOP_SCALE_MIN: f32 = 0.6;
pub const TOP_SCALE_MAX: f32 = 1.5;
pub const BASE_SCALE_MIN: f32 = 0.8;
pub const BASE_SCALE_MAX: f32 = 1.2;

/// Increment the gizmo snaps scale values to while dragging.
pub const SCALE_SNAP: f32 = 0.1;

// =============================================================================
// Click classification
// =============================================================================

/// A press/release pair must be strictly shorter than this to count as a click.
pub const CLICK_MAX_DURATION_MS: f64 = 200.0;
/// A press/release pair must move strictly less than this to count as a click.
pub const CLICK_MAX_DISTANCE_PX: f32 = 6.0;

// =============================================================================
// Camera
// =============================================================================

pub const CAMERA_START: Vec3 = Vec3::new(1.0, 1.0, 2.0);
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_MIN_DISTANCE: f32 = 2.0;
pub const CAMERA_MAX_DISTANCE: f32 = 15.0;

/// Environment variable naming an optional JSON file with [`TableParams`].
pub const CONFIG_ENV_VAR: &str = "COFFEE_TABLE_CONFIG";

// =============================================================================
// Runtime parameters
// =============================================================================

/// Where a PBR texture set lives. File names follow the
/// `<base_path><base_name>_<channel>_1k.<ext>` convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureSetSource {
    pub base_path: String,
    pub base_name: String,
}

impl TextureSetSource {
    pub fn new(base_path: impl Into<String>, base_name: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            base_name: base_name.into(),
        }
    }

    fn file(&self, suffix: &str) -> String {
        format!("{}{}_{}", self.base_path, self.base_name, suffix)
    }

    pub fn diffuse(&self) -> String {
        self.file("diff_1k.jpg")
    }

    pub fn ambient_occlusion(&self) -> String {
        self.file("ao_1k.jpg")
    }

    pub fn arm(&self) -> String {
        self.file("arm_1k.jpg")
    }

    pub fn displacement(&self) -> String {
        self.file("disp_1k.png")
    }

    pub fn normal(&self) -> String {
        self.file("nor_gl_1k.exr")
    }

    pub fn roughness(&self) -> String {
        self.file("rough_1k.exr")
    }
}

/// Texture sources for the textured appearances and the scene decoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureLibrary {
    pub wood: TextureSetSource,
    pub plaster: TextureSetSource,
    pub backdrop: String,
    pub environment_diffuse: String,
    pub environment_specular: String,
}

impl Default for TextureLibrary {
    fn default() -> Self {
        Self {
            wood: TextureSetSource::new("textures/wood_table/", "wood_table_001"),
            plaster: TextureSetSource::new("textures/plastered_wall/", "plastered_wall_03"),
            backdrop: "textures/graph_paper.jpg".to_string(),
            environment_diffuse: "textures/pine_attic_diffuse_rgb9e5_zstd.ktx2".to_string(),
            environment_specular: "textures/pine_attic_specular_rgb9e5_zstd.ktx2".to_string(),
        }
    }
}

/// Dimensions and options the table is built from.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableParams {
    pub top_width: f32,
    pub base_height: f32,
    pub bevel: f32,
    pub bevel_height: f32,
    pub base_top_width: f32,
    pub base_bottom_width: f32,
    /// Map the circle top with the polar projection instead of the planar one.
    pub polar_circle_uvs: bool,
    /// Symmetric margin applied to every UV projection.
    pub uv_padding: f32,
    pub textures: TextureLibrary,
}

impl Default for TableParams {
    fn default() -> Self {
        Self {
            top_width: DEFAULT_TOP_WIDTH,
            base_height: DEFAULT_BASE_HEIGHT,
            bevel: DEFAULT_BEVEL,
            bevel_height: DEFAULT_BEVEL_HEIGHT,
            base_top_width: DEFAULT_BASE_TOP_WIDTH,
            base_bottom_width: DEFAULT_BASE_BOTTOM_WIDTH,
            polar_circle_uvs: false,
            uv_padding: 0.0,
            textures: TextureLibrary::default(),
        }
    }
}

impl TableParams {
    /// Height of a top's center above the table center.
    pub fn top_offset(&self) -> f32 {
        (self.base_height + self.bevel_height) / 2.0
    }

    /// Height of the footer's center relative to the base group.
    pub fn footer_offset(&self) -> f32 {
        -(self.base_height + self.bevel_height) / 2.0
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfiguratorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfiguratorError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
