//! Material bank: the named surface appearances parts can wear.
//!
//! `glass` is a fixed translucent material. `wood` and `plaster` are built
//! from PBR texture sets once every channel load has settled. Until then
//! their handles hold a neutral placeholder, so parts can already share them.

use std::collections::HashMap;

use bevy::pbr::UvChannel;
use bevy::prelude::*;

/// Names of the appearances in the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppearanceKind {
    Glass,
    Wood,
    Plaster,
}

impl AppearanceKind {
    pub const ALL: [AppearanceKind; 3] = [
        AppearanceKind::Glass,
        AppearanceKind::Wood,
        AppearanceKind::Plaster,
    ];

    /// Appearances built from texture sets.
    pub const TEXTURED: [AppearanceKind; 2] = [AppearanceKind::Wood, AppearanceKind::Plaster];

    pub fn name(self) -> &'static str {
        match self {
            AppearanceKind::Glass => "glass",
            AppearanceKind::Wood => "wood",
            AppearanceKind::Plaster => "plaster",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// One texture slot of a PBR set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureChannel {
    Diffuse,
    AmbientOcclusion,
    Displacement,
    /// Packed ambient occlusion (R), roughness (G), metalness (B).
    Arm,
    Normal,
    Roughness,
}

impl TextureChannel {
    pub const ALL: [TextureChannel; 6] = [
        TextureChannel::Diffuse,
        TextureChannel::AmbientOcclusion,
        TextureChannel::Displacement,
        TextureChannel::Arm,
        TextureChannel::Normal,
        TextureChannel::Roughness,
    ];

    /// Color channels are display-referred (sRGB); everything else is data.
    pub fn is_srgb(self) -> bool {
        matches!(self, TextureChannel::Diffuse)
    }
}

/// The six optional channels of a texture set. A `None` slot means the
/// channel was never requested or failed to load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureChannels {
    pub diffuse: Option<Handle<Image>>,
    pub ambient_occlusion: Option<Handle<Image>>,
    pub displacement: Option<Handle<Image>>,
    pub arm: Option<Handle<Image>>,
    pub normal: Option<Handle<Image>>,
    pub roughness: Option<Handle<Image>>,
}

impl TextureChannels {
    pub fn get(&self, channel: TextureChannel) -> Option<&Handle<Image>> {
        self.slot(channel).as_ref()
    }

    pub fn set(&mut self, channel: TextureChannel, handle: Option<Handle<Image>>) {
        *self.slot_mut(channel) = handle;
    }

    fn slot(&self, channel: TextureChannel) -> &Option<Handle<Image>> {
        match channel {
            TextureChannel::Diffuse => &self.diffuse,
            TextureChannel::AmbientOcclusion => &self.ambient_occlusion,
            TextureChannel::Displacement => &self.displacement,
            TextureChannel::Arm => &self.arm,
            TextureChannel::Normal => &self.normal,
            TextureChannel::Roughness => &self.roughness,
        }
    }

    fn slot_mut(&mut self, channel: TextureChannel) -> &mut Option<Handle<Image>> {
        match channel {
            TextureChannel::Diffuse => &mut self.diffuse,
            TextureChannel::AmbientOcclusion => &mut self.ambient_occlusion,
            TextureChannel::Displacement => &mut self.displacement,
            TextureChannel::Arm => &mut self.arm,
            TextureChannel::Normal => &mut self.normal,
            TextureChannel::Roughness => &mut self.roughness,
        }
    }

    /// Ambient occlusion, falling back to the ARM texture.
    pub fn occlusion_source(&self) -> Option<Handle<Image>> {
        self.ambient_occlusion.clone().or_else(|| self.arm.clone())
    }

    /// Roughness, falling back to the ARM texture.
    pub fn roughness_source(&self) -> Option<Handle<Image>> {
        self.roughness.clone().or_else(|| self.arm.clone())
    }
}

/// Builds a textured PBR material. Missing channels leave their slot empty.
pub fn build_appearance(channels: &TextureChannels) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: channels.diffuse.clone(),
        occlusion_texture: channels.occlusion_source(),
        occlusion_channel: UvChannel::Uv1,
        normal_map_texture: channels.normal.clone(),
        flip_normal_map_y: false,
        metallic_roughness_texture: channels.roughness_source(),
        metallic: 0.0,
        perceptual_roughness: 1.0,
        depth_map: channels.displacement.clone(),
        parallax_depth_scale: 0.0,
        ..default()
    }
}

/// Fixed translucent glass.
pub fn glass_appearance() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.5),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.1,
        metallic: 0.1,
        ..default()
    }
}

/// Flat gray stand-in used while a texture set is still loading.
pub fn placeholder_appearance() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb_u8(0x7f, 0x7f, 0x7f),
        ..default()
    }
}

/// Registry of appearance handles, shared by every part that wears them.
#[derive(Resource, Debug, Default)]
pub struct MaterialBank {
    materials: HashMap<AppearanceKind, Handle<StandardMaterial>>,
}

impl MaterialBank {
    /// Creates the bank with glass and placeholder entries for the
    /// textured appearances.
    pub fn new(materials: &mut Assets<StandardMaterial>) -> Self {
        let mut bank = Self::default();
        bank.materials
            .insert(AppearanceKind::Glass, materials.add(glass_appearance()));
        for kind in AppearanceKind::TEXTURED {
            bank.materials
                .insert(kind, materials.add(placeholder_appearance()));
        }
        bank
    }

    pub fn get(&self, kind: AppearanceKind) -> Option<Handle<StandardMaterial>> {
        self.materials.get(&kind).cloned()
    }

    /// Looks up an appearance by name; unknown names yield `None`.
    pub fn by_name(&self, name: &str) -> Option<Handle<StandardMaterial>> {
        AppearanceKind::from_name(name).and_then(|kind| self.get(kind))
    }

    /// Replaces the content behind `kind`'s handle with a material built
    /// from `channels`. Parts already holding the handle see the change.
    pub fn install(
        &self,
        kind: AppearanceKind,
        channels: &TextureChannels,
        materials: &mut Assets<StandardMaterial>,
    ) {
        let Some(handle) = self.materials.get(&kind) else {
            return;
        };
        materials.insert(handle, build_appearance(channels));
    }
}

/// Creates the bank at startup so parts can bind handles before textures
/// arrive.
pub fn init_material_bank(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(MaterialBank::new(&mut materials));
}
