//! Texture loading for the appearance sets, backdrop and environment.
//!
//! Every request is issued through `AssetServer` at startup and registered
//! with the [`LoadBarrier`]. Loads settle independently; a failed channel is
//! logged and simply left out of its material.

use bevy::asset::{LoadState, UntypedAssetId};
use bevy::image::{
    ImageAddressMode, ImageFilterMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor,
};
use bevy::prelude::*;

use table::appearance::{AppearanceKind, MaterialBank, TextureChannel, TextureChannels};
use table::config::{TableParams, TextureSetSource};
use table::loading::LoadBarrier;

const ANISOTROPY_CLAMP: u16 = 16;

// =============================================================================
// Load tracking
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Pending,
    Loaded,
    Failed,
}

impl LoadOutcome {
    /// Maps an asset server load state to an outcome. Only `Loaded` and
    /// `Failed` are final.
    pub fn from_state(state: &LoadState) -> Self {
        match state {
            LoadState::Loaded => LoadOutcome::Loaded,
            LoadState::Failed(_) => LoadOutcome::Failed,
            _ => LoadOutcome::Pending,
        }
    }
}

#[derive(Debug)]
struct TrackedLoad {
    handle: UntypedHandle,
    label: String,
    outcome: LoadOutcome,
}

/// Every load the configurator waits on before becoming ready.
#[derive(Resource, Debug, Default)]
pub struct TrackedLoads {
    loads: Vec<TrackedLoad>,
}

impl TrackedLoads {
    /// Registers `handle` with the barrier and keeps it alive.
    pub fn track(
        &mut self,
        handle: impl Into<UntypedHandle>,
        label: impl Into<String>,
        barrier: &mut LoadBarrier,
    ) {
        barrier.track();
        self.loads.push(TrackedLoad {
            handle: handle.into(),
            label: label.into(),
            outcome: LoadOutcome::Pending,
        });
    }

    pub fn outcome(&self, id: impl Into<UntypedAssetId>) -> Option<LoadOutcome> {
        let id = id.into();
        self.loads
            .iter()
            .find(|load| load.handle.id() == id)
            .map(|load| load.outcome)
    }

    /// Records a final outcome. Returns `true` if the load was still pending.
    pub fn resolve(&mut self, id: impl Into<UntypedAssetId>, outcome: LoadOutcome) -> bool {
        let id = id.into();
        match self.loads.iter_mut().find(|load| load.handle.id() == id) {
            Some(load) if load.outcome == LoadOutcome::Pending && outcome != LoadOutcome::Pending => {
                load.outcome = outcome;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.loads
            .iter()
            .filter(|load| load.outcome == LoadOutcome::Pending)
            .count()
    }
}

// =============================================================================
// Texture sets
// =============================================================================

/// One appearance waiting for its channels.
#[derive(Debug, Clone)]
pub struct TextureSetRequest {
    pub kind: AppearanceKind,
    pub channels: Vec<(TextureChannel, Handle<Image>)>,
    pub built: bool,
}

#[derive(Resource, Debug, Default)]
pub struct TextureSetRequests(pub Vec<TextureSetRequest>);

/// Repeat wrapping, linear filtering, anisotropy 16.
pub fn texture_sampler() -> ImageSamplerDescriptor {
    ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        address_mode_w: ImageAddressMode::Repeat,
        mag_filter: ImageFilterMode::Linear,
        min_filter: ImageFilterMode::Linear,
        mipmap_filter: ImageFilterMode::Linear,
        anisotropy_clamp: ANISOTROPY_CLAMP,
        ..default()
    }
}

pub fn channel_path(source: &TextureSetSource, channel: TextureChannel) -> String {
    match channel {
        TextureChannel::Diffuse => source.diffuse(),
        TextureChannel::AmbientOcclusion => source.ambient_occlusion(),
        TextureChannel::Displacement => source.displacement(),
        TextureChannel::Arm => source.arm(),
        TextureChannel::Normal => source.normal(),
        TextureChannel::Roughness => source.roughness(),
    }
}

/// EXR channels go through the EXR loader, which has no sampler or color
/// space settings; their sampler is patched once loaded.
pub fn is_exr(channel: TextureChannel) -> bool {
    matches!(channel, TextureChannel::Normal | TextureChannel::Roughness)
}

/// Loads a raster image with the shared sampler and the given color space.
pub fn load_raster(asset_server: &AssetServer, path: String, is_srgb: bool) -> Handle<Image> {
    asset_server.load_with_settings(path, move |settings: &mut ImageLoaderSettings| {
        settings.is_srgb = is_srgb;
        settings.sampler = ImageSampler::Descriptor(texture_sampler());
    })
}

/// Startup: requests every channel of the wood and plaster sets.
pub fn request_texture_sets(
    asset_server: Res<AssetServer>,
    params: Res<TableParams>,
    mut barrier: ResMut<LoadBarrier>,
    mut loads: ResMut<TrackedLoads>,
    mut requests: ResMut<TextureSetRequests>,
) {
    let sets = [
        (AppearanceKind::Wood, &params.textures.wood),
        (AppearanceKind::Plaster, &params.textures.plaster),
    ];
    for (kind, source) in sets {
        let mut channels = Vec::with_capacity(TextureChannel::ALL.len());
        for channel in TextureChannel::ALL {
            let path = channel_path(source, channel);
            let handle: Handle<Image> = if is_exr(channel) {
                asset_server.load(path.clone())
            } else {
                load_raster(&asset_server, path.clone(), channel.is_srgb())
            };
            loads.track(handle.clone(), path, &mut barrier);
            channels.push((channel, handle));
        }
        requests.0.push(TextureSetRequest {
            kind,
            channels,
            built: false,
        });
    }
}

/// PostStartup: no more loads will be requested.
pub fn finish_load_scheduling(mut barrier: ResMut<LoadBarrier>, loads: Res<TrackedLoads>) {
    barrier.finish_scheduling();
    info!("Waiting on {} asset loads", loads.pending());
}

/// Settles loads as the asset server reports them loaded or failed. Each
/// load settles the barrier exactly once.
pub fn poll_tracked_loads(
    asset_server: Res<AssetServer>,
    mut loads: ResMut<TrackedLoads>,
    mut barrier: ResMut<LoadBarrier>,
) {
    let finished: Vec<(UntypedAssetId, LoadOutcome)> = loads
        .loads
        .iter()
        .filter(|load| load.outcome == LoadOutcome::Pending)
        .filter_map(|load| {
            let state = asset_server.get_load_state(load.handle.id())?;
            let outcome = LoadOutcome::from_state(&state);
            if let LoadState::Failed(err) = &state {
                warn!("Failed to load {}: {}", load.label, err);
            }
            (outcome != LoadOutcome::Pending).then_some((load.handle.id(), outcome))
        })
        .collect();

    for (id, outcome) in finished {
        if loads.resolve(id, outcome) {
            barrier.settle();
        }
    }
}

/// Gathers the successfully loaded channels of a request. Returns `None`
/// while any channel is still pending.
pub fn settled_channels(request: &TextureSetRequest, loads: &TrackedLoads) -> Option<TextureChannels> {
    let mut channels = TextureChannels::default();
    for (channel, handle) in &request.channels {
        match loads.outcome(handle.id()) {
            Some(LoadOutcome::Loaded) => channels.set(*channel, Some(handle.clone())),
            Some(LoadOutcome::Failed) => {}
            Some(LoadOutcome::Pending) | None => return None,
        }
    }
    Some(channels)
}

/// Builds a bank appearance as soon as all of its channels have settled.
pub fn build_texture_sets(
    mut requests: ResMut<TextureSetRequests>,
    loads: Res<TrackedLoads>,
    bank: Option<Res<MaterialBank>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    let Some(bank) = bank else {
        return;
    };
    for request in requests.0.iter_mut().filter(|r| !r.built) {
        let Some(channels) = settled_channels(request, &loads) else {
            continue;
        };
        for channel in TextureChannel::ALL.into_iter().filter(|c| is_exr(*c)) {
            if let Some(image) = channels.get(channel).and_then(|h| images.get_mut(h)) {
                image.sampler = ImageSampler::Descriptor(texture_sampler());
            }
        }
        bank.install(request.kind, &channels, &mut materials);
        request.built = true;
        let present = TextureChannel::ALL
            .into_iter()
            .filter(|c| channels.get(*c).is_some())
            .count();
        info!(
            "Built {} appearance from {present}/{} channels",
            request.kind.name(),
            TextureChannel::ALL.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::asset::AssetPlugin;
    use bevy::state::app::StatesPlugin;

    use super::*;
    use table::appearance::init_material_bank;
    use table::loading::{advance_when_settled, ConfiguratorPhase};

    #[test]
    fn test_channel_paths_follow_set_naming() {
        let source = TextureSetSource::new("textures/wood_table/", "wood_table_001");
        assert_eq!(
            channel_path(&source, TextureChannel::Diffuse),
            "textures/wood_table/wood_table_001_diff_1k.jpg"
        );
        assert_eq!(
            channel_path(&source, TextureChannel::Normal),
            "textures/wood_table/wood_table_001_nor_gl_1k.exr"
        );
        assert!(is_exr(TextureChannel::Roughness));
        assert!(!is_exr(TextureChannel::Arm));
    }

    #[test]
    fn test_sampler_repeats_with_anisotropy() {
        let sampler = texture_sampler();
        assert_eq!(sampler.address_mode_u, ImageAddressMode::Repeat);
        assert_eq!(sampler.address_mode_v, ImageAddressMode::Repeat);
        assert_eq!(sampler.anisotropy_clamp, 16);
    }

    #[test]
    fn test_only_final_states_settle() {
        assert_eq!(LoadOutcome::from_state(&LoadState::Loaded), LoadOutcome::Loaded);
        assert_eq!(LoadOutcome::from_state(&LoadState::Loading), LoadOutcome::Pending);
        assert_eq!(LoadOutcome::from_state(&LoadState::NotLoaded), LoadOutcome::Pending);
    }

    #[test]
    fn test_resolve_counts_each_load_once() {
        let mut images = Assets::<Image>::default();
        let mut barrier = LoadBarrier::default();
        let mut loads = TrackedLoads::default();
        let handle = images.add(Image::default());
        loads.track(handle.clone(), "a.png", &mut barrier);
        assert_eq!(barrier.tracked(), 1);
        assert!(loads.resolve(handle.id(), LoadOutcome::Loaded));
        assert!(!loads.resolve(handle.id(), LoadOutcome::Failed));
        assert_eq!(loads.outcome(handle.id()), Some(LoadOutcome::Loaded));
        assert_eq!(loads.pending(), 0);
    }

    #[test]
    fn test_failed_channels_are_left_out() {
        let mut images = Assets::<Image>::default();
        let mut barrier = LoadBarrier::default();
        let mut loads = TrackedLoads::default();
        let diffuse = images.add(Image::default());
        let normal = images.add(Image::default());
        loads.track(diffuse.clone(), "diff", &mut barrier);
        loads.track(normal.clone(), "normal", &mut barrier);
        let request = TextureSetRequest {
            kind: AppearanceKind::Wood,
            channels: vec![
                (TextureChannel::Diffuse, diffuse.clone()),
                (TextureChannel::Normal, normal.clone()),
            ],
            built: false,
        };

        assert!(settled_channels(&request, &loads).is_none(), "still pending");
        loads.resolve(diffuse.id(), LoadOutcome::Loaded);
        loads.resolve(normal.id(), LoadOutcome::Failed);
        let channels = settled_channels(&request, &loads).expect("settled");
        assert_eq!(channels.diffuse, Some(diffuse));
        assert!(channels.normal.is_none());
    }

    #[test]
    fn test_settled_set_is_installed_into_bank() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()));
        app.init_asset::<Image>();
        app.init_asset::<StandardMaterial>();
        app.init_resource::<TrackedLoads>();
        app.init_resource::<TextureSetRequests>();
        app.add_systems(Startup, init_material_bank);
        app.add_systems(Update, build_texture_sets);
        app.update();

        let diffuse = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(Image::default());
        let mut barrier = LoadBarrier::default();
        {
            let mut loads = app.world_mut().resource_mut::<TrackedLoads>();
            loads.track(diffuse.clone(), "diff", &mut barrier);
            loads.resolve(diffuse.id(), LoadOutcome::Loaded);
        }
        app.world_mut()
            .resource_mut::<TextureSetRequests>()
            .0
            .push(TextureSetRequest {
                kind: AppearanceKind::Plaster,
                channels: vec![(TextureChannel::Diffuse, diffuse.clone())],
                built: false,
            });
        app.update();

        assert!(app.world().resource::<TextureSetRequests>().0[0].built);
        let handle = app
            .world()
            .resource::<MaterialBank>()
            .get(AppearanceKind::Plaster)
            .expect("plaster handle");
        let material = app
            .world()
            .resource::<Assets<StandardMaterial>>()
            .get(&handle)
            .expect("plaster material");
        assert_eq!(material.base_color_texture, Some(diffuse));
    }

    #[test]
    fn test_failed_load_settles_once_and_reaches_ready() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin));
        app.init_asset::<Image>();
        app.init_state::<ConfiguratorPhase>();
        app.init_resource::<LoadBarrier>();
        app.init_resource::<TrackedLoads>();
        app.add_systems(Update, (poll_tracked_loads, advance_when_settled).chain());

        let handle: Handle<Image> = app
            .world()
            .resource::<AssetServer>()
            .load("textures/missing/not_there_diff_1k.jpg");
        app.world_mut()
            .resource_scope(|world, mut loads: Mut<TrackedLoads>| {
                let mut barrier = world.resource_mut::<LoadBarrier>();
                loads.track(handle.clone(), "not_there_diff_1k.jpg", &mut barrier);
                barrier.finish_scheduling();
            });

        let phase = |app: &App| *app.world().resource::<State<ConfiguratorPhase>>().get();
        for _ in 0..500 {
            app.update();
            if phase(&app) == ConfiguratorPhase::Ready {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        // Polling after settling must not count the load again.
        app.update();

        assert_eq!(
            app.world().resource::<TrackedLoads>().outcome(handle.id()),
            Some(LoadOutcome::Failed)
        );
        let barrier = app.world().resource::<LoadBarrier>();
        assert_eq!(barrier.settled(), 1, "failed load should settle exactly once");
        assert_eq!(barrier.tracked(), 1);
        assert_eq!(phase(&app), ConfiguratorPhase::Ready);
    }
}
