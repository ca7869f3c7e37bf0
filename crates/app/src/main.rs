use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};
use bevy::winit::{UpdateMode, WinitSettings};

use table::config::CONFIG_ENV_VAR;
use table::{ConfiguratorError, TableParams};

/// Selector of the canvas the web build renders into.
#[cfg(target_arch = "wasm32")]
const CANVAS_SELECTOR: &str = "canvas.webgl";

#[cfg(target_arch = "wasm32")]
fn find_canvas() -> Result<(), ConfiguratorError> {
    let missing = || ConfiguratorError::MissingRenderTarget(CANVAS_SELECTOR.to_string());
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(missing)?;
    match document.query_selector(CANVAS_SELECTOR) {
        Ok(Some(_)) => Ok(()),
        _ => Err(missing()),
    }
}

/// Reads `TableParams` from the file named by `COFFEE_TABLE_CONFIG`, if set.
fn load_params() -> (TableParams, Option<ConfiguratorError>) {
    let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
        return (TableParams::default(), None);
    };
    match TableParams::from_json_file(&path) {
        Ok(params) => (params, None),
        Err(err) => (TableParams::default(), Some(err)),
    }
}

/// Fails when there is no primary window to render into.
fn check_render_target(window_count: usize) -> Result<(), ConfiguratorError> {
    if window_count == 0 {
        return Err(ConfiguratorError::MissingRenderTarget(
            "primary window".to_string(),
        ));
    }
    Ok(())
}

fn require_primary_window(
    windows: Query<(), With<PrimaryWindow>>,
    mut exit: EventWriter<AppExit>,
) {
    if let Err(err) = check_render_target(windows.iter().count()) {
        error!("{err}");
        exit.send(AppExit::error());
    }
}

fn main() -> Result<(), ConfiguratorError> {
    #[cfg(target_arch = "wasm32")]
    find_canvas()?;

    let (params, config_error) = load_params();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Coffee Table".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            #[cfg(target_arch = "wasm32")]
            canvas: Some(CANVAS_SELECTOR.to_string()),
            fit_canvas_to_parent: true,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::Continuous,
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    .insert_resource(params)
    .add_plugins((
        table::TablePlugin,
        rendering::RenderingPlugin,
        ui::UiPlugin,
    ))
    .add_systems(Startup, require_primary_window);

    if let Some(err) = config_error {
        let message = err.to_string();
        app.add_systems(Startup, move || {
            warn!("Falling back to default table parameters: {message}");
        });
    }

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(_) => Err(ConfiguratorError::MissingRenderTarget(
            "primary window".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_window_is_render_target_error() {
        let err = check_render_target(0).unwrap_err();
        assert!(matches!(err, ConfiguratorError::MissingRenderTarget(_)));
        assert!(check_render_target(1).is_ok());
    }

    #[test]
    fn test_require_primary_window_requests_error_exit() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_event::<AppExit>();
        app.add_systems(Update, require_primary_window);
        app.update();

        let events = app.world().resource::<Events<AppExit>>();
        let mut cursor = events.get_cursor();
        let exits: Vec<_> = cursor.read(events).cloned().collect();
        assert_eq!(exits.len(), 1);
        assert!(exits[0].is_error());
    }
}
