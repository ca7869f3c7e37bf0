use bevy::prelude::*;

/// Warm key light, `#fff4c9`.
const KEY_LIGHT_COLOR: Color = Color::srgb(1.0, 0.957, 0.788);
const KEY_LIGHT_DIRECTION_FROM: Vec3 = Vec3::new(1.0, 1.0, 0.0);
const FILL_LIGHT_DIRECTION_FROM: Vec3 = Vec3::new(-1.0, -1.0, 0.0);
const DIRECTIONAL_ILLUMINANCE: f32 = 4000.0;
const AMBIENT_BRIGHTNESS: f32 = 500.0;

/// Ground half of the sky/ground hemisphere, `#444444`. The sky half is the
/// white ambient term; this one lights surfaces facing down.
const GROUND_BOUNCE_COLOR: Color = Color::srgb(0.267, 0.267, 0.267);
const GROUND_BOUNCE_DIRECTION_FROM: Vec3 = Vec3::new(0.0, -1.0, 0.0);
const GROUND_BOUNCE_ILLUMINANCE: f32 = 1000.0;

/// Directional lights as (color, position the light shines from, lux).
pub fn directional_lights() -> [(Color, Vec3, f32); 3] {
    [
        (KEY_LIGHT_COLOR, KEY_LIGHT_DIRECTION_FROM, DIRECTIONAL_ILLUMINANCE),
        (Color::WHITE, FILL_LIGHT_DIRECTION_FROM, DIRECTIONAL_ILLUMINANCE),
        (
            GROUND_BOUNCE_COLOR,
            GROUND_BOUNCE_DIRECTION_FROM,
            GROUND_BOUNCE_ILLUMINANCE,
        ),
    ]
}

pub fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
    });

    for (color, from, illuminance) in directional_lights() {
        commands.spawn((
            DirectionalLight {
                color,
                illuminance,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(from).looking_at(Vec3::ZERO, Vec3::Z),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_spawns_key_fill_and_ground_lights() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Startup, setup_lighting);
        app.update();

        let ambient = app.world().resource::<AmbientLight>();
        assert_eq!(ambient.brightness, AMBIENT_BRIGHTNESS);

        let world = app.world_mut();
        let mut lights = world.query::<(&DirectionalLight, &Transform)>();
        assert_eq!(lights.iter(world).count(), 3);

        let ground_facing_up = lights.iter(world).any(|(light, transform)| {
            light.color == GROUND_BOUNCE_COLOR && transform.forward().y > 0.99
        });
        assert!(ground_facing_up, "ground bounce light should shine upward");
    }
}
