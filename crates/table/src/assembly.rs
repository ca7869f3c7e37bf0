//! Part assembly: builds the table hierarchy and applies the configuration
//! commands (top shape, top appearance, base appearance).

use std::collections::HashMap;

use bevy::prelude::*;

use crate::appearance::{AppearanceKind, MaterialBank};
use crate::config::TableParams;
use crate::geometry::{synthesize_footer, synthesize_top, synthesize_trunk};
use crate::parts::{
    PartCategory, PartKind, TopShape, BASE_NAME, FOOTER_NAME, TABLE_NAME, TRUNK_NAME,
};
use crate::session::{PickTarget, SessionEvent};

/// Top variant shown on a fresh table.
pub const INITIAL_TOP: TopShape = TopShape::Ellipse;

/// Requests from the UI shell. Unknown names are ignored.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    SetTopShape(String),
    SetTopAppearance(String),
    SetBaseAppearance(String),
}

/// Entities of the spawned table and the currently visible top.
#[derive(Resource, Debug, Clone)]
pub struct TableAssembly {
    pub root: Entity,
    pub tops: HashMap<TopShape, Entity>,
    pub active_top: TopShape,
    /// Base group; parent of trunk and footer.
    pub base: Entity,
    pub trunk: Entity,
    pub footer: Entity,
}

impl TableAssembly {
    pub fn top(&self, shape: TopShape) -> Option<Entity> {
        self.tops.get(&shape).copied()
    }

    pub fn active_top_entity(&self) -> Option<Entity> {
        self.top(self.active_top)
    }

    /// Meshes a pointer ray is tested against: the visible top and the
    /// base group's meshes.
    pub fn pick_candidates(&self) -> Vec<Entity> {
        self.active_top_entity()
            .into_iter()
            .chain([self.trunk, self.footer])
            .collect()
    }

    /// Pick target for the named part entity, if it is the active top or
    /// the base group.
    pub fn pick_target(&self, entity: Entity) -> Option<PickTarget> {
        if entity == self.base {
            return Some(PickTarget {
                entity,
                category: PartCategory::Base,
            });
        }
        (self.active_top_entity() == Some(entity)).then_some(PickTarget {
            entity,
            category: PartCategory::Top(self.active_top),
        })
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Spawns the whole table and returns its assembly record.
///
/// Tops sit at `top_offset()` above the base center, the footer at
/// `footer_offset()`. Tops wear `wood`, the base parts `plaster`.
pub fn create_table(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    bank: &MaterialBank,
    params: &TableParams,
) -> TableAssembly {
    let wood = bank.get(AppearanceKind::Wood).unwrap_or_default();
    let plaster = bank.get(AppearanceKind::Plaster).unwrap_or_default();

    let root = commands
        .spawn((
            Name::new(TABLE_NAME),
            Transform::IDENTITY,
            Visibility::Visible,
        ))
        .id();

    let mut tops = HashMap::new();
    for shape in TopShape::ALL {
        let visibility = if shape == INITIAL_TOP {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        let top = commands
            .spawn((
                Name::new(shape.part_name()),
                PartKind::Top(shape),
                Mesh3d(meshes.add(synthesize_top(shape, params))),
                MeshMaterial3d(wood.clone()),
                Transform::from_xyz(0.0, params.top_offset(), 0.0),
                visibility,
            ))
            .id();
        tops.insert(shape, top);
    }

    let trunk = commands
        .spawn((
            Name::new(TRUNK_NAME),
            PartKind::Trunk,
            Mesh3d(meshes.add(synthesize_trunk(params))),
            MeshMaterial3d(plaster.clone()),
            Transform::IDENTITY,
            Visibility::Inherited,
        ))
        .id();
    let footer = commands
        .spawn((
            Name::new(FOOTER_NAME),
            PartKind::Footer,
            Mesh3d(meshes.add(synthesize_footer(params))),
            MeshMaterial3d(plaster),
            Transform::from_xyz(0.0, params.footer_offset(), 0.0),
            Visibility::Inherited,
        ))
        .id();
    let base = commands
        .spawn((
            Name::new(BASE_NAME),
            PartKind::Base,
            Transform::IDENTITY,
            Visibility::Visible,
        ))
        .add_children(&[trunk, footer])
        .id();

    let mut children: Vec<Entity> = TopShape::ALL
        .iter()
        .filter_map(|shape| tops.get(shape).copied())
        .collect();
    children.push(base);
    commands.entity(root).add_children(&children);

    TableAssembly {
        root,
        tops,
        active_top: INITIAL_TOP,
        base,
        trunk,
        footer,
    }
}

/// Spawns the table once materials are available.
pub fn spawn_table(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    bank: Res<MaterialBank>,
    params: Res<TableParams>,
    existing: Option<Res<TableAssembly>>,
) {
    if existing.is_some() {
        return;
    }
    let assembly = create_table(&mut commands, &mut meshes, &bank, &params);
    info!(
        "Coffee table created with {} top variants, showing {}",
        assembly.tops.len(),
        assembly.active_top.name()
    );
    commands.insert_resource(assembly);
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Shows exactly the named top variant. Returns the new shape, or `None`
/// when the name is unknown.
pub fn set_top_shape(
    assembly: &mut TableAssembly,
    name: &str,
    visibility: &mut Query<&mut Visibility>,
) -> Option<TopShape> {
    let shape = TopShape::from_name(name)?;
    for (candidate, entity) in &assembly.tops {
        if let Ok(mut vis) = visibility.get_mut(*entity) {
            *vis = if *candidate == shape {
                Visibility::Visible
            } else {
                Visibility::Hidden
            };
        }
    }
    assembly.active_top = shape;
    Some(shape)
}

/// Binds the named appearance to `parts`. Returns `false` for unknown names.
pub fn set_appearance(
    bank: &MaterialBank,
    name: &str,
    parts: &[Entity],
    materials: &mut Query<&mut MeshMaterial3d<StandardMaterial>>,
) -> bool {
    let Some(handle) = bank.by_name(name) else {
        return false;
    };
    for part in parts {
        if let Ok(mut material) = materials.get_mut(*part) {
            material.0 = handle.clone();
        }
    }
    true
}

/// Applies queued [`TableCommand`]s to the spawned table.
pub fn apply_table_commands(
    mut requests: EventReader<TableCommand>,
    assembly: Option<ResMut<TableAssembly>>,
    bank: Res<MaterialBank>,
    mut visibility: Query<&mut Visibility>,
    mut materials: Query<&mut MeshMaterial3d<StandardMaterial>>,
    mut session_events: EventWriter<SessionEvent>,
) {
    let Some(mut assembly) = assembly else {
        for request in requests.read() {
            debug!("Table not built yet, dropping {:?}", request);
        }
        return;
    };

    for request in requests.read() {
        match request {
            TableCommand::SetTopShape(name) => {
                match set_top_shape(&mut assembly, name, &mut visibility) {
                    Some(shape) => {
                        info!("Top shape set to {}", shape.name());
                        let replacement = assembly
                            .active_top_entity()
                            .and_then(|entity| assembly.pick_target(entity));
                        session_events.send(SessionEvent::TopSwapped { replacement });
                    }
                    None => debug!("Ignoring unknown top shape {name:?}"),
                }
            }
            TableCommand::SetTopAppearance(name) => {
                let tops: Vec<Entity> = assembly.tops.values().copied().collect();
                if !set_appearance(&bank, name, &tops, &mut materials) {
                    debug!("Ignoring unknown top appearance {name:?}");
                }
            }
            TableCommand::SetBaseAppearance(name) => {
                let parts = [assembly.trunk, assembly.footer];
                if !set_appearance(&bank, name, &parts, &mut materials) {
                    debug!("Ignoring unknown base appearance {name:?}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::asset::AssetPlugin;

    use super::*;
    use crate::appearance::init_material_bank;

    fn table_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()));
        app.init_asset::<Mesh>();
        app.init_asset::<StandardMaterial>();
        app.init_resource::<TableParams>();
        app.add_event::<TableCommand>();
        app.add_event::<SessionEvent>();
        app.add_systems(Startup, (init_material_bank, spawn_table).chain());
        app.add_systems(Update, apply_table_commands);
        app.update();
        app
    }

    fn send(app: &mut App, command: TableCommand) {
        app.world_mut().send_event(command);
        app.update();
    }

    fn visible_tops(app: &App) -> Vec<TopShape> {
        let assembly = app.world().resource::<TableAssembly>();
        TopShape::ALL
            .into_iter()
            .filter(|shape| {
                let entity = assembly.top(*shape).expect("top entity");
                app.world().get::<Visibility>(entity) == Some(&Visibility::Visible)
            })
            .collect()
    }

    fn material_of(app: &App, entity: Entity) -> Handle<StandardMaterial> {
        app.world()
            .get::<MeshMaterial3d<StandardMaterial>>(entity)
            .expect("part material")
            .0
            .clone()
    }

    fn bank_handle(app: &App, kind: AppearanceKind) -> Handle<StandardMaterial> {
        app.world()
            .resource::<MaterialBank>()
            .get(kind)
            .expect("bank entry")
    }

    #[test]
    fn test_fresh_table_shows_ellipse_only() {
        let app = table_app();
        assert_eq!(visible_tops(&app), vec![TopShape::Ellipse]);
    }

    #[test]
    fn test_fresh_table_names_and_hierarchy() {
        let app = table_app();
        let assembly = app.world().resource::<TableAssembly>().clone();
        let name = |e: Entity| app.world().get::<Name>(e).map(|n| n.as_str().to_string());
        assert_eq!(name(assembly.root).as_deref(), Some("coffeeTable"));
        assert_eq!(name(assembly.base).as_deref(), Some("tableBase"));
        for shape in TopShape::ALL {
            let top = assembly.top(shape).expect("top");
            assert_eq!(name(top), Some(shape.part_name()));
            assert_eq!(app.world().get::<Parent>(top).map(|p| p.get()), Some(assembly.root));
        }
        for part in [assembly.trunk, assembly.footer] {
            assert_eq!(app.world().get::<Parent>(part).map(|p| p.get()), Some(assembly.base));
        }
    }

    #[test]
    fn test_fresh_table_positions_parts() {
        let app = table_app();
        let params = TableParams::default();
        let assembly = app.world().resource::<TableAssembly>().clone();
        let y = |e: Entity| app.world().get::<Transform>(e).expect("transform").translation.y;
        let top = assembly.active_top_entity().expect("active top");
        assert!((y(top) - params.top_offset()).abs() < 1e-6);
        assert!((y(assembly.footer) - params.footer_offset()).abs() < 1e-6);
    }

    #[test]
    fn test_fresh_table_default_materials() {
        let app = table_app();
        let assembly = app.world().resource::<TableAssembly>().clone();
        let wood = bank_handle(&app, AppearanceKind::Wood);
        let plaster = bank_handle(&app, AppearanceKind::Plaster);
        for top in assembly.tops.values() {
            assert_eq!(material_of(&app, *top), wood);
        }
        assert_eq!(material_of(&app, assembly.trunk), plaster);
        assert_eq!(material_of(&app, assembly.footer), plaster);
    }

    #[test]
    fn test_set_top_shape_ellipse_on_fresh_table() {
        let mut app = table_app();
        send(&mut app, TableCommand::SetTopShape("ellipse".into()));
        assert_eq!(visible_tops(&app), vec![TopShape::Ellipse]);
    }

    #[test]
    fn test_set_top_shape_switches_variant() {
        let mut app = table_app();
        send(&mut app, TableCommand::SetTopShape("rectangle".into()));
        assert_eq!(visible_tops(&app), vec![TopShape::Rectangle]);
        assert_eq!(
            app.world().resource::<TableAssembly>().active_top,
            TopShape::Rectangle
        );
    }

    #[test]
    fn test_unknown_shape_is_ignored() {
        let mut app = table_app();
        send(&mut app, TableCommand::SetTopShape("circle".into()));
        send(&mut app, TableCommand::SetTopShape("hexagon".into()));
        assert_eq!(visible_tops(&app), vec![TopShape::Circle]);
    }

    #[test]
    fn test_shape_swap_emits_top_swapped() {
        let mut app = table_app();
        send(&mut app, TableCommand::SetTopShape("circle".into()));
        let circle = app
            .world()
            .resource::<TableAssembly>()
            .top(TopShape::Circle)
            .expect("circle top");
        let events = app.world().resource::<Events<SessionEvent>>();
        let mut reader = events.get_cursor();
        let swapped: Vec<_> = reader.read(events).copied().collect();
        assert_eq!(
            swapped,
            vec![SessionEvent::TopSwapped {
                replacement: Some(PickTarget {
                    entity: circle,
                    category: PartCategory::Top(TopShape::Circle),
                })
            }]
        );
    }

    #[test]
    fn test_unknown_top_appearance_keeps_glass() {
        let mut app = table_app();
        send(&mut app, TableCommand::SetTopAppearance("glass".into()));
        send(&mut app, TableCommand::SetTopAppearance("nonexistent".into()));
        let glass = bank_handle(&app, AppearanceKind::Glass);
        let assembly = app.world().resource::<TableAssembly>().clone();
        for top in assembly.tops.values() {
            assert_eq!(material_of(&app, *top), glass);
        }
    }

    #[test]
    fn test_base_parts_share_plaster_handle() {
        let mut app = table_app();
        send(&mut app, TableCommand::SetBaseAppearance("wood".into()));
        send(&mut app, TableCommand::SetBaseAppearance("plaster".into()));
        let assembly = app.world().resource::<TableAssembly>().clone();
        let plaster = bank_handle(&app, AppearanceKind::Plaster);
        let trunk = material_of(&app, assembly.trunk);
        assert_eq!(trunk, plaster);
        assert_eq!(trunk.id(), material_of(&app, assembly.footer).id());
    }

    #[test]
    fn test_pick_target_only_for_active_top_and_base() {
        let app = table_app();
        let assembly = app.world().resource::<TableAssembly>().clone();
        let hidden = assembly.top(TopShape::Circle).expect("circle");
        assert!(assembly.pick_target(hidden).is_none());
        assert_eq!(
            assembly.pick_target(assembly.base).map(|t| t.category),
            Some(PartCategory::Base)
        );
        assert_eq!(assembly.pick_candidates().len(), 3);
    }
}
