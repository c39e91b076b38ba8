//! # Light Bulb
//!
//! Loads the bulb glTF, gives every mesh in it a private material with a
//! red emissive channel, and toggles the bulb when a click ray hits one of
//! those meshes.
//!
//! Loading is polled the same way placeholder assets are: the root entity
//! carries a [`LoadingBulb`] until the glTF resolves, then its scene is
//! spawned as a child. A failed load is logged and leaves the scene without
//! a bulb; clicks are then ignored.

use bevy::gltf::Gltf;
use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use bevy::prelude::*;
use bevy_camera_controller::OrbitController;
use starbulb_common::prelude::*;
use tracing::{debug, error, info};

use crate::{apply_camera_pose, FrameCommand, SceneCamera, SceneSet};

pub struct BulbPlugin;

impl Plugin for BulbPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BulbModel>()
            .add_message::<BulbToggled>()
            .add_systems(Startup, spawn_bulb_model)
            .add_systems(
                Update,
                (apply_loaded_bulb, prepare_bulb_meshes, handle_bulb_click)
                    .chain()
                    .in_set(SceneSet::Input),
            )
            .add_systems(
                Update,
                (apply_model_visibility, apply_bulb_emissive).in_set(SceneSet::Apply),
            );
    }
}

// ============================================================================
// Components, Resources, Messages
// ============================================================================

/// Load status of the bulb model.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BulbModel {
    /// At least one bulb mesh is ready to be clicked
    pub loaded: bool,
}

/// Root entity of the bulb model.
#[derive(Component)]
pub struct BulbRoot;

/// The glTF still being loaded for [`BulbRoot`].
#[derive(Component)]
pub struct LoadingBulb {
    pub handle: Handle<Gltf>,
}

/// A mesh of the bulb owning its own material clone.
#[derive(Component)]
pub struct BulbMesh;

/// The bulb was toggled; carries the new light levels.
#[derive(Message, Debug, Clone, Copy)]
pub struct BulbToggled(pub BulbLighting);

/// Emissive color for a given intensity: pure red.
pub fn bulb_emissive(intensity: f32, scale: f32) -> LinearRgba {
    LinearRgba::rgb(intensity * scale, 0.0, 0.0)
}

// ============================================================================
// Loading
// ============================================================================

fn spawn_bulb_model(mut commands: Commands, asset_server: Res<AssetServer>, config: Res<StarbulbConfig>) {
    let settings = &config.bulb;
    info!("Loading bulb model from {}", settings.model);

    commands.spawn((
        Transform::from_translation(Vec3::from_array(settings.position)).with_scale(Vec3::splat(settings.scale)),
        Visibility::Hidden,
        BulbRoot,
        LoadingBulb {
            handle: asset_server.load(settings.model.clone()),
        },
        Name::new("Bulb"),
    ));
}

/// Spawn the bulb scene once its glTF has loaded.
pub fn apply_loaded_bulb(
    mut commands: Commands,
    gltf_assets: Res<Assets<Gltf>>,
    asset_server: Res<AssetServer>,
    loading_query: Query<(Entity, &LoadingBulb), With<BulbRoot>>,
) {
    for (entity, loading) in loading_query.iter() {
        match asset_server.load_state(&loading.handle) {
            bevy::asset::LoadState::Loaded => {
                let Some(gltf) = gltf_assets.get(&loading.handle) else {
                    continue;
                };
                let scene = gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned());
                match scene {
                    Some(scene) => {
                        commands.entity(entity).with_children(|parent| {
                            parent.spawn((SceneRoot(scene), Transform::default()));
                        });
                        debug!("Bulb scene spawned");
                    }
                    None => {
                        error!("Error loading model: glTF has no scenes");
                    }
                }
                commands.entity(entity).remove::<LoadingBulb>();
            }
            bevy::asset::LoadState::Failed(err) => {
                error!("Error loading model: {}", err);
                commands.entity(entity).remove::<LoadingBulb>();
            }
            _ => {
                // Still loading
            }
        }
    }
}

/// Give each newly spawned bulb mesh a private material with emissive off.
///
/// The first time any bulb mesh shows up the model counts as loaded and the
/// camera returns to the opening view.
pub fn prepare_bulb_meshes(
    mut commands: Commands,
    candidates: Query<(Entity, &MeshMaterial3d<StandardMaterial>), Without<BulbMesh>>,
    parents: Query<&ChildOf>,
    roots: Query<(), With<BulbRoot>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut model: ResMut<BulbModel>,
    controller: Res<SceneController>,
    mut camera: Query<(&mut Transform, &mut OrbitController), With<SceneCamera>>,
) {
    let mut prepared = 0;
    for (entity, material) in candidates.iter() {
        if !parents.iter_ancestors(entity).any(|ancestor| roots.contains(ancestor)) {
            continue;
        }
        let Some(source) = materials.get(&material.0) else {
            continue;
        };
        let mut private = source.clone();
        private.emissive = bulb_emissive(0.0, 0.0);

        commands
            .entity(entity)
            .insert((MeshMaterial3d(materials.add(private)), BulbMesh));
        prepared += 1;
    }

    if prepared == 0 || model.loaded {
        return;
    }
    model.loaded = true;
    info!(meshes = prepared, "Bulb model ready");

    let pose = controller.on_model_loaded();
    if let Ok((mut transform, mut orbit)) = camera.single_mut() {
        apply_camera_pose(pose, &mut transform, &mut orbit);
    }
}

// ============================================================================
// Interaction
// ============================================================================

/// Toggle the bulb when a left click ray hits one of its meshes.
pub fn handle_bulb_click(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform), With<SceneCamera>>,
    bulb_meshes: Query<(), With<BulbMesh>>,
    mut ray_cast: MeshRayCast,
    model: Res<BulbModel>,
    mut controller: ResMut<SceneController>,
    mut toggles: MessageWriter<BulbToggled>,
) {
    if !mouse.just_pressed(MouseButton::Left) || !controller.accepts_bulb_clicks(model.loaded) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return;
    };

    let filter = |entity: Entity| bulb_meshes.contains(entity);
    let settings = MeshRayCastSettings::default().with_filter(&filter);
    let Some((_, hit)) = ray_cast.cast_ray(ray, &settings).first() else {
        return;
    };

    let lighting = controller.on_bulb_hit(hit.point);
    toggles.write(BulbToggled(lighting));
}

/// Show the model only in its section and only once it exists.
pub fn apply_model_visibility(
    frame: Res<FrameCommand>,
    model: Res<BulbModel>,
    mut roots: Query<&mut Visibility, With<BulbRoot>>,
) {
    let Some(command) = frame.0 else {
        return;
    };
    let target = if command.model_visible && model.loaded {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in roots.iter_mut() {
        visibility.set_if_neq(target);
    }
}

/// Set the emissive level of every bulb mesh after a toggle.
pub fn apply_bulb_emissive(
    mut toggles: MessageReader<BulbToggled>,
    config: Res<StarbulbConfig>,
    bulb_meshes: Query<&MeshMaterial3d<StandardMaterial>, With<BulbMesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(BulbToggled(lighting)) = toggles.read().last().copied() else {
        return;
    };
    let emissive = bulb_emissive(lighting.emissive_intensity, config.bulb.emissive_scale);
    for material in bulb_meshes.iter() {
        if let Some(material) = materials.get_mut(&material.0) {
            material.emissive = emissive;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn world() -> World {
        let mut world = World::new();
        world.insert_resource(Assets::<StandardMaterial>::default());
        world.insert_resource(BulbModel::default());
        world.insert_resource(StarbulbConfig::default());
        world.init_resource::<bevy::ecs::message::Messages<BulbToggled>>();
        let controller = SceneController::new(
            GalaxyParameters {
                count: 10,
                ..Default::default()
            },
            GalaxyOptions::default(),
            Some(5),
        )
        .unwrap();
        world.insert_resource(controller);
        world
    }

    fn spawn_bulb(world: &mut World, meshes: usize) -> (Entity, Handle<StandardMaterial>) {
        let shared = world
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial::default());
        let root = world
            .spawn((BulbRoot, Transform::default(), Visibility::Hidden))
            .with_children(|parent| {
                for _ in 0..meshes {
                    parent.spawn(MeshMaterial3d(shared.clone()));
                }
            })
            .id();
        (root, shared)
    }

    #[test]
    fn test_emissive_is_pure_red() {
        assert_eq!(bulb_emissive(0.5, 2.0), LinearRgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(bulb_emissive(0.0, 1000.0), LinearRgba::rgb(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_meshes_get_private_materials() {
        let mut world = world();
        let (_, shared) = spawn_bulb(&mut world, 2);
        let stray = world.spawn(MeshMaterial3d(shared.clone())).id();

        world.run_system_once(prepare_bulb_meshes).unwrap();

        let mut query = world.query_filtered::<&MeshMaterial3d<StandardMaterial>, With<BulbMesh>>();
        let handles: Vec<_> = query.iter(&world).map(|m| m.0.clone()).collect();
        assert_eq!(handles.len(), 2);
        assert!(handles.iter().all(|h| *h != shared));
        assert_ne!(handles[0], handles[1]);
        assert!(world.get::<BulbMesh>(stray).is_none());
        assert!(world.resource::<BulbModel>().loaded);
    }

    #[test]
    fn test_toggle_sets_emissive_on_bulb_meshes_only() {
        let mut world = world();
        let (_, shared) = spawn_bulb(&mut world, 1);
        world.run_system_once(prepare_bulb_meshes).unwrap();

        let mut bulb = BulbState::default();
        world.write_message(BulbToggled(bulb.toggle_at(Vec3::ZERO)));
        world.run_system_once(apply_bulb_emissive).unwrap();

        let scale = StarbulbConfig::default().bulb.emissive_scale;
        let mut query = world.query_filtered::<&MeshMaterial3d<StandardMaterial>, With<BulbMesh>>();
        let handle = query.single(&world).unwrap().0.clone();
        let materials = world.resource::<Assets<StandardMaterial>>();
        assert_eq!(materials.get(&handle).unwrap().emissive, bulb_emissive(0.5, scale));
        assert_eq!(materials.get(&shared).unwrap().emissive, LinearRgba::BLACK);
    }

    #[test]
    fn test_model_hidden_until_loaded() {
        let mut world = world();
        let (root, _) = spawn_bulb(&mut world, 1);
        world.insert_resource(FrameCommand(Some(RenderCommand {
            galaxy_generation: 1,
            upload_positions: true,
            galaxy_visible: false,
            model_visible: true,
            panel_visible: false,
        })));

        world.run_system_once(apply_model_visibility).unwrap();
        assert_eq!(world.get::<Visibility>(root), Some(&Visibility::Hidden));

        world.run_system_once(prepare_bulb_meshes).unwrap();
        world.run_system_once(apply_model_visibility).unwrap();
        assert_eq!(world.get::<Visibility>(root), Some(&Visibility::Inherited));
    }
}
