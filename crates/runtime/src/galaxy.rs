//! # Galaxy Renderable
//!
//! Owns the single entity that draws the current galaxy.
//!
//! Each particle becomes a camera-facing quad of edge `size`, expanded on
//! the CPU from the live position buffer every frame. That is four vertices
//! per particle rewritten and re-uploaded each frame the galaxy is visible,
//! so the largest panel counts (one million particles) cost four million
//! vertices per frame. The vertex buffer is refilled in place and uploads
//! stop while the galaxy is scrolled out of view. When the controller
//! reports a new galaxy generation the old entity is despawned and its mesh
//! and material assets removed before the new one is spawned, so at most
//! one renderable exists at any time.

use bevy::asset::RenderAssetUsages;
use bevy::camera::visibility::NoFrustumCulling;
use bevy::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use bevy::prelude::*;
use starbulb_common::prelude::*;
use tracing::{debug, info};

use crate::{FrameCommand, SceneCamera, SceneSet};

/// Corner offsets of a unit quad, in (right, up) units.
const QUAD_CORNERS: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];

// ============================================================================
// Plugin
// ============================================================================

pub struct GalaxyRenderPlugin;

impl Plugin for GalaxyRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (sync_galaxy_renderable, upload_galaxy_positions, apply_galaxy_visibility)
                .chain()
                .in_set(SceneSet::Apply),
        );
    }
}

/// The entity drawing the galaxy of a given generation.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalaxyRenderable {
    pub generation: u64,
}

// ============================================================================
// Mesh Building
// ============================================================================

/// Expand every particle into four quad corners facing the camera.
pub fn billboard_positions(buffer: &ParticleBuffer, size: f32, right: Vec3, up: Vec3) -> Vec<[f32; 3]> {
    let mut positions = vec![[0.0; 3]; buffer.len() * 4];
    fill_billboard_positions(&mut positions, buffer, size, right, up);
    positions
}

/// Write the quad corners into `out`, which holds four slots per particle.
pub fn fill_billboard_positions(out: &mut [[f32; 3]], buffer: &ParticleBuffer, size: f32, right: Vec3, up: Vec3) {
    let right = right * size;
    let up = up * size;
    for (particle, corners) in buffer.positions().chunks_exact(3).zip(out.chunks_exact_mut(4)) {
        let center = Vec3::new(particle[0], particle[1], particle[2]);
        for (slot, [r, u]) in corners.iter_mut().zip(QUAD_CORNERS) {
            *slot = (center + right * r + up * u).to_array();
        }
    }
}

/// Per-vertex linear colors, four per particle.
fn vertex_colors(buffer: &ParticleBuffer) -> Vec<[f32; 4]> {
    let mut colors = Vec::with_capacity(buffer.len() * 4);
    for rgb in buffer.colors().chunks_exact(3) {
        let linear = LinearRgba::from(Srgba::new(rgb[0], rgb[1], rgb[2], 1.0)).to_f32_array();
        colors.extend(std::iter::repeat_n(linear, 4));
    }
    colors
}

fn quad_indices(count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(count * 6);
    for i in 0..count as u32 {
        let base = i * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}

/// Build the mesh for a galaxy as seen with the given camera axes.
pub fn galaxy_mesh(galaxy: &Galaxy, size: f32, right: Vec3, up: Vec3) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(
        Mesh::ATTRIBUTE_POSITION,
        billboard_positions(&galaxy.buffer, size, right, up),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, vertex_colors(&galaxy.buffer));
    mesh.insert_indices(Indices::U32(quad_indices(galaxy.buffer.len())));
    mesh
}

/// Unlit, additive, double-sided material tinted by vertex colors.
pub fn galaxy_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        alpha_mode: AlphaMode::Add,
        cull_mode: None,
        ..default()
    }
}

fn camera_axes(camera: &Query<&GlobalTransform, With<SceneCamera>>) -> (Vec3, Vec3) {
    camera
        .single()
        .map(|transform| (*transform.right(), *transform.up()))
        .unwrap_or((Vec3::X, Vec3::Y))
}

// ============================================================================
// Systems
// ============================================================================

/// Replace the renderable when the controller holds a newer galaxy.
pub fn sync_galaxy_renderable(
    mut commands: Commands,
    controller: Res<SceneController>,
    frame: Res<FrameCommand>,
    camera: Query<&GlobalTransform, With<SceneCamera>>,
    existing: Query<(Entity, &GalaxyRenderable, &Mesh3d, &MeshMaterial3d<StandardMaterial>)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(command) = frame.0 else {
        return;
    };

    let mut current = false;
    for (entity, renderable, mesh, material) in existing.iter() {
        if renderable.generation == command.galaxy_generation && !current {
            current = true;
            continue;
        }
        meshes.remove(&mesh.0);
        materials.remove(&material.0);
        commands.entity(entity).despawn();
        debug!(generation = renderable.generation, "Galaxy renderable disposed");
    }
    if current {
        return;
    }

    let (right, up) = camera_axes(&camera);
    let galaxy = controller.galaxy();
    commands.spawn((
        Mesh3d(meshes.add(galaxy_mesh(galaxy, controller.params().size, right, up))),
        MeshMaterial3d(materials.add(galaxy_material())),
        Transform::default(),
        NoFrustumCulling,
        GalaxyRenderable {
            generation: galaxy.generation,
        },
        Name::new("Galaxy"),
    ));
    info!(
        generation = galaxy.generation,
        particles = galaxy.buffer.len(),
        "Galaxy renderable spawned"
    );
}

/// Push this frame's animated positions into the mesh.
pub fn upload_galaxy_positions(
    controller: Res<SceneController>,
    frame: Res<FrameCommand>,
    camera: Query<&GlobalTransform, With<SceneCamera>>,
    renderables: Query<(&GalaxyRenderable, &Mesh3d)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Some(command) = frame.0 else {
        return;
    };
    if !command.upload_positions {
        return;
    }

    let (right, up) = camera_axes(&camera);
    for (renderable, mesh) in renderables.iter() {
        if renderable.generation != controller.galaxy().generation {
            continue;
        }
        let Some(mesh) = meshes.get_mut(&mesh.0) else {
            continue;
        };
        let buffer = &controller.galaxy().buffer;
        let size = controller.params().size;
        let refilled = match mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(positions)) if positions.len() == buffer.len() * 4 => {
                fill_billboard_positions(positions, buffer, size, right, up);
                true
            }
            _ => false,
        };
        if !refilled {
            mesh.insert_attribute(
                Mesh::ATTRIBUTE_POSITION,
                VertexAttributeValues::Float32x3(billboard_positions(buffer, size, right, up)),
            );
        }
    }
}

pub fn apply_galaxy_visibility(
    frame: Res<FrameCommand>,
    mut renderables: Query<&mut Visibility, With<GalaxyRenderable>>,
) {
    let Some(command) = frame.0 else {
        return;
    };
    let target = if command.galaxy_visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in renderables.iter_mut() {
        visibility.set_if_neq(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn scene(count: u32) -> SceneController {
        let params = GalaxyParameters {
            count,
            ..Default::default()
        };
        SceneController::new(params, GalaxyOptions::default(), Some(3)).unwrap()
    }

    fn world_with(controller: SceneController) -> World {
        let mut world = World::new();
        world.insert_resource(Assets::<Mesh>::default());
        world.insert_resource(Assets::<StandardMaterial>::default());
        world.insert_resource(controller);
        world.insert_resource(FrameCommand::default());
        world
    }

    fn step(world: &mut World, elapsed: f32) {
        let command = world.resource_mut::<SceneController>().step(elapsed);
        world.resource_mut::<FrameCommand>().0 = Some(command);
        world.run_system_once(sync_galaxy_renderable).unwrap();
    }

    fn renderables(world: &mut World) -> Vec<GalaxyRenderable> {
        let mut query = world.query::<&GalaxyRenderable>();
        query.iter(world).copied().collect()
    }

    #[test]
    fn test_billboard_quad_is_centered() {
        let controller = scene(1);
        let galaxy = controller.galaxy();
        let positions = billboard_positions(&galaxy.buffer, 0.5, Vec3::X, Vec3::Y);
        assert_eq!(positions.len(), 4);

        let center = Vec3::from_array(galaxy.buffer.position(0));
        let mean = positions.iter().map(|p| Vec3::from_array(*p)).sum::<Vec3>() / 4.0;
        assert!((mean - center).length() < 1e-5);
        let width = Vec3::from_array(positions[1]) - Vec3::from_array(positions[0]);
        assert!((width - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_mesh_has_four_vertices_per_particle() {
        let controller = scene(10);
        let mesh = galaxy_mesh(controller.galaxy(), 0.01, Vec3::X, Vec3::Y);
        assert_eq!(mesh.count_vertices(), 40);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(60));
    }

    #[test]
    fn test_regeneration_keeps_single_renderable() {
        let mut world = world_with(scene(50));
        step(&mut world, 0.0);
        assert_eq!(renderables(&mut world), vec![GalaxyRenderable { generation: 1 }]);

        for count in [60, 70] {
            let params = GalaxyParameters {
                count,
                ..world.resource::<SceneController>().params().clone()
            };
            world.resource_mut::<SceneController>().regenerate(params).unwrap();
            step(&mut world, 0.5);
        }

        assert_eq!(renderables(&mut world), vec![GalaxyRenderable { generation: 3 }]);
        assert_eq!(world.resource::<Assets<Mesh>>().len(), 1);
        assert_eq!(world.resource::<Assets<StandardMaterial>>().len(), 1);
    }

    fn mesh_positions(world: &mut World) -> Vec<[f32; 3]> {
        let mut query = world.query::<&Mesh3d>();
        let handle = query.single(world).unwrap().0.clone();
        match world.resource::<Assets<Mesh>>().get(&handle).unwrap().attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(positions)) => positions.clone(),
            _ => panic!("positions are not Float32x3"),
        }
    }

    #[test]
    fn test_upload_tracks_animation_while_visible() {
        let mut world = world_with(scene(8));
        step(&mut world, 0.0);
        let at_rest = mesh_positions(&mut world);

        step(&mut world, 1.0);
        world.run_system_once(upload_galaxy_positions).unwrap();
        let animated = mesh_positions(&mut world);
        let expected = {
            let controller = world.resource::<SceneController>();
            billboard_positions(&controller.galaxy().buffer, controller.params().size, Vec3::X, Vec3::Y)
        };
        assert_eq!(animated, expected);
        assert_ne!(animated, at_rest);

        {
            let mut controller = world.resource_mut::<SceneController>();
            controller.on_resize(800.0, 600.0);
            controller.on_scroll(600.0);
        }
        step(&mut world, 2.0);
        world.run_system_once(upload_galaxy_positions).unwrap();
        assert_eq!(mesh_positions(&mut world), animated);
    }

    #[test]
    fn test_same_generation_is_not_respawned() {
        let mut world = world_with(scene(20));
        step(&mut world, 0.0);
        step(&mut world, 1.0);
        step(&mut world, 2.0);
        assert_eq!(renderables(&mut world).len(), 1);
        assert_eq!(world.resource::<Assets<Mesh>>().len(), 1);
    }
}
