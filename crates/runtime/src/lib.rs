//! # Starbulb Runtime
//!
//! Bevy host for the Starbulb scene. The scene state itself lives in
//! [`SceneController`]; the plugins here feed it input and turn the
//! [`RenderCommand`] it returns each frame into entities, meshes and lights.
//!
//! ## Modules
//!
//! - [`galaxy`]: Billboarded particle mesh, rebuilt per generation
//! - [`bulb`]: glTF bulb model, emissive clones and click handling
//! - [`lighting`]: Ambient, directional and the bulb's point/spot lights
//! - [`sections`]: Mouse wheel scrolling, viewport tracking, camera poses
//! - [`tuning_panel`]: Keyboard-driven parameter panel
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Starbulb Runtime                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Input (Update, before SceneSet::Step)                          │
//! │  ├── Wheel / resize  -> SceneController::scroll_by / on_resize  │
//! │  ├── Bulb clicks     -> SceneController::on_bulb_hit            │
//! │  └── Panel keys      -> regenerate / set_wave                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Step                                                           │
//! │  └── SceneController::step(elapsed) -> FrameCommand             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Apply (after SceneSet::Step)                                   │
//! │  ├── Galaxy renderable: respawn on new generation, upload       │
//! │  ├── Visibility of galaxy, model and panel                      │
//! │  └── Bulb lights and emissive levels                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod bulb;
pub mod galaxy;
pub mod lighting;
pub mod sections;
pub mod tuning_panel;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy_camera_controller::{CameraControllerPlugin, OrbitController};
use starbulb_common::prelude::*;
use tracing::info;

// ============================================================================
// Schedule
// ============================================================================

/// Ordering of the per-frame work inside `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneSet {
    /// Systems feeding input into the controller
    Input,
    /// The controller step
    Step,
    /// Systems applying the frame's render command
    Apply,
}

/// Render command of the most recent step.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCommand(pub Option<RenderCommand>);

/// Marks the scene camera.
#[derive(Component)]
pub struct SceneCamera;

/// Vertical field of view of the scene camera, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 75.0;

// ============================================================================
// Runtime Plugin
// ============================================================================

/// Main runtime plugin.
///
/// Expects a [`StarbulbConfig`] and a [`SceneController`] resource to be
/// inserted by the host before the app runs.
///
/// # Example
/// ```rust,ignore
/// use bevy::prelude::*;
/// use starbulb_runtime::StarbulbRuntimePlugin;
///
/// fn main() {
///     App::new()
///         .add_plugins(DefaultPlugins)
///         .insert_resource(config)
///         .insert_resource(controller)
///         .add_plugins(StarbulbRuntimePlugin)
///         .run();
/// }
/// ```
pub struct StarbulbRuntimePlugin;

impl Plugin for StarbulbRuntimePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .init_resource::<FrameCommand>()
            .configure_sets(Update, (SceneSet::Input, SceneSet::Step, SceneSet::Apply).chain())
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, step_scene.in_set(SceneSet::Step));

        app.add_plugins(CameraControllerPlugin)
            .add_plugins(lighting::SceneLightingPlugin)
            .add_plugins(galaxy::GalaxyRenderPlugin)
            .add_plugins(bulb::BulbPlugin)
            .add_plugins(sections::SectionsPlugin)
            .add_plugins(tuning_panel::TuningPanelPlugin);

        info!("Starbulb Runtime initialized");
    }
}

fn spawn_camera(mut commands: Commands, controller: Res<SceneController>) {
    let pose = controller.section().camera_pose();
    let orbit = OrbitController::look_from(pose.position, pose.target);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        Tonemapping::None,
        orbit.transform(),
        orbit,
        SceneCamera,
        Name::new("Scene Camera"),
    ));
}

/// Advance the animation and publish the frame's render command.
pub fn step_scene(time: Res<Time>, mut controller: ResMut<SceneController>, mut frame: ResMut<FrameCommand>) {
    frame.0 = Some(controller.step(time.elapsed_secs()));
}

/// Move the camera to `pose`, dropping any orbit momentum.
pub fn apply_camera_pose(pose: CameraPose, transform: &mut Transform, orbit: &mut OrbitController) {
    orbit.reset(pose.position, pose.target);
    *transform = orbit.transform();
}

// ============================================================================
// Prelude
// ============================================================================

/// Convenient re-exports for common runtime types.
pub mod prelude {
    pub use super::bulb::{BulbMesh, BulbModel, BulbPlugin};
    pub use super::galaxy::{GalaxyRenderPlugin, GalaxyRenderable};
    pub use super::lighting::{BulbPointLight, BulbSpotLight, SceneLightingPlugin};
    pub use super::sections::SectionsPlugin;
    pub use super::tuning_panel::TuningPanelPlugin;
    pub use super::{FrameCommand, SceneCamera, SceneSet, StarbulbRuntimePlugin};
}
