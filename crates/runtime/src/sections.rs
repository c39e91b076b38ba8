//! # Scroll Sections
//!
//! The window stands in for a two-section page: the mouse wheel moves a
//! virtual scroll offset, the window height is the section height, and
//! crossing into another section moves the camera to that section's pose.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_camera_controller::OrbitController;
use starbulb_common::prelude::*;
use starbulb_common::SectionChange;
use tracing::debug;

use crate::{apply_camera_pose, SceneCamera, SceneSet};

pub struct SectionsPlugin;

impl Plugin for SectionsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_viewport)
            .add_systems(
                Update,
                (cap_pixel_ratio, track_viewport, scroll_sections)
                    .chain()
                    .in_set(SceneSet::Input),
            );
    }
}

/// Page offset for one wheel event; wheel up is negative.
pub fn wheel_delta(unit: MouseScrollUnit, y: f32, scroll_speed: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => -y * scroll_speed,
        MouseScrollUnit::Pixel => -y,
    }
}

/// Largest scale factor allowed for `base`, or `None` when under the cap.
pub fn capped_scale_factor(base: f32, max_pixel_ratio: f32) -> Option<f32> {
    (max_pixel_ratio > 0.0 && base > max_pixel_ratio).then_some(max_pixel_ratio)
}

fn init_viewport(windows: Query<&Window, With<PrimaryWindow>>, mut controller: ResMut<SceneController>) {
    if let Ok(window) = windows.single() {
        controller.on_resize(window.width(), window.height());
    }
}

/// Keep the window's pixel density at or below `max_pixel_ratio`.
pub fn cap_pixel_ratio(config: Res<StarbulbConfig>, mut windows: Query<&mut Window>) {
    for mut window in windows.iter_mut() {
        let base = window.resolution.base_scale_factor();
        let wanted = capped_scale_factor(base, config.window.max_pixel_ratio);
        if window.resolution.scale_factor_override() != wanted {
            window.resolution.set_scale_factor_override(wanted);
            debug!(base, ?wanted, "Pixel ratio cap applied");
        }
    }
}

pub fn track_viewport(
    mut resized: MessageReader<WindowResized>,
    mut controller: ResMut<SceneController>,
    mut camera: Query<(&mut Transform, &mut OrbitController), With<SceneCamera>>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };
    let change = controller.on_resize(last.width, last.height);
    move_camera_to_section(change, &mut camera);
}

pub fn scroll_sections(
    mut wheel: MessageReader<MouseWheel>,
    config: Res<StarbulbConfig>,
    mut controller: ResMut<SceneController>,
    mut camera: Query<(&mut Transform, &mut OrbitController), With<SceneCamera>>,
) {
    let delta: f32 = wheel
        .read()
        .map(|event| wheel_delta(event.unit, event.y, config.input.scroll_speed))
        .sum();
    if delta == 0.0 {
        return;
    }
    let change = controller.scroll_by(delta);
    move_camera_to_section(change, &mut camera);
}

fn move_camera_to_section(
    change: Option<SectionChange>,
    camera: &mut Query<(&mut Transform, &mut OrbitController), With<SceneCamera>>,
) {
    let Some(change) = change else {
        return;
    };
    if let Ok((mut transform, mut orbit)) = camera.single_mut() {
        apply_camera_pose(change.to.camera_pose(), &mut transform, &mut orbit);
    }
}
