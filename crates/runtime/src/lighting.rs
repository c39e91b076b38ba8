//! # Scene Lighting
//!
//! Ambient and directional fill for the whole scene, plus the red point and
//! spot lights the bulb switches on. The bulb lights start dark and only
//! move or change level in response to [`BulbToggled`].

use std::f32::consts::FRAC_PI_4;

use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;
use starbulb_common::prelude::*;
use tracing::info;

use crate::bulb::BulbToggled;
use crate::SceneSet;

/// Ambient and directional level of the scene.
pub const FILL_LEVEL: f32 = 0.3;
/// Ambient brightness per unit of level.
const AMBIENT_BRIGHTNESS_PER_LEVEL: f32 = 800.0;
/// Directional illuminance (lux) per unit of level.
const DIRECTIONAL_LUX_PER_LEVEL: f32 = 10_000.0;
/// Range of both bulb lights.
pub const BULB_LIGHT_RANGE: f32 = 200.0;
/// Outer cone angle of the spot light.
pub const SPOT_ANGLE: f32 = FRAC_PI_4;
/// Fraction of the cone that fades out.
pub const SPOT_PENUMBRA: f32 = 0.5;

pub struct SceneLightingPlugin;

impl Plugin for SceneLightingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_lighting)
            .add_systems(Update, apply_bulb_lights.in_set(SceneSet::Apply));
    }
}

/// Marks the bulb's point light.
#[derive(Component)]
pub struct BulbPointLight;

/// Marks the bulb's spot light.
#[derive(Component)]
pub struct BulbSpotLight;

fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: FILL_LEVEL * AMBIENT_BRIGHTNESS_PER_LEVEL,
        affects_lightmapped_meshes: true,
    });

    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: FILL_LEVEL * DIRECTIONAL_LUX_PER_LEVEL,
            ..default()
        },
        Transform::from_xyz(0.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("DirectionalLight"),
    ));

    commands.spawn((
        PointLight {
            color: Color::srgb(1.0, 0.0, 0.0),
            intensity: 0.0,
            range: BULB_LIGHT_RANGE,
            ..default()
        },
        Transform::default(),
        BulbPointLight,
        Name::new("BulbPointLight"),
    ));

    commands.spawn((
        SpotLight {
            color: Color::srgb(1.0, 0.0, 0.0),
            intensity: 0.0,
            range: BULB_LIGHT_RANGE,
            outer_angle: SPOT_ANGLE,
            inner_angle: SPOT_ANGLE * (1.0 - SPOT_PENUMBRA),
            ..default()
        },
        Transform::default().looking_at(Vec3::NEG_Y, Vec3::Z),
        BulbSpotLight,
        Name::new("BulbSpotLight"),
    ));

    info!("Lighting setup complete");
}

/// Transform for the spot light: at `position`, aimed at `target`.
pub fn spot_transform(position: Vec3, target: Vec3) -> Transform {
    // Straight-down aims need an up vector that is not parallel to the beam.
    let up = if (target - position).normalize_or_zero().cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    Transform::from_translation(position).looking_at(target, up)
}

/// Move and power the bulb lights after a toggle.
pub fn apply_bulb_lights(
    mut toggles: MessageReader<BulbToggled>,
    config: Res<StarbulbConfig>,
    mut points: Query<(&mut PointLight, &mut Transform), (With<BulbPointLight>, Without<BulbSpotLight>)>,
    mut spots: Query<(&mut SpotLight, &mut Transform), (With<BulbSpotLight>, Without<BulbPointLight>)>,
) {
    let Some(BulbToggled(lighting)) = toggles.read().last().copied() else {
        return;
    };
    let scale = config.bulb.light_power_scale;

    for (mut light, mut transform) in points.iter_mut() {
        light.intensity = lighting.point_intensity * scale;
        if let Some(position) = lighting.light_position {
            transform.translation = position;
        }
    }

    for (mut light, mut transform) in spots.iter_mut() {
        light.intensity = lighting.spot_intensity * scale;
        if let (Some(position), Some(target)) = (lighting.light_position, lighting.spot_target) {
            *transform = spot_transform(position, target);
        }
    }
}
