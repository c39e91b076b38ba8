//! # Bulb Light State
//!
//! On/off state of the clickable bulb and the light levels it implies.

use bevy::math::Vec3;

/// Point light intensity while the bulb is on.
pub const POINT_LIGHT_ON: f32 = 150.0;
/// Spot light intensity while the bulb is on.
pub const SPOT_LIGHT_ON: f32 = 100.0;
/// Emissive intensity of every bulb mesh while the bulb is on.
pub const EMISSIVE_ON: f32 = 0.5;
/// How far below the hit point the spot light aims.
pub const SPOT_DROP: f32 = 20.0;

/// Light levels and placement to apply after a toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulbLighting {
    pub on: bool,
    pub point_intensity: f32,
    pub spot_intensity: f32,
    pub emissive_intensity: f32,
    /// Where both lights sit, the last clicked point
    pub light_position: Option<Vec3>,
    /// Where the spot light aims
    pub spot_target: Option<Vec3>,
}

/// Whether the bulb is lit and where it was last clicked.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BulbState {
    on: bool,
    last_hit: Option<Vec3>,
}

impl BulbState {
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Flip the light and move it to `hit`, the nearest intersection.
    pub fn toggle_at(&mut self, hit: Vec3) -> BulbLighting {
        self.on = !self.on;
        self.last_hit = Some(hit);
        self.lighting()
    }

    /// Current light levels.
    pub fn lighting(&self) -> BulbLighting {
        let level = |on_value: f32| if self.on { on_value } else { 0.0 };
        BulbLighting {
            on: self.on,
            point_intensity: level(POINT_LIGHT_ON),
            spot_intensity: level(SPOT_LIGHT_ON),
            emissive_intensity: level(EMISSIVE_ON),
            light_position: self.last_hit,
            spot_target: self.last_hit.map(|p| p - Vec3::Y * SPOT_DROP),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_on_moves_lights() {
        let mut bulb = BulbState::default();
        let hit = Vec3::new(0.2, 1.0, -0.3);
        let lighting = bulb.toggle_at(hit);

        assert!(lighting.on);
        assert_eq!(lighting.point_intensity, 150.0);
        assert_eq!(lighting.spot_intensity, 100.0);
        assert_eq!(lighting.emissive_intensity, 0.5);
        assert_eq!(lighting.light_position, Some(hit));
        assert_eq!(lighting.spot_target, Some(Vec3::new(0.2, -19.0, -0.3)));
    }

    #[test]
    fn test_double_toggle_restores_darkness() {
        let mut bulb = BulbState::default();
        let before = bulb.lighting();
        assert_eq!(before.point_intensity, 0.0);
        assert_eq!(before.spot_intensity, 0.0);

        bulb.toggle_at(Vec3::ONE);
        let after = bulb.toggle_at(Vec3::ONE);

        assert!(!after.on);
        assert_eq!(after.point_intensity, before.point_intensity);
        assert_eq!(after.spot_intensity, before.spot_intensity);
        assert_eq!(after.emissive_intensity, 0.0);
    }
}
