#![deny(unsafe_code)]

use bevy::input::mouse::MouseMotion;
use bevy::input::ButtonInput;
use bevy::prelude::*;
use core::f32::consts::*;

/// Damped orbit camera: left drag orbits, right drag pans.
#[derive(Default)]
pub struct CameraControllerPlugin;

impl Plugin for CameraControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, run_orbit_controller);
    }
}

/// Rotation per pixel of mouse motion at `sensitivity = 1`.
pub const RADIANS_PER_DOT: f32 = 1.0 / 180.0;

/// Keeps the camera off the poles so `looking_at` stays well defined.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Orbit camera controller component.
///
/// Input feeds angular and pan velocities which decay by `damping` each
/// frame, so the camera keeps drifting briefly after the drag ends.
#[derive(Component, Debug, Clone, Reflect)]
pub struct OrbitController {
    /// Enables this controller when `true`.
    pub enabled: bool,
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    /// Rotation around world Y.
    pub yaw: f32,
    /// Elevation above the target's horizontal plane.
    pub pitch: f32,
    /// Distance from the target.
    pub distance: f32,
    /// Fraction of the remaining velocity applied and removed per frame.
    pub damping: f32,
    /// Multiplier for orbit rotation speed.
    pub sensitivity: f32,
    /// World units panned per pixel, per unit of distance.
    pub pan_speed: f32,
    pub orbit_button: MouseButton,
    pub pan_button: MouseButton,
    /// Pending yaw/pitch velocity.
    pub orbit_velocity: Vec2,
    /// Pending pan velocity in camera right/up axes.
    pub pan_velocity: Vec2,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            enabled: true,
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance: 5.0,
            damping: 0.05,
            sensitivity: 1.0,
            pan_speed: 0.002,
            orbit_button: MouseButton::Left,
            pan_button: MouseButton::Right,
            orbit_velocity: Vec2::ZERO,
            pan_velocity: Vec2::ZERO,
        }
    }
}

impl OrbitController {
    /// Controller placed at `position`, looking at `target`.
    pub fn look_from(position: Vec3, target: Vec3) -> Self {
        let mut controller = Self::default();
        controller.reset(position, target);
        controller
    }

    /// Jump to a new pose and drop any residual motion.
    pub fn reset(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        let distance = offset.length();
        self.target = target;
        self.distance = distance.max(f32::EPSILON);
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = if distance > 0.0 {
            (offset.y / distance).clamp(-1.0, 1.0).asin()
        } else {
            0.0
        };
        self.orbit_velocity = Vec2::ZERO;
        self.pan_velocity = Vec2::ZERO;
    }

    /// Camera position implied by target, angles and distance.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }

    /// Consume one frame of input and advance the damped motion.
    pub fn update(&mut self, orbit_delta: Vec2, pan_delta: Vec2) {
        self.orbit_velocity += orbit_delta * RADIANS_PER_DOT * self.sensitivity;
        self.pan_velocity += pan_delta * self.pan_speed * self.distance;

        let damping = self.damping.clamp(0.0, 1.0);
        let orbit_step = self.orbit_velocity * damping;
        let pan_step = self.pan_velocity * damping;
        self.orbit_velocity -= orbit_step;
        self.pan_velocity -= pan_step;

        self.yaw -= orbit_step.x;
        self.pitch = (self.pitch + orbit_step.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        if pan_step != Vec2::ZERO {
            let transform = self.transform();
            let right = *transform.right();
            let up = *transform.up();
            self.target += -right * pan_step.x + up * pan_step.y;
        }

        if self.orbit_velocity.length_squared() < 1e-10 {
            self.orbit_velocity = Vec2::ZERO;
        }
        if self.pan_velocity.length_squared() < 1e-10 {
            self.pan_velocity = Vec2::ZERO;
        }
    }
}

fn run_orbit_controller(
    mut mouse_motion_events: MessageReader<MouseMotion>,
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    mut query: Query<(&mut Transform, &mut OrbitController), With<Camera>>,
) {
    // Mouse look - accumulate motion events
    let mut mouse_delta = Vec2::ZERO;
    for event in mouse_motion_events.read() {
        mouse_delta += event.delta;
    }

    let Ok((mut transform, mut controller)) = query.single_mut() else {
        return;
    };
    if !controller.enabled {
        return;
    }

    let orbit_delta = if mouse_button_input.pressed(controller.orbit_button) {
        mouse_delta
    } else {
        Vec2::ZERO
    };
    let pan_delta = if mouse_button_input.pressed(controller.pan_button) {
        mouse_delta
    } else {
        Vec2::ZERO
    };

    controller.update(orbit_delta, pan_delta);
    *transform = controller.transform();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_look_from_round_trips() {
        let position = Vec3::new(0.0, 2.0, 5.0);
        let controller = OrbitController::look_from(position, Vec3::ZERO);
        assert!(approx(controller.eye(), position));
        assert!((controller.distance - position.length()).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut controller = OrbitController::look_from(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        controller.update(Vec2::new(120.0, 40.0), Vec2::ZERO);
        for _ in 0..400 {
            controller.update(Vec2::ZERO, Vec2::ZERO);
        }
        assert!((controller.eye().length() - 5.0).abs() < 1e-4);
        assert!(controller.yaw != 0.0);
        assert_eq!(controller.orbit_velocity, Vec2::ZERO);
    }

    #[test]
    fn test_motion_is_damped() {
        let mut controller = OrbitController::look_from(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        controller.update(Vec2::new(100.0, 0.0), Vec2::ZERO);
        let first = controller.yaw;
        controller.update(Vec2::ZERO, Vec2::ZERO);
        let drift = controller.yaw - first;

        assert!(first < 0.0);
        assert!(drift < 0.0 && drift.abs() < first.abs());
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut controller = OrbitController::look_from(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        for _ in 0..500 {
            controller.update(Vec2::new(0.0, 10_000.0), Vec2::ZERO);
        }
        assert!(controller.pitch <= PITCH_LIMIT);
    }

    #[test]
    fn test_pan_moves_target() {
        let mut controller = OrbitController::look_from(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        controller.update(Vec2::new(50.0, 0.0), Vec2::ZERO);
        let yaw = controller.yaw;
        controller.reset(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        controller.update(Vec2::ZERO, Vec2::new(50.0, 0.0));

        assert!(controller.target.x < 0.0);
        assert!(yaw != 0.0);
        assert_eq!(controller.yaw, 0.0);
    }
}
