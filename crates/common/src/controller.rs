//! # Scene Controller
//!
//! Single owner of everything the scene mutates: parameters, the current
//! galaxy, the bulb light state and the scroll section. Input handlers and
//! the frame loop all go through it, which keeps the generator and the
//! animator from ever touching the buffers at the same time.
//!
//! The frame loop is exposed as [`SceneController::frame`], taking the
//! controller and the elapsed time and returning the next controller
//! together with a [`RenderCommand`] for whatever host drives it.

use bevy::math::Vec3;
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::bulb::{BulbLighting, BulbState};
use crate::error::GalaxyResult;
use crate::galaxy::{advance, generate, Galaxy};
use crate::parameters::{GalaxyOptions, GalaxyParameters};
use crate::sections::{CameraPose, Section, SectionChange, SectionTracker};

// ============================================================================
// Render Command
// ============================================================================

/// What the host should do with the frame just computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCommand {
    /// Generation of the galaxy the buffers belong to
    pub galaxy_generation: u64,
    /// The live position buffer changed and must be re-uploaded. Only set
    /// while the galaxy is on screen; the animation is a function of time
    /// alone, so skipped frames need no catching up.
    pub upload_positions: bool,
    pub galaxy_visible: bool,
    pub model_visible: bool,
    pub panel_visible: bool,
}

// ============================================================================
// Controller
// ============================================================================

/// Explicit application state for the whole scene.
#[derive(Resource)]
pub struct SceneController {
    params: GalaxyParameters,
    options: GalaxyOptions,
    galaxy: Galaxy,
    bulb: BulbState,
    sections: SectionTracker,
    rng: StdRng,
}

impl SceneController {
    /// Build the controller and its first galaxy.
    ///
    /// A `seed` makes every generated galaxy reproducible.
    pub fn new(params: GalaxyParameters, options: GalaxyOptions, seed: Option<u64>) -> GalaxyResult<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let buffer = generate(&params, &options, &mut rng)?;
        info!(count = params.count, "Initial galaxy generated");

        Ok(Self {
            params,
            options,
            galaxy: Galaxy::new(buffer, 1),
            bulb: BulbState::default(),
            sections: SectionTracker::default(),
            rng,
        })
    }

    pub fn params(&self) -> &GalaxyParameters {
        &self.params
    }

    pub fn galaxy(&self) -> &Galaxy {
        &self.galaxy
    }

    pub fn bulb(&self) -> &BulbState {
        &self.bulb
    }

    pub fn section(&self) -> Section {
        self.sections.current()
    }

    // ------------------------------------------------------------------------
    // Galaxy
    // ------------------------------------------------------------------------

    /// Replace the galaxy with one built from `params`.
    ///
    /// Parameters are validated first; on error the previous galaxy and
    /// parameters are left untouched. Returns the new generation.
    pub fn regenerate(&mut self, params: GalaxyParameters) -> GalaxyResult<u64> {
        let buffer = generate(&params, &self.options, &mut self.rng)?;
        let generation = self.galaxy.generation + 1;

        self.galaxy = Galaxy::new(buffer, generation);
        self.params = params;

        info!(generation, count = self.params.count, "Galaxy regenerated");
        Ok(generation)
    }

    /// Apply wave edits. These are read every frame and need no rebuild.
    pub fn set_wave(&mut self, wave_speed: f32, wave_height: f32) {
        self.params.wave_speed = wave_speed;
        self.params.wave_height = wave_height;
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    pub fn on_scroll(&mut self, scroll_y: f32) -> Option<SectionChange> {
        let change = self.sections.set_scroll(scroll_y);
        self.log_section_change(change);
        change
    }

    pub fn scroll_by(&mut self, delta: f32) -> Option<SectionChange> {
        let change = self.sections.scroll_by(delta);
        self.log_section_change(change);
        change
    }

    pub fn on_resize(&mut self, width: f32, height: f32) -> Option<SectionChange> {
        let change = self.sections.resize(width, height);
        self.log_section_change(change);
        change
    }

    /// Clicks only reach the bulb in its own section and once it exists.
    pub fn accepts_bulb_clicks(&self, model_loaded: bool) -> bool {
        model_loaded && self.sections.current() == Section::Bulb
    }

    /// Toggle the bulb at the nearest intersection point.
    pub fn on_bulb_hit(&mut self, point: Vec3) -> BulbLighting {
        let lighting = self.bulb.toggle_at(point);
        info!("Light bulb clicked! Light is now: {}", if lighting.on { "ON" } else { "OFF" });
        lighting
    }

    /// Camera placement once the bulb model has loaded: always the
    /// opening view, whatever section is showing.
    pub fn on_model_loaded(&self) -> CameraPose {
        info!("Model loaded");
        Section::Galaxy.camera_pose()
    }

    fn log_section_change(&self, change: Option<SectionChange>) {
        if let Some(change) = change {
            info!("Current section: {}", change.to.index());
        }
    }

    // ------------------------------------------------------------------------
    // Frame Loop
    // ------------------------------------------------------------------------

    /// Animate the galaxy for `elapsed_seconds` and describe the frame.
    pub fn step(&mut self, elapsed_seconds: f32) -> RenderCommand {
        let Galaxy { buffer, original, .. } = &mut self.galaxy;
        advance(buffer, original, elapsed_seconds, &self.params, self.options.damping);

        let section = self.sections.current();
        RenderCommand {
            galaxy_generation: self.galaxy.generation,
            upload_positions: section.galaxy_visible(),
            galaxy_visible: section.galaxy_visible(),
            model_visible: section.model_visible(),
            panel_visible: section.panel_visible(),
        }
    }

    /// Owned form of [`SceneController::step`] for hosts that thread state
    /// through their loop.
    pub fn frame(mut self, elapsed_seconds: f32) -> (Self, RenderCommand) {
        let command = self.step(elapsed_seconds);
        debug!(elapsed_seconds, "Frame stepped");
        (self, command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalaxyError;

    fn controller() -> SceneController {
        let params = GalaxyParameters {
            count: 500,
            ..Default::default()
        };
        SceneController::new(params, GalaxyOptions::default(), Some(1)).unwrap()
    }

    #[test]
    fn test_regenerate_replaces_galaxy() {
        let mut scene = controller();
        let first = scene.galaxy().clone();

        let params = GalaxyParameters {
            count: 800,
            ..scene.params().clone()
        };
        let generation = scene.regenerate(params).unwrap();

        assert_eq!(generation, first.generation + 1);
        assert_eq!(scene.galaxy().buffer.len(), 800);
        assert_eq!(scene.galaxy().original.len(), 800);
        assert_eq!(scene.params().count, 800);
    }

    #[test]
    fn test_rejected_regeneration_keeps_prior_state() {
        let mut scene = controller();
        let before = scene.galaxy().buffer.clone();
        let generation = scene.galaxy().generation;

        let bad = GalaxyParameters {
            radius: 0.0,
            ..scene.params().clone()
        };
        assert!(matches!(
            scene.regenerate(bad),
            Err(GalaxyError::InvalidParameter { field: "radius", .. })
        ));
        assert_eq!(scene.galaxy().buffer, before);
        assert_eq!(scene.galaxy().generation, generation);
        assert_eq!(scene.params().radius, 5.0);
    }

    #[test]
    fn test_frame_is_pure_in_time() {
        let scene = controller();
        let (scene, first) = scene.frame(1.5);
        let snapshot = scene.galaxy().buffer.clone();

        let (scene, _) = scene.frame(9.0);
        let (scene, again) = scene.frame(1.5);

        assert_eq!(first, again);
        assert!(first.upload_positions);
        assert_eq!(scene.galaxy().buffer, snapshot);
    }

    #[test]
    fn test_wave_edits_skip_regeneration() {
        let mut scene = controller();
        let generation = scene.galaxy().generation;
        scene.set_wave(4.0, 1.2);
        assert_eq!(scene.galaxy().generation, generation);
        assert_eq!(scene.params().wave_speed, 4.0);
        assert_eq!(scene.params().wave_height, 1.2);
    }

    #[test]
    fn test_sections_drive_visibility() {
        let mut scene = controller();
        scene.on_resize(1000.0, 800.0);

        let command = scene.step(0.0);
        assert!(command.galaxy_visible && command.panel_visible && !command.model_visible);
        assert!(!scene.accepts_bulb_clicks(true));

        scene.on_scroll(850.0);
        let command = scene.step(0.0);
        assert!(!command.galaxy_visible && !command.panel_visible && command.model_visible);
        assert!(!command.upload_positions);
        assert!(scene.accepts_bulb_clicks(true));
        assert!(!scene.accepts_bulb_clicks(false));
    }

    #[test]
    fn test_bulb_toggle_round_trip() {
        let mut scene = controller();
        let on = scene.on_bulb_hit(Vec3::new(0.0, 1.0, 0.0));
        assert!(on.on);
        let off = scene.on_bulb_hit(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(off.point_intensity, 0.0);
        assert_eq!(off.spot_intensity, 0.0);
        assert!(!scene.bulb().is_on());
    }

    #[test]
    fn test_model_load_resets_to_opening_view() {
        let mut scene = controller();
        scene.on_resize(1000.0, 800.0);
        scene.on_scroll(800.0);
        assert_eq!(scene.section(), Section::Bulb);
        assert_eq!(scene.on_model_loaded().position, Vec3::new(0.0, 2.0, 5.0));
    }
}
