//! # Tuning Panel Model
//!
//! Field table and edit semantics behind the on-screen tuning panel.
//!
//! Generator fields are edited on a draft that is only handed back when
//! the edit finishes, so the galaxy is rebuilt once per gesture rather than
//! on every step. Wave fields are read live by the animator and apply
//! immediately.

use crate::parameters::GalaxyParameters;

// ============================================================================
// Field Table
// ============================================================================

/// An editable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    Count,
    Size,
    Radius,
    Branches,
    Spin,
    Randomness,
    RandomnessPower,
    InsideColor,
    OutsideColor,
    WaveSpeed,
    WaveHeight,
}

/// Range and step of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl FieldRange {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamp into range and snap onto the step grid anchored at `min`.
    pub fn snap(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

impl ParameterField {
    pub const ALL: [ParameterField; 11] = [
        ParameterField::Count,
        ParameterField::Size,
        ParameterField::Radius,
        ParameterField::Branches,
        ParameterField::Spin,
        ParameterField::Randomness,
        ParameterField::RandomnessPower,
        ParameterField::InsideColor,
        ParameterField::OutsideColor,
        ParameterField::WaveSpeed,
        ParameterField::WaveHeight,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ParameterField::Count => "count",
            ParameterField::Size => "size",
            ParameterField::Radius => "radius",
            ParameterField::Branches => "branches",
            ParameterField::Spin => "spin",
            ParameterField::Randomness => "randomness",
            ParameterField::RandomnessPower => "randomnessPower",
            ParameterField::InsideColor => "insideColor",
            ParameterField::OutsideColor => "outsideColor",
            ParameterField::WaveSpeed => "waveSpeed",
            ParameterField::WaveHeight => "waveHeight",
        }
    }

    /// Numeric range, `None` for color fields.
    pub fn range(&self) -> Option<FieldRange> {
        match self {
            ParameterField::Count => Some(FieldRange::new(100.0, 1_000_000.0, 100.0)),
            ParameterField::Size => Some(FieldRange::new(0.001, 0.1, 0.001)),
            ParameterField::Radius => Some(FieldRange::new(0.01, 20.0, 0.01)),
            ParameterField::Branches => Some(FieldRange::new(2.0, 20.0, 1.0)),
            ParameterField::Spin => Some(FieldRange::new(-5.0, 5.0, 0.001)),
            ParameterField::Randomness => Some(FieldRange::new(0.0, 2.0, 0.001)),
            ParameterField::RandomnessPower => Some(FieldRange::new(1.0, 10.0, 0.001)),
            ParameterField::InsideColor | ParameterField::OutsideColor => None,
            ParameterField::WaveSpeed => Some(FieldRange::new(0.0, 5.0, 0.1)),
            ParameterField::WaveHeight => Some(FieldRange::new(0.0, 2.0, 0.1)),
        }
    }

    /// Whether a finished edit of this field rebuilds the galaxy.
    pub fn regenerates(&self) -> bool {
        !matches!(self, ParameterField::WaveSpeed | ParameterField::WaveHeight)
    }

    fn get(&self, params: &GalaxyParameters) -> f64 {
        match self {
            ParameterField::Count => params.count as f64,
            ParameterField::Size => params.size as f64,
            ParameterField::Radius => params.radius as f64,
            ParameterField::Branches => params.branches as f64,
            ParameterField::Spin => params.spin as f64,
            ParameterField::Randomness => params.randomness as f64,
            ParameterField::RandomnessPower => params.randomness_power as f64,
            ParameterField::WaveSpeed => params.wave_speed as f64,
            ParameterField::WaveHeight => params.wave_height as f64,
            ParameterField::InsideColor | ParameterField::OutsideColor => 0.0,
        }
    }

    fn set(&self, params: &mut GalaxyParameters, value: f64) {
        match self {
            ParameterField::Count => params.count = value.round() as u32,
            ParameterField::Size => params.size = value as f32,
            ParameterField::Radius => params.radius = value as f32,
            ParameterField::Branches => params.branches = value.round() as u32,
            ParameterField::Spin => params.spin = value as f32,
            ParameterField::Randomness => params.randomness = value as f32,
            ParameterField::RandomnessPower => params.randomness_power = value as f32,
            ParameterField::WaveSpeed => params.wave_speed = value as f32,
            ParameterField::WaveHeight => params.wave_height = value as f32,
            ParameterField::InsideColor | ParameterField::OutsideColor => {}
        }
    }

    /// Human-readable value, with as many decimals as the step needs.
    pub fn display(&self, params: &GalaxyParameters) -> String {
        match self {
            ParameterField::InsideColor => params.inside_color.to_hex(),
            ParameterField::OutsideColor => params.outside_color.to_hex(),
            ParameterField::Count | ParameterField::Branches => format!("{}", self.get(params)),
            _ => {
                let decimals = self
                    .range()
                    .map(|range| (-range.step.log10()).round().max(0.0) as usize)
                    .unwrap_or(3);
                format!("{:.*}", decimals, self.get(params))
            }
        }
    }
}

// ============================================================================
// Panel State
// ============================================================================

/// Result of a single nudge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelEdit {
    /// A generator field changed on the draft; nothing applied yet.
    Draft(ParameterField),
    /// Wave fields changed and should be applied now.
    Live { wave_speed: f32, wave_height: f32 },
}

/// Hue rotation per color step, in degrees.
pub const HUE_STEP_DEGREES: f32 = 1.0;

/// Selection and pending edits of the tuning panel.
#[derive(Debug, Clone)]
pub struct TuningPanel {
    selected: usize,
    draft: GalaxyParameters,
    committed: GalaxyParameters,
}

impl TuningPanel {
    pub fn new(params: GalaxyParameters) -> Self {
        Self {
            selected: 0,
            draft: params.clone(),
            committed: params,
        }
    }

    pub fn selected(&self) -> ParameterField {
        ParameterField::ALL[self.selected]
    }

    pub fn draft(&self) -> &GalaxyParameters {
        &self.draft
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % ParameterField::ALL.len();
    }

    pub fn select_previous(&mut self) {
        let len = ParameterField::ALL.len();
        self.selected = (self.selected + len - 1) % len;
    }

    /// Move the selected field by `steps` increments.
    pub fn nudge(&mut self, steps: i32) -> PanelEdit {
        let field = self.selected();
        match field {
            ParameterField::InsideColor => {
                self.draft.inside_color = self.draft.inside_color.rotate_hue(steps as f32 * HUE_STEP_DEGREES);
            }
            ParameterField::OutsideColor => {
                self.draft.outside_color = self.draft.outside_color.rotate_hue(steps as f32 * HUE_STEP_DEGREES);
            }
            _ => {
                if let Some(range) = field.range() {
                    let value = range.snap(field.get(&self.draft) + steps as f64 * range.step);
                    field.set(&mut self.draft, value);
                }
            }
        }

        if field.regenerates() {
            PanelEdit::Draft(field)
        } else {
            self.committed.wave_speed = self.draft.wave_speed;
            self.committed.wave_height = self.draft.wave_height;
            PanelEdit::Live {
                wave_speed: self.draft.wave_speed,
                wave_height: self.draft.wave_height,
            }
        }
    }

    /// End the current edit gesture.
    ///
    /// Returns the draft when it differs from the last committed parameters
    /// in a way that needs a rebuild.
    pub fn finish(&mut self) -> Option<GalaxyParameters> {
        if !self.committed.needs_regeneration(&self.draft) {
            return None;
        }
        self.committed = self.draft.clone();
        Some(self.draft.clone())
    }

    /// Drop pending edits and mirror `params`, e.g. after a rejected rebuild.
    pub fn sync(&mut self, params: &GalaxyParameters) {
        self.draft = params.clone();
        self.committed = params.clone();
    }
}
