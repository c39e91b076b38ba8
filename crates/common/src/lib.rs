//! # Starbulb Common
//!
//! Engine-independent core of the Starbulb scene.
//!
//! ## Modules
//!
//! - `parameters`: Galaxy parameter record, colors and behavioral options
//! - `galaxy`: Particle buffers, the spiral generator and the wave animator
//! - `sections`: Scroll offset to section mapping and per-section layout
//! - `bulb`: Light bulb on/off state and the light levels it implies
//! - `tuning`: Field table and draft/commit semantics of the tuning panel
//! - `controller`: Scene state owner and the per-frame step
//! - `config`: `starbulb.toml` loading
//! - `error`: Error types
//!
//! ## Architecture
//!
//! Everything here is plain data plus functions over it. The runtime crate
//! wraps [`SceneController`] in a Bevy resource and turns its
//! [`RenderCommand`]s into meshes, lights and visibility.

pub mod bulb;
pub mod config;
pub mod controller;
pub mod error;
pub mod galaxy;
pub mod parameters;
pub mod sections;
pub mod tuning;

pub use bulb::{BulbLighting, BulbState};
pub use config::{StarbulbConfig, DEFAULT_CONFIG_FILE, EXAMPLE_CONFIG};
pub use controller::{RenderCommand, SceneController};
pub use error::{ConfigError, GalaxyError, GalaxyResult};
pub use galaxy::{advance, generate, Galaxy, OriginalPositions, ParticleBuffer};
pub use parameters::{GalaxyOptions, GalaxyParameters, JitterScaling, Rgb, WaveDamping};
pub use sections::{CameraPose, Section, SectionChange, SectionTracker, SECTION_COUNT};
pub use tuning::{FieldRange, PanelEdit, ParameterField, TuningPanel};

/// Common imports for hosts of the scene.
pub mod prelude {
    pub use crate::bulb::{BulbLighting, BulbState};
    pub use crate::config::StarbulbConfig;
    pub use crate::controller::{RenderCommand, SceneController};
    pub use crate::error::{ConfigError, GalaxyError};
    pub use crate::galaxy::{Galaxy, ParticleBuffer};
    pub use crate::parameters::{GalaxyOptions, GalaxyParameters, Rgb};
    pub use crate::sections::{CameraPose, Section};
    pub use crate::tuning::{PanelEdit, ParameterField, TuningPanel};
}
