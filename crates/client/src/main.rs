//! Starbulb - spiral galaxy and light bulb scene
//!
//! Loads `starbulb.toml`, applies command line overrides, builds the scene
//! controller and hands everything to the runtime plugin.
//!
//! ## Controls
//! - Mouse wheel: scroll between the galaxy and the bulb section
//! - Left drag: orbit, right drag: pan
//! - Up/Down, Left/Right (Shift x10): tune galaxy parameters
//! - Left click on the bulb: toggle its light
//!
//! `--write-config PATH` saves the effective configuration and exits.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use clap::Parser;
use starbulb_common::{SceneController, StarbulbConfig, DEFAULT_CONFIG_FILE};
use starbulb_runtime::StarbulbRuntimePlugin;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "starbulb")]
#[command(about = "Spiral galaxy and light bulb scene")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to ./starbulb.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// glTF model path, relative to the asset folder
    #[arg(short, long)]
    model: Option<String>,

    /// Seed for reproducible galaxies
    #[arg(short, long, env = "STARBULB_SEED")]
    seed: Option<u64>,

    /// Particle count of the first galaxy
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Write the effective configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply(&self, config: &mut StarbulbConfig) {
        if let Some(model) = &self.model {
            config.bulb.model = model.clone();
        }
        if let Some(seed) = self.seed {
            config.generator.seed = Some(seed);
        }
        if let Some(count) = self.count {
            config.galaxy.count = count;
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup logging
    let filter = if args.verbose {
        EnvFilter::new("debug,wgpu=warn,naga=warn")
    } else {
        EnvFilter::new("info,wgpu=warn,naga=warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &args.config {
        Some(path) => StarbulbConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => StarbulbConfig::load_or_default(std::path::Path::new(DEFAULT_CONFIG_FILE)),
    };
    args.apply(&mut config);

    if let Some(path) = &args.write_config {
        config
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let controller = SceneController::new(
        config.galaxy.clone(),
        config.generator.options(),
        config.generator.seed,
    )
    .context("building the initial galaxy")?;

    info!(
        count = config.galaxy.count,
        seed = ?config.generator.seed,
        model = %config.bulb.model,
        "Starting Starbulb"
    );

    let window = &config.window;
    let primary_window = Window {
        title: window.title.clone(),
        resolution: WindowResolution::new(window.width, window.height),
        present_mode: bevy::window::PresentMode::Fifo, // VSync
        ..default()
    };

    let exit = App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(primary_window),
                    ..default()
                })
                // Logging goes through the subscriber installed above
                .disable::<LogPlugin>(),
        )
        .insert_resource(controller)
        .insert_resource(config)
        .add_plugins(StarbulbRuntimePlugin)
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(anyhow!("Starbulb exited with code {}", code)),
    }
}
