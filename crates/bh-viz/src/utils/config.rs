//! Configuration file management.
//!
//! Handles loading user preferences from `~/.bh-viz.toml`.

use anyhow::Context;
use bh_viz_core::{NamedPreset, ParameterUpdate, Preset, ViewState, WorldUnits};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 900;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;
const MAX_RESOLUTION: u32 = 4096;

const CONFIG_TEMPLATE: &str = r#"# bh-viz configuration file

# Window size in logical pixels (default: 1280 x 900)
# window_width = 1280
# window_height = 900

# Side length of the rendered frame in pixels, 1-4096 (default: 512)
# resolution = 512

# Frame extent multiplier, smaller zooms in (default: 1.0)
# zoom = 1.0

# Degrees of rotation per render tick (default: 0.5)
# angle_step = 0.5

# World grid units: "schwarzschild_radii" or "kilometres"
# units = "schwarzschild_radii"

# Render on a background thread (default: true)
# background_render = true

# Preset applied at start-up: sagittarius_a, m87, cygnus_x1, custom
# preset = "sagittarius_a"

# =============================================================================
# Parameter overrides, applied after the start-up preset
# =============================================================================

# [parameters]
# mass = 4.3e6
# spin = 0.7
# accretion_rate = 0.01
# disk_inner_radius = 3.0
# disk_outer_radius = 20.0
# disk_temp = 1e6
# disk_turbulence = 0.15
# light_bending = 0.95
# doppler_effect = 0.65

# =============================================================================
# Extra presets, bound to keys 4-9 in declaration order
# =============================================================================

# [[presets]]
# name = "Stellar remnant"
# mass = 8.0
# spin = 0.3
# disk_temp = 5e6
"#;

#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Config {
    pub window_width: Option<u32>,
    pub window_height: Option<u32>,
    pub resolution: Option<u32>,
    pub zoom: Option<f64>,
    pub angle_step: Option<f64>,
    pub units: Option<WorldUnits>,
    pub background_render: Option<bool>,
    pub preset: Option<Preset>,
    pub parameters: Option<ParameterUpdate>,
    #[serde(default)]
    pub presets: Vec<NamedPreset>,
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".bh-viz.toml"))
    }

    /// Loads the user config, creating the template on first run. Any problem
    /// is logged and the defaults are used.
    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            match fs::write(&path, CONFIG_TEMPLATE) {
                Ok(()) => log::info!("Created config template at {:?}", path),
                Err(e) => log::warn!("Could not write config template {:?}: {}", path, e),
            }
        }

        Self::read(&path).unwrap_or_else(|e| {
            log::warn!("{:#}; using defaults", e);
            Self::default()
        })
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        Self::parse(&text).with_context(|| format!("Failed to parse config {:?}", path))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn window_size(&self) -> (u32, u32) {
        (
            self.window_width.unwrap_or(DEFAULT_WINDOW_WIDTH),
            self.window_height.unwrap_or(DEFAULT_WINDOW_HEIGHT),
        )
    }

    /// Initial view, with the viewer defaulting to Schwarzschild-radius units.
    pub fn view(&self) -> ViewState {
        let defaults = ViewState::default();
        ViewState {
            resolution: self
                .resolution
                .unwrap_or(defaults.resolution)
                .clamp(1, MAX_RESOLUTION),
            zoom: self
                .zoom
                .unwrap_or(defaults.zoom)
                .clamp(MIN_ZOOM, MAX_ZOOM),
            angle_step: self.angle_step.unwrap_or(defaults.angle_step),
            units: self.units.unwrap_or(WorldUnits::SchwarzschildRadii),
            ..defaults
        }
    }

    pub fn background_render(&self) -> bool {
        self.background_render.unwrap_or(true)
    }

    pub fn preset(&self) -> Preset {
        self.preset.unwrap_or_default()
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
