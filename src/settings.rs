//! Simulation settings
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! reference wheel (a triangle with hub at haptic rate above the 2x2 ground).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::driver::DriverOptions;
use crate::error::{ConfigError, SettingsError};
use crate::sim::{GroundPlane, PhysicsParams, RingConfig, Simulation};

/// Wheel shape presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShapePreset {
    #[default]
    Triangle,
    Square,
    Pentagon,
    Hexagon,
}

impl ShapePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapePreset::Triangle => "Triangle",
            ShapePreset::Square => "Square",
            ShapePreset::Pentagon => "Pentagon",
            ShapePreset::Hexagon => "Hexagon",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "triangle" | "3" => Some(ShapePreset::Triangle),
            "square" | "4" => Some(ShapePreset::Square),
            "pentagon" | "5" => Some(ShapePreset::Pentagon),
            "hexagon" | "6" => Some(ShapePreset::Hexagon),
            _ => None,
        }
    }

    /// Perimeter point count for this preset
    pub fn perimeter_count(&self) -> usize {
        match self {
            ShapePreset::Triangle => 3,
            ShapePreset::Square => 4,
            ShapePreset::Pentagon => 5,
            ShapePreset::Hexagon => 6,
        }
    }
}

/// Everything needed to build and drive a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Wheel construction
    pub ring: RingConfig,
    /// Physics constants
    pub physics: PhysicsParams,
    /// Ground under the wheel
    pub ground: GroundPlane,
    /// Radius of the interaction proxy
    pub cursor_radius: f64,

    // === Loop ===
    /// Target tick rate (Hz); `null` ticks as fast as possible
    pub tick_rate_hz: Option<f64>,
    /// Largest dt handed to a single tick (seconds)
    pub max_dt: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ring: RingConfig::default(),
            physics: PhysicsParams::default(),
            ground: GroundPlane::new(DEFAULT_GROUND_HEIGHT, DEFAULT_GROUND_HALF_EXTENT),
            cursor_radius: DEFAULT_CURSOR_RADIUS,

            tick_rate_hz: Some(HAPTIC_RATE_HZ),
            max_dt: MAX_TICK_DT,
        }
    }
}

impl Settings {
    /// Create settings from a shape preset
    pub fn from_preset(preset: ShapePreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a shape preset (changes the perimeter count only)
    pub fn apply_preset(&mut self, preset: ShapePreset) {
        self.ring.perimeter_count = preset.perimeter_count();
        // Explicit positions are tied to the previous count
        self.ring.initial_positions = None;
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Driver pacing from these settings
    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            tick_rate_hz: self.tick_rate_hz,
            max_dt: self.max_dt,
        }
    }

    /// Check the cursor and loop settings (the ring and physics are checked
    /// when the simulation is built)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cursor_radius.is_finite() || self.cursor_radius < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "cursor_radius",
                value: self.cursor_radius,
            });
        }
        self.driver_options().validate()
    }

    /// Validate and build the simulation these settings describe
    pub fn build_simulation(&self) -> Result<Simulation, SettingsError> {
        self.validate()?;
        let topology = self.ring.build()?;
        Ok(Simulation::new(topology, self.physics, self.ground)?)
    }
}
