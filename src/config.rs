//! Settings for a lightning strike and the listeners hearing it.
//!
//! Both structs follow the builder pattern and load from JSON. Any field
//! missing from the JSON keeps its default.
//!
//! ```
//! use thunderclap::ThunderConfig;
//!
//! let config = ThunderConfig::from_json_str(r#"{ "max_segments": 64, "seed": 7 }"#).unwrap();
//! assert_eq!(config.max_segments, 64);
//! assert_eq!(config.sample_rate_hz, 44_100);
//! ```

use crate::error::Result;
use crate::geometry::Point3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shape of the cylinder a bolt is loosely confined to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoltConfig {
    /// Height of the cloud end of the bolt above ground.
    pub height_meters: f64,
    /// Standard deviation of the horizontal offset of each end.
    pub radius_meters: f64,
    /// Midpoint displacement multiplier. 1.0 looks like lightning.
    pub jaggedness: f64,
}

impl Default for BoltConfig {
    fn default() -> Self {
        Self {
            height_meters: 3000.0,
            radius_meters: 1000.0,
            jaggedness: 1.0,
        }
    }
}

impl BoltConfig {
    pub fn new(height_meters: f64, radius_meters: f64, jaggedness: f64) -> Self {
        Self {
            height_meters,
            radius_meters,
            jaggedness,
        }
    }

    pub fn with_height(mut self, meters: f64) -> Self {
        self.height_meters = meters;
        self
    }

    pub fn with_radius(mut self, meters: f64) -> Self {
        self.radius_meters = meters;
        self
    }

    pub fn with_jaggedness(mut self, jaggedness: f64) -> Self {
        self.jaggedness = jaggedness;
        self
    }
}

/// Everything needed to build a [`Storm`](crate::Storm).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThunderConfig {
    /// Segment budget of every generated bolt.
    pub max_segments: usize,
    /// Seed for the bolt's random engine.
    pub seed: u64,
    /// Bolt shape.
    pub bolt: BoltConfig,
    /// Listener positions; index `i` renders to channel `i`.
    pub ears: Vec<Point3>,
    /// Output sample rate.
    pub sample_rate_hz: u32,
    /// Peak level applied before publishing, or `None` to publish raw.
    pub peak_level: Option<f32>,
}

impl Default for ThunderConfig {
    fn default() -> Self {
        Self {
            max_segments: 1000,
            seed: 0,
            bolt: BoltConfig::default(),
            // Stereo pair 20 cm apart, 2.5 km from the strike axis.
            ears: vec![Point3::new(2500.0, 0.1, 0.0), Point3::new(2500.0, -0.1, 0.0)],
            sample_rate_hz: 44_100,
            peak_level: Some(0.9),
        }
    }
}

impl ThunderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_segments(mut self, count: usize) -> Self {
        self.max_segments = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_bolt(mut self, bolt: BoltConfig) -> Self {
        self.bolt = bolt;
        self
    }

    pub fn with_ears(mut self, ears: Vec<Point3>) -> Self {
        self.ears = ears;
        self
    }

    pub fn with_sample_rate(mut self, hz: u32) -> Self {
        self.sample_rate_hz = hz;
        self
    }

    pub fn with_peak_level(mut self, level: Option<f32>) -> Self {
        self.peak_level = level;
        self
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
