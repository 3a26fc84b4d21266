//! Configuration system
//!
//! Collision tolerances and toggles are explicit values threaded through
//! every query instead of process-wide globals, so two worlds (or two tests)
//! can run with different settings side by side.

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec4;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        let config = if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };
        log::debug!("Loaded configuration from {path}");
        Ok(config)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value parsed but is out of range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Narrow-phase tuning shared by every collision query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Compute push vectors on hits; boolean-only callers can switch this off
    pub compute_push_vectors: bool,

    /// Outward bias added to push vectors, and the tolerance for
    /// point-on-line and coincident-point tests
    pub epsilon: f32,

    /// Segment count used when circles and donuts are tessellated for drawing
    pub circle_segments: u32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            compute_push_vectors: true,
            epsilon: 1e-3,
            circle_segments: 32,
        }
    }
}

impl CollisionConfig {
    /// Config for boolean-only queries
    pub fn without_push_vectors() -> Self {
        Self {
            compute_push_vectors: false,
            ..Self::default()
        }
    }

    /// Check that the values make geometric sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::Invalid {
                field: "epsilon",
                reason: format!("must be finite and non-negative, got {}", self.epsilon),
            });
        }
        if self.circle_segments < 3 {
            return Err(ConfigError::Invalid {
                field: "circle_segments",
                reason: format!("need at least 3 segments, got {}", self.circle_segments),
            });
        }
        Ok(())
    }
}

impl Config for CollisionConfig {}

/// Broad-phase grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Side length of one grid cell in world units
    pub cell_size: f32,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self { cell_size: 64.0 }
    }
}

impl Config for PartitionConfig {}

/// Colors and extents used by the collision debug visualizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugDrawConfig {
    /// Length used when drawing rays and infinite lines
    pub line_extent: f32,

    /// Shapes that are not colliding
    pub shape_color: Vec4,

    /// Shapes that are colliding
    pub colliding_color: Vec4,

    /// Bounding boxes
    pub bounds_color: Vec4,

    /// Push vectors
    pub push_color: Vec4,

    /// Occupied broad-phase cells
    pub cell_color: Vec4,
}

impl Default for DebugDrawConfig {
    fn default() -> Self {
        Self {
            line_extent: 10_000.0,
            shape_color: Vec4::new(0.0, 1.0, 0.0, 0.3),     // Green, semi-transparent
            colliding_color: Vec4::new(1.0, 0.0, 0.0, 0.5), // Red, semi-transparent
            bounds_color: Vec4::new(1.0, 1.0, 0.0, 0.6),
            push_color: Vec4::new(0.0, 1.0, 1.0, 1.0),
            cell_color: Vec4::new(0.5, 0.8, 1.0, 0.15), // Light blue, transparent
        }
    }
}

impl Config for DebugDrawConfig {}
