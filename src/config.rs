//! Persisted planner configuration, read once at init from an external JSON
//! source. The core only consumes the scale factor, applied uniformly to
//! vertex positions before any cutting; the structural parameters are passed
//! through to the workflow layer.

use crate::errors::ConfigError;
use crate::float_types::Real;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Uniform scale applied to mesh vertices at init.
    pub scale: Real,
    /// Curve distance between the two members of a fibula ghost-plane pair
    /// (safety margin between cut angles).
    pub ghost_plane_spacing: Real,
    /// Rendered side length of a cutting plane widget.
    pub plane_size: Real,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            scale: 1.0,
            ghost_plane_spacing: 40.0,
            plane_size: 25.0,
        }
    }
}

impl PlannerConfig {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(source)?;
        if !config.scale.is_finite() || config.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(config.scale));
        }
        Ok(config)
    }
}
