//! Session tuning knobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::{NormPoint, ProfileLine};

/// Configuration for a [`TerrainSession`](crate::session::TerrainSession).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minimum gap between two drag redraws, in milliseconds.
    pub throttle_ms: u64,

    /// Profile samples while dragging.
    pub draft_samples: usize,

    /// Profile samples for a settled line.
    pub full_samples: usize,

    /// World units across the whole map, used for profile distances.
    pub world_scale: f64,

    /// Profile line shown before the user draws one.
    pub default_profile_line: ProfileLine,

    /// Maximum number of master levels listed in the legend.
    pub legend_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 32,
            draft_samples: 60,
            full_samples: 120,
            world_scale: 1000.0,
            default_profile_line: ProfileLine::new(NormPoint::new(0.15, 0.5), NormPoint::new(0.85, 0.5)),
            legend_limit: 6,
        }
    }
}

impl SessionConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TerrainError;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.throttle(), Duration::from_millis(32));
        assert_eq!(config.draft_samples, 60);
        assert_eq!(config.full_samples, 120);
        assert_eq!(config.legend_limit, 6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "throttle_ms": 16,
            "default_profile_line": {
                "start": { "x": 0.0, "y": 0.0 },
                "end": { "x": 1.0, "y": 1.0 }
            }
        }"#;
        let config = SessionConfig::from_json_str(json).unwrap();
        assert_eq!(config.throttle_ms, 16);
        assert_eq!(config.default_profile_line.end, NormPoint::new(1.0, 1.0));
        assert_eq!(config.full_samples, 120);
        assert_eq!(config.world_scale, 1000.0);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = SessionConfig::from_json_str("{ throttle_ms: ").unwrap_err();
        assert!(matches!(err, TerrainError::Config(_)));
    }
}
