//! Navigator settings and environment overrides.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::infra::Region;
use crate::navigation::{LocationMarkers, RouteStep};

pub const DEFAULT_SETTLE_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct NavigatorConfig {
    /// Wait after every executed action before the next recognition.
    pub settle_delay: Duration,
    pub location_label: String,
    pub location_region: Option<Region>,
    pub location_markers: LocationMarkers,
    pub obstacle_label: String,
    pub obstacle_region: Option<Region>,
    pub obstacle_markers: Vec<String>,
    /// Side-step taken once before a step when an obstacle is reported.
    pub recovery_step: RouteStep,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_MS),
            location_label: "MapInfoCheck".to_string(),
            location_region: Some(Region::new(0, 0, 256, 140)),
            location_markers: LocationMarkers::default(),
            obstacle_label: "ObstacleCheck".to_string(),
            obstacle_region: Some(Region::new(0, 0, 720, 1280)),
            obstacle_markers: vec!["障碍物".to_string(), "无法通过".to_string()],
            recovery_step: RouteStep::MoveUp,
        }
    }
}

impl NavigatorConfig {
    /// Defaults, overridden by `GRIDNAV_SETTLE_MS` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ms) = env_var::<u64>("GRIDNAV_SETTLE_MS")? {
            config.settle_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

/// Reads and parses an environment variable. Unset is `Ok(None)`, unparsable is an error.
pub fn env_var<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: "<non-unicode>".to_string(),
        }),
    }
}

pub fn env_var_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    Ok(env_var(key)?.unwrap_or(default))
}
