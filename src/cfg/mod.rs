//! Simulation tunables.
//!
//! Defaults are compiled in; a `[simulation]` table in the user's
//! `config.toml` overrides any subset of them.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::body::RadiusRule;
use crate::sim::path::PathLimits;

#[cfg(not(target_family = "wasm"))]
pub mod storage;

#[cfg(not(target_family = "wasm"))]
const STORAGE_KEY: &str = "simulation";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLevels {
    pub min: i32,
    pub max: i32,
    pub default: i32,
}

impl Default for ZoomLevels {
    fn default() -> Self {
        Self {
            min: 1,
            max: 6,
            default: 4,
        }
    }
}

impl ZoomLevels {
    pub fn clamp(&self, level: i32) -> i32 {
        level.clamp(self.min, self.max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Most points a body's path buffer may hold.
    pub max_path_points: usize,
    /// Longest polyline a body's path buffer may hold, in model lengths.
    pub max_path_distance: f64,
    pub min_radius: f64,
    pub radius_coefficient: f64,
    /// Extra factor between user-facing `dt` and engine `dt`.
    pub engine_time_scale: f64,
    /// Vertical nudge used when separating overlapping bodies.
    pub collision_offset: f64,
    pub zoom: ZoomLevels,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_path_points: 2000,
            max_path_distance: 2000.0,
            min_radius: 0.25,
            radius_coefficient: 1.0,
            engine_time_scale: 1.0,
            collision_offset: 1.0,
            zoom: ZoomLevels::default(),
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "{name} must be finite and > 0, got {value}"
                )))
            }
        }

        if self.max_path_points == 0 {
            return Err(ConfigError::Invalid("max_path_points must be > 0".into()));
        }
        positive("max_path_distance", self.max_path_distance)?;
        positive("min_radius", self.min_radius)?;
        positive("radius_coefficient", self.radius_coefficient)?;
        positive("engine_time_scale", self.engine_time_scale)?;
        positive("collision_offset", self.collision_offset)?;

        let zoom = &self.zoom;
        if zoom.min > zoom.max || zoom.default < zoom.min || zoom.default > zoom.max {
            return Err(ConfigError::Invalid(format!(
                "zoom levels must satisfy min <= default <= max, got {} <= {} <= {}",
                zoom.min, zoom.default, zoom.max
            )));
        }
        Ok(())
    }

    pub fn radius_rule(&self) -> RadiusRule {
        RadiusRule {
            min_radius: self.min_radius,
            coefficient: self.radius_coefficient,
        }
    }

    pub fn path_limits(&self) -> PathLimits {
        PathLimits {
            max_points: self.max_path_points,
            max_distance: self.max_path_distance,
        }
    }

    /// Reads the stored config, falling back to defaults on any problem.
    #[cfg(not(target_family = "wasm"))]
    pub fn load() -> Self {
        match storage::load::<SimConfig>(STORAGE_KEY) {
            Ok(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    log::warn!("stored simulation config rejected, using defaults: {e}");
                    Self::default()
                }
            },
            Err(storage::LoadError::NotFoundInTable) => Self::default(),
            Err(e) => {
                log::warn!("could not load simulation config, using defaults: {e}");
                Self::default()
            }
        }
    }

    #[cfg(not(target_family = "wasm"))]
    pub fn save(&self) -> Result<(), storage::SaveError> {
        storage::save(STORAGE_KEY, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = SimConfig::from_toml_str(
            "max_path_points = 50\n\
             [zoom]\n\
             max = 8\n",
        )
        .unwrap();
        assert_eq!(config.max_path_points, 50);
        assert_eq!(config.zoom.max, 8);
        assert_eq!(config.zoom.min, 1);
        assert_eq!(config.min_radius, SimConfig::default().min_radius);
    }

    #[test]
    fn rejects_inverted_zoom() {
        let err = SimConfig::from_toml_str("[zoom]\nmin = 5\nmax = 2\ndefault = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_path_distance() {
        let err = SimConfig::from_toml_str("max_path_distance = 0.0").unwrap_err();
        assert!(err.to_string().contains("max_path_distance"));
    }

    #[test]
    fn toml_round_trip() {
        let config = SimConfig {
            engine_time_scale: 0.5,
            ..SimConfig::default()
        };
        let s = config.to_toml_string().unwrap();
        assert_eq!(SimConfig::from_toml_str(&s).unwrap(), config);
    }
}
