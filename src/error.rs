use std::num::NonZeroUsize;

use thiserror::Error;

/// Why a [`BodyConfiguration`](crate::sim::configuration::BodyConfiguration)
/// could not be built or decoded.
#[derive(Debug, Error)]
pub enum InvalidConfigurationError {
    /// Mass was zero, negative or not a number.
    #[error("mass must be a finite number greater than zero, got {0}")]
    NonPositiveMass(f64),

    /// The mass range is inverted or does not contain the mass.
    #[error("mass {mass} lies outside of the mass range [{min}, {max}]")]
    MassOutOfRange { mass: f64, min: f64, max: f64 },

    /// A position or velocity component was NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    /// The persisted structure could not be parsed at all
    /// (missing field, wrong type, malformed JSON).
    #[error("malformed body configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised while constructing or reconfiguring a
/// [`SimulationModel`](crate::sim::model::SimulationModel).
#[derive(Debug, Error)]
pub enum ModelError {
    /// A model needs at least one body slot.
    #[error("a simulation needs at least one body")]
    NoBodies,

    /// There are only as many fallback placements as there are slots.
    #[error("a simulation supports at most {max} bodies, got {got}")]
    TooManyBodies { got: usize, max: usize },

    /// The tunables failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Problems with the simulation tunables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Rejected interactive edit of a single body.
#[derive(Debug, Error)]
pub enum BodyEditError {
    #[error("body {index}: mass {mass} lies outside of [{min}, {max}]")]
    MassOutOfRange {
        index: NonZeroUsize,
        mass: f64,
        min: f64,
        max: f64,
    },

    #[error("body {index}: {field} must be finite")]
    NonFinite {
        index: NonZeroUsize,
        field: &'static str,
    },
}

/// The unit conversion self-test found a sample that did not round-trip.
#[derive(Debug, Error)]
#[error(
    "force conversion drifted for m1={mass1} kg, m2={mass2} kg, d={distance} m: \
     relative error {relative_error:e}"
)]
pub struct UnitsError {
    pub mass1: f64,
    pub mass2: f64,
    pub distance: f64,
    pub relative_error: f64,
}
