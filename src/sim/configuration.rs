//! Snapshots of a body's settable parameters.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::InvalidConfigurationError;

/// Range a body's mass may be edited within, in model masses.
pub const DEFAULT_MASS_RANGE: MassRange = MassRange {
    min: 0.1,
    max: 300.0,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct MassRange {
    pub min: f64,
    pub max: f64,
}

impl MassRange {
    pub fn contains(&self, mass: f64) -> bool {
        self.min <= mass && mass <= self.max
    }
}

impl Default for MassRange {
    fn default() -> Self {
        DEFAULT_MASS_RANGE
    }
}

impl From<[f64; 2]> for MassRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<MassRange> for [f64; 2] {
    fn from(range: MassRange) -> Self {
        [range.min, range.max]
    }
}

/// An immutable snapshot of how a body starts out.
///
/// Every constructor validates: the mass is strictly positive and lies in
/// the mass range, and position and velocity are finite. Changing a field
/// goes through the `with_*` methods, which hand back a new, re-validated
/// value.
///
/// The persisted JSON form is
/// `{"isActive", "mass", "massRange", "position", "velocity", "id"?}` with
/// vectors as `[x, y]` pairs. `isActive` defaults to `true` and `massRange`
/// to [`DEFAULT_MASS_RANGE`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBodyConfiguration", into = "RawBodyConfiguration")]
pub struct BodyConfiguration {
    is_active: bool,
    mass: f64,
    mass_range: MassRange,
    position: DVec2,
    velocity: DVec2,
    id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBodyConfiguration {
    #[serde(default = "active_by_default")]
    is_active: bool,
    mass: f64,
    #[serde(default)]
    mass_range: MassRange,
    position: DVec2,
    velocity: DVec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

fn active_by_default() -> bool {
    true
}

impl TryFrom<RawBodyConfiguration> for BodyConfiguration {
    type Error = InvalidConfigurationError;

    fn try_from(raw: RawBodyConfiguration) -> Result<Self, Self::Error> {
        let config = Self {
            is_active: raw.is_active,
            mass: raw.mass,
            mass_range: raw.mass_range,
            position: raw.position,
            velocity: raw.velocity,
            id: raw.id,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<BodyConfiguration> for RawBodyConfiguration {
    fn from(config: BodyConfiguration) -> Self {
        Self {
            is_active: config.is_active,
            mass: config.mass,
            mass_range: config.mass_range,
            position: config.position,
            velocity: config.velocity,
            id: config.id,
        }
    }
}

impl BodyConfiguration {
    /// An active body with the default mass range.
    pub fn new(
        mass: f64,
        position: DVec2,
        velocity: DVec2,
    ) -> Result<Self, InvalidConfigurationError> {
        let config = Self {
            is_active: true,
            mass,
            mass_range: DEFAULT_MASS_RANGE,
            position,
            velocity,
            id: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builds a snapshot of live state, such as a body's current values.
    ///
    /// Live state is whatever the engine and the user left behind, so it is
    /// checked like any other input.
    pub(crate) fn from_parts(
        is_active: bool,
        mass: f64,
        mass_range: MassRange,
        position: DVec2,
        velocity: DVec2,
        id: Option<String>,
    ) -> Result<Self, InvalidConfigurationError> {
        let config = Self {
            is_active,
            mass,
            mass_range,
            position,
            velocity,
            id,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builds a compiled-in preset. Only for constant values known to be
    /// valid.
    pub(crate) const fn preset(
        is_active: bool,
        mass: f64,
        mass_range: MassRange,
        position: DVec2,
        velocity: DVec2,
    ) -> Self {
        Self {
            is_active,
            mass,
            mass_range,
            position,
            velocity,
            id: None,
        }
    }

    fn validate(&self) -> Result<(), InvalidConfigurationError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(InvalidConfigurationError::NonPositiveMass(self.mass));
        }
        let MassRange { min, max } = self.mass_range;
        if !(min > 0.0 && min <= max && self.mass_range.contains(self.mass)) {
            return Err(InvalidConfigurationError::MassOutOfRange {
                mass: self.mass,
                min,
                max,
            });
        }
        if !self.position.is_finite() {
            return Err(InvalidConfigurationError::NonFinite { field: "position" });
        }
        if !self.velocity.is_finite() {
            return Err(InvalidConfigurationError::NonFinite { field: "velocity" });
        }
        Ok(())
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_mass_range(mut self, min: f64, max: f64) -> Result<Self, InvalidConfigurationError> {
        self.mass_range = MassRange { min, max };
        self.validate()?;
        Ok(self)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn mass_range(&self) -> MassRange {
        self.mass_range
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, InvalidConfigurationError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decodes a persisted configuration.
    ///
    /// Structural problems surface as
    /// [`InvalidConfigurationError::Malformed`]; a well-formed value that
    /// breaks an invariant reports the specific violation.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, InvalidConfigurationError> {
        let raw: RawBodyConfiguration = serde_json::from_value(value)?;
        raw.try_into()
    }

    pub fn from_json_str(s: &str) -> Result<Self, InvalidConfigurationError> {
        let raw: RawBodyConfiguration = serde_json::from_str(s)?;
        raw.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_positive_mass() {
        for mass in [0.0, -1.0, f64::NAN] {
            let err = BodyConfiguration::new(mass, DVec2::ZERO, DVec2::ZERO).unwrap_err();
            assert!(matches!(err, InvalidConfigurationError::NonPositiveMass(_)));
        }
    }

    #[test]
    fn mass_must_lie_in_range() {
        let err = BodyConfiguration::new(500.0, DVec2::ZERO, DVec2::ZERO).unwrap_err();
        assert!(matches!(err, InvalidConfigurationError::MassOutOfRange { .. }));

        let config = BodyConfiguration::new(5.0, DVec2::ZERO, DVec2::ZERO).unwrap();
        assert!(config.clone().with_mass_range(10.0, 20.0).is_err());
        assert!(config.with_mass_range(1.0, 20.0).is_ok());
    }

    #[test]
    fn json_round_trip() {
        let config = BodyConfiguration::new(2.5, DVec2::new(1.0, -2.0), DVec2::new(0.0, 3.5))
            .unwrap()
            .with_active(false)
            .with_id("planet");

        let value = config.to_json_value().unwrap();
        assert_eq!(value["isActive"], json!(false));
        assert_eq!(value["massRange"], json!([0.1, 300.0]));
        assert_eq!(value["position"], json!([1.0, -2.0]));
        assert_eq!(value["id"], json!("planet"));

        assert_eq!(BodyConfiguration::from_json_value(value).unwrap(), config);

        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(BodyConfiguration::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn decode_fills_defaults() {
        let config = BodyConfiguration::from_json_value(json!({
            "mass": 1,
            "position": [3, 0],
            "velocity": [0, 10],
        }))
        .unwrap();
        assert!(config.is_active());
        assert_eq!(config.mass_range(), DEFAULT_MASS_RANGE);
        assert_eq!(config.id(), None);
    }

    #[test]
    fn decode_rejects_missing_or_bad_fields() {
        let missing_mass = json!({ "position": [0, 0], "velocity": [0, 0] });
        assert!(matches!(
            BodyConfiguration::from_json_value(missing_mass),
            Err(InvalidConfigurationError::Malformed(_))
        ));

        let zero_mass = json!({ "mass": 0, "position": [0, 0], "velocity": [0, 0] });
        assert!(matches!(
            BodyConfiguration::from_json_value(zero_mass),
            Err(InvalidConfigurationError::NonPositiveMass(_))
        ));

        let text_mass = json!({ "mass": "heavy", "position": [0, 0], "velocity": [0, 0] });
        assert!(BodyConfiguration::from_json_value(text_mass).is_err());
    }
}
