use std::{fmt::Display, str::FromStr};

use strum_macros::{EnumCount, EnumIter};

use crate::units::UnitEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, EnumCount, EnumIter)]
pub enum MassUnit {
    Kilograms,
    EarthMasses,
    ModelMasses,
    SolarMasses,
}

const KILOGRAM: f64 = 1.0;
const EARTH_MASS: f64 = 5.9722e24 * KILOGRAM;
const SOLAR_MASS: f64 = 1.988416e30 * KILOGRAM;

/// Kilograms in one model mass.
pub const KILOGRAMS_PER_MODEL_MASS: f64 = 1e28 * KILOGRAM;

const TEXT_KILOGRAM: &str = "kg";
const TEXT_EARTH_MASS: &str = "Earth";
const TEXT_MODEL_MASS: &str = "mm";
const TEXT_SOLAR_MASS: &str = "Sun";

impl MassUnit {
    pub const fn get_value(self) -> f64 {
        match self {
            MassUnit::Kilograms => KILOGRAM,
            MassUnit::EarthMasses => EARTH_MASS,
            MassUnit::ModelMasses => KILOGRAMS_PER_MODEL_MASS,
            MassUnit::SolarMasses => SOLAR_MASS,
        }
    }
    pub const fn get_next_smaller(self) -> Option<Self> {
        match self {
            MassUnit::Kilograms => None,
            MassUnit::EarthMasses => Some(MassUnit::Kilograms),
            MassUnit::ModelMasses => Some(MassUnit::EarthMasses),
            MassUnit::SolarMasses => Some(MassUnit::ModelMasses),
        }
    }
    pub const fn largest_unit_from_base(base: f64) -> Self {
        match base {
            x if x.abs() >= SOLAR_MASS => MassUnit::SolarMasses,
            x if x.abs() >= KILOGRAMS_PER_MODEL_MASS => MassUnit::ModelMasses,
            x if x.abs() >= EARTH_MASS => MassUnit::EarthMasses,
            _ => MassUnit::Kilograms,
        }
    }
}

pub fn to_kilograms(model: f64) -> f64 {
    model * KILOGRAMS_PER_MODEL_MASS
}

pub fn from_kilograms(kilograms: f64) -> f64 {
    kilograms / KILOGRAMS_PER_MODEL_MASS
}

impl Display for MassUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MassUnit::Kilograms => write!(f, "{TEXT_KILOGRAM}"),
            MassUnit::EarthMasses => write!(f, "{TEXT_EARTH_MASS}"),
            MassUnit::ModelMasses => write!(f, "{TEXT_MODEL_MASS}"),
            MassUnit::SolarMasses => write!(f, "{TEXT_SOLAR_MASS}"),
        }
    }
}

impl FromStr for MassUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TEXT_KILOGRAM => Ok(MassUnit::Kilograms),
            TEXT_EARTH_MASS => Ok(MassUnit::EarthMasses),
            TEXT_MODEL_MASS => Ok(MassUnit::ModelMasses),
            TEXT_SOLAR_MASS => Ok(MassUnit::SolarMasses),
            _ => Err(()),
        }
    }
}

impl UnitEnum for MassUnit {
    fn get_next_smaller(self) -> Option<Self> {
        self.get_next_smaller()
    }
    fn get_value(self) -> f64 {
        self.get_value()
    }
    fn largest_unit_from_base(base: f64) -> Self {
        Self::largest_unit_from_base(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_mass_is_1e28_kg() {
        assert_eq!(to_kilograms(1.0), 1e28);
        assert_eq!(from_kilograms(2e28), 2.0);
    }

    #[test]
    fn largest_unit_thresholds() {
        // Factory bodies weigh 0.1 model masses.
        assert_eq!(
            MassUnit::largest_unit_from_base(to_kilograms(0.1)),
            MassUnit::EarthMasses
        );
        assert_eq!(
            MassUnit::largest_unit_from_base(to_kilograms(300.0)),
            MassUnit::SolarMasses
        );
        assert_eq!(
            MassUnit::largest_unit_from_base(to_kilograms(3.0)),
            MassUnit::ModelMasses
        );
    }
}
