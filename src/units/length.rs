use std::{fmt::Display, str::FromStr};

use strum_macros::{EnumCount, EnumIter};

use super::UnitEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, EnumCount, EnumIter)]
pub enum LengthUnit {
    Kilometers,
    ModelLengths,
    AstronomicalUnits,
}

const METER: f64 = 1.0;
const KILOMETER: f64 = 1000.0 * METER;
pub const ASTRONOMICAL_UNIT: f64 = 149597870700.0 * METER;

/// Astronomical units in one model length.
pub const AU_PER_MODEL_LENGTH: f64 = 0.01;
pub const METERS_PER_MODEL_LENGTH: f64 = AU_PER_MODEL_LENGTH * ASTRONOMICAL_UNIT;

const TEXT_KILOMETER: &str = "km";
const TEXT_MODEL_LENGTH: &str = "mu";
const TEXT_ASTRONOMICAL_UNIT: &str = "AU";

impl LengthUnit {
    pub const fn get_value(self) -> f64 {
        match self {
            LengthUnit::Kilometers => KILOMETER,
            LengthUnit::ModelLengths => METERS_PER_MODEL_LENGTH,
            LengthUnit::AstronomicalUnits => ASTRONOMICAL_UNIT,
        }
    }
    pub const fn get_next_smaller(self) -> Option<Self> {
        match self {
            LengthUnit::Kilometers => None,
            LengthUnit::ModelLengths => Some(LengthUnit::Kilometers),
            LengthUnit::AstronomicalUnits => Some(LengthUnit::ModelLengths),
        }
    }
    pub const fn largest_unit_from_base(base: f64) -> Self {
        match base {
            x if x.abs() >= ASTRONOMICAL_UNIT => LengthUnit::AstronomicalUnits,
            x if x.abs() >= METERS_PER_MODEL_LENGTH => LengthUnit::ModelLengths,
            _ => LengthUnit::Kilometers,
        }
    }
}

pub fn to_meters(model: f64) -> f64 {
    model * METERS_PER_MODEL_LENGTH
}

pub fn from_meters(meters: f64) -> f64 {
    meters / METERS_PER_MODEL_LENGTH
}

pub fn to_au(model: f64) -> f64 {
    model * AU_PER_MODEL_LENGTH
}

pub fn from_au(au: f64) -> f64 {
    au / AU_PER_MODEL_LENGTH
}

impl Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthUnit::Kilometers => write!(f, "{TEXT_KILOMETER}"),
            LengthUnit::ModelLengths => write!(f, "{TEXT_MODEL_LENGTH}"),
            LengthUnit::AstronomicalUnits => write!(f, "{TEXT_ASTRONOMICAL_UNIT}"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TEXT_KILOMETER => Ok(LengthUnit::Kilometers),
            TEXT_MODEL_LENGTH => Ok(LengthUnit::ModelLengths),
            TEXT_ASTRONOMICAL_UNIT => Ok(LengthUnit::AstronomicalUnits),
            _ => Err(()),
        }
    }
}

impl UnitEnum for LengthUnit {
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
