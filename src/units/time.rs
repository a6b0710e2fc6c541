use std::{fmt::Display, str::FromStr};

use float_pretty_print::PrettyPrintFloat;
use strum_macros::{EnumCount, EnumIter};

use super::{G_MODEL, G_SI, UnitEnum, length, mass};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, EnumCount, EnumIter)]
pub enum TimeUnit {
    Seconds,
    Hours,
    Days,
    Years,
}

const SECOND: f64 = 1.0;
const HOUR: f64 = 3600.0 * SECOND;
const DAY: f64 = 24.0 * HOUR;
pub const SECONDS_PER_YEAR: f64 = 365.25 * DAY;

const TEXT_SECOND: &str = "s";
const TEXT_HOUR: &str = "h";
const TEXT_DAY: &str = "d";
const TEXT_YEAR: &str = "y";

/// Seconds in one model time unit.
///
/// Follows from requiring `G_MODEL · L³ / (M · T²) = G_SI` for the model
/// length `L` and model mass `M`.
pub fn seconds_per_model_time() -> f64 {
    let l = length::METERS_PER_MODEL_LENGTH;
    (G_MODEL * l * l * l / (mass::KILOGRAMS_PER_MODEL_MASS * G_SI)).sqrt()
}

/// Years in one model time unit.
pub fn years_per_model_time() -> f64 {
    seconds_per_model_time() / SECONDS_PER_YEAR
}

pub fn to_seconds(model: f64) -> f64 {
    model * seconds_per_model_time()
}

pub fn to_years(model: f64) -> f64 {
    model * years_per_model_time()
}

pub fn from_years(years: f64) -> f64 {
    years / years_per_model_time()
}

impl TimeUnit {
    pub const fn get_next_smaller(self) -> Option<Self> {
        match self {
            Self::Seconds => None,
            Self::Hours => Some(Self::Seconds),
            Self::Days => Some(Self::Hours),
            Self::Years => Some(Self::Days),
        }
    }
    pub const fn get_value(self) -> f64 {
        match self {
            TimeUnit::Seconds => SECOND,
            TimeUnit::Hours => HOUR,
            TimeUnit::Days => DAY,
            TimeUnit::Years => SECONDS_PER_YEAR,
        }
    }
    pub const fn largest_unit_from_base(base: f64) -> Self {
        match base {
            x if x.abs() >= SECONDS_PER_YEAR => TimeUnit::Years,
            x if x.abs() >= DAY => TimeUnit::Days,
            x if x.abs() >= HOUR => TimeUnit::Hours,
            _ => TimeUnit::Seconds,
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Seconds => write!(f, "{TEXT_SECOND}"),
            TimeUnit::Hours => write!(f, "{TEXT_HOUR}"),
            TimeUnit::Days => write!(f, "{TEXT_DAY}"),
            TimeUnit::Years => write!(f, "{TEXT_YEAR}"),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TEXT_SECOND => Ok(TimeUnit::Seconds),
            TEXT_HOUR => Ok(TimeUnit::Hours),
            TEXT_DAY => Ok(TimeUnit::Days),
            TEXT_YEAR => Ok(TimeUnit::Years),
            _ => Err(()),
        }
    }
}

impl UnitEnum for TimeUnit {
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

/// How the simulation clock is shown to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumCount, EnumIter)]
pub enum TimeDisplayMode {
    /// Raw model time, e.g. `12.5 mt`
    ModelUnits,
    /// e.g. `1.2204 y`
    #[default]
    SingleUnit,
    /// Top 3 units, e.g. `1 y, 80 d, 14 h`
    MultiUnit,
}

impl TimeDisplayMode {
    /// Formats a model-time clock reading.
    pub fn format_time(self, model_time: f64) -> String {
        match self {
            TimeDisplayMode::ModelUnits => Self::format_model_units(model_time),
            TimeDisplayMode::SingleUnit => Self::format_one_unit(to_seconds(model_time)),
            TimeDisplayMode::MultiUnit => Self::format_multi_unit(to_seconds(model_time)),
        }
    }

    fn format_model_units(model_time: f64) -> String {
        format!("{:10.10} mt", PrettyPrintFloat(model_time))
    }

    fn format_one_unit(seconds: f64) -> String {
        super::format_in_largest_unit::<TimeUnit>(seconds)
    }

    fn format_multi_unit(mut seconds: f64) -> String {
        const MAX_UNIT_AMOUNT: usize = 3;
        let mut unit = TimeUnit::largest_unit_from_base(seconds);
        let mut units = Vec::with_capacity(MAX_UNIT_AMOUNT);

        units.push(unit);

        while let Some(u) = unit.get_next_smaller() {
            if units.len() >= MAX_UNIT_AMOUNT {
                break;
            }
            units.push(u);
            unit = u;
        }

        let mut string = String::new();

        if seconds.is_sign_negative() {
            string.push('−');
            seconds = seconds.abs();
        }

        for (idx, &unit) in units.iter().enumerate() {
            let unit_value = unit.get_value();
            let (quo, rem) = ((seconds / unit_value).trunc(), seconds % unit_value);

            string += &format!("{quo} {unit}");

            if idx + 1 < units.len() {
                string.push_str(", ");
            }

            seconds = rem;
        }

        string
    }

    pub fn get_next(self) -> Self {
        match self {
            Self::ModelUnits => Self::SingleUnit,
            Self::SingleUnit => Self::MultiUnit,
            Self::MultiUnit => Self::ModelUnits,
        }
    }

    pub fn get_prev(self) -> Self {
        match self {
            Self::ModelUnits => Self::MultiUnit,
            Self::SingleUnit => Self::ModelUnits,
            Self::MultiUnit => Self::SingleUnit,
        }
    }
}

impl Display for TimeDisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeDisplayMode::ModelUnits => write!(f, "model-units"),
            TimeDisplayMode::SingleUnit => write!(f, "single-unit"),
            TimeDisplayMode::MultiUnit => write!(f, "multi-unit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::EnumCount;

    #[test]
    fn test_next() {
        let mut cur = TimeDisplayMode::ModelUnits;
        let mut encountered = HashSet::new();

        while encountered.insert(cur) {
            cur = cur.get_next();
        }

        assert_eq!(encountered.len(), TimeDisplayMode::COUNT);

        for variant in encountered {
            let next = variant.get_next();
            let next_prev = next.get_prev();
            assert_eq!(variant, next_prev);
        }
    }

    #[test]
    fn model_time_is_a_fraction_of_a_year() {
        let years = years_per_model_time();
        assert!(years > 0.2 && years < 0.25, "{years}");
        approx::assert_relative_eq!(from_years(to_years(7.5)), 7.5, max_relative = 1e-14);
    }

    #[test]
    fn multi_unit_breakdown() {
        let seconds = 2.0 * SECONDS_PER_YEAR + 3.0 * DAY + 4.0 * HOUR;
        assert_eq!(
            TimeDisplayMode::format_multi_unit(seconds),
            "2 y, 3 d, 4 h"
        );
    }
}
