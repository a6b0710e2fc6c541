//! Model units and their SI counterparts.
//!
//! Everything inside the simulation is expressed in model units: one model
//! length is a hundredth of an astronomical unit, one model mass is
//! 10^28 kg, and the model time unit is derived so that the internal
//! gravitational constant [`G_MODEL`] describes the same physics as the SI
//! constant [`G_SI`]. Keeping `G` large keeps force magnitudes well-scaled
//! for `f64` at the masses and distances a user can dial in.

use std::{fmt::Display, str::FromStr};

use float_pretty_print::PrettyPrintFloat;
use strum::IntoEnumIterator;

use crate::error::UnitsError;

pub mod length;
pub mod mass;
pub mod time;

/// Gravitational constant, in m^3 kg^-1 s^-2.
pub const G_SI: f64 = 6.6743e-11;

/// Gravitational constant used by the simulation, in model units.
pub const G_MODEL: f64 = 10_000.0;

/// Largest relative error the force round trip may show.
pub const ROUND_TRIP_TOLERANCE: f64 = 1e-10;

pub trait UnitEnum: Copy + Display + Eq + Ord + IntoEnumIterator + FromStr {
    fn get_next_smaller(self) -> Option<Self>;
    /// Size of one of this unit, in the SI base unit of its dimension.
    fn get_value(self) -> f64;
    fn largest_unit_from_base(base: f64) -> Self;
}

/// Formats an SI base value in the largest unit that keeps it above one.
pub fn format_in_largest_unit<U: UnitEnum>(base: f64) -> String {
    let unit = U::largest_unit_from_base(base);
    let amount = base / unit.get_value();
    format!("{:8.8} {unit}", PrettyPrintFloat(amount))
}

/// Newtons in one model force unit (model mass × model length / model time²).
pub fn newtons_per_model_force() -> f64 {
    let seconds = time::seconds_per_model_time();
    mass::KILOGRAMS_PER_MODEL_MASS * length::METERS_PER_MODEL_LENGTH / (seconds * seconds)
}

pub fn force_to_newtons(force: f64) -> f64 {
    force * newtons_per_model_force()
}

pub fn force_from_newtons(newtons: f64) -> f64 {
    newtons / newtons_per_model_force()
}

/// Newtonian attraction between two point masses, all in SI.
pub fn gravity_force_si(mass1: f64, mass2: f64, distance: f64) -> f64 {
    G_SI * mass1 * mass2 / (distance * distance)
}

/// Newtonian attraction between two point masses, all in model units.
pub fn gravity_force_model(mass1: f64, mass2: f64, distance: f64) -> f64 {
    G_MODEL * mass1 * mass2 / (distance * distance)
}

fn relative_error(expected: f64, actual: f64) -> f64 {
    if expected == 0.0 {
        return actual.abs();
    }
    ((actual - expected) / expected).abs()
}

/// Checks one sample in SI units.
///
/// The force is computed directly in SI, pushed through the model unit
/// system and back, and also recomputed from converted inputs with
/// [`G_MODEL`]. Both results must match the SI force within
/// [`ROUND_TRIP_TOLERANCE`].
pub fn check_force_round_trip(mass1: f64, mass2: f64, distance: f64) -> Result<(), UnitsError> {
    let si = gravity_force_si(mass1, mass2, distance);

    let round_trip = force_to_newtons(force_from_newtons(si));

    let model = gravity_force_model(
        mass::from_kilograms(mass1),
        mass::from_kilograms(mass2),
        length::from_meters(distance),
    );
    let via_model = force_to_newtons(model);

    let error = relative_error(si, round_trip).max(relative_error(si, via_model));
    if error.is_finite() && error <= ROUND_TRIP_TOLERANCE {
        Ok(())
    } else {
        Err(UnitsError {
            mass1,
            mass2,
            distance,
            relative_error: error,
        })
    }
}

/// Mandatory conformance check for the unit system.
///
/// Samples span the masses and distances the simulation can reach, from
/// a hundredth of a model mass at a tenth of a model length up to a solar
/// mass pair several AU apart.
pub fn self_test() -> Result<(), UnitsError> {
    const SAMPLES: [(f64, f64, f64); 5] = [
        (1e26, 1e26, 1.5e8),
        (1e27, 3e28, 4.5e9),
        (5.972e24, 1.989e30, 1.496e11),
        (1.989e30, 1.989e30, 7.48e11),
        (1.0, 1.0, 1.0),
    ];

    for (mass1, mass2, distance) in SAMPLES {
        check_force_round_trip(mass1, mass2, distance)?;
    }
    log::debug!("unit self-test passed for {} samples", SAMPLES.len());
    Ok(())
}
