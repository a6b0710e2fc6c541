//! Factory placements for the four body slots.

use glam::DVec2;

use super::configuration::{BodyConfiguration, DEFAULT_MASS_RANGE};

/// Number of body slots a model can have.
pub const MAX_BODIES: usize = 4;

const MASS: f64 = 0.1;
const DISTANCE: f64 = 3.0;
const SPEED: f64 = 10.0;

/// Symmetric placement for slot `slot` (0-based): a quarter turn apart at
/// distance 3, each moving counter-clockwise at speed 10. Slots past the
/// last wrap around.
fn placement(slot: usize) -> (DVec2, DVec2) {
    match slot % MAX_BODIES {
        0 => (DVec2::new(DISTANCE, 0.0), DVec2::new(0.0, SPEED)),
        1 => (DVec2::new(0.0, DISTANCE), DVec2::new(-SPEED, 0.0)),
        2 => (DVec2::new(-DISTANCE, 0.0), DVec2::new(0.0, -SPEED)),
        _ => (DVec2::new(0.0, -DISTANCE), DVec2::new(SPEED, 0.0)),
    }
}

fn preset(slot: usize, is_active: bool) -> BodyConfiguration {
    let (position, velocity) = placement(slot);
    BodyConfiguration::preset(is_active, MASS, DEFAULT_MASS_RANGE, position, velocity)
}

/// The configuration a slot falls back to when a load leaves it out.
/// Always inactive.
pub fn fallback(slot: usize) -> BodyConfiguration {
    preset(slot, false)
}

/// Factory defaults: two opposing bodies in play, the other two parked.
pub fn default_configuration() -> Vec<BodyConfiguration> {
    (0..MAX_BODIES).map(|slot| preset(slot, slot % 2 == 0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_are_inactive_and_symmetric() {
        let mut sum_position = DVec2::ZERO;
        let mut sum_velocity = DVec2::ZERO;
        for slot in 0..MAX_BODIES {
            let config = fallback(slot);
            assert!(!config.is_active());
            assert_eq!(config.mass(), MASS);
            assert_eq!(config.position().length(), DISTANCE);
            assert_eq!(config.velocity().length(), SPEED);
            assert_eq!(config.position().dot(config.velocity()), 0.0);
            sum_position += config.position();
            sum_velocity += config.velocity();
        }
        assert_eq!(sum_position, DVec2::ZERO);
        assert_eq!(sum_velocity, DVec2::ZERO);
    }

    #[test]
    fn presets_pass_validation() {
        for config in default_configuration().into_iter().chain((0..MAX_BODIES).map(fallback)) {
            let value = config.to_json_value().unwrap();
            assert_eq!(BodyConfiguration::from_json_value(value).unwrap(), config);
        }
    }

    #[test]
    fn defaults_activate_opposite_pair() {
        let defaults = default_configuration();
        assert_eq!(defaults.len(), MAX_BODIES);
        let active: Vec<bool> = defaults.iter().map(BodyConfiguration::is_active).collect();
        assert_eq!(active, [true, false, true, false]);
        for (slot, config) in defaults.iter().enumerate() {
            assert_eq!(config.position(), fallback(slot).position());
        }
    }
}
