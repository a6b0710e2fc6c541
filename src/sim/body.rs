use std::num::NonZeroUsize;

use glam::DVec2;

use super::configuration::{BodyConfiguration, MassRange};
use super::path::{PathBuffer, PathLimits};
use crate::error::{BodyEditError, InvalidConfigurationError};
use crate::units::{self, length::LengthUnit, mass::MassUnit};

/// Maps a mass to a drawn radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusRule {
    pub min_radius: f64,
    pub coefficient: f64,
}

impl RadiusRule {
    /// `max(min_radius, coefficient · ∛mass)`
    ///
    /// Non-decreasing in `mass`, strictly increasing once the cube-root
    /// term exceeds `min_radius`, and never below `min_radius`.
    pub fn mass_to_radius(&self, mass: f64) -> f64 {
        (self.coefficient * mass.cbrt()).max(self.min_radius)
    }
}

/// Axis-aligned model-space rectangle that is currently on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl VisibleBounds {
    pub fn contains(&self, point: DVec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Values a body returns to on [`Body::reset`].
#[derive(Clone, Debug, PartialEq)]
struct InitialValues {
    mass: f64,
    mass_range: MassRange,
    position: DVec2,
    velocity: DVec2,
    id: Option<String>,
}

/// A single simulated point mass.
///
/// `position` and `velocity` are written by the engine every step and by
/// whoever is dragging the body. While a `user_controlling_*` flag is set,
/// writers other than the controlling collaborator must leave the
/// corresponding property alone.
#[derive(Clone, Debug)]
pub struct Body {
    index: NonZeroUsize,

    mass: f64,
    radius: f64,
    mass_range: MassRange,

    /// In model lengths.
    pub position: DVec2,
    /// In model lengths per model time.
    pub velocity: DVec2,
    pub acceleration: DVec2,
    pub net_force: DVec2,

    /// Whether the body takes part in force calculations and rendering.
    pub is_active: bool,
    is_offscreen: bool,
    pub user_controlling_mass: bool,
    pub user_controlling_position: bool,
    pub user_controlling_velocity: bool,

    collided: bool,

    path: PathBuffer,
    path_limits: PathLimits,
    path_clearing_suspended: u32,

    radius_rule: RadiusRule,
    initial: InitialValues,
}

impl Body {
    /// Creates the body for slot `index` and puts it in the state
    /// described by `config`.
    pub fn new(
        index: NonZeroUsize,
        config: &BodyConfiguration,
        radius_rule: RadiusRule,
        path_limits: PathLimits,
    ) -> Self {
        let mut body = Self {
            index,
            mass: config.mass(),
            radius: radius_rule.mass_to_radius(config.mass()),
            mass_range: config.mass_range(),
            position: config.position(),
            velocity: config.velocity(),
            acceleration: DVec2::ZERO,
            net_force: DVec2::ZERO,
            is_active: config.is_active(),
            is_offscreen: false,
            user_controlling_mass: false,
            user_controlling_position: false,
            user_controlling_velocity: false,
            collided: false,
            path: PathBuffer::new(),
            path_limits,
            path_clearing_suspended: 0,
            radius_rule,
            initial: InitialValues {
                mass: config.mass(),
                mass_range: config.mass_range(),
                position: config.position(),
                velocity: config.velocity(),
                id: config.id().map(str::to_owned),
            },
        };
        body.reset();
        body
    }

    /// 1-based slot number, fixed for the body's lifetime.
    pub fn index(&self) -> NonZeroUsize {
        self.index
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn mass_range(&self) -> MassRange {
        self.mass_range
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_offscreen(&self) -> bool {
        self.is_offscreen
    }

    /// Sets the mass and recomputes the radius.
    pub fn set_mass(&mut self, mass: f64) -> Result<(), BodyEditError> {
        if !mass.is_finite() {
            return Err(BodyEditError::NonFinite {
                index: self.index,
                field: "mass",
            });
        }
        if !(mass > 0.0 && self.mass_range.contains(mass)) {
            return Err(BodyEditError::MassOutOfRange {
                index: self.index,
                mass,
                min: self.mass_range.min,
                max: self.mass_range.max,
            });
        }
        self.mass = mass;
        self.radius = self.radius_rule.mass_to_radius(mass);
        Ok(())
    }

    pub fn mass_to_radius(&self, mass: f64) -> f64 {
        self.radius_rule.mass_to_radius(mass)
    }

    /// Records the values the next [`reset`](Self::reset) returns to.
    ///
    /// Pure assignment: nothing derived is recomputed and the live state is
    /// untouched. The active flag is not part of the staged values.
    pub fn stage_initial_values(&mut self, config: &BodyConfiguration) {
        self.initial = InitialValues {
            mass: config.mass(),
            mass_range: config.mass_range(),
            position: config.position(),
            velocity: config.velocity(),
            id: config.id().map(str::to_owned),
        };
    }

    /// Returns the body to its staged values.
    ///
    /// Order: mass and mass range, then radius, then position and
    /// velocity, then acceleration and net force (zeroed), then the
    /// offscreen and collided flags, and finally the path (cleared unless
    /// clearing is suspended).
    pub fn reset(&mut self) {
        self.mass_range = self.initial.mass_range;
        self.mass = self.initial.mass;
        self.radius = self.radius_rule.mass_to_radius(self.mass);
        self.position = self.initial.position;
        self.velocity = self.initial.velocity;
        self.acceleration = DVec2::ZERO;
        self.net_force = DVec2::ZERO;
        self.is_offscreen = false;
        self.collided = false;
        self.clear_path();
    }

    /// Appends the current position to the trail.
    pub fn add_path_point(&mut self) {
        self.path.push(self.position, &self.path_limits);
    }

    /// Empties the trail, unless a state restore has suspended clearing.
    pub fn clear_path(&mut self) {
        if self.path_clearing_suspended > 0 {
            log::trace!("body {}: path clear suppressed during restore", self.index);
            return;
        }
        self.path.clear();
    }

    /// Stops [`clear_path`](Self::clear_path) from having an effect until
    /// the matching [`resume_path_clearing`](Self::resume_path_clearing).
    /// Calls nest.
    pub fn suspend_path_clearing(&mut self) {
        self.path_clearing_suspended = self.path_clearing_suspended.saturating_add(1);
    }

    pub fn resume_path_clearing(&mut self) {
        self.path_clearing_suspended = self.path_clearing_suspended.saturating_sub(1);
    }

    pub fn is_path_clearing_suspended(&self) -> bool {
        self.path_clearing_suspended > 0
    }

    pub fn path(&self) -> &PathBuffer {
        &self.path
    }

    pub fn path_points(&self) -> impl ExactSizeIterator<Item = DVec2> + '_ {
        self.path.points()
    }

    /// Cumulative length of the trail, in model lengths.
    pub fn path_length(&self) -> f64 {
        self.path.length()
    }

    /// Snapshot of the current state. Position and velocity are copied, so
    /// later edits to the body never show up in the snapshot.
    ///
    /// Fails if the live state is not a valid configuration, e.g. after the
    /// engine produced a non-finite position.
    pub fn get_configuration(&self) -> Result<BodyConfiguration, InvalidConfigurationError> {
        BodyConfiguration::from_parts(
            self.is_active,
            self.mass,
            self.mass_range,
            self.position,
            self.velocity,
            self.initial.id.clone(),
        )
    }

    pub fn is_overlapping(&self, other: &Body) -> bool {
        self.position.distance(other.position) < self.radius + other.radius
    }

    /// Nudges this body along +y by `offset` until it overlaps no other
    /// active body in `others`.
    ///
    /// A configuration-time safety net, not a collision response. `others`
    /// may include this body's own slot; it is skipped by index.
    pub fn prevent_collision<'a, I>(&mut self, others: I, offset: f64)
    where
        I: IntoIterator<Item = &'a Body>,
        I::IntoIter: Clone,
    {
        let others = others.into_iter();
        let step = DVec2::new(0.0, offset);
        loop {
            let overlapping = others
                .clone()
                .any(|other| other.is_active && other.index != self.index && self.is_overlapping(other));
            if !overlapping {
                break;
            }
            self.position += step;
        }
    }

    /// Mass in the largest fitting SI-based unit, for the values overlay.
    pub fn formatted_mass(&self) -> String {
        units::format_in_largest_unit::<MassUnit>(units::mass::to_kilograms(self.mass))
    }

    /// Distance from the origin in the largest fitting length unit.
    pub fn formatted_distance(&self) -> String {
        units::format_in_largest_unit::<LengthUnit>(units::length::to_meters(self.position.length()))
    }

    pub fn update_offscreen(&mut self, bounds: &VisibleBounds) {
        self.is_offscreen = !bounds.contains(self.position);
    }

    /// Flags this body as having collided; the model reports it once.
    pub fn mark_collided(&mut self) {
        self.collided = true;
    }

    pub(crate) fn take_collided(&mut self) -> bool {
        std::mem::take(&mut self.collided)
    }
}

/// Runs [`Body::prevent_collision`] for the body at `slot` against every
/// other body in `bodies`.
pub fn prevent_collision_at(bodies: &mut [Body], slot: usize, offset: f64) {
    if slot >= bodies.len() {
        return;
    }
    let (before, rest) = bodies.split_at_mut(slot);
    let Some((body, after)) = rest.split_first_mut() else {
        return;
    };
    body.prevent_collision(before.iter().chain(after.iter()), offset);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const RULE: RadiusRule = RadiusRule {
        min_radius: 0.25,
        coefficient: 1.0,
    };
    const LIMITS: PathLimits = PathLimits {
        max_points: 100,
        max_distance: 1000.0,
    };

    fn slot(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn body_at(n: usize, x: f64, y: f64) -> Body {
        let config = BodyConfiguration::new(1.0, DVec2::new(x, y), DVec2::ZERO).unwrap();
        Body::new(slot(n), &config, RULE, LIMITS)
    }

    #[test]
    fn radius_never_below_minimum_and_increasing() {
        let mut previous = 0.0;
        let mut mass = 1e-6;
        while mass < 1e4 {
            let radius = RULE.mass_to_radius(mass);
            assert!(radius >= RULE.min_radius);
            assert!(radius >= previous);
            if RULE.coefficient * mass.cbrt() > RULE.min_radius {
                assert!(radius > previous);
            }
            previous = radius;
            mass *= 1.5;
        }
    }

    #[test]
    fn mass_edit_recomputes_radius() {
        let mut body = body_at(1, 0.0, 0.0);
        body.set_mass(8.0).unwrap();
        assert_relative_eq!(body.radius(), 2.0, epsilon = 1e-12);

        assert!(body.set_mass(-1.0).is_err());
        assert!(body.set_mass(1e9).is_err());
        assert!(body.set_mass(f64::NAN).is_err());
        assert_eq!(body.mass(), 8.0);
    }

    #[test]
    fn reset_returns_to_staged_values() {
        let mut body = body_at(1, 1.0, 2.0);
        let staged = BodyConfiguration::new(4.0, DVec2::new(-5.0, 5.0), DVec2::new(1.0, 0.0)).unwrap();

        body.stage_initial_values(&staged);
        // Staging alone leaves the live state alone.
        assert_eq!(body.position, DVec2::new(1.0, 2.0));
        assert_eq!(body.mass(), 1.0);

        body.acceleration = DVec2::ONE;
        body.net_force = DVec2::ONE;
        body.add_path_point();
        body.reset();

        assert_eq!(body.mass(), 4.0);
        assert_eq!(body.radius(), RULE.mass_to_radius(4.0));
        assert_eq!(body.position, DVec2::new(-5.0, 5.0));
        assert_eq!(body.velocity, DVec2::new(1.0, 0.0));
        assert_eq!(body.acceleration, DVec2::ZERO);
        assert_eq!(body.net_force, DVec2::ZERO);
        assert!(body.path().is_empty());

        let once = body.get_configuration().unwrap();
        body.reset();
        assert_eq!(body.get_configuration().unwrap(), once);
    }

    #[test]
    fn add_path_point_ignores_repeated_position() {
        let mut body = body_at(1, 0.0, 0.0);
        body.add_path_point();
        body.position = DVec2::new(3.0, 4.0);
        body.add_path_point();
        let points: Vec<_> = body.path_points().collect();
        let length = body.path_length();

        body.add_path_point();
        assert_eq!(body.path_points().collect::<Vec<_>>(), points);
        assert_eq!(body.path_length(), length);
        assert_relative_eq!(length, 5.0);
    }

    #[test]
    fn suspended_clear_keeps_path() {
        let mut body = body_at(1, 0.0, 0.0);
        body.add_path_point();
        body.position = DVec2::X;
        body.add_path_point();

        body.suspend_path_clearing();
        body.suspend_path_clearing();
        body.reset();
        assert_eq!(body.path().len(), 2);

        body.resume_path_clearing();
        body.clear_path();
        assert_eq!(body.path().len(), 2);

        body.resume_path_clearing();
        body.clear_path();
        assert!(body.path().is_empty());
    }

    #[test]
    fn configuration_does_not_alias_live_state() {
        let mut body = body_at(2, 1.0, 1.0);
        let config = body.get_configuration().unwrap();
        body.position.x = 40.0;
        body.velocity.y = -3.0;
        assert_eq!(config.position(), DVec2::new(1.0, 1.0));
        assert_eq!(config.velocity(), DVec2::ZERO);
    }

    #[test]
    fn configuration_round_trip_into_fresh_body() {
        let mut body = body_at(3, 1.0, 1.0);
        body.set_mass(7.25).unwrap();
        body.position = DVec2::new(-2.5, 0.125);
        body.velocity = DVec2::new(9.0, -1.0);
        body.is_active = false;

        let config = body.get_configuration().unwrap();
        let fresh = Body::new(body.index(), &config, RULE, LIMITS);

        assert_eq!(fresh.mass(), body.mass());
        assert_eq!(fresh.position, body.position);
        assert_eq!(fresh.velocity, body.velocity);
        assert_eq!(fresh.is_active, body.is_active);
    }

    #[test]
    fn non_finite_state_has_no_configuration() {
        let mut body = body_at(1, 0.0, 0.0);
        body.position = DVec2::new(f64::NAN, 0.0);
        assert!(matches!(
            body.get_configuration(),
            Err(InvalidConfigurationError::NonFinite { field: "position" })
        ));

        body.position = DVec2::ZERO;
        body.velocity = DVec2::new(0.0, f64::INFINITY);
        assert!(matches!(
            body.get_configuration(),
            Err(InvalidConfigurationError::NonFinite { field: "velocity" })
        ));
    }

    #[test]
    fn overlap_uses_sum_of_radii() {
        let a = body_at(1, 0.0, 0.0);
        let b = body_at(2, 1.9, 0.0);
        let c = body_at(3, 2.0, 0.0);
        assert!(a.is_overlapping(&b));
        // Touching is not overlapping.
        assert!(!a.is_overlapping(&c));
    }

    #[test]
    fn prevent_collision_separates_unit_bodies() {
        // Unit mass with a unit coefficient gives radius 1.
        let mut bodies = vec![body_at(1, 0.0, 0.0), body_at(2, 0.5, 0.0)];
        prevent_collision_at(&mut bodies, 1, 1.0);

        assert!(!bodies[1].is_overlapping(&bodies[0]));
        assert!(bodies[0].position.distance(bodies[1].position) >= 2.0);
        assert_eq!(bodies[1].position.x, 0.5);
        assert_eq!(bodies[0].position, DVec2::ZERO);
    }

    #[test]
    fn prevent_collision_ignores_inactive_bodies() {
        let mut bodies = vec![body_at(1, 0.0, 0.0), body_at(2, 0.5, 0.0)];
        bodies[0].is_active = false;
        prevent_collision_at(&mut bodies, 1, 1.0);
        assert_eq!(bodies[1].position, DVec2::new(0.5, 0.0));
    }

    #[test]
    fn readouts_use_si_units() {
        let body = body_at(1, 300.0, 0.0);
        assert!(body.formatted_mass().ends_with("mm"), "{}", body.formatted_mass());
        assert!(body.formatted_distance().ends_with("AU"), "{}", body.formatted_distance());
    }

    #[test]
    fn offscreen_follows_bounds() {
        let mut body = body_at(1, 5.0, 5.0);
        let bounds = VisibleBounds {
            min: DVec2::splat(-1.0),
            max: DVec2::splat(1.0),
        };
        body.update_offscreen(&bounds);
        assert!(body.is_offscreen());

        body.position = DVec2::ZERO;
        body.update_offscreen(&bounds);
        assert!(!body.is_offscreen());
    }
}
