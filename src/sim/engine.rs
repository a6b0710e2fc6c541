//! The seam between the model and whatever integrates the equations of
//! motion.

use glam::DVec2;

use super::body::Body;

/// A numerical integrator driven by a
/// [`SimulationModel`](super::model::SimulationModel).
///
/// Implementations keep their own integrator state, synchronised from the
/// body slice by [`update`](Engine::update). Running with the same `dt`
/// from the same state must give the same result.
pub trait Engine {
    /// Advances the integrator by `dt` model time units.
    ///
    /// With `Some(bodies)` the results are written back into each body's
    /// position, velocity, acceleration and net force. With `None` only the
    /// internal state moves, so the bodies cannot change.
    fn run(&mut self, dt: f64, bodies: Option<&mut [Body]>);

    /// Re-reads the bodies after they changed outside of [`run`](Engine::run).
    ///
    /// Must not advance time, and calling it twice in a row must have the
    /// same effect as calling it once.
    fn update(&mut self, bodies: &[Body]);

    /// Optional collision detection. Engines that detect collisions call
    /// [`Body::mark_collided`] on the bodies involved.
    fn check_collisions(&mut self, _bodies: &mut [Body]) {}

    /// Drops all integrator state. Body values are left alone.
    fn reset(&mut self);
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn run(&mut self, dt: f64, bodies: Option<&mut [Body]>) {
        (**self).run(dt, bodies)
    }

    fn update(&mut self, bodies: &[Body]) {
        (**self).update(bodies)
    }

    fn check_collisions(&mut self, bodies: &mut [Body]) {
        (**self).check_collisions(bodies)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct KinematicState {
    position: DVec2,
    velocity: DVec2,
    is_active: bool,
}

/// Moves every active body in a straight line at constant velocity.
///
/// No forces are computed. Useful headless and as a reference for the
/// [`Engine`] contract. A collision is reported once, when the discs of two
/// active bodies start to overlap.
#[derive(Clone, Debug, Default)]
pub struct KinematicEngine {
    states: Vec<KinematicState>,
    /// Slot pairs that overlapped at the last check.
    touching: Vec<(usize, usize)>,
    /// Model time integrated since the last [`Engine::reset`].
    pub elapsed: f64,
}

impl KinematicEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the integrator currently has each body, in slot order.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = DVec2> + '_ {
        self.states.iter().map(|state| state.position)
    }
}

impl Engine for KinematicEngine {
    fn run(&mut self, dt: f64, bodies: Option<&mut [Body]>) {
        for state in self.states.iter_mut().filter(|state| state.is_active) {
            state.position += state.velocity * dt;
        }
        self.elapsed += dt;

        let Some(bodies) = bodies else {
            return;
        };

        for (body, state) in bodies.iter_mut().zip(&self.states) {
            if !state.is_active {
                continue;
            }
            if !body.user_controlling_position {
                body.position = state.position;
            }
            if !body.user_controlling_velocity {
                body.velocity = state.velocity;
            }
            body.acceleration = DVec2::ZERO;
            body.net_force = DVec2::ZERO;
        }
    }

    fn update(&mut self, bodies: &[Body]) {
        self.states.clear();
        self.states.extend(bodies.iter().map(|body| KinematicState {
            position: body.position,
            velocity: body.velocity,
            is_active: body.is_active,
        }));
    }

    fn check_collisions(&mut self, bodies: &mut [Body]) {
        let mut touching = Vec::new();
        for (i, a) in bodies.iter().enumerate() {
            for (j, b) in bodies.iter().enumerate().skip(i + 1) {
                if a.is_active && b.is_active && a.is_overlapping(b) {
                    touching.push((i, j));
                }
            }
        }
        for &(i, j) in &touching {
            if !self.touching.contains(&(i, j)) {
                bodies[i].mark_collided();
                bodies[j].mark_collided();
            }
        }
        self.touching = touching;
    }

    fn reset(&mut self) {
        self.states.clear();
        self.touching.clear();
        self.elapsed = 0.0;
    }
}
