//! The simulation clock and the save/restore lifecycle around a set of
//! bodies.

use std::num::NonZeroUsize;

use super::body::{self, Body, VisibleBounds};
use super::configuration::BodyConfiguration;
use super::engine::Engine;
use super::presets::{self, MAX_BODIES};
use crate::cfg::SimConfig;
use crate::error::ModelError;
use crate::time::TimeSpeed;
use crate::units::time::TimeDisplayMode;

/// Notifications for collaborators outside the model, drained with
/// [`SimulationModel::drain_events`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelEvent {
    /// Any in-progress drag of a body must be abandoned.
    Interrupt,
    /// The engine reported a collision involving this body.
    BodyCollided { index: NonZeroUsize },
}

/// What the view shows on top of the bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityState {
    pub paths: bool,
    pub grid: bool,
    pub gravity_force: bool,
    pub velocity: bool,
    pub values: bool,
    pub measuring_tape: bool,
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self {
            paths: true,
            grid: false,
            gravity_force: false,
            velocity: false,
            values: false,
            measuring_tape: false,
        }
    }
}

/// Owns the bodies and the engine, and drives them from an external
/// scheduler through [`step`](Self::step).
///
/// Two snapshots are kept. The starting configuration is what
/// [`restart`](Self::restart) returns to and follows the user's edits.
/// The default configuration never changes and only
/// [`reset`](Self::reset) brings it back.
#[derive(Debug)]
pub struct SimulationModel<E: Engine> {
    bodies: Vec<Body>,
    starting_configuration: Vec<BodyConfiguration>,
    default_configuration: Vec<BodyConfiguration>,
    engine: E,
    config: SimConfig,

    /// Model time since the last restart.
    time: f64,
    is_playing: bool,
    has_played: bool,
    time_speed: TimeSpeed,
    zoom_level: i32,
    pub visibility: VisibilityState,
    pub time_display: TimeDisplayMode,

    visible_bounds: Option<VisibleBounds>,
    events: Vec<ModelEvent>,
}

impl<E: Engine> SimulationModel<E> {
    /// Creates one body per entry of `defaults`, paused at time zero.
    pub fn new(
        engine: E,
        defaults: Vec<BodyConfiguration>,
        config: SimConfig,
    ) -> Result<Self, ModelError> {
        config.validate()?;
        if defaults.is_empty() {
            return Err(ModelError::NoBodies);
        }
        if defaults.len() > MAX_BODIES {
            return Err(ModelError::TooManyBodies {
                got: defaults.len(),
                max: MAX_BODIES,
            });
        }

        let radius_rule = config.radius_rule();
        let path_limits = config.path_limits();
        let bodies = defaults
            .iter()
            .enumerate()
            .map(|(slot, body_config)| {
                Body::new(
                    NonZeroUsize::MIN.saturating_add(slot),
                    body_config,
                    radius_rule,
                    path_limits,
                )
            })
            .collect();

        let mut model = Self {
            bodies,
            starting_configuration: Vec::new(),
            default_configuration: defaults,
            engine,
            config,
            time: 0.0,
            is_playing: false,
            has_played: false,
            time_speed: TimeSpeed::default(),
            zoom_level: config.zoom.default,
            visibility: VisibilityState::default(),
            time_display: TimeDisplayMode::default(),
            visible_bounds: None,
            events: Vec::new(),
        };
        model.save_starting_configuration();
        model.update();

        log::debug!("created simulation with {} bodies", model.bodies.len());
        Ok(model)
    }

    /// A model over the four factory bodies.
    pub fn with_defaults(engine: E, config: SimConfig) -> Result<Self, ModelError> {
        Self::new(engine, presets::default_configuration(), config)
    }

    pub fn play(&mut self) {
        self.interrupt();
        self.is_playing = true;
        log::debug!("play at t={}", self.time);
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
        log::debug!("pause at t={}", self.time);
    }

    pub fn toggle_playing(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Called by the scheduler once per frame with the elapsed `dt`.
    ///
    /// The engine is re-synchronised every call so that edits made while
    /// paused are picked up. Time only advances while playing.
    pub fn step(&mut self, dt: f64) {
        self.update();
        if self.is_playing {
            self.step_once(dt);
        }
    }

    /// Advances the simulation by one step regardless of the play state.
    ///
    /// Time never runs backwards: a `dt` that is not positive is ignored.
    pub fn step_once(&mut self, dt: f64) {
        if !(dt > 0.0) {
            log::trace!("ignoring step with dt={dt}");
            return;
        }
        let scaled_dt = dt * self.time_speed.multiplier() * self.config.engine_time_scale;

        self.engine.run(scaled_dt, Some(&mut self.bodies));
        self.engine.check_collisions(&mut self.bodies);
        for body in &mut self.bodies {
            if body.take_collided() {
                self.events.push(ModelEvent::BodyCollided { index: body.index() });
            }
        }

        self.time += scaled_dt;
        if self.time > 0.0 {
            self.has_played = true;
        }

        if self.visibility.paths {
            for body in self.bodies.iter_mut().filter(|body| body.is_active) {
                body.add_path_point();
            }
        }
        self.refresh_offscreen();
    }

    /// Re-synchronises the engine with the bodies. Does not advance time.
    pub fn update(&mut self) {
        self.engine.update(&self.bodies);
    }

    /// Back to the starting configuration at time zero.
    pub fn restart(&mut self) {
        self.interrupt();
        self.restart_from_starting_configuration();
        log::debug!("restart");
    }

    fn restart_from_starting_configuration(&mut self) {
        self.pause();
        self.time = 0.0;
        self.has_played = false;

        let starting = self.starting_configuration.clone();
        self.apply_configuration(&starting);
        self.engine.reset();
        self.refresh_offscreen();
        self.update();
    }

    /// Back to factory defaults, including the view settings.
    pub fn reset(&mut self) {
        self.interrupt();
        self.pause();
        self.has_played = false;
        self.time_speed = TimeSpeed::default();
        self.zoom_level = self.config.zoom.default;
        self.visibility = VisibilityState::default();
        self.time_display = TimeDisplayMode::default();
        self.starting_configuration = self.default_configuration.clone();
        self.restart_from_starting_configuration();
        log::debug!("reset to factory defaults");
    }

    /// Puts every body into the given state and makes that the new
    /// starting configuration.
    ///
    /// Slots past the end of `configs` become inactive and are parked at
    /// their fallback placement. Extra entries are ignored.
    pub fn load_configuration(&mut self, configs: &[BodyConfiguration]) {
        if configs.len() > self.bodies.len() {
            log::warn!(
                "ignoring {} configurations beyond the {} body slots",
                configs.len() - self.bodies.len(),
                self.bodies.len()
            );
        }
        self.apply_configuration(configs);
        self.save_starting_configuration();
        self.refresh_offscreen();
        self.update();
        log::debug!("loaded {} body configurations", configs.len().min(self.bodies.len()));
    }

    fn apply_configuration(&mut self, configs: &[BodyConfiguration]) {
        for (slot, body) in self.bodies.iter_mut().enumerate() {
            match configs.get(slot) {
                Some(config) => {
                    body.stage_initial_values(config);
                    body.is_active = config.is_active();
                }
                None => {
                    body.is_active = false;
                    body.stage_initial_values(&presets::fallback(slot));
                }
            }
            body.reset();
        }
    }

    /// Snapshots the live bodies as the state [`restart`](Self::restart)
    /// returns to.
    ///
    /// A body whose live state is not a valid configuration keeps its
    /// previous snapshot.
    pub fn save_starting_configuration(&mut self) {
        let snapshot: Vec<BodyConfiguration> = self
            .bodies
            .iter()
            .enumerate()
            .map(|(slot, body)| match body.get_configuration() {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("body {}: keeping previous starting state: {e}", body.index());
                    self.starting_configuration
                        .get(slot)
                        .or_else(|| self.default_configuration.get(slot))
                        .cloned()
                        .unwrap_or_else(|| presets::fallback(slot))
                }
            })
            .collect();
        self.starting_configuration = snapshot;
    }

    /// Marks the start of an external restore. Paths survive the restore
    /// until [`finish_state_restore`](Self::finish_state_restore).
    pub fn begin_state_restore(&mut self) {
        for body in &mut self.bodies {
            body.suspend_path_clearing();
        }
        log::debug!("state restore started");
    }

    /// Ends an external restore and adopts the restored bodies as the
    /// starting configuration.
    pub fn finish_state_restore(&mut self) {
        for body in &mut self.bodies {
            body.resume_path_clearing();
        }
        self.save_starting_configuration();
        self.refresh_offscreen();
        self.update();
        log::debug!("state restore finished");
    }

    /// Runs `restore` between [`begin_state_restore`](Self::begin_state_restore)
    /// and [`finish_state_restore`](Self::finish_state_restore).
    pub fn restore_state<R>(&mut self, restore: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_state_restore();
        let result = restore(self);
        self.finish_state_restore();
        result
    }

    /// Turns a slot on or off. A body that comes into play is moved off any
    /// body it would overlap.
    pub fn set_body_active(&mut self, slot: usize, is_active: bool) {
        let Some(target) = self.bodies.get_mut(slot) else {
            return;
        };
        target.is_active = is_active;
        if is_active {
            body::prevent_collision_at(&mut self.bodies, slot, self.config.collision_offset);
        }
        self.save_starting_configuration();
        self.refresh_offscreen();
        self.update();
    }

    /// Moves active bodies, in slot order, until no two active bodies
    /// overlap. Each body is checked against every other active body.
    pub fn prevent_collisions(&mut self) {
        for slot in 0..self.bodies.len() {
            if self.bodies[slot].is_active {
                body::prevent_collision_at(&mut self.bodies, slot, self.config.collision_offset);
            }
        }
    }

    /// Called when the user lets go of a body. The edit becomes part of the
    /// starting configuration.
    pub fn finish_body_edit(&mut self, slot: usize) {
        let Some(body) = self.bodies.get_mut(slot) else {
            return;
        };
        body.user_controlling_mass = false;
        body.user_controlling_position = false;
        body.user_controlling_velocity = false;
        self.save_starting_configuration();
        self.update();
    }

    /// Sets the model-space rectangle on screen and refreshes every body's
    /// offscreen flag.
    pub fn set_visible_bounds(&mut self, bounds: VisibleBounds) {
        self.visible_bounds = Some(bounds);
        self.refresh_offscreen();
    }

    fn refresh_offscreen(&mut self) {
        if let Some(bounds) = self.visible_bounds {
            for body in &mut self.bodies {
                body.update_offscreen(&bounds);
            }
        }
    }

    fn interrupt(&mut self) {
        self.events.push(ModelEvent::Interrupt);
    }

    /// Hands out the queued events, oldest first.
    ///
    /// Events queue up until drained, so a scheduler should drain once per
    /// frame.
    pub fn drain_events(&mut self) -> impl Iterator<Item = ModelEvent> + '_ {
        self.events.drain(..)
    }

    pub fn set_zoom_level(&mut self, level: i32) {
        self.zoom_level = self.config.zoom.clamp(level);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom_level(self.zoom_level.saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom_level(self.zoom_level.saturating_sub(1));
    }

    /// Scale relative to the default zoom level; doubles per level.
    pub fn zoom_scale(&self) -> f64 {
        2f64.powi(self.zoom_level - self.config.zoom.default)
    }

    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    pub fn set_time_speed(&mut self, speed: TimeSpeed) {
        self.time_speed = speed;
    }

    pub fn time_speed(&self) -> TimeSpeed {
        self.time_speed
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.time_speed.multiplier()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// The clock, formatted per [`time_display`](Self::time_display).
    pub fn formatted_time(&self) -> String {
        self.time_display.format_time(self.time)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether time has advanced since the last restart.
    pub fn has_played(&self) -> bool {
        self.has_played
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Direct access for interactive edits. Call
    /// [`finish_body_edit`](Self::finish_body_edit) when done.
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn body(&self, slot: usize) -> Option<&Body> {
        self.bodies.get(slot)
    }

    pub fn body_mut(&mut self, slot: usize) -> Option<&mut Body> {
        self.bodies.get_mut(slot)
    }

    pub fn starting_configuration(&self) -> &[BodyConfiguration] {
        &self.starting_configuration
    }

    pub fn default_configuration(&self) -> &[BodyConfiguration] {
        &self.default_configuration
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}
