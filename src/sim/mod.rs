//! Bodies, their starting snapshots and the model that steps them.

pub mod body;
pub mod configuration;
pub mod engine;
pub mod model;
pub mod path;
pub mod presets;

pub use body::{Body, RadiusRule, VisibleBounds};
pub use configuration::{BodyConfiguration, MassRange};
pub use engine::{Engine, KinematicEngine};
pub use model::{ModelEvent, SimulationModel, VisibilityState};
