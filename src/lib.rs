//! Core of a small interactive gravity sandbox: point bodies with trails,
//! a pluggable integration engine and the play/restart/reset lifecycle
//! around them.

pub mod cfg;
pub mod error;
pub mod sim;
pub mod time;
pub mod units;
