//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior beyond local bookkeeping - logic lives in systems.

mod colonist;
mod common;

pub use colonist::*;
pub use common::*;
