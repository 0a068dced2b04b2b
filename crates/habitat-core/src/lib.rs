//! Habitat Core - Colony Settlement Simulation Engine
//!
//! An ECS-based side-view colony simulation: colonists dig, build, and
//! keep themselves alive on a column grid of terrain, stacked floors,
//! and resource-converting modules.
//!
//! # Architecture
//!
//! Colonists are `hecs` entities carrying pure-data components; the
//! terrain, building graph, module economy, and job board are plain
//! arena singletons systems receive as explicit parameters:
//! - **terrain**: the block grid, its topography, and walkable zones
//! - **infrastructure**: floors and elevators linked by integer ids
//! - **economy**: per-module storage, production, and maintenance
//! - **jobs**: transient work descriptors generated per role
//! - **systems**: the per-minute executor and the hourly planner
//!
//! # Example
//!
//! ```rust,no_run
//! use habitat_core::prelude::*;
//!
//! let mut engine = HabitatEngine::new(Terrain::flat(64, 96, 40));
//! engine.spawn_colonist(10, Role::Farmer);
//!
//! // Run simulation, one minute per call
//! loop {
//!     engine.update();
//! }
//! ```

pub mod components;
pub mod economy;
pub mod engine;
pub mod infrastructure;
pub mod jobs;
pub mod persistence;
pub mod systems;
pub mod terrain;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::economy::{ModuleInfo, ModuleRegistry, ResourceKind, SharingPolicy};
    pub use crate::engine::{EngineConfig, HabitatEngine};
    pub use crate::infrastructure::Infrastructure;
    pub use crate::jobs::JobBoard;
    pub use crate::terrain::Terrain;
}
