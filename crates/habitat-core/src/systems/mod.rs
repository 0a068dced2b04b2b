//! Simulation systems, in the order the engine runs them each minute:
//! action lifecycle, then (on the hour) needs growth and goal planning,
//! then movement.

mod executor;
mod needs;
mod planner;

pub use executor::*;
pub use needs::*;
pub use planner::*;
