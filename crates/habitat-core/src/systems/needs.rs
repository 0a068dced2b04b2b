//! Needs system - raises physiological need levels on the hourly cadence.

use crate::components::{Colonist, ColonistAction, GoalState, NeedKind, Needs};
use hecs::World;

/// Hourly need growth. Water and rest rise every hour, food every other
/// hour. A sleeping colonist's needs are clamped for the duration.
pub fn needs_system(world: &mut World, hour: u64) {
    for (_, (_, needs, goal_state)) in world.query_mut::<(&Colonist, &mut Needs, &GoalState)>() {
        let resting = matches!(
            goal_state.current.as_ref().map(|c| &c.action),
            Some(ColonistAction::Rest { .. })
        );
        if resting {
            continue;
        }
        needs.raise(NeedKind::Water, 1);
        needs.raise(NeedKind::Rest, 1);
        if hour % 2 == 0 {
            needs.raise(NeedKind::Food, 1);
        }
    }
}
