//! Action executor - the per-minute systems that run colonists' current
//! actions and move them through the world.
//!
//! [`action_tick`] owns the action lifecycle: resolving the in-flight
//! action, applying its completion effects, and popping the next step off
//! the stack with its entry effects. [`movement_tick`] then advances
//! anyone whose current action is a move or climb. Splitting the two
//! keeps every world mutation in the executor; the planner never touches
//! positions or module stock.

use crate::components::{
    Colonist, ColonistAction, ColonistId, CurrentAction, Facing, GoalState, GridPos, MovementKind,
    MovementState, Needs, Role,
};
use crate::economy::{ModuleRegistry, ResourceKind};
use crate::jobs::JobBoard;
use crate::terrain::Terrain;
use hecs::World;
use log::warn;

/// Per-minute action lifecycle pass. `timeout_minutes` is the stall
/// guard: an action in flight longer than this is abandoned along with
/// the rest of its plan.
pub fn action_tick(
    world: &mut World,
    terrain: &Terrain,
    registry: &mut ModuleRegistry,
    jobs: &mut JobBoard,
    timeout_minutes: u32,
) {
    for (_, (_, colonist_id, pos, needs, goal_state)) in world.query_mut::<(
        &Colonist,
        &ColonistId,
        &GridPos,
        &mut Needs,
        &mut GoalState,
    )>() {
        // Resolve the in-flight action first.
        if let Some(mut current) = goal_state.current.take() {
            current.elapsed += 1;
            let arrived = match &current.action {
                ColonistAction::Move { dest } => pos.x == dest.x,
                ColonistAction::Climb { dest } => pos.x == dest.x && pos.y == dest.y,
                _ => current.elapsed >= current.duration,
            };

            if arrived {
                complete_action(&current, *colonist_id, needs, terrain, registry, jobs);
            } else if current.elapsed > timeout_minutes {
                warn!(
                    "colonist {} stalled on {:?} after {} minutes; abandoning plan",
                    colonist_id.0, current.action, current.elapsed
                );
                abandon_action(&current, *colonist_id, registry);
                goal_state.stack.clear();
            } else {
                goal_state.current = Some(current);
            }
        }

        // Pop the next step once idle.
        if goal_state.current.is_none() {
            while let Some(action) = goal_state.stack.pop_next() {
                match start_action(action, *colonist_id, pos, registry) {
                    StartOutcome::InFlight(current) => {
                        goal_state.current = Some(current);
                        break;
                    }
                    StartOutcome::Skipped => continue,
                    StartOutcome::Aborted => {
                        goal_state.stack.clear();
                        break;
                    }
                }
            }
        }
    }
}

enum StartOutcome {
    InFlight(CurrentAction),
    /// Step already satisfied; try the next one this minute.
    Skipped,
    /// Entry effect refused; the whole plan is void.
    Aborted,
}

/// Entry effects for a freshly popped action. Consume actions take their
/// resource up front so nobody else drinks it mid-action.
fn start_action(
    action: ColonistAction,
    colonist_id: ColonistId,
    pos: &GridPos,
    registry: &mut ModuleRegistry,
) -> StartOutcome {
    let mut current = CurrentAction::new(action);
    match &current.action {
        ColonistAction::Eat {
            module_id,
            duration,
            ..
        } => {
            let granted = registry.deduct_resource(*module_id, ResourceKind::Food, *duration);
            if granted == 0 {
                warn!("module {} had no food left; plan abandoned", module_id);
                return StartOutcome::Aborted;
            }
            current.granted = granted;
            current.duration = granted;
        }
        ColonistAction::Drink {
            module_id,
            duration,
            ..
        } => {
            let granted = registry.deduct_resource(*module_id, ResourceKind::Water, *duration);
            if granted == 0 {
                warn!("module {} had no water left; plan abandoned", module_id);
                return StartOutcome::Aborted;
            }
            current.granted = granted;
            current.duration = granted;
        }
        ColonistAction::Rest { module_id, .. } | ColonistAction::Farm { module_id, .. } => {
            if !registry.punch_in(*module_id, colonist_id) {
                warn!(
                    "module {} refused colonist {}; plan abandoned",
                    module_id, colonist_id.0
                );
                return StartOutcome::Aborted;
            }
        }
        ColonistAction::Climb { dest } => {
            if pos.x != dest.x {
                warn!(
                    "climb at x={} requested from x={}; step skipped",
                    dest.x, pos.x
                );
                return StartOutcome::Skipped;
            }
        }
        ColonistAction::Move { .. } | ColonistAction::Mine { .. } => {}
    }
    StartOutcome::InFlight(current)
}

/// Completion effects for a resolved action.
fn complete_action(
    finished: &CurrentAction,
    colonist_id: ColonistId,
    needs: &mut Needs,
    terrain: &Terrain,
    registry: &mut ModuleRegistry,
    jobs: &mut JobBoard,
) {
    use crate::components::NeedKind;

    match &finished.action {
        ColonistAction::Move { .. } | ColonistAction::Climb { .. } => {}
        ColonistAction::Eat { .. } => needs.satisfy(NeedKind::Food, finished.granted),
        ColonistAction::Drink { .. } => needs.satisfy(NeedKind::Water, finished.granted),
        ColonistAction::Rest { module_id, .. } => {
            needs.satisfy(NeedKind::Rest, u32::MAX);
            registry.punch_out(*module_id, colonist_id);
        }
        ColonistAction::Farm { module_id, .. } => {
            if !registry.produce(*module_id) {
                warn!("module {} wasted a production cycle on missing inputs", module_id);
            }
            registry.punch_out(*module_id, colonist_id);
            jobs.refresh_role(Role::Farmer, registry);
        }
        ColonistAction::Mine { dest, module_id, .. } => {
            let mined = terrain.block_yield(dest.x);
            let stored = registry.add_resource(*module_id, ResourceKind::Minerals, mined);
            if stored < mined {
                warn!("module {} overflowed; {} minerals lost", module_id, mined - stored);
            }
            jobs.refresh_role(Role::Miner, registry);
        }
    }
}

/// Undo entry effects when the stall guard fires mid-action.
fn abandon_action(stalled: &CurrentAction, colonist_id: ColonistId, registry: &mut ModuleRegistry) {
    match &stalled.action {
        ColonistAction::Rest { module_id, .. } | ColonistAction::Farm { module_id, .. } => {
            registry.punch_out(*module_id, colonist_id);
        }
        _ => {}
    }
}

/// Per-minute movement pass. Walking covers one column per step at a
/// pace set by the height delta; ladders cover one cell per minute.
pub fn movement_tick(world: &mut World, terrain: &Terrain) {
    for (_, (_, pos, goal_state, movement)) in
        world.query_mut::<(&Colonist, &mut GridPos, &GoalState, &mut MovementState)>()
    {
        let Some(current) = goal_state.current.as_ref() else {
            movement.kind = MovementKind::Standing;
            movement.progress = 0.0;
            continue;
        };

        match &current.action {
            ColonistAction::Move { dest } if dest.x != pos.x => {
                movement.facing = Facing::toward(pos.x, dest.x);
                let dir = if dest.x > pos.x { 1 } else { -1 };
                let next_x = pos.x + dir;

                let on_ground = terrain.surface_y(pos.x) == Some(pos.y);
                movement.kind = if on_ground {
                    match (terrain.surface_y(next_x), terrain.surface_y(pos.x)) {
                        (Some(next), Some(here)) => MovementKind::from_height_delta(next - here),
                        _ => MovementKind::Walk,
                    }
                } else {
                    // Built floors are level; every step is a plain walk.
                    MovementKind::Walk
                };

                movement.progress += 1.0 / movement.kind.cost() as f32;
                if movement.progress >= 1.0 {
                    pos.x = next_x;
                    if on_ground {
                        if let Some(surface) = terrain.surface_y(next_x) {
                            pos.y = surface;
                        }
                    }
                    movement.progress = 0.0;
                }
            }
            ColonistAction::Climb { dest } if dest.y != pos.y => {
                movement.kind = if dest.y < pos.y {
                    MovementKind::ClimbUp
                } else {
                    MovementKind::ClimbDown
                };
                movement.progress = 0.0;
                pos.y += if dest.y > pos.y { 1 } else { -1 };
            }
            _ => {
                movement.kind = MovementKind::Standing;
                movement.progress = 0.0;
            }
        }
    }
}
