//! Agent goal planner - per-colonist goal selection and action-stack
//! construction against the building graph and module economy.
//!
//! Runs on the hourly cadence. Goal priority is fixed: urgent need, then
//! a job for the colonist's role, then explore. Plans are built terminal
//! action first (the stack is LIFO), and every reachability decision goes
//! through [`Infrastructure`] - the planner never walks the terrain grid
//! itself.

use crate::components::{
    ActionStack, Colonist, ColonistAction, ColonistId, Goal, GoalState, GridPos, JobType,
    ModuleId, Morale, NeedKind, NeedThresholds, Needs, Role, Surface,
};
use crate::economy::{Module, ModuleRegistry, ResourceKind};
use crate::infrastructure::{Floor, Infrastructure};
use crate::jobs::{Job, JobBoard};
use crate::terrain::Terrain;
use hecs::World;
use log::{debug, warn};
use rand::Rng;

/// Base sleep duration in minutes, before morale adjustment.
pub const REST_BASE_MINUTES: u32 = 480;

/// Read-only collaborators the planner resolves plans against. Passed
/// explicitly so every dependency is visible at the call site.
pub struct PlannerContext<'a> {
    pub terrain: &'a Terrain,
    pub infrastructure: &'a Infrastructure,
    pub registry: &'a ModuleRegistry,
}

/// Hourly decision pass for every colonist.
pub fn goal_system(
    world: &mut World,
    terrain: &Terrain,
    infrastructure: &Infrastructure,
    registry: &mut ModuleRegistry,
    jobs: &mut JobBoard,
    rng: &mut impl Rng,
) {
    for (_, (_, colonist_id, pos, needs, thresholds, morale, role, goal_state)) in world
        .query_mut::<(
            &Colonist,
            &ColonistId,
            &GridPos,
            &Needs,
            &NeedThresholds,
            &Morale,
            &Role,
            &mut GoalState,
        )>()
    {
        goal_state.reset_availability();

        let Some(surface) = infrastructure.surface_at(pos.x, pos.y, terrain) else {
            warn!(
                "colonist at ({}, {}) is standing on no known surface; replan skipped",
                pos.x, pos.y
            );
            continue;
        };

        // (1) Needs, in the fixed priority order.
        let urgent = NeedKind::PRIORITY.into_iter().find(|&kind| {
            needs.value(kind) >= threshold_of(thresholds, kind) && !goal_state.is_unavailable(kind)
        });
        if let Some(kind) = urgent {
            let already_on_it =
                goal_state.goal == Some(Goal::GetNeed(kind)) && !goal_state.is_idle();
            if !goal_state.mid_climb() && !already_on_it {
                let ctx = PlannerContext {
                    terrain,
                    infrastructure,
                    registry,
                };
                match plan_need(*pos, &surface, kind, needs.value(kind), *morale, &ctx) {
                    Some(stack) => {
                        // An interrupted occupant must free its slot.
                        if let Some(module_id) =
                            goal_state.current.as_ref().and_then(|c| c.action.module_id())
                        {
                            registry.punch_out(module_id, *colonist_id);
                        }
                        goal_state.set_goal(Goal::GetNeed(kind));
                        goal_state.stack = stack;
                        continue;
                    }
                    None => {
                        debug!("need {:?} unobtainable this hour", kind);
                        goal_state.mark_unavailable(kind);
                    }
                }
            }
        }

        if !goal_state.is_idle() {
            continue;
        }

        let ctx = PlannerContext {
            terrain,
            infrastructure,
            registry,
        };

        // (2) A job for the colonist's role.
        if !goal_state.job_unavailable {
            if let Some(job) = jobs.get_job(*role, pos.x) {
                let terminal = work_action(&job, *morale);
                match plan_for_module(*pos, &surface, job.module_id, terminal, &ctx) {
                    Some(stack) => {
                        goal_state.set_goal(Goal::Work(job.job_type));
                        goal_state.stack = stack;
                        continue;
                    }
                    None => goal_state.job_unavailable = true,
                }
            }
        }

        // (3) Explore.
        goal_state.set_goal(Goal::Explore);
        if let Some(stack) = plan_explore(*pos, &surface, &ctx, rng) {
            goal_state.stack = stack;
        }
    }
}

fn threshold_of(thresholds: &NeedThresholds, kind: NeedKind) -> u32 {
    match kind {
        NeedKind::Water => thresholds.water,
        NeedKind::Food => thresholds.food,
        NeedKind::Rest => thresholds.rest,
    }
}

/// Position a colonist occupies when inside a module.
fn module_standing_pos(module: &Module) -> GridPos {
    GridPos::new(
        module.position.x,
        module.position.y + module.info.height - 1,
    )
}

fn work_action(job: &Job, morale: Morale) -> ColonistAction {
    let duration = morale.work_duration(job.duration);
    match job.job_type {
        JobType::Farm => ColonistAction::Farm {
            dest: job.coords,
            duration,
            module_id: job.module_id,
        },
        JobType::Mine => ColonistAction::Mine {
            dest: job.coords,
            duration,
            module_id: job.module_id,
        },
    }
}

/// Plan toward satisfying a need: candidates nearest-first, first one
/// yielding a non-empty stack wins.
pub fn plan_need(
    pos: GridPos,
    surface: &Surface,
    kind: NeedKind,
    need_value: u32,
    morale: Morale,
    ctx: &PlannerContext,
) -> Option<ActionStack> {
    let mut candidates: Vec<&Module> = match kind {
        NeedKind::Water => ctx.registry.providers_of(ResourceKind::Water),
        NeedKind::Food => ctx.registry.providers_of(ResourceKind::Food),
        NeedKind::Rest => ctx.registry.rest_providers(),
    };
    candidates.sort_by_key(|m| m.position.x_distance(pos.x));

    for module in candidates {
        let dest = module_standing_pos(module);
        let terminal = match kind {
            NeedKind::Water => ColonistAction::Drink {
                dest,
                duration: need_value.max(1),
                module_id: module.id,
            },
            NeedKind::Food => ColonistAction::Eat {
                dest,
                duration: need_value.max(1),
                module_id: module.id,
            },
            NeedKind::Rest => ColonistAction::Rest {
                dest,
                duration: morale.rest_duration(REST_BASE_MINUTES),
                module_id: module.id,
            },
        };
        if let Some(stack) = plan_for_module(pos, surface, module.id, terminal, ctx) {
            return Some(stack);
        }
    }
    None
}

/// Build the full stack carrying a colonist to a module and ending in
/// `terminal`. `None` when no path rule applies.
pub fn plan_for_module(
    pos: GridPos,
    surface: &Surface,
    module_id: ModuleId,
    terminal: ColonistAction,
    ctx: &PlannerContext,
) -> Option<ActionStack> {
    let Some(floor) = ctx.infrastructure.floor_from_module_id(module_id) else {
        warn!("module {} has no floor record; plan abandoned", module_id);
        return None;
    };
    let target_x = terminal.dest().x;
    build_stack(pos, surface, floor, target_x, terminal, ctx, 0)
}

/// The reachability decision table. Cases, in order:
/// 1. target floor is the surface the colonist already stands on;
/// 2. the target floor has an elevator reachable from here;
/// 3. descend a grounded elevator on the colonist's own floor, then
///    resolve again from the ground.
fn build_stack(
    pos: GridPos,
    surface: &Surface,
    target_floor: &Floor,
    target_x: i32,
    terminal: ColonistAction,
    ctx: &PlannerContext,
    depth: u8,
) -> Option<ActionStack> {
    // Case 1: same surface - walk over (if needed) and act.
    if same_surface(surface, target_floor) {
        let mut stack = ActionStack::new();
        stack.push_step(terminal);
        if pos.x != target_x {
            stack.push_step(ColonistAction::Move {
                dest: GridPos::new(target_x, standing_y_on(surface, target_x, ctx)?),
            });
        }
        return Some(stack);
    }

    // Case 2: an elevator on the target floor reaches us directly.
    let mut elevators = ctx.infrastructure.elevators_for_floor(target_floor.id);
    elevators.sort_by_key(|e| (e.x - pos.x).abs());
    for elevator in &elevators {
        let reachable = match surface {
            Surface::Ground(zone) => elevator.ground_zone_id.as_deref() == Some(zone.as_str()),
            Surface::Floor(floor_id) => ctx
                .infrastructure
                .floor(*floor_id)
                .map(|f| f.connector_ids.contains(&elevator.id))
                .unwrap_or(false),
        };
        if !reachable {
            continue;
        }

        let landing_y = target_floor.standing_y();
        let mut stack = ActionStack::new();
        stack.push_step(terminal);
        if elevator.x != target_x {
            stack.push_step(ColonistAction::Move {
                dest: GridPos::new(target_x, landing_y),
            });
        }
        stack.push_step(ColonistAction::Climb {
            dest: GridPos::new(elevator.x, landing_y),
        });
        if pos.x != elevator.x {
            stack.push_step(ColonistAction::Move {
                dest: GridPos::new(elevator.x, standing_y_on(surface, elevator.x, ctx)?),
            });
        }
        return Some(stack);
    }

    // Case 3: descend to ground first, then retry from there.
    if depth == 0 {
        if let Surface::Floor(floor_id) = surface {
            let own_standing_y = ctx.infrastructure.floor(*floor_id)?.standing_y();
            let mut own = ctx.infrastructure.elevators_for_floor(*floor_id);
            own.sort_by_key(|e| (e.x - pos.x).abs());
            for elevator in own {
                let Some(zone) = elevator.ground_zone_id.clone() else {
                    continue;
                };
                let Some(ground_y) = ctx.terrain.surface_y(elevator.x) else {
                    continue;
                };
                let from_ground = GridPos::new(elevator.x, ground_y);
                if let Some(mut stack) = build_stack(
                    from_ground,
                    &Surface::Ground(zone),
                    target_floor,
                    target_x,
                    terminal.clone(),
                    ctx,
                    depth + 1,
                ) {
                    stack.push_step(ColonistAction::Climb {
                        dest: GridPos::new(elevator.x, ground_y),
                    });
                    if pos.x != elevator.x {
                        stack.push_step(ColonistAction::Move {
                            dest: GridPos::new(elevator.x, own_standing_y),
                        });
                    }
                    return Some(stack);
                }
            }
        }
    }

    None
}

/// Fallback partial plan: climb the nearest grounded elevator on the
/// colonist's floor. `None` when already on the ground or no elevator
/// reaches it.
pub fn go_to_ground(pos: GridPos, surface: &Surface, ctx: &PlannerContext) -> Option<ActionStack> {
    let Surface::Floor(floor_id) = surface else {
        return None;
    };
    let own_standing_y = ctx.infrastructure.floor(*floor_id)?.standing_y();
    let mut elevators = ctx.infrastructure.elevators_for_floor(*floor_id);
    elevators.sort_by_key(|e| (e.x - pos.x).abs());

    for elevator in elevators {
        if elevator.ground_zone_id.is_none() {
            continue;
        }
        let Some(ground_y) = ctx.terrain.surface_y(elevator.x) else {
            continue;
        };
        let mut stack = ActionStack::new();
        stack.push_step(ColonistAction::Climb {
            dest: GridPos::new(elevator.x, ground_y),
        });
        if pos.x != elevator.x {
            stack.push_step(ColonistAction::Move {
                dest: GridPos::new(elevator.x, own_standing_y),
            });
        }
        return Some(stack);
    }
    None
}

/// Explore: wander to a random column of the current zone. On a floor,
/// head for the ground instead.
pub fn plan_explore(
    pos: GridPos,
    surface: &Surface,
    ctx: &PlannerContext,
    rng: &mut impl Rng,
) -> Option<ActionStack> {
    match surface {
        Surface::Ground(zone_id) => {
            let zone = ctx.terrain.zones().iter().find(|z| &z.id == zone_id)?;
            let dest_x = rng.gen_range(zone.left_edge.x..=zone.right_edge.x);
            if dest_x == pos.x {
                return None;
            }
            let mut stack = ActionStack::new();
            stack.push_step(ColonistAction::Move {
                dest: GridPos::new(dest_x, ctx.terrain.surface_y(dest_x)?),
            });
            Some(stack)
        }
        Surface::Floor(_) => go_to_ground(pos, surface, ctx),
    }
}

fn same_surface(surface: &Surface, target_floor: &Floor) -> bool {
    match surface {
        Surface::Floor(id) => *id == target_floor.id,
        Surface::Ground(zone) => target_floor.touches_zone(zone),
    }
}

/// Standing elevation at a column of the colonist's current surface.
fn standing_y_on(surface: &Surface, x: i32, ctx: &PlannerContext) -> Option<i32> {
    match surface {
        Surface::Ground(_) => ctx.terrain.surface_y(x),
        Surface::Floor(id) => ctx.infrastructure.floor(*id).map(|f| f.standing_y()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::{ModuleInfo, SharingPolicy};

    fn water_tank_info() -> ModuleInfo {
        ModuleInfo {
            name: "Water Tank".to_string(),
            width: 4,
            height: 3,
            pressurized: false,
            crew_capacity: 2,
            storage: vec![(ResourceKind::Water, 100)],
            production_inputs: vec![],
            production_outputs: vec![],
            maintenance_costs: vec![],
            sharing: SharingPolicy::default(),
        }
    }

    struct Fixture {
        terrain: Terrain,
        infra: Infrastructure,
        registry: ModuleRegistry,
    }

    impl Fixture {
        fn flat() -> Self {
            Self {
                terrain: Terrain::flat(24, 30, 10),
                infra: Infrastructure::new(),
                registry: ModuleRegistry::new(),
            }
        }

        fn place(&mut self, info: ModuleInfo, x: i32, y: i32) -> ModuleId {
            let id = self.registry.register(info.clone(), GridPos::new(x, y));
            self.infra
                .add_module(id, x, y, info.width, info.height, &self.terrain);
            id
        }

        fn ctx(&self) -> PlannerContext<'_> {
            PlannerContext {
                terrain: &self.terrain,
                infrastructure: &self.infra,
                registry: &self.registry,
            }
        }
    }

    #[test]
    fn test_same_surface_move_then_act() {
        let mut fx = Fixture::flat();
        let tank = fx.place(water_tank_info(), 8, 7); // grounded at elevation 10
        fx.registry.add_resource(tank, ResourceKind::Water, 50);

        let pos = GridPos::new(2, 10);
        let surface = Surface::Ground("0010".to_string());
        let mut stack =
            plan_need(pos, &surface, NeedKind::Water, 5, Morale::default(), &fx.ctx()).unwrap();

        assert_eq!(stack.len(), 2);
        assert!(matches!(
            stack.pop_next(),
            Some(ColonistAction::Move { dest }) if dest.x == 8
        ));
        assert!(matches!(
            stack.pop_next(),
            Some(ColonistAction::Drink { module_id, duration, .. })
                if module_id == tank && duration == 5
        ));
    }

    #[test]
    fn test_no_move_when_already_at_target_column() {
        let mut fx = Fixture::flat();
        let tank = fx.place(water_tank_info(), 8, 7);
        fx.registry.add_resource(tank, ResourceKind::Water, 50);

        let stack = plan_need(
            GridPos::new(8, 10),
            &Surface::Ground("0010".to_string()),
            NeedKind::Water,
            5,
            Morale::default(),
            &fx.ctx(),
        )
        .unwrap();
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_climb_to_upper_floor_stack_shape() {
        let mut fx = Fixture::flat();
        // Ground storey, then the water tank two storeys up.
        fx.place(water_tank_info(), 2, 7); // elevation 10
        fx.place(water_tank_info(), 2, 4); // elevation 7
        let upper = fx.place(water_tank_info(), 2, 1); // elevation 4
        fx.registry.add_resource(upper, ResourceKind::Water, 50);
        // Ladder from the ground surface all the way up, at x=3.
        fx.infra.add_connector(3, 2, 10, &fx.terrain);

        let pos = GridPos::new(3, 10); // on the elevator column
        let surface = Surface::Ground("0010".to_string());
        let mut stack =
            plan_need(pos, &surface, NeedKind::Water, 5, Morale::default(), &fx.ctx()).unwrap();

        // Exactly [drink, move, climb] bottom-to-top.
        assert_eq!(stack.len(), 3);
        let climb = stack.pop_next().unwrap();
        let upper_floor = fx.infra.floor_from_module_id(upper).unwrap();
        assert!(matches!(
            climb,
            ColonistAction::Climb { dest } if dest == GridPos::new(3, upper_floor.elevation - 1)
        ));
        assert!(matches!(
            stack.pop_next(),
            Some(ColonistAction::Move { dest }) if dest.x == 2
        ));
        assert!(matches!(stack.pop_next(), Some(ColonistAction::Drink { .. })));
    }

    #[test]
    fn test_proximity_tie_break_nearest_provider_wins() {
        let mut fx = Fixture::flat();
        let ids: Vec<ModuleId> = [2, 6, 10]
            .into_iter()
            .map(|x| {
                let mut info = water_tank_info();
                info.width = 2;
                let id = fx.place(info, x, 7);
                fx.registry.add_resource(id, ResourceKind::Water, 50);
                id
            })
            .collect();

        let surface = Surface::Ground("0010".to_string());
        let pick = |x: i32| -> ModuleId {
            let stack = plan_need(
                GridPos::new(x, 10),
                &surface,
                NeedKind::Water,
                5,
                Morale::default(),
                &fx.ctx(),
            )
            .unwrap();
            stack
                .iter_execution_order()
                .last()
                .and_then(|a| a.module_id())
                .unwrap()
        };

        assert_eq!(pick(0), ids[0]); // nearest is x=2
        assert_eq!(pick(15), ids[2]); // nearest is x=10
    }

    #[test]
    fn test_descend_then_retry_from_ground() {
        let mut fx = Fixture::flat();
        // Tower A with the colonist on its upper floor.
        fx.place(water_tank_info(), 2, 7);
        let a_upper = fx.place(water_tank_info(), 2, 4);
        fx.infra.add_connector(3, 3, 10, &fx.terrain);
        // Tower B holds the water, with its own ladder from the ground.
        fx.place(water_tank_info(), 14, 7);
        let b_upper = fx.place(water_tank_info(), 14, 4);
        fx.registry.add_resource(b_upper, ResourceKind::Water, 50);
        fx.infra.add_connector(15, 3, 10, &fx.terrain);

        let a_floor = fx.infra.floor_from_module_id(a_upper).unwrap().id;
        let pos = GridPos::new(2, 6); // standing row of elevation-7 floor
        let mut stack = plan_need(
            pos,
            &Surface::Floor(a_floor),
            NeedKind::Water,
            5,
            Morale::default(),
            &fx.ctx(),
        )
        .unwrap();

        // move(to own ladder), climb down, move(to B ladder), climb up,
        // move(to tank), drink
        assert_eq!(stack.len(), 6);
        assert!(matches!(
            stack.pop_next(),
            Some(ColonistAction::Move { dest }) if dest.x == 3
        ));
        assert!(matches!(
            stack.pop_next(),
            Some(ColonistAction::Climb { dest }) if dest == GridPos::new(3, 10)
        ));
        assert!(matches!(
            stack.pop_next(),
            Some(ColonistAction::Move { dest }) if dest.x == 15
        ));
        assert!(matches!(
            stack.pop_next(),
            Some(ColonistAction::Climb { dest }) if dest == GridPos::new(15, 6)
        ));
        assert!(matches!(
            stack.pop_next(),
            Some(ColonistAction::Move { dest }) if dest.x == 14
        ));
        assert!(matches!(stack.pop_next(), Some(ColonistAction::Drink { .. })));
    }

    #[test]
    fn test_unreachable_target_yields_none() {
        let mut fx = Fixture::flat();
        // Floor with no ladder at all.
        fx.place(water_tank_info(), 2, 7);
        let upper = fx.place(water_tank_info(), 2, 4);
        fx.registry.add_resource(upper, ResourceKind::Water, 50);

        // Only the ladder-less upper module has water.
        assert!(plan_need(
            GridPos::new(10, 10),
            &Surface::Ground("0010".to_string()),
            NeedKind::Water,
            5,
            Morale::default(),
            &fx.ctx(),
        )
        .is_none());
    }

    #[test]
    fn test_go_to_ground_fallback() {
        let mut fx = Fixture::flat();
        fx.place(water_tank_info(), 2, 7);
        let upper = fx.place(water_tank_info(), 2, 4);
        fx.infra.add_connector(4, 3, 10, &fx.terrain);

        let floor_id = fx.infra.floor_from_module_id(upper).unwrap().id;
        let mut stack = go_to_ground(GridPos::new(2, 6), &Surface::Floor(floor_id), &fx.ctx())
            .unwrap();
        assert!(matches!(
            stack.pop_next(),
            Some(ColonistAction::Move { dest }) if dest.x == 4
        ));
        assert!(matches!(
            stack.pop_next(),
            Some(ColonistAction::Climb { dest }) if dest == GridPos::new(4, 10)
        ));

        // Already on the ground: nothing to do.
        assert!(go_to_ground(
            GridPos::new(8, 10),
            &Surface::Ground("0010".to_string()),
            &fx.ctx()
        )
        .is_none());
    }

    #[test]
    fn test_goal_priority_picks_rest_when_only_rest_is_urgent() {
        let mut fx = Fixture::flat();
        let mut quarters = water_tank_info();
        quarters.name = "Crew Quarters".to_string();
        quarters.pressurized = true;
        let quarters_id = fx.place(quarters, 8, 7);

        let mut world = World::new();
        let entity = world.spawn((
            Colonist,
            ColonistId(1),
            GridPos::new(2, 10),
            Needs {
                water: 3,
                food: 5,
                rest: 20,
            },
            NeedThresholds::default(),
            Morale::default(),
            Role::Farmer,
            GoalState::default(),
        ));

        let mut jobs = JobBoard::new();
        let mut rng = rand::thread_rng();
        goal_system(
            &mut world,
            &fx.terrain,
            &fx.infra,
            &mut fx.registry,
            &mut jobs,
            &mut rng,
        );

        // Only rest crosses its threshold (20 >= 16); water (3 < 4) and
        // food (5 < 8) do not.
        let state = world.get::<&GoalState>(entity).unwrap();
        assert_eq!(state.goal, Some(Goal::GetNeed(NeedKind::Rest)));
        let terminal = state.stack.iter_execution_order().last().unwrap();
        // Morale 50 leaves the base 480 minutes untouched.
        assert!(matches!(
            terminal,
            ColonistAction::Rest { duration: 480, module_id, .. }
                if *module_id == quarters_id
        ));
    }

    #[test]
    fn test_unsatisfiable_need_flagged_and_falls_back_to_explore() {
        let mut fx = Fixture::flat();
        let mut world = World::new();
        let entity = world.spawn((
            Colonist,
            ColonistId(1),
            GridPos::new(2, 10),
            Needs {
                water: 10,
                ..Default::default()
            },
            NeedThresholds::default(),
            Morale::default(),
            Role::Farmer,
            GoalState::default(),
        ));

        let mut jobs = JobBoard::new();
        let mut rng = rand::thread_rng();
        goal_system(
            &mut world,
            &fx.terrain,
            &fx.infra,
            &mut fx.registry,
            &mut jobs,
            &mut rng,
        );

        let state = world.get::<&GoalState>(entity).unwrap();
        assert!(state.is_unavailable(NeedKind::Water));
        assert_eq!(state.goal, Some(Goal::Explore));
    }

    #[test]
    fn test_job_goal_pushes_work_terminal() {
        let mut fx = Fixture::flat();
        let farm = ModuleInfo {
            name: "Hydroponics Pod".to_string(),
            width: 4,
            height: 3,
            pressurized: false,
            crew_capacity: 1,
            storage: vec![(ResourceKind::Water, 100), (ResourceKind::Food, 200)],
            production_inputs: vec![(ResourceKind::Water, 5)],
            production_outputs: vec![(ResourceKind::Food, 10)],
            maintenance_costs: vec![],
            sharing: SharingPolicy::default(),
        };
        let farm_id = fx.place(farm, 8, 7);
        fx.registry.add_resource(farm_id, ResourceKind::Water, 20);

        let mut jobs = JobBoard::new();
        jobs.refresh(&fx.registry);

        let mut world = World::new();
        let entity = world.spawn((
            Colonist,
            ColonistId(1),
            GridPos::new(2, 10),
            Needs::default(),
            NeedThresholds::default(),
            Morale(100),
            Role::Farmer,
            GoalState::default(),
        ));

        let mut rng = rand::thread_rng();
        goal_system(
            &mut world,
            &fx.terrain,
            &fx.infra,
            &mut fx.registry,
            &mut jobs,
            &mut rng,
        );

        let state = world.get::<&GoalState>(entity).unwrap();
        assert_eq!(state.goal, Some(Goal::Work(crate::components::JobType::Farm)));
        let terminal = state.stack.iter_execution_order().last().unwrap();
        // Base 30 minutes at morale 100 -> 25.
        assert!(matches!(
            terminal,
            ColonistAction::Farm { duration: 25, module_id, .. } if *module_id == farm_id
        ));
    }
}
