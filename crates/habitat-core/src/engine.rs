//! Simulation engine - main entry point for running the colony.

use crate::components::*;
use crate::economy::{ModuleInfo, ModuleRegistry};
use crate::infrastructure::Infrastructure;
use crate::jobs::JobBoard;
use crate::systems::*;
use crate::terrain::Terrain;
use hecs::World;
use log::info;

/// Tunables the embedding application can override.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Stall guard: minutes an action may stay in flight before the
    /// whole plan is abandoned.
    pub action_timeout_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            action_timeout_minutes: 24 * 60,
        }
    }
}

/// Main simulation engine. One [`HabitatEngine::update`] call advances
/// the colony by one simulated minute.
pub struct HabitatEngine {
    /// ECS world containing all colonist entities.
    pub world: World,
    /// Terrain grid with derived topography and zones.
    pub terrain: Terrain,
    /// Building graph of floors and elevators.
    pub infrastructure: Infrastructure,
    /// Placed modules and their live resource state.
    pub modules: ModuleRegistry,
    /// Open jobs per role.
    pub jobs: JobBoard,
    /// Minutes elapsed since the simulation started.
    pub sim_minutes: u64,

    config: EngineConfig,
    next_colonist_id: u32,
}

impl HabitatEngine {
    pub fn new(terrain: Terrain) -> Self {
        Self::with_config(terrain, EngineConfig::default())
    }

    pub fn with_config(terrain: Terrain, config: EngineConfig) -> Self {
        Self {
            world: World::new(),
            terrain,
            infrastructure: Infrastructure::new(),
            modules: ModuleRegistry::new(),
            jobs: JobBoard::new(),
            sim_minutes: 0,
            config,
            next_colonist_id: 0,
        }
    }

    /// Current hour of the simulated day.
    pub fn sim_hour(&self) -> u64 {
        self.sim_minutes / 60
    }

    /// Advance the simulation by one minute.
    ///
    /// Order matters: in-flight actions resolve first so their effects
    /// (freed crew slots, produced food) are visible to this hour's
    /// planning; movement runs last so a freshly started step already
    /// makes progress this minute.
    pub fn update(&mut self) {
        self.sim_minutes += 1;

        action_tick(
            &mut self.world,
            &self.terrain,
            &mut self.modules,
            &mut self.jobs,
            self.config.action_timeout_minutes,
        );

        // Hourly cadence fires on the first minute of each hour so
        // colonists replan at the top of the hour, not the end.
        if self.sim_minutes % 60 == 1 {
            let hour = self.sim_hour();
            needs_system(&mut self.world, hour);

            let module_ids: Vec<ModuleId> = self.modules.modules().map(|m| m.id).collect();
            for id in module_ids {
                self.modules.handle_maintenance(id);
            }
            self.modules.distribute();
            self.jobs.refresh(&self.modules);

            let mut rng = rand::thread_rng();
            goal_system(
                &mut self.world,
                &self.terrain,
                &self.infrastructure,
                &mut self.modules,
                &mut self.jobs,
                &mut rng,
            );
        }

        movement_tick(&mut self.world, &self.terrain);
    }

    /// Spawn a colonist standing on the terrain surface at a column.
    /// Panics only if the column is out of bounds, which is a setup bug.
    pub fn spawn_colonist(&mut self, x: i32, role: Role) -> Option<hecs::Entity> {
        let y = self.terrain.surface_y(x)?;
        let id = ColonistId(self.next_colonist_id);
        self.next_colonist_id += 1;
        info!("colonist {} ({:?}) joins at column {}", id.0, role, x);
        Some(self.world.spawn((
            Colonist,
            id,
            GridPos::new(x, y),
            Needs::default(),
            NeedThresholds::default(),
            Morale::default(),
            role,
            GoalState::default(),
            MovementState::default(),
        )))
    }

    /// Place a module: registers it in the economy and the building
    /// graph in one step so the two can never disagree.
    pub fn place_module(&mut self, info: ModuleInfo, x: i32, y: i32) -> ModuleId {
        let (width, height) = (info.width, info.height);
        let id = self.modules.register(info, GridPos::new(x, y));
        let floor = self
            .infrastructure
            .add_module(id, x, y, width, height, &self.terrain);
        info!("module {} placed at ({}, {}) on floor {}", id, x, y, floor);
        id
    }

    /// Place a ladder/lift spanning rows `top..=bottom` at a column.
    pub fn place_connector(&mut self, x: i32, top: i32, bottom: i32) -> ElevatorId {
        self.infrastructure.add_connector(x, top, bottom, &self.terrain)
    }

    /// Renderer feed: position, facing, and movement kind per colonist.
    pub fn colonist_views(&self) -> Vec<(ColonistId, GridPos, MovementState)> {
        self.world
            .query::<(&ColonistId, &GridPos, &MovementState)>()
            .iter()
            .map(|(_, (id, pos, movement))| (*id, *pos, *movement))
            .collect()
    }

    /// Serialize the whole colony to a writer.
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), crate::persistence::SaveError> {
        crate::persistence::save_colony(
            writer,
            &self.world,
            self.sim_minutes,
            self.next_colonist_id,
            &self.terrain,
            &self.infrastructure,
            &self.modules,
        )
    }

    /// Rebuild an engine from a save. The job board is not persisted; it
    /// repopulates on the next hourly tick.
    pub fn load<R: std::io::Read>(reader: R) -> Result<Self, crate::persistence::SaveError> {
        let loaded = crate::persistence::load_colony(reader)?;
        Ok(Self {
            world: loaded.world,
            terrain: loaded.terrain,
            infrastructure: loaded.infrastructure,
            modules: loaded.modules,
            jobs: JobBoard::new(),
            sim_minutes: loaded.sim_minutes,
            config: EngineConfig::default(),
            next_colonist_id: loaded.next_colonist_id,
        })
    }

    /// UI feed: what a colonist is doing and what it plans next.
    pub fn colonist_plan(&self, entity: hecs::Entity) -> Option<(Option<Goal>, Vec<ColonistAction>)> {
        let state = self.world.get::<&GoalState>(entity).ok()?;
        let mut steps: Vec<ColonistAction> = state
            .current
            .as_ref()
            .map(|c| c.action.clone())
            .into_iter()
            .collect();
        steps.extend(state.stack.iter_execution_order().cloned());
        Some((state.goal, steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::{ResourceKind, SharingPolicy};

    fn water_tank() -> ModuleInfo {
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

    #[test]
    fn test_spawn_places_colonist_on_surface() {
        let mut engine = HabitatEngine::new(Terrain::flat(16, 20, 10));
        let entity = engine.spawn_colonist(5, Role::Farmer).unwrap();
        assert_eq!(
            *engine.world.get::<&GridPos>(entity).unwrap(),
            GridPos::new(5, 10)
        );
        assert!(engine.spawn_colonist(99, Role::Miner).is_none());
    }

    #[test]
    fn test_place_module_registers_both_sides() {
        let mut engine = HabitatEngine::new(Terrain::flat(16, 20, 10));
        let id = engine.place_module(water_tank(), 2, 7);
        assert!(engine.modules.module(id).is_some());
        assert!(engine.infrastructure.floor_from_module_id(id).is_some());
    }

    #[test]
    fn test_thirsty_colonist_climbs_to_water() {
        let mut engine = HabitatEngine::new(Terrain::flat(24, 30, 10));
        // Ground storey plus an upper storey holding the water.
        engine.place_module(water_tank(), 2, 7);
        let upper = engine.place_module(water_tank(), 2, 4);
        engine.modules.add_resource(upper, ResourceKind::Water, 50);
        engine.place_connector(3, 5, 10);

        let entity = engine.spawn_colonist(8, Role::Farmer).unwrap();
        engine
            .world
            .get::<&mut Needs>(entity)
            .unwrap()
            .water = 6; // over the default threshold of 4

        // First minute plans; walking 5 columns, climbing 4 cells, and
        // drinking 6 water all fit well inside one hour.
        for _ in 0..59 {
            engine.update();
        }

        let pos = *engine.world.get::<&GridPos>(entity).unwrap();
        let upper_floor = engine.infrastructure.floor_from_module_id(upper).unwrap();
        assert_eq!(pos.y, upper_floor.elevation - 1);
        let needs = engine.world.get::<&Needs>(entity).unwrap();
        assert!(needs.water <= 1); // one hourly growth tick may have landed
        assert!(
            engine.modules.module(upper).unwrap().quantity_of(ResourceKind::Water) < 50
        );
    }

    #[test]
    fn test_hourly_cadence_grows_needs() {
        let mut engine = HabitatEngine::new(Terrain::flat(16, 20, 10));
        let entity = engine.spawn_colonist(5, Role::Farmer).unwrap();

        for _ in 0..121 {
            engine.update();
        }
        // Hour boundaries at minutes 1, 61, 121.
        let needs = engine.world.get::<&Needs>(entity).unwrap();
        assert_eq!(needs.water, 3);
        assert_eq!(needs.rest, 3);
    }
}
