//! Save/Load functionality for persisting colony state
//!
//! Uses bincode for binary serialization. Colonist components are
//! serialized individually as optionals and reconstructed on load; the
//! job board is transient and rebuilt on the first hourly tick instead.

use hecs::World;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::components::*;
use crate::economy::ModuleRegistry;
use crate::infrastructure::Infrastructure;
use crate::terrain::Terrain;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the colony state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Minutes elapsed since the simulation started
    pub sim_minutes: u64,
    /// Next colonist id to hand out
    pub next_colonist_id: u32,
    /// Terrain grid and derived zones
    pub terrain: Terrain,
    /// Building graph
    pub infrastructure: Infrastructure,
    /// Placed modules and their resource state
    pub modules: ModuleRegistry,
    /// All colonist entities with their components
    pub colonists: Vec<SerializableColonist>,
}

/// All possible colonist components, serialized as optionals
#[derive(Serialize, Deserialize, Default)]
pub struct SerializableColonist {
    pub id: Option<ColonistId>,
    pub position: Option<GridPos>,
    pub needs: Option<Needs>,
    pub thresholds: Option<NeedThresholds>,
    pub morale: Option<Morale>,
    pub role: Option<Role>,
    pub goal_state: Option<GoalState>,
    pub movement: Option<MovementState>,
}

/// Extract all colonists from a world into serializable form
fn serialize_colonists(world: &World) -> Vec<SerializableColonist> {
    let mut colonists = Vec::new();

    for entity in world.iter() {
        if entity.get::<&Colonist>().is_none() {
            continue;
        }
        let mut sc = SerializableColonist::default();

        if let Some(c) = entity.get::<&ColonistId>() {
            sc.id = Some(*c);
        }
        if let Some(c) = entity.get::<&GridPos>() {
            sc.position = Some(*c);
        }
        if let Some(c) = entity.get::<&Needs>() {
            sc.needs = Some(*c);
        }
        if let Some(c) = entity.get::<&NeedThresholds>() {
            sc.thresholds = Some(*c);
        }
        if let Some(c) = entity.get::<&Morale>() {
            sc.morale = Some(*c);
        }
        if let Some(c) = entity.get::<&Role>() {
            sc.role = Some(*c);
        }
        if let Some(c) = entity.get::<&GoalState>() {
            sc.goal_state = Some((*c).clone());
        }
        if let Some(c) = entity.get::<&MovementState>() {
            sc.movement = Some(*c);
        }

        colonists.push(sc);
    }

    colonists
}

/// Rebuild a world's colonists from serialized form
fn deserialize_colonists(world: &mut World, colonists: Vec<SerializableColonist>) {
    for sc in colonists {
        let entity = world.spawn((Colonist,));

        if let Some(c) = sc.id {
            let _ = world.insert_one(entity, c);
        }
        if let Some(c) = sc.position {
            let _ = world.insert_one(entity, c);
        }
        if let Some(c) = sc.needs {
            let _ = world.insert_one(entity, c);
        }
        if let Some(c) = sc.thresholds {
            let _ = world.insert_one(entity, c);
        }
        if let Some(c) = sc.morale {
            let _ = world.insert_one(entity, c);
        }
        if let Some(c) = sc.role {
            let _ = world.insert_one(entity, c);
        }
        if let Some(c) = sc.goal_state {
            let _ = world.insert_one(entity, c);
        }
        if let Some(c) = sc.movement {
            let _ = world.insert_one(entity, c);
        }
    }
}

/// Save the complete colony to a writer
pub fn save_colony<W: Write>(
    writer: W,
    world: &World,
    sim_minutes: u64,
    next_colonist_id: u32,
    terrain: &Terrain,
    infrastructure: &Infrastructure,
    modules: &ModuleRegistry,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        sim_minutes,
        next_colonist_id,
        terrain: terrain.clone(),
        infrastructure: infrastructure.clone(),
        modules: modules.clone(),
        colonists: serialize_colonists(world),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a colony from a reader
pub fn load_colony<R: Read>(reader: R) -> Result<LoadedColony, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut world = World::new();
    deserialize_colonists(&mut world, save_data.colonists);

    Ok(LoadedColony {
        world,
        sim_minutes: save_data.sim_minutes,
        next_colonist_id: save_data.next_colonist_id,
        terrain: save_data.terrain,
        infrastructure: save_data.infrastructure,
        modules: save_data.modules,
    })
}

/// Result of loading a colony
pub struct LoadedColony {
    pub world: World,
    pub sim_minutes: u64,
    pub next_colonist_id: u32,
    pub terrain: Terrain,
    pub infrastructure: Infrastructure,
    pub modules: ModuleRegistry,
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::{ModuleInfo, ResourceKind, SharingPolicy};
    use crate::engine::HabitatEngine;

    #[test]
    fn test_save_load_roundtrip() {
        let mut engine = HabitatEngine::new(Terrain::flat(24, 30, 10));
        let tank = engine.place_module(
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
            },
            2,
            7,
        );
        engine.modules.add_resource(tank, ResourceKind::Water, 40);
        engine.place_connector(3, 5, 10);
        let entity = engine.spawn_colonist(8, Role::Farmer).unwrap();
        engine.world.get::<&mut Needs>(entity).unwrap().water = 6;

        // Run long enough for a plan and a partial execution to exist.
        for _ in 0..10 {
            engine.update();
        }

        let original_minutes = engine.sim_minutes;
        let original_pos = *engine.world.get::<&GridPos>(entity).unwrap();
        let original_state = (*engine.world.get::<&GoalState>(entity).unwrap()).clone();

        let mut buffer = Vec::new();
        engine.save(&mut buffer).expect("save failed");

        let loaded = HabitatEngine::load(&buffer[..]).expect("load failed");
        assert_eq!(loaded.sim_minutes, original_minutes);
        assert_eq!(
            loaded.modules.module(tank).unwrap().quantity_of(ResourceKind::Water),
            engine.modules.module(tank).unwrap().quantity_of(ResourceKind::Water)
        );
        assert_eq!(loaded.infrastructure.floors().len(), engine.infrastructure.floors().len());

        let mut query = loaded
            .world
            .query::<(&GridPos, &GoalState)>();
        let (_, (pos, state)) = query.iter().next().expect("colonist missing after load");
        assert_eq!(*pos, original_pos);
        assert_eq!(*state, original_state);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let engine = HabitatEngine::new(Terrain::flat(8, 12, 6));
        let mut buffer = Vec::new();
        engine.save(&mut buffer).expect("save failed");
        // Version is the first little-endian u32 in the stream.
        buffer[0] = buffer[0].wrapping_add(1);

        match HabitatEngine::load(&buffer[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_ne!(found, SAVE_VERSION);
            }
            other => panic!("expected version mismatch, got {:?}", other.is_ok()),
        }
    }
}
