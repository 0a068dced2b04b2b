//! Building graph - floors, elevators, and the lookups tying modules and
//! coordinates to graph records.
//!
//! Floors and elevators live in arenas keyed by integer id; every
//! cross-reference is an id field resolved through the arena, so the
//! Floor <-> Elevator <-> Module web never forms ownership cycles.

use crate::components::{ElevatorId, FloorId, ModuleId, Surface, ZoneId};
use crate::terrain::Terrain;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A horizontal interior surface created by built modules at one
/// elevation. Colonists on a floor stand at `elevation - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub id: FloorId,
    /// y of the floor surface row (y grows downward).
    pub elevation: i32,
    pub left_edge: i32,
    pub right_edge: i32,
    pub module_ids: Vec<ModuleId>,
    /// Zones this floor touches; non-empty only when the floor rests
    /// directly on terrain.
    pub ground_zone_ids: Vec<ZoneId>,
    pub connector_ids: Vec<ElevatorId>,
}

impl Floor {
    pub fn covers_column(&self, x: i32) -> bool {
        x >= self.left_edge && x <= self.right_edge
    }

    /// y-coordinate colonists occupy while on this floor.
    pub fn standing_y(&self) -> i32 {
        self.elevation - 1
    }

    pub fn touches_zone(&self, zone_id: &str) -> bool {
        self.ground_zone_ids.iter().any(|z| z == zone_id)
    }

    fn overlaps_or_adjoins(&self, left: i32, right: i32) -> bool {
        right >= self.left_edge - 1 && left <= self.right_edge + 1
    }
}

/// A vertical connector (ladder/lift) at one x-coordinate, spanning
/// `top..=bottom`. `ground_zone_id` is set when the bottom lands on a
/// walkable ground surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elevator {
    pub id: ElevatorId,
    pub x: i32,
    pub top: i32,
    pub bottom: i32,
    pub ground_zone_id: Option<ZoneId>,
}

impl Elevator {
    /// A floor is serviced when the ladder spans the row colonists stand
    /// on and sits within the floor's horizontal extent.
    fn services(&self, floor: &Floor) -> bool {
        floor.covers_column(self.x)
            && floor.standing_y() >= self.top
            && floor.standing_y() <= self.bottom
    }
}

/// Arena of floor and elevator records plus the module placement logic
/// that keeps them consistent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Infrastructure {
    floors: Vec<Floor>,
    elevators: HashMap<ElevatorId, Elevator>,
    next_floor_id: FloorId,
    next_elevator_id: ElevatorId,
}

impl Infrastructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, id: FloorId) -> Option<&Floor> {
        self.floors.iter().find(|f| f.id == id)
    }

    pub fn elevator(&self, id: ElevatorId) -> Option<&Elevator> {
        self.elevators.get(&id)
    }

    /// Register a module footprint. Same-elevation floors that overlap or
    /// adjoin the footprint are merged into one record; otherwise a new
    /// floor is created. Returns the owning floor id.
    pub fn add_module(
        &mut self,
        module_id: ModuleId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        terrain: &Terrain,
    ) -> FloorId {
        let elevation = y + height;
        let (left, right) = (x, x + width - 1);

        // Zones directly beneath the footprint, when resting on terrain.
        let mut ground_zones: Vec<ZoneId> = Vec::new();
        for col in left..=right {
            if terrain.surface_y(col) == Some(elevation) {
                if let Some(zone) = terrain.zone_at(col) {
                    if !ground_zones.contains(&zone.id) {
                        ground_zones.push(zone.id.clone());
                    }
                }
            }
        }

        // Pull out every mergeable floor (a wide module can bridge two).
        let mut absorbed: Vec<Floor> = Vec::new();
        let mut i = 0;
        while i < self.floors.len() {
            if self.floors[i].elevation == elevation
                && self.floors[i].overlaps_or_adjoins(left, right)
            {
                absorbed.push(self.floors.remove(i));
            } else {
                i += 1;
            }
        }

        let mut floor = if let Some(mut base) = absorbed.pop() {
            base.left_edge = base.left_edge.min(left);
            base.right_edge = base.right_edge.max(right);
            base
        } else {
            let id = self.next_floor_id;
            self.next_floor_id += 1;
            Floor {
                id,
                elevation,
                left_edge: left,
                right_edge: right,
                module_ids: Vec::new(),
                ground_zone_ids: Vec::new(),
                connector_ids: Vec::new(),
            }
        };

        for other in absorbed {
            floor.left_edge = floor.left_edge.min(other.left_edge);
            floor.right_edge = floor.right_edge.max(other.right_edge);
            floor.module_ids.extend(other.module_ids);
            for z in other.ground_zone_ids {
                if !floor.ground_zone_ids.contains(&z) {
                    floor.ground_zone_ids.push(z);
                }
            }
            for c in other.connector_ids {
                if !floor.connector_ids.contains(&c) {
                    floor.connector_ids.push(c);
                }
            }
        }

        floor.module_ids.push(module_id);
        for z in ground_zones {
            if !floor.ground_zone_ids.contains(&z) {
                floor.ground_zone_ids.push(z);
            }
        }

        // A grown extent may now reach previously unattached ladders.
        for elevator in self.elevators.values() {
            if elevator.services(&floor) && !floor.connector_ids.contains(&elevator.id) {
                floor.connector_ids.push(elevator.id);
            }
        }

        let id = floor.id;
        self.floors.push(floor);
        id
    }

    /// Register a vertical connector and attach it to every floor it
    /// services. Returns the new elevator id.
    pub fn add_connector(&mut self, x: i32, top: i32, bottom: i32, terrain: &Terrain) -> ElevatorId {
        let id = self.next_elevator_id;
        self.next_elevator_id += 1;

        // Grounded when the bottom is at or one cell above the surface.
        let ground_zone_id = terrain.surface_y(x).and_then(|surface| {
            if bottom >= surface - 1 {
                terrain.zone_at(x).map(|z| z.id.clone())
            } else {
                None
            }
        });

        let elevator = Elevator {
            id,
            x,
            top,
            bottom,
            ground_zone_id,
        };

        for floor in &mut self.floors {
            if elevator.services(floor) && !floor.connector_ids.contains(&id) {
                floor.connector_ids.push(id);
            }
        }

        self.elevators.insert(id, elevator);
        id
    }

    pub fn floor_from_module_id(&self, module_id: ModuleId) -> Option<&Floor> {
        self.floors.iter().find(|f| f.module_ids.contains(&module_id))
    }

    /// Floor occupying a coordinate - matches the surface row or the
    /// standing row above it.
    pub fn floor_from_coords(&self, x: i32, y: i32) -> Option<&Floor> {
        self.floors
            .iter()
            .find(|f| f.covers_column(x) && (y == f.elevation || y == f.standing_y()))
    }

    /// What occupies a coordinate: the ground zone when the point sits on
    /// the terrain surface, otherwise a floor. Ground wins the tie so a
    /// colonist walking past a grounded module stays in its zone.
    pub fn surface_at(&self, x: i32, y: i32, terrain: &Terrain) -> Option<Surface> {
        if terrain.surface_y(x) == Some(y) {
            return terrain.zone_at(x).map(|z| Surface::Ground(z.id.clone()));
        }
        self.floor_from_coords(x, y).map(|f| Surface::Floor(f.id))
    }

    pub fn elevators_for_floor(&self, floor_id: FloorId) -> Vec<&Elevator> {
        self.floor(floor_id)
            .map(|f| {
                f.connector_ids
                    .iter()
                    .filter_map(|id| self.elevators.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn floors_for_elevator(&self, elevator_id: ElevatorId) -> Vec<&Floor> {
        self.floors
            .iter()
            .filter(|f| f.connector_ids.contains(&elevator_id))
            .collect()
    }
}
