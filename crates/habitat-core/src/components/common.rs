//! Common components used across colonists, modules, and the building graph.

use serde::{Deserialize, Serialize};

/// Integer grid position. `x` is the terrain column, `y` the depth row
/// (y grows downward, so a smaller y is higher up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal distance only. Colonists route column by column, so
    /// proximity comparisons ignore elevation.
    pub fn x_distance(&self, other_x: i32) -> i32 {
        (self.x - other_x).abs()
    }
}

/// Identifier of a ground zone, derived from its left edge coordinates.
pub type ZoneId = String;

/// Identifier of a floor record in the building graph arena.
pub type FloorId = u32;

/// Identifier of an elevator/ladder record in the building graph arena.
pub type ElevatorId = u32;

/// Identifier of a module record in the registry arena.
pub type ModuleId = u32;

/// What a colonist is standing on: either open ground (a zone) or a
/// built floor. The two are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Ground(ZoneId),
    Floor(FloorId),
}

/// Direction a colonist is facing, for the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn toward(from_x: i32, to_x: i32) -> Self {
        if to_x < from_x {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}
