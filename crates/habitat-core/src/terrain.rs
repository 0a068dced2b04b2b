//! Terrain zoning - interprets the raw block grid into a topography
//! profile and walkable surface zones.
//!
//! This module is the sole authority on the column grid supplied by the
//! map loader. Zones are recomputed wholesale whenever terrain changes;
//! their ids are deterministic so references stay stable across reruns.

use crate::components::{GridPos, ZoneId};
use serde::{Deserialize, Serialize};

/// Maximum surface-height delta (in cells) a colonist can step across
/// without a ladder. Larger deltas split the ground into separate zones.
pub const CLIMB_LIMIT: i32 = 2;

/// A maximal contiguous run of ground columns walkable without climbing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub left_edge: GridPos,
    pub right_edge: GridPos,
}

impl Zone {
    fn new(left_edge: GridPos, right_edge: GridPos) -> Self {
        Self {
            id: zone_id(left_edge),
            left_edge,
            right_edge,
        }
    }

    pub fn contains_column(&self, x: i32) -> bool {
        x >= self.left_edge.x && x <= self.right_edge.x
    }
}

/// Zone ids derive from the left edge: two-digit column then surface row.
fn zone_id(left_edge: GridPos) -> ZoneId {
    format!("{:02}{}", left_edge.x, left_edge.y)
}

/// Column-major terrain grid plus the derived topography and zone list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Terrain {
    /// `columns[x][y]` is the block-type code at that cell; 0 = empty.
    columns: Vec<Vec<u8>>,
    /// Per column, the y of the highest occupied cell (y grows downward).
    topography: Vec<i32>,
    zones: Vec<Zone>,
}

impl Terrain {
    pub fn new(columns: Vec<Vec<u8>>) -> Self {
        let mut terrain = Self {
            columns,
            topography: Vec::new(),
            zones: Vec::new(),
        };
        terrain.rebuild();
        terrain
    }

    /// Flat test/fixture terrain: every column's surface at `surface_y`.
    pub fn flat(width: usize, depth: usize, surface_y: i32) -> Self {
        let columns = (0..width)
            .map(|_| {
                (0..depth)
                    .map(|y| if (y as i32) >= surface_y { 1u8 } else { 0u8 })
                    .collect()
            })
            .collect();
        Self::new(columns)
    }

    pub fn width(&self) -> i32 {
        self.columns.len() as i32
    }

    pub fn in_bounds(&self, x: i32) -> bool {
        x >= 0 && x < self.width()
    }

    pub fn block_at(&self, x: i32, y: i32) -> u8 {
        self.columns
            .get(x as usize)
            .and_then(|col| col.get(y as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Mutate a block and recompute topography and zones wholesale.
    pub fn set_block(&mut self, x: i32, y: i32, code: u8) {
        if let Some(cell) = self
            .columns
            .get_mut(x as usize)
            .and_then(|col| col.get_mut(y as usize))
        {
            *cell = code;
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        self.topography = self.determine_topography();
        self.zones = self.determine_zones();
    }

    /// Per column, the y-coordinate of its highest occupied cell. Empty
    /// columns report one past the bottom of the grid.
    fn determine_topography(&self) -> Vec<i32> {
        self.columns
            .iter()
            .map(|col| {
                col.iter()
                    .position(|&code| code != 0)
                    .map(|y| y as i32)
                    .unwrap_or(col.len() as i32)
            })
            .collect()
    }

    /// Left-to-right scan: a new zone starts wherever the surface delta
    /// between adjacent columns exceeds the climb limit.
    fn determine_zones(&self) -> Vec<Zone> {
        let mut zones = Vec::new();
        if self.topography.is_empty() {
            return zones;
        }

        let mut left = GridPos::new(0, self.topography[0]);
        for x in 1..self.topography.len() {
            let prev = self.topography[x - 1];
            let here = self.topography[x];
            if (here - prev).abs() > CLIMB_LIMIT {
                zones.push(Zone::new(left, GridPos::new(x as i32 - 1, prev)));
                left = GridPos::new(x as i32, here);
            }
        }
        let last = self.topography.len() - 1;
        zones.push(Zone::new(left, GridPos::new(last as i32, self.topography[last])));
        zones
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Surface elevation of a column, if in bounds.
    pub fn surface_y(&self, x: i32) -> Option<i32> {
        if self.in_bounds(x) {
            Some(self.topography[x as usize])
        } else {
            None
        }
    }

    /// Zone owning a column.
    pub fn zone_at(&self, x: i32) -> Option<&Zone> {
        self.zones.iter().find(|z| z.contains_column(x))
    }

    /// True only if both points sit exactly on their column's recorded
    /// surface and belong to the same zone.
    pub fn walkable_from_location(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        let (Some(s1), Some(s2)) = (self.surface_y(x1), self.surface_y(x2)) else {
            return false;
        };
        if y1 != s1 || y2 != s2 {
            return false;
        }
        match (self.zone_at(x1), self.zone_at(x2)) {
            (Some(a), Some(b)) => a.id == b.id,
            _ => false,
        }
    }

    /// Mineral yield of the surface block at a column, for mining jobs.
    pub fn block_yield(&self, x: i32) -> u32 {
        let Some(y) = self.surface_y(x) else { return 0 };
        match self.block_at(x, y) {
            0 => 0,
            3 => 4, // rich ore seam
            _ => 2,
        }
    }
}
