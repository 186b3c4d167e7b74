//! Floor-plan solve results.

use crate::geom::polygon;
use crate::program::HouseProgram;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Grid code of a free cell.
pub const CELL_FREE: i32 = 0;
/// Grid code of a corridor cell.
pub const CELL_CORRIDOR: i32 = -1;
/// Grid code of a cell outside the boundary. Never a valid room id.
pub const CELL_OUT_OF_BOUNDS: i32 = 9999;

/// Final cell codes of a solved grid, indexed `[x, y]`.
///
/// Positive codes below [`CELL_OUT_OF_BOUNDS`] are room ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OccupancyGrid {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Cell codes in column-major order (`x * height + y`).
    pub codes: Vec<i32>,
}

impl OccupancyGrid {
    /// Returns the code at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        if x < self.width && y < self.height {
            self.codes.get(x * self.height + y).copied()
        } else {
            None
        }
    }

    /// Number of cells carrying `code`.
    pub fn count(&self, code: i32) -> usize {
        self.codes.iter().filter(|&&c| c == code).count()
    }
}

/// A planar region made of one or more closed contours.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    /// Outer contours and holes, in world coordinates.
    pub contours: Vec<Vec<(f64, f64)>>,
}

impl Region {
    /// Returns true if the region has no contours.
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Net area: holes are wound opposite to outer contours.
    pub fn area(&self) -> f64 {
        self.contours
            .iter()
            .map(|c| polygon::signed_area(c))
            .sum::<f64>()
            .abs()
    }
}

/// Geometry of one placed room.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoomGeometry {
    /// Room id.
    pub room_id: usize,
    /// Merged outline of the room's cells.
    pub region: Region,
    /// Corners of the room's placement rectangle, corridor skirt included.
    pub rectangle: Vec<(f64, f64)>,
    /// Number of grid cells the room occupies.
    pub cell_count: usize,
}

/// Result of a floor-plan solve.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloorPlanResult {
    /// Placed rooms in ascending id order.
    pub room_geometries: Vec<RoomGeometry>,

    /// Union of all corridor cells.
    pub corridor_geometry: Region,

    /// Display names of the placed rooms; halls carry the hall prefix.
    pub room_names: Vec<String>,

    /// Ids of the placed rooms, parallel to `room_geometries`.
    pub room_ids: Vec<usize>,

    /// Adjacency pairs whose rooms were both placed, as indices into
    /// `room_geometries`.
    pub adjacency_pairs_placed: Vec<(usize, usize)>,

    /// Number of unmet adjacencies per placed room.
    pub missing_adjacency_counts: Vec<usize>,

    /// Number of rooms placed.
    pub placed_count: usize,

    /// Number of rooms in the program.
    pub total_count: usize,

    /// Final grid state.
    pub occupancy: OccupancyGrid,

    /// Rotation applied to the boundary before gridding, in radians.
    pub rotation_rad: f64,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Whether the solve was cancelled early.
    pub cancelled: bool,
}

impl FloorPlanResult {
    /// Creates an empty result for a program of `total_count` rooms.
    pub fn empty(total_count: usize) -> Self {
        Self {
            total_count,
            ..Default::default()
        }
    }

    /// Returns true if every room was placed.
    pub fn all_placed(&self) -> bool {
        self.placed_count == self.total_count
    }

    /// Sum of the per-room missing adjacency counts.
    pub fn total_missing_adjacency(&self) -> usize {
        self.missing_adjacency_counts.iter().sum()
    }

    /// Renders placed adjacency pairs as `"i-j"` lines of room indices.
    pub fn adjacency_output_string(&self) -> String {
        self.adjacency_pairs_placed
            .iter()
            .map(|(a, b)| format!("{a}-{b}\n"))
            .collect()
    }

    /// Updates `has_missing_adjacency` on every room of the program.
    ///
    /// Unplaced rooms with at least one adjacency are flagged as well.
    pub fn apply_missing_adjacency(&self, program: &mut HouseProgram) {
        let flags: Vec<(usize, bool)> = program
            .rooms()
            .iter()
            .map(|room| {
                let missing = match self.room_ids.iter().position(|&id| id == room.id) {
                    Some(index) => self
                        .missing_adjacency_counts
                        .get(index)
                        .is_some_and(|&count| count > 0),
                    None => program.neighbors(room.id).next().is_some(),
                };
                (room.id, missing)
            })
            .collect();

        for (id, missing) in flags {
            if let Some(room) = program.room_mut(id) {
                room.has_missing_adjacency = missing;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_adjacency_output_string() {
        let result = FloorPlanResult {
            adjacency_pairs_placed: vec![(0, 1), (1, 2)],
            ..FloorPlanResult::empty(3)
        };
        assert_eq!(result.adjacency_output_string(), "0-1\n1-2\n");
    }

    #[test]
    fn test_region_area_with_hole() {
        let region = Region {
            contours: vec![
                vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)],
                vec![(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)],
            ],
        };
        assert_relative_eq!(region.area(), 15.0);
    }

    #[test]
    fn test_occupancy_lookup() {
        let grid = OccupancyGrid {
            width: 2,
            height: 3,
            codes: vec![0, -1, 9999, 1, 1, 0],
        };
        assert_eq!(grid.get(0, 1), Some(CELL_CORRIDOR));
        assert_eq!(grid.get(1, 0), Some(1));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.count(CELL_FREE), 2);
    }

    #[test]
    fn test_apply_missing_adjacency() {
        let mut program = HouseProgram::new()
            .with_room(10.0)
            .with_room(10.0)
            .with_room(10.0)
            .with_adjacency(1, 2)
            .with_adjacency(2, 3);
        let result = FloorPlanResult {
            room_ids: vec![1, 2],
            missing_adjacency_counts: vec![0, 1],
            placed_count: 2,
            ..FloorPlanResult::empty(3)
        };
        result.apply_missing_adjacency(&mut program);
        let flags: Vec<bool> = program
            .rooms()
            .iter()
            .map(|r| r.has_missing_adjacency)
            .collect();
        assert_eq!(flags, vec![false, true, true]);
        assert!(!result.all_placed());
    }
}
