//! The occupancy grid.

use u_floorplan_core::{OccupancyGrid, CELL_CORRIDOR, CELL_FREE, CELL_OUT_OF_BOUNDS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// State of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellState {
    /// Inside the boundary and unoccupied.
    #[default]
    Free,
    /// Circulation cell.
    Corridor,
    /// Outside the boundary. Fixed at construction.
    OutOfBounds,
    /// Occupied by the room with this id.
    Room(usize),
}

impl CellState {
    /// Integer code of the state.
    pub fn code(self) -> i32 {
        match self {
            CellState::Free => CELL_FREE,
            CellState::Corridor => CELL_CORRIDOR,
            CellState::OutOfBounds => CELL_OUT_OF_BOUNDS,
            CellState::Room(id) => id as i32,
        }
    }

    /// Decodes an integer cell code. Unknown negative codes read as corridor.
    pub fn from_code(code: i32) -> Self {
        match code {
            CELL_FREE => CellState::Free,
            CELL_OUT_OF_BOUNDS => CellState::OutOfBounds,
            c if c < 0 => CellState::Corridor,
            c => CellState::Room(c as usize),
        }
    }

    /// Returns true for free cells.
    pub fn is_free(self) -> bool {
        self == CellState::Free
    }

    /// Returns true for corridor cells.
    pub fn is_corridor(self) -> bool {
        self == CellState::Corridor
    }

    /// Returns true for corridor or room cells.
    pub fn is_occupied(self) -> bool {
        matches!(self, CellState::Corridor | CellState::Room(_))
    }

    /// The room id, if the cell belongs to a room.
    pub fn room_id(self) -> Option<usize> {
        match self {
            CellState::Room(id) => Some(id),
            _ => None,
        }
    }
}

/// Orthogonal neighbour offsets.
pub const NEIGHBORS_4: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A rectangular grid of cells indexed `[x, y]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid of free cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellState::Free; width * height],
        }
    }

    /// Creates a grid by evaluating `f` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> CellState) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    /// Returns true if `(x, y)` lies on the grid.
    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// State of an on-grid cell.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> CellState {
        self.cells[self.index(x, y)]
    }

    /// State of a cell given signed coordinates, `None` off the grid.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<CellState> {
        if self.in_bounds(x, y) {
            Some(self.at(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Writes a cell. Out-of-bounds cells are fixed: writes to them, and
    /// writes of [`CellState::OutOfBounds`], are ignored. Returns whether the
    /// cell was written.
    pub fn set(&mut self, x: usize, y: usize, state: CellState) -> bool {
        let index = self.index(x, y);
        if self.cells[index] == CellState::OutOfBounds || state == CellState::OutOfBounds {
            return false;
        }
        self.cells[index] = state;
        true
    }

    /// Iterates over `((x, y), state)` in scan order (x outer, y inner).
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), CellState)> + '_ {
        let height = self.height;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &state)| ((i / height, i % height), state))
    }

    /// Orthogonal on-grid neighbours of `(x, y)`.
    pub fn neighbors4(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBORS_4.iter().filter_map(move |&(dx, dy)| {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            self.in_bounds(nx, ny).then_some((nx as usize, ny as usize))
        })
    }

    /// Number of orthogonal corridor neighbours of `(x, y)`.
    pub fn corridor_neighbor_count(&self, x: usize, y: usize) -> usize {
        self.neighbors4(x, y)
            .filter(|&(nx, ny)| self.at(nx, ny).is_corridor())
            .count()
    }

    /// Returns true if any cell belongs to room `id`.
    pub fn contains_room(&self, id: usize) -> bool {
        self.cells.contains(&CellState::Room(id))
    }

    /// Placement flags indexed by room id (index 0 unused).
    pub fn placed_mask(&self, room_count: usize) -> Vec<bool> {
        let mut mask = vec![false; room_count + 1];
        for state in &self.cells {
            if let CellState::Room(id) = *state {
                if let Some(flag) = mask.get_mut(id) {
                    *flag = true;
                }
            }
        }
        mask
    }

    /// Ids of the rooms present on the grid, ascending.
    pub fn room_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.cells.iter().filter_map(|s| s.room_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Number of cells in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }

    /// Number of cells occupied by any room.
    pub fn room_cell_count(&self) -> usize {
        self.cells.iter().filter(|s| s.room_id().is_some()).count()
    }

    /// Cells of a given state, in scan order.
    pub fn cells_with(&self, state: CellState) -> Vec<(usize, usize)> {
        self.cells()
            .filter(|&(_, s)| s == state)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Exports the grid as integer codes.
    pub fn to_occupancy(&self) -> OccupancyGrid {
        OccupancyGrid {
            width: self.width,
            height: self.height,
            codes: self.cells.iter().map(|s| s.code()).collect(),
        }
    }

    /// Rebuilds a grid from integer codes.
    pub fn from_occupancy(occupancy: &OccupancyGrid) -> Self {
        Self {
            width: occupancy.width,
            height: occupancy.height,
            cells: occupancy.codes.iter().map(|&c| CellState::from_code(c)).collect(),
        }
    }
}

/// The bounding rectangle of a placed room stamp, corridor skirt included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoomCells {
    /// Minimum column.
    pub x: usize,
    /// Minimum row.
    pub y: usize,
    /// Number of columns.
    pub w: usize,
    /// Number of rows.
    pub h: usize,
}

impl RoomCells {
    /// Creates a rectangle.
    pub fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    /// Returns true if the cell lies inside the rectangle.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    /// Signed variant of [`RoomCells::contains`].
    pub fn contains_signed(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && self.contains(x as usize, y as usize)
    }

    /// Iterates over the covered cells.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (x0, y0, h) = (self.x, self.y, self.h);
        (x0..x0 + self.w).flat_map(move |x| (y0..y0 + h).map(move |y| (x, y)))
    }

    /// Number of covered cells.
    pub fn area(&self) -> usize {
        self.w * self.h
    }

    /// Returns true if the rectangles share a cell.
    pub fn overlaps(&self, other: &RoomCells) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_codes() {
        assert_eq!(CellState::Free.code(), 0);
        assert_eq!(CellState::Corridor.code(), -1);
        assert_eq!(CellState::OutOfBounds.code(), 9999);
        assert_eq!(CellState::Room(4).code(), 4);
        assert_eq!(CellState::from_code(-1), CellState::Corridor);
        assert_eq!(CellState::from_code(9999), CellState::OutOfBounds);
        assert_eq!(CellState::from_code(3), CellState::Room(3));
    }

    #[test]
    fn test_out_of_bounds_is_fixed() {
        let mut grid = Grid::from_fn(3, 3, |x, _| {
            if x == 0 {
                CellState::OutOfBounds
            } else {
                CellState::Free
            }
        });
        assert!(!grid.set(0, 1, CellState::Room(1)));
        assert_eq!(grid.at(0, 1), CellState::OutOfBounds);
        assert!(!grid.set(1, 1, CellState::OutOfBounds));
        assert!(grid.set(1, 1, CellState::Corridor));
        assert_eq!(grid.count(CellState::OutOfBounds), 3);
    }

    #[test]
    fn test_scan_order() {
        let grid = Grid::new(2, 3);
        let order: Vec<_> = grid.cells().map(|(pos, _)| pos).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_neighbors_and_corridor_count() {
        let mut grid = Grid::new(3, 3);
        grid.set(0, 1, CellState::Corridor);
        grid.set(1, 0, CellState::Corridor);
        grid.set(2, 1, CellState::Corridor);
        assert_eq!(grid.neighbors4(0, 0).count(), 2);
        assert_eq!(grid.neighbors4(1, 1).count(), 4);
        assert_eq!(grid.corridor_neighbor_count(1, 1), 3);
    }

    #[test]
    fn test_placed_mask_and_room_ids() {
        let mut grid = Grid::new(4, 4);
        grid.set(0, 0, CellState::Room(2));
        grid.set(3, 3, CellState::Room(3));
        grid.set(3, 2, CellState::Room(3));
        assert_eq!(grid.placed_mask(3), vec![false, false, true, true]);
        assert_eq!(grid.room_ids(), vec![2, 3]);
        assert!(grid.contains_room(3));
        assert!(!grid.contains_room(1));
        assert_eq!(grid.room_cell_count(), 3);
    }

    #[test]
    fn test_occupancy_round_trip() {
        let mut grid = Grid::new(2, 2);
        grid.set(1, 0, CellState::Room(1));
        grid.set(0, 1, CellState::Corridor);
        let occupancy = grid.to_occupancy();
        assert_eq!(occupancy.codes, vec![0, -1, 1, 0]);
        assert_eq!(Grid::from_occupancy(&occupancy), grid);
    }

    #[test]
    fn test_room_cells() {
        let rect = RoomCells::new(1, 2, 3, 2);
        assert!(rect.contains(3, 3));
        assert!(!rect.contains(4, 3));
        assert!(!rect.contains_signed(-1, 2));
        assert_eq!(rect.cells().count(), 6);
        assert!(rect.overlaps(&RoomCells::new(3, 3, 2, 2)));
        assert!(!rect.overlaps(&RoomCells::new(4, 2, 2, 2)));
    }
}
