//! Corridor clean-up applied to the final layout.

use crate::grid::{CellState, Grid, RoomCells};
use crate::population::GridSolution;
use u_floorplan_core::SolverConfig;

/// Room whose placement rectangle contains `(x, y)`.
fn owner_of(room_cells: &[Option<RoomCells>], x: usize, y: usize) -> Option<(usize, RoomCells)> {
    room_cells
        .iter()
        .enumerate()
        .find_map(|(i, rect)| rect.filter(|r| r.contains(x, y)).map(|r| (i + 1, r)))
}

/// Absorbs dead-end corridor spurs into the rooms that contain them.
///
/// A dead end is a corridor cell with exactly one orthogonal corridor
/// neighbour. From it the walk follows the corridor towards that neighbour,
/// absorbing cells until it leaves the owning room's rectangle, reaches a
/// non-corridor cell or reaches a junction (three or more corridor
/// neighbours). All decisions use the grid as it was before the pass.
/// Returns the number of absorbed cells.
pub fn remove_dead_ends(grid: &mut Grid, room_cells: &[Option<RoomCells>]) -> usize {
    let mut absorbed: Vec<(usize, usize, usize)> = Vec::new();

    for ((x, y), state) in grid.cells() {
        if !state.is_corridor() || grid.corridor_neighbor_count(x, y) != 1 {
            continue;
        }
        let Some((owner, rect)) = owner_of(room_cells, x, y) else {
            continue;
        };
        let Some((nx, ny)) = grid
            .neighbors4(x, y)
            .find(|&(nx, ny)| grid.at(nx, ny).is_corridor())
        else {
            continue;
        };
        let (dx, dy) = (nx as i64 - x as i64, ny as i64 - y as i64);

        let (mut cx, mut cy) = (x as i64, y as i64);
        while let Some(CellState::Corridor) = grid.get(cx, cy) {
            if !rect.contains_signed(cx, cy)
                || grid.corridor_neighbor_count(cx as usize, cy as usize) >= 3
            {
                break;
            }
            absorbed.push((cx as usize, cy as usize, owner));
            cx += dx;
            cy += dy;
        }
    }

    absorbed.sort_unstable();
    absorbed.dedup_by_key(|&mut (x, y, _)| (x, y));
    for &(x, y, owner) in &absorbed {
        grid.set(x, y, CellState::Room(owner));
    }
    absorbed.len()
}

/// Reassigns every corridor cell inside a room rectangle to that room.
/// Corridor cells outside all rectangles are kept. Returns the number of
/// reassigned cells.
pub fn remove_all_corridors(grid: &mut Grid, room_cells: &[Option<RoomCells>]) -> usize {
    let changes: Vec<(usize, usize, usize)> = grid
        .cells()
        .filter(|(_, state)| state.is_corridor())
        .filter_map(|((x, y), _)| owner_of(room_cells, x, y).map(|(owner, _)| (x, y, owner)))
        .collect();
    for &(x, y, owner) in &changes {
        grid.set(x, y, CellState::Room(owner));
    }
    changes.len()
}

/// The post-processing steps selected by the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostProcessor {
    /// Run [`remove_dead_ends`].
    pub remove_dead_ends: bool,
    /// Run [`remove_all_corridors`].
    pub remove_all_corridors: bool,
}

impl PostProcessor {
    /// Reads the flags from the configuration.
    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            remove_dead_ends: config.remove_dead_ends,
            remove_all_corridors: config.remove_all_corridors,
        }
    }

    /// Applies the selected steps in place.
    pub fn apply(&self, solution: &mut GridSolution) {
        if self.remove_dead_ends {
            let n = remove_dead_ends(&mut solution.grid, &solution.room_cells);
            log::debug!("absorbed {n} dead-end corridor cells");
        }
        if self.remove_all_corridors {
            let n = remove_all_corridors(&mut solution.grid, &solution.room_cells);
            log::debug!("absorbed {n} corridor cells into rooms");
        }
    }
}
