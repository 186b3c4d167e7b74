//! Mapping between world coordinates and grid cells.
//!
//! The grid lives in a frame where the boundary has been rotated by
//! `rotation` about `pivot`. Cell `(i, j)` covers
//! `[origin + i * cell_size, origin + (i + 1) * cell_size)` on each axis.

use crate::grid::{CellState, Grid, RoomCells};
use u_floorplan_core::{best_fit_rotation, rotate_point, Boundary, SolverConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placement of the grid in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridFrame {
    /// Minimum corner of the grid in the rotated frame.
    pub origin: (f64, f64),
    /// Size of one cell in world units.
    pub cell_size: f64,
    /// Rotation applied to the boundary, in radians.
    pub rotation: f64,
    /// Centre of that rotation.
    pub pivot: (f64, f64),
}

impl GridFrame {
    /// Maps a point from the rotated frame back to world space.
    pub fn to_world(&self, point: (f64, f64)) -> (f64, f64) {
        if self.rotation == 0.0 {
            point
        } else {
            rotate_point(point, -self.rotation, self.pivot)
        }
    }

    /// Maps a world point into the rotated frame.
    pub fn to_local(&self, point: (f64, f64)) -> (f64, f64) {
        if self.rotation == 0.0 {
            point
        } else {
            rotate_point(point, self.rotation, self.pivot)
        }
    }

    /// Maps fractional grid coordinates to world space.
    pub fn grid_to_world(&self, gx: f64, gy: f64) -> (f64, f64) {
        self.to_world((
            self.origin.0 + gx * self.cell_size,
            self.origin.1 + gy * self.cell_size,
        ))
    }

    /// Centre of a cell in the rotated frame.
    pub fn cell_center_local(&self, x: usize, y: usize) -> (f64, f64) {
        (
            self.origin.0 + (x as f64 + 0.5) * self.cell_size,
            self.origin.1 + (y as f64 + 0.5) * self.cell_size,
        )
    }

    /// Signed cell coordinates of a world point.
    pub fn cell_of(&self, world: (f64, f64)) -> (i64, i64) {
        let (lx, ly) = self.to_local(world);
        (
            ((lx - self.origin.0) / self.cell_size).floor() as i64,
            ((ly - self.origin.1) / self.cell_size).floor() as i64,
        )
    }

    /// World-space corners of a cell rectangle, counter-clockwise.
    pub fn rect_to_world(&self, rect: &RoomCells) -> Vec<(f64, f64)> {
        let (x0, y0) = (rect.x as f64, rect.y as f64);
        let (x1, y1) = ((rect.x + rect.w) as f64, (rect.y + rect.h) as f64);
        vec![
            self.grid_to_world(x0, y0),
            self.grid_to_world(x1, y0),
            self.grid_to_world(x1, y1),
            self.grid_to_world(x0, y1),
        ]
    }
}

/// The grid a search starts from.
#[derive(Debug, Clone)]
pub struct InitialGrid {
    /// Cells classified as free or out of bounds, plus the corridor seed.
    pub grid: Grid,
    /// World mapping of the grid.
    pub frame: GridFrame,
    /// The seeded corridor cell, if any.
    pub seed: Option<(usize, usize)>,
}

/// Samples the boundary at cell centres and seeds the starting corridor.
///
/// With `try_rotate_boundary` the boundary is first turned to the angle
/// whose bounding box is smallest. Without a starting point the seed goes to
/// the centre cell, or the first free cell when the centre is outside.
pub fn build_initial_grid<B: Boundary>(
    boundary: &B,
    config: &SolverConfig,
    starting_point: Option<(f64, f64)>,
) -> InitialGrid {
    let pivot = boundary.aabb().center();
    let rotation = if config.try_rotate_boundary {
        best_fit_rotation(boundary, config.rotation_step_deg)
    } else {
        0.0
    };
    let local = boundary.rotated(rotation, pivot);
    let aabb = local.aabb();
    let cells_along = |extent: f64| {
        let n = (extent / config.cell_size).floor();
        if n.is_finite() && n > 0.0 {
            n as usize
        } else {
            0
        }
    };
    let (width, height) = (cells_along(aabb.width()), cells_along(aabb.height()));

    let frame = GridFrame {
        origin: (aabb.min_x, aabb.min_y),
        cell_size: config.cell_size,
        rotation,
        pivot,
    };

    let mut grid = Grid::from_fn(width, height, |x, y| {
        let (cx, cy) = frame.cell_center_local(x, y);
        if local.contains_point(cx, cy) {
            CellState::Free
        } else {
            CellState::OutOfBounds
        }
    });

    let seed = match starting_point {
        Some(point) => {
            let (lx, ly) = frame.to_local(point);
            let (cx, cy) = frame.cell_of(point);
            match grid.get(cx, cy) {
                Some(CellState::Free) if local.contains_point(lx, ly) => {
                    Some((cx as usize, cy as usize))
                }
                _ => {
                    log::warn!(
                        "starting point ({:.3}, {:.3}) is outside the boundary, no corridor seeded",
                        point.0,
                        point.1
                    );
                    None
                }
            }
        }
        None => default_seed(&grid),
    };
    if let Some((x, y)) = seed {
        grid.set(x, y, CellState::Corridor);
    }

    InitialGrid { grid, frame, seed }
}

fn default_seed(grid: &Grid) -> Option<(usize, usize)> {
    if grid.is_empty() {
        return None;
    }
    let center = (grid.width() / 2, grid.height() / 2);
    if grid.at(center.0, center.1).is_free() {
        return Some(center);
    }
    grid.cells()
        .find(|(_, state)| state.is_free())
        .map(|(pos, _)| pos)
}
