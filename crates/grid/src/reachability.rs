//! Corridor distances between cells.
//!
//! Distances are measured on the 8-connected grid graph. Only the start cell
//! and corridor cells are expanded; any other cell can be reached but not
//! passed through. Orthogonal steps cost 1, diagonal steps `sqrt(2)`.

use crate::grid::{CellState, Grid};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const NEIGHBORS_8: [(i64, i64, f64); 8] = [
    (-1, 0, 1.0),
    (1, 0, 1.0),
    (0, -1, 1.0),
    (0, 1, 1.0),
    (-1, -1, std::f64::consts::SQRT_2),
    (-1, 1, std::f64::consts::SQRT_2),
    (1, -1, std::f64::consts::SQRT_2),
    (1, 1, std::f64::consts::SQRT_2),
];

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    distance: f64,
    index: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Reversed so the max-heap pops the nearest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Shortest corridor distances from `start` to every cell, up to `limit`.
///
/// Returns a column-major vector (`x * height + y`); unreached cells hold
/// `f64::INFINITY`.
pub fn distance_field(grid: &Grid, start: (usize, usize), limit: f64) -> Vec<f64> {
    let (width, height) = (grid.width(), grid.height());
    let mut dist = vec![f64::INFINITY; width * height];
    if start.0 >= width || start.1 >= height {
        return dist;
    }

    let start_index = start.0 * height + start.1;
    dist[start_index] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry {
        distance: 0.0,
        index: start_index,
    });

    while let Some(QueueEntry { distance, index }) = heap.pop() {
        if distance > dist[index] {
            continue;
        }
        let (x, y) = (index / height, index % height);
        if index != start_index && !grid.at(x, y).is_corridor() {
            continue;
        }
        for &(dx, dy, cost) in &NEIGHBORS_8 {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let next = nx as usize * height + ny as usize;
            let candidate = distance + cost;
            if candidate <= limit && candidate < dist[next] {
                dist[next] = candidate;
                heap.push(QueueEntry {
                    distance: candidate,
                    index: next,
                });
            }
        }
    }
    dist
}

/// Shortest path length from `from` to `to` whose intermediate cells are all
/// corridors. The metric is symmetric.
pub fn corridor_distance(grid: &Grid, from: (usize, usize), to: (usize, usize)) -> Option<f64> {
    if to.0 >= grid.width() || to.1 >= grid.height() {
        return None;
    }
    let field = distance_field(grid, from, f64::INFINITY);
    let d = field[to.0 * grid.height() + to.1];
    d.is_finite().then_some(d)
}

/// Accepts candidate cells close enough to every required neighbour room.
#[derive(Debug, Clone, Copy)]
pub struct ReachabilityFilter {
    max_distance: f64,
}

impl ReachabilityFilter {
    /// Creates a filter with the given distance bound.
    pub fn new(max_distance: f64) -> Self {
        Self { max_distance }
    }

    /// The distance bound.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Returns true if every room in `required` has a cell within the bound
    /// of `cell`.
    pub fn accepts(&self, grid: &Grid, cell: (usize, usize), required: &[usize]) -> bool {
        if required.is_empty() {
            return true;
        }
        let field = distance_field(grid, cell, self.max_distance);
        let mut reached = vec![false; required.len()];
        for ((x, y), state) in grid.cells() {
            let CellState::Room(id) = state else {
                continue;
            };
            let d = field[x * grid.height() + y];
            if d > 0.0 && d <= self.max_distance {
                for (flag, &req) in reached.iter_mut().zip(required) {
                    if req == id {
                        *flag = true;
                    }
                }
            }
        }
        reached.into_iter().all(|r| r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Room 1 at the left, a corridor along row 2, free cells elsewhere.
    fn corridor_grid() -> Grid {
        let mut grid = Grid::new(8, 5);
        for y in 0..5 {
            grid.set(0, y, CellState::Room(1));
        }
        for x in 1..8 {
            grid.set(x, 2, CellState::Corridor);
        }
        grid
    }

    #[test]
    fn test_distance_along_corridor() {
        let grid = corridor_grid();
        let field = distance_field(&grid, (5, 3), f64::INFINITY);
        let at = |x: usize, y: usize| field[x * grid.height() + y];
        assert_relative_eq!(at(5, 2), 1.0);
        assert_relative_eq!(at(4, 2), std::f64::consts::SQRT_2);
        // Room cell reached diagonally from the corridor end.
        assert_relative_eq!(at(0, 2), 4.0 + std::f64::consts::SQRT_2);
        // Free cells are not expanded: (5, 4) is only reachable from the start.
        assert_relative_eq!(at(5, 4), 1.0);
        assert!(at(5, 1).is_finite());
        assert!(at(5, 0).is_infinite());
    }

    #[test]
    fn test_free_cells_block() {
        let mut grid = Grid::new(5, 1);
        grid.set(0, 0, CellState::Room(1));
        grid.set(1, 0, CellState::Corridor);
        let field = distance_field(&grid, (4, 0), f64::INFINITY);
        assert!(field[0].is_infinite());
        assert_relative_eq!(field[3], 1.0);
        assert!(field[2].is_infinite());
    }

    #[test]
    fn test_limit_cuts_expansion() {
        let grid = corridor_grid();
        let field = distance_field(&grid, (7, 3), 2.0);
        assert!(field[0].is_infinite());
        assert!(field[2].is_infinite());
    }

    #[test]
    fn test_corridor_distance_symmetric() {
        let grid = corridor_grid();
        let pairs = [((0, 1), (6, 3)), ((7, 1), (0, 4)), ((3, 4), (5, 0))];
        for (a, b) in pairs {
            let ab = corridor_distance(&grid, a, b);
            let ba = corridor_distance(&grid, b, a);
            assert_eq!(ab.is_some(), ba.is_some());
            if let (Some(ab), Some(ba)) = (ab, ba) {
                assert_relative_eq!(ab, ba, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_filter_requires_all_rooms() {
        let mut grid = corridor_grid();
        grid.set(7, 0, CellState::Room(2));
        grid.set(7, 1, CellState::Free);
        let filter = ReachabilityFilter::new(2.0);
        // Next to room 1 through the corridor start.
        assert!(filter.accepts(&grid, (1, 3), &[1]));
        assert!(!filter.accepts(&grid, (1, 3), &[1, 2]));
        assert!(filter.accepts(&grid, (6, 1), &[2]));
        assert!(filter.accepts(&grid, (6, 1), &[]));
        assert!(!filter.accepts(&grid, (6, 1), &[1]));
    }
}
