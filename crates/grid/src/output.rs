//! Conversion of a solved grid into world-space geometry and statistics.

use crate::frame::GridFrame;
use crate::grid::{CellState, Grid};
use crate::population::GridSolution;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use u_floorplan_core::{FloorPlanResult, HouseProgram, Region, RoomGeometry};

/// Merges unit cell squares into outline contours, mapped to world space.
pub fn merge_cells(frame: &GridFrame, cells: &[(usize, usize)]) -> Region {
    let square = |&(x, y): &(usize, usize)| -> Vec<[f64; 2]> {
        let (x0, y0) = (x as f64, y as f64);
        vec![[x0, y0], [x0 + 1.0, y0], [x0 + 1.0, y0 + 1.0], [x0, y0 + 1.0]]
    };
    let Some((first, rest)) = cells.split_first() else {
        return Region::default();
    };

    // Union in grid units, where every vertex is an exact integer.
    let clip = square(first);
    let subject: Vec<Vec<[f64; 2]>> = rest.iter().map(square).collect();
    let shapes = subject.overlay(&[clip], OverlayRule::Union, FillRule::NonZero);

    let contours = shapes
        .into_iter()
        .flatten()
        .filter(|contour| contour.len() >= 3)
        .map(|contour| {
            contour
                .into_iter()
                .map(|[gx, gy]| frame.grid_to_world(gx, gy))
                .collect()
        })
        .collect();
    Region { contours }
}

/// Number of unmet adjacencies per room id (index 0 unused).
///
/// A pair counts against its placed endpoint when the other endpoint is
/// missing from the grid.
pub fn missing_adjacency(program: &HouseProgram, placed: &[bool]) -> Vec<usize> {
    let mut missing = vec![0; program.room_count() + 1];
    let is_placed = |id: usize| placed.get(id).copied().unwrap_or(false);
    for pair in program.adjacency() {
        match (is_placed(pair.a), is_placed(pair.b)) {
            (true, false) => missing[pair.a] += 1,
            (false, true) => missing[pair.b] += 1,
            _ => {}
        }
    }
    missing
}

/// Builds the result for a (post-processed) solution.
pub fn build_result(
    solution: &GridSolution,
    frame: &GridFrame,
    program: &HouseProgram,
) -> FloorPlanResult {
    let grid: &Grid = &solution.grid;
    let room_ids = grid.room_ids();
    let placed = grid.placed_mask(program.room_count());
    let missing = missing_adjacency(program, &placed);

    let room_geometries: Vec<RoomGeometry> = room_ids
        .iter()
        .map(|&id| {
            let cells = grid.cells_with(CellState::Room(id));
            RoomGeometry {
                room_id: id,
                region: merge_cells(frame, &cells),
                rectangle: solution
                    .rect_of(id)
                    .map(|rect| frame.rect_to_world(&rect))
                    .unwrap_or_default(),
                cell_count: cells.len(),
            }
        })
        .collect();

    let position = |id: usize| room_ids.iter().position(|&r| r == id);
    let adjacency_pairs_placed = program
        .adjacency()
        .iter()
        .filter_map(|pair| Some((position(pair.a)?, position(pair.b)?)))
        .collect();

    FloorPlanResult {
        room_geometries,
        corridor_geometry: merge_cells(frame, &grid.cells_with(CellState::Corridor)),
        room_names: room_ids
            .iter()
            .map(|&id| {
                program
                    .room(id)
                    .map(|room| room.display_name())
                    .unwrap_or_else(|| format!("Room {id}"))
            })
            .collect(),
        adjacency_pairs_placed,
        missing_adjacency_counts: room_ids.iter().map(|&id| missing[id]).collect(),
        placed_count: room_ids.len(),
        total_count: program.room_count(),
        occupancy: grid.to_occupancy(),
        rotation_rad: frame.rotation,
        room_ids,
        computation_time_ms: 0,
        cancelled: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RoomCells;
    use approx::assert_relative_eq;

    fn unit_frame() -> GridFrame {
        GridFrame {
            origin: (0.0, 0.0),
            cell_size: 1.0,
            rotation: 0.0,
            pivot: (0.0, 0.0),
        }
    }

    #[test]
    fn test_merge_cells_area() {
        let cells = [(0, 0), (1, 0), (2, 0), (2, 1)];
        let region = merge_cells(&unit_frame(), &cells);
        assert!(!region.is_empty());
        assert_relative_eq!(region.area(), 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_merge_cells_scaled() {
        let frame = GridFrame {
            cell_size: 2.0,
            ..unit_frame()
        };
        let region = merge_cells(&frame, &[(0, 0), (0, 1)]);
        assert_relative_eq!(region.area(), 8.0, epsilon = 1e-6);
        assert!(merge_cells(&frame, &[]).is_empty());
    }

    #[test]
    fn test_missing_adjacency_counts() {
        let program = HouseProgram::new()
            .with_room(10.0)
            .with_room(10.0)
            .with_room(10.0)
            .with_adjacency(1, 2)
            .with_adjacency(2, 3)
            .with_adjacency(1, 3);
        let placed = [false, true, true, false];
        assert_eq!(missing_adjacency(&program, &placed), vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_build_result() {
        let program = HouseProgram::new()
            .with_room(4.0)
            .with_named_room(2.0, "Hall", true)
            .with_room(4.0)
            .with_adjacency(1, 2)
            .with_adjacency(2, 3);
        let mut solution = GridSolution::new(Grid::new(5, 5), 3);
        for (x, y) in RoomCells::new(0, 0, 2, 2).cells() {
            solution.grid.set(x, y, CellState::Room(2));
        }
        solution.record(2, RoomCells::new(0, 0, 2, 2));
        solution.grid.set(2, 0, CellState::Room(1));
        solution.grid.set(2, 1, CellState::Corridor);
        solution.record(1, RoomCells::new(2, 0, 1, 2));

        let result = build_result(&solution, &unit_frame(), &program);
        assert_eq!(result.room_ids, vec![1, 2]);
        assert_eq!(result.room_names, vec!["Room 1", "&&HALL&&Hall"]);
        assert_eq!(result.adjacency_pairs_placed, vec![(0, 1)]);
        assert_eq!(result.adjacency_output_string(), "0-1\n");
        assert_eq!(result.missing_adjacency_counts, vec![0, 1]);
        assert_eq!(result.placed_count, 2);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.room_geometries[1].cell_count, 4);
        assert_relative_eq!(result.corridor_geometry.area(), 1.0, epsilon = 1e-6);
        assert_eq!(result.occupancy.get(2, 1), Some(-1));
        assert_eq!(result.room_geometries[0].rectangle.len(), 4);
    }
}
