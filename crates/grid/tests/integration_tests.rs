//! Integration tests for u-floorplan-grid.

use approx::assert_relative_eq;
use u_floorplan_grid::{
    corridor_distance, post_process_only, remove_all_corridors, Boundary, Boundary2D, CellState,
    CorridorStyle, FloorPlanResult, Grid, GridSearch, GridSolution, GridSolver, HouseProgram,
    RoomCells, Solver, SolverConfig,
};

/// Room cells lie inside their own rectangle and rectangles are disjoint.
fn assert_no_overlap(solution: &GridSolution) {
    let rects: Vec<(usize, RoomCells)> = solution
        .room_cells
        .iter()
        .enumerate()
        .filter_map(|(i, rect)| rect.map(|r| (i + 1, r)))
        .collect();
    for (i, (_, a)) in rects.iter().enumerate() {
        for (_, b) in rects.iter().skip(i + 1) {
            assert!(!a.overlaps(b), "rectangles {:?} and {:?} overlap", a, b);
        }
    }
    for ((x, y), state) in solution.grid.cells() {
        if let CellState::Room(id) = state {
            let rect = solution.room_cells[id - 1].expect("room on grid has a rectangle");
            assert!(rect.contains(x, y), "cell ({x}, {y}) of room {id} outside {rect:?}");
        }
    }
}

fn total_room_cells(result: &FloorPlanResult) -> usize {
    result.room_geometries.iter().map(|g| g.cell_count).sum()
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_three_rooms_in_small_square() {
        let program = HouseProgram::new()
            .with_room(20.0)
            .with_room(30.0)
            .with_room(50.0)
            .with_adjacency(1, 2)
            .with_adjacency(2, 3)
            .with_entrance_point(0.5, 0.5);
        let boundary = Boundary2D::rectangle(10.0, 10.0);
        let config = SolverConfig::new().with_iterations(50).with_seed(42);

        let solver = GridSolver::new(config.clone());
        let plan = solver.solve_plan(&program, &boundary).unwrap();
        assert!(plan.solution.placed_count() >= 2);
        assert_no_overlap(&plan.solution);

        let result = post_process_only(&plan, &config);
        assert!(result.placed_count >= 2);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.room_names.len(), result.placed_count);
        assert_eq!(result.missing_adjacency_counts.len(), result.placed_count);
        assert_eq!(
            result.occupancy.count(-1) + result.occupancy.count(0) + total_room_cells(&result),
            100
        );
    }

    #[test]
    fn test_single_room_fills_boundary() {
        let program = HouseProgram::new().with_room(100.0);
        let boundary = Boundary2D::rectangle(10.0, 10.0);
        let config = SolverConfig::new().with_iterations(1).with_seed(1);

        let result = GridSolver::new(config).solve(&program, &boundary).unwrap();
        assert_eq!(result.placed_count, 1);
        assert_eq!(result.missing_adjacency_counts, vec![0]);
        assert!(result.all_placed());
        // The stamp overruns the grid and is clipped at the seed corner; its
        // short side keeps at least seven room cells.
        let cells = result.room_geometries[0].cell_count;
        assert!((56..=72).contains(&cells), "room covers {cells} cells");
        assert_eq!(result.room_geometries[0].rectangle.len(), 4);
        assert_eq!(
            result.occupancy.count(-1) + result.occupancy.count(0) + total_room_cells(&result),
            100
        );
    }

    #[test]
    fn test_full_area_room_placed_without_extra_corridor_space() {
        let program = HouseProgram::new().with_room(100.0).with_entrance_point(0.5, 0.5);
        let boundary = Boundary2D::rectangle(10.0, 10.0);
        let config = SolverConfig::new()
            .with_iterations(1)
            .with_max_room_ratio(1.0)
            .with_corridors_as_additional_space(false)
            .with_seed(1);

        let result = GridSolver::new(config).solve(&program, &boundary).unwrap();
        assert_eq!(result.placed_count, 1);
        assert_eq!(result.missing_adjacency_counts, vec![0]);
        // Everything but the seed's row and column of corridor.
        assert_eq!(result.room_geometries[0].cell_count, 72);
        assert_eq!(result.occupancy.count(-1), 19);
    }

    #[test]
    fn test_unreachable_neighbour_is_not_placed() {
        let program = HouseProgram::new()
            .with_room(16.0)
            .with_room(16.0)
            .with_adjacency(1, 2);
        let boundary = Boundary2D::rectangle(20.0, 20.0);
        let config = SolverConfig::new()
            .with_iterations(10)
            .with_max_adj_distance(1.0)
            .with_seed(8);

        let result = GridSolver::new(config).solve(&program, &boundary).unwrap();
        assert!(result.placed_count < result.total_count);
        assert_eq!(result.placed_count, 1);
        assert_eq!(result.missing_adjacency_counts, vec![1]);
        assert!(!result.all_placed());

        let mut program = program;
        result.apply_missing_adjacency(&mut program);
        // The placed room misses its partner, and the unplaced partner is
        // flagged too.
        assert!(program.rooms().iter().all(|r| r.has_missing_adjacency));
    }
}

mod invariant_tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_cells_never_change() {
        let program = HouseProgram::new()
            .with_room(12.0)
            .with_room(9.0)
            .with_room(9.0)
            .with_adjacency(1, 2)
            .with_adjacency(1, 3)
            .with_entrance_point(0.5, 0.5);
        let boundary = Boundary2D::l_shape(14.0, 14.0, 7.0, 7.0);
        let config = SolverConfig::new()
            .with_iterations(12)
            .with_remove_all_corridors(true)
            .with_seed(17);

        let mut search = GridSearch::new(&program, &boundary, &config).unwrap();
        let outside = search.initial_grid().cells_with(CellState::OutOfBounds);
        assert!(!outside.is_empty());

        while search.step() {
            for member in search.population().members() {
                for &(x, y) in &outside {
                    assert_eq!(member.grid.at(x, y), CellState::OutOfBounds);
                }
                assert_no_overlap(member);
            }
        }

        let plan = search.into_plan();
        let result = post_process_only(&plan, &config);
        for &(x, y) in &outside {
            assert_eq!(result.occupancy.get(x, y), Some(9999));
        }
    }

    #[test]
    fn test_remove_all_corridors_is_idempotent_without_corridors() {
        let mut grid = Grid::new(6, 6);
        let rect = RoomCells::new(0, 0, 3, 3);
        for (x, y) in rect.cells() {
            grid.set(x, y, CellState::Room(1));
        }
        let before = grid.clone();
        assert_eq!(remove_all_corridors(&mut grid, &[Some(rect)]), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_post_processing_twice_changes_nothing() {
        let program = HouseProgram::new()
            .with_room(16.0)
            .with_room(12.0)
            .with_adjacency(1, 2)
            .with_entrance_point(0.5, 0.5);
        let boundary = Boundary2D::rectangle(14.0, 12.0);
        let config = SolverConfig::new()
            .with_iterations(6)
            .with_remove_dead_ends(true)
            .with_remove_all_corridors(true)
            .with_seed(23);

        let mut plan = GridSolver::new(config.clone())
            .solve_plan(&program, &boundary)
            .unwrap();
        let once = post_process_only(&plan, &config);
        plan.solution.grid = Grid::from_occupancy(&once.occupancy);
        let twice = post_process_only(&plan, &config);
        assert_eq!(once.occupancy, twice.occupancy);
    }

    #[test]
    fn test_corridor_distance_is_symmetric() {
        let mut grid = Grid::new(9, 7);
        for x in 1..8 {
            grid.set(x, 3, CellState::Corridor);
        }
        for y in 3..7 {
            grid.set(4, y, CellState::Corridor);
        }
        grid.set(0, 3, CellState::Room(1));
        grid.set(8, 2, CellState::Room(2));
        grid.set(3, 6, CellState::Room(3));

        let cells = [(0, 3), (8, 2), (3, 6), (5, 5)];
        for &a in &cells {
            for &b in &cells {
                let ab = corridor_distance(&grid, a, b);
                let ba = corridor_distance(&grid, b, a);
                match (ab, ba) {
                    (Some(ab), Some(ba)) => assert_relative_eq!(ab, ba, epsilon = 1e-9),
                    (None, None) => {}
                    other => panic!("asymmetric distances {other:?} between {a:?} and {b:?}"),
                }
            }
        }
        assert_relative_eq!(corridor_distance(&grid, (0, 3), (8, 2)).unwrap(), 7.0 + 2f64.sqrt());
    }
}

mod feature_tests {
    use super::*;

    #[test]
    fn test_rotated_boundary_is_squared_up() {
        let base = Boundary2D::rectangle(12.0, 8.0);
        let tilted = base.rotated(30.0_f64.to_radians(), base.aabb().center());
        let program = HouseProgram::new().with_room(9.0).with_room(9.0);
        let config = SolverConfig::new()
            .with_iterations(5)
            .with_try_rotate_boundary(true)
            .with_seed(5);

        let result = GridSolver::new(config).solve(&program, &tilted).unwrap();
        assert_relative_eq!(result.rotation_rad.to_degrees(), 60.0, epsilon = 1e-6);
        assert!(result.placed_count >= 1);
        for room in &result.room_geometries {
            assert_relative_eq!(room.region.area(), room.cell_count as f64, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_hall_names_are_marked() {
        let program = HouseProgram::new()
            .with_named_room(9.0, "Corridor hall", true)
            .with_entrance_point(0.5, 0.5);
        let boundary = Boundary2D::rectangle(10.0, 10.0);
        let config = SolverConfig::new()
            .with_iterations(2)
            .with_corridor_style(CorridorStyle::OneSide)
            .with_seed(3);

        let result = GridSolver::new(config).solve(&program, &boundary).unwrap();
        assert_eq!(result.placed_count, 1);
        assert_eq!(result.room_names[0], "&&HALL&&Corridor hall");
        // Halls always get a full corridor ring.
        assert!(result.occupancy.count(-1) >= 12);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let program = HouseProgram::new()
            .with_room(12.0)
            .with_room(12.0)
            .with_room(8.0)
            .with_adjacency(1, 2)
            .with_adjacency(2, 3);
        let boundary = Boundary2D::rectangle(12.0, 12.0);
        let config = SolverConfig::new().with_iterations(8).with_seed(99);

        let a = GridSolver::new(config.clone()).solve(&program, &boundary).unwrap();
        let b = GridSolver::new(config).solve(&program, &boundary).unwrap();
        assert_eq!(a.occupancy, b.occupancy);
        assert_eq!(a.room_ids, b.room_ids);
    }

    #[test]
    fn test_adjacency_output_lists_placed_pairs() {
        let program = HouseProgram::new()
            .with_room(9.0)
            .with_room(9.0)
            .with_adjacency(1, 2)
            .with_entrance_point(0.5, 0.5);
        let boundary = Boundary2D::rectangle(16.0, 16.0);
        let config = SolverConfig::new().with_iterations(10).with_seed(12);

        let result = GridSolver::new(config).solve(&program, &boundary).unwrap();
        if result.all_placed() {
            assert_eq!(result.adjacency_pairs_placed.len(), 1);
            assert_eq!(result.adjacency_output_string(), "0-1\n");
        } else {
            assert!(result.adjacency_pairs_placed.is_empty());
        }
    }

    #[test]
    fn test_degenerate_boundary_places_nothing() {
        let program = HouseProgram::new().with_room(4.0);
        let boundary = Boundary2D::rectangle(0.5, 0.5);
        let result = GridSolver::default_config().solve(&program, &boundary).unwrap();
        assert_eq!(result.placed_count, 0);
        assert_eq!(result.total_count, 1);
        assert!(result.room_geometries.is_empty());
    }
}
