//! # U-Floorplan Grid
//!
//! Evolutionary grid placement for the U-Floorplan layout engine.
//!
//! The boundary is rasterized into square cells. Rooms are stamped one at a
//! time as rectangles with a corridor skirt, each snapped against the
//! occupied cells around it, until the program is placed or no feasible
//! position remains. A small population of placement sequences is evolved
//! by restarting or partially undoing stored sequences.
//!
//! ## Features
//!
//! - Polygon boundaries with holes (cells are sampled at their centers)
//! - Adjacency enforced through corridor-walking distance
//! - Corridor styles: one side, two sides or all sides of each room
//! - Dead-end trimming and full corridor absorption as post-processing
//! - Optional boundary rotation sweep for tilted plots
//! - Deterministic runs with a fixed seed
//!
//! ## Quick Start
//!
//! ```rust
//! use u_floorplan_grid::{Boundary2D, GridSolver, HouseProgram, Solver, SolverConfig};
//!
//! let program = HouseProgram::new()
//!     .with_room(16.0)
//!     .with_room(12.0)
//!     .with_adjacency(1, 2)
//!     .with_entrance_point(0.5, 0.5);
//!
//! let boundary = Boundary2D::rectangle(12.0, 10.0);
//! let config = SolverConfig::new().with_iterations(20).with_seed(7);
//!
//! let solver = GridSolver::new(config);
//! let result = solver.solve(&program, &boundary).unwrap();
//!
//! println!("Placed {}/{} rooms", result.placed_count, result.total_count);
//! for (name, room) in result.room_names.iter().zip(&result.room_geometries) {
//!     println!("{name}: {} cells", room.cell_count);
//! }
//! ```
//!
//! ## Re-processing a Plan
//!
//! ```rust
//! use u_floorplan_grid::{post_process_only, Boundary2D, GridSolver, HouseProgram, SolverConfig};
//!
//! let program = HouseProgram::new().with_room(20.0).with_entrance_point(0.5, 0.5);
//! let boundary = Boundary2D::rectangle(10.0, 10.0);
//! let config = SolverConfig::new().with_iterations(5).with_seed(1);
//!
//! let plan = GridSolver::new(config.clone()).solve_plan(&program, &boundary).unwrap();
//! let trimmed = post_process_only(&plan, &config.with_remove_all_corridors(true));
//! assert_eq!(trimmed.placed_count, plan.solution.placed_count());
//! ```

pub mod frame;
pub mod grid;
pub mod ordering;
pub mod output;
pub mod placement;
pub mod population;
pub mod postprocess;
pub mod reachability;
pub mod search;
pub mod solver;
pub mod stamp;

// Re-exports
pub use frame::{build_initial_grid, GridFrame, InitialGrid};
pub use grid::{CellState, Grid, RoomCells};
pub use ordering::RoomOrderPlanner;
pub use output::{build_result, merge_cells, missing_adjacency};
pub use placement::{find_best_placement, Orientation, RoomPlacementCandidate};
pub use population::{GridSolution, OfferOutcome, Population};
pub use postprocess::{remove_all_corridors, remove_dead_ends, PostProcessor};
pub use reachability::{corridor_distance, distance_field, ReachabilityFilter};
pub use search::{GridSearch, SolvedPlan};
pub use solver::{post_process_only, GridSolver};
pub use stamp::{RoomShapeSynthesizer, RoomStamp};
pub use u_floorplan_core::{
    Boundary, Boundary2D, CorridorStyle, Error, FloorPlanResult, HouseProgram, ProgressInfo,
    Result, Solver, SolverConfig,
};
