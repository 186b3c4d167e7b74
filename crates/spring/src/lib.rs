//! # U-Floorplan Spring
//!
//! Continuous-space layout for the U-Floorplan layout engine.
//!
//! Rooms are axis-aligned rectangles of fixed area. A population of
//! candidate layouts ("genes") is evolved by crossover, mutation and fresh
//! random layouts and ranked by how closely adjacent rooms touch and, when
//! weighted in, how much room area lies inside the boundary. After every
//! generation overlapping rooms are pushed apart and rooms outside the
//! boundary are pulled back in.
//!
//! ## Quick Start
//!
//! ```rust
//! use u_floorplan_spring::{Boundary2D, HouseProgram, Solver, SpringConfig, SpringSolver};
//!
//! let program = HouseProgram::new()
//!     .with_room(16.0)
//!     .with_room(12.0)
//!     .with_adjacency(1, 2);
//!
//! let config = SpringConfig::new().with_generations(10).with_seed(7);
//! let result = SpringSolver::new(config)
//!     .solve(&program, &Boundary2D::rectangle(12.0, 10.0))
//!     .unwrap();
//!
//! for (name, room) in result.room_names.iter().zip(&result.rooms) {
//!     println!("{name}: {:.2} x {:.2}", room.width, room.height());
//! }
//! ```
//!
//! ## Stepping the Engine
//!
//! ```rust
//! use u_floorplan_spring::{Boundary2D, HouseProgram, SpringConfig, SpringLayoutEngine};
//!
//! let program = HouseProgram::new().with_room(9.0).with_room(9.0).with_adjacency(1, 2);
//! let config = SpringConfig::new().with_seed(1);
//! let mut engine = SpringLayoutEngine::new(&program, &Boundary2D::rectangle(10.0, 10.0), &config).unwrap();
//!
//! engine.iterate();
//! engine.resolve_collisions();
//! assert_eq!(engine.generation(), 1);
//! ```

pub mod collision;
pub mod config;
pub mod contraction;
pub mod engine;
pub mod gene;
pub mod overlap;
pub mod room;
pub mod solver;

pub use collision::CollisionResolver;
pub use config::SpringConfig;
pub use contraction::{adjacency_lines, contract_adjacent, AdjacencyLine};
pub use engine::{SpringLayoutEngine, SpringLayoutResult};
pub use gene::{Gene, LayoutContext};
pub use overlap::{covered_area, intersect, Overlap};
pub use room::Room2D;
pub use solver::SpringSolver;

pub use u_floorplan_core::{
    Aabb, Boundary, Boundary2D, Error, HouseProgram, ProgressInfo, Result, Solver,
};
