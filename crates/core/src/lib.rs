//! # U-Floorplan Core
//!
//! Core types and traits for the U-Floorplan layout engine.
//!
//! This crate provides the types shared between the grid placement engine
//! and the continuous spring-relaxation engine.
//!
//! ## Core Components
//!
//! - **Boundary**: [`Boundary`] trait and the polygon [`Boundary2D`]
//! - **Program**: [`HouseProgram`], [`Room`], [`AdjacencyPair`]
//! - **Configuration**: [`SolverConfig`], [`CorridorStyle`]
//! - **Results**: [`FloorPlanResult`], [`OccupancyGrid`], [`Region`]
//! - **Solver trait**: [`Solver`] with [`ProgressInfo`] reporting
//!
//! ## Grid Cell Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | `0` | Free |
//! | `-1` | Corridor |
//! | `9999` | Outside the boundary |
//! | `n > 0` | Occupied by room `n` |
//!
//! ## Building a Program
//!
//! ```rust
//! use u_floorplan_core::{HouseProgram, SolverConfig, CorridorStyle};
//!
//! let program = HouseProgram::new()
//!     .with_room(20.0)
//!     .with_room(30.0)
//!     .with_named_room(12.0, "Hall", true)
//!     .with_adjacency(1, 2)
//!     .with_adjacency(2, 3)
//!     .with_entrance_point(0.5, 0.5);
//! assert!(program.validate().is_ok());
//!
//! let config = SolverConfig::new()
//!     .with_corridor_style(CorridorStyle::TwoSides)
//!     .with_iterations(100)
//!     .with_seed(42);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod boundary;
pub mod config;
pub mod error;
pub mod geom;
pub mod program;
pub mod random;
pub mod result;
pub mod solver;

// Re-exports
pub use boundary::{best_fit_rotation, Boundary, Boundary2D};
pub use config::{CorridorStyle, SolverConfig};
pub use error::{Error, Result};
pub use geom::{rotate_point, Aabb};
pub use program::{AdjacencyPair, HouseProgram, Room, DEFAULT_ROOM_AREA, HALL_PREFIX};
pub use random::{create_rng, tie_break_noise};
pub use result::{
    FloorPlanResult, OccupancyGrid, Region, RoomGeometry, CELL_CORRIDOR, CELL_FREE,
    CELL_OUT_OF_BOUNDS,
};
pub use solver::{ProgressCallback, ProgressInfo, Solver};
