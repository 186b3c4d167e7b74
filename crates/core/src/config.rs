//! Solver configuration.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which sides of a room stamp receive a corridor strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CorridorStyle {
    /// Corridor along one randomly chosen side.
    OneSide,
    /// Corridor along two adjoining sides.
    #[default]
    TwoSides,
    /// Corridor around the whole room. Halls always use this style.
    AllSides,
}

/// Configuration for the grid floor-plan solver.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Corridor skirt policy for room stamps.
    pub corridor_style: CorridorStyle,

    /// When true, corridor strips are added on top of the room area;
    /// otherwise the room shrinks by one cell per corridor side.
    pub corridors_as_additional_space: bool,

    /// Absorb dead-end corridor spurs into their rooms after solving.
    pub remove_dead_ends: bool,

    /// Absorb every corridor cell lying inside a room rectangle.
    pub remove_all_corridors: bool,

    /// Upper bound of the random aspect ratio for room stamps (>= 1).
    pub max_room_ratio: f64,

    /// Number of outer search iterations.
    pub iterations: u32,

    /// Maximum corridor distance (in cells) between adjacent rooms.
    pub max_adj_distance: f64,

    /// Size of one grid cell in world units.
    pub cell_size: f64,

    /// Rotate the boundary to its best rectilinear fit before gridding.
    pub try_rotate_boundary: bool,

    /// Angular step of the rotation sweep, in degrees.
    pub rotation_step_deg: f64,

    /// Number of population slots filled per outer iteration.
    pub population_size: usize,

    /// Every n-th iteration resumes stored solutions instead of restarting.
    pub new_solutions_frequency: u32,

    /// Random seed for reproducible runs (None = entropy).
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            corridor_style: CorridorStyle::default(),
            corridors_as_additional_space: true,
            remove_dead_ends: false,
            remove_all_corridors: false,
            max_room_ratio: 2.0,
            iterations: 50,
            max_adj_distance: 2.0,
            cell_size: 1.0,
            try_rotate_boundary: false,
            rotation_step_deg: 0.5,
            population_size: 5,
            new_solutions_frequency: 3,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the corridor style.
    pub fn with_corridor_style(mut self, style: CorridorStyle) -> Self {
        self.corridor_style = style;
        self
    }

    /// Sets whether corridors are added on top of the room area.
    pub fn with_corridors_as_additional_space(mut self, enabled: bool) -> Self {
        self.corridors_as_additional_space = enabled;
        self
    }

    /// Enables dead-end pruning.
    pub fn with_remove_dead_ends(mut self, enabled: bool) -> Self {
        self.remove_dead_ends = enabled;
        self
    }

    /// Enables full corridor absorption.
    pub fn with_remove_all_corridors(mut self, enabled: bool) -> Self {
        self.remove_all_corridors = enabled;
        self
    }

    /// Sets the maximum room aspect ratio.
    pub fn with_max_room_ratio(mut self, ratio: f64) -> Self {
        self.max_room_ratio = ratio.max(1.0);
        self
    }

    /// Sets the number of outer iterations.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the maximum adjacency distance in cells.
    pub fn with_max_adj_distance(mut self, distance: f64) -> Self {
        self.max_adj_distance = distance;
        self
    }

    /// Sets the cell size.
    pub fn with_cell_size(mut self, size: f64) -> Self {
        self.cell_size = size;
        self
    }

    /// Enables the boundary rotation sweep.
    pub fn with_try_rotate_boundary(mut self, enabled: bool) -> Self {
        self.try_rotate_boundary = enabled;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(1);
        self
    }

    /// Sets how often stored solutions are resumed.
    pub fn with_new_solutions_frequency(mut self, frequency: u32) -> Self {
        self.new_solutions_frequency = frequency.max(1);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that numeric parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        if !self.max_room_ratio.is_finite() || self.max_room_ratio < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "max room ratio must be at least 1, got {}",
                self.max_room_ratio
            )));
        }
        if self.max_adj_distance.is_nan() || self.max_adj_distance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max adjacency distance must be non-negative, got {}",
                self.max_adj_distance
            )));
        }
        if self.population_size == 0 || self.new_solutions_frequency == 0 {
            return Err(Error::InvalidConfig(
                "population size and new-solution frequency must be positive".into(),
            ));
        }
        if !self.rotation_step_deg.is_finite() || self.rotation_step_deg <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "rotation step must be positive, got {}",
                self.rotation_step_deg
            )));
        }
        Ok(())
    }
}
