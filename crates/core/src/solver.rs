//! Solver trait and progress reporting.

use crate::boundary::Boundary;
use crate::program::HouseProgram;
use crate::Result;

/// Progress callback for long-running solves.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Snapshot of a running solve, passed to the progress callback.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Outer iteration (grid) or generation (spring) just finished.
    pub iteration: u32,
    /// Iterations the solve is configured for; 0 when unbounded.
    pub total_iterations: u32,
    /// Fitness of the best layout so far.
    pub best_fitness: f64,
    /// Rooms placed in the best solution so far.
    pub rooms_placed: usize,
    /// Total number of rooms.
    pub total_rooms: usize,
    /// Milliseconds since the solve started.
    pub elapsed_ms: u64,
    /// Current phase description.
    pub phase: String,
    /// False in the final report.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a report for a running solve.
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Sets the iteration counters.
    pub fn with_iteration(mut self, current: u32, total: u32) -> Self {
        self.iteration = current;
        self.total_iterations = total;
        self
    }

    /// Sets the best layout's fitness.
    pub fn with_fitness(mut self, fitness: f64) -> Self {
        self.best_fitness = fitness;
        self
    }

    /// Sets the room counters.
    pub fn with_rooms(mut self, placed: usize, total: usize) -> Self {
        self.rooms_placed = placed;
        self.total_rooms = total;
        self
    }

    /// Sets the elapsed milliseconds.
    pub fn with_elapsed(mut self, ms: u64) -> Self {
        self.elapsed_ms = ms;
        self
    }

    /// Sets the phase label (`search`, `evolve`, `done`).
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Marks the final report.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }

    /// Calculates the progress fraction (0.0 to 1.0).
    pub fn progress_percent(&self) -> f64 {
        if self.total_iterations > 0 {
            self.iteration as f64 / self.total_iterations as f64
        } else {
            0.0
        }
    }
}

/// Common interface of the layout engines.
pub trait Solver {
    /// Boundary the engine lays rooms out in.
    type Boundary: Boundary;
    /// The layout produced.
    type Output;

    /// Lays out the program inside the boundary.
    fn solve(&self, program: &HouseProgram, boundary: &Self::Boundary) -> Result<Self::Output>;

    /// Like [`Solver::solve`], reporting progress after every iteration.
    fn solve_with_progress(
        &self,
        program: &HouseProgram,
        boundary: &Self::Boundary,
        callback: ProgressCallback,
    ) -> Result<Self::Output>;

    /// Cancels an ongoing solve; the best layout so far is returned.
    fn cancel(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_builder() {
        let info = ProgressInfo::new()
            .with_iteration(5, 20)
            .with_rooms(3, 4)
            .with_phase("search");
        assert!(info.running);
        assert_eq!(info.progress_percent(), 0.25);
        assert_eq!(info.rooms_placed, 3);
        assert!(!info.finished().running);
    }

    #[test]
    fn test_progress_unknown_total() {
        assert_eq!(ProgressInfo::new().progress_percent(), 0.0);
    }
}
