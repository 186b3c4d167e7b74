//! The spring layout solver.

use crate::config::SpringConfig;
use crate::engine::{SpringLayoutEngine, SpringLayoutResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use u_floorplan_core::{Boundary2D, HouseProgram, ProgressCallback, ProgressInfo, Result, Solver};

/// Runs the spring engine for a fixed number of generations.
pub struct SpringSolver {
    config: SpringConfig,
    cancelled: Arc<AtomicBool>,
}

impl SpringSolver {
    /// Creates a new solver with the given configuration.
    pub fn new(config: SpringConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a solver with default configuration.
    pub fn default_config() -> Self {
        Self::new(SpringConfig::default())
    }

    /// The solver configuration.
    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// Runs an engine prepared by the caller, for example one created with
    /// [`SpringLayoutEngine::from_rooms`].
    pub fn run(
        &self,
        engine: &mut SpringLayoutEngine,
        callback: Option<&ProgressCallback>,
    ) -> SpringLayoutResult {
        self.cancelled.store(false, Ordering::Relaxed);
        let start = Instant::now();
        let total_rooms = engine.best().map_or(0, |g| g.len());
        let mut cancelled = false;

        for generation in 0..self.config.generations {
            if self.cancelled.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }
            let best = engine.step();
            if let Some(callback) = callback {
                callback(
                    ProgressInfo::new()
                        .with_iteration(generation + 1, self.config.generations)
                        .with_fitness(best)
                        .with_rooms(total_rooms, total_rooms)
                        .with_elapsed(start.elapsed().as_millis() as u64)
                        .with_phase("evolve"),
                );
            }
        }

        let mut result = engine.result();
        result.cancelled = cancelled;
        result.computation_time_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "spring layout of {} rooms: fitness {:.6}, gap {:.3} after {} generations ({} ms)",
            result.rooms.len(),
            result.fitness,
            result.total_gap,
            result.generations,
            result.computation_time_ms
        );

        if let Some(callback) = callback {
            callback(
                ProgressInfo::new()
                    .with_iteration(result.generations, self.config.generations)
                    .with_fitness(result.fitness)
                    .with_rooms(total_rooms, total_rooms)
                    .with_elapsed(result.computation_time_ms)
                    .with_phase("done")
                    .finished(),
            );
        }
        result
    }

    fn solve_inner(
        &self,
        program: &HouseProgram,
        boundary: &Boundary2D,
        callback: Option<&ProgressCallback>,
    ) -> Result<SpringLayoutResult> {
        let mut engine = SpringLayoutEngine::new(program, boundary, &self.config)?;
        Ok(self.run(&mut engine, callback))
    }
}

impl Solver for SpringSolver {
    type Boundary = Boundary2D;
    type Output = SpringLayoutResult;

    fn solve(&self, program: &HouseProgram, boundary: &Boundary2D) -> Result<SpringLayoutResult> {
        self.solve_inner(program, boundary, None)
    }

    fn solve_with_progress(
        &self,
        program: &HouseProgram,
        boundary: &Boundary2D,
        callback: ProgressCallback,
    ) -> Result<SpringLayoutResult> {
        self.solve_inner(program, boundary, Some(&callback))
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn test_solve_runs_all_generations() {
        let program = HouseProgram::new()
            .with_room(16.0)
            .with_room(16.0)
            .with_adjacency(1, 2);
        let solver = SpringSolver::new(SpringConfig::new().with_generations(5).with_seed(3));
        let result = solver.solve(&program, &Boundary2D::rectangle(12.0, 12.0)).unwrap();
        assert_eq!(result.generations, 5);
        assert_eq!(result.rooms.len(), 2);
        assert_eq!(result.room_ids, vec![1, 2]);
        assert_eq!(result.adjacency_lines.len(), 1);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_progress_reported_each_generation() {
        let program = HouseProgram::new().with_room(9.0).with_room(9.0);
        let solver = SpringSolver::new(SpringConfig::new().with_generations(3).with_seed(4));
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        solver
            .solve_with_progress(
                &program,
                &Boundary2D::rectangle(10.0, 10.0),
                Box::new(move |_| {
                    counter.fetch_add(1, Ordering::Relaxed);
                }),
            )
            .unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SpringConfig {
            fitness_balance: 2.0,
            ..SpringConfig::default()
        };
        let program = HouseProgram::new().with_room(9.0);
        assert!(SpringSolver::new(config)
            .solve(&program, &Boundary2D::rectangle(10.0, 10.0))
            .is_err());
    }
}
