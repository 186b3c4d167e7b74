//! The grid floor-plan solver.

use crate::output::build_result;
use crate::postprocess::PostProcessor;
use crate::search::{GridSearch, SolvedPlan};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use u_floorplan_core::{
    Boundary, Boundary2D, FloorPlanResult, HouseProgram, ProgressCallback, ProgressInfo, Result,
    Solver, SolverConfig,
};

/// Evolutionary grid solver.
pub struct GridSolver {
    config: SolverConfig,
    cancelled: Arc<AtomicBool>,
}

impl GridSolver {
    /// Creates a new solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a solver with default configuration.
    pub fn default_config() -> Self {
        Self::new(SolverConfig::default())
    }

    /// The solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs the search and returns the best plan without post-processing.
    pub fn solve_plan<B: Boundary>(&self, program: &HouseProgram, boundary: &B) -> Result<SolvedPlan> {
        self.run_search(program, boundary, None)
    }

    fn run_search<B: Boundary>(
        &self,
        program: &HouseProgram,
        boundary: &B,
        callback: Option<&ProgressCallback>,
    ) -> Result<SolvedPlan> {
        self.cancelled.store(false, Ordering::Relaxed);
        let start = Instant::now();
        let mut search =
            GridSearch::new(program, boundary, &self.config)?.with_cancel_flag(self.cancelled.clone());

        while search.step() {
            if let Some(callback) = callback {
                let placed = search.best().map_or(0, |s| s.placed_count());
                callback(
                    ProgressInfo::new()
                        .with_iteration(search.iteration(), self.config.iterations)
                        .with_fitness(placed as f64)
                        .with_rooms(placed, program.room_count())
                        .with_elapsed(start.elapsed().as_millis() as u64)
                        .with_phase("search"),
                );
            }
        }
        Ok(search.into_plan())
    }

    /// Solves for any boundary implementation.
    pub fn solve_boundary<B: Boundary>(
        &self,
        program: &HouseProgram,
        boundary: &B,
    ) -> Result<FloorPlanResult> {
        self.solve_inner(program, boundary, None)
    }

    fn solve_inner<B: Boundary>(
        &self,
        program: &HouseProgram,
        boundary: &B,
        callback: Option<&ProgressCallback>,
    ) -> Result<FloorPlanResult> {
        let start = Instant::now();
        let plan = self.run_search(program, boundary, callback)?;
        let mut result = post_process_only(&plan, &self.config);
        result.computation_time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "placed {}/{} rooms in {} iterations ({} ms)",
            result.placed_count,
            result.total_count,
            plan.iterations,
            result.computation_time_ms
        );
        if let Some(callback) = callback {
            callback(
                ProgressInfo::new()
                    .with_iteration(plan.iterations, self.config.iterations)
                    .with_fitness(result.placed_count as f64)
                    .with_rooms(result.placed_count, result.total_count)
                    .with_elapsed(result.computation_time_ms)
                    .with_phase("done")
                    .finished(),
            );
        }
        Ok(result)
    }
}

/// Post-processes a finished plan with `config` and emits its geometry,
/// without searching again.
pub fn post_process_only(plan: &SolvedPlan, config: &SolverConfig) -> FloorPlanResult {
    let mut solution = plan.solution.clone();
    PostProcessor::from_config(config).apply(&mut solution);
    let mut result = build_result(&solution, &plan.frame, &plan.program);
    result.cancelled = plan.cancelled;
    result
}

impl Solver for GridSolver {
    type Boundary = Boundary2D;
    type Output = FloorPlanResult;

    fn solve(&self, program: &HouseProgram, boundary: &Boundary2D) -> Result<FloorPlanResult> {
        self.solve_inner(program, boundary, None)
    }

    fn solve_with_progress(
        &self,
        program: &HouseProgram,
        boundary: &Boundary2D,
        callback: ProgressCallback,
    ) -> Result<FloorPlanResult> {
        self.solve_inner(program, boundary, Some(&callback))
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
