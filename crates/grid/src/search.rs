//! The population-based placement search.
//!
//! Each outer iteration fills every population slot with a candidate. A
//! candidate either restarts from the initial grid or resumes a stored
//! solution with its last one to five rooms undone, then places rooms one at
//! a time until all are placed or a placement fails.

use crate::frame::{build_initial_grid, GridFrame};
use crate::grid::{CellState, Grid};
use crate::ordering::RoomOrderPlanner;
use crate::placement::{apply_placement, find_best_placement};
use crate::population::{GridSolution, Population};
use crate::reachability::ReachabilityFilter;
use crate::stamp::RoomShapeSynthesizer;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use u_floorplan_core::{create_rng, Boundary, HouseProgram, Result, SolverConfig};

/// Largest number of rooms undone when resuming a stored solution.
const MAX_ROOMS_UNDONE: usize = 5;

/// The best solution of a search together with its world mapping.
#[derive(Debug, Clone)]
pub struct SolvedPlan {
    /// Best solution found (before post-processing).
    pub solution: GridSolution,
    /// World mapping of the grid.
    pub frame: GridFrame,
    /// The program that was solved.
    pub program: HouseProgram,
    /// Outer iterations completed.
    pub iterations: u32,
    /// Whether the search stopped early.
    pub cancelled: bool,
}

/// A resumable search over placement sequences.
pub struct GridSearch<'a> {
    program: &'a HouseProgram,
    config: SolverConfig,
    initial: Grid,
    frame: GridFrame,
    seed_cell: Option<(usize, usize)>,
    area_cells: Vec<f64>,
    synthesizer: RoomShapeSynthesizer,
    filter: ReachabilityFilter,
    population: Population,
    rng: StdRng,
    iteration: u32,
    cancelled: Option<Arc<AtomicBool>>,
}

impl<'a> GridSearch<'a> {
    /// Validates the inputs and builds the initial grid.
    pub fn new<B: Boundary>(
        program: &'a HouseProgram,
        boundary: &B,
        config: &SolverConfig,
    ) -> Result<Self> {
        program.validate()?;
        config.validate()?;
        boundary.validate()?;

        let initial = build_initial_grid(boundary, config, program.entrance_point());
        if initial.grid.is_empty() {
            log::warn!("boundary produced an empty grid; no rooms can be placed");
        }
        let cell_area = config.cell_size * config.cell_size;

        Ok(Self {
            program,
            config: config.clone(),
            frame: initial.frame,
            seed_cell: initial.seed,
            initial: initial.grid,
            area_cells: program.rooms().iter().map(|r| r.area / cell_area).collect(),
            synthesizer: RoomShapeSynthesizer::from_config(config),
            filter: ReachabilityFilter::new(config.max_adj_distance),
            population: Population::new(config.population_size),
            rng: create_rng(config.seed),
            iteration: 0,
            cancelled: None,
        })
    }

    /// Checks `flag` between candidates and stops when it is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    /// The grid every new candidate starts from.
    pub fn initial_grid(&self) -> &Grid {
        &self.initial
    }

    /// World mapping of the grid.
    pub fn frame(&self) -> &GridFrame {
        &self.frame
    }

    /// The seeded corridor cell.
    pub fn seed_cell(&self) -> Option<(usize, usize)> {
        self.seed_cell
    }

    /// Outer iterations completed so far.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// The stored solutions.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// The best stored solution.
    pub fn best(&self) -> Option<&GridSolution> {
        self.population.best()
    }

    /// Returns true if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Returns true once all iterations ran or the search was cancelled.
    pub fn is_finished(&self) -> bool {
        self.iteration >= self.config.iterations || self.is_cancelled()
    }

    /// Runs one outer iteration. Returns false if the search was already
    /// finished.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let t = self.iteration;
        let slots = self.population.capacity();

        for k in 0..slots {
            if self.is_cancelled() {
                break;
            }
            let resume = t != 0 && t % self.config.new_solutions_frequency == 0;
            let mut candidate = match self.population.get(k) {
                Some(stored) if resume => {
                    let mut altered = stored.clone();
                    let undo = self.rng.gen_range(1..=MAX_ROOMS_UNDONE);
                    altered.remove_last_rooms(undo);
                    altered
                }
                _ => GridSolution::new(self.initial.clone(), self.program.room_count()),
            };
            self.place_rooms(&mut candidate);

            let compare = t % slots as u32 == 0;
            self.population.offer(k, candidate, compare);
        }
        self.population.sort_and_truncate();
        self.iteration += 1;

        log::debug!(
            "iteration {}/{}: best {} of {} rooms, population {}",
            self.iteration,
            self.config.iterations,
            self.best().map_or(0, |s| s.placed_count()),
            self.program.room_count(),
            self.population.len()
        );
        true
    }

    /// Runs the remaining iterations.
    pub fn run(&mut self) {
        while self.step() {}
    }

    /// Places rooms until all are placed or one fails.
    fn place_rooms(&mut self, solution: &mut GridSolution) {
        let room_count = self.program.room_count();
        let planner = RoomOrderPlanner::new(self.program);

        for step in 0..room_count {
            // Once the first room has its own corridor skirt, the entrance
            // seed no longer needs to block the grid.
            if step == 1 && solution.placed_count() == 1 {
                if let Some((x, y)) = self.seed_cell {
                    if solution.grid.at(x, y).is_corridor() {
                        solution.grid.set(x, y, CellState::Free);
                    }
                }
            }

            let placed = solution.grid.placed_mask(room_count);
            let Some(id) = planner.next_room(&placed, &mut self.rng) else {
                break;
            };
            let Some(room) = self.program.room(id) else {
                break;
            };

            let stamp = self.synthesizer.synthesize(
                self.area_cells[id - 1],
                id,
                room.is_hall,
                &mut self.rng,
            );
            let mut required: Vec<usize> = self
                .program
                .neighbors(id)
                .filter(|&n| placed.get(n).copied().unwrap_or(false))
                .collect();
            required.sort_unstable();
            required.dedup();

            match find_best_placement(&solution.grid, &stamp, &required, &self.filter) {
                Some(candidate) => {
                    apply_placement(&mut solution.grid, &candidate, &stamp);
                    solution.record(id, candidate.rect);
                }
                None => break,
            }
        }
    }

    /// Finishes the search and returns the best solution.
    pub fn into_plan(self) -> SolvedPlan {
        let cancelled = self.is_cancelled();
        let solution = match self.population.best() {
            Some(best) => best.clone(),
            None => GridSolution::new(self.initial.clone(), self.program.room_count()),
        };
        SolvedPlan {
            solution,
            frame: self.frame,
            program: self.program.clone(),
            iterations: self.iteration,
            cancelled,
        }
    }
}
