//! The evolutionary spring layout engine.
//!
//! A population of genes is grown each generation by crossover, mutation
//! and fresh random layouts, then truncated back to the best
//! `population_size` genes. Collision resolution is a separate pass that
//! runs after each generation in [`SpringLayoutEngine::step`].

use crate::collision::CollisionResolver;
use crate::config::SpringConfig;
use crate::contraction::{adjacency_lines, contract_adjacent, AdjacencyLine};
use crate::gene::{Gene, LayoutContext};
use crate::room::Room2D;
use rand::rngs::StdRng;
use rand::Rng;
use std::cmp::Ordering;
use u_floorplan_core::{create_rng, Boundary, Boundary2D, Error, HouseProgram, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Layout emitted by the spring engine.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpringLayoutResult {
    /// One rectangle per room, in program order.
    pub rooms: Vec<Room2D>,
    /// Room ids matching `rooms`.
    pub room_ids: Vec<usize>,
    /// Display names matching `rooms`; halls carry the hall prefix.
    pub room_names: Vec<String>,
    /// Centre-to-centre segments of the adjacency pairs.
    pub adjacency_lines: Vec<AdjacencyLine>,
    /// Fitness of the emitted layout.
    pub fitness: f64,
    /// Summed gap between rooms that should be adjacent.
    pub total_gap: f64,
    /// Room area inside the boundary.
    pub covered_area: f64,
    /// Generations run.
    pub generations: u32,
    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
    /// Whether the run was cancelled.
    pub cancelled: bool,
}

/// Population-based continuous layout engine.
pub struct SpringLayoutEngine {
    config: SpringConfig,
    context: LayoutContext,
    template: Vec<Room2D>,
    genes: Vec<Gene>,
    resolver: CollisionResolver,
    rng: StdRng,
    generation: u32,
    room_ids: Vec<usize>,
    room_names: Vec<String>,
}

impl SpringLayoutEngine {
    /// Creates an engine with a random initial population.
    pub fn new(program: &HouseProgram, boundary: &Boundary2D, config: &SpringConfig) -> Result<Self> {
        let mut engine = Self::prepare(program, boundary, config)?;
        engine.seed_random();
        Ok(engine)
    }

    /// Creates an engine whose population starts from `rooms`, one per
    /// program room. With `shuffle_at_start` the rooms only supply their
    /// areas and the population is random.
    pub fn from_rooms(
        mut rooms: Vec<Room2D>,
        program: &HouseProgram,
        boundary: &Boundary2D,
        config: &SpringConfig,
    ) -> Result<Self> {
        if rooms.len() != program.room_count() {
            return Err(Error::InvalidProgram(format!(
                "{} rectangles given for {} rooms",
                rooms.len(),
                program.room_count()
            )));
        }
        let mut engine = Self::prepare(program, boundary, config)?;
        if config.adjust_area {
            scale_to_area(&mut rooms, boundary.measure());
        }
        engine.template = rooms.clone();

        if config.shuffle_at_start {
            engine.seed_random();
        } else {
            let mut gene = Gene::new(rooms);
            gene.evaluate(&engine.context, config.fitness_balance);
            engine.genes = vec![gene; config.population_size];
        }
        Ok(engine)
    }

    fn prepare(program: &HouseProgram, boundary: &Boundary2D, config: &SpringConfig) -> Result<Self> {
        config.validate()?;
        program.validate()?;
        boundary.validate()?;
        if boundary.is_degenerate() {
            return Err(Error::InvalidBoundary("boundary encloses no area".into()));
        }

        let bounds = boundary.aabb();
        let (cx, cy) = bounds.center();
        let mut template: Vec<Room2D> = program
            .rooms()
            .iter()
            .map(|r| Room2D::square(cx, cy, r.area))
            .collect();
        if config.adjust_area {
            scale_to_area(&mut template, boundary.measure());
        }

        let context = LayoutContext {
            bounds,
            region: boundary.contours(),
            adjacency: program
                .adjacency()
                .iter()
                .map(|pair| (pair.a - 1, pair.b - 1))
                .collect(),
        };

        Ok(Self {
            resolver: CollisionResolver::new(
                config.proportion_threshold,
                config.boundary_proportion_threshold,
            ),
            rng: create_rng(config.seed),
            config: config.clone(),
            context,
            template,
            genes: Vec::new(),
            generation: 0,
            room_ids: program.rooms().iter().map(|r| r.id).collect(),
            room_names: program.rooms().iter().map(|r| r.display_name()).collect(),
        })
    }

    fn seed_random(&mut self) {
        let genes: Vec<Gene> = (0..self.config.population_size)
            .map(|_| self.random_gene())
            .collect();
        self.genes = genes;
        self.sort_genes();
    }

    fn random_gene(&mut self) -> Gene {
        let mut gene = Gene::random(
            &self.template,
            &self.context.bounds,
            self.config.proportion_threshold,
            &mut self.rng,
        );
        gene.evaluate(&self.context, self.config.fitness_balance);
        gene
    }

    fn sort_genes(&mut self) {
        self.genes.sort_by(|a, b| {
            b.fitness()
                .partial_cmp(&a.fitness())
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Runs one generation: adds crossover children, mutants and fresh
    /// genes, then keeps the best `population_size` genes.
    pub fn iterate(&mut self) {
        let parents = self.genes.len();
        if parents == 0 {
            return;
        }
        let batch = self.config.population_size * self.config.offspring_factor;
        let balance = self.config.fitness_balance;

        for _ in 0..batch {
            let a = self.rng.gen_range(0..parents);
            let b = self.rng.gen_range(0..parents);
            let mut child =
                self.genes[a].crossover(&self.genes[b], self.config.crossover_probability, &mut self.rng);
            child.evaluate(&self.context, balance);
            self.genes.push(child);
        }

        for _ in 0..batch {
            let source = self.rng.gen_range(0..self.genes.len());
            let mut mutant = self.genes[source].clone();
            mutant.mutate(
                &self.context.bounds,
                self.config.proportion_threshold,
                self.config.mutation_probability,
                self.config.mutation_strength,
                &mut self.rng,
            );
            mutant.evaluate(&self.context, balance);
            self.genes.push(mutant);
        }

        for _ in 0..batch {
            let gene = self.random_gene();
            self.genes.push(gene);
        }

        self.sort_genes();
        self.genes.truncate(self.config.population_size);
        self.generation += 1;
    }

    /// Resolves collisions in every gene, or only in the best one when
    /// `collide_all_genes` is off, then re-ranks the population. Returns
    /// the number of adjustments made.
    pub fn resolve_collisions(&mut self) -> usize {
        let count = if self.config.collide_all_genes {
            self.genes.len()
        } else {
            self.genes.len().min(1)
        };

        let mut adjustments = 0;
        for gene in self.genes.iter_mut().take(count) {
            adjustments += self
                .resolver
                .resolve(&mut gene.rooms, &self.context.bounds, &self.context.region);
            gene.evaluate(&self.context, self.config.fitness_balance);
        }
        self.sort_genes();
        adjustments
    }

    /// One full generation: [`Self::iterate`] followed by
    /// [`Self::resolve_collisions`]. Returns the best fitness.
    pub fn step(&mut self) -> f64 {
        self.iterate();
        let adjustments = self.resolve_collisions();
        log::debug!(
            "generation {}: best fitness {:.6}, {} collision adjustments",
            self.generation,
            self.best_fitness(),
            adjustments
        );
        self.best_fitness()
    }

    /// Generations run so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The population, best first.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// The best gene.
    pub fn best(&self) -> Option<&Gene> {
        self.genes.first()
    }

    /// Fitness of the best gene.
    pub fn best_fitness(&self) -> f64 {
        self.best().map_or(0.0, Gene::fitness)
    }

    /// What genes are evaluated against.
    pub fn context(&self) -> &LayoutContext {
        &self.context
    }

    /// Room sizes new random genes are drawn from.
    pub fn template(&self) -> &[Room2D] {
        &self.template
    }

    /// Emits the best layout, contracted along adjacencies when enabled.
    pub fn result(&self) -> SpringLayoutResult {
        let mut gene = self.best().cloned().unwrap_or_else(|| Gene::new(Vec::new()));
        if self.config.contract_adjacency {
            contract_adjacent(&mut gene.rooms, &self.context.adjacency);
        }
        let fitness = gene.evaluate(&self.context, self.config.fitness_balance);

        SpringLayoutResult {
            adjacency_lines: adjacency_lines(&gene.rooms, &self.context.adjacency),
            total_gap: gene.gap_sum(&self.context.adjacency),
            covered_area: gene.covered_area(&self.context.region),
            fitness,
            rooms: gene.rooms,
            room_ids: self.room_ids.clone(),
            room_names: self.room_names.clone(),
            generations: self.generation,
            computation_time_ms: 0,
            cancelled: false,
        }
    }
}

/// Scales the rooms uniformly so their areas sum to `target`.
fn scale_to_area(rooms: &mut [Room2D], target: f64) {
    let total: f64 = rooms.iter().map(|r| r.area).sum();
    if total <= 0.0 || target <= 0.0 {
        return;
    }
    let factor = (target / total).sqrt();
    for room in rooms {
        room.scale_uniform(factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn program() -> HouseProgram {
        HouseProgram::new()
            .with_room(16.0)
            .with_room(12.0)
            .with_named_room(8.0, "Hall", true)
            .with_adjacency(1, 2)
            .with_adjacency(2, 3)
    }

    #[test]
    fn test_new_engine_population() {
        let config = SpringConfig::new().with_population_size(6).with_seed(1);
        let engine =
            SpringLayoutEngine::new(&program(), &Boundary2D::rectangle(12.0, 10.0), &config).unwrap();
        assert_eq!(engine.genes().len(), 6);
        assert_eq!(engine.generation(), 0);
        for pair in engine.genes().windows(2) {
            assert!(pair[0].fitness() >= pair[1].fitness());
        }
    }

    #[test]
    fn test_iterate_keeps_population_size() {
        let config = SpringConfig::new()
            .with_population_size(5)
            .with_offspring_factor(2)
            .with_seed(2);
        let mut engine =
            SpringLayoutEngine::new(&program(), &Boundary2D::rectangle(12.0, 10.0), &config).unwrap();
        engine.iterate();
        assert_eq!(engine.genes().len(), 5);
        assert_eq!(engine.generation(), 1);
    }

    #[test]
    fn test_adjust_area_scales_template() {
        let config = SpringConfig::new().with_adjust_area(true).with_seed(3);
        let engine =
            SpringLayoutEngine::new(&program(), &Boundary2D::rectangle(12.0, 6.0), &config).unwrap();
        let total: f64 = engine.template().iter().map(|r| r.area).sum();
        assert_relative_eq!(total, 72.0, epsilon = 1e-9);
        assert_relative_eq!(engine.template()[0].area / engine.template()[1].area, 16.0 / 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_from_rooms_checks_count() {
        let rooms = vec![Room2D::square(1.0, 1.0, 4.0)];
        let result = SpringLayoutEngine::from_rooms(
            rooms,
            &program(),
            &Boundary2D::rectangle(10.0, 10.0),
            &SpringConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_degenerate_boundary_rejected() {
        let result = SpringLayoutEngine::new(
            &program(),
            &Boundary2D::rectangle(0.0, 5.0),
            &SpringConfig::default(),
        );
        assert!(matches!(result, Err(Error::InvalidBoundary(_))));
    }

    #[test]
    fn test_scale_to_area() {
        let mut rooms = vec![Room2D::square(0.0, 0.0, 4.0), Room2D::square(0.0, 0.0, 12.0)];
        scale_to_area(&mut rooms, 64.0);
        assert_relative_eq!(rooms[0].area, 16.0, epsilon = 1e-9);
        assert_relative_eq!(rooms[1].area, 48.0, epsilon = 1e-9);
    }
}
