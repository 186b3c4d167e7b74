//! Spring layout configuration.

use u_floorplan_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the spring layout engine.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringConfig {
    /// Number of genes kept after each generation.
    pub population_size: usize,

    /// Offspring factor: each generation adds `population_size * k`
    /// crossover children, mutants and fresh genes.
    pub offspring_factor: usize,

    /// Largest accepted width/height ratio when two rooms are rescaled.
    pub proportion_threshold: f64,

    /// Largest accepted width/height ratio when a room is rescaled
    /// against the boundary.
    pub boundary_proportion_threshold: f64,

    /// Weight of covered area against adjacency gaps, in `[0, 1]`.
    pub fitness_balance: f64,

    /// Probability of each mutation step.
    pub mutation_probability: f64,

    /// Largest mutation offset as a fraction of the boundary extent.
    pub mutation_strength: f64,

    /// Probability of keeping the first parent's room during crossover.
    pub crossover_probability: f64,

    /// Resolve collisions in every gene instead of only the best one.
    pub collide_all_genes: bool,

    /// Scale the rooms so their total area equals the boundary area.
    pub adjust_area: bool,

    /// Start from random positions instead of the given rooms.
    pub shuffle_at_start: bool,

    /// Pull adjacent rooms together in the emitted layout.
    pub contract_adjacency: bool,

    /// Number of generations run by the solver.
    pub generations: u32,

    /// Random seed for reproducible runs (None = entropy).
    pub seed: Option<u64>,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            population_size: 15,
            offspring_factor: 4,
            proportion_threshold: 2.0,
            boundary_proportion_threshold: 1.0,
            fitness_balance: 0.0,
            mutation_probability: 0.3,
            mutation_strength: 0.2,
            crossover_probability: 0.5,
            collide_all_genes: true,
            adjust_area: false,
            shuffle_at_start: false,
            contract_adjacency: true,
            generations: 100,
            seed: None,
        }
    }
}

impl SpringConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(1);
        self
    }

    /// Sets the offspring factor.
    pub fn with_offspring_factor(mut self, k: usize) -> Self {
        self.offspring_factor = k.max(1);
        self
    }

    /// Sets the room proportion threshold.
    pub fn with_proportion_threshold(mut self, threshold: f64) -> Self {
        self.proportion_threshold = threshold.max(1.0);
        self
    }

    /// Sets the boundary proportion threshold.
    pub fn with_boundary_proportion_threshold(mut self, threshold: f64) -> Self {
        self.boundary_proportion_threshold = threshold.max(1.0);
        self
    }

    /// Sets the fitness balance.
    pub fn with_fitness_balance(mut self, balance: f64) -> Self {
        self.fitness_balance = balance.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation strength.
    pub fn with_mutation_strength(mut self, strength: f64) -> Self {
        self.mutation_strength = strength.max(0.0);
        self
    }

    /// Sets the crossover pick probability.
    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Sets whether every gene gets collision resolution.
    pub fn with_collide_all_genes(mut self, enabled: bool) -> Self {
        self.collide_all_genes = enabled;
        self
    }

    /// Enables area adjustment to the boundary.
    pub fn with_adjust_area(mut self, enabled: bool) -> Self {
        self.adjust_area = enabled;
        self
    }

    /// Enables random initial positions.
    pub fn with_shuffle_at_start(mut self, enabled: bool) -> Self {
        self.shuffle_at_start = enabled;
        self
    }

    /// Enables adjacency contraction of the emitted layout.
    pub fn with_contract_adjacency(mut self, enabled: bool) -> Self {
        self.contract_adjacency = enabled;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: u32) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that numeric parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 || self.offspring_factor == 0 {
            return Err(Error::InvalidConfig(
                "population size and offspring factor must be positive".into(),
            ));
        }
        for (name, value) in [
            ("proportion threshold", self.proportion_threshold),
            ("boundary proportion threshold", self.boundary_proportion_threshold),
        ] {
            if !value.is_finite() || value < 1.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be at least 1, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("fitness balance", self.fitness_balance),
            ("mutation probability", self.mutation_probability),
            ("crossover probability", self.crossover_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }
        if !self.mutation_strength.is_finite() || self.mutation_strength < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "mutation strength must be non-negative, got {}",
                self.mutation_strength
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpringConfig::default();
        assert_eq!(config.population_size, 15);
        assert_eq!(config.offspring_factor, 4);
        assert_eq!(config.proportion_threshold, 2.0);
        assert_eq!(config.boundary_proportion_threshold, 1.0);
        assert_eq!(config.fitness_balance, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_clamps() {
        let config = SpringConfig::new()
            .with_population_size(0)
            .with_fitness_balance(3.0)
            .with_proportion_threshold(0.5)
            .with_seed(4);
        assert_eq!(config.population_size, 1);
        assert_eq!(config.fitness_balance, 1.0);
        assert_eq!(config.proportion_threshold, 1.0);
        assert_eq!(config.seed, Some(4));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = SpringConfig {
            mutation_probability: 1.5,
            ..SpringConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SpringConfig {
            proportion_threshold: f64::NAN,
            ..SpringConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
