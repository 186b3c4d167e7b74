//! Floor-plan layout CLI

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use u_floorplan_core::{
    AdjacencyPair, Boundary, Boundary2D, CorridorStyle, HouseProgram, Solver, SolverConfig,
};
use u_floorplan_grid::GridSolver;
use u_floorplan_spring::{SpringConfig, SpringSolver};

#[derive(Parser)]
#[command(name = "floorplan")]
#[command(about = "Grid and spring floor-plan layout")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a program on the cell grid
    Grid {
        /// Path to the JSON program file
        program: PathBuf,

        #[command(flatten)]
        options: GridOptions,

        /// Output file for the result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lay out a program with the spring engine
    Spring {
        /// Path to the JSON program file
        program: PathBuf,

        #[command(flatten)]
        options: SpringOptions,

        /// Output file for the result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse and validate a program file without solving
    Validate {
        /// Path to the JSON program file
        program: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CorridorArg {
    /// Corridor along one side of each room
    One,
    /// Corridor along two adjoining sides
    Two,
    /// Corridor around the whole room
    All,
}

impl From<CorridorArg> for CorridorStyle {
    fn from(arg: CorridorArg) -> Self {
        match arg {
            CorridorArg::One => CorridorStyle::OneSide,
            CorridorArg::Two => CorridorStyle::TwoSides,
            CorridorArg::All => CorridorStyle::AllSides,
        }
    }
}

#[derive(Args)]
struct GridOptions {
    /// Corridor sides per room
    #[arg(long, value_enum, default_value = "two")]
    corridors: CorridorArg,

    /// Shrink rooms for their corridors instead of adding the corridor area
    #[arg(long)]
    corridors_inside: bool,

    /// Absorb dead-end corridors into rooms
    #[arg(long)]
    remove_dead_ends: bool,

    /// Absorb every corridor cell inside a room rectangle
    #[arg(long)]
    remove_all_corridors: bool,

    /// Largest room aspect ratio
    #[arg(long, default_value = "2.0")]
    max_room_ratio: f64,

    /// Number of search iterations
    #[arg(short, long, default_value = "50")]
    iterations: u32,

    /// Largest corridor distance between adjacent rooms, in cells
    #[arg(long, default_value = "2.0")]
    max_adj_distance: f64,

    /// Grid cell size in world units
    #[arg(long, default_value = "1.0")]
    cell_size: f64,

    /// Rotate the boundary to its best rectilinear fit
    #[arg(long)]
    rotate: bool,

    /// Rotation sweep step in degrees
    #[arg(long, default_value = "0.5")]
    rotation_step: f64,

    /// Population slots per iteration
    #[arg(long, default_value = "5")]
    population: usize,

    /// Every n-th iteration resumes stored solutions
    #[arg(long, default_value = "3")]
    new_solutions_frequency: u32,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,
}

impl GridOptions {
    fn to_config(&self) -> SolverConfig {
        let mut config = SolverConfig::new()
            .with_corridor_style(self.corridors.into())
            .with_corridors_as_additional_space(!self.corridors_inside)
            .with_remove_dead_ends(self.remove_dead_ends)
            .with_remove_all_corridors(self.remove_all_corridors)
            .with_max_room_ratio(self.max_room_ratio)
            .with_iterations(self.iterations)
            .with_max_adj_distance(self.max_adj_distance)
            .with_cell_size(self.cell_size)
            .with_try_rotate_boundary(self.rotate)
            .with_population_size(self.population)
            .with_new_solutions_frequency(self.new_solutions_frequency);
        config.rotation_step_deg = self.rotation_step;
        config.seed = self.seed;
        config
    }
}

#[derive(Args)]
struct SpringOptions {
    /// Number of generations
    #[arg(short, long, default_value = "100")]
    generations: u32,

    /// Genes kept per generation
    #[arg(long, default_value = "15")]
    population: usize,

    /// Offspring of each kind per kept gene
    #[arg(long, default_value = "4")]
    offspring_factor: usize,

    /// Largest room aspect ratio when rooms are rescaled
    #[arg(long, default_value = "2.0")]
    proportion_threshold: f64,

    /// Largest room aspect ratio when rescaled against the boundary
    #[arg(long, default_value = "1.0")]
    boundary_proportion_threshold: f64,

    /// Weight of covered area against adjacency gaps, in [0, 1]
    #[arg(long, default_value = "0.0")]
    fitness_balance: f64,

    /// Probability of each mutation step
    #[arg(long, default_value = "0.3")]
    mutation_probability: f64,

    /// Largest mutation offset as a fraction of the boundary extent
    #[arg(long, default_value = "0.2")]
    mutation_strength: f64,

    /// Probability of taking a room from the first parent
    #[arg(long, default_value = "0.5")]
    crossover_probability: f64,

    /// Resolve collisions only in the best gene
    #[arg(long)]
    collide_best_only: bool,

    /// Scale rooms so their total area matches the boundary
    #[arg(long)]
    adjust_area: bool,

    /// Do not pull adjacent rooms together in the output
    #[arg(long)]
    no_contraction: bool,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,
}

impl SpringOptions {
    fn to_config(&self) -> SpringConfig {
        let mut config = SpringConfig::new()
            .with_generations(self.generations)
            .with_population_size(self.population)
            .with_offspring_factor(self.offspring_factor)
            .with_proportion_threshold(self.proportion_threshold)
            .with_boundary_proportion_threshold(self.boundary_proportion_threshold)
            .with_fitness_balance(self.fitness_balance)
            .with_mutation_probability(self.mutation_probability)
            .with_mutation_strength(self.mutation_strength)
            .with_crossover_probability(self.crossover_probability)
            .with_collide_all_genes(!self.collide_best_only)
            .with_adjust_area(self.adjust_area)
            .with_contract_adjacency(!self.no_contraction);
        config.seed = self.seed;
        config
    }
}

/// A room entry of a program file.
#[derive(Deserialize)]
struct RoomEntry {
    area: f64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    hall: bool,
}

/// A program file.
#[derive(Deserialize)]
struct ProgramFile {
    boundary: Vec<(f64, f64)>,
    #[serde(default)]
    holes: Vec<Vec<(f64, f64)>>,
    #[serde(default)]
    entrance: Option<(f64, f64)>,
    rooms: Vec<RoomEntry>,
    #[serde(default)]
    adjacency: Vec<String>,
    #[serde(default)]
    entrance_room: Option<usize>,
}

impl ProgramFile {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    fn into_inputs(self) -> anyhow::Result<(HouseProgram, Boundary2D)> {
        if self.boundary.len() < 3 {
            bail!("boundary needs at least 3 vertices, got {}", self.boundary.len());
        }
        let boundary = self
            .holes
            .into_iter()
            .fold(Boundary2D::new(self.boundary), Boundary2D::with_hole);
        boundary.validate()?;

        let mut program = HouseProgram::new();
        for room in self.rooms {
            program.add_room(room.area, room.name, room.hall);
        }
        for text in &self.adjacency {
            let pair = AdjacencyPair::parse(text)?;
            program = program.with_adjacency(pair.a, pair.b);
        }
        if let Some(id) = self.entrance_room {
            program = program.with_entrance(id);
        }
        if let Some((x, y)) = self.entrance {
            program = program.with_entrance_point(x, y);
        }
        program.validate()?;
        Ok((program, boundary))
    }
}

fn load_inputs(path: &Path) -> anyhow::Result<(HouseProgram, Boundary2D)> {
    ProgramFile::load(path)?
        .into_inputs()
        .with_context(|| format!("invalid program in {}", path.display()))
}

fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    println!("\nResult saved to: {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Grid {
            program,
            options,
            output,
        } => {
            let (house, boundary) = load_inputs(&program)?;
            let config = options.to_config();
            config.validate()?;

            println!("Grid layout: {} rooms", house.room_count());
            println!("==========================");
            let result = GridSolver::new(config).solve(&house, &boundary)?;

            println!(
                "Placed {}/{} rooms in {} ms",
                result.placed_count, result.total_count, result.computation_time_ms
            );
            if result.rotation_rad != 0.0 {
                println!("Boundary rotated by {:.2} deg", result.rotation_rad.to_degrees());
            }
            for ((name, geometry), missing) in result
                .room_names
                .iter()
                .zip(&result.room_geometries)
                .zip(&result.missing_adjacency_counts)
            {
                println!(
                    "  {:<24} {:>4} cells, {} missing adjacencies",
                    name, geometry.cell_count, missing
                );
            }
            println!("Corridor cells: {}", result.occupancy.count(-1));

            if let Some(path) = output {
                write_json(&result, &path)?;
            }
        }

        Commands::Spring {
            program,
            options,
            output,
        } => {
            let (house, boundary) = load_inputs(&program)?;
            let config = options.to_config();
            config.validate()?;

            println!("Spring layout: {} rooms", house.room_count());
            println!("==========================");
            let result = SpringSolver::new(config).solve(&house, &boundary)?;

            println!(
                "Fitness {:.4} after {} generations in {} ms",
                result.fitness, result.generations, result.computation_time_ms
            );
            println!(
                "Total adjacency gap {:.3}, covered area {:.2} of {:.2}",
                result.total_gap,
                result.covered_area,
                boundary.measure()
            );
            for (name, room) in result.room_names.iter().zip(&result.rooms) {
                println!(
                    "  {:<24} center ({:.2}, {:.2}), {:.2} x {:.2}",
                    name,
                    room.center_x,
                    room.center_y,
                    room.width,
                    room.height()
                );
            }

            if let Some(path) = output {
                write_json(&result, &path)?;
            }
        }

        Commands::Validate { program } => {
            let (house, boundary) = load_inputs(&program)?;
            println!(
                "{}: {} rooms, {} adjacencies, total area {:.2} in a boundary of {:.2}",
                program.display(),
                house.room_count(),
                house.adjacency().len(),
                house.total_area(),
                boundary.measure()
            );
        }
    }

    Ok(())
}
