//! Candidate layouts and their fitness.

use crate::overlap::covered_area;
use crate::room::Room2D;
use rand::Rng;
use u_floorplan_core::Aabb;

/// What a gene is evaluated against.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    /// Bounding box of the boundary.
    pub bounds: Aabb,
    /// Boundary contours (outer ring and holes).
    pub region: Vec<Vec<[f64; 2]>>,
    /// Adjacent room pairs as zero-based indices.
    pub adjacency: Vec<(usize, usize)>,
}

/// One complete layout: a rectangle per room.
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    /// Rooms in program order.
    pub rooms: Vec<Room2D>,
    fitness: f64,
}

/// Width drawn uniformly between the widths giving proportions
/// `1 / threshold` and `threshold`.
fn random_width<R: Rng>(area: f64, threshold: f64, rng: &mut R) -> f64 {
    let narrow = (area / threshold).sqrt();
    let wide = (area * threshold).sqrt();
    narrow + rng.gen::<f64>() * (wide - narrow)
}

/// Moves `room` so it lies inside `bounds` wherever it fits.
pub fn clamp_into(room: &mut Room2D, bounds: &Aabb) {
    let (bx, by) = bounds.center();
    let clamp_axis = |center: f64, half: f64, min: f64, max: f64, mid: f64| {
        if max - min <= 2.0 * half {
            mid
        } else {
            center.clamp(min + half, max - half)
        }
    };
    room.center_x = clamp_axis(room.center_x, room.width / 2.0, bounds.min_x, bounds.max_x, bx);
    room.center_y = clamp_axis(room.center_y, room.height() / 2.0, bounds.min_y, bounds.max_y, by);
}

impl Gene {
    /// Creates a gene from the given rooms.
    pub fn new(rooms: Vec<Room2D>) -> Self {
        Self {
            rooms,
            fitness: 0.0,
        }
    }

    /// Creates a gene with the areas of `template`, random proportions and
    /// random positions inside `bounds`.
    pub fn random<R: Rng>(
        template: &[Room2D],
        bounds: &Aabb,
        proportion_threshold: f64,
        rng: &mut R,
    ) -> Self {
        let rooms = template
            .iter()
            .map(|t| {
                let width = random_width(t.area, proportion_threshold, rng);
                let mut room = Room2D {
                    center_x: 0.0,
                    center_y: 0.0,
                    width,
                    area: t.area,
                };
                let slack_x = (bounds.width() - width).max(0.0);
                let slack_y = (bounds.height() - room.height()).max(0.0);
                room.center_x = bounds.min_x + width / 2.0 + rng.gen::<f64>() * slack_x;
                room.center_y = bounds.min_y + room.height() / 2.0 + rng.gen::<f64>() * slack_y;
                room
            })
            .collect();
        Self::new(rooms)
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns true if the gene has no rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Fitness from the last [`Gene::evaluate`] call.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Sum of the gaps between rooms that should be adjacent.
    pub fn gap_sum(&self, adjacency: &[(usize, usize)]) -> f64 {
        adjacency
            .iter()
            .filter_map(|&(a, b)| Some(self.rooms.get(a)?.gap_to(self.rooms.get(b)?)))
            .sum()
    }

    /// Area of the rooms' union inside the boundary region.
    pub fn covered_area(&self, region: &[Vec<[f64; 2]>]) -> f64 {
        let contours: Vec<Vec<[f64; 2]>> = self.rooms.iter().map(Room2D::contour).collect();
        covered_area(&contours, region)
    }

    /// Computes and caches the fitness
    /// `balance * covered_area + (1 - balance) / (1 + gap_sum)`.
    pub fn evaluate(&mut self, context: &LayoutContext, balance: f64) -> f64 {
        let area_term = if balance > 0.0 {
            balance * self.covered_area(&context.region)
        } else {
            0.0
        };
        let gap_term = (1.0 - balance) / (1.0 + self.gap_sum(&context.adjacency));
        self.fitness = area_term + gap_term;
        self.fitness
    }

    /// Child taking each room from `self` with probability `pick_probability`,
    /// otherwise from `other`.
    pub fn crossover<R: Rng>(&self, other: &Gene, pick_probability: f64, rng: &mut R) -> Gene {
        let rooms = self
            .rooms
            .iter()
            .zip(&other.rooms)
            .map(|(a, b)| if rng.gen::<f64>() < pick_probability { *a } else { *b })
            .collect();
        Gene::new(rooms)
    }

    /// Randomly perturbs room centers and proportions, then clamps mutated
    /// rooms back inside `bounds`.
    pub fn mutate<R: Rng>(
        &mut self,
        bounds: &Aabb,
        proportion_threshold: f64,
        probability: f64,
        strength: f64,
        rng: &mut R,
    ) {
        for room in &mut self.rooms {
            if !rng.gen_bool(probability) {
                continue;
            }
            if rng.gen_bool(probability) {
                room.center_x += bounds.width() * strength * (rng.gen::<f64>() - 0.5);
            }
            if rng.gen_bool(probability) {
                room.center_y += bounds.height() * strength * (rng.gen::<f64>() - 0.5);
            }
            if rng.gen_bool(probability) {
                room.width = random_width(room.area, proportion_threshold, rng);
            }
            clamp_into(room, bounds);
        }
    }
}
