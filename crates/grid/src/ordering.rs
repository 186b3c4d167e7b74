//! Choice of the next room to place.

use rand::Rng;
use u_floorplan_core::{tie_break_noise, HouseProgram};

/// Ranks unplaced rooms by their adjacency to the placed cluster.
#[derive(Debug, Clone, Copy)]
pub struct RoomOrderPlanner<'a> {
    program: &'a HouseProgram,
}

impl<'a> RoomOrderPlanner<'a> {
    /// Creates a planner for a program.
    pub fn new(program: &'a HouseProgram) -> Self {
        Self { program }
    }

    /// Picks the next room id to place, or `None` when all rooms are placed.
    ///
    /// `placed` is indexed by room id. The entrance room goes first. After
    /// that, each adjacency edge from an unplaced room to a placed one adds
    /// `1 + noise` to the unplaced room. If no unplaced room touches the
    /// placed cluster, edges between unplaced rooms are counted instead.
    pub fn next_room<R: Rng>(&self, placed: &[bool], rng: &mut R) -> Option<usize> {
        let count = self.program.room_count();
        let is_placed = |id: usize| placed.get(id).copied().unwrap_or(false);

        if let Some(entrance) = self.program.entrance_id() {
            if !is_placed(entrance) {
                return Some(entrance);
            }
        }
        if (1..=count).all(is_placed) {
            return None;
        }

        // Placed rooms sit below every unplaced one.
        let reset = || -> Vec<f64> {
            (0..=count)
                .map(|id| if id == 0 || is_placed(id) { -1.0 } else { 0.0 })
                .collect()
        };

        let mut priority = reset();
        for pair in self.program.adjacency() {
            match (is_placed(pair.a), is_placed(pair.b)) {
                (true, false) => priority[pair.b] += 1.0 + tie_break_noise(rng),
                (false, true) => priority[pair.a] += 1.0 + tie_break_noise(rng),
                _ => {}
            }
        }
        if let Some((id, score)) = argmax(&priority) {
            if score > 0.0 {
                return Some(id);
            }
        }

        let mut priority = reset();
        for pair in self.program.adjacency() {
            if !is_placed(pair.a) {
                priority[pair.a] += 1.0 + tie_break_noise(rng);
            }
            if !is_placed(pair.b) {
                priority[pair.b] += 1.0 + tie_break_noise(rng);
            }
        }
        argmax(&priority).map(|(id, _)| id)
    }
}

/// Index and value of the maximum; the first maximum wins.
fn argmax(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
}
