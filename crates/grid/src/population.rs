//! Candidate solutions and the bounded population that stores them.
//!
//! Solutions are plain values: storing one into the population moves it,
//! and resuming from a stored one clones it, so the working grid never
//! aliases a stored candidate.

use crate::grid::{CellState, Grid, RoomCells};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One complete or partial placement sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridSolution {
    /// Grid state after the placements.
    pub grid: Grid,
    /// Placement rectangle per room, indexed by `id - 1`.
    pub room_cells: Vec<Option<RoomCells>>,
    /// Room ids in placement order.
    pub placed_order: Vec<usize>,
}

impl GridSolution {
    /// Starts a solution from a grid with no rooms recorded.
    pub fn new(grid: Grid, room_count: usize) -> Self {
        Self {
            grid,
            room_cells: vec![None; room_count],
            placed_order: Vec::new(),
        }
    }

    /// Number of rooms placed.
    pub fn placed_count(&self) -> usize {
        self.placed_order.len()
    }

    /// Placement rectangle of a room.
    pub fn rect_of(&self, id: usize) -> Option<RoomCells> {
        id.checked_sub(1)
            .and_then(|i| self.room_cells.get(i).copied().flatten())
    }

    /// Records a placed room.
    pub fn record(&mut self, id: usize, rect: RoomCells) {
        if let Some(slot) = id.checked_sub(1).and_then(|i| self.room_cells.get_mut(i)) {
            *slot = Some(rect);
        }
        self.placed_order.push(id);
    }

    /// Undoes up to `count` of the most recent placements, always keeping the
    /// first one. Returns how many were undone.
    pub fn remove_last_rooms(&mut self, count: usize) -> usize {
        let mut removed = 0;
        while removed < count && self.placed_order.len() > 1 {
            let Some(id) = self.placed_order.pop() else {
                break;
            };
            if let Some(rect) = id
                .checked_sub(1)
                .and_then(|i| self.room_cells.get_mut(i))
                .and_then(Option::take)
            {
                for (x, y) in rect.cells() {
                    self.grid.set(x, y, CellState::Free);
                }
            }
            removed += 1;
        }
        removed
    }

    /// Ranking order: more rooms placed, then more cells covered by rooms.
    pub fn rank_cmp(&self, other: &GridSolution) -> Ordering {
        self.placed_count()
            .cmp(&other.placed_count())
            .then_with(|| self.grid.room_cell_count().cmp(&other.grid.room_cell_count()))
    }
}

/// What happened to a solution offered to the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    /// Added as a new member.
    Appended,
    /// Replaced the member in the slot.
    Replaced,
    /// Discarded in favour of the incumbent.
    Rejected,
}

/// Bounded, ranked collection of solutions.
#[derive(Debug, Clone)]
pub struct Population {
    capacity: usize,
    members: Vec<GridSolution>,
}

impl Population {
    /// Creates an empty population with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            members: Vec::with_capacity(capacity + 2),
        }
    }

    /// Number of slots filled per iteration.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored solutions.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if no solution is stored.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Solution at a slot.
    pub fn get(&self, slot: usize) -> Option<&GridSolution> {
        self.members.get(slot)
    }

    /// Stored solutions in rank order (after [`Population::sort_and_truncate`]).
    pub fn members(&self) -> &[GridSolution] {
        &self.members
    }

    /// The top-ranked solution.
    pub fn best(&self) -> Option<&GridSolution> {
        self.members
            .iter()
            .reduce(|best, s| if s.rank_cmp(best) == Ordering::Greater { s } else { best })
    }

    /// Offers a solution for `slot`.
    ///
    /// With `compare` set and the slot occupied, the challenger replaces the
    /// incumbent only if it placed at least as many rooms; otherwise it is
    /// appended.
    pub fn offer(&mut self, slot: usize, challenger: GridSolution, compare: bool) -> OfferOutcome {
        match self.members.get_mut(slot) {
            Some(incumbent) if compare => {
                if challenger.placed_count() >= incumbent.placed_count() {
                    *incumbent = challenger;
                    OfferOutcome::Replaced
                } else {
                    OfferOutcome::Rejected
                }
            }
            _ => {
                self.members.push(challenger);
                OfferOutcome::Appended
            }
        }
    }

    /// Sorts best-first (stable) and keeps `capacity + 2` members.
    pub fn sort_and_truncate(&mut self) {
        self.members.sort_by(|a, b| b.rank_cmp(a));
        self.members.truncate(self.capacity + 2);
    }
}
