//! Adjacency contraction and adjacency lines.
//!
//! Contraction pulls rooms that should touch towards each other along the
//! axis with the larger gap. Each room of a pair moves half the gap.

use crate::room::Room2D;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Segment between the centres of two rooms that should be adjacent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdjacencyLine {
    /// First room id (1-based).
    pub a: usize,
    /// Second room id (1-based).
    pub b: usize,
    /// Centre of room `a`.
    pub from: (f64, f64),
    /// Centre of room `b`.
    pub to: (f64, f64),
}

impl AdjacencyLine {
    /// Length of the segment.
    pub fn length(&self) -> f64 {
        (self.to.0 - self.from.0).hypot(self.to.1 - self.from.1)
    }
}

/// Centre-to-centre lines for the zero-based `adjacency` pairs. Pairs
/// referencing missing rooms are skipped.
pub fn adjacency_lines(rooms: &[Room2D], adjacency: &[(usize, usize)]) -> Vec<AdjacencyLine> {
    adjacency
        .iter()
        .filter_map(|&(a, b)| {
            let (ra, rb) = (rooms.get(a)?, rooms.get(b)?);
            Some(AdjacencyLine {
                a: a + 1,
                b: b + 1,
                from: ra.center(),
                to: rb.center(),
            })
        })
        .collect()
}

/// Closes the gap between every pair of non-touching adjacent rooms along
/// the axis with the larger gap. Returns the number of pairs moved.
pub fn contract_adjacent(rooms: &mut [Room2D], adjacency: &[(usize, usize)]) -> usize {
    let mut moved = 0;
    for &(a, b) in adjacency {
        if a == b || a >= rooms.len() || b >= rooms.len() {
            continue;
        }
        let (gap_x, gap_y) = rooms[a].gaps_to(&rooms[b]);
        let gap = gap_x.max(gap_y);
        if gap <= 0.0 {
            continue;
        }

        let half = gap / 2.0;
        let (dx, dy) = if gap_x >= gap_y {
            let dir = (rooms[b].center_x - rooms[a].center_x).signum();
            (dir * half, 0.0)
        } else {
            let dir = (rooms[b].center_y - rooms[a].center_y).signum();
            (0.0, dir * half)
        };
        rooms[a].translate(dx, dy);
        rooms[b].translate(-dx, -dy);
        moved += 1;
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_contract_horizontal_gap() {
        let mut rooms = vec![Room2D::new(1.0, 1.0, 2.0, 2.0), Room2D::new(7.0, 1.5, 2.0, 2.0)];
        assert_eq!(contract_adjacent(&mut rooms, &[(0, 1)]), 1);
        assert_relative_eq!(rooms[0].center_x, 3.0);
        assert_relative_eq!(rooms[1].center_x, 5.0);
        assert_relative_eq!(rooms[0].gap_to(&rooms[1]), 0.0);
        assert_relative_eq!(rooms[1].center_y, 1.5);
    }

    #[test]
    fn test_contract_vertical_gap() {
        let mut rooms = vec![Room2D::new(0.0, 10.0, 2.0, 2.0), Room2D::new(0.5, 0.0, 2.0, 2.0)];
        contract_adjacent(&mut rooms, &[(0, 1)]);
        assert_relative_eq!(rooms[0].center_y, 6.0);
        assert_relative_eq!(rooms[1].center_y, 4.0);
        assert_relative_eq!(rooms[0].gap_to(&rooms[1]), 0.0);
    }

    #[test]
    fn test_touching_rooms_stay() {
        let mut rooms = vec![Room2D::new(0.0, 0.0, 2.0, 2.0), Room2D::new(2.0, 0.0, 2.0, 2.0)];
        let before = rooms.clone();
        assert_eq!(contract_adjacent(&mut rooms, &[(0, 1), (0, 5)]), 0);
        assert_eq!(rooms, before);
    }

    #[test]
    fn test_adjacency_lines() {
        let rooms = vec![Room2D::new(0.0, 0.0, 2.0, 2.0), Room2D::new(3.0, 4.0, 2.0, 2.0)];
        let lines = adjacency_lines(&rooms, &[(0, 1), (1, 7)]);
        assert_eq!(lines.len(), 1);
        assert_eq!((lines[0].a, lines[0].b), (1, 2));
        assert_eq!(lines[0].to, (3.0, 4.0));
        assert_relative_eq!(lines[0].length(), 5.0);
    }
}
