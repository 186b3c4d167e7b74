//! Room placement search.
//!
//! A stamp is anchored at a free cell next to a corridor and mirrored into
//! one of four orientations so that stamp cell `(0, 0)` stays on the anchor.
//! Feasible placements are scored by how many occupied cells they touch.
//! Stamps that fit nowhere whole are clipped to the grid edges instead, as
//! long as some room cell survives the clip.

use crate::grid::{CellState, Grid, RoomCells, NEIGHBORS_4};
use crate::reachability::ReachabilityFilter;
use crate::stamp::RoomStamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction in which the stamp extends from its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Towards +x, +y.
    TopRight,
    /// Towards +x, -y.
    BottomRight,
    /// Towards -x, -y.
    BottomLeft,
    /// Towards -x, +y.
    TopLeft,
}

impl Orientation {
    /// All orientations in evaluation order.
    pub const ALL: [Orientation; 4] = [
        Orientation::TopRight,
        Orientation::BottomRight,
        Orientation::BottomLeft,
        Orientation::TopLeft,
    ];

    /// Axis signs `(sx, sy)`.
    pub fn signs(self) -> (i64, i64) {
        match self {
            Orientation::TopRight => (1, 1),
            Orientation::BottomRight => (1, -1),
            Orientation::BottomLeft => (-1, -1),
            Orientation::TopLeft => (-1, 1),
        }
    }
}

/// A feasible placement found during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPlacementCandidate {
    /// Anchor column.
    pub x: usize,
    /// Anchor row.
    pub y: usize,
    /// Stamp orientation.
    pub orientation: Orientation,
    /// Covered rectangle.
    pub rect: RoomCells,
    /// Number of occupied cells touching the rectangle.
    pub score: usize,
}

/// Rectangle covered by `stamp` anchored at `anchor`, or `None` if it leaves
/// the grid.
pub fn footprint(
    grid: &Grid,
    anchor: (usize, usize),
    stamp: &RoomStamp,
    orientation: Orientation,
) -> Option<RoomCells> {
    let (w, h) = (stamp.width(), stamp.height());
    if w == 0 || h == 0 {
        return None;
    }
    let (sx, sy) = orientation.signs();
    let x0 = if sx > 0 {
        anchor.0
    } else {
        anchor.0.checked_sub(w - 1)?
    };
    let y0 = if sy > 0 {
        anchor.1
    } else {
        anchor.1.checked_sub(h - 1)?
    };
    if x0 + w > grid.width() || y0 + h > grid.height() {
        return None;
    }
    Some(RoomCells::new(x0, y0, w, h))
}

/// Part of the stamp's rectangle that lies on the grid, or `None` if no room
/// cell of the stamp is left after clipping.
pub fn clipped_footprint(
    grid: &Grid,
    anchor: (usize, usize),
    stamp: &RoomStamp,
    orientation: Orientation,
) -> Option<RoomCells> {
    let (w, h) = (stamp.width(), stamp.height());
    if w == 0 || h == 0 || anchor.0 >= grid.width() || anchor.1 >= grid.height() {
        return None;
    }
    let (sx, sy) = orientation.signs();
    let span = |start: usize, len: usize, sign: i64, limit: usize| {
        let end = start as i64 + sign * (len as i64 - 1);
        let lo = (start as i64).min(end).max(0) as usize;
        let hi = (start as i64).max(end).min(limit as i64 - 1) as usize;
        (lo, hi - lo + 1)
    };
    let (x0, cw) = span(anchor.0, w, sx, grid.width());
    let (y0, ch) = span(anchor.1, h, sy, grid.height());
    let rect = RoomCells::new(x0, y0, cw, ch);

    let has_room = rect.cells().any(|(x, y)| {
        let i = (x as i64 - anchor.0 as i64) * sx;
        let j = (y as i64 - anchor.1 as i64) * sy;
        stamp.at(i as usize, j as usize).room_id().is_some()
    });
    has_room.then_some(rect)
}

/// Returns true if every cell of the rectangle is free.
pub fn is_feasible(grid: &Grid, rect: &RoomCells) -> bool {
    rect.cells().all(|(x, y)| grid.at(x, y).is_free())
}

/// Counts the on-grid cells along the outside of the rectangle's four edges
/// that hold a room or corridor.
pub fn score(grid: &Grid, rect: &RoomCells) -> usize {
    let (x0, y0) = (rect.x as i64, rect.y as i64);
    let (x1, y1) = (x0 + rect.w as i64, y0 + rect.h as i64);
    let occupied = |x: i64, y: i64| grid.get(x, y).is_some_and(CellState::is_occupied);

    let horizontal = (x0..x1)
        .filter(|&x| occupied(x, y0 - 1))
        .count()
        + (x0..x1).filter(|&x| occupied(x, y1)).count();
    let vertical = (y0..y1)
        .filter(|&y| occupied(x0 - 1, y))
        .count()
        + (y0..y1).filter(|&y| occupied(x1, y)).count();
    horizontal + vertical
}

/// Returns true if `(x, y)` is free and orthogonally touches a corridor.
pub fn is_anchor_cell(grid: &Grid, x: usize, y: usize) -> bool {
    grid.at(x, y).is_free()
        && NEIGHBORS_4.iter().any(|&(dx, dy)| {
            grid.get(x as i64 + dx, y as i64 + dy)
                .is_some_and(CellState::is_corridor)
        })
}

/// Scans the grid for the highest-scoring feasible placement.
///
/// Anchors are visited in scan order and orientations in
/// [`Orientation::ALL`] order; the first strict maximum wins. Anchors must
/// reach every room in `required` within the filter's distance bound. Only
/// when the whole stamp fits nowhere is the scan repeated with stamps
/// clipped to the grid.
pub fn find_best_placement(
    grid: &Grid,
    stamp: &RoomStamp,
    required: &[usize],
    filter: &ReachabilityFilter,
) -> Option<RoomPlacementCandidate> {
    scan_placements(grid, stamp, required, filter, footprint).or_else(|| {
        let best = scan_placements(grid, stamp, required, filter, clipped_footprint);
        if let Some(b) = &best {
            log::debug!(
                "stamp {}x{} clipped to {}x{} at ({}, {})",
                stamp.width(),
                stamp.height(),
                b.rect.w,
                b.rect.h,
                b.x,
                b.y
            );
        }
        best
    })
}

fn scan_placements<F>(
    grid: &Grid,
    stamp: &RoomStamp,
    required: &[usize],
    filter: &ReachabilityFilter,
    cover: F,
) -> Option<RoomPlacementCandidate>
where
    F: Fn(&Grid, (usize, usize), &RoomStamp, Orientation) -> Option<RoomCells>,
{
    let mut best: Option<RoomPlacementCandidate> = None;

    for x in 0..grid.width() {
        for y in 0..grid.height() {
            if !is_anchor_cell(grid, x, y) {
                continue;
            }

            let feasible: Vec<(Orientation, RoomCells)> = Orientation::ALL
                .iter()
                .filter_map(|&o| cover(grid, (x, y), stamp, o).map(|rect| (o, rect)))
                .filter(|(_, rect)| is_feasible(grid, rect))
                .collect();
            if feasible.is_empty() || !filter.accepts(grid, (x, y), required) {
                continue;
            }

            for (orientation, rect) in feasible {
                let s = score(grid, &rect);
                if best.map_or(true, |b| s > b.score) {
                    best = Some(RoomPlacementCandidate {
                        x,
                        y,
                        orientation,
                        rect,
                        score: s,
                    });
                }
            }
        }
    }
    best
}

/// Writes the stamp onto the grid at the candidate position.
pub fn apply_placement(grid: &mut Grid, candidate: &RoomPlacementCandidate, stamp: &RoomStamp) {
    let (sx, sy) = candidate.orientation.signs();
    for i in 0..stamp.width() {
        for j in 0..stamp.height() {
            let x = candidate.x as i64 + sx * i as i64;
            let y = candidate.y as i64 + sy * j as i64;
            if grid.in_bounds(x, y) {
                grid.set(x as usize, y as usize, stamp.at(i, j));
            }
        }
    }
}
