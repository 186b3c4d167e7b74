//! Collision resolution between rooms and against the boundary.
//!
//! Overlapping rooms are first rescaled along the overlap's short axis,
//! keeping their areas. When a rescaled room would leave the accepted
//! proportion range the rescale is undone and the rooms are pushed apart
//! instead.

use crate::gene::clamp_into;
use crate::overlap::intersect;
use crate::room::Room2D;
use u_floorplan_core::Aabb;

/// Relative slack of clipped areas and extents.
const TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Length of the room along `axis`.
fn extent(room: &Room2D, axis: Axis) -> f64 {
    match axis {
        Axis::X => room.width,
        Axis::Y => room.height(),
    }
}

/// Shrinks `room` along `axis` by `factor`, keeping the edge on the
/// `side` (+1 or -1) fixed and stretching the other axis to keep the area.
fn shrink_along(room: &mut Room2D, axis: Axis, factor: f64, side: f64) {
    let half = extent(room, axis) / 2.0;
    match axis {
        Axis::X => room.scale_about((room.center_x + side * half, room.center_y), factor, 1.0 / factor),
        Axis::Y => room.scale_about((room.center_x, room.center_y + side * half), 1.0 / factor, factor),
    }
}

fn translate_along(room: &mut Room2D, axis: Axis, distance: f64) {
    match axis {
        Axis::X => room.translate(distance, 0.0),
        Axis::Y => room.translate(0.0, distance),
    }
}

/// Resolves overlaps using the configured proportion thresholds.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    proportion_threshold: f64,
    boundary_proportion_threshold: f64,
}

impl CollisionResolver {
    /// Creates a resolver.
    pub fn new(proportion_threshold: f64, boundary_proportion_threshold: f64) -> Self {
        Self {
            proportion_threshold,
            boundary_proportion_threshold,
        }
    }

    /// Separates two rooms. Returns true if either room changed.
    pub fn resolve_pair(&self, a: &mut Room2D, b: &mut Room2D) -> bool {
        if a.contains(b) || b.contains(a) {
            escape(a, b);
            return true;
        }
        let Some(overlap) = a.aabb().intersection(&b.aabb()) else {
            return false;
        };

        // Push along the overlap's short side; `push` is the signed
        // displacement of `a` relative to `b`.
        let (axis, depth, a_ahead) = if overlap.width() > overlap.height() {
            (Axis::Y, overlap.height(), a.center_y > b.center_y)
        } else {
            (Axis::X, overlap.width(), a.center_x > b.center_x)
        };
        let push = if a_ahead { depth } else { -depth };
        let side = push.signum();

        let (before_a, before_b) = (*a, *b);
        let factor_a = 1.0 - depth / extent(a, axis) / 2.0;
        let factor_b = 1.0 - depth / extent(b, axis) / 2.0;
        shrink_along(a, axis, factor_a, side);
        shrink_along(b, axis, factor_b, -side);

        if !(a.is_well_proportioned(self.proportion_threshold)
            && b.is_well_proportioned(self.proportion_threshold))
        {
            *a = before_a;
            *b = before_b;
            translate_along(a, axis, push / 2.0);
            translate_along(b, axis, -push / 2.0);
        }
        true
    }

    /// Pulls a room back inside the boundary. `region` holds the boundary
    /// contours and `bounds` their bounding box. Returns true if the room
    /// changed.
    ///
    /// A room entirely outside the region is clamped into the bounding box
    /// and, if it still misses the region (say in the notch of an L), its
    /// centre is moved onto the nearest contour edge so later passes can
    /// treat it as an overhang.
    pub fn resolve_boundary(&self, room: &mut Room2D, bounds: &Aabb, region: &[Vec<[f64; 2]>]) -> bool {
        let Some(inside) = intersect(&[room.contour()], region) else {
            let before = *room;
            clamp_into(room, bounds);
            if intersect(&[room.contour()], region).is_none() {
                if let Some((x, y)) = nearest_contour_point(room.center(), region) {
                    room.center_x = x;
                    room.center_y = y;
                }
            }
            return *room != before;
        };
        if inside.area >= room.area * (1.0 - TOLERANCE) {
            return false;
        }

        let over_x = room.width - inside.extent.width();
        let over_y = room.height() - inside.extent.height();
        if over_x.max(over_y) <= TOLERANCE * room.width.max(room.height()) {
            return false;
        }
        let (axis, overhang, towards) = if over_x >= over_y {
            (Axis::X, over_x, inside.extent.center().0 - room.center_x)
        } else {
            (Axis::Y, over_y, inside.extent.center().1 - room.center_y)
        };
        let side = if towards >= 0.0 { 1.0 } else { -1.0 };

        // Shrink onto the inside part, keeping the inner edge fixed.
        let before = *room;
        let length = extent(room, axis);
        shrink_along(room, axis, (length - overhang) / length, side);
        if !room.is_well_proportioned(self.boundary_proportion_threshold) {
            *room = before;
            translate_along(room, axis, side * overhang);
        }
        true
    }

    /// Runs one pass over all room pairs, then over every room against the
    /// boundary. Returns the number of adjustments.
    pub fn resolve(&self, rooms: &mut [Room2D], bounds: &Aabb, region: &[Vec<[f64; 2]>]) -> usize {
        let mut adjustments = 0;
        for i in 0..rooms.len() {
            for j in (i + 1)..rooms.len() {
                let (head, tail) = rooms.split_at_mut(j);
                if self.resolve_pair(&mut head[i], &mut tail[0]) {
                    adjustments += 1;
                }
            }
        }
        for room in rooms.iter_mut() {
            if self.resolve_boundary(room, bounds, region) {
                adjustments += 1;
            }
        }
        adjustments
    }
}

/// Closest point to `p` on any edge of the closed contours.
fn nearest_contour_point(p: (f64, f64), contours: &[Vec<[f64; 2]>]) -> Option<(f64, f64)> {
    let mut best: Option<((f64, f64), f64)> = None;
    for ring in contours {
        for (k, a) in ring.iter().enumerate() {
            let b = ring[(k + 1) % ring.len()];
            let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
            let len2 = dx * dx + dy * dy;
            let t = if len2 > 0.0 {
                (((p.0 - a[0]) * dx + (p.1 - a[1]) * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let q = (a[0] + t * dx, a[1] + t * dy);
            let d2 = (q.0 - p.0).powi(2) + (q.1 - p.1).powi(2);
            if best.map_or(true, |(_, d)| d2 < d) {
                best = Some((q, d2));
            }
        }
    }
    best.map(|(q, _)| q)
}

/// Moves `a` out of `b` (or `b` out of `a`) along the axis with the
/// shorter escape, so the rooms end up edge to edge.
fn escape(a: &mut Room2D, b: &Room2D) {
    let (ra, rb) = (a.aabb(), b.aabb());
    let dx = if a.center_x >= b.center_x {
        rb.max_x - ra.min_x
    } else {
        rb.min_x - ra.max_x
    };
    let dy = if a.center_y >= b.center_y {
        rb.max_y - ra.min_y
    } else {
        rb.min_y - ra.max_y
    };
    if dx.abs() <= dy.abs() {
        a.translate(dx, 0.0);
    } else {
        a.translate(0.0, dy);
    }
}
