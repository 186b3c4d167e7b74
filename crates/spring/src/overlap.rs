//! Polygon overlap queries backed by `i_overlay`.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use u_floorplan_core::geom::polygon::signed_area_arr;
use u_floorplan_core::Aabb;

/// Area and extent of the intersection of two regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Intersection area.
    pub area: f64,
    /// Bounding box of the intersection.
    pub extent: Aabb,
}

/// Smallest area treated as an actual overlap.
pub const MIN_OVERLAP_AREA: f64 = 1e-9;

/// Area of one clipped shape: the outer contour minus its holes.
fn shape_area(shape: &[Vec<[f64; 2]>]) -> f64 {
    let Some((outer, holes)) = shape.split_first() else {
        return 0.0;
    };
    let holes: f64 = holes.iter().map(|h| signed_area_arr(h).abs()).sum();
    (signed_area_arr(outer).abs() - holes).max(0.0)
}

fn extent_of(shapes: &[Vec<Vec<[f64; 2]>>]) -> Option<Aabb> {
    let points: Vec<(f64, f64)> = shapes
        .iter()
        .flatten()
        .flatten()
        .map(|p| (p[0], p[1]))
        .collect();
    Aabb::from_points(&points)
}

/// Intersects two regions given as contour lists (outer rings and holes,
/// even-odd filled). Returns `None` when they do not overlap.
pub fn intersect(a: &[Vec<[f64; 2]>], b: &[Vec<[f64; 2]>]) -> Option<Overlap> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let subject: Vec<Vec<[f64; 2]>> = a.to_vec();
    let clip: Vec<Vec<[f64; 2]>> = b.to_vec();
    let shapes = subject.overlay(&clip, OverlayRule::Intersect, FillRule::EvenOdd);

    let area: f64 = shapes.iter().map(|s| shape_area(s)).sum();
    if area <= MIN_OVERLAP_AREA {
        return None;
    }
    Some(Overlap {
        area,
        extent: extent_of(&shapes)?,
    })
}

/// Unions possibly overlapping contours into disjoint outlines.
pub fn union_contours(contours: &[Vec<[f64; 2]>]) -> Vec<Vec<[f64; 2]>> {
    let Some((first, rest)) = contours.split_first() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return vec![first.clone()];
    }

    let subject: Vec<Vec<[f64; 2]>> = rest.to_vec();
    let shapes = subject.overlay(&[first.clone()], OverlayRule::Union, FillRule::NonZero);
    shapes
        .into_iter()
        .flatten()
        .filter(|contour| contour.len() >= 3)
        .collect()
}

/// Area of the union of `rooms` that lies inside `region`.
pub fn covered_area(rooms: &[Vec<[f64; 2]>], region: &[Vec<[f64; 2]>]) -> f64 {
    let union = union_contours(rooms);
    intersect(&union, region).map_or(0.0, |o| o.area)
}
