//! Building boundaries.
//!
//! The engines only need point containment and a bounding box from a
//! boundary, captured by the [`Boundary`] trait. [`Boundary2D`] is the
//! polygon implementation backed by `geo`.

use crate::error::{Error, Result};
use crate::geom::{rotate_point, Aabb};
use geo::{Area, BoundingRect, Contains, Coord, LineString, Point, Polygon};

/// A closed planar region that rooms must be placed inside.
pub trait Boundary {
    /// Returns true if the point lies strictly inside the region.
    fn contains_point(&self, x: f64, y: f64) -> bool;

    /// Axis-aligned bounding box of the region.
    fn aabb(&self) -> Aabb;

    /// Area of the region.
    fn measure(&self) -> f64;

    /// Returns a copy rotated by `angle` radians about `center`.
    fn rotated(&self, angle: f64, center: (f64, f64)) -> Self
    where
        Self: Sized;

    /// Validates the boundary.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A polygonal boundary with optional holes.
#[derive(Debug, Clone)]
pub struct Boundary2D {
    exterior: Vec<(f64, f64)>,
    holes: Vec<Vec<(f64, f64)>>,
    polygon: Polygon<f64>,
}

impl Boundary2D {
    /// Creates a boundary from its exterior vertices.
    pub fn new(vertices: Vec<(f64, f64)>) -> Self {
        Self::with_rings(vertices, Vec::new())
    }

    /// Creates a rectangular boundary with its minimum corner at the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(vec![(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)])
    }

    /// Creates an L-shaped boundary: a `width` x `height` rectangle with a
    /// `notch_width` x `notch_height` notch removed from the top-right corner.
    pub fn l_shape(width: f64, height: f64, notch_width: f64, notch_height: f64) -> Self {
        Self::new(vec![
            (0.0, 0.0),
            (width, 0.0),
            (width, height - notch_height),
            (width - notch_width, height - notch_height),
            (width - notch_width, height),
            (0.0, height),
        ])
    }

    /// Adds an interior hole where rooms may not be placed.
    pub fn with_hole(self, vertices: Vec<(f64, f64)>) -> Self {
        let mut holes = self.holes;
        holes.push(vertices);
        Self::with_rings(self.exterior, holes)
    }

    fn with_rings(exterior: Vec<(f64, f64)>, holes: Vec<Vec<(f64, f64)>>) -> Self {
        let polygon = Polygon::new(
            to_line_string(&exterior),
            holes.iter().map(|h| to_line_string(h)).collect(),
        );
        Self {
            exterior,
            holes,
            polygon,
        }
    }

    /// Returns the exterior vertices.
    pub fn exterior(&self) -> &[(f64, f64)] {
        &self.exterior
    }

    /// Returns the interior holes.
    pub fn holes(&self) -> &[Vec<(f64, f64)>] {
        &self.holes
    }

    /// Returns the rings as `[x, y]` contours (exterior first), the layout
    /// used by polygon clipping.
    pub fn contours(&self) -> Vec<Vec<[f64; 2]>> {
        std::iter::once(&self.exterior)
            .chain(self.holes.iter())
            .map(|ring| ring.iter().map(|&(x, y)| [x, y]).collect())
            .collect()
    }

    /// Returns true if the boundary encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.exterior.len() < 3 || self.measure() <= f64::EPSILON
    }
}

fn to_line_string(ring: &[(f64, f64)]) -> LineString<f64> {
    LineString::from(
        ring.iter()
            .map(|&(x, y)| Coord { x, y })
            .collect::<Vec<_>>(),
    )
}

impl Boundary for Boundary2D {
    fn contains_point(&self, x: f64, y: f64) -> bool {
        self.polygon.contains(&Point::new(x, y))
    }

    fn aabb(&self) -> Aabb {
        match self.polygon.bounding_rect() {
            Some(rect) => Aabb::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y),
            None => Aabb::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    fn measure(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    fn rotated(&self, angle: f64, center: (f64, f64)) -> Self {
        let rotate_ring = |ring: &Vec<(f64, f64)>| -> Vec<(f64, f64)> {
            ring.iter()
                .map(|&p| rotate_point(p, angle, center))
                .collect()
        };
        Self::with_rings(
            rotate_ring(&self.exterior),
            self.holes.iter().map(rotate_ring).collect(),
        )
    }

    fn validate(&self) -> Result<()> {
        if self.exterior.len() < 3 {
            return Err(Error::InvalidBoundary(format!(
                "boundary needs at least 3 vertices, got {}",
                self.exterior.len()
            )));
        }
        let finite = std::iter::once(&self.exterior)
            .chain(self.holes.iter())
            .flatten()
            .all(|(x, y)| x.is_finite() && y.is_finite());
        if !finite {
            return Err(Error::InvalidBoundary(
                "boundary vertices must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Finds the rotation (radians, in `[0, pi/2]`) that minimises the area of the
/// boundary's axis-aligned bounding box.
///
/// The boundary is rotated about the centre of its unrotated bounding box in
/// steps of `step_deg` degrees. The first minimum wins.
pub fn best_fit_rotation<B: Boundary>(boundary: &B, step_deg: f64) -> f64 {
    if step_deg <= 0.0 || !step_deg.is_finite() {
        return 0.0;
    }
    let center = boundary.aabb().center();
    let steps = (90.0 / step_deg).round() as usize;

    let mut best_angle = 0.0;
    let mut best_area = boundary.aabb().area();
    for k in 1..=steps {
        let angle = (k as f64 * step_deg).min(90.0).to_radians();
        let area = boundary.rotated(angle, center).aabb().area();
        if area < best_area {
            best_area = area;
            best_angle = angle;
        }
    }
    best_angle
}
