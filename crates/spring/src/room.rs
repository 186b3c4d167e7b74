//! Axis-aligned rooms in continuous space.
//!
//! A room keeps its area fixed; the height is derived from the area and
//! the width, so changing the proportions never changes the area.

use u_floorplan_core::Aabb;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangular room.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Room2D {
    /// Center x coordinate.
    pub center_x: f64,
    /// Center y coordinate.
    pub center_y: f64,
    /// Extent along x.
    pub width: f64,
    /// Room area; the height is `area / width`.
    pub area: f64,
}

impl Room2D {
    /// Creates a room from its center and dimensions.
    pub fn new(center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self {
            center_x,
            center_y,
            width,
            area: width * height,
        }
    }

    /// Creates a room covering a bounding box.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        let (cx, cy) = aabb.center();
        Self::new(cx, cy, aabb.width(), aabb.height())
    }

    /// Creates a square room of `area` centred on `(cx, cy)`.
    pub fn square(cx: f64, cy: f64, area: f64) -> Self {
        let side = area.max(0.0).sqrt();
        Self::new(cx, cy, side, side)
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        if self.width > 0.0 {
            self.area / self.width
        } else {
            0.0
        }
    }

    /// Sets the height, adjusting the width to keep the area.
    pub fn set_height(&mut self, height: f64) {
        if height > 0.0 {
            self.width = self.area / height;
        }
    }

    /// Width over height.
    pub fn proportion(&self) -> f64 {
        self.width / self.height()
    }

    /// Returns true if the proportion lies strictly between
    /// `1 / threshold` and `threshold`.
    pub fn is_well_proportioned(&self, threshold: f64) -> bool {
        let p = self.proportion();
        p > 1.0 / threshold && p < threshold
    }

    /// Bounding box of the room.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.center_x, self.center_y, self.width, self.height())
    }

    /// Center point.
    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    /// Corner ring in counter-clockwise order.
    pub fn corners(&self) -> Vec<(f64, f64)> {
        self.aabb().corners()
    }

    /// Corner ring in the `[x, y]` layout used for polygon clipping.
    pub fn contour(&self) -> Vec<[f64; 2]> {
        self.corners().into_iter().map(|(x, y)| [x, y]).collect()
    }

    /// Moves the room.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.center_x += dx;
        self.center_y += dy;
    }

    /// Scales the room along x by `sx` and along y by `sy`, keeping the
    /// point `anchor` fixed. The area scales by `sx * sy`.
    pub fn scale_about(&mut self, anchor: (f64, f64), sx: f64, sy: f64) {
        let height = self.height() * sy;
        self.center_x = anchor.0 + (self.center_x - anchor.0) * sx;
        self.center_y = anchor.1 + (self.center_y - anchor.1) * sy;
        self.width *= sx;
        self.area = self.width * height;
    }

    /// Scales both axes by `factor` about the room center.
    pub fn scale_uniform(&mut self, factor: f64) {
        let center = self.center();
        self.scale_about(center, factor, factor);
    }

    /// Edge-to-edge gaps `(gap_x, gap_y)` to another room. Negative values
    /// mean the projections on that axis overlap.
    pub fn gaps_to(&self, other: &Room2D) -> (f64, f64) {
        let gap_x = (self.center_x - other.center_x).abs() - (self.width + other.width) / 2.0;
        let gap_y = (self.center_y - other.center_y).abs() - (self.height() + other.height()) / 2.0;
        (gap_x, gap_y)
    }

    /// Distance by which the room fails to touch `other`; zero when the
    /// rooms touch or overlap.
    pub fn gap_to(&self, other: &Room2D) -> f64 {
        let (gap_x, gap_y) = self.gaps_to(other);
        gap_x.max(gap_y).max(0.0)
    }

    /// Returns true if `other` lies inside this room.
    pub fn contains(&self, other: &Room2D) -> bool {
        let (a, b) = (self.aabb(), other.aabb());
        a.min_x <= b.min_x && a.min_y <= b.min_y && a.max_x >= b.max_x && a.max_y >= b.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_height_from_area() {
        let mut room = Room2D::new(0.0, 0.0, 4.0, 3.0);
        assert_relative_eq!(room.area, 12.0);
        assert_relative_eq!(room.height(), 3.0);
        room.set_height(6.0);
        assert_relative_eq!(room.width, 2.0);
        assert_relative_eq!(room.area, 12.0);
    }

    #[test]
    fn test_scale_about_edge() {
        let mut room = Room2D::new(2.0, 1.0, 4.0, 2.0);
        // Shrink along x towards the right edge, stretch y to keep the area.
        room.scale_about((4.0, 1.0), 0.5, 2.0);
        assert_relative_eq!(room.width, 2.0);
        assert_relative_eq!(room.height(), 4.0);
        assert_relative_eq!(room.center_x, 3.0);
        assert_relative_eq!(room.center_y, 1.0);
        assert_relative_eq!(room.area, 8.0);
    }

    #[test]
    fn test_gap_to() {
        let a = Room2D::new(0.0, 0.0, 2.0, 2.0);
        let b = Room2D::new(5.0, 0.5, 2.0, 2.0);
        assert_relative_eq!(a.gap_to(&b), 3.0);
        let touching = Room2D::new(2.0, 0.0, 2.0, 2.0);
        assert_relative_eq!(a.gap_to(&touching), 0.0);
        let overlapping = Room2D::new(1.0, 1.0, 2.0, 2.0);
        assert_relative_eq!(a.gap_to(&overlapping), 0.0);
    }

    #[test]
    fn test_proportion_threshold() {
        let room = Room2D::new(0.0, 0.0, 3.0, 2.0);
        assert!(room.is_well_proportioned(2.0));
        assert!(!room.is_well_proportioned(1.2));
        assert!(!Room2D::square(0.0, 0.0, 4.0).is_well_proportioned(1.0));
    }

    #[test]
    fn test_contains() {
        let outer = Room2D::new(0.0, 0.0, 10.0, 10.0);
        let inner = Room2D::new(1.0, 1.0, 2.0, 2.0);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }
}
