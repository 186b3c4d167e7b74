//! Room stamps: the cell pattern of one room plus its corridor skirt.

use crate::grid::CellState;
use rand::Rng;
use u_floorplan_core::{CorridorStyle, SolverConfig};

/// A rectangular cell pattern, indexed `[i, j]` with `i` along x.
///
/// Corridor cells are placed along the `i == 0` and/or `j == 0` edges (and
/// the far edges for [`CorridorStyle::AllSides`]); the rest belongs to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomStamp {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl RoomStamp {
    /// Builds a stamp from a cell function.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> CellState) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for i in 0..width {
            for j in 0..height {
                cells.push(f(i, j));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Extent along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Extent along y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(i, j)`.
    pub fn at(&self, i: usize, j: usize) -> CellState {
        self.cells[i * self.height + j]
    }

    /// Number of room (non-corridor) cells.
    pub fn room_cell_count(&self) -> usize {
        self.cells.iter().filter(|s| s.room_id().is_some()).count()
    }

    /// Number of corridor cells.
    pub fn corridor_cell_count(&self) -> usize {
        self.cells.iter().filter(|s| s.is_corridor()).count()
    }
}

/// Produces randomly proportioned stamps for a corridor policy.
#[derive(Debug, Clone, Copy)]
pub struct RoomShapeSynthesizer {
    style: CorridorStyle,
    corridors_as_additional_space: bool,
    max_ratio: f64,
}

impl RoomShapeSynthesizer {
    /// Creates a synthesizer.
    pub fn new(style: CorridorStyle, corridors_as_additional_space: bool, max_ratio: f64) -> Self {
        Self {
            style,
            corridors_as_additional_space,
            max_ratio: if max_ratio.is_finite() {
                max_ratio.max(1.0)
            } else {
                1.0
            },
        }
    }

    /// Creates a synthesizer from the solver configuration.
    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(
            config.corridor_style,
            config.corridors_as_additional_space,
            config.max_room_ratio,
        )
    }

    /// Builds a stamp for a room of `area` cells.
    ///
    /// The aspect ratio is drawn from `[1, max_ratio]` and the axes are swapped
    /// half of the time, so repeated calls give different shapes. Halls always
    /// get corridors on all sides.
    pub fn synthesize<R: Rng>(&self, area: f64, room_id: usize, is_hall: bool, rng: &mut R) -> RoomStamp {
        let ratio = rng.gen_range(1.0..=self.max_ratio);
        let base = (area.max(0.0) / ratio).sqrt();
        let mut x = (base.round() as i64).max(1);
        let mut y = ((ratio * base).round() as i64).max(1);
        if rng.gen_bool(0.5) {
            std::mem::swap(&mut x, &mut y);
        }

        let room = CellState::Room(room_id);
        let style = if is_hall {
            CorridorStyle::AllSides
        } else {
            self.style
        };
        let shrink = |dim: i64, by: i64| {
            if self.corridors_as_additional_space {
                dim
            } else {
                (dim - by).max(1)
            }
        };

        match style {
            CorridorStyle::OneSide => {
                if rng.gen_bool(0.5) {
                    let x = shrink(x, 1) as usize;
                    RoomStamp::from_fn(x + 1, y as usize, |i, _| {
                        if i == 0 {
                            CellState::Corridor
                        } else {
                            room
                        }
                    })
                } else {
                    let y = shrink(y, 1) as usize;
                    RoomStamp::from_fn(x as usize, y + 1, |_, j| {
                        if j == 0 {
                            CellState::Corridor
                        } else {
                            room
                        }
                    })
                }
            }
            CorridorStyle::TwoSides => {
                let (x, y) = (shrink(x, 1) as usize, shrink(y, 1) as usize);
                RoomStamp::from_fn(x + 1, y + 1, |i, j| {
                    if i == 0 || j == 0 {
                        CellState::Corridor
                    } else {
                        room
                    }
                })
            }
            CorridorStyle::AllSides => {
                let (x, y) = (shrink(x, 2) as usize, shrink(y, 2) as usize);
                RoomStamp::from_fn(x + 2, y + 2, |i, j| {
                    if i == 0 || j == 0 || i == x + 1 || j == y + 1 {
                        CellState::Corridor
                    } else {
                        room
                    }
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_two_sides_square() {
        let synth = RoomShapeSynthesizer::new(CorridorStyle::TwoSides, true, 1.0);
        let stamp = synth.synthesize(25.0, 3, false, &mut rng());
        assert_eq!((stamp.width(), stamp.height()), (6, 6));
        assert_eq!(stamp.room_cell_count(), 25);
        assert_eq!(stamp.corridor_cell_count(), 11);
        assert_eq!(stamp.at(0, 3), CellState::Corridor);
        assert_eq!(stamp.at(3, 0), CellState::Corridor);
        assert_eq!(stamp.at(5, 5), CellState::Room(3));
    }

    #[test]
    fn test_two_sides_inclusive_footprint() {
        let synth = RoomShapeSynthesizer::new(CorridorStyle::TwoSides, false, 1.0);
        let stamp = synth.synthesize(25.0, 1, false, &mut rng());
        assert_eq!((stamp.width(), stamp.height()), (5, 5));
        assert_eq!(stamp.room_cell_count(), 16);
    }

    #[test]
    fn test_all_sides_border() {
        let synth = RoomShapeSynthesizer::new(CorridorStyle::AllSides, true, 1.0);
        let stamp = synth.synthesize(9.0, 2, false, &mut rng());
        assert_eq!((stamp.width(), stamp.height()), (5, 5));
        assert_eq!(stamp.room_cell_count(), 9);
        for k in 0..5 {
            assert!(stamp.at(0, k).is_corridor());
            assert!(stamp.at(4, k).is_corridor());
            assert!(stamp.at(k, 0).is_corridor());
            assert!(stamp.at(k, 4).is_corridor());
        }
    }

    #[test]
    fn test_hall_forces_all_sides() {
        let synth = RoomShapeSynthesizer::new(CorridorStyle::OneSide, true, 1.0);
        let stamp = synth.synthesize(4.0, 1, true, &mut rng());
        assert_eq!((stamp.width(), stamp.height()), (4, 4));
        assert_eq!(stamp.room_cell_count(), 4);
    }

    #[test]
    fn test_one_side_has_single_strip() {
        let synth = RoomShapeSynthesizer::new(CorridorStyle::OneSide, true, 1.0);
        let mut rng = rng();
        for _ in 0..20 {
            let stamp = synth.synthesize(16.0, 1, false, &mut rng);
            assert_eq!(stamp.room_cell_count(), 16);
            assert_eq!(stamp.corridor_cell_count(), 4);
            assert!(stamp.at(0, 0).is_corridor());
        }
    }

    #[test]
    fn test_tiny_area_clamps_to_one_cell() {
        let synth = RoomShapeSynthesizer::new(CorridorStyle::AllSides, false, 2.0);
        let stamp = synth.synthesize(0.2, 1, false, &mut rng());
        assert_eq!((stamp.width(), stamp.height()), (3, 3));
        assert_eq!(stamp.room_cell_count(), 1);
    }

    #[test]
    fn test_ratio_bounds_respected() {
        let synth = RoomShapeSynthesizer::new(CorridorStyle::TwoSides, true, 2.0);
        let mut rng = rng();
        for _ in 0..50 {
            let stamp = synth.synthesize(50.0, 1, false, &mut rng);
            let (w, h) = (stamp.width() - 1, stamp.height() - 1);
            let ratio = w.max(h) as f64 / w.min(h) as f64;
            assert!(ratio <= 2.5, "ratio {ratio} out of range");
        }
    }

    #[test]
    fn test_stamps_vary() {
        let synth = RoomShapeSynthesizer::new(CorridorStyle::TwoSides, true, 2.0);
        let mut rng = rng();
        let shapes: std::collections::HashSet<_> = (0..40)
            .map(|_| {
                let s = synth.synthesize(30.0, 1, false, &mut rng);
                (s.width(), s.height())
            })
            .collect();
        assert!(shapes.len() > 1);
    }
}
