//! House programs: the rooms to place and the adjacencies between them.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Marker prepended to hall room names in solver output so renderers can
/// tell circulation spaces apart.
pub const HALL_PREFIX: &str = "&&HALL&&";

/// Area used when a text program lists no areas at all.
pub const DEFAULT_ROOM_AREA: f64 = 40.0;

/// A room to be placed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Room {
    /// Stable 1-based identifier.
    pub id: usize,
    /// Target area in world units.
    pub area: f64,
    /// Display name.
    pub name: String,
    /// Hall rooms are circulation spaces and get corridors on all sides.
    pub is_hall: bool,
    /// Set after solving when one of the room's adjacencies is unmet.
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_missing_adjacency: bool,
}

impl Room {
    /// Creates a room with the default name `"Room {id}"`.
    pub fn new(id: usize, area: f64) -> Self {
        Self {
            id,
            area,
            name: format!("Room {id}"),
            is_hall: false,
            has_missing_adjacency: false,
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the room as a hall.
    pub fn with_hall(mut self, is_hall: bool) -> Self {
        self.is_hall = is_hall;
        self
    }

    /// Name as emitted in results: halls carry [`HALL_PREFIX`].
    pub fn display_name(&self) -> String {
        if self.is_hall {
            format!("{HALL_PREFIX}{}", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// An unordered pair of room ids that should end up next to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdjacencyPair {
    /// First room id.
    pub a: usize,
    /// Second room id.
    pub b: usize,
}

impl AdjacencyPair {
    /// Creates a new pair.
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// Returns true if the pair touches `id`.
    pub fn contains(&self, id: usize) -> bool {
        self.a == id || self.b == id
    }

    /// Returns the other endpoint if the pair touches `id`.
    pub fn other(&self, id: usize) -> Option<usize> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }

    /// Parses a pair written as `"1-2"`. Whitespace is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let mut parts = compact.split('-');
        let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::ParseError(format!(
                "adjacency '{text}' must have the form 'a-b'"
            )));
        };
        let parse_id = |s: &str| {
            s.parse::<usize>()
                .map_err(|_| Error::ParseError(format!("invalid room id '{s}' in '{text}'")))
        };
        Ok(Self::new(parse_id(a)?, parse_id(b)?))
    }
}

/// The rooms, adjacency requirements and optional entrance room of one house.
///
/// Duplicate adjacency pairs are kept: each copy adds to the placement
/// priority of its rooms.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HouseProgram {
    rooms: Vec<Room>,
    adjacency: Vec<AdjacencyPair>,
    entrance_id: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    entrance_point: Option<(f64, f64)>,
}

impl HouseProgram {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a room with the next free id.
    pub fn with_room(mut self, area: f64) -> Self {
        self.add_room(area, None, false);
        self
    }

    /// Appends a named room with the next free id.
    pub fn with_named_room(mut self, area: f64, name: impl Into<String>, is_hall: bool) -> Self {
        self.add_room(area, Some(name.into()), is_hall);
        self
    }

    /// Adds an adjacency requirement between two room ids.
    pub fn with_adjacency(mut self, a: usize, b: usize) -> Self {
        self.adjacency.push(AdjacencyPair::new(a, b));
        self
    }

    /// Sets the room that must be placed first, at the entrance.
    pub fn with_entrance(mut self, id: usize) -> Self {
        self.entrance_id = Some(id);
        self
    }

    /// Sets the world-space point where circulation starts.
    pub fn with_entrance_point(mut self, x: f64, y: f64) -> Self {
        self.entrance_point = Some((x, y));
        self
    }

    /// Appends a room and returns its id.
    pub fn add_room(&mut self, area: f64, name: Option<String>, is_hall: bool) -> usize {
        let id = self.rooms.len() + 1;
        let mut room = Room::new(id, area).with_hall(is_hall);
        if let Some(name) = name {
            room.name = name;
        }
        self.rooms.push(room);
        id
    }

    /// Builds a validated program from explicit parts.
    pub fn from_parts(
        rooms: Vec<Room>,
        adjacency: Vec<AdjacencyPair>,
        entrance_id: Option<usize>,
    ) -> Result<Self> {
        let program = Self {
            rooms,
            adjacency,
            entrance_id,
            entrance_point: None,
        };
        program.validate()?;
        Ok(program)
    }

    /// Builds a program from parallel text lists.
    ///
    /// Missing names default to `"Room N"`, missing hall flags to `false`, and
    /// an empty area list to a single room of [`DEFAULT_ROOM_AREA`].
    /// Adjacencies are written `"a-b"` with 1-based ids.
    pub fn from_text<S: AsRef<str>>(
        areas: &[f64],
        names: &[S],
        halls: &[bool],
        adjacency: &[S],
    ) -> Result<Self> {
        let areas: Vec<f64> = if areas.is_empty() {
            vec![DEFAULT_ROOM_AREA]
        } else {
            areas.to_vec()
        };

        let mut program = Self::new();
        for (i, &area) in areas.iter().enumerate() {
            let name = names
                .get(i)
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty());
            let is_hall = halls.get(i).copied().unwrap_or(false);
            program.add_room(area, name, is_hall);
        }

        for text in adjacency {
            let text = text.as_ref();
            if text.trim().is_empty() {
                continue;
            }
            program.adjacency.push(AdjacencyPair::parse(text)?);
        }

        program.validate()?;
        Ok(program)
    }

    /// Checks room areas, ids, adjacency endpoints and the entrance id.
    pub fn validate(&self) -> Result<()> {
        for (i, room) in self.rooms.iter().enumerate() {
            if room.id != i + 1 {
                return Err(Error::InvalidProgram(format!(
                    "room at position {} has id {}, expected {}",
                    i,
                    room.id,
                    i + 1
                )));
            }
            if !room.area.is_finite() || room.area <= 0.0 {
                return Err(Error::InvalidProgram(format!(
                    "room {} has non-positive area {}",
                    room.id, room.area
                )));
            }
        }

        let room_count = self.rooms.len();
        for pair in &self.adjacency {
            let in_range = |id: usize| (1..=room_count).contains(&id);
            if pair.a == pair.b || !in_range(pair.a) || !in_range(pair.b) {
                return Err(Error::InvalidAdjacency {
                    a: pair.a,
                    b: pair.b,
                    room_count,
                });
            }
        }

        if let Some((x, y)) = self.entrance_point {
            if !x.is_finite() || !y.is_finite() {
                return Err(Error::InvalidProgram(
                    "entrance point must be finite".into(),
                ));
            }
        }

        if let Some(id) = self.entrance_id {
            if !(1..=room_count).contains(&id) {
                return Err(Error::InvalidProgram(format!(
                    "entrance room {id} does not exist"
                )));
            }
        }
        Ok(())
    }

    /// All rooms in id order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Looks up a room by id.
    pub fn room(&self, id: usize) -> Option<&Room> {
        id.checked_sub(1).and_then(|i| self.rooms.get(i))
    }

    /// Looks up a room by id for modification.
    pub fn room_mut(&mut self, id: usize) -> Option<&mut Room> {
        id.checked_sub(1).and_then(move |i| self.rooms.get_mut(i))
    }

    /// Number of rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Returns true if the program has no rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// The adjacency multiset.
    pub fn adjacency(&self) -> &[AdjacencyPair] {
        &self.adjacency
    }

    /// The room forced to be placed first, if any.
    pub fn entrance_id(&self) -> Option<usize> {
        self.entrance_id
    }

    /// The point where circulation starts, if any.
    pub fn entrance_point(&self) -> Option<(f64, f64)> {
        self.entrance_point
    }

    /// Ids adjacent to `id`, once per adjacency pair (duplicates included).
    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.iter().filter_map(move |pair| pair.other(id))
    }

    /// Sum of all room areas.
    pub fn total_area(&self) -> f64 {
        self.rooms.iter().map(|r| r.area).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_assigns_ids() {
        let program = HouseProgram::new()
            .with_room(20.0)
            .with_named_room(30.0, "Hall", true)
            .with_adjacency(1, 2);
        assert_eq!(program.room_count(), 2);
        assert_eq!(program.room(1).unwrap().name, "Room 1");
        assert_eq!(program.room(2).unwrap().display_name(), "&&HALL&&Hall");
        assert!(program.room(0).is_none());
        assert!(program.validate().is_ok());
    }

    #[test]
    fn test_parse_adjacency() {
        assert_eq!(AdjacencyPair::parse(" 1 - 2 ").unwrap(), AdjacencyPair::new(1, 2));
        assert!(AdjacencyPair::parse("1-2-3").is_err());
        assert!(AdjacencyPair::parse("12").is_err());
        assert!(AdjacencyPair::parse("a-2").is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_adjacency() {
        let program = HouseProgram::new().with_room(10.0).with_adjacency(1, 2);
        assert!(matches!(
            program.validate(),
            Err(Error::InvalidAdjacency {
                a: 1,
                b: 2,
                room_count: 1
            })
        ));
    }

    #[test]
    fn test_validate_rejects_self_loop_and_bad_area() {
        let looped = HouseProgram::new().with_room(10.0).with_adjacency(1, 1);
        assert!(looped.validate().is_err());

        let negative = HouseProgram::new().with_room(-1.0);
        assert!(negative.validate().is_err());

        let entrance = HouseProgram::new().with_room(10.0).with_entrance(3);
        assert!(entrance.validate().is_err());
    }

    #[test]
    fn test_from_text_defaults() {
        let empty: [&str; 0] = [];
        let program = HouseProgram::from_text(&[], &empty, &[], &empty).unwrap();
        assert_eq!(program.room_count(), 1);
        assert_eq!(program.rooms()[0].area, DEFAULT_ROOM_AREA);
        assert_eq!(program.rooms()[0].name, "Room 1");
        assert!(!program.rooms()[0].is_hall);
    }

    #[test]
    fn test_from_text_full() {
        let program = HouseProgram::from_text(
            &[20.0, 30.0, 15.0],
            &["Kitchen", "", "Corridor"],
            &[false, false, true],
            &["1-2", " 2 - 3", ""],
        )
        .unwrap();
        assert_eq!(program.rooms()[0].name, "Kitchen");
        assert_eq!(program.rooms()[1].name, "Room 2");
        assert!(program.rooms()[2].is_hall);
        assert_eq!(program.adjacency().len(), 2);
        assert_eq!(program.neighbors(2).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_from_text_rejects_out_of_range() {
        let result = HouseProgram::from_text(&[20.0], &["A"], &[], &["1-4"]);
        assert!(matches!(result, Err(Error::InvalidAdjacency { .. })));
    }

    #[test]
    fn test_duplicate_adjacency_kept() {
        let program = HouseProgram::new()
            .with_room(10.0)
            .with_room(10.0)
            .with_adjacency(1, 2)
            .with_adjacency(2, 1);
        assert!(program.validate().is_ok());
        assert_eq!(program.neighbors(1).count(), 2);
    }
}
