//! Direction algebra.
//!
//! Absolute directions turn on the cycle North -> East -> South -> West. Every
//! traveler-relative question (which side a door is on, where a hallway opens)
//! is answered by comparing against `right()` / `left()` / `opposite()` of the
//! travel direction, so the four headings share one rule set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Orientation used when a facing word cannot be understood.
pub const DEFAULT_ORIENTATION: Direction = Direction::East;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Slot order used by adjacency tables.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Rotated +90 degrees.
    pub fn right(self) -> Direction {
        Self::ALL[(self.index() + 1) % 4]
    }

    /// Rotated -90 degrees.
    pub fn left(self) -> Direction {
        Self::ALL[(self.index() + 3) % 4]
    }

    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 2) % 4]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        }
    }

    /// Lenient parse used by the command line: unknown words fall back to
    /// [`DEFAULT_ORIENTATION`].
    pub fn parse_or_default(word: &str) -> Direction {
        word.parse().unwrap_or(DEFAULT_ORIENTATION)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "east" | "e" => Ok(Direction::East),
            "south" | "s" => Ok(Direction::South),
            "west" | "w" => Ok(Direction::West),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// Which wall of its hallway a door sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wall {
    North,
    South,
    East,
    West,
    Intersection,
}

impl Wall {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Wall::North => Some(Direction::North),
            Wall::South => Some(Direction::South),
            Wall::East => Some(Direction::East),
            Wall::West => Some(Direction::West),
            Wall::Intersection => None,
        }
    }

    /// Parses a map token. Anything that is not a cardinal direction tags an
    /// intersection, matching how door files mark fork vertices.
    pub fn from_token(token: &str) -> Wall {
        match token.parse::<Direction>() {
            Ok(Direction::North) => Wall::North,
            Ok(Direction::South) => Wall::South,
            Ok(Direction::East) => Wall::East,
            Ok(Direction::West) => Wall::West,
            Err(_) => Wall::Intersection,
        }
    }
}

impl From<Direction> for Wall {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::North => Wall::North,
            Direction::South => Wall::South,
            Direction::East => Wall::East,
            Direction::West => Wall::West,
        }
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction() {
            Some(direction) => write!(f, "{}", direction),
            None => f.write_str("Intersection"),
        }
    }
}

/// Side of the traveler a door is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("Left"),
            Side::Right => f.write_str("Right"),
        }
    }
}

/// Traveler-centric position of an absolute direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relative {
    Front,
    Left,
    Right,
    Behind,
}

impl Relative {
    pub fn label(self) -> &'static str {
        match self {
            Relative::Front => "in front of you",
            Relative::Behind => "behind you",
            Relative::Left => "to your left",
            Relative::Right => "to your right",
        }
    }

    /// Wording used when a branch takes this opening.
    pub fn turn_phrase(self) -> &'static str {
        match self {
            Relative::Front => "going straight",
            Relative::Left => "turning left",
            Relative::Right => "turning right",
            Relative::Behind => "turning back",
        }
    }
}

impl fmt::Display for Relative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four absolute directions seen from a facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bearings {
    pub right: Direction,
    pub left: Direction,
    pub forward: Direction,
    pub backward: Direction,
}

impl Bearings {
    /// Right, left, forward, backward: the order sections are emitted in.
    pub fn ordered(&self) -> [(Relative, Direction); 4] {
        [
            (Relative::Right, self.right),
            (Relative::Left, self.left),
            (Relative::Front, self.forward),
            (Relative::Behind, self.backward),
        ]
    }
}

pub fn rotate(orientation: Direction) -> Bearings {
    Bearings {
        right: orientation.right(),
        left: orientation.left(),
        forward: orientation,
        backward: orientation.opposite(),
    }
}

/// Side of a door on `wall` for someone traveling `travel`. Walls parallel to
/// the travel direction, and intersections, have no side.
pub fn relative_side(travel: Direction, wall: Wall) -> Option<Side> {
    let wall = wall.direction()?;
    if wall == travel.right() {
        Some(Side::Right)
    } else if wall == travel.left() {
        Some(Side::Left)
    } else {
        None
    }
}

pub fn relative_label(travel: Direction, open: Direction) -> Relative {
    if open == travel {
        Relative::Front
    } else if open == travel.opposite() {
        Relative::Behind
    } else if open == travel.right() {
        Relative::Right
    } else {
        Relative::Left
    }
}
