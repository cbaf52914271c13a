use serde::{Deserialize, Serialize};
use wayfinder_core::{Direction, Wall};

use crate::ForkKind;

/// Name of the building entrance.
pub const ENTRANCE: &str = "maindoor";

const INTERSECTION_PREFIX: &str = "intersection";

/// Index of a vertex in its [`crate::BuildingMap`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    name: String,
    wall: Wall,
    adjacent: [Option<VertexId>; 4],
}

impl Vertex {
    pub fn new(name: impl Into<String>, wall: Wall) -> Self {
        Self {
            name: name.into(),
            wall,
            adjacent: [None; 4],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wall(&self) -> Wall {
        self.wall
    }

    pub fn neighbor(&self, direction: Direction) -> Option<VertexId> {
        self.adjacent[direction.index()]
    }

    pub(crate) fn set_neighbor(&mut self, direction: Direction, id: VertexId) {
        self.adjacent[direction.index()] = Some(id);
    }

    /// Number of occupied adjacency slots (0-4).
    pub fn degree(&self) -> usize {
        self.adjacent.iter().filter(|slot| slot.is_some()).count()
    }

    /// Occupied directions in North, East, South, West order.
    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |d| self.neighbor(*d).is_some())
    }

    /// True when the name follows the `intersection<digit>` convention.
    pub fn is_intersection(&self) -> bool {
        is_intersection_name(&self.name)
    }
}

pub fn is_intersection_name(name: &str) -> bool {
    match name.strip_prefix(INTERSECTION_PREFIX) {
        Some(rest) => rest.len() == 1 && rest.as_bytes()[0].is_ascii_digit(),
        None => false,
    }
}

/// Fork type implied by an intersection's name: trailing `0` is an L, any
/// other digit a T. Only used to describe where the traveler stands; the
/// traversal classifies forks from their live degree.
pub fn named_fork_kind(name: &str) -> Option<ForkKind> {
    if !is_intersection_name(name) {
        return None;
    }
    if name.ends_with('0') {
        Some(ForkKind::L)
    } else {
        Some(ForkKind::T)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_names() {
        assert!(is_intersection_name("intersection0"));
        assert!(is_intersection_name("intersection7"));
        assert!(!is_intersection_name("intersection"));
        assert!(!is_intersection_name("intersection12"));
        assert!(!is_intersection_name("intersectionA"));
        assert!(!is_intersection_name("2.102"));
    }

    #[test]
    fn test_named_fork_kind() {
        assert_eq!(named_fork_kind("intersection0"), Some(ForkKind::L));
        assert_eq!(named_fork_kind("intersection3"), Some(ForkKind::T));
        assert_eq!(named_fork_kind(ENTRANCE), None);
    }

    #[test]
    fn test_degree_and_open_directions() {
        let mut v = Vertex::new("2.110", Wall::North);
        assert_eq!(v.degree(), 0);
        v.set_neighbor(Direction::West, VertexId(3));
        v.set_neighbor(Direction::North, VertexId(1));
        assert_eq!(v.degree(), 2);
        let open: Vec<_> = v.open_directions().collect();
        assert_eq!(open, vec![Direction::North, Direction::West]);
    }
}
