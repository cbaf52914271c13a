use crate::{BuildingMap, VertexId};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;
use wayfinder_core::{relative_side, Direction, NavError, Result, Side};

/// Vertices already entered during one traversal.
pub type Visited = HashSet<VertexId>;

/// A door passed while walking a hallway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    /// 1-based order along the hallway
    pub position: usize,
    pub name: String,
    /// `None` when the door's wall is parallel to travel
    pub side: Option<Side>,
}

/// Result of walking one straight hallway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hallway {
    pub direction: Direction,
    pub rooms: Vec<Room>,
    /// Vertex the walk stopped on: the intersection that ended it, or the
    /// last door when the hallway simply runs out.
    #[serde(skip)]
    pub stop: Option<VertexId>,
}

impl Hallway {
    /// The stop vertex, if it opens in more than one direction.
    pub fn fork(&self, map: &BuildingMap) -> Option<VertexId> {
        self.stop.filter(|id| map.degree(*id) > 1)
    }
}

/// Lazy walk down a hallway, one [`Room`] per step.
///
/// Stops before an `intersection<digit>` vertex or after the last door.
/// Entering a vertex already in `visited` yields [`NavError::CycleDetected`]
/// once and then ends.
pub struct HallwayWalk<'a> {
    map: &'a BuildingMap,
    direction: Direction,
    next: Option<VertexId>,
    stop: Option<VertexId>,
    visited: &'a mut Visited,
    position: usize,
}

impl<'a> HallwayWalk<'a> {
    pub fn new(
        map: &'a BuildingMap,
        anchor: VertexId,
        direction: Direction,
        visited: &'a mut Visited,
    ) -> Self {
        Self {
            map,
            direction,
            next: map.neighbor(anchor, direction),
            stop: None,
            visited,
            position: 0,
        }
    }

    /// Where the walk ended; meaningful once the iterator is exhausted.
    pub fn stop(&self) -> Option<VertexId> {
        self.stop
    }
}

impl Iterator for HallwayWalk<'_> {
    type Item = Result<Room>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        let vertex = self.map.vertex(id);

        if !self.visited.insert(id) {
            return Some(Err(NavError::CycleDetected(vertex.name().to_string())));
        }

        self.stop = Some(id);
        if vertex.is_intersection() {
            return None;
        }

        self.next = vertex.neighbor(self.direction);
        self.position += 1;
        Some(Ok(Room {
            position: self.position,
            name: vertex.name().to_string(),
            side: relative_side(self.direction, vertex.wall()),
        }))
    }
}

/// Walks from `anchor` (exclusive) in `direction`, recording every vertex
/// entered in `visited`.
pub fn walk(
    map: &BuildingMap,
    anchor: VertexId,
    direction: Direction,
    visited: &mut Visited,
) -> Result<Hallway> {
    let mut walker = HallwayWalk::new(map, anchor, direction, visited);
    let rooms = walker.by_ref().collect::<Result<Vec<_>>>()?;
    let stop = walker.stop();

    debug!(
        from = map.vertex(anchor).name(),
        %direction,
        rooms = rooms.len(),
        stop = stop.map(|id| map.vertex(id).name()),
        "walked hallway"
    );

    Ok(Hallway {
        direction,
        rooms,
        stop,
    })
}

/// Room sequence from `anchor` with a fresh visited set.
pub fn rooms(map: &BuildingMap, anchor: VertexId, direction: Direction) -> Result<Vec<Room>> {
    let mut visited = Visited::new();
    visited.insert(anchor);
    Ok(walk(map, anchor, direction, &mut visited)?.rooms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::Wall;

    // a -E-> b -E-> c -E-> intersection1 -E-> d
    fn corridor() -> BuildingMap {
        let mut map = BuildingMap::new();
        map.add_vertex("a", Wall::North).unwrap();
        map.add_vertex("b", Wall::South).unwrap();
        map.add_vertex("c", Wall::East).unwrap();
        map.add_vertex("intersection1", Wall::Intersection).unwrap();
        map.add_vertex("d", Wall::North).unwrap();
        map.connect("a", "b", Direction::East).unwrap();
        map.connect("b", "c", Direction::East).unwrap();
        map.connect("c", "intersection1", Direction::East).unwrap();
        map.connect("intersection1", "d", Direction::East).unwrap();
        map
    }

    #[test]
    fn test_walk_stops_before_intersection() {
        let map = corridor();
        let a = map.id_of("a").unwrap();
        let mut visited = Visited::from([a]);
        let hallway = walk(&map, a, Direction::East, &mut visited).unwrap();

        assert_eq!(
            hallway.rooms,
            vec![
                Room {
                    position: 1,
                    name: "b".into(),
                    side: Some(Side::Right)
                },
                Room {
                    position: 2,
                    name: "c".into(),
                    side: None
                },
            ]
        );
        assert_eq!(hallway.stop, map.id_of("intersection1"));
        assert_eq!(hallway.fork(&map), map.id_of("intersection1"));
    }

    #[test]
    fn test_walk_to_dead_end() {
        let map = corridor();
        let i = map.id_of("intersection1").unwrap();
        let hallway = walk(&map, i, Direction::East, &mut Visited::from([i])).unwrap();
        assert_eq!(hallway.rooms.len(), 1);
        assert_eq!(hallway.stop, map.id_of("d"));
        assert_eq!(hallway.fork(&map), None);
    }

    #[test]
    fn test_walk_without_neighbor_is_empty() {
        let map = corridor();
        let a = map.id_of("a").unwrap();
        let hallway = walk(&map, a, Direction::North, &mut Visited::new()).unwrap();
        assert!(hallway.rooms.is_empty());
        assert_eq!(hallway.stop, None);
    }

    #[test]
    fn test_walk_is_restartable() {
        let map = corridor();
        let a = map.id_of("a").unwrap();
        let first = rooms(&map, a, Direction::East).unwrap();
        let second = rooms(&map, a, Direction::East).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_walk_detects_loop() {
        let mut map = BuildingMap::new();
        map.add_vertex("x", Wall::North).unwrap();
        map.add_vertex("y", Wall::North).unwrap();
        map.connect("x", "y", Direction::East).unwrap();
        map.connect("y", "x", Direction::East).unwrap();

        let x = map.id_of("x").unwrap();
        let err = rooms(&map, x, Direction::East).unwrap_err();
        assert!(matches!(err, NavError::CycleDetected(name) if name == "x"));
    }
}
