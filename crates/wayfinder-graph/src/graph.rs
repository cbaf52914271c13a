use crate::{Vertex, VertexId};
use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::warn;
use wayfinder_core::{Direction, NavError, Result, Wall};

/// A building's hallways: an append-only arena of vertices with symmetric
/// four-way adjacency.
#[derive(Debug, Clone, Default)]
pub struct BuildingMap {
    vertices: Vec<Vertex>,
    index: HashMap<String, VertexId>,
    strict: bool,
}

impl BuildingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map that rejects duplicate vertex names with [`NavError::DuplicateId`].
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Adds a vertex. In lenient mode a repeated name keeps the first
    /// definition and returns its id.
    pub fn add_vertex(&mut self, name: impl Into<String>, wall: Wall) -> Result<VertexId> {
        let name = name.into();
        if let Some(&existing) = self.index.get(&name) {
            if self.strict {
                return Err(NavError::DuplicateId(name));
            }
            warn!(vertex = %name, "duplicate vertex ignored, keeping first definition");
            return Ok(existing);
        }

        let id = VertexId(self.vertices.len());
        self.index.insert(name.clone(), id);
        self.vertices.push(Vertex::new(name, wall));
        Ok(id)
    }

    /// Puts `b` to the `direction` of `a`, and `a` to the opposite side of `b`.
    pub fn connect(&mut self, a: &str, b: &str, direction: Direction) -> Result<()> {
        let a = self
            .id_of(a)
            .ok_or_else(|| NavError::UnknownVertex(a.to_string()))?;
        let b = self
            .id_of(b)
            .ok_or_else(|| NavError::UnknownVertex(b.to_string()))?;
        self.connect_ids(a, b, direction)
    }

    pub fn connect_ids(&mut self, a: VertexId, b: VertexId, direction: Direction) -> Result<()> {
        self.check_slot(a, direction, b)?;
        self.check_slot(b, direction.opposite(), a)?;

        self.vertices[a.0].set_neighbor(direction, b);
        self.vertices[b.0].set_neighbor(direction.opposite(), a);
        Ok(())
    }

    // A slot may be re-bound to the same vertex, never to a different one.
    fn check_slot(&self, id: VertexId, direction: Direction, target: VertexId) -> Result<()> {
        match self.vertex(id).neighbor(direction) {
            Some(existing) if existing != target => Err(NavError::ConflictingEdge {
                from: self.vertex(id).name().to_string(),
                to: self.vertex(target).name().to_string(),
                existing: self.vertex(existing).name().to_string(),
                direction,
            }),
            _ => Ok(()),
        }
    }

    pub fn id_of(&self, name: &str) -> Option<VertexId> {
        self.index.get(name).copied()
    }

    /// Like [`Self::id_of`] but fails with [`NavError::NotFound`].
    pub fn require(&self, name: &str) -> Result<VertexId> {
        self.id_of(name)
            .ok_or_else(|| NavError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Ids are only handed out by this map, so indexing cannot miss.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn get(&self, name: &str) -> Option<&Vertex> {
        self.id_of(name).map(|id| self.vertex(id))
    }

    pub fn neighbor(&self, id: VertexId, direction: Direction) -> Option<VertexId> {
        self.vertex(id).neighbor(direction)
    }

    pub fn neighbor_of(&self, name: &str, direction: Direction) -> Option<&Vertex> {
        let id = self.id_of(name)?;
        self.neighbor(id, direction).map(|n| self.vertex(n))
    }

    pub fn degree(&self, id: VertexId) -> usize {
        self.vertex(id).degree()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i), v))
    }

    /// Human-readable dump of every vertex and its neighbours.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (_, vertex) in self.iter() {
            let _ = writeln!(out, "name: {}", vertex.name());
            match vertex.wall() {
                Wall::Intersection => {
                    let _ = writeln!(out, "is an intersection.");
                }
                wall => {
                    let _ = writeln!(out, "on a wall to the {} in its hallway.", wall);
                }
            }
            for direction in vertex.open_directions() {
                if let Some(n) = vertex.neighbor(direction) {
                    let _ = writeln!(out, "\tTo the {}: {}", direction, self.vertex(n).name());
                }
            }
            out.push('\n');
        }
        out
    }
}
