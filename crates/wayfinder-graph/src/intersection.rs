//! Fork classification and branch enumeration.
//!
//! Arity comes from the live degree of the fork vertex: 2 is an L, 3 a T.
//! Four-way crossings are rejected with [`NavError::Unsupported`]. The
//! direction the traveler arrived from is never reported as an opening.

use crate::{walk, BuildingMap, Hallway, VertexId, Visited};
use serde::Serialize;
use std::fmt;
use tracing::debug;
use wayfinder_core::{relative_label, Direction, NavError, Relative, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ForkKind {
    L,
    T,
}

impl ForkKind {
    /// Indefinite article for the kind's letter ("an L", "a T").
    pub fn article(self) -> &'static str {
        match self {
            ForkKind::L => "an",
            ForkKind::T => "a",
        }
    }

    /// Number of openings besides the arrival direction.
    pub fn arity(self) -> usize {
        match self {
            ForkKind::L => 1,
            ForkKind::T => 2,
        }
    }
}

impl fmt::Display for ForkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForkKind::L => f.write_str("L"),
            ForkKind::T => f.write_str("T"),
        }
    }
}

/// One way out of a fork and everything reachable down it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub turn: Relative,
    pub hallway: Hallway,
    pub fork: Option<Box<ForkReport>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForkReport {
    pub at: String,
    pub kind: ForkKind,
    pub arrived: Direction,
    /// Openings other than the way back, ordered front, left, right
    pub openings: Vec<Relative>,
    pub branches: Vec<Branch>,
}

impl ForkReport {
    /// Openings joined for prose, e.g. "in front of you and to your right".
    pub fn describe_openings(&self) -> String {
        describe_others(&self.openings)
    }
}

/// `None` for dead ends (degree 0 or 1).
pub fn classify(map: &BuildingMap, id: VertexId) -> Result<Option<ForkKind>> {
    match map.degree(id) {
        0 | 1 => Ok(None),
        2 => Ok(Some(ForkKind::L)),
        3 => Ok(Some(ForkKind::T)),
        degree => Err(NavError::Unsupported(format!(
            "{} is a {}-way crossing",
            map.vertex(id).name(),
            degree
        ))),
    }
}

/// Open directions at `id` other than the one behind someone traveling
/// `travel`, as (relative, absolute) pairs ordered front, left, right.
pub fn other_openings(
    map: &BuildingMap,
    id: VertexId,
    travel: Direction,
) -> Vec<(Relative, Direction)> {
    let mut openings: Vec<_> = map
        .vertex(id)
        .open_directions()
        .map(|open| (relative_label(travel, open), open))
        .filter(|(relative, _)| *relative != Relative::Behind)
        .collect();
    openings.sort();
    openings
}

pub fn describe_others(openings: &[Relative]) -> String {
    openings
        .iter()
        .map(|r| r.label())
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Continues past the end of `hallway` if it stopped on a fork.
pub fn explore(
    map: &BuildingMap,
    hallway: &Hallway,
    visited: &mut Visited,
) -> Result<Option<ForkReport>> {
    match hallway.fork(map) {
        Some(fork) => explore_fork(map, fork, hallway.direction, visited),
        None => Ok(None),
    }
}

/// Classifies `fork`, reached while traveling `travel`, and walks every
/// opening except the way back. Sub-forks are explored recursively; the
/// shared `visited` set bounds the recursion.
pub fn explore_fork(
    map: &BuildingMap,
    fork: VertexId,
    travel: Direction,
    visited: &mut Visited,
) -> Result<Option<ForkReport>> {
    let Some(kind) = classify(map, fork)? else {
        return Ok(None);
    };
    visited.insert(fork);

    let openings = other_openings(map, fork, travel);
    debug!(
        fork = map.vertex(fork).name(),
        %kind,
        %travel,
        openings = openings.len(),
        "exploring fork"
    );

    let mut branches = Vec::with_capacity(openings.len());
    for &(turn, direction) in &openings {
        let hallway = walk(map, fork, direction, visited)?;
        let sub = explore(map, &hallway, visited)?;
        branches.push(Branch {
            turn,
            hallway,
            fork: sub.map(Box::new),
        });
    }

    Ok(Some(ForkReport {
        at: map.vertex(fork).name().to_string(),
        kind,
        arrived: travel,
        openings: openings.into_iter().map(|(relative, _)| relative).collect(),
        branches,
    }))
}
