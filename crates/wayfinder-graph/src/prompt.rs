//! Navigation prompt assembly.
//!
//! The prompt is returned as two segments so the caller can splice a
//! destination between them. Line breaks are literal `\n` markers; see
//! [`wayfinder_core::text::interpret_escape_sequences`] for display.

use crate::{explore, named_fork_kind, walk, BuildingMap, ForkReport, Hallway, Visited, ENTRANCE};
use serde::Serialize;
use tracing::{debug, warn};
use wayfinder_core::{rotate, Direction, NavigationConfig, Relative, Result};

/// Literal two-character line separator used inside prompt segments.
pub const LINE_BREAK: &str = r"\n";

/// Last text of the prefix; the destination goes right after it.
pub const DESTINATION_MARKER: &str = "- **Destination:** ";

pub const DISCLAIMER: &str = "(MAKE SURE TO PARSE EACH HALLWAY TO ENSURE THE DESTINATION IS IN THE HALLWAY YOU THINK IT IS, THE DOOR ORDER MAY BE CONFUSING AND YOU CAN'T RELY ON CHRONOLOGICAL ANALYSIS)";

/// Hallway leaving the start position in one relative direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub relative: Relative,
    pub hallway: Hallway,
    pub fork: Option<ForkReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationReport {
    pub start: String,
    pub orientation: Direction,
    /// e.g. "(Facing North at the entrance)"
    pub position: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub prefix: String,
    pub suffix: String,
    pub report: NavigationReport,
}

impl Prompt {
    pub fn with_destination(&self, destination: &str) -> String {
        format!("{}{}{}", self.prefix, destination, self.suffix)
    }
}

pub struct PromptGenerator<'a> {
    map: &'a BuildingMap,
}

impl<'a> PromptGenerator<'a> {
    pub fn new(map: &'a BuildingMap) -> Self {
        Self { map }
    }

    /// Builds the prompt for someone standing at `start` facing
    /// `orientation`. Fails with `NotFound` for an unknown start, and with
    /// `CycleDetected` / `Unsupported` for maps the traversal cannot finish.
    pub fn generate(&self, start: &str, orientation: Direction) -> Result<Prompt> {
        let start_id = self.map.require(start)?;
        let position = position_description(start, orientation);

        let mut sections = Vec::new();
        for (relative, direction) in rotate(orientation).ordered() {
            if self.map.neighbor(start_id, direction).is_none() {
                continue;
            }
            let mut visited = Visited::from([start_id]);
            let hallway = walk(self.map, start_id, direction, &mut visited)?;
            let fork = explore(self.map, &hallway, &mut visited)?;
            sections.push(Section {
                relative,
                hallway,
                fork,
            });
        }
        debug!(start, %orientation, sections = sections.len(), "assembled prompt");

        let report = NavigationReport {
            start: start.to_string(),
            orientation,
            position,
            sections,
        };

        Ok(Prompt {
            prefix: render_prefix(&report),
            suffix: render_suffix(&report),
            report,
        })
    }
}

/// "(Facing <dir> at ...)". Intersection names are read by convention only.
pub fn position_description(start: &str, orientation: Direction) -> String {
    let place = if start == ENTRANCE {
        "the entrance".to_string()
    } else if let Some(kind) = named_fork_kind(start) {
        format!("{} {} intersection", kind.article(), kind)
    } else {
        format!("door {}", start)
    };
    format!("(Facing {} at {})", orientation, place)
}

fn render_prefix(report: &NavigationReport) -> String {
    let mut out = String::new();
    line(&mut out, "## Building layout");
    out.push_str(LINE_BREAK);
    line(&mut out, "### Initial Position");
    line(
        &mut out,
        &format!("- **Current Position:** {}", report.position),
    );
    out.push_str(LINE_BREAK);
    line(&mut out, "### Desired Position");
    out.push_str(DESTINATION_MARKER);
    out
}

fn render_suffix(report: &NavigationReport) -> String {
    let mut out = String::new();
    out.push_str(LINE_BREAK);
    out.push_str(LINE_BREAK);
    line(&mut out, DISCLAIMER);
    out.push_str(LINE_BREAK);

    for section in &report.sections {
        line(
            &mut out,
            &format!("### {} {}", section_title(section.relative), report.position),
        );
        render_rooms(&mut out, &section.hallway);
        if let Some(fork) = &section.fork {
            render_fork(&mut out, fork);
        }
        out.push_str(LINE_BREAK);
    }
    out
}

fn section_title(relative: Relative) -> &'static str {
    match relative {
        Relative::Right => "Right turn",
        Relative::Left => "Left turn",
        Relative::Front => "Hallway forward",
        Relative::Behind => "Hallway behind you",
    }
}

fn render_rooms(out: &mut String, hallway: &Hallway) {
    if hallway.rooms.is_empty() {
        line(out, "- **Room Sequence:** (none)");
        return;
    }
    line(out, "- **Room Sequence:**");
    for room in &hallway.rooms {
        match room.side {
            Some(side) => line(out, &format!("{}. {} ({})", room.position, room.name, side)),
            None => line(out, &format!("{}. {}", room.position, room.name)),
        }
    }
}

fn render_fork(out: &mut String, fork: &ForkReport) {
    let noun = if fork.openings.len() == 1 {
        "a hallway"
    } else {
        "hallways"
    };
    line(
        out,
        &format!(
            "**{} intersection with {} {}**",
            fork.kind,
            noun,
            fork.describe_openings()
        ),
    );

    for branch in &fork.branches {
        line(
            out,
            &format!(
                "- **Next hallway ({} at the {} intersection)**",
                branch.turn.turn_phrase(),
                fork.kind
            ),
        );
        render_rooms(out, &branch.hallway);
        match &branch.fork {
            Some(sub) => render_fork(out, sub),
            None if branch.hallway.rooms.is_empty() => {
                warn!(fork = %fork.at, turn = ?branch.turn, "branch leads nowhere");
            }
            None => {}
        }
    }
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push_str(LINE_BREAK);
}

/// Start and orientation after the command line's fallbacks: an unknown or
/// missing start becomes the configured default, an unreadable orientation
/// becomes the configured default orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub start: String,
    pub orientation: Direction,
}

impl PromptRequest {
    pub fn resolve(
        map: &BuildingMap,
        start: Option<&str>,
        orientation: Option<&str>,
        defaults: &NavigationConfig,
    ) -> Self {
        let start = match start {
            Some(name) if map.contains(name) => name.to_string(),
            Some(name) => {
                warn!(
                    requested = name,
                    fallback = %defaults.default_start,
                    "unknown start position, using default"
                );
                defaults.default_start.clone()
            }
            None => defaults.default_start.clone(),
        };

        let orientation = match orientation {
            Some(word) => word.parse().unwrap_or_else(|_| {
                warn!(
                    requested = word,
                    fallback = %defaults.default_orientation,
                    "unknown orientation, using default"
                );
                defaults.default_orientation
            }),
            None => defaults.default_orientation,
        };

        Self { start, orientation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_description() {
        assert_eq!(
            position_description("maindoor", Direction::North),
            "(Facing North at the entrance)"
        );
        assert_eq!(
            position_description("intersection0", Direction::West),
            "(Facing West at an L intersection)"
        );
        assert_eq!(
            position_description("intersection2", Direction::South),
            "(Facing South at a T intersection)"
        );
        assert_eq!(
            position_description("2.202", Direction::East),
            "(Facing East at door 2.202)"
        );
    }

    #[test]
    fn test_resolve_request_fallbacks() {
        let mut map = BuildingMap::new();
        map.add_vertex("maindoor", wayfinder_core::Wall::South).unwrap();
        map.add_vertex("2.102", wayfinder_core::Wall::South).unwrap();
        let defaults = NavigationConfig::default();

        let req = PromptRequest::resolve(&map, Some("2.102"), Some("north"), &defaults);
        assert_eq!(req.start, "2.102");
        assert_eq!(req.orientation, Direction::North);

        let req = PromptRequest::resolve(&map, Some("9.999"), Some("upward"), &defaults);
        assert_eq!(req.start, "maindoor");
        assert_eq!(req.orientation, Direction::East);

        let req = PromptRequest::resolve(&map, None, None, &defaults);
        assert_eq!(req.start, "maindoor");
        assert_eq!(req.orientation, Direction::East);
    }
}
