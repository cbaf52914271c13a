//! Map input: door and connectivity records, their line-oriented text form,
//! and graph construction.
//!
//! Doors file, one door per line:
//!
//! ```text
//! 2.102 SOUTH
//! intersection0 INTER
//! ```
//!
//! Connectivity file, neighbours in north, south, west, east order:
//!
//! ```text
//! 2.102 null null 2.106 2.108
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Lines with too few
//! fields are skipped with a warning.

use crate::BuildingMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};
use wayfinder_core::{Direction, NavError, Result, Wall};

/// Token marking an empty neighbour slot.
pub const NULL_MARKER: &str = "null";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorRecord {
    pub id: String,
    pub wall: Wall,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectivityRecord {
    pub id: String,
    #[serde(default)]
    pub north: Option<String>,
    #[serde(default)]
    pub south: Option<String>,
    #[serde(default)]
    pub west: Option<String>,
    #[serde(default)]
    pub east: Option<String>,
}

impl ConnectivityRecord {
    /// Neighbour slots in north, south, west, east order.
    pub fn neighbors(&self) -> [(Direction, Option<&str>); 4] {
        [
            (Direction::North, self.north.as_deref()),
            (Direction::South, self.south.as_deref()),
            (Direction::West, self.west.as_deref()),
            (Direction::East, self.east.as_deref()),
        ]
    }
}

fn is_skippable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

fn neighbor_token(token: &str) -> Option<String> {
    if token.eq_ignore_ascii_case(NULL_MARKER) {
        None
    } else {
        Some(token.to_string())
    }
}

/// Parses one doors-file line. `line_no` is 1-based and only used in errors.
pub fn parse_door_line(line_no: usize, line: &str) -> Result<DoorRecord> {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(id), Some(wall)) => Ok(DoorRecord {
            id: id.to_string(),
            wall: Wall::from_token(wall),
        }),
        _ => Err(NavError::MalformedRecord {
            line: line_no,
            reason: format!("expected `<name> <wall>`, got `{}`", line.trim()),
        }),
    }
}

/// Parses one connectivity-file line.
pub fn parse_connectivity_line(line_no: usize, line: &str) -> Result<ConnectivityRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(NavError::MalformedRecord {
            line: line_no,
            reason: format!(
                "expected `<name> <north> <south> <west> <east>`, got {} field(s)",
                fields.len()
            ),
        });
    }

    Ok(ConnectivityRecord {
        id: fields[0].to_string(),
        north: neighbor_token(fields[1]),
        south: neighbor_token(fields[2]),
        west: neighbor_token(fields[3]),
        east: neighbor_token(fields[4]),
    })
}

fn parse_lines<T>(input: &str, parse: impl Fn(usize, &str) -> Result<T>) -> Vec<T> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !is_skippable(line))
        .filter_map(|(i, line)| match parse(i + 1, line) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("skipping record: {}", e);
                None
            }
        })
        .collect()
}

pub fn parse_doors(input: &str) -> Vec<DoorRecord> {
    parse_lines(input, parse_door_line)
}

pub fn parse_connectivity(input: &str) -> Vec<ConnectivityRecord> {
    parse_lines(input, parse_connectivity_line)
}

/// Builds a lenient map from records. Fails with
/// [`NavError::UnknownVertex`] when connectivity names an undeclared door.
pub fn build_graph(
    doors: &[DoorRecord],
    connectivity: &[ConnectivityRecord],
) -> Result<BuildingMap> {
    build_graph_with(BuildingMap::new(), doors, connectivity)
}

/// Builds into a caller-supplied (possibly strict) empty map.
pub fn build_graph_with(
    mut map: BuildingMap,
    doors: &[DoorRecord],
    connectivity: &[ConnectivityRecord],
) -> Result<BuildingMap> {
    for door in doors {
        map.add_vertex(door.id.as_str(), door.wall)?;
    }

    for record in connectivity {
        if !map.contains(&record.id) {
            return Err(NavError::UnknownVertex(record.id.clone()));
        }
        for (direction, neighbor) in record.neighbors() {
            if let Some(neighbor) = neighbor {
                map.connect(&record.id, neighbor, direction)?;
            }
        }
    }

    debug!(
        vertices = map.len(),
        records = connectivity.len(),
        "building map constructed"
    );
    Ok(map)
}

/// Reads both map files from disk.
pub fn load_map(doors_path: &Path, connectivity_path: &Path, strict: bool) -> Result<BuildingMap> {
    let doors = parse_doors(&std::fs::read_to_string(doors_path)?);
    let connectivity = parse_connectivity(&std::fs::read_to_string(connectivity_path)?);

    let map = if strict {
        BuildingMap::strict()
    } else {
        BuildingMap::new()
    };
    let map = build_graph_with(map, &doors, &connectivity)?;

    info!(
        doors = %doors_path.display(),
        connectivity = %connectivity_path.display(),
        vertices = map.len(),
        "loaded building map"
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_door_lines() {
        let doors =
            parse_doors("2.102 SOUTH\n\n# atrium\nintersection0 INTER\n2.106 north extra\n");
        assert_eq!(doors.len(), 3);
        assert_eq!(doors[0].wall, Wall::South);
        assert_eq!(doors[1].wall, Wall::Intersection);
        assert_eq!(doors[2].wall, Wall::North);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let doors = parse_doors("2.102 SOUTH\nlonely\n2.106 NORTH\n");
        assert_eq!(
            doors.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            vec!["2.102", "2.106"]
        );

        let links = parse_connectivity("a null null null b\nb null null a\n");
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_malformed_record_reports_line() {
        let err = parse_connectivity_line(7, "a null").unwrap_err();
        assert!(matches!(err, NavError::MalformedRecord { line: 7, .. }));
    }

    #[test]
    fn test_null_marker() {
        let record = parse_connectivity_line(1, "a NULL b null c").unwrap();
        assert_eq!(record.north, None);
        assert_eq!(record.south.as_deref(), Some("b"));
        assert_eq!(record.west, None);
        assert_eq!(record.east.as_deref(), Some("c"));
    }

    #[test]
    fn test_build_graph_unknown_neighbor() {
        let doors = vec![DoorRecord {
            id: "a".into(),
            wall: Wall::North,
        }];
        let links = vec![ConnectivityRecord {
            id: "a".into(),
            east: Some("b".into()),
            ..Default::default()
        }];
        assert!(matches!(
            build_graph(&doors, &links),
            Err(NavError::UnknownVertex(name)) if name == "b"
        ));

        let stray = vec![ConnectivityRecord {
            id: "ghost".into(),
            ..Default::default()
        }];
        assert!(matches!(
            build_graph(&doors, &stray),
            Err(NavError::UnknownVertex(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_records_deserialize() {
        let door: DoorRecord = serde_json::from_str(r#"{"id":"2.102","wall":"south"}"#).unwrap();
        assert_eq!(door.wall, Wall::South);
        let link: ConnectivityRecord =
            serde_json::from_str(r#"{"id":"2.102","west":"2.106"}"#).unwrap();
        assert_eq!(link.west.as_deref(), Some("2.106"));
        assert_eq!(link.north, None);
    }
}
