use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate vertex id: {0}")]
    DuplicateId(String),

    #[error("Unknown vertex: {0}")]
    UnknownVertex(String),

    #[error(
        "Conflicting edge: {from} already has {existing} to the {direction}, cannot connect {to}"
    )]
    ConflictingEdge {
        from: String,
        to: String,
        existing: String,
        direction: crate::Direction,
    },

    #[error("Vertex not found: {0}")]
    NotFound(String),

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Cycle detected: vertex {0} was reached twice")]
    CycleDetected(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, NavError>;
