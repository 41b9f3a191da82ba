//! Typed errors for the text parsers and the tile grid.
//!
//! Loading code above these layers works with `anyhow::Result` and attaches
//! context (file names) on the way up.

use thiserror::Error;

/// Vertex attribute channel referenced by a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Position,
    TexCoord,
    Normal,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Channel::Position => "position",
            Channel::TexCoord => "texcoord",
            Channel::Normal => "normal",
        })
    }
}

/// Errors produced while reading OBJ or MTL text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: '{token}' is not a valid number")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: '{keyword}' expects at least {expected} values")]
    MissingComponent {
        line: usize,
        keyword: &'static str,
        expected: usize,
    },

    #[error("line {line}: {channel} index {index} does not resolve ({available} declared)")]
    IndexOutOfRange {
        line: usize,
        channel: Channel,
        index: i64,
        available: usize,
    },
}

/// Errors produced while constructing tile grids or deriving their instances.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("interior of {width}x{height} does not fit into a {limit}x{limit} grid")]
    InteriorTooLarge {
        width: usize,
        height: usize,
        limit: usize,
    },

    #[error("tile ({x}, {y}) lies outside the grid")]
    TileOutOfBounds { x: usize, y: usize },

    #[error("exit target ({x}, {y}) in zone '{zone}' lies outside the grid")]
    ExitOutOfBounds { zone: String, x: usize, y: usize },

    #[error("exit targets unknown zone '{0}'")]
    UnknownZone(String),

    #[error("model '{0}' is required but was not loaded")]
    MissingModel(String),
}
