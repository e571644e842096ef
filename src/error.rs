//! Error types for level and configuration loading.
//!
//! Everything that can go wrong inside a running tick is expressed as a
//! return value instead; these are the only failures that stop the game.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while turning an ASCII level into a [`World`](crate::world::World).
#[derive(Debug, Error)]
pub enum LevelError {
    /// Level file could not be read.
    #[error("Failed to read level {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Level text contained no rows at all.
    #[error("Level is empty")]
    Empty,

    /// No `$` marker anywhere in the grid.
    #[error("Level has no player spawn marker '$'")]
    MissingSpawn,

    /// More than one `$` marker.
    #[error("Level has a second spawn marker at {second:?}; the first is at {first:?}")]
    DuplicateSpawn {
        first: (i32, i32),
        second: (i32, i32),
    },

    /// A character outside the level legend.
    #[error("Unknown level cell '{character}' at column {col}, row {row}")]
    UnknownCell { character: char, col: usize, row: usize },
}

/// Errors that can occur when loading a RON configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path:?}: {details}")]
    Parse { path: PathBuf, details: String },
}
