use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors surfaced by the splitting entry points.
///
/// Splitting itself never fails: malformed strings, comments and hints are
/// closed implicitly at end of input. Only reading the script and configuring
/// the delimiter can go wrong.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Reading the script failed.
    #[error("failed to read script{}: {source}", path_suffix(.path.as_ref()))]
    Io {
        /// The file being read, when the input came from a path.
        path: Option<PathBuf>,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A statement delimiter must contain at least one character.
    #[error("statement delimiter must not be empty")]
    EmptyDelimiter,
}

impl From<io::Error> for SplitError {
    fn from(source: io::Error) -> Self {
        SplitError::Io { path: None, source }
    }
}

fn path_suffix(path: Option<&PathBuf>) -> String {
    path.map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}
