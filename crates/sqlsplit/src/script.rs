use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use bstr::ByteSlice;
use log::debug;

use crate::{ScanState, SplitError, SplitOptions, split_blocks, split_statements};

/// Splits a whole script: first into procedural chunks, then each chunk into
/// statements.
///
/// A chunk that ends in a `/` line is a PL/SQL unit and is passed through
/// unchanged. Every other chunk is split at the active delimiter, which
/// carries over from one chunk to the next.
///
/// `options` governs the block pass only. The statement pass always keeps
/// formatting and comments, since anything the block pass let through was
/// already filtered by the caller's flags.
///
/// # Examples
///
/// ```rust
/// use sqlsplit::{SplitOptions, split_script};
///
/// let script = "PROMPT creating\nCREATE TABLE t (a INT);\nINSERT INTO t VALUES (1);";
/// assert_eq!(
///     split_script(script, &SplitOptions::default()),
///     vec!["CREATE TABLE t (a INT)", "INSERT INTO t VALUES (1)"],
/// );
/// ```
#[must_use]
pub fn split_script(script: &str, options: &SplitOptions) -> Vec<String> {
    let mut state = ScanState::new(*options);
    let chunks = split_blocks(script, &mut state);
    state.set_options(SplitOptions::preserving_all(options.dialect));

    let mut statements = Vec::new();
    for chunk in &chunks {
        if chunk.ends_with('/') {
            statements.push(chunk.clone());
        } else {
            statements.extend(split_statements(chunk, &mut state));
        }
    }
    debug!(
        "split script into {} chunks and {} statements",
        chunks.len(),
        statements.len()
    );
    statements
}

/// Reads the script at `path` and runs [`split_script`] over it.
///
/// Invalid UTF-8 is replaced with `U+FFFD` rather than rejected.
///
/// # Errors
///
/// Returns [`SplitError::Io`] carrying `path` if the file cannot be opened or
/// read.
pub fn split_file(path: impl AsRef<Path>, options: &SplitOptions) -> Result<Vec<String>, SplitError> {
    let path = path.as_ref();
    let with_path = |source: io::Error| SplitError::Io {
        path: Some(path.to_path_buf()),
        source,
    };

    let mut bytes = Vec::new();
    BufReader::new(File::open(path).map_err(with_path)?)
        .read_to_end(&mut bytes)
        .map_err(with_path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());

    Ok(split_script(&bytes.to_str_lossy(), options))
}
