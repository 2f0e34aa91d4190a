//! Block pass: cuts a script into procedural chunks.
//!
//! A chunk ends at a standalone `/` line, which stays at the end of the chunk,
//! or at a client directive (`PROMPT`, `REM`, `SET`, `SPOOL`), which is
//! dropped. Comments and literals are tracked so that neither boundary is
//! recognized inside them.

use core::mem;

use crate::scanner::{Boundary, LineScanner, ScanState};

/// Splits `script` into whitespace-trimmed procedural chunks.
///
/// `state` supplies the options and comes back with every open mode closed.
/// Chunks that are blank after trimming are skipped. The pass never fails.
///
/// # Examples
///
/// ```rust
/// use sqlsplit::{ScanState, SplitOptions, split_blocks};
///
/// let script = "SET DEFINE OFF\nBEGIN\n  NULL;\nEND;\n/\nSELECT 1 FROM dual;";
/// let mut state = ScanState::new(SplitOptions::default());
/// assert_eq!(
///     split_blocks(script, &mut state),
///     vec!["BEGIN\n  NULL;\nEND;\n/", "SELECT 1 FROM dual;"],
/// );
/// ```
pub fn split_blocks(script: &str, state: &mut ScanState) -> Vec<String> {
    let mut scanner = LineScanner::from_state(mem::take(state), Boundary::ClientDirective);
    for line in script.lines() {
        scanner.feed_line(line);
    }
    let (chunks, carry) = scanner.finish();
    *state = carry;

    chunks
        .into_iter()
        .filter_map(|chunk| {
            let trimmed = chunk.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        })
        .collect()
}
