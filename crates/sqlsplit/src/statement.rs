//! Statement pass: cuts a chunk into statements at the active delimiter.

use core::mem;

use crate::scanner::{Boundary, LineScanner, ScanState};

/// Splits `chunk` into statements, with delimiters removed.
///
/// A line that begins with `delimiter <token>` (case-insensitive) replaces the
/// active delimiter and is not emitted. The new delimiter is written back to
/// `state` and stays in effect for later chunks. Delimiters inside strings,
/// comments and hints are ignored.
///
/// Two consecutive delimiters yield an empty statement. The text after the
/// last delimiter is emitted only if it is not blank.
///
/// # Examples
///
/// ```rust
/// use sqlsplit::{ScanState, SplitOptions, split_statements};
///
/// let mut state = ScanState::new(SplitOptions::default());
/// assert_eq!(
///     split_statements("SELECT ';' FROM t; SELECT 2", &mut state),
///     vec!["SELECT ';' FROM t", "SELECT 2"],
/// );
/// ```
pub fn split_statements(chunk: &str, state: &mut ScanState) -> Vec<String> {
    let mut scanner = LineScanner::from_state(mem::take(state), Boundary::Delimiter);
    for line in chunk.lines() {
        scanner.feed_line(line);
    }
    let (statements, carry) = scanner.finish();
    *state = carry;
    statements
}
