//! Splits SQL scripts into individually executable statements.
//!
//! Splitting happens in two passes:
//!
//! 1. [`split_blocks`] cuts the script into procedural chunks at standalone
//!    `/` lines and drops client directives such as `PROMPT` or `SET`.
//! 2. [`split_statements`] cuts each chunk at the active delimiter, which a
//!    `delimiter <token>` line may change for the rest of the script.
//!
//! [`split_script`] composes the two passes, [`split_file`] reads a script
//! from disk first, and [`StatementReader`] streams statements out of any
//! [`BufRead`](std::io::BufRead).
//!
//! Strings, quoted identifiers, comments and optimizer hints are tracked
//! throughout, so a delimiter inside any of them never splits a statement.
//! Splitting is total: unterminated constructs are closed at end of input.
//!
//! ```rust
//! use sqlsplit::{SplitOptions, split_script};
//!
//! let statements = split_script(
//!     "SELECT 'a;b' FROM dual; SELECT q'[it's]' FROM dual;",
//!     &SplitOptions::default(),
//! );
//! assert_eq!(
//!     statements,
//!     vec!["SELECT 'a;b' FROM dual", " SELECT q'[it's]' FROM dual"],
//! );
//! ```

mod block;
mod error;
mod options;
mod reader;
mod scanner;
mod script;
mod statement;


pub use block::split_blocks;
pub use error::SplitError;
pub use options::{Dialect, SplitOptions};
pub use reader::StatementReader;
pub use scanner::{DEFAULT_DELIMITER, HintKind, LexerMode, Quote, ScanState};
pub use script::{split_file, split_script};
pub use statement::split_statements;
