#![allow(clippy::struct_excessive_bools)]

/// Lexical flavor used to recognize comments, hints and string literals.
///
/// # Default
///
/// [`Dialect::Oracle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// `--` comments, `/*+ */` and `--+` hints, and `q'[...]'` literals.
    #[default]
    Oracle,
    /// `#` and `-- ` comments, `/*! */` conditional comments and backslash
    /// escapes.
    #[cfg_attr(feature = "serde", serde(rename = "mysql"))]
    MySql,
}

impl Dialect {
    /// Returns `true` for [`Dialect::MySql`].
    #[must_use]
    pub fn is_mysql(self) -> bool {
        matches!(self, Dialect::MySql)
    }

    /// Returns `true` for [`Dialect::Oracle`].
    #[must_use]
    pub fn is_oracle(self) -> bool {
        matches!(self, Dialect::Oracle)
    }
}

/// Configuration options for splitting a SQL script.
///
/// These options control how much of the source formatting and how many of
/// the comments survive into the emitted statements.
///
/// # Examples
///
/// ```rust
/// use sqlsplit::{Dialect, SplitOptions, split_script};
///
/// let options = SplitOptions {
///     preserve_single_line_comments: true,
///     dialect: Dialect::MySql,
///     ..Default::default()
/// };
/// let statements = split_script("SELECT 1; -- one\nSELECT 2;", &options);
/// assert_eq!(statements, vec!["SELECT 1 -- one\n", "SELECT 2"]);
/// ```
///
/// # Default
///
/// All flags default to `false` and the dialect defaults to
/// [`Dialect::Oracle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SplitOptions {
    /// Whether to keep leading spaces at the start of a fresh statement.
    ///
    /// When `false`, a run of spaces that would begin a new statement is
    /// dropped. Spaces inside a statement are always kept.
    ///
    /// # Default
    ///
    /// `false`
    pub preserve_format: bool,

    /// Whether `--` (and, for MySQL, `#`) comments are copied into the output.
    ///
    /// A retained comment that follows a finished statement is appended to
    /// that statement rather than starting a new one.
    ///
    /// # Default
    ///
    /// `false`
    pub preserve_single_line_comments: bool,

    /// Whether `/* ... */` comments are copied into the output.
    ///
    /// Optimizer hints (`/*+ ... */`) are always copied regardless of this
    /// flag.
    ///
    /// # Default
    ///
    /// `false`
    pub preserve_multi_line_comments: bool,

    /// Lexical flavor of the script.
    ///
    /// # Default
    ///
    /// [`Dialect::Oracle`]
    pub dialect: Dialect,
}

impl SplitOptions {
    /// Options that keep formatting and both comment kinds for `dialect`.
    ///
    /// This is the configuration the statement pass of
    /// [`split_script`](crate::split_script) always runs under.
    #[must_use]
    pub fn preserving_all(dialect: Dialect) -> Self {
        Self {
            preserve_format: true,
            preserve_single_line_comments: true,
            preserve_multi_line_comments: true,
            dialect,
        }
    }
}
