//! Lookahead predicates used by the line scanner.
//!
//! Every predicate inspects the line at a position without consuming input;
//! the scanner decides what to copy and where to advance.

use std::sync::LazyLock;

use regex::RegexSet;

use super::cursor::LineCursor;
use crate::options::Dialect;

const DELIMITER_KEYWORD: &str = "delimiter ";

/// Client-only directives, matched against the rest of a physical line.
static CLIENT_DIRECTIVES: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)^\?*(?:PROMPT|REM)(?: [^\r\n]*)?[\r\n]?$",
        r"(?i)^SET +[0-9A-Z_]+ +(?:'(?:[^'\r\n]|'')*'|ON|OFF|[0-9]+|[0-9A-Z_]+)[\r\n]?$",
        r"(?i)^SPOOL [^\r\n]*[\r\n]?$",
    ])
    .expect("client directive patterns are valid")
});

/// Whether the text scanned so far on this line is exactly `delimiter `.
///
/// With `preserve_format` the leading spaces are kept in the line buffer, so
/// they are skipped here before comparing. Tabs are not skipped.
pub(crate) fn is_delimiter_directive(line_so_far: &str, preserve_format: bool) -> bool {
    let header = if preserve_format {
        line_so_far.trim_start_matches(' ')
    } else {
        line_so_far
    };
    header.eq_ignore_ascii_case(DELIMITER_KEYWORD)
}

/// Whether the active delimiter starts at `pos`.
///
/// A `/` delimiter never matches next to a `*`, where it belongs to a block
/// comment marker instead.
pub(crate) fn delimiter_at(cursor: &LineCursor<'_>, pos: usize, delimiter: &str) -> bool {
    if !cursor.starts_with(pos, delimiter) {
        return false;
    }
    if delimiter != "/" {
        return true;
    }
    cursor.prev(pos) != Some('*') && cursor.at(pos + 1) != Some('*')
}

/// Whether a client directive (`PROMPT`, `REM`, `SET`, `SPOOL`) starts at
/// `pos` and runs to the end of the line.
pub(crate) fn client_directive_at(cursor: &LineCursor<'_>, pos: usize) -> bool {
    if cursor.prev(pos).is_some_and(|c| c != ' ') {
        return false;
    }
    let Some(first) = cursor.at(pos) else {
        return false;
    };
    if !matches!(first.to_ascii_uppercase(), '?' | 'P' | 'R' | 'S') {
        return false;
    }
    CLIENT_DIRECTIVES.is_match(&cursor.rest(pos))
}

/// Whether a single-line comment starts at `pos`.
pub(crate) fn line_comment_at(cursor: &LineCursor<'_>, pos: usize, dialect: Dialect) -> bool {
    match dialect {
        Dialect::Oracle => cursor.starts_with(pos, "--") && !line_hint_at(cursor, pos, dialect),
        Dialect::MySql => {
            cursor.at(pos) == Some('#')
                || (cursor.starts_with(pos, "--") && matches!(cursor.at(pos + 2), None | Some(' ')))
        }
    }
}

/// Whether a `--+` line hint with a body starts at `pos`.
///
/// `--+` followed by a space or the end of the line is a plain comment.
pub(crate) fn line_hint_at(cursor: &LineCursor<'_>, pos: usize, dialect: Dialect) -> bool {
    dialect.is_oracle()
        && cursor.starts_with(pos, "--+")
        && cursor.at(pos + 3).is_some_and(|c| c != ' ')
}

/// Whether `/*` at `pos` opens an ordinary block comment rather than a hint
/// or a MySQL conditional comment.
pub(crate) fn block_comment_at(cursor: &LineCursor<'_>, pos: usize, dialect: Dialect) -> bool {
    cursor.starts_with(pos, "/*")
        && match cursor.at(pos + 2) {
            Some('+') => false,
            Some('!') => dialect.is_oracle(),
            _ => true,
        }
}

pub(crate) fn block_hint_at(cursor: &LineCursor<'_>, pos: usize) -> bool {
    cursor.starts_with(pos, "/*+")
}

pub(crate) fn conditional_comment_at(cursor: &LineCursor<'_>, pos: usize, dialect: Dialect) -> bool {
    dialect.is_mysql() && cursor.starts_with(pos, "/*!")
}

pub(crate) fn is_quote(ch: char) -> bool {
    matches!(ch, '\'' | '"' | '`')
}

/// Closing character of a Q-escape literal opened with `open`.
pub(crate) fn q_escape_close(open: char) -> char {
    match open {
        '<' => '>',
        '{' => '}',
        '[' => ']',
        '(' => ')',
        other => other,
    }
}

/// Closing character of the Q-escape literal whose quote is at `pos`, if the
/// quote opens one (`q'[...]'`).
pub(crate) fn q_escape_at(cursor: &LineCursor<'_>, pos: usize, dialect: Dialect) -> Option<char> {
    if !dialect.is_oracle() || !matches!(cursor.prev(pos), Some('q' | 'Q')) {
        return None;
    }
    cursor.at(pos + 1).map(q_escape_close)
}

/// Whether the buffer holds nothing but spaces.
pub(crate) fn is_blank_spaces(text: &str) -> bool {
    text.chars().all(|c| c == ' ')
}
