//! Line scanner: the character-level state machine behind both passes.
//!
//! Overview
//! - Input is fed one physical line at a time. Lexer state (open string,
//!   block comment or hint, and the active delimiter) lives in [`ScanState`]
//!   and carries over from one line to the next.
//! - Characters of the current line are collected in a line buffer and moved
//!   into the statement accumulator whenever a boundary, a comment or the end
//!   of the line is reached. A boundary flushes the accumulator into the
//!   output list.
//! - The block pass and the statement pass differ only in what counts as a
//!   boundary: a client directive (`PROMPT`, `SET`, ...) or a `/` line for the
//!   former, the active delimiter for the latter. See [`Boundary`].
//!
//! Ownership
//! - A [`LineScanner`] takes the `ScanState` by value in
//!   [`LineScanner::from_state`] and hands it back from
//!   [`LineScanner::finish`], so a scanner never aliases caller state and can
//!   be kept alive across reads by the streaming reader.
//!
//! Invariants
//! - Exactly one [`LexerMode`] is active at any position.
//! - Only delimiter tokens, directive lines and unpreserved comments are
//!   dropped; every other character reaches the output exactly once.
//! - The end of a chunk closes whatever mode is still open; scanning never
//!   fails.
//! - An entry closed by a `/` line is final: no later comment is merged into
//!   it.

mod classify;
mod cursor;

#[cfg(test)]
mod tests;

use core::mem;

use log::{debug, trace, warn};

use crate::{SplitError, SplitOptions};
use classify::{
    block_comment_at, block_hint_at, client_directive_at, conditional_comment_at, delimiter_at,
    is_blank_spaces, is_delimiter_directive, is_quote, line_comment_at, line_hint_at, q_escape_at,
};
use cursor::LineCursor;

/// The default statement delimiter.
pub const DEFAULT_DELIMITER: &str = ";";

/// How an optimizer hint is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind {
    /// `/*+ ... */`, closed by `*/`; may span lines.
    Block,
    /// `--+...`, closed by the end of the line.
    Line,
}

/// An open string literal or quoted identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// The quote character that opened the literal.
    pub open: char,
    /// For a Q-escape literal, the bracket that must precede the closing
    /// quote.
    pub close: Option<char>,
}

/// Lexical context at the current scan position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexerMode {
    /// Ordinary statement text.
    #[default]
    Normal,
    /// Inside a `--` comment; lasts until the end of the line.
    SingleLineComment,
    /// Inside a `/* ... */` comment.
    MultiLineComment,
    /// Inside an optimizer hint, copied verbatim.
    Hint(HintKind),
    /// Inside a quoted literal or identifier.
    StringLiteral(Quote),
    /// Inside a MySQL `/*! ... */` conditional comment.
    Conditional,
}

/// Lexer state threaded through every line of a script.
///
/// A `ScanState` is created once per script. It carries the active delimiter
/// from one chunk to the next, which is how a `delimiter` directive takes
/// effect for the rest of the script.
///
/// # Examples
///
/// ```rust
/// use sqlsplit::{ScanState, SplitOptions, split_statements};
///
/// let mut state = ScanState::new(SplitOptions::default());
/// let statements = split_statements("delimiter $$\nSELECT 1$$SELECT 2$$", &mut state);
/// assert_eq!(statements, vec!["SELECT 1", "SELECT 2"]);
/// assert_eq!(state.delimiter(), "$$");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanState {
    mode: LexerMode,
    delimiter: String,
    options: SplitOptions,
    in_statement: bool,
    /// A literal opened inside a conditional comment returns to it.
    in_conditional: bool,
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new(SplitOptions::default())
    }
}

impl ScanState {
    /// Fresh state with the default `;` delimiter.
    #[must_use]
    pub fn new(options: SplitOptions) -> Self {
        Self {
            mode: LexerMode::Normal,
            delimiter: DEFAULT_DELIMITER.to_owned(),
            options,
            in_statement: false,
            in_conditional: false,
        }
    }

    /// Fresh state with a custom delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::EmptyDelimiter`] if `delimiter` is empty.
    pub fn with_delimiter(options: SplitOptions, delimiter: &str) -> Result<Self, SplitError> {
        let mut state = Self::new(options);
        state.set_delimiter(delimiter)?;
        Ok(state)
    }

    /// Replaces the active delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::EmptyDelimiter`] if `delimiter` is empty; the
    /// active delimiter is left unchanged.
    pub fn set_delimiter(&mut self, delimiter: &str) -> Result<(), SplitError> {
        if delimiter.is_empty() {
            return Err(SplitError::EmptyDelimiter);
        }
        delimiter.clone_into(&mut self.delimiter);
        Ok(())
    }

    /// The active statement delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The lexical mode at the current position.
    #[must_use]
    pub fn mode(&self) -> LexerMode {
        self.mode
    }

    /// The options this state scans with.
    #[must_use]
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Whether non-space statement text was seen since the last flush.
    #[must_use]
    pub fn in_statement(&self) -> bool {
        self.in_statement
    }

    /// The quote character of the open literal, if any.
    #[must_use]
    pub fn active_quote(&self) -> Option<char> {
        match self.mode {
            LexerMode::StringLiteral(quote) => Some(quote.open),
            _ => None,
        }
    }

    /// The closing bracket of the open Q-escape literal, if any.
    #[must_use]
    pub fn q_escape_close(&self) -> Option<char> {
        match self.mode {
            LexerMode::StringLiteral(quote) => quote.close,
            _ => None,
        }
    }

    pub(crate) fn set_options(&mut self, options: SplitOptions) {
        self.options = options;
    }

    /// End of input: whatever is still open is closed implicitly.
    fn close_open_mode(&mut self) {
        self.mode = LexerMode::Normal;
        self.in_statement = false;
        self.in_conditional = false;
    }

    fn mode_after_literal(&self) -> LexerMode {
        if self.in_conditional {
            LexerMode::Conditional
        } else {
            LexerMode::Normal
        }
    }
}

/// What ends one output entry and starts the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    /// Block pass: client directives and standalone `/` lines.
    ClientDirective,
    /// Statement pass: the active delimiter, plus `delimiter` directives.
    Delimiter,
}

/// What the scanner does after handling one position.
enum Step {
    /// Continue at the given position.
    Advance(usize),
    /// Ignore the rest of the line.
    StopLine,
}

/// Per-line bookkeeping that does not outlive [`LineScanner::feed_line`].
struct Line {
    out: String,
    /// A boundary was hit on this line.
    flushed: bool,
    /// `in_statement` as it was before the line started.
    in_statement_at_start: bool,
}

/// Splits lines into output entries according to a [`Boundary`].
#[derive(Debug)]
pub(crate) struct LineScanner {
    state: ScanState,
    boundary: Boundary,
    buffer: String,
    output: Vec<String>,
    /// The last entry was closed by a `/` line and takes no trailing comments.
    sealed: bool,
}

impl LineScanner {
    pub(crate) fn from_state(state: ScanState, boundary: Boundary) -> Self {
        Self {
            state,
            boundary,
            buffer: String::new(),
            output: Vec::new(),
            sealed: false,
        }
    }

    pub(crate) fn state(&self) -> &ScanState {
        &self.state
    }

    /// Scans one physical line, without its terminator.
    pub(crate) fn feed_line(&mut self, text: &str) {
        if text.is_empty() && self.buffer.is_empty() {
            return;
        }
        if self.is_block_terminator(text) {
            self.buffer.push_str(text);
            self.emit();
            self.sealed = true;
            self.state.in_statement = false;
            return;
        }

        let chars: Vec<char> = text.chars().collect();
        let cursor = LineCursor::new(&chars);
        let mut line = Line {
            out: String::new(),
            flushed: false,
            in_statement_at_start: self.state.in_statement,
        };
        let mut pos = 0;
        while let Some(ch) = cursor.at(pos) {
            match self.step(&cursor, pos, ch, &mut line) {
                Step::Advance(next) => pos = next,
                Step::StopLine => break,
            }
        }

        if matches!(
            self.state.mode,
            LexerMode::SingleLineComment | LexerMode::Hint(HintKind::Line)
        ) {
            self.state.mode = LexerMode::Normal;
        }
        if !line.out.is_empty() || !self.buffer.is_empty() {
            self.buffer.push_str(&line.out);
            self.buffer.push('\n');
        }
    }

    /// Takes the entries that can no longer change.
    ///
    /// A trailing comment may still be merged into the most recent entry
    /// until new statement text starts, so that entry is held back while the
    /// scanner is between statements.
    pub(crate) fn take_ready(&mut self) -> Vec<String> {
        let keep = usize::from(!self.state.in_statement && !self.output.is_empty());
        let ready = self.output.len() - keep;
        self.output.drain(..ready).collect()
    }

    /// Flushes the residual accumulator and returns all remaining entries
    /// together with the state for the next chunk.
    pub(crate) fn finish(mut self) -> (Vec<String>, ScanState) {
        if !self.buffer.trim().is_empty() {
            let residual = self.buffer.trim_end_matches('\n');
            trace!("flushing residual entry ({} bytes)", residual.len());
            self.output.push(residual.to_owned());
        }
        self.state.close_open_mode();
        (self.output, self.state)
    }

    fn is_block_terminator(&self, text: &str) -> bool {
        self.boundary == Boundary::ClientDirective
            && self.state.mode == LexerMode::Normal
            && text.trim() == "/"
    }

    fn step(&mut self, cursor: &LineCursor<'_>, pos: usize, ch: char, line: &mut Line) -> Step {
        let options = self.state.options;

        if ch == ' ' && line.out.is_empty() && self.buffer.is_empty() && !options.preserve_format {
            return Step::Advance(pos + 1);
        }

        if self.boundary == Boundary::Delimiter
            && self.state.mode == LexerMode::Normal
            && is_delimiter_directive(&line.out, options.preserve_format)
        {
            let next = self.apply_delimiter_directive(cursor, pos);
            line.out.clear();
            self.state.in_statement = line.in_statement_at_start;
            return Step::Advance(next);
        }

        if options.dialect.is_mysql() && ch == '\\' && self.state.mode != LexerMode::MultiLineComment
        {
            return self.backslash_escape(cursor, pos, line);
        }

        match self.state.mode {
            LexerMode::MultiLineComment => self.block_comment_body(cursor, pos, ch, line),
            LexerMode::Hint(kind) => {
                if kind == HintKind::Block && cursor.starts_with(pos, "*/") {
                    line.out.push_str("*/");
                    self.state.mode = LexerMode::Normal;
                    return Step::Advance(pos + 2);
                }
                self.push_text(line, ch);
                Step::Advance(pos + 1)
            }
            LexerMode::StringLiteral(quote) => {
                if ch == quote.open {
                    let closes = match quote.close {
                        None => true,
                        Some(close) => cursor.prev(pos) == Some(close),
                    };
                    if closes {
                        self.state.mode = self.state.mode_after_literal();
                    }
                }
                self.push_text(line, ch);
                Step::Advance(pos + 1)
            }
            // Line comments never survive past the line that opened them.
            LexerMode::SingleLineComment => Step::StopLine,
            LexerMode::Normal | LexerMode::Conditional => self.normal(cursor, pos, ch, line),
        }
    }

    fn normal(&mut self, cursor: &LineCursor<'_>, pos: usize, ch: char, line: &mut Line) -> Step {
        let options = self.state.options;
        let dialect = options.dialect;

        if self.state.mode == LexerMode::Conditional && cursor.starts_with(pos, "*/") {
            line.out.push_str("*/");
            self.state.mode = LexerMode::Normal;
            self.state.in_conditional = false;
            return Step::Advance(pos + 2);
        }

        match self.boundary {
            Boundary::Delimiter => {
                if delimiter_at(cursor, pos, &self.state.delimiter) {
                    self.flush_line(line);
                    return Step::Advance(pos + self.state.delimiter.chars().count());
                }
            }
            Boundary::ClientDirective => {
                if client_directive_at(cursor, pos) {
                    trace!("client directive {:?} closes chunk", cursor.rest(pos));
                    self.flush_line(line);
                    return Step::StopLine;
                }
            }
        }

        if self.state.mode == LexerMode::Normal {
            if line_comment_at(cursor, pos, dialect) {
                self.buffer.push_str(&mem::take(&mut line.out));
                if options.preserve_single_line_comments {
                    self.retain_line_comment(cursor.rest(pos), line.flushed);
                }
                self.state.mode = LexerMode::SingleLineComment;
                return Step::StopLine;
            }
            if block_comment_at(cursor, pos, dialect) {
                if options.preserve_multi_line_comments {
                    line.out.push_str("/*");
                }
                self.state.mode = LexerMode::MultiLineComment;
                return Step::Advance(pos + 2);
            }
            if block_hint_at(cursor, pos) {
                self.push_marker(line, "/*+", LexerMode::Hint(HintKind::Block));
                return Step::Advance(pos + 3);
            }
            if line_hint_at(cursor, pos, dialect) {
                self.push_marker(line, "--+", LexerMode::Hint(HintKind::Line));
                return Step::Advance(pos + 3);
            }
            if conditional_comment_at(cursor, pos, dialect) {
                self.push_marker(line, "/*!", LexerMode::Conditional);
                self.state.in_conditional = true;
                return Step::Advance(pos + 3);
            }
        }

        if is_quote(ch) {
            self.state.mode = LexerMode::StringLiteral(Quote {
                open: ch,
                close: q_escape_at(cursor, pos, dialect),
            });
        }
        self.push_text(line, ch);
        Step::Advance(pos + 1)
    }

    fn block_comment_body(
        &mut self,
        cursor: &LineCursor<'_>,
        pos: usize,
        ch: char,
        line: &mut Line,
    ) -> Step {
        if !cursor.starts_with(pos, "*/") {
            if self.state.options.preserve_multi_line_comments {
                line.out.push(ch);
            }
            return Step::Advance(pos + 1);
        }

        self.state.mode = LexerMode::Normal;
        self.buffer.push_str(&mem::take(&mut line.out));
        if self.state.options.preserve_multi_line_comments {
            self.buffer.push_str("*/");
            if !self.state.in_statement && !self.sealed {
                if let Some(last) = self.output.last_mut() {
                    last.push_str(&mem::take(&mut self.buffer));
                }
            }
        }
        Step::Advance(pos + 2)
    }

    /// MySQL: a backslash and the character after it are copied verbatim.
    fn backslash_escape(&mut self, cursor: &LineCursor<'_>, pos: usize, line: &mut Line) -> Step {
        self.push_text(line, '\\');
        match cursor.at(pos + 1) {
            // An escaped backtick still closes a backtick identifier.
            Some('`')
                if matches!(self.state.mode, LexerMode::StringLiteral(q) if q.open == '`') =>
            {
                Step::Advance(pos + 1)
            }
            Some(next) => {
                self.push_text(line, next);
                Step::Advance(pos + 2)
            }
            None => Step::StopLine,
        }
    }

    /// Reads the token after `delimiter ` and makes it the active delimiter.
    /// Returns the position just past the token and its terminating space.
    fn apply_delimiter_directive(&mut self, cursor: &LineCursor<'_>, pos: usize) -> usize {
        let mut token = String::new();
        let mut idx = pos;
        while let Some(c) = cursor.at(idx) {
            if c != ' ' {
                token.push(c);
            } else if !token.is_empty() {
                break;
            }
            idx += 1;
        }
        if token.is_empty() {
            warn!(
                "ignoring delimiter directive without a token; keeping {:?}",
                self.state.delimiter
            );
        } else {
            debug!("delimiter changed from {:?} to {token:?}", self.state.delimiter);
            self.state.delimiter = token;
        }
        idx + 1
    }

    /// Keeps a `--` comment, attaching it to the previous entry when nothing
    /// but spaces was scanned since that entry ended.
    fn retain_line_comment(&mut self, comment: String, flushed_on_this_line: bool) {
        if is_blank_spaces(&self.buffer) && !self.sealed {
            if let Some(last) = self.output.last_mut() {
                if !flushed_on_this_line {
                    last.push('\n');
                }
                last.push_str(&mem::take(&mut self.buffer));
                last.push_str(&comment);
                last.push('\n');
                return;
            }
        }
        self.buffer.push_str(&comment);
    }

    fn push_marker(&mut self, line: &mut Line, marker: &str, mode: LexerMode) {
        line.out.push_str(marker);
        self.state.in_statement = true;
        self.state.mode = mode;
    }

    fn push_text(&mut self, line: &mut Line, ch: char) {
        line.out.push(ch);
        if ch != ' ' {
            self.state.in_statement = true;
        }
    }

    fn flush_line(&mut self, line: &mut Line) {
        self.buffer.push_str(&mem::take(&mut line.out));
        self.emit();
        line.flushed = true;
        self.state.in_statement = false;
    }

    fn emit(&mut self) {
        self.sealed = false;
        let entry = mem::take(&mut self.buffer);
        trace!("emitting entry {} ({} bytes)", self.output.len(), entry.len());
        self.output.push(entry);
    }
}
