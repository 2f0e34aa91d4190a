use super::*;
use crate::Dialect;

fn cursor_over(line: &str) -> Vec<char> {
    line.chars().collect()
}

fn scan(boundary: Boundary, options: SplitOptions, lines: &[&str]) -> (Vec<String>, ScanState) {
    let mut scanner = LineScanner::from_state(ScanState::new(options), boundary);
    for line in lines {
        scanner.feed_line(line);
    }
    scanner.finish()
}

fn mysql() -> SplitOptions {
    SplitOptions {
        dialect: Dialect::MySql,
        ..Default::default()
    }
}

#[test]
fn slash_delimiter_ignores_comment_markers() {
    let chars = cursor_over("a / b */ /*");
    let cursor = LineCursor::new(&chars);
    assert!(classify::delimiter_at(&cursor, 2, "/"));
    assert!(!classify::delimiter_at(&cursor, 7, "/"));
    assert!(!classify::delimiter_at(&cursor, 9, "/"));
}

#[test]
fn line_hint_needs_a_body() {
    let hint = cursor_over("--+FULL(t)");
    let hint = LineCursor::new(&hint);
    assert!(classify::line_hint_at(&hint, 0, Dialect::Oracle));
    assert!(!classify::line_comment_at(&hint, 0, Dialect::Oracle));

    let spaced = cursor_over("--+ FULL(t)");
    let spaced = LineCursor::new(&spaced);
    assert!(!classify::line_hint_at(&spaced, 0, Dialect::Oracle));
    assert!(classify::line_comment_at(&spaced, 0, Dialect::Oracle));
}

#[test]
fn mysql_dash_comment_requires_space() {
    for (line, expected) in [("-- x", true), ("--", true), ("--x", false), ("#x", true)] {
        let chars = cursor_over(line);
        let cursor = LineCursor::new(&chars);
        assert_eq!(
            classify::line_comment_at(&cursor, 0, Dialect::MySql),
            expected,
            "{line:?}"
        );
    }
    let chars = cursor_over("#x");
    assert!(!classify::line_comment_at(
        &LineCursor::new(&chars),
        0,
        Dialect::Oracle
    ));
}

#[test]
fn bang_comment_is_conditional_only_for_mysql() {
    let chars = cursor_over("/*!40101 x */");
    let cursor = LineCursor::new(&chars);
    assert!(classify::block_comment_at(&cursor, 0, Dialect::Oracle));
    assert!(!classify::block_comment_at(&cursor, 0, Dialect::MySql));
    assert!(classify::conditional_comment_at(&cursor, 0, Dialect::MySql));

    let hint = cursor_over("/*+ x */");
    assert!(!classify::block_comment_at(
        &LineCursor::new(&hint),
        0,
        Dialect::Oracle
    ));
}

#[test]
fn q_escape_maps_brackets() {
    for (line, close) in [
        ("q'<", Some('>')),
        ("Q'{", Some('}')),
        ("q'[", Some(']')),
        ("q'(", Some(')')),
        ("q'!", Some('!')),
        ("x'[", None),
    ] {
        let chars = cursor_over(line);
        assert_eq!(
            classify::q_escape_at(&LineCursor::new(&chars), 1, Dialect::Oracle),
            close,
            "{line:?}"
        );
    }
    let chars = cursor_over("q'[");
    assert_eq!(
        classify::q_escape_at(&LineCursor::new(&chars), 1, Dialect::MySql),
        None
    );
}

#[test]
fn client_directive_patterns() {
    for (line, pos, expected) in [
        ("PROMPT hello", 0, true),
        ("prompt", 0, true),
        ("PROMPTX", 0, false),
        ("SET DEFINE OFF", 0, true),
        ("set linesize 200", 0, true),
        ("SET x = 1", 0, false),
        ("SELECT 1", 0, false),
        ("SPOOL out.log", 0, true),
        ("a REM x", 2, true),
        ("aREM x", 1, false),
    ] {
        let chars = cursor_over(line);
        assert_eq!(
            classify::client_directive_at(&LineCursor::new(&chars), pos),
            expected,
            "{line:?}"
        );
    }
}

#[test]
fn delimiter_directive_header() {
    assert!(classify::is_delimiter_directive("delimiter ", false));
    assert!(classify::is_delimiter_directive("DELIMITER ", false));
    assert!(classify::is_delimiter_directive("  delimiter ", true));
    assert!(!classify::is_delimiter_directive("  delimiter ", false));
    assert!(!classify::is_delimiter_directive("delimiter", false));
    assert!(!classify::is_delimiter_directive("\tdelimiter ", true));
    assert!(!classify::is_delimiter_directive(" \tdelimiter ", true));
}

#[test]
fn set_delimiter_rejects_empty() {
    let mut state = ScanState::default();
    assert!(matches!(
        state.set_delimiter(""),
        Err(SplitError::EmptyDelimiter)
    ));
    assert_eq!(state.delimiter(), ";");

    let state = ScanState::with_delimiter(SplitOptions::default(), "$$").unwrap();
    assert_eq!(state.delimiter(), "$$");
}

#[test]
fn string_mode_carries_across_lines() {
    let mut scanner =
        LineScanner::from_state(ScanState::default(), Boundary::Delimiter);
    scanner.feed_line("SELECT 'a;");
    assert_eq!(scanner.state().active_quote(), Some('\''));
    assert_eq!(
        scanner.state().mode(),
        LexerMode::StringLiteral(Quote {
            open: '\'',
            close: None
        })
    );
    scanner.feed_line("b';");
    let (statements, state) = scanner.finish();
    assert_eq!(statements, vec!["SELECT 'a;\nb'"]);
    assert_eq!(state.mode(), LexerMode::Normal);
}

#[test]
fn q_escape_state_is_visible() {
    let mut scanner =
        LineScanner::from_state(ScanState::default(), Boundary::Delimiter);
    scanner.feed_line("SELECT q'[it's");
    assert_eq!(scanner.state().q_escape_close(), Some(']'));
    scanner.feed_line("fine]' FROM dual;");
    let (statements, _) = scanner.finish();
    assert_eq!(statements, vec!["SELECT q'[it's\nfine]' FROM dual"]);
}

#[test]
fn take_ready_holds_back_mergeable_entry() {
    let mut scanner = LineScanner::from_state(
        ScanState::new(SplitOptions::preserving_all(Dialect::Oracle)),
        Boundary::Delimiter,
    );
    scanner.feed_line("SELECT 1;");
    assert!(scanner.take_ready().is_empty());
    scanner.feed_line("-- c");
    assert!(scanner.take_ready().is_empty());
    scanner.feed_line("SELECT 2");
    assert_eq!(scanner.take_ready(), vec!["SELECT 1\n-- c\n"]);

    let (rest, _) = scanner.finish();
    assert_eq!(rest, vec!["SELECT 2"]);
}

#[test]
fn finish_closes_unterminated_comment() {
    let (statements, state) = scan(
        Boundary::Delimiter,
        SplitOptions::default(),
        &["SELECT /* open"],
    );
    assert_eq!(statements, vec!["SELECT "]);
    assert_eq!(state.mode(), LexerMode::Normal);
    assert!(!state.in_statement());
}

#[test]
fn slash_line_inside_comment_does_not_close_block() {
    let (chunks, _) = scan(
        Boundary::ClientDirective,
        SplitOptions::preserving_all(Dialect::Oracle),
        &["BEGIN", "/* comment", "/", "*/", "/"],
    );
    assert_eq!(chunks, vec!["BEGIN\n/* comment\n/\n*/\n/"]);
}

#[test]
fn empty_delimiter_directive_is_ignored() {
    let (statements, state) = scan(
        Boundary::Delimiter,
        SplitOptions::default(),
        &["delimiter   ", "SELECT 1;"],
    );
    assert_eq!(statements, vec!["SELECT 1"]);
    assert_eq!(state.delimiter(), ";");
}

#[test]
fn indented_directive_needs_preserve_format() {
    let (statements, state) = scan(
        Boundary::Delimiter,
        SplitOptions::preserving_all(Dialect::MySql),
        &["  delimiter $$", "SELECT 1$$"],
    );
    assert_eq!(statements, vec!["SELECT 1"]);
    assert_eq!(state.delimiter(), "$$");
}

#[test]
fn block_hint_spans_lines_verbatim() {
    let (statements, _) = scan(
        Boundary::Delimiter,
        SplitOptions::default(),
        &["SELECT /*+ FULL(t);", "  INDEX(t i) */ * FROM t;"],
    );
    assert_eq!(
        statements,
        vec!["SELECT /*+ FULL(t);\n  INDEX(t i) */ * FROM t"]
    );
}

#[test]
fn line_hint_ends_with_line() {
    let (statements, _) = scan(
        Boundary::Delimiter,
        SplitOptions::default(),
        &["SELECT --+INDEX(t);", "* FROM t;"],
    );
    assert_eq!(statements, vec!["SELECT --+INDEX(t);\n* FROM t"]);
}

#[test]
fn conditional_comment_keeps_literal_inside() {
    let (statements, state) = scan(
        Boundary::Delimiter,
        mysql(),
        &["/*!40101 SET x='*/' */;", "SELECT 2;"],
    );
    assert_eq!(statements, vec!["/*!40101 SET x='*/' */", "SELECT 2"]);
    assert_eq!(state.mode(), LexerMode::Normal);
}

#[test]
fn mysql_backslash_escapes_quote() {
    let (statements, _) = scan(
        Boundary::Delimiter,
        mysql(),
        &[r"SELECT 'it\'s;';"],
    );
    assert_eq!(statements, vec![r"SELECT 'it\'s;'"]);

    let (statements, _) = scan(
        Boundary::Delimiter,
        SplitOptions::default(),
        &[r"SELECT 'a\';"],
    );
    assert_eq!(statements, vec![r"SELECT 'a\'"]);
}

#[test]
fn mysql_escaped_backtick_closes_identifier() {
    let (statements, _) = scan(Boundary::Delimiter, mysql(), &[r"SELECT `a\`;"]);
    assert_eq!(statements, vec![r"SELECT `a\`"]);
}

#[test]
fn double_delimiter_emits_empty_statement() {
    let (statements, _) = scan(
        Boundary::Delimiter,
        SplitOptions::default(),
        &["SELECT 1;;SELECT 2;"],
    );
    assert_eq!(statements, vec!["SELECT 1", "", "SELECT 2"]);
}

#[test]
fn block_comment_after_delimiter_joins_previous_statement() {
    let (statements, _) = scan(
        Boundary::Delimiter,
        SplitOptions::preserving_all(Dialect::Oracle),
        &["SELECT 1; /* c */", "SELECT 2;"],
    );
    assert_eq!(statements, vec!["SELECT 1 /* c */", "SELECT 2"]);
}

#[test]
fn leading_block_comment_stays_with_its_statement() {
    let (statements, _) = scan(
        Boundary::Delimiter,
        SplitOptions::preserving_all(Dialect::Oracle),
        &["/* c */ SELECT 1;"],
    );
    assert_eq!(statements, vec!["/* c */ SELECT 1"]);

    let (statements, _) = scan(
        Boundary::Delimiter,
        SplitOptions::preserving_all(Dialect::Oracle),
        &["SELECT 1 /* c */;"],
    );
    assert_eq!(statements, vec!["SELECT 1 /* c */"]);
}

#[test]
fn text_after_block_comment_is_copied_as_written() {
    let (statements, _) = scan(
        Boundary::Delimiter,
        SplitOptions::preserving_all(Dialect::Oracle),
        &["SELECT /* c */ 1;"],
    );
    assert_eq!(statements, vec!["SELECT /* c */ 1"]);

    let (statements, _) = scan(
        Boundary::Delimiter,
        SplitOptions::default(),
        &["SELECT /* c */ 1;"],
    );
    assert_eq!(statements, vec!["SELECT  1"]);
}

#[test]
fn tab_indented_directive_is_plain_text() {
    let (statements, state) = scan(
        Boundary::Delimiter,
        SplitOptions::preserving_all(Dialect::MySql),
        &["\tdelimiter $$", "SELECT 1;"],
    );
    assert_eq!(statements, vec!["\tdelimiter $$\nSELECT 1"]);
    assert_eq!(state.delimiter(), ";");
}

#[test]
fn slash_terminated_chunk_takes_no_trailing_comment() {
    for comment in ["-- done", "/* done */"] {
        let (chunks, _) = scan(
            Boundary::ClientDirective,
            SplitOptions::preserving_all(Dialect::Oracle),
            &["BEGIN", "NULL;", "END;", "/", comment],
        );
        assert_eq!(chunks, vec!["BEGIN\nNULL;\nEND;\n/", comment], "{comment:?}");
    }
}
