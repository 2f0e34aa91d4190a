#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sqlsplit::{
    Dialect, ScanState, SplitOptions, StatementReader, split_blocks, split_script, split_statements,
};

#[derive(Debug, Arbitrary)]
struct Input {
    flags: u8,
    delimiter: Option<String>,
    script: String,
}

fn options(flags: u8) -> SplitOptions {
    SplitOptions {
        preserve_format: flags & 1 != 0,
        preserve_single_line_comments: flags & 2 != 0,
        preserve_multi_line_comments: flags & 4 != 0,
        dialect: if flags & 8 != 0 {
            Dialect::MySql
        } else {
            Dialect::Oracle
        },
    }
}

fn splitter(input: Input) {
    let options = options(input.flags);

    let state = match input.delimiter.as_deref() {
        Some(delimiter) => match ScanState::with_delimiter(options, delimiter) {
            Ok(state) => state,
            Err(_) => {
                assert!(delimiter.is_empty());
                return;
            }
        },
        None => ScanState::new(options),
    };

    // Streaming and one-shot splitting must agree on every input.
    let mut one_shot = state.clone();
    let expected = split_statements(&input.script, &mut one_shot);
    let mut reader = StatementReader::with_state(input.script.as_bytes(), state);
    let streamed = reader
        .by_ref()
        .collect::<Result<Vec<_>, _>>()
        .expect("reading from a slice cannot fail");
    assert_eq!(streamed, expected);
    assert_eq!(reader.state(), &one_shot);
    assert_eq!(reader.iterated_bytes(), input.script.len() as u64);

    let mut block_state = ScanState::new(options);
    for chunk in split_blocks(&input.script, &mut block_state) {
        assert!(!chunk.is_empty());
        assert_eq!(chunk.trim(), chunk);
    }

    let _ = split_script(&input.script, &options);
}

fuzz_target!(|input: Input| splitter(input));
