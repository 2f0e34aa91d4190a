use core::mem;
use std::{collections::VecDeque, io::BufRead};

use bstr::ByteSlice;
use log::debug;

use crate::{
    ScanState, SplitError, SplitOptions,
    scanner::{Boundary, LineScanner},
};

#[derive(Debug)]
enum Phase {
    Scanning(LineScanner),
    Done(ScanState),
}

/// Streams statements out of a [`BufRead`] one line at a time.
///
/// The reader yields the same statements, in the same order, as
/// [`split_statements`](crate::split_statements) over the whole input would.
/// A statement is yielded once no later comment can still be appended to it,
/// so at most one finished statement is held back at a time.
///
/// Invalid UTF-8 is replaced with `U+FFFD`. After an I/O error the iterator is
/// exhausted.
///
/// # Examples
///
/// ```rust
/// use sqlsplit::{SplitOptions, StatementReader};
///
/// let input = "SELECT 1;\nSELECT 2;\n".as_bytes();
/// let statements = StatementReader::new(input, SplitOptions::default())
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
/// assert_eq!(statements, vec!["SELECT 1", "SELECT 2"]);
/// ```
#[derive(Debug)]
pub struct StatementReader<R> {
    reader: R,
    phase: Phase,
    pending: VecDeque<String>,
    line: Vec<u8>,
    iterated_bytes: u64,
}

impl<R: BufRead> StatementReader<R> {
    /// Creates a reader that starts with the default `;` delimiter.
    pub fn new(reader: R, options: SplitOptions) -> Self {
        Self::with_state(reader, ScanState::new(options))
    }

    /// Creates a reader that continues from an existing state, e.g. one whose
    /// delimiter was set by an earlier script.
    pub fn with_state(reader: R, state: ScanState) -> Self {
        Self {
            reader,
            phase: Phase::Scanning(LineScanner::from_state(state, Boundary::Delimiter)),
            pending: VecDeque::new(),
            line: Vec::new(),
            iterated_bytes: 0,
        }
    }

    /// Number of input bytes consumed so far, line terminators included.
    #[must_use]
    pub fn iterated_bytes(&self) -> u64 {
        self.iterated_bytes
    }

    /// The scan state at the current position. Once the input is exhausted
    /// this is the state to hand to the next script.
    #[must_use]
    pub fn state(&self) -> &ScanState {
        match &self.phase {
            Phase::Scanning(scanner) => scanner.state(),
            Phase::Done(state) => state,
        }
    }

    fn finish(&mut self) {
        let phase = mem::replace(&mut self.phase, Phase::Done(ScanState::default()));
        if let Phase::Scanning(scanner) = phase {
            let (rest, state) = scanner.finish();
            self.pending.extend(rest);
            debug!("reader exhausted after {} bytes", self.iterated_bytes);
            self.phase = Phase::Done(state);
        }
    }

    fn read_line(&mut self) -> Result<(), SplitError> {
        let Phase::Scanning(scanner) = &mut self.phase else {
            return Ok(());
        };
        self.line.clear();
        let read = self.reader.read_until(b'\n', &mut self.line)?;
        if read == 0 {
            self.finish();
            return Ok(());
        }
        self.iterated_bytes += read as u64;

        let mut bytes = self.line.as_slice();
        if let Some(stripped) = bytes.strip_suffix(b"\n") {
            bytes = stripped.strip_suffix(b"\r").unwrap_or(stripped);
        }
        scanner.feed_line(&bytes.to_str_lossy());
        self.pending.extend(scanner.take_ready());
        Ok(())
    }
}

impl<R: BufRead> Iterator for StatementReader<R> {
    type Item = Result<String, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(statement) = self.pending.pop_front() {
                return Some(Ok(statement));
            }
            if matches!(self.phase, Phase::Done(_)) {
                return None;
            }
            if let Err(err) = self.read_line() {
                self.finish();
                self.pending.clear();
                return Some(Err(err));
            }
        }
    }
}
