//! Standard-input [`CommandSource`].
//!
//! Reads one command per line.  A line starting with `{` or `"` is taken as
//! JSON in the socket wire format; anything else is a key chord such as
//! `alt+enter`, delivered as [`Command::Key`].

use super::{forward_lines, Drained};
use crate::command::Command;
use crate::input::{ChordError, KeyChord};
use crate::traits::CommandSource;
use log::info;
use std::io::{self, BufRead, BufReader};
use std::sync::mpsc;

/// Errors produced while reading commands from a text stream.
#[derive(Debug, thiserror::Error)]
pub enum StdinError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad key chord: {0}")]
    Chord(#[from] ChordError),
}

/// Parse a single interactive line.
pub fn parse_line(text: &str) -> Result<Command, StdinError> {
    let text = text.trim();
    if text.starts_with('{') || text.starts_with('"') {
        Ok(serde_json::from_str(text)?)
    } else {
        let chord: KeyChord = text.parse()?;
        Ok(Command::Key(chord))
    }
}

/// A [`CommandSource`] reading from any buffered reader; standard input by
/// default.
pub struct StdinSource<R: BufRead + Send> {
    reader: Option<R>,
}

impl StdinSource<BufReader<io::Stdin>> {
    /// Read from the process's standard input.
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(io::stdin()))
    }
}

impl Default for StdinSource<BufReader<io::Stdin>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead + Send> StdinSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

impl<R: BufRead + Send> CommandSource for StdinSource<R> {
    type Error = StdinError;

    /// Forward lines until end of input.  A second call returns
    /// immediately.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        let Some(reader) = self.reader.take() else {
            return Ok(());
        };
        match forward_lines(reader, &sink, parse_line)? {
            Drained::Eof => info!("end of input"),
            Drained::SinkClosed => info!("sink closed, no longer reading input"),
        }
        Ok(())
    }
}
