//! Command sources fed by text streams.
//!
//! External tools (scripts, key-bind helpers, a human at a terminal) send
//! one command per line, either over a Unix socket ([`listener`]) or on
//! standard input ([`stdin`]).

pub mod listener;
pub mod stdin;

use crate::command::Command;
use log::{debug, error};
use std::fmt;
use std::io::{self, BufRead};
use std::sync::mpsc;

/// How a line stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Drained {
    /// The stream reached end of file.
    Eof,
    /// The receiving end of the command channel is gone.
    SinkClosed,
}

/// Parse every non-blank line of `reader` with `parse` and forward the
/// results into `sink`.  Lines that fail to parse are logged and skipped.
pub(crate) fn forward_lines<R, F, E>(
    reader: R,
    sink: &mpsc::Sender<Command>,
    parse: F,
) -> io::Result<Drained>
where
    R: BufRead,
    F: Fn(&str) -> Result<Command, E>,
    E: fmt::Display,
{
    for line in reader.lines() {
        let text = line?;
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        match parse(text) {
            Ok(cmd) => {
                debug!("received {:?}", cmd);
                if sink.send(cmd).is_err() {
                    return Ok(Drained::SinkClosed);
                }
            }
            Err(e) => error!("bad command: {}: {}", text, e),
        }
    }
    Ok(Drained::Eof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::WindowKind;
    use std::io::Cursor;

    fn json(text: &str) -> Result<Command, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[test]
    fn skips_blank_and_bad_lines() {
        let input = "\n  \n{\"SpawnWindow\":\"browser\"}\nnope\n\"OpenLauncher\"\n";
        let (tx, rx) = mpsc::channel();
        let end = forward_lines(Cursor::new(input), &tx, json).unwrap();
        assert_eq!(end, Drained::Eof);
        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(
            cmds,
            vec![Command::SpawnWindow(WindowKind::Browser), Command::OpenLauncher]
        );
    }

    #[test]
    fn stops_when_sink_closes() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let end = forward_lines(Cursor::new("\"OpenLauncher\"\n"), &tx, json).unwrap();
        assert_eq!(end, Drained::SinkClosed);
    }
}
