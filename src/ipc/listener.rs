//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and serves each connection on its own
//! thread.  Each line received is parsed as a JSON-encoded [`Command`].
//! Every connection also joins the listener's [`Clients`], which receive
//! one JSON [`StateReport`] line per successful command.
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"SpawnWindow":"terminal"}
//! "CloseActiveWindow"
//! {"SetActiveWorkspace":3}
//! "CycleLayout"
//! {"ResizeMaster":0.05}
//! {"LauncherQuery":"fire"}
//! {"ShellInput":{"window":1,"line":"neofetch"}}
//! {"Key":"alt+enter"}
//! ```

use super::{forward_lines, Drained};
use crate::command::Command;
use crate::traits::{CommandSource, StateReport};
use log::{debug, error, info};
use std::io::{BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// File name of the socket inside the runtime directory.
pub const SOCKET_NAME: &str = "hackerland.sock";

/// A client that stops reading is dropped after this long.
const WRITE_TIMEOUT: Duration = Duration::from_millis(250);

/// `$XDG_RUNTIME_DIR/hackerland.sock`, or under `/tmp` when the variable
/// is unset.
pub fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    Path::new(&runtime).join(SOCKET_NAME)
}

/// The connected clients of a [`UnixSocketListener`].  Cloning gives
/// another handle to the same set.
#[derive(Debug, Clone, Default)]
pub struct Clients {
    streams: Arc<Mutex<Vec<UnixStream>>>,
}

impl Clients {
    fn add(&self, stream: UnixStream) {
        if let Err(e) = stream.set_write_timeout(Some(WRITE_TIMEOUT)) {
            debug!("cannot set write timeout: {}", e);
        }
        self.streams
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(stream);
    }

    /// Write `line` and a newline to every client.  Clients that fail the
    /// write are dropped.  Returns how many were reached.
    pub fn broadcast(&self, line: &str) -> usize {
        let mut streams = self
            .streams
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        streams.retain_mut(|stream| match writeln!(stream, "{}", line) {
            Ok(()) => true,
            Err(e) => {
                debug!("dropping client: {}", e);
                false
            }
        });
        streams.len()
    }
}

/// Broadcast every report received on `reports` to `clients` as compact
/// JSON.  The thread exits when all senders are gone.
pub fn spawn_broadcaster(reports: mpsc::Receiver<StateReport>, clients: Clients) -> JoinHandle<()> {
    thread::spawn(move || {
        for report in reports {
            match serde_json::to_string(&report) {
                Ok(line) => {
                    let reached = clients.broadcast(&line);
                    debug!("state sent to {} client(s)", reached);
                }
                Err(e) => error!("failed to encode state: {}", e),
            }
        }
        debug!("state channel closed, broadcaster exiting");
    })
}

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands, and stays subscribed to state broadcasts until it goes away.
pub struct UnixSocketListener {
    path: PathBuf,
    clients: Clients,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse one wire line.
pub fn parse_wire_command(text: &str) -> Result<Command, UnixSocketError> {
    Ok(serde_json::from_str(text)?)
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            clients: Clients::default(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A handle to this listener's clients, for [`spawn_broadcaster`].
    pub fn clients(&self) -> Clients {
        self.clients.clone()
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the command channel closes.  Run it on a
    /// dedicated thread.  The channel closing is noticed on the next
    /// connection attempt.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());
        let closed = Arc::new(AtomicBool::new(false));

        for stream in listener.incoming() {
            if closed.load(Ordering::SeqCst) {
                info!("sink closed, shutting down");
                let _ = std::fs::remove_file(&self.path);
                return Ok(());
            }
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    match stream.try_clone() {
                        Ok(writer) => self.clients.add(writer),
                        Err(e) => error!("client will not get state updates: {}", e),
                    }
                    let sink = sink.clone();
                    let closed = Arc::clone(&closed);
                    thread::spawn(move || {
                        match forward_lines(BufReader::new(stream), &sink, parse_wire_command) {
                            Ok(Drained::Eof) => debug!("client disconnected"),
                            Ok(Drained::SinkClosed) => closed.store(true, Ordering::SeqCst),
                            Err(e) => error!("read error: {}", e),
                        }
                    });
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        Ok(())
    }
}

//  Tests
