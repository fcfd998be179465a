//! Entry point for the **hackerland** daemon.
//!
//! Loads the configuration, spawns the command sources, the clock and the
//! renderer on background threads, and processes incoming commands on the
//! main thread.
//!
//! Flags:
//!
//! * `--print-config` prints the effective configuration as JSON and exits.
//! * `--print-bindings` lists the key bindings and exits.
//! * `--json` makes the renderer emit one JSON scene per line instead of
//!   text frames.

use hackerland::bar::{self, StatusBar};
use hackerland::command::Command;
use hackerland::config::Config;
use hackerland::desktop::Desktop;
use hackerland::input::InputRouter;
use hackerland::ipc::listener::{default_socket_path, spawn_broadcaster, Clients, UnixSocketListener};
use hackerland::ipc::stdin::StdinSource;
use hackerland::render::{RenderMode, TextRenderer};
use hackerland::traits::{CommandSource, SceneEvent, StateReport};
use hackerland::vfs::{VirtualFs, CONFIG_PATH};
use log::{error, info};
use std::sync::mpsc;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let has_flag = |flag: &str| args.iter().any(|a| a == flag);

    let fs = VirtualFs::with_defaults();
    let config = Config::load_or_default(&fs, CONFIG_PATH);

    if has_flag("--print-config") {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("failed to serialize config: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if has_flag("--print-bindings") {
        for (chord, cmd) in InputRouter::default().bindings() {
            match serde_json::to_string(&cmd) {
                Ok(json) => println!("{:<14} {}", chord, json),
                Err(e) => error!("failed to serialize binding {}: {}", chord, e),
            }
        }
        return;
    }

    let mode = if has_flag("--json") {
        RenderMode::Json
    } else {
        RenderMode::Text
    };

    run_daemon(config, mode);
}

fn run_daemon(config: Config, mode: RenderMode) {
    //  Rendering side
    let (scene_tx, scene_rx) = mpsc::channel::<SceneEvent>();
    bar::spawn_clock(scene_tx.clone());
    {
        let config = config.clone();
        std::thread::spawn(move || {
            let bar = StatusBar::new("~/.config/HackerLand.hk");
            let mut renderer = TextRenderer::new(std::io::stdout(), config, bar, mode);
            if let Err(e) = renderer.run(scene_rx) {
                error!("renderer error: {}", e);
            }
        });
    }

    //  Command side
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    let clients = spawn_command_sources(cmd_tx);

    let (state_tx, state_rx) = mpsc::channel::<StateReport>();
    spawn_broadcaster(state_rx, clients);

    let mut desktop = Desktop::new(config);
    desktop.set_scene_sink(scene_tx.clone());
    desktop.set_state_sink(state_tx);
    // First frame: the idle screen.
    let _ = scene_tx.send(SceneEvent::Frame(desktop.scene()));
    drop(scene_tx);

    info!("hackerland running");
    for cmd in cmd_rx {
        if let Err(e) = desktop.handle(cmd) {
            error!("command error: {}", e);
        }
    }
    info!("all command sources closed, exiting");
}

/// Start the socket and stdin sources.  Returns the socket's clients so
/// state reports can reach them.
fn spawn_command_sources(tx: mpsc::Sender<Command>) -> Clients {
    let mut socket = UnixSocketListener::new(default_socket_path());
    let clients = socket.clients();
    {
        let tx = tx.clone();
        std::thread::spawn(move || {
            if let Err(e) = socket.run(tx) {
                error!("socket listener error: {}", e);
            }
        });
    }

    {
        let tx = tx.clone();
        std::thread::spawn(move || {
            let mut source = StdinSource::new();
            if let Err(e) = source.run(tx) {
                error!("stdin error: {}", e);
            }
        });
    }

    drop(tx);
    clients
}
