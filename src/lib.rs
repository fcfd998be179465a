//! **hackerland**: a minimal tiling desktop simulation.
//!
//! Windows are tiled (master-stack, monocle or grid) on five numbered
//! workspaces, with a scratchpad and sticky windows on the side.  The
//! look and spacing come from a small line-oriented configuration DSL read
//! from an in-memory file tree at startup.
//!
//! # Architecture
//!
//! * [`desktop::Desktop`] owns all mutable state and handles one
//!   [`command::Command`] at a time.  After each command it publishes a
//!   [`traits::Scene`] snapshot.
//! * [`wm::WindowManager`] keeps windows, focus and workspace membership;
//!   [`layout`] turns the visible windows into rectangles.
//! * [`config`] parses the `.hk` DSL and merges it over the defaults.
//! * [`traits::CommandSource`] abstracts the transports that deliver
//!   commands.  Implementations live in [`ipc`] (Unix socket and stdin).
//! * [`render::TextRenderer`] draws scenes on its own thread; the clock in
//!   [`bar`] feeds it independently.

pub mod bar;
pub mod command;
pub mod config;
pub mod desktop;
pub mod input;
pub mod ipc;
pub mod launcher;
pub mod layout;
pub mod render;
pub mod shell;
pub mod traits;
pub mod vfs;
pub mod wm;
pub mod workspace;
