//! The toy shell running inside terminal windows.
//!
//! Each terminal owns a [`Shell`] with its own scrollback.  Input is one
//! line at a time; the first word, lowercased, picks the command.  Every
//! command echoes the prompt line before its output, except `clear`.

use chrono::Local;
use std::time::Instant;

/// Printed at the top of every new terminal.
pub const STARTUP_MESSAGE: &str = "\
HackerOS v1.0.0 (tty1)
 Kernel: 6.8.9-hacker-hardened

 Welcome to Hackerland.
 > Press Alt+Enter to open a Terminal
 > Press Alt+Q to close the active window
 > Press Alt+D to open Application Launcher
 > Press Alt+1...5 to switch workspaces
";

pub const PROMPT: &str = "➜  ~";

const HELP: &str = "Available commands: help, clear, neofetch, whoami, ls, date, exit";

/// Format used by `date`.
pub const DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S %z";

#[derive(Debug, Clone)]
pub struct Shell {
    scrollback: Vec<String>,
    booted: Instant,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self::booted_at(Instant::now())
    }

    /// A shell whose `neofetch` uptime counts from `booted`.
    pub fn booted_at(booted: Instant) -> Self {
        Self {
            scrollback: STARTUP_MESSAGE.lines().map(str::to_string).collect(),
            booted,
        }
    }

    pub fn scrollback(&self) -> &[String] {
        &self.scrollback
    }

    /// The last `n` scrollback lines.
    pub fn tail(&self, n: usize) -> &[String] {
        let start = self.scrollback.len().saturating_sub(n);
        &self.scrollback[start..]
    }

    /// Run one line of input.
    pub fn execute(&mut self, line: &str) {
        let command = line
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_lowercase();

        let output = match command.as_str() {
            "clear" => {
                self.scrollback.clear();
                return;
            }
            "help" => HELP.to_string(),
            "whoami" => "root@hackerland".to_string(),
            "ls" => "Desktop  Documents  Downloads  Music  Pictures  Videos".to_string(),
            "date" => Local::now().format(DATE_FORMAT).to_string(),
            "neofetch" => self.neofetch(),
            "exit" => "Cannot exit init process.".to_string(),
            "" => String::new(),
            other => format!("zsh: command not found: {}", other),
        };

        self.scrollback.push(format!("{} {}", PROMPT, line));
        if output.is_empty() {
            self.scrollback.push(output);
        } else {
            self.scrollback.extend(output.lines().map(str::to_string));
        }
    }

    fn neofetch(&self) -> String {
        let mins = self.booted.elapsed().as_secs() / 60;
        [
            r"       /\        OS: HackerOS x86_64".to_string(),
            r"      /  \       Host: Hackerland VM".to_string(),
            r"     / /\ \      Kernel: 6.8.9-hardened".to_string(),
            format!(r"    / /  \ \     Uptime: {} mins", mins),
            r"   / /    \ \    Shell: zsh 5.9".to_string(),
            r"  / /      \ \   DE: Hackerland (Text)".to_string(),
            r"  \/        \/   Memory: 640KB / 64GB".to_string(),
        ]
        .join("\n")
    }
}
