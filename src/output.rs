// ABOUTME: Output formatting for release, prune, and stack feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON line output modes.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// One JSON line. Results go to stdout, warnings and errors to stderr.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Success {
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_secs: Option<f64>,
    },
    Detail {
        key: &'a str,
        value: &'a str,
    },
    Warning {
        message: &'a str,
    },
    Error {
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_secs: Option<f64>,
    },
}

impl Event<'_> {
    fn to_stderr(&self) -> bool {
        matches!(self, Event::Warning { .. } | Event::Error { .. })
    }
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    started: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Seconds since `start_timer`, if it was called.
    pub fn elapsed(&self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    /// Whether interactive widgets (prompts, progress bars) may be drawn.
    pub fn is_interactive(&self) -> bool {
        self.mode == OutputMode::Normal
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print the final result, with timing in normal mode.
    pub fn success(&self, message: &str) {
        match (self.mode, self.elapsed()) {
            (OutputMode::Normal, Some(secs)) => println!("{message} ({secs:.1}s)"),
            (OutputMode::Normal | OutputMode::Quiet, _) => println!("{message}"),
            (OutputMode::Json, duration_secs) => emit(&Event::Success {
                message,
                duration_secs,
            }),
        }
    }

    /// Print a key/value line such as a stack output or the live version.
    pub fn detail(&self, key: &str, value: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("  {key}: {value}"),
            OutputMode::Json => emit(&Event::Detail { key, value }),
        }
    }

    /// Print a non-fatal warning (suppressed in quiet mode).
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit(&Event::Warning { message }),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => emit(&Event::Error {
                message,
                duration_secs: self.elapsed(),
            }),
        }
    }
}

fn emit(event: &Event<'_>) {
    let Ok(line) = serde_json::to_string(event) else {
        return;
    };
    if event.to_stderr() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}
