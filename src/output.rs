// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Step markers and outcomes in normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    #[default]
    Normal,
    /// Minimal output for CI (only final result and errors)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Announce the start of a pipeline step.
    pub fn step(&self, number: u8, title: &str) {
        match self.mode {
            OutputMode::Normal => println!("\n=== STEP {number}: {title} ==="),
            OutputMode::Quiet => {}
            OutputMode::Json => emit(&JsonEvent {
                event: "step",
                message: title,
                step: Some(number),
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("  → {message}");
        }
    }

    /// Mark a step or action as done (suppressed in quiet mode).
    pub fn done(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("  ✓ {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit(&JsonEvent {
                event: "done",
                message,
                step: None,
                duration_secs: None,
            }),
        }
    }

    /// Mark a step or action as failed. Always shown.
    pub fn failed(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("  ✗ {message}"),
            OutputMode::Json => emit_err(&JsonEvent {
                event: "failed",
                message,
                step: None,
                duration_secs: None,
            }),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => emit(&JsonEvent {
                event: "success",
                message,
                step: None,
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print a warning message.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => emit_err(&JsonEvent {
                event: "warning",
                message,
                step: None,
                duration_secs: None,
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => emit_err(&JsonEvent {
                event: "error",
                message,
                step: None,
                duration_secs: self.duration(),
            }),
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

fn emit(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

fn emit_err(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        eprintln!("{json}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_event_skips_empty_fields() {
        let event = JsonEvent {
            event: "step",
            message: "Push Source Code",
            step: Some(3),
            duration_secs: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"event":"step","message":"Push Source Code","step":3}"#
        );
    }

    #[test]
    fn elapsed_is_zero_without_timer() {
        let output = Output::new(OutputMode::Quiet);
        assert_eq!(output.elapsed_secs(), 0.0);
    }
}
