//! Console progress bar
//!
//! Renders a single-line bar that is redrawn in place with a carriage return:
//!
//! ```text
//! uniform_200M_uint64 [==========                              ] - 12.40s / 49.61s, eta 37.21s
//! ```
//!
//! The message shows elapsed time, the estimated total time, and the time left.
//! It is left empty while no estimate is available.

use super::{ProgressSink, ProgressUpdate};
use std::io::{self, Stdout, Write};

/// Default bar width in characters
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Render one progress line (without carriage return)
pub fn render_bar(label: &str, fraction: f64, message: &str, width: usize) -> String {
    let bars = ((fraction.clamp(0.0, 1.0) * width as f64).floor() as usize).min(width);
    let empty = width - bars;

    let mut line = format!("{} [{}{}]", label, "=".repeat(bars), " ".repeat(empty));
    if !message.is_empty() {
        line.push_str(" - ");
        line.push_str(message);
    }
    line
}

/// Progress bar drawn to a terminal (stdout by default)
pub struct ConsoleProgress<W: Write = Stdout> {
    label: String,
    width: usize,
    out: W,
}

impl ConsoleProgress<Stdout> {
    /// Bar on stdout labelled with the dataset file name
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_writer(label, io::stdout())
    }
}

impl<W: Write> ConsoleProgress<W> {
    /// Bar on an arbitrary writer
    pub fn with_writer(label: impl Into<String>, out: W) -> Self {
        Self {
            label: label.into(),
            width: DEFAULT_BAR_WIDTH,
            out,
        }
    }

    /// Set bar width in characters
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// Consume the bar and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn message(update: &ProgressUpdate) -> String {
        if update.elements_written == 0 || update.is_complete() {
            return String::new();
        }
        match (update.estimated_total(), update.eta()) {
            (Some(total), Some(eta)) => format!(
                "{:.2}s / {:.2}s, eta {:.2}s",
                update.elapsed.as_secs_f64(),
                total.as_secs_f64(),
                eta.as_secs_f64()
            ),
            _ => String::new(),
        }
    }
}

impl<W: Write> ProgressSink for ConsoleProgress<W> {
    fn report(&mut self, update: &ProgressUpdate) {
        let line = render_bar(
            &self.label,
            update.fraction(),
            &Self::message(update),
            self.width,
        );

        // Display only; a broken terminal must not fail the write
        let _ = write!(self.out, "\r{}", line);
        if update.is_complete() {
            let _ = writeln!(self.out);
        }
        let _ = self.out.flush();
    }
}
