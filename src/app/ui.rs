// Handles the rendering of the progress transcript to the console.

use super::error::StepError;
use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;
use std::fmt::Display;
use std::io::{self, Stderr, Stdout, Write};

/// Writes progress to `out` and failures to `err`. Write errors are
/// dropped, since there is nowhere left to report them.
pub struct Console<O: Write, E: Write> {
    out: O,
    err: E,
    color: bool,
}

impl Console<Stdout, Stderr> {
    pub fn stdio() -> Self {
        let out = io::stdout();
        let err = io::stderr();
        let color = out.is_tty() && err.is_tty();
        Self::new(out, err, color)
    }
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(out: O, err: E, color: bool) -> Self {
        Self { out, err, color }
    }

    /// Step banner, e.g. `--- Attempting to stop the 'w32time' service... ---`.
    pub fn heading(&mut self, text: impl Display) {
        let line = format!("--- {} ---", text);
        let line = self.paint(line, Color::Cyan, true);
        let _ = writeln!(self.out, "{}", line);
    }

    pub fn info(&mut self, text: impl Display) {
        let _ = writeln!(self.out, "{}", text);
    }

    /// Success line followed by a blank separator.
    pub fn success(&mut self, text: impl Display) {
        let line = self.paint(text.to_string(), Color::Green, false);
        let _ = writeln!(self.out, "{}\n", line);
    }

    pub fn note(&mut self, text: impl Display) {
        let line = self.paint(text.to_string(), Color::Green, false);
        let _ = writeln!(self.out, "{}", line);
    }

    pub fn failure(&mut self, text: impl Display) {
        let line = self.paint(text.to_string(), Color::Red, false);
        let _ = writeln!(self.err, "{}", line);
    }

    pub fn step_error(&mut self, error: &StepError) {
        match error {
            StepError::Platform { operation, source } => {
                let code = source
                    .raw_os_error()
                    .map_or_else(|| "-".to_string(), |code| code.to_string());
                let line = self.paint(format!("Error: {} failed.", operation), Color::Red, true);
                let _ = writeln!(self.err, "{}", line);
                let _ = writeln!(self.err, "Code: {} - {}", code, source);
            }
            StepError::Timeout { target, .. } => {
                let line = format!("Error: Timeout waiting for service to reach state {}", target);
                let line = self.paint(line, Color::Red, true);
                let _ = writeln!(self.err, "{}", line);
            }
        }
    }

    pub fn done(&mut self) {
        let _ = writeln!(self.out, "\nDone.");
        let _ = self.out.flush();
        let _ = self.err.flush();
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn paint(&self, text: String, color: Color, bold: bool) -> String {
        if !self.color {
            return text;
        }
        let styled = text.with(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}
