use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::page::Page;

pub const ALERT_HINT: &str = "(press Enter to continue)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Submit,
    Acknowledged,
}

pub struct TerminalPage<W> {
    state: Mutex<TerminalState<W>>,
}

struct TerminalState<W> {
    writer: W,
    query: String,
    output: String,
    alerts_pending: usize,
    // Output that arrived while an alert was waiting for acknowledgement.
    output_deferred: bool,
}

impl<W: Write + Send> TerminalState<W> {
    fn emit(&mut self, text: &str, what: &str) {
        if let Err(err) = writeln!(self.writer, "{text}").and_then(|_| self.writer.flush()) {
            warn!(error = %err, "failed to write {what}");
        }
    }
}

impl<W: Write + Send> TerminalPage<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: Mutex::new(TerminalState {
                writer,
                query: String::new(),
                output: String::new(),
                alerts_pending: 0,
                output_deferred: false,
            }),
        }
    }

    /// Feeds one line of user input to the page. Each pending alert takes
    /// one line to acknowledge.
    pub fn accept_line(&self, line: &str) -> LineAction {
        let mut state = self.lock();
        if state.alerts_pending > 0 {
            state.alerts_pending -= 1;
            if state.alerts_pending == 0 && state.output_deferred {
                state.output_deferred = false;
                let output = state.output.clone();
                state.emit(&output, "output");
            }
            return LineAction::Acknowledged;
        }
        state.query = line.to_string();
        LineAction::Submit
    }

    pub fn alert_pending(&self) -> bool {
        self.lock().alerts_pending > 0
    }

    pub fn output(&self) -> String {
        self.lock().output.clone()
    }

    fn lock(&self) -> MutexGuard<'_, TerminalState<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TerminalPage<Vec<u8>> {
    pub fn transcript(&self) -> String {
        String::from_utf8_lossy(&self.lock().writer).into_owned()
    }
}

impl<W: Write + Send> Page for TerminalPage<W> {
    fn query(&self) -> String {
        self.lock().query.clone()
    }

    fn set_output(&self, text: &str) {
        let text = plain_text(text);
        let mut state = self.lock();
        if state.alerts_pending > 0 {
            state.output_deferred = true;
        } else {
            state.emit(&text, "output");
        }
        state.output = text;
    }

    fn alert(&self, message: &str) {
        let message = plain_text(message);
        let mut state = self.lock();
        state.emit(&format!("[alert] {message}\n{ALERT_HINT}"), "alert");
        state.alerts_pending += 1;
    }
}

/// Replaces control characters other than newline and tab so server text
/// cannot drive the terminal.
fn plain_text(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_control() && c != '\n' && c != '\t' {
                char::REPLACEMENT_CHARACTER
            } else {
                c
            }
        })
        .collect()
}
