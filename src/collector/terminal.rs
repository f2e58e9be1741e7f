//! Terminal key-event collector.
//!
//! Reads raw key events from the terminal on a background thread and
//! forwards them to the capture loop over a channel. The terminal stays in
//! raw mode only while the collector is running.

use crate::collector::types::{CaptureEvent, KeyPress};
use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Errors that can occur during terminal capture.
#[derive(Debug)]
pub enum CollectorError {
    AlreadyRunning,
    Terminal(String),
}

impl std::fmt::Display for CollectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectorError::AlreadyRunning => write!(f, "Collector is already running"),
            CollectorError::Terminal(msg) => write!(f, "Terminal error: {msg}"),
        }
    }
}

impl std::error::Error for CollectorError {}

/// Collects key presses from the terminal on a background thread.
pub struct TerminalCollector {
    sender: Sender<CaptureEvent>,
    receiver: Receiver<CaptureEvent>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TerminalCollector {
    /// Create a new terminal collector.
    pub fn new() -> Self {
        let (sender, receiver) = bounded(10_000);
        Self {
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start capturing key events.
    ///
    /// Puts the terminal in raw mode and spawns the reader thread.
    pub fn start(&mut self) -> Result<(), CollectorError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(CollectorError::AlreadyRunning);
        }

        terminal::enable_raw_mode().map_err(|e| CollectorError::Terminal(e.to_string()))?;
        self.running.store(true, Ordering::SeqCst);

        let sender = self.sender.clone();
        let running = self.running.clone();
        self.handle = Some(std::thread::spawn(move || {
            read_loop(&sender, &running);
        }));

        Ok(())
    }

    /// Stop capturing and restore the terminal.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Warning: Could not restore the terminal: {e}");
        }
    }

    /// Check if the collector is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for capture events.
    pub fn receiver(&self) -> &Receiver<CaptureEvent> {
        &self.receiver
    }
}

impl Default for TerminalCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalCollector {
    fn drop(&mut self) {
        // The reader thread may have already exited on its own (Esc); the
        // terminal still needs restoring in that case.
        if self.handle.is_some() {
            self.stop();
        }
    }
}

/// Reader thread body: poll the terminal and forward key presses.
fn read_loop(sender: &Sender<CaptureEvent>, running: &AtomicBool) {
    while running.load(Ordering::SeqCst) {
        match event::poll(Duration::from_millis(100)) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(_) => break,
        }

        let Ok(raw) = event::read() else { break };
        let Event::Key(key) = raw else { continue };

        // Repeats count as fresh presses; releases are ignored.
        if key.kind == KeyEventKind::Release {
            continue;
        }

        let is_ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let capture_event = match key.code {
            KeyCode::Esc => CaptureEvent::Finished,
            KeyCode::Char('c') | KeyCode::Char('d') if is_ctrl => CaptureEvent::Finished,
            KeyCode::Backspace => CaptureEvent::Key(KeyPress::backspace()),
            _ => CaptureEvent::Key(KeyPress::other()),
        };

        let finished = capture_event == CaptureEvent::Finished;
        if sender.send(capture_event).is_err() || finished {
            break;
        }
    }

    running.store(false, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_starts_stopped() {
        let collector = TerminalCollector::new();
        assert!(!collector.is_running());
        assert!(collector.receiver().is_empty());
    }
}
