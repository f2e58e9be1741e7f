//! Best-effort clipboard export of keyprint snapshots.
//!
//! The clipboard is an injected capability so the tracking core stays free
//! of platform dependencies. Failures are reported as `false` and logged;
//! they are never raised to the caller.

use crate::core::KeyprintSnapshot;

/// A scoped text-write capability.
///
/// Implemented by the system clipboard and by test doubles.
pub trait ClipboardSink {
    /// Attempt to write the given text.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard error type.
#[derive(Debug)]
pub struct ClipboardError(pub String);

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Clipboard error: {}", self.0)
    }
}

impl std::error::Error for ClipboardError {}

/// System clipboard backed by `arboard`.
///
/// The underlying handle is opened per write: clipboard availability can
/// change between calls (headless sessions, locked displays).
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

/// Copy a snapshot's formatted JSON to the given clipboard.
///
/// Returns whether the write succeeded. Failure is logged to stderr and
/// swallowed; the underlying cause does not propagate.
pub fn copy_snapshot(sink: &mut dyn ClipboardSink, snapshot: &KeyprintSnapshot) -> bool {
    match sink.write_text(&snapshot.formatted()) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Warning: Failed to copy keyprint to clipboard: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingClipboard {
        contents: Option<String>,
        fail: bool,
    }

    impl ClipboardSink for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError("denied".to_string()));
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    fn sample() -> KeyprintSnapshot {
        KeyprintSnapshot {
            intervals: vec![120, 95],
            duration: 215,
            backspace_count: 0,
        }
    }

    #[test]
    fn test_copy_writes_formatted_snapshot() {
        let mut clipboard = RecordingClipboard::default();
        assert!(copy_snapshot(&mut clipboard, &sample()));

        let written = clipboard.contents.unwrap();
        assert_eq!(written, sample().formatted());
        assert!(written.contains("\"backspaceCount\": 0"));
    }

    #[test]
    fn test_copy_failure_reports_false() {
        let mut clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        assert!(!copy_snapshot(&mut clipboard, &sample()));
        assert!(clipboard.contents.is_none());
    }
}
