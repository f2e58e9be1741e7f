//! Immutable keyprint snapshots for export and transmission.

use serde::{Deserialize, Serialize};

/// An immutable projection of a typing session.
///
/// This is the shape shared between the tracker and the verification client,
/// and the shape written to the clipboard and export files. Field order is
/// stable: `intervals`, `duration`, `backspaceCount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyprintSnapshot {
    /// Millisecond gaps between consecutive key presses
    pub intervals: Vec<u64>,
    /// Total session duration in milliseconds
    pub duration: u64,
    /// Number of backspace presses during the session
    #[serde(rename = "backspaceCount")]
    pub backspace_count: u64,
}

impl KeyprintSnapshot {
    /// Whether the snapshot holds no timing data.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Pretty-printed JSON rendering with 2-space indentation.
    pub fn formatted(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
