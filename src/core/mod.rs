//! Core typing-session tracking.
//!
//! This module contains:
//! - Keystroke timing capture and anomaly detection
//! - Immutable snapshot export
//!
//! It has no platform or network dependencies; the clipboard and HTTP
//! collaborators live in their own modules.

pub mod snapshot;
pub mod tracker;

// Re-export commonly used types
pub use snapshot::KeyprintSnapshot;
pub use tracker::{TypingTracker, ANOMALY_THRESHOLD};
