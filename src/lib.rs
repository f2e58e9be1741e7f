//! Keyprint - keystroke-timing capture and verification client.
//!
//! This library captures keystroke timing during a typing session, flags
//! statistically anomalous intervals, and ships the resulting "keyprint"
//! snapshot to a remote verification service.
//!
//! Only timing is captured: the tracker distinguishes backspace from any
//! other key and records nothing else about what was typed.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                         Keyprint                          │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌───────────────┐   ┌───────────────┐   │
//! │  │ Collector  │──▶│ TypingTracker │──▶│   Snapshot    │   │
//! │  │ (terminal) │   │  (intervals,  │   │  (immutable)  │   │
//! │  └────────────┘   │   anomalies)  │   └───────┬───────┘   │
//! │                   └───────────────┘           │           │
//! │                                       ┌───────┴───────┐   │
//! │                                       ▼               ▼   │
//! │                               ┌───────────┐   ┌─────────┐ │
//! │                               │ Clipboard │   │ Client  │ │
//! │                               │   (best   │   │ (store/ │ │
//! │                               │  effort)  │   │ verify) │ │
//! │                               └───────────┘   └─────────┘ │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use keyprint::TypingTracker;
//!
//! let mut tracker = TypingTracker::new();
//! tracker.record_key_press(0, false);
//! tracker.record_key_press(100, false);
//! tracker.record_key_press(200, false);
//! tracker.record_key_press(300, false);
//! tracker.record_key_press(900, false);
//!
//! // The 600 ms pause stands out against the 100 ms cadence.
//! assert_eq!(tracker.anomalies(), &[3]);
//!
//! let snapshot = tracker.snapshot();
//! assert_eq!(snapshot.duration, 900);
//! ```

pub mod client;
pub mod clipboard;
pub mod collector;
pub mod config;
pub mod core;

// Re-export key types at crate root for convenience
pub use client::{ApiError, BlockingKeyprintClient, ClientConfig, KeyprintClient, VerifyResult};
pub use clipboard::{copy_snapshot, ClipboardSink, SystemClipboard};
pub use collector::{CaptureEvent, CollectorError, KeyPress, TerminalCollector};
pub use config::{Config, ConfigError};
pub use core::{KeyprintSnapshot, TypingTracker, ANOMALY_THRESHOLD};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
