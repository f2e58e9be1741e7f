//! Key-event collection for capture sessions.
//!
//! The collector reads key presses from the terminal and forwards them to
//! the capture loop, stripped down to the backspace/other distinction.

pub mod terminal;
pub mod types;

// Re-export commonly used types
pub use terminal::{CollectorError, TerminalCollector};
pub use types::{CaptureEvent, KeyPress};
