//! Event types for the capture collector.
//!
//! These types carry ONLY the key distinction the tracker needs - backspace
//! versus any other key. No characters or key codes leave the collector.

/// A key press stripped down to the one distinction the tracker makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// Whether the pressed key was backspace
    pub is_backspace: bool,
}

impl KeyPress {
    /// A backspace press.
    pub fn backspace() -> Self {
        Self { is_backspace: true }
    }

    /// Any other key press.
    pub fn other() -> Self {
        Self {
            is_backspace: false,
        }
    }
}

/// Events emitted by the collector to the capture loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A key was pressed
    Key(KeyPress),
    /// The user ended the capture session (Esc, Ctrl-C, or Ctrl-D)
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_constructors() {
        assert!(KeyPress::backspace().is_backspace);
        assert!(!KeyPress::other().is_backspace);
    }
}
