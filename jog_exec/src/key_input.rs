//! # Raw console key input
//!
//! Keys are read one at a time with no line buffering, so a jog begins the
//! moment the operator presses a key. The [`KeySource`] trait abstracts the
//! source of key presses, allowing the control loop to be driven from a
//! script under test. [`ConsoleKeys`] is the real implementation on top of
//! the console's raw mode.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A single key press read from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,

    /// A printable character key, pressed without control or alt.
    Char(char),

    /// Ctrl+C. Raw mode swallows the usual interrupt signal, so it arrives
    /// here as a key event instead and must end the control loop.
    Interrupt,

    /// Any other key.
    Other,
}

/// Errors which can occur while reading keys from the console.
#[derive(Debug, Error)]
pub enum KeyInputError {
    #[error("Could not switch the console into raw mode: {0}")]
    RawModeError(std::io::Error),

    #[error("Could not read from the console: {0}")]
    ReadError(std::io::Error),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A blocking source of key presses.
pub trait KeySource {
    /// Block until the next key press is available.
    fn next_key(&mut self) -> Result<KeyPress, KeyInputError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Key source reading from the real console.
///
/// The console is put into raw mode on construction and restored on drop,
/// whichever way the control loop exits.
pub struct ConsoleKeys;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ConsoleKeys {
    /// Switch the console into raw mode and return the key source.
    pub fn new() -> Result<Self, KeyInputError> {
        terminal::enable_raw_mode().map_err(KeyInputError::RawModeError)?;

        Ok(ConsoleKeys)
    }
}

impl Drop for ConsoleKeys {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl KeySource for ConsoleKeys {
    fn next_key(&mut self) -> Result<KeyPress, KeyInputError> {
        loop {
            let event = event::read().map_err(KeyInputError::ReadError)?;

            if let Some(key) = decode_event(&event) {
                return Ok(key);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Decode a console event into a key press, or `None` for events the control
/// loop never sees.
fn decode_event(event: &Event) -> Option<KeyPress> {
    // Only key down events count, key repeats and releases are dropped
    // along with mouse and resize events
    let key = match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => key,
        _ => return None,
    };

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(KeyPress::Interrupt);
    }

    Some(match key.code {
        KeyCode::Left => KeyPress::ArrowLeft,
        KeyCode::Right => KeyPress::ArrowRight,
        KeyCode::Up => KeyPress::ArrowUp,
        KeyCode::Down => KeyPress::ArrowDown,
        // Control and alt chords are not character input
        KeyCode::Char(_)
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            KeyPress::Other
        }
        KeyCode::Char(c) => KeyPress::Char(c),
        _ => KeyPress::Other,
    })
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
