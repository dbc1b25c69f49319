//! Command vocabulary and editor modes.
//!
//! The input dispatcher produces [`Command`]s; the editing core consumes
//! them. This crate is plain data so both sides can depend on it without
//! pulling in terminal or storage machinery.

use std::path::PathBuf;

/// Everything the editing core can be asked to do. This is the complete
/// call surface between input handling and the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert raw bytes at the cursor.
    Insert(Vec<u8>),
    /// Insert a line break, indented to the current line's scope depth.
    InsertNewline,
    /// Forward delete up to `n` bytes.
    RemoveFront(usize),
    /// Backspace up to `n` bytes.
    RemoveBack(usize),
    Advance(usize),
    Retreat(usize),
    Up(usize),
    Down(usize),
    Home,
    End,
    BeginSelection,
    CancelSelection,
    DeleteSelection,
    /// Export the selected bytes to the system clipboard.
    YankSelection,
    /// Jump to a 1-based line.
    MoveToLine(usize),
    Load(PathBuf),
    Save,
    /// Ask the terminal for its clipboard contents.
    PasteRequest,
    Quit,
}

/// Modal editing states, in the order they appear on the mode line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Select,
    Command,
}

impl Mode {
    /// Mode-line label, padded the way the status bar renders it.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => " NORMAL ",
            Mode::Insert => " INSERT ",
            Mode::Select => " SELECT ",
            Mode::Command => " COMMAND ",
        }
    }
}
