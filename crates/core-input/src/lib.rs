//! Modal key translation.
//!
//! [`Keymap`] is a small state machine: it holds the current [`Mode`], a
//! pending numeric count, the pending selection operator, and the command
//! line under construction. Each key event yields zero or more [`Command`]s
//! for the application to apply, and may switch the mode.

use core_events::{Command, Mode};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use tracing::warn;

/// What a selection, once confirmed with Enter, turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Yank,
    Delete,
}

#[derive(Debug, Default)]
pub struct Keymap {
    mode: Mode,
    count: usize,
    operator: Option<Operator>,
    command_line: String,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The partial `:` command, for echo in the message row.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// The accumulated count, zero when none has been typed.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn handle(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Insert => self.handle_insert(key),
            Mode::Select => self.handle_select(key),
            Mode::Command => self.handle_command(key),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => vec![Command::Quit],
                _ => Vec::new(),
            };
        }
        match key.code {
            KeyCode::Char(c @ '0'..='9') => {
                self.count = self.count.saturating_mul(10) + (c as usize - '0' as usize);
                Vec::new()
            }
            KeyCode::Char('h') | KeyCode::Left => vec![Command::Retreat(self.take_count())],
            KeyCode::Char('l') | KeyCode::Right => vec![Command::Advance(self.take_count())],
            KeyCode::Char('k') | KeyCode::Up => vec![Command::Up(self.take_count())],
            KeyCode::Char('j') | KeyCode::Down => vec![Command::Down(self.take_count())],
            KeyCode::Home => vec![Command::Home],
            KeyCode::End => vec![Command::End],
            KeyCode::Char('i') => {
                self.mode = Mode::Insert;
                self.count = 0;
                Vec::new()
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Insert;
                self.count = 0;
                vec![Command::Advance(1)]
            }
            KeyCode::Char('y') => self.enter_select(Operator::Yank),
            KeyCode::Char('d') => self.enter_select(Operator::Delete),
            KeyCode::Char('m') => {
                // Only meaningful with a count prefix; a bare m does nothing.
                if self.count == 0 {
                    Vec::new()
                } else {
                    vec![Command::MoveToLine(self.take_count())]
                }
            }
            KeyCode::Char('p') => {
                self.count = 0;
                vec![Command::PasteRequest]
            }
            KeyCode::Char(':') => {
                self.mode = Mode::Command;
                self.count = 0;
                self.command_line.clear();
                Vec::new()
            }
            KeyCode::Delete => vec![Command::RemoveFront(self.take_count())],
            KeyCode::Esc => {
                self.count = 0;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_insert(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                Vec::new()
            }
            KeyCode::Enter => vec![Command::InsertNewline],
            KeyCode::Tab => vec![Command::Insert(vec![b'\t'])],
            KeyCode::Backspace => vec![Command::RemoveBack(1)],
            KeyCode::Delete => vec![Command::RemoveFront(1)],
            KeyCode::Left => vec![Command::Retreat(1)],
            KeyCode::Right => vec![Command::Advance(1)],
            KeyCode::Up => vec![Command::Up(1)],
            KeyCode::Down => vec![Command::Down(1)],
            KeyCode::Home => vec![Command::Home],
            KeyCode::End => vec![Command::End],
            KeyCode::Char(c) => {
                let mut bytes = [0u8; 4];
                vec![Command::Insert(c.encode_utf8(&mut bytes).as_bytes().to_vec())]
            }
            _ => Vec::new(),
        }
    }

    fn handle_select(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char(c @ '0'..='9') => {
                self.count = self.count.saturating_mul(10) + (c as usize - '0' as usize);
                Vec::new()
            }
            KeyCode::Char('h') | KeyCode::Left => vec![Command::Retreat(self.take_count())],
            KeyCode::Char('l') | KeyCode::Right => vec![Command::Advance(self.take_count())],
            KeyCode::Char('k') | KeyCode::Up => vec![Command::Up(self.take_count())],
            KeyCode::Char('j') | KeyCode::Down => vec![Command::Down(self.take_count())],
            KeyCode::Home => vec![Command::Home],
            KeyCode::End => vec![Command::End],
            KeyCode::Enter => {
                let op = self.operator.take();
                self.mode = Mode::Normal;
                self.count = 0;
                match op {
                    Some(Operator::Yank) => {
                        vec![Command::YankSelection, Command::CancelSelection]
                    }
                    Some(Operator::Delete) => {
                        vec![Command::DeleteSelection, Command::CancelSelection]
                    }
                    None => vec![Command::CancelSelection],
                }
            }
            // Backspace deletes the selection whatever the pending operator.
            KeyCode::Backspace => {
                self.operator = None;
                self.mode = Mode::Normal;
                self.count = 0;
                vec![Command::DeleteSelection, Command::CancelSelection]
            }
            KeyCode::Esc => {
                self.operator = None;
                self.mode = Mode::Normal;
                self.count = 0;
                vec![Command::CancelSelection]
            }
            _ => Vec::new(),
        }
    }

    fn handle_command(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.command_line.clear();
                self.mode = Mode::Normal;
                Vec::new()
            }
            KeyCode::Backspace => {
                if self.command_line.pop().is_none() {
                    self.mode = Mode::Normal;
                }
                Vec::new()
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.command_line);
                self.mode = Mode::Normal;
                parse_command(line.trim())
            }
            KeyCode::Char(c) => {
                self.command_line.push(c);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn enter_select(&mut self, op: Operator) -> Vec<Command> {
        self.mode = Mode::Select;
        self.operator = Some(op);
        self.count = 0;
        vec![Command::BeginSelection]
    }

    /// Consume the pending count, defaulting to one.
    fn take_count(&mut self) -> usize {
        let n = self.count.max(1);
        self.count = 0;
        n
    }
}

/// Parse a completed `:` line into commands.
fn parse_command(line: &str) -> Vec<Command> {
    match line {
        "" => Vec::new(),
        "w" => vec![Command::Save],
        "q" => vec![Command::Quit],
        "wq" => vec![Command::Save, Command::Quit],
        _ => match line.split_once(' ') {
            Some(("e", path)) if !path.trim().is_empty() => {
                vec![Command::Load(PathBuf::from(path.trim()))]
            }
            _ => {
                warn!(target: "input.keymap", command = line, "unknown_command");
                Vec::new()
            }
        },
    }
}
