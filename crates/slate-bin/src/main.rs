//! Slate entrypoint.
//!
//! One synchronous loop: block on the next terminal event, translate it
//! through the modal keymap, apply the resulting commands to the edit
//! view, repaint as much as the redraw hints require.

use anyhow::Result;
use clap::Parser;
use core_config::Config;
use core_events::{Command, Mode};
use core_input::Keymap;
use core_render::{EditView, RedrawHint};
use core_terminal::{CrosstermBackend, TerminalBackend};
use crossterm::event::{self, Event};
use std::io::{ErrorKind, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

mod clipboard;
mod screen;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "slate", version, about = "Slate editor")]
struct Args {
    /// Optional path to open at startup. A missing file starts an empty
    /// buffer that `:w` will create.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `slate.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn configure_logging(&mut self) {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("slate.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "slate.log");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// The editor session: document view, file binding and yank register.
struct App {
    view: EditView,
    config: Config,
    path: Option<PathBuf>,
    register: Vec<u8>,
    dirty: bool,
    message: String,
    quit: bool,
}

impl App {
    fn new(config: Config, height: usize) -> Self {
        Self {
            view: EditView::new(height),
            config,
            path: None,
            register: Vec::new(),
            dirty: false,
            message: String::new(),
            quit: false,
        }
    }

    /// Bind to `path`, replacing the current document. A file that does not
    /// exist yet leaves an empty buffer bound to the path.
    fn open(&mut self, path: PathBuf) {
        match self.view.load(&path) {
            Ok(()) => {
                info!(
                    target: "io",
                    path = %path.display(),
                    bytes = self.view.buffer().len(),
                    lines = self.view.buffer().line_count(),
                    "file_opened"
                );
                self.message = format!("\"{}\"", path.display());
                self.path = Some(path);
                self.dirty = false;
            }
            Err(core_text::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                self.clear_document();
                self.message = format!("\"{}\" [new file]", path.display());
                self.path = Some(path);
                self.dirty = false;
            }
            Err(err) => {
                error!(target: "io", path = %path.display(), error = %err, "open_failed");
                self.message = format!("could not open \"{}\"", path.display());
            }
        }
    }

    fn clear_document(&mut self) {
        let cursor = self.view.buffer().cursor();
        self.view.remove_back(cursor);
        let rest = self.view.buffer().len();
        self.view.remove_front(rest);
    }

    fn save(&mut self) -> RedrawHint {
        let Some(path) = self.path.clone() else {
            self.message = "no file name".to_string();
            return RedrawHint::Frame;
        };
        let result = std::fs::File::create(&path).and_then(|mut file| self.view.save(&mut file));
        match result {
            Ok(()) => {
                let bytes = self.view.buffer().len();
                info!(target: "io", path = %path.display(), bytes, "file_written");
                self.message = format!("\"{}\" {}B written", path.display(), bytes);
                self.dirty = false;
            }
            Err(err) => {
                error!(target: "io", path = %path.display(), error = %err, "save_failed");
                self.message = format!("write failed: {err}");
            }
        }
        RedrawHint::Frame
    }

    /// Apply one command. Clipboard traffic goes through `out`.
    fn apply<W: Write>(&mut self, command: Command, out: &mut W) -> Result<RedrawHint> {
        let hint = match command {
            Command::Insert(bytes) => {
                let (written, hint) = self.view.insert(&bytes)?;
                self.dirty |= written > 0;
                hint
            }
            Command::InsertNewline => {
                let (_, hint) = if self.config.editor.autoindent {
                    self.view.insert_newline()?
                } else {
                    self.view.insert(b"\n")?
                };
                self.dirty = true;
                hint
            }
            Command::RemoveFront(n) => {
                let (removed, hint) = self.view.remove_front(n);
                self.dirty |= removed > 0;
                hint
            }
            Command::RemoveBack(n) => {
                let (removed, hint) = self.view.remove_back(n);
                self.dirty |= removed > 0;
                hint
            }
            Command::Advance(n) => self.view.advance(n).1,
            Command::Retreat(n) => self.view.retreat(n).1,
            Command::Up(n) => self.view.up(n).1,
            Command::Down(n) => self.view.down(n).1,
            Command::Home => self.view.home().1,
            Command::End => self.view.end().1,
            Command::MoveToLine(line) => self.view.move_to_line(line.max(1)).1,
            Command::BeginSelection => {
                self.view.begin_selection();
                RedrawHint::Cursor
            }
            Command::CancelSelection => self.view.cancel_selection(),
            Command::DeleteSelection => {
                let (removed, hint) = self.view.delete_selection();
                self.dirty |= removed > 0;
                hint
            }
            Command::YankSelection => {
                self.register = self.view.selected_bytes();
                out.write_all(clipboard::copy_sequence(&self.register).as_bytes())?;
                out.flush()?;
                info!(target: "clipboard", bytes = self.register.len(), "yank");
                self.message = format!("{} bytes yanked", self.register.len());
                RedrawHint::Frame
            }
            Command::PasteRequest => {
                if self.register.is_empty() {
                    // Nothing yanked locally: ask the terminal for its
                    // clipboard. Terminals that honor the query deliver the
                    // content back as a paste event.
                    out.write_all(clipboard::request_sequence().as_bytes())?;
                    out.flush()?;
                    RedrawHint::Cursor
                } else {
                    let bytes = std::mem::take(&mut self.register);
                    let (written, hint) = self.view.insert(&bytes)?;
                    self.register = bytes;
                    self.dirty |= written > 0;
                    hint
                }
            }
            Command::Load(path) => {
                self.open(path);
                RedrawHint::Frame
            }
            Command::Save => self.save(),
            Command::Quit => {
                self.quit = true;
                RedrawHint::Cursor
            }
        };
        Ok(hint)
    }

    fn status(&self, mode: Mode) -> screen::Status<'_> {
        screen::Status {
            mode,
            file: self
                .path
                .as_deref()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str()),
            dirty: self.dirty,
            line: self.view.buffer().line(),
            column: self.view.buffer().display_column(),
        }
    }
}

fn echo_line(app: &App, keymap: &Keymap) -> String {
    if keymap.mode() == Mode::Command {
        format!(":{}", keymap.command_line())
    } else {
        app.message.clone()
    }
}

fn run_loop(app: &mut App, keymap: &mut Keymap, mut cols: u16) -> Result<()> {
    let mut out = stdout();
    let mut repaint = true;
    loop {
        let frame = app.view.frame();
        let echo = echo_line(app, keymap);
        if repaint {
            screen::draw(
                &mut out,
                app.view.buffer(),
                &frame,
                &app.status(keymap.mode()),
                &echo,
                cols,
                app.config.render.line_numbers,
            )?;
        } else {
            screen::place_cursor(
                &mut out,
                &frame,
                keymap.mode(),
                &echo,
                app.config.render.line_numbers,
            )?;
        }

        repaint = match event::read()? {
            Event::Key(key) => {
                let mode_before = keymap.mode();
                let mut frame_needed = false;
                for command in keymap.handle(key) {
                    if app.apply(command, &mut out)? == RedrawHint::Frame {
                        frame_needed = true;
                    }
                }
                // Mode switches restyle the status line; the command line
                // echoes every keystroke.
                frame_needed || keymap.mode() != mode_before || keymap.mode() == Mode::Command
            }
            Event::Paste(content) => {
                app.apply(Command::Insert(content.into_bytes()), &mut out)?;
                true
            }
            Event::Resize(new_cols, new_rows) => {
                cols = new_cols;
                app.view.resize(screen::text_height(new_rows));
                true
            }
            _ => false,
        };

        if app.quit {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging();
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;
    startup.backend.set_title("Slate")?;
    let (cols, rows) = startup.backend.size()?;
    let _terminal = startup.backend.enter_guard()?;

    let mut app = App::new(config, screen::text_height(rows));
    if let Some(path) = args.path {
        app.open(path);
    }

    let mut keymap = Keymap::new();
    let outcome = run_loop(&mut app, &mut keymap, cols);
    info!(target: "runtime", "shutdown");
    outcome
}
