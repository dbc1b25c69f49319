//! Terminal painting.
//!
//! Two rows at the bottom are reserved: a reverse-video status line with
//! the mode, file name and cursor position, and an echo row for the `:`
//! command line and one-shot messages. Everything above is the text area,
//! optionally prefixed by a line-number gutter.

use core_events::Mode;
use core_render::{Frame, SpanStyle};
use core_text::{GapBuffer, column};
use crossterm::{
    cursor::{Hide, MoveTo, SetCursorStyle, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::Write;

/// Rows taken by the status and echo lines.
pub const RESERVED_ROWS: u16 = 2;

const GUTTER_WIDTH: usize = 4;

pub struct Status<'a> {
    pub mode: Mode,
    pub file: Option<&'a str>,
    pub dirty: bool,
    pub line: usize,
    pub column: usize,
}

/// Text rows available for a terminal of `rows` total rows.
pub fn text_height(rows: u16) -> usize {
    rows.saturating_sub(RESERVED_ROWS) as usize
}

/// Repaint the whole screen from a frame.
pub fn draw<W: Write>(
    out: &mut W,
    buffer: &GapBuffer,
    frame: &Frame,
    status: &Status<'_>,
    echo: &str,
    cols: u16,
    line_numbers: bool,
) -> std::io::Result<()> {
    queue!(out, Hide)?;
    let line_count = buffer.line_count();
    for (row, content) in frame.rows.iter().enumerate() {
        let doc_line = frame.first_line + row;
        queue!(out, MoveTo(0, row as u16), Clear(ClearType::CurrentLine))?;
        if line_numbers {
            if doc_line <= line_count {
                queue!(
                    out,
                    SetAttribute(Attribute::Dim),
                    Print(format_args!("{doc_line:>3} ")),
                    SetAttribute(Attribute::Reset)
                )?;
            } else {
                queue!(out, Print("    "))?;
            }
        }
        for span in &content.spans {
            let (a, b) = buffer.slice(span.range.clone());
            let mut text = String::with_capacity(a.len() + b.len());
            let mut col = 0;
            push_expanded(&mut text, a, &mut col);
            push_expanded(&mut text, b, &mut col);
            match span.style {
                SpanStyle::Normal => queue!(out, Print(text))?,
                SpanStyle::Selected => queue!(
                    out,
                    SetAttribute(Attribute::Reverse),
                    Print(text),
                    SetAttribute(Attribute::Reset)
                )?,
            }
        }
    }
    draw_status(out, status, frame.rows.len() as u16, cols)?;
    draw_echo(out, echo, frame.rows.len() as u16 + 1)?;
    place_cursor(out, frame, status.mode, echo, line_numbers)?;
    out.flush()
}

/// Move the terminal cursor without repainting.
pub fn place_cursor<W: Write>(
    out: &mut W,
    frame: &Frame,
    mode: Mode,
    echo: &str,
    line_numbers: bool,
) -> std::io::Result<()> {
    let (x, y) = if mode == Mode::Command {
        (echo.len() as u16, frame.rows.len() as u16 + 1)
    } else {
        let gutter = if line_numbers { GUTTER_WIDTH } else { 0 };
        let (row, col) = frame.cursor;
        ((gutter + col) as u16, row as u16)
    };
    let style = match mode {
        Mode::Insert => SetCursorStyle::SteadyBar,
        _ => SetCursorStyle::SteadyBlock,
    };
    queue!(out, style, MoveTo(x, y), Show)?;
    out.flush()
}

fn draw_status<W: Write>(
    out: &mut W,
    status: &Status<'_>,
    row: u16,
    cols: u16,
) -> std::io::Result<()> {
    let left = format!(
        "{}{}{}",
        status.mode.label(),
        status.file.unwrap_or("[no file]"),
        if status.dirty { " [+]" } else { "" }
    );
    let right = format!("{}:{} ", status.line, status.column);
    let pad = (cols as usize).saturating_sub(left.len() + right.len());
    queue!(
        out,
        MoveTo(0, row),
        Clear(ClearType::CurrentLine),
        SetAttribute(Attribute::Reverse),
        Print(left),
        Print(" ".repeat(pad)),
        Print(right),
        SetAttribute(Attribute::Reset)
    )
}

fn draw_echo<W: Write>(out: &mut W, echo: &str, row: u16) -> std::io::Result<()> {
    queue!(
        out,
        MoveTo(0, row),
        Clear(ClearType::CurrentLine),
        Print(echo)
    )
}

/// Append bytes with tabs expanded to cell-aligned spaces.
fn push_expanded(text: &mut String, bytes: &[u8], col: &mut usize) {
    let mut rest = bytes;
    while let Some(pos) = rest.iter().position(|&b| b == b'\t') {
        let (chunk, tail) = rest.split_at(pos);
        text.push_str(&String::from_utf8_lossy(chunk));
        *col = chunk.iter().fold(*col, |c, &b| column::advance(c, b));
        let stop = column::advance(*col, b'\t');
        while *col < stop {
            text.push(' ');
            *col += 1;
        }
        rest = &tail[1..];
    }
    text.push_str(&String::from_utf8_lossy(rest));
    *col = rest.iter().fold(*col, |c, &b| column::advance(c, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_expand_to_the_next_stop() {
        let mut text = String::new();
        let mut col = 0;
        push_expanded(&mut text, b"ab\tc", &mut col);
        assert_eq!(text, "ab  c");
        assert_eq!(col, 5);
    }

    #[test]
    fn expansion_continues_across_chunks() {
        // A span split by the gap: the column carries over.
        let mut text = String::new();
        let mut col = 0;
        push_expanded(&mut text, b"abc", &mut col);
        push_expanded(&mut text, b"\tx", &mut col);
        assert_eq!(text, "abc x");
        assert_eq!(col, 5);
    }

    #[test]
    fn multibyte_text_passes_through() {
        let mut text = String::new();
        let mut col = 0;
        push_expanded(&mut text, "é\t".as_bytes(), &mut col);
        assert_eq!(text, "é   ");
        assert_eq!(col, 4);
    }
}
