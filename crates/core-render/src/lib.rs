//! Viewport and selection control over a gap buffer.
//!
//! [`EditView`] owns the document, decides which lines are visible, tracks
//! the selection anchor, and reports after every operation whether the
//! caller must repaint the whole text area or only reposition the cursor.
//! The rendering surface consumes [`Frame`]s: per visible row, the styled
//! document byte ranges to draw, plus the cursor's grid position.

use core_text::{Error, GapBuffer};
use std::ops::Range;
use std::path::Path;

pub mod viewport;

pub use viewport::Viewport;

/// What the caller must repaint after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawHint {
    /// Content and viewport unchanged: move the terminal cursor only.
    Cursor,
    /// Content, selection highlight or scroll position changed.
    Frame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Normal,
    Selected,
}

/// A run of document bytes drawn in one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub range: Range<usize>,
    pub style: SpanStyle,
}

/// One visible screen row. No spans means a blank row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub spans: Vec<Span>,
}

/// Everything the rendering surface needs for a full repaint.
#[derive(Debug, Clone)]
pub struct Frame {
    pub rows: Vec<Row>,
    /// 1-based document line shown in the first row (for the gutter).
    pub first_line: usize,
    /// Cursor position as (row, column) within the text grid.
    pub cursor: (usize, usize),
}

/// A document plus the viewport and selection state tied to it.
pub struct EditView {
    buffer: GapBuffer,
    viewport: Viewport,
    selection: Option<usize>,
}

impl EditView {
    pub fn new(height: usize) -> Self {
        Self {
            buffer: GapBuffer::new(),
            viewport: Viewport::new(height),
            selection: None,
        }
    }

    pub fn buffer(&self) -> &GapBuffer {
        &self.buffer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.is_some()
    }

    /// Replace the document with the file's contents and rewind to the top.
    pub fn load(&mut self, path: &Path) -> Result<(), Error> {
        self.buffer.load(path)?;
        self.selection = None;
        self.viewport.reset();
        Ok(())
    }

    pub fn resize(&mut self, height: usize) {
        self.viewport.resize(height);
        self.viewport.scroll_forward(self.buffer.line());
    }

    pub fn insert(&mut self, bytes: &[u8]) -> Result<(usize, RedrawHint), Error> {
        let written = self.buffer.insert(bytes)?;
        self.viewport.scroll_forward(self.buffer.line());
        Ok((written, RedrawHint::Frame))
    }

    /// Insert a line break carrying the current line's indentation along,
    /// one tab per scope level.
    pub fn insert_newline(&mut self) -> Result<(usize, RedrawHint), Error> {
        let depth = self.buffer.indent_depth();
        let mut bytes = Vec::with_capacity(depth + 1);
        bytes.push(b'\n');
        bytes.resize(depth + 1, b'\t');
        self.insert(&bytes)
    }

    pub fn remove_front(&mut self, n: usize) -> (usize, RedrawHint) {
        let removed = self.buffer.remove_front(n);
        (removed, RedrawHint::Frame)
    }

    pub fn remove_back(&mut self, n: usize) -> (usize, RedrawHint) {
        let removed = self.buffer.remove_back(n);
        self.viewport.scroll_backward(self.buffer.line());
        (removed, RedrawHint::Frame)
    }

    pub fn advance(&mut self, n: usize) -> (usize, RedrawHint) {
        let moved = self.buffer.advance(n);
        let scrolled = self.viewport.scroll_forward(self.buffer.line());
        (moved, self.motion_hint(scrolled))
    }

    pub fn retreat(&mut self, n: usize) -> (usize, RedrawHint) {
        let moved = self.buffer.retreat(n);
        let scrolled = self.viewport.scroll_backward(self.buffer.line());
        (moved, self.motion_hint(scrolled))
    }

    pub fn up(&mut self, n: usize) -> (usize, RedrawHint) {
        let moved = self.buffer.up(n);
        let scrolled = self.viewport.scroll_backward(self.buffer.line());
        (moved, self.motion_hint(scrolled))
    }

    pub fn down(&mut self, n: usize) -> (usize, RedrawHint) {
        let moved = self.buffer.down(n);
        let scrolled = self.viewport.scroll_forward(self.buffer.line());
        (moved, self.motion_hint(scrolled))
    }

    pub fn home(&mut self) -> (usize, RedrawHint) {
        let moved = self.buffer.home();
        (moved, self.motion_hint(false))
    }

    pub fn end(&mut self) -> (usize, RedrawHint) {
        let moved = self.buffer.end();
        (moved, self.motion_hint(false))
    }

    /// Jump to a 1-based line, dispatching to vertical motion.
    pub fn move_to_line(&mut self, target: usize) -> (usize, RedrawHint) {
        let current = self.buffer.line();
        if target > current {
            self.down(target - current)
        } else {
            self.up(current - target)
        }
    }

    pub fn begin_selection(&mut self) {
        self.selection = Some(self.buffer.cursor());
    }

    /// Drop the anchor. Always a full redraw: highlighted spans revert.
    pub fn cancel_selection(&mut self) -> RedrawHint {
        self.selection = None;
        RedrawHint::Frame
    }

    /// The selected document range, normalized so start <= end.
    pub fn selected_range(&self) -> Option<Range<usize>> {
        let anchor = self.selection?;
        let cursor = self.buffer.cursor();
        Some(anchor.min(cursor)..anchor.max(cursor))
    }

    /// Owned copy of the selected bytes, for clipboard export.
    pub fn selected_bytes(&self) -> Vec<u8> {
        match self.selected_range() {
            Some(range) => {
                let (a, b) = self.buffer.slice(range);
                let mut out = Vec::with_capacity(a.len() + b.len());
                out.extend_from_slice(a);
                out.extend_from_slice(b);
                out
            }
            None => Vec::new(),
        }
    }

    /// Remove the span between anchor and cursor. The anchor itself stays
    /// set; callers follow up with [`cancel_selection`](Self::cancel_selection).
    pub fn delete_selection(&mut self) -> (usize, RedrawHint) {
        let Some(anchor) = self.selection else {
            return (0, RedrawHint::Cursor);
        };
        let cursor = self.buffer.cursor();
        if anchor > cursor {
            self.remove_front(anchor - cursor)
        } else {
            self.remove_back(cursor - anchor)
        }
    }

    /// Write the document to `sink`, byte for byte.
    pub fn save<W: std::io::Write>(&self, sink: &mut W) -> std::io::Result<()> {
        self.buffer.write_to(sink)
    }

    fn motion_hint(&self, scrolled: bool) -> RedrawHint {
        if scrolled || self.selection.is_some() {
            RedrawHint::Frame
        } else {
            RedrawHint::Cursor
        }
    }

    /// Describe the visible region. Rows past the end of the document come
    /// back blank; the selection, when active, splits intersecting rows
    /// into styled sub-spans.
    pub fn frame(&self) -> Frame {
        let height = self.viewport.height;
        let mut rows = Vec::with_capacity(height);
        let cursor_row = self
            .buffer
            .line()
            .saturating_sub(self.viewport.first_line)
            .min(height.saturating_sub(1));
        // The occupied cell, not the sticky column vertical motion aims for.
        let cursor = (cursor_row, self.buffer.display_column());

        if self.buffer.is_empty() {
            rows.resize_with(height, Row::default);
            return Frame {
                rows,
                first_line: self.viewport.first_line,
                cursor,
            };
        }

        let start = self
            .buffer
            .line_start(self.viewport.first_line)
            .unwrap_or(0);
        let selection = self.selected_range().filter(|r| !r.is_empty());
        let len = self.buffer.len();
        let (a, b) = self.buffer.slice(start..len);

        let mut line_start = start;
        let mut offset = start;
        for &byte in a.iter().chain(b.iter()) {
            if rows.len() == height {
                break;
            }
            if byte == b'\n' {
                rows.push(Row {
                    spans: style_spans(line_start..offset, selection.as_ref()),
                });
                line_start = offset + 1;
            }
            offset += 1;
        }
        if rows.len() < height {
            rows.push(Row {
                spans: style_spans(line_start..offset, selection.as_ref()),
            });
        }
        rows.resize_with(height, Row::default);

        Frame {
            rows,
            first_line: self.viewport.first_line,
            cursor,
        }
    }
}

/// Split one line's byte range around the selection, if they intersect.
fn style_spans(line: Range<usize>, selection: Option<&Range<usize>>) -> Vec<Span> {
    if line.is_empty() {
        return Vec::new();
    }
    match selection {
        Some(sel) if sel.start < line.end && sel.end > line.start => {
            let lo = sel.start.max(line.start);
            let hi = sel.end.min(line.end);
            let mut spans = Vec::new();
            if line.start < lo {
                spans.push(Span {
                    range: line.start..lo,
                    style: SpanStyle::Normal,
                });
            }
            spans.push(Span {
                range: lo..hi,
                style: SpanStyle::Selected,
            });
            if hi < line.end {
                spans.push(Span {
                    range: hi..line.end,
                    style: SpanStyle::Normal,
                });
            }
            spans
        }
        _ => vec![Span {
            range: line,
            style: SpanStyle::Normal,
        }],
    }
}
