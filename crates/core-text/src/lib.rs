//! Gap-buffer text storage with line-start tables on both sides of the gap.
//!
//! The document lives in one growable byte array split into a pre-cursor
//! region `[0, pre)` and a post-cursor region `[post, capacity)`; the gap
//! `[pre, post)` holds no content and every edit happens by writing into or
//! shrinking it. Two ordered tables record line starts: `pre_lines` holds
//! absolute offsets for the pre region (first entry is always 0), while
//! `post_lines` stores each post-region line start as `capacity - index`,
//! a distance from the end of storage that survives reallocation. The
//! tables make vertical navigation O(line count) instead of O(document).
//!
//! Boundary violations are recovered locally: the offending distance is
//! clamped, one error event is logged, and the clamped operation completes.
//! The only hard failure is allocation during growth.

use std::fs;
use std::io::{self, Write};
use std::ops::Range;
use std::path::Path;
use thiserror::Error;
use tracing::error;

pub mod column;

pub use column::TAB_WIDTH;

/// Storage grows by whole blocks of this many bytes and never shrinks.
const BLOCK_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    #[error("storage allocation failed")]
    Memory,
}

/// Gap-buffer document storage. See the module docs for the layout.
pub struct GapBuffer {
    storage: Vec<u8>,
    pre: usize,
    post: usize,
    pre_lines: Vec<usize>,
    post_lines: Vec<usize>,
    column: usize,
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl GapBuffer {
    /// An empty document with one storage block preallocated.
    pub fn new() -> Self {
        Self {
            storage: vec![0; BLOCK_SIZE],
            pre: 0,
            post: BLOCK_SIZE,
            pre_lines: vec![0],
            post_lines: Vec::new(),
            column: 0,
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Document length in bytes.
    pub fn len(&self) -> usize {
        self.capacity() - self.post + self.pre
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute document offset of the cursor.
    pub fn cursor(&self) -> usize {
        self.pre
    }

    /// Display column of the cursor (tab- and UTF-8-aware). After vertical
    /// motion onto a shorter line this holds the sticky desired column, not
    /// the cell the cursor occupies; see
    /// [`display_column`](Self::display_column).
    pub fn column(&self) -> usize {
        self.column
    }

    /// Column of the cell the cursor actually occupies, rescanned from the
    /// line start. Rendering places the terminal cursor with this; the
    /// sticky [`column`](Self::column) only steers vertical motion.
    pub fn display_column(&self) -> usize {
        self.rescan_column()
    }

    /// 1-based line the cursor is on.
    pub fn line(&self) -> usize {
        self.pre_lines.len()
    }

    /// Total number of lines (newline count plus one).
    pub fn line_count(&self) -> usize {
        self.pre_lines.len() + self.post_lines.len()
    }

    /// Start offset of a 1-based line at or above the cursor's line.
    /// Lines below the cursor live in the post table and are not addressable
    /// by absolute offset without a scan; callers only ever ask for lines
    /// from the top of the viewport down to the cursor.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.pre_lines.get(line.checked_sub(1)?).copied()
    }

    /// Replace all content with the file's bytes and place the cursor at
    /// document start. Storage is reused when large enough, otherwise
    /// reallocated to the block-rounded file size.
    pub fn load(&mut self, path: &Path) -> Result<(), Error> {
        let bytes = fs::read(path)?;
        let needed = (bytes.len() / BLOCK_SIZE + 1) * BLOCK_SIZE;
        if self.capacity() < needed {
            self.storage = allocate(needed)?;
        }
        self.storage[..bytes.len()].copy_from_slice(&bytes);
        self.pre = bytes.len();
        self.post = self.capacity();
        self.pre_lines.clear();
        self.post_lines.clear();
        self.pre_lines.push(0);
        for i in 0..self.pre {
            if self.storage[i] == b'\n' {
                self.pre_lines.push(i + 1);
            }
        }
        // Retreating over the loaded content seeds the post table and
        // leaves the cursor at offset 0, column 0.
        self.retreat(self.pre);
        Ok(())
    }

    /// Write bytes at the cursor, advancing it. Newlines extend the pre
    /// line table; the column tracks each byte. Errs only when growing the
    /// storage fails.
    pub fn insert(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        if self.pre + bytes.len() >= self.post {
            let deficit = self.pre + bytes.len() - self.post + 1;
            let blocks = deficit / BLOCK_SIZE + 1;
            self.grow(self.capacity() + blocks * BLOCK_SIZE)?;
        }
        for &b in bytes {
            self.storage[self.pre] = b;
            self.pre += 1;
            if b == b'\n' {
                self.pre_lines.push(self.pre);
                self.column = 0;
            } else {
                self.column = column::advance(self.column, b);
            }
        }
        debug_assert!(self.pre < self.post);
        Ok(bytes.len())
    }

    /// Reallocate to `new_capacity`, keeping the pre region at the front
    /// and the post region at the new end. `post_lines` entries are
    /// end-relative, so they survive the move untouched.
    fn grow(&mut self, new_capacity: usize) -> Result<(), Error> {
        debug_assert!(new_capacity > self.capacity());
        let tail = self.capacity() - self.post;
        let new_post = new_capacity - tail;
        let mut next = allocate(new_capacity)?;
        next[..self.pre].copy_from_slice(&self.storage[..self.pre]);
        next[new_post..].copy_from_slice(&self.storage[self.post..]);
        self.storage = next;
        self.post = new_post;
        Ok(())
    }

    /// Forward delete: consume up to `n` bytes from the front of the post
    /// region. Returns the number of bytes removed.
    pub fn remove_front(&mut self, n: usize) -> usize {
        let n = clamp(n, self.capacity() - self.post, "remove_front");
        for _ in 0..n {
            // The byte about to disappear sits at storage index `post`;
            // if it is a recorded line start, its line is gone.
            if self.post_lines.last() == Some(&(self.capacity() - self.post)) {
                self.post_lines.pop();
            }
            self.post += 1;
        }
        // Deleting up to a recorded line start removes the newline that
        // created it; the surviving bytes join the cursor's line.
        if n > 0 && self.post_lines.last() == Some(&(self.capacity() - self.post)) {
            self.post_lines.pop();
        }
        n
    }

    /// Backspace: remove up to `n` bytes behind the cursor. Deleting plain
    /// bytes decrements the column directly; tabs and line boundaries force
    /// one rescan of the final line, the only O(line length) path here.
    pub fn remove_back(&mut self, n: usize) -> usize {
        let n = clamp(n, self.pre, "remove_back");
        let mut rescan = false;
        for _ in 0..n {
            let byte = self.storage[self.pre - 1];
            if byte == b'\t' {
                rescan = true;
            } else if !column::is_continuation(byte) {
                self.column = self.column.saturating_sub(1);
            }
            if self.pre_lines.last() == Some(&self.pre) {
                self.pre_lines.pop();
                rescan = true;
            }
            self.pre -= 1;
        }
        debug_assert_eq!(self.pre_lines.first(), Some(&0));
        if rescan {
            self.column = self.rescan_column();
        }
        n
    }

    /// Move the cursor forward by up to `n` bytes without mutating content,
    /// copying bytes across the gap and transferring line entries from the
    /// post table to the pre table as the boundary crosses them.
    pub fn advance(&mut self, n: usize) -> usize {
        let n = clamp(n, self.capacity() - self.post, "advance");
        for _ in 0..n {
            self.storage[self.pre] = self.storage[self.post];
            self.pre += 1;
            self.post += 1;
            self.transfer_forward();
        }
        self.column = self.rescan_column();
        n
    }

    /// Mirror of [`advance`](Self::advance): move the cursor backward.
    pub fn retreat(&mut self, n: usize) -> usize {
        let n = clamp(n, self.pre, "retreat");
        for _ in 0..n {
            self.transfer_backward();
            self.pre -= 1;
            self.post -= 1;
            self.storage[self.post] = self.storage[self.pre];
        }
        self.column = self.rescan_column();
        n
    }

    /// A post-table entry equal to `capacity - post` marks the line start
    /// the boundary just crossed; it becomes the cursor's own line.
    #[inline]
    fn transfer_forward(&mut self) {
        if self.post_lines.last() == Some(&(self.capacity() - self.post)) {
            self.pre_lines.push(self.pre);
            self.post_lines.pop();
        }
    }

    /// A pre-table entry equal to `pre` means the cursor sits exactly on a
    /// line start about to move behind it. The first entry (offset 0)
    /// never transfers.
    #[inline]
    fn transfer_backward(&mut self) {
        if self.pre_lines.len() > 1 && self.pre_lines.last() == Some(&self.pre) {
            self.post_lines.push(self.capacity() - self.post);
            self.pre_lines.pop();
        }
    }

    /// Retreat to the start of the current line.
    pub fn home(&mut self) -> usize {
        let start = self.pre_lines.last().copied().unwrap_or(0);
        self.retreat(self.pre - start)
    }

    /// Advance to just before the next newline, or to the end of the
    /// document when the cursor is on the last line.
    pub fn end(&mut self) -> usize {
        match self.post_lines.last() {
            None => self.advance(self.capacity() - self.post),
            Some(&next) => self.advance(self.capacity() - self.post - next - 1),
        }
    }

    /// Move up `n` lines, landing on the byte whose display column first
    /// reaches the current column (or the line end when shorter). The
    /// column itself is preserved across the move, so repeated vertical
    /// motion through short lines remembers the wider target.
    pub fn up(&mut self, n: usize) -> usize {
        if self.pre_lines.len() == 1 {
            return 0;
        }
        let n = clamp(n, self.pre_lines.len() - 1, "up");
        if n == 0 {
            return 0;
        }
        let desired = self.column;
        let count = self.pre_lines.len();
        let start = self.pre_lines[count - n - 1];
        let bound = self.pre_lines[count - n];
        let target = self.seek_column(start, bound, bound - start - 1, desired);
        self.retreat(self.pre - target);
        self.column = desired;
        n
    }

    /// Move down `n` lines with the same sticky-column rule as
    /// [`up`](Self::up).
    pub fn down(&mut self, n: usize) -> usize {
        if self.post_lines.is_empty() {
            return 0;
        }
        let n = clamp(n, self.post_lines.len(), "down");
        if n == 0 {
            return 0;
        }
        let desired = self.column;
        let count = self.post_lines.len();
        let entry = self.post_lines[count - n];
        let start = self.capacity() - entry;
        // Last line runs to the end of storage; interior lines end before
        // the newline that precedes the next recorded start.
        let default_len = if count == n {
            entry
        } else {
            entry - self.post_lines[count - n - 1] - 1
        };
        let target = self.seek_column(start, self.capacity(), default_len, desired);
        let dist = self.capacity() - self.post - entry + (target - start);
        self.advance(dist);
        self.column = desired;
        n
    }

    /// First byte offset in `[start, bound)` whose display column reaches
    /// `desired`, stopping at the newline (or `start + default_len`) when
    /// the line is shorter. Returns an absolute storage index.
    fn seek_column(&self, start: usize, bound: usize, default_len: usize, desired: usize) -> usize {
        let mut len = default_len;
        let mut col = 0;
        for i in start..bound {
            let b = self.storage[i];
            if b == b'\n' {
                break;
            }
            col = column::advance(col, b);
            if desired <= col {
                len = i - start + usize::from(desired != 0);
                break;
            }
        }
        start + len
    }

    /// Recompute the display column by scanning the current line up to the
    /// cursor.
    fn rescan_column(&self) -> usize {
        let start = self.pre_lines.last().copied().unwrap_or(0);
        column::scan(&self.storage[start..self.pre])
    }

    /// A document-offset byte range as up to two chunks straddling the gap.
    /// Out-of-range bounds are clamped to the document length.
    pub fn slice(&self, range: Range<usize>) -> (&[u8], &[u8]) {
        let gap = self.post - self.pre;
        let start = range.start.min(self.len());
        let end = range.end.min(self.len());
        if start >= end {
            (&[], &[])
        } else if end <= self.pre {
            (&self.storage[start..end], &[])
        } else if start >= self.pre {
            (&self.storage[start + gap..end + gap], &[])
        } else {
            (&self.storage[start..self.pre], &self.storage[self.post..end + gap])
        }
    }

    /// Tab depth of the current line, plus one when the line opens a scope.
    /// Feeds auto-indent when inserting a newline.
    pub fn indent_depth(&self) -> usize {
        let start = self.pre_lines.last().copied().unwrap_or(0);
        let mut tabs = 0;
        let mut open = 0;
        for &b in &self.storage[start..self.pre] {
            match b {
                b'\t' => tabs += 1,
                b'{' | b'[' | b':' => open = 1,
                b'}' | b']' => open = 0,
                _ => {}
            }
        }
        tabs + open
    }

    /// Write the document, pre region then post region, byte for byte.
    /// This is the on-disk format: exactly the logical content, no
    /// metadata, no gap bytes.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(&self.storage[..self.pre])?;
        sink.write_all(&self.storage[self.post..])?;
        sink.flush()
    }
}

fn allocate(capacity: usize) -> Result<Vec<u8>, Error> {
    let mut storage = Vec::new();
    storage.try_reserve_exact(capacity).map_err(|_| Error::Memory)?;
    storage.resize(capacity, 0);
    Ok(storage)
}

/// Clamp a requested distance to what is available, logging one error
/// event when the request was out of bounds.
fn clamp(requested: usize, available: usize, op: &'static str) -> usize {
    if requested > available {
        error!(target: "text.gap", op, requested, available, "out_of_bounds_clamped");
        available
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    fn buffer_with(text: &str) -> GapBuffer {
        let mut gb = GapBuffer::new();
        gb.insert(text.as_bytes()).unwrap();
        gb
    }

    #[derive(Clone)]
    struct LogSink {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl LogSink {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedSink<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl std::io::Write for LockedSink<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogSink {
        type Writer = LockedSink<'a>;
        fn make_writer(&'a self) -> Self::Writer {
            LockedSink {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture_errors<F: FnOnce()>(f: F) -> String {
        let (sink, buf) = LogSink::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::ERROR)
            .with_ansi(false)
            .without_time()
            .with_writer(sink)
            .finish();
        with_default(subscriber, f);
        String::from_utf8(buf.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn empty_buffer_has_one_line() {
        let gb = GapBuffer::new();
        assert_eq!(gb.len(), 0);
        assert!(gb.is_empty());
        assert_eq!(gb.line_count(), 1);
        assert_eq!(gb.cursor(), 0);
        assert_eq!(gb.column(), 0);
    }

    #[test]
    fn insert_tracks_lines_and_column() {
        let gb = buffer_with("ab\ncde\nf");
        assert_eq!(gb.len(), 8);
        assert_eq!(gb.cursor(), 8);
        assert_eq!(gb.line(), 3);
        assert_eq!(gb.line_count(), 3);
        assert_eq!(gb.pre_lines, vec![0, 3, 7]);
        assert!(gb.post_lines.is_empty());
        assert_eq!(gb.column(), 1);
    }

    #[test]
    fn tab_insert_column_scenario() {
        let mut gb = GapBuffer::new();
        gb.insert(b"\t").unwrap();
        assert_eq!(gb.column(), 4);
        gb.insert(b"x").unwrap();
        assert_eq!(gb.column(), 5);
    }

    #[test]
    fn advance_retreat_round_trip_restores_state() {
        let mut gb = buffer_with("ab\ncde\nf");
        gb.retreat(5);
        let snapshot = (
            gb.pre,
            gb.post,
            gb.pre_lines.clone(),
            gb.post_lines.clone(),
            gb.column,
        );
        assert_eq!(gb.advance(4), 4);
        assert_eq!(gb.retreat(4), 4);
        assert_eq!(
            (
                gb.pre,
                gb.post,
                gb.pre_lines.clone(),
                gb.post_lines.clone(),
                gb.column,
            ),
            snapshot
        );
    }

    #[test]
    fn insert_then_remove_back_restores_length() {
        let mut gb = buffer_with("one\ntwo");
        let before = gb.len();
        gb.insert(b"hello\nworld").unwrap();
        gb.remove_back(11);
        assert_eq!(gb.len(), before);
        assert_eq!(gb.line_count(), 2);
    }

    #[test]
    fn line_tables_partition_every_line() {
        let mut gb = buffer_with("a\nbb\nccc\ndddd");
        let newlines = 3;
        for step in [0usize, 3, 7, 12] {
            gb.retreat(gb.len());
            gb.advance(step);
            assert_eq!(
                gb.pre_lines.len() + gb.post_lines.len(),
                newlines + 1,
                "tables must cover all lines at cursor offset {step}"
            );
        }
        // Removing five bytes from the end of "a\nbb\nccc\ndddd" takes one
        // newline with it.
        gb.remove_back(5);
        assert_eq!(gb.pre_lines.len() + gb.post_lines.len(), newlines);
    }

    #[test]
    fn sticky_column_through_short_line() {
        let mut gb = buffer_with("aaaaaaaaaaaaaaaaaaaa\nbbb\ncccccccccccccccccccc");
        // Place the cursor at column 10 of the first line.
        gb.retreat(gb.len());
        gb.advance(10);
        assert_eq!(gb.column(), 10);
        assert_eq!(gb.down(1), 1);
        // The short middle line cannot host column 10; the cursor parks at
        // its end but the desired column survives.
        assert_eq!(gb.cursor(), 24);
        assert_eq!(gb.column(), 10);
        assert_eq!(gb.display_column(), 3, "the occupied cell is the line end");
        assert_eq!(gb.up(1), 1);
        assert_eq!(gb.cursor(), 10);
        assert_eq!(gb.column(), 10);
    }

    #[test]
    fn retreat_huge_clamps_to_origin_and_logs_once() {
        let mut gb = buffer_with("ab\ncd");
        let output = capture_errors(|| {
            assert_eq!(gb.retreat(usize::MAX), 5);
        });
        assert_eq!(gb.cursor(), 0);
        assert_eq!(
            output.matches("out_of_bounds_clamped").count(),
            1,
            "exactly one clamp error expected: {output}"
        );
    }

    #[test]
    fn in_bounds_motion_logs_nothing() {
        let mut gb = buffer_with("abcdef");
        let output = capture_errors(|| {
            gb.retreat(3);
            gb.advance(2);
        });
        assert!(output.is_empty(), "unexpected log output: {output}");
    }

    #[test]
    fn three_line_navigation_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "ab\ncde\nf").unwrap();

        let mut gb = GapBuffer::new();
        gb.load(&path).unwrap();
        assert_eq!(gb.cursor(), 0);
        assert_eq!(gb.line_count(), 3);

        assert_eq!(gb.down(1), 1);
        assert_eq!(gb.cursor(), 3, "line 2 starts at offset 3");
        gb.end();
        assert_eq!(gb.cursor(), 6, "line 2 ends before the newline");
        gb.home();
        assert_eq!(gb.cursor(), 3);
        // Line 3 starts right after the second newline.
        assert_eq!(gb.down(1), 1);
        gb.home();
        assert_eq!(gb.cursor(), 7);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let mut gb = GapBuffer::new();
        let err = gb.load(Path::new("__no_such_file__.txt")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn load_reuses_or_grows_storage() {
        let dir = tempfile::tempdir().unwrap();
        let small = dir.path().join("small.txt");
        std::fs::write(&small, "tiny\n").unwrap();
        let big = dir.path().join("big.txt");
        let long_line = "x".repeat(5000);
        std::fs::write(&big, &long_line).unwrap();

        let mut gb = GapBuffer::new();
        gb.load(&big).unwrap();
        assert_eq!(gb.len(), 5000);
        assert!(gb.capacity() >= 5000 + 1);

        gb.load(&small).unwrap();
        assert_eq!(gb.len(), 5);
        assert_eq!(gb.line_count(), 2);
    }

    #[test]
    fn growth_preserves_content_and_tables() {
        let mut gb = buffer_with("head\n");
        gb.retreat(2);
        let filler = "1234123412341234123412341234231\n".repeat(200);
        gb.insert(filler.as_bytes()).unwrap();
        assert!(gb.capacity() > BLOCK_SIZE);
        assert_eq!(gb.len(), 5 + filler.len());
        assert_eq!(gb.line_count(), 2 + 200);

        let mut out = Vec::new();
        gb.write_to(&mut out).unwrap();
        assert_eq!(&out[..3], b"hea");
        assert_eq!(&out[out.len() - 2..], b"d\n");
    }

    #[test]
    fn remove_front_pops_crossed_line_starts() {
        let mut gb = buffer_with("ab\ncd\nef");
        gb.retreat(gb.len());
        assert_eq!(gb.line_count(), 3);
        // Deleting "ab\ncd\n" crosses both recorded starts.
        assert_eq!(gb.remove_front(6), 6);
        assert_eq!(gb.line_count(), 1);
        assert_eq!(gb.len(), 2);
        let (a, b) = gb.slice(0..2);
        assert_eq!(a, b"ef");
        assert!(b.is_empty());
    }

    #[test]
    fn remove_front_clamps_at_document_end() {
        let mut gb = buffer_with("ab");
        gb.retreat(1);
        let output = capture_errors(|| {
            assert_eq!(gb.remove_front(10), 1);
        });
        assert_eq!(gb.len(), 1);
        assert_eq!(output.matches("out_of_bounds_clamped").count(), 1);
    }

    #[test]
    fn remove_back_across_newline_recomputes_column() {
        let mut gb = buffer_with("ab\tc\nxy");
        assert_eq!(gb.column(), 2);
        // Removing "xy" and the newline lands the cursor after "ab\tc":
        // two tab-free columns, a tab stop, then one more cell.
        gb.remove_back(3);
        assert_eq!(gb.cursor(), 4);
        assert_eq!(gb.line(), 1);
        assert_eq!(gb.column(), 5);
    }

    #[test]
    fn remove_back_clamps_at_document_start() {
        let mut gb = buffer_with("ab");
        gb.retreat(2);
        let output = capture_errors(|| {
            assert_eq!(gb.remove_back(4), 0);
        });
        assert_eq!(gb.len(), 2);
        assert_eq!(output.matches("out_of_bounds_clamped").count(), 1);
    }

    #[test]
    fn vertical_motion_clamps_and_reports() {
        let mut gb = buffer_with("1\n2\n3\n4\n5");
        // At the last line, down has nowhere to go.
        assert_eq!(gb.down(1), 0);
        // Up past the top clamps to the available line count.
        let output = capture_errors(|| {
            assert_eq!(gb.up(100), 4);
        });
        assert_eq!(gb.line(), 1);
        assert_eq!(output.matches("out_of_bounds_clamped").count(), 1);
        assert_eq!(gb.up(1), 0);
        let output = capture_errors(|| {
            assert_eq!(gb.down(99), 4);
        });
        assert_eq!(gb.line(), 5);
        assert_eq!(output.matches("out_of_bounds_clamped").count(), 1);
    }

    #[test]
    fn down_to_trailing_empty_line() {
        let mut gb = buffer_with("a\n");
        gb.retreat(2);
        assert_eq!(gb.line_count(), 2);
        assert_eq!(gb.down(1), 1);
        assert_eq!(gb.cursor(), 2);
        assert_eq!(gb.line(), 2);
        assert_eq!(gb.column(), 0);
    }

    #[test]
    fn end_on_last_line_without_newline() {
        let mut gb = buffer_with("ab\ncde");
        gb.retreat(gb.len());
        gb.down(1);
        gb.end();
        assert_eq!(gb.cursor(), 6);
        gb.home();
        assert_eq!(gb.cursor(), 3);
    }

    #[test]
    fn desired_column_inside_tab_stops_after_the_tab() {
        // Desired column 2 lands mid-tab on the line above; the cursor
        // stops at the first position whose column reaches the target.
        let mut gb = buffer_with("\twide\nab");
        assert_eq!(gb.column(), 2);
        gb.up(1);
        assert_eq!(gb.cursor(), 1, "cursor sits just after the tab");
        assert_eq!(gb.column(), 2, "desired column survives the move");
    }

    #[test]
    fn utf8_vertical_motion_counts_cells_not_bytes() {
        let mut gb = buffer_with("héllo\nwörld");
        // Cursor at end of "wörld": 5 display cells, 6 bytes.
        assert_eq!(gb.column(), 5);
        gb.up(1);
        assert_eq!(gb.column(), 5);
        gb.end();
        assert_eq!(gb.cursor(), 6);
    }

    #[test]
    fn slice_spans_the_gap() {
        let mut gb = buffer_with("hello world");
        gb.retreat(6);
        let (a, b) = gb.slice(3..9);
        assert_eq!(a, b"lo");
        assert_eq!(b, b" wor");
        let (a, b) = gb.slice(0..3);
        assert_eq!(a, b"hel");
        assert!(b.is_empty());
        let (a, b) = gb.slice(7..50);
        assert_eq!(a, b"orld");
        assert!(b.is_empty());
    }

    #[test]
    fn write_to_emits_exact_document_bytes() {
        let mut gb = buffer_with("alpha\nbeta\ngamma");
        gb.retreat(7);
        let mut out = Vec::new();
        gb.write_to(&mut out).unwrap();
        assert_eq!(out, b"alpha\nbeta\ngamma");
    }

    #[test]
    fn indent_depth_counts_tabs_and_open_scope() {
        let gb = buffer_with("\t\tfn demo() {");
        assert_eq!(gb.indent_depth(), 3);
        let gb = buffer_with("\tclosed {}");
        assert_eq!(gb.indent_depth(), 1);
        let gb = buffer_with("plain");
        assert_eq!(gb.indent_depth(), 0);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut gb = buffer_with("first\nsecond\nthird\n");
        gb.up(1);
        let mut file = std::fs::File::create(&path).unwrap();
        gb.write_to(&mut file).unwrap();
        file.flush().unwrap();

        let mut reread = GapBuffer::new();
        reread.load(&path).unwrap();
        assert_eq!(reread.len(), gb.len());
        assert_eq!(reread.line_count(), gb.line_count());
    }
}
