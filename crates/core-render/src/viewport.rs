//! Vertical window into the document.
//!
//! The scroll policy is asymmetric on purpose: moving forward keeps three
//! quarters of the window as look-ahead below the point of travel, moving
//! backward keeps one quarter as look-behind above it. Both thresholds work
//! on 1-based line numbers.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// 1-based index of the topmost rendered line.
    pub first_line: usize,
    /// Screen rows available for document text.
    pub height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            first_line: 1,
            height,
        }
    }

    pub fn resize(&mut self, height: usize) {
        self.height = height;
    }

    /// Rewind to the top of the document.
    pub fn reset(&mut self) {
        self.first_line = 1;
    }

    /// Apply the forward policy after the cursor moved down or text was
    /// inserted. Returns true when `first_line` changed.
    pub fn scroll_forward(&mut self, cursor_line: usize) -> bool {
        let lead = self.height * 3 / 4;
        if cursor_line > self.first_line + lead {
            let next = cursor_line - lead;
            debug!(target: "render.viewport", from = self.first_line, to = next, "scroll_forward");
            self.first_line = next;
            return true;
        }
        false
    }

    /// Apply the backward policy after the cursor moved up or text was
    /// removed behind it. Returns true when `first_line` changed.
    pub fn scroll_backward(&mut self, cursor_line: usize) -> bool {
        if self.first_line == 1 {
            return false;
        }
        let tail = self.height / 4;
        if cursor_line < tail {
            debug!(target: "render.viewport", from = self.first_line, to = 1usize, "scroll_reset");
            self.first_line = 1;
            return true;
        }
        if cursor_line < self.first_line + tail {
            let next = (cursor_line - tail).max(1);
            debug!(target: "render.viewport", from = self.first_line, to = next, "scroll_backward");
            self.first_line = next;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_triggers_past_three_quarters() {
        let mut vp = Viewport::new(20);
        assert!(!vp.scroll_forward(16), "line 16 still inside the window");
        assert!(vp.scroll_forward(17));
        assert_eq!(vp.first_line, 2);
        assert!(vp.scroll_forward(40));
        assert_eq!(vp.first_line, 25);
    }

    #[test]
    fn backward_recenter_keeps_quarter_lookbehind() {
        let mut vp = Viewport::new(20);
        vp.first_line = 10;
        assert!(!vp.scroll_backward(30), "cursor well below the threshold");
        assert!(vp.scroll_backward(12));
        assert_eq!(vp.first_line, 7);
    }

    #[test]
    fn backward_hard_resets_near_document_start() {
        let mut vp = Viewport::new(20);
        vp.first_line = 8;
        assert!(vp.scroll_backward(4));
        assert_eq!(vp.first_line, 1);
        // Already at the top: nothing to do, whatever the cursor line.
        assert!(!vp.scroll_backward(1));
    }

    #[test]
    fn backward_never_yields_line_zero() {
        let mut vp = Viewport::new(20);
        vp.first_line = 3;
        assert!(vp.scroll_backward(5));
        assert!(vp.first_line >= 1);
    }
}
