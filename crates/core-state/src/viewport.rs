//! Viewport: the visible vertical window into the buffer.
//!
//! * `top_line` is the index of the topmost buffer line shown.
//! * `height` is the number of rows available for buffer text.
//! * `total_lines` mirrors the buffer line count and bounds scrolling.
//!
//! `ensure_visible` keeps the cursor inside the middle third of the window
//! where possible, scrolling only when it drifts into the top or bottom third.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    top_line: usize,
    height: usize,
    total_lines: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            top_line: 0,
            height,
            total_lines: 0,
        }
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Half-open range of visible line indices.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        self.top_line..self.top_line + self.height
    }

    fn max_top(&self) -> usize {
        self.total_lines.saturating_sub(self.height)
    }

    pub fn scroll_to(&mut self, line: usize) {
        self.top_line = line.min(self.max_top());
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.top_line = self.top_line.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_to(self.top_line.saturating_add(lines));
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.top_line = self.top_line.min(self.max_top());
    }

    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.top_line = self.top_line.min(self.max_top());
    }

    /// Scroll so `line` is visible, preferring the middle third of the window.
    pub fn ensure_visible(&mut self, line: usize) {
        if self.height == 0 {
            return;
        }
        let start = self.top_line;
        let end = self.top_line + self.height;
        let third = self.height / 3;
        if line < start {
            self.scroll_to(line);
        } else if line >= end {
            self.scroll_to(line + 1 - self.height);
        } else if line < start + third {
            self.scroll_to(line.saturating_sub(third));
        } else if line >= end - third {
            self.scroll_to((line + third).saturating_sub(self.height));
        }
    }
}
