//! Scroll position to row range translation, with canvas paging.
//!
//! Browsers cap the height of a single element. When the virtual canvas
//! (`rows * row_height`) is taller than `max_supported_css_height`, it is
//! split into `n` pages of height `ph`; the real canvas is only `h` tall and
//! each page is shifted by `offset = page * cj`. Row tops are relative to the
//! current page, so switching pages invalidates every rendered row.

/// Row/pixel window. Rows are inclusive and may be empty (`bottom < top`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRange {
    pub top: i64,
    pub bottom: i64,
    pub left_px: f64,
    pub right_px: f64,
}

impl ViewRange {
    /// Valid row indices inside the range.
    pub fn rows(&self) -> impl Iterator<Item = usize> {
        let top = usize::try_from(self.top.max(0)).unwrap_or(0);
        let end = usize::try_from(self.bottom.saturating_add(1).max(0)).unwrap_or(0);
        top..end
    }

    pub fn contains_row(&self, row: usize) -> bool {
        i64::try_from(row).is_ok_and(|r| r >= self.top && r <= self.bottom)
    }
}

/// What a vertical scroll did to the paging state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollChange {
    /// The page offset changed; cached rows are positioned wrongly.
    pub offset_changed: bool,
    /// `scroll_top` moved.
    pub moved: bool,
}

/// Result of [`ViewportVirtualizer::handle_scroll`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOutcome {
    pub v_distance: f64,
    pub h_distance: f64,
    /// A jump across pages: every cached row must be dropped.
    pub invalidate_all: bool,
    /// The offset changed by a small scroll; rows must be cleaned and repositioned.
    pub offset_changed: bool,
}

#[derive(Debug, Clone)]
pub struct ViewportVirtualizer {
    row_height: f64,
    max_css_height: f64,
    viewport_h: f64,
    viewport_w: f64,
    /// Virtual height.
    th: f64,
    /// Real canvas height.
    h: f64,
    /// Page height.
    ph: f64,
    /// Page count.
    n: f64,
    /// Jump per page.
    cj: f64,
    page: f64,
    offset: f64,
    scroll_top: f64,
    prev_scroll_top: f64,
    scroll_left: f64,
    prev_scroll_left: f64,
    last_rendered_scroll_top: f64,
    last_rendered_scroll_left: f64,
    v_scroll_dir: i32,
}

impl ViewportVirtualizer {
    pub fn new(row_height: f64, max_css_height: f64) -> Self {
        Self {
            row_height: row_height.max(1.0),
            max_css_height,
            viewport_h: 0.0,
            viewport_w: 0.0,
            th: 0.0,
            h: 0.0,
            ph: 0.0,
            n: 1.0,
            cj: 0.0,
            page: 0.0,
            offset: 0.0,
            scroll_top: 0.0,
            prev_scroll_top: 0.0,
            scroll_left: 0.0,
            prev_scroll_left: 0.0,
            last_rendered_scroll_top: 0.0,
            last_rendered_scroll_left: 0.0,
            v_scroll_dir: 1,
        }
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_h
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_w
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn page(&self) -> f64 {
        self.page
    }

    pub fn page_count(&self) -> f64 {
        self.n
    }

    pub fn virtual_height(&self) -> f64 {
        self.th
    }

    pub fn canvas_height(&self) -> f64 {
        self.h
    }

    pub fn scroll_dir(&self) -> i32 {
        self.v_scroll_dir
    }

    pub fn set_scroll_dir(&mut self, dir: i32) {
        self.v_scroll_dir = dir;
    }

    /// Rows that fit in the viewport, rounded up.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn num_visible_rows(&self) -> usize {
        (self.viewport_h / self.row_height).ceil().max(0.0) as usize
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_w = width.max(0.0);
        self.viewport_h = height.max(0.0);
    }

    /// Top of `row` on the current page.
    #[allow(clippy::cast_precision_loss)]
    pub fn row_top(&self, row: usize) -> f64 {
        self.row_height * row as f64 - self.offset
    }

    /// Row containing canvas y (page-relative).
    #[allow(clippy::cast_possible_truncation)]
    pub fn row_from_position(&self, y: f64) -> i64 {
        ((y + self.offset) / self.row_height).floor() as i64
    }

    /// Recompute the paging constants for `rows` rows. Returns true when the
    /// real canvas height changed.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_row_count(&mut self, rows: usize) -> bool {
        let old_h = self.h;
        self.th = (self.row_height * rows as f64).max(self.viewport_h);
        if self.th < self.max_css_height {
            self.h = self.th;
            self.ph = self.th;
            self.n = 1.0;
            self.cj = 0.0;
        } else {
            self.h = self.max_css_height;
            self.ph = self.h / 100.0;
            self.n = (self.th / self.ph).floor();
            self.cj = (self.th - self.h) / (self.n - 1.0);
        }
        let h_changed = (self.h - old_h).abs() > f64::EPSILON;

        if self.th <= 0.0 || self.scroll_top <= 0.0 {
            self.page = 0.0;
            self.offset = 0.0;
        } else {
            // Keep the virtual position if it still fits, else pin to the end.
            let target = if self.scroll_top + self.offset <= self.th - self.viewport_h {
                self.scroll_top + self.offset
            } else {
                self.th - self.viewport_h
            };
            self.scroll_to(target);
        }
        h_changed
    }

    /// Scroll to virtual position `y`, switching pages as needed.
    pub fn scroll_to(&mut self, y: f64) -> ScrollChange {
        let y = y.min(self.th - self.viewport_h).max(0.0);
        let old_offset = self.offset;
        self.page = (self.n - 1.0).min((y / self.ph.max(1.0)).floor()).max(0.0);
        self.offset = (self.page * self.cj).round();
        let new_scroll_top = y - self.offset;

        let offset_changed = (self.offset - old_offset).abs() > f64::EPSILON;
        if offset_changed {
            tracing::debug!(page = self.page, offset = self.offset, "viewport page switched");
        }
        let moved = (self.prev_scroll_top - new_scroll_top).abs() > f64::EPSILON;
        if moved {
            self.v_scroll_dir = if self.prev_scroll_top + old_offset < new_scroll_top + self.offset {
                1
            } else {
                -1
            };
            self.scroll_top = new_scroll_top;
            self.prev_scroll_top = new_scroll_top;
            self.last_rendered_scroll_top = new_scroll_top;
        }
        ScrollChange {
            offset_changed,
            moved,
        }
    }

    /// Absorb a scroll reported by the host (page-relative scroll offsets).
    pub fn handle_scroll(&mut self, scroll_top: f64, scroll_left: f64) -> ScrollOutcome {
        self.scroll_top = scroll_top.max(0.0);
        self.scroll_left = scroll_left.max(0.0);
        let v_distance = (self.scroll_top - self.prev_scroll_top).abs();
        let h_distance = (self.scroll_left - self.prev_scroll_left).abs();
        let mut outcome = ScrollOutcome {
            v_distance,
            h_distance,
            ..ScrollOutcome::default()
        };

        if h_distance > 0.0 {
            self.prev_scroll_left = self.scroll_left;
        }

        if v_distance > 0.0 {
            self.v_scroll_dir = if self.prev_scroll_top < self.scroll_top {
                1
            } else {
                -1
            };
            self.prev_scroll_top = self.scroll_top;

            if v_distance < self.viewport_h {
                let change = self.scroll_to(self.scroll_top + self.offset);
                outcome.offset_changed = change.offset_changed;
            } else {
                let old_offset = self.offset;
                self.page = if (self.h - self.viewport_h).abs() < f64::EPSILON {
                    0.0
                } else {
                    let ratio = (self.th - self.viewport_h) / (self.h - self.viewport_h);
                    (self.n - 1.0)
                        .min((self.scroll_top * ratio / self.ph.max(1.0)).floor())
                        .max(0.0)
                };
                self.offset = (self.page * self.cj).round();
                if (old_offset - self.offset).abs() > f64::EPSILON {
                    tracing::debug!(page = self.page, offset = self.offset, "viewport jumped pages");
                    outcome.invalidate_all = true;
                }
            }
        }
        outcome
    }

    /// True when the scroll moved far enough from the last render to redraw.
    pub fn needs_render(&self) -> bool {
        (self.last_rendered_scroll_top - self.scroll_top).abs() > 20.0
            || (self.last_rendered_scroll_left - self.scroll_left).abs() > 20.0
    }

    /// True when the pending redraw is close enough to do synchronously.
    pub fn render_is_cheap(&self) -> bool {
        (self.last_rendered_scroll_top - self.scroll_top).abs() < self.viewport_h
            && (self.last_rendered_scroll_left - self.scroll_left).abs() < self.viewport_w
    }

    pub fn mark_rendered(&mut self) {
        self.last_rendered_scroll_top = self.scroll_top;
        self.last_rendered_scroll_left = self.scroll_left;
    }

    pub fn horizontal_changed_since_render(&self) -> bool {
        (self.last_rendered_scroll_left - self.scroll_left).abs() > f64::EPSILON
    }

    /// Force the next render to redo horizontal cell cleanup.
    pub fn forget_rendered_left(&mut self) {
        self.last_rendered_scroll_left = -1.0;
    }

    /// Rows and pixels intersecting the viewport at the current scroll.
    pub fn visible_range(&self) -> ViewRange {
        self.visible_range_at(self.scroll_top, self.scroll_left)
    }

    /// `top = floor((scroll_top + offset) / row_height)`,
    /// `bottom = ceil((scroll_top + viewport_h + offset) / row_height)`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn visible_range_at(&self, scroll_top: f64, scroll_left: f64) -> ViewRange {
        ViewRange {
            top: self.row_from_position(scroll_top),
            bottom: ((scroll_top + self.viewport_h + self.offset) / self.row_height).ceil() as i64,
            left_px: scroll_left,
            right_px: scroll_left + self.viewport_w,
        }
    }

    /// Visible range plus a buffer biased towards the scroll direction,
    /// clamped to `rows` (including the add-row) and to the canvas width.
    #[allow(clippy::cast_possible_truncation)]
    pub fn rendered_range(&self, rows: usize, canvas_width: f64) -> ViewRange {
        let mut range = self.visible_range();
        let buffer = (self.viewport_h / self.row_height).round() as i64;
        let min_buffer = 3;
        match self.v_scroll_dir {
            -1 => {
                range.top -= buffer;
                range.bottom += min_buffer;
            }
            1 => {
                range.top -= min_buffer;
                range.bottom += buffer;
            }
            _ => {
                range.top -= min_buffer;
                range.bottom += min_buffer;
            }
        }
        range.top = range.top.max(0);
        range.bottom = range.bottom.min(i64::try_from(rows).unwrap_or(i64::MAX) - 1);
        range.left_px = (range.left_px - self.viewport_w).max(0.0);
        range.right_px = (range.right_px + self.viewport_w).min(canvas_width);
        range
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    fn viewport(rows: usize) -> ViewportVirtualizer {
        let mut v = ViewportVirtualizer::new(25.0, 1_000_000.0);
        v.set_viewport(800.0, 500.0);
        v.set_row_count(rows);
        v
    }

    #[test]
    fn test_visible_range_at_top() {
        let v = viewport(1000);
        let r = v.visible_range();
        assert_eq!((r.top, r.bottom), (0, 20));
        assert_eq!((r.left_px, r.right_px), (0.0, 800.0));
    }

    #[test]
    fn test_visible_range_after_scroll() {
        let mut v = viewport(1000);
        v.scroll_to(1000.0);
        let r = v.visible_range();
        assert_eq!((r.top, r.bottom), (40, 60));
    }

    #[test]
    fn test_rendered_range_buffers_in_scroll_direction() {
        let mut v = viewport(1000);
        v.scroll_to(1000.0);
        assert_eq!(v.scroll_dir(), 1);
        let r = v.rendered_range(1000, 800.0);
        assert_eq!((r.top, r.bottom), (37, 80));

        v.scroll_to(500.0);
        assert_eq!(v.scroll_dir(), -1);
        let r = v.rendered_range(1000, 800.0);
        assert_eq!((r.top, r.bottom), (0, 43));
    }

    #[test]
    fn test_rendered_range_clamps_to_data() {
        let v = viewport(5);
        let r = v.rendered_range(5, 300.0);
        assert_eq!((r.top, r.bottom), (0, 4));
        assert_eq!(r.rows().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_eq!(r.right_px, 300.0);
    }

    #[test]
    fn test_zero_rows_single_page() {
        let v = viewport(0);
        assert_eq!(v.page_count(), 1.0);
        assert_eq!(v.offset(), 0.0);
        let r = v.rendered_range(0, 100.0);
        assert_eq!(r.rows().count(), 0);
    }

    #[test]
    fn test_paging_for_tall_canvas() {
        // 100k rows * 25px = 2.5M px virtual height.
        let mut v = viewport(100_000);
        assert_eq!(v.canvas_height(), 1_000_000.0);
        assert_eq!(v.page_count(), 250.0);
        let change = v.scroll_to(1_500_000.0);
        assert!(change.offset_changed);
        assert!(v.offset() > 0.0);
        // Virtual position is preserved: scroll_top + offset.
        assert_eq!(v.scroll_top() + v.offset(), 1_500_000.0);
        let r = v.visible_range();
        assert_eq!(r.top, 60_000);
    }

    #[test]
    fn test_big_jump_invalidates() {
        let mut v = viewport(100_000);
        let outcome = v.handle_scroll(900_000.0, 0.0);
        assert!(outcome.invalidate_all);
        assert!(v.page() > 0.0);
        let outcome = v.handle_scroll(900_010.0, 0.0);
        assert!(!outcome.invalidate_all);
    }

    #[test]
    fn test_row_top_is_page_relative() {
        let mut v = viewport(100_000);
        v.scroll_to(1_500_000.0);
        let row = 60_000;
        assert_eq!(v.row_top(row), 1_500_000.0 - v.offset());
    }
}
