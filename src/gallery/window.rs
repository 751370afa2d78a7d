//! Thumbnail window calculation.
//!
//! Given the total number of images, the strip width, the fixed footprint of
//! one thumbnail and a requested focus index, [`compute_window`] decides which
//! contiguous run of thumbnails is visible and where the focus sits in it.
//!
//! The window always holds an odd number of thumbnails (unless the gallery
//! itself is smaller) so the focused thumbnail has a true center column.

use std::ops::Range;

/// Result of a window calculation.
///
/// # Example
///
/// ```
/// use snekkja::gallery::window::compute_window;
///
/// let window = compute_window(10, 100, 20, 5);
/// assert_eq!(window.capacity, 5);
/// assert_eq!(window.range(), 3..8);
/// assert_eq!(window.skip, 4);
/// assert!(window.show_prev && window.show_next);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowResult {
    /// First visible index.
    pub window_start: usize,
    /// Number of visible thumbnails.
    pub capacity: usize,
    /// Focused index, clamped into the image list.
    pub focus_index: usize,
    /// Distance one arrow press moves the focus.
    pub skip: usize,
    /// Whether a "previous" control is drawn.
    pub show_prev: bool,
    /// Whether a "next" control is drawn.
    pub show_next: bool,
}

impl WindowResult {
    /// Indices covered by the window.
    pub const fn range(&self) -> Range<usize> {
        self.window_start..self.window_start + self.capacity
    }

    /// Largest valid window start for this capacity.
    pub const fn max_start(&self, total: usize) -> usize {
        total.saturating_sub(self.capacity)
    }

    /// Column of the focused thumbnail inside the window.
    pub const fn focus_column(&self) -> usize {
        self.focus_index - self.window_start
    }

    /// Whether `index` is inside the window.
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.window_start && index < self.window_start + self.capacity
    }
}

/// Number of thumbnails that fit in `viewport_width`.
///
/// Always odd and at least one, then capped at `total`.
pub fn window_capacity(total: usize, viewport_width: usize, item_footprint: usize) -> usize {
    let mut capacity = viewport_width / item_footprint.max(1);
    if capacity % 2 == 0 {
        capacity = capacity.saturating_sub(1);
    }
    capacity.max(1).min(total)
}

/// Compute the visible thumbnail window.
///
/// Out-of-range input is clamped, never rejected: a negative
/// `requested_index` focuses the first image, one past the end focuses the
/// last, and a zero-width viewport still shows one thumbnail.
pub fn compute_window(
    total: usize,
    viewport_width: usize,
    item_footprint: usize,
    requested_index: i64,
) -> WindowResult {
    let focus_index = clamp_index(requested_index, total);
    let capacity = window_capacity(total, viewport_width, item_footprint);
    let offset = capacity / 2;
    let max_start = total - capacity;
    let window_start = focus_index.saturating_sub(offset).min(max_start);
    let skip = capacity.saturating_sub(1).max(1);

    WindowResult {
        window_start,
        capacity,
        focus_index,
        skip,
        show_prev: window_start > 0,
        show_next: window_start < max_start,
    }
}

fn clamp_index(requested: i64, total: usize) -> usize {
    let last = total.saturating_sub(1);
    if requested <= 0 {
        return 0;
    }
    usize::try_from(requested).map_or(last, |idx| idx.min(last))
}
