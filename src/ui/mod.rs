//! Terminal UI components.
//!
//! Layout is computed here and shared by rendering and mouse hit-testing:
//! - [`gallery_layout`]: screen regions for one frame
//! - [`thumbnail_cells`]: per-thumbnail cells inside the strip
//! - [`style`]: colors

pub mod style;

mod images;
mod overlays;
mod render;
mod status;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::UnicodeWidthStr;

pub use overlays::{centered_popup_rect, help_popup_rect};
pub use render::render;

/// Columns reserved on each side of the strip for the skip arrows.
pub const ARROW_GUTTER_WIDTH: u16 = 3;
/// Smallest strip height: a one-row thumbnail plus its border.
pub const MIN_STRIP_ROWS: u16 = 3;
pub const TITLE_ROWS: u16 = 1;
/// Most rows a caption may take before it is cut off.
pub const MAX_CAPTION_ROWS: u16 = 4;

/// Which optional rows a frame needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    pub title: bool,
    /// Rows for the caption; 0 hides it
    pub caption_rows: u16,
    pub toast: bool,
    pub strip_rows: u16,
}

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryLayout {
    pub title: Option<Rect>,
    pub focus: Rect,
    pub caption: Option<Rect>,
    pub strip: Rect,
    pub prev_gutter: Rect,
    pub thumbnails: Rect,
    pub next_gutter: Rect,
    pub toast: Option<Rect>,
    pub status: Rect,
}

pub fn gallery_layout(area: Rect, options: LayoutOptions) -> GalleryLayout {
    let mut constraints = Vec::with_capacity(6);
    if options.title {
        constraints.push(Constraint::Length(TITLE_ROWS));
    }
    constraints.push(Constraint::Min(1));
    if options.caption_rows > 0 {
        constraints.push(Constraint::Length(options.caption_rows));
    }
    constraints.push(Constraint::Length(options.strip_rows.max(MIN_STRIP_ROWS)));
    if options.toast {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));

    let regions = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut rows = regions.iter().copied();
    let mut next_row = || rows.next().unwrap_or_default();

    let title = options.title.then(&mut next_row);
    let focus = next_row();
    let caption = (options.caption_rows > 0).then(&mut next_row);
    let strip = next_row();
    let toast = options.toast.then(&mut next_row);
    let status = next_row();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(ARROW_GUTTER_WIDTH),
            Constraint::Min(0),
            Constraint::Length(ARROW_GUTTER_WIDTH),
        ])
        .split(strip);

    GalleryLayout {
        title,
        focus,
        caption,
        strip,
        prev_gutter: columns[0],
        thumbnails: columns[1],
        next_gutter: columns[2],
        toast,
        status,
    }
}

/// Rows `caption` needs once wrapped to `width` columns, at most
/// [`MAX_CAPTION_ROWS`]. Every source line takes at least one row.
pub fn caption_rows_for(caption: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = caption
        .lines()
        .map(|line| UnicodeWidthStr::width(line.trim()).div_ceil(width).max(1))
        .sum();
    u16::try_from(rows.max(1))
        .unwrap_or(u16::MAX)
        .min(MAX_CAPTION_ROWS)
}

/// Split the thumbnail region into `capacity` equal cells.
pub fn thumbnail_cells(area: Rect, capacity: usize) -> Vec<Rect> {
    if capacity == 0 {
        return Vec::new();
    }
    let denominator = u32::try_from(capacity).unwrap_or(u32::MAX);
    let constraints = (0..capacity).map(|_| Constraint::Ratio(1, denominator));
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// Rows needed to show a `thumbnail_px` square thumbnail with its border.
pub fn strip_rows_for(thumbnail_px: u32, cell_height_px: u16, screen_rows: u16) -> u16 {
    let cell_height = u32::from(cell_height_px.max(1));
    let image_rows = thumbnail_px.div_ceil(cell_height).max(1);
    let wanted = u16::try_from(image_rows + 2).unwrap_or(u16::MAX);
    let ceiling = (screen_rows / 3).max(MIN_STRIP_ROWS);
    wanted.clamp(MIN_STRIP_ROWS, ceiling)
}

pub const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
