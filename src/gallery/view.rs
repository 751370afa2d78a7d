//! Navigation state and render descriptions.
//!
//! The [`Navigator`] owns the only mutable gallery state. Every trigger goes
//! through [`Navigator::dispatch`], runs the window calculation, and yields a
//! [`RenderDescription`]: plain data the UI layer paints.

use super::Gallery;
use super::window::{WindowResult, compute_window};

/// Horizontal padding around each thumbnail, in pixels.
pub const THUMBNAIL_PADDING: u32 = 8;

/// Strip width and thumbnail footprint, both in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportMetrics {
    viewport_width: usize,
    item_footprint: usize,
}

impl ViewportMetrics {
    pub const fn new(viewport_width: usize, item_footprint: usize) -> Self {
        Self {
            viewport_width,
            item_footprint,
        }
    }

    /// Metrics for thumbnails of `thumbnail_size` px plus the standard padding.
    pub fn for_thumbnails(viewport_width: usize, thumbnail_size: u32) -> Self {
        let footprint = thumbnail_size.saturating_add(THUMBNAIL_PADDING);
        Self::new(viewport_width, footprint as usize)
    }

    pub const fn viewport_width(&self) -> usize {
        self.viewport_width
    }

    pub const fn item_footprint(&self) -> usize {
        self.item_footprint
    }
}

/// The mutable part of a gallery session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current_index: usize,
    pub window_start: usize,
}

/// One visible thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub index: usize,
    pub id: String,
    pub focused: bool,
}

/// A prev/next control and the index it navigates to.
///
/// `target` may fall outside the list; dispatching it clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowControl {
    pub target: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caption {
    Text(String),
    Hidden,
}

impl Caption {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Hidden => None,
        }
    }
}

/// Everything the UI needs to draw one frame of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDescription {
    pub focus_index: usize,
    pub focus_id: String,
    pub thumbnails: Vec<Thumbnail>,
    pub prev: Option<ArrowControl>,
    pub next: Option<ArrowControl>,
    pub caption: Caption,
    /// Only set on the first render of a session.
    pub title: Option<String>,
}

impl RenderDescription {
    pub fn visible_ids(&self) -> impl Iterator<Item = &str> {
        self.thumbnails.iter().map(|t| t.id.as_str())
    }
}

/// Triggers accepted by [`Navigator::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Focus an absolute index (clamped).
    NavigateTo(i64),
    /// A visible thumbnail was clicked.
    ThumbnailClick(usize),
    /// The "previous" arrow control.
    Prev,
    /// The "next" arrow control.
    Next,
    /// The strip was resized to this pixel width.
    Resize(usize),
}

/// Owns the navigation state and the viewport metrics.
#[derive(Debug, Clone)]
pub struct Navigator {
    state: NavigationState,
    metrics: ViewportMetrics,
    window: WindowResult,
}

impl Navigator {
    pub fn new(metrics: ViewportMetrics) -> Self {
        Self {
            state: NavigationState::default(),
            metrics,
            window: WindowResult {
                window_start: 0,
                capacity: 1,
                focus_index: 0,
                skip: 1,
                show_prev: false,
                show_next: false,
            },
        }
    }

    pub const fn state(&self) -> NavigationState {
        self.state
    }

    pub const fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    /// The window computed by the most recent render.
    pub const fn window(&self) -> &WindowResult {
        &self.window
    }

    pub const fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// First render of a session: focus index 0 and attach the title.
    pub fn start(&mut self, gallery: &Gallery) -> RenderDescription {
        let mut description = self.navigate_to(gallery, 0);
        description.title = gallery.title().map(ToOwned::to_owned);
        description
    }

    /// Focus `index` (clamped) and recenter the window around it.
    pub fn navigate_to(&mut self, gallery: &Gallery, index: i64) -> RenderDescription {
        let window = compute_window(
            gallery.len(),
            self.metrics.viewport_width,
            self.metrics.item_footprint,
            index,
        );
        self.window = window;
        self.state = NavigationState {
            current_index: window.focus_index,
            window_start: window.window_start,
        };
        describe(gallery, &window)
    }

    /// Re-run the calculation for the current focus, e.g. after a resize.
    pub fn recompute(&mut self, gallery: &Gallery) -> RenderDescription {
        let current = i64::try_from(self.state.current_index).unwrap_or(i64::MAX);
        self.navigate_to(gallery, current)
    }

    pub const fn set_viewport_width(&mut self, viewport_width: usize) {
        self.metrics.viewport_width = viewport_width;
    }

    /// Single entry point for every navigation trigger.
    pub fn dispatch(&mut self, gallery: &Gallery, trigger: Trigger) -> RenderDescription {
        match trigger {
            Trigger::NavigateTo(index) => self.navigate_to(gallery, index),
            Trigger::ThumbnailClick(index) => {
                self.navigate_to(gallery, i64::try_from(index).unwrap_or(i64::MAX))
            }
            Trigger::Prev => match prev_control(&self.window) {
                Some(control) => self.navigate_to(gallery, control.target),
                None => self.recompute(gallery),
            },
            Trigger::Next => match next_control(&self.window) {
                Some(control) => self.navigate_to(gallery, control.target),
                None => self.recompute(gallery),
            },
            Trigger::Resize(viewport_width) => {
                self.set_viewport_width(viewport_width);
                self.recompute(gallery)
            }
        }
    }
}

fn prev_control(window: &WindowResult) -> Option<ArrowControl> {
    window.show_prev.then(|| ArrowControl {
        target: signed(window.focus_index) - signed(window.skip),
    })
}

fn next_control(window: &WindowResult) -> Option<ArrowControl> {
    window.show_next.then(|| ArrowControl {
        target: signed(window.focus_index) + signed(window.skip),
    })
}

fn signed(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn describe(gallery: &Gallery, window: &WindowResult) -> RenderDescription {
    let thumbnails = window
        .range()
        .filter_map(|index| {
            gallery.image(index).map(|id| Thumbnail {
                index,
                id: id.to_owned(),
                focused: index == window.focus_index,
            })
        })
        .collect();
    let focus_id = gallery
        .image(window.focus_index)
        .unwrap_or_default()
        .to_owned();
    let caption = gallery.caption_for(&focus_id);

    RenderDescription {
        focus_index: window.focus_index,
        focus_id,
        thumbnails,
        prev: prev_control(window),
        next: next_control(window),
        caption,
        title: None,
    }
}

/// Full-screen view of the focused image.
///
/// Independent of navigation; it always shows whatever is focused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoomOverlay {
    zoomed: bool,
}

impl ZoomOverlay {
    pub const fn activate(&mut self) {
        self.zoomed = true;
    }

    pub const fn deactivate(&mut self) {
        self.zoomed = false;
    }

    pub const fn toggle(&mut self) {
        self.zoomed = !self.zoomed;
    }

    pub const fn is_zoomed(&self) -> bool {
        self.zoomed
    }
}
