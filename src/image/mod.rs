//! Image decoding and terminal graphics.
//!
//! `ratatui-image` chooses the graphics protocol (Kitty, iTerm2 or Unicode
//! half-blocks). This module owns the pieces around it: picker setup, the
//! decoded image cache, background preloading and the 256-color fallback.

mod loader;
mod palette;
mod preload;

pub use loader::{ImageCache, ImageLoader};
pub use palette::{ColorDepth, index_to_rgb, nearest_index, quantize};
pub use preload::{PreloadEvent, Preloader};

use ratatui_image::picker::Picker;

/// Cell size in pixels assumed when no picker is available.
pub const FALLBACK_FONT_SIZE: (u16, u16) = (10, 20);

#[cfg(unix)]
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(250);

/// Set up the picker that encodes images for this terminal.
///
/// Returns `None` when the terminal cannot be queried; the gallery then
/// shows file names instead of images.
pub fn create_picker(force_half_cell: bool) -> Option<Picker> {
    let picker = if force_half_cell {
        Picker::halfblocks()
    } else {
        query_picker()?
    };
    crate::perf::log_event(
        "image.create_picker",
        format!(
            "forced_half_cell={force_half_cell} protocol={:?} font={:?} term={}",
            picker.protocol_type(),
            picker.font_size(),
            std::env::var("TERM").unwrap_or_else(|_| "<unset>".to_string()),
        ),
    );
    Some(picker)
}

#[cfg(unix)]
fn query_picker() -> Option<Picker> {
    use ratatui_image::picker::cap_parser::QueryStdioOptions;

    let mut options = QueryStdioOptions::default();
    options.timeout = QUERY_TIMEOUT;
    match Picker::from_query_stdio_with_options(options) {
        Ok(picker) => Some(picker),
        Err(err) => {
            tracing::warn!(error = ?err, "terminal graphics query failed");
            None
        }
    }
}

// The stdio capability query can leave a reader blocked on the Windows
// console, so half-blocks are used there.
#[cfg(not(unix))]
fn query_picker() -> Option<Picker> {
    Some(Picker::halfblocks())
}
