// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. gallery::GalleryError)
    clippy::module_name_repetitions
)]

//! # Snekkja
//!
//! A terminal image gallery: a large focused image, its caption, and a
//! thumbnail strip that windows over the whole image list and re-centers as
//! you navigate.
//!
//! ## Architecture
//!
//! The navigation core is pure and lives in [`gallery`]:
//! - [`gallery::window`]: which thumbnails are visible for a focus index
//! - [`gallery::view`]: navigation state and the render description
//!
//! The terminal application uses The Elm Architecture (TEA):
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`gallery`]: Image list, captions, windowing and navigation
//! - [`config`]: Gallery settings and saved defaults
//! - [`image`]: Image loading, caching and terminal protocols
//! - [`ui`]: Terminal UI components
//! - [`perf`]: Timing scopes and the render debug log

pub mod app;
pub mod config;
pub mod gallery;
pub mod image;
pub mod perf;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::config::GalleryConfig;
    pub use crate::gallery::{Gallery, Navigator, RenderDescription, Trigger, compute_window};
}
