//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{FocusImage, Model, PreloadProgress, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::gallery::Gallery;

/// Main application struct that owns the gallery until the loop starts.
pub struct App {
    gallery: Gallery,
    images_enabled: bool,
    force_half_cell: bool,
    preload_enabled: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application for the given gallery.
    pub const fn new(gallery: Gallery) -> Self {
        Self {
            gallery,
            images_enabled: true,
            force_half_cell: false,
            preload_enabled: true,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Enable or disable image rendering; disabled shows file names only.
    #[must_use]
    pub const fn with_images_enabled(mut self, enabled: bool) -> Self {
        self.images_enabled = enabled;
        self
    }

    /// Skip terminal protocol detection and render with half-blocks.
    #[must_use]
    pub const fn with_force_half_cell(mut self, enabled: bool) -> Self {
        self.force_half_cell = enabled;
        self
    }

    /// Decode every image in the background after startup.
    #[must_use]
    pub const fn with_preload(mut self, enabled: bool) -> Self {
        self.preload_enabled = enabled;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
