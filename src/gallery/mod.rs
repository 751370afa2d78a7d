//! Gallery contents and the navigation core.
//!
//! - [`Gallery`]: the immutable image list, captions and display settings
//! - [`window`]: pure thumbnail window calculation
//! - [`view`]: navigation state and the render description it produces
//! - [`scan`] / [`captions`]: building a gallery from a directory
//! - [`manifest`]: JSON export of the gallery data

pub mod captions;
pub mod manifest;
pub mod scan;
pub mod view;
pub mod window;

pub use view::{
    ArrowControl, Caption, NavigationState, Navigator, RenderDescription, Thumbnail, Trigger,
    ViewportMetrics, ZoomOverlay,
};
pub use window::{WindowResult, compute_window};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::GalleryConfig;

/// Default thumbnail edge length in pixels.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 100;

/// Errors raised while assembling a gallery.
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// The image list was empty.
    #[error("no images found in {}", .0.display())]
    NoImages(PathBuf),
    /// The gallery directory could not be listed.
    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An ordered, non-empty set of images with their captions.
///
/// Identifiers are opaque strings; for directory galleries they are file
/// names relative to [`Gallery::root`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    root: PathBuf,
    images: Vec<String>,
    captions: HashMap<String, String>,
    default_caption: Option<String>,
    title: Option<String>,
    thumbnail_size: u32,
}

impl Gallery {
    /// Create a gallery from an ordered image list.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::NoImages`] if `images` is empty.
    pub fn new(images: Vec<String>) -> Result<Self, GalleryError> {
        if images.is_empty() {
            return Err(GalleryError::NoImages(PathBuf::from(".")));
        }
        Ok(Self {
            root: PathBuf::from("."),
            images,
            captions: HashMap::new(),
            default_caption: None,
            title: None,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        })
    }

    /// Build a gallery from the image files in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed or contains no
    /// files with a configured image extension.
    pub fn load(dir: &Path, config: &GalleryConfig) -> Result<Self, GalleryError> {
        let images = scan::list_images(dir, &config.file_extensions)?;
        if images.is_empty() {
            return Err(GalleryError::NoImages(dir.to_path_buf()));
        }
        let captions = captions::read_captions(dir, &images);
        tracing::debug!(
            dir = %dir.display(),
            images = images.len(),
            captions = captions.len(),
            "loaded gallery"
        );

        Ok(Self::new(images)?
            .with_root(dir.to_path_buf())
            .with_captions(captions)
            .with_default_caption(config.default_caption.clone())
            .with_title(config.gallery_title.clone())
            .with_thumbnail_size(config.thumbnail_size))
    }

    /// Directory identifiers are resolved against.
    #[must_use]
    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.root = root;
        self
    }

    #[must_use]
    pub fn with_captions(mut self, captions: HashMap<String, String>) -> Self {
        self.captions = captions;
        self
    }

    /// Caption shown when an image has none of its own. Empty means none.
    #[must_use]
    pub fn with_default_caption(mut self, caption: Option<String>) -> Self {
        self.default_caption = caption.filter(|c| !c.is_empty());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.is_empty());
        self
    }

    /// Thumbnail edge length in pixels. Zero is raised to one.
    #[must_use]
    pub fn with_thumbnail_size(mut self, size: u32) -> Self {
        self.thumbnail_size = size.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn image(&self, index: usize) -> Option<&str> {
        self.images.get(index).map(String::as_str)
    }

    pub fn captions(&self) -> &HashMap<String, String> {
        &self.captions
    }

    pub fn default_caption(&self) -> Option<&str> {
        self.default_caption.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub const fn thumbnail_size(&self) -> u32 {
        self.thumbnail_size
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the caption for an image identifier.
    ///
    /// A specific non-empty caption wins, then the default caption;
    /// otherwise the caption region is hidden.
    pub fn caption_for(&self, id: &str) -> Caption {
        self.captions
            .get(id)
            .filter(|c| !c.is_empty())
            .or(self.default_caption.as_ref())
            .map_or(Caption::Hidden, |c| Caption::Text(c.clone()))
    }

    /// Filesystem path for an identifier.
    pub fn resolve_path(&self, id: &str) -> PathBuf {
        let path = Path::new(id);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
