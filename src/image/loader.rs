//! Decoding gallery images through a shared cache.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use image::DynamicImage;
use image::imageops::FilterType;

/// Heap size of the pixel buffer.
fn image_bytes(image: &DynamicImage) -> usize {
    image.as_bytes().len()
}

#[derive(Debug, Default)]
struct Slots {
    images: HashMap<PathBuf, Arc<DynamicImage>>,
    arrival: VecDeque<PathBuf>,
    bytes: usize,
}

impl Slots {
    fn store(&mut self, path: PathBuf, image: Arc<DynamicImage>, budget: usize) {
        self.bytes += image_bytes(&image);
        match self.images.insert(path.clone(), image) {
            Some(old) => self.bytes -= image_bytes(&old),
            None => self.arrival.push_back(path),
        }
        // The newest entry stays even when it alone exceeds the budget.
        while self.bytes > budget && self.arrival.len() > 1 {
            let Some(oldest) = self.arrival.pop_front() else {
                break;
            };
            if let Some(evicted) = self.images.remove(&oldest) {
                self.bytes -= image_bytes(&evicted);
            }
        }
    }

    fn clear(&mut self) {
        self.images.clear();
        self.arrival.clear();
        self.bytes = 0;
    }
}

/// Decoded images keyed by path, first in first out once the pixel data
/// passes `budget` bytes.
///
/// Clones share storage, so the preload thread fills the cache the UI reads.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    slots: Arc<Mutex<Slots>>,
    budget: usize,
}

impl ImageCache {
    pub fn new(budget: usize) -> Self {
        Self {
            slots: Arc::default(),
            budget,
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn get(&self, path: &Path) -> Option<Arc<DynamicImage>> {
        self.slots().images.get(path).cloned()
    }

    /// Store `image`, evicting the oldest entries beyond the budget.
    /// Replacing an existing path keeps its original position.
    pub fn insert(&self, path: PathBuf, image: Arc<DynamicImage>) {
        self.slots().store(path, image, self.budget);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.slots().images.contains_key(path)
    }

    pub fn clear(&self) {
        self.slots().clear();
    }

    pub fn len(&self) -> usize {
        self.slots().images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes of pixel data currently held.
    pub fn bytes(&self) -> usize {
        self.slots().bytes
    }

    pub const fn budget(&self) -> usize {
        self.budget
    }
}

/// Opens gallery images relative to the gallery root.
///
/// With a fit bound set, decodes larger than the bound are scaled down
/// before they reach the cache.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    root: PathBuf,
    cache: ImageCache,
    fit: Option<(u32, u32)>,
}

impl ImageLoader {
    pub const fn new(root: PathBuf, cache: ImageCache) -> Self {
        Self {
            root,
            cache,
            fit: None,
        }
    }

    /// Keep cached copies within `fit` pixels, preserving aspect ratio.
    #[must_use]
    pub const fn with_fit(mut self, fit: Option<(u32, u32)>) -> Self {
        self.fit = fit;
        self
    }

    pub const fn fit(&self) -> Option<(u32, u32)> {
        self.fit
    }

    /// Decode `id`, or return the cached copy.
    ///
    /// # Errors
    ///
    /// Returns the decode error if the file is missing or not an image.
    pub fn load(&self, id: &str) -> image::ImageResult<Arc<DynamicImage>> {
        let path = self.resolve_path(id);
        if let Some(image) = self.cache.get(&path) {
            return Ok(image);
        }
        let image = Arc::new(self.fit_image(image::open(&path)?));
        self.cache.insert(path, Arc::clone(&image));
        Ok(image)
    }

    fn fit_image(&self, image: DynamicImage) -> DynamicImage {
        match self.fit {
            Some((width, height)) if image.width() > width || image.height() > height => {
                image.resize(width.max(1), height.max(1), FilterType::Triangle)
            }
            _ => image,
        }
    }

    /// `id` joined to the root unless it is already absolute.
    pub fn resolve_path(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn cache(&self) -> &ImageCache {
        &self.cache
    }
}
