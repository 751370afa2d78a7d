//! Background decoding of the whole gallery into the shared cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::JoinHandle;

use super::ImageLoader;

/// Progress reported by the preload thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadEvent {
    Loaded { index: usize },
    Failed { index: usize, error: String },
    Finished { loaded: usize, failed: usize },
}

/// Decodes every image of a gallery on a worker thread.
///
/// Dropping the preloader asks the worker to stop after its current image.
pub struct Preloader {
    rx: Receiver<PreloadEvent>,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Preloader {
    /// Start decoding `ids` in order through `loader`.
    pub fn spawn(ids: Vec<String>, loader: ImageLoader) -> Self {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);

        let handle = std::thread::spawn(move || {
            let mut loaded = 0;
            let mut failed = 0;
            for (index, id) in ids.iter().enumerate() {
                if worker_cancel.load(Ordering::Relaxed) {
                    return;
                }
                let event = match loader.load(id) {
                    Ok(_) => {
                        loaded += 1;
                        PreloadEvent::Loaded { index }
                    }
                    Err(err) => {
                        failed += 1;
                        crate::perf::log_event("preload.failed", format!("id={id} err={err}"));
                        PreloadEvent::Failed {
                            index,
                            error: err.to_string(),
                        }
                    }
                };
                if tx.send(event).is_err() {
                    return;
                }
            }
            crate::perf::log_event(
                "preload.finished",
                format!("loaded={loaded} failed={failed}"),
            );
            let _ = tx.send(PreloadEvent::Finished { loaded, failed });
        });

        Self {
            rx,
            cancel,
            handle: Some(handle),
        }
    }

    /// Drain all events that are ready without blocking.
    pub fn try_events(&self) -> Vec<PreloadEvent> {
        self.rx.try_iter().collect()
    }

    /// Block until the worker finishes, returning every remaining event.
    pub fn drain(mut self) -> Vec<PreloadEvent> {
        let events = self.rx.iter().collect();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        events
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for Preloader {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageCache;
    use image::{DynamicImage, Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_preloader_fills_cache_and_reports_failures() {
        let dir = tempdir().unwrap();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])))
            .save(dir.path().join("ok.png"))
            .unwrap();
        std::fs::write(dir.path().join("bad.png"), b"not a png").unwrap();

        let cache = ImageCache::new(1 << 20);
        let loader = ImageLoader::new(dir.path().to_path_buf(), cache.clone());
        let events = Preloader::spawn(vec!["ok.png".into(), "bad.png".into()], loader).drain();

        assert_eq!(events[0], PreloadEvent::Loaded { index: 0 });
        assert!(matches!(events[1], PreloadEvent::Failed { index: 1, .. }));
        assert_eq!(
            events.last(),
            Some(&PreloadEvent::Finished {
                loaded: 1,
                failed: 1
            })
        );
        assert!(cache.contains(&dir.path().join("ok.png")));
    }

    #[test]
    fn test_preloader_caches_fitted_copies() {
        let dir = tempdir().unwrap();
        for name in ["a.png", "b.png"] {
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(1200, 900, Rgba([1, 2, 3, 255])))
                .save(dir.path().join(name))
                .unwrap();
        }
        let cache = ImageCache::new(1 << 20);
        let loader =
            ImageLoader::new(dir.path().to_path_buf(), cache.clone()).with_fit(Some((200, 200)));
        Preloader::spawn(vec!["a.png".into(), "b.png".into()], loader).drain();

        let cached = cache.get(&dir.path().join("a.png")).unwrap();
        assert_eq!((cached.width(), cached.height()), (200, 150));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.bytes(), 2 * 200 * 150 * 4);
    }

    #[test]
    fn test_cancelled_preloader_stops_before_work() {
        let dir = tempdir().unwrap();
        let loader = ImageLoader::new(dir.path().to_path_buf(), ImageCache::new(1));
        let preloader = Preloader::spawn(Vec::new(), loader);
        preloader.cancel();
        let events = preloader.drain();
        assert!(events.len() <= 1);
    }
}
