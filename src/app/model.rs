use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use image::DynamicImage;
use image::imageops::FilterType;
use ratatui::layout::Rect;
use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;

use crate::gallery::{
    Gallery, Navigator, RenderDescription, Trigger, ViewportMetrics, WindowResult, ZoomOverlay,
};
use crate::image::{ColorDepth, FALLBACK_FONT_SIZE, ImageCache, ImageLoader, PreloadEvent};
use crate::ui::{GalleryLayout, LayoutOptions};

/// Bytes of decoded pixel data kept in memory at once.
const IMAGE_CACHE_BUDGET: usize = 256 * 1024 * 1024;
const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Counters for the background preloader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadProgress {
    pub total: usize,
    pub loaded: usize,
    pub failed: usize,
    pub finished: bool,
}

/// Protocol for the large image, remembering what it was built for.
pub struct FocusImage {
    pub index: usize,
    target_px: (u32, u32),
    pub protocol: StatefulProtocol,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    pub gallery: Gallery,
    navigator: Navigator,
    /// Description produced by the most recent navigation trigger
    pub view: RenderDescription,
    /// Title captured from the first render
    pub title: Option<String>,
    pub zoom: ZoomOverlay,
    pub help_visible: bool,
    pub terminal_size: (u16, u16),
    /// Image picker for terminal rendering
    pub picker: Option<Picker>,
    pub images_enabled: bool,
    loader: ImageLoader,
    /// Thumbnail protocols for the visible window, keyed by gallery index
    pub thumbnail_protocols: HashMap<usize, StatefulProtocol>,
    pub focus_image: Option<FocusImage>,
    /// Decode errors by gallery index
    failed_images: HashMap<usize, String>,
    /// Failed indices that already raised a toast
    toasted_failures: HashSet<usize>,
    pub preload: Option<PreloadProgress>,
    toast: Option<Toast>,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("root", &self.gallery.root())
            .field("images", &self.gallery.len())
            .field("focus", &self.view.focus_index)
            .field("zoomed", &self.zoom.is_zoomed())
            .field("help_visible", &self.help_visible)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model focused on the first image.
    pub fn new(gallery: Gallery, terminal_size: (u16, u16)) -> Self {
        let metrics = ViewportMetrics::for_thumbnails(
            strip_pixel_width(terminal_size.0, FALLBACK_FONT_SIZE),
            gallery.thumbnail_size(),
        );
        let mut navigator = Navigator::new(metrics);
        let view = navigator.start(&gallery);
        let loader = ImageLoader::new(
            gallery.root().to_path_buf(),
            ImageCache::new(IMAGE_CACHE_BUDGET),
        );

        let mut model = Self {
            title: view.title.clone(),
            gallery,
            navigator,
            view,
            zoom: ZoomOverlay::default(),
            help_visible: false,
            terminal_size,
            picker: None,
            images_enabled: true,
            loader,
            thumbnail_protocols: HashMap::new(),
            focus_image: None,
            failed_images: HashMap::new(),
            toasted_failures: HashSet::new(),
            preload: None,
            toast: None,
            config_global_path: None,
            config_local_path: None,
            should_quit: false,
        };
        model.refit_loader();
        model
    }

    /// Set the image picker; the cell size it reports changes the strip width.
    #[must_use]
    pub fn with_picker(mut self, picker: Option<Picker>) -> Self {
        self.picker = picker;
        self.refresh_metrics();
        self
    }

    pub const fn current_index(&self) -> usize {
        self.navigator.current_index()
    }

    pub const fn window(&self) -> &WindowResult {
        self.navigator.window()
    }

    pub const fn metrics(&self) -> ViewportMetrics {
        self.navigator.metrics()
    }

    pub const fn loader(&self) -> &ImageLoader {
        &self.loader
    }

    /// Absolute path of the focused image.
    pub fn focused_path(&self) -> PathBuf {
        self.gallery.resolve_path(&self.view.focus_id)
    }

    /// Pixel size of one terminal cell.
    pub fn cell_size(&self) -> (u16, u16) {
        self.picker
            .as_ref()
            .map_or(FALLBACK_FONT_SIZE, Picker::font_size)
    }

    /// Strip width in pixels, as fed to the window calculation.
    pub fn viewport_width_px(&self) -> usize {
        strip_pixel_width(self.terminal_size.0, self.cell_size())
    }

    /// Run a navigation trigger and store the resulting description.
    pub fn navigate(&mut self, trigger: Trigger) {
        self.view = self.navigator.dispatch(&self.gallery, trigger);
        crate::perf::log_event(
            "nav.dispatch",
            format!(
                "trigger={trigger:?} focus={} window={:?} skip={}",
                self.view.focus_index,
                self.window().range(),
                self.window().skip
            ),
        );
    }

    /// Recompute the window for the current terminal width.
    pub fn refresh_metrics(&mut self) {
        self.refit_loader();
        self.navigate(Trigger::Resize(self.viewport_width_px()));
    }

    /// Largest size any image is drawn at: the terminal in pixels, and never
    /// less than a thumbnail.
    pub fn decode_fit(&self) -> (u32, u32) {
        let (cell_w, cell_h) = self.cell_size();
        let thumb = self.gallery.thumbnail_size();
        (
            (u32::from(self.terminal_size.0) * u32::from(cell_w)).max(thumb),
            (u32::from(self.terminal_size.1) * u32::from(cell_h)).max(thumb),
        )
    }

    /// Track the terminal size in the loader's fit bound. Cached copies are
    /// dropped when the bound grows, since they were scaled for less room.
    fn refit_loader(&mut self) {
        let fit = self.decode_fit();
        let grew = self
            .loader
            .fit()
            .is_some_and(|(width, height)| fit.0 > width || fit.1 > height);
        if grew {
            self.loader.cache().clear();
        }
        self.loader = self.loader.clone().with_fit(Some(fit));
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            title: self.title.is_some(),
            caption_rows: self.view.caption.text().map_or(0, |caption| {
                crate::ui::caption_rows_for(caption, self.terminal_size.0)
            }),
            toast: self.toast.is_some(),
            strip_rows: crate::ui::strip_rows_for(
                self.gallery.thumbnail_size(),
                self.cell_size().1,
                self.terminal_size.1,
            ),
        }
    }

    /// Layout of the full terminal, as used for mouse hit-testing.
    pub fn layout(&self) -> GalleryLayout {
        let (width, height) = self.terminal_size;
        crate::ui::gallery_layout(Rect::new(0, 0, width, height), self.layout_options())
    }

    pub fn image_failed(&self, index: usize) -> bool {
        self.failed_images.contains_key(&index)
    }

    /// Raise an error toast the first time the focused image is known to
    /// have failed, whichever path found the failure.
    fn toast_focus_failure(&mut self) {
        let focus = self.view.focus_index;
        if let Some(err) = self.failed_images.get(&focus)
            && self.toasted_failures.insert(focus)
        {
            let message = format!("Cannot load {}: {err}", self.view.focus_id);
            self.show_toast(ToastLevel::Error, message);
        }
    }

    /// Build protocols for the visible thumbnails and the focused image.
    ///
    /// Thumbnails that left the window are dropped. Images that fail to
    /// decode are remembered and not retried.
    pub fn load_visible_images(&mut self) {
        if !self.images_enabled {
            return;
        }
        let Some(picker) = &self.picker else { return };

        let use_halfblocks = matches!(picker.protocol_type(), ProtocolType::Halfblocks);
        let quantize = use_halfblocks && !ColorDepth::detect().is_truecolor();
        let range = self.navigator.window().range();
        self.thumbnail_protocols
            .retain(|index, _| range.contains(index));

        let thumb_px = self.gallery.thumbnail_size();
        for thumb in &self.view.thumbnails {
            if self.thumbnail_protocols.contains_key(&thumb.index)
                || self.failed_images.contains_key(&thumb.index)
            {
                continue;
            }
            match self.loader.load(&thumb.id) {
                Ok(img) => {
                    let scaled = prepare_for_terminal(img.thumbnail(thumb_px, thumb_px), quantize);
                    self.thumbnail_protocols
                        .insert(thumb.index, picker.new_resize_protocol(scaled));
                    crate::perf::log_event(
                        "image.thumbnail",
                        format!("index={} id={} ansi256={quantize}", thumb.index, thumb.id),
                    );
                }
                Err(err) => {
                    crate::perf::log_event(
                        "image.thumbnail.error",
                        format!("id={} err={err}", thumb.id),
                    );
                    self.failed_images.insert(thumb.index, err.to_string());
                }
            }
        }

        let (cell_w, cell_h) = picker.font_size();
        let target_px = (
            u32::from(self.terminal_size.0) * u32::from(cell_w),
            u32::from(self.terminal_size.1) * u32::from(cell_h),
        );
        let focus = self.view.focus_index;
        let stale = self
            .focus_image
            .as_ref()
            .is_none_or(|image| image.index != focus || image.target_px != target_px);
        if self.failed_images.contains_key(&focus) {
            self.focus_image = None;
            self.toast_focus_failure();
            return;
        }
        if !stale {
            return;
        }

        let failure = match self.loader.load(&self.view.focus_id) {
            Ok(img) => {
                let filter = if use_halfblocks {
                    FilterType::CatmullRom
                } else {
                    FilterType::Triangle
                };
                let fitted = if img.width() > target_px.0 || img.height() > target_px.1 {
                    img.resize(target_px.0, target_px.1, filter)
                } else {
                    DynamicImage::clone(&img)
                };
                let protocol = picker.new_resize_protocol(prepare_for_terminal(fitted, quantize));
                self.focus_image = Some(FocusImage {
                    index: focus,
                    target_px,
                    protocol,
                });
                crate::perf::log_event(
                    "image.focus",
                    format!("index={focus} target={target_px:?} halfblocks={use_halfblocks}"),
                );
                None
            }
            Err(err) => Some(err.to_string()),
        };

        if let Some(err) = failure {
            crate::perf::log_event(
                "image.focus.error",
                format!("id={} err={err}", self.view.focus_id),
            );
            self.focus_image = None;
            self.failed_images.insert(focus, err);
            self.toast_focus_failure();
        }
    }

    /// Fold a preloader event into the progress counters.
    pub fn record_preload(&mut self, event: &PreloadEvent) {
        let progress = self.preload.get_or_insert_with(|| PreloadProgress {
            total: self.gallery.len(),
            ..PreloadProgress::default()
        });
        match event {
            PreloadEvent::Loaded { .. } => progress.loaded += 1,
            PreloadEvent::Failed { index, error } => {
                progress.failed += 1;
                self.failed_images.insert(*index, error.clone());
            }
            PreloadEvent::Finished { loaded, failed } => {
                progress.loaded = *loaded;
                progress.failed = *failed;
                progress.finished = true;
            }
        }
        self.toast_focus_failure();
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

/// Pixel width of the thumbnail area between the arrow gutters.
fn strip_pixel_width(terminal_width: u16, cell_size: (u16, u16)) -> usize {
    let columns = terminal_width.saturating_sub(2 * crate::ui::ARROW_GUTTER_WIDTH);
    usize::from(columns) * usize::from(cell_size.0)
}

fn prepare_for_terminal(image: DynamicImage, quantize: bool) -> DynamicImage {
    if quantize {
        crate::image::quantize(&image)
    } else {
        image
    }
}
