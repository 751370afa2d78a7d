use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::image::Preloader;

const RESIZE_DEBOUNCE_MS: u64 = 100;

/// Holds the latest value until no new one has arrived for `delay_ms`.
pub(super) struct Debouncer<T> {
    delay_ms: u64,
    latest: Option<(T, u64)>,
}

pub(super) type ResizeDebouncer = Debouncer<(u16, u16)>;

impl<T> Debouncer<T> {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            latest: None,
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.latest.is_some()
    }
}

impl<T: Copy> Debouncer<T> {
    /// Replace any pending value and restart the quiet period.
    pub(super) fn queue(&mut self, value: T, now_ms: u64) {
        self.latest = Some((value, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        match self.latest {
            Some((value, queued_at)) if now_ms.saturating_sub(queued_at) >= self.delay_ms => {
                self.latest = None;
                Some(value)
            }
            _ => None,
        }
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");
        let Self {
            gallery,
            images_enabled,
            force_half_cell,
            preload_enabled,
            config_global_path,
            config_local_path,
        } = self;

        // The picker queries the terminal over stdio, before raw mode starts.
        let picker = if images_enabled {
            let _picker_scope = crate::perf::scope("app.create_picker");
            crate::image::create_picker(force_half_cell)
        } else {
            None
        };

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; snekkja requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let mut model = Model::new(gallery, (size.width, size.height)).with_picker(picker);
        model.images_enabled = images_enabled;
        model.config_global_path = config_global_path;
        model.config_local_path = config_local_path;
        tracing::debug!(
            images = model.gallery.len(),
            root = %model.gallery.root().display(),
            "gallery opened"
        );
        crate::perf::log_event(
            "init.layout",
            format!(
                "terminal={}x{} cell={:?} viewport_px={} capacity={}",
                size.width,
                size.height,
                model.cell_size(),
                model.viewport_width_px(),
                model.window().capacity
            ),
        );

        let preloader = (preload_enabled && model.images_enabled && model.picker.is_some())
            .then(|| Preloader::spawn(model.gallery.images().to_vec(), model.loader().clone()));

        let result = execute!(stdout(), EnableMouseCapture)
            .map_err(anyhow::Error::from)
            .and_then(|()| Self::event_loop(&mut terminal, model, preloader.as_ref()));

        // Stop the preloader before tearing the terminal down.
        drop(preloader);
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn apply(model: Model, msg: Message) -> Model {
        let side_msg = msg.clone();
        let mut model = update(model, msg);
        Self::handle_message_side_effects(&mut model, &side_msg);
        model
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        mut model: Model,
        preloader: Option<&Preloader>,
    ) -> Result<()> {
        let clock = Instant::now();
        let elapsed_ms = || u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut resize = ResizeDebouncer::new(RESIZE_DEBOUNCE_MS);
        let mut frame: u64 = 0;
        let mut dirty = true;

        while !model.should_quit {
            dirty |= model.expire_toast(Instant::now());

            if let Some(preloader) = preloader {
                for event in preloader.try_events() {
                    model.record_preload(&event);
                    dirty = true;
                }
            }

            if let Some((width, height)) = resize.take_ready(elapsed_ms()) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame} width={width} height={height}"),
                );
                model = update(model, Message::Resize(width, height));
                dirty = true;
            }

            let preloading = preloader.is_some() && !model.preload.is_some_and(|p| p.finished);
            let wait = match (dirty, resize.is_pending(), preloading) {
                (true, _, _) => Duration::ZERO,
                (false, true, _) => Duration::from_millis(10),
                (false, false, true) => Duration::from_millis(50),
                (false, false, false) => Duration::from_millis(250),
            };
            if event::poll(wait)? {
                let (next, handled) = Self::drain_input(model, &mut resize, &elapsed_ms, frame)?;
                model = next;
                dirty |= handled > 0;
            }

            if dirty && !model.should_quit {
                frame += 1;
                Self::draw_frame(terminal, &mut model, frame)?;
                dirty = false;
            }
        }
        Ok(())
    }

    /// Handle every queued input event before the next frame.
    fn drain_input(
        mut model: Model,
        resize: &mut ResizeDebouncer,
        elapsed_ms: &impl Fn() -> u64,
        frame: u64,
    ) -> Result<(Model, u32)> {
        let mut handled = 0_u32;
        loop {
            let event = event::read()?;
            if let Some(msg) = Self::handle_event(&event, &model, elapsed_ms(), resize) {
                crate::perf::log_event("event.message", format!("frame={frame} msg={msg:?}"));
                model = Self::apply(model, msg);
                handled += 1;
            }
            if model.should_quit || !event::poll(Duration::ZERO)? {
                break;
            }
        }
        if handled > 1 {
            crate::perf::log_event("event.drain", format!("frame={frame} handled={handled}"));
        }
        Ok((model, handled))
    }

    fn draw_frame(terminal: &mut DefaultTerminal, model: &mut Model, frame: u64) -> Result<()> {
        let prep = Instant::now();
        model.load_visible_images();
        let prep_ms = prep.elapsed().as_secs_f64() * 1000.0;

        let draw = Instant::now();
        terminal.draw(|f| crate::ui::render(model, f))?;
        crate::perf::log_event(
            "frame",
            format!(
                "frame={frame} prep_ms={prep_ms:.3} draw_ms={:.3} focus={} window={:?}",
                draw.elapsed().as_secs_f64() * 1000.0,
                model.current_index(),
                model.window().range()
            ),
        );
        Ok(())
    }
}
