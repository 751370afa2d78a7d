use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use image::{DynamicImage, Rgba, RgbaImage};
use ratatui_image::picker::Picker;
use tempfile::tempdir;

use crate::gallery::{Caption, Gallery};
use crate::image::PreloadEvent;

use super::event_loop::ResizeDebouncer;
use super::{App, Message, Model, PreloadProgress, ToastLevel, update};

fn names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("img{i:02}.png")).collect()
}

/// 20 images on an 80x24 terminal with the fallback 10x20 cell:
/// 74 strip columns = 740 px, footprint 108 px, capacity 5.
fn create_test_model() -> Model {
    let gallery = Gallery::new(names(20)).unwrap();
    Model::new(gallery, (80, 24))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Up(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn write_png(dir: &std::path::Path, name: &str) {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 12, Rgba([200, 40, 40, 255])))
        .save(dir.join(name))
        .unwrap();
}

#[test]
fn test_model_starts_at_first_image() {
    let model = create_test_model();
    assert_eq!(model.current_index(), 0);
    assert_eq!(model.viewport_width_px(), 740);
    assert_eq!(model.window().capacity, 5);
    assert_eq!(model.window().range(), 0..5);
    assert!(model.view.prev.is_none());
    assert!(model.view.next.is_some());
    assert!(model.view.thumbnails[0].focused);
}

#[test]
fn test_next_and_prev_step_by_one() {
    let model = update(create_test_model(), Message::Next);
    assert_eq!(model.current_index(), 1);
    assert_eq!(model.view.focus_id, "img01.png");

    let model = update(model, Message::Prev);
    assert_eq!(model.current_index(), 0);
}

#[test]
fn test_prev_at_first_image_stays() {
    let model = update(create_test_model(), Message::Prev);
    assert_eq!(model.current_index(), 0);
}

#[test]
fn test_next_at_last_image_stays() {
    let model = update(create_test_model(), Message::Last);
    let model = update(model, Message::Next);
    assert_eq!(model.current_index(), 19);
    assert_eq!(model.window().range(), 15..20);
    assert!(model.view.next.is_none());
    assert!(model.view.prev.is_some());
}

#[test]
fn test_goto_recenters_window() {
    let model = update(create_test_model(), Message::GoTo(10));
    assert_eq!(model.current_index(), 10);
    assert_eq!(model.window().range(), 8..13);
    assert_eq!(model.window().focus_column(), 2);
}

#[test]
fn test_goto_clamps_out_of_range_requests() {
    let model = update(create_test_model(), Message::GoTo(-7));
    assert_eq!(model.current_index(), 0);

    let model = update(model, Message::GoTo(i64::MAX));
    assert_eq!(model.current_index(), 19);
}

#[test]
fn test_first_returns_to_start() {
    let model = update(create_test_model(), Message::GoTo(12));
    let model = update(model, Message::First);
    assert_eq!(model.current_index(), 0);
    assert_eq!(model.window().window_start, 0);
}

#[test]
fn test_skip_forward_moves_by_skip_from_focus() {
    let model = update(create_test_model(), Message::SkipForward);
    // skip = capacity - 1 = 4
    assert_eq!(model.current_index(), 4);
    assert_eq!(model.window().range(), 2..7);

    let model = update(model, Message::SkipForward);
    assert_eq!(model.current_index(), 8);
}

#[test]
fn test_skip_back_without_prev_control_keeps_state() {
    let model = create_test_model();
    let before = model.view.clone();
    let model = update(model, Message::SkipBack);
    assert_eq!(model.current_index(), 0);
    assert_eq!(model.view, before);
}

#[test]
fn test_skip_back_targets_focus_minus_skip() {
    let model = update(create_test_model(), Message::GoTo(10));
    assert_eq!(model.view.prev.map(|c| c.target), Some(6));
    let model = update(model, Message::SkipBack);
    assert_eq!(model.current_index(), 6);
}

#[test]
fn test_thumbnail_click_focuses_index() {
    let model = update(create_test_model(), Message::ThumbnailClick(3));
    assert_eq!(model.current_index(), 3);
    assert_eq!(model.window().range(), 1..6);
}

#[test]
fn test_resize_wider_grows_window_and_keeps_focus() {
    let model = update(create_test_model(), Message::GoTo(10));
    let model = update(model, Message::Resize(200, 40));
    // 194 columns * 10 px = 1940 px / 108 = 17
    assert_eq!(model.window().capacity, 17);
    assert_eq!(model.current_index(), 10);
    assert_eq!(model.window().range(), 2..19);
    assert_eq!(model.terminal_size, (200, 40));
}

#[test]
fn test_resize_narrow_keeps_single_thumbnail() {
    let model = update(create_test_model(), Message::GoTo(5));
    let model = update(model, Message::Resize(10, 24));
    assert_eq!(model.window().capacity, 1);
    assert_eq!(model.window().skip, 1);
    assert_eq!(model.window().range(), 5..6);
}

#[test]
fn test_resize_is_idempotent() {
    let model = update(create_test_model(), Message::GoTo(9));
    let first = update(model, Message::Resize(120, 30));
    let view = first.view.clone();
    let second = update(first, Message::Resize(120, 30));
    assert_eq!(second.view, view);
}

#[test]
fn test_zoom_messages() {
    let model = update(create_test_model(), Message::ZoomIn);
    assert!(model.zoom.is_zoomed());
    let model = update(model, Message::ZoomIn);
    assert!(model.zoom.is_zoomed());
    let model = update(model, Message::ZoomOut);
    assert!(!model.zoom.is_zoomed());
    let model = update(model, Message::ToggleZoom);
    assert!(model.zoom.is_zoomed());
    let model = update(model, Message::ToggleZoom);
    assert!(!model.zoom.is_zoomed());
}

#[test]
fn test_navigation_while_zoomed_keeps_overlay() {
    let model = update(create_test_model(), Message::ZoomIn);
    let model = update(model, Message::Next);
    assert!(model.zoom.is_zoomed());
    assert_eq!(model.current_index(), 1);
}

#[test]
fn test_help_toggle_and_hide() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
}

#[test]
fn test_effect_messages_do_not_change_state() {
    let model = update(create_test_model(), Message::GoTo(3));
    let view = model.view.clone();
    let model = update(model, Message::CopyPath);
    let model = update(model, Message::OpenExternal);
    let model = update(model, Message::Redraw);
    assert_eq!(model.view, view);
    assert!(!model.should_quit);
}

#[test]
fn test_quit_sets_flag() {
    let model = update(create_test_model(), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_title_survives_navigation() {
    let gallery = Gallery::new(names(3))
        .unwrap()
        .with_title(Some("Holiday".into()));
    let model = Model::new(gallery, (80, 24));
    assert_eq!(model.view.title.as_deref(), Some("Holiday"));

    let model = update(model, Message::Next);
    assert_eq!(model.view.title, None);
    assert_eq!(model.title.as_deref(), Some("Holiday"));
}

#[test]
fn test_caption_follows_focus() {
    let gallery = Gallery::new(names(3))
        .unwrap()
        .with_captions(HashMap::from([(
            "img01.png".to_string(),
            "Second".to_string(),
        )]))
        .with_default_caption(Some("Untitled".into()));
    let model = Model::new(gallery, (80, 24));
    assert_eq!(model.view.caption, Caption::Text("Untitled".into()));

    let model = update(model, Message::Next);
    assert_eq!(model.view.caption, Caption::Text("Second".into()));
}

#[test]
fn test_focused_path_is_under_root() {
    let gallery = Gallery::new(names(2))
        .unwrap()
        .with_root("/pics".into());
    let model = update(Model::new(gallery, (80, 24)), Message::Next);
    assert_eq!(model.focused_path(), std::path::PathBuf::from("/pics/img01.png"));
}

#[test]
fn test_key_mapping() {
    let model = create_test_model();
    assert_eq!(App::handle_key(key(KeyCode::Right), &model), Some(Message::Next));
    assert_eq!(App::handle_key(key(KeyCode::Char('h')), &model), Some(Message::Prev));
    assert_eq!(
        App::handle_key(key(KeyCode::PageDown), &model),
        Some(Message::SkipForward)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('[')), &model),
        Some(Message::SkipBack)
    );
    assert_eq!(App::handle_key(key(KeyCode::Home), &model), Some(Message::First));
    assert_eq!(App::handle_key(key(KeyCode::End), &model), Some(Message::Last));
    assert_eq!(App::handle_key(key(KeyCode::Char('5')), &model), Some(Message::GoTo(4)));
    assert_eq!(App::handle_key(key(KeyCode::Enter), &model), Some(Message::ToggleZoom));
    assert_eq!(App::handle_key(key(KeyCode::Char('y')), &model), Some(Message::CopyPath));
    assert_eq!(
        App::handle_key(key(KeyCode::Char('o')), &model),
        Some(Message::OpenExternal)
    );
    assert_eq!(App::handle_key(key(KeyCode::Char('?')), &model), Some(Message::ToggleHelp));
    assert_eq!(App::handle_key(key(KeyCode::Char('q')), &model), Some(Message::Quit));
    assert_eq!(
        App::handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &model
        ),
        Some(Message::Quit)
    );
    assert_eq!(App::handle_key(key(KeyCode::Esc), &model), None);
}

#[test]
fn test_escape_closes_zoom() {
    let model = update(create_test_model(), Message::ZoomIn);
    assert_eq!(App::handle_key(key(KeyCode::Esc), &model), Some(Message::ZoomOut));
    assert_eq!(App::handle_key(key(KeyCode::Char('z')), &model), Some(Message::ToggleZoom));
}

#[test]
fn test_any_key_hides_help() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert_eq!(App::handle_key(key(KeyCode::Right), &model), Some(Message::HideHelp));
}

#[test]
fn test_click_on_thumbnail_focuses_it() {
    let model = create_test_model();
    let layout = model.layout();
    let cells = crate::ui::thumbnail_cells(layout.thumbnails, model.view.thumbnails.len());
    let cell = cells[3];
    let msg = App::handle_mouse(click(cell.x + cell.width / 2, cell.y + 1), &model);
    assert_eq!(msg, Some(Message::ThumbnailClick(3)));

    let model = update(model, msg.unwrap());
    assert_eq!(model.current_index(), 3);
}

#[test]
fn test_click_on_arrow_gutters() {
    let model = create_test_model();
    let layout = model.layout();
    let next = App::handle_mouse(click(layout.next_gutter.x, layout.next_gutter.y), &model);
    assert_eq!(next, Some(Message::SkipForward));
    // no prev control at the start
    let prev = App::handle_mouse(click(layout.prev_gutter.x, layout.prev_gutter.y), &model);
    assert_eq!(prev, None);

    let model = update(model, Message::GoTo(10));
    let prev = App::handle_mouse(click(layout.prev_gutter.x, layout.prev_gutter.y), &model);
    assert_eq!(prev, Some(Message::SkipBack));
}

#[test]
fn test_click_on_focus_image_zooms_and_any_click_closes() {
    let model = create_test_model();
    let focus = model.layout().focus;
    let msg = App::handle_mouse(click(focus.x + 1, focus.y + 1), &model);
    assert_eq!(msg, Some(Message::ZoomIn));

    let model = update(model, Message::ZoomIn);
    let strip = model.layout().thumbnails;
    assert_eq!(
        App::handle_mouse(click(strip.x + 1, strip.y + 1), &model),
        Some(Message::ZoomOut)
    );
}

#[test]
fn test_mouse_wheel_steps() {
    let model = create_test_model();
    let wheel = |kind| MouseEvent {
        kind,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        App::handle_mouse(wheel(MouseEventKind::ScrollDown), &model),
        Some(Message::Next)
    );
    assert_eq!(
        App::handle_mouse(wheel(MouseEventKind::ScrollUp), &model),
        Some(Message::Prev)
    );
    assert_eq!(App::handle_mouse(wheel(MouseEventKind::Moved), &model), None);
}

#[test]
fn test_resize_debouncer_waits_and_keeps_last_size() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue((100, 30), 0);
    debouncer.queue((120, 40), 50);
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.take_ready(100), None);
    assert_eq!(debouncer.take_ready(150), Some((120, 40)));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_toast_expires() {
    let mut model = create_test_model();
    model.show_toast(ToastLevel::Info, "Copied");
    assert_eq!(model.active_toast(), Some(("Copied", ToastLevel::Info)));
    assert!(!model.expire_toast(Instant::now()));
    assert!(model.expire_toast(Instant::now() + Duration::from_secs(5)));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_toast_reserves_layout_row() {
    let mut model = create_test_model();
    let before = model.layout();
    model.show_toast(ToastLevel::Warning, "Slow disk");
    let after = model.layout();
    assert!(after.toast.is_some());
    assert_eq!(after.focus.height + 1, before.focus.height);
}

#[test]
fn test_record_preload_counts_events() {
    let mut model = create_test_model();
    model.record_preload(&PreloadEvent::Loaded { index: 0 });
    model.record_preload(&PreloadEvent::Failed {
        index: 1,
        error: "bad".into(),
    });
    assert_eq!(
        model.preload,
        Some(PreloadProgress {
            total: 20,
            loaded: 1,
            failed: 1,
            finished: false,
        })
    );
    assert!(model.image_failed(1));

    model.record_preload(&PreloadEvent::Finished {
        loaded: 19,
        failed: 1,
    });
    assert!(model.preload.is_some_and(|p| p.finished && p.loaded == 19));
}

#[test]
fn test_load_visible_images_builds_protocols_for_window() {
    let dir = tempdir().unwrap();
    let ids = names(8);
    for id in &ids {
        write_png(dir.path(), id);
    }
    let gallery = Gallery::new(ids)
        .unwrap()
        .with_root(dir.path().to_path_buf())
        .with_thumbnail_size(32);
    let mut model = Model::new(gallery, (80, 24)).with_picker(Some(Picker::halfblocks()));

    model.load_visible_images();
    assert_eq!(model.thumbnail_protocols.len(), model.window().capacity);
    assert_eq!(model.focus_image.as_ref().map(|f| f.index), Some(0));

    let mut model = update(model, Message::Last);
    model.load_visible_images();
    let range = model.window().range();
    assert!(model.thumbnail_protocols.keys().all(|i| range.contains(i)));
    assert_eq!(model.focus_image.as_ref().map(|f| f.index), Some(7));
}

#[test]
fn test_missing_focus_image_shows_error_toast_once() {
    let dir = tempdir().unwrap();
    let gallery = Gallery::new(names(2))
        .unwrap()
        .with_root(dir.path().to_path_buf());
    let mut model = Model::new(gallery, (80, 24)).with_picker(Some(Picker::halfblocks()));

    model.load_visible_images();
    assert!(model.focus_image.is_none());
    assert!(model.image_failed(0));
    assert!(matches!(model.active_toast(), Some((_, ToastLevel::Error))));

    assert!(model.expire_toast(Instant::now() + Duration::from_secs(5)));
    model.load_visible_images();
    assert!(model.active_toast().is_none());
}

#[test]
fn test_preload_failure_on_focus_shows_error_toast() {
    let mut model = create_test_model();
    model.record_preload(&PreloadEvent::Failed {
        index: 3,
        error: "truncated".into(),
    });
    assert!(model.active_toast().is_none());

    model.record_preload(&PreloadEvent::Failed {
        index: 0,
        error: "truncated".into(),
    });
    assert_eq!(
        model.active_toast(),
        Some(("Cannot load img00.png: truncated", ToastLevel::Error))
    );
}

#[test]
fn test_navigating_to_failed_image_toasts_when_drawn() {
    let dir = tempdir().unwrap();
    let gallery = Gallery::new(names(8))
        .unwrap()
        .with_root(dir.path().to_path_buf());
    let mut model = Model::new(gallery, (80, 24)).with_picker(Some(Picker::halfblocks()));
    model.record_preload(&PreloadEvent::Failed {
        index: 6,
        error: "bad".into(),
    });
    assert!(model.active_toast().is_none());

    let mut model = update(model, Message::GoTo(6));
    model.load_visible_images();
    assert_eq!(
        model.active_toast(),
        Some(("Cannot load img06.png: bad", ToastLevel::Error))
    );
}

#[test]
fn test_loader_fit_follows_terminal_size() {
    let model = create_test_model();
    assert_eq!(model.decode_fit(), (800, 480));
    assert_eq!(model.loader().fit(), Some((800, 480)));

    let model = update(model, Message::Resize(120, 40));
    assert_eq!(model.loader().fit(), Some((1200, 800)));
}

#[test]
fn test_cache_keeps_fitted_copy_of_large_image() {
    let dir = tempdir().unwrap();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(4000, 3000, Rgba([9, 9, 9, 255])))
        .save(dir.path().join("img00.png"))
        .unwrap();
    let gallery = Gallery::new(names(1))
        .unwrap()
        .with_root(dir.path().to_path_buf());
    let mut model = Model::new(gallery, (80, 24)).with_picker(Some(Picker::halfblocks()));

    model.load_visible_images();
    let cached = model
        .loader()
        .cache()
        .get(&dir.path().join("img00.png"))
        .unwrap();
    assert_eq!((cached.width(), cached.height()), (640, 480));
    assert_eq!(model.loader().cache().bytes(), 640 * 480 * 4);
}

#[test]
fn test_images_disabled_skips_loading() {
    let dir = tempdir().unwrap();
    write_png(dir.path(), "img00.png");
    let gallery = Gallery::new(names(1))
        .unwrap()
        .with_root(dir.path().to_path_buf());
    let mut model = Model::new(gallery, (80, 24)).with_picker(Some(Picker::halfblocks()));
    model.images_enabled = false;

    model.load_visible_images();
    assert!(model.thumbnail_protocols.is_empty());
    assert!(model.focus_image.is_none());
}
