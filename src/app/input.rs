use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, Message, Model};
use crate::ui::point_in_rect;

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue((*w, *h), now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(Message::Quit),
            KeyCode::Char('l') if ctrl => Some(Message::Redraw),

            KeyCode::Right | KeyCode::Char('l' | 'j' | ' ') => Some(Message::Next),
            KeyCode::Left | KeyCode::Char('h' | 'k') | KeyCode::Backspace => Some(Message::Prev),
            KeyCode::PageDown | KeyCode::Char(']') => Some(Message::SkipForward),
            KeyCode::PageUp | KeyCode::Char('[') => Some(Message::SkipBack),
            KeyCode::Home | KeyCode::Char('g') => Some(Message::First),
            KeyCode::End | KeyCode::Char('G') => Some(Message::Last),
            KeyCode::Char(c @ '1'..='9') => {
                // 1-based position in the gallery
                Some(Message::GoTo(i64::from(u32::from(c) - u32::from('1'))))
            }

            KeyCode::Enter | KeyCode::Char('z') => Some(Message::ToggleZoom),
            KeyCode::Esc if model.zoom.is_zoomed() => Some(Message::ZoomOut),

            KeyCode::Char('y') => Some(Message::CopyPath),
            KeyCode::Char('o') => Some(Message::OpenExternal),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q' | 'Q') => Some(Message::Quit),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        let click = matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left));

        if model.help_visible {
            return click.then_some(Message::HideHelp);
        }

        match mouse.kind {
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => return Some(Message::Next),
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => return Some(Message::Prev),
            _ => {}
        }
        if !click {
            return None;
        }
        if model.zoom.is_zoomed() {
            return Some(Message::ZoomOut);
        }

        let (col, row) = (mouse.column, mouse.row);
        let layout = model.layout();

        if point_in_rect(col, row, layout.prev_gutter) {
            return model.view.prev.is_some().then_some(Message::SkipBack);
        }
        if point_in_rect(col, row, layout.next_gutter) {
            return model.view.next.is_some().then_some(Message::SkipForward);
        }
        if point_in_rect(col, row, layout.thumbnails) {
            let cells = crate::ui::thumbnail_cells(layout.thumbnails, model.view.thumbnails.len());
            return cells
                .iter()
                .zip(&model.view.thumbnails)
                .find(|(cell, _)| point_in_rect(col, row, **cell))
                .map(|(_, thumb)| Message::ThumbnailClick(thumb.index));
        }
        if point_in_rect(col, row, layout.focus) {
            return Some(Message::ZoomIn);
        }
        None
    }
}
