use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;

use super::style;

/// Status line text: position, file name, window, zoom and preload state.
pub fn status_text(model: &Model) -> String {
    let window = model.window();
    let mut status = format!(
        " {}/{}  {}  [{}-{}]",
        model.view.focus_index + 1,
        model.gallery.len(),
        model.view.focus_id,
        window.window_start + 1,
        window.window_start + window.capacity,
    );
    if model.zoom.is_zoomed() {
        status.push_str(" [zoom]");
    }
    if let Some(progress) = model.preload
        && !progress.finished
    {
        status.push_str(&format!(
            " [preload {}/{}]",
            progress.loaded + progress.failed,
            progress.total
        ));
    }
    status.push_str("  ?:help");
    status
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let status_bar = Paragraph::new(status_text(model)).style(style::status_style());
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = style::toast_style(level);
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
