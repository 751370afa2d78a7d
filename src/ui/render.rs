use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::gallery::Thumbnail;

use super::{GalleryLayout, images, overlays, status, style, thumbnail_cells};

const PREV_ARROW: &str = "\u{25c0}";
const NEXT_ARROW: &str = "\u{25b6}";

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = super::gallery_layout(area, model.layout_options());
    crate::perf::log_event(
        "render.layout",
        format!(
            "area={}x{} focus={:?} strip={:?} cells={}",
            area.width,
            area.height,
            layout.focus,
            layout.thumbnails,
            model.view.thumbnails.len()
        ),
    );

    if let Some(title_area) = layout.title
        && let Some(title) = model.title.as_deref()
    {
        frame.render_widget(
            Paragraph::new(title)
                .alignment(Alignment::Center)
                .style(style::title_style()),
            title_area,
        );
    }

    render_focus(model, frame, layout.focus);

    if let Some(caption_area) = layout.caption
        && let Some(caption) = model.view.caption.text()
    {
        frame.render_widget(
            Paragraph::new(caption)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .style(style::caption_style()),
            caption_area,
        );
    }

    render_strip(model, frame, &layout);

    if let Some(toast_area) = layout.toast {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, layout.status);

    if model.zoom.is_zoomed() {
        overlays::render_zoom_overlay(model, frame, area);
    }
    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_focus(model: &mut Model, frame: &mut Frame, area: Rect) {
    let focus = model.view.focus_index;
    let ready = model
        .focus_image
        .as_ref()
        .is_some_and(|image| image.index == focus);
    if ready && let Some(image) = model.focus_image.as_mut() {
        images::render_protocol_centered(&mut image.protocol, frame, area);
        return;
    }
    let label = placeholder_label(model, focus, &model.view.focus_id);
    frame.render_widget(
        Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(style::placeholder_style()),
        overlays::centered_popup_rect(area.width, 1, area),
    );
}

fn render_strip(model: &mut Model, frame: &mut Frame, layout: &GalleryLayout) {
    if model.view.prev.is_some() {
        render_arrow(frame, layout.prev_gutter, PREV_ARROW);
    }
    if model.view.next.is_some() {
        render_arrow(frame, layout.next_gutter, NEXT_ARROW);
    }

    let cells = thumbnail_cells(layout.thumbnails, model.view.thumbnails.len());
    for (cell, thumb) in cells.into_iter().zip(model.view.thumbnails.clone()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style::thumbnail_border_style(thumb.focused));
        let inner = block.inner(cell);
        frame.render_widget(block, cell);
        render_thumbnail(model, frame, inner, &thumb);
    }
}

fn render_thumbnail(model: &mut Model, frame: &mut Frame, area: Rect, thumb: &Thumbnail) {
    if let Some(protocol) = model.thumbnail_protocols.get_mut(&thumb.index) {
        images::render_protocol_centered(protocol, frame, area);
        return;
    }
    let label = truncate_to_width(&placeholder_label(model, thumb.index, &thumb.id), area.width);
    let style = if thumb.focused {
        style::caption_style().add_modifier(Modifier::BOLD)
    } else {
        style::placeholder_style()
    };
    frame.render_widget(
        Paragraph::new(label).alignment(Alignment::Center).style(style),
        overlays::centered_popup_rect(area.width, 1, area),
    );
}

fn render_arrow(frame: &mut Frame, gutter: Rect, arrow: &str) {
    frame.render_widget(
        Paragraph::new(arrow)
            .alignment(Alignment::Center)
            .style(style::arrow_style()),
        overlays::centered_popup_rect(gutter.width, 1, gutter),
    );
}

/// Text shown where an image is not (or not yet) rendered.
pub fn placeholder_label(model: &Model, index: usize, id: &str) -> String {
    if model.image_failed(index) {
        format!("[unreadable: {id}]")
    } else {
        id.to_string()
    }
}

fn truncate_to_width(text: &str, max_width: u16) -> String {
    let max_width = usize::from(max_width);
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    if max_width > 0 {
        out.push('\u{2026}');
    }
    out
}
