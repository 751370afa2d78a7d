use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::{images, style};

/// Full-screen view of the focused image. Any click closes it.
pub fn render_zoom_overlay(model: &mut Model, frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(style::overlay_style()), area);

    let image_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let footer_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1.min(area.height),
        ..area
    };

    let focus = model.view.focus_index;
    let ready = model
        .focus_image
        .as_ref()
        .is_some_and(|image| image.index == focus);
    if ready && let Some(image) = model.focus_image.as_mut() {
        images::render_protocol_centered(&mut image.protocol, frame, image_area);
    } else {
        let label = super::render::placeholder_label(model, focus, &model.view.focus_id);
        frame.render_widget(
            Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(style::placeholder_style()),
            centered_popup_rect(image_area.width, 1, image_area),
        );
    }

    let footer = Line::styled(
        format!(
            "{}  {}/{}  \u{2502} click, Esc or z closes",
            model.view.focus_id,
            focus + 1,
            model.gallery.len()
        ),
        style::dim_style(),
    );
    frame.render_widget(Paragraph::new(footer).alignment(Alignment::Center), footer_area);
}

pub fn help_popup_rect(area: Rect) -> Rect {
    let popup_width = area.width.saturating_sub(12).clamp(20, 64);
    let popup_height = area.height.saturating_sub(4).clamp(8, 26);
    centered_popup_rect(popup_width, popup_height, area)
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup = help_popup_rect(area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());
    let section = style::section_style();

    let lines = vec![
        Line::styled("Navigation", section),
        Line::raw("  Left/Right, h/l     Previous / next image"),
        Line::raw("  [ / ], PgUp/PgDn    Skip one strip back / forward"),
        Line::raw("  Home/End, g/G       First / last image"),
        Line::raw("  1-9                 Jump to image 1-9"),
        Line::raw("  Mouse wheel         Previous / next image"),
        Line::raw("  Click thumbnail     Focus it"),
        Line::raw("  Click arrow         Skip"),
        Line::raw(""),
        Line::styled("View", section),
        Line::raw("  Enter, z, click     Toggle zoom"),
        Line::raw("  Esc                 Close zoom"),
        Line::raw(""),
        Line::styled("Other", section),
        Line::raw("  y                   Copy image path"),
        Line::raw("  o                   Open in system viewer"),
        Line::raw("  ? / F1              Toggle help"),
        Line::raw("  q / Ctrl-c          Quit"),
        Line::raw(""),
        Line::styled("Config", section),
        Line::raw(format!("  Global: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
    ];

    let block = Block::default()
        .title("Help")
        .title_bottom(Line::styled(" any key closes ", style::dim_style()))
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(style::overlay_style());

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
