use ratatui::prelude::*;
use ratatui_image::protocol::{StatefulProtocol, StatefulProtocolType};
use ratatui_image::{Resize, StatefulImage};

use crate::image::{ColorDepth, nearest_index};

/// Draw `protocol` scaled into `area`, centered on both axes.
pub fn render_protocol_centered(protocol: &mut StatefulProtocol, frame: &mut Frame, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let fitted = protocol.size_for(resize_for(protocol), area);
    let width = fitted.width.clamp(1, area.width);
    let height = fitted.height.clamp(1, area.height);
    let target = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let halfblocks = is_halfblocks(protocol);
    let image_widget = StatefulImage::default().resize(resize_for(protocol));
    image_widget.render(target, frame.buffer_mut(), protocol);

    if halfblocks && !ColorDepth::detect().is_truecolor() {
        downgrade_to_indexed(frame.buffer_mut(), target);
    }
}

fn resize_for(protocol: &StatefulProtocol) -> Resize {
    if is_halfblocks(protocol) {
        // Nearest-neighbor causes strong color aliasing artifacts in half-cell mode.
        Resize::Scale(Some(image::imageops::FilterType::CatmullRom))
    } else {
        Resize::Scale(None)
    }
}

fn is_halfblocks(protocol: &StatefulProtocol) -> bool {
    matches!(protocol.protocol_type(), StatefulProtocolType::Halfblocks(_))
}

fn downgrade_to_indexed(buf: &mut Buffer, area: Rect) {
    let area = area.intersection(buf.area);
    for row in area.top()..area.bottom() {
        for col in area.left()..area.right() {
            let cell = &mut buf[(col, row)];
            if let Color::Rgb(r, g, b) = cell.fg {
                cell.fg = Color::Indexed(nearest_index([r, g, b]));
            }
            if let Color::Rgb(r, g, b) = cell.bg {
                cell.bg = Color::Indexed(nearest_index([r, g, b]));
            }
        }
    }
}
