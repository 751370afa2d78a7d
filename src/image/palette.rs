//! 256-color fallback for terminals without 24-bit color.
//!
//! Half-block rendering paints every cell with RGB colors. On terminals that
//! only understand the xterm 256-color palette those colors are snapped to
//! the nearest palette entry, either before encoding ([`quantize`]) or after
//! rendering ([`nearest_index`] on each cell).

use image::{DynamicImage, Rgba};

/// Channel values of the xterm 6x6x6 color cube.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
const CUBE_START: u8 = 16;
const GRAY_START: u8 = 232;
const GRAY_STEPS: u8 = 24;

/// Color output the terminal can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    TrueColor,
    Indexed,
}

impl ColorDepth {
    /// Inspect the environment. `SNEKKJA_TRUECOLOR` overrides detection.
    pub fn detect() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self::from_env(
            var("SNEKKJA_TRUECOLOR").as_deref(),
            var("TERM_PROGRAM").as_deref(),
            var("COLORTERM").as_deref(),
            var("TERM").as_deref(),
        )
    }

    fn from_env(
        force: Option<&str>,
        term_program: Option<&str>,
        colorterm: Option<&str>,
        term: Option<&str>,
    ) -> Self {
        if let Some(force) = force {
            let on = matches!(
                force.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
            return if on { Self::TrueColor } else { Self::Indexed };
        }
        if term_program == Some("Apple_Terminal") {
            return Self::Indexed;
        }
        if mentions(colorterm, &["truecolor", "24bit"]) || mentions(term, &["direct", "truecolor"])
        {
            Self::TrueColor
        } else {
            Self::Indexed
        }
    }

    pub const fn is_truecolor(self) -> bool {
        matches!(self, Self::TrueColor)
    }
}

fn mentions(value: Option<&str>, markers: &[&str]) -> bool {
    value.is_some_and(|value| {
        let value = value.to_ascii_lowercase();
        markers.iter().any(|marker| value.contains(marker))
    })
}

/// Closest xterm palette index (16-255) for an RGB color.
///
/// Both the color cube and the gray ramp are considered.
pub fn nearest_index(rgb: [u8; 3]) -> u8 {
    let levels = rgb.map(nearest_level);
    let cube_index = CUBE_START + 36 * levels[0] + 6 * levels[1] + levels[2];
    let cube_rgb = levels.map(|level| CUBE_LEVELS[usize::from(level)]);

    let mean = rgb.iter().map(|&c| u16::from(c)).sum::<u16>() / 3;
    let gray_step = u8::try_from(mean.saturating_sub(3) / 10)
        .unwrap_or(u8::MAX)
        .min(GRAY_STEPS - 1);
    let gray = gray_level(gray_step);

    if distance(rgb, [gray; 3]) < distance(rgb, cube_rgb) {
        GRAY_START + gray_step
    } else {
        cube_index
    }
}

/// RGB value of a palette index. The first 16 entries use plain ANSI levels.
pub fn index_to_rgb(index: u8) -> [u8; 3] {
    match index {
        0..=15 => {
            let level = if index >= 8 { 255 } else { 128 };
            let channel = |bit: u8| if index & bit == 0 { 0 } else { level };
            [channel(1), channel(2), channel(4)]
        }
        GRAY_START.. => [gray_level(index - GRAY_START); 3],
        _ => {
            let cube = index - CUBE_START;
            [cube / 36, (cube / 6) % 6, cube % 6].map(|level| CUBE_LEVELS[usize::from(level)])
        }
    }
}

/// Snap every pixel to the 256-color palette, keeping alpha.
pub fn quantize(image: &DynamicImage) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let [r, g, b] = index_to_rgb(nearest_index([r, g, b]));
        *pixel = Rgba([r, g, b, a]);
    }
    DynamicImage::ImageRgba8(rgba)
}

fn nearest_level(channel: u8) -> u8 {
    (0..6_u8)
        .min_by_key(|&level| CUBE_LEVELS[usize::from(level)].abs_diff(channel))
        .unwrap_or(0)
}

const fn gray_level(step: u8) -> u8 {
    8 + step * 10
}

fn distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(&x, y)| u32::from(x.abs_diff(y)).pow(2))
        .sum()
}
