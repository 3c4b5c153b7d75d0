//! Sprite decoding and half-block rendering

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Alpha below this renders as terminal background.
const ALPHA_CUTOFF: u8 = 128;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, 4 bytes per pixel.
    pub rgba: Vec<u8>,
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, String> {
    let image = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let rgba = image.to_rgba8();
    Ok(SpriteData {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// Render a sprite into text, two pixel rows per terminal row using the
/// upper-half-block glyph. The sprite is downscaled to fit the cell box.
pub fn sprite_text(sprite: &SpriteData, max_cols: u16, max_rows: u16) -> Text<'static> {
    let Some(image) =
        image::RgbaImage::from_raw(sprite.width, sprite.height, sprite.rgba.clone())
    else {
        return Text::default();
    };
    let image = fit_image(image, max_cols.max(1) as u32, max_rows.max(1) as u32 * 2);
    let (width, height) = image.dimensions();

    let mut lines = Vec::with_capacity(height.div_ceil(2) as usize);
    for y in (0..height).step_by(2) {
        let mut spans = Vec::with_capacity(width as usize);
        for x in 0..width {
            let top = cell_color(&image, x, y);
            let bottom = if y + 1 < height {
                cell_color(&image, x, y + 1)
            } else {
                None
            };
            spans.push(match (top, bottom) {
                (Some(top), Some(bottom)) => {
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                }
                (Some(top), None) => Span::styled("▀", Style::default().fg(top)),
                (None, Some(bottom)) => Span::styled("▄", Style::default().fg(bottom)),
                (None, None) => Span::raw(" "),
            });
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

fn fit_image(image: image::RgbaImage, max_w: u32, max_h: u32) -> image::RgbaImage {
    let (width, height) = image.dimensions();
    if width <= max_w && height <= max_h {
        return image;
    }
    let scale = (max_w as f32 / width as f32).min(max_h as f32 / height as f32);
    let new_w = ((width as f32 * scale) as u32).max(1);
    let new_h = ((height as f32 * scale) as u32).max(1);
    image::imageops::resize(&image, new_w, new_h, image::imageops::FilterType::Nearest)
}

fn cell_color(image: &image::RgbaImage, x: u32, y: u32) -> Option<Color> {
    let pixel = image.get_pixel(x, y);
    if pixel[3] < ALPHA_CUTOFF {
        return None;
    }
    Some(Color::Rgb(pixel[0], pixel[1], pixel[2]))
}
