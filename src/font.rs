//! Readout text rendering using ab_glyph.
//!
//! The font is discovered at runtime: `TRACELOCK_FONT` wins, otherwise a
//! short list of well-known monospace font paths is scanned. Without any
//! font the readout is skipped and everything else keeps working.

use ab_glyph::{Font, FontVec, PxScale};
use std::fs;
use std::sync::OnceLock;

const FONT_PATH_ENV: &str = "TRACELOCK_FONT";
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/Library/Fonts/Andale Mono.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

pub struct FontRenderer {
    font: FontVec,
    base_size: f32,
}

static FONT_RENDERER: OnceLock<Option<FontRenderer>> = OnceLock::new();

impl FontRenderer {
    fn discover() -> Option<Self> {
        let mut candidates: Vec<String> = Vec::new();
        if let Ok(path) = std::env::var(FONT_PATH_ENV) {
            candidates.push(path);
        }
        candidates.extend(FONT_CANDIDATES.iter().map(|p| p.to_string()));

        for path in &candidates {
            if let Ok(data) = fs::read(path) {
                if let Ok(font) = FontVec::try_from_vec(data) {
                    log::debug!("readout font: {}", path);
                    return Some(Self { font, base_size: 14.0 });
                }
            }
        }
        log::warn!("no usable monospace font found, readout text disabled");
        None
    }

    fn units_per_em(&self) -> f32 {
        self.font.units_per_em().unwrap_or(1000.0)
    }

    /// Advance width and line height for one character at `scale`.
    pub fn char_dimensions(&self, scale: f32) -> (usize, usize) {
        let px_scale = PxScale::from(self.base_size * scale);
        let glyph_id = self.font.glyph_id('M');
        let advance = self.font.h_advance_unscaled(glyph_id) * px_scale.x / self.units_per_em();
        let height = self.font.height_unscaled() * px_scale.y / self.units_per_em();
        (advance as usize, height as usize)
    }

    pub fn draw_char(
        &self,
        frame: &mut [u8],
        ch: char,
        x: usize,
        y: usize,
        color: [u8; 3],
        frame_width: usize,
        scale: f32,
    ) {
        let px_scale = PxScale::from(self.base_size * scale);
        let glyph = self.font.glyph_id(ch).with_scale(px_scale);

        if let Some(outlined) = self.font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                if coverage <= 0.0 {
                    return;
                }
                let px = x as i32 + gx as i32 + bounds.min.x as i32;
                let py = y as i32 + gy as i32 + bounds.min.y as i32;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as usize, py as usize);
                if px >= frame_width {
                    return;
                }
                let idx = (py * frame_width + px) * 4;
                if idx + 3 >= frame.len() {
                    return;
                }
                let alpha = (coverage * 255.0) as u16;
                let inv = 255 - alpha;
                frame[idx] = ((frame[idx] as u16 * inv + color[0] as u16 * alpha) / 255) as u8;
                frame[idx + 1] =
                    ((frame[idx + 1] as u16 * inv + color[1] as u16 * alpha) / 255) as u8;
                frame[idx + 2] =
                    ((frame[idx + 2] as u16 * inv + color[2] as u16 * alpha) / 255) as u8;
                frame[idx + 3] = 255;
            });
        }
    }

    pub fn draw_text(
        &self,
        frame: &mut [u8],
        text: &str,
        x: usize,
        y: usize,
        color: [u8; 3],
        frame_width: usize,
        scale: f32,
    ) {
        let (char_width, _) = self.char_dimensions(scale);
        let mut current_x = x;
        for ch in text.chars() {
            if current_x + char_width > frame_width {
                break;
            }
            self.draw_char(frame, ch, current_x, y, color, frame_width, scale);
            current_x += char_width;
        }
    }
}

fn get_font() -> Option<&'static FontRenderer> {
    FONT_RENDERER.get_or_init(FontRenderer::discover).as_ref()
}

/// Pixel width of `text` at `scale`; zero when no font is available.
pub fn text_width(text: &str, scale: f32) -> usize {
    match get_font() {
        Some(font) => font.char_dimensions(scale).0 * text.chars().count(),
        None => 0,
    }
}

pub fn draw_text(
    frame: &mut [u8],
    text: &str,
    x: usize,
    y: usize,
    color: [u8; 3],
    frame_width: usize,
    scale: f32,
) {
    if let Some(font) = get_font() {
        font.draw_text(frame, text, x, y, color, frame_width, scale);
    }
}
