use pixels::{Pixels, SurfaceTexture};
use winit::window::Window;

use crate::grid::Grid;
use crate::layout::{GridLayout, READOUT_HEIGHT};

const BACKGROUND: [u8; 4] = [32, 32, 32, 255];
const READOUT_BACKGROUND: [u8; 4] = [16, 16, 16, 255];
const DOT_COLOR: [u8; 4] = [110, 110, 110, 255];
const DOT_SELECTED_COLOR: [u8; 4] = [235, 235, 235, 255];
const LINE_COLOR: [u8; 4] = [200, 200, 200, 255];
const TEXT_COLOR: [u8; 3] = [200, 200, 200];
const TEXT_COPIED_COLOR: [u8; 3] = [120, 220, 120];
const LINE_THICKNESS: u32 = 4;
const READOUT_FONT_SCALE: f32 = 1.4;

/// How one dot is currently drawn. `pulse` is the selection flash
/// intensity in [0, 1], zero when the animation is off or decayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotStyle {
    pub selected: bool,
    pub pulse: f32,
}

/// Owns the fixed-resolution framebuffer and the persistent line layer.
///
/// The buffer resolution never changes; window resizes only rescale the
/// presented surface, which keeps pattern geometry independent of the
/// window size.
pub struct GraphicsRenderer {
    pixels: Pixels,
    width: u32,
    height: u32,
    line_layer: Vec<u8>,
}

impl GraphicsRenderer {
    pub fn new(window: &Window, width: u32, height: u32) -> Result<Self, pixels::Error> {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, window);
        let pixels = Pixels::new(width, height, surface_texture)?;

        Ok(Self {
            pixels,
            width,
            height,
            line_layer: vec![0; (width * height * 4) as usize],
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Err(err) = self.pixels.resize_surface(width, height) {
            log::error!("Failed to resize surface: {}", err);
        }
    }

    /// Maps a window-space cursor position into the fixed surface
    /// coordinates, clamping positions outside the scaled buffer.
    pub fn window_to_surface(&self, x: f32, y: f32) -> (f32, f32) {
        let pos = self
            .pixels
            .window_pos_to_pixel((x, y))
            .unwrap_or_else(|out| self.pixels.clamp_pixel_pos(out));
        (pos.0 as f32, pos.1 as f32)
    }

    /// True when the surface point falls in the readout band.
    pub fn in_readout_band(&self, _x: f32, y: f32) -> bool {
        y >= (self.height - READOUT_HEIGHT) as f32
    }

    /// Wipes the persistent line layer. Part of the clean-slate transition
    /// when a new gesture starts or the grid is rebuilt.
    pub fn clear_lines(&mut self) {
        self.line_layer.fill(0);
    }

    /// Rasterizes one thick segment between two dot centers into the
    /// persistent layer. Called once per newly selected cell; the layer
    /// accumulates, nothing is ever redrawn from scratch.
    pub fn draw_segment(&mut self, from: (f32, f32), to: (f32, f32)) {
        let (mut x0, mut y0) = (from.0 as i32, from.1 as i32);
        let (x1, y1) = (to.0 as i32, to.1 as i32);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = (LINE_THICKNESS / 2) as i32;

        loop {
            for oy in -half..=half {
                for ox in -half..=half {
                    Self::put_pixel(
                        &mut self.line_layer,
                        x0 + ox,
                        y0 + oy,
                        LINE_COLOR,
                        self.width,
                        self.height,
                    );
                }
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Redraws the full frame from state: background, dots, the line
    /// layer, and the readout band.
    pub fn render(
        &mut self,
        grid: &Grid,
        layout: &GridLayout,
        styles: &[DotStyle],
        readout_text: &str,
        copied: bool,
    ) {
        let width = self.width;
        let height = self.height;
        let dot_radius = layout.dot_radius();
        let frame = self.pixels.frame_mut();

        for pixel in frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&BACKGROUND);
        }

        for (pos, &cell) in grid.cells().iter().enumerate() {
            let style = styles.get(pos).copied().unwrap_or_default();
            let (cx, cy) = layout.dot_center(grid, cell);
            let (radius, color) = if style.selected {
                (dot_radius * 1.25, pulse_color(DOT_SELECTED_COLOR, style.pulse))
            } else {
                (dot_radius, DOT_COLOR)
            };
            Self::draw_circle(frame, cx, cy, radius, color, width, height);
        }

        // Composite the persistent segments over the dots.
        for (i, pixel) in frame.chunks_exact_mut(4).enumerate() {
            let src = &self.line_layer[i * 4..i * 4 + 4];
            if src[3] > 0 {
                pixel.copy_from_slice(src);
            }
        }

        Self::draw_readout(frame, width, height, readout_text, copied);
    }

    pub fn present(&mut self) -> Result<(), pixels::Error> {
        self.pixels.render()
    }

    fn draw_readout(frame: &mut [u8], width: u32, height: u32, text: &str, copied: bool) {
        let band_top = height - READOUT_HEIGHT;
        for y in band_top..height {
            for x in 0..width {
                let idx = ((y * width + x) * 4) as usize;
                if idx + 3 < frame.len() {
                    frame[idx..idx + 4].copy_from_slice(&READOUT_BACKGROUND);
                }
            }
        }

        if text.is_empty() {
            return;
        }
        let shown = if copied {
            format!("{}  copied", text)
        } else {
            text.to_string()
        };
        let color = if copied { TEXT_COPIED_COLOR } else { TEXT_COLOR };
        let text_width = crate::font::text_width(&shown, READOUT_FONT_SCALE) as u32;
        let x = width.saturating_sub(text_width) / 2;
        let baseline = band_top + READOUT_HEIGHT / 2 + 8;
        crate::font::draw_text(
            frame,
            &shown,
            x as usize,
            baseline as usize,
            color,
            width as usize,
            READOUT_FONT_SCALE,
        );
    }

    fn draw_circle(
        frame: &mut [u8],
        center_x: f32,
        center_y: f32,
        radius: f32,
        color: [u8; 4],
        width: u32,
        height: u32,
    ) {
        let r = radius.ceil() as i32;
        let r_sq = radius * radius;
        let (cx, cy) = (center_x as i32, center_y as i32);
        for dy in -r..=r {
            for dx in -r..=r {
                if (dx * dx + dy * dy) as f32 <= r_sq {
                    Self::put_pixel(frame, cx + dx, cy + dy, color, width, height);
                }
            }
        }
    }

    fn put_pixel(frame: &mut [u8], x: i32, y: i32, color: [u8; 4], width: u32, height: u32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= width || y >= height {
            return;
        }
        let idx = ((y * width + x) * 4) as usize;
        if idx + 3 < frame.len() {
            frame[idx..idx + 4].copy_from_slice(&color);
        }
    }
}

/// Brightens toward white as the selection flash decays from 1 to 0.
fn pulse_color(base: [u8; 4], pulse: f32) -> [u8; 4] {
    if pulse <= 0.0 {
        return base;
    }
    let t = pulse.clamp(0.0, 1.0);
    let mut out = base;
    for channel in &mut out[..3] {
        let boosted = *channel as f32 + (255.0 - *channel as f32) * t;
        *channel = boosted as u8;
    }
    out
}
