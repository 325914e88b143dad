use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{ImageHandle, Scene, ScreenRect, Viewport};

use super::font::{glyph_for, scale_for_height, text_width_px, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::{BlitOptions, RenderSurface, Rgba, TextAlign, TextStyle};

const CLEAR_COLOR: Rgba = [0, 0, 0, 255];

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport::new(size.width, size.height),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport::new(width, height);
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width.max(1), height.max(1), window);
        Pixels::new(width.max(1), height.max(1), surface)
    }

    pub(crate) fn render_scene(&mut self, scene: &dyn Scene) -> Result<(), Error> {
        let Viewport { width, height } = self.viewport;
        {
            let mut frame = PixelFrame::new(self.pixels.frame_mut(), width, height);
            scene.render(&mut frame);
        }
        self.pixels.render()
    }
}

/// Software [`RenderSurface`] over an RGBA8 pixel buffer. All writes are clipped.
pub struct PixelFrame<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> PixelFrame<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    fn clip(&self, rect: ScreenRect) -> Option<PixelSpan> {
        if rect.is_empty() || !(rect.x.is_finite() && rect.y.is_finite()) {
            return None;
        }
        let left = (rect.x.round() as i64).max(0);
        let top = (rect.y.round() as i64).max(0);
        let right = (rect.right().round() as i64).min(self.width as i64);
        let bottom = (rect.bottom().round() as i64).min(self.height as i64);
        if left >= right || top >= bottom {
            return None;
        }
        Some(PixelSpan {
            left: left as u32,
            top: top as u32,
            right: right as u32,
            bottom: bottom as u32,
        })
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba, opacity: f32) {
        let Some(offset) = pixel_offset(self.width, self.height, x, y) else {
            return;
        };
        let Some(dst) = self.frame.get_mut(offset..offset + 4) else {
            return;
        };
        let alpha = (color[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        if alpha >= 1.0 {
            dst[..3].copy_from_slice(&color[..3]);
            dst[3] = 255;
            return;
        }
        for channel in 0..3 {
            let blended = color[channel] as f32 * alpha + dst[channel] as f32 * (1.0 - alpha);
            dst[channel] = blended.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = 255;
    }

    fn draw_glyph(&mut self, left: i64, top: i64, scale: i32, ch: char, color: Rgba) {
        let glyph = glyph_for(ch);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let cell = ScreenRect::new(
                    (left + (col * scale) as i64) as f32,
                    (top + (row as i32 * scale) as i64) as f32,
                    scale as f32,
                    scale as f32,
                );
                self.fill_rect(cell, color);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelSpan {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

impl RenderSurface for PixelFrame<'_> {
    fn size(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    fn clear_rect(&mut self, rect: ScreenRect) {
        let Some(span) = self.clip(rect) else {
            return;
        };
        for y in span.top..span.bottom {
            for x in span.left..span.right {
                if let Some(offset) = pixel_offset(self.width, self.height, x, y) {
                    if let Some(dst) = self.frame.get_mut(offset..offset + 4) {
                        dst.copy_from_slice(&CLEAR_COLOR);
                    }
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba) {
        let Some(span) = self.clip(rect) else {
            return;
        };
        for y in span.top..span.bottom {
            for x in span.left..span.right {
                self.blend_pixel(x, y, color, 1.0);
            }
        }
    }

    fn fill_vertical_gradient(&mut self, rect: ScreenRect, top: Rgba, bottom: Rgba) {
        let Some(span) = self.clip(rect) else {
            return;
        };
        for y in span.top..span.bottom {
            let t = ((y as f32 + 0.5 - rect.y) / rect.height).clamp(0.0, 1.0);
            let color = lerp_rgba(top, bottom, t);
            for x in span.left..span.right {
                self.blend_pixel(x, y, color, 1.0);
            }
        }
    }

    fn draw_image_region(
        &mut self,
        image: &ImageHandle,
        source: ScreenRect,
        dest: ScreenRect,
        options: BlitOptions,
    ) {
        let Some(loaded) = image.image() else {
            return;
        };
        if source.is_empty() || options.opacity <= 0.0 {
            return;
        }
        let Some(span) = self.clip(dest) else {
            return;
        };
        let max_x = loaded.width.saturating_sub(1) as f32;
        let max_y = loaded.height.saturating_sub(1) as f32;

        for y in span.top..span.bottom {
            let v = (y as f32 + 0.5 - dest.y) / dest.height;
            let src_y = (source.y + v * source.height).floor().clamp(0.0, max_y) as u32;
            for x in span.left..span.right {
                let mut u = (x as f32 + 0.5 - dest.x) / dest.width;
                if options.mirror_x {
                    u = 1.0 - u;
                }
                let src_x = (source.x + u * source.width).floor().clamp(0.0, max_x) as u32;
                let Some(offset) = pixel_offset(loaded.width, loaded.height, src_x, src_y) else {
                    continue;
                };
                let Some(texel) = loaded.rgba.get(offset..offset + 4) else {
                    continue;
                };
                if texel[3] == 0 {
                    continue;
                }
                self.blend_pixel(x, y, [texel[0], texel[1], texel[2], texel[3]], options.opacity);
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let scale = scale_for_height(style.size_px);
        let width = text_width_px(text, scale) as i64;
        let left = match style.align {
            TextAlign::Left => x.round() as i64,
            TextAlign::Right => x.round() as i64 - width,
        };
        let top = y.round() as i64 - (GLYPH_HEIGHT * scale) as i64;
        let advance = ((GLYPH_WIDTH + 1) * scale) as i64;
        for (index, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            self.draw_glyph(left + index as i64 * advance, top, scale, ch, style.color);
        }
    }
}

fn pixel_offset(width: u32, height: u32, x: u32, y: u32) -> Option<usize> {
    if x >= width || y >= height {
        return None;
    }
    (y as usize)
        .checked_mul(width as usize)
        .and_then(|row| row.checked_add(x as usize))
        .and_then(|pixel| pixel.checked_mul(4))
}

fn lerp_rgba(from: Rgba, to: Rgba, t: f32) -> Rgba {
    let mut out = [0u8; 4];
    for channel in 0..4 {
        let value = from[channel] as f32 + (to[channel] as f32 - from[channel] as f32) * t;
        out[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}
