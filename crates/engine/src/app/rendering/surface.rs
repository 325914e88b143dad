use crate::app::{ImageHandle, ScreenRect, Viewport};

pub type Rgba = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitOptions {
    pub mirror_x: bool,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub align: TextAlign,
    pub color: Rgba,
}

impl Default for BlitOptions {
    fn default() -> Self {
        Self {
            mirror_x: false,
            opacity: 1.0,
        }
    }
}

/// Pixel-space drawing target. Text is anchored at its bottom edge; `x` is the left
/// edge for [`TextAlign::Left`] and the right edge for [`TextAlign::Right`].
pub trait RenderSurface {
    fn size(&self) -> Viewport;
    fn clear_rect(&mut self, rect: ScreenRect);
    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba);
    fn fill_vertical_gradient(&mut self, rect: ScreenRect, top: Rgba, bottom: Rgba);
    /// Draws `source` (image pixels) of `image` into `dest`. Images that are not loaded
    /// draw nothing.
    fn draw_image_region(
        &mut self,
        image: &ImageHandle,
        source: ScreenRect,
        dest: ScreenRect,
        options: BlitOptions,
    );
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(ScreenRect),
    FillRect {
        rect: ScreenRect,
        color: Rgba,
    },
    Gradient {
        rect: ScreenRect,
        top: Rgba,
        bottom: Rgba,
    },
    Image {
        key: String,
        source: ScreenRect,
        dest: ScreenRect,
        options: BlitOptions,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
}

/// Headless surface that records draw calls in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> Viewport {
        self.viewport
    }

    fn clear_rect(&mut self, rect: ScreenRect) {
        self.commands.push(DrawCommand::Clear(rect));
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_vertical_gradient(&mut self, rect: ScreenRect, top: Rgba, bottom: Rgba) {
        self.commands
            .push(DrawCommand::Gradient { rect, top, bottom });
    }

    fn draw_image_region(
        &mut self,
        image: &ImageHandle,
        source: ScreenRect,
        dest: ScreenRect,
        options: BlitOptions,
    ) {
        if !image.is_ready() {
            return;
        }
        self.commands.push(DrawCommand::Image {
            key: image.key().to_string(),
            source,
            dest,
            options,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }
}
