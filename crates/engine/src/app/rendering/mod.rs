mod font;
mod renderer;
mod surface;

pub use renderer::{PixelFrame, Renderer};
pub use surface::{
    BlitOptions, DrawCommand, RecordingSurface, RenderSurface, Rgba, TextAlign, TextStyle,
};
