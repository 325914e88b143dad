use super::rendering::RenderSurface;
use super::{ImageLoader, InputSnapshot, Viewport};

/// Top-level simulation driven by the frame loop: one `tick` per substep, then one
/// `render` per frame.
pub trait Scene {
    fn load(&mut self, assets: &mut ImageLoader);
    fn tick(&mut self, delta_ms: f32, input: &InputSnapshot, viewport: Viewport);
    /// Called once per displayed frame after its substeps, with the wall-clock frame
    /// time before clamping or splitting.
    fn end_frame(&mut self, _frame_ms: f32) {}
    fn render(&self, surface: &mut dyn RenderSurface);
    /// Releases scene resources. Called once when the loop exits.
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
}
