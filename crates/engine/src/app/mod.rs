mod assets;
mod camera;
mod frame_stats;
mod input;
mod loop_runner;
mod math;
mod metrics;
mod renderable;
mod rendering;
mod scene;
mod transition;

pub use assets::{ImageHandle, ImageLoader, LoadedImage};
pub use camera::{Camera, CameraError, Viewport, DEFAULT_FOLLOW_OFFSET, DEFAULT_WORLD_TO_PIXEL};
pub use frame_stats::{FpsSampler, FPS_SAMPLE_CAPACITY};
pub use input::{InputSnapshot, KeyboardKey};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use math::{ScreenRect, Size, Vec2};
pub use metrics::LoopMetricsSnapshot;
pub use renderable::{GroupMember, Renderable, RenderableGroup};
pub use rendering::{
    BlitOptions, DrawCommand, PixelFrame, RecordingSurface, RenderSurface, Renderer, Rgba,
    TextAlign, TextStyle,
};
pub use scene::Scene;
pub use transition::{apply_transition, Easing, Interpolate, Transition, TransitionCurve};
