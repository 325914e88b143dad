use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::AppPaths;

use super::input::KeyStates;
use super::metrics::MetricsAccumulator;
use super::{ImageLoader, InputSnapshot, KeyboardKey, Renderer, Scene};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub max_frame_delta: Duration,
    pub max_substep: Duration,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Pokemario".to_string(),
            window_width: 1280,
            window_height: 720,
            max_frame_delta: Duration::from_millis(250),
            max_substep: Duration::from_millis(50),
            metrics_log_interval: Duration::from_secs(5),
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Opens the window and drives `scene` until the window closes or Escape is pressed.
pub fn run_app(
    config: LoopConfig,
    paths: &AppPaths,
    mut scene: Box<dyn Scene>,
) -> Result<(), AppError> {
    info!(
        root = %paths.root.display(),
        assets_dir = %paths.assets_dir.display(),
        "startup"
    );

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_substep = normalize_non_zero_duration(config.max_substep, Duration::from_millis(50));
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(5));
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);

    let mut assets = ImageLoader::new(paths.assets_dir.clone());
    scene.load(&mut assets);
    info!(
        viewport_width = renderer.viewport().width,
        viewport_height = renderer.viewport().height,
        images = assets.cached_count(),
        "scene_loaded"
    );
    info!(
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_substep_ms = max_substep.as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = last_frame_instant;
    let mut metrics = MetricsAccumulator::new(metrics_log_interval, last_frame_instant);
    let mut last_applied_title: Option<String> = None;
    let window_for_loop = Arc::clone(&window);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window_for_loop.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::Focused(false) => {
                        input_collector.release_all();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.handle_keyboard_input(&event);
                        if input_collector.quit_requested {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        let frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                        let was_clamped = frame_dt < raw_frame_dt;
                        if was_clamped {
                            debug!(
                                raw_ms = raw_frame_dt.as_millis() as u64,
                                dropped_ms = (raw_frame_dt - frame_dt).as_millis() as u64,
                                "frame_delta_clamped"
                            );
                        }

                        let plan = plan_substeps(frame_dt, max_substep);
                        let snapshot = input_collector.snapshot();
                        let viewport = renderer.viewport();
                        for _ in 0..plan.count {
                            scene.tick(plan.step_ms, &snapshot, viewport);
                        }
                        scene.end_frame(duration_ms(raw_frame_dt));

                        let elapsed_since_last_present =
                            Instant::now().saturating_duration_since(last_present_instant);
                        let cap_sleep =
                            compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                        if cap_sleep > Duration::ZERO {
                            thread::sleep(cap_sleep);
                        }

                        if let Err(error) = renderer.render_scene(scene.as_ref()) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                        last_present_instant = Instant::now();

                        let next_title = scene.debug_title();
                        if next_title != last_applied_title {
                            window_for_loop
                                .set_title(next_title.as_deref().unwrap_or(&config.window_title));
                            last_applied_title = next_title;
                        }

                        metrics.record_frame(raw_frame_dt, plan.count, was_clamped);
                        if let Some(snapshot) = metrics.maybe_snapshot(now) {
                            info!(
                                fps = snapshot.fps,
                                frame_time_ms = snapshot.frame_time_ms,
                                max_frame_time_ms = snapshot.max_frame_time_ms,
                                substeps_per_frame = snapshot.substeps_per_frame,
                                clamped_frames = snapshot.clamped_frames,
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                scene.unload();
                input_collector.release_all();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    keys: KeyStates,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        if matches!(key, PhysicalKey::Code(KeyCode::Escape)) {
            if is_pressed {
                self.quit_requested = true;
            }
            return;
        }
        if let Some(mapped) = map_physical_key(key) {
            self.keys.set(mapped, is_pressed);
        }
    }

    fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::new(self.keys)
    }

    fn release_all(&mut self) {
        self.keys.release_all();
    }
}

fn map_physical_key(key: PhysicalKey) -> Option<KeyboardKey> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::ArrowUp | KeyCode::KeyW | KeyCode::Space => Some(KeyboardKey::Up),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(KeyboardKey::Left),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(KeyboardKey::Right),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(KeyboardKey::Shift),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SubstepPlan {
    count: u32,
    step_ms: f32,
}

/// Splits one frame into equal slices no longer than `max_substep`.
fn plan_substeps(frame_dt: Duration, max_substep: Duration) -> SubstepPlan {
    if frame_dt.is_zero() || max_substep.is_zero() {
        return SubstepPlan {
            count: 0,
            step_ms: 0.0,
        };
    }
    let frame_ms = frame_dt.as_secs_f64() * 1000.0;
    let max_ms = max_substep.as_secs_f64() * 1000.0;
    let count = (frame_ms / max_ms).ceil().max(1.0) as u32;
    SubstepPlan {
        count,
        step_ms: (frame_ms / count as f64) as f32,
    }
}

fn duration_ms(duration: Duration) -> f32 {
    (duration.as_secs_f64() * 1000.0) as f32
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}
