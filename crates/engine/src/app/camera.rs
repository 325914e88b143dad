use thiserror::Error;

use super::{ScreenRect, Size, Vec2};

pub const DEFAULT_WORLD_TO_PIXEL: f32 = 10.0;
pub const DEFAULT_FOLLOW_OFFSET: Vec2 = Vec2 { x: 20.0, y: 1.0 };

/// Canvas size in physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CameraError {
    #[error("world_to_pixel must be a positive finite scale, got {0}")]
    InvalidScale(f32),
    #[error("camera viewport must be positive, got {width}x{height} world units")]
    InvalidViewport { width: f32, height: f32 },
}

/// World-space viewport. `position` is the bottom-left corner of the visible area;
/// world Y grows upward while screen Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    world_to_pixel: f32,
    pub locked: bool,
    pub follow_offset: Vec2,
    pub level_bounds: Vec2,
}

impl Camera {
    pub fn new(world_to_pixel: f32, width: f32, height: f32) -> Result<Self, CameraError> {
        if !(world_to_pixel.is_finite() && world_to_pixel > 0.0) {
            return Err(CameraError::InvalidScale(world_to_pixel));
        }
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(CameraError::InvalidViewport { width, height });
        }
        Ok(Self {
            position: Vec2::ZERO,
            width,
            height,
            world_to_pixel,
            locked: true,
            follow_offset: DEFAULT_FOLLOW_OFFSET,
            level_bounds: Vec2::ZERO,
        })
    }

    pub fn for_viewport(world_to_pixel: f32, viewport: Viewport) -> Result<Self, CameraError> {
        Self::new(
            world_to_pixel,
            viewport.width as f32 / world_to_pixel,
            viewport.height as f32 / world_to_pixel,
        )
    }

    /// Same viewport size and scale, fixed at the world origin.
    pub fn static_copy(&self) -> Camera {
        Camera {
            position: Vec2::ZERO,
            locked: false,
            ..*self
        }
    }

    pub fn world_to_pixel(&self) -> f32 {
        self.world_to_pixel
    }

    /// Resizes the world-space viewport to cover `viewport`. Empty viewports (a minimised
    /// window) keep the previous size.
    pub fn fit_viewport(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.width = viewport.width as f32 / self.world_to_pixel;
        self.height = viewport.height as f32 / self.world_to_pixel;
    }

    /// Keeps `focus` at `follow_offset` from the viewport origin while locked, never
    /// scrolling outside `[0, level_bounds]`.
    pub fn tick(&mut self, _delta_ms: f32, focus: Vec2) {
        if !self.locked {
            return;
        }
        self.position = Vec2 {
            x: (focus.x - self.follow_offset.x).clamp(0.0, self.level_bounds.x.max(0.0)),
            y: (focus.y - self.follow_offset.y).clamp(0.0, self.level_bounds.y.max(0.0)),
        };
    }

    pub fn screen_space_coordinates(&self, position: Vec2) -> Vec2 {
        let camera_x = position.x - self.position.x;
        let camera_y = position.y - self.position.y;
        Vec2 {
            x: camera_x * self.world_to_pixel,
            y: (self.height - camera_y) * self.world_to_pixel,
        }
    }

    pub fn world_coordinates(&self, screen: Vec2) -> Vec2 {
        Vec2 {
            x: screen.x / self.world_to_pixel + self.position.x,
            y: self.height - screen.y / self.world_to_pixel + self.position.y,
        }
    }

    pub fn screen_space_dimensions(&self, width: f32, height: f32) -> Size {
        Size {
            width: width * self.world_to_pixel,
            height: height * self.world_to_pixel,
        }
    }

    pub fn screen_dimensions(&self) -> Size {
        self.screen_space_dimensions(self.width, self.height)
    }

    /// Screen rectangle covering the world box whose bottom-left corner is `position`.
    pub fn get_screen_bounding_box(&self, position: Vec2, width: f32, height: f32) -> ScreenRect {
        let coords = self.screen_space_coordinates(position);
        let size = self.screen_space_dimensions(width, height);
        ScreenRect {
            x: coords.x,
            y: coords.y - size.height,
            width: size.width,
            height: size.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::for_viewport(10.0, Viewport::new(800, 600)).expect("valid camera")
    }

    fn assert_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual.x - expected.x).abs() < 0.001 && (actual.y - expected.y).abs() < 0.001,
            "{actual} vs {expected}"
        );
    }

    #[test]
    fn construction_rejects_bad_scale_and_viewport() {
        assert_eq!(
            Camera::new(0.0, 10.0, 10.0),
            Err(CameraError::InvalidScale(0.0))
        );
        assert!(Camera::new(f32::NAN, 10.0, 10.0).is_err());
        assert!(Camera::new(10.0, 0.0, 10.0).is_err());
        assert!(Camera::new(10.0, 10.0, -1.0).is_err());
    }

    #[test]
    fn world_origin_maps_to_bottom_left_pixel() {
        let camera = camera();
        assert_close(
            camera.screen_space_coordinates(Vec2::ZERO),
            Vec2::new(0.0, 600.0),
        );
        assert_close(
            camera.screen_space_coordinates(Vec2::new(camera.width, camera.height)),
            Vec2::new(800.0, 0.0),
        );
    }

    #[test]
    fn camera_offset_shifts_projection() {
        let mut camera = camera();
        camera.position = Vec2::new(5.0, 2.0);
        assert_close(
            camera.screen_space_coordinates(Vec2::new(7.0, 3.0)),
            Vec2::new(20.0, 590.0),
        );
    }

    #[test]
    fn screen_round_trip_restores_world_position() {
        let mut camera = camera();
        camera.position = Vec2::new(-13.5, 4.25);
        for world in [
            Vec2::ZERO,
            Vec2::new(12.5, -3.0),
            Vec2::new(-100.0, 250.75),
            Vec2::new(0.001, 59.999),
        ] {
            let screen = camera.screen_space_coordinates(world);
            assert_close(camera.world_coordinates(screen), world);
        }
    }

    #[test]
    fn bounding_box_top_left_is_upper_edge_of_world_box() {
        let camera = camera();
        let rect = camera.get_screen_bounding_box(Vec2::new(2.0, 0.0), 6.0, 10.0);
        assert_eq!(rect.x, 20.0);
        assert_eq!(rect.y, 500.0);
        assert_eq!(rect.width, 60.0);
        assert_eq!(rect.height, 100.0);
        assert_eq!(rect.bottom(), 600.0);
    }

    #[test]
    fn locked_camera_follows_with_offset_inside_level_bounds() {
        let mut camera = camera();
        camera.level_bounds = Vec2::new(100.0, 0.0);

        camera.tick(16.0, Vec2::new(50.0, 11.0));
        assert_close(camera.position, Vec2::new(30.0, 0.0));

        camera.tick(16.0, Vec2::new(5.0, 11.0));
        assert_close(camera.position, Vec2::new(0.0, 0.0));

        camera.tick(16.0, Vec2::new(500.0, 11.0));
        assert_close(camera.position, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn unlocked_camera_stays_put() {
        let mut camera = camera();
        camera.level_bounds = Vec2::new(100.0, 100.0);
        camera.locked = false;
        camera.tick(16.0, Vec2::new(50.0, 50.0));
        assert_eq!(camera.position, Vec2::ZERO);
    }

    #[test]
    fn empty_viewport_keeps_previous_extent() {
        let mut camera = camera();
        camera.fit_viewport(Viewport::new(0, 300));
        assert_eq!(camera.width, 80.0);
        assert_eq!(camera.height, 60.0);

        camera.fit_viewport(Viewport::new(400, 300));
        assert_eq!(camera.width, 40.0);
        assert_eq!(camera.height, 30.0);
    }
}
