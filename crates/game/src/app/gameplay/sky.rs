use engine::{
    apply_transition, BlitOptions, Camera, GroupMember, ImageHandle, RenderSurface, Renderable,
    RenderableGroup, Rgba, ScreenRect, Size, Transition, TransitionCurve, Vec2,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::app::config::LandscapeConfig;

use super::GameView;

const SKY_TOP_COLOR: Rgba = [0x5a, 0xc9, 0xff, 255];
const SKY_BOTTOM_COLOR: Rgba = [255, 255, 255, 255];
const DEFAULT_CLOUD_ASPECT: f32 = 0.6;
const FALLBACK_CLOUD_WIDTH: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CloudSettings {
    pub min_count: u32,
    pub max_count: u32,
    pub widths: Vec<f32>,
    pub fade_in_ms: f32,
    pub wind_speed: f32,
}

impl From<&LandscapeConfig> for CloudSettings {
    fn from(config: &LandscapeConfig) -> Self {
        Self {
            min_count: config.clouds_min.min(config.clouds_max),
            max_count: config.clouds_max,
            widths: config.cloud_widths.clone(),
            fade_in_ms: config.cloud_fade_in_ms,
            wind_speed: config.cloud_wind_speed,
        }
    }
}

/// Folds a layer offset into `[-width, width)`. Two layers one width apart then always
/// cover `[0, width]`, however far a single tick moved them.
pub(crate) fn fold_layer_offset(x: f32, width: f32) -> f32 {
    if width <= 0.0 || !x.is_finite() {
        return x;
    }
    (x + width).rem_euclid(2.0 * width) - width
}

/// Where a sky layer sits this frame; clouds are positioned relative to `origin`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LayerFrame {
    pub camera: Camera,
    pub origin: Vec2,
}

#[derive(Debug, Clone)]
pub(crate) struct Cloud {
    position: Vec2,
    velocity: Vec2,
    width: f32,
    height: f32,
    opacity: Transition<f32>,
    image: ImageHandle,
}

impl Cloud {
    pub(crate) fn new(position: Vec2, width: f32, fade_in_ms: f32, image: ImageHandle) -> Self {
        let mut cloud = Self {
            position,
            velocity: Vec2::ZERO,
            width,
            height: width * DEFAULT_CLOUD_ASPECT,
            opacity: Transition {
                initial: 0.0,
                target: 1.0,
                state: 0.0,
                curve: TransitionCurve::ease_out_quad(fade_in_ms),
            },
            image,
        };
        cloud.refresh_height();
        cloud
    }

    #[cfg(test)]
    pub(crate) fn opacity(&self) -> f32 {
        self.opacity.state
    }

    #[cfg(test)]
    pub(crate) fn width(&self) -> f32 {
        self.width
    }

    fn set_image(&mut self, image: ImageHandle) {
        self.image = image;
        self.refresh_height();
    }

    fn refresh_height(&mut self) {
        if let Some((width, height)) = self.image.dimensions() {
            self.height = Size::new(width as f32, height as f32)
                .fit_width(self.width)
                .height;
        }
    }

    fn overlaps_layer(&self, layer_width: f32) -> bool {
        self.position.x + self.width >= 0.0 && self.position.x <= layer_width
    }
}

impl Renderable<LayerFrame> for Cloud {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn tick(&mut self, delta_ms: f32, _frame: &LayerFrame) {
        self.position += self.velocity * (delta_ms / 1000.0);
        self.opacity.state = apply_transition(&self.opacity, delta_ms);
    }

    fn render(&self, frame: &LayerFrame, surface: &mut dyn RenderSurface) {
        let Some((width, height)) = self.image.dimensions() else {
            return;
        };
        let dest = frame.camera.get_screen_bounding_box(
            frame.origin + self.position,
            self.width,
            self.height,
        );
        surface.draw_image_region(
            &self.image,
            ScreenRect::new(0.0, 0.0, width as f32, height as f32),
            dest,
            BlitOptions {
                mirror_x: false,
                opacity: self.opacity.state,
            },
        );
    }
}

impl GroupMember<LayerFrame> for Cloud {
    fn tick_with_velocity(&mut self, delta_ms: f32, velocity: Vec2, frame: &LayerFrame) {
        self.velocity = velocity;
        self.tick(delta_ms, frame);
    }
}

/// One screen-sized slice of sky with its own clouds. Two of these side by side wrap
/// around each other to form an endless backdrop.
#[derive(Debug, Clone)]
pub(crate) struct SkyBackground {
    position: Vec2,
    velocity: Vec2,
    size: Size,
    clouds: RenderableGroup<Cloud>,
    settings: CloudSettings,
    cloud_image: ImageHandle,
    rng: StdRng,
}

impl SkyBackground {
    pub(crate) fn new(
        position: Vec2,
        size: Size,
        settings: CloudSettings,
        cloud_image: ImageHandle,
        rng: StdRng,
    ) -> Self {
        let mut sky = Self {
            position,
            velocity: Vec2::ZERO,
            size,
            clouds: RenderableGroup::new(),
            settings,
            cloud_image,
            rng,
        };
        sky.create_new_clouds();
        sky
    }

    #[cfg(test)]
    pub(crate) fn size(&self) -> Size {
        self.size
    }

    #[cfg(test)]
    pub(crate) fn clouds(&self) -> &[Cloud] {
        self.clouds.members()
    }

    pub(crate) fn set_position_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub(crate) fn set_cloud_image(&mut self, image: ImageHandle) {
        for cloud in self.clouds.members_mut() {
            cloud.set_image(image.clone());
        }
        self.cloud_image = image;
    }

    fn create_new_clouds(&mut self) {
        let target = self
            .rng
            .gen_range(self.settings.min_count..=self.settings.max_count) as usize;
        while self.clouds.len() < target {
            let cloud = self.spawn_cloud();
            self.clouds.push(cloud);
        }
    }

    fn spawn_cloud(&mut self) -> Cloud {
        let width = self
            .settings
            .widths
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(FALLBACK_CLOUD_WIDTH);
        let mut cloud = Cloud::new(
            Vec2::ZERO,
            width,
            self.settings.fade_in_ms,
            self.cloud_image.clone(),
        );
        let lowest = self.size.height / 3.0;
        let highest = (self.size.height - cloud.height).max(lowest);
        cloud.position = Vec2::new(
            self.rng.gen_range(0.0..=self.size.width.max(0.0)),
            self.rng.gen_range(lowest..=highest),
        );
        cloud
    }

    fn wrap(&mut self) {
        self.position.x = fold_layer_offset(self.position.x, self.size.width);
    }
}

impl Renderable<GameView> for SkyBackground {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn tick(&mut self, delta_ms: f32, view: &GameView) {
        let velocity = self.velocity;
        self.tick_with_velocity(delta_ms, velocity, view);
    }

    fn render(&self, view: &GameView, surface: &mut dyn RenderSurface) {
        let rect = view
            .camera
            .get_screen_bounding_box(self.position, self.size.width, self.size.height);
        surface.fill_vertical_gradient(rect, SKY_TOP_COLOR, SKY_BOTTOM_COLOR);

        let frame = LayerFrame {
            camera: view.camera,
            origin: self.position,
        };
        self.clouds.render(&frame, surface);
    }
}

impl GroupMember<GameView> for SkyBackground {
    fn tick_with_velocity(&mut self, delta_ms: f32, velocity: Vec2, view: &GameView) {
        self.velocity = velocity;
        self.size = Size::new(view.camera.width, view.camera.height);
        self.position.x += velocity.x * (delta_ms / 1000.0);
        self.wrap();

        let before = self.clouds.len();
        let layer_width = self.size.width;
        self.clouds.retain(|cloud| cloud.overlaps_layer(layer_width));
        if self.clouds.len() < before {
            trace!(pruned = before - self.clouds.len(), "clouds_pruned");
            self.create_new_clouds();
        }

        let frame = LayerFrame {
            camera: view.camera,
            origin: self.position,
        };
        self.clouds
            .set_velocity(Vec2::new(self.settings.wind_speed, 0.0));
        self.clouds.tick(delta_ms, &frame);
    }
}
