use engine::{
    apply_transition, Camera, FpsSampler, GroupMember, ImageHandle, KeyboardKey, RenderSurface,
    Renderable, RenderableGroup, Rgba, Size, TextAlign, TextStyle, Transition, TransitionCurve,
    Vec2,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::app::config::{HudConfig, LandscapeConfig};

use super::sky::{fold_layer_offset, CloudSettings, SkyBackground};
use super::{Direction, GameView};

const DIRT_COLOR: Rgba = [0x8e, 0x09, 0x09, 255];
const GRASS_COLOR: Rgba = [0x2e, 0xa0, 0x2e, 255];
const HUD_TEXT_COLOR: Rgba = [255, 255, 255, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirectionChange {
    Started(Direction),
    Stopped,
}

/// Dirt and grass strips along the bottom of the screen, plus the HUD readout.
#[derive(Debug, Clone)]
pub(crate) struct Ground {
    position: Vec2,
    velocity: Vec2,
    dirt_fraction: f32,
    grass_fraction: f32,
    dirt_height: f32,
    grass_height: f32,
    fps: FpsSampler,
    hud: HudConfig,
}

impl Ground {
    pub(crate) fn new(config: &LandscapeConfig, hud: &HudConfig, camera: &Camera) -> Self {
        let mut ground = Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            dirt_fraction: config.dirt_height_fraction,
            grass_fraction: config.grass_height_fraction,
            dirt_height: 0.0,
            grass_height: 0.0,
            fps: FpsSampler::default(),
            hud: hud.clone(),
        };
        ground.measure(camera);
        ground
    }

    /// Top edge of the grass in world units.
    pub(crate) fn level(&self) -> f32 {
        self.position.y
    }

    pub(crate) fn mean_fps(&self) -> f32 {
        self.fps.mean_fps()
    }

    pub(crate) fn record_frame(&mut self, frame_ms: f32) {
        self.fps.record_delta_ms(frame_ms);
    }

    /// Strip heights snap to whole pixels of the current viewport.
    fn measure(&mut self, camera: &Camera) {
        let scale = camera.world_to_pixel();
        let screen_height = camera.screen_dimensions().height;
        let dirt_px = (self.dirt_fraction * screen_height).round();
        let grass_px = (self.grass_fraction * screen_height).round();
        self.dirt_height = dirt_px / scale;
        self.grass_height = grass_px / scale;
        self.position.y = self.dirt_height + self.grass_height;
    }

    fn render_hud(&self, view: &GameView, surface: &mut dyn RenderSurface) {
        let size = surface.size();
        let (width, height) = (size.width as f32, size.height as f32);
        let hud = &self.hud;
        let bottom_row = height - hud.margin_px;
        let upper_row = bottom_row - hud.font_size_px - hud.line_spacing_px;
        let left = TextStyle {
            size_px: hud.font_size_px,
            align: TextAlign::Left,
            color: HUD_TEXT_COLOR,
        };
        let right = TextStyle {
            align: TextAlign::Right,
            ..left
        };

        let seconds = (view.elapsed_ms / 1000.0).floor() as u64;
        let fps = self.fps.mean_fps().floor() as u32;
        surface.fill_text(&format!("score: {}", view.score), hud.margin_px, upper_row, left);
        surface.fill_text(&format!("time: {seconds}s"), hud.margin_px, bottom_row, left);
        surface.fill_text(
            &format!("lives: {}", view.lives),
            width - hud.margin_px,
            upper_row,
            right,
        );
        surface.fill_text(&format!("fps: {fps}"), width - hud.margin_px, bottom_row, right);
    }
}

impl Renderable<GameView> for Ground {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn tick(&mut self, _delta_ms: f32, view: &GameView) {
        self.measure(&view.camera);
    }

    fn render(&self, view: &GameView, surface: &mut dyn RenderSurface) {
        let camera = &view.camera;
        let dirt = camera.get_screen_bounding_box(Vec2::ZERO, camera.width, self.dirt_height);
        let grass = camera.get_screen_bounding_box(
            Vec2::new(0.0, self.dirt_height),
            camera.width,
            self.grass_height,
        );
        surface.fill_rect(dirt, DIRT_COLOR);
        surface.fill_rect(grass, GRASS_COLOR);
        self.render_hud(view, surface);
    }
}

impl GroupMember<GameView> for Ground {
    fn tick_with_velocity(&mut self, delta_ms: f32, velocity: Vec2, view: &GameView) {
        self.velocity = velocity;
        self.tick(delta_ms, view);
    }
}

#[derive(Debug, Clone)]
pub(crate) enum LandscapeLayer {
    Sky(SkyBackground),
    Ground(Ground),
}

impl Renderable<GameView> for LandscapeLayer {
    fn position(&self) -> Vec2 {
        match self {
            LandscapeLayer::Sky(sky) => sky.position(),
            LandscapeLayer::Ground(ground) => ground.position(),
        }
    }

    fn velocity(&self) -> Vec2 {
        match self {
            LandscapeLayer::Sky(sky) => sky.velocity(),
            LandscapeLayer::Ground(ground) => ground.velocity(),
        }
    }

    fn tick(&mut self, delta_ms: f32, view: &GameView) {
        match self {
            LandscapeLayer::Sky(sky) => sky.tick(delta_ms, view),
            LandscapeLayer::Ground(ground) => ground.tick(delta_ms, view),
        }
    }

    fn render(&self, view: &GameView, surface: &mut dyn RenderSurface) {
        match self {
            LandscapeLayer::Sky(sky) => sky.render(view, surface),
            LandscapeLayer::Ground(ground) => ground.render(view, surface),
        }
    }
}

impl GroupMember<GameView> for LandscapeLayer {
    fn tick_with_velocity(&mut self, delta_ms: f32, velocity: Vec2, view: &GameView) {
        match self {
            LandscapeLayer::Sky(sky) => sky.tick_with_velocity(delta_ms, velocity, view),
            LandscapeLayer::Ground(ground) => ground.tick_with_velocity(delta_ms, velocity, view),
        }
    }
}

/// Screen-anchored backdrop. Scrolls the sky opposite to the held direction and reports
/// direction changes so the player animation can follow.
#[derive(Debug, Clone)]
pub(crate) struct Landscape {
    layers: RenderableGroup<LandscapeLayer>,
    backdrop: Camera,
    direction: Option<Direction>,
    velocity: Transition<Vec2>,
    walk_fraction: f32,
    sprint_multiplier: f32,
    pending_change: Option<DirectionChange>,
}

impl Landscape {
    pub(crate) fn new(
        config: &LandscapeConfig,
        hud: &HudConfig,
        camera: &Camera,
        seed: u64,
    ) -> Self {
        let backdrop = camera.static_copy();
        let size = Size::new(backdrop.width, backdrop.height);
        let settings = CloudSettings::from(config);
        let cloud_image = ImageHandle::missing(&config.cloud_sprite_key);

        let mut layers = RenderableGroup::new();
        for (index, x) in [0.0, size.width].into_iter().enumerate() {
            layers.push(LandscapeLayer::Sky(SkyBackground::new(
                Vec2::new(x, 0.0),
                size,
                settings.clone(),
                cloud_image.clone(),
                StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            )));
        }
        layers.push(LandscapeLayer::Ground(Ground::new(config, hud, &backdrop)));

        Self {
            layers,
            backdrop,
            direction: None,
            velocity: Transition {
                initial: Vec2::ZERO,
                target: Vec2::ZERO,
                state: Vec2::ZERO,
                curve: TransitionCurve::linear(config.velocity_transition_ms),
            },
            walk_fraction: config.walk_speed_viewport_fraction,
            sprint_multiplier: config.sprint_multiplier,
            pending_change: None,
        }
    }

    pub(crate) fn ground_level(&self) -> f32 {
        self.ground().map(Ground::level).unwrap_or(0.0)
    }

    pub(crate) fn mean_fps(&self) -> f32 {
        self.ground().map(Ground::mean_fps).unwrap_or(0.0)
    }

    #[cfg(test)]
    pub(crate) fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub(crate) fn take_direction_change(&mut self) -> Option<DirectionChange> {
        self.pending_change.take()
    }

    #[cfg(test)]
    pub(crate) fn skies(&self) -> impl Iterator<Item = &SkyBackground> {
        self.layers.members().iter().filter_map(|layer| match layer {
            LandscapeLayer::Sky(sky) => Some(sky),
            LandscapeLayer::Ground(_) => None,
        })
    }

    pub(crate) fn set_cloud_image(&mut self, image: ImageHandle) {
        for layer in self.layers.members_mut() {
            if let LandscapeLayer::Sky(sky) = layer {
                sky.set_cloud_image(image.clone());
            }
        }
    }

    /// Samples one displayed frame for the fps readout.
    pub(crate) fn record_frame(&mut self, frame_ms: f32) {
        for layer in self.layers.members_mut() {
            if let LandscapeLayer::Ground(ground) = layer {
                ground.record_frame(frame_ms);
            }
        }
    }

    fn ground(&self) -> Option<&Ground> {
        self.layers.members().iter().find_map(|layer| match layer {
            LandscapeLayer::Ground(ground) => Some(ground),
            LandscapeLayer::Sky(_) => None,
        })
    }

    fn backdrop_view(&self, view: &GameView) -> GameView {
        GameView {
            camera: self.backdrop,
            ..*view
        }
    }

    fn held_direction(view: &GameView) -> Option<Direction> {
        if view.input.is_pressed(KeyboardKey::Right) {
            Some(Direction::Right)
        } else if view.input.is_pressed(KeyboardKey::Left) {
            Some(Direction::Left)
        } else {
            None
        }
    }

    fn target_velocity(&self, direction: Option<Direction>, sprinting: bool) -> Vec2 {
        let Some(direction) = direction else {
            return Vec2::ZERO;
        };
        let walk = self.walk_fraction * self.backdrop.width;
        let speed = if sprinting {
            walk * self.sprint_multiplier
        } else {
            walk
        };
        // Moving right scrolls the backdrop left.
        Vec2::new(-direction.sign() * speed, 0.0)
    }

    /// Brings the first sky layer back into `[-width, width)` and puts its sibling right
    /// next to it, so the pair covers the viewport after a width change.
    fn realign_skies(&mut self, width: f32) {
        let mut anchor = None;
        for layer in self.layers.members_mut() {
            let LandscapeLayer::Sky(sky) = layer else {
                continue;
            };
            match anchor {
                None => {
                    let x = fold_layer_offset(sky.position().x, width);
                    sky.set_position_x(x);
                    anchor = Some(x);
                }
                Some(x) => sky.set_position_x(if x <= 0.0 { x + width } else { x - width }),
            }
        }
    }
}

impl Renderable<GameView> for Landscape {
    fn position(&self) -> Vec2 {
        self.backdrop.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity.state
    }

    fn tick(&mut self, delta_ms: f32, view: &GameView) {
        let previous_width = self.backdrop.width;
        self.backdrop = view.camera.static_copy();
        if previous_width != self.backdrop.width {
            self.realign_skies(self.backdrop.width);
        }

        let direction = Self::held_direction(view);
        let sprinting = direction.is_some() && view.input.is_pressed(KeyboardKey::Shift);
        let target = self.target_velocity(direction, sprinting);
        if target != self.velocity.target {
            self.velocity.initial = self.velocity.state;
            self.velocity.target = target;
        }
        self.velocity.state = apply_transition(&self.velocity, delta_ms);

        if direction != self.direction {
            let change = match direction {
                Some(direction) => DirectionChange::Started(direction),
                None => DirectionChange::Stopped,
            };
            debug!(from = ?self.direction, to = ?direction, "landscape_direction_changed");
            self.direction = direction;
            self.pending_change = Some(change);
        }

        let backdrop_view = self.backdrop_view(view);
        self.layers.set_velocity(self.velocity.state);
        self.layers.tick(delta_ms, &backdrop_view);
    }

    fn render(&self, view: &GameView, surface: &mut dyn RenderSurface) {
        self.layers.render(&self.backdrop_view(view), surface);
    }
}
