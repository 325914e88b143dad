use engine::{
    Camera, CameraError, ImageLoader, InputSnapshot, RenderSurface, Renderable, Scene,
    ScreenRect, Viewport,
};
use tracing::{info, trace};

use crate::app::config::GameConfig;

mod landscape;
mod mario;
mod sky;

use landscape::{DirectionChange, Landscape};
use mario::MarioCharacter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    pub(crate) fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Read-only world state handed to every renderable for one tick or render.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GameView {
    pub camera: Camera,
    pub input: InputSnapshot,
    pub ground_level: f32,
    pub score: u32,
    pub lives: u32,
    pub elapsed_ms: f64,
}

pub(crate) struct Game {
    config: GameConfig,
    camera: Camera,
    landscape: Landscape,
    player: MarioCharacter,
    score: u32,
    lives: u32,
    elapsed_ms: f64,
    input: InputSnapshot,
}

impl Game {
    pub(crate) fn new(config: GameConfig) -> Result<Self, CameraError> {
        let viewport = Viewport::new(config.window.width, config.window.height);
        let mut camera = Camera::for_viewport(config.camera.world_to_pixel, viewport)?;
        camera.follow_offset = config.camera.follow_offset;
        camera.level_bounds = config.camera.level_bounds;

        let seed = config.landscape.seed.unwrap_or_else(rand::random);
        let landscape = Landscape::new(&config.landscape, &config.hud, &camera, seed);
        let player = MarioCharacter::new(&config.mario, landscape.ground_level());
        camera.tick(0.0, player.position());
        info!(
            seed,
            camera_width = camera.width,
            camera_height = camera.height,
            ground_level = landscape.ground_level(),
            "game_created"
        );

        Ok(Self {
            lives: config.hud.lives,
            config,
            camera,
            landscape,
            player,
            score: 0,
            elapsed_ms: 0.0,
            input: InputSnapshot::empty(),
        })
    }

    fn view(&self) -> GameView {
        GameView {
            camera: self.camera,
            input: self.input,
            ground_level: self.landscape.ground_level(),
            score: self.score,
            lives: self.lives,
            elapsed_ms: self.elapsed_ms,
        }
    }

    fn apply_direction_change(&mut self) {
        match self.landscape.take_direction_change() {
            Some(DirectionChange::Started(direction)) => self.player.start_running(direction),
            Some(DirectionChange::Stopped) => self.player.stop_running(),
            None => {}
        }
    }

    /// Farthest the player may walk: the camera's scroll limit plus one screen.
    fn player_max_x(&self) -> f32 {
        let size = self.config.mario.size;
        (self.camera.level_bounds.x.max(0.0) + self.camera.width - size.width).max(0.0)
    }
}

impl Scene for Game {
    fn load(&mut self, assets: &mut ImageLoader) {
        self.player.set_sprite(assets.load(&self.config.mario.sprite_key));
        self.landscape
            .set_cloud_image(assets.load(&self.config.landscape.cloud_sprite_key));
        info!(
            scene = "pokemario",
            assets_cached = assets.cached_count(),
            "scene_loaded"
        );
    }

    fn tick(&mut self, delta_ms: f32, input: &InputSnapshot, viewport: Viewport) {
        self.input = *input;
        self.camera.fit_viewport(viewport);
        if delta_ms > 0.0 {
            self.elapsed_ms += f64::from(delta_ms);
        }

        let view = self.view();
        self.landscape.tick(delta_ms, &view);
        self.apply_direction_change();

        let view = self.view();
        self.player.tick(delta_ms, &view);
        let max_x = self.player_max_x();
        self.player.clamp_horizontal(0.0, max_x);

        // Last, so the camera sees this frame's player position.
        self.camera.tick(delta_ms, self.player.position());
        trace!(
            player = %self.player.position(),
            camera = %self.camera.position,
            "game_ticked"
        );
    }

    fn end_frame(&mut self, frame_ms: f32) {
        self.landscape.record_frame(frame_ms);
    }

    fn render(&self, surface: &mut dyn RenderSurface) {
        let size = surface.size();
        surface.clear_rect(ScreenRect::new(
            0.0,
            0.0,
            size.width as f32,
            size.height as f32,
        ));
        let view = self.view();
        self.landscape.render(&view, surface);
        self.player.render(&view, surface);
    }

    fn unload(&mut self) {
        self.input = InputSnapshot::empty();
        info!(
            elapsed_ms = self.elapsed_ms,
            score = self.score,
            lives = self.lives,
            "game_unloaded"
        );
    }

    fn debug_title(&self) -> Option<String> {
        Some(format!(
            "{} | {} | x={:.1} | fps={:.0}",
            self.config.window.title,
            self.player.state_label(),
            self.player.position().x,
            self.landscape.mean_fps()
        ))
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
