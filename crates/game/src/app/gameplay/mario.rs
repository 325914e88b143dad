use engine::{BlitOptions, ImageHandle, KeyboardKey, RenderSurface, Renderable, ScreenRect, Size, Vec2};
use tracing::debug;

use crate::app::config::MarioConfig;

use super::{Direction, GameView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameOffset {
    pub column: u32,
    pub row: u32,
}

const fn frame(column: u32, row: u32) -> FrameOffset {
    FrameOffset { column, row }
}

const STANDING_FRAMES: &[FrameOffset] = &[frame(0, 0)];
const RUNNING_FRAMES: &[FrameOffset] = &[frame(1, 0), frame(2, 0), frame(3, 0), frame(4, 0)];
const JUMPING_FRAMES: &[FrameOffset] = &[frame(5, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameSet {
    Standing,
    Running,
    Jumping,
}

impl FrameSet {
    pub(crate) fn frames(self) -> &'static [FrameOffset] {
        match self {
            FrameSet::Standing => STANDING_FRAMES,
            FrameSet::Running => RUNNING_FRAMES,
            FrameSet::Jumping => JUMPING_FRAMES,
        }
    }
}

/// Fixed-size cells laid out in a grid on one image.
#[derive(Debug, Clone)]
pub(crate) struct SpriteSheet {
    image: ImageHandle,
    cell: Size,
}

impl SpriteSheet {
    pub(crate) fn new(image: ImageHandle, cell: Size) -> Self {
        Self { image, cell }
    }

    pub(crate) fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub(crate) fn set_image(&mut self, image: ImageHandle) {
        self.image = image;
    }

    pub(crate) fn source_rect(&self, offset: FrameOffset) -> ScreenRect {
        ScreenRect::new(
            offset.column as f32 * self.cell.width,
            offset.row as f32 * self.cell.height,
            self.cell.width,
            self.cell.height,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MarioPhysics {
    gravity: f32,
    jump_speed: Vec2,
    ground_friction: f32,
    frame_interval_ms: f32,
}

#[derive(Debug, Clone)]
pub(crate) struct MarioCharacter {
    position: Vec2,
    velocity: Vec2,
    size: Size,
    sheet: SpriteSheet,
    sheet_faces_left: bool,
    facing: Direction,
    running: Option<Direction>,
    airborne: bool,
    frame_set: FrameSet,
    frame_index: usize,
    since_last_frame_ms: f32,
    physics: MarioPhysics,
}

impl MarioCharacter {
    pub(crate) fn new(config: &MarioConfig, ground_level: f32) -> Self {
        Self {
            position: Vec2::new(config.spawn_x, ground_level),
            velocity: Vec2::ZERO,
            size: config.size,
            sheet: SpriteSheet::new(ImageHandle::missing(&config.sprite_key), config.sprite_cell),
            sheet_faces_left: config.sheet_faces_left,
            facing: Direction::Right,
            running: None,
            airborne: false,
            frame_set: FrameSet::Standing,
            frame_index: 0,
            since_last_frame_ms: 0.0,
            physics: MarioPhysics {
                gravity: config.gravity,
                jump_speed: config.jump_speed,
                ground_friction: config.ground_friction,
                frame_interval_ms: config.frame_interval_ms,
            },
        }
    }

    pub(crate) fn set_sprite(&mut self, image: ImageHandle) {
        self.sheet.set_image(image);
    }

    pub(crate) fn start_running(&mut self, direction: Direction) {
        self.running = Some(direction);
        self.facing = direction;
        if !self.airborne {
            self.select_frames(FrameSet::Running);
        }
        debug!(direction = ?direction, airborne = self.airborne, "mario_start_running");
    }

    pub(crate) fn stop_running(&mut self) {
        self.running = None;
        if !self.airborne {
            self.select_frames(FrameSet::Standing);
        }
        debug!(airborne = self.airborne, "mario_stop_running");
    }

    /// Advances to the next frame of the active set, wrapping to the first.
    pub(crate) fn next_frame(&mut self) {
        self.frame_index += 1;
        if self.frame_index >= self.frame_set.frames().len() {
            self.frame_index = 0;
        }
        self.since_last_frame_ms = 0.0;
    }

    pub(crate) fn current_frame(&self) -> FrameOffset {
        let frames = self.frame_set.frames();
        frames
            .get(self.frame_index)
            .or_else(|| frames.first())
            .copied()
            .unwrap_or(frame(0, 0))
    }

    #[cfg(test)]
    pub(crate) fn facing(&self) -> Direction {
        self.facing
    }

    #[cfg(test)]
    pub(crate) fn is_airborne(&self) -> bool {
        self.airborne
    }

    #[cfg(test)]
    pub(crate) fn frame_set(&self) -> FrameSet {
        self.frame_set
    }

    #[cfg(test)]
    pub(crate) fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub(crate) fn state_label(&self) -> &'static str {
        match (self.airborne, self.running) {
            (true, _) => "airborne",
            (false, Some(Direction::Left)) => "running left",
            (false, Some(Direction::Right)) => "running right",
            (false, None) => "standing",
        }
    }

    /// Keeps the character inside `[min_x, max_x]`, stopping horizontal motion at the edge.
    pub(crate) fn clamp_horizontal(&mut self, min_x: f32, max_x: f32) {
        if max_x < min_x {
            return;
        }
        let clamped = self.position.x.clamp(min_x, max_x);
        if clamped != self.position.x {
            self.position.x = clamped;
            self.velocity.x = 0.0;
        }
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, position: Vec2, velocity: Vec2, airborne: bool) {
        self.position = position;
        self.velocity = velocity;
        self.airborne = airborne;
    }

    fn select_frames(&mut self, frame_set: FrameSet) {
        self.frame_set = frame_set;
        self.frame_index = 0;
    }

    fn jump(&mut self) {
        self.select_frames(FrameSet::Jumping);
        self.velocity = Vec2::new(
            self.facing.sign() * self.physics.jump_speed.x,
            self.physics.jump_speed.y,
        );
        self.airborne = true;
        debug!(velocity = %self.velocity, "mario_jumped");
    }

    fn land(&mut self) {
        self.airborne = false;
        let frame_set = if self.running.is_some() {
            FrameSet::Running
        } else {
            FrameSet::Standing
        };
        self.select_frames(frame_set);
        debug!(position = %self.position, "mario_landed");
    }
}

/// Decelerates `velocity_x` toward zero by `friction * dt`; never crosses zero.
pub(crate) fn apply_ground_friction(velocity_x: f32, friction: f32, dt: f32) -> f32 {
    if velocity_x == 0.0 {
        return 0.0;
    }
    let slowed = velocity_x - velocity_x.signum() * friction * dt;
    if slowed.signum() != velocity_x.signum() {
        0.0
    } else {
        slowed
    }
}

impl Renderable<GameView> for MarioCharacter {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn tick(&mut self, delta_ms: f32, view: &GameView) {
        if !(delta_ms > 0.0) {
            return;
        }
        let dt = delta_ms / 1000.0;

        if view.input.is_pressed(KeyboardKey::Up) && !self.airborne {
            self.jump();
        }

        if self.since_last_frame_ms + delta_ms > self.physics.frame_interval_ms {
            self.next_frame();
        } else {
            self.since_last_frame_ms += delta_ms;
        }

        self.position += self.velocity * dt;
        self.velocity.y -= self.physics.gravity * dt;

        if !self.airborne && self.velocity.x != 0.0 {
            self.velocity.x =
                apply_ground_friction(self.velocity.x, self.physics.ground_friction, dt);
        }

        if self.position.y <= view.ground_level {
            self.position.y = view.ground_level;
            self.velocity.y = 0.0;
            if self.airborne {
                self.land();
            }
        }
    }

    fn render(&self, view: &GameView, surface: &mut dyn RenderSurface) {
        if !self.sheet.image().is_ready() {
            return;
        }
        let dest = view
            .camera
            .get_screen_bounding_box(self.position, self.size.width, self.size.height);
        let mirror_x = (self.facing == Direction::Left) != self.sheet_faces_left;
        surface.draw_image_region(
            self.sheet.image(),
            self.sheet.source_rect(self.current_frame()),
            dest,
            BlitOptions {
                mirror_x,
                opacity: 1.0,
            },
        );
    }
}
