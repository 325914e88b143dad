use super::rendering::RenderSurface;
use super::Vec2;

/// Per-frame capability shared by every animated entity. `W` is the read-only world
/// context handed down by the owner (camera, input, counters).
///
/// `render` takes `&self`: drawing never mutates simulation state.
pub trait Renderable<W: ?Sized> {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn tick(&mut self, delta_ms: f32, world: &W);
    fn render(&self, world: &W, surface: &mut dyn RenderSurface);
}

/// A renderable that can be driven by a group-wide velocity.
pub trait GroupMember<W: ?Sized>: Renderable<W> {
    fn tick_with_velocity(&mut self, delta_ms: f32, velocity: Vec2, world: &W);
}

/// Members share one velocity per tick; it is passed into each member's tick rather
/// than written into the members beforehand.
#[derive(Debug, Clone)]
pub struct RenderableGroup<M> {
    members: Vec<M>,
    position: Vec2,
    current_velocity: Vec2,
}

impl<M> Default for RenderableGroup<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> RenderableGroup<M> {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            position: Vec2::ZERO,
            current_velocity: Vec2::ZERO,
        }
    }

    pub fn push(&mut self, member: M) {
        self.members.push(member);
    }

    /// Drops members for which `keep` returns false. Only call between ticks.
    pub fn retain(&mut self, keep: impl FnMut(&M) -> bool) {
        self.members.retain(keep);
    }

    pub fn members(&self) -> &[M] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [M] {
        &mut self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.current_velocity = velocity;
    }

    pub fn current_velocity(&self) -> Vec2 {
        self.current_velocity
    }
}

impl<W: ?Sized, M: GroupMember<W>> Renderable<W> for RenderableGroup<M> {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.current_velocity
    }

    fn tick(&mut self, delta_ms: f32, world: &W) {
        let velocity = self.current_velocity;
        for member in &mut self.members {
            member.tick_with_velocity(delta_ms, velocity, world);
        }
    }

    fn render(&self, world: &W, surface: &mut dyn RenderSurface) {
        for member in &self.members {
            member.render(world, surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::{DrawCommand, RecordingSurface};
    use crate::app::{ScreenRect, Viewport};

    #[derive(Debug)]
    struct Marker {
        id: u8,
        position: Vec2,
        velocity: Vec2,
    }

    impl Marker {
        fn new(id: u8) -> Self {
            Self {
                id,
                position: Vec2::new(id as f32, 0.0),
                velocity: Vec2::ZERO,
            }
        }
    }

    impl Renderable<()> for Marker {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn velocity(&self) -> Vec2 {
            self.velocity
        }

        fn tick(&mut self, delta_ms: f32, _world: &()) {
            self.position += self.velocity * (delta_ms / 1000.0);
        }

        fn render(&self, _world: &(), surface: &mut dyn RenderSurface) {
            surface.fill_rect(
                ScreenRect {
                    x: self.position.x,
                    y: 0.0,
                    width: 1.0,
                    height: 1.0,
                },
                [self.id, 0, 0, 255],
            );
        }
    }

    impl GroupMember<()> for Marker {
        fn tick_with_velocity(&mut self, delta_ms: f32, velocity: Vec2, world: &()) {
            self.velocity = velocity;
            self.tick(delta_ms, world);
        }
    }

    #[test]
    fn tick_hands_shared_velocity_to_every_member() {
        let mut group = RenderableGroup::new();
        group.push(Marker::new(1));
        group.push(Marker::new(2));
        group.set_velocity(Vec2::new(-10.0, 0.0));

        group.tick(500.0, &());

        for member in group.members() {
            assert_eq!(member.velocity(), Vec2::new(-10.0, 0.0));
            assert_eq!(member.position().x, member.id as f32 - 5.0);
        }
    }

    #[test]
    fn render_follows_insertion_order() {
        let mut group = RenderableGroup::new();
        for id in [3, 1, 2] {
            group.push(Marker::new(id));
        }
        let mut surface = RecordingSurface::new(Viewport::new(10, 10));

        group.render(&(), &mut surface);

        let ids: Vec<u8> = surface
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRect { color, .. } => Some(color[0]),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn retain_between_ticks_keeps_remaining_order() {
        let mut group = RenderableGroup::new();
        for id in 0..5 {
            group.push(Marker::new(id));
        }
        group.retain(|member| member.id % 2 == 0);
        group.push(Marker::new(9));

        let ids: Vec<u8> = group.members().iter().map(|member| member.id).collect();
        assert_eq!(ids, vec![0, 2, 4, 9]);
        assert_eq!(group.len(), 4);
    }
}
