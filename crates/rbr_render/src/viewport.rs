use glam::Vec2;
use rbr_core::Rect;

/// Camera window into the level, in logical pixels.
///
/// Only the horizontal offset moves; the level is exactly one screen tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub position: Vec2,
    pub size: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::new(width, height),
        }
    }

    /// Center the view on a tile-sized sprite whose left edge is at `target_x`.
    pub fn follow(&mut self, target_x: f32, tile_size: f32) {
        self.position.x = target_x + tile_size / 2.0 - self.size.x / 2.0;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }

    /// Whether a world-space point lies on screen (edges included).
    pub fn contains_point(&self, world: Vec2) -> bool {
        self.rect().contains_point(world)
    }
}
