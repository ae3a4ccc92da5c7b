use glam::Vec2;

/// Axis-aligned rectangle, top-left origin, y growing downward.
///
/// A rect with width or height <= 0 is empty and never intersects anything;
/// entities use this as the "no collision" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Collision-disabled sentinel used by dead entities.
    pub const DISABLED: Rect = Rect {
        x: -1.0,
        y: -1.0,
        w: -1.0,
        h: -1.0,
    };

    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// The same rect moved by `origin` (local hitbox -> world space).
    pub fn offset_by(&self, origin: Vec2) -> Rect {
        Rect::new(origin.x + self.x, origin.y + self.y, self.w, self.h)
    }

    /// Overlapping region, if both rects are non-empty and overlap with
    /// positive area. Touching edges do not count.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}
