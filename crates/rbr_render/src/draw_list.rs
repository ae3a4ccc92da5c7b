//! Backend-agnostic sprite submission.
//!
//! The simulation never draws. Each frame the game walks its layers and emits
//! one [`SpriteQuad`] per visible sprite into a [`DrawList`]; a renderer then
//! binds each [`DrawCall`]'s texture once and blits the quads it covers.

use glam::Vec2;
use rbr_core::Rect;

use crate::viewport::Viewport;

/// Color modulation applied while a sprite is flashing from a hit.
pub const FLASH_TINT: [f32; 4] = [2.5, 1.0, 1.0, 1.0];
pub const NO_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteQuad {
    pub texture_key: &'static str,
    /// Source rect in the sheet; frames are laid out left to right.
    pub src: Rect,
    /// Destination rect in screen space.
    pub dst: Rect,
    pub flip_h: bool,
    pub tint: [f32; 4],
}

impl SpriteQuad {
    /// Quad for `frame` of a horizontal strip sheet, placed at `world_pos`
    /// relative to `viewport`. Sprites facing left are mirrored.
    pub fn frame(
        texture_key: &'static str,
        frame: u32,
        frame_size: Vec2,
        world_pos: Vec2,
        viewport: &Viewport,
        facing: f32,
        flashing: bool,
    ) -> Self {
        let screen = viewport.to_screen(world_pos);
        Self {
            texture_key,
            src: Rect::new(frame as f32 * frame_size.x, 0.0, frame_size.x, frame_size.y),
            dst: Rect::new(screen.x, screen.y, frame_size.x, frame_size.y),
            flip_h: facing < 0.0,
            tint: if flashing { FLASH_TINT } else { NO_TINT },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub texture_key: &'static str,
    pub first_quad: u32,
    pub quad_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    quads: Vec<SpriteQuad>,
    draw_calls: Vec<DrawCall>,
    /// Debug hitbox outlines, screen space.
    pub debug_rects: Vec<Rect>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, quad: SpriteQuad) {
        let index = self.quads.len() as u32;
        push_draw_call(&mut self.draw_calls, quad.texture_key, index, 1);
        self.quads.push(quad);
    }

    pub fn quads(&self) -> &[SpriteQuad] {
        &self.quads
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Number of quads drawn from `texture_key`.
    pub fn count_texture(&self, texture_key: &str) -> usize {
        self.quads
            .iter()
            .filter(|quad| quad.texture_key == texture_key)
            .count()
    }
}

/// Append a draw call, merging with the previous one when the texture matches
/// and the quads are contiguous. Sprites are emitted in layer order, so runs of
/// tiles sharing a sheet collapse into one call.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: &'static str,
    first_quad: u32,
    quad_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.first_quad + last.quad_count == first_quad;
        if last.texture_key == texture_key && contiguous {
            last.quad_count += quad_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        first_quad,
        quad_count,
    });
}
