//! Read-only projection of a [`World`] for whatever presents the frame.

use glam::Vec2;
use rbr_devtools::{DebugOverlay, OverlayStats};
use rbr_render::{DrawList, SpriteQuad};

use crate::entity::{Entity, Kind};
use crate::world::World;

impl World {
    /// Sprites in back-to-front order: background, solid tiles, characters,
    /// live bullets, foreground. Hitbox outlines are attached while the
    /// overlay is visible.
    pub fn draw_list(&self, overlay: &DebugOverlay) -> DrawList {
        let mut list = DrawList::new();
        let tile = Vec2::splat(self.config().tile_size);

        for entity in self.background.iter().chain(&self.level).chain(&self.characters) {
            list.push(self.quad(entity, tile));
        }
        for bullet in self.bullets.active() {
            list.push(self.quad(bullet, bullet.hitbox.size()));
        }
        for entity in &self.foreground {
            list.push(self.quad(entity, tile));
        }

        if overlay.visible {
            list.debug_rects = overlay.hitbox_rects(&self.overlay_stats());
        }
        list
    }

    pub fn overlay_stats(&self) -> OverlayStats {
        let player = self.player();
        let data = self.player_data();
        let hitboxes = self
            .level
            .iter()
            .chain(&self.characters)
            .chain(self.bullets.active())
            .map(Entity::world_hitbox)
            .collect();

        OverlayStats {
            player_state: data.map_or("-", |p| p.state.label()).to_string(),
            bullets: self.bullets.len(),
            idle_bullets: self.bullets.idle_count(),
            grounded: player.grounded,
            hp: data.map_or(0.0, |p| p.hp),
            hp_max: data.map_or(0.0, |p| p.hp_max),
            viewport_x: self.viewport.position.x,
            hitboxes,
        }
    }

    /// Player HP for the health bar, clamped to [0, 1].
    pub fn hp_fraction(&self) -> f32 {
        self.player_data().map_or(0.0, |p| p.hp_fraction())
    }

    fn quad(&self, entity: &Entity, frame_size: Vec2) -> SpriteQuad {
        // Tiles never flip.
        let facing = if entity.kind() == Kind::Level {
            1.0
        } else {
            entity.facing
        };
        SpriteQuad::frame(
            entity.look.texture.file_name(),
            entity.frame_index(),
            frame_size,
            entity.pos,
            &self.viewport,
            facing,
            entity.look.is_flashing(),
        )
    }
}
