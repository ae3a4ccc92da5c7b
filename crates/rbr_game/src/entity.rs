use glam::Vec2;
use rbr_core::{Rect, Timer};

use crate::bullet::Bullet;
use crate::enemy::Enemy;
use crate::player::Player;

/// Sprite sheets the renderer knows how to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Texture {
    PlayerIdle,
    PlayerRun,
    PlayerSlide,
    PlayerShoot,
    PlayerRunShoot,
    PlayerSlideShoot,
    Bullet,
    BulletHit,
    Enemy,
    EnemyHit,
    EnemyDie,
    Ground,
    Panel,
    Grass,
    Brick,
}

impl Texture {
    pub fn file_name(self) -> &'static str {
        match self {
            Texture::PlayerIdle => "idle.png",
            Texture::PlayerRun => "run.png",
            Texture::PlayerSlide => "slide.png",
            Texture::PlayerShoot => "shoot.png",
            Texture::PlayerRunShoot => "shoot_run.png",
            Texture::PlayerSlideShoot => "slide_shoot.png",
            Texture::Bullet => "bullet.png",
            Texture::BulletHit => "bullet_hit.png",
            Texture::Enemy => "enemy.png",
            Texture::EnemyHit => "enemy_hit.png",
            Texture::EnemyDie => "enemy_die.png",
            Texture::Ground => "tiles/ground.png",
            Texture::Panel => "tiles/panel.png",
            Texture::Grass => "tiles/grass.png",
            Texture::Brick => "tiles/brick.png",
        }
    }
}

/// Presentation hints the simulation sets for the renderer: which sheet to
/// draw and whether the sprite is flashing from a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    pub texture: Texture,
    flashing: bool,
    flash_timer: Timer,
}

impl Look {
    pub fn new(texture: Texture, flash_duration: f32) -> Self {
        Self {
            texture,
            flashing: false,
            flash_timer: Timer::new(flash_duration),
        }
    }

    pub fn flash(&mut self) {
        self.flashing = true;
        self.flash_timer.reset();
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    pub fn step(&mut self, dt: f32) {
        if self.flashing && self.flash_timer.step(dt) {
            self.flashing = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Player,
    Enemy,
    Bullet,
    Level,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Player(Player),
    Enemy(Enemy),
    Bullet(Bullet),
    /// Static tile; no payload.
    Level,
}

/// A simulated object. Kinematics and the hitbox are shared by every kind;
/// state machines and sprites live in the kind payload.
#[derive(Debug, Clone)]
pub struct Entity {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    /// Offset from `pos`. An empty rect disables collision.
    pub hitbox: Rect,
    /// -1 facing left, +1 facing right.
    pub facing: f32,
    pub max_speed_x: f32,
    pub dynamic: bool,
    pub grounded: bool,
    pub look: Look,
    pub kind: EntityKind,
}

impl Entity {
    pub fn tile(texture: Texture, pos: Vec2, tile_size: f32, flash_duration: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            hitbox: Rect::new(0.0, 0.0, tile_size, tile_size),
            facing: 1.0,
            max_speed_x: 0.0,
            dynamic: false,
            grounded: false,
            look: Look::new(texture, flash_duration),
            kind: EntityKind::Level,
        }
    }

    pub fn kind(&self) -> Kind {
        match self.kind {
            EntityKind::Player(_) => Kind::Player,
            EntityKind::Enemy(_) => Kind::Enemy,
            EntityKind::Bullet(_) => Kind::Bullet,
            EntityKind::Level => Kind::Level,
        }
    }

    pub fn world_hitbox(&self) -> Rect {
        self.hitbox.offset_by(self.pos)
    }

    pub fn player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            EntityKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            EntityKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn enemy_mut(&mut self) -> Option<&mut Enemy> {
        match &mut self.kind {
            EntityKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn bullet(&self) -> Option<&Bullet> {
        match &self.kind {
            EntityKind::Bullet(bullet) => Some(bullet),
            _ => None,
        }
    }

    pub fn bullet_mut(&mut self) -> Option<&mut Bullet> {
        match &mut self.kind {
            EntityKind::Bullet(bullet) => Some(bullet),
            _ => None,
        }
    }

    /// Step 1 of the tick: advance the active clip and the hit flash.
    pub fn step_presentation(&mut self, dt: f32) {
        match &mut self.kind {
            EntityKind::Player(player) => player.sprite.step(dt),
            EntityKind::Enemy(enemy) => enemy.sprite.step(dt),
            EntityKind::Bullet(bullet) => bullet.sprite.step(dt),
            EntityKind::Level => {}
        }
        self.look.step(dt);
    }

    /// Sheet column to draw this frame.
    pub fn frame_index(&self) -> u32 {
        match &self.kind {
            EntityKind::Player(player) => player.sprite.frame_index(),
            EntityKind::Enemy(enemy) => enemy.sprite.frame_index(),
            EntityKind::Bullet(bullet) => bullet.sprite.frame_index(),
            EntityKind::Level => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_is_static_with_full_hitbox() {
        let tile = Entity::tile(Texture::Ground, Vec2::new(64.0, 288.0), 32.0, 0.05);
        assert_eq!(tile.kind(), Kind::Level);
        assert!(!tile.dynamic);
        assert_eq!(tile.world_hitbox(), Rect::new(64.0, 288.0, 32.0, 32.0));
        assert!(tile.player().is_none());
        assert_eq!(tile.frame_index(), 0);
    }

    #[test]
    fn flash_clears_after_its_duration() {
        let mut look = Look::new(Texture::Enemy, 0.05);
        look.flash();
        look.step(0.03);
        assert!(look.is_flashing());
        look.step(0.03);
        assert!(!look.is_flashing());
    }

    #[test]
    fn flash_restarts_on_each_hit() {
        let mut look = Look::new(Texture::Enemy, 0.05);
        look.flash();
        look.step(0.04);
        look.flash();
        look.step(0.04);
        assert!(look.is_flashing());
    }
}
