//! Projectiles and the pool they are recycled through.
//!
//! A bullet never leaves the pool. When it despawns (off screen, or impact
//! animation finished) it goes `Idle`, and the next shot overwrites the first
//! idle slot instead of growing the list. The scan is linear; pools stay small.

use glam::Vec2;
use rand::Rng;
use rbr_core::Rect;

use crate::audio::Sound;
use crate::config::SimConfig;
use crate::entity::{Entity, EntityKind, Look, Texture};
use crate::sprite::{AnimationLibrary, BulletClip, Sprite};
use crate::update::{Effects, TickContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletState {
    /// Despawned; skipped by update, collision and drawing.
    Idle,
    Moving,
    /// Playing the impact animation.
    Colliding,
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub state: BulletState,
    pub sprite: Sprite<BulletClip>,
}

impl Bullet {
    pub fn is_idle(&self) -> bool {
        self.state == BulletState::Idle
    }
}

impl Entity {
    pub fn new_bullet(
        pos: Vec2,
        vel: Vec2,
        facing: f32,
        config: &SimConfig,
        animations: &AnimationLibrary,
    ) -> Self {
        let size = config.bullet.size;
        Self {
            pos,
            vel,
            acc: Vec2::ZERO,
            hitbox: Rect::new(0.0, 0.0, size, size),
            facing,
            max_speed_x: config.bullet.max_speed,
            dynamic: false,
            grounded: false,
            look: Look::new(Texture::Bullet, config.flash_duration),
            kind: EntityKind::Bullet(Bullet {
                state: BulletState::Moving,
                sprite: animations.sprite(Some(BulletClip::Moving)),
            }),
        }
    }

    /// True only for bullets parked in the pool.
    pub fn is_idle_bullet(&self) -> bool {
        self.bullet().map_or(false, Bullet::is_idle)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BulletPool {
    slots: Vec<Entity>,
}

impl BulletPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `bullet` in the first idle slot, or append. Returns the slot index.
    pub fn spawn(&mut self, bullet: Entity) -> usize {
        match self.slots.iter().position(Entity::is_idle_bullet) {
            Some(index) => {
                log::debug!("Bullet reused slot {index}");
                self.slots[index] = bullet;
                index
            }
            None => {
                self.slots.push(bullet);
                let index = self.slots.len() - 1;
                log::debug!("Bullet appended at slot {index}");
                index
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn idle_count(&self) -> usize {
        self.slots.iter().filter(|b| b.is_idle_bullet()).count()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots.iter_mut()
    }

    /// Bullets that are in flight or exploding.
    pub fn active(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().filter(|b| !b.is_idle_bullet())
    }
}

/// Build a shot from a shooter's kinematics and put it in the pool.
pub(crate) fn fire(
    shooter_pos: Vec2,
    shooter_vel_x: f32,
    facing: f32,
    ctx: &TickContext<'_>,
    fx: &mut Effects<'_>,
) {
    let Some(pool) = fx.bullets.as_deref_mut() else {
        return;
    };
    let tuning = &ctx.config.bullet;

    let spread = tuning.vertical_spread;
    let vertical = if spread > 0.0 {
        fx.rng.gen_range(-spread..spread)
    } else {
        0.0
    };
    let vel = Vec2::new((shooter_vel_x + tuning.base_speed) * facing, vertical);

    // Left-facing shots leave near the sprite's left edge, right-facing near its right.
    let t = (facing + 1.0) / 2.0;
    let offset = Vec2::new(tuning.spawn_offset + tuning.spawn_span * t, tuning.spawn_height);

    let bullet = Entity::new_bullet(shooter_pos + offset, vel, facing, ctx.config, ctx.animations);
    pool.spawn(bullet);
    fx.audio.play(Sound::Shoot);
}

/// Bullet state machine: despawn when off screen or when the impact is over.
pub(crate) fn think(subject: &mut Entity, ctx: &TickContext<'_>) {
    let pos = subject.pos;
    let Some(bullet) = subject.bullet_mut() else {
        return;
    };
    match bullet.state {
        BulletState::Moving => {
            if !ctx.viewport.contains_point(pos) {
                bullet.state = BulletState::Idle;
            }
        }
        BulletState::Colliding => {
            if bullet.sprite.is_done() {
                bullet.state = BulletState::Idle;
            }
        }
        BulletState::Idle => {}
    }
}

/// Stop the bullet and switch it to the impact animation.
pub(crate) fn impact(subject: &mut Entity) {
    subject.vel = Vec2::ZERO;
    subject.look.texture = Texture::BulletHit;
    if let Some(bullet) = subject.bullet_mut() {
        bullet.state = BulletState::Colliding;
        bullet.sprite.play(BulletClip::Impact);
    }
}
