use glam::Vec2;
use rbr_core::{Rect, Timer};

use crate::config::SimConfig;
use crate::entity::{Entity, EntityKind, Look, Texture};
use crate::sprite::{AnimationLibrary, EnemyClip, Sprite};
use crate::update::TickContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Shambling,
    Damaged,
    Dead,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub hp: f32,
    pub hp_max: f32,
    pub state: EnemyState,
    /// Hit-stun window after taking a bullet.
    pub stagger: Timer,
    /// Cooldown between contact hits on the player.
    pub contact: Timer,
    pub sprite: Sprite<EnemyClip>,
}

impl Enemy {
    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    /// Apply bullet damage. Returns true when the hit was lethal.
    pub(crate) fn take_hit(&mut self, damage: f32) -> bool {
        self.state = EnemyState::Damaged;
        self.sprite.play(EnemyClip::Damaged);
        self.hp -= damage;
        if self.hp <= 0.0 {
            self.state = EnemyState::Dead;
            self.sprite.play(EnemyClip::Dying);
            return true;
        }
        false
    }
}

impl Entity {
    pub fn new_enemy(pos: Vec2, config: &SimConfig, animations: &AnimationLibrary) -> Self {
        let tuning = &config.enemy;
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            hitbox: tuning.hitbox.rect(),
            facing: 1.0,
            max_speed_x: tuning.max_speed,
            dynamic: true,
            grounded: false,
            look: Look::new(Texture::Enemy, config.flash_duration),
            kind: EntityKind::Enemy(Enemy {
                hp: tuning.hp,
                hp_max: tuning.hp,
                state: EnemyState::Shambling,
                stagger: Timer::new(tuning.stagger_duration),
                // Primed so the first contact tick lands a hit.
                contact: Timer::primed(tuning.contact_cooldown),
                sprite: animations.sprite(Some(EnemyClip::Walk)),
            }),
        }
    }
}

/// Enemy state machine. Returns the desired horizontal direction.
pub(crate) fn think(subject: &mut Entity, ctx: &TickContext<'_>) -> f32 {
    let Entity {
        pos,
        vel,
        acc,
        hitbox,
        look,
        kind,
        ..
    } = subject;
    let EntityKind::Enemy(enemy) = kind else {
        return 0.0;
    };
    let tuning = &ctx.config.enemy;
    let mut direction = 0.0;

    match enemy.state {
        EnemyState::Shambling => {
            let to_player = ctx.player_pos - *pos;
            if to_player.length() < tuning.chase_radius {
                direction = if to_player.x < 0.0 { -1.0 } else { 1.0 };
                *acc = Vec2::new(tuning.chase_acceleration, 0.0);
            } else {
                *acc = Vec2::ZERO;
                *vel = Vec2::ZERO;
            }
            if tuning.stagger_ticks_while_shambling {
                tick_stagger(enemy, look, ctx.dt);
            }
        }
        EnemyState::Damaged => tick_stagger(enemy, look, ctx.dt),
        EnemyState::Dead => {
            *vel = Vec2::ZERO;
            *hitbox = Rect::DISABLED;
            if enemy.sprite.active().is_some() && enemy.sprite.is_done() {
                enemy.sprite.freeze_on_last_frame(EnemyClip::Dying);
            }
        }
    }

    direction
}

fn tick_stagger(enemy: &mut Enemy, look: &mut Look, dt: f32) {
    if enemy.stagger.step(dt) {
        enemy.state = EnemyState::Shambling;
        look.texture = Texture::Enemy;
        enemy.sprite.play(EnemyClip::Walk);
    }
}
