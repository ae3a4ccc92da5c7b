//! Pairwise AABB collision between entities.
//!
//! Detection runs once per ordered pair per tick, from the subject's own
//! update, so every response acts on the first argument and treats the second
//! as the thing it ran into. Gameplay effects (damage, bullet impact) are
//! layered over a shared separation step.
//!
//! Separation pushes the subject out along the axis of least penetration. This
//! is a heuristic, not swept collision: a subject that is not moving along
//! that axis is left where it is.

use rbr_core::Rect;

use crate::audio::Sound;
use crate::bullet::{self, BulletState};
use crate::entity::{Entity, EntityKind, Kind, Texture};
use crate::update::{Effects, TickContext};

/// Test `a` against `b` and apply the response when their hitboxes overlap.
/// Returns whether they overlapped.
pub fn detect(a: &mut Entity, b: &mut Entity, ctx: &TickContext<'_>, fx: &mut Effects<'_>) -> bool {
    let rect_a = a.world_hitbox();
    let rect_b = b.world_hitbox();
    match rect_a.intersection(&rect_b) {
        Some(overlap) => {
            respond(a, b, &overlap, ctx, fx);
            true
        }
        None => false,
    }
}

/// Push `a` out of an overlap opposite to its velocity on the shallower axis
/// and stop it on that axis.
pub fn separate(a: &mut Entity, overlap: &Rect) {
    if overlap.w < overlap.h {
        if a.vel.x > 0.0 {
            a.pos.x -= overlap.w;
        } else if a.vel.x < 0.0 {
            a.pos.x += overlap.w;
        }
        a.vel.x = 0.0;
    } else {
        if a.vel.y > 0.0 {
            a.pos.y -= overlap.h;
        } else if a.vel.y < 0.0 {
            a.pos.y += overlap.h;
        }
        a.vel.y = 0.0;
    }
}

/// One-pixel sensor under the subject's hitbox. Counts as ground only for a
/// floor-like contact, at least as wide as it is tall.
pub fn probe_ground(subject: &Entity, other: &Entity) -> bool {
    let feet = subject.world_hitbox();
    let sensor = Rect::new(feet.x, feet.bottom(), feet.w, 1.0);
    sensor
        .intersection(&other.world_hitbox())
        .map_or(false, |contact| contact.w >= contact.h)
}

fn respond(
    a: &mut Entity,
    b: &mut Entity,
    overlap: &Rect,
    ctx: &TickContext<'_>,
    fx: &mut Effects<'_>,
) {
    match a.kind() {
        Kind::Player => match b.kind() {
            Kind::Level => separate(a, overlap),
            Kind::Enemy => {
                let contact_hit = b
                    .enemy_mut()
                    .map_or(false, |enemy| enemy.contact.step(ctx.dt));
                if contact_hit {
                    if let Some(player) = a.player_mut() {
                        player.hp -= ctx.config.enemy.contact_damage;
                        log::debug!("Player took contact damage, hp {:.0}", player.hp);
                    }
                }
                separate(a, overlap);
            }
            Kind::Player | Kind::Bullet => {}
        },
        Kind::Bullet => {
            let moving = a
                .bullet()
                .map_or(false, |bullet| bullet.state == BulletState::Moving);
            if !moving {
                return;
            }
            let stopped = match b.kind() {
                Kind::Level => {
                    fx.audio.play(Sound::BulletImpact);
                    true
                }
                Kind::Enemy => hit_enemy(a.facing, b, ctx, fx),
                // Bullets pass through players and each other.
                Kind::Player | Kind::Bullet => false,
            };
            if stopped {
                separate(a, overlap);
                bullet::impact(a);
            }
        }
        Kind::Enemy => separate(a, overlap),
        Kind::Level => {}
    }
}

/// Damage a live enemy. Returns false when it was already dead, in which
/// case the bullet flies on.
fn hit_enemy(
    bullet_facing: f32,
    target: &mut Entity,
    ctx: &TickContext<'_>,
    fx: &mut Effects<'_>,
) -> bool {
    let Entity {
        facing, look, kind, ..
    } = target;
    let EntityKind::Enemy(enemy) = kind else {
        return false;
    };
    if enemy.is_dead() {
        return false;
    }

    *facing = -bullet_facing;
    look.flash();
    look.texture = Texture::EnemyHit;
    if enemy.take_hit(ctx.config.bullet.damage) {
        look.texture = Texture::EnemyDie;
        fx.audio.play(Sound::EnemyDeath);
        log::debug!("Enemy killed");
    } else {
        log::debug!("Enemy staggered, hp {:.0}", enemy.hp);
    }
    fx.audio.play(Sound::EnemyHit);
    true
}
