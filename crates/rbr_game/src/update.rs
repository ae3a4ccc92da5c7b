//! Per-entity tick.
//!
//! Every live entity runs the same six steps once per frame, in order:
//!
//!   1. advance its sprite clip and hit flash
//!   2. apply gravity when dynamic and airborne
//!   3. run its kind's state machine (input, AI, firing, despawn)
//!   4. integrate velocity and position, clamping horizontal speed
//!   5. test collisions against every other entity, probing for ground
//!   6. latch the new grounded flag
//!
//! Collision response may mutate the other entity in place (damage, timers),
//! so `others` is a stream of mutable borrows disjoint from the subject.

use glam::Vec2;
use rand::RngCore;
use rbr_core::{InputState, Rect};

use crate::audio::AudioSink;
use crate::bullet::{self, BulletPool};
use crate::collision;
use crate::config::SimConfig;
use crate::enemy;
use crate::entity::{Entity, Kind};
use crate::player;
use crate::sprite::AnimationLibrary;

/// What the frame loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    Quit,
    PlayerDefeated,
}

impl Flow {
    /// Combine two outcomes; quitting outranks defeat.
    pub fn merge(self, other: Flow) -> Flow {
        match (self, other) {
            (Flow::Quit, _) | (_, Flow::Quit) => Flow::Quit,
            (Flow::PlayerDefeated, _) | (_, Flow::PlayerDefeated) => Flow::PlayerDefeated,
            _ => Flow::Continue,
        }
    }
}

/// Read-only inputs shared by every entity in a tick.
pub struct TickContext<'a> {
    pub dt: f32,
    pub input: &'a InputState,
    /// Camera bounds from the previous frame, world space.
    pub viewport: Rect,
    pub player_pos: Vec2,
    pub config: &'a SimConfig,
    pub animations: &'a AnimationLibrary,
}

/// Side-effect capabilities handed to the update.
pub struct Effects<'a> {
    pub audio: &'a mut dyn AudioSink,
    pub rng: &'a mut dyn RngCore,
    /// Where fired bullets go; `None` while updating the bullets themselves.
    pub bullets: Option<&'a mut BulletPool>,
}

/// Desired horizontal direction and frame-loop signal from a state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intent {
    pub direction: f32,
    pub flow: Flow,
}

impl Intent {
    pub fn steer(direction: f32) -> Self {
        Self {
            direction,
            flow: Flow::Continue,
        }
    }
}

pub fn update_entity<'o, I>(
    subject: &mut Entity,
    others: I,
    ctx: &TickContext<'_>,
    fx: &mut Effects<'_>,
) -> Flow
where
    I: IntoIterator<Item = &'o mut Entity>,
{
    subject.step_presentation(ctx.dt);

    if subject.dynamic && !subject.grounded {
        subject.vel.y += ctx.config.gravity * ctx.dt;
    }

    let intent = match subject.kind() {
        Kind::Player => player::think(subject, ctx, fx),
        Kind::Enemy => Intent::steer(enemy::think(subject, ctx)),
        Kind::Bullet => {
            bullet::think(subject, ctx);
            Intent::default()
        }
        Kind::Level => Intent::default(),
    };

    integrate(subject, intent.direction, ctx.dt);

    // Static tiles never respond to contact.
    if subject.kind() == Kind::Level {
        return intent.flow;
    }

    let mut found_ground = false;
    for other in others {
        collision::detect(subject, other, ctx, fx);
        if collision::probe_ground(subject, other) {
            found_ground = true;
        }
    }

    if found_ground != subject.grounded {
        subject.grounded = found_ground;
        if found_ground {
            if let Some(player) = subject.player_mut() {
                player.land();
            }
        }
    }

    intent.flow
}

/// Semi-implicit Euler step. `direction` scales the acceleration and, when
/// non-zero, becomes the new facing.
pub fn integrate(subject: &mut Entity, direction: f32, dt: f32) {
    if direction != 0.0 {
        subject.facing = direction;
    }
    subject.vel += subject.acc * direction * dt;
    if subject.vel.x.abs() > subject.max_speed_x {
        subject.vel.x = subject.max_speed_x * subject.vel.x.signum();
    }
    subject.pos += subject.vel * dt;
}
