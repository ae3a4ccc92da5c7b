use glam::Vec2;
use rbr_core::{Key, Timer};

use crate::bullet;
use crate::config::SimConfig;
use crate::entity::{Entity, EntityKind, Look, Texture};
use crate::sprite::{AnimationLibrary, PlayerClip, Sprite};
use crate::update::{Effects, Flow, Intent, TickContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Running,
    Jumping,
}

impl PlayerState {
    pub fn label(self) -> &'static str {
        match self {
            PlayerState::Idle => "Idle",
            PlayerState::Running => "Running",
            PlayerState::Jumping => "Jumping",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub hp: f32,
    pub hp_max: f32,
    pub state: PlayerState,
    pub weapon: Timer,
    pub sprite: Sprite<PlayerClip>,
}

impl Player {
    /// HP as a display fraction in [0, 1].
    pub fn hp_fraction(&self) -> f32 {
        if self.hp_max <= 0.0 {
            return 0.0;
        }
        (self.hp / self.hp_max).clamp(0.0, 1.0)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0.0
    }

    /// Touching ground ends a jump. Other states are left alone.
    pub(crate) fn land(&mut self) {
        if self.state == PlayerState::Jumping {
            self.state = PlayerState::Running;
        }
    }

    /// Start a jump from Idle or Running. Returns whether the jump happened.
    pub(crate) fn try_jump(&mut self, vel: &mut Vec2, impulse: f32) -> bool {
        match self.state {
            PlayerState::Idle | PlayerState::Running => {
                vel.y += impulse;
                self.state = PlayerState::Jumping;
                true
            }
            PlayerState::Jumping => false,
        }
    }
}

impl Entity {
    pub fn new_player(pos: Vec2, config: &SimConfig, animations: &AnimationLibrary) -> Self {
        let tuning = &config.player;
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::new(tuning.acceleration, 0.0),
            hitbox: tuning.hitbox.rect(),
            facing: 1.0,
            max_speed_x: tuning.max_speed,
            dynamic: true,
            grounded: false,
            look: Look::new(Texture::PlayerIdle, config.flash_duration),
            kind: EntityKind::Player(Player {
                hp: tuning.hp,
                hp_max: tuning.hp,
                state: PlayerState::Idle,
                weapon: Timer::new(tuning.weapon_cooldown),
                sprite: animations.sprite(Some(PlayerClip::Idle)),
            }),
        }
    }
}

/// Pose the sprite is drawn in; each has a plain and a firing variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stance {
    Standing,
    Running,
    Sliding,
}

impl Stance {
    fn plain(self) -> (Texture, PlayerClip) {
        match self {
            Stance::Standing => (Texture::PlayerIdle, PlayerClip::Idle),
            Stance::Running => (Texture::PlayerRun, PlayerClip::Running),
            Stance::Sliding => (Texture::PlayerSlide, PlayerClip::Sliding),
        }
    }

    fn firing(self) -> (Texture, PlayerClip) {
        match self {
            Stance::Standing => (Texture::PlayerShoot, PlayerClip::Shooting),
            // The run sheet's firing variant keeps the running cadence.
            Stance::Running => (Texture::PlayerRunShoot, PlayerClip::Running),
            Stance::Sliding => (Texture::PlayerSlideShoot, PlayerClip::SlideShooting),
        }
    }
}

pub(crate) fn think(subject: &mut Entity, ctx: &TickContext<'_>, fx: &mut Effects<'_>) -> Intent {
    let input = ctx.input;
    let flow = if input.is_held(Key::Quit) {
        Flow::Quit
    } else {
        Flow::Continue
    };
    let direction = input.horizontal_axis();

    let Entity {
        pos,
        vel,
        acc,
        facing,
        grounded,
        look,
        kind,
        ..
    } = subject;
    let EntityKind::Player(player) = kind else {
        return Intent::default();
    };

    player.weapon.step(ctx.dt);

    let stance = match player.state {
        PlayerState::Idle => {
            if direction != 0.0 {
                player.state = PlayerState::Running;
            } else if vel.x != 0.0 {
                // Brake toward zero without overshooting.
                let amount =
                    -vel.x.signum() * ctx.config.player.idle_deceleration * acc.x * ctx.dt;
                if amount.abs() > vel.x.abs() {
                    vel.x = 0.0;
                } else {
                    vel.x += amount;
                }
            }
            Stance::Standing
        }
        PlayerState::Running => {
            if direction == 0.0 {
                player.state = PlayerState::Idle;
            }
            if vel.x * *facing < 0.0 && *grounded {
                Stance::Sliding
            } else {
                Stance::Running
            }
        }
        PlayerState::Jumping => Stance::Running,
    };

    if input.is_held(Key::Fire) {
        let (texture, clip) = stance.firing();
        look.texture = texture;
        player.sprite.play(clip);
        if player.weapon.is_timed_out() {
            player.weapon.reset();
            bullet::fire(*pos, vel.x, *facing, ctx, fx);
        }
    } else {
        let (texture, clip) = stance.plain();
        look.texture = texture;
        player.sprite.play(clip);
    }

    Intent { direction, flow }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Sound;
    use crate::bullet::BulletPool;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rbr_core::{InputState, Rect};

    fn think_once(
        player: &mut Entity,
        input: &InputState,
        dt: f32,
        pool: &mut BulletPool,
        audio: &mut Vec<Sound>,
    ) -> Intent {
        let config = SimConfig::default();
        let animations = AnimationLibrary::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let ctx = TickContext {
            dt,
            input,
            viewport: Rect::new(0.0, 0.0, 640.0, 320.0),
            player_pos: player.pos,
            config: &config,
            animations: &animations,
        };
        let mut fx = Effects {
            audio,
            rng: &mut rng,
            bullets: Some(pool),
        };
        think(player, &ctx, &mut fx)
    }

    fn fresh_player() -> Entity {
        Entity::new_player(
            Vec2::new(100.0, 100.0),
            &SimConfig::default(),
            &AnimationLibrary::builtin(),
        )
    }

    fn state_of(player: &Entity) -> Option<PlayerState> {
        player.player().map(|p| p.state)
    }

    #[test]
    fn movement_input_starts_running() {
        let mut player = fresh_player();
        let mut input = InputState::new();
        input.key_down(Key::MoveLeft);
        let intent = think_once(&mut player, &input, 0.016, &mut BulletPool::new(), &mut Vec::new());
        assert_eq!(intent.direction, -1.0);
        assert_eq!(state_of(&player), Some(PlayerState::Running));
    }

    #[test]
    fn idle_brakes_without_overshoot() {
        let mut player = fresh_player();
        let input = InputState::new();
        player.vel.x = 50.0;
        // 1.2 * 300 * 0.1 = 36
        think_once(&mut player, &input, 0.1, &mut BulletPool::new(), &mut Vec::new());
        assert!((player.vel.x - 14.0).abs() < 1e-4);
        think_once(&mut player, &input, 0.1, &mut BulletPool::new(), &mut Vec::new());
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn running_without_input_returns_to_idle() {
        let mut player = fresh_player();
        if let Some(p) = player.player_mut() {
            p.state = PlayerState::Running;
        }
        think_once(&mut player, &InputState::new(), 0.016, &mut BulletPool::new(), &mut Vec::new());
        assert_eq!(state_of(&player), Some(PlayerState::Idle));
    }

    #[test]
    fn reversing_on_ground_slides() {
        let mut player = fresh_player();
        if let Some(p) = player.player_mut() {
            p.state = PlayerState::Running;
        }
        player.grounded = true;
        player.facing = -1.0;
        player.vel.x = 80.0;
        let mut input = InputState::new();
        input.key_down(Key::MoveLeft);
        think_once(&mut player, &input, 0.016, &mut BulletPool::new(), &mut Vec::new());
        assert_eq!(player.look.texture, Texture::PlayerSlide);

        input.key_down(Key::Fire);
        think_once(&mut player, &input, 0.016, &mut BulletPool::new(), &mut Vec::new());
        assert_eq!(player.look.texture, Texture::PlayerSlideShoot);
        assert_eq!(
            player.player().and_then(|p| p.sprite.active()),
            Some(PlayerClip::SlideShooting)
        );
    }

    #[test]
    fn fire_waits_for_cooldown_then_spawns_and_plays_sound() {
        let mut player = fresh_player();
        let mut input = InputState::new();
        input.key_down(Key::Fire);
        let mut pool = BulletPool::new();
        let mut audio = Vec::new();

        think_once(&mut player, &input, 0.05, &mut pool, &mut audio);
        assert_eq!(player.look.texture, Texture::PlayerShoot);
        assert_eq!(pool.len(), 0, "cooldown has not elapsed");

        think_once(&mut player, &input, 0.06, &mut pool, &mut audio);
        assert_eq!(pool.len(), 1);
        assert_eq!(audio, vec![Sound::Shoot]);

        think_once(&mut player, &input, 0.05, &mut pool, &mut audio);
        assert_eq!(pool.len(), 1, "cooldown restarted after firing");
    }

    #[test]
    fn jump_only_from_ground_states() {
        let mut player = fresh_player();
        let impulse = SimConfig::default().jump_impulse;
        let Entity { vel, kind, .. } = &mut player;
        let EntityKind::Player(data) = kind else {
            panic!("expected player payload");
        };
        assert!(data.try_jump(vel, impulse));
        assert_eq!(data.state, PlayerState::Jumping);
        assert!(!data.try_jump(vel, impulse));
        assert_eq!(vel.y, -200.0);
    }

    #[test]
    fn hp_fraction_is_clamped() {
        let mut player = fresh_player();
        if let Some(p) = player.player_mut() {
            p.hp = -30.0;
            assert_eq!(p.hp_fraction(), 0.0);
            assert!(p.is_defeated());
            p.hp = 125.0;
            assert!((p.hp_fraction() - 0.5).abs() < 1e-6);
        }
    }
}
