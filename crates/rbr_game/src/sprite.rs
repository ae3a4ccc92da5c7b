//! Typed animation clips and per-entity sprite state.
//!
//! Each animated kind has its own clip enum, so a player can never be asked to
//! play an enemy clip. Clip timings come from animation sheets when available
//! and fall back to built-in values otherwise.

use rbr_core::animation::{Animation, AnimationSheet, AnimationSpec};
use std::collections::HashMap;
use std::fmt::Debug;

pub trait Clip: Copy + Eq + Debug + 'static {
    /// `animation_id` of the sheet that carries this kind's timings.
    const SHEET: &'static str;
    const ALL: &'static [Self];

    fn index(self) -> usize;
    fn name(self) -> &'static str;
    fn default_spec(self) -> AnimationSpec;
    fn specs(library: &AnimationLibrary) -> &[AnimationSpec];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerClip {
    Idle,
    Running,
    Sliding,
    Shooting,
    SlideShooting,
}

impl Clip for PlayerClip {
    const SHEET: &'static str = "player";
    const ALL: &'static [Self] = &[
        PlayerClip::Idle,
        PlayerClip::Running,
        PlayerClip::Sliding,
        PlayerClip::Shooting,
        PlayerClip::SlideShooting,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            PlayerClip::Idle => "idle",
            PlayerClip::Running => "running",
            PlayerClip::Sliding => "sliding",
            PlayerClip::Shooting => "shooting",
            PlayerClip::SlideShooting => "slide_shooting",
        }
    }

    fn default_spec(self) -> AnimationSpec {
        match self {
            PlayerClip::Idle => AnimationSpec::new(8, 1.6),
            PlayerClip::Running => AnimationSpec::new(4, 0.5),
            PlayerClip::Sliding => AnimationSpec::new(1, 1.0),
            PlayerClip::Shooting => AnimationSpec::new(4, 0.5),
            PlayerClip::SlideShooting => AnimationSpec::new(4, 0.5),
        }
    }

    fn specs(library: &AnimationLibrary) -> &[AnimationSpec] {
        &library.player
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyClip {
    Walk,
    Damaged,
    Dying,
}

impl Clip for EnemyClip {
    const SHEET: &'static str = "enemy";
    const ALL: &'static [Self] = &[EnemyClip::Walk, EnemyClip::Damaged, EnemyClip::Dying];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            EnemyClip::Walk => "walk",
            EnemyClip::Damaged => "damaged",
            EnemyClip::Dying => "dying",
        }
    }

    fn default_spec(self) -> AnimationSpec {
        match self {
            EnemyClip::Walk => AnimationSpec::new(8, 1.0),
            EnemyClip::Damaged => AnimationSpec::new(8, 1.0),
            EnemyClip::Dying => AnimationSpec::new(18, 2.0),
        }
    }

    fn specs(library: &AnimationLibrary) -> &[AnimationSpec] {
        &library.enemy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletClip {
    Moving,
    Impact,
}

impl Clip for BulletClip {
    const SHEET: &'static str = "bullet";
    const ALL: &'static [Self] = &[BulletClip::Moving, BulletClip::Impact];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            BulletClip::Moving => "moving",
            BulletClip::Impact => "impact",
        }
    }

    fn default_spec(self) -> AnimationSpec {
        match self {
            BulletClip::Moving => AnimationSpec::new(4, 0.05),
            BulletClip::Impact => AnimationSpec::new(4, 0.15),
        }
    }

    fn specs(library: &AnimationLibrary) -> &[AnimationSpec] {
        &library.bullet
    }
}

/// Resolved clip timings for every animated kind.
#[derive(Debug, Clone)]
pub struct AnimationLibrary {
    player: Vec<AnimationSpec>,
    enemy: Vec<AnimationSpec>,
    bullet: Vec<AnimationSpec>,
}

impl AnimationLibrary {
    pub fn builtin() -> Self {
        Self::from_sheets(&[])
    }

    /// Resolve timings from loaded sheets, matched by `animation_id`.
    pub fn from_sheets(sheets: &[AnimationSheet]) -> Self {
        let by_id: HashMap<&str, &AnimationSheet> = sheets
            .iter()
            .map(|sheet| (sheet.animation_id.as_str(), sheet))
            .collect();
        Self {
            player: resolve::<PlayerClip>(by_id.get(PlayerClip::SHEET).copied()),
            enemy: resolve::<EnemyClip>(by_id.get(EnemyClip::SHEET).copied()),
            bullet: resolve::<BulletClip>(by_id.get(BulletClip::SHEET).copied()),
        }
    }

    pub fn spec<C: Clip>(&self, clip: C) -> AnimationSpec {
        C::specs(self)
            .get(clip.index())
            .copied()
            .unwrap_or_else(|| clip.default_spec())
    }

    pub fn sprite<C: Clip>(&self, initial: Option<C>) -> Sprite<C> {
        Sprite::new(C::specs(self), initial)
    }
}

impl Default for AnimationLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

fn resolve<C: Clip>(sheet: Option<&AnimationSheet>) -> Vec<AnimationSpec> {
    C::ALL
        .iter()
        .map(|clip| match sheet.and_then(|s| s.clip(clip.name())) {
            Some(spec) => spec,
            None => {
                if sheet.is_some() {
                    log::warn!(
                        "Animation sheet '{}' has no clip '{}', using built-in timing",
                        C::SHEET,
                        clip.name()
                    );
                }
                clip.default_spec()
            }
        })
        .collect()
}

/// One animation per clip plus the clip currently playing.
///
/// Switching clips keeps each clip's own phase; nothing is reset on `play`.
#[derive(Debug, Clone)]
pub struct Sprite<C: Clip> {
    animations: Vec<Animation>,
    active: Option<C>,
    still_frame: u32,
}

impl<C: Clip> Sprite<C> {
    fn new(specs: &[AnimationSpec], initial: Option<C>) -> Self {
        let animations = C::ALL
            .iter()
            .map(|clip| {
                let spec = specs
                    .get(clip.index())
                    .copied()
                    .unwrap_or_else(|| clip.default_spec());
                Animation::from_spec(spec)
            })
            .collect();
        Self {
            animations,
            active: initial,
            still_frame: 0,
        }
    }

    pub fn play(&mut self, clip: C) {
        self.active = Some(clip);
    }

    pub fn active(&self) -> Option<C> {
        self.active
    }

    pub fn animation(&self, clip: C) -> Option<&Animation> {
        self.animations.get(clip.index())
    }

    pub fn step(&mut self, dt: f32) {
        if let Some(clip) = self.active {
            if let Some(animation) = self.animations.get_mut(clip.index()) {
                animation.step(dt);
            }
        }
    }

    /// Whether the active clip has completed at least one cycle.
    pub fn is_done(&self) -> bool {
        self.active
            .and_then(|clip| self.animation(clip))
            .map_or(false, Animation::done)
    }

    /// Stop animating and hold the last frame of `clip`.
    pub fn freeze_on_last_frame(&mut self, clip: C) {
        let frame_count = self.animation(clip).map_or(1, Animation::frame_count);
        self.still_frame = frame_count.saturating_sub(1);
        self.active = None;
    }

    pub fn frame_index(&self) -> u32 {
        match self.active.and_then(|clip| self.animation(clip)) {
            Some(animation) => animation.current_frame(),
            None => self.still_frame,
        }
    }
}
