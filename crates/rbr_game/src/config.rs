//! Simulation tuning.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//!
//! ```json
//! { "gravity": 500.0, "enemy": { "stagger_ticks_while_shambling": false } }
//! ```

use rbr_core::Rect;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HitboxConfig {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl HitboxConfig {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub hp: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    /// Idle braking as a multiple of `acceleration`.
    pub idle_deceleration: f32,
    pub weapon_cooldown: f32,
    pub hitbox: HitboxConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            hp: 250.0,
            max_speed: 100.0,
            acceleration: 300.0,
            idle_deceleration: 1.2,
            weapon_cooldown: 0.1,
            hitbox: HitboxConfig {
                x: 11.0,
                y: 6.0,
                w: 10.0,
                h: 26.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub hp: f32,
    pub max_speed: f32,
    pub chase_radius: f32,
    pub chase_acceleration: f32,
    /// Length of the hit-stun window.
    pub stagger_duration: f32,
    /// Minimum time between two contact hits on the player.
    pub contact_cooldown: f32,
    pub contact_damage: f32,
    pub hitbox: HitboxConfig,
    /// When set, the stagger timer keeps running while shambling, so a fresh
    /// hit can end its stagger early.
    pub stagger_ticks_while_shambling: bool,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            hp: 100.0,
            max_speed: 15.0,
            chase_radius: 100.0,
            chase_acceleration: 30.0,
            stagger_duration: 0.5,
            contact_cooldown: 0.7,
            contact_damage: 10.0,
            hitbox: HitboxConfig {
                x: 10.0,
                y: 4.0,
                w: 12.0,
                h: 28.0,
            },
            stagger_ticks_while_shambling: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub base_speed: f32,
    pub max_speed: f32,
    /// Vertical speed is drawn from `[-vertical_spread, vertical_spread)`.
    pub vertical_spread: f32,
    /// Side of the square hitbox, also the sprite frame size.
    pub size: f32,
    pub damage: f32,
    /// Horizontal spawn offset when facing left.
    pub spawn_offset: f32,
    /// Extra horizontal offset when facing right.
    pub spawn_span: f32,
    pub spawn_height: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            base_speed: 600.0,
            max_speed: 1000.0,
            vertical_spread: 25.0,
            size: 8.0,
            damage: 10.0,
            spawn_offset: 4.0,
            spawn_span: 24.0,
            spawn_height: 17.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Downward acceleration, units/s^2 (y grows downward).
    pub gravity: f32,
    /// Vertical velocity added by a jump; negative is up.
    pub jump_impulse: f32,
    pub tile_size: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    pub flash_duration: f32,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub bullet: BulletConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 400.0,
            jump_impulse: -200.0,
            tile_size: 32.0,
            screen_width: 640.0,
            screen_height: 320.0,
            flash_duration: 0.05,
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            bullet: BulletConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("config validation failed: {0}")]
    Invalid(String),
}

pub fn load_config_from_path(path: &Path) -> Result<SimConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SimConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &SimConfig) -> Result<(), ConfigError> {
    let positive = [
        ("tile_size", config.tile_size),
        ("screen_width", config.screen_width),
        ("screen_height", config.screen_height),
        ("flash_duration", config.flash_duration),
        ("player.weapon_cooldown", config.player.weapon_cooldown),
        ("enemy.stagger_duration", config.enemy.stagger_duration),
        ("enemy.contact_cooldown", config.enemy.contact_cooldown),
        ("bullet.size", config.bullet.size),
        ("player.hp", config.player.hp),
        ("enemy.hp", config.enemy.hp),
    ];
    for (name, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::Invalid(format!("{name} must be > 0")));
        }
    }
    let non_negative = [
        ("player.max_speed", config.player.max_speed),
        ("enemy.max_speed", config.enemy.max_speed),
        ("bullet.max_speed", config.bullet.max_speed),
        ("bullet.vertical_spread", config.bullet.vertical_spread),
    ];
    for (name, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Invalid(format!("{name} must be >= 0")));
        }
    }
    if !(2.0 * config.bullet.vertical_spread).is_finite() {
        return Err(ConfigError::Invalid(
            "bullet.vertical_spread is too large".to_string(),
        ));
    }
    Ok(())
}
