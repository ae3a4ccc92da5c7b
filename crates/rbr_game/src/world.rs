use glam::Vec2;
use rand::RngCore;
use rbr_core::{InputState, Key};
use rbr_render::Viewport;

use crate::audio::AudioSink;
use crate::bullet::BulletPool;
use crate::config::SimConfig;
use crate::entity::{Entity, EntityKind, Texture};
use crate::level::{LevelGrids, TileCode};
use crate::player::{Player, PlayerState};
use crate::sprite::AnimationLibrary;
use crate::update::{update_entity, Effects, Flow, TickContext};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("level has no player tile")]
    MissingPlayer,
    #[error("level has a second player tile in {layer} at ({row}, {col})")]
    DuplicatePlayer {
        layer: &'static str,
        row: usize,
        col: usize,
    },
    #[error("unknown tile code {code} in {layer} at ({row}, {col})")]
    UnknownTile {
        layer: &'static str,
        row: usize,
        col: usize,
        code: u8,
    },
}

/// Live simulation state for one run of a level.
pub struct World {
    /// Static solid tiles.
    pub level: Vec<Entity>,
    /// Player and enemies.
    pub characters: Vec<Entity>,
    pub bullets: BulletPool,
    pub background: Vec<Entity>,
    pub foreground: Vec<Entity>,
    pub viewport: Viewport,
    player_idx: usize,
    config: SimConfig,
    animations: AnimationLibrary,
}

impl World {
    /// Instantiate entities from the grids. Exactly one player tile must exist
    /// across all three grids.
    pub fn populate(
        grids: &LevelGrids,
        config: SimConfig,
        animations: AnimationLibrary,
    ) -> Result<Self, WorldError> {
        let tile = config.tile_size;
        let flash = config.flash_duration;
        let mut level = Vec::new();
        let mut characters = Vec::new();
        let mut background = Vec::new();
        let mut foreground = Vec::new();
        let mut player_idx = None;

        for (layer, grid) in grids.layers() {
            let rows = grid.len();
            for (r, row) in grid.iter().enumerate() {
                for (c, &code) in row.iter().enumerate() {
                    let pos = Vec2::new(
                        c as f32 * tile,
                        config.screen_height - (rows - r) as f32 * tile,
                    );
                    let tile_code = TileCode::from_code(code).ok_or(WorldError::UnknownTile {
                        layer,
                        row: r,
                        col: c,
                        code,
                    })?;
                    match tile_code {
                        TileCode::Empty => {}
                        TileCode::Ground => {
                            level.push(Entity::tile(Texture::Ground, pos, tile, flash))
                        }
                        TileCode::Panel => {
                            level.push(Entity::tile(Texture::Panel, pos, tile, flash))
                        }
                        TileCode::Enemy => {
                            characters.push(Entity::new_enemy(pos, &config, &animations))
                        }
                        TileCode::Player => {
                            if player_idx.is_some() {
                                return Err(WorldError::DuplicatePlayer {
                                    layer,
                                    row: r,
                                    col: c,
                                });
                            }
                            characters.push(Entity::new_player(pos, &config, &animations));
                            player_idx = Some(characters.len() - 1);
                        }
                        TileCode::Grass => {
                            foreground.push(Entity::tile(Texture::Grass, pos, tile, flash))
                        }
                        TileCode::Brick => {
                            background.push(Entity::tile(Texture::Brick, pos, tile, flash))
                        }
                    }
                }
            }
        }

        let player_idx = player_idx.ok_or(WorldError::MissingPlayer)?;
        log::info!(
            "World '{}' populated: {} level tiles, {} characters, {} background, {} foreground",
            grids.level_id,
            level.len(),
            characters.len(),
            background.len(),
            foreground.len()
        );

        let mut viewport = Viewport::new(config.screen_width, config.screen_height);
        viewport.follow(characters[player_idx].pos.x, tile);

        Ok(Self {
            level,
            characters,
            bullets: BulletPool::new(),
            background,
            foreground,
            viewport,
            player_idx,
            config,
            animations,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player(&self) -> &Entity {
        &self.characters[self.player_idx]
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.characters[self.player_idx]
    }

    pub fn player_data(&self) -> Option<&Player> {
        self.player().player()
    }

    pub fn player_state(&self) -> Option<PlayerState> {
        self.player_data().map(|p| p.state)
    }

    /// Discrete key events. Only a jump press acts on the simulation.
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if key != Key::Jump || !pressed {
            return;
        }
        let impulse = self.config.jump_impulse;
        let Entity { vel, kind, .. } = self.player_mut();
        if let EntityKind::Player(player) = kind {
            player.try_jump(vel, impulse);
        }
    }

    /// Advance one frame: characters, then bullets, each in stable index
    /// order; then the camera and the post-frame landing rule.
    pub fn step(
        &mut self,
        dt: f32,
        input: &InputState,
        audio: &mut dyn AudioSink,
        rng: &mut dyn RngCore,
    ) -> Flow {
        let World {
            level,
            characters,
            bullets,
            viewport,
            player_idx,
            config,
            animations,
            ..
        } = self;
        let player_idx = *player_idx;
        let view = viewport.rect();
        let mut flow = Flow::Continue;

        for i in 0..characters.len() {
            let player_pos = characters[player_idx].pos;
            let (before, rest) = characters.split_at_mut(i);
            let Some((subject, after)) = rest.split_first_mut() else {
                break;
            };
            let ctx = TickContext {
                dt,
                input,
                viewport: view,
                player_pos,
                config,
                animations,
            };
            let mut fx = Effects {
                audio: &mut *audio,
                rng: &mut *rng,
                bullets: Some(&mut *bullets),
            };
            let others = level
                .iter_mut()
                .chain(before.iter_mut())
                .chain(after.iter_mut());
            flow = flow.merge(update_entity(subject, others, &ctx, &mut fx));
        }

        let player_pos = characters[player_idx].pos;
        for bullet in bullets.iter_mut() {
            if bullet.is_idle_bullet() {
                continue;
            }
            let ctx = TickContext {
                dt,
                input,
                viewport: view,
                player_pos,
                config,
                animations,
            };
            let mut fx = Effects {
                audio: &mut *audio,
                rng: &mut *rng,
                bullets: None,
            };
            let others = level.iter_mut().chain(characters.iter_mut());
            update_entity(bullet, others, &ctx, &mut fx);
        }

        let player = &mut characters[player_idx];
        viewport.follow(player.pos.x, config.tile_size);

        let grounded = player.grounded;
        if let Some(data) = player.player_mut() {
            if data.state == PlayerState::Jumping && grounded {
                data.state = PlayerState::Idle;
            }
            if data.is_defeated() {
                flow = flow.merge(Flow::PlayerDefeated);
            }
        }

        flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Sound;
    use crate::bullet::BulletState;
    use crate::level::LevelGrids;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rbr_devtools::DebugOverlay;

    fn grids(main: &[&[u8]], background: &[&[u8]], foreground: &[&[u8]]) -> LevelGrids {
        let to_vec = |rows: &[&[u8]]| rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>();
        LevelGrids {
            version: "0.1".to_string(),
            level_id: "test".to_string(),
            rows: main.len(),
            cols: main.first().map_or(0, |r| r.len()),
            main: to_vec(main),
            background: to_vec(background),
            foreground: to_vec(foreground),
        }
    }

    fn populate(level: &LevelGrids) -> Result<World, WorldError> {
        World::populate(level, SimConfig::default(), AnimationLibrary::builtin())
    }

    #[test]
    fn builtin_level_populates_layers() {
        let world = populate(&LevelGrids::builtin()).expect("builtin level populates");
        assert_eq!(world.level.len(), 97);
        assert_eq!(world.characters.len(), 19);
        assert_eq!(world.background.len(), 23);
        assert_eq!(world.foreground.len(), 42);
        assert!(world.bullets.is_empty());

        let player = world.player();
        assert!(player.player().is_some());
        assert_eq!(player.pos, Vec2::new(32.0, 160.0));
        assert!((world.viewport.position.x - (32.0 + 16.0 - 320.0)).abs() < 1e-5);
    }

    #[test]
    fn tile_positions_anchor_grid_to_screen_bottom() {
        let level = grids(&[&[0, 0], &[4, 1]], &[&[0, 0], &[0, 0]], &[&[6, 0], &[0, 0]]);
        let world = populate(&level).expect("populates");
        assert_eq!(world.player().pos, Vec2::new(0.0, 288.0));
        assert_eq!(world.level[0].pos, Vec2::new(32.0, 288.0));
        assert_eq!(world.background[0].pos, Vec2::new(0.0, 256.0));
    }

    #[test]
    fn codes_apply_in_every_grid() {
        // A player placed in the foreground grid is still the player.
        let level = grids(&[&[1, 1]], &[&[0, 0]], &[&[0, 4]]);
        let world = populate(&level).expect("populates");
        assert_eq!(world.characters.len(), 1);
        assert_eq!(world.player().pos.x, 32.0);
    }

    #[test]
    fn missing_player_fails() {
        let level = grids(&[&[1, 3, 2]], &[&[0, 6, 0]], &[&[5, 0, 0]]);
        assert_eq!(populate(&level).err(), Some(WorldError::MissingPlayer));
    }

    #[test]
    fn duplicate_player_fails() {
        let level = grids(&[&[4, 0]], &[&[0, 4]], &[&[0, 0]]);
        assert_eq!(
            populate(&level).err(),
            Some(WorldError::DuplicatePlayer {
                layer: "background",
                row: 0,
                col: 1
            })
        );
    }

    #[test]
    fn unknown_code_fails() {
        let level = grids(&[&[4, 8]], &[&[0, 0]], &[&[0, 0]]);
        assert!(matches!(
            populate(&level).err(),
            Some(WorldError::UnknownTile { code: 8, .. })
        ));
    }

    #[test]
    fn jump_press_from_ground_states_only() {
        let mut world = populate(&LevelGrids::builtin()).expect("populates");
        world.handle_key(Key::Jump, false);
        assert_eq!(world.player_state(), Some(PlayerState::Idle));

        world.handle_key(Key::Jump, true);
        assert_eq!(world.player_state(), Some(PlayerState::Jumping));
        assert_eq!(world.player().vel.y, -200.0);

        world.handle_key(Key::Jump, true);
        assert_eq!(world.player().vel.y, -200.0, "no double jump");
    }

    #[test]
    fn jumping_and_grounded_becomes_idle_after_step() {
        let level = grids(&[&[4], &[1]], &[&[0], &[0]], &[&[0], &[0]]);
        let mut world = populate(&level).expect("populates");
        let mut input = InputState::new();
        let mut audio: Vec<Sound> = Vec::new();
        let mut rng = StdRng::seed_from_u64(5);

        // Settle onto the floor.
        for _ in 0..5 {
            world.step(0.016, &input, &mut audio, &mut rng);
        }
        assert!(world.player().grounded);

        // Mid-air state while the probe still touches the floor.
        if let Some(p) = world.player_mut().player_mut() {
            p.state = PlayerState::Jumping;
        }
        input.end_frame();
        world.step(0.0, &input, &mut audio, &mut rng);
        assert_eq!(world.player_state(), Some(PlayerState::Idle));
    }

    #[test]
    fn defeated_player_is_reported() {
        let level = grids(&[&[4], &[1]], &[&[0], &[0]], &[&[0], &[0]]);
        let mut world = populate(&level).expect("populates");
        if let Some(p) = world.player_mut().player_mut() {
            p.hp = 0.0;
        }
        let flow = world.step(
            0.016,
            &InputState::new(),
            &mut Vec::<Sound>::new(),
            &mut StdRng::seed_from_u64(0),
        );
        assert_eq!(flow, Flow::PlayerDefeated);
    }

    #[test]
    fn idle_bullet_is_neither_collided_nor_drawn() {
        // Enemy 160px from the player, outside the chase radius.
        let level = grids(
            &[&[4, 0, 0, 0, 0, 3], &[1, 1, 1, 1, 1, 1]],
            &[&[0; 6], &[0; 6]],
            &[&[0; 6], &[0; 6]],
        );
        let mut world = populate(&level).expect("populates");
        let enemy_idx = world
            .characters
            .iter()
            .position(|e| e.enemy().is_some())
            .expect("enemy present");
        let target = world.characters[enemy_idx].world_hitbox();

        let mut bullet = Entity::new_bullet(
            Vec2::new(target.x, target.y),
            Vec2::new(600.0, 0.0),
            1.0,
            world.config(),
            &AnimationLibrary::builtin(),
        );
        if let Some(data) = bullet.bullet_mut() {
            data.state = BulletState::Idle;
        }
        let slot = world.bullets.spawn(bullet);

        let mut audio: Vec<Sound> = Vec::new();
        let mut rng = StdRng::seed_from_u64(2);
        world.step(0.016, &InputState::new(), &mut audio, &mut rng);

        assert_eq!(world.characters[enemy_idx].enemy().map(|e| e.hp), Some(100.0));
        assert!(audio.is_empty(), "unexpected sounds {audio:?}");
        let parked = world.bullets.get(slot).expect("slot kept");
        assert!(parked.is_idle_bullet());
        assert_eq!(parked.pos, Vec2::new(target.x, target.y));

        let list = world.draw_list(&DebugOverlay::new());
        assert_eq!(list.count_texture("bullet.png"), 0);
        assert_eq!(list.count_texture("enemy.png"), 1);
    }
}
