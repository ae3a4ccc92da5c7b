use rand::RngCore;
use rbr_core::{InputState, Key};
use rbr_devtools::DebugOverlay;
use rbr_render::Backdrop;

use crate::audio::AudioSink;
use crate::config::SimConfig;
use crate::level::LevelGrids;
use crate::sprite::AnimationLibrary;
use crate::update::Flow;
use crate::world::{World, WorldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Game,
}

/// Everything a running game owns. Passed explicitly to whatever drives it.
pub struct App {
    pub mode: Mode,
    pub config: SimConfig,
    pub animations: AnimationLibrary,
    pub level: LevelGrids,
    pub overlay: DebugOverlay,
    pub backdrop: Backdrop,
    input: InputState,
    world: Option<World>,
}

impl App {
    pub fn new(config: SimConfig, animations: AnimationLibrary, level: LevelGrids) -> Self {
        let backdrop = Backdrop::new(config.screen_width, config.screen_height);
        Self {
            mode: Mode::Menu,
            config,
            animations,
            level,
            overlay: DebugOverlay::new(),
            backdrop,
            input: InputState::new(),
            world: None,
        }
    }

    /// Populate a fresh world from the level and switch to game mode.
    pub fn start_game(&mut self) -> Result<(), WorldError> {
        let world = World::populate(&self.level, self.config.clone(), self.animations.clone())?;
        self.world = Some(world);
        self.backdrop = Backdrop::new(self.config.screen_width, self.config.screen_height);
        self.mode = Mode::Game;
        log::info!("Game started on level '{}'", self.level.level_id);
        Ok(())
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Key edge from the platform. Repeats of an already held key are ignored.
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        let edge = if pressed {
            self.input.key_down(key)
        } else {
            self.input.key_up(key)
        };
        if !edge {
            return;
        }

        if key == Key::DebugToggle && !pressed {
            self.overlay.toggle();
        }
        if self.mode == Mode::Game {
            if let Some(world) = self.world.as_mut() {
                world.handle_key(key, pressed);
            }
        }
    }

    /// One frame. In game mode the world steps and the backdrop scrolls with
    /// the player; defeat drops back to the menu.
    pub fn tick(&mut self, dt: f32, audio: &mut dyn AudioSink, rng: &mut dyn RngCore) -> Flow {
        let flow = match (self.mode, self.world.as_mut()) {
            (Mode::Game, Some(world)) => {
                let flow = world.step(dt, &self.input, audio, rng);
                self.backdrop.advance(world.player().vel.x, dt);
                flow
            }
            _ if self.input.is_held(Key::Quit) => Flow::Quit,
            _ => Flow::Continue,
        };
        self.input.end_frame();

        match flow {
            Flow::PlayerDefeated => {
                log::info!("Player defeated, returning to menu");
                self.mode = Mode::Menu;
            }
            Flow::Quit => log::info!("Quit requested"),
            Flow::Continue => {}
        }
        flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Sound;
    use crate::player::PlayerState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn app() -> App {
        App::new(
            SimConfig::default(),
            AnimationLibrary::builtin(),
            LevelGrids::builtin(),
        )
    }

    fn tick(app: &mut App) -> Flow {
        let mut audio: Vec<Sound> = Vec::new();
        let mut rng = StdRng::seed_from_u64(11);
        app.tick(1.0 / 60.0, &mut audio, &mut rng)
    }

    #[test]
    fn starts_in_menu_without_a_world() {
        let mut app = app();
        assert_eq!(app.mode, Mode::Menu);
        assert!(app.world().is_none());
        assert_eq!(tick(&mut app), Flow::Continue);
    }

    #[test]
    fn start_game_populates_world() {
        let mut app = app();
        app.start_game().expect("builtin level starts");
        assert_eq!(app.mode, Mode::Game);
        assert!(app.world().is_some());
    }

    #[test]
    fn start_game_fails_without_player() {
        let mut app = app();
        app.level.main[0][1] = 0;
        assert_eq!(app.start_game(), Err(WorldError::MissingPlayer));
        assert_eq!(app.mode, Mode::Menu);
    }

    #[test]
    fn debug_toggle_acts_on_release() {
        let mut app = app();
        app.handle_key(Key::DebugToggle, true);
        assert!(!app.overlay.visible);
        app.handle_key(Key::DebugToggle, false);
        assert!(app.overlay.visible);
        // A stray release with the key already up is not an edge.
        app.handle_key(Key::DebugToggle, false);
        assert!(app.overlay.visible);
    }

    #[test]
    fn jump_is_forwarded_only_in_game_mode() {
        let mut app = app();
        app.start_game().expect("starts");
        app.mode = Mode::Menu;
        app.handle_key(Key::Jump, true);
        let state = app.world().and_then(|w| w.player_state());
        assert_eq!(state, Some(PlayerState::Idle));

        app.handle_key(Key::Jump, false);
        app.mode = Mode::Game;
        app.handle_key(Key::Jump, true);
        let state = app.world().and_then(|w| w.player_state());
        assert_eq!(state, Some(PlayerState::Jumping));
    }

    #[test]
    fn defeat_returns_to_menu() {
        let mut app = app();
        app.start_game().expect("starts");
        if let Some(p) = app.world_mut().and_then(|w| w.player_mut().player_mut()) {
            p.hp = 0.0;
        }
        assert_eq!(tick(&mut app), Flow::PlayerDefeated);
        assert_eq!(app.mode, Mode::Menu);
    }

    #[test]
    fn quit_is_propagated() {
        let mut app = app();
        app.start_game().expect("starts");
        app.handle_key(Key::Quit, true);
        assert_eq!(tick(&mut app), Flow::Quit);
        assert_eq!(app.mode, Mode::Game);
    }

    #[test]
    fn edges_last_one_tick() {
        let mut app = app();
        app.start_game().expect("starts");
        app.handle_key(Key::Fire, true);
        assert!(app.input().is_just_pressed(Key::Fire));
        tick(&mut app);
        assert!(!app.input().is_just_pressed(Key::Fire));
        assert!(app.input().is_held(Key::Fire));
    }
}
