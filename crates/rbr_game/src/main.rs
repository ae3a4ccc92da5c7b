use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rbr_core::animation::load_animation_sheet;
use rbr_core::TimeState;

use rbr_game::config::load_config_from_path;
use rbr_game::level::load_level_from_path;
use rbr_game::replay::{default_replay, load_replay_from_path};
use rbr_game::{logging, AnimationLibrary, App, Flow, LevelGrids, LogAudio, Mode, SimConfig};

/// Headless runner: plays a replay against a level and logs what happened.
#[derive(Debug, Parser)]
#[command(name = "rbr_game", version)]
struct Args {
    /// Level JSON; the built-in level when omitted.
    #[arg(long)]
    level: Option<PathBuf>,

    /// Simulation tuning JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Animation sheet JSON (repeatable).
    #[arg(long)]
    animations: Vec<PathBuf>,

    /// Replay JSON driving the input.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Seed for bullet spread.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    log::info!("Rustbelt Runner starting...");

    let config = match &args.config {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    let level = match &args.level {
        Some(path) => load_level_from_path(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => LevelGrids::builtin(),
    };
    let sheets = args
        .animations
        .iter()
        .map(|path| {
            load_animation_sheet(path)
                .with_context(|| format!("loading animation sheet {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let animations = if sheets.is_empty() {
        AnimationLibrary::builtin()
    } else {
        AnimationLibrary::from_sheets(&sheets)
    };
    let replay = match &args.replay {
        Some(path) => load_replay_from_path(path)
            .with_context(|| format!("loading replay {}", path.display()))?,
        None => default_replay(),
    };

    let mut app = App::new(config, animations, level);
    app.start_game().context("populating world")?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut audio = LogAudio::default();
    let mut time = TimeState::new();
    let mut outcome = Flow::Continue;

    for events in replay.key_events() {
        for event in events {
            app.handle_key(event.key, event.pressed);
        }
        let dt = time.begin_frame_with(replay.fixed_dt);
        outcome = app.tick(dt, &mut audio, &mut rng);
        if outcome != Flow::Continue || app.mode == Mode::Menu {
            break;
        }
    }

    let Some(world) = app.world() else {
        bail!("no world after run");
    };
    let player = world.player();
    let enemies_left = world
        .characters
        .iter()
        .filter_map(|e| e.enemy())
        .filter(|e| !e.is_dead())
        .count();
    log::info!(
        "Run ended ({:?}) after {} frames / {:.2}s: player at ({:.1}, {:.1}), hp {:.0}%, \
         {} enemies alive, {} bullet slots, {} sounds",
        outcome,
        time.frame_count,
        time.total_time,
        player.pos.x,
        player.pos.y,
        world.hp_fraction() * 100.0,
        enemies_left,
        world.bullets.len(),
        audio.played
    );
    Ok(())
}
