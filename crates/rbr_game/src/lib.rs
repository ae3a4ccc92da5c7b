pub mod app;
pub mod audio;
pub mod bullet;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod entity;
pub mod level;
pub mod logging;
pub mod player;
pub mod replay;
pub mod sprite;
pub mod update;
pub mod view;
pub mod world;

pub use app::{App, Mode};
pub use audio::{AudioSink, LogAudio, Sound};
pub use config::SimConfig;
pub use entity::{Entity, EntityKind, Kind};
pub use level::LevelGrids;
pub use sprite::AnimationLibrary;
pub use update::Flow;
pub use world::{World, WorldError};
