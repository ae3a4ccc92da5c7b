pub mod animation;
pub mod input;
pub mod rect;
pub mod time;
pub mod timer;

pub use animation::{Animation, AnimationSheet, AnimationSpec};
pub use input::{InputState, Key};
pub use rect::Rect;
pub use time::TimeState;
pub use timer::Timer;
