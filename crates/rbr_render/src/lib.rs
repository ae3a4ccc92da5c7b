pub mod draw_list;
pub mod parallax;
pub mod viewport;

pub use draw_list::{DrawCall, DrawList, SpriteQuad, FLASH_TINT, NO_TINT};
pub use parallax::{Backdrop, ParallaxLayer};
pub use viewport::Viewport;
