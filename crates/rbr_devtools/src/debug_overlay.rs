//! Debug overlay toggled at runtime by the debug key.
//!
//! The overlay owns no rendering backend. While visible it turns a snapshot
//! of simulation stats into text lines and forwards hitbox rectangles, and
//! whatever presents the frame decides how to show them.

use rbr_core::time::TimeState;
use rbr_core::Rect;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    /// Player state label (e.g. "Running")
    pub player_state: String,
    pub bullets: usize,
    /// Bullets sitting idle in the pool, ready for reuse
    pub idle_bullets: usize,
    pub grounded: bool,
    pub hp: f32,
    pub hp_max: f32,
    pub viewport_x: f32,
    /// World-space hitboxes of every collidable entity
    pub hitboxes: Vec<Rect>,
}

#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::debug!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    /// Text lines to show this frame; empty while hidden.
    pub fn lines(&self, time: &TimeState, stats: &OverlayStats) -> Vec<String> {
        if !self.visible {
            return Vec::new();
        }
        vec![
            format!("FPS: {:.1}", time.smoothed_fps),
            format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms),
            format!("Frame: {}", time.frame_count),
            format!("State: {}", stats.player_state),
            format!(
                "Bullets: {} (idle {})",
                stats.bullets, stats.idle_bullets
            ),
            format!("Grounded: {}", stats.grounded),
            format!("HP: {:.0} / {:.0}", stats.hp, stats.hp_max),
            format!("Viewport x: {:.1}", stats.viewport_x),
        ]
    }

    /// Hitboxes shifted into screen space; empty while hidden.
    pub fn hitbox_rects(&self, stats: &OverlayStats) -> Vec<Rect> {
        if !self.visible {
            return Vec::new();
        }
        stats
            .hitboxes
            .iter()
            .filter(|hitbox| !hitbox.is_empty())
            .map(|hitbox| Rect::new(hitbox.x - stats.viewport_x, hitbox.y, hitbox.w, hitbox.h))
            .collect()
    }
}
