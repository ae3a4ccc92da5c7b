//! Sprite-sheet animation driven by a wrapping [`Timer`].
//!
//! An animation is a strip of `frame_count` equally long frames that together
//! last `length` seconds. The current frame is derived from the timer's phase,
//! so a looping animation needs no bookkeeping beyond `step`. `done()` mirrors
//! the timer's sticky timeout flag: it turns true after the first full cycle.
//!
//! Timing can be authored in JSON sheets (`duration_ms` for readability,
//! converted to seconds on load):
//!
//! ```json
//! { "version": "0.1", "animation_id": "player",
//!   "animations": { "idle": { "frames": 8, "duration_ms": 1600 } } }
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::timer::Timer;

const SHEET_VERSION: &str = "0.1";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    timer: Timer,
    frame_count: u32,
}

impl Animation {
    pub const fn new(frame_count: u32, length: f32) -> Self {
        Self {
            timer: Timer::new(length),
            frame_count,
        }
    }

    pub fn from_spec(spec: AnimationSpec) -> Self {
        Self::new(spec.frame_count, spec.length)
    }

    /// Frame index for the current phase. The wrap in `Timer::step` keeps the
    /// phase below one cycle, but the result is still clamped to the last
    /// valid frame.
    pub fn current_frame(&self) -> u32 {
        if self.frame_count == 0 || self.timer.length() <= 0.0 {
            return 0;
        }
        let phase = self.timer.elapsed() / self.timer.length();
        let frame = (phase * self.frame_count as f32).floor().max(0.0) as u32;
        frame.min(self.frame_count - 1)
    }

    pub fn step(&mut self, dt: f32) {
        self.timer.step(dt);
    }

    pub fn done(&self) -> bool {
        self.timer.is_timed_out()
    }

    pub fn reset(&mut self) {
        self.timer.reset();
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn length(&self) -> f32 {
        self.timer.length()
    }

    pub fn elapsed(&self) -> f32 {
        self.timer.elapsed()
    }
}

/// Frame count and total duration (seconds) of one clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub frame_count: u32,
    pub length: f32,
}

impl AnimationSpec {
    pub const fn new(frame_count: u32, length: f32) -> Self {
        Self {
            frame_count,
            length,
        }
    }
}

/// One loaded animation sheet: clip timings keyed by clip name.
#[derive(Debug, Clone)]
pub struct AnimationSheet {
    pub version: String,
    pub animation_id: String,
    pub clips: HashMap<String, AnimationSpec>,
}

impl AnimationSheet {
    pub fn clip(&self, name: &str) -> Option<AnimationSpec> {
        self.clips.get(name).copied()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnimationLoadError {
    #[error("failed to read animation sheet {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse animation sheet {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("animation sheet validation failed: {0}")]
    Invalid(String),
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct AnimationSheetJson {
    version: String,
    animation_id: String,
    animations: HashMap<String, AnimationClipJson>,
}

#[derive(Debug, Deserialize)]
struct AnimationClipJson {
    frames: u32,
    duration_ms: u64,
}

/// Load an animation sheet from disk.
pub fn load_animation_sheet(path: &Path) -> Result<AnimationSheet, AnimationLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| AnimationLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_animation_sheet(&raw).map_err(|err| match err {
        AnimationLoadError::Parse { source, .. } => AnimationLoadError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parse and validate an animation sheet from a JSON string.
pub fn parse_animation_sheet(raw: &str) -> Result<AnimationSheet, AnimationLoadError> {
    let json: AnimationSheetJson =
        serde_json::from_str(raw).map_err(|source| AnimationLoadError::Parse {
            path: PathBuf::new(),
            source,
        })?;
    validate_sheet_json(&json)?;

    let clips = json
        .animations
        .into_iter()
        .map(|(name, clip)| {
            let spec = AnimationSpec::new(clip.frames, clip.duration_ms as f32 / 1000.0);
            (name, spec)
        })
        .collect();

    Ok(AnimationSheet {
        version: json.version,
        animation_id: json.animation_id,
        clips,
    })
}

fn validate_sheet_json(json: &AnimationSheetJson) -> Result<(), AnimationLoadError> {
    if json.version != SHEET_VERSION {
        return Err(AnimationLoadError::Invalid(format!(
            "unsupported version '{}'",
            json.version
        )));
    }
    if json.animation_id.is_empty() {
        return Err(AnimationLoadError::Invalid(
            "animation_id is empty".to_string(),
        ));
    }
    for (name, clip) in &json.animations {
        if clip.frames == 0 {
            return Err(AnimationLoadError::Invalid(format!(
                "clip '{name}' has no frames"
            )));
        }
        if clip.duration_ms == 0 {
            return Err(AnimationLoadError::Invalid(format!(
                "clip '{name}' has zero duration"
            )));
        }
    }
    Ok(())
}
