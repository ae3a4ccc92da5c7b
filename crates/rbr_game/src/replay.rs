use rbr_core::Key;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Scripted input for headless runs: a fixed frame delta and runs of held keys.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    /// Keys held down for the whole run; everything else is up.
    #[serde(default)]
    pub held: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// A press or release derived from two consecutive held sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read replay {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse replay JSON {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("replay validation failed: {0}")]
    Invalid(String),
}

impl ReplaySequence {
    /// One held set per simulated frame. A zero repeat still counts once.
    pub fn expanded_inputs(&self) -> Vec<Vec<Key>> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.held.clone());
            }
        }
        out
    }

    /// Key edges to feed before each frame, starting from nothing held.
    pub fn key_events(&self) -> Vec<Vec<KeyEvent>> {
        let mut previous: Vec<Key> = Vec::new();
        self.expanded_inputs()
            .into_iter()
            .map(|held| {
                let events = diff_held(&previous, &held);
                previous = held;
                events
            })
            .collect()
    }
}

/// Releases first, then presses, each in `Key::ALL` order.
pub fn diff_held(previous: &[Key], current: &[Key]) -> Vec<KeyEvent> {
    let released = Key::ALL
        .iter()
        .filter(|&&key| previous.contains(&key) && !current.contains(&key))
        .map(|&key| KeyEvent { key, pressed: false });
    let pressed = Key::ALL
        .iter()
        .filter(|&&key| current.contains(&key) && !previous.contains(&key))
        .map(|&key| KeyEvent { key, pressed: true });
    released.chain(pressed).collect()
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, ReplayError> {
    let raw = fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let replay: ReplaySequence =
        serde_json::from_str(&raw).map_err(|source| ReplayError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate_replay(&replay)?;
    Ok(replay)
}

pub fn validate_replay(replay: &ReplaySequence) -> Result<(), ReplayError> {
    if !replay.fixed_dt.is_finite() || replay.fixed_dt <= 0.0 {
        return Err(ReplayError::Invalid("fixed_dt must be > 0".to_string()));
    }
    if replay.frames.is_empty() {
        return Err(ReplayError::Invalid("frames list is empty".to_string()));
    }
    Ok(())
}

/// Run right, jump, fire a volley, and turn back.
pub fn default_replay() -> ReplaySequence {
    let frame = |held: &[Key], repeat| ReplayFrame {
        held: held.to_vec(),
        repeat,
    };
    ReplaySequence {
        fixed_dt: default_dt(),
        frames: vec![
            frame(&[], 30),
            frame(&[Key::MoveRight], 90),
            frame(&[Key::MoveRight, Key::Jump], 1),
            frame(&[Key::MoveRight], 60),
            frame(&[Key::Fire], 60),
            frame(&[Key::MoveLeft, Key::Fire], 45),
            frame(&[], 30),
        ],
    }
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "rbr_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "held": ["move_right"], "repeat": 3 },
                { "held": ["move_right", "jump"] },
                { "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 6);
        assert_eq!(expanded[3], vec![Key::MoveRight, Key::Jump]);
        assert!(expanded[5].is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn fixed_dt_defaults_to_sixty_hz() {
        let replay: ReplaySequence =
            serde_json::from_str(r#"{ "frames": [ { "held": [] } ] }"#).expect("parses");
        assert!((replay.fixed_dt - 1.0 / 60.0).abs() < 1e-7);
        assert_eq!(replay.frames[0].repeat, 1);
    }

    #[test]
    fn key_events_are_edges_only() {
        let replay: ReplaySequence = serde_json::from_str(
            r#"{ "frames": [
                { "held": ["jump"], "repeat": 2 },
                { "held": ["fire"] }
            ] }"#,
        )
        .expect("parses");
        let events = replay.key_events();
        assert_eq!(
            events[0],
            vec![KeyEvent {
                key: Key::Jump,
                pressed: true
            }]
        );
        assert!(events[1].is_empty());
        assert_eq!(
            events[2],
            vec![
                KeyEvent {
                    key: Key::Jump,
                    pressed: false
                },
                KeyEvent {
                    key: Key::Fire,
                    pressed: true
                },
            ]
        );
    }

    #[test]
    fn rejects_empty_and_non_positive_dt() {
        let empty = ReplaySequence {
            fixed_dt: 0.016,
            frames: Vec::new(),
        };
        assert!(matches!(
            validate_replay(&empty),
            Err(ReplayError::Invalid(_))
        ));

        let zero_dt = ReplaySequence {
            fixed_dt: 0.0,
            ..default_replay()
        };
        let err = validate_replay(&zero_dt).expect_err("zero dt");
        assert!(err.to_string().contains("fixed_dt"));
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let path = temp_file_path("bad_key");
        fs::write(&path, r#"{ "frames": [ { "held": ["crouch"] } ] }"#)
            .expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("unknown key");
        assert!(matches!(err, ReplayError::Parse { .. }));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn default_replay_is_valid() {
        let replay = default_replay();
        validate_replay(&replay).expect("default replay validates");
        assert_eq!(replay.expanded_inputs().len(), 316);
    }
}
