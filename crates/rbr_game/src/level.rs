//! Tile grids a world is populated from.
//!
//! A level is three equally sized grids of tile codes: `main` holds collision
//! tiles and characters, `background` and `foreground` hold decoration drawn
//! behind and in front of them. Every grid uses the same code table:
//!
//! | code | tile                      |
//! |------|---------------------------|
//! | 0    | empty                     |
//! | 1    | ground (solid)            |
//! | 2    | panel (solid)             |
//! | 3    | enemy spawn               |
//! | 4    | player spawn              |
//! | 5    | grass (foreground)        |
//! | 6    | brick (background)        |

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const LEVEL_VERSION: &str = "0.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileCode {
    Empty,
    Ground,
    Panel,
    Enemy,
    Player,
    Grass,
    Brick,
}

impl TileCode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TileCode::Empty),
            1 => Some(TileCode::Ground),
            2 => Some(TileCode::Panel),
            3 => Some(TileCode::Enemy),
            4 => Some(TileCode::Player),
            5 => Some(TileCode::Grass),
            6 => Some(TileCode::Brick),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelGrids {
    pub version: String,
    pub level_id: String,
    pub rows: usize,
    pub cols: usize,
    pub main: Vec<Vec<u8>>,
    pub background: Vec<Vec<u8>>,
    pub foreground: Vec<Vec<u8>>,
}

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse level {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("level validation failed: {0}")]
    Invalid(String),
}

const BUILTIN_MAIN: [&str; 5] = [
    "24000000000000000002222220000000000000000000000000",
    "20030002203000002000033020000000000000000000000002",
    "20000200222202220032222002000002220000000000000032",
    "22002220003003022222002203003023330203300303030022",
    "11111111111111111111111111111111111111111111111111",
];

const BUILTIN_BACKGROUND: [&str; 5] = [
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000006666600000000000000000000000000",
    "00000066000060000000000660000000000000000000000000",
    "00000006666666600000000060000006666000000000000000",
    "00000000000000000000000000000000000000000000000000",
];

const BUILTIN_FOREGROUND: [&str; 5] = [
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "55555550000000055555555555555555555555555555555555",
    "00000000000000000000000000000000000000000000000000",
];

impl LevelGrids {
    /// The level that ships with the game: 5 rows by 50 columns.
    pub fn builtin() -> Self {
        Self {
            version: LEVEL_VERSION.to_string(),
            level_id: "rustbelt".to_string(),
            rows: BUILTIN_MAIN.len(),
            cols: BUILTIN_MAIN[0].len(),
            main: digit_rows(&BUILTIN_MAIN),
            background: digit_rows(&BUILTIN_BACKGROUND),
            foreground: digit_rows(&BUILTIN_FOREGROUND),
        }
    }

    /// Grids in population order, with a name for diagnostics.
    pub fn layers(&self) -> [(&'static str, &Vec<Vec<u8>>); 3] {
        [
            ("main", &self.main),
            ("background", &self.background),
            ("foreground", &self.foreground),
        ]
    }
}

fn digit_rows(rows: &[&str]) -> Vec<Vec<u8>> {
    rows.iter()
        .map(|row| row.bytes().map(|b| b.saturating_sub(b'0')).collect())
        .collect()
}

pub fn load_level_from_path(path: &Path) -> Result<LevelGrids, LevelError> {
    let raw = fs::read_to_string(path).map_err(|source| LevelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let level: LevelGrids = serde_json::from_str(&raw).map_err(|source| LevelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_level(&level)?;
    Ok(level)
}

pub fn validate_level(level: &LevelGrids) -> Result<(), LevelError> {
    if level.version != LEVEL_VERSION {
        return Err(LevelError::Invalid(format!(
            "unsupported version '{}'",
            level.version
        )));
    }
    if level.level_id.is_empty() {
        return Err(LevelError::Invalid("level_id is empty".to_string()));
    }
    if level.rows == 0 || level.cols == 0 {
        return Err(LevelError::Invalid(
            "rows and cols must be > 0".to_string(),
        ));
    }
    for (name, grid) in level.layers() {
        if grid.len() != level.rows {
            return Err(LevelError::Invalid(format!(
                "{name} has {} rows, expected {}",
                grid.len(),
                level.rows
            )));
        }
        for (r, row) in grid.iter().enumerate() {
            if row.len() != level.cols {
                return Err(LevelError::Invalid(format!(
                    "{name} row {r} has {} columns, expected {}",
                    row.len(),
                    level.cols
                )));
            }
            if let Some((c, code)) = row
                .iter()
                .enumerate()
                .find(|(_, code)| TileCode::from_code(**code).is_none())
            {
                return Err(LevelError::Invalid(format!(
                    "{name} ({r}, {c}) has unknown tile code {code}"
                )));
            }
        }
    }
    Ok(())
}
