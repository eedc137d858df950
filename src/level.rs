/// Level loading from Tiled map files (JSON export, `.tmj`).
///
/// Only the parts the game uses are read: tile layers for the background and
/// the object group named `Enemies`, whose objects are spawn points carrying
/// the enemy type number in their `type` (or, on newer Tiled, `class`) field.

use std::path::{Path, PathBuf};

use glam::Vec2;
use log::{debug, info};
use serde::Deserialize;

use crate::entities::EnemyKind;

pub const ENEMY_GROUP: &str = "Enemies";

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed level {name}: {source}")]
    Json {
        name: String,
        source: serde_json::Error,
    },

    #[error("level {name}: enemy object {object_id} has non-numeric type {value:?}")]
    BadEnemyType {
        name: String,
        object_id: u32,
        value: String,
    },

    #[error("level {name}: enemy object {object_id} has unknown type {type_id}")]
    UnknownEnemyType {
        name: String,
        object_id: u32,
        type_id: u32,
    },
}

// ── Raw Tiled document ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    layers: Vec<RawLayer>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawLayer {
    #[serde(rename = "tilelayer")]
    Tiles {
        #[serde(default)]
        name: String,
        width: u32,
        height: u32,
        #[serde(default)]
        data: Vec<u32>,
    },
    #[serde(rename = "objectgroup")]
    Objects {
        #[serde(default)]
        name: String,
        #[serde(default)]
        objects: Vec<RawObject>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    #[serde(default)]
    id: u32,
    x: f32,
    y: f32,
    #[serde(default, rename = "type", alias = "class")]
    kind: String,
}

// ── Loaded level ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major global tile ids; 0 is an empty cell.
    pub data: Vec<u32>,
}

impl TileLayer {
    pub fn tile_at(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawn {
    pub position: Vec2,
    pub kind: EnemyKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub name: String,
    pub tile_layers: Vec<TileLayer>,
    /// Tile size in pixels.
    pub tile_size: Vec2,
    pub width_in_tiles: u32,
    pub height_in_tiles: u32,
    pub enemy_spawns: Vec<EnemySpawn>,
}

impl Level {
    /// A level with no map and no spawn points; play falls back to a
    /// generated wave.
    pub fn procedural() -> Self {
        Self {
            name: "procedural".to_string(),
            tile_layers: Vec::new(),
            tile_size: Vec2::ZERO,
            width_in_tiles: 0,
            height_in_tiles: 0,
            enemy_spawns: Vec::new(),
        }
    }
}

pub fn load_level(path: &Path) -> Result<Level, LevelError> {
    let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let level = parse_level(&path.display().to_string(), &text)?;
    info!(
        "level loaded: {}, enemies: {}",
        path.display(),
        level.enemy_spawns.len()
    );
    Ok(level)
}

pub fn parse_level(name: &str, json: &str) -> Result<Level, LevelError> {
    let raw: RawMap = serde_json::from_str(json).map_err(|source| LevelError::Json {
        name: name.to_string(),
        source,
    })?;

    let mut tile_layers = Vec::new();
    let mut enemy_spawns = Vec::new();
    let mut group_names = Vec::new();

    for layer in raw.layers {
        match layer {
            RawLayer::Tiles {
                name: layer_name,
                width,
                height,
                data,
            } => tile_layers.push(TileLayer {
                name: layer_name,
                width,
                height,
                data,
            }),
            RawLayer::Objects {
                name: group,
                objects,
            } => {
                if group == ENEMY_GROUP {
                    for obj in &objects {
                        enemy_spawns.push(parse_spawn(name, obj)?);
                    }
                }
                group_names.push(group);
            }
            RawLayer::Other => {}
        }
    }
    debug!("object groups in {}: {}", name, group_names.join(", "));

    Ok(Level {
        name: name.to_string(),
        tile_layers,
        tile_size: Vec2::new(raw.tilewidth as f32, raw.tileheight as f32),
        width_in_tiles: raw.width,
        height_in_tiles: raw.height,
        enemy_spawns,
    })
}

fn parse_spawn(level: &str, obj: &RawObject) -> Result<EnemySpawn, LevelError> {
    let type_id: u32 = obj
        .kind
        .trim()
        .parse()
        .map_err(|_| LevelError::BadEnemyType {
            name: level.to_string(),
            object_id: obj.id,
            value: obj.kind.clone(),
        })?;
    let kind = EnemyKind::from_type_id(type_id).ok_or_else(|| LevelError::UnknownEnemyType {
        name: level.to_string(),
        object_id: obj.id,
        type_id,
    })?;
    Ok(EnemySpawn {
        position: Vec2::new(obj.x, obj.y),
        kind,
    })
}

// ── Campaign ─────────────────────────────────────────────────────────────────

/// The ordered set of levels, loaded once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Campaign {
    levels: Vec<Level>,
}

impl Campaign {
    pub fn new(levels: Vec<Level>) -> Self {
        if levels.is_empty() {
            return Self::procedural();
        }
        Self { levels }
    }

    pub fn procedural() -> Self {
        Self {
            levels: vec![Level::procedural()],
        }
    }

    pub fn load(paths: &[PathBuf]) -> Result<Self, LevelError> {
        let levels = paths
            .iter()
            .map(|p| load_level(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(levels))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at `index`, wrapping past the last one.
    pub fn level(&self, index: usize) -> &Level {
        &self.levels[index % self.levels.len()]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.levels.len()
    }
}
