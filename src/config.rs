use std::env;
use std::path::{Path, PathBuf};

use glam::Vec2;
use log::{info, warn};
use serde::Deserialize;

use crate::entities::EnemyMotion;

// Gameplay tuning, overridable from a TOML file. Every field has a default so
// a partial file only changes what it names.

pub const CONFIG_ENV_VAR: &str = "SPACE_INVADERS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "space_invaders.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field: FieldConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub stars: StarConfig,
    /// Level files in play order. Empty means one procedural wave.
    pub levels: Vec<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 720.0,
        }
    }
}

impl FieldConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    pub size: f32,
    /// Distance of the spawn point above the bottom edge.
    pub spawn_margin: f32,
    /// Seconds between shots.
    pub shoot_interval: f64,
    pub bullet_speed: f32,
    pub bullet_size: f32,
    /// Bullet spawn point relative to the ship's top-left corner.
    pub muzzle_offset: [f32; 2],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 200.0,
            size: 40.0,
            spawn_margin: 80.0,
            shoot_interval: 0.3,
            bullet_speed: 300.0,
            bullet_size: 16.0,
            muzzle_offset: [20.0, -20.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub size: f32,
    pub motion: EnemyMotion,
    pub march_speed: f32,
    pub row_step: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub descend_min_speed: f32,
    pub descend_max_speed: f32,
    /// Size of the procedural wave used when a level has no spawn points.
    pub wave_rows: usize,
    pub wave_cols: usize,
    pub wave_spacing: f32,
    /// Seconds between enemy volleys.
    pub shoot_interval: f64,
    pub bullet_speed: f32,
    pub bullet_size: f32,
    /// Enemies firing per volley on the first level.
    pub shooters_base: usize,
    /// Extra shooters per volley for each level beyond the first.
    pub shooters_per_level: usize,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: 40.0,
            motion: EnemyMotion::March,
            march_speed: 60.0,
            row_step: 20.0,
            min_x: 20.0,
            max_x: 620.0,
            descend_min_speed: 40.0,
            descend_max_speed: 100.0,
            wave_rows: 4,
            wave_cols: 5,
            wave_spacing: 70.0,
            shoot_interval: 2.0,
            bullet_speed: 200.0,
            bullet_size: 16.0,
            shooters_base: 1,
            shooters_per_level: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: usize,
    pub speed: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 100,
            speed: 40.0,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with, such as empty random
    /// ranges or a field with no area.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        };

        let field = &self.field;
        if !(field.width > 0.0 && field.height > 0.0) {
            return Err(invalid(format!(
                "field must have a positive size, got {}x{}",
                field.width, field.height
            )));
        }

        let player = &self.player;
        if !(player.size >= 0.0 && player.bullet_size >= 0.0) {
            return Err(invalid("player sizes must not be negative".to_string()));
        }
        if !(player.shoot_interval >= 0.0) {
            return Err(invalid(format!(
                "player.shoot_interval must not be negative, got {}",
                player.shoot_interval
            )));
        }

        let enemy = &self.enemy;
        if !(enemy.size >= 0.0 && enemy.bullet_size >= 0.0) {
            return Err(invalid("enemy sizes must not be negative".to_string()));
        }
        if !(enemy.descend_min_speed >= 0.0 && enemy.descend_min_speed <= enemy.descend_max_speed)
        {
            return Err(invalid(format!(
                "enemy descend speed range {}..{} is empty or negative",
                enemy.descend_min_speed, enemy.descend_max_speed
            )));
        }
        if !(enemy.min_x < enemy.max_x) {
            return Err(invalid(format!(
                "enemy.min_x ({}) must be below enemy.max_x ({})",
                enemy.min_x, enemy.max_x
            )));
        }
        if !(enemy.shoot_interval >= 0.0) {
            return Err(invalid(format!(
                "enemy.shoot_interval must not be negative, got {}",
                enemy.shoot_interval
            )));
        }
        Ok(())
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Resolve the config from `SPACE_INVADERS_CONFIG`, then
    /// `space_invaders.toml`, then built-in defaults.
    ///
    /// A file named by the env var must exist; the default file is optional.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            info!("loading config from {}", path.display());
            return Self::load_file(&path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            info!("loading config from {}", default_path.display());
            return Self::load_file(default_path);
        }

        warn!("no {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
        Ok(Self::default())
    }
}
