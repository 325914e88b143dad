use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::{Size, Vec2};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub(crate) const CONFIG_RELATIVE_PATH: &str = "config/game.json";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config '{path}' at {field}: {message}")]
    Parse {
        path: PathBuf,
        field: String,
        message: String,
    },
    #[error("invalid config value at {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub hud: HudConfig,
    pub mario: MarioConfig,
    pub landscape: LandscapeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub max_render_fps: Option<u32>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pokemario".to_string(),
            width: 1280,
            height: 720,
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CameraConfig {
    pub world_to_pixel: f32,
    pub follow_offset: Vec2,
    /// Upper scroll limit; a zero component pins that axis.
    pub level_bounds: Vec2,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            world_to_pixel: engine::DEFAULT_WORLD_TO_PIXEL,
            follow_offset: engine::DEFAULT_FOLLOW_OFFSET,
            level_bounds: Vec2::new(1000.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HudConfig {
    pub lives: u32,
    pub font_size_px: f32,
    pub line_spacing_px: f32,
    pub margin_px: f32,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            font_size_px: 24.0,
            line_spacing_px: 10.0,
            margin_px: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MarioConfig {
    pub spawn_x: f32,
    /// World units.
    pub size: Size,
    pub sprite_key: String,
    /// Sheet pixels per animation cell.
    pub sprite_cell: Size,
    pub sheet_faces_left: bool,
    pub frame_interval_ms: f32,
    pub gravity: f32,
    pub jump_speed: Vec2,
    pub ground_friction: f32,
}

impl Default for MarioConfig {
    fn default() -> Self {
        Self {
            spawn_x: 25.0,
            size: Size::new(6.0, 10.0),
            sprite_key: "sprites/mario".to_string(),
            sprite_cell: Size::new(245.0, 364.25),
            sheet_faces_left: false,
            frame_interval_ms: 70.0,
            gravity: 100.0,
            jump_speed: Vec2::new(6.0, 40.0),
            ground_friction: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LandscapeConfig {
    /// Viewport widths per second.
    pub walk_speed_viewport_fraction: f32,
    pub sprint_multiplier: f32,
    pub velocity_transition_ms: f32,
    pub dirt_height_fraction: f32,
    pub grass_height_fraction: f32,
    pub clouds_min: u32,
    pub clouds_max: u32,
    pub cloud_widths: Vec<f32>,
    pub cloud_fade_in_ms: f32,
    pub cloud_wind_speed: f32,
    pub cloud_sprite_key: String,
    pub seed: Option<u64>,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            walk_speed_viewport_fraction: 0.6,
            sprint_multiplier: 3.0,
            velocity_transition_ms: 250.0,
            dirt_height_fraction: 0.15,
            grass_height_fraction: 0.01,
            clouds_min: 1,
            clouds_max: 5,
            cloud_widths: vec![10.0, 15.0, 20.0, 25.0],
            cloud_fade_in_ms: 250.0,
            cloud_wind_speed: -0.5,
            cloud_sprite_key: "sprites/cloud".to_string(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub(crate) fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "config_missing_using_defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::parse(path, &raw)?;
        config.validate()?;
        info!(path = %path.display(), "config_loaded");
        Ok(config)
    }

    fn parse(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(|error| {
            let field = error.path().to_string();
            ConfigError::Parse {
                path: path.to_path_buf(),
                field: if field.is_empty() { ".".to_string() } else { field },
                message: error.into_inner().to_string(),
            }
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        require_positive("camera.world_to_pixel", self.camera.world_to_pixel)?;
        require_positive("mario.size.width", self.mario.size.width)?;
        require_positive("mario.size.height", self.mario.size.height)?;
        require_positive("mario.sprite_cell.width", self.mario.sprite_cell.width)?;
        require_positive("mario.sprite_cell.height", self.mario.sprite_cell.height)?;
        require_positive("mario.frame_interval_ms", self.mario.frame_interval_ms)?;
        require_non_negative("mario.gravity", self.mario.gravity)?;
        require_non_negative("mario.ground_friction", self.mario.ground_friction)?;
        require_non_negative(
            "landscape.walk_speed_viewport_fraction",
            self.landscape.walk_speed_viewport_fraction,
        )?;
        require_non_negative("landscape.sprint_multiplier", self.landscape.sprint_multiplier)?;
        require_non_negative(
            "landscape.velocity_transition_ms",
            self.landscape.velocity_transition_ms,
        )?;
        require_fraction("landscape.dirt_height_fraction", self.landscape.dirt_height_fraction)?;
        require_fraction(
            "landscape.grass_height_fraction",
            self.landscape.grass_height_fraction,
        )?;
        if self.landscape.clouds_min > self.landscape.clouds_max {
            return Err(ConfigError::Invalid {
                field: "landscape.clouds_min",
                message: format!(
                    "expected at most clouds_max ({}), got {}",
                    self.landscape.clouds_max, self.landscape.clouds_min
                ),
            });
        }
        if self.landscape.cloud_widths.is_empty() {
            return Err(ConfigError::Invalid {
                field: "landscape.cloud_widths",
                message: "expected at least one width".to_string(),
            });
        }
        for width in &self.landscape.cloud_widths {
            require_positive("landscape.cloud_widths", *width)?;
        }
        Ok(())
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        message: format!("expected a positive number, got {value}"),
    })
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        message: format!("expected a non-negative number, got {value}"),
    })
}

fn require_fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        message: format!("expected a value in [0, 1], got {value}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("game.json");
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config =
            GameConfig::load_or_default(&dir.path().join("absent.json")).expect("defaults");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = TempDir::new().expect("tempdir");
        let raw = json!({
            "hud": { "lives": 5 },
            "landscape": { "seed": 42, "clouds_max": 2 }
        })
        .to_string();
        let path = write_config(&dir, &raw);

        let config = GameConfig::load_or_default(&path).expect("config");
        assert_eq!(config.hud.lives, 5);
        assert_eq!(config.hud.font_size_px, 24.0);
        assert_eq!(config.landscape.seed, Some(42));
        assert_eq!(config.landscape.clouds_max, 2);
        assert_eq!(config.mario, MarioConfig::default());
    }

    #[test]
    fn parse_errors_report_field_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, r#"{ "mario": { "gravity": "heavy" } }"#);

        let error = GameConfig::load_or_default(&path).expect_err("parse error");
        match error {
            ConfigError::Parse { field, .. } => assert_eq!(field, "mario.gravity"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, r#"{ "camera": { "zoom": 2.0 } }"#);
        assert!(matches!(
            GameConfig::load_or_default(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn validation_rejects_non_positive_scale() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir, r#"{ "camera": { "world_to_pixel": 0 } }"#);
        match GameConfig::load_or_default(&path) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "camera.world_to_pixel"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn validation_rejects_inverted_cloud_range() {
        let mut config = GameConfig::default();
        config.landscape.clouds_min = 4;
        config.landscape.clouds_max = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "landscape.clouds_min",
                ..
            })
        ));
    }

    #[test]
    fn defaults_are_valid() {
        GameConfig::default().validate().expect("defaults validate");
    }
}
