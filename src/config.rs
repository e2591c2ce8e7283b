//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to defaults if the file is missing or incomplete.

use log::{info, warn};
use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    /// Where best_time.txt and players.json live. None = auto.
    pub data_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub paddle_speed: f32,   // |vx| while a direction is held
    pub ball_speed: f32,     // multiplier on the ball's base velocity
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            tick_rate_ms: default_tick_rate(),
            paddle_speed: default_paddle_speed(),
            ball_speed: default_ball_speed(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_paddle_speed")]
    paddle_speed: f32,
    #[serde(default = "default_ball_speed")]
    ball_speed: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    data_dir: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }     // ~60 ticks per second
fn default_paddle_speed() -> f32 { 7.0 }
fn default_ball_speed() -> f32 { 1.0 }

fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            paddle_speed: default_paddle_speed(),
            ball_speed: default_ball_speed(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    pub fn load() -> Self {
        let Some((path, text)) = read_config_text(&candidate_dirs()) else {
            info!("no config.toml found; using default settings");
            return Self::default();
        };
        match Self::parse(&text) {
            Ok(cfg) => {
                info!("Loaded {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("config.toml parse error: {e}; using default settings");
                Self::default()
            }
        }
    }

    /// Parse config text. Missing keys take their defaults.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Self::from_toml)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        let mut speed = SpeedConfig {
            tick_rate_ms: toml_cfg.speed.tick_rate_ms,
            paddle_speed: toml_cfg.speed.paddle_speed,
            ball_speed: toml_cfg.speed.ball_speed,
        };
        if speed.tick_rate_ms == 0 {
            warn!("tick_rate_ms must be positive, using {}", default_tick_rate());
            speed.tick_rate_ms = default_tick_rate();
        }
        if !speed.ball_speed.is_finite() || speed.ball_speed <= 0.0 {
            warn!("ball_speed must be positive, using {}", default_ball_speed());
            speed.ball_speed = default_ball_speed();
        }
        if !speed.paddle_speed.is_finite() || speed.paddle_speed < 0.0 {
            warn!("paddle_speed must be non-negative, using {}", default_paddle_speed());
            speed.paddle_speed = default_paddle_speed();
        }

        let data_dir = match toml_cfg.general.data_dir.trim() {
            "" => None,
            dir => Some(PathBuf::from(dir)),
        };

        GameConfig {
            speed,
            gamepad: GamepadConfig {
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
            },
            data_dir,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First readable config.toml in the candidate directories.
fn read_config_text(search_dirs: &[PathBuf]) -> Option<(PathBuf, String)> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => return Some((path, text)),
            Err(e) => warn!("could not read {}: {e}", path.display()),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.speed, SpeedConfig::default());
        assert_eq!(cfg.speed.tick_rate_ms, 16);
        assert_eq!(cfg.speed.paddle_speed, 7.0);
        assert_eq!(cfg.speed.ball_speed, 1.0);
        assert_eq!(cfg.gamepad.confirm, ["Start", "A"]);
        assert!(cfg.data_dir.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[speed]\nball_speed = 1.5\n\n[general]\ndata_dir = \"/tmp/pong\"\n",
        )
        .unwrap();
        assert_eq!(cfg.speed.ball_speed, 1.5);
        assert_eq!(cfg.speed.paddle_speed, 7.0);
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/tmp/pong")));
    }

    #[test]
    fn nonsense_values_fall_back() {
        let cfg = GameConfig::parse(
            "[speed]\ntick_rate_ms = 0\nball_speed = -2.0\npaddle_speed = -1.0\n",
        )
        .unwrap();
        assert_eq!(cfg.speed, SpeedConfig::default());
    }

    #[test]
    fn config_file_found_in_search_dirs() {
        let empty = std::env::temp_dir().join(format!("pong-cfg-empty-{}", std::process::id()));
        let full = std::env::temp_dir().join(format!("pong-cfg-full-{}", std::process::id()));
        std::fs::create_dir_all(&empty).unwrap();
        std::fs::create_dir_all(&full).unwrap();
        std::fs::write(full.join("config.toml"), "[speed]\npaddle_speed = 9.0\n").unwrap();

        let (path, text) = read_config_text(&[empty.clone(), full.clone()]).unwrap();
        assert_eq!(path, full.join("config.toml"));
        assert_eq!(GameConfig::parse(&text).unwrap().speed.paddle_speed, 9.0);
        assert!(read_config_text(&[empty]).is_none());
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(GameConfig::parse("[speed\n").is_err());
    }
}
