//! # Sandbox Configuration
//!
//! Tunable constants for the gesture classifier, the player controller, the
//! raycast editor and the camera projection.
//!
//! Every section derives `Deserialize` with `#[serde(default)]`, so a config
//! file only has to name the values it wants to change:
//!
//! ```json
//! { "look": { "sensitivity": 0.007 }, "world": { "hotbar": ["stone", "glass"] } }
//! ```
//!
//! The file is looked up at `$VOXEL_SANDBOX_CONFIG`, falling back to
//! `./sandbox.json`. A missing file yields the defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::engine_state::voxels::block::material::Material;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "VOXEL_SANDBOX_CONFIG";

/// Config file read when the environment variable is not set.
pub const DEFAULT_CONFIG_PATH: &str = "sandbox.json";

/// Errors produced while loading or validating a [`SandboxConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown material `{0}` in hotbar")]
    UnknownMaterial(String),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Look-drag and tap/hold classification thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Radians of yaw/pitch per pixel of drag.
    pub sensitivity: f32,
    /// Drag distance (px) above which a session counts as a look drag.
    pub jitter_threshold_px: f32,
    /// Sessions at most this long place, longer ones break.
    pub hold_threshold_ms: u64,
    /// Sessions reaching this length emit nothing.
    pub session_timeout_ms: u64,
    /// Height of the bottom strip excluded from the look region on the left half.
    pub bottom_strip_px: f64,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.005,
            jitter_threshold_px: 4.0,
            hold_threshold_ms: 400,
            session_timeout_ms: 1000,
            bottom_strip_px: 100.0,
        }
    }
}

/// Virtual joystick pad placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JoystickConfig {
    pub radius_px: f64,
    /// Distance between the pad and the left/bottom screen edges.
    pub margin_px: f64,
    /// Clamp the move vector to the unit circle.
    pub clamp_to_unit: bool,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            radius_px: 40.0,
            margin_px: 20.0,
            clamp_to_unit: true,
        }
    }
}

/// Player physics, expressed per simulation tick (60 Hz).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start_position: [f32; 3],
    /// Camera height above the ground plane while grounded.
    pub eye_height: f32,
    /// Horizontal distance covered per tick at full stick deflection.
    pub speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub pitch_limit: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 2.0, 5.0],
            eye_height: 2.0,
            speed: 0.15,
            gravity: 0.015,
            jump_impulse: 0.3,
            pitch_limit: 1.5,
        }
    }
}

/// Raycast editor parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub place_pulse_ms: u64,
    pub break_pulse_ms: u64,
    /// Maximum ray length.
    pub reach: f32,
    /// Distance along the hit normal where a new block is centered before snapping.
    pub placement_offset: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            place_pulse_ms: 15,
            break_pulse_ms: 40,
            reach: 1000.0,
            placement_offset: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Half the side length of the square ground plane.
    pub ground_half_extent: f32,
    /// Material names offered by the hotbar, in slot order.
    pub hotbar: Vec<String>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ground_half_extent: 100.0,
            hotbar: vec!["wood".into(), "stone".into(), "grass".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

/// Top-level configuration for the sandbox.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub look: LookConfig,
    pub joystick: JoystickConfig,
    pub player: PlayerConfig,
    pub editor: EditorConfig,
    pub world: WorldConfig,
    pub camera: CameraConfig,
}

impl SandboxConfig {
    /// Parses and validates a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SandboxConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file. A missing file yields the defaults.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Loads the config from the environment-selected path, logging and
    /// falling back to the defaults when it cannot be used.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        match Self::from_path(&path) {
            Ok(config) => {
                log::info!("Config loaded from {}", path.display());
                config
            }
            Err(err) => {
                log::error!("{err}; using default config");
                Self::default()
            }
        }
    }

    /// Resolves the hotbar material names.
    pub fn hotbar_materials(&self) -> Result<Vec<Material>, ConfigError> {
        self.world
            .hotbar
            .iter()
            .map(|name| {
                Material::from_name(name).ok_or_else(|| ConfigError::UnknownMaterial(name.clone()))
            })
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.joystick.radius_px <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "joystick.radius_px",
                reason: "must be positive",
            });
        }
        if !(0.0..std::f32::consts::FRAC_PI_2).contains(&self.player.pitch_limit) {
            return Err(ConfigError::Invalid {
                field: "player.pitch_limit",
                reason: "must lie in [0, pi/2)",
            });
        }
        if self.look.hold_threshold_ms >= self.look.session_timeout_ms {
            return Err(ConfigError::Invalid {
                field: "look.hold_threshold_ms",
                reason: "must be shorter than look.session_timeout_ms",
            });
        }
        if self.world.hotbar.is_empty() {
            return Err(ConfigError::Invalid {
                field: "world.hotbar",
                reason: "must name at least one material",
            });
        }
        self.hotbar_materials()?;
        Ok(())
    }
}
