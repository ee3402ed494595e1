//! Settings persistence
//!
//! Saves and loads [`GameSettings`] to/from a JSON file. The settings carry
//! the configurable limits of the draw rules and the piece a pawn promotes to
//! when the player gives no choice.
//!
//! # Error Handling
//!
//! - [`read_settings`] is strict and returns a [`CoreError`]
//! - [`load_settings`] never fails: a missing or invalid file falls back to
//!   default settings with a logged warning
//! - [`save_settings`] reports failures to the caller
//!
//! # File Format
//!
//! ```json
//! {
//!   "fifty_move_limit": 100,
//!   "repetition_limit": 3,
//!   "default_promotion": "queen"
//! }
//! ```
//!
//! Missing keys take their default value.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::{CoreError, CoreResult};
use crate::game::components::PieceType;

/// Rule configuration for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Half-move clock value (in plies) that triggers the fifty-move draw
    pub fifty_move_limit: u32,
    /// Occurrence count of one position that triggers the repetition draw
    pub repetition_limit: u32,
    /// Piece a pawn becomes when a promoting move names no piece
    pub default_promotion: PieceType,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            fifty_move_limit: 100,
            repetition_limit: 3,
            default_promotion: PieceType::Queen,
        }
    }
}

impl GameSettings {
    /// Reject settings no game could be played under
    pub fn validate(&self) -> CoreResult<()> {
        if self.fifty_move_limit == 0 {
            return Err(CoreError::InvalidSettings {
                message: "fifty_move_limit must be at least 1".to_string(),
            });
        }
        if self.repetition_limit < 2 {
            return Err(CoreError::InvalidSettings {
                message: "repetition_limit must be at least 2".to_string(),
            });
        }
        if !self.default_promotion.is_promotion_target() {
            return Err(CoreError::InvalidSettings {
                message: format!(
                    "default_promotion must be queen, rook, bishop or knight, got {:?}",
                    self.default_promotion
                ),
            });
        }
        Ok(())
    }
}

/// Read and validate settings from `path`
pub fn read_settings(path: &Path) -> CoreResult<GameSettings> {
    let contents = fs::read_to_string(path)?;
    let settings: GameSettings = serde_json::from_str(&contents)?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from `path`, using defaults when the file is missing or invalid
pub fn load_settings(path: &Path) -> GameSettings {
    if !path.exists() {
        info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
        return GameSettings::default();
    }

    match read_settings(path) {
        Ok(settings) => {
            info!("[SETTINGS] Loaded settings from {:?}", path);
            settings
        }
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                path, e
            );
            GameSettings::default()
        }
    }
}

/// Write `settings` to `path` as pretty-printed JSON
pub fn save_settings(settings: &GameSettings, path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", path);
    Ok(())
}
