//! Game settings and preferences
//!
//! JSON on disk for native builds, LocalStorage in the browser. Gameplay
//! tuning is fixed; settings only cover players, audio and the demo runner.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// Default settings file for native builds
pub const DEFAULT_SETTINGS_PATH: &str = "pixel_invaders_settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Two players sharing the formation
    pub two_player: bool,

    // === Audio ===
    /// Global mute
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Rounds ===
    /// Fixed round seed; a time-based seed is used when unset
    pub seed: Option<u64>,
    /// Where the native high score file lives
    pub high_score_path: PathBuf,
    /// Ticks the native demo runner plays before printing its summary
    pub demo_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            two_player: false,

            // Audio
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,

            // Rounds
            seed: None,
            high_score_path: PathBuf::from(crate::highscores::DEFAULT_HIGH_SCORE_PATH),
            demo_ticks: crate::secs_to_ticks(60),
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pixel_invaders_settings";

    /// Read settings from a JSON file
    pub fn try_load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Read settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.is_not_found() => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| StorageError::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(Path::new(DEFAULT_SETTINGS_PATH))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        if let Err(e) = self.save_to(Path::new(DEFAULT_SETTINGS_PATH)) {
            log::warn!("Failed to save settings: {}", e);
        }
    }
}
