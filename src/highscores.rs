//! High score persistence
//!
//! The only state that outlives a round is a single bare integer. Stores
//! report failures to their caller, but the public read/write pair never
//! fails: a broken store reads as 0 and a failed write is logged and dropped.

use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Default high score file for native builds
pub const DEFAULT_HIGH_SCORE_PATH: &str = "pixel_invaders_highscore.txt";

/// Persistence port for the high score
pub trait HighScoreStore {
    /// Stored value, `None` when nothing has been saved yet
    fn try_read(&self) -> Result<Option<u32>>;

    fn try_write(&mut self, score: u32) -> Result<()>;

    /// Stored value, 0 if unset or unreadable
    fn read_high_score(&self) -> u32 {
        match self.try_read() {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                log::warn!("High score unreadable, using 0: {}", e);
                0
            }
        }
    }

    fn write_high_score(&mut self, score: u32) {
        match self.try_write(score) {
            Ok(()) => log::debug!("High score saved ({})", score),
            Err(e) => log::warn!("High score not saved: {}", e),
        }
    }
}

fn parse_score(text: &str) -> Result<u32> {
    let text = text.trim();
    text.parse()
        .map_err(|_| StorageError::InvalidScore(text.to_string()))
}

/// High score kept in a plain text file
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn try_read(&self) -> Result<Option<u32>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(None),
            Ok(text) => parse_score(&text).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    fn try_write(&mut self, score: u32) -> Result<()> {
        std::fs::write(&self.path, score.to_string()).map_err(|e| StorageError::io(&self.path, e))
    }
}

/// In-process store for tests and headless sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    value: Option<u32>,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        Self { value: Some(score) }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn try_read(&self) -> Result<Option<u32>> {
        Ok(self.value)
    }

    fn try_write(&mut self, score: u32) -> Result<()> {
        self.value = Some(score);
        Ok(())
    }
}

/// High score in browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageHighScoreStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageHighScoreStore {
    const STORAGE_KEY: &'static str = "pixel_invaders_highscore";

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("no LocalStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageHighScoreStore {
    fn try_read(&self) -> Result<Option<u32>> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(text)) => parse_score(&text).map(Some),
            Ok(None) => Ok(None),
            Err(_) => Err(StorageError::Unavailable("get_item failed".to_string())),
        }
    }

    fn try_write(&mut self, score: u32) -> Result<()> {
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &score.to_string())
            .map_err(|_| StorageError::Unavailable("set_item failed".to_string()))
    }
}
