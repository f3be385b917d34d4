//! Runtime settings
//!
//! Read from a JSON file; any missing field takes its default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LifeError, Result};
use crate::renderer::Glyphs;
use crate::sim::{Coord, Seed};

/// Simulation and display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Milliseconds between generations
    pub tick_millis: u64,
    /// Live/dead characters
    pub glyphs: Glyphs,
    /// Top-left board coordinate shown at start-up
    pub origin: Coord,
    /// Board contents when nothing is loaded
    pub seed: Seed,
    /// Where `S` writes the board
    pub save_path: PathBuf,
    /// Start with stepping paused
    pub start_paused: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_millis: 100,
            glyphs: Glyphs::default(),
            origin: Coord::ORIGIN,
            seed: Seed::default(),
            save_path: PathBuf::from("life.cells"),
            start_paused: false,
        }
    }
}

impl Settings {
    /// Tick interval, never shorter than a millisecond
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| LifeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&json).map_err(|source| LifeError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path.map(Self::load) {
            Some(Ok(settings)) => settings,
            Some(Err(err)) => {
                log::warn!("{}; using default settings", err);
                Self::default()
            }
            None => {
                log::info!("using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| LifeError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| LifeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("settings saved to {}", path.display());
        Ok(())
    }
}
