//! Game settings
//!
//! Loaded from a JSON file. Missing fields fall back to defaults and CLI flags
//! override whatever the file says.

use std::fmt;
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::PhysicsParams;

/// Errors from loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "could not read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "malformed settings JSON: {e}"),
            SettingsError::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Maze and physics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Maze ===
    /// Cells per column
    pub rows: usize,
    /// Cells per row
    pub cols: usize,
    /// Fixed seed; a time-based one is used when absent
    pub seed: Option<u64>,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    pub wall_thickness: f32,
    pub border_thickness: f32,

    // === Physics ===
    /// Velocity added per key press (units/s)
    pub impulse: f32,
    /// Gravity once the goal is reached (units/s²)
    pub gravity: f32,
    pub restitution: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            seed: None,

            arena_width: DEFAULT_ARENA_WIDTH,
            arena_height: DEFAULT_ARENA_HEIGHT,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            border_thickness: DEFAULT_BORDER_THICKNESS,

            impulse: DEFAULT_IMPULSE,
            gravity: DEFAULT_GRAVITY,
            restitution: DEFAULT_RESTITUTION,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings if `path` exists, otherwise use defaults.
    ///
    /// A file that exists but cannot be used is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject values the maze or the simulation cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SettingsError::Invalid(format!(
                "maze must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.rows.checked_mul(self.cols).is_none_or(|cells| cells > MAX_CELLS) {
            return Err(SettingsError::Invalid(format!(
                "maze of {}x{} exceeds the limit of {MAX_CELLS} cells",
                self.rows, self.cols
            )));
        }
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "arena must have a positive size, got {}x{}",
                self.arena_width, self.arena_height
            )));
        }
        if !(self.wall_thickness > 0.0 && self.border_thickness > 0.0) {
            return Err(SettingsError::Invalid(
                "wall and border thickness must be positive".into(),
            ));
        }
        // The ball is half a cell wide and must fit between two walls
        let cell = self.cell_size();
        if cell.min_element() <= 2.0 * self.wall_thickness {
            return Err(SettingsError::Invalid(format!(
                "{}x{} cells are too small for {} thick walls",
                cell.x, cell.y, self.wall_thickness
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(SettingsError::Invalid(format!(
                "restitution must be within [0, 1], got {}",
                self.restitution
            )));
        }
        Ok(())
    }

    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Width and height of one maze cell
    pub fn cell_size(&self) -> Vec2 {
        self.arena() / Vec2::new(self.cols as f32, self.rows as f32)
    }

    pub fn physics(&self) -> PhysicsParams {
        PhysicsParams {
            impulse: self.impulse,
            gravity: self.gravity,
            restitution: self.restitution,
        }
    }
}
