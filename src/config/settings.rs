//! User settings for the outliner
//!
//! Everything here is serialized to `config.json`. Unknown fields are
//! ignored and missing fields take their defaults, so older and newer config
//! files both load.

use crate::export::{ExportFormat, ExportOptions, DEFAULT_BULLET};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────
    /// Save the outline after every applied command
    pub autosave: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Storage
    // ─────────────────────────────────────────────────────────────────────────
    /// Directory for stored outlines, platform data dir if unset
    pub data_dir: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Bullet used by the bullet list export
    pub export_bullet: String,

    /// Format used when none is given
    pub default_export_format: ExportFormat,

    /// Whether to open exported files after export
    pub open_after_export: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Session & History
    // ─────────────────────────────────────────────────────────────────────────
    /// Recently opened outline files (most recent first)
    pub recent_files: Vec<PathBuf>,

    /// Maximum number of recent files to remember
    pub max_recent_files: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Editing
            autosave: false,

            // Storage
            data_dir: None,

            // Export Settings
            export_bullet: DEFAULT_BULLET.to_string(),
            default_export_format: ExportFormat::default(),
            open_after_export: false,

            // Session & History
            recent_files: Vec::new(),
            max_recent_files: 10,
        }
    }
}

impl Settings {
    /// Largest accepted `max_recent_files`.
    pub const MAX_RECENT_FILES_LIMIT: usize = 100;

    /// Add a file to the recent files list.
    ///
    /// If the file already exists in the list, it's moved to the front.
    /// The list is trimmed to `max_recent_files`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// Useful after loading a file that may have been edited by hand.
    pub fn sanitize(&mut self) {
        if self.max_recent_files == 0 {
            self.max_recent_files = 10;
        } else if self.max_recent_files > Self::MAX_RECENT_FILES_LIMIT {
            self.max_recent_files = Self::MAX_RECENT_FILES_LIMIT;
        }
        self.recent_files.truncate(self.max_recent_files);

        // Blank bullet falls back to the default
        if self.export_bullet.trim().is_empty() {
            self.export_bullet = DEFAULT_BULLET.to_string();
        }

        if matches!(&self.data_dir, Some(dir) if dir.as_os_str().is_empty()) {
            self.data_dir = None;
        }
    }

    /// Export options for `format`, or for the configured default format.
    pub fn export_options(&self, format: Option<ExportFormat>) -> ExportOptions {
        ExportOptions::new(format.unwrap_or(self.default_export_format))
            .with_bullet(self.export_bullet.clone())
    }

    /// Deserialize and sanitize.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
