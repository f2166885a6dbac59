//! Export options
//!
//! Output formats for exporting an outline and the options that shape them.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Supported export formats for outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Indented bullet list
    #[default]
    BulletList,
    /// Indentation-preserving plain text
    PlainText,
}

impl ExportFormat {
    /// Get the display label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::BulletList => "Bullet List",
            ExportFormat::PlainText => "Plain Text",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::BulletList => "md",
            ExportFormat::PlainText => "txt",
        }
    }

    /// Parse a format from its short name (`bullets`, `text`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "bullets" | "bullet" | "bullet_list" | "list" | "md" => Some(ExportFormat::BulletList),
            "text" | "plain" | "plain_text" | "txt" => Some(ExportFormat::PlainText),
            _ => None,
        }
    }

    /// Get all available export formats.
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::BulletList, ExportFormat::PlainText]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Options
// ─────────────────────────────────────────────────────────────────────────────

/// Options for exporting an outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// The export format to use
    pub format: ExportFormat,
    /// Bullet glyph used by [`ExportFormat::BulletList`]
    pub bullet: String,
    /// Whether blank lines are kept in the bullet list
    pub keep_blank_lines: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::BulletList,
            bullet: DEFAULT_BULLET.to_string(),
            keep_blank_lines: false,
        }
    }
}

/// Default bullet glyph.
pub const DEFAULT_BULLET: &str = "•";

impl ExportOptions {
    /// Create options for the given format with defaults otherwise.
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Builder: set the bullet glyph.
    pub fn with_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullet = bullet.into();
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
