//! Clipboard export
//!
//! Copies a rendered outline to the system clipboard using the arboard crate.

use super::options::ExportOptions;
use super::text::render;
use crate::error::{Error, Result};
use arboard::Clipboard;
use log::info;

/// Copy plain text to the clipboard.
pub fn copy_text_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| Error::Clipboard(e.to_string()))?;
    Ok(())
}

/// Render the outline with `options` and copy it to the clipboard.
pub fn copy_outline_to_clipboard<S: AsRef<str>>(lines: &[S], options: &ExportOptions) -> Result<()> {
    copy_text_to_clipboard(&render(lines, options))?;
    info!("Copied outline to clipboard as {}", options.format.label());
    Ok(())
}

// Clipboard access needs a display server, so there are no tests here; the
// rendering it relies on is covered in `text.rs`.
