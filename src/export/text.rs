//! Text exports
//!
//! Pure renderings of the canonical outline: an indented bullet list and an
//! indentation-preserving plain text form. Neither feeds back into the
//! editing state.

use super::options::{ExportFormat, ExportOptions};
use crate::error::{Error, Result};
use crate::outline::indent::{indent_level, indent_prefix, split_indent};
use log::info;
use std::fs;
use std::path::Path;

/// Render the outline as an indented bullet list.
///
/// Each line becomes `indent + bullet + " " + payload`, two spaces per level.
pub fn to_bullet_list<S: AsRef<str>>(lines: &[S], options: &ExportOptions) -> String {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.as_ref();
        let (_, payload) = split_indent(line);
        let payload = payload.trim();
        if payload.is_empty() {
            if options.keep_blank_lines {
                out.push(String::new());
            }
            continue;
        }
        out.push(format!(
            "{}{} {}",
            indent_prefix(indent_level(line)),
            options.bullet,
            payload
        ));
    }
    out.join("\n")
}

/// Render the outline as plain text, keeping indentation and dropping
/// trailing whitespace.
pub fn to_plain_text<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|l| l.as_ref().trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the outline in the format selected by `options`.
pub fn render<S: AsRef<str>>(lines: &[S], options: &ExportOptions) -> String {
    match options.format {
        ExportFormat::BulletList => to_bullet_list(lines, options),
        ExportFormat::PlainText => to_plain_text(lines),
    }
}

/// Render the outline and write it to `path`.
pub fn export_to_file<S: AsRef<str>>(
    lines: &[S],
    options: &ExportOptions,
    path: &Path,
) -> Result<()> {
    let mut content = render(lines, options);
    content.push('\n');
    fs::write(path, content).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(
        "Exported outline as {} to {}",
        options.format.label(),
        path.display()
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
