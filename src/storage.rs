//! Storage markup conversion
//!
//! Outlines are stored as a run of `<div>` containers, one per line, each
//! carrying its depth as a `margin-left` pixel offset:
//!
//! ```text
//! <div style="margin-left: 0px;">Item 1</div><div style="margin-left: 30px;">Sub Item</div>
//! ```
//!
//! Empty lines store a `<br>` placeholder so the container keeps its height
//! when rendered. These two functions are the only place the core touches
//! that format; everything else works on the canonical line sequence.

use crate::outline::indent::{indent_level, indent_prefix, split_indent};
use log::warn;
use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Pixels of left offset per indentation level.
pub const PIXELS_PER_LEVEL: usize = 30;

/// Deepest level accepted from stored markup; deeper margins read as level 0.
pub const MAX_STORED_LEVEL: usize = 100;

/// Placeholder stored for lines with an empty payload.
const EMPTY_LINE_PLACEHOLDER: &str = "<br>";

static CONTAINER_RE: OnceLock<Regex> = OnceLock::new();
static MARGIN_RE: OnceLock<Regex> = OnceLock::new();
static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn container_re() -> &'static Regex {
    CONTAINER_RE.get_or_init(|| {
        Regex::new(r"(?is)<div\b([^>]*)>(.*?)</div\s*>").expect("container pattern is valid")
    })
}

fn margin_re() -> &'static Regex {
    MARGIN_RE.get_or_init(|| {
        Regex::new(r"(?i)margin-left\s*:\s*([^;\x22']*)").expect("margin pattern is valid")
    })
}

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────────────

/// Convert canonical lines to storage markup.
pub fn to_storage_format<S: AsRef<str>>(lines: &[S]) -> String {
    let mut markup = String::new();
    for line in lines {
        let line = line.as_ref();
        let level = indent_level(line);
        let (_, payload) = split_indent(line);
        let payload = payload.trim_end();
        let body = if payload.is_empty() {
            EMPTY_LINE_PLACEHOLDER.to_string()
        } else {
            html_escape(payload)
        };
        markup.push_str(&format!(
            "<div style=\"margin-left: {}px;\">{}</div>",
            level * PIXELS_PER_LEVEL,
            body
        ));
    }
    markup
}

// ─────────────────────────────────────────────────────────────────────────────
// Deserialization
// ─────────────────────────────────────────────────────────────────────────────

/// Parse storage markup back into canonical lines.
///
/// Never fails. Text outside any container (as produced by some
/// content-editable surfaces) becomes level-0 lines, an unreadable margin
/// value yields level 0 for that line, and markup with no containers at all
/// is read as plain text, one line per text line.
pub fn from_storage_format(markup: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut last_end = 0;

    for captures in container_re().captures_iter(markup) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        push_loose_text(&markup[last_end..whole.start()], &mut lines);
        last_end = whole.end();

        let attributes = captures.get(1).map_or("", |m| m.as_str());
        let inner = captures.get(2).map_or("", |m| m.as_str());
        let level = parse_level(attributes);
        let text = html_unescape(&tag_re().replace_all(inner, ""));
        lines.push(format!("{}{}", indent_prefix(level), text.trim()));
    }

    if last_end == 0 && lines.is_empty() {
        if !markup.trim().is_empty() {
            warn!("Stored outline has no line containers, reading as plain text");
        }
        return markup
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| html_unescape(&tag_re().replace_all(l, "")).trim_end().to_string())
            .collect();
    }

    push_loose_text(&markup[last_end..], &mut lines);
    lines
}

/// Recover the indentation level from a container's attribute string.
fn parse_level(attributes: &str) -> usize {
    let Some(captures) = margin_re().captures(attributes) else {
        return 0;
    };
    let value = captures.get(1).map_or("", |m| m.as_str()).trim();
    let number = value.trim_end_matches("px").trim();

    match number.parse::<f64>() {
        Ok(pixels) if pixels.is_finite() && pixels >= 0.0 => {
            let level = (pixels / PIXELS_PER_LEVEL as f64).round();
            if level > MAX_STORED_LEVEL as f64 {
                warn!("margin-left value '{}' is too deep, using level 0", value);
                return 0;
            }
            level as usize
        }
        _ => {
            warn!("Unreadable margin-left value '{}', using level 0", value);
            0
        }
    }
}

/// Keep text found between containers as level-0 lines.
fn push_loose_text(fragment: &str, lines: &mut Vec<String>) {
    let text = html_unescape(&tag_re().replace_all(fragment, ""));
    let text = text.trim();
    if !text.is_empty() {
        warn!("Text outside a line container in stored outline: '{}'", text);
        lines.push(text.to_string());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entity Handling
// ─────────────────────────────────────────────────────────────────────────────

/// HTML-escape a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Decode the entities produced by [`html_escape`] plus `&nbsp;`.
fn html_unescape(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
