//! Outline commands
//!
//! The named edit commands a frontend binds to keys. Each maps onto one
//! [`OutlineSession`] operation through [`OutlineCommand::apply`].
//! [`ScriptLine`] is the line format the binary reads its commands in.

use crate::error::{Error, Result};
use crate::export::ExportFormat;
use crate::outline::{EditOutcome, OutlineSession};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Command Enum
// ─────────────────────────────────────────────────────────────────────────────

/// Structural edit commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineCommand {
    /// Indent the current line with its children
    Indent,
    /// Unindent the current line with its children
    Unindent,
    /// Move the current block above its previous sibling
    MoveUp,
    /// Move the current block below its next sibling
    MoveDown,
    /// Split the line at the cursor
    InsertLine,
    /// Collapse or expand the line shown at this displayed line index
    ToggleChildren(usize),
    /// Collapse all parents, or expand everything
    ToggleAll,
}

impl OutlineCommand {
    /// Get the keyboard shortcut label for this command.
    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Self::Indent => "Tab",
            Self::Unindent => "Shift+Tab",
            Self::MoveUp => "Alt+Up",
            Self::MoveDown => "Alt+Down",
            Self::InsertLine => "Enter",
            Self::ToggleChildren(_) => "Ctrl+Click",
            Self::ToggleAll => "Ctrl+Shift+.",
        }
    }

    /// Stable command name, as used in command scripts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Indent => "indent",
            Self::Unindent => "unindent",
            Self::MoveUp => "move_up",
            Self::MoveDown => "move_down",
            Self::InsertLine => "insert_line",
            Self::ToggleChildren(_) => "toggle",
            Self::ToggleAll => "toggle_all",
        }
    }

    /// Parse a command from its name and optional argument.
    ///
    /// `toggle` needs a displayed line index; every other command takes none.
    pub fn from_name(name: &str, arg: Option<&str>) -> Option<Self> {
        let command = match name.trim().to_ascii_lowercase().as_str() {
            "indent" => Self::Indent,
            "unindent" | "outdent" => Self::Unindent,
            "move_up" | "up" => Self::MoveUp,
            "move_down" | "down" => Self::MoveDown,
            "insert_line" | "enter" | "newline" => Self::InsertLine,
            "toggle" => Self::ToggleChildren(arg?.trim().parse().ok()?),
            "toggle_all" => Self::ToggleAll,
            _ => return None,
        };
        Some(command)
    }

    /// Get the tooltip text for this command.
    pub fn tooltip(&self) -> String {
        let name = match self {
            Self::Indent => "Indent",
            Self::Unindent => "Unindent",
            Self::MoveUp => "Move Up",
            Self::MoveDown => "Move Down",
            Self::InsertLine => "New Line",
            Self::ToggleChildren(_) => "Collapse/Expand",
            Self::ToggleAll => "Collapse/Expand All",
        };
        format!("{} ({})", name, self.shortcut_label())
    }

    /// Run the command against a session.
    pub fn apply(&self, session: &mut OutlineSession) -> EditOutcome {
        match *self {
            Self::Indent => session.indent(),
            Self::Unindent => session.unindent(),
            Self::MoveUp => session.move_up(),
            Self::MoveDown => session.move_down(),
            Self::InsertLine => session.insert_line(),
            Self::ToggleChildren(display_line) => session.toggle_children_at(display_line),
            Self::ToggleAll => session.toggle_all(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Script Lines
// ─────────────────────────────────────────────────────────────────────────────

/// One line of a command script, as read by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptLine {
    /// Run an edit command
    Command(OutlineCommand),
    /// Move the cursor to a displayed-text offset
    Cursor(usize),
    /// Insert text at the cursor in the displayed text
    Type(String),
    /// Render the outline; written to a file when a path is given.
    /// Without a format the configured default is used.
    Export {
        format: Option<ExportFormat>,
        path: Option<PathBuf>,
    },
    /// Copy the rendered outline to the clipboard
    Copy(Option<ExportFormat>),
    /// Rename the outline
    Title(String),
    /// Save to the document store
    Save,
    /// Print the displayed text
    Print,
}

impl ScriptLine {
    /// Parse a script line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim())),
            None => (trimmed, None),
        };

        let parsed = match name.to_ascii_lowercase().as_str() {
            "cursor" => {
                let offset = rest
                    .and_then(|r| r.parse().ok())
                    .ok_or_else(|| invalid(line, "expected a byte offset"))?;
                Self::Cursor(offset)
            }
            // Keep the text exactly as written after the first space
            "type" => Self::Type(
                trimmed
                    .split_once(' ')
                    .map(|(_, text)| text.to_string())
                    .unwrap_or_default(),
            ),
            "export" => {
                let mut args = rest.unwrap_or("").split_whitespace();
                let format = match args.next() {
                    Some(name) => Some(
                        ExportFormat::from_name(name)
                            .ok_or_else(|| invalid(line, "unknown export format"))?,
                    ),
                    None => None,
                };
                Self::Export {
                    format,
                    path: args.next().map(PathBuf::from),
                }
            }
            "copy" => Self::Copy(match rest {
                Some(name) if !name.is_empty() => Some(
                    ExportFormat::from_name(name)
                        .ok_or_else(|| invalid(line, "unknown export format"))?,
                ),
                _ => None,
            }),
            "title" => Self::Title(rest.unwrap_or("").to_string()),
            "save" => Self::Save,
            "print" => Self::Print,
            _ => Self::Command(
                OutlineCommand::from_name(name, rest)
                    .ok_or_else(|| invalid(line, "unknown command"))?,
            ),
        };
        Ok(Some(parsed))
    }
}

fn invalid(line: &str, reason: &str) -> Error {
    Error::Application(format!("Invalid script line '{}': {}", line.trim(), reason))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::LineSequence;

    #[test]
    fn test_shortcut_labels() {
        assert_eq!(OutlineCommand::Indent.shortcut_label(), "Tab");
        assert_eq!(OutlineCommand::Unindent.shortcut_label(), "Shift+Tab");
        assert_eq!(OutlineCommand::ToggleAll.shortcut_label(), "Ctrl+Shift+.");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(OutlineCommand::from_name("indent", None), Some(OutlineCommand::Indent));
        assert_eq!(OutlineCommand::from_name("Move_Down", None), Some(OutlineCommand::MoveDown));
        assert_eq!(
            OutlineCommand::from_name("toggle", Some("3")),
            Some(OutlineCommand::ToggleChildren(3))
        );
        assert_eq!(OutlineCommand::from_name("toggle", None), None);
        assert_eq!(OutlineCommand::from_name("toggle", Some("x")), None);
        assert_eq!(OutlineCommand::from_name("bold", None), None);
    }

    #[test]
    fn test_name_parses_back() {
        for command in [
            OutlineCommand::Indent,
            OutlineCommand::Unindent,
            OutlineCommand::MoveUp,
            OutlineCommand::MoveDown,
            OutlineCommand::InsertLine,
            OutlineCommand::ToggleAll,
        ] {
            assert_eq!(OutlineCommand::from_name(command.name(), None), Some(command));
        }
    }

    #[test]
    fn test_tooltip_includes_shortcut() {
        assert_eq!(OutlineCommand::MoveUp.tooltip(), "Move Up (Alt+Up)");
    }

    #[test]
    fn test_apply_dispatches() {
        let mut session = OutlineSession::from_sequence(LineSequence::from_lines(["A", "B"]));
        session.set_canonical_cursor(2);
        assert!(OutlineCommand::Indent.apply(&mut session).is_applied());
        assert_eq!(session.lines(), &["A", "  B"]);
        assert!(OutlineCommand::ToggleChildren(0).apply(&mut session).is_applied());
        assert_eq!(session.display_text(), "▶ A");
        assert_eq!(OutlineCommand::MoveUp.apply(&mut session), EditOutcome::NoOp);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Script Parsing Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_script_commands() {
        assert_eq!(
            ScriptLine::parse("indent").unwrap(),
            Some(ScriptLine::Command(OutlineCommand::Indent))
        );
        assert_eq!(
            ScriptLine::parse("  toggle 2 ").unwrap(),
            Some(ScriptLine::Command(OutlineCommand::ToggleChildren(2)))
        );
        assert_eq!(ScriptLine::parse("cursor 14").unwrap(), Some(ScriptLine::Cursor(14)));
        assert_eq!(ScriptLine::parse("save").unwrap(), Some(ScriptLine::Save));
    }

    #[test]
    fn test_parse_type_keeps_spacing() {
        assert_eq!(
            ScriptLine::parse("type  two spaces").unwrap(),
            Some(ScriptLine::Type(" two spaces".to_string()))
        );
        assert_eq!(
            ScriptLine::parse("type").unwrap(),
            Some(ScriptLine::Type(String::new()))
        );
    }

    #[test]
    fn test_parse_export() {
        assert_eq!(
            ScriptLine::parse("export text out.txt").unwrap(),
            Some(ScriptLine::Export {
                format: Some(ExportFormat::PlainText),
                path: Some(PathBuf::from("out.txt")),
            })
        );
        assert_eq!(
            ScriptLine::parse("export").unwrap(),
            Some(ScriptLine::Export {
                format: None,
                path: None,
            })
        );
        assert!(ScriptLine::parse("export pdf").is_err());
    }

    #[test]
    fn test_parse_copy_leaves_format_unset() {
        assert_eq!(ScriptLine::parse("copy").unwrap(), Some(ScriptLine::Copy(None)));
        assert_eq!(
            ScriptLine::parse("copy text").unwrap(),
            Some(ScriptLine::Copy(Some(ExportFormat::PlainText)))
        );
        assert!(ScriptLine::parse("copy pdf").is_err());
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(ScriptLine::parse("   ").unwrap(), None);
        assert_eq!(ScriptLine::parse("# setup").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(ScriptLine::parse("cursor x"), Err(Error::Application(_))));
        assert!(ScriptLine::parse("explode").is_err());
    }
}
