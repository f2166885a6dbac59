//! Outline export
//!
//! Renders the canonical outline into formats meant for other tools.
//!
//! - `options.rs` - Export formats and options
//! - `text.rs` - Bullet list and plain text rendering, export to file
//! - `clipboard.rs` - Copy a rendered outline to the system clipboard

pub mod clipboard;
pub mod options;
pub mod text;

pub use clipboard::{copy_outline_to_clipboard, copy_text_to_clipboard};
pub use options::{ExportFormat, ExportOptions, DEFAULT_BULLET};
pub use text::{export_to_file, render, to_bullet_list, to_plain_text};
