//! Outliner - Main Entry Point
//!
//! Opens an outline file, applies a command script read from stdin and
//! writes the outline back.
//!
//! ```text
//! outliner notes.html < script.txt
//! ```
//!
//! Script lines are edit commands (`indent`, `unindent`, `move_up`,
//! `move_down`, `insert_line`, `toggle <line>`, `toggle_all`) or one of
//! `cursor <offset>`, `type <text>`, `export <format> [path]`,
//! `copy [format]`, `title <text>`, `save`, `print`.

use log::{error, info, warn};
use outliner::commands::ScriptLine;
use outliner::config::{load_config, save_config_silent, Settings};
use outliner::document::{JsonFileStore, OutlineDocument, OutlineStore};
use outliner::error::{Error, Result};
use outliner::export;
use outliner::notifications::LogSink;
use outliner::outline::OutlineSession;
use outliner::string_utils::floor_char_boundary;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

/// Application name constant.
const APP_NAME: &str = "Outliner";

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: outliner <outline-file> < script");
        process::exit(2);
    };

    let mut settings = load_config();
    if let Err(e) = run(&path, &settings) {
        error!("{}", e);
        process::exit(1);
    }

    settings.add_recent_file(path);
    save_config_silent(&settings);
}

fn run(path: &Path, settings: &Settings) -> Result<()> {
    let mut session = open_outline(path)?;
    let store = open_store(settings)?;
    let mut sink = LogSink;
    let mut modified = false;

    let stdin = io::stdin();
    for (number, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let Some(script_line) = ScriptLine::parse(&line)? else {
            continue;
        };
        let applied = execute(&mut session, script_line, settings, &store)
            .map_err(|e| Error::Application(format!("line {}: {}", number + 1, e)))?;

        if applied {
            modified = true;
            if settings.autosave {
                session.request_save(Arc::clone(&store));
            }
        }
        session.poll_saves(&mut sink);
    }

    println!("{}", session.display_text());

    if modified {
        fs::write(path, session.to_markup()).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!("Wrote {}", path.display());
    }

    session.wait_for_saves(&mut sink);
    Ok(())
}

/// Read an outline file; a missing file starts an empty outline.
fn open_outline(path: &Path) -> Result<OutlineSession> {
    if !path.exists() {
        info!("{} does not exist yet, starting an empty outline", path.display());
        return Ok(OutlineSession::new());
    }
    let markup = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    Ok(OutlineSession::from_document(&OutlineDocument::new(title, markup)))
}

fn open_store(settings: &Settings) -> Result<Arc<dyn OutlineStore>> {
    let dir = match &settings.data_dir {
        Some(dir) => dir.clone(),
        None => JsonFileStore::default_dir()?,
    };
    let store: Arc<dyn OutlineStore> = Arc::new(JsonFileStore::new(dir));
    Ok(store)
}

/// Run one script line. Returns whether the outline content changed.
fn execute(
    session: &mut OutlineSession,
    script_line: ScriptLine,
    settings: &Settings,
    store: &Arc<dyn OutlineStore>,
) -> Result<bool> {
    match script_line {
        ScriptLine::Command(command) => {
            let outcome = command.apply(session);
            if !outcome.is_applied() {
                warn!("{} had no effect", command.name());
            }
            Ok(outcome.is_applied())
        }
        ScriptLine::Cursor(offset) => {
            session.set_display_cursor(offset);
            Ok(false)
        }
        ScriptLine::Type(text) => {
            let mut displayed = session.display_text();
            let at = floor_char_boundary(&displayed, session.display_cursor());
            displayed.insert_str(at, &text);
            let changed = session.sync_display(&displayed);
            session.set_display_cursor(at + text.len());
            Ok(changed)
        }
        ScriptLine::Export { format, path } => {
            let options = settings.export_options(format);
            match path {
                Some(path) => {
                    export::export_to_file(session.lines(), &options, &path)?;
                    if settings.open_after_export {
                        if let Err(e) = open::that(&path) {
                            warn!("Failed to open {}: {}", path.display(), e);
                        }
                    }
                }
                None => println!("{}", session.export(&options)),
            }
            Ok(false)
        }
        ScriptLine::Copy(format) => {
            let options = settings.export_options(format);
            export::copy_outline_to_clipboard(session.lines(), &options)?;
            Ok(false)
        }
        ScriptLine::Title(title) => {
            session.set_title(title);
            Ok(false)
        }
        ScriptLine::Save => {
            session.request_save(Arc::clone(store));
            Ok(false)
        }
        ScriptLine::Print => {
            println!("{}", session.display_text());
            Ok(false)
        }
    }
}
