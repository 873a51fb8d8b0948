// SPDX-License-Identifier: MIT
//
// bankai — a minimal terminal text viewer.
//
// This is the main binary that wires together the two crates:
//
//   bankai-term → raw mode, geometry, key decoding, frame output
//   bankai-view → document, cursor, compositor, session loop
//
// Startup order matters. Raw mode goes on first, because the geometry
// fallback reads the terminal's cursor report from stdin and that reply
// must not be echoed or line-buffered. The raw-mode guard lives in `run`,
// so any exit from `run`, a panic included, passes through its
// restore before `main` prints anything or exits.

mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use bankai_term::input::KeyDecoder;
use bankai_term::output::RawWriter;
use bankai_term::reader::StdinSource;
use bankai_term::terminal::{self, RawMode};
use bankai_view::document::Document;
use bankai_view::session::Session;

use crate::config::Config;

/// CLI arguments: an optional file, nothing else.
#[derive(Parser, Debug)]
#[command(
    name = "bankai",
    about = "A minimal terminal text viewer",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// File to view (read-only). Without one, a welcome banner is shown.
    path: Option<PathBuf>,
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprint!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::from_env(cli.path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("bankai: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Held until main returns so buffered log lines are flushed.
    let _log_guard = match logging::init(config.log.as_ref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("bankai: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            eprintln!("bankai: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Set up the terminal, load the document, and run the session.
fn run(config: &Config) -> Result<()> {
    info!(path = ?config.path, "startup");

    let raw = RawMode::enable().context("enable raw mode")?;

    let mut keys = KeyDecoder::new(StdinSource::new(config.key_timeout));
    // Unbuffered: a frame must reach the terminal as one write.
    let mut out = RawWriter::stdout();

    let size = terminal::query_size(&mut out, keys.source_mut())
        .context("get window size")?;

    let document = match &config.path {
        Some(path) => Document::open(path).context("open file")?,
        None => Document::new(),
    };
    debug!(lines = document.line_count(), "document ready");

    let mut session = Session::new(document, size);
    session.run(&mut keys, &mut out).context("run session")?;

    raw.disable().context("restore terminal mode")?;
    let cursor = session.cursor();
    info!(x = cursor.x, y = cursor.y, "clean exit");
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────
