//! # Songbook
//!
//! Loads a song catalog into memory and lets you search it, collect songs
//! into a playlist and play the playlist in shuffled order.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive menu
//! songbook --catalog songs.txt
//!
//! # One-shot commands
//! songbook search "Echo"
//! songbook list
//! songbook --seed 7 shuffle "Echo" "Aurora"
//! songbook stats
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use songbook::catalog::Catalog;
use songbook::cli::{self, Command};
use songbook::config::RuntimeConfig;
use songbook::playlist::Playlist;
use songbook::{completion, loader, session};
use std::io::{self, Write};

/// Seeded RNG when a seed is configured, OS entropy otherwise.
fn shuffle_rng(config: &RuntimeConfig) -> StdRng {
    match config.shuffle_seed {
        Some(seed) => {
            debug!("Seeding shuffle with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

fn print_search(catalog: &Catalog, title: &str, out: &mut impl Write) -> Result<()> {
    match catalog.search(title) {
        Some(record) => writeln!(out, "Song found:\n{record}")?,
        None => writeln!(out, "Song not found.")?,
    }
    Ok(())
}

fn print_shuffle(
    catalog: &Catalog,
    titles: &[String],
    config: &RuntimeConfig,
    out: &mut impl Write,
) -> Result<()> {
    let mut playlist = Playlist::new();
    for title in titles {
        match catalog.search(title) {
            Some(record) => playlist.append(record),
            None => warn!("Song not found: `{title}'"),
        }
    }

    writeln!(out, "Playing songs in shuffle:")?;
    let order = playlist.shuffle_and_play(&mut shuffle_rng(config));
    if order.is_empty() {
        writeln!(out, "Playlist is empty.")?;
    } else {
        session::write_records(out, order)?;
    }
    Ok(())
}

fn print_stats(catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Songs: {}", catalog.len())?;
    writeln!(out, "Height: {}", catalog.height())?;
    writeln!(out, "Root: {}", catalog.root_title().unwrap_or("-"))?;
    match catalog.check_invariants() {
        Ok(()) => writeln!(out, "Invariants: ok")?,
        Err(e) => writeln!(out, "Invariants: violated ({e})")?,
    }
    Ok(())
}

/// Main entry point for Songbook.
///
/// Initializes logging, resolves configuration, loads the catalog and routes
/// the command.
///
/// # Logging
///
/// Controlled via `RUST_LOG`:
/// - `RUST_LOG=info songbook` - Load summaries
/// - `RUST_LOG=songbook::catalog=trace songbook` - Every rotation
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    let command = args.command.unwrap_or(Command::Interactive);

    // Completion scripts need neither configuration nor a catalog.
    if let Command::Completion { shell } = command {
        let mut cmd = cli::Args::command();
        completion::generate_completions(
            completion::shell_to_completion_shell(shell),
            &mut cmd,
            &mut io::stdout(),
        );
        return Ok(());
    }

    let config = RuntimeConfig::load()?.merge(args.catalog, args.seed);
    debug!("Runtime config: {config:?}");

    if command == Command::CompleteTitles {
        // Completion must stay quiet when no catalog is available.
        if let Ok(catalog) = loader::load_catalog(&config.catalog_path) {
            completion::write_title_completions(&catalog, &mut io::stdout().lock())?;
        }
        return Ok(());
    }

    let catalog = loader::load_catalog(&config.catalog_path)?;
    info!(
        "Catalog ready: {} songs, tree height {}",
        catalog.len(),
        catalog.height()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Interactive => {
            let mut session = session::Session::new(&catalog, shuffle_rng(&config));
            session.run(io::stdin().lock(), &mut out)?;
        }
        Command::Search { title } => print_search(&catalog, &title, &mut out)?,
        Command::List => {
            for title in catalog.titles() {
                writeln!(out, "{title}")?;
            }
        }
        Command::Shuffle { titles } => print_shuffle(&catalog, &titles, &config, &mut out)?,
        Command::Stats => print_stats(&catalog, &mut out)?,
        Command::Completion { .. } | Command::CompleteTitles => {}
    }

    out.flush()?;
    Ok(())
}
