//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Songbook using Clap
//! derive macros.
//!
//! ## Commands
//!
//! - `interactive`: Menu-driven session (the default)
//! - `search`: Look up one song by exact title
//! - `list`: Print every title in catalog order
//! - `shuffle`: Build a playlist from titles and print a shuffled order
//! - `stats`: Report catalog size and tree shape
//!
//! ## Examples
//!
//! ```bash
//! songbook --catalog ~/songs.txt
//! songbook search "Echo"
//! songbook --seed 7 shuffle "Echo" "Aurora" "Mosaic"
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "songbook")]
#[command(about = "Songbook: in-memory song catalog with playlists & shuffle play")]
#[command(version)]
pub struct Args {
    /// Catalog file to load (comma-separated text, or `.json`)
    ///
    /// Defaults to `songs.txt` in the Songbook data directory, or the
    /// `catalog_path` set in `config.json`.
    #[arg(long, short, global = true, env = "SONGBOOK_CATALOG", value_hint = clap::ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    /// Seed for shuffle play, for a reproducible order
    #[arg(long, global = true, env = "SONGBOOK_SEED")]
    pub seed: Option<u64>,

    /// The subcommand to execute; `interactive` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the interactive menu
    ///
    /// Search for songs, add them to a playlist, display the playlist and
    /// play it in shuffled order.
    Interactive,

    /// Search for a song by exact title
    ///
    /// Matching is case-sensitive and whitespace is significant.
    Search {
        /// Title to look up
        #[arg(value_hint = clap::ValueHint::Other)]
        title: String,
    },

    /// List all song titles in catalog order
    List,

    /// Play the given songs in shuffled order
    ///
    /// Each title is looked up and added to a playlist; unknown titles are
    /// reported and skipped. A title may be given more than once.
    Shuffle {
        /// Titles to add to the playlist, in order
        #[arg(required = true, value_hint = clap::ValueHint::Other)]
        titles: Vec<String>,
    },

    /// Show catalog statistics
    ///
    /// Prints the number of songs, the tree height, the root title and
    /// whether every balance invariant holds.
    Stats,

    /// Generate shell completions
    ///
    /// Usage: songbook completion bash > ~/.local/share/bash-completion/completions/songbook
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },

    /// List catalog titles for completion (hidden command)
    #[command(hide = true)]
    CompleteTitles,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_interactive() {
        let args = Args::try_parse_from(["songbook"]).unwrap();
        assert_eq!(args.command, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["songbook", "shuffle", "Echo", "Aurora", "--seed", "9", "-c", "x.txt"])
                .unwrap();
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.catalog, Some(PathBuf::from("x.txt")));
        assert_eq!(
            args.command,
            Some(Command::Shuffle {
                titles: vec!["Echo".to_string(), "Aurora".to_string()]
            })
        );
    }

    #[test]
    fn test_shuffle_requires_titles() {
        assert!(Args::try_parse_from(["songbook", "shuffle"]).is_err());
    }
}
