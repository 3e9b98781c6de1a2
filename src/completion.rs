//! # Shell Completion Module
//!
//! This module provides shell completion functionality for Songbook:
//! - Generation of completion scripts for various shells
//! - Title completions from the loaded catalog
//!
//! ## Usage
//!
//! ```bash
//! # Generate bash completions
//! songbook completion bash > ~/.local/share/bash-completion/completions/songbook
//!
//! # Generate zsh completions
//! songbook completion zsh > ~/.config/zsh/completions/_songbook
//! ```

use crate::catalog::Catalog;
use crate::cli::Shell;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io::{self, Write};

/// Generate shell completions for the given shell
pub fn generate_completions<G: Generator, W: Write>(gen: G, cmd: &mut Command, out: &mut W) {
    let bin_name = cmd.get_name().to_string();
    generate(gen, cmd, bin_name, out);
}

/// Map our CLI shell names onto `clap_complete`'s.
#[must_use]
pub fn shell_to_completion_shell(shell: Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}

/// Quote a title for shells that split on whitespace.
fn quote_title(title: &str) -> String {
    if title.contains([' ', '\t', '"']) {
        format!("\"{}\"", title.replace('"', "\\\""))
    } else {
        title.to_string()
    }
}

/// Print every catalog title, one per line, in catalog order.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_title_completions<W: Write>(catalog: &Catalog, out: &mut W) -> io::Result<()> {
    for title in catalog.titles().filter(|title| !title.is_empty()) {
        writeln!(out, "{}", quote_title(title))?;
    }
    Ok(())
}
