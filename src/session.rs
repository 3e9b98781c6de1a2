//! # Session Module
//!
//! The interactive menu loop: search the catalog, add songs to a playlist,
//! show the playlist and play it in shuffled order.
//!
//! The session reads from any [`BufRead`] and writes to any [`Write`], so the
//! binary drives it with stdin/stdout and the tests with in-memory buffers.
//! End of input is treated like choosing "Exit".

use crate::catalog::Catalog;
use crate::playlist::Playlist;
use crate::record::Record;
use anyhow::{Context, Result};
use log::{debug, info};
use rand::Rng;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const MENU: &str = "\n--- Music Library Menu ---
1. Search for a song
2. Add song to playlist
3. Display playlist
4. Play songs in shuffle
5. Exit
";

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Search,
    AddToPlaylist,
    DisplayPlaylist,
    Shuffle,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(Self::Search),
            "2" => Ok(Self::AddToPlaylist),
            "3" => Ok(Self::DisplayPlaylist),
            "4" => Ok(Self::Shuffle),
            "5" => Ok(Self::Exit),
            other => anyhow::bail!("unknown menu choice `{other}'"),
        }
    }
}

/// Write each record followed by a blank line.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_records<'r, W, I>(output: &mut W, records: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'r Record>,
{
    for record in records {
        writeln!(output, "{record}\n")?;
    }
    Ok(())
}

/// State of one interactive session.
pub struct Session<'a, R> {
    catalog: &'a Catalog,
    playlist: Playlist<'a>,
    rng: R,
}

impl<'a, R: Rng> Session<'a, R> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, rng: R) -> Self {
        Self {
            catalog,
            playlist: Playlist::new(),
            rng,
        }
    }

    #[must_use]
    pub fn playlist(&self) -> &Playlist<'a> {
        &self.playlist
    }

    /// Run the menu loop until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run<I, O>(&mut self, mut input: I, output: &mut O) -> Result<()>
    where
        I: BufRead,
        O: Write,
    {
        info!("Session started with {} songs", self.catalog.len());

        loop {
            output.write_all(MENU.as_bytes())?;
            write!(output, "Enter your choice: ")?;
            output.flush()?;

            let Some(line) = read_line(&mut input)? else {
                debug!("Input closed, ending session");
                break;
            };

            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(e) => {
                    debug!("{e}");
                    writeln!(output, "Invalid choice. Try again.")?;
                    continue;
                }
            };

            if choice == MenuChoice::Exit {
                writeln!(output, "Exiting...")?;
                break;
            }
            if !self.handle(choice, &mut input, output)? {
                break;
            }
        }

        output.flush().context("Failed to flush session output")?;
        Ok(())
    }

    /// Returns `false` once input has run out.
    fn handle<I, O>(&mut self, choice: MenuChoice, input: &mut I, output: &mut O) -> Result<bool>
    where
        I: BufRead,
        O: Write,
    {
        match choice {
            MenuChoice::Search => {
                let Some(title) = prompt(input, output, "Enter song name to search: ")? else {
                    return Ok(false);
                };
                match self.catalog.search(&title) {
                    Some(record) => writeln!(output, "Song found:\n{record}")?,
                    None => writeln!(output, "Song not found.")?,
                }
            }
            MenuChoice::AddToPlaylist => {
                let Some(title) = prompt(input, output, "Enter song name to add to playlist: ")?
                else {
                    return Ok(false);
                };
                match self.catalog.search(&title) {
                    Some(record) => {
                        self.playlist.append(record);
                        writeln!(output, "Song added to playlist.")?;
                    }
                    None => writeln!(output, "Song not found.")?,
                }
            }
            MenuChoice::DisplayPlaylist => {
                writeln!(output, "Your playlist:")?;
                match self.playlist.list_in_insertion_order() {
                    Some(entries) => {
                        write_records(output, entries)?;
                        writeln!(output, "Total duration: {:.2}", self.playlist.total_duration())?;
                    }
                    None => writeln!(output, "Playlist is empty.")?,
                }
            }
            MenuChoice::Shuffle => {
                writeln!(output, "Playing songs in shuffle:")?;
                let order = self.playlist.shuffle_and_play(&mut self.rng);
                if order.is_empty() {
                    writeln!(output, "Playlist is empty.")?;
                } else {
                    write_records(output, order)?;
                }
            }
            MenuChoice::Exit => {}
        }
        Ok(true)
    }
}

fn prompt<I, O>(input: &mut I, output: &mut O, message: &str) -> Result<Option<String>>
where
    I: BufRead,
    O: Write,
{
    write!(output, "{message}")?;
    output.flush()?;
    read_line(input)
}

/// Next line without its line terminator; `None` at end of input.
/// Titles are matched exactly, so no other whitespace is removed.
fn read_line<I: BufRead>(input: &mut I) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read input")? == 0 {
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}
