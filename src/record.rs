//! # Record Module
//!
//! A [`Record`] is the immutable description of one track in the catalog.
//! Records are keyed by `title`; everything else is payload that the catalog
//! stores but never inspects.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One track of the catalog.
///
/// Fields are private so a `Record` cannot change after it has been placed in
/// the tree. Construct it through [`Record::new`], which rejects durations the
/// catalog could not meaningfully hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    title: String,
    artist: String,
    album: String,
    genre: String,
    /// Unit is whatever the source uses (the bundled samples use minutes).
    duration: f64,
}

impl Record {
    /// Create a record, validating the duration.
    ///
    /// # Errors
    ///
    /// Returns an "invalid input" error if `duration` is negative, NaN or
    /// infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use songbook::record::Record;
    ///
    /// let record = Record::new("Echo", "Nadia Vale", "Signals", "Synthpop", 3.75)?;
    /// assert_eq!(record.title(), "Echo");
    /// assert!(Record::new("Broken", "", "", "", -1.0).is_err());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        genre: impl Into<String>,
        duration: f64,
    ) -> Result<Self> {
        let title = title.into();
        if !duration.is_finite() || duration < 0.0 {
            anyhow::bail!("invalid input: duration `{duration}' for `{title}' must be a finite, non-negative number");
        }

        Ok(Self {
            title,
            artist: artist.into(),
            album: album.into(),
            genre: genre.into(),
            duration,
        })
    }

    /// Re-check a record that did not come through [`Record::new`],
    /// e.g. one deserialized from JSON.
    pub(crate) fn validated(self) -> Result<Self> {
        Self::new(self.title, self.artist, self.album, self.genre, self.duration)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn artist(&self) -> &str {
        &self.artist
    }

    #[must_use]
    pub fn album(&self) -> &str {
        &self.album
    }

    #[must_use]
    pub fn genre(&self) -> &str {
        &self.genre
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

/// Multi-line listing used by the session and the `search` command.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Song Name: {}", self.title)?;
        writeln!(f, "Artist: {}", self.artist)?;
        writeln!(f, "Album: {}", self.album)?;
        writeln!(f, "Genre: {}", self.genre)?;
        write!(f, "Duration: {:.2}", self.duration)
    }
}
