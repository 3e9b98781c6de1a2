//! # Playlist Module
//!
//! A [`Playlist`] borrows records from a [`Catalog`](crate::catalog::Catalog),
//! so the catalog has to outlive every playlist built against it. Adding the
//! same song twice is allowed and produces two entries.
//!
//! Entries are kept in the order they were added, oldest first.
//!
//! ```
//! use songbook::{catalog::Catalog, playlist::Playlist};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut catalog = Catalog::new();
//! catalog.insert_track("Echo", "Nadia Vale", "Signals", "Synthpop", 3.75)?;
//! catalog.insert_track("Aurora", "The Lanterns", "Northbound", "Indie", 4.1)?;
//!
//! let mut playlist = Playlist::new();
//! for title in ["Echo", "Aurora"] {
//!     if let Some(record) = catalog.search(title) {
//!         playlist.append(record);
//!     }
//! }
//!
//! let shuffled = playlist.shuffle_and_play(&mut StdRng::seed_from_u64(1));
//! assert_eq!(shuffled.len(), 2);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::record::Record;
use log::{debug, trace};
use rand::Rng;
use std::slice;

#[derive(Debug, Default, Clone)]
pub struct Playlist<'a> {
    entries: Vec<&'a Record>,
}

impl<'a> Playlist<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry referencing `record`.
    pub fn append(&mut self, record: &'a Record) {
        debug!("Adding `{}' to playlist.", record.title());
        self.entries.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order they were added.
    ///
    /// Returns `None` for an empty playlist so callers can tell "nothing
    /// added yet" apart from a listing. The iterator is `Clone`, so a listing
    /// can be restarted.
    #[must_use]
    pub fn list_in_insertion_order(&self) -> Option<Entries<'_, 'a>> {
        if self.entries.is_empty() {
            return None;
        }
        Some(Entries {
            inner: self.entries.iter(),
        })
    }

    /// A uniformly random playing order of the current entries.
    ///
    /// Fisher–Yates over a copy of the entry references: for `i` from the
    /// last index down to 1, swap position `i` with a position drawn
    /// uniformly from `0..=i`. The playlist itself is not reordered. An empty
    /// playlist yields an empty order.
    pub fn shuffle_and_play<R>(&self, rng: &mut R) -> Vec<&'a Record>
    where
        R: Rng + ?Sized,
    {
        let mut order = self.entries.clone();
        for i in (1..order.len()).rev() {
            let j = rng.gen_range(0..=i);
            order.swap(i, j);
        }
        trace!("Shuffled {} playlist entries.", order.len());
        order
    }

    /// Sum of the entry durations, counting repeated songs once per entry.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.entries.iter().map(|record| record.duration()).sum()
    }
}

/// Iterator returned by [`Playlist::list_in_insertion_order`].
#[derive(Debug, Clone)]
pub struct Entries<'p, 'a> {
    inner: slice::Iter<'p, &'a Record>,
}

impl<'a> Iterator for Entries<'_, 'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_, '_> {}
