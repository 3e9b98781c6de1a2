//! In-memory song catalog with playlists and shuffle play.
//!
//! Core modules:
//! - [`record`] - Immutable track records
//! - [`catalog`] - AVL tree indexing records by title
//! - [`playlist`] - Borrowed playlists and Fisher–Yates shuffle
//!
//! ### Supporting Modules
//!
//! - [`loader`] - Bulk loading from comma-separated text or JSON
//! - [`session`] - Interactive menu loop
//! - [`config`] - Data directory and runtime configuration
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use songbook::{catalog::Catalog, loader, playlist::Playlist};
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::io::Cursor;
//!
//! let source = "Zephyr, Gale Force, Trade Winds, Ambient, 5.20
//! Aurora, The Lanterns, Northbound, Indie, 4.10
//! Mosaic, Tess Ortiz, Fragments, Jazz, 6.00
//! Echo, Nadia Vale, Signals, Synthpop, 3.75";
//!
//! let mut catalog = Catalog::new();
//! let summary = loader::load_batch(&mut catalog, loader::read_delimited(Cursor::new(source))?);
//! assert_eq!(summary.inserted, 4);
//!
//! let mut playlist = Playlist::new();
//! if let Some(echo) = catalog.search("Echo") {
//!     playlist.append(echo);
//! }
//! for record in playlist.shuffle_and_play(&mut StdRng::seed_from_u64(7)) {
//!     println!("{record}");
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Fallible functions return `anyhow::Result`. A title that is not in the
//! catalog is not an error: [`catalog::Catalog::search`] returns `None`.
//! Inserting a title twice keeps the first record.
//!
//! ## Logging
//!
//! The library logs through the `log` facade; the binary installs
//! `env_logger`, so `RUST_LOG=songbook=trace` shows individual rotations.

pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod loader;
pub mod playlist;
pub mod record;
pub mod session;
