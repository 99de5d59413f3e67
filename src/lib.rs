//! bubblepack
//!
//! A lightweight Rust library for computing **proportional-area bubble layouts**:
//! every item becomes a circle whose area encodes its value, circles are packed
//! by mutual tangency, pairwise overlap stays under a bound, and everything stays
//! inside the canvas. Pairs with the `bubblepack` CLI.
//!
//! ### Features
//! - Deterministic greedy placement with depth-first backtracking
//! - Drop-and-retry degradation with an explicit [`PackOutcome`]
//! - Load items from CSV or JSON with a configurable field mapping
//! - Save placements as CSV or JSON, summarize them, and preview them as SVG/PNG
//!
//! ### Example
//! ```no_run
//! use bubblepack::{CirclePacker, ItemFields, PackConfig};
//!
//! let items = bubblepack::storage::load_items("sales.csv", &ItemFields::default())?;
//! let (items, _removed) = bubblepack::storage::positive_items(items);
//! let outcome = CirclePacker::new(PackConfig::default())?.pack(&items, 800.0, 600.0)?;
//! bubblepack::storage::save_json(outcome.circles(), "layout.json")?;
//! let preview = bubblepack::viz::PreviewOptions::default();
//! bubblepack::viz::render_preview(outcome.circles(), 800.0, 600.0, "layout.svg", &preview)?;
//! println!("{:#?}", bubblepack::stats::summarize(&outcome, items.len(), 800.0, 600.0));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod models;
pub mod packer;
pub mod stats;
pub mod storage;
pub mod viz;

pub use config::{CandidateSort, FirstPosition, PackConfig};
pub use error::{ConfigError, LoadError, PackError};
pub use models::{Item, ItemFields, PlacedCircle};
pub use packer::{CirclePacker, PackOutcome, pack};
