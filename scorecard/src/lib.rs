//! Golf Battle Scorecard
//!
//! Roster and per-hole score data for a wager round, plus the storage
//! collaborator that persists them.
//!
//! # Architecture
//!
//! - **Roster**: ordered players with stable ids and cart numbers
//! - **ScoreBoard**: par per hole and strokes per (player, hole)
//! - **ScoreStore**: load/save seam used by the settlement engine
//! - **SheetStore**: spreadsheet-layout workbook persisted as JSON

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod storage;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use types::{
    auto_groups, validate_hole, HoleNumber, HoleRecord, Player, PlayerId, Roster, ScoreBoard, Strokes,
    MAX_HOLES, MAX_PLAYERS,
};
pub use storage::{MemoryStore, ScoreStore, SheetStore, Workbook, Worksheet};
pub use config::Config;
