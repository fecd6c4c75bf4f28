//! Golf Battle Settlement Engine
//!
//! Settles golf wagers hole by hole and reduces the round's balances to a
//! short list of person-to-person transfers.
//!
//! # Architecture
//!
//! 1. **Hole settlement**: stroke round-robin plus under-par bonus, with
//!    forfeit ("baepan") detection
//! 2. **Accumulation**: cumulative balances re-derived from current scores
//! 3. **Transfer planning**: greedy largest-first matching of payers and
//!    receivers
//! 4. **Round context**: roster, scores and store for one round
//!
//! # Invariants
//!
//! - Every hole ledger sums to zero
//! - Cumulative balances sum to zero
//! - A transfer plan, applied as signed flows, reproduces its balances
//!
//! # Example
//!
//! ```no_run
//! use scorecard::{MemoryStore, PlayerId};
//! use settlement::{Config, RoundContext};
//!
//! fn main() -> settlement::Result<()> {
//!     let mut round = RoundContext::open(Config::default(), MemoryStore::new())?;
//!     round.configure_roster(&["Hong", "Kim"], &[1, 1])?;
//!
//!     let hole = round.record_hole(1, 4, &[(PlayerId::new(0), 3), (PlayerId::new(1), 5)])?;
//!     println!("forfeit: {:?}", hole.forfeit.describe());
//!
//!     for transfer in round.transfer_plan()? {
//!         println!("{}", transfer);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod engine;
pub mod netting;
pub mod accumulator;
pub mod round;
pub mod report;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, StakeConfig, StrokeMode};
pub use engine::{detect_forfeit, SettlementEngine};
pub use netting::TransferPlanner;
pub use accumulator::RoundAccumulator;
pub use round::RoundContext;
pub use report::RoundReport;
