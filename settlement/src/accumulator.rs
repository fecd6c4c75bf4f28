//! Cumulative balances across a round
//!
//! Balances are never stored. Every query re-settles each complete hole from
//! the current scores, so edited scores are reflected immediately.

use crate::{engine::SettlementEngine, types::*, Result};
use scorecard::{Roster, ScoreBoard};

/// Folds per-hole ledgers into per-player balances
#[derive(Debug, Clone)]
pub struct RoundAccumulator {
    engine: SettlementEngine,
    total_holes: HoleNumber,
}

impl RoundAccumulator {
    /// Create new accumulator over holes `1..=total_holes`
    pub fn new(engine: SettlementEngine, total_holes: HoleNumber) -> Self {
        Self {
            engine,
            total_holes,
        }
    }

    /// Engine used for each hole
    pub fn engine(&self) -> &SettlementEngine {
        &self.engine
    }

    /// Settle every complete hole, in hole order
    ///
    /// Partially entered holes are skipped.
    pub fn settled_holes(&self, roster: &Roster, board: &ScoreBoard) -> Result<Vec<SettledHole>> {
        let mut holes = Vec::new();

        for hole_number in 1..=self.total_holes {
            let (Some(par), Some(scores)) = (board.par(hole_number), board.hole_scores(hole_number, roster)) else {
                continue;
            };

            let settlement = self.engine.settle_hole(&scores, par, roster.len())?;
            holes.push(SettledHole {
                hole_number,
                settlement,
            });
        }

        Ok(holes)
    }

    /// Sum of all complete holes' ledgers, in roster order
    pub fn cumulative(&self, roster: &Roster, board: &ScoreBoard) -> Result<BalanceSheet> {
        let mut total = BalanceSheet::zeroed(roster.ids());

        let holes = self.settled_holes(roster, board)?;
        for hole in &holes {
            total.absorb(&hole.settlement.ledger.balances());
        }

        tracing::debug!(
            holes = holes.len(),
            players = roster.len(),
            "Cumulative balances recomputed"
        );

        Ok(total)
    }
}
