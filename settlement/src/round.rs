//! Round session context
//!
//! Owns everything a round needs: configuration, roster, scoreboard and the
//! score store. Each engine call goes through an explicit context; there is
//! no process-wide round state.
//!
//! # Lifecycle
//!
//! 1. **Setup**: `configure_roster` fixes players and carts
//! 2. **Play**: `record_hole` writes scores hole by hole (re-entry overwrites)
//! 3. **Settle**: `cumulative` / `transfer_plan` re-derive balances on demand
//! 4. **Finish**: every hole complete, or `reset` clears the round
//!
//! The in-memory round is updated before the store is written. A failed
//! write is returned to the caller but the local state is kept, so play can
//! continue while the store is unreachable.

use crate::{
    accumulator::RoundAccumulator,
    config::Config,
    engine::SettlementEngine,
    netting::TransferPlanner,
    report::RoundReport,
    types::*,
    Error, Result,
};
use scorecard::{Roster, ScoreBoard, ScoreStore};

/// A round in progress
#[derive(Debug)]
pub struct RoundContext<S> {
    config: Config,
    roster: Roster,
    board: ScoreBoard,
    store: S,
    accumulator: RoundAccumulator,
    planner: TransferPlanner,
}

impl<S: ScoreStore> RoundContext<S> {
    /// Open a round from whatever the store holds
    pub fn open(config: Config, store: S) -> Result<Self> {
        config.validate()?;

        let roster = store.load_roster()?;
        let mut board = store.load_scores()?;
        board.retain_players(&roster);

        let engine = SettlementEngine::new(config.stakes.clone());
        let accumulator = RoundAccumulator::new(engine, config.round.total_holes);

        tracing::info!(
            players = roster.len(),
            holes = config.round.total_holes,
            stroke_mode = %config.stakes.stroke_mode,
            "Round opened"
        );

        Ok(Self {
            config,
            roster,
            board,
            store,
            accumulator,
            planner: TransferPlanner::new(),
        })
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current roster
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Current scores
    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.board
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Set up players and carts
    ///
    /// A player's id is their seat on the form, blank seats included, so
    /// scores already entered stay with the same seat; scores of removed
    /// seats are dropped.
    pub fn configure_roster<N: AsRef<str>>(&mut self, names: &[N], groups: &[u32]) -> Result<&Roster> {
        let roster = Roster::from_names(names, groups, self.config.store.max_players)?;
        self.install_roster(roster)
    }

    /// Set up players and spread them evenly over `carts` carts
    pub fn configure_carts<N: AsRef<str>>(&mut self, names: &[N], carts: u32) -> Result<&Roster> {
        let roster = Roster::with_carts(names, carts, self.config.store.max_players)?;
        self.install_roster(roster)
    }

    /// Par to offer for a hole: the recorded one, else the default
    pub fn par_for(&self, hole: HoleNumber) -> Strokes {
        self.board.par(hole).unwrap_or(self.config.round.default_par)
    }

    /// Record a whole hole and settle it
    ///
    /// `scores` must cover every roster player exactly once, in any order.
    pub fn record_hole(
        &mut self,
        hole: HoleNumber,
        par: Strokes,
        scores: &[(PlayerId, Strokes)],
    ) -> Result<HoleSettlement> {
        self.check_hole(hole)?;

        if let Some(&(unknown, _)) = scores.iter().find(|(id, _)| !self.roster.contains(*id)) {
            return Err(Error::InvalidInput(format!("player {} is not on the roster", unknown)));
        }
        let ordered: Vec<(PlayerId, Strokes)> = self
            .roster
            .ids()
            .map(|id| {
                scores
                    .iter()
                    .find(|(p, _)| *p == id)
                    .copied()
                    .ok_or_else(|| Error::InvalidInput(format!("missing score for player {}", id)))
            })
            .collect::<Result<_>>()?;
        if ordered.len() != scores.len() {
            return Err(Error::InvalidInput(format!(
                "expected {} scores, got {}",
                ordered.len(),
                scores.len()
            )));
        }

        // Settling first validates the input before anything is written
        let settlement = self
            .accumulator
            .engine()
            .settle_hole(&ordered, par, self.roster.len())?;

        self.board.record_hole(hole, par, &ordered)?;
        if settlement.is_forfeit() {
            tracing::warn!(hole, reasons = ?settlement.forfeit.describe(), "Forfeit hole recorded");
        } else {
            tracing::info!(hole, par, "Hole recorded");
        }

        self.persist("hole", |store| store.save_hole_score(hole, par, &ordered))?;
        Ok(settlement)
    }

    /// Settlement of one hole, `None` while it is incomplete
    pub fn hole_settlement(&self, hole: HoleNumber) -> Result<Option<HoleSettlement>> {
        self.check_hole(hole)?;

        let (Some(par), Some(scores)) = (self.board.par(hole), self.board.hole_scores(hole, &self.roster)) else {
            return Ok(None);
        };
        let settlement = self
            .accumulator
            .engine()
            .settle_hole(&scores, par, self.roster.len())?;
        Ok(Some(settlement))
    }

    /// Transfers settling a single hole
    pub fn hole_transfer_plan(&self, hole: HoleNumber) -> Result<Vec<Transfer>> {
        match self.hole_settlement(hole)? {
            Some(settlement) => self.planner.plan_transfers(&settlement.ledger.balances()),
            None => Ok(Vec::new()),
        }
    }

    /// Every complete hole, settled
    pub fn settled_holes(&self) -> Result<Vec<SettledHole>> {
        self.accumulator.settled_holes(&self.roster, &self.board)
    }

    /// Cumulative balances, re-derived from current scores
    pub fn cumulative(&self) -> Result<BalanceSheet> {
        self.accumulator.cumulative(&self.roster, &self.board)
    }

    /// Transfers settling the round so far
    pub fn transfer_plan(&self) -> Result<Vec<Transfer>> {
        let balances = self.cumulative()?;
        self.planner.plan_transfers(&balances)
    }

    /// First hole not yet complete
    pub fn next_hole(&self) -> Option<HoleNumber> {
        (1..=self.config.round.total_holes).find(|&h| !self.board.is_complete(h, &self.roster))
    }

    /// Check if every hole of the round is complete
    pub fn is_finished(&self) -> bool {
        !self.roster.is_empty() && self.next_hole().is_none()
    }

    /// Round summary for the results screen
    pub fn report(&self) -> Result<RoundReport> {
        let settled = self.settled_holes()?;
        let transfers = self.transfer_plan()?;
        Ok(RoundReport::build(&self.roster, &settled, transfers))
    }

    /// Clear roster, scores and the stored copy
    pub fn reset(&mut self) -> Result<()> {
        self.roster = Roster::empty();
        self.board.clear();

        tracing::info!("Round reset");
        self.persist("reset", |store| store.clear())
    }

    fn install_roster(&mut self, roster: Roster) -> Result<&Roster> {
        self.board.retain_players(&roster);
        self.roster = roster;

        tracing::info!(
            players = self.roster.len(),
            carts = self.roster.cart_count(),
            "Roster configured"
        );

        let roster = self.roster.clone();
        self.persist("roster", |store| store.save_roster(&roster))?;
        Ok(&self.roster)
    }

    fn check_hole(&self, hole: HoleNumber) -> Result<()> {
        let total_holes = self.config.round.total_holes;
        if hole == 0 || hole > total_holes {
            return Err(Error::HoleOutOfRange { hole, total_holes });
        }
        Ok(())
    }

    fn persist<F>(&mut self, what: &str, write: F) -> Result<()>
    where
        F: FnOnce(&mut S) -> scorecard::Result<()>,
    {
        write(&mut self.store).map_err(|e| {
            tracing::warn!(error = %e, what, "Store write failed; round kept locally");
            Error::Store(e)
        })
    }
}
