//! Per-hole settlement
//!
//! Computes one hole's zero-sum ledger from the players' strokes and the
//! hole's par.
//!
//! # Rules
//!
//! 1. **Forfeit ("baepan") detection**: under par, triple bogey or worse,
//!    double bogey or worse on a par 3, or more than half the players tied.
//!    Conditions are evaluated independently and reported in that order.
//! 2. **Stroke settlement**: for every pair of players the higher score pays
//!    the lower score `stake` per stroke of difference.
//! 3. **Bonus**: every under-par player collects the bonus from every other
//!    player, other under-par players included.
//!
//! # Example
//!
//! ```text
//! Par 4, A = 3, B = 5
//!
//! Strokes: A +2000, B -2000   (2 strokes x 1000)
//! Bonus:   A +2000, B -2000   (A under par)
//!
//! Ledger:  A +4000, B -4000
//! ```

use crate::{
    config::{StakeConfig, StrokeMode},
    types::*,
    Error, Result,
};
use std::collections::{BTreeMap, BTreeSet};

/// Evaluate the forfeit conditions for one hole
pub fn detect_forfeit(scores: &[Strokes], par: Strokes, player_count: usize) -> ForfeitStatus {
    let mut reasons = Vec::new();

    if scores.iter().any(|&s| s < par) {
        reasons.push(ForfeitReason::UnderPar);
    }
    if scores.iter().any(|&s| s.saturating_sub(par) >= 3) {
        reasons.push(ForfeitReason::BlowUp);
    }
    if par == 3 && scores.iter().any(|&s| s.saturating_sub(par) >= 2) {
        reasons.push(ForfeitReason::ParThreeDoubleBogey);
    }

    let mut counts: BTreeMap<Strokes, usize> = BTreeMap::new();
    for &s in scores {
        *counts.entry(s).or_insert(0) += 1;
    }
    let tied = counts.values().copied().max().unwrap_or(0);
    // Strictly more than half
    if tied * 2 > player_count {
        reasons.push(ForfeitReason::MajorityTie { tied });
    }

    ForfeitStatus { reasons }
}

/// Hole settlement engine
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    stakes: StakeConfig,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(stakes: StakeConfig) -> Self {
        Self { stakes }
    }

    /// Stake configuration in use
    pub fn stakes(&self) -> &StakeConfig {
        &self.stakes
    }

    /// Settle one hole
    ///
    /// `scores` must hold exactly one non-zero score per player, in roster
    /// order. With fewer than two players the ledger is all zeros.
    pub fn settle_hole(
        &self,
        scores: &[(PlayerId, Strokes)],
        par: Strokes,
        player_count: usize,
    ) -> Result<HoleSettlement> {
        self.validate(scores, par, player_count)?;

        let strokes: Vec<Strokes> = scores.iter().map(|&(_, s)| s).collect();
        let n = scores.len();

        if n < 2 {
            let zeros = vec![0; n];
            return Ok(HoleSettlement {
                par,
                stake: self.stakes.base_stake,
                ledger: build_ledger(scores, &zeros, &zeros),
                forfeit: ForfeitStatus::default(),
            });
        }

        let forfeit = detect_forfeit(&strokes, par, player_count);
        let stake = if forfeit.is_forfeit() {
            self.stakes.base_stake * self.stakes.forfeit_multiplier
        } else {
            self.stakes.base_stake
        };

        let stroke_money = match self.stakes.stroke_mode {
            StrokeMode::RoundRobin => round_robin(&strokes, stake),
            StrokeMode::ForfeitGated if forfeit.is_forfeit() => low_score_takes(&strokes, stake),
            StrokeMode::ForfeitGated => vec![0; n],
        };
        let bonus_money = under_par_bonus(&strokes, par, self.stakes.bonus_amount);

        let ledger = build_ledger(scores, &stroke_money, &bonus_money);
        if ledger.sum() != 0 {
            return Err(Error::InvariantViolation(format!(
                "hole ledger sums to {} instead of 0",
                ledger.sum()
            )));
        }

        if forfeit.is_forfeit() {
            tracing::debug!(par, reasons = ?forfeit.describe(), "Forfeit hole");
        }
        tracing::debug!(par, stake, players = n, "Hole settled");

        Ok(HoleSettlement {
            par,
            stake,
            ledger,
            forfeit,
        })
    }

    fn validate(&self, scores: &[(PlayerId, Strokes)], par: Strokes, player_count: usize) -> Result<()> {
        if par == 0 {
            return Err(Error::InvalidInput("par must be positive".to_string()));
        }
        if scores.len() != player_count {
            return Err(Error::InvalidInput(format!(
                "expected {} scores, got {}",
                player_count,
                scores.len()
            )));
        }

        let mut seen = BTreeSet::new();
        for &(player, strokes) in scores {
            if !seen.insert(player) {
                return Err(Error::InvalidInput(format!("duplicate score for player {}", player)));
            }
            if strokes == 0 {
                return Err(Error::InvalidInput(format!("missing score for player {}", player)));
            }
        }
        Ok(())
    }
}

/// Every pair settles every stroke of difference
fn round_robin(strokes: &[Strokes], stake: Money) -> Vec<Money> {
    let n = strokes.len();
    let mut money = vec![0; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let diff = Money::from(strokes[j]) - Money::from(strokes[i]);
            let amount = diff * stake;
            money[i] += amount;
            money[j] -= amount;
        }
    }
    money
}

/// Everyone off the low score pays each low-score player
fn low_score_takes(strokes: &[Strokes], stake: Money) -> Vec<Money> {
    let n = strokes.len();
    let mut money = vec![0; n];
    let Some(&min) = strokes.iter().min() else {
        return money;
    };

    let winners: Vec<usize> = (0..n).filter(|&i| strokes[i] == min).collect();
    for payer in (0..n).filter(|&i| strokes[i] != min) {
        let amount = Money::from(strokes[payer] - min) * stake;
        for &winner in &winners {
            money[payer] -= amount;
            money[winner] += amount;
        }
    }
    money
}

/// Every under-par player collects the bonus from every other player
fn under_par_bonus(strokes: &[Strokes], par: Strokes, bonus: Money) -> Vec<Money> {
    let n = strokes.len();
    let mut money = vec![0; n];
    for winner in (0..n).filter(|&i| strokes[i] < par) {
        for payer in (0..n).filter(|&i| i != winner) {
            money[winner] += bonus;
            money[payer] -= bonus;
        }
    }
    money
}

fn build_ledger(scores: &[(PlayerId, Strokes)], stroke_money: &[Money], bonus_money: &[Money]) -> HoleLedger {
    HoleLedger {
        lines: scores
            .iter()
            .zip(stroke_money.iter().zip(bonus_money))
            .map(|(&(player_id, strokes), (&stroke_amount, &bonus_amount))| LedgerLine {
                player_id,
                strokes,
                stroke_amount,
                bonus_amount,
            })
            .collect(),
    }
}
