//! Core types for settlement engine

use serde::{Deserialize, Serialize};
use std::fmt;

pub use scorecard::{HoleNumber, PlayerId, Strokes};

/// Integer currency units
pub type Money = i64;

/// Why a hole counts as a forfeit ("baepan") hole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForfeitReason {
    /// Someone scored under par
    UnderPar,
    /// Someone scored triple bogey or worse
    BlowUp,
    /// Double bogey or worse on a par 3
    ParThreeDoubleBogey,
    /// More than half the players share one score
    MajorityTie {
        /// Players on the most common score
        tied: usize,
    },
}

impl fmt::Display for ForfeitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForfeitReason::UnderPar => write!(f, "under par"),
            ForfeitReason::BlowUp => write!(f, "triple bogey or worse"),
            ForfeitReason::ParThreeDoubleBogey => write!(f, "double bogey or worse on par 3"),
            ForfeitReason::MajorityTie { tied } => write!(f, "majority tie ({} players)", tied),
        }
    }
}

/// Forfeit flag plus the conditions that raised it, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitStatus {
    /// Triggered conditions
    pub reasons: Vec<ForfeitReason>,
}

impl ForfeitStatus {
    /// Check if any condition triggered
    pub fn is_forfeit(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Human-readable reasons
    pub fn describe(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }
}

/// One player's result on a hole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Player
    pub player_id: PlayerId,

    /// Strokes played
    pub strokes: Strokes,

    /// Stroke settlement part
    pub stroke_amount: Money,

    /// Under-par bonus part
    pub bonus_amount: Money,
}

impl LedgerLine {
    /// Net delta for the hole
    pub fn total(&self) -> Money {
        self.stroke_amount + self.bonus_amount
    }
}

/// Zero-sum money deltas for one hole, in roster order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleLedger {
    /// Lines in roster order
    pub lines: Vec<LedgerLine>,
}

impl HoleLedger {
    /// Net delta for a player (0 if absent)
    pub fn get(&self, player: PlayerId) -> Money {
        self.lines
            .iter()
            .find(|l| l.player_id == player)
            .map(LedgerLine::total)
            .unwrap_or(0)
    }

    /// Sum of all deltas (0 for a valid ledger)
    pub fn sum(&self) -> Money {
        self.lines.iter().map(LedgerLine::total).sum()
    }

    /// Net deltas as a balance sheet
    pub fn balances(&self) -> BalanceSheet {
        let mut sheet = BalanceSheet::new();
        for line in &self.lines {
            sheet.add(line.player_id, line.total());
        }
        sheet
    }
}

/// Result of settling one hole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleSettlement {
    /// Par the hole was settled against
    pub par: Strokes,

    /// Stake per stroke applied
    pub stake: Money,

    /// Per-player deltas
    pub ledger: HoleLedger,

    /// Forfeit flag and reasons
    pub forfeit: ForfeitStatus,
}

impl HoleSettlement {
    /// Check forfeit flag
    pub fn is_forfeit(&self) -> bool {
        self.forfeit.is_forfeit()
    }
}

/// Settlement of a numbered hole within a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledHole {
    /// Hole number
    pub hole_number: HoleNumber,

    /// Hole result
    pub settlement: HoleSettlement,
}

/// One player's balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Player
    pub player_id: PlayerId,

    /// Positive = collects, negative = pays
    pub amount: Money,
}

/// Ordered player balances (insertion order is roster order)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    entries: Vec<Balance>,
}

impl BalanceSheet {
    /// Create empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero balance for every player, in the given order
    pub fn zeroed(players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            entries: players
                .into_iter()
                .map(|player_id| Balance { player_id, amount: 0 })
                .collect(),
        }
    }

    /// Add to a player's balance, appending the player if new
    pub fn add(&mut self, player: PlayerId, amount: Money) {
        match self.entries.iter_mut().find(|b| b.player_id == player) {
            Some(balance) => balance.amount += amount,
            None => self.entries.push(Balance {
                player_id: player,
                amount,
            }),
        }
    }

    /// Fold another sheet into this one
    pub fn absorb(&mut self, other: &BalanceSheet) {
        for balance in other.iter() {
            self.add(balance.player_id, balance.amount);
        }
    }

    /// Player's balance (0 if absent)
    pub fn get(&self, player: PlayerId) -> Money {
        self.entries
            .iter()
            .find(|b| b.player_id == player)
            .map(|b| b.amount)
            .unwrap_or(0)
    }

    /// Balances in order
    pub fn iter(&self) -> impl Iterator<Item = &Balance> + '_ {
        self.entries.iter()
    }

    /// Number of players
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no players
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all players
    pub fn total(&self) -> Money {
        self.entries.iter().map(|b| b.amount).sum()
    }

    /// Check zero-sum
    pub fn is_balanced(&self) -> bool {
        self.total() == 0
    }
}

impl FromIterator<(PlayerId, Money)> for BalanceSheet {
    fn from_iter<I: IntoIterator<Item = (PlayerId, Money)>>(iter: I) -> Self {
        let mut sheet = BalanceSheet::new();
        for (player, amount) in iter {
            sheet.add(player, amount);
        }
        sheet
    }
}

/// Directed payment realizing part of a balance sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Payer
    pub from: PlayerId,

    /// Payee
    pub to: PlayerId,

    /// Amount (always positive)
    pub amount: Money,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u32) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_balance_sheet_keeps_order() {
        let mut sheet = BalanceSheet::zeroed([p(2), p(0), p(1)]);
        sheet.add(p(0), 500);
        sheet.add(p(2), -500);
        sheet.add(p(7), 0);

        let order: Vec<_> = sheet.iter().map(|b| b.player_id).collect();
        assert_eq!(order, vec![p(2), p(0), p(1), p(7)]);
        assert_eq!(sheet.get(p(0)), 500);
        assert_eq!(sheet.get(p(9)), 0);
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_absorb() {
        let mut total: BalanceSheet = [(p(0), 1000), (p(1), -1000)].into_iter().collect();
        let hole: BalanceSheet = [(p(0), -3000), (p(1), 3000)].into_iter().collect();

        total.absorb(&hole);
        assert_eq!(total.get(p(0)), -2000);
        assert_eq!(total.get(p(1)), 2000);
    }

    #[test]
    fn test_ledger_totals() {
        let ledger = HoleLedger {
            lines: vec![
                LedgerLine {
                    player_id: p(0),
                    strokes: 3,
                    stroke_amount: 2000,
                    bonus_amount: 2000,
                },
                LedgerLine {
                    player_id: p(1),
                    strokes: 5,
                    stroke_amount: -2000,
                    bonus_amount: -2000,
                },
            ],
        };

        assert_eq!(ledger.get(p(0)), 4000);
        assert_eq!(ledger.sum(), 0);
        assert_eq!(ledger.balances().get(p(1)), -4000);
    }

    #[test]
    fn test_forfeit_reason_text() {
        let status = ForfeitStatus {
            reasons: vec![ForfeitReason::UnderPar, ForfeitReason::MajorityTie { tied: 3 }],
        };
        assert!(status.is_forfeit());
        assert_eq!(status.describe(), vec!["under par", "majority tie (3 players)"]);
        assert!(!ForfeitStatus::default().is_forfeit());
    }
}
