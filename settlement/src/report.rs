//! End-of-round report
//!
//! Score table, per-hole profit and loss, and the final transfer plan.
//! Presentation decides how to render it; [`RoundReport::to_json`] is the
//! hand-off format.

use crate::{types::*, Result};
use scorecard::Roster;
use serde::{Deserialize, Serialize};

/// One player's row in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerReport {
    /// Player
    pub player_id: PlayerId,

    /// Display name
    pub name: String,

    /// Cart number
    pub group: u32,

    /// Strokes per settled hole (same order as `RoundReport::holes`)
    pub strokes: Vec<Strokes>,

    /// Total strokes over settled holes
    pub total_strokes: Strokes,

    /// Ledger total per settled hole
    pub hole_money: Vec<Money>,

    /// Cumulative balance
    pub total_money: Money,
}

/// Round summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Settled holes with their par, ascending
    pub holes: Vec<scorecard::HoleRecord>,

    /// Holes flagged as forfeit
    pub forfeit_holes: Vec<HoleNumber>,

    /// One row per player, roster order
    pub players: Vec<PlayerReport>,

    /// Final transfers
    pub transfers: Vec<Transfer>,
}

impl RoundReport {
    /// Build from settled holes and the transfer plan
    pub fn build(roster: &Roster, settled: &[SettledHole], transfers: Vec<Transfer>) -> Self {
        let holes = settled
            .iter()
            .map(|h| scorecard::HoleRecord {
                hole_number: h.hole_number,
                par: h.settlement.par,
            })
            .collect();

        let forfeit_holes = settled
            .iter()
            .filter(|h| h.settlement.is_forfeit())
            .map(|h| h.hole_number)
            .collect();

        let players = roster
            .players()
            .iter()
            .map(|player| {
                let lines: Vec<&LedgerLine> = settled
                    .iter()
                    .filter_map(|h| {
                        h.settlement
                            .ledger
                            .lines
                            .iter()
                            .find(|l| l.player_id == player.id)
                    })
                    .collect();

                let strokes: Vec<Strokes> = lines.iter().map(|l| l.strokes).collect();
                let hole_money: Vec<Money> = lines.iter().map(|l| l.total()).collect();

                PlayerReport {
                    player_id: player.id,
                    name: player.name.clone(),
                    group: player.group,
                    total_strokes: strokes.iter().sum(),
                    total_money: hole_money.iter().sum(),
                    strokes,
                    hole_money,
                }
            })
            .collect();

        Self {
            holes,
            forfeit_holes,
            players,
            transfers,
        }
    }

    /// Display name for a player id
    pub fn name_of(&self, player: PlayerId) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.player_id == player)
            .map(|p| p.name.as_str())
    }

    /// Transfers spelled out with names
    pub fn transfer_lines(&self) -> Vec<String> {
        self.transfers
            .iter()
            .map(|t| {
                let from = self.name_of(t.from).map(str::to_string).unwrap_or_else(|| t.from.to_string());
                let to = self.name_of(t.to).map(str::to_string).unwrap_or_else(|| t.to.to_string());
                format!("{} -> {}: {}", from, to, t.amount)
            })
            .collect()
    }

    /// Serialize for the presentation layer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Amount in thousands, truncated toward zero (the score card's money unit)
pub fn in_thousands(amount: Money) -> Money {
    amount / 1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::StakeConfig, engine::SettlementEngine};
    use scorecard::MAX_PLAYERS;

    fn settled(engine: &SettlementEngine, hole_number: HoleNumber, par: Strokes, strokes: &[Strokes]) -> SettledHole {
        let scores: Vec<_> = strokes
            .iter()
            .enumerate()
            .map(|(i, &s)| (PlayerId::new(i as u32), s))
            .collect();
        SettledHole {
            hole_number,
            settlement: engine.settle_hole(&scores, par, scores.len()).unwrap(),
        }
    }

    #[test]
    fn test_report_tables() {
        let engine = SettlementEngine::new(StakeConfig::default());
        let roster = Roster::from_names(&["Hong", "Kim"], &[1, 2], MAX_PLAYERS).unwrap();
        let holes = vec![settled(&engine, 1, 4, &[3, 5]), settled(&engine, 2, 4, &[4, 5])];
        let transfers = vec![Transfer {
            from: PlayerId::new(1),
            to: PlayerId::new(0),
            amount: 5000,
        }];

        let report = RoundReport::build(&roster, &holes, transfers);

        assert_eq!(report.holes.len(), 2);
        assert_eq!(report.forfeit_holes, vec![1]);

        let hong = &report.players[0];
        assert_eq!(hong.strokes, vec![3, 4]);
        assert_eq!(hong.total_strokes, 7);
        assert_eq!(hong.hole_money, vec![4000, 1000]);
        assert_eq!(hong.total_money, 5000);
        assert_eq!(report.players[1].total_money, -5000);

        assert_eq!(report.transfer_lines(), vec!["Kim -> Hong: 5000"]);
    }

    #[test]
    fn test_json_hand_off() {
        let roster = Roster::from_names(&["Hong", "Kim"], &[], MAX_PLAYERS).unwrap();
        let report = RoundReport::build(&roster, &[], vec![]);

        let json = report.to_json().unwrap();
        let back: RoundReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert_eq!(back.players[1].total_strokes, 0);
    }

    #[test]
    fn test_in_thousands() {
        assert_eq!(in_thousands(4000), 4);
        assert_eq!(in_thousands(-2500), -2);
        assert_eq!(in_thousands(999), 0);
    }
}
