//! Transfer planning
//!
//! Reduces a zero-sum balance sheet to a short list of point-to-point
//! transfers.
//!
//! # Algorithm
//!
//! 1. Split balances into payers (negative) and receivers (positive)
//! 2. Sort both by amount, largest first (stable: ties keep roster order)
//! 3. Match the current payer with the current receiver for the smaller of
//!    the two remainders, advancing whichever side is settled
//!
//! # Example
//!
//! ```text
//! Balances:
//!   A: -5000
//!   B: +2000
//!   C: +3000
//!
//! Transfers:
//!   A pays C: 3000
//!   A pays B: 2000
//! ```
//!
//! Greedy matching is not always the theoretical minimum, but it never
//! needs more than `payers + receivers - 1` transfers.

use crate::{types::*, Error, Result};

/// One side of the matching with its unsettled remainder
#[derive(Debug, Clone, Copy)]
struct Position {
    player_id: PlayerId,
    remaining: Money,
}

/// Greedy transfer planner
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferPlanner;

impl TransferPlanner {
    /// Create new transfer planner
    pub fn new() -> Self {
        Self
    }

    /// Plan transfers that zero out every balance
    ///
    /// Fails if the balances do not sum to zero: that means the ledger that
    /// produced them is broken, and no transfer list can settle it.
    pub fn plan_transfers(&self, balances: &BalanceSheet) -> Result<Vec<Transfer>> {
        if !balances.is_balanced() {
            return Err(Error::InvariantViolation(format!(
                "balances sum to {} instead of 0",
                balances.total()
            )));
        }

        let (mut payers, mut receivers) = split_positions(balances);

        // Vec::sort_by is stable, so equal amounts keep roster order
        payers.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        receivers.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut transfers = Vec::with_capacity(payers.len() + receivers.len());
        let (mut p_idx, mut r_idx) = (0, 0);

        while p_idx < payers.len() && r_idx < receivers.len() {
            let payer = &mut payers[p_idx];
            let receiver = &mut receivers[r_idx];

            let amount = payer.remaining.min(receiver.remaining);
            if amount > 0 {
                transfers.push(Transfer {
                    from: payer.player_id,
                    to: receiver.player_id,
                    amount,
                });
            }

            payer.remaining -= amount;
            receiver.remaining -= amount;

            if payer.remaining == 0 {
                p_idx += 1;
            }
            if receiver.remaining == 0 {
                r_idx += 1;
            }
        }

        if p_idx != payers.len() || r_idx != receivers.len() {
            return Err(Error::InvariantViolation(format!(
                "matching ended with {} payers and {} receivers unsettled",
                payers.len() - p_idx,
                receivers.len() - r_idx
            )));
        }

        tracing::debug!(
            participants = balances.len(),
            transfers = transfers.len(),
            "Transfer plan computed"
        );

        Ok(transfers)
    }
}

/// Separate payers and receivers, dropping settled players
fn split_positions(balances: &BalanceSheet) -> (Vec<Position>, Vec<Position>) {
    let mut payers = Vec::new();
    let mut receivers = Vec::new();

    for balance in balances.iter() {
        if balance.amount < 0 {
            payers.push(Position {
                player_id: balance.player_id,
                remaining: -balance.amount,
            });
        } else if balance.amount > 0 {
            receivers.push(Position {
                player_id: balance.player_id,
                remaining: balance.amount,
            });
        }
    }

    (payers, receivers)
}

/// Apply transfers as signed flows on top of a starting sheet
///
/// Applied to a zeroed sheet, a plan reproduces the balances it came from.
pub fn apply_transfers(start: &BalanceSheet, transfers: &[Transfer]) -> BalanceSheet {
    let mut sheet = start.clone();
    for transfer in transfers {
        sheet.add(transfer.from, -transfer.amount);
        sheet.add(transfer.to, transfer.amount);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u32) -> PlayerId {
        PlayerId::new(id)
    }

    fn sheet(amounts: &[Money]) -> BalanceSheet {
        amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| (p(i as u32), a))
            .collect()
    }

    #[test]
    fn test_one_payer_two_receivers() {
        let transfers = TransferPlanner::new()
            .plan_transfers(&sheet(&[-5000, 2000, 3000]))
            .unwrap();

        assert_eq!(
            transfers,
            vec![
                Transfer { from: p(0), to: p(2), amount: 3000 },
                Transfer { from: p(0), to: p(1), amount: 2000 },
            ]
        );
    }

    #[test]
    fn test_ties_keep_roster_order() {
        let transfers = TransferPlanner::new()
            .plan_transfers(&sheet(&[-1000, -1000, 1000, 1000]))
            .unwrap();

        assert_eq!(
            transfers,
            vec![
                Transfer { from: p(0), to: p(2), amount: 1000 },
                Transfer { from: p(1), to: p(3), amount: 1000 },
            ]
        );
    }

    #[test]
    fn test_plan_reproduces_balances() {
        let balances = sheet(&[-7000, 4000, -1000, 0, 3000, 1000]);
        let transfers = TransferPlanner::new().plan_transfers(&balances).unwrap();

        assert!(transfers.iter().all(|t| t.amount > 0));
        // 2 payers + 3 receivers - 1
        assert!(transfers.len() <= 4);

        let zero = BalanceSheet::zeroed(balances.iter().map(|b| b.player_id));
        assert_eq!(apply_transfers(&zero, &transfers), balances);
    }

    #[test]
    fn test_all_settled() {
        let transfers = TransferPlanner::new().plan_transfers(&sheet(&[0, 0, 0])).unwrap();
        assert!(transfers.is_empty());

        let transfers = TransferPlanner::new().plan_transfers(&BalanceSheet::new()).unwrap();
        assert!(transfers.is_empty());
    }

    #[test]
    fn test_unbalanced_is_rejected() {
        let result = TransferPlanner::new().plan_transfers(&sheet(&[-1000, 1500]));
        assert!(matches!(result, Err(Error::InvariantViolation(_))));
    }
}
