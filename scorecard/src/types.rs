//! Core types for the scorecard
//!
//! All types are designed for:
//! - Stable identity (players keyed by id, never by display name)
//! - Sparse holes (only holes with recorded data exist)
//! - Integer arithmetic (strokes and pars are whole numbers)

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stroke count for one player on one hole
pub type Strokes = u32;

/// Hole number (1-based)
pub type HoleNumber = u32;

/// Upper bound on players in a round (one spreadsheet column per player)
pub const MAX_PLAYERS: usize = 12;

/// Upper bound on holes in a round (one spreadsheet row per hole)
pub const MAX_HOLES: HoleNumber = 36;

/// Stable player identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Create new player ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get raw value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A participant in the round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identity
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Cart / team number
    pub group: u32,
}

impl Player {
    /// Create new player
    pub fn new(id: PlayerId, name: impl Into<String>, group: u32) -> Self {
        Self {
            id,
            name: name.into(),
            group,
        }
    }
}

/// Ordered list of players
///
/// Roster order is the canonical order for display and for breaking ties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,

    /// Cart count chosen at setup; derived from the players when unset
    #[serde(default)]
    carts: Option<u32>,
}

impl Roster {
    /// Create roster from players, rejecting duplicate ids
    pub fn new(players: Vec<Player>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for player in &players {
            if !seen.insert(player.id) {
                return Err(Error::InvalidRoster(format!(
                    "duplicate player id {}",
                    player.id
                )));
            }
        }
        Ok(Self {
            players,
            carts: None,
        })
    }

    /// Empty roster (no round configured yet)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a round roster from the setup form
    ///
    /// Names are trimmed and blank seats dropped. A player's id is the index
    /// of their seat on the form, blank seats included, so re-running setup
    /// keeps scores attached to the same seat. A missing group defaults to
    /// cart 1.
    pub fn from_names<S: AsRef<str>>(
        names: &[S],
        groups: &[u32],
        max_players: usize,
    ) -> Result<Self> {
        if names.len() > MAX_PLAYERS {
            return Err(Error::InvalidRoster(format!(
                "setup form has {} seats, at most {} columns available",
                names.len(),
                MAX_PLAYERS
            )));
        }

        let players: Vec<Player> = names
            .iter()
            .map(|n| n.as_ref().trim())
            .zip(groups.iter().copied().chain(std::iter::repeat(1)))
            .enumerate()
            .filter(|(_, (name, _))| !name.is_empty())
            .map(|(seat, (name, group))| Player::new(PlayerId::new(seat as u32), name, group))
            .collect();

        if players.len() < 2 {
            return Err(Error::InvalidRoster(format!(
                "at least 2 players required, got {}",
                players.len()
            )));
        }
        if players.len() > max_players {
            return Err(Error::InvalidRoster(format!(
                "at most {} players allowed, got {}",
                max_players,
                players.len()
            )));
        }

        Self::new(players)
    }

    /// Build a roster with carts spread evenly over the seats
    ///
    /// Seat `i` of `p` rides in cart `i * carts / p + 1`, so consecutive
    /// seats share a cart.
    pub fn with_carts<S: AsRef<str>>(names: &[S], carts: u32, max_players: usize) -> Result<Self> {
        if carts == 0 {
            return Err(Error::InvalidRoster("at least one cart required".to_string()));
        }
        let groups = auto_groups(names.len(), carts);
        let mut roster = Self::from_names(names, &groups, max_players)?;
        roster.carts = Some(carts);
        Ok(roster)
    }

    /// Record the cart count chosen at setup
    pub fn set_cart_count(&mut self, carts: u32) {
        self.carts = Some(carts);
    }

    /// Players in roster order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Player ids in roster order
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    /// Number of players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Check if no players
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Look up player by id
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Check membership
    pub fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    /// Cart count chosen at setup, else the number of distinct carts
    pub fn cart_count(&self) -> u32 {
        self.carts.unwrap_or(self.group_count() as u32)
    }

    /// Number of distinct carts
    pub fn group_count(&self) -> usize {
        self.players
            .iter()
            .map(|p| p.group)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Players riding in the given cart
    pub fn members_of(&self, group: u32) -> Vec<&Player> {
        self.players.iter().filter(|p| p.group == group).collect()
    }
}

impl PartialEq for Roster {
    fn eq(&self, other: &Self) -> bool {
        self.players == other.players && self.cart_count() == other.cart_count()
    }
}

impl Eq for Roster {}

/// Even cart assignment for `players` seats over `carts` carts (1-based)
pub fn auto_groups(players: usize, carts: u32) -> Vec<u32> {
    let carts = carts.max(1) as usize;
    (0..players)
        .map(|seat| (seat * carts / players) as u32 + 1)
        .collect()
}

/// Check a hole number and par before anything is stored
pub fn validate_hole(hole: HoleNumber, par: Strokes) -> Result<()> {
    if hole == 0 || hole > MAX_HOLES {
        return Err(Error::InvalidScore(format!(
            "hole {} outside 1..={}",
            hole, MAX_HOLES
        )));
    }
    if par == 0 {
        return Err(Error::InvalidScore(format!("hole {}: par must be positive", hole)));
    }
    Ok(())
}

/// Par assigned to a played hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleRecord {
    /// Hole number (1-based)
    pub hole_number: HoleNumber,

    /// Par for the hole
    pub par: Strokes,
}

/// Per-player, per-hole stroke counts plus par per hole
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pars: BTreeMap<HoleNumber, Strokes>,
    scores: BTreeMap<HoleNumber, BTreeMap<PlayerId, Strokes>>,
}

impl ScoreBoard {
    /// Create empty scoreboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Set par for a hole
    pub fn set_par(&mut self, hole: HoleNumber, par: Strokes) -> Result<()> {
        validate_hole(hole, par)?;
        self.pars.insert(hole, par);
        Ok(())
    }

    /// Par for a hole, if recorded
    pub fn par(&self, hole: HoleNumber) -> Option<Strokes> {
        self.pars.get(&hole).copied()
    }

    /// Recorded holes in ascending order
    pub fn holes(&self) -> impl Iterator<Item = HoleRecord> + '_ {
        self.pars.iter().map(|(&hole_number, &par)| HoleRecord { hole_number, par })
    }

    /// Record one player's strokes (0 clears the entry)
    pub fn record(&mut self, hole: HoleNumber, player: PlayerId, strokes: Strokes) {
        let entries = self.scores.entry(hole).or_default();
        if strokes == 0 {
            entries.remove(&player);
        } else {
            entries.insert(player, strokes);
        }
    }

    /// Record a whole hole at once, replacing every previous entry
    ///
    /// Players left out of `scores` are cleared for this hole.
    pub fn record_hole(
        &mut self,
        hole: HoleNumber,
        par: Strokes,
        scores: &[(PlayerId, Strokes)],
    ) -> Result<()> {
        self.set_par(hole, par)?;
        self.scores.remove(&hole);
        for &(player, strokes) in scores {
            self.record(hole, player, strokes);
        }
        Ok(())
    }

    /// One player's strokes on a hole
    pub fn score(&self, hole: HoleNumber, player: PlayerId) -> Option<Strokes> {
        self.scores.get(&hole).and_then(|s| s.get(&player)).copied()
    }

    /// Check whether par and every roster player's score are recorded
    pub fn is_complete(&self, hole: HoleNumber, roster: &Roster) -> bool {
        self.hole_scores(hole, roster).is_some()
    }

    /// Scores of a complete hole in roster order
    ///
    /// Returns `None` while the hole is still partially entered.
    pub fn hole_scores(&self, hole: HoleNumber, roster: &Roster) -> Option<Vec<(PlayerId, Strokes)>> {
        self.par(hole)?;
        if roster.is_empty() {
            return None;
        }
        roster
            .ids()
            .map(|id| self.score(hole, id).map(|s| (id, s)))
            .collect()
    }

    /// Drop entries for players no longer on the roster
    pub fn retain_players(&mut self, roster: &Roster) {
        for entries in self.scores.values_mut() {
            entries.retain(|id, _| roster.contains(*id));
        }
    }

    /// Check if nothing recorded
    pub fn is_empty(&self) -> bool {
        self.pars.is_empty() && self.scores.values().all(|s| s.is_empty())
    }

    /// Forget all pars and scores
    pub fn clear(&mut self) {
        self.pars.clear();
        self.scores.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Roster {
        let names: Vec<String> = (0..n).map(|i| format!("player{}", i)).collect();
        Roster::from_names(&names, &[], MAX_PLAYERS).unwrap()
    }

    #[test]
    fn test_roster_from_names() {
        let roster = Roster::from_names(&["  Kim ", "", "Park", "Lee"], &[1, 1, 2], MAX_PLAYERS).unwrap();

        assert_eq!(roster.len(), 3);
        assert_eq!(roster.players()[0].name, "Kim");
        // Blank seat is skipped; later seats keep their form index
        assert_eq!(roster.players()[1].name, "Park");
        assert_eq!(roster.players()[1].id, PlayerId::new(2));
        assert_eq!(roster.players()[1].group, 2);
        assert_eq!(roster.players()[2].id, PlayerId::new(3));
        assert_eq!(roster.players()[2].group, 1);
        assert!(!roster.contains(PlayerId::new(1)));
        assert_eq!(roster.group_count(), 2);
        assert_eq!(roster.cart_count(), 2);
        assert_eq!(roster.members_of(1).len(), 2);
    }

    #[test]
    fn test_auto_groups() {
        assert_eq!(auto_groups(4, 2), vec![1, 1, 2, 2]);
        assert_eq!(auto_groups(5, 2), vec![1, 1, 1, 2, 2]);
        assert_eq!(auto_groups(7, 3), vec![1, 1, 1, 2, 2, 3, 3]);
        assert_eq!(auto_groups(3, 1), vec![1, 1, 1]);
        assert!(auto_groups(0, 2).is_empty());
    }

    #[test]
    fn test_roster_with_carts() {
        let roster = Roster::with_carts(&["A", "B", "C", "D", "E", "F"], 3, MAX_PLAYERS).unwrap();
        let groups: Vec<u32> = roster.players().iter().map(|p| p.group).collect();
        assert_eq!(groups, vec![1, 1, 2, 2, 3, 3]);
        assert_eq!(roster.cart_count(), 3);

        // Chosen cart count is kept even when a cart ends up empty
        let roster = Roster::with_carts(&["A", "B"], 3, MAX_PLAYERS).unwrap();
        assert_eq!(roster.group_count(), 2);
        assert_eq!(roster.cart_count(), 3);

        assert!(Roster::with_carts(&["A", "B"], 0, MAX_PLAYERS).is_err());
    }

    #[test]
    fn test_roster_size_limits() {
        assert!(matches!(
            Roster::from_names(&["solo"], &[], MAX_PLAYERS),
            Err(Error::InvalidRoster(_))
        ));

        let names: Vec<String> = (0..13).map(|i| format!("p{}", i)).collect();
        assert!(Roster::from_names(&names, &[], MAX_PLAYERS).is_err());

        let names: Vec<String> = (0..5).map(|i| format!("p{}", i)).collect();
        assert!(matches!(
            Roster::from_names(&names, &[], 4),
            Err(Error::InvalidRoster(_))
        ));
    }

    #[test]
    fn test_roster_rejects_duplicate_ids() {
        let players = vec![
            Player::new(PlayerId::new(1), "a", 1),
            Player::new(PlayerId::new(1), "b", 1),
        ];
        assert!(Roster::new(players).is_err());
    }

    #[test]
    fn test_hole_completeness() {
        let roster = roster(3);
        let mut board = ScoreBoard::new();

        board
            .record_hole(1, 4, &[(PlayerId::new(0), 4), (PlayerId::new(1), 5)])
            .unwrap();
        assert!(!board.is_complete(1, &roster));

        board.record(1, PlayerId::new(2), 3);
        assert!(board.is_complete(1, &roster));
        assert_eq!(
            board.hole_scores(1, &roster).unwrap(),
            vec![(PlayerId::new(0), 4), (PlayerId::new(1), 5), (PlayerId::new(2), 3)]
        );

        // Zero means "not entered"
        board.record(1, PlayerId::new(2), 0);
        assert!(!board.is_complete(1, &roster));
    }

    #[test]
    fn test_record_hole_replaces_entries() {
        let mut board = ScoreBoard::new();
        board
            .record_hole(1, 4, &[(PlayerId::new(0), 4), (PlayerId::new(1), 5)])
            .unwrap();
        board.record_hole(1, 3, &[(PlayerId::new(1), 6)]).unwrap();

        assert_eq!(board.par(1), Some(3));
        assert_eq!(board.score(1, PlayerId::new(0)), None);
        assert_eq!(board.score(1, PlayerId::new(1)), Some(6));
    }

    #[test]
    fn test_scores_without_par_are_incomplete() {
        let roster = roster(2);
        let mut board = ScoreBoard::new();
        board.record(3, PlayerId::new(0), 4);
        board.record(3, PlayerId::new(1), 4);

        assert!(!board.is_complete(3, &roster));
        board.set_par(3, 4).unwrap();
        assert!(board.is_complete(3, &roster));
    }

    #[test]
    fn test_invalid_par() {
        let mut board = ScoreBoard::new();
        assert!(board.set_par(1, 0).is_err());
        assert!(board.set_par(0, 4).is_err());
        assert!(board.set_par(MAX_HOLES + 1, 4).is_err());
        assert!(board.set_par(MAX_HOLES, 4).is_ok());
        assert!(validate_hole(u32::MAX, 4).is_err());
        board.clear();
        assert!(board.is_empty());
    }

    #[test]
    fn test_retain_players() {
        let mut board = ScoreBoard::new();
        board
            .record_hole(1, 4, &[(PlayerId::new(0), 4), (PlayerId::new(5), 6)])
            .unwrap();

        board.retain_players(&roster(2));
        assert_eq!(board.score(1, PlayerId::new(0)), Some(4));
        assert_eq!(board.score(1, PlayerId::new(5)), None);
    }
}
