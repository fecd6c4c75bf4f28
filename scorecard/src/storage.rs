//! Score storage
//!
//! The settlement engine only needs four things from storage: load and save
//! the roster, load the scoreboard, and save one hole's scores. Writes are
//! last-write-wins; there is no conflict detection between devices.
//!
//! # Sheet layout
//!
//! [`SheetStore`] persists a workbook with two worksheets:
//!
//! - `Settings` - header `participants_count, cart_count, player_0..11, cart_0..11`,
//!   data in row 2
//! - `Scores` - header `hole, par, p0..p11`, hole `N` stored in row `N + 1`
//!
//! Score column `pN` belongs to the player whose id is `N`.

use crate::{
    error::{Error, Result},
    types::{validate_hole, HoleNumber, Player, PlayerId, Roster, ScoreBoard, Strokes, MAX_PLAYERS},
    Config,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Row holding the settings record (row 1 is the header)
const SETTINGS_ROW: usize = 2;

/// Storage collaborator for a round
pub trait ScoreStore {
    /// Load the roster (empty if no round configured)
    fn load_roster(&self) -> Result<Roster>;

    /// Load all recorded pars and scores
    fn load_scores(&self) -> Result<ScoreBoard>;

    /// Persist the roster
    fn save_roster(&mut self, roster: &Roster) -> Result<()>;

    /// Persist one hole, overwriting any previous save of that hole
    fn save_hole_score(
        &mut self,
        hole: HoleNumber,
        par: Strokes,
        scores: &[(PlayerId, Strokes)],
    ) -> Result<()>;

    /// Forget the whole round
    fn clear(&mut self) -> Result<()>;
}

/// In-process store (tests, offline play)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    roster: Roster,
    scores: ScoreBoard,
}

impl MemoryStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load_roster(&self) -> Result<Roster> {
        Ok(self.roster.clone())
    }

    fn load_scores(&self) -> Result<ScoreBoard> {
        Ok(self.scores.clone())
    }

    fn save_roster(&mut self, roster: &Roster) -> Result<()> {
        self.roster = roster.clone();
        Ok(())
    }

    fn save_hole_score(
        &mut self,
        hole: HoleNumber,
        par: Strokes,
        scores: &[(PlayerId, Strokes)],
    ) -> Result<()> {
        self.scores.record_hole(hole, par, scores)
    }

    fn clear(&mut self) -> Result<()> {
        self.roster = Roster::empty();
        self.scores.clear();
        Ok(())
    }
}

/// One worksheet: a header row plus data rows of text cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worksheet {
    /// Sheet title
    pub title: String,

    /// Column names (row 1)
    pub header: Vec<String>,

    /// Data rows (row 2 onward)
    pub rows: Vec<Vec<String>>,
}

impl Worksheet {
    /// Create sheet with header only
    pub fn new(title: impl Into<String>, header: Vec<String>) -> Self {
        Self {
            title: title.into(),
            header,
            rows: Vec::new(),
        }
    }

    /// Non-blank data rows keyed by header, with their 1-based row numbers
    pub fn records(&self) -> Vec<(usize, BTreeMap<&str, &str>)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|(idx, row)| {
                let record = self
                    .header
                    .iter()
                    .enumerate()
                    .map(|(col, name)| {
                        (name.as_str(), row.get(col).map(String::as_str).unwrap_or(""))
                    })
                    .collect();
                (idx + 2, record)
            })
            .collect()
    }

    /// Overwrite a row (1-based, header is row 1), growing the sheet if needed
    pub fn update_row(&mut self, row_number: usize, values: Vec<String>) -> Result<()> {
        if row_number < 2 {
            return Err(Error::Storage(format!(
                "{}: row {} is reserved for the header",
                self.title, row_number
            )));
        }
        let idx = row_number - 2;
        if self.rows.len() <= idx {
            self.rows.resize(idx + 1, Vec::new());
        }
        self.rows[idx] = values;
        Ok(())
    }

    /// Drop all data rows
    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }
}

/// Workbook document persisted as JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workbook {
    /// Time of the last save
    pub saved_at: Option<DateTime<Utc>>,

    /// Worksheets
    pub sheets: Vec<Worksheet>,
}

impl Workbook {
    /// Find sheet by title
    pub fn worksheet(&self, title: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.title == title)
    }

    /// Find sheet by title (mutable)
    pub fn worksheet_mut(&mut self, title: &str) -> Result<&mut Worksheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.title == title)
            .ok_or_else(|| Error::Storage(format!("Worksheet {} not found", title)))
    }

    /// Add sheet unless one with the same title exists; returns true if added
    pub fn add_worksheet(&mut self, sheet: Worksheet) -> bool {
        if self.worksheet(&sheet.title).is_some() {
            return false;
        }
        self.sheets.push(sheet);
        true
    }
}

/// Header of the settings sheet
fn settings_header() -> Vec<String> {
    let mut header = vec!["participants_count".to_string(), "cart_count".to_string()];
    header.extend((0..MAX_PLAYERS).map(|i| format!("player_{}", i)));
    header.extend((0..MAX_PLAYERS).map(|i| format!("cart_{}", i)));
    header
}

/// Header of the scores sheet
fn scores_header() -> Vec<String> {
    let mut header = vec!["hole".to_string(), "par".to_string()];
    header.extend((0..MAX_PLAYERS).map(|i| format!("p{}", i)));
    header
}

fn field<'a>(record: &BTreeMap<&str, &'a str>, column: &str) -> &'a str {
    record.get(column).copied().unwrap_or("")
}

fn parse_cell<T: FromStr>(sheet: &str, row: usize, column: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::MalformedCell {
        sheet: sheet.to_string(),
        column: column.to_string(),
        row,
        value: value.to_string(),
    })
}

/// Score column for a player
fn score_column(id: PlayerId) -> Result<usize> {
    let col = id.value() as usize;
    if col >= MAX_PLAYERS {
        return Err(Error::InvalidRoster(format!(
            "player {} has no score column (max {} players)",
            id, MAX_PLAYERS
        )));
    }
    Ok(col)
}

/// Spreadsheet-layout store backed by a JSON workbook file
#[derive(Debug)]
pub struct SheetStore {
    path: PathBuf,
    config: Config,
    workbook: Workbook,
}

impl SheetStore {
    /// Open or create the workbook, adding missing sheets
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let path = config.sheet_path.clone();

        let workbook = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Workbook::default()
        };

        let mut store = Self {
            path,
            config,
            workbook,
        };

        if store.init_sheets() {
            store.flush()?;
        }

        tracing::info!(
            path = %store.path.display(),
            sheets = store.workbook.sheets.len(),
            "Opened score sheet"
        );

        Ok(store)
    }

    /// Path of the workbook file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current workbook contents
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Create missing sheets with headers; returns true if anything changed
    fn init_sheets(&mut self) -> bool {
        let layout = &self.config.layout;
        let added_settings = self
            .workbook
            .add_worksheet(Worksheet::new(layout.settings_sheet.clone(), settings_header()));
        let added_scores = self
            .workbook
            .add_worksheet(Worksheet::new(layout.scores_sheet.clone(), scores_header()));
        added_settings || added_scores
    }

    fn sheet(&self, title: &str) -> Result<&Worksheet> {
        self.workbook
            .worksheet(title)
            .ok_or_else(|| Error::Storage(format!("Worksheet {} not found", title)))
    }

    /// Write workbook atomically (temp file + rename)
    fn flush(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        self.workbook.saved_at = Some(Utc::now());
        let content = serde_json::to_string_pretty(&self.workbook)?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), "Score sheet flushed");
        Ok(())
    }
}

impl ScoreStore for SheetStore {
    fn load_roster(&self) -> Result<Roster> {
        let title = &self.config.layout.settings_sheet;
        let sheet = self.sheet(title)?;

        let Some((row, record)) = sheet.records().into_iter().next() else {
            return Ok(Roster::empty());
        };

        let count: usize = parse_cell(title, row, "participants_count", field(&record, "participants_count"))?;
        if count > self.config.max_players {
            return Err(Error::InvalidRoster(format!(
                "{} participants stored, at most {} allowed",
                count, self.config.max_players
            )));
        }

        // Seats are columns: a player's id is the index of their named column
        let mut players = Vec::with_capacity(count);
        for seat in 0..MAX_PLAYERS {
            let name = field(&record, &format!("player_{}", seat)).trim();
            if name.is_empty() {
                continue;
            }
            let cart_col = format!("cart_{}", seat);
            let group = match field(&record, &cart_col) {
                cell if !cell.trim().is_empty() => parse_cell(title, row, &cart_col, cell)?,
                _ => 1,
            };
            players.push(Player::new(PlayerId::new(seat as u32), name, group));
        }

        // Sheets filled in by hand may carry a count but no names
        if players.is_empty() {
            players = (0..count)
                .map(|seat| Player::new(PlayerId::new(seat as u32), format!("Player {}", seat + 1), 1))
                .collect();
        } else if players.len() != count {
            tracing::warn!(
                stored = count,
                named = players.len(),
                "participants_count disagrees with named seats; using named seats"
            );
        }

        let mut roster = Roster::new(players)?;
        let carts = field(&record, "cart_count");
        if !carts.trim().is_empty() {
            roster.set_cart_count(parse_cell(title, row, "cart_count", carts)?);
        }
        Ok(roster)
    }

    fn load_scores(&self) -> Result<ScoreBoard> {
        let roster = self.load_roster()?;
        let title = &self.config.layout.scores_sheet;
        let sheet = self.sheet(title)?;

        let mut board = ScoreBoard::new();
        for (row, record) in sheet.records() {
            let hole: HoleNumber = parse_cell(title, row, "hole", field(&record, "hole"))?;

            let par_cell = field(&record, "par");
            if !par_cell.trim().is_empty() {
                let par: Strokes = parse_cell(title, row, "par", par_cell)?;
                board.set_par(hole, par)?;
            }

            for id in roster.ids() {
                let column = format!("p{}", score_column(id)?);
                let cell = field(&record, &column);
                if cell.trim().is_empty() {
                    continue;
                }
                let strokes: Strokes = parse_cell(title, row, &column, cell)?;
                board.record(hole, id, strokes);
            }
        }

        tracing::debug!(
            holes = board.holes().count(),
            "Loaded scores from sheet"
        );
        Ok(board)
    }

    fn save_roster(&mut self, roster: &Roster) -> Result<()> {
        if roster.len() > self.config.max_players {
            return Err(Error::InvalidRoster(format!(
                "{} players exceed sheet limit of {}",
                roster.len(),
                self.config.max_players
            )));
        }

        let mut names = vec![String::new(); MAX_PLAYERS];
        let mut carts = vec![String::new(); MAX_PLAYERS];
        for player in roster.players() {
            let col = score_column(player.id)?;
            names[col] = player.name.clone();
            carts[col] = player.group.to_string();
        }

        let mut row = vec![roster.len().to_string(), roster.cart_count().to_string()];
        row.extend(names);
        row.extend(carts);

        let title = self.config.layout.settings_sheet.clone();
        self.workbook.worksheet_mut(&title)?.update_row(SETTINGS_ROW, row)?;
        self.flush()?;

        tracing::info!(players = roster.len(), "Roster saved to sheet");
        Ok(())
    }

    fn save_hole_score(
        &mut self,
        hole: HoleNumber,
        par: Strokes,
        scores: &[(PlayerId, Strokes)],
    ) -> Result<()> {
        validate_hole(hole, par)?;

        let mut cells = vec![String::new(); MAX_PLAYERS];
        for &(id, strokes) in scores {
            if strokes > 0 {
                cells[score_column(id)?] = strokes.to_string();
            }
        }

        let mut row = vec![hole.to_string(), par.to_string()];
        row.extend(cells);

        let title = self.config.layout.scores_sheet.clone();
        self.workbook
            .worksheet_mut(&title)?
            .update_row(hole as usize + 1, row)?;
        self.flush()?;

        tracing::info!(hole, par, "Hole scores saved to sheet");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let layout = self.config.layout.clone();
        self.workbook.worksheet_mut(&layout.settings_sheet)?.clear_rows();
        self.workbook.worksheet_mut(&layout.scores_sheet)?.clear_rows();
        self.flush()?;

        tracing::info!(path = %self.path.display(), "Score sheet cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worksheet_update_grows_rows() {
        let mut sheet = Worksheet::new("Scores", scores_header());
        sheet
            .update_row(4, vec!["3".to_string(), "5".to_string(), "6".to_string()])
            .unwrap();

        assert_eq!(sheet.rows.len(), 3);
        let records = sheet.records();
        // Blank filler rows are not records
        assert_eq!(records.len(), 1);
        let (row, record) = &records[0];
        assert_eq!(*row, 4);
        assert_eq!(field(&record, "hole"), "3");
        assert_eq!(record["p0"], "6");
        assert_eq!(record["p1"], "");
    }

    #[test]
    fn test_header_row_is_reserved() {
        let mut sheet = Worksheet::new("Settings", settings_header());
        assert!(sheet.update_row(1, vec![]).is_err());
    }

    #[test]
    fn test_headers_match_layout() {
        let settings = settings_header();
        assert_eq!(settings.len(), 2 + 2 * MAX_PLAYERS);
        assert_eq!(settings[2], "player_0");
        assert_eq!(settings[2 + MAX_PLAYERS], "cart_0");

        let scores = scores_header();
        assert_eq!(scores.len(), 2 + MAX_PLAYERS);
        assert_eq!(scores[13], "p11");
    }

    #[test]
    fn test_memory_store_overwrites_hole() {
        let mut store = MemoryStore::new();
        store
            .save_hole_score(1, 4, &[(PlayerId::new(0), 5), (PlayerId::new(1), 4)])
            .unwrap();
        store
            .save_hole_score(1, 3, &[(PlayerId::new(0), 3), (PlayerId::new(1), 4)])
            .unwrap();

        let scores = store.load_scores().unwrap();
        assert_eq!(scores.par(1), Some(3));
        assert_eq!(scores.score(1, PlayerId::new(0)), Some(3));

        store.clear().unwrap();
        assert!(store.load_scores().unwrap().is_empty());
    }

    #[test]
    fn test_score_column_limit() {
        assert_eq!(score_column(PlayerId::new(11)).unwrap(), 11);
        assert!(score_column(PlayerId::new(12)).is_err());
    }
}
