//! Configuration for the score store

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Score store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workbook file backing the `Settings` and `Scores` sheets
    pub sheet_path: PathBuf,

    /// Maximum players per round (one sheet column each)
    pub max_players: usize,

    /// Sheet layout configuration
    pub layout: SheetLayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_path: PathBuf::from("./data/golf_battle.json"),
            max_players: crate::types::MAX_PLAYERS,
            layout: SheetLayoutConfig::default(),
        }
    }
}

/// Worksheet titles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetLayoutConfig {
    /// Title of the roster sheet
    pub settings_sheet: String,

    /// Title of the per-hole score sheet
    pub scores_sheet: String,
}

impl Default for SheetLayoutConfig {
    fn default() -> Self {
        Self {
            settings_sheet: "Settings".to_string(),
            scores_sheet: "Scores".to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(path) = std::env::var("SCORECARD_SHEET_PATH") {
            config.sheet_path = PathBuf::from(path);
        }

        if let Ok(max) = std::env::var("SCORECARD_MAX_PLAYERS") {
            config.max_players = max.parse().map_err(|e| {
                crate::Error::Config(format!("SCORECARD_MAX_PLAYERS={:?}: {}", max, e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check limits imposed by the sheet layout
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_players < 2 || self.max_players > crate::types::MAX_PLAYERS {
            return Err(crate::Error::Config(format!(
                "max_players must be within 2..={}, got {}",
                crate::types::MAX_PLAYERS,
                self.max_players
            )));
        }
        if self.layout.settings_sheet == self.layout.scores_sheet {
            return Err(crate::Error::Config(
                "settings and scores sheets must have different titles".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_players, 12);
        assert_eq!(config.layout.scores_sheet, "Scores");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scorecard.toml");
        std::fs::write(
            &path,
            r#"
sheet_path = "/tmp/round.json"
max_players = 8

[layout]
settings_sheet = "Setup"
scores_sheet = "Holes"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.max_players, 8);
        assert_eq!(config.layout.settings_sheet, "Setup");
    }

    #[test]
    fn test_rejects_oversized_roster_limit() {
        let config = Config {
            max_players: 20,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
