//! Configuration for settlement engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use scorecard::MAX_HOLES;

/// Settlement engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Stake configuration
    pub stakes: StakeConfig,

    /// Round configuration
    pub round: RoundConfig,

    /// Score store configuration
    pub store: scorecard::Config,
}

/// How stroke differences are paid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeMode {
    /// Every pair of players settles every stroke of difference, on every hole
    #[default]
    RoundRobin,
    /// Only forfeit holes settle strokes; losers pay each low-score winner
    ForfeitGated,
}

impl fmt::Display for StrokeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrokeMode::RoundRobin => write!(f, "round-robin"),
            StrokeMode::ForfeitGated => write!(f, "forfeit-gated"),
        }
    }
}

impl FromStr for StrokeMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "round-robin" => Ok(StrokeMode::RoundRobin),
            "forfeit-gated" => Ok(StrokeMode::ForfeitGated),
            other => Err(crate::Error::Config(format!("Unknown stroke mode: {}", other))),
        }
    }
}

/// Money amounts per hole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeConfig {
    /// Amount per stroke of difference
    pub base_stake: i64,

    /// Stake multiplier on forfeit (baepan) holes
    pub forfeit_multiplier: i64,

    /// Amount every other player pays an under-par player
    pub bonus_amount: i64,

    /// Stroke settlement mode
    pub stroke_mode: StrokeMode,
}

impl Default for StakeConfig {
    fn default() -> Self {
        Self {
            base_stake: 1000,
            forfeit_multiplier: 1,
            bonus_amount: 2000,
            stroke_mode: StrokeMode::RoundRobin,
        }
    }
}

/// Round shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Holes in the round
    pub total_holes: u32,

    /// Par offered for a hole with none recorded yet
    pub default_par: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            total_holes: 18,
            default_par: 4,
        }
    }
}

fn parse_env<T: FromStr>(key: &str) -> crate::Result<Option<T>>
where
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e| crate::Error::Config(format!("{}={:?}: {}", key, value, e))),
        Err(_) => Ok(None),
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
        let mut config = Config {
            store: scorecard::Config::from_env()?,
            ..Config::default()
        };

        if let Some(stake) = parse_env("GOLF_BASE_STAKE")? {
            config.stakes.base_stake = stake;
        }

        if let Some(multiplier) = parse_env("GOLF_FORFEIT_MULTIPLIER")? {
            config.stakes.forfeit_multiplier = multiplier;
        }

        if let Some(bonus) = parse_env("GOLF_BONUS_AMOUNT")? {
            config.stakes.bonus_amount = bonus;
        }

        if let Some(holes) = parse_env("GOLF_TOTAL_HOLES")? {
            config.round.total_holes = holes;
        }

        if let Some(mode) = parse_env("GOLF_STROKE_MODE")? {
            config.stakes.stroke_mode = mode;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate amounts and round shape
    pub fn validate(&self) -> crate::Result<()> {
        if self.stakes.base_stake < 0 || self.stakes.bonus_amount < 0 {
            return Err(crate::Error::Config(
                "stake and bonus amounts cannot be negative".to_string(),
            ));
        }
        if self.stakes.forfeit_multiplier < 1 {
            return Err(crate::Error::Config(format!(
                "forfeit_multiplier must be at least 1, got {}",
                self.stakes.forfeit_multiplier
            )));
        }
        if self.round.total_holes == 0 || self.round.total_holes > MAX_HOLES {
            return Err(crate::Error::Config(format!(
                "total_holes must be within 1..={}, got {}",
                MAX_HOLES, self.round.total_holes
            )));
        }
        if self.round.default_par == 0 {
            return Err(crate::Error::Config("default_par must be positive".to_string()));
        }
        self.store.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.stakes.base_stake, 1000);
        assert_eq!(config.stakes.forfeit_multiplier, 1);
        assert_eq!(config.stakes.bonus_amount, 2000);
        assert_eq!(config.stakes.stroke_mode, StrokeMode::RoundRobin);
        assert_eq!(config.round.total_holes, 18);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("golf.toml");
        std::fs::write(
            &path,
            r#"
[stakes]
base_stake = 500
forfeit_multiplier = 1
bonus_amount = 1000
stroke_mode = "forfeit-gated"

[round]
total_holes = 9
default_par = 3

[store]
sheet_path = "./round.json"
max_players = 4

[store.layout]
settings_sheet = "Settings"
scores_sheet = "Scores"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.stakes.base_stake, 500);
        assert_eq!(config.stakes.stroke_mode, StrokeMode::ForfeitGated);
        assert_eq!(config.round.total_holes, 9);
        assert_eq!(config.store.max_players, 4);
    }

    #[test]
    fn test_invalid_round_shape() {
        let mut config = Config::default();
        config.round.total_holes = 37;
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));

        let mut config = Config::default();
        config.stakes.forfeit_multiplier = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stroke_mode_parse() {
        assert_eq!("forfeit-gated".parse::<StrokeMode>().unwrap(), StrokeMode::ForfeitGated);
        assert_eq!(StrokeMode::RoundRobin.to_string(), "round-robin");
        assert!("winner-takes-all".parse::<StrokeMode>().is_err());
    }
}
