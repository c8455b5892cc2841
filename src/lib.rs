//! NBA matchup feature pipeline
//!
//! Builds per-matchup feature vectors from historical game results and
//! standings snapshots, using only information available before each
//! matchup date.

pub mod data;
pub mod features;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub i64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team({})", self.0)
    }
}

/// Unique identifier for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub i64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Game({})", self.0)
    }
}

/// Box score totals for one side of a game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamBoxScore {
    /// Points scored
    pub pts: f64,
    /// Field goal percentage (0-1)
    pub fg_pct: f64,
    /// Free throw percentage (0-1)
    pub ft_pct: f64,
    /// Three point percentage (0-1)
    pub fg3_pct: f64,
    /// Assists
    pub ast: f64,
    /// Total rebounds
    pub reb: f64,
}

/// A single game from the historical game table
///
/// Stats and outcome are present for completed games and absent for
/// scheduled games that have been stored ahead of time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: GameId,
    pub date: NaiveDate,
    pub season: i32,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home: Option<TeamBoxScore>,
    pub away: Option<TeamBoxScore>,
    pub home_team_wins: Option<bool>,
}

impl GameRecord {
    /// Check if a team was playing at home
    pub fn is_home(&self, team: TeamId) -> Option<bool> {
        if team == self.home_team {
            Some(true)
        } else if team == self.away_team {
            Some(false)
        } else {
            None
        }
    }

    /// Check if the given team won this game
    pub fn did_win(&self, team: TeamId) -> Option<bool> {
        let is_home = self.is_home(team)?;
        let home_wins = self.home_team_wins?;
        Some(is_home == home_wins)
    }

    /// Box score for a specific team's side
    pub fn box_score_for(&self, team: TeamId) -> Option<&TeamBoxScore> {
        if self.is_home(team)? {
            self.home.as_ref()
        } else {
            self.away.as_ref()
        }
    }

    /// True when the game has been played: both box scores and an outcome
    pub fn is_complete(&self) -> bool {
        self.home.is_some() && self.away.is_some() && self.home_team_wins.is_some()
    }
}

/// A point-in-time standings record for a team within a season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub team: TeamId,
    /// Season label, comparable for ordering (larger = later season)
    pub season_id: i64,
    pub standings_date: NaiveDate,
    /// Win percentage (0-1)
    pub win_pct: f64,
    /// Home record string, e.g. "10-2"
    pub home_record: String,
    /// Road record string, e.g. "7-5"
    pub road_record: String,
    pub conference: Option<String>,
}

/// A matchup to build features for: a scheduled or historical game
/// identified by id, date and the two teams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matchup {
    pub game_id: GameId,
    pub date: NaiveDate,
    pub home_team: TeamId,
    pub away_team: TeamId,
}

impl From<&GameRecord> for Matchup {
    fn from(record: &GameRecord) -> Self {
        Matchup {
            game_id: record.game_id,
            date: record.date,
            home_team: record.home_team,
            away_team: record.away_team,
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum HoopsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid perspective '{0}': must be all, home or away")]
    InvalidPerspective(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HoopsError>;

/// Parse a date column value, tolerating a trailing timestamp
///
/// The upstream dataset stores dates as `YYYY-MM-DD`, occasionally with
/// a time suffix. Anything else is fatal with the offending value named.
pub fn parse_date(value: &str, context: &str) -> Result<NaiveDate> {
    let prefix = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .map_err(|_| HoopsError::Parse(format!("invalid date '{}' for {}", value, context)))
}

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// SQLite database holding the historical tables
    pub database_path: String,
    /// Directory with the raw dataset CSVs (games.csv, ranking.csv)
    pub dataset_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default path for the exported feature table
    pub features_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                database_path: "data/hoops.db".to_string(),
                dataset_dir: "data/nba_dataset".to_string(),
            },
            output: OutputConfig {
                features_path: "data/features.csv".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HoopsError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| HoopsError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HoopsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
