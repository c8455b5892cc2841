//! Per-matchup feature vector assembly and export
//!
//! The output schema is fixed: a pre-trained downstream classifier
//! expects these exact column names in this exact order, so the
//! projection is enumerated here rather than assembled from strings
//! at runtime.

use crate::data::GameLog;
use crate::features::form::{FormFeatures, GameFormExtractor, LONG_WINDOW, SHORT_WINDOW};
use crate::features::rankings::{RankingFeatureExtractor, TeamRankingFeatures};
use crate::{GameId, Matchup, Result};
use chrono::Datelike;
use std::collections::HashSet;
use std::io::Write;

/// Whether the vectors are for scoring upcoming games or for training
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Season derived from the matchup date; no outcome column
    Prediction,
    /// Season and outcome joined from the game table by game id
    Training,
}

/// One cell of the exported feature table
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Float(f64),
    Int(i64),
    Text(String),
    Missing,
}

impl Cell {
    fn from_f64(value: Option<f64>) -> Self {
        value.map(Cell::Float).unwrap_or(Cell::Missing)
    }

    fn from_text(value: &Option<String>) -> Self {
        value.clone().map(Cell::Text).unwrap_or(Cell::Missing)
    }

    /// CSV rendering; missing values are empty cells
    pub fn to_csv_field(&self) -> String {
        match self {
            Cell::Float(v) => format!("{}", v),
            Cell::Int(v) => format!("{}", v),
            Cell::Text(v) => v.clone(),
            Cell::Missing => String::new(),
        }
    }
}

/// Feature columns shared by both modes, in export order
const FEATURE_COLUMNS: &[&str] = &[
    "GAME_ID",
    // Standings, home team: current season then previous season
    "W_PCT_home",
    "HOME_RECORD_home",
    "ROAD_RECORD_home",
    "W_PCT_prev_home",
    "HOME_RECORD_prev_home",
    "ROAD_RECORD_prev_home",
    // Standings, away team
    "W_PCT_away",
    "HOME_RECORD_away",
    "ROAD_RECORD_away",
    "W_PCT_prev_away",
    "HOME_RECORD_prev_away",
    "ROAD_RECORD_prev_away",
    // Form over the last 3 games
    "WIN_PRCT_home_3g",
    "PTS_home_3g",
    "FG_PCT_home_3g",
    "FT_PCT_home_3g",
    "FG3_PCT_home_3g",
    "AST_home_3g",
    "REB_home_3g",
    "WIN_PRCT_away_3g",
    "PTS_away_3g",
    "FG_PCT_away_3g",
    "FT_PCT_away_3g",
    "FG3_PCT_away_3g",
    "AST_away_3g",
    "REB_away_3g",
    // Form over the last 20 games
    "WIN_PRCT_home_20g",
    "PTS_home_20g",
    "FG_PCT_home_20g",
    "FT_PCT_home_20g",
    "FG3_PCT_home_20g",
    "AST_home_20g",
    "REB_home_20g",
    "WIN_PRCT_away_20g",
    "PTS_away_20g",
    "FG_PCT_away_20g",
    "FT_PCT_away_20g",
    "FG3_PCT_away_20g",
    "AST_away_20g",
    "REB_away_20g",
    "SEASON",
];

/// One feature row per matchup
///
/// Rows are immutable once built; missing history shows up as missing
/// cells, never as a dropped row or a shifted schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub game_id: GameId,
    pub home_rankings: TeamRankingFeatures,
    pub away_rankings: TeamRankingFeatures,
    pub home_form_short: FormFeatures,
    pub away_form_short: FormFeatures,
    pub home_form_long: FormFeatures,
    pub away_form_long: FormFeatures,
    pub season: Option<i32>,
    /// Only populated in training mode, and only on a join hit
    pub home_team_wins: Option<bool>,
}

impl FeatureVector {
    /// Column names for a mode, fixed regardless of row content
    pub fn column_names(mode: Mode) -> Vec<&'static str> {
        let mut names = FEATURE_COLUMNS.to_vec();
        if mode == Mode::Training {
            names.push("HOME_TEAM_WINS");
        }
        names
    }

    /// Project the row onto the fixed column order
    pub fn cells(&self, mode: Mode) -> Vec<Cell> {
        let mut cells = vec![Cell::Int(self.game_id.0)];

        for rankings in [&self.home_rankings, &self.away_rankings] {
            cells.push(Cell::from_f64(rankings.current.win_pct));
            cells.push(Cell::from_text(&rankings.current.home_record));
            cells.push(Cell::from_text(&rankings.current.road_record));
            cells.push(Cell::from_f64(rankings.previous.win_pct));
            cells.push(Cell::from_text(&rankings.previous.home_record));
            cells.push(Cell::from_text(&rankings.previous.road_record));
        }

        for form in [
            &self.home_form_short,
            &self.away_form_short,
            &self.home_form_long,
            &self.away_form_long,
        ] {
            cells.push(Cell::from_f64(form.win_prct));
            cells.push(Cell::from_f64(form.pts));
            cells.push(Cell::from_f64(form.fg_pct));
            cells.push(Cell::from_f64(form.ft_pct));
            cells.push(Cell::from_f64(form.fg3_pct));
            cells.push(Cell::from_f64(form.ast));
            cells.push(Cell::from_f64(form.reb));
        }

        cells.push(
            self.season
                .map(|s| Cell::Int(s as i64))
                .unwrap_or(Cell::Missing),
        );

        if mode == Mode::Training {
            cells.push(
                self.home_team_wins
                    .map(|w| Cell::Int(i64::from(w)))
                    .unwrap_or(Cell::Missing),
            );
        }

        cells
    }
}

/// Builds one feature row per distinct matchup
pub struct MatchupVectorBuilder<'a> {
    games: &'a GameLog,
    form: GameFormExtractor<'a>,
    rankings: RankingFeatureExtractor<'a>,
}

impl<'a> MatchupVectorBuilder<'a> {
    pub fn new(games: &'a GameLog, rankings: &'a crate::data::RankingLog) -> Self {
        MatchupVectorBuilder {
            games,
            form: GameFormExtractor::new(games),
            rankings: RankingFeatureExtractor::new(rankings),
        }
    }

    /// Build feature rows for a set of matchups
    ///
    /// Exactly one row per distinct game id, in input order of first
    /// appearance. A matchup without history still yields a row of
    /// missing cells; nothing is ever dropped.
    pub fn build(&self, matchups: &[Matchup], mode: Mode) -> Vec<FeatureVector> {
        let mut seen = HashSet::new();
        matchups
            .iter()
            .filter(|m| seen.insert(m.game_id))
            .map(|m| self.build_one(m, mode))
            .collect()
    }

    fn build_one(&self, matchup: &Matchup, mode: Mode) -> FeatureVector {
        let cutoff = matchup.date;
        let home = matchup.home_team;
        let away = matchup.away_team;

        let (season, home_team_wins) = match mode {
            Mode::Prediction => (Some(matchup.date.year()), None),
            Mode::Training => match self.games.get(matchup.game_id) {
                Some(record) => (Some(record.season), record.home_team_wins),
                // Join miss: outcome fields stay missing
                None => (None, None),
            },
        };

        FeatureVector {
            game_id: matchup.game_id,
            home_rankings: self.rankings.extract(home, cutoff),
            away_rankings: self.rankings.extract(away, cutoff),
            home_form_short: self.form.extract(home, cutoff, SHORT_WINDOW),
            away_form_short: self.form.extract(away, cutoff, SHORT_WINDOW),
            home_form_long: self.form.extract(home, cutoff, LONG_WINDOW),
            away_form_long: self.form.extract(away, cutoff, LONG_WINDOW),
            season,
            home_team_wins,
        }
    }
}

/// Write feature rows as CSV with the fixed header
pub fn write_csv<W: Write>(rows: &[FeatureVector], mode: Mode, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(FeatureVector::column_names(mode))?;
    for row in rows {
        let fields: Vec<String> = row.cells(mode).iter().map(Cell::to_csv_field).collect();
        csv_writer.write_record(&fields)?;
    }
    csv_writer.flush()?;
    Ok(())
}
