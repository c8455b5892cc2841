//! In-memory indexed views of the historical tables
//!
//! Rows are sorted by date once at construction and indexed per team,
//! so every "strictly before this date" lookup is a binary search over
//! a team's own history instead of a full table scan.

use crate::{GameId, GameRecord, RankingSnapshot, TeamId};
use std::collections::HashMap;

/// Historical game results, sorted ascending by date
#[derive(Debug, Default)]
pub struct GameLog {
    rows: Vec<GameRecord>,
    /// Row indices per team (home or away), ascending by date
    by_team: HashMap<TeamId, Vec<usize>>,
    by_game: HashMap<GameId, usize>,
}

impl GameLog {
    pub fn new(mut rows: Vec<GameRecord>) -> Self {
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.game_id.cmp(&b.game_id)));

        let mut by_team: HashMap<TeamId, Vec<usize>> = HashMap::new();
        let mut by_game = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            by_team.entry(row.home_team).or_default().push(idx);
            by_team.entry(row.away_team).or_default().push(idx);
            by_game.insert(row.game_id, idx);
        }

        GameLog {
            rows,
            by_team,
            by_game,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, ascending by date
    pub fn rows(&self) -> &[GameRecord] {
        &self.rows
    }

    pub fn get(&self, game_id: GameId) -> Option<&GameRecord> {
        self.by_game.get(&game_id).map(|&idx| &self.rows[idx])
    }

    /// A team's games strictly before the cutoff, ascending by date
    pub fn team_games_before(
        &self,
        team: TeamId,
        cutoff: chrono::NaiveDate,
    ) -> impl Iterator<Item = &GameRecord> + '_ {
        let indices = self.by_team.get(&team).map(Vec::as_slice).unwrap_or(&[]);
        let end = indices.partition_point(|&idx| self.rows[idx].date < cutoff);
        indices[..end].iter().map(move |&idx| &self.rows[idx])
    }
}

/// Standings snapshots, sorted ascending by (date, season id)
///
/// The sort is stable, so rows that tie on both keys keep their
/// insertion order and "last row at the maximal date" is deterministic.
#[derive(Debug, Default)]
pub struct RankingLog {
    rows: Vec<RankingSnapshot>,
    by_team: HashMap<TeamId, Vec<usize>>,
}

impl RankingLog {
    pub fn new(mut rows: Vec<RankingSnapshot>) -> Self {
        rows.sort_by(|a, b| {
            a.standings_date
                .cmp(&b.standings_date)
                .then(a.season_id.cmp(&b.season_id))
        });

        let mut by_team: HashMap<TeamId, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            by_team.entry(row.team).or_default().push(idx);
        }

        RankingLog { rows, by_team }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A team's snapshots strictly before the cutoff, ascending by date
    pub fn team_snapshots_before(
        &self,
        team: TeamId,
        cutoff: chrono::NaiveDate,
    ) -> impl Iterator<Item = &RankingSnapshot> + '_ {
        let indices = self.by_team.get(&team).map(Vec::as_slice).unwrap_or(&[]);
        let end = indices.partition_point(|&idx| self.rows[idx].standings_date < cutoff);
        indices[..end].iter().map(move |&idx| &self.rows[idx])
    }
}
