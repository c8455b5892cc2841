//! Standings-based features: latest snapshot plus previous season's final

use crate::TeamId;
use crate::data::RankingLog;
use chrono::NaiveDate;

/// Features projected from one standings snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingFeatures {
    pub win_pct: Option<f64>,
    pub home_record: Option<String>,
    pub road_record: Option<String>,
}

impl RankingFeatures {
    /// All-missing row for a team with no snapshot history
    pub fn missing() -> Self {
        RankingFeatures::default()
    }

    fn from_snapshot(snapshot: &crate::RankingSnapshot) -> Self {
        RankingFeatures {
            win_pct: Some(snapshot.win_pct),
            home_record: Some(snapshot.home_record.clone()),
            road_record: Some(snapshot.road_record.clone()),
        }
    }
}

/// Current-season and previous-season standings features for one team
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRankingFeatures {
    /// Most recent snapshot before the cutoff
    pub current: RankingFeatures,
    /// Final snapshot of the immediately preceding season
    pub previous: RankingFeatures,
}

impl TeamRankingFeatures {
    pub fn missing() -> Self {
        TeamRankingFeatures::default()
    }
}

/// Computes standings features for a team before a cutoff date
pub struct RankingFeatureExtractor<'a> {
    rankings: &'a RankingLog,
}

impl<'a> RankingFeatureExtractor<'a> {
    pub fn new(rankings: &'a RankingLog) -> Self {
        RankingFeatureExtractor { rankings }
    }

    /// Standings features for `team` using snapshots strictly before
    /// `cutoff`
    ///
    /// The current row is the snapshot at the maximal standings date;
    /// the previous row is the latest snapshot among seasons strictly
    /// older than the newest season seen. No history means missing
    /// fields, never an error. Duplicate rows on the maximal date are
    /// resolved by taking the last one in (date, season id, insertion)
    /// order and flagged as a data-quality issue.
    pub fn extract(&self, team: TeamId, cutoff: NaiveDate) -> TeamRankingFeatures {
        let snapshots: Vec<_> = self.rankings.team_snapshots_before(team, cutoff).collect();

        let Some(current_row) = snapshots.last() else {
            return TeamRankingFeatures::missing();
        };

        let duplicates = snapshots
            .iter()
            .filter(|s| s.standings_date == current_row.standings_date)
            .count();
        if duplicates > 1 {
            log::warn!(
                "{} duplicate standings rows for {} on {}; using the last",
                duplicates,
                team,
                current_row.standings_date
            );
        }

        // Previous season: newest snapshot among strictly older seasons
        let max_season = snapshots
            .iter()
            .map(|s| s.season_id)
            .max()
            .unwrap_or(current_row.season_id);
        let previous_row = snapshots
            .iter()
            .filter(|s| s.season_id < max_season)
            .last();

        TeamRankingFeatures {
            current: RankingFeatures::from_snapshot(current_row),
            previous: previous_row
                .map(|s| RankingFeatures::from_snapshot(s))
                .unwrap_or_else(RankingFeatures::missing),
        }
    }
}
