//! Recent-form features: rolling means over a team's last N games

use crate::TeamId;
use crate::data::GameLog;
use crate::features::window::{Perspective, TeamGameView, WindowSelector};
use chrono::NaiveDate;

/// Short form window (games)
pub const SHORT_WINDOW: usize = 3;
/// Long form window (games)
pub const LONG_WINDOW: usize = 20;

/// Mean statistics over a team's recent games
///
/// Every field is missing when the team has no qualifying history
/// before the cutoff; otherwise the mean is over however many games
/// exist, up to the window size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFeatures {
    /// Games the means were computed over (0..=N)
    pub games_used: usize,
    /// Share of those games the team won
    pub win_prct: Option<f64>,
    pub pts: Option<f64>,
    pub fg_pct: Option<f64>,
    pub ft_pct: Option<f64>,
    pub fg3_pct: Option<f64>,
    pub ast: Option<f64>,
    pub reb: Option<f64>,
}

impl FormFeatures {
    /// All-missing row for a team with no history
    pub fn missing() -> Self {
        FormFeatures::default()
    }

    fn from_views(views: &[TeamGameView]) -> Self {
        if views.is_empty() {
            return FormFeatures::missing();
        }
        FormFeatures {
            games_used: views.len(),
            win_prct: mean(views, |v| if v.won { 1.0 } else { 0.0 }),
            pts: mean(views, |v| v.stats.pts),
            fg_pct: mean(views, |v| v.stats.fg_pct),
            ft_pct: mean(views, |v| v.stats.ft_pct),
            fg3_pct: mean(views, |v| v.stats.fg3_pct),
            ast: mean(views, |v| v.stats.ast),
            reb: mean(views, |v| v.stats.reb),
        }
    }
}

fn mean(views: &[TeamGameView], f: impl Fn(&TeamGameView) -> f64) -> Option<f64> {
    if views.is_empty() {
        return None;
    }
    Some(views.iter().map(f).sum::<f64>() / views.len() as f64)
}

/// Computes recent-form features for a team before a cutoff date
pub struct GameFormExtractor<'a> {
    selector: WindowSelector<'a>,
}

impl<'a> GameFormExtractor<'a> {
    pub fn new(games: &'a GameLog) -> Self {
        GameFormExtractor {
            selector: WindowSelector::new(games),
        }
    }

    /// Mean stats over the team's last `n` games before `cutoff`
    pub fn extract(&self, team: TeamId, cutoff: NaiveDate, n: usize) -> FormFeatures {
        let views = self
            .selector
            .select_tail(team, cutoff, Perspective::All, n);
        FormFeatures::from_views(&views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GameLog;
    use crate::{GameId, GameRecord, TeamBoxScore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn box_score(pts: f64, ast: f64) -> TeamBoxScore {
        TeamBoxScore {
            pts,
            fg_pct: 0.5,
            ft_pct: 0.8,
            fg3_pct: 0.4,
            ast,
            reb: 40.0,
        }
    }

    fn game(
        id: i64,
        d: NaiveDate,
        home: i64,
        away: i64,
        home_pts: f64,
        away_pts: f64,
    ) -> GameRecord {
        GameRecord {
            game_id: GameId(id),
            date: d,
            season: 2019,
            home_team: TeamId(home),
            away_team: TeamId(away),
            home: Some(box_score(home_pts, 20.0)),
            away: Some(box_score(away_pts, 30.0)),
            home_team_wins: Some(home_pts > away_pts),
        }
    }

    #[test]
    fn test_short_history_uses_what_exists() {
        // Two games before the cutoff, window of three
        let log = GameLog::new(vec![
            game(1, date(2020, 1, 1), 1, 2, 100.0, 90.0),
            game(2, date(2020, 1, 5), 2, 1, 110.0, 120.0),
            game(3, date(2020, 1, 20), 1, 2, 99.0, 98.0),
        ]);
        let extractor = GameFormExtractor::new(&log);

        let form = extractor.extract(TeamId(1), date(2020, 1, 10), SHORT_WINDOW);
        assert_eq!(form.games_used, 2);
        // Team 1 won both: at home with 100, away with 120
        assert_eq!(form.win_prct, Some(1.0));
        assert_eq!(form.pts, Some(110.0));
    }

    #[test]
    fn test_team_relative_sides() {
        let log = GameLog::new(vec![
            game(1, date(2020, 1, 1), 1, 2, 100.0, 90.0),
            game(2, date(2020, 1, 5), 2, 1, 110.0, 80.0),
        ]);
        let extractor = GameFormExtractor::new(&log);

        // Team 1: home box (ast 20) then away box (ast 30)
        let form = extractor.extract(TeamId(1), date(2020, 2, 1), SHORT_WINDOW);
        assert_eq!(form.ast, Some(25.0));
        assert_eq!(form.pts, Some(90.0));
        assert_eq!(form.win_prct, Some(0.5));
    }

    #[test]
    fn test_window_takes_most_recent() {
        let games: Vec<_> = (0..25)
            .map(|i| {
                game(
                    i,
                    date(2020, 1, 1) + chrono::Days::new(i as u64),
                    1,
                    2,
                    100.0 + i as f64,
                    90.0,
                )
            })
            .collect();
        let log = GameLog::new(games);
        let extractor = GameFormExtractor::new(&log);

        let short = extractor.extract(TeamId(1), date(2020, 3, 1), SHORT_WINDOW);
        assert_eq!(short.games_used, 3);
        // Last three games scored 122, 123, 124
        assert_eq!(short.pts, Some(123.0));

        let long = extractor.extract(TeamId(1), date(2020, 3, 1), LONG_WINDOW);
        assert_eq!(long.games_used, 20);
    }

    #[test]
    fn test_no_history_is_missing() {
        let log = GameLog::new(vec![game(1, date(2020, 1, 1), 1, 2, 100.0, 90.0)]);
        let extractor = GameFormExtractor::new(&log);

        let form = extractor.extract(TeamId(3), date(2020, 2, 1), SHORT_WINDOW);
        assert_eq!(form, FormFeatures::missing());
        assert_eq!(form.games_used, 0);
        assert!(form.win_prct.is_none());
        assert!(form.pts.is_none());
    }
}
