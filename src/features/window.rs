//! As-of window selection over a team's game history
//!
//! Everything downstream sees games through a team's own perspective:
//! one side's box score, a home/away flag and a win indicator, for
//! games strictly before a cutoff date.

use crate::data::GameLog;
use crate::{GameId, HoopsError, TeamBoxScore, TeamId};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Which of a team's appearances qualify for a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    /// Every game the team played
    All,
    /// Games where the team was the home side
    Home,
    /// Games where the team was the away side
    Away,
}

impl FromStr for Perspective {
    type Err = HoopsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Perspective::All),
            "home" => Ok(Perspective::Home),
            "away" => Ok(Perspective::Away),
            other => Err(HoopsError::InvalidPerspective(other.to_string())),
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Perspective::All => write!(f, "all"),
            Perspective::Home => write!(f, "home"),
            Perspective::Away => write!(f, "away"),
        }
    }
}

/// One completed game seen from a single team's side
#[derive(Debug, Clone, Copy)]
pub struct TeamGameView {
    pub game_id: GameId,
    pub date: NaiveDate,
    /// True iff the team was the home side
    pub is_home: bool,
    /// True iff the team's side matches the actual winner
    pub won: bool,
    /// The team's own box score for this game
    pub stats: TeamBoxScore,
}

/// Selects windows of a team's most recent games before a cutoff
pub struct WindowSelector<'a> {
    games: &'a GameLog,
}

impl<'a> WindowSelector<'a> {
    pub fn new(games: &'a GameLog) -> Self {
        WindowSelector { games }
    }

    /// All qualifying games for a team strictly before the cutoff,
    /// ascending by date
    ///
    /// Scheduled games without a box score or outcome never qualify:
    /// a win indicator can only come from a played game.
    pub fn select(
        &self,
        team: TeamId,
        cutoff: NaiveDate,
        perspective: Perspective,
    ) -> Vec<TeamGameView> {
        self.games
            .team_games_before(team, cutoff)
            .filter_map(|record| {
                let is_home = record.is_home(team)?;
                match perspective {
                    Perspective::All => {}
                    Perspective::Home if !is_home => return None,
                    Perspective::Away if is_home => return None,
                    _ => {}
                }
                let won = record.did_win(team)?;
                let stats = *record.box_score_for(team)?;
                Some(TeamGameView {
                    game_id: record.game_id,
                    date: record.date,
                    is_home,
                    won,
                    stats,
                })
            })
            .collect()
    }

    /// The most recent `min(n, available)` qualifying games, ascending
    /// by date; fewer than `n` is not an error
    pub fn select_tail(
        &self,
        team: TeamId,
        cutoff: NaiveDate,
        perspective: Perspective,
        n: usize,
    ) -> Vec<TeamGameView> {
        let mut views = self.select(team, cutoff, perspective);
        let keep = n.min(views.len());
        views.split_off(views.len() - keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GameLog;
    use crate::{GameId, GameRecord};
    use chrono::Datelike;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn box_score(pts: f64) -> TeamBoxScore {
        TeamBoxScore {
            pts,
            fg_pct: 0.45,
            ft_pct: 0.8,
            fg3_pct: 0.35,
            ast: 24.0,
            reb: 44.0,
        }
    }

    fn game(id: i64, d: NaiveDate, home: i64, away: i64, home_wins: bool) -> GameRecord {
        GameRecord {
            game_id: GameId(id),
            date: d,
            season: d.year(),
            home_team: TeamId(home),
            away_team: TeamId(away),
            home: Some(box_score(100.0)),
            away: Some(box_score(95.0)),
            home_team_wins: Some(home_wins),
        }
    }

    fn sample_log() -> GameLog {
        GameLog::new(vec![
            game(1, date(2020, 1, 1), 1, 2, true),
            game(2, date(2020, 1, 5), 2, 1, true),
            game(3, date(2020, 1, 10), 1, 3, false),
            game(4, date(2020, 1, 15), 3, 1, false),
            game(5, date(2020, 1, 20), 1, 2, true),
        ])
    }

    #[test]
    fn test_strict_cutoff() {
        let log = sample_log();
        let selector = WindowSelector::new(&log);

        // Game 4 is on the cutoff date and must not appear
        let views = selector.select(TeamId(1), date(2020, 1, 15), Perspective::All);
        let ids: Vec<_> = views.iter().map(|v| v.game_id).collect();
        assert_eq!(ids, vec![GameId(1), GameId(2), GameId(3)]);
        assert!(views.iter().all(|v| v.date < date(2020, 1, 15)));
    }

    #[test]
    fn test_home_away_partition_all() {
        let log = sample_log();
        let selector = WindowSelector::new(&log);
        let cutoff = date(2020, 2, 1);

        let all: HashSet<_> = selector
            .select(TeamId(1), cutoff, Perspective::All)
            .iter()
            .map(|v| v.game_id)
            .collect();
        let home: HashSet<_> = selector
            .select(TeamId(1), cutoff, Perspective::Home)
            .iter()
            .map(|v| v.game_id)
            .collect();
        let away: HashSet<_> = selector
            .select(TeamId(1), cutoff, Perspective::Away)
            .iter()
            .map(|v| v.game_id)
            .collect();

        assert!(home.is_disjoint(&away));
        let union: HashSet<_> = home.union(&away).copied().collect();
        assert_eq!(union, all);
    }

    #[test]
    fn test_tail_length() {
        let log = sample_log();
        let selector = WindowSelector::new(&log);
        let cutoff = date(2020, 2, 1);

        for n in [0, 2, 3, 10] {
            let tail = selector.select_tail(TeamId(1), cutoff, Perspective::All, n);
            assert_eq!(tail.len(), n.min(5));
        }

        // Tail keeps the most recent games, still ascending
        let tail = selector.select_tail(TeamId(1), cutoff, Perspective::All, 2);
        let ids: Vec<_> = tail.iter().map(|v| v.game_id).collect();
        assert_eq!(ids, vec![GameId(4), GameId(5)]);
    }

    #[test]
    fn test_win_indicator_per_side() {
        let log = sample_log();
        let selector = WindowSelector::new(&log);
        let views = selector.select(TeamId(1), date(2020, 2, 1), Perspective::All);

        // Game 1: team 1 home, home wins -> won
        // Game 2: team 1 away, home wins -> lost
        // Game 3: team 1 home, home loses -> lost
        // Game 4: team 1 away, home loses -> won
        let wins: Vec<_> = views.iter().map(|v| v.won).collect();
        assert_eq!(wins, vec![true, false, false, true, true]);
        let sides: Vec<_> = views.iter().map(|v| v.is_home).collect();
        assert_eq!(sides, vec![true, false, true, false, true]);
    }

    #[test]
    fn test_incomplete_games_skipped() {
        let mut scheduled = game(9, date(2020, 1, 12), 1, 2, true);
        scheduled.home = None;
        scheduled.away = None;
        scheduled.home_team_wins = None;

        let log = GameLog::new(vec![game(1, date(2020, 1, 1), 1, 2, true), scheduled]);
        let selector = WindowSelector::new(&log);

        let views = selector.select(TeamId(1), date(2020, 2, 1), Perspective::All);
        let ids: Vec<_> = views.iter().map(|v| v.game_id).collect();
        assert_eq!(ids, vec![GameId(1)]);
    }

    #[test]
    fn test_perspective_parse() {
        assert_eq!("all".parse::<Perspective>().unwrap(), Perspective::All);
        assert_eq!("home".parse::<Perspective>().unwrap(), Perspective::Home);
        assert_eq!("away".parse::<Perspective>().unwrap(), Perspective::Away);
        assert!(matches!(
            "neutral".parse::<Perspective>(),
            Err(HoopsError::InvalidPerspective(_))
        ));
    }
}
