//! Bulk CSV import for the historical NBA dataset
//!
//! Reads the published dataset CSVs (games.csv, ranking.csv) and fills
//! the database. Ids and dates must parse; a row missing part of its
//! box score is stored as incomplete rather than rejected.

use crate::data::Database;
use crate::{
    GameId, GameRecord, Matchup, RankingSnapshot, Result, TeamBoxScore, TeamId, parse_date,
};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Raw games.csv row, upstream column names
#[derive(Debug, Deserialize)]
struct GameRow {
    #[serde(rename = "GAME_ID")]
    game_id: i64,
    #[serde(rename = "GAME_DATE_EST")]
    game_date_est: String,
    #[serde(rename = "SEASON")]
    season: i32,
    #[serde(rename = "TEAM_ID_home")]
    team_id_home: i64,
    #[serde(rename = "TEAM_ID_away")]
    team_id_away: i64,
    #[serde(rename = "PTS_home")]
    pts_home: Option<f64>,
    #[serde(rename = "FG_PCT_home")]
    fg_pct_home: Option<f64>,
    #[serde(rename = "FT_PCT_home")]
    ft_pct_home: Option<f64>,
    #[serde(rename = "FG3_PCT_home")]
    fg3_pct_home: Option<f64>,
    #[serde(rename = "AST_home")]
    ast_home: Option<f64>,
    #[serde(rename = "REB_home")]
    reb_home: Option<f64>,
    #[serde(rename = "PTS_away")]
    pts_away: Option<f64>,
    #[serde(rename = "FG_PCT_away")]
    fg_pct_away: Option<f64>,
    #[serde(rename = "FT_PCT_away")]
    ft_pct_away: Option<f64>,
    #[serde(rename = "FG3_PCT_away")]
    fg3_pct_away: Option<f64>,
    #[serde(rename = "AST_away")]
    ast_away: Option<f64>,
    #[serde(rename = "REB_away")]
    reb_away: Option<f64>,
    #[serde(rename = "HOME_TEAM_WINS")]
    home_team_wins: Option<i64>,
}

impl GameRow {
    fn into_record(self) -> Result<GameRecord> {
        let date = parse_date(&self.game_date_est, &format!("game {}", self.game_id))?;
        let home = side(
            self.pts_home,
            self.fg_pct_home,
            self.ft_pct_home,
            self.fg3_pct_home,
            self.ast_home,
            self.reb_home,
        );
        let away = side(
            self.pts_away,
            self.fg_pct_away,
            self.ft_pct_away,
            self.fg3_pct_away,
            self.ast_away,
            self.reb_away,
        );
        Ok(GameRecord {
            game_id: GameId(self.game_id),
            date,
            season: self.season,
            home_team: TeamId(self.team_id_home),
            away_team: TeamId(self.team_id_away),
            home,
            away,
            home_team_wins: self.home_team_wins.map(|v| v != 0),
        })
    }
}

fn side(
    pts: Option<f64>,
    fg_pct: Option<f64>,
    ft_pct: Option<f64>,
    fg3_pct: Option<f64>,
    ast: Option<f64>,
    reb: Option<f64>,
) -> Option<TeamBoxScore> {
    Some(TeamBoxScore {
        pts: pts?,
        fg_pct: fg_pct?,
        ft_pct: ft_pct?,
        fg3_pct: fg3_pct?,
        ast: ast?,
        reb: reb?,
    })
}

/// Raw ranking.csv row, upstream column names
#[derive(Debug, Deserialize)]
struct RankingRow {
    #[serde(rename = "TEAM_ID")]
    team_id: i64,
    #[serde(rename = "SEASON_ID")]
    season_id: i64,
    #[serde(rename = "STANDINGSDATE")]
    standings_date: String,
    #[serde(rename = "W_PCT")]
    w_pct: f64,
    #[serde(rename = "HOME_RECORD")]
    home_record: String,
    #[serde(rename = "ROAD_RECORD")]
    road_record: String,
    #[serde(rename = "CONFERENCE")]
    conference: Option<String>,
}

impl RankingRow {
    fn into_snapshot(self) -> Result<RankingSnapshot> {
        let date = parse_date(
            &self.standings_date,
            &format!("ranking for team {}", self.team_id),
        )?;
        Ok(RankingSnapshot {
            team: TeamId(self.team_id),
            season_id: self.season_id,
            standings_date: date,
            win_pct: self.w_pct,
            home_record: self.home_record,
            road_record: self.road_record,
            conference: self.conference,
        })
    }
}

/// Parse game rows from any CSV source
pub fn read_games<R: Read>(reader: R, limit: Option<usize>) -> Result<Vec<GameRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize::<GameRow>() {
        if limit.is_some_and(|n| records.len() >= n) {
            break;
        }
        records.push(row?.into_record()?);
    }
    Ok(records)
}

/// Parse standings rows from any CSV source
pub fn read_rankings<R: Read>(reader: R, limit: Option<usize>) -> Result<Vec<RankingSnapshot>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut snapshots = Vec::new();
    for row in csv_reader.deserialize::<RankingRow>() {
        if limit.is_some_and(|n| snapshots.len() >= n) {
            break;
        }
        snapshots.push(row?.into_snapshot()?);
    }
    Ok(snapshots)
}

/// Raw matchup row: the minimal columns needed to score a game
#[derive(Debug, Deserialize)]
struct MatchupRow {
    #[serde(rename = "GAME_ID")]
    game_id: i64,
    #[serde(rename = "GAME_DATE_EST")]
    game_date_est: String,
    #[serde(rename = "TEAM_ID_home")]
    team_id_home: i64,
    #[serde(rename = "TEAM_ID_away")]
    team_id_away: i64,
}

/// Parse matchup rows (GAME_ID, GAME_DATE_EST, TEAM_ID_home,
/// TEAM_ID_away) from any CSV source
pub fn read_matchups<R: Read>(reader: R) -> Result<Vec<Matchup>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut matchups = Vec::new();
    for row in csv_reader.deserialize::<MatchupRow>() {
        let row = row?;
        matchups.push(Matchup {
            game_id: GameId(row.game_id),
            date: parse_date(&row.game_date_est, &format!("matchup {}", row.game_id))?,
            home_team: TeamId(row.team_id_home),
            away_team: TeamId(row.team_id_away),
        });
    }
    Ok(matchups)
}

/// Load matchups from a CSV file
pub fn load_matchups<P: AsRef<Path>>(path: P) -> Result<Vec<Matchup>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_matchups(file)
}

/// Import games.csv into the database, returning the row count
pub fn import_games<P: AsRef<Path>>(
    db: &Database,
    path: P,
    limit: Option<usize>,
) -> Result<usize> {
    let file = std::fs::File::open(path.as_ref())?;
    let records = read_games(file, limit)?;
    for record in &records {
        db.upsert_game(record)?;
    }
    Ok(records.len())
}

/// Import ranking.csv into the database, returning the row count
pub fn import_rankings<P: AsRef<Path>>(
    db: &Database,
    path: P,
    limit: Option<usize>,
) -> Result<usize> {
    let file = std::fs::File::open(path.as_ref())?;
    let snapshots = read_rankings(file, limit)?;
    for snapshot in &snapshots {
        db.insert_ranking(snapshot)?;
    }
    Ok(snapshots.len())
}

/// Import the full dataset directory (games.csv + ranking.csv)
pub fn import_dataset<P: AsRef<Path>>(db: &Database, dir: P, limit: Option<usize>) -> Result<()> {
    let dir = dir.as_ref();

    log::info!("Importing games from {}", dir.join("games.csv").display());
    let games = import_games(db, dir.join("games.csv"), limit)?;
    log::info!("Imported {} games", games);

    log::info!(
        "Importing rankings from {}",
        dir.join("ranking.csv").display()
    );
    let rankings = import_rankings(db, dir.join("ranking.csv"), limit)?;
    log::info!("Imported {} ranking snapshots", rankings);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const GAMES_CSV: &str = "\
GAME_DATE_EST,GAME_ID,GAME_STATUS_TEXT,HOME_TEAM_ID,VISITOR_TEAM_ID,SEASON,TEAM_ID_home,PTS_home,FG_PCT_home,FT_PCT_home,FG3_PCT_home,AST_home,REB_home,TEAM_ID_away,PTS_away,FG_PCT_away,FT_PCT_away,FG3_PCT_away,AST_away,REB_away,HOME_TEAM_WINS
2019-10-22,21900001,Final,1610612747,1610612746,2019,1610612747,102,0.443,0.824,0.352,21,46,1610612746,112,0.489,0.767,0.387,23,44,0
2019-10-23,21900002,Final,1610612738,1610612755,2019,1610612738,93,0.389,0.7,0.25,20,47,1610612755,107,0.463,0.84,0.324,27,51,0
2019-10-24,21900099,Scheduled,1610612738,1610612746,2019,1610612738,,,,,,,1610612746,,,,,,,
";

    const RANKING_CSV: &str = "\
TEAM_ID,LEAGUE_ID,SEASON_ID,STANDINGSDATE,CONFERENCE,TEAM,G,W,L,W_PCT,HOME_RECORD,ROAD_RECORD,RETURNTOPLAY
1610612747,0,22019,2019-12-01,West,Lakers,20,17,3,0.85,10-1,7-2,
1610612747,0,22019,2019-11-30,West,Lakers,19,16,3,0.842,10-1,6-2,
";

    #[test]
    fn test_read_games() {
        let records = read_games(GAMES_CSV.as_bytes(), None).unwrap();
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.game_id, GameId(21900001));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2019, 10, 22).unwrap());
        assert_eq!(first.home_team, TeamId(1610612747));
        assert_eq!(first.home_team_wins, Some(false));
        assert_eq!(first.home.unwrap().pts, 102.0);

        // Scheduled game: empty stat cells, no outcome
        let scheduled = &records[2];
        assert!(scheduled.home.is_none());
        assert!(scheduled.home_team_wins.is_none());
    }

    #[test]
    fn test_read_games_limit() {
        let records = read_games(GAMES_CSV.as_bytes(), Some(1)).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_read_rankings() {
        let snapshots = read_rankings(RANKING_CSV.as_bytes(), None).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].season_id, 22019);
        assert_eq!(snapshots[0].win_pct, 0.85);
        assert_eq!(snapshots[0].home_record, "10-1");
        assert_eq!(snapshots[0].conference.as_deref(), Some("West"));
    }

    #[test]
    fn test_read_matchups() {
        let csv = "\
GAME_ID,GAME_DATE_EST,TEAM_ID_home,TEAM_ID_away
22000500,2021-01-15,1610612738,1610612747
";
        let matchups = read_matchups(csv.as_bytes()).unwrap();
        assert_eq!(matchups.len(), 1);
        assert_eq!(matchups[0].game_id, GameId(22000500));
        assert_eq!(matchups[0].date, NaiveDate::from_ymd_opt(2021, 1, 15).unwrap());
        assert_eq!(matchups[0].home_team, TeamId(1610612738));
    }

    #[test]
    fn test_bad_date_is_fatal() {
        let csv = GAMES_CSV.replace("2019-10-22", "22/10/2019");
        let err = read_games(csv.as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("22/10/2019"));
    }
}
