//! SQLite storage for the historical tables
//!
//! A thin facade: the pipeline never queries row-by-row, it bulk-loads
//! both tables into memory and works on the indexed views.

use crate::{GameId, GameRecord, RankingSnapshot, Result, TeamBoxScore, TeamId, parse_date};
use rusqlite::{params, Connection, Row};
use std::path::Path;

/// Database connection and operations
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS games (
                game_id INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                season INTEGER NOT NULL,
                home_team_id INTEGER NOT NULL,
                away_team_id INTEGER NOT NULL,
                pts_home REAL,
                fg_pct_home REAL,
                ft_pct_home REAL,
                fg3_pct_home REAL,
                ast_home REAL,
                reb_home REAL,
                pts_away REAL,
                fg_pct_away REAL,
                ft_pct_away REAL,
                fg3_pct_away REAL,
                ast_away REAL,
                reb_away REAL,
                home_team_wins INTEGER
            );

            CREATE TABLE IF NOT EXISTS rankings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                team_id INTEGER NOT NULL,
                season_id INTEGER NOT NULL,
                standings_date TEXT NOT NULL,
                w_pct REAL NOT NULL,
                home_record TEXT NOT NULL,
                road_record TEXT NOT NULL,
                conference TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_games_date ON games(date);
            CREATE INDEX IF NOT EXISTS idx_games_teams ON games(home_team_id, away_team_id);
            CREATE INDEX IF NOT EXISTS idx_rankings_team ON rankings(team_id, standings_date);
            "#,
        )?;
        Ok(())
    }

    // ==================== Game Operations ====================

    /// Insert or update a game record
    pub fn upsert_game(&self, record: &GameRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO games (
                game_id, date, season, home_team_id, away_team_id,
                pts_home, fg_pct_home, ft_pct_home, fg3_pct_home, ast_home, reb_home,
                pts_away, fg_pct_away, ft_pct_away, fg3_pct_away, ast_away, reb_away,
                home_team_wins)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            "#,
            params![
                record.game_id.0,
                record.date.format("%Y-%m-%d").to_string(),
                record.season,
                record.home_team.0,
                record.away_team.0,
                record.home.map(|s| s.pts),
                record.home.map(|s| s.fg_pct),
                record.home.map(|s| s.ft_pct),
                record.home.map(|s| s.fg3_pct),
                record.home.map(|s| s.ast),
                record.home.map(|s| s.reb),
                record.away.map(|s| s.pts),
                record.away.map(|s| s.fg_pct),
                record.away.map(|s| s.ft_pct),
                record.away.map(|s| s.fg3_pct),
                record.away.map(|s| s.ast),
                record.away.map(|s| s.reb),
                record.home_team_wins.map(i64::from),
            ],
        )?;
        Ok(())
    }

    /// Load the full game table, ascending by date
    pub fn load_games(&self) -> Result<Vec<GameRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT game_id, date, season, home_team_id, away_team_id,
                    pts_home, fg_pct_home, ft_pct_home, fg3_pct_home, ast_home, reb_home,
                    pts_away, fg_pct_away, ft_pct_away, fg3_pct_away, ast_away, reb_away,
                    home_team_wins
             FROM games
             ORDER BY date",
        )?;

        let rows = stmt
            .query_map([], Self::row_to_game)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(Self::raw_game_to_record).collect()
    }

    pub fn game_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ==================== Ranking Operations ====================

    /// Insert a standings snapshot
    ///
    /// Duplicate (team, date) rows are stored as-is; the extractor
    /// resolves them deterministically and warns.
    pub fn insert_ranking(&self, snapshot: &RankingSnapshot) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO rankings (team_id, season_id, standings_date, w_pct,
                                  home_record, road_record, conference)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                snapshot.team.0,
                snapshot.season_id,
                snapshot.standings_date.format("%Y-%m-%d").to_string(),
                snapshot.win_pct,
                snapshot.home_record,
                snapshot.road_record,
                snapshot.conference,
            ],
        )?;
        Ok(())
    }

    /// Load the full rankings table, ascending by date
    pub fn load_rankings(&self) -> Result<Vec<RankingSnapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT team_id, season_id, standings_date, w_pct, home_record, road_record, conference
             FROM rankings
             ORDER BY standings_date, id",
        )?;

        let rows = stmt
            .query_map([], Self::row_to_ranking)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(team, season_id, date, w_pct, home, road, conf)| {
                Ok(RankingSnapshot {
                    team: TeamId(team),
                    season_id,
                    standings_date: parse_date(&date, &format!("ranking for team {}", team))?,
                    win_pct: w_pct,
                    home_record: home,
                    road_record: road,
                    conference: conf,
                })
            })
            .collect()
    }

    pub fn ranking_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM rankings", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ==================== Row Mapping ====================

    fn row_to_game(row: &Row<'_>) -> rusqlite::Result<RawGame> {
        Ok(RawGame {
            game_id: row.get(0)?,
            date: row.get(1)?,
            season: row.get(2)?,
            home_team_id: row.get(3)?,
            away_team_id: row.get(4)?,
            home: (
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
                row.get(10)?,
            ),
            away: (
                row.get(11)?,
                row.get(12)?,
                row.get(13)?,
                row.get(14)?,
                row.get(15)?,
                row.get(16)?,
            ),
            home_team_wins: row.get(17)?,
        })
    }

    fn raw_game_to_record(raw: RawGame) -> Result<GameRecord> {
        Ok(GameRecord {
            game_id: GameId(raw.game_id),
            date: parse_date(&raw.date, &format!("game {}", raw.game_id))?,
            season: raw.season,
            home_team: TeamId(raw.home_team_id),
            away_team: TeamId(raw.away_team_id),
            home: side_stats(raw.home),
            away: side_stats(raw.away),
            home_team_wins: raw.home_team_wins.map(|v| v != 0),
        })
    }

    #[allow(clippy::type_complexity)]
    fn row_to_ranking(
        row: &Row<'_>,
    ) -> rusqlite::Result<(i64, i64, String, f64, String, String, Option<String>)> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
        ))
    }
}

/// Untyped game row as stored, before date parsing
struct RawGame {
    game_id: i64,
    date: String,
    season: i32,
    home_team_id: i64,
    away_team_id: i64,
    home: SideColumns,
    away: SideColumns,
    home_team_wins: Option<i64>,
}

type SideColumns = (
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
);

/// Collapse one side's stat columns into a bundle; any missing column
/// means the side has no usable box score
fn side_stats(cols: SideColumns) -> Option<TeamBoxScore> {
    let (pts, fg_pct, ft_pct, fg3_pct, ast, reb) = cols;
    Some(TeamBoxScore {
        pts: pts?,
        fg_pct: fg_pct?,
        ft_pct: ft_pct?,
        fg3_pct: fg3_pct?,
        ast: ast?,
        reb: reb?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_game() -> GameRecord {
        GameRecord {
            game_id: GameId(21900001),
            date: NaiveDate::from_ymd_opt(2019, 10, 22).unwrap(),
            season: 2019,
            home_team: TeamId(1610612747),
            away_team: TeamId(1610612746),
            home: Some(TeamBoxScore {
                pts: 102.0,
                fg_pct: 0.443,
                ft_pct: 0.824,
                fg3_pct: 0.352,
                ast: 21.0,
                reb: 46.0,
            }),
            away: Some(TeamBoxScore {
                pts: 112.0,
                fg_pct: 0.489,
                ft_pct: 0.767,
                fg3_pct: 0.387,
                ast: 23.0,
                reb: 44.0,
            }),
            home_team_wins: Some(false),
        }
    }

    #[test]
    fn test_game_round_trip() {
        let db = Database::in_memory().unwrap();
        let game = sample_game();
        db.upsert_game(&game).unwrap();

        let loaded = db.load_games().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].game_id, game.game_id);
        assert_eq!(loaded[0].date, game.date);
        assert_eq!(loaded[0].home, game.home);
        assert_eq!(loaded[0].home_team_wins, Some(false));
    }

    #[test]
    fn test_scheduled_game_round_trip() {
        let db = Database::in_memory().unwrap();
        let mut game = sample_game();
        game.home = None;
        game.away = None;
        game.home_team_wins = None;
        db.upsert_game(&game).unwrap();

        let loaded = db.load_games().unwrap();
        assert!(loaded[0].home.is_none());
        assert!(loaded[0].home_team_wins.is_none());
        assert!(!loaded[0].is_complete());
    }

    #[test]
    fn test_upsert_replaces() {
        let db = Database::in_memory().unwrap();
        let mut game = sample_game();
        db.upsert_game(&game).unwrap();
        game.home_team_wins = Some(true);
        db.upsert_game(&game).unwrap();

        assert_eq!(db.game_count().unwrap(), 1);
        assert_eq!(db.load_games().unwrap()[0].home_team_wins, Some(true));
    }

    #[test]
    fn test_ranking_round_trip() {
        let db = Database::in_memory().unwrap();
        let snapshot = RankingSnapshot {
            team: TeamId(1610612747),
            season_id: 22019,
            standings_date: NaiveDate::from_ymd_opt(2019, 12, 1).unwrap(),
            win_pct: 0.65,
            home_record: "10-2".to_string(),
            road_record: "7-4".to_string(),
            conference: Some("West".to_string()),
        };
        db.insert_ranking(&snapshot).unwrap();

        let loaded = db.load_rankings().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].win_pct, 0.65);
        assert_eq!(loaded[0].home_record, "10-2");
        assert_eq!(loaded[0].conference.as_deref(), Some("West"));
    }
}
