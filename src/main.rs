//! NBA matchup feature pipeline CLI
//!
//! Imports the historical dataset and exports per-matchup feature
//! vectors for the downstream classifier.

use clap::{Parser, Subcommand};
use hoops::{Config, Result};

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "NBA matchup feature pipeline", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new project with default config
    Init,
    /// Import the historical dataset CSVs into the database
    Import {
        /// Dataset directory (defaults to the configured one)
        #[arg(long)]
        dir: Option<String>,
        /// Import at most this many rows per table
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Build feature vectors and export them as CSV
    Features {
        /// Matchup CSV (GAME_ID, GAME_DATE_EST, TEAM_ID_home,
        /// TEAM_ID_away); defaults to every game in the database
        #[arg(long)]
        matchups: Option<String>,
        /// Training mode: join season and outcome from the game table
        #[arg(long)]
        training: bool,
        /// Output path (defaults to the configured one)
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Import { dir, limit } => commands::import(&config, dir, limit),
        Commands::Features {
            matchups,
            training,
            output,
        } => commands::features(&config, matchups, training, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use hoops::Matchup;
    use hoops::data::{Database, GameLog, RankingLog, import};
    use hoops::features::{FeatureVector, MatchupVectorBuilder, Mode, vector};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        println!("Created data/ directory");

        println!("\nNext steps:");
        println!("  1. Edit {} to point at the dataset directory", config_path);
        println!("  2. Run 'hoops import' to load games and rankings");
        println!("  3. Run 'hoops features --training' to export training vectors");

        Ok(())
    }

    pub fn import(config: &Config, dir: Option<String>, limit: Option<usize>) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let dir = dir.unwrap_or_else(|| config.data.dataset_dir.clone());

        import::import_dataset(&db, &dir, limit)?;

        println!(
            "Database now holds {} games and {} ranking snapshots",
            db.game_count()?,
            db.ranking_count()?
        );
        Ok(())
    }

    pub fn features(
        config: &Config,
        matchups_path: Option<String>,
        training: bool,
        output: Option<String>,
    ) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;

        println!("Loading historical tables...");
        let games = GameLog::new(db.load_games()?);
        let rankings = RankingLog::new(db.load_rankings()?);
        println!(
            "Loaded {} games and {} ranking snapshots",
            games.len(),
            rankings.len()
        );

        let matchups: Vec<Matchup> = match matchups_path {
            Some(path) => import::load_matchups(&path)?,
            None => games.rows().iter().map(Matchup::from).collect(),
        };
        println!("Building vectors for {} matchups", matchups.len());

        let mode = if training {
            Mode::Training
        } else {
            Mode::Prediction
        };
        let builder = MatchupVectorBuilder::new(&games, &rankings);
        let rows = builder.build(&matchups, mode);

        let output = output.unwrap_or_else(|| config.output.features_path.clone());
        if let Some(parent) = std::path::Path::new(&output).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(&output)?;
        vector::write_csv(&rows, mode, file)?;

        println!(
            "Wrote {} rows x {} columns to {}",
            rows.len(),
            FeatureVector::column_names(mode).len(),
            output
        );
        Ok(())
    }
}
