mod checkers;
mod chess;
mod constants;
mod controller;
mod game;
mod grid;
mod grid_dsl;
mod moves;
mod piece;
mod protocol;
mod search;
mod square;
#[cfg(test)]
mod testing_utils;

use clap::{Args, Parser, Subcommand, ValueEnum};
use controller::SideAssignment;
use protocol::{EngineInterface, GameKind, SessionConfig};
use search::{SearchConfig, TieBreak};
use std::io::BufRead;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<MainCommands>,
}

#[derive(Subcommand)]
enum MainCommands {
    /// Runs an interactive line interface for a chess or checkers game
    Play(PlayArgs),
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum GameArg {
    Chess,
    Checkers,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OpponentArg {
    /// The engine plays Black
    Ai,
    /// Both sides are entered by hand
    Human,
}

#[derive(Args, Debug, Clone)]
struct PlayArgs {
    #[arg(long, value_enum, default_value = "chess")]
    game: GameArg,

    #[arg(long, value_enum, default_value = "ai")]
    opponent: OpponentArg,

    /// Search depth in plies
    #[arg(long, default_value_t = constants::DEFAULT_SEARCH_DEPTH)]
    depth: u8,

    /// Break ties between equally scored moves at random
    #[arg(long)]
    random_ties: bool,

    /// Seed for --random-ties
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop deepening the search after this many milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Default for PlayArgs {
    fn default() -> Self {
        PlayArgs {
            game: GameArg::Chess,
            opponent: OpponentArg::Ai,
            depth: constants::DEFAULT_SEARCH_DEPTH,
            random_ties: false,
            seed: 0,
            time_limit_ms: None,
            log_level: "warn".to_string(),
        }
    }
}

impl PlayArgs {
    fn session_config(&self) -> Result<SessionConfig, search::SearchError> {
        let tie_break = if self.random_ties {
            TieBreak::Random { seed: self.seed }
        } else {
            TieBreak::FirstFound
        };
        let search = SearchConfig::new(self.depth)?
            .with_tie_break(tie_break)
            .with_time_limit(self.time_limit_ms.map(Duration::from_millis));
        Ok(SessionConfig {
            game: match self.game {
                GameArg::Chess => GameKind::Chess,
                GameArg::Checkers => GameKind::Checkers,
            },
            assignment: match self.opponent {
                OpponentArg::Ai => SideAssignment::VersusAi,
                OpponentArg::Human => SideAssignment::TwoHumans,
            },
            search,
        })
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_play(args: PlayArgs) -> std::process::ExitCode {
    init_logging(&args.log_level);
    let config = match args.session_config() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {}", err);
            eprintln!("{}", err);
            return std::process::ExitCode::FAILURE;
        }
    };
    info!(
        game = config.game.to_str(),
        opponent = config.assignment.to_str(),
        depth = config.search.depth(),
        "starting engine"
    );

    let mut engine = EngineInterface::new(config);
    print!("{}", engine.command("info"));
    match engine.start(config) {
        Ok(status) => print!("{}\nok\n", status),
        Err(err) => print!("err {}\nok\n", err),
    }

    for line in std::io::stdin().lock().lines() {
        let input = match line {
            Ok(input) => input,
            Err(err) => {
                error!("failed to read input: {}", err);
                return std::process::ExitCode::FAILURE;
            }
        };
        if input.trim() == "exit" {
            break;
        }
        print!("{}", engine.command(&input));
    }
    std::process::ExitCode::SUCCESS
}

pub fn main() -> std::process::ExitCode {
    let args = Cli::parse();
    match args.command {
        Some(MainCommands::Play(args)) => run_play(args),
        None => run_play(PlayArgs::default()),
    }
}
