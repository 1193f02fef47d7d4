use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chambers::{Game, GameConfig, GameOutcome, RenderSnapshot, Standing, StopReason};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod autopilot;
mod config_file;
mod console;

use autopilot::Autopilot;
use console::ConsoleSink;

#[derive(Parser)]
#[command(author, version, about = "Play one headless game of Chambers", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// TOML file with game settings; defaults apply to anything left out
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seat the autopilot plays for
    #[arg(long, conflicts_with = "all_bots")]
    human_seat: Option<usize>,
    /// Let bots fill every seat
    #[arg(long)]
    all_bots: bool,
    /// Stop after this many turns even if nobody has won
    #[arg(long, default_value_t = 10_000)]
    max_turns: u32,
    /// Chance in percent that the autopilot solves a puzzle
    #[arg(long, default_value_t = 50)]
    solve_percent: u32,
    /// Print the map after every resolved move
    #[arg(short, long)]
    watch: bool,
    /// Print the final report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    seed: u64,
    outcome: String,
    rounds: u32,
    turns: u32,
    standings: Vec<Standing>,
    snapshot: Option<RenderSnapshot>,
}

fn build_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => config_file::load(path)?,
        None => GameConfig::default(),
    };
    if args.all_bots {
        config.human_seat = None;
    } else if let Some(seat) = args.human_seat {
        config.human_seat = Some(seat);
    }
    config.validate().context("invalid settings after applying command-line overrides")?;
    Ok(config)
}

fn describe(game: &Game) -> String {
    match game.outcome() {
        Some(GameOutcome::Winner(id)) => {
            format!("{} reached the Secret Chamber", game.players()[id].name)
        }
        Some(GameOutcome::AllDefeated) => "everyone fell".to_string(),
        None => "unfinished".to_string(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let mut game = Game::new(config, args.seed).context("failed to start game")?;
    if args.watch {
        game.set_render_sink(Box::new(ConsoleSink::default()));
    }
    let mut pilot = Autopilot::new(args.seed, args.solve_percent);

    let mut turns = 0;
    while turns < args.max_turns {
        let result = game.advance(args.max_turns - turns);
        turns += result.bot_turns;
        match result.stop_reason {
            StopReason::Finished(_) => break,
            StopReason::AwaitingHumanMove => {
                pilot.take_turn(&mut game)?;
                turns += 1;
            }
            StopReason::AwaitingPuzzleAnswer(prompt) => pilot.answer(&mut game, prompt)?,
            StopReason::BudgetExhausted => {}
        }
    }
    tracing::info!(turns, outcome = ?game.outcome(), "run finished");

    let report = Report {
        seed: args.seed,
        outcome: describe(&game),
        rounds: game.round(),
        turns,
        standings: game.standings(),
        snapshot: game.human().map(|human| game.snapshot(human)),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).context("serializing report")?);
        return Ok(());
    }

    println!("Seed {}: {} after {} rounds ({} turns).", report.seed, report.outcome, report.rounds, turns);
    for (place, standing) in report.standings.iter().enumerate() {
        println!(
            "{:>2}. {:<12} {:>5}{}",
            place + 1,
            standing.name,
            standing.score,
            if standing.winner { "  winner" } else { "" }
        );
    }
    Ok(())
}
