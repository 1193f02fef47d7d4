use std::io;

use anyhow::{Context, Result, bail};
use chambers::{
    Game, GameConfig, GameError, GameOutcome, ItemKind, StopReason, TurnPhase,
};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Random-input soak test for the game engine", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    games: u32,
    #[arg(short, long, default_value_t = 5_000)]
    turns: u32,
}

/// Engine diagnostics go to stderr so they never interleave with the soak summary.
fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).finish()
}

fn below(rng: &mut ChaCha8Rng, bound: usize) -> usize {
    rng.next_u64() as usize % bound
}

fn random_config(rng: &mut ChaCha8Rng) -> GameConfig {
    let player_count = 1 + below(rng, 4);
    let human_seat = if below(rng, 4) == 0 { None } else { Some(below(rng, player_count)) };
    GameConfig {
        width: 3 + below(rng, 10),
        height: 3 + below(rng, 10),
        player_count,
        human_seat,
        inventory_slots: 1 + below(rng, 8),
        ..GameConfig::default()
    }
}

/// Throws a random human action at the game. Rejections are expected and fine;
/// anything that is not a typed error is a bug.
fn poke(game: &mut Game, rng: &mut ChaCha8Rng) -> Result<()> {
    let Some(human) = game.human() else {
        return Ok(());
    };
    let pos = game.players()[human].pos;
    let result = match below(rng, 10) {
        0 => {
            let kinds = [
                ItemKind::HealthPotion,
                ItemKind::Compass,
                ItemKind::TrapKit,
                ItemKind::VisionScroll,
                ItemKind::Shield,
            ];
            game.use_item(kinds[below(rng, kinds.len())]).map(|_| ())
        }
        1 => game.puzzle_hint().map(|_| ()),
        2 => game.answer_puzzle(["keyboard", "24", "fire", "nope"][below(rng, 4)]).map(|_| ()),
        _ => {
            let targets: Vec<_> = game.map().valid_moves(pos).iter().map(|step| step.target).collect();
            match targets.get(below(rng, targets.len().max(1))) {
                Some(target) => game.request_move(*target).map(|_| ()),
                None => Ok(()),
            }
        }
    };
    match result {
        Ok(())
        | Err(
            GameError::NotAccepting
            | GameError::NotYourTurn
            | GameError::NoPendingPuzzle
            | GameError::Locked(_)
            | GameError::Item(_),
        ) => Ok(()),
        Err(err) => bail!("unexpected rejection: {err}"),
    }
}

fn check_invariants(game: &Game) -> Result<()> {
    for player in game.players().values() {
        if !(0..=player.max_health).contains(&player.health) {
            bail!("{} has {} hp", player.name, player.health);
        }
        if player.alive != (player.health > 0) {
            bail!("{} alive flag out of sync with hp {}", player.name, player.health);
        }
        if player.inventory.len() > player.inventory.max_slots() {
            bail!("{} overfilled inventory", player.name);
        }
        if !game.map().in_bounds(player.pos) {
            bail!("{} walked off the map to {}", player.name, player.pos);
        }
    }
    match game.outcome() {
        Some(GameOutcome::Winner(id)) if game.players()[id].pos != game.map().goal => {
            bail!("winner is not on the goal");
        }
        Some(_) if game.phase() != TurnPhase::GameOver => bail!("outcome without game over"),
        None if game.phase() == TurnPhase::GameOver => bail!("game over without outcome"),
        _ => Ok(()),
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing::subscriber::set_global_default(log_subscriber(filter))
        .context("failed to install log subscriber")?;

    let args = Args::parse();
    println!("Soaking {} games from seed {} for up to {} turns each...", args.games, args.seed, args.turns);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut finished = 0;

    for index in 0..args.games {
        let seed = args.seed.wrapping_add(u64::from(index));
        let config = random_config(&mut rng);
        let mut game = Game::new(config.clone(), seed)?;
        let mut turns = 0;
        while turns < args.turns {
            let result = game.advance(8);
            turns += result.bot_turns + 1;
            if let StopReason::Finished(_) = result.stop_reason {
                finished += 1;
                break;
            }
            poke(&mut game, &mut rng)?;
            if let Err(err) = check_invariants(&game) {
                bail!("seed {seed} with {config:?}: {err}");
            }
        }
    }

    println!("Soak completed: {finished}/{} games reached an outcome.", args.games);
    Ok(())
}
