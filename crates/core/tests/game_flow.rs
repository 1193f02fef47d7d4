use chambers::content::ChamberEffect;
use chambers::{
    ChamberKind, Game, GameConfig, GameError, GameOutcome, Map, Pos, PuzzleResolution, StopReason,
    TurnPhase,
};

fn corridor(middle: ChamberKind) -> Map {
    let mut map = Map::new(4, 1);
    map.set_kind(Pos::new(0, 0), ChamberKind::Spawn);
    map.set_kind(Pos::new(1, 0), middle);
    map.goal = Pos::new(3, 0);
    map.set_kind(Pos::new(3, 0), ChamberKind::Secret);
    map.spawns = vec![Pos::new(0, 0)];
    map
}

fn solo(middle: ChamberKind) -> Game {
    let config = GameConfig { player_count: 1, human_seat: Some(0), ..GameConfig::default() };
    Game::with_map(config, 3, corridor(middle)).expect("corridor game")
}

#[test]
fn test_corridor_offers_a_single_step() {
    let game = solo(ChamberKind::Empty);
    let targets: Vec<Pos> =
        game.map().valid_moves(Pos::new(0, 0)).iter().map(|step| step.target).collect();
    assert_eq!(targets, vec![Pos::new(1, 0)]);
}

#[test]
fn test_trap_chamber_deals_its_damage_and_goes_quiet() {
    let mut game = solo(ChamberKind::Trap);
    let human = game.human().unwrap();
    let report = game.request_move(Pos::new(1, 0)).unwrap();
    let Some(ChamberEffect::Trap { trap, damage, .. }) = report.entry.effect else {
        panic!("expected a trap, got {:?}", report.entry.effect);
    };
    assert_eq!(damage, trap.damage());
    assert_eq!(game.players()[human].health, 100 - trap.damage());
    assert_eq!(game.map().kind_at(Pos::new(1, 0)), Some(ChamberKind::Empty));
}

#[test]
fn test_walking_into_the_secret_chamber_wins() {
    let mut game = solo(ChamberKind::Empty);
    let human = game.human().unwrap();
    for x in 1..=3 {
        game.request_move(Pos::new(x, 0)).unwrap();
    }
    assert_eq!(game.outcome(), Some(GameOutcome::Winner(human)));
    assert_eq!(game.players()[human].score, 100);
    assert_eq!(game.phase(), TurnPhase::GameOver);
    assert_eq!(game.advance(10).stop_reason, StopReason::Finished(GameOutcome::Winner(human)));
}

#[test]
fn test_human_puzzle_round_trip() {
    let mut game = solo(ChamberKind::Puzzle);
    let report = game.request_move(Pos::new(1, 0)).unwrap();
    let Some(PuzzleResolution::AwaitingAnswer(prompt)) = report.entry.puzzle else {
        panic!("expected a prompt, got {:?}", report.entry.puzzle);
    };
    assert_eq!(game.advance(5).stop_reason, StopReason::AwaitingPuzzleAnswer(prompt));
    assert_eq!(game.use_item(chambers::ItemKind::Compass), Err(GameError::NotAccepting));
    assert!(!game.puzzle_hint().unwrap().is_empty());
    game.answer_puzzle("wrong on purpose").unwrap();
    assert_eq!(game.pending_puzzle(), None);
    assert_eq!(game.advance(5).stop_reason, StopReason::AwaitingHumanMove);
}

#[test]
fn test_restart_rebuilds_and_cancels_pending_bot_move() {
    let config = GameConfig { human_seat: None, ..GameConfig::default() };
    let mut game = Game::new(config, 1).unwrap();
    game.tick(599);
    game.restart(2).unwrap();
    assert_eq!(game.round(), 1);
    assert_eq!(game.phase(), TurnPhase::BotThinking);
    assert!(game.tick(599).is_none(), "the old timer must not fire early into the new game");
    assert!(game.players().values().all(|player| player.turns_taken == 0));
}

#[test]
fn test_bot_turns_respect_the_configured_delay() {
    let config = GameConfig { bot_think_delay_ms: 250, ..GameConfig::default() };
    let mut game = Game::new(config, 8).unwrap();
    let human = game.human().unwrap();
    let pos = game.players()[human].pos;
    let target = game
        .map()
        .valid_moves(pos)
        .into_iter()
        .find(|step| !step.blocked)
        .map(|step| step.target)
        .unwrap();
    game.request_move(target).unwrap();
    if game.pending_puzzle().is_some() {
        game.answer_puzzle("skip").unwrap();
    }
    let result = game.advance(1);
    assert_eq!(result.bot_turns, 1);
    assert_eq!(result.elapsed_ms, 250);
    assert_eq!(result.stop_reason, StopReason::BudgetExhausted);
}
