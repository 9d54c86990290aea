use rand::{rngs::SmallRng, SeedableRng};
use sea_battle::{
    Board, CellState, CellView, GameConfig, GameEngine, GameError, GamePhase, GuessResult, Orientation,
    PlacementError, PlacementProgress, Side,
};

/// Default fleet in manifest order, three rows with open water between ships.
const LAYOUT: [(usize, usize, usize); 10] = [
    (0, 0, 4),
    (0, 5, 3),
    (2, 0, 3),
    (2, 4, 2),
    (2, 7, 2),
    (4, 0, 2),
    (4, 3, 1),
    (4, 5, 1),
    (4, 7, 1),
    (4, 9, 1),
];

fn layout_board() -> Board {
    let mut board = Board::new(10);
    for (r, c, size) in LAYOUT {
        board.place(r, c, size, Orientation::Horizontal).unwrap();
    }
    board
}

fn ship_cells() -> Vec<(usize, usize)> {
    LAYOUT
        .iter()
        .flat_map(|&(r, c, size)| (0..size).map(move |k| (r, c + k)))
        .collect()
}

fn started_engine(seed: u64) -> GameEngine {
    let mut engine = GameEngine::with_seed(GameConfig::default(), seed).unwrap();
    engine.randomize_placement().unwrap();
    engine
}

#[test]
fn test_manual_placement_starts_match() {
    let mut engine = GameEngine::with_seed(GameConfig::default(), 1).unwrap();
    assert_eq!(engine.phase(), GamePhase::PlacingShips);
    assert_eq!(engine.next_ship_size(), Some(4));
    assert_eq!(engine.attack(Side::Opponent, 0, 0), Err(GameError::WrongPhase));

    for (i, (r, c, _)) in LAYOUT.into_iter().enumerate() {
        let progress = engine.try_place(r, c, Orientation::Horizontal).unwrap();
        match LAYOUT.get(i + 1) {
            Some(&(_, _, next)) => assert_eq!(progress, PlacementProgress::Next(next)),
            None => assert_eq!(progress, PlacementProgress::Complete),
        }
    }
    assert_eq!(engine.phase(), GamePhase::InProgress);
    assert_eq!(engine.next_ship_size(), None);
    assert_eq!(engine.player_board().occupied_count(), 20);
    assert_eq!(engine.player_view().get(0, 0), Some(CellView::Ship));
    assert_eq!(
        engine.try_place(9, 9, Orientation::Horizontal),
        Err(GameError::WrongPhase)
    );
    assert_eq!(engine.reset_placement(), Err(GameError::WrongPhase));
}

#[test]
fn test_rejected_placement_keeps_progress() {
    let mut engine = GameEngine::with_seed(GameConfig::default(), 2).unwrap();
    engine.try_place(0, 0, Orientation::Horizontal).unwrap();
    assert!(!engine.can_place(1, 0, Orientation::Horizontal));
    assert_eq!(
        engine.try_place(1, 0, Orientation::Horizontal),
        Err(GameError::InvalidPlacement(PlacementError::Adjacent))
    );
    assert_eq!(engine.next_ship_size(), Some(3));
    assert_eq!(engine.player_view().get(0, 3), Some(CellView::Ship));

    engine.reset_placement().unwrap();
    assert_eq!(engine.next_ship_size(), Some(4));
    assert_eq!(engine.player_view().get(0, 0), Some(CellView::Water));
}

#[test]
fn test_turns_alternate() {
    let mut engine = started_engine(3);
    assert_eq!(engine.next_target(), Side::Opponent);
    assert_eq!(engine.attack(Side::Player, 0, 0), Err(GameError::OutOfTurn));
    assert_eq!(engine.opponent_turn(), Err(GameError::OutOfTurn));

    let shot = engine.attack(Side::Opponent, 0, 0).unwrap();
    assert_eq!(shot.target, Side::Opponent);
    assert_eq!(engine.next_target(), Side::Player);
    assert_eq!(engine.attack(Side::Opponent, 1, 1), Err(GameError::OutOfTurn));

    let reply = engine.opponent_turn().unwrap();
    assert_eq!(reply.target, Side::Player);
    assert_eq!(engine.next_target(), Side::Opponent);
    assert_eq!(engine.shots_fired(Side::Opponent), 1);
    assert_eq!(engine.shots_fired(Side::Player), 1);
}

#[test]
fn test_repeat_attack_changes_nothing() {
    let mut engine = started_engine(4);
    let turn = engine.play_turn(5, 5).unwrap();
    assert!(turn.reply.is_some());

    assert_eq!(
        engine.play_turn(5, 5).map(|_| ()),
        Err(GameError::CellAlreadyResolved { row: 5, col: 5 })
    );
    assert_eq!(
        engine.play_turn(10, 0).map(|_| ()),
        Err(GameError::OutOfBounds { row: 10, col: 0 })
    );
    assert_eq!(engine.shots_fired(Side::Opponent), 1);
    assert_eq!(engine.shots_fired(Side::Player), 1);
    assert_eq!(engine.next_target(), Side::Opponent);
}

#[test]
fn test_player_wins_and_match_locks() {
    let config = GameConfig::default();
    let mut engine = GameEngine::from_boards(
        config,
        layout_board(),
        layout_board(),
        SmallRng::seed_from_u64(5),
    )
    .unwrap();
    assert_eq!(engine.phase(), GamePhase::InProgress);

    let cells = ship_cells();
    let (last, rest) = cells.split_last().unwrap();
    for &(r, c) in rest {
        let turn = engine.play_turn(r, c).unwrap();
        assert!(turn.player.hit());
        assert!(!turn.player.game_over);
        // Nineteen replies cannot sink twenty cells.
        assert!(!turn.reply.unwrap().game_over);
    }
    assert!(engine.opponent_view().rows().flatten().all(|&v| v != CellView::Ship));

    let turn = engine.play_turn(last.0, last.1).unwrap();
    assert_eq!(turn.player.result, GuessResult::Sink);
    assert_eq!(turn.player.ship_size, Some(1));
    assert!(turn.player.game_over);
    assert_eq!(turn.player.winner, Some(Side::Player));
    assert!(turn.reply.is_none());

    assert_eq!(engine.phase(), GamePhase::Finished);
    assert_eq!(engine.winner(), Some(Side::Player));
    assert_eq!(engine.attack(Side::Opponent, 9, 9), Err(GameError::MatchFinished));
    assert_eq!(engine.attack(Side::Player, 9, 9), Err(GameError::MatchFinished));
    assert_eq!(engine.opponent_turn(), Err(GameError::MatchFinished));
    assert_eq!(engine.shots_fired(Side::Opponent), 20);
    assert_eq!(engine.shots_fired(Side::Player), 19);
    assert_eq!(engine.opponent_view().get(0, 0), Some(CellView::Sunk));
}

#[test]
fn test_opponent_wins_when_player_fleet_is_gone() {
    let mut engine = GameEngine::from_boards(
        GameConfig::default(),
        layout_board(),
        layout_board(),
        SmallRng::seed_from_u64(9),
    )
    .unwrap();

    // The player keeps to the empty bottom rows; the opponent's shots are scripted.
    let cells = ship_cells();
    let water = (6..10).flat_map(|r| (0..10).map(move |c| (r, c)));
    for (i, (&(r, c), (wr, wc))) in cells.iter().zip(water).enumerate() {
        let shot = engine.attack(Side::Opponent, wr, wc).unwrap();
        assert_eq!(shot.result, GuessResult::Miss);

        let reply = engine.attack(Side::Player, r, c).unwrap();
        assert!(reply.hit());
        assert_eq!(reply.game_over, i + 1 == cells.len());
    }

    assert_eq!(engine.phase(), GamePhase::Finished);
    assert_eq!(engine.winner(), Some(Side::Opponent));
    assert!(engine.player_board().all_sunk());
    assert!(!engine.opponent_view().rows().flatten().any(|&v| v == CellView::Sunk));
    assert_eq!(engine.player_view().get(0, 0), Some(CellView::Sunk));
    assert_eq!(engine.play_turn(9, 9).map(|_| ()), Err(GameError::MatchFinished));

    // Every scripted shot reached the opponent's belief.
    assert_eq!(engine.ai().hits().count_ones(), 20);
    assert!(engine.ai().remaining_fleet().is_empty());
    assert_eq!(engine.shots_fired(Side::Player), 20);
    assert_eq!(engine.shots_fired(Side::Opponent), 20);
}

#[test]
fn test_player_board_tracks_placement() {
    let mut engine = GameEngine::with_seed(GameConfig::default(), 10).unwrap();
    assert_eq!(engine.player_board().size(), 10);
    assert!(engine.player_board().ships().is_empty());

    engine.try_place(0, 0, Orientation::Vertical).unwrap();
    assert_eq!(engine.player_board().ships().len(), 1);
    assert_eq!(engine.player_board().ship_at(3, 0), Some(0));

    engine.randomize_placement().unwrap();
    assert_eq!(engine.phase(), GamePhase::InProgress);
    assert_eq!(engine.player_board().occupied_count(), 20);
}

#[test]
fn test_opponent_belief_matches_player_board() {
    let mut engine = started_engine(6);
    'sweep: for r in 0..10 {
        for c in 0..10 {
            if engine.phase() != GamePhase::InProgress {
                break 'sweep;
            }
            // Skip cells already resolved by an earlier sinking.
            if engine.opponent_view().get(r, c) == Some(CellView::Water) {
                engine.play_turn(r, c).unwrap();
            }
        }
    }
    assert_eq!(engine.phase(), GamePhase::Finished);

    let ai = engine.ai();
    let board = engine.player_board();
    assert!(ai.hits().is_disjoint(ai.misses()));
    for (r, c) in ai.hits().iter_set_bits() {
        assert_eq!(board.cell(r, c), Some(CellState::Hit));
    }
    for (r, c) in ai.misses().iter_set_bits() {
        assert_eq!(board.cell(r, c), Some(CellState::Miss));
    }
    assert_eq!(ai.hits().count_ones(), board.count(CellState::Hit));
    let loser = if engine.winner() == Some(Side::Player) {
        engine.opponent_view()
    } else {
        engine.player_view()
    };
    assert!(loser.rows().flatten().all(|&v| v != CellView::Ship && v != CellView::Hit));
}

#[test]
fn test_from_boards_validates_fleet() {
    let config = GameConfig::default();
    let mut short = Board::new(10);
    short.place(0, 0, 4, Orientation::Horizontal).unwrap();
    assert!(matches!(
        GameEngine::from_boards(config.clone(), short, layout_board(), SmallRng::seed_from_u64(0)),
        Err(GameError::InvalidConfig(_))
    ));

    let mut shot_at = layout_board();
    shot_at.receive_attack(0, 0).unwrap();
    assert!(matches!(
        GameEngine::from_boards(config, layout_board(), shot_at, SmallRng::seed_from_u64(0)),
        Err(GameError::WrongPhase)
    ));
}

#[test]
fn test_new_match_resets_everything() {
    let mut engine = started_engine(7);
    engine.play_turn(0, 0).unwrap();

    let small = GameConfig::new(6, vec![3, 2, 1]).unwrap();
    engine.new_match(small.clone()).unwrap();
    assert_eq!(engine.phase(), GamePhase::PlacingShips);
    assert_eq!(engine.config(), &small);
    assert_eq!(engine.next_ship_size(), Some(3));
    assert_eq!(engine.winner(), None);
    assert_eq!(engine.shots_fired(Side::Opponent), 0);
    assert_eq!(engine.shots_fired(Side::Player), 0);
    assert!(engine.ai().hits().is_empty());
    assert_eq!(engine.opponent_view().size(), 6);
}

#[test]
fn test_same_seed_same_match() {
    let mut a = started_engine(8);
    let mut b = started_engine(8);
    for (r, c) in [(0, 0), (3, 4), (9, 9)] {
        assert_eq!(a.play_turn(r, c), b.play_turn(r, c));
    }
    assert_eq!(a.player_view(), b.player_view());
}
