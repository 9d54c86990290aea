use std::collections::HashSet;

use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};
use sea_battle::{
    auto_place, calc_pdf, calc_pdf_and_guess, pick_best, AiPlayer, BitBoard, GameConfig, GameError,
    GuessResult, Mode, Player,
};

fn untried(ai: &AiPlayer) -> BitBoard {
    ai.hits() | ai.misses()
}

#[test]
fn test_density_counts_windows() {
    let hits = BitBoard::new(3);
    let misses = BitBoard::new(3);
    let density = calc_pdf(&hits, &misses, &[2]);
    assert_eq!(density.get(1, 1), 4);
    assert_eq!(density.get(0, 1), 3);
    assert_eq!(density.get(0, 0), 2);
    assert_eq!(density.max(), 4);

    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(pick_best(&density, &hits, &mut rng), Some((1, 1)));
}

#[test]
fn test_misses_block_windows_and_score_zero() {
    let hits = BitBoard::new(3);
    let misses = BitBoard::from_iter(3, [(1, 1)]).unwrap();
    let density = calc_pdf(&hits, &misses, &[2]);
    assert_eq!(density.get(1, 1), 0);
    assert_eq!(density.get(0, 1), 2);

    let hits = BitBoard::from_iter(3, [(0, 0)]).unwrap();
    let density = calc_pdf(&hits, &BitBoard::new(3), &[2]);
    assert_eq!(density.get(0, 0), 0);
    // Lengths that do not fit are ignored.
    assert_eq!(calc_pdf(&BitBoard::new(3), &BitBoard::new(3), &[4]).max(), 0);
}

#[test]
fn test_guess_without_windows_picks_any_untried() {
    let hits = BitBoard::new(3);
    let misses = BitBoard::from_iter(3, [(0, 1), (1, 0), (1, 2), (2, 1)]).unwrap();
    let mut rng = SmallRng::seed_from_u64(5);
    for _ in 0..20 {
        let (r, c) = calc_pdf_and_guess(&hits, &misses, &[2], &mut rng).unwrap();
        assert!(!misses.contains(r, c));
    }

    let full = BitBoard::from_iter(2, [(0, 0), (0, 1), (1, 0), (1, 1)]).unwrap();
    assert_eq!(calc_pdf_and_guess(&BitBoard::new(2), &full, &[1], &mut rng), None);
}

#[test]
fn test_hit_queues_orthogonal_neighbours() {
    let config = GameConfig::default();
    let mut ai = AiPlayer::new(&config);
    assert_eq!(ai.mode(), Mode::Search);

    ai.record_result(5, 5, GuessResult::Hit).unwrap();
    assert_eq!(ai.mode(), Mode::Hunt);
    assert_eq!(ai.last_hit(), Some((5, 5)));
    let pending: HashSet<_> = ai.pending().collect();
    let expected: HashSet<_> = [(4, 5), (6, 5), (5, 4), (5, 6)].into_iter().collect();
    assert_eq!(pending, expected);

    let mut rng = SmallRng::seed_from_u64(1);
    let target = ai.next_attack(&mut rng).unwrap();
    assert!(expected.contains(&target));
}

#[test]
fn test_corner_hit_has_two_candidates() {
    let mut ai = AiPlayer::new(&GameConfig::default());
    ai.record_result(0, 0, GuessResult::Hit).unwrap();
    let pending: HashSet<_> = ai.pending().collect();
    assert_eq!(pending, [(1, 0), (0, 1)].into_iter().collect());
}

#[test]
fn test_hunt_skips_tried_candidates() {
    let mut ai = AiPlayer::new(&GameConfig::default());
    ai.record_result(4, 5, GuessResult::Miss).unwrap();
    ai.record_result(5, 5, GuessResult::Hit).unwrap();
    assert!(!ai.pending().any(|p| p == (4, 5)));

    let mut rng = SmallRng::seed_from_u64(2);
    let mut seen = HashSet::new();
    for _ in 0..3 {
        let (r, c) = ai.next_attack(&mut rng).unwrap();
        assert!(seen.insert((r, c)));
        ai.record_result(r, c, GuessResult::Miss).unwrap();
    }
    assert_eq!(
        seen,
        [(6, 5), (5, 4), (5, 6)].into_iter().collect::<HashSet<_>>()
    );
    // Queue drained: the next pick comes from the density search.
    let next = ai.next_attack(&mut rng).unwrap();
    assert_eq!(ai.mode(), Mode::Search);
    assert!(!untried(&ai).contains(next.0, next.1));
}

#[test]
fn test_latest_hit_is_followed_up_first() {
    let mut ai = AiPlayer::new(&GameConfig::default());
    let mut rng = SmallRng::seed_from_u64(8);
    ai.record_result(5, 5, GuessResult::Hit).unwrap();
    ai.record_result(4, 5, GuessResult::Hit).unwrap();

    let fresh: HashSet<_> = [(3, 5), (4, 4), (4, 6)].into_iter().collect();
    let first: HashSet<_> = ai.pending().take(3).collect();
    assert_eq!(first, fresh);

    let mut fired = HashSet::new();
    for _ in 0..3 {
        let (r, c) = ai.next_attack(&mut rng).unwrap();
        fired.insert((r, c));
        ai.record_result(r, c, GuessResult::Miss).unwrap();
    }
    assert_eq!(fired, fresh);

    // Older candidates come after.
    let mut older = HashSet::new();
    for _ in 0..3 {
        let (r, c) = ai.next_attack(&mut rng).unwrap();
        older.insert((r, c));
        ai.record_result(r, c, GuessResult::Miss).unwrap();
    }
    assert_eq!(older, [(6, 5), (5, 4), (5, 6)].into_iter().collect());
    assert_eq!(ai.mode(), Mode::Hunt);
}

#[test]
fn test_sink_marks_halo_and_shrinks_fleet() {
    let config = GameConfig::default();
    let mut ai = AiPlayer::new(&config);
    ai.record_result(2, 2, GuessResult::Hit).unwrap();
    ai.record_result(2, 3, GuessResult::Hit).unwrap();
    ai.record_result(2, 4, GuessResult::Sink).unwrap();

    assert_eq!(ai.mode(), Mode::Search);
    assert_eq!(ai.pending().count(), 0);
    assert_eq!(ai.misses().count_ones(), 12);
    for c in 1..=5 {
        assert!(ai.misses().contains(1, c));
        assert!(ai.misses().contains(3, c));
    }
    assert!(ai.misses().contains(2, 1) && ai.misses().contains(2, 5));
    assert_eq!(ai.remaining_fleet(), &[4, 3, 2, 2, 2, 1, 1, 1, 1]);
    assert!(ai.hits().is_disjoint(ai.misses()));
}

#[test]
fn test_record_rejects_tried_and_out_of_bounds() {
    let mut ai = AiPlayer::new(&GameConfig::default());
    ai.record_result(3, 3, GuessResult::Miss).unwrap();
    assert_eq!(
        ai.record_result(3, 3, GuessResult::Hit),
        Err(GameError::CellAlreadyResolved { row: 3, col: 3 })
    );
    assert_eq!(
        ai.record_result(10, 0, GuessResult::Miss),
        Err(GameError::OutOfBounds { row: 10, col: 0 })
    );
    assert_eq!(ai.hits().count_ones(), 0);
    assert_eq!(ai.misses().count_ones(), 1);
}

#[test]
fn test_search_picks_a_densest_cell() {
    let mut ai = AiPlayer::new(&GameConfig::default());
    let mut rng = SmallRng::seed_from_u64(3);
    let density = ai.density();
    let (r, c) = ai.next_attack(&mut rng).unwrap();
    assert_eq!(density.get(r, c), density.max());
}

#[test]
fn test_exhausted_grid_yields_none() {
    let config = GameConfig::new(1, vec![1]).unwrap();
    let mut ai = AiPlayer::new(&config);
    let mut rng = SmallRng::seed_from_u64(4);
    assert_eq!(ai.next_attack(&mut rng), Some((0, 0)));
    ai.record_result(0, 0, GuessResult::Sink).unwrap();
    assert!(ai.remaining_fleet().is_empty());
    assert_eq!(ai.next_attack(&mut rng), None);
}

#[test]
fn test_reset_clears_belief() {
    let config = GameConfig::default();
    let mut ai = AiPlayer::new(&config);
    ai.record_result(0, 0, GuessResult::Sink).unwrap();
    ai.record_result(5, 5, GuessResult::Hit).unwrap();
    Player::reset(&mut ai);
    assert_eq!(ai.mode(), Mode::Search);
    assert!(ai.hits().is_empty() && ai.misses().is_empty());
    assert_eq!(ai.remaining_fleet(), config.fleet_sorted().as_slice());
    assert_eq!(ai.last_hit(), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn belief_grows_and_stays_consistent(seed in any::<u64>()) {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = auto_place(&config, &mut rng).unwrap();
        let mut ai = AiPlayer::new(&config);
        let mut shots = 0;

        while !board.all_sunk() {
            let before_hits = ai.hits().clone();
            let before_misses = ai.misses().clone();

            let (r, c) = ai.select_target(&mut rng).unwrap();
            prop_assert!(!before_hits.contains(r, c) && !before_misses.contains(r, c));
            let report = board.receive_attack(r, c).unwrap();
            ai.record_result(r, c, report.result).unwrap();
            shots += 1;

            prop_assert!(ai.hits().is_disjoint(ai.misses()));
            prop_assert!(before_hits.is_subset(ai.hits()));
            prop_assert!(before_misses.is_subset(ai.misses()));
            prop_assert!(shots <= 100);
        }

        prop_assert_eq!(ai.hits().count_ones(), config.total_ship_cells());
        prop_assert!(ai.remaining_fleet().is_empty());
    }
}
