use goro_engine::{legal_moves, perft, perft_full, Position, MOVE_GEN, START_SFEN};

use test_case::test_case;
use testresult::TestResult;

#[test]
fn test_perft_start_depth_one() {
    let (per_move, tot) = perft(&Position::start(), 1, MOVE_GEN);

    assert_eq!(tot, 16);
    assert_eq!(per_move.len(), 16);
}

#[test]
fn test_perft_depth_two_splits_by_reply_count() -> TestResult {
    let start = Position::start();
    let (per_move, tot) = perft(&start, 2, MOVE_GEN);

    let mut sum = 0;
    for (mve, count) in per_move {
        let next = start.apply_move(mve)?;
        assert_eq!(count, legal_moves(&next, next.turn()).len() as u64, "{}", mve);
        sum += count;
    }
    assert_eq!(sum, tot);
    Ok(())
}

// The start position is symmetric under a half turn with colours swapped, so
// either side to move sees the same tree.
#[test_case(1)]
#[test_case(2)]
#[test_case(3)]
fn test_perft_colour_symmetry(depth: usize) -> TestResult {
    let first = Position::from_sfen(START_SFEN)?;
    let second = Position::from_sfen(&START_SFEN.replace(" b ", " w "))?;

    assert_eq!(perft(&first, depth, MOVE_GEN).1, perft(&second, depth, MOVE_GEN).1);
    Ok(())
}

#[test_case(1)]
#[test_case(2)]
#[test_case(3)]
fn test_perft_full_matches_perft(depth: usize) {
    let start = Position::start();
    let res = perft_full(&start, depth, MOVE_GEN);
    println!("{}", res);

    assert_eq!(res.depth_results.len(), depth);
    for (idx, depth_res) in res.depth_results.iter().enumerate() {
        assert_eq!(depth_res.tot, perft(&start, idx + 1, MOVE_GEN).1);
    }
}
