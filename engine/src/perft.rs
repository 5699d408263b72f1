use std::fmt::Display;
use std::time::{Duration, Instant};

use tabled::{Table, Tabled};

use crate::move_gen::GenerateMoves;
use crate::position::{Move, PieceKind, Position, Winner};

/// Move counts for one ply of a perft run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Tabled)]
pub struct PerftDepthResult {
    pub tot: u64,
    pub captures: u64,
    pub promotions: u64,
    pub drops: u64,
    pub checks: u64,
    pub checkmates: u64,
    pub stalemates: u64,
    pub king_captures: u64,
}

impl PerftDepthResult {
    pub fn new(
        tot: u64,
        captures: u64,
        promotions: u64,
        drops: u64,
        checks: u64,
        checkmates: u64,
        stalemates: u64,
        king_captures: u64,
    ) -> Self {
        PerftDepthResult {
            tot,
            captures,
            promotions,
            drops,
            checks,
            checkmates,
            stalemates,
            king_captures,
        }
    }
}

pub struct PerftResult {
    pub depth_results: Vec<PerftDepthResult>,
    pub tot_nodes: u64,
    pub time_elapsed: Duration,
    pub nodes_per_second: f64,
}

impl Display for PerftResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total nodes: {}", self.tot_nodes)?;
        writeln!(f, "time elapsed: {}", self.time_elapsed.as_secs_f32())?;
        writeln!(f, "nodes/s: {:.0}", self.nodes_per_second)?;
        write!(f, "{}", Table::new(&self.depth_results))
    }
}

/// Leaf count at `depth`, split by root move. Finished games have no
/// children, so they only count when they sit exactly at `depth`.
pub fn perft(
    position: &Position,
    depth: usize,
    move_gen: impl GenerateMoves + Copy,
) -> (Vec<(Move, u64)>, u64) {
    if depth == 0 {
        return (vec![], 1);
    }

    let mut per_move = vec![];
    let mut tot = 0;

    for mve in children(position, move_gen) {
        let Ok(next) = position.apply_move(mve) else {
            continue;
        };
        let count = perft_helper(&next, depth - 1, move_gen);
        per_move.push((mve, count));
        tot += count;
    }

    (per_move, tot)
}

fn perft_helper(position: &Position, depth: usize, move_gen: impl GenerateMoves + Copy) -> u64 {
    if depth == 0 {
        return 1;
    }

    children(position, move_gen)
        .into_iter()
        .filter_map(|mve| position.apply_move(mve).ok())
        .map(|next| perft_helper(&next, depth - 1, move_gen))
        .sum()
}

fn children(position: &Position, move_gen: impl GenerateMoves) -> Vec<Move> {
    if position.is_game_over() {
        return vec![];
    }
    move_gen.gen_moves(position).into_iter().collect()
}

/// Per-ply statistics down to `depth`, timed.
pub fn perft_full(
    position: &Position,
    depth: usize,
    move_gen: impl GenerateMoves + Copy,
) -> PerftResult {
    let mut depth_results = vec![PerftDepthResult::default(); depth];

    let start = Instant::now();
    perft_full_helper(&mut depth_results, position, move_gen, depth, 0);
    let time_elapsed = start.elapsed();

    let tot_nodes = depth_results.iter().map(|res| res.tot).sum();
    let nodes_per_second = tot_nodes as f64 / time_elapsed.as_secs_f64().max(f64::EPSILON);

    PerftResult {
        depth_results,
        tot_nodes,
        time_elapsed,
        nodes_per_second,
    }
}

fn perft_full_helper(
    depth_results: &mut [PerftDepthResult],
    position: &Position,
    move_gen: impl GenerateMoves + Copy,
    max_depth: usize,
    curr_depth: usize,
) {
    if curr_depth == max_depth {
        return;
    }

    for mve in children(position, move_gen) {
        let captured = match mve {
            Move::Board { to, .. } => position.piece_at(to),
            Move::Drop { .. } => None,
        };
        let Ok(next) = position.apply_move(mve) else {
            continue;
        };

        let res = &mut depth_results[curr_depth];
        res.tot += 1;
        res.captures += u64::from(captured.is_some());
        res.promotions += u64::from(mve.is_promotion());
        res.drops += u64::from(mve.is_drop());

        // The turn stays with the mover after a king capture.
        if captured.is_some_and(|piece| piece.kind == PieceKind::King) {
            res.king_captures += 1;
        } else {
            res.checks += u64::from(!move_gen.gen_checkers(&next).is_empty());
            match next.winner() {
                Some(Winner::Draw) => res.stalemates += 1,
                Some(_) => res.checkmates += 1,
                None => {}
            }
        }

        perft_full_helper(depth_results, &next, move_gen, max_depth, curr_depth + 1);
    }
}
