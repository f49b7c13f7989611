//! Minimal-solution search by iterative deepening

use std::mem;

use crate::board::Board;
use crate::errors::ValidationError;
use crate::memo::Memo;
use crate::moves::Move;
use crate::static_analysis::StaticAnalyzer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The outcome of a solve run.
///
/// An unsolvable board is a normal outcome, not an error: `solvable` is
/// `false`, `moves` is empty and the remaining fields hold the diagnostics
/// of the search that proved it. A board that is already solved yields
/// `solvable: true` with an empty move list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    /// Whether a solution exists.
    pub solvable: bool,
    /// A minimal solution, in order. Empty if the board is already solved
    /// or not solvable at all.
    pub moves: Vec<Move>,
    /// `moves.len()`, the primary cost.
    pub num_moves: usize,
    /// Summed absolute step counts, the secondary cost. One eight-cell
    /// slide counts 8 here but only 1 in `num_moves`.
    pub num_steps: usize,
    /// The deepest iteration the search ran.
    pub depth: usize,
    /// Transposition table size at termination.
    pub memo_size: usize,
    /// Transposition table hit count at termination.
    pub memo_hits: u64,
}

impl Solution {
    fn solved(moves: Vec<Move>, depth: usize, memo_size: usize, memo_hits: u64) -> Solution {
        let num_steps = moves.iter().map(|mv| mv.abs_steps()).sum();
        Solution {
            solvable: true,
            num_moves: moves.len(),
            num_steps,
            moves,
            depth,
            memo_size,
            memo_hits,
        }
    }

    fn unsolvable(depth: usize, memo_size: usize, memo_hits: u64) -> Solution {
        Solution {
            solvable: false,
            moves: Vec::new(),
            num_moves: 0,
            num_steps: 0,
            depth,
            memo_size,
            memo_hits,
        }
    }
}

/// Iterative-deepening depth-first search for a provably minimal solution.
///
/// The solver owns its transposition table, its static analyzer and its
/// per-depth move buffers, all of which are reused across runs, so one
/// long-lived solver can score thousands of boards without reallocating.
/// It mutates the board in place during the search and restores it exactly
/// before returning.
#[derive(Debug, Default)]
pub struct Solver {
    memo: Memo,
    analyzer: StaticAnalyzer,
    path: Vec<Move>,
    move_bufs: Vec<Vec<Move>>,
    target: usize,
}

impl Solver {
    /// A fresh solver.
    pub fn new() -> Solver {
        Solver::default()
    }

    /// Validates the board, consults the static analyzer and then searches
    /// for a minimal solution.
    ///
    /// Validation failures return to the caller; an unsolvable but well
    /// formed board is reported through the [`Solution`] instead.
    pub fn solve(&mut self, board: &mut Board) -> Result<Solution, ValidationError> {
        board.validate()?;
        Ok(self.solve_with(board, true))
    }

    /// Searches without validating or static-analyzing first.
    ///
    /// For callers that have validated the board once and solve repeatedly,
    /// such as the unsolver probing thousands of boards it generated
    /// itself. On a malformed board the behavior is unspecified (it may
    /// panic, it will not return a wrong solution).
    pub fn solve_unchecked(&mut self, board: &mut Board) -> Solution {
        self.solve_with(board, false)
    }

    pub(crate) fn solve_with(&mut self, board: &mut Board, check_static: bool) -> Solution {
        self.memo.clear();
        self.target = board.target();

        if board.pieces()[0].position() == self.target {
            return Solution::solved(Vec::new(), 0, 0, 0);
        }
        if check_static && self.analyzer.impossible(board) {
            return Solution::unsolvable(0, 0, 0);
        }

        // unsolvable once the table stops growing for more consecutive
        // iterations than the primary piece has room to back up
        let cutoff = board.width() - board.pieces()[0].size();
        let mut previous_memo_size = 0;
        let mut stalled = 0;
        let mut max_depth = 0;
        loop {
            max_depth += 1;
            if self.move_bufs.len() < max_depth {
                self.move_bufs.resize_with(max_depth, Vec::new);
            }
            self.path.clear();
            if self.search(board, 0, max_depth, None) {
                // the path was collected on unwind, deepest move first
                self.path.reverse();
                return Solution::solved(
                    self.path.clone(),
                    max_depth,
                    self.memo.size(),
                    self.memo.hits(),
                );
            }
            let memo_size = self.memo.size();
            if memo_size == previous_memo_size {
                stalled += 1;
                if stalled > cutoff {
                    return Solution::unsolvable(max_depth, memo_size, self.memo.hits());
                }
            } else {
                stalled = 0;
            }
            previous_memo_size = memo_size;
        }
    }

    fn search(
        &mut self,
        board: &mut Board,
        depth: usize,
        max_depth: usize,
        previous: Option<usize>,
    ) -> bool {
        let height = max_depth - depth;
        if height == 0 {
            return board.pieces()[0].position() == self.target;
        }

        if !self.memo.add(board.fingerprint(), height) {
            return false;
        }

        // lower bound: every occupied cell between the primary piece and
        // its exit costs at least one move to clear
        let primary = board.pieces()[0];
        let from = primary.position() + primary.size();
        let to = self.target + primary.size();
        let blockers = board.occupied()[from..to].iter().filter(|&&o| o).count();
        if blockers >= height {
            return false;
        }

        let mut buf = mem::take(&mut self.move_bufs[depth]);
        board.moves(&mut buf);
        let mut solved = false;
        for &mv in &buf {
            // an immediate re-move of the same piece either reverses the
            // previous move or collapses with it into one slide
            if previous == Some(mv.piece()) {
                continue;
            }
            board.do_move(mv);
            solved = self.search(board, depth + 1, max_depth, Some(mv.piece()));
            board.undo_move(mv);
            if solved {
                self.path.push(mv);
                break;
            }
        }
        self.move_bufs[depth] = buf;
        solved
    }
}
