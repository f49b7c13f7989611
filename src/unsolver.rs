//! Adversarial search for the hardest reachable board

use crate::board::Board;
use crate::errors::ValidationError;
use crate::memo::Memo;
use crate::solver::{Solution, Solver};

/// Finds the hardest-to-solve board reachable from a seed by legal moves.
///
/// Every move has a legal inverse, so the boards reachable from a solvable
/// seed form one connected component of solvable states; the unsolver walks
/// all of them depth-first, visiting each fingerprint once, and scores each
/// with its solver as a stateless difficulty oracle. It retains the state
/// with the lexicographically greatest `(num_moves, num_steps)`; exact ties
/// go to the smaller fingerprint under the include-primary order, which
/// makes the result a canonical representative independent of visit order.
#[derive(Debug, Default)]
pub struct Unsolver {
    solver: Solver,
    memo: Memo,
}

impl Unsolver {
    /// A fresh unsolver.
    pub fn new() -> Unsolver {
        Unsolver::default()
    }

    /// Validates and static-analyzes the seed, then searches the reachable
    /// state graph for the hardest board.
    ///
    /// The seed itself is one candidate, so the returned solution is never
    /// easier than the seed's own. An unsolvable seed comes back unchanged
    /// with its unsolvable [`Solution`]. The seed is deep-copied; the
    /// caller's board is not touched.
    pub fn unsolve(&mut self, board: &Board) -> Result<(Board, Solution), ValidationError> {
        board.validate()?;
        Ok(self.run(board, true))
    }

    /// [`unsolve`](Unsolver::unsolve) without validating or
    /// static-analyzing the seed, for callers probing large numbers of
    /// boards whose validity is already guaranteed.
    pub fn unsolve_unchecked(&mut self, board: &Board) -> (Board, Solution) {
        self.run(board, false)
    }

    fn run(&mut self, seed: &Board, check_static: bool) -> (Board, Solution) {
        self.memo.clear();
        let mut board = seed.clone();
        let mut best_board = seed.clone();
        let mut best = self.solver.solve_with(&mut board, check_static);
        if best.solvable {
            self.search(&mut board, &mut best_board, &mut best, None);
        }
        (best_board, best)
    }

    fn search(
        &mut self,
        board: &mut Board,
        best_board: &mut Board,
        best: &mut Solution,
        previous: Option<usize>,
    ) {
        if !self.memo.add(board.fingerprint(), 0) {
            return;
        }

        let solution = self.solver.solve_unchecked(board);
        let harder = (solution.num_moves, solution.num_steps) > (best.num_moves, best.num_steps);
        let canonical_tie = solution.num_moves == best.num_moves
            && solution.num_steps == best.num_steps
            && board.fingerprint().precedes(best_board.fingerprint(), true);
        if harder || canonical_tie {
            *best = solution;
            *best_board = board.clone();
        }

        let mut moves = Vec::new();
        board.moves(&mut moves);
        for &mv in &moves {
            if previous == Some(mv.piece()) {
                continue;
            }
            board.do_move(mv);
            self.search(board, best_board, best, Some(mv.piece()));
            board.undo_move(mv);
        }
    }
}
