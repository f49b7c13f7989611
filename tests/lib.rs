use std::collections::{HashMap, VecDeque};

use rand::Rng;

use gridlock::{Board, Fingerprint, Orientation, Piece, Solver, Unsolver};

fn board(rows: &[&str]) -> Board {
    Board::from_rows(rows).unwrap_or_else(|err| panic!("{}", err))
}

// Exhaustive breadth-first search over the state graph; the reference for
// minimality on boards small enough to enumerate completely.
fn bfs_min_moves(seed: &Board) -> Option<usize> {
    let mut distance: HashMap<Fingerprint, usize> = HashMap::new();
    let mut queue: VecDeque<Board> = VecDeque::new();
    distance.insert(*seed.fingerprint(), 0);
    queue.push_back(seed.clone());
    let mut moves = Vec::new();
    while let Some(mut state) = queue.pop_front() {
        let d = distance[state.fingerprint()];
        if state.is_solved() {
            return Some(d);
        }
        state.moves(&mut moves);
        for &mv in &moves {
            state.do_move(mv);
            if !distance.contains_key(state.fingerprint()) {
                distance.insert(*state.fingerprint(), d + 1);
                queue.push_back(state.clone());
            }
            state.undo_move(mv);
        }
    }
    None
}

// Applies `steps` random legal moves. Every move has a legal inverse, so
// scrambling never changes solvability.
fn scramble(board: &mut Board, steps: usize) {
    let mut rng = rand::thread_rng();
    let mut moves = Vec::new();
    for _ in 0..steps {
        board.moves(&mut moves);
        if moves.is_empty() {
            return;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        board.do_move(mv);
    }
}

// A random valid board: the primary piece plus up to `extra` random pieces,
// placed by rejection sampling.
fn random_board(width: usize, height: usize, extra: usize) -> Board {
    let mut rng = rand::thread_rng();
    let mut board = Board::empty(width, height);
    let primary_row = rng.gen_range(0..height);
    board.add_piece(Piece::new(primary_row * width, 2, Orientation::Horizontal));
    for _ in 0..extra {
        for _attempt in 0..20 {
            let size = rng.gen_range(2..=3);
            let (orientation, x, y) = if rng.gen() {
                let x = rng.gen_range(0..width);
                (Orientation::Vertical, x, rng.gen_range(0..=height - size))
            } else {
                let y = rng.gen_range(0..height);
                if y == primary_row {
                    continue;
                }
                (Orientation::Horizontal, rng.gen_range(0..=width - size), y)
            };
            if board.add_piece(Piece::new(y * width + x, size, orientation)) {
                break;
            }
        }
    }
    assert_eq!(board.validate(), Ok(()));
    board
}

#[test]
fn hardest_6x6_board() {
    let mut board = board(&["BBBCDE", "FGGCDE", "F.AADE", "HHI...", ".JI.KK", ".JLLMM"]);
    let solution = board.solve().unwrap();
    assert!(solution.solvable);
    assert_eq!(solution.num_moves, 49);
    assert_eq!(solution.num_steps, 93);

    // the returned moves must actually solve the board
    let mut replay = board.clone();
    for &mv in &solution.moves {
        replay.do_move(mv);
    }
    assert!(replay.is_solved());
}

#[test]
fn solved_board_solves_in_zero_moves() {
    let mut board = board(&["......", "......", "....AA", "......", "......", "......"]);
    let solution = board.solve().unwrap();
    assert!(solution.solvable);
    assert!(solution.moves.is_empty());
    assert_eq!(solution.num_moves, 0);
}

#[test]
fn solver_is_minimal_on_fixed_boards() {
    let boards = [
        board(&["....", "AA..", ".B..", ".B.."]),
        board(&["..C.", "AAC.", ".B..", ".B.."]),
        board(&[".BB..", "...C.", "AA.C.", ".DD..", "....."]),
        board(&["..B..", "..B..", "AAB..", ".....", "....."]),
        board(&["......", "....B.", "AA..B.", "....C.", "....C.", "......"]),
    ];
    for mut board in boards {
        let expected = bfs_min_moves(&board);
        let solution = board.solve().unwrap();
        match expected {
            Some(min_moves) => {
                assert!(solution.solvable, "bfs solved, solver did not:\n{}", board);
                assert_eq!(
                    solution.num_moves, min_moves,
                    "solver is not minimal on:\n{}",
                    board
                );
            }
            None => assert!(!solution.solvable, "solver solved the unsolvable:\n{}", board),
        }
    }
}

// this test is probabilistic in nature
// if an error occurs, note down the board that it generated
#[test]
fn solver_is_minimal_on_random_boards() {
    for _ in 0..40 {
        let mut board = random_board(5, 5, 4);
        scramble(&mut board, 12);
        let expected = bfs_min_moves(&board);
        let solution = board.solve().unwrap();
        match expected {
            Some(min_moves) => {
                assert!(
                    solution.solvable,
                    "bfs solved, solver did not. Please save the board for debugging:\n{}",
                    board
                );
                assert_eq!(
                    solution.num_moves, min_moves,
                    "solver is not minimal. Please save the board for debugging:\n{}",
                    board
                );
            }
            None => assert!(
                !solution.solvable,
                "solver solved the unsolvable. Please save the board for debugging:\n{}",
                board
            ),
        }
    }
}

// this test is probabilistic in nature
// if an error occurs, note down the board that it generated
#[test]
fn static_analysis_is_sound_on_random_boards() {
    for _ in 0..60 {
        let mut board = random_board(4, 4, 3);
        if board.impossible() {
            let solution = board.solve_unchecked();
            assert!(
                !solution.solvable,
                "analyzer called a solvable board impossible. Please save the board for debugging:\n{}",
                board
            );
        }
    }
}

// this test is probabilistic in nature
// if an error occurs, note down the board that it generated
#[test]
fn do_undo_round_trip_along_a_random_walk() {
    let mut rng = rand::thread_rng();
    let mut board = board(&["..BCC.", "..B..D", "AAB..D", "..EFFD", "..E...", "GG...."]);
    let mut moves = Vec::new();
    for _ in 0..200 {
        let fingerprint = *board.fingerprint();
        let pieces = board.pieces().to_vec();
        let occupied = board.occupied().to_vec();

        board.moves(&mut moves);
        for &mv in &moves {
            board.do_move(mv);
            check_occupancy_invariant(&board);
            assert!(
                board.validate().is_ok(),
                "a legal move broke validation. Please save the board for debugging:\n{}",
                board
            );
            board.undo_move(mv);
            assert_eq!(*board.fingerprint(), fingerprint);
            assert_eq!(board.pieces(), &pieces[..]);
            assert_eq!(board.occupied(), &occupied[..]);
        }

        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        board.do_move(mv);
        check_occupancy_invariant(&board);
    }
}

// the occupancy bitmap must equal exactly the union of piece and wall cells
fn check_occupancy_invariant(board: &Board) {
    let mut expected = vec![false; board.width() * board.height()];
    for &wall in board.walls() {
        expected[wall] = true;
    }
    for piece in board.pieces() {
        let stride = piece.stride(board.width());
        let mut idx = piece.position();
        for _ in 0..piece.size() {
            assert!(!expected[idx], "two pieces overlap:\n{}", board);
            expected[idx] = true;
            idx += stride;
        }
    }
    assert_eq!(board.occupied(), &expected[..]);
}

#[test]
fn repeated_solves_are_deterministic() {
    let mut board = board(&["B.....", "B..C..", "AA.C..", "..DDD.", "......", "......"]);
    let first = board.solve().unwrap();
    let second = board.solve().unwrap();
    assert_eq!(first.num_moves, second.num_moves);
    assert_eq!(first.num_steps, second.num_steps);
    assert_eq!(first.moves, second.moves);

    // a reused solver must agree with a fresh one
    let mut solver = Solver::new();
    let third = solver.solve(&mut board).unwrap();
    assert_eq!(first.moves, third.moves);
}

#[test]
fn unsolve_is_never_easier_than_the_seed() {
    let seeds = [
        board(&["......", "....B.", "AA..B.", "....C.", "....C.", "......"]),
        board(&[".BB..", "...C.", "AA.C.", ".DD..", "....."]),
        board(&["......", "......", "....AA", "......", "......", "......"]),
    ];
    for seed in seeds {
        let seed_solution = seed.clone().solve().unwrap();
        assert!(seed_solution.solvable);

        let (hardest, solution) = seed.unsolve().unwrap();
        assert!(solution.solvable);
        assert!(
            (solution.num_moves, solution.num_steps)
                >= (seed_solution.num_moves, seed_solution.num_steps),
            "unsolve returned an easier board than its seed:\n{}",
            hardest
        );

        // the returned solution must be the returned board's own
        let check = hardest.clone().solve().unwrap();
        assert_eq!(check.num_moves, solution.num_moves);
        assert_eq!(check.num_steps, solution.num_steps);
    }
}

#[test]
fn unsolve_agrees_between_checked_and_unchecked() {
    let seed = board(&["......", "....B.", "AA..B.", "....C.", "....C.", "......"]);
    let (hardest_a, solution_a) = seed.unsolve().unwrap();
    let (hardest_b, solution_b) = Unsolver::new().unsolve_unchecked(&seed);
    assert_eq!(solution_a, solution_b);
    assert_eq!(hardest_a.to_string(), hardest_b.to_string());
}

#[test]
fn unsolved_boards_get_harder_not_different() {
    // unsolving the hardest board of a graph returns that same board
    let seed = board(&["......", "....B.", "AA..B.", "....C.", "....C.", "......"]);
    let (hardest, solution) = seed.unsolve().unwrap();
    let (again, solution_again) = hardest.unsolve().unwrap();
    assert_eq!(solution, solution_again);
    assert_eq!(hardest.to_string(), again.to_string());
}

// this test is probabilistic in nature
// if an error occurs, note down the board that it generated
#[test]
fn canonicalization_is_constant_across_a_state_graph() {
    let seed = board(&["..BCC.", "..B..D", "AAB..D", "..EFFD", "..E...", "GG...."]);
    let canonical = seed.canonicalized();
    assert_eq!(
        canonical.canonicalized().to_string(),
        canonical.to_string(),
        "canonicalization is not idempotent"
    );
    for _ in 0..10 {
        let mut state = seed.clone();
        scramble(&mut state, 30);
        assert_eq!(
            state.canonicalized().to_string(),
            canonical.to_string(),
            "a scrambled state canonicalized differently:\n{}",
            state
        );
    }
}

#[test]
fn walls_constrain_the_search() {
    // without the wall this is a one-move board
    let mut open = board(&["......", "......", "AA....", "......", "......", "......"]);
    assert_eq!(open.solve().unwrap().num_moves, 1);

    let mut walled = board(&["......", "......", "AA..x.", "......", "......", "......"]);
    let solution = walled.solve().unwrap();
    assert!(!solution.solvable);
    assert!(walled.impossible());
}

#[cfg(feature = "serde")]
#[test]
fn moves_and_solutions_serialize() {
    use gridlock::Move;

    let mut board = board(&["......", "....B.", "AA..B.", "....C.", "....C.", "......"]);
    let solution = board.solve().unwrap();
    let json = serde_json::to_string(&solution).unwrap();
    let back: gridlock::Solution = serde_json::from_str(&json).unwrap();
    assert_eq!(back, solution);

    let mv = Move::new(1, -2);
    let json = serde_json::to_string(&mv).unwrap();
    assert_eq!(serde_json::from_str::<Move>(&json).unwrap(), mv);
}
