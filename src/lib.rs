#![warn(missing_docs)]
//! A sliding block puzzle library
//!
//! ## Overview
//!
//! Gridlock models sliding-block puzzles: rectangular pieces on a grid, one
//! horizontal primary piece that must reach the right edge of its row. On
//! top of the board model it provides a provably minimal solver, a static
//! analyzer that proves many boards unsolvable without searching, and an
//! "unsolver" that walks every board reachable from a seed to find the
//! hardest one.
//!
//! ## Example
//!
//! ```
//! use gridlock::Board;
//!
//! // '.' empty, 'x' wall, letters are pieces; 'A' is the primary piece
//! let mut board: Board = "\
//! ......
//! ....B.
//! AA..B.
//! ....C.
//! ....C.
//! ......"
//!     .parse()
//!     .unwrap();
//!
//! let solution = board.solve().unwrap();
//! assert!(solution.solvable);
//! for mv in &solution.moves {
//!     println!("{}", mv);
//! }
//!
//! // the hardest board reachable from this one by legal moves
//! let (hardest, hardest_solution) = board.unsolve().unwrap();
//! assert!(hardest_solution.num_moves >= solution.num_moves);
//! println!("{}", hardest);
//! ```

mod board;
mod consts;
mod errors;
mod memo;
mod moves;
mod piece;
mod solver;
mod static_analysis;
mod unsolver;

pub use crate::board::Board;
pub use crate::consts::{MAX_PIECES, MIN_BOARD_SIZE, MIN_PIECE_SIZE};
pub use crate::errors::{ParseError, ValidationError};
pub use crate::memo::{Fingerprint, Memo};
pub use crate::moves::Move;
pub use crate::piece::{Orientation, Piece};
pub use crate::solver::{Solution, Solver};
pub use crate::static_analysis::StaticAnalyzer;
pub use crate::unsolver::Unsolver;
