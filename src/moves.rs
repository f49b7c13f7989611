//! Moves: full slides of one piece

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A full legal slide of one piece.
///
/// `piece` is the index into the board's piece list and `steps` is a nonzero
/// signed cell count along the piece's stride. A move always describes the
/// entire slide, possibly over multiple cells, never a partial step through
/// an occupied cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    piece: usize,
    steps: i32,
}

impl Move {
    /// Constructs a new `Move`. `steps` must be nonzero.
    pub fn new(piece: usize, steps: i32) -> Self {
        debug_assert!(steps != 0, "a move must have a nonzero step count");
        Move { piece, steps }
    }

    /// Index of the piece to slide.
    #[inline]
    pub fn piece(self) -> usize {
        self.piece
    }

    /// Signed slide distance in cells.
    #[inline]
    pub fn steps(self) -> i32 {
        self.steps
    }

    /// Unsigned slide distance, the move's contribution to a solution's
    /// step count.
    #[inline]
    pub fn abs_steps(self) -> usize {
        self.steps.unsigned_abs() as usize
    }

    /// The same slide in the opposite direction. Applying a move and then
    /// its inverse leaves a board unchanged.
    #[inline]
    pub fn inverted(self) -> Move {
        Move {
            piece: self.piece,
            steps: -self.steps,
        }
    }

    /// The textual label of the moved piece, `'A'` for piece 0.
    pub fn label(self) -> char {
        (b'A' + self.piece as u8) as char
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:+}", self.label(), self.steps)
    }
}
