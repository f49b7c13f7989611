//! Pieces and their orientation on the grid

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The axis a piece is aligned with and can slide along.
///
/// Horizontal pieces move left and right, vertical pieces move up and down.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Aligned with a row, stride 1
    Horizontal,
    /// Aligned with a column, stride equal to the board width
    Vertical,
}

/// A movable rectangular piece.
///
/// The position is the zero-indexed cell of the piece's leading (topmost or
/// leftmost) cell, `0 <= position < width * height`. A piece of size `s`
/// occupies `position`, `position + stride`, ... `position + (s - 1) * stride`
/// where the stride is 1 for horizontal pieces and the board width for
/// vertical ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    position: usize,
    size: usize,
    orientation: Orientation,
}

impl Piece {
    /// Constructs a new `Piece`. The position is not checked against any
    /// particular board; [`Board::validate`](crate::Board::validate) does that.
    pub fn new(position: usize, size: usize, orientation: Orientation) -> Self {
        Piece {
            position,
            size,
            orientation,
        }
    }

    /// The cell index of the leading (topmost or leftmost) cell.
    #[inline]
    pub fn position(self) -> usize {
        self.position
    }

    /// The number of cells the piece occupies.
    #[inline]
    pub fn size(self) -> usize {
        self.size
    }

    /// Which axis the piece is aligned with.
    #[inline]
    pub fn orientation(self) -> Orientation {
        self.orientation
    }

    /// Distance between consecutive cells of the piece on a board of the
    /// given width.
    #[inline]
    pub fn stride(self, width: usize) -> usize {
        match self.orientation {
            Orientation::Horizontal => 1,
            Orientation::Vertical => width,
        }
    }

    /// Row of the leading cell on a board of the given width.
    #[inline]
    pub fn row(self, width: usize) -> usize {
        self.position / width
    }

    /// Column of the leading cell on a board of the given width.
    #[inline]
    pub fn col(self, width: usize) -> usize {
        self.position % width
    }

    #[inline]
    pub(crate) fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}
