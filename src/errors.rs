//! Errors reported when parsing or validating a board

use crate::consts::{MAX_PIECES, MIN_BOARD_SIZE, MIN_PIECE_SIZE};

/// A violation of the board well-formedness rules.
///
/// Returned by [`Board::validate`](crate::Board::validate) and by the
/// parsing constructors, which validate before handing out a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    /// Board narrower than the minimum size. Contains the offending width.
    #[error("board width must be >= {}", MIN_BOARD_SIZE)]
    WidthTooSmall(usize),
    /// Board shorter than the minimum size. Contains the offending height.
    #[error("board height must be >= {}", MIN_BOARD_SIZE)]
    HeightTooSmall(usize),
    /// A board must contain at least the primary piece.
    #[error("board must have at least one piece")]
    NoPieces,
    /// More pieces than the fingerprint can hold. Contains the piece count.
    #[error("board must have <= {} pieces", MAX_PIECES)]
    TooManyPieces(usize),
    /// Piece 0 is the primary piece and must be horizontal.
    #[error("primary piece must be horizontal")]
    PrimaryNotHorizontal,
    /// A wall cell index lies outside the grid.
    #[error("wall at cell {0} is outside of the grid")]
    WallOutsideGrid(usize),
    /// Two walls share a cell.
    #[error("wall at cell {0} intersects another wall")]
    WallOverlap(usize),
    /// A piece occupies fewer cells than the minimum. Contains its label.
    #[error("piece {} must have size >= {}", .0, MIN_PIECE_SIZE)]
    PieceTooSmall(char),
    /// Only the primary piece may be horizontal on the primary row; any
    /// other one could never get out of the primary's way.
    #[error("piece {0} is a horizontal piece on the primary row")]
    HorizontalOnPrimaryRow(char),
    /// A piece sticks out of the grid along its orientation.
    #[error("piece {0} is outside of the grid")]
    PieceOutsideGrid(char),
    /// A piece overlaps another piece or a wall.
    #[error("piece {0} intersects with another piece or wall")]
    PieceOverlap(char),
}

/// An error encountered while reading a board from its textual notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseError {
    /// All rows must have the same length as the first one.
    /// Contains the zero-based index of the offending row.
    #[error("row {0} does not match the width of the first row")]
    UnevenRows(usize),
    /// The cells sharing this label are not collinear and contiguous with
    /// a constant stride of 1 or the row width.
    #[error("piece {0} has an invalid shape")]
    InvalidPieceShape(char),
    /// The single-line form describes the cells of a square board.
    #[error("a single line board description must be square")]
    NotSquare,
    /// The layout parsed, but the resulting board is not well formed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
