//! Limits shared by the board model and the search machinery

/// Minimum board width and height.
pub const MIN_BOARD_SIZE: usize = 3;

/// Minimum number of cells a piece occupies.
pub const MIN_PIECE_SIZE: usize = 2;

/// Maximum number of pieces on a board. The state fingerprint is a
/// fixed-width array of this many positions, so the limit is structural,
/// not merely a sanity check.
pub const MAX_PIECES: usize = 32;
