//! The board: grid, pieces, walls, occupancy and move machinery

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::consts::{MAX_PIECES, MIN_BOARD_SIZE, MIN_PIECE_SIZE};
use crate::errors::{ParseError, ValidationError};
use crate::memo::{Fingerprint, Memo};
use crate::moves::Move;
use crate::piece::{Orientation, Piece};
use crate::solver::{Solution, Solver};
use crate::static_analysis::StaticAnalyzer;
use crate::unsolver::Unsolver;

/// The complete puzzle state: grid size, pieces, walls and the derived
/// occupancy bitmap and state fingerprint.
///
/// Piece 0 is the primary piece; it is horizontal and wins by reaching the
/// right edge of its row. A board is mutated in place during search through
/// paired [`do_move`](Board::do_move)/[`undo_move`](Board::undo_move) calls
/// in stack discipline; [`Clone`] takes the explicit deep copies needed when
/// a state must outlive its search frame.
#[derive(Clone, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    pieces: Vec<Piece>,
    walls: Vec<usize>,
    occupied: Vec<bool>,
    fingerprint: Fingerprint,
}

impl Board {
    /// An empty board with no pieces and no walls.
    ///
    /// The result does not validate until a primary piece is added.
    pub fn empty(width: usize, height: usize) -> Board {
        Board {
            width,
            height,
            pieces: Vec::new(),
            walls: Vec::new(),
            occupied: vec![false; width * height],
            fingerprint: Fingerprint::new(&[]),
        }
    }

    /// Reads a board from its row-per-line notation and validates it.
    ///
    /// `.` is an empty cell, `x` a wall, any other character a piece label.
    /// The cells sharing a label must be collinear and contiguous; labels
    /// sorted lexically become piece indices, so the piece labeled `A` is
    /// the primary piece.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Board, ParseError> {
        let height = rows.len();
        if height < MIN_BOARD_SIZE {
            return Err(ValidationError::HeightTooSmall(height).into());
        }
        let width = rows[0].as_ref().chars().count();
        if width < MIN_BOARD_SIZE {
            return Err(ValidationError::WidthTooSmall(width).into());
        }

        let mut occupied = vec![false; width * height];
        let mut walls = Vec::new();
        let mut cells_by_label: BTreeMap<char, Vec<usize>> = BTreeMap::new();
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(ParseError::UnevenRows(y));
            }
            for (x, label) in row.chars().enumerate() {
                if label == '.' {
                    continue;
                }
                let i = y * width + x;
                occupied[i] = true;
                if label == 'x' {
                    walls.push(i);
                } else {
                    cells_by_label.entry(label).or_default().push(i);
                }
            }
        }
        if cells_by_label.len() > MAX_PIECES {
            return Err(ValidationError::TooManyPieces(cells_by_label.len()).into());
        }

        let mut pieces = Vec::with_capacity(cells_by_label.len());
        for (&label, cells) in &cells_by_label {
            pieces.push(piece_from_cells(label, cells, width)?);
        }

        let fingerprint = Fingerprint::new(&pieces);
        let board = Board {
            width,
            height,
            pieces,
            walls,
            occupied,
            fingerprint,
        };
        board.validate()?;
        Ok(board)
    }

    /// Reads a square board from the single-line form, the row-per-line
    /// notation with the newlines removed.
    pub fn from_str_line(s: &str) -> Result<Board, ParseError> {
        let cells: Vec<char> = s.chars().collect();
        let side = integer_sqrt(cells.len());
        if side * side != cells.len() {
            return Err(ParseError::NotSquare);
        }
        let rows: Vec<String> = cells.chunks(side).map(|row| row.iter().collect()).collect();
        Board::from_rows(&rows)
    }

    /// Grid width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The pieces in index order. Piece 0 is the primary piece.
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Wall cell indices, in insertion order.
    #[inline]
    pub fn walls(&self) -> &[usize] {
        &self.walls
    }

    /// The occupancy bitmap, one flag per cell. A cell is occupied iff it is
    /// covered by a piece or a wall; the board maintains this equality as an
    /// invariant across every mutation.
    #[inline]
    pub fn occupied(&self) -> &[bool] {
        &self.occupied
    }

    /// The current state fingerprint, by reference. It changes in place as
    /// moves are applied and undone.
    #[inline]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Checks every board well-formedness rule and reports the first
    /// violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let w = self.width;
        let h = self.height;

        if w < MIN_BOARD_SIZE {
            return Err(ValidationError::WidthTooSmall(w));
        }
        if h < MIN_BOARD_SIZE {
            return Err(ValidationError::HeightTooSmall(h));
        }
        if self.pieces.is_empty() {
            return Err(ValidationError::NoPieces);
        }
        if self.pieces.len() > MAX_PIECES {
            return Err(ValidationError::TooManyPieces(self.pieces.len()));
        }
        if self.pieces[0].orientation() != Orientation::Horizontal {
            return Err(ValidationError::PrimaryNotHorizontal);
        }

        let mut occupied = vec![false; w * h];
        for &i in &self.walls {
            if i >= w * h {
                return Err(ValidationError::WallOutsideGrid(i));
            }
            if occupied[i] {
                return Err(ValidationError::WallOverlap(i));
            }
            occupied[i] = true;
        }

        let primary_row = self.pieces[0].row(w);
        for (index, piece) in self.pieces.iter().enumerate() {
            let label = piece_label(index);
            if piece.size() < MIN_PIECE_SIZE {
                return Err(ValidationError::PieceTooSmall(label));
            }
            if index > 0
                && piece.orientation() == Orientation::Horizontal
                && piece.row(w) == primary_row
            {
                return Err(ValidationError::HorizontalOnPrimaryRow(label));
            }
            let inside = match piece.orientation() {
                Orientation::Horizontal => {
                    piece.row(w) < h && piece.col(w) + piece.size() <= w
                }
                Orientation::Vertical => piece.row(w) + piece.size() <= h,
            };
            if !inside {
                return Err(ValidationError::PieceOutsideGrid(label));
            }
            let stride = piece.stride(w);
            let mut idx = piece.position();
            for _ in 0..piece.size() {
                if occupied[idx] {
                    return Err(ValidationError::PieceOverlap(label));
                }
                occupied[idx] = true;
                idx += stride;
            }
        }

        Ok(())
    }

    /// The exit cell: where the primary piece's leading position must end up
    /// for the board to be solved (the rightmost placement in its row).
    ///
    /// # Panics
    /// Panics if the board has no pieces.
    pub fn target(&self) -> usize {
        let primary = self.pieces[0];
        (primary.row(self.width) + 1) * self.width - primary.size()
    }

    /// Whether the primary piece has reached its exit.
    ///
    /// # Panics
    /// Panics if the board has no pieces.
    #[inline]
    pub fn is_solved(&self) -> bool {
        self.pieces[0].position() == self.target()
    }

    /// Enumerates every legal move into `moves`, clearing it first.
    ///
    /// The order is fixed: pieces by index; for each piece the reverse
    /// slides nearest to farthest, then the forward slides nearest to
    /// farthest. A slide stops at the first occupied cell or the grid edge,
    /// and every reachable distance yields its own move.
    pub fn moves(&self, moves: &mut Vec<Move>) {
        moves.clear();
        let w = self.width;
        let h = self.height;
        for (i, piece) in self.pieces.iter().enumerate() {
            let (stride, reverse_steps, forward_steps) = match piece.orientation() {
                Orientation::Vertical => {
                    let y = piece.position() / w;
                    (w, y, h - piece.size() - y)
                }
                Orientation::Horizontal => {
                    let x = piece.position() % w;
                    (1, x, w - piece.size() - x)
                }
            };
            let mut idx = piece.position();
            for steps in 1..=reverse_steps {
                idx -= stride;
                if self.occupied[idx] {
                    break;
                }
                moves.push(Move::new(i, -(steps as i32)));
            }
            let mut idx = piece.position() + piece.size() * stride;
            for steps in 1..=forward_steps {
                if self.occupied[idx] {
                    break;
                }
                moves.push(Move::new(i, steps as i32));
                idx += stride;
            }
        }
    }

    /// Applies a move in place, updating the occupancy bitmap and the
    /// fingerprint. The move must be legal for the current state; in debug
    /// builds sliding onto an occupied cell is caught by an assertion.
    pub fn do_move(&mut self, mv: Move) {
        let piece = self.pieces[mv.piece()];
        let stride = piece.stride(self.width);

        let mut idx = piece.position();
        for _ in 0..piece.size() {
            self.occupied[idx] = false;
            idx += stride;
        }

        let position = offset(piece.position(), stride, mv.steps());
        self.pieces[mv.piece()].set_position(position);
        self.fingerprint.set(mv.piece(), position);

        let mut idx = position;
        for _ in 0..piece.size() {
            debug_assert!(!self.occupied[idx], "move lands on an occupied cell");
            self.occupied[idx] = true;
            idx += stride;
        }
    }

    /// Reverts a move previously applied with [`do_move`](Board::do_move).
    /// Do and undo pairs must nest in stack discipline.
    #[inline]
    pub fn undo_move(&mut self, mv: Move) {
        self.do_move(mv.inverted());
    }

    /// Adds a piece if its cells are free and the piece limit is not
    /// reached. Returns whether the piece was added.
    ///
    /// The piece must lie inside the grid; [`validate`](Board::validate)
    /// reports one that does not.
    pub fn add_piece(&mut self, piece: Piece) -> bool {
        if self.pieces.len() >= MAX_PIECES || self.is_piece_area_occupied(piece) {
            return false;
        }
        let index = self.pieces.len();
        self.pieces.push(piece);
        self.set_piece_area(piece, true);
        self.fingerprint.set(index, piece.position());
        true
    }

    /// Adds a wall if the cell is free. Returns whether the wall was added.
    pub fn add_wall(&mut self, cell: usize) -> bool {
        if self.occupied[cell] {
            return false;
        }
        self.walls.push(cell);
        self.occupied[cell] = true;
        true
    }

    /// Removes the piece at `index`. The last piece takes its place, so
    /// indices of later pieces shift.
    pub fn remove_piece(&mut self, index: usize) {
        let piece = self.pieces[index];
        self.set_piece_area(piece, false);
        let last = self.pieces.len() - 1;
        self.pieces.swap_remove(index);
        if index < last {
            self.fingerprint.set(index, self.pieces[index].position());
        }
        self.fingerprint.set(last, 0);
    }

    /// Removes the most recently added piece.
    pub fn remove_last_piece(&mut self) {
        self.remove_piece(self.pieces.len() - 1);
    }

    /// Removes the wall at `index` into [`walls`](Board::walls). The last
    /// wall takes its place.
    pub fn remove_wall(&mut self, index: usize) {
        self.occupied[self.walls[index]] = false;
        self.walls.swap_remove(index);
    }

    /// Sorts the non-primary pieces by position and rebuilds the
    /// fingerprint. Canonicalization relies on this to make piece order a
    /// function of the configuration alone.
    pub fn sort_pieces(&mut self) {
        self.pieces[1..].sort_by_key(|piece| piece.position());
        self.fingerprint = Fingerprint::new(&self.pieces);
    }

    /// Visits every state reachable from the current one through sequences
    /// of legal moves, the current state included, each exactly once. The
    /// board is restored to its entry state before returning.
    pub fn for_each_reachable<F>(&mut self, mut visit: F)
    where
        F: FnMut(&Board),
    {
        let mut memo = Memo::new();
        self.walk_states(&mut memo, None, &mut visit);
    }

    fn walk_states<F>(&mut self, memo: &mut Memo, previous: Option<usize>, visit: &mut F)
    where
        F: FnMut(&Board),
    {
        if !memo.add(&self.fingerprint, 0) {
            return;
        }
        visit(self);
        let mut moves = Vec::new();
        self.moves(&mut moves);
        for &mv in &moves {
            if previous == Some(mv.piece()) {
                continue;
            }
            self.do_move(mv);
            self.walk_states(memo, Some(mv.piece()), visit);
            self.undo_move(mv);
        }
    }

    /// The number of distinct reachable states, the current one included.
    pub fn reachable_states(&mut self) -> usize {
        let mut count = 0;
        self.for_each_reachable(|_| count += 1);
        count
    }

    /// The canonical representative of this board's reachable state graph:
    /// the reachable state with the smallest fingerprint under the
    /// include-primary order, with its pieces sorted.
    ///
    /// Every state of one graph canonicalizes to the same board, so the
    /// result identifies the puzzle rather than one of its positions.
    pub fn canonicalized(&self) -> Board {
        let mut walker = self.clone();
        let mut best = self.clone();
        walker.for_each_reachable(|board| {
            if board.fingerprint().precedes(best.fingerprint(), true) {
                best = board.clone();
            }
        });
        best.sort_pieces();
        best
    }

    /// Finds a provably minimal solution. Validates the board and runs the
    /// static analyzer before searching; see [`Solver::solve`].
    pub fn solve(&mut self) -> Result<Solution, ValidationError> {
        Solver::new().solve(self)
    }

    /// Finds a provably minimal solution without validating or
    /// static-analyzing first; see [`Solver::solve_unchecked`].
    pub fn solve_unchecked(&mut self) -> Solution {
        Solver::new().solve_unchecked(self)
    }

    /// Finds the hardest board reachable from this one by legal moves; see
    /// [`Unsolver::unsolve`].
    pub fn unsolve(&self) -> Result<(Board, Solution), ValidationError> {
        Unsolver::new().unsolve(self)
    }

    /// [`unsolve`](Board::unsolve) without the upfront checks; see
    /// [`Unsolver::unsolve_unchecked`].
    pub fn unsolve_unchecked(&self) -> (Board, Solution) {
        Unsolver::new().unsolve_unchecked(self)
    }

    /// Whether the static analyzer proves this board unsolvable; see
    /// [`StaticAnalyzer::impossible`].
    ///
    /// # Panics
    /// Panics if the board has no pieces.
    pub fn impossible(&self) -> bool {
        StaticAnalyzer::new().impossible(self)
    }

    /// The cells the static analyzer proves occupied under every legal
    /// arrangement; see [`StaticAnalyzer::blocked_cells`].
    pub fn blocked_cells(&self) -> Vec<usize> {
        StaticAnalyzer::new().blocked_cells(self)
    }

    fn is_piece_area_occupied(&self, piece: Piece) -> bool {
        let stride = piece.stride(self.width);
        let mut idx = piece.position();
        for _ in 0..piece.size() {
            if self.occupied[idx] {
                return true;
            }
            idx += stride;
        }
        false
    }

    fn set_piece_area(&mut self, piece: Piece, value: bool) {
        let stride = piece.stride(self.width);
        let mut idx = piece.position();
        for _ in 0..piece.size() {
            self.occupied[idx] = value;
            idx += stride;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut grid = vec!['.'; self.width * self.height];
        for &i in &self.walls {
            grid[i] = 'x';
        }
        for (index, piece) in self.pieces.iter().enumerate() {
            let label = piece_label(index);
            let stride = piece.stride(self.width);
            let mut idx = piece.position();
            for _ in 0..piece.size() {
                grid[idx] = label;
                idx += stride;
            }
        }
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                write!(f, "{}", grid[y * self.width + x])?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Board, ParseError> {
        let rows: Vec<&str> = s.trim().lines().map(str::trim).collect();
        if rows.len() == 1 {
            Board::from_str_line(rows[0])
        } else {
            Board::from_rows(&rows)
        }
    }
}

fn piece_label(index: usize) -> char {
    (b'A' + index as u8) as char
}

// cells is ascending; deduce the piece spanning them or reject the shape
fn piece_from_cells(label: char, cells: &[usize], width: usize) -> Result<Piece, ParseError> {
    if cells.len() < 2 {
        // defer to validation for the size error
        return Ok(Piece::new(cells[0], 1, Orientation::Horizontal));
    }
    let stride = cells[1] - cells[0];
    if stride != 1 && stride != width {
        return Err(ParseError::InvalidPieceShape(label));
    }
    for pair in cells.windows(2) {
        if pair[1] - pair[0] != stride {
            return Err(ParseError::InvalidPieceShape(label));
        }
    }
    let orientation = if stride == 1 {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    };
    Ok(Piece::new(cells[0], cells.len(), orientation))
}

fn offset(position: usize, stride: usize, steps: i32) -> usize {
    if steps < 0 {
        position - stride * steps.unsigned_abs() as usize
    } else {
        position + stride * steps as usize
    }
}

fn integer_sqrt(n: usize) -> usize {
    let mut s = (n as f64).sqrt() as usize;
    while s * s > n {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= n {
        s += 1;
    }
    s
}
