//! Static board analysis by constraint propagation
//!
//! The analyzer proves many boards unsolvable without running the search.
//! Consider one row in isolation:
//!
//! ```text
//! AAA.BB
//! ```
//!
//! There are only three possible layouts for these two pieces:
//!
//! ```text
//! AAABB.
//! AAA.BB
//! .AAABB
//! ```
//!
//! Three of the six cells are occupied in every one of them:
//!
//! ```text
//! .xx.x.
//! ```
//!
//! We call those cells "blocked". A cell blocked by a row's pieces can never
//! be vacated for a vertical piece to pass through, and vice versa, so
//! row-derived blocks constrain the placement intervals used by the column
//! pass and the other way around:
//!
//! ```text
//! ..xCC. => ....x.
//! ```
//!
//! Sweeping all rows and then all columns repeatedly until a full pass finds
//! nothing new reaches a fixed point. If any cell between the primary piece
//! and its exit ends up blocked in either direction, the board cannot be
//! solved. The analysis is sound but incomplete: it never calls a solvable
//! board impossible, but some impossible boards pass it and are only caught
//! by exhaustive search.

use crate::board::Board;
use crate::piece::Orientation;

/// Constraint-propagation analyzer with reusable scratch buffers.
///
/// The buffers grow to the largest board analyzed and are then reused, so a
/// single long-lived analyzer performs many analyses without reallocating.
/// They are private mutable state: one analyzer serves one logical search
/// at a time.
#[derive(Debug, Clone, Default)]
pub struct StaticAnalyzer {
    // blocked-cell bitmaps; `horz` blocks horizontal movement (derived from
    // column pieces), `vert` blocks vertical movement (derived from row pieces)
    horz: Vec<bool>,
    vert: Vec<bool>,
    // per-line scratch, filled by the sweep before each line analysis
    positions: Vec<usize>,
    sizes: Vec<usize>,
    blocked: Vec<usize>,
    // cross-product scratch
    placements: Vec<Vec<usize>>,
    idx: Vec<usize>,
    counts: Vec<usize>,
    result: Vec<usize>,
}

impl StaticAnalyzer {
    /// A fresh analyzer. Buffers are sized on first use.
    pub fn new() -> StaticAnalyzer {
        StaticAnalyzer::default()
    }

    /// Whether the board is provably unsolvable: some cell between the
    /// primary piece and its exit is blocked in either direction.
    ///
    /// `false` means "not proven impossible", not "solvable".
    ///
    /// # Panics
    /// Panics if the board has no pieces.
    pub fn impossible(&mut self, board: &Board) -> bool {
        self.analyze(board);
        let width = board.width();
        let primary = board.pieces()[0];
        let start = primary.position() + primary.size();
        let end = (primary.row(width) + 1) * width;
        (start..end).any(|i| self.horz[i] || self.vert[i])
    }

    /// All cells blocked in either direction, in ascending cell order.
    pub fn blocked_cells(&mut self, board: &Board) -> Vec<usize> {
        self.analyze(board);
        (0..board.width() * board.height())
            .filter(|&i| self.horz[i] || self.vert[i])
            .collect()
    }

    fn analyze(&mut self, board: &Board) {
        let cells = board.width() * board.height();
        self.horz.clear();
        self.horz.resize(cells, false);
        self.vert.clear();
        self.vert.resize(cells, false);
        // walls can never be vacated, in either direction
        for &i in board.walls() {
            self.horz[i] = true;
            self.vert[i] = true;
        }
        while self.sweep(board) {}
    }

    // One full pass over all rows and all columns. Returns true if any new
    // blocked cell was found.
    fn sweep(&mut self, board: &Board) -> bool {
        let mut changed = false;
        let width = board.width();
        let height = board.height();

        for y in 0..height {
            self.positions.clear();
            self.sizes.clear();
            for piece in board.pieces() {
                if piece.orientation() == Orientation::Horizontal && piece.row(width) == y {
                    self.positions.push(piece.col(width));
                    self.sizes.push(piece.size());
                }
            }
            if self.positions.is_empty() {
                continue;
            }
            let row_start = y * width;
            self.blocked.clear();
            for x in 0..width {
                if self.horz[row_start + x] {
                    self.blocked.push(x);
                }
            }
            let found = self.blocked_in_line(width);
            for k in 0..found {
                let i = row_start + self.result[k];
                if !self.vert[i] {
                    self.vert[i] = true;
                    changed = true;
                }
            }
        }

        for x in 0..width {
            self.positions.clear();
            self.sizes.clear();
            for piece in board.pieces() {
                if piece.orientation() == Orientation::Vertical && piece.col(width) == x {
                    self.positions.push(piece.row(width));
                    self.sizes.push(piece.size());
                }
            }
            if self.positions.is_empty() {
                continue;
            }
            self.blocked.clear();
            for y in 0..height {
                if self.vert[x + y * width] {
                    self.blocked.push(y);
                }
            }
            let found = self.blocked_in_line(height);
            for k in 0..found {
                let i = self.result[k] * width + x;
                if !self.horz[i] {
                    self.horz[i] = true;
                    changed = true;
                }
            }
        }

        changed
    }

    // Analyzes one line of `n_cells` cells. Inputs are the scratch fields:
    // `positions`/`sizes` hold the line's pieces, `blocked` the cells already
    // blocked from the perpendicular direction. Writes the line-local indices
    // of cells occupied in every legal joint placement to `result` and
    // returns how many there are.
    fn blocked_in_line(&mut self, n_cells: usize) -> usize {
        let n = self.positions.len();

        // sort the line's pieces by position, keeping sizes in step
        for i in 1..n {
            let mut j = i;
            while j > 0 && self.positions[j] < self.positions[j - 1] {
                self.positions.swap(j, j - 1);
                self.sizes.swap(j, j - 1);
                j -= 1;
            }
        }

        // feasible placement interval per piece: the full line, narrowed on
        // each side by the nearest perpendicular block
        if self.placements.len() < n {
            self.placements.resize_with(n, Vec::new);
        }
        for i in 0..n {
            let p = self.positions[i];
            let s = self.sizes[i];
            let mut x0 = 0_isize;
            let mut x1 = n_cells as isize - s as isize;
            for &b in &self.blocked {
                if b < p {
                    x0 = x0.max(b as isize + 1);
                }
                if b > p {
                    x1 = x1.min(b as isize - s as isize);
                }
            }
            let placements = &mut self.placements[i];
            placements.clear();
            let mut x = x0;
            while x <= x1 {
                placements.push(x as usize);
                x += 1;
            }
        }

        // no piece of a valid board loses its own current position, so an
        // empty interval means the line is already contradictory and every
        // cell is vacuously "occupied in every placement"
        if self.placements[..n].iter().any(Vec::is_empty) {
            self.result.clear();
            self.result.extend(0..n_cells);
            return n_cells;
        }

        // enumerate every non-overlapping joint placement (a bounded cross
        // product over the per-piece intervals) and count, per cell, in how
        // many of them it is covered
        self.counts.clear();
        self.counts.resize(n_cells, 0);
        self.idx.clear();
        self.idx.resize(n, 0);
        let mut count = 0_usize;
        loop {
            let mut ok = true;
            for i in 1..n {
                let j = i - 1;
                if self.placements[i][self.idx[i]]
                    < self.placements[j][self.idx[j]] + self.sizes[j]
                {
                    ok = false;
                    break;
                }
            }
            if ok {
                count += 1;
                for i in 0..n {
                    let p = self.placements[i][self.idx[i]];
                    for c in &mut self.counts[p..p + self.sizes[i]] {
                        *c += 1;
                    }
                }
            }
            // next lexicographic index vector
            let mut i = n;
            while i > 0 && self.idx[i - 1] == self.placements[i - 1].len() - 1 {
                self.idx[i - 1] = 0;
                i -= 1;
            }
            if i == 0 {
                break;
            }
            self.idx[i - 1] += 1;
        }

        // blocked iff covered in literally every placement
        self.result.clear();
        for (i, &c) in self.counts.iter().enumerate() {
            if c == count {
                self.result.push(i);
            }
        }
        self.result.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocked_line(
        n_cells: usize,
        positions: &[usize],
        sizes: &[usize],
        blocked: &[usize],
    ) -> Vec<usize> {
        let mut sa = StaticAnalyzer::new();
        sa.positions.extend_from_slice(positions);
        sa.sizes.extend_from_slice(sizes);
        sa.blocked.extend_from_slice(blocked);
        let found = sa.blocked_in_line(n_cells);
        sa.result[..found].to_vec()
    }

    #[test]
    fn line_analysis() {
        // ..xAA. => ....x.
        assert_eq!(blocked_line(6, &[3], &[2], &[2]), [4]);
        // AAA.BB => .xx.x.
        assert_eq!(blocked_line(6, &[0, 4], &[3, 2], &[]), [1, 2, 4]);
        // AA..BB => ......
        assert_eq!(blocked_line(6, &[0, 4], &[2, 2], &[]), [0_usize; 0]);
        // .x.AA. => ......
        assert_eq!(blocked_line(6, &[3], &[2], &[1]), [0_usize; 0]);
        // .xAA..BBx.. => ...........
        assert_eq!(blocked_line(11, &[2, 6], &[2, 2], &[1, 8]), [0_usize; 0]);
        // .xAAA.BBx.. => ...xx.x....
        assert_eq!(blocked_line(11, &[2, 6], &[3, 2], &[1, 8]), [3, 4, 6]);
    }

    #[test]
    fn line_analysis_unsorted_input() {
        // same as AAA.BB but with the pieces listed out of order
        assert_eq!(blocked_line(6, &[4, 0], &[2, 3], &[]), [1, 2, 4]);
    }

    #[test]
    fn wall_in_front_of_primary_is_impossible() {
        let board: Board = "......\n......\nAA.x..\n......\n......\n......"
            .parse()
            .unwrap();
        assert!(StaticAnalyzer::new().impossible(&board));
    }

    #[test]
    fn pinned_column_is_impossible() {
        // B and C jointly fill their column in every arrangement,
        // blocking the primary's path
        let board: Board = "...B..\n...B..\nAA.B..\n...C..\n...C..\n...C.."
            .parse()
            .unwrap();
        let mut sa = StaticAnalyzer::new();
        assert!(sa.impossible(&board));
        let blocked = sa.blocked_cells(&board);
        // the whole of column 3 is blocked
        for y in 0..6 {
            assert!(blocked.contains(&(y * 6 + 3)));
        }
    }

    #[test]
    fn open_board_is_not_proven_impossible() {
        let board: Board = "......\n..B...\nAAB...\n..C...\n..C...\n......"
            .parse()
            .unwrap();
        assert!(!StaticAnalyzer::new().impossible(&board));
    }
}
