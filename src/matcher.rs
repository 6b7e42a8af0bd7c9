//! Row and column run detection.
//!
//! A maximal run of `L >= 3` equal, non-cleared symbols produces `L - 2`
//! matches: one for every start position in the run that still has at least
//! three cells ahead of it, each reaching to the end of the run. A run of
//! four therefore yields a length-4 match and the inner length-3 match that
//! starts one cell later. Every match is scored on its own, so longer runs
//! pay out more than their single-window score.

use crate::grid::{Grid, Symbol};

/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;

/// Direction of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

/// A run of at least [`MIN_RUN`] equal symbols along one row or column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Match {
    /// Member cell indices, ascending.
    pub cells: Vec<usize>,
    pub symbol: Symbol,
    pub axis: Axis,
}

impl Match {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Points awarded for clearing this match: 300 for three cells plus 150
    /// per extra cell.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::matcher::{Axis, Match};
    /// let m = Match { cells: vec![0, 1, 2, 3], symbol: 2, axis: Axis::Row };
    /// assert_eq!(m.score(), 450);
    /// ```
    pub fn score(&self) -> u32 {
        match_score(self.len())
    }
}

/// Score for a single match of `len` cells.
pub fn match_score(len: usize) -> u32 {
    300 + 150 * len.saturating_sub(MIN_RUN) as u32
}

/// Scans every row, then every column, for matches.
///
/// Lines are visited top to bottom (rows) and left to right (columns); within
/// a line, matches come out in ascending index order.
///
/// # Arguments
/// * `grid`: The board to inspect. It is only read.
/// * `stop_at_first`: Return as soon as one match is found. Board generation
///   uses this as a cheap "is there anything?" test.
///
/// # Returns
/// Every match found, or at most one when `stop_at_first` is set. Empty if
/// the board is stable.
pub fn scan(grid: &Grid, stop_at_first: bool) -> Vec<Match> {
    let size = grid.size();
    let mut found = Vec::new();
    let mut line = Vec::with_capacity(size);

    for row in 0..size {
        line.clear();
        line.extend((0..size).map(|col| grid.to_index(row, col)));
        if scan_line(grid, &line, Axis::Row, stop_at_first, &mut found) {
            return found;
        }
    }

    for col in 0..size {
        line.clear();
        line.extend((0..size).map(|row| grid.to_index(row, col)));
        if scan_line(grid, &line, Axis::Column, stop_at_first, &mut found) {
            return found;
        }
    }

    found
}

/// Whether the board contains at least one match.
pub fn has_match(grid: &Grid) -> bool {
    !scan(grid, true).is_empty()
}

/// Collects the matches along one line of cell indices into `found`.
///
/// Returns `true` when the caller should stop scanning.
fn scan_line(
    grid: &Grid,
    line: &[usize],
    axis: Axis,
    stop_at_first: bool,
    found: &mut Vec<Match>,
) -> bool {
    let cells = grid.cells();
    let mut start = 0;

    while start < line.len() {
        let first = &cells[line[start]];
        let mut end = start + 1;
        if !first.cleared {
            while end < line.len() {
                let next = &cells[line[end]];
                if next.cleared || next.symbol != first.symbol {
                    break;
                }
                end += 1;
            }
        }

        if !first.cleared && end - start >= MIN_RUN {
            for window_start in start..=end - MIN_RUN {
                found.push(Match {
                    cells: line[window_start..end].to_vec(),
                    symbol: first.symbol,
                    axis,
                });
                if stop_at_first {
                    return true;
                }
            }
        }
        start = end;
    }

    false
}
