//! Board storage for the match engine.
//!
//! The grid is an arena of [`Cell`] slots addressed by a stable index.
//! Swapping and compacting move the *contents* of slots around; the slot
//! identity never changes, and every cell's `index` is re-stamped so it
//! always equals its slot position.

use std::fmt;

use crate::error::EngineError;

/// A symbol type. Valid symbols are in `1..=num_types`.
pub type Symbol = u8;

/// One grid slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Position of this cell in the grid, `row * size + col`.
    pub index: usize,
    /// The symbol type held by the cell.
    pub symbol: Symbol,
    /// Set while the cell is matched and waiting for the next compaction.
    pub cleared: bool,
}

/// A (row, column) position. Row 0 is the top of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

/// The square game board.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid whose symbols are produced by `f(index)`, in index order.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::grid::Grid;
    /// let grid = Grid::from_fn(3, |i| (i % 3 + 1) as u8);
    /// assert_eq!(grid.get(4).unwrap().symbol, 2);
    /// ```
    pub fn from_fn(size: usize, mut f: impl FnMut(usize) -> Symbol) -> Self {
        let cells = (0..size * size)
            .map(|index| Cell {
                index,
                symbol: f(index),
                cleared: false,
            })
            .collect();
        Grid { size, cells }
    }

    /// Creates a grid from a row-major list of symbols.
    ///
    /// # Returns
    /// `Err(EngineError::GridShape)` if `symbols.len() != size * size`.
    pub fn from_symbols(size: usize, symbols: &[Symbol]) -> Result<Self, EngineError> {
        if symbols.len() != size * size {
            return Err(EngineError::GridShape {
                expected: size * size,
                found: symbols.len(),
            });
        }
        Ok(Grid::from_fn(size, |i| symbols[i]))
    }

    /// Edge length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells, `size * size`.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in index order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn check(&self, index: usize) -> Result<(), EngineError> {
        if index < self.cells.len() {
            Ok(())
        } else {
            Err(EngineError::OutOfRange {
                index,
                len: self.cells.len(),
            })
        }
    }

    /// Returns the cell at `index`.
    ///
    /// # Returns
    /// `Err(EngineError::OutOfRange)` if `index` is not in `[0, size²)`.
    pub fn get(&self, index: usize) -> Result<Cell, EngineError> {
        self.check(index)?;
        Ok(self.cells[index])
    }

    /// Places `symbol` at `index` and marks the cell live again.
    pub fn set(&mut self, index: usize, symbol: Symbol) -> Result<(), EngineError> {
        self.check(index)?;
        self.respawn(index, symbol);
        Ok(())
    }

    /// Marks the cell at `index` as cleared. Nothing moves until the column
    /// is compacted.
    pub fn clear(&mut self, index: usize) -> Result<(), EngineError> {
        self.check(index)?;
        self.mark_cleared(index);
        Ok(())
    }

    /// Marks a cell produced by a scan of this grid as cleared.
    ///
    /// Panics if `index` is off the board.
    pub(crate) fn mark_cleared(&mut self, index: usize) {
        self.cells[index].cleared = true;
    }

    /// Puts a freshly spawned `symbol` into a vacated slot.
    ///
    /// Panics if `index` is off the board.
    pub(crate) fn respawn(&mut self, index: usize, symbol: Symbol) {
        let cell = &mut self.cells[index];
        cell.symbol = symbol;
        cell.cleared = false;
    }

    /// Exchanges the contents of two slots and re-stamps their indices.
    ///
    /// Swapping the same pair twice restores the grid exactly.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<(), EngineError> {
        self.check(i)?;
        self.check(j)?;
        self.cells.swap(i, j);
        self.cells[i].index = i;
        self.cells[j].index = j;
        Ok(())
    }

    /// Converts an index into its (row, column) position.
    pub fn to_coord(&self, index: usize) -> Coord {
        Coord {
            row: index / self.size,
            col: index % self.size,
        }
    }

    /// Converts a (row, column) position into an index.
    pub fn to_index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Whether `a` and `b` are horizontal or vertical neighbours.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        let (ca, cb) = (self.to_coord(a), self.to_coord(b));
        (ca.row == cb.row && ca.col.abs_diff(cb.col) == 1)
            || (ca.col == cb.col && ca.row.abs_diff(cb.row) == 1)
    }

    /// Row-major snapshot of every symbol.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.cells.iter().map(|c| c.symbol).collect()
    }

    /// Indices of all cells currently marked cleared, ascending.
    pub fn cleared_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .filter(|c| c.cleared)
            .map(|c| c.index)
            .collect()
    }

    /// Lets live cells in `col` fall onto the cleared ones below them.
    ///
    /// Live cells keep their relative vertical order. Cleared cells end up
    /// stacked at the top of the column.
    ///
    /// Every cell that moved is recorded in `falls` as `(from, to)`.
    ///
    /// # Returns
    /// The number of cleared (vacated) slots now at the top of the column.
    pub(crate) fn compact_column(&mut self, col: usize, falls: &mut Vec<(usize, usize)>) -> usize {
        let mut write_row = self.size; // one past the lowest free row
        for row in (0..self.size).rev() {
            let idx = self.to_index(row, col);
            if self.cells[idx].cleared {
                continue;
            }
            write_row -= 1;
            if write_row != row {
                let target = self.to_index(write_row, col);
                self.cells.swap(idx, target);
                self.cells[idx].index = idx;
                self.cells[target].index = target;
                falls.push((idx, target));
            }
        }
        write_row
    }
}

impl fmt::Display for Grid {
    /// One line per row, one digit per cell, `.` for cleared cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                let cell = &self.cells[self.to_index(row, col)];
                if cell.cleared {
                    write!(f, ".")?;
                } else {
                    write!(f, "{}", cell.symbol)?;
                }
            }
            if row + 1 < self.size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_rows;

    #[test]
    fn test_from_fn_stamps_indices() {
        let grid = Grid::from_fn(4, |i| (i % 4 + 1) as Symbol);
        assert_eq!(grid.len(), 16);
        for (i, cell) in grid.cells().iter().enumerate() {
            assert_eq!(cell.index, i);
            assert!(!cell.cleared);
        }
    }

    #[test]
    fn test_from_symbols_wrong_length() {
        let err = Grid::from_symbols(3, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            EngineError::GridShape {
                expected: 9,
                found: 3
            }
        );
    }

    #[test]
    fn test_accessors_out_of_range() {
        let mut grid = Grid::from_fn(3, |_| 1);
        assert_eq!(
            grid.get(9),
            Err(EngineError::OutOfRange { index: 9, len: 9 })
        );
        assert!(grid.set(9, 2).is_err());
        assert!(grid.clear(100).is_err());
        assert!(grid.swap(0, 9).is_err());
        // A failed swap leaves the grid alone.
        assert_eq!(grid, Grid::from_fn(3, |_| 1));
    }

    #[test]
    fn test_coordinate_conversion() {
        let grid = Grid::from_fn(6, |_| 1);
        assert_eq!(grid.to_coord(0), Coord { row: 0, col: 0 });
        assert_eq!(grid.to_coord(7), Coord { row: 1, col: 1 });
        assert_eq!(grid.to_coord(35), Coord { row: 5, col: 5 });
        for i in 0..36 {
            let c = grid.to_coord(i);
            assert_eq!(grid.to_index(c.row, c.col), i);
        }
    }

    #[test]
    fn test_adjacency() {
        let grid = Grid::from_fn(6, |_| 1);
        assert!(grid.is_adjacent(0, 1));
        assert!(grid.is_adjacent(0, 6));
        assert!(grid.is_adjacent(7, 1));
        assert!(!grid.is_adjacent(0, 7)); // diagonal
        assert!(!grid.is_adjacent(5, 6)); // end of row 0, start of row 1
        assert!(!grid.is_adjacent(0, 2));
        assert!(!grid.is_adjacent(3, 3));
    }

    #[test]
    fn test_swap_twice_restores_grid() {
        let mut grid = grid_from_rows(&["123", "456", "789"]).unwrap();
        let before = grid.clone();
        grid.clear(4).unwrap();
        let with_clear = grid.clone();

        grid.swap(4, 8).unwrap();
        assert_eq!(grid.get(8).unwrap().symbol, 5);
        assert!(grid.get(8).unwrap().cleared);
        assert_eq!(grid.get(8).unwrap().index, 8);
        assert_eq!(grid.get(4).unwrap().symbol, 9);
        assert_eq!(grid.get(4).unwrap().index, 4);

        grid.swap(4, 8).unwrap();
        assert_eq!(grid, with_clear);
        grid.set(4, 5).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_compact_column_preserves_order() {
        let mut grid = grid_from_rows(&["1234", "2341", "3412", "4123"]).unwrap();
        // Column 0 holds 1,2,3,4 top to bottom; clear rows 1 and 3.
        grid.clear(4).unwrap();
        grid.clear(12).unwrap();

        let mut falls = Vec::new();
        let vacated = grid.compact_column(0, &mut falls);

        assert_eq!(vacated, 2);
        assert_eq!(falls, vec![(8, 12), (0, 8)]);
        assert!(grid.get(0).unwrap().cleared);
        assert!(grid.get(4).unwrap().cleared);
        assert_eq!(grid.get(8).unwrap().symbol, 1);
        assert_eq!(grid.get(12).unwrap().symbol, 3);
        assert!(!grid.get(12).unwrap().cleared);
        for (i, cell) in grid.cells().iter().enumerate() {
            assert_eq!(cell.index, i);
        }
        // Other columns untouched.
        assert_eq!(grid.get(1).unwrap().symbol, 2);
    }

    #[test]
    fn test_compact_column_without_clears() {
        let mut grid = grid_from_rows(&["123", "231", "312"]).unwrap();
        let before = grid.clone();
        let mut falls = Vec::new();
        assert_eq!(grid.compact_column(1, &mut falls), 0);
        assert!(falls.is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_mark_cleared_then_respawn() {
        let mut grid = grid_from_rows(&["123", "456", "789"]).unwrap();
        grid.mark_cleared(5);
        assert_eq!(grid.cleared_indices(), vec![5]);
        grid.respawn(5, 2);
        assert!(grid.cleared_indices().is_empty());
        assert_eq!(grid.get(5).unwrap().symbol, 2);
        assert_eq!(grid.get(5).unwrap().index, 5);
    }

    #[test]
    #[should_panic]
    fn test_mark_cleared_off_board_panics() {
        let mut grid = grid_from_rows(&["123", "456", "789"]).unwrap();
        grid.mark_cleared(9);
    }

    #[test]
    fn test_display() {
        let mut grid = grid_from_rows(&["123", "456", "789"]).unwrap();
        grid.clear(4).unwrap();
        assert_eq!(grid.to_string(), "123\n4.6\n789");
        assert_eq!(grid.cleared_indices(), vec![4]);
        assert_eq!(grid.symbols(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }
}
