use crate::config::MAX_TYPES;
use crate::error::EngineError;
use crate::grid::{Grid, Symbol};

/// Parses an array of string slices into a square `Grid`.
///
/// Each string slice represents a row, starting from row 0 at the top. Each
/// character is one cell and must be a digit in `1..=9`. The board is
/// square, so every row must be as long as the number of rows.
///
/// # Returns
/// * `Ok(Grid)` if parsing is successful.
/// * `Err(EngineError::Parse)` if the input is empty, a row has the wrong
///   length, or a character is not a symbol digit.
///
/// # Examples
/// ```
/// use match3_engine::utils::grid_from_rows;
///
/// let grid = grid_from_rows(&["123", "231", "312"]).unwrap();
/// assert_eq!(grid.size(), 3);
/// assert_eq!(grid.get(4).unwrap().symbol, 3);
///
/// assert!(grid_from_rows(&["12", "3x"]).is_err());
/// assert!(grid_from_rows(&["123", "12"]).is_err());
/// ```
pub fn grid_from_rows(rows: &[&str]) -> Result<Grid, EngineError> {
    let size = rows.len();
    if size == 0 {
        return Err(EngineError::Parse("board has no rows".into()));
    }

    let mut symbols: Vec<Symbol> = Vec::with_capacity(size * size);
    for (r, row_str) in rows.iter().enumerate() {
        let count = row_str.chars().count();
        if count != size {
            return Err(EngineError::Parse(format!(
                "row {} has {} cells, expected {}",
                r, count, size
            )));
        }
        for (c, ch) in row_str.chars().enumerate() {
            let symbol = ch
                .to_digit(10)
                .filter(|d| (1..=MAX_TYPES as u32).contains(d))
                .ok_or_else(|| {
                    EngineError::Parse(format!(
                        "unrecognized character '{}' in row {} col {}",
                        ch, r, c
                    ))
                })?;
            symbols.push(symbol as Symbol);
        }
    }
    Grid::from_symbols(size, &symbols)
}

/// Parses a board from text, one row per line.
///
/// Blank lines and surrounding whitespace are ignored, so files written by
/// hand (or by `Grid`'s `Display`) load directly.
pub fn grid_from_text(text: &str) -> Result<Grid, EngineError> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    grid_from_rows(&rows)
}
