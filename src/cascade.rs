//! The clear -> compact -> refill -> re-scan loop, and board generation.
//!
//! Each pass of the loop is returned as one [`CascadeStep`]. Callers only
//! ever see settled boards between steps; the half-compacted board inside a
//! pass is never exposed.

use tracing::{debug, warn};

use crate::grid::{Grid, Symbol};
use crate::matcher::{self, Match};
use crate::source::SymbolSource;
use crate::state::SessionState;

/// Upper bound on passes per cascade. Only a degenerate symbol source could
/// get near it.
pub const MAX_CASCADE_STEPS: usize = 50;

/// Full-board regeneration attempts before switching to cell-by-cell filling.
pub const MAX_GENERATION_ATTEMPTS: usize = 1000;

/// A cell that fell during compaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fall {
    pub from: usize,
    pub to: usize,
}

/// A freshly spawned cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Refill {
    pub index: usize,
    pub symbol: Symbol,
}

/// One settled pass of a cascade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CascadeStep {
    /// The matches scored in this pass, in scan order.
    pub matches: Vec<Match>,
    /// Distinct indices cleared by those matches, ascending.
    pub cleared: Vec<usize>,
    /// Live cells that dropped to fill the gaps.
    pub falls: Vec<Fall>,
    /// New cells spawned into the vacated top slots.
    pub refilled: Vec<Refill>,
    /// Sum of the scores of `matches`.
    pub score_delta: u32,
    /// Combo counter in force while this pass was scored: 0 for the
    /// player's own match, 1..=5 for chain reactions.
    pub combo: u32,
}

/// Marks every member of `matches` as cleared.
///
/// # Returns
/// The distinct cleared indices (ascending) and the points earned. Each
/// match scores on its own, even when it overlaps another one.
pub fn clear_matches(grid: &mut Grid, matches: &[Match]) -> (Vec<usize>, u32) {
    let mut score = 0;
    for m in matches {
        score += m.score();
        for &index in &m.cells {
            grid.mark_cleared(index);
        }
    }
    (grid.cleared_indices(), score)
}

/// Applies gravity to every column and refills the vacated slots.
///
/// Columns are handled left to right. Within a column, new symbols are
/// spawned from the lowest vacated slot upward.
pub fn collapse_and_refill(
    grid: &mut Grid,
    num_types: Symbol,
    source: &mut impl SymbolSource,
) -> (Vec<Fall>, Vec<Refill>) {
    let mut moved = Vec::new();
    let mut refilled = Vec::new();

    for col in 0..grid.size() {
        let vacated = grid.compact_column(col, &mut moved);
        for row in (0..vacated).rev() {
            let index = grid.to_index(row, col);
            let symbol = source.next_symbol(num_types);
            grid.respawn(index, symbol);
            refilled.push(Refill { index, symbol });
        }
    }

    let falls = moved.into_iter().map(|(from, to)| Fall { from, to }).collect();
    (falls, refilled)
}

/// Runs one pass: clear `matches`, compact, refill.
pub fn resolve_step(
    grid: &mut Grid,
    matches: Vec<Match>,
    combo: u32,
    num_types: Symbol,
    source: &mut impl SymbolSource,
) -> CascadeStep {
    let (cleared, score_delta) = clear_matches(grid, &matches);
    let (falls, refilled) = collapse_and_refill(grid, num_types, source);
    CascadeStep {
        matches,
        cleared,
        falls,
        refilled,
        score_delta,
        combo,
    }
}

/// Drives the cascade started by `initial` to a board with no matches.
///
/// Score and combo are accumulated into `state`; the phase is left for the
/// caller to settle.
///
/// # Returns
/// Every pass, in order. The first one holds the player's own match.
pub fn run_cascade(
    grid: &mut Grid,
    state: &mut SessionState,
    initial: Vec<Match>,
    num_types: Symbol,
    source: &mut impl SymbolSource,
) -> Vec<CascadeStep> {
    let mut steps = Vec::new();
    let mut matches = initial;

    while !matches.is_empty() {
        if steps.len() == MAX_CASCADE_STEPS {
            warn!(
                steps = steps.len(),
                "cascade did not settle, abandoning remaining matches"
            );
            break;
        }

        let step = resolve_step(grid, matches, state.combo(), num_types, source);
        state.add_score(step.score_delta);
        debug!(
            step = steps.len(),
            matches = step.matches.len(),
            cleared = step.cleared.len(),
            score_delta = step.score_delta,
            combo = step.combo,
            "cascade step"
        );
        steps.push(step);

        matches = matcher::scan(grid, false);
        if !matches.is_empty() {
            state.bump_combo();
        }
    }

    steps
}

/// Builds a `size` x `size` board with no matches.
///
/// The whole board is drawn from `source` and thrown away while it contains
/// a match. After [`MAX_GENERATION_ATTEMPTS`] rejected boards, cells are
/// drawn one at a time instead, redrawing any symbol that would complete a
/// run with the two cells to its left or above.
pub fn generate_board(size: usize, num_types: Symbol, source: &mut impl SymbolSource) -> Grid {
    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let grid = Grid::from_fn(size, |_| source.next_symbol(num_types));
        if !matcher::has_match(&grid) {
            debug!(attempt, "generated board");
            return grid;
        }
    }

    debug!("falling back to cell-by-cell board generation");
    let mut symbols: Vec<Symbol> = Vec::with_capacity(size * size);
    for index in 0..size * size {
        let (row, col) = (index / size, index % size);
        loop {
            let candidate = source.next_symbol(num_types);
            let row_run = col >= 2
                && symbols[index - 1] == candidate
                && symbols[index - 2] == candidate;
            let col_run = row >= 2
                && symbols[index - size] == candidate
                && symbols[index - 2 * size] == candidate;
            if !row_run && !col_run {
                symbols.push(candidate);
                break;
            }
        }
    }
    Grid::from_fn(size, |i| symbols[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{RandomSource, ScriptedSource};
    use crate::utils::grid_from_rows;

    #[test]
    fn test_clear_matches_scores_each_window() {
        let mut grid = grid_from_rows(&["21111", "34523", "45234", "52345", "23452"]).unwrap();
        let matches = matcher::scan(&grid, false);
        let (cleared, score) = clear_matches(&mut grid, &matches);
        assert_eq!(cleared, vec![1, 2, 3, 4]);
        assert_eq!(score, 450 + 300);
    }

    #[test]
    fn test_collapse_and_refill_drops_cells() {
        // Column 1 reads 1,2,3 top to bottom; clear the bottom cell.
        let mut grid = grid_from_rows(&["312", "123", "231"]).unwrap();
        grid.clear(7).unwrap();
        let mut source = ScriptedSource::new([4]);

        let (falls, refilled) = collapse_and_refill(&mut grid, 4, &mut source);

        assert_eq!(falls, vec![Fall { from: 4, to: 7 }, Fall { from: 1, to: 4 }]);
        assert_eq!(refilled, vec![Refill { index: 1, symbol: 4 }]);
        assert_eq!(grid.to_string(), "342\n113\n221");
        assert!(grid.cleared_indices().is_empty());
    }

    #[test]
    fn test_refill_order_bottom_up_left_to_right() {
        let mut grid = grid_from_rows(&["123", "231", "312"]).unwrap();
        for i in [0, 3, 2] {
            grid.clear(i).unwrap();
        }
        let mut source = ScriptedSource::new([4, 5, 6]);

        let (_, refilled) = collapse_and_refill(&mut grid, 6, &mut source);

        assert_eq!(
            refilled,
            vec![
                Refill { index: 3, symbol: 4 },
                Refill { index: 0, symbol: 5 },
                Refill { index: 2, symbol: 6 },
            ]
        );
    }

    #[test]
    fn test_run_cascade_single_step() {
        let mut grid = grid_from_rows(&["1113", "2341", "3412", "4123"]).unwrap();
        let mut state = SessionState::new(5);
        let initial = matcher::scan(&grid, false);
        // Refill row 0 with symbols that cannot match anything.
        let mut source = ScriptedSource::new([2, 4, 3]);

        let steps = run_cascade(&mut grid, &mut state, initial, 4, &mut source);

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].cleared, vec![0, 1, 2]);
        assert_eq!(steps[0].score_delta, 300);
        assert_eq!(steps[0].combo, 0);
        assert_eq!(state.score(), 300);
        assert_eq!(grid.to_string(), "2433\n2341\n3412\n4123");
        assert!(!matcher::has_match(&grid));
    }

    #[test]
    fn test_run_cascade_chain_reaction_bumps_combo() {
        // Clearing row 0 cols 0..3 and refilling col 0 with a 2 stacks
        // 2,2,2 in column 0, which clears on the second pass.
        let mut grid = grid_from_rows(&["1113", "2341", "2412", "4123"]).unwrap();
        let mut state = SessionState::new(5);
        let initial = matcher::scan(&grid, false);
        let mut source = ScriptedSource::new([2, 4, 3, 3, 1, 4]);

        let steps = run_cascade(&mut grid, &mut state, initial, 4, &mut source);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].combo, 0);
        assert_eq!(steps[1].combo, 1);
        assert_eq!(steps[1].cleared, vec![0, 4, 8]);
        assert_eq!(state.score(), 600);
        assert_eq!(state.combo(), 1);
        assert!(!matcher::has_match(&grid));
    }

    #[test]
    fn test_cascade_terminates_on_random_boards() {
        for seed in 0..50 {
            let mut source = RandomSource::with_seed(seed);
            let mut grid = generate_board(6, 6, &mut source);
            let mut state = SessionState::new(20);
            // Force a match into row 0 and resolve it.
            for i in 0..3 {
                grid.set(i, 1).unwrap();
            }
            let initial = matcher::scan(&grid, false);
            assert!(!initial.is_empty());
            let steps = run_cascade(&mut grid, &mut state, initial, 6, &mut source);
            assert!(steps.len() <= MAX_CASCADE_STEPS);
            assert!(!matcher::has_match(&grid), "seed {} did not settle", seed);
            let total: u32 = steps.iter().map(|s| s.score_delta).sum();
            assert_eq!(state.score(), total);
        }
    }

    #[test]
    fn test_cascade_step_ceiling() {
        // A source that only ever produces 1s keeps rebuilding matches.
        struct Ones;
        impl SymbolSource for Ones {
            fn next_symbol(&mut self, _num_types: Symbol) -> Symbol {
                1
            }
        }
        let mut grid = Grid::from_fn(4, |_| 1);
        let mut state = SessionState::new(1);
        let initial = matcher::scan(&grid, false);
        let steps = run_cascade(&mut grid, &mut state, initial, 3, &mut Ones);
        assert_eq!(steps.len(), MAX_CASCADE_STEPS);
    }

    #[test]
    fn test_generate_board_has_no_matches() {
        for seed in 0..100 {
            let mut source = RandomSource::with_seed(seed);
            let grid = generate_board(6, 6, &mut source);
            assert_eq!(grid.len(), 36);
            assert!(matcher::scan(&grid, false).is_empty());
            assert!(grid.cells().iter().all(|c| (1..=6).contains(&c.symbol)));
        }
    }

    #[test]
    fn test_generate_board_falls_back_for_dense_boards() {
        // Nine columns with three types almost never comes out clean in one go.
        let mut source = RandomSource::with_seed(11);
        let grid = generate_board(9, 3, &mut source);
        assert!(!matcher::has_match(&grid));
    }
}
