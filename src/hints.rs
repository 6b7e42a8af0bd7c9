//! Move discovery and simple move-selection strategies.
//!
//! These helpers look for swaps that would produce a match, so a front end
//! can show a hint and an automated player can pick its next move. Only the
//! first cascade pass is predictable (refills are random), so candidates are
//! ranked by the score of the matches the swap itself creates.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::grid::Grid;
use crate::matcher::Match;
use crate::swap;

/// A swap that creates at least one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SwapCandidate {
    pub a: usize,
    pub b: usize,
    /// Points the swap's own matches are worth, before any chain reaction.
    pub immediate_score: u32,
}

/// Lists every swap that would produce a match, in ascending `(a, b)` order.
///
/// With `adjacent_only`, only orthogonal neighbours are tried; otherwise
/// every unordered pair of cells is. The grid is left as it was found.
///
/// # Examples
/// ```
/// use match3_engine::hints::find_valid_swaps;
/// use match3_engine::utils::grid_from_rows;
///
/// let grid = grid_from_rows(&["1213", "3424", "1231", "4342"]).unwrap();
/// let swaps = find_valid_swaps(&grid, false);
/// assert!(swaps.iter().any(|s| s.a == 1 && s.b == 8));
/// ```
pub fn find_valid_swaps(grid: &Grid, adjacent_only: bool) -> Vec<SwapCandidate> {
    let mut scratch = grid.clone();
    let mut candidates = Vec::new();
    let n = grid.len();
    let size = grid.size();

    for a in 0..n {
        let partners: Vec<usize> = if adjacent_only {
            let mut p = Vec::with_capacity(2);
            if (a + 1) % size != 0 {
                p.push(a + 1);
            }
            if a + size < n {
                p.push(a + size);
            }
            p
        } else {
            (a + 1..n).collect()
        };

        for b in partners {
            let cells = scratch.cells();
            if cells[a].symbol == cells[b].symbol {
                continue; // swapping equal symbols changes nothing
            }
            if let Some(score) = try_swap(&mut scratch, a, b) {
                candidates.push(SwapCandidate {
                    a,
                    b,
                    immediate_score: score,
                });
            }
        }
    }

    candidates
}

/// Tries the swap the way a session would and undoes it. Returns the score
/// of the matches an accepted swap would clear first.
fn try_swap(grid: &mut Grid, a: usize, b: usize) -> Option<u32> {
    let matches = swap::apply(grid, a, b).ok()?;
    grid.swap(a, b).ok()?;
    Some(matches.iter().map(Match::score).sum())
}

/// Whether any swap on the board would produce a match.
pub fn has_valid_swap(grid: &Grid, adjacent_only: bool) -> bool {
    !find_valid_swaps(grid, adjacent_only).is_empty()
}

/// Chooses the swap with the highest immediate score.
///
/// Ties go to the candidate found first (lowest indices).
pub fn choose_swap_max_score(grid: &Grid, adjacent_only: bool) -> Option<SwapCandidate> {
    let mut best: Option<SwapCandidate> = None;
    for candidate in find_valid_swaps(grid, adjacent_only) {
        if best.map_or(true, |b| candidate.immediate_score > b.immediate_score) {
            best = Some(candidate);
        }
    }
    best
}

/// Chooses the first valid swap in scan order.
pub fn choose_swap_first(grid: &Grid, adjacent_only: bool) -> Option<SwapCandidate> {
    find_valid_swaps(grid, adjacent_only).into_iter().next()
}

/// Chooses a valid swap uniformly at random.
pub fn choose_swap_random(
    grid: &Grid,
    adjacent_only: bool,
    rng: &mut impl Rng,
) -> Option<SwapCandidate> {
    let candidates = find_valid_swaps(grid, adjacent_only);
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

/// A named move-selection strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    MaxScore,
    First,
    Random,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::MaxScore, Strategy::First, Strategy::Random];

    /// Picks a swap for `grid` according to this strategy.
    pub fn choose(
        self,
        grid: &Grid,
        adjacent_only: bool,
        rng: &mut impl Rng,
    ) -> Option<SwapCandidate> {
        match self {
            Strategy::MaxScore => choose_swap_max_score(grid, adjacent_only),
            Strategy::First => choose_swap_first(grid, adjacent_only),
            Strategy::Random => choose_swap_random(grid, adjacent_only, rng),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::MaxScore => "max-score",
            Strategy::First => "first",
            Strategy::Random => "random",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max-score" => Ok(Strategy::MaxScore),
            "first" => Ok(Strategy::First),
            "random" => Ok(Strategy::Random),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}
