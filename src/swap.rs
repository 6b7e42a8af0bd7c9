//! Swap validation and application.
//!
//! A swap is refused before touching the board when the session is not
//! idle, both indices name the same cell, an index is off the board, or
//! adjacency-only mode forbids the pair. A swap that passes those checks is
//! applied and kept only if it creates a match through one of the swapped
//! cells; otherwise it is swapped back and refused. Refusals never cost a move.

use std::fmt;

use crate::grid::Grid;
use crate::matcher::{self, Match};
use crate::state::Phase;

/// Why a swap request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The session is resolving or already finished.
    PhaseLocked(Phase),
    /// Both indices name the same cell.
    SameCell,
    /// An index is not on the board.
    OutOfRange(usize),
    /// Adjacency-only mode and the cells are not orthogonal neighbours.
    NotAdjacent,
    /// The swap was applied but produced no match, and was reverted.
    NoMatch,
}

impl Rejection {
    /// `true` for malformed requests (same cell, off-board, not adjacent).
    pub fn is_invalid_swap(self) -> bool {
        matches!(
            self,
            Rejection::SameCell | Rejection::OutOfRange(_) | Rejection::NotAdjacent
        )
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::PhaseLocked(phase) => write!(f, "session is {:?}", phase),
            Rejection::SameCell => write!(f, "cannot swap a cell with itself"),
            Rejection::OutOfRange(index) => write!(f, "index {} is off the board", index),
            Rejection::NotAdjacent => write!(f, "cells are not adjacent"),
            Rejection::NoMatch => write!(f, "swap does not create a match"),
        }
    }
}

/// Checks a request without touching the board.
pub fn validate(
    grid: &Grid,
    phase: Phase,
    a: usize,
    b: usize,
    adjacent_only: bool,
) -> Result<(), Rejection> {
    if phase != Phase::Idle {
        return Err(Rejection::PhaseLocked(phase));
    }
    if a == b {
        return Err(Rejection::SameCell);
    }
    if let Some(&bad) = [a, b].iter().find(|&&i| i >= grid.len()) {
        return Err(Rejection::OutOfRange(bad));
    }
    if adjacent_only && !grid.is_adjacent(a, b) {
        return Err(Rejection::NotAdjacent);
    }
    Ok(())
}

/// Applies a validated swap and reports the matches on the board.
///
/// The swap counts only if one of the matches contains `a` or `b`. A run
/// left behind by an abandoned cascade does not make an unrelated swap
/// legal, but it is cleared along with the swap's own matches.
///
/// # Returns
/// * `Ok(matches)` with at least one match through a swapped cell; the swap
///   stays applied.
/// * `Err(Rejection::NoMatch)` if no match touches a swapped cell; the grid
///   is restored cell for cell.
/// * `Err(Rejection::OutOfRange)` if an index is off the board; the grid is
///   untouched.
pub fn apply(grid: &mut Grid, a: usize, b: usize) -> Result<Vec<Match>, Rejection> {
    grid.swap(a, b)
        .map_err(|_| Rejection::OutOfRange(a.max(b)))?;

    let matches = matcher::scan(grid, false);
    let created = matches
        .iter()
        .any(|m| m.cells.contains(&a) || m.cells.contains(&b));
    if !created {
        // Swapping the same pair again is the exact inverse.
        grid.swap(a, b).map_err(|_| Rejection::OutOfRange(a.max(b)))?;
        return Err(Rejection::NoMatch);
    }
    Ok(matches)
}
