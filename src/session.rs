//! The game session: one board, its counters, and the swap entry point.
//!
//! A [`Session`] owns its [`Grid`] and [`SessionState`] exclusively; every
//! mutation goes through [`Session::request_swap`] or [`Session::restart`].
//! `request_swap` resolves the whole cascade before returning, so between
//! calls the phase is always `Idle`, `Won` or `Lost`.
//!
//! # Examples
//! ```
//! use match3_engine::config::SessionConfig;
//! use match3_engine::session::Session;
//! use match3_engine::source::RandomSource;
//! use match3_engine::state::Phase;
//!
//! let mut session = Session::create(SessionConfig::default(), RandomSource::with_seed(7)).unwrap();
//! assert_eq!(session.state().phase(), Phase::Idle);
//!
//! // Same-cell swaps are refused and cost nothing.
//! let outcome = session.request_swap(3, 3);
//! assert!(!outcome.accepted);
//! assert_eq!(outcome.moves_remaining, 20);
//! ```

use tracing::{debug, info, instrument};

use crate::cascade::{self, CascadeStep};
use crate::config::SessionConfig;
use crate::error::EngineError;
use crate::grid::{Cell, Grid};
use crate::hints;
use crate::matcher::{self, Match};
use crate::source::{RandomSource, SymbolSource};
use crate::state::{Phase, SessionState};
use crate::swap::{self, Rejection};

/// Notifications for the presentation layer, drained in order with
/// [`Session::drain_events`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Matches about to be cleared by the next cascade step.
    Matched { matches: Vec<Match> },
    /// A settled cascade step.
    CascadeStep(CascadeStep),
    /// The target score was reached.
    Won { score: u32 },
    /// The move budget ran out below the target score.
    Lost { score: u32 },
}

/// What a swap request did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapOutcome {
    pub accepted: bool,
    /// Why the request was refused; `None` when accepted.
    pub rejection: Option<Rejection>,
    /// Every index cleared during the cascade, step by step.
    pub cleared_cells: Vec<usize>,
    pub score_delta: u32,
    /// Combo counter after the cascade settled.
    pub combo_after: u32,
    pub moves_remaining: u32,
    pub phase: Phase,
    /// The cascade, one entry per settled step.
    pub steps: Vec<CascadeStep>,
    /// `false` if the cascade hit its step ceiling with matches still on
    /// the board. Those cells stay live and only clear as part of a later
    /// accepted swap.
    pub settled: bool,
}

/// A game in progress.
#[derive(Debug)]
pub struct Session<S = RandomSource> {
    config: SessionConfig,
    grid: Grid,
    state: SessionState,
    source: S,
    events: Vec<Event>,
}

/// Creates a session on a fresh match-free board, seeded from the OS.
pub fn create_session(
    size: usize,
    num_types: u8,
    max_moves: u32,
    target_score: u32,
    adjacent_only: bool,
) -> Result<Session<RandomSource>, EngineError> {
    let config = SessionConfig {
        size,
        num_types,
        max_moves,
        target_score,
        adjacent_only,
    };
    Session::create(config, RandomSource::from_entropy())
}

fn check_config(config: &SessionConfig) -> Result<(), EngineError> {
    match config.problem() {
        Some(msg) => Err(EngineError::InvalidConfig(msg)),
        None => Ok(()),
    }
}

impl<S: SymbolSource> Session<S> {
    /// Creates a session on a freshly generated board with no matches.
    #[instrument(skip(source))]
    pub fn create(config: SessionConfig, mut source: S) -> Result<Self, EngineError> {
        check_config(&config)?;
        let grid = cascade::generate_board(config.size, config.num_types, &mut source);
        Ok(Session {
            state: SessionState::new(config.max_moves),
            config,
            grid,
            source,
            events: Vec::new(),
        })
    }

    /// Creates a session on a given board.
    ///
    /// # Returns
    /// * `Err(EngineError::GridShape)` if the board's size differs from `config.size`.
    /// * `Err(EngineError::InvalidConfig)` if a symbol is outside `1..=num_types`.
    /// * `Err(EngineError::ClearedCell)` if any cell is marked cleared.
    /// * `Err(EngineError::PreexistingMatch)` if the board already has a match.
    pub fn with_grid(config: SessionConfig, grid: Grid, source: S) -> Result<Self, EngineError> {
        check_config(&config)?;
        if grid.size() != config.size {
            return Err(EngineError::GridShape {
                expected: config.size * config.size,
                found: grid.len(),
            });
        }
        if let Some(cell) = grid
            .cells()
            .iter()
            .find(|c| c.symbol == 0 || c.symbol > config.num_types)
        {
            return Err(EngineError::InvalidConfig(format!(
                "symbol {} at index {} exceeds num_types {}",
                cell.symbol, cell.index, config.num_types
            )));
        }
        if let Some(&index) = grid.cleared_indices().first() {
            return Err(EngineError::ClearedCell { index });
        }
        if matcher::has_match(&grid) {
            return Err(EngineError::PreexistingMatch);
        }
        Ok(Session {
            state: SessionState::new(config.max_moves),
            config,
            grid,
            source,
            events: Vec::new(),
        })
    }

    /// Swaps two cells and resolves everything that follows.
    ///
    /// Refused requests (session not idle, same cell, off-board, not
    /// adjacent in adjacency-only mode, or no match) leave the board and
    /// counters untouched. An accepted swap consumes exactly one move, runs
    /// the cascade to a stable board and then settles the phase.
    #[instrument(skip(self), fields(phase = ?self.state.phase()))]
    pub fn request_swap(&mut self, a: usize, b: usize) -> SwapOutcome {
        let matches = swap::validate(
            &self.grid,
            self.state.phase(),
            a,
            b,
            self.config.adjacent_only,
        )
        .and_then(|()| swap::apply(&mut self.grid, a, b));

        let matches = match matches {
            Ok(matches) => matches,
            Err(rejection) => {
                debug!(%rejection, "swap refused");
                return self.rejected(rejection);
            }
        };

        self.state.begin_resolving();
        let score_before = self.state.score();
        let steps = cascade::run_cascade(
            &mut self.grid,
            &mut self.state,
            matches,
            self.config.num_types,
            &mut self.source,
        );

        for step in &steps {
            self.events.push(Event::Matched {
                matches: step.matches.clone(),
            });
            self.events.push(Event::CascadeStep(step.clone()));
        }

        let settled = !matcher::has_match(&self.grid);
        let phase = self.state.settle(self.config.target_score);
        let score = self.state.score();
        match phase {
            Phase::Won => {
                info!(score, moves_remaining = self.state.moves_remaining(), "session won");
                self.events.push(Event::Won { score });
            }
            Phase::Lost => {
                info!(score, "session lost");
                self.events.push(Event::Lost { score });
            }
            _ => {}
        }

        SwapOutcome {
            accepted: true,
            rejection: None,
            cleared_cells: steps.iter().flat_map(|s| s.cleared.iter().copied()).collect(),
            score_delta: score - score_before,
            combo_after: self.state.combo(),
            moves_remaining: self.state.moves_remaining(),
            phase,
            steps,
            settled,
        }
    }

    fn rejected(&self, rejection: Rejection) -> SwapOutcome {
        SwapOutcome {
            accepted: false,
            rejection: Some(rejection),
            cleared_cells: Vec::new(),
            score_delta: 0,
            combo_after: self.state.combo(),
            moves_remaining: self.state.moves_remaining(),
            phase: self.state.phase(),
            steps: Vec::new(),
            settled: true,
        }
    }

    /// Throws the board and counters away and starts over on a new board.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.grid = cascade::generate_board(self.config.size, self.config.num_types, &mut self.source);
        self.state = SessionState::new(self.config.max_moves);
        self.events.clear();
    }

    /// Returns the cell at `index`.
    pub fn get_cell(&self, index: usize) -> Result<Cell, EngineError> {
        self.grid.get(index)
    }

    /// A copy of the current counters.
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Whether any swap on the current board would produce a match.
    pub fn has_valid_swap(&self) -> bool {
        hints::has_valid_swap(&self.grid, self.config.adjacent_only)
    }
}
