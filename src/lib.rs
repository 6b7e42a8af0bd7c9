//! # Match-3 Engine Library
//!
//! This library provides the board and match engine of a tile-matching
//! puzzle: a square grid of typed symbols where the player swaps two symbols
//! to line up three or more of a kind, which clears them, scores, lets the
//! cells above fall, refills the board and possibly sets off chain
//! reactions. A session is bounded by a move budget and a target score.
//!
//! The engine is pure data in, data out. It renders nothing and reads no
//! ambient state; a front end feeds it `request_swap(a, b)` calls and
//! animates the cascade steps it returns.
//!
//! It is used by two binaries:
//! - `play`: Interactive play on the command line.
//! - `autoplay`: Runs the built-in move strategies over seeded sessions and
//!   reports how often each one wins.
//!
//! ## Modules
//! - `grid`: The board (`Grid`), its cells and index/coordinate math.
//! - `matcher`: Row and column run detection and match scoring.
//! - `swap`: Swap validation, application and revert.
//! - `cascade`: The clear, compact, refill loop and match-free board generation.
//! - `state`: Moves, score, combo and the session phase.
//! - `session`: The `Session` facade tying it all together, plus events.
//! - `source`: Random and scripted symbol sources.
//! - `hints`: Finding swaps that produce matches, and move strategies.
//! - `config`: Session parameters, loadable from TOML.
//! - `error`: Error types.
//! - `utils`: Parsing boards from text.

pub mod cascade;
pub mod config;
pub mod error;
pub mod grid;
pub mod hints;
pub mod matcher;
pub mod session;
pub mod source;
pub mod state;
pub mod swap;
pub mod utils;

pub use config::SessionConfig;
pub use error::{ConfigError, EngineError};
pub use grid::{Cell, Coord, Grid, Symbol};
pub use matcher::Match;
pub use session::{create_session, Event, Session, SwapOutcome};
pub use state::{Phase, SessionState};
pub use swap::Rejection;
