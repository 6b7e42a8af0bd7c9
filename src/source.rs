//! Where new symbols come from.
//!
//! Sessions draw every symbol (initial board and refills) from a
//! [`SymbolSource`]. [`RandomSource`] is the normal uniform generator;
//! [`ScriptedSource`] replays a fixed sequence first, which makes cascades
//! reproducible in tests and replays.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::grid::Symbol;

/// Produces symbol types in `1..=num_types`.
pub trait SymbolSource {
    fn next_symbol(&mut self, num_types: Symbol) -> Symbol;
}

/// Uniform random symbols backed by `SmallRng`.
#[derive(Clone, Debug)]
pub struct RandomSource {
    rng: SmallRng,
}

impl RandomSource {
    /// A reproducible source; the same seed yields the same symbol stream.
    pub fn with_seed(seed: u64) -> Self {
        RandomSource {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// A source seeded from the operating system.
    pub fn from_entropy() -> Self {
        RandomSource {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl SymbolSource for RandomSource {
    fn next_symbol(&mut self, num_types: Symbol) -> Symbol {
        self.rng.gen_range(1..=num_types)
    }
}

/// Hands out a scripted sequence, then falls back to seeded random symbols.
///
/// Scripted values are passed through unchanged, so a script may only
/// contain symbols valid for the session it drives.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    script: VecDeque<Symbol>,
    fallback: RandomSource,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Symbol>) -> Self {
        ScriptedSource {
            script: script.into_iter().collect(),
            fallback: RandomSource::with_seed(0),
        }
    }

    /// Number of scripted symbols not yet handed out.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl SymbolSource for ScriptedSource {
    fn next_symbol(&mut self, num_types: Symbol) -> Symbol {
        match self.script.pop_front() {
            Some(symbol) => symbol,
            None => self.fallback.next_symbol(num_types),
        }
    }
}

impl<S: SymbolSource + ?Sized> SymbolSource for Box<S> {
    fn next_symbol(&mut self, num_types: Symbol) -> Symbol {
        (**self).next_symbol(num_types)
    }
}
