//! Session bookkeeping: moves, score, combo and the phase register.

/// Highest value the combo counter reaches.
pub const MAX_COMBO: u32 = 5;

/// The phase register of a session.
///
/// `Idle -> Resolving -> Idle | Won | Lost`. `Won` and `Lost` are terminal;
/// only a restart leaves them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for a swap.
    Idle,
    /// A cascade is running; swaps are refused.
    Resolving,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Counters of one game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionState {
    moves_remaining: u32,
    score: u32,
    combo: u32,
    phase: Phase,
}

impl SessionState {
    /// A fresh session with the full move budget.
    pub fn new(max_moves: u32) -> Self {
        SessionState {
            moves_remaining: max_moves,
            score: 0,
            combo: 0,
            phase: Phase::Idle,
        }
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Consecutive chain reactions in the current cascade; 0 between swaps.
    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Enters `Resolving` for an accepted swap and consumes one move.
    ///
    /// Chain reactions never call this, so a swap costs exactly one move no
    /// matter how long its cascade runs.
    pub(crate) fn begin_resolving(&mut self) {
        debug_assert_eq!(self.phase, Phase::Idle);
        self.phase = Phase::Resolving;
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Counts one more chain reaction, up to [`MAX_COMBO`].
    pub(crate) fn bump_combo(&mut self) {
        if self.combo < MAX_COMBO {
            self.combo += 1;
        }
    }

    /// Closes a settled cascade: resets the combo and decides the next phase.
    ///
    /// Reaching the target wins even on the last move; running out of moves
    /// below the target loses.
    pub(crate) fn settle(&mut self, target_score: u32) -> Phase {
        self.combo = 0;
        self.phase = if self.score >= target_score {
            Phase::Won
        } else if self.moves_remaining == 0 {
            Phase::Lost
        } else {
            Phase::Idle
        };
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = SessionState::new(20);
        assert_eq!(state.moves_remaining(), 20);
        assert_eq!(state.score(), 0);
        assert_eq!(state.combo(), 0);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_begin_resolving_consumes_one_move() {
        let mut state = SessionState::new(3);
        state.begin_resolving();
        assert_eq!(state.phase(), Phase::Resolving);
        assert_eq!(state.moves_remaining(), 2);
    }

    #[test]
    fn test_combo_caps_at_five() {
        let mut state = SessionState::new(3);
        for _ in 0..10 {
            state.bump_combo();
        }
        assert_eq!(state.combo(), MAX_COMBO);
    }

    #[test]
    fn test_settle_transitions() {
        let mut state = SessionState::new(2);
        state.begin_resolving();
        state.add_score(300);
        state.bump_combo();
        assert_eq!(state.settle(1000), Phase::Idle);
        assert_eq!(state.combo(), 0);

        state.begin_resolving();
        assert_eq!(state.settle(1000), Phase::Lost);
        assert!(state.phase().is_terminal());
    }

    #[test]
    fn test_win_beats_exhausted_moves() {
        let mut state = SessionState::new(1);
        state.begin_resolving();
        state.add_score(5000);
        assert_eq!(state.settle(5000), Phase::Won);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut state = SessionState::new(1);
        state.add_score(u32::MAX);
        state.add_score(300);
        assert_eq!(state.score(), u32::MAX);
    }
}
