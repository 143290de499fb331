//! The unlock state machine every page runs.
//!
//! A page starts [`UnlockState::Locked`] and unlocks after a fixed number of
//! interactions, whether or not any of them were correct. Which number counts
//! is a per-page choice: plain attempts, or mistakes only.

use serde::Serialize;
use tracing::debug;

/// Whether a page still resists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockState {
    /// Attempts are validated and rejected.
    Locked,
    /// The next attempt leaves the page.
    Unlocked,
}

/// Which tally drives the unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Counter {
    /// Every counted attempt moves toward the threshold.
    Attempts,
    /// Only rejected attempts move toward the threshold.
    Mistakes,
}

/// What the controller should do with an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// This attempt unlocked the page. Skip validation.
    Unlocked,
    /// Still locked. Validate the input.
    Validate,
    /// The page was already unlocked. Leave it.
    Proceed,
}

/// Snapshot of a machine's tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Counted attempts so far.
    pub attempts: u32,
    /// Rejected attempts so far.
    pub mistakes: u32,
    /// Tally needed to unlock.
    pub threshold: u32,
    /// Current state.
    pub state: UnlockState,
}

impl Progress {
    /// Interactions left before the page gives up.
    #[must_use]
    pub fn remaining(&self, counter: Counter) -> u32 {
        let done = match counter {
            Counter::Attempts => self.attempts,
            Counter::Mistakes => self.mistakes,
        };
        self.threshold.saturating_sub(done)
    }
}

/// Per-visit unlock state machine.
#[derive(Debug, Clone)]
pub struct UnlockMachine {
    threshold: u32,
    counter: Counter,
    attempts: u32,
    mistakes: u32,
    state: UnlockState,
}

impl UnlockMachine {
    /// Create a locked machine. A zero threshold is treated as one.
    #[must_use]
    pub fn new(threshold: u32, counter: Counter) -> Self {
        Self {
            threshold: threshold.max(1),
            counter,
            attempts: 0,
            mistakes: 0,
            state: UnlockState::Locked,
        }
    }

    /// Register an attempt event.
    ///
    /// Uncounted attempts never advance the attempt tally. On an
    /// attempts-driven machine the threshold-reaching attempt unlocks instead
    /// of validating.
    pub fn count_attempt(&mut self, counted: bool) -> Step {
        if self.state == UnlockState::Unlocked {
            return Step::Proceed;
        }
        if counted {
            self.attempts += 1;
        }
        if self.counter == Counter::Attempts && self.attempts >= self.threshold {
            self.unlock();
            return Step::Unlocked;
        }
        Step::Validate
    }

    /// Register a rejected attempt. Returns `true` if it unlocked the page.
    pub fn record_mistake(&mut self) -> bool {
        if self.state == UnlockState::Unlocked {
            return false;
        }
        self.mistakes += 1;
        if self.counter == Counter::Mistakes && self.mistakes >= self.threshold {
            self.unlock();
            return true;
        }
        false
    }

    fn unlock(&mut self) {
        debug!(
            attempts = self.attempts,
            mistakes = self.mistakes,
            "Page unlocked"
        );
        self.state = UnlockState::Unlocked;
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> UnlockState {
        self.state
    }

    /// Check whether the page is unlocked.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.state == UnlockState::Unlocked
    }

    /// Which tally drives this machine.
    #[must_use]
    pub fn counter(&self) -> Counter {
        self.counter
    }

    /// Current tallies.
    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            attempts: self.attempts,
            mistakes: self.mistakes,
            threshold: self.threshold,
            state: self.state,
        }
    }
}
