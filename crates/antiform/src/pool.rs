//! Randomized message pools.
//!
//! Each rejection category has a fixed set of lines. Pages either draw
//! uniformly or draw without replacement until the pool runs dry.

use rand::{Rng, RngCore};

/// Placeholder replaced by [`MessagePool::pick_with`].
const PLACEHOLDER: &str = "{}";

/// A fixed list of message templates.
#[derive(Debug, Clone)]
pub struct MessagePool {
    messages: &'static [&'static str],
    used: Vec<bool>,
}

impl MessagePool {
    /// Create a pool over a static list of templates.
    #[must_use]
    pub fn new(messages: &'static [&'static str]) -> Self {
        Self {
            messages,
            used: vec![false; messages.len()],
        }
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check whether the pool has no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Uniform pick. Empty pools yield an empty string.
    pub fn pick(&self, rng: &mut dyn RngCore) -> &'static str {
        if self.messages.is_empty() {
            return "";
        }
        self.messages[rng.random_range(0..self.messages.len())]
    }

    /// Pick a template not drawn since the last reset.
    ///
    /// Once every template has been drawn the used set starts over.
    pub fn pick_fresh(&mut self, rng: &mut dyn RngCore) -> &'static str {
        if self.messages.is_empty() {
            return "";
        }
        if self.used.iter().all(|used| *used) {
            self.used.fill(false);
        }

        let fresh: Vec<usize> = (0..self.messages.len())
            .filter(|&i| !self.used[i])
            .collect();
        let index = fresh[rng.random_range(0..fresh.len())];
        self.used[index] = true;
        self.messages[index]
    }

    /// Uniform pick with every `{}` replaced by `subject`.
    pub fn pick_with(&self, rng: &mut dyn RngCore, subject: &str) -> String {
        fill(self.pick(rng), subject)
    }
}

/// Replace every `{}` in `template` with `subject`.
#[must_use]
pub fn fill(template: &str, subject: &str) -> String {
    template.replace(PLACEHOLDER, subject)
}
