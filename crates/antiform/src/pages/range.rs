//! Range page: a volume slider where every level is the wrong level.

use rand::RngCore;

use super::{PageId, PageInput, PageRules, Verdict};
use crate::unlock::{Counter, Progress};

const MIN: f64 = 0.0;
const MAX: f64 = 100.0;
const START: f64 = 50.0;

/// Complaint for a slider level. Levels outside `0..=100` are clamped first.
#[must_use]
pub fn complaint(level: f64) -> String {
    let v = level.clamp(MIN, MAX);
    if v <= MIN {
        format!("Volume at {v:.2}? That's silence, not a choice.")
    } else if v < 10.0 {
        format!("Only {v:.2}? That's barely audible. Turn it up!")
    } else if v < 25.0 {
        format!("{v:.2} Is way too low. Are you trying to whisper?")
    } else if v < 50.0 {
        format!("{v:.2}? That's still too low. You can do better.")
    } else if (v - START).abs() < f64::EPSILON {
        format!("Exactly {v:.2}? How original. Try something else.")
    } else if v < 75.0 {
        format!("{v:.2} Is getting there, but not quite right.")
    } else if v < 90.0 {
        format!("{v:.2}? Almost, but not good enough.")
    } else if v < MAX {
        format!("{v:.2}? So close, yet so far.")
    } else {
        format!("Maximum {v:.2}? That's too loud! Your ears will thank you for less.")
    }
}

/// Rules for the range page.
#[derive(Debug, Clone)]
pub struct RangeRules {
    level: f64,
}

impl RangeRules {
    /// Create the page rules with the slider at its midpoint.
    #[must_use]
    pub fn new() -> Self {
        Self { level: START }
    }

    /// Current slider position.
    #[must_use]
    pub fn level(&self) -> f64 {
        self.level
    }
}

impl Default for RangeRules {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRules for RangeRules {
    fn id(&self) -> PageId {
        PageId::Range
    }

    fn counter(&self) -> Counter {
        Counter::Attempts
    }

    fn parse(&self, raw: &str) -> PageInput {
        let level = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map_or(self.level, |v| v.clamp(MIN, MAX));
        PageInput::Level(level)
    }

    fn judge(&mut self, input: &PageInput, _rng: &mut dyn RngCore) -> Verdict {
        let PageInput::Level(level) = input else {
            return Verdict::Ignored { note: None };
        };
        self.level = *level;
        Verdict::Rejected {
            message: complaint(*level),
            live: None,
            mistake: false,
        }
    }

    fn unlock_banner(&self) -> &'static str {
        "Can you count?"
    }

    fn hint(&self, progress: &Progress) -> String {
        format!(
            "CLICKS: {}/{} VALUE: {:.2}",
            progress.attempts, progress.threshold, self.level
        )
    }

    fn prompt(&self) -> Vec<String> {
        vec![
            "Set the volume.".to_string(),
            format!("Enter a level from 0 to 100. Current: {:.2}", self.level),
        ]
    }
}
