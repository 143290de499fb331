//! CAPTCHA page: name the input type in the picture. There are six pictures.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::{PageId, PageInput, PageRules, Verdict};
use crate::effects::Effect;
use crate::unlock::{Counter, Progress};

/// Every input type a challenge can ask for.
pub const INPUT_TYPES: &[&str] = &[
    "URL",
    "Password",
    "Checkbox",
    "Range",
    "Color Picker",
    "Date Picker",
    "File Upload",
    "CAPTCHA",
];

const OPTIONS: usize = 6;

/// Logged for an empty answer.
pub const EMPTY_ANSWER: &str = "Empty input. Try typing something.";

/// Text picture of an input type.
#[must_use]
pub fn picture(input_type: &str) -> &'static str {
    match input_type {
        "Password" => "[ ●  ●  ●  ●            ]",
        "Checkbox" => "[✓] Option",
        "Range" => "━━━━━━━━━━━●━━━━━━━━━━",
        "Color Picker" => "[████████████████████]",
        "Date Picker" => "[ 12/10/2025           ]",
        "File Upload" => "[ Choose File          ]",
        // There is no picture of a CAPTCHA.
        _ => "[ https://example.com   ]",
    }
}

/// One round: an answer and the shuffled pictures shown with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// The input type the player must name.
    pub answer: &'static str,
    /// Six distinct input types, answer included, in display order.
    pub options: Vec<&'static str>,
}

impl Challenge {
    /// Draw a new round.
    pub fn draw(rng: &mut dyn RngCore) -> Self {
        let answer = INPUT_TYPES[rng.random_range(0..INPUT_TYPES.len())];

        let mut others: Vec<&'static str> = INPUT_TYPES
            .iter()
            .copied()
            .filter(|t| *t != answer)
            .collect();
        others.shuffle(rng);

        let mut options = vec![answer];
        options.extend(others.into_iter().take(OPTIONS - 1));
        options.shuffle(rng);

        Self { answer, options }
    }

    /// Lenient comparison: equal or containing each other, ignoring case and spacing.
    #[must_use]
    pub fn matches(&self, guess: &str) -> bool {
        let guess = guess.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        let answer = self.answer.to_lowercase();
        !guess.is_empty() && (guess == answer || guess.contains(&answer) || answer.contains(&guess))
    }

    fn lines(&self) -> Vec<String> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("  {}. {}", i + 1, picture(option)))
            .collect()
    }
}

/// Rules for the CAPTCHA page.
#[derive(Debug, Clone)]
pub struct CaptchaRules {
    challenge: Challenge,
    celebration: Duration,
}

impl CaptchaRules {
    /// Create the page rules with a fresh challenge.
    pub fn new(rng: &mut dyn RngCore, celebration: Duration) -> Self {
        Self {
            challenge: Challenge::draw(rng),
            celebration,
        }
    }

    /// The round on screen.
    #[must_use]
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }
}

impl PageRules for CaptchaRules {
    fn id(&self) -> PageId {
        PageId::Captcha
    }

    fn counter(&self) -> Counter {
        Counter::Attempts
    }

    fn parse(&self, raw: &str) -> PageInput {
        PageInput::Text(raw.trim().to_string())
    }

    fn judge(&mut self, input: &PageInput, _rng: &mut dyn RngCore) -> Verdict {
        let PageInput::Text(guess) = input else {
            return Verdict::Ignored { note: None };
        };

        if guess.is_empty() {
            return Verdict::Rejected {
                message: EMPTY_ANSWER.to_string(),
                live: Some("No input detected. Are you even trying?".to_string()),
                mistake: true,
            };
        }
        if self.challenge.matches(guess) {
            return Verdict::Accepted {
                message: "Correct! But keep clicking...".to_string(),
                logged: false,
            };
        }

        let answer = self.challenge.answer;
        Verdict::Rejected {
            message: format!("Wrong input type: {guess}. Correct answer was: {answer}"),
            live: Some(format!("Nope. That's not a {answer}. Try again.")),
            mistake: true,
        }
    }

    fn refresh_on_rejection(&self) -> bool {
        true
    }

    fn refresh(&mut self, rng: &mut dyn RngCore) -> Option<Vec<String>> {
        self.challenge = Challenge::draw(rng);
        Some(self.challenge.lines())
    }

    fn unlock_banner(&self) -> &'static str {
        "Dude you need Glasses!!"
    }

    fn hint(&self, _progress: &Progress) -> String {
        "Look at the images and identify the input type".to_string()
    }

    fn prompt(&self) -> Vec<String> {
        let mut lines = vec!["Type the input type shown in the images.".to_string()];
        lines.extend(self.challenge.lines());
        lines.push("Use :refresh for new images.".to_string());
        lines
    }

    fn panel_line(&self, mistakes: u32, message: &str) -> String {
        format!("Error #{mistakes}: {message}")
    }

    fn proceed_message(&self) -> &'static str {
        "Celebrating! Redirecting after fireworks..."
    }

    fn proceed_effects(&self) -> Vec<Effect> {
        vec![Effect::Fireworks]
    }

    fn proceed_delay(&self) -> Option<Duration> {
        Some(self.celebration)
    }
}
