//! Home page: a word CAPTCHA that is the only honest check in the tour.

use rand::{Rng, RngCore};

use super::{PageId, PageInput, PageRules, Verdict};
use crate::pool::MessagePool;
use crate::unlock::{Counter, Progress};

const WORDS: &[&str] = &[
    "apple", "banana", "orange", "grape", "melon", "tiger", "eagle", "dolphin", "rabbit",
    "penguin", "river", "mountain", "forest", "ocean", "desert", "happy", "bright", "swift",
    "clever", "brave", "puzzle", "garden", "summer", "winter", "spring",
];

const WRONG: &[&str] = &[
    "Beep boop? Nice try, robot!",
    "Even my grandma types better than that!",
    "Plot twist: You're the captcha now.",
    "Error 404: Typing skills not found.",
    "Are you sure you're not a toaster?",
    "My pet goldfish got that one right...",
    "That's not it, chief.",
    "Wrong! But hey, at least you tried.",
    "Captcha says: 'Bruh.'",
    "Your keyboard called. It's disappointed.",
    "Were you typing with your elbows?",
    "Close! Just kidding, not even close.",
    "The word was RIGHT THERE!",
    "Did you sneeze on the keyboard?",
    "Autocorrect can't save you here!",
];

const RIGHT: &[&str] = &[
    "You're officially not a robot. Congrats!",
    "Human verified! (Probably)",
    "Nice! You can read squiggly text!",
    "Welcome, fellow human!",
    "Captcha defeated! +10 XP",
    "You passed! Your eyes work!",
    "Humanity confirmed. Proceed, mortal.",
];

/// Spread a word out so it reads like a distorted CAPTCHA image.
#[must_use]
pub fn distort(word: &str) -> String {
    let letters: Vec<String> = word.chars().map(|c| c.to_string()).collect();
    format!("~/ {} /~", letters.join(" "))
}

/// Rules for the home page.
#[derive(Debug, Clone)]
pub struct HomeRules {
    word: &'static str,
    passed: bool,
}

impl HomeRules {
    /// Create the page rules with a random word.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        Self {
            word: WORDS[rng.random_range(0..WORDS.len())],
            passed: false,
        }
    }

    /// The word on screen.
    #[must_use]
    pub fn word(&self) -> &'static str {
        self.word
    }
}

impl PageRules for HomeRules {
    fn id(&self) -> PageId {
        PageId::Home
    }

    fn counter(&self) -> Counter {
        Counter::Mistakes
    }

    fn parse(&self, raw: &str) -> PageInput {
        PageInput::Text(raw.trim().to_string())
    }

    fn judge(&mut self, input: &PageInput, rng: &mut dyn RngCore) -> Verdict {
        let PageInput::Text(guess) = input else {
            return Verdict::Ignored { note: None };
        };

        if guess.eq_ignore_ascii_case(self.word) {
            self.passed = true;
            Verdict::Accepted {
                message: MessagePool::new(RIGHT).pick(rng).to_string(),
                logged: false,
            }
        } else {
            Verdict::Rejected {
                message: MessagePool::new(WRONG).pick(rng).to_string(),
                live: None,
                mistake: false,
            }
        }
    }

    fn refresh_on_rejection(&self) -> bool {
        true
    }

    fn refresh(&mut self, rng: &mut dyn RngCore) -> Option<Vec<String>> {
        self.word = WORDS[rng.random_range(0..WORDS.len())];
        Some(vec![distort(self.word)])
    }

    fn unlock_banner(&self) -> &'static str {
        ""
    }

    fn hint(&self, _progress: &Progress) -> String {
        "Type the word in the picture. Then press Enter again to start the tour.".to_string()
    }

    fn prompt(&self) -> Vec<String> {
        vec![
            "Welcome. Prove you are human.".to_string(),
            distort(self.word),
            "Commands: :print :screenshot :clear :hint :quit".to_string(),
        ]
    }

    fn wants_exit(&self) -> bool {
        self.passed
    }

    fn persists(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_distort() {
        assert_eq!(distort("tiger"), "~/ t i g e r /~");
    }

    #[test]
    fn test_correct_word_opens_the_tour() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut rules = HomeRules::new(&mut rng);
        assert!(!rules.wants_exit());

        let input = rules.parse(&rules.word().to_uppercase());
        let verdict = rules.judge(&input, &mut rng);
        match verdict {
            Verdict::Accepted { message, logged } => {
                assert!(RIGHT.contains(&message.as_str()));
                assert!(!logged);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
        assert!(rules.wants_exit());
    }

    #[test]
    fn test_wrong_word_is_not_a_mistake() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut rules = HomeRules::new(&mut rng);
        let input = rules.parse("definitely-not-a-word");

        let Verdict::Rejected { message, mistake, .. } = rules.judge(&input, &mut rng) else {
            panic!("expected rejection");
        };
        assert!(WRONG.contains(&message.as_str()));
        assert!(!mistake);
        assert!(!rules.persists());
        assert!(rules.refresh_on_rejection());
    }

    #[test]
    fn test_refresh_picks_from_word_list() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut rules = HomeRules::new(&mut rng);
        let lines = rules.refresh(&mut rng).unwrap();
        assert!(WORDS.contains(&rules.word()));
        assert_eq!(lines, vec![distort(rules.word())]);
    }
}
