//! Password page: five escalating requirements, none of which matter.

use std::time::Duration;

use rand::RngCore;

use super::{PageId, PageInput, PageRules, Verdict};
use crate::unlock::{Counter, Progress};

const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// One password requirement.
#[derive(Debug, Clone, Copy)]
struct Rule {
    /// Name shown by the hint.
    label: &'static str,
    check: fn(&str) -> bool,
    /// Live complaint, `{}` is the password.
    complaint: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        label: "Length (5+)",
        check: |v| v.chars().count() >= 5,
        complaint: "\"{}\" is too short. Needs 5+ chars.",
    },
    Rule {
        label: "Uppercase Letter",
        check: |v| v.chars().any(|c| c.is_ascii_uppercase()),
        complaint: "\"{}\" needs an UPPERCASE letter.",
    },
    Rule {
        label: "Number",
        check: |v| v.chars().any(|c| c.is_ascii_digit()),
        complaint: "\"{}\" needs a NUMBER.",
    },
    Rule {
        label: "Symbol (!@#$)",
        check: |v| v.chars().any(|c| SYMBOLS.contains(c)),
        complaint: "\"{}\" needs a SYMBOL (!@#$).",
    },
    Rule {
        label: "Word 'banana'",
        check: |v| v.to_lowercase().contains("banana"),
        complaint: "\"{}\" must contain 'banana'.",
    },
];

/// Message logged when the field is empty.
pub const EMPTY_MESSAGE: &str = "Password cannot be empty.";

/// Message logged for any failing requirement.
pub const FIX_MESSAGE: &str = "You need to fix the issue and try again. Click Next when ready.";

fn first_failure(value: &str) -> Option<&'static Rule> {
    RULES.iter().find(|rule| !(rule.check)(value))
}

/// Rules for the password page.
#[derive(Debug, Clone)]
pub struct PasswordRules {
    advance_after: Duration,
    last: String,
}

impl PasswordRules {
    /// Create the page rules. The page leaves by itself `advance_after` unlock.
    #[must_use]
    pub fn new(advance_after: Duration) -> Self {
        Self {
            advance_after,
            last: String::new(),
        }
    }
}

impl PageRules for PasswordRules {
    fn id(&self) -> PageId {
        PageId::Password
    }

    fn counter(&self) -> Counter {
        Counter::Attempts
    }

    fn counts_attempt(&self, input: &PageInput) -> bool {
        !matches!(input, PageInput::Text(value) if value.is_empty())
    }

    fn parse(&self, raw: &str) -> PageInput {
        // Passwords keep their spaces.
        PageInput::Text(raw.trim_end_matches(['\r', '\n']).to_string())
    }

    fn judge(&mut self, input: &PageInput, _rng: &mut dyn RngCore) -> Verdict {
        let PageInput::Text(value) = input else {
            return Verdict::Ignored { note: None };
        };
        self.last.clone_from(value);

        if value.is_empty() {
            return Verdict::Rejected {
                message: EMPTY_MESSAGE.to_string(),
                live: None,
                mistake: false,
            };
        }

        match first_failure(value) {
            Some(rule) => Verdict::Rejected {
                message: FIX_MESSAGE.to_string(),
                live: Some(crate::pool::fill(rule.complaint, value)),
                mistake: false,
            },
            None => Verdict::Accepted {
                message: "Password is valid! Great job!".to_string(),
                logged: false,
            },
        }
    }

    fn unlock_banner(&self) -> &'static str {
        "Success! Redirecting..."
    }

    fn hint(&self, _progress: &Progress) -> String {
        let next = first_failure(&self.last).map_or("None", |rule| rule.label);
        format!("NEXT REQUIREMENT: {next}")
    }

    fn prompt(&self) -> Vec<String> {
        vec![
            "Choose a password.".to_string(),
            "Password Requirements:".to_string(),
            "• At least 5 characters".to_string(),
        ]
    }

    fn auto_advance(&self) -> Option<Duration> {
        Some(self.advance_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rules() -> PasswordRules {
        PasswordRules::new(Duration::from_millis(500))
    }

    fn judge(rules: &mut PasswordRules, raw: &str) -> Verdict {
        let mut rng = StdRng::seed_from_u64(0);
        let input = rules.parse(raw);
        rules.judge(&input, &mut rng)
    }

    #[test]
    fn test_empty_not_counted() {
        let rules = rules();
        assert!(!rules.counts_attempt(&rules.parse("")));
        assert!(rules.counts_attempt(&rules.parse("a")));
    }

    #[test]
    fn test_empty_message() {
        let mut rules = rules();
        assert_eq!(
            judge(&mut rules, ""),
            Verdict::Rejected {
                message: EMPTY_MESSAGE.to_string(),
                live: None,
                mistake: false,
            }
        );
    }

    #[test]
    fn test_rules_in_order() {
        let cases = [
            ("abc", "\"abc\" is too short. Needs 5+ chars."),
            ("abcdef", "\"abcdef\" needs an UPPERCASE letter."),
            ("Abcdef", "\"Abcdef\" needs a NUMBER."),
            ("Abcdef1", "\"Abcdef1\" needs a SYMBOL (!@#$)."),
            ("Abcdef1!", "\"Abcdef1!\" must contain 'banana'."),
        ];
        for (password, live) in cases {
            let mut rules = rules();
            assert_eq!(
                judge(&mut rules, password),
                Verdict::Rejected {
                    message: FIX_MESSAGE.to_string(),
                    live: Some(live.to_string()),
                    mistake: false,
                }
            );
        }
    }

    #[test]
    fn test_valid_password_accepted_unlogged() {
        let mut rules = rules();
        assert_eq!(
            judge(&mut rules, "BaNaNa1!"),
            Verdict::Accepted {
                message: "Password is valid! Great job!".to_string(),
                logged: false,
            }
        );
    }

    #[test]
    fn test_hint_tracks_last_value() {
        let mut rules = rules();
        let progress = crate::unlock::UnlockMachine::new(5, Counter::Attempts).progress();
        assert_eq!(rules.hint(&progress), "NEXT REQUIREMENT: Length (5+)");

        judge(&mut rules, "Abcdef");
        assert_eq!(rules.hint(&progress), "NEXT REQUIREMENT: Number");

        judge(&mut rules, "xbanana9#Q");
        assert_eq!(rules.hint(&progress), "NEXT REQUIREMENT: None");
    }

    #[test]
    fn test_auto_advance() {
        assert_eq!(rules().auto_advance(), Some(Duration::from_millis(500)));
    }
}
