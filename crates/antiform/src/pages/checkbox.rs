//! Checkbox page: pick pizza toppings, be judged for every combination.

use std::time::Duration;

use rand::RngCore;

use super::{quoted, ChaosTimer, PageId, PageInput, PageRules, Verdict};
use crate::effects::{Effect, Tone};
use crate::unlock::{Counter, Progress, UnlockState};

/// Toppings in display order.
pub const TOPPINGS: &[&str] = &[
    "Pepperoni",
    "Mushrooms",
    "Cheese",
    "Lentils",
    "Kimchi",
    "Watermelon",
    "Beer",
    "Mint",
    "Chicken",
    "Orange",
    "Olive Oil",
];

const CHAOS: &[ChaosTimer] = &[
    ChaosTimer {
        period: Duration::from_secs(5),
        chance: 0.02,
        notice: "⚠️ Checkboxes frozen. System needs to thaw.",
    },
    ChaosTimer {
        period: Duration::from_secs(6),
        chance: 0.04,
        notice: "⚠️ Checkbox size unstable. Visual glitch detected.",
    },
];

/// Pair judgments, first match wins.
const PAIRS: &[(&str, &str, &str)] = &[
    ("Lentils", "Watermelon", " Lentils and Watermelon? Are you making a smoothie or a pizza?"),
    ("Kimchi", "Beer", " Kimchi and Beer? At least you have taste in drinks."),
    ("Mint", "Chicken", " Mint and Chicken? Interesting... but wrong."),
    ("Orange", "Olive Oil", " Orange and Olive Oil? This is a salad, not a pizza."),
    ("Beer", "Watermelon", " Beer and Watermelon? Summer vibes, but pizza? No."),
    ("Lentils", "Kimchi", " Lentils and Kimchi? Trying to be healthy? Wrong place."),
];

const SINGLES: &[(&str, &str)] = &[
    ("Lentils", " Lentils on pizza? Really?"),
    ("Watermelon", " Watermelon? On pizza? That's a fruit, not a topping."),
    ("Beer", " Beer is a drink, not a pizza topping."),
    ("Mint", " Mint? Are you making toothpaste pizza?"),
];

/// Resolve comma separated names or 1-based numbers into toppings in list order.
///
/// Unknown entries are skipped.
#[must_use]
pub fn parse_toppings(raw: &str) -> Vec<String> {
    let mut picked = vec![false; TOPPINGS.len()];
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let index = match token.parse::<usize>() {
            Ok(n) if (1..=TOPPINGS.len()).contains(&n) => Some(n - 1),
            Ok(_) => None,
            Err(_) => TOPPINGS.iter().position(|t| t.eq_ignore_ascii_case(token)),
        };
        if let Some(i) = index {
            picked[i] = true;
        }
    }
    TOPPINGS
        .iter()
        .zip(picked)
        .filter_map(|(name, on)| on.then(|| (*name).to_string()))
        .collect()
}

/// The count-based half of a rejection.
fn count_message(toppings: &[String]) -> String {
    match toppings {
        [] => "You selected nothing. Are you even trying?".to_string(),
        [one] => format!("Really? Just \"{one}\"? That's not a pizza, that's a crime."),
        [a, b] => format!("\"{a}\" and \"{b}\"? What kind of combination is that?"),
        [a, b, c] => format!("\"{a}\", \"{b}\", and \"{c}\"? This is getting weird."),
        [_, _, _, _] => format!(
            "You chose {}. Too many choices, not enough taste.",
            toppings.join(", ")
        ),
        [_, _, _, _, _] => format!(
            "{}... and 2 more? This is chaos.",
            quoted(&toppings[..3])
        ),
        _ => format!(
            "You selected {} toppings: {}... This is way too much.",
            toppings.len(),
            toppings[..3].join(", ")
        ),
    }
}

/// The combination judgment appended to a rejection.
fn judgment(toppings: &[String]) -> &'static str {
    let has = |name: &str| toppings.iter().any(|t| t == name);

    if let Some((_, _, line)) = PAIRS.iter().find(|(a, b, _)| has(a) && has(b)) {
        return line;
    }
    if toppings.len() > 4 {
        return " You have too many toppings. Pick a lane.";
    }
    SINGLES
        .iter()
        .find(|(name, _)| has(name))
        .map_or("", |(_, line)| line)
}

/// Rules for the checkbox page.
#[derive(Debug, Clone, Default)]
pub struct CheckboxRules;

impl CheckboxRules {
    /// Create the page rules.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PageRules for CheckboxRules {
    fn id(&self) -> PageId {
        PageId::Checkbox
    }

    fn counter(&self) -> Counter {
        Counter::Mistakes
    }

    fn parse(&self, raw: &str) -> PageInput {
        PageInput::Toppings(parse_toppings(raw))
    }

    fn judge(&mut self, input: &PageInput, _rng: &mut dyn RngCore) -> Verdict {
        let PageInput::Toppings(toppings) = input else {
            return Verdict::Ignored { note: None };
        };
        Verdict::mistake(format!("{}{}", count_message(toppings), judgment(toppings)))
    }

    fn live_note(&self, input: &PageInput, _rng: &mut dyn RngCore) -> Option<String> {
        let PageInput::Toppings(toppings) = input else {
            return None;
        };
        let line = match toppings.len() {
            0 => "Come on, you can choose at least one...",
            1 => "That's all you got??",
            2 => "Two? Come on, you can do better than that!",
            3 => "Three toppings? Is that your final answer?",
            _ => "Wow, going all out now? Interesting choice...",
        };
        Some(format!("💬 {line}"))
    }

    fn unlock_banner(&self) -> &'static str {
        "Your Weird!! Thats why we moved you on."
    }

    fn hint(&self, _progress: &Progress) -> String {
        "Click 5 times to proceed".to_string()
    }

    fn prompt(&self) -> Vec<String> {
        let menu = TOPPINGS
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}. {name}", i + 1))
            .collect::<Vec<_>>()
            .join("  ");
        vec![
            "Build your pizza. Choose your toppings (try if you can).".to_string(),
            menu,
            "Enter names or numbers separated by commas.".to_string(),
        ]
    }

    fn panel_line(&self, mistakes: u32, message: &str) -> String {
        format!("Error #{mistakes}: {message}")
    }

    fn error_tone(&self, progress: &Progress) -> Tone {
        Tone::buzz(progress.mistakes)
    }

    fn success_tone(&self) -> Tone {
        Tone::chord()
    }

    fn attempt_effects(&self, progress: &Progress) -> Vec<Effect> {
        if progress.attempts < 3 {
            vec![Effect::Jitter]
        } else {
            Vec::new()
        }
    }

    fn chaos_timers(&self) -> &'static [ChaosTimer] {
        CHAOS
    }

    fn chaos_ready(&self, progress: &Progress) -> bool {
        progress.state == UnlockState::Locked && (1..5).contains(&progress.mistakes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn judge(raw: &str) -> String {
        let mut rules = CheckboxRules::new();
        let mut rng = StdRng::seed_from_u64(0);
        let input = rules.parse(raw);
        match rules.judge(&input, &mut rng) {
            Verdict::Rejected { message, mistake, .. } => {
                assert!(mistake);
                message
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    fn progress(attempts: u32, mistakes: u32) -> Progress {
        Progress {
            attempts,
            mistakes,
            threshold: 5,
            state: UnlockState::Locked,
        }
    }

    #[test]
    fn test_parse_names_and_numbers() {
        assert_eq!(parse_toppings("mint, 1, olive oil, MINT, 99, tofu"), vec![
            "Pepperoni".to_string(),
            "Mint".to_string(),
            "Olive Oil".to_string(),
        ]);
        assert!(parse_toppings("").is_empty());
    }

    #[test]
    fn test_nothing_selected() {
        assert_eq!(judge(""), "You selected nothing. Are you even trying?");
    }

    #[test]
    fn test_single_with_judgment() {
        assert_eq!(
            judge("mint"),
            "Really? Just \"Mint\"? That's not a pizza, that's a crime. Mint? Are you making toothpaste pizza?"
        );
    }

    #[test]
    fn test_pair_judgment_wins() {
        assert_eq!(
            judge("lentils, watermelon"),
            "\"Lentils\" and \"Watermelon\"? What kind of combination is that? Lentils and Watermelon? Are you making a smoothie or a pizza?"
        );
    }

    #[test]
    fn test_three_plain() {
        assert_eq!(
            judge("1,2,3"),
            "\"Pepperoni\", \"Mushrooms\", and \"Cheese\"? This is getting weird."
        );
    }

    #[test]
    fn test_four_joined() {
        assert_eq!(
            judge("1,2,3,9"),
            "You chose Pepperoni, Mushrooms, Cheese, Chicken. Too many choices, not enough taste."
        );
    }

    #[test]
    fn test_five_is_chaos() {
        assert_eq!(
            judge("1,2,3,9,10"),
            "\"Pepperoni\", \"Mushrooms\", \"Cheese\"... and 2 more? This is chaos. You have too many toppings. Pick a lane."
        );
    }

    #[test]
    fn test_many_is_too_much() {
        let msg = judge("1,2,3,4,5,6,7");
        assert!(msg.starts_with("You selected 7 toppings: Pepperoni, Mushrooms, Cheese... This is way too much."));
        assert!(msg.ends_with(" Lentils and Watermelon? Are you making a smoothie or a pizza?"));
    }

    #[test]
    fn test_live_notes() {
        let rules = CheckboxRules::new();
        let mut rng = StdRng::seed_from_u64(0);
        let note = |raw: &str, rng: &mut StdRng| rules.live_note(&rules.parse(raw), rng).unwrap();
        assert_eq!(note("", &mut rng), "💬 Come on, you can choose at least one...");
        assert_eq!(note("1,2", &mut rng), "💬 Two? Come on, you can do better than that!");
        assert_eq!(note("1,2,3,4,5", &mut rng), "💬 Wow, going all out now? Interesting choice...");
    }

    #[test]
    fn test_chaos_window() {
        let rules = CheckboxRules::new();
        assert_eq!(rules.chaos_timers().len(), 2);
        assert!(!rules.chaos_ready(&progress(1, 0)));
        assert!(rules.chaos_ready(&progress(2, 1)));
        assert!(rules.chaos_ready(&progress(5, 4)));
        assert!(!rules.chaos_ready(&progress(5, 5)));

        let mut unlocked = progress(5, 3);
        unlocked.state = UnlockState::Unlocked;
        assert!(!rules.chaos_ready(&unlocked));
    }

    #[test]
    fn test_jitter_only_early() {
        let rules = CheckboxRules::new();
        assert_eq!(rules.attempt_effects(&progress(1, 0)), vec![Effect::Jitter]);
        assert!(rules.attempt_effects(&progress(3, 2)).is_empty());
    }
}
