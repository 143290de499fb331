//! Date picker page: every date is inconvenient for someone.

use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use rand::{Rng, RngCore};

use super::{PageId, PageInput, PageRules, Verdict};
use crate::effects::Effect;
use crate::pool::MessagePool;
use crate::unlock::{Counter, Progress};

const MONEY: &str = "oh i dont like money";
const PARTY: &str = "i want to party on friday";
const DATE_NIGHT: &str = "im getting laid tonight";
const TACOS: &str = "today is tacotuesday";
const TEST: &str = "wednesday? that's my test date";
const LAUNDRY: &str = "oh no i have to do laundry";
const GOLDFISH: &str = "oh goldfish is ill";
const COLD: &str = "it's too cold";
const TIRED: &str = "i'm so tired i'm staying home";

/// Excuses by weekday, Sunday first.
const BY_WEEKDAY: [&[&str]; 7] = [
    &[MONEY, TIRED, COLD],
    &[LAUNDRY, TIRED, COLD],
    &[TACOS, LAUNDRY, COLD],
    &[TEST, LAUNDRY, TIRED],
    &[PARTY, LAUNDRY, COLD],
    &[PARTY, DATE_NIGHT, MONEY],
    &[DATE_NIGHT, MONEY, TIRED],
];

/// Excuses for particular days of the month. These win over everything else.
const BY_DAY: &[(u32, &[&str])] = &[
    (1, &[MONEY, TIRED]),
    (13, &[GOLDFISH, COLD]),
    (14, &[DATE_NIGHT, MONEY]),
    (25, &[COLD, LAUNDRY]),
    (31, &[TIRED, GOLDFISH]),
];

/// Excuses for particular months, zero based.
const BY_MONTH: &[(u32, &[&str])] = &[(1, &[COLD, LAUNDRY]), (11, &[COLD, TIRED])];

const MONTH_CHANCE: f64 = 0.3;

const RANDOM_SASS: &[&str] = &[
    MONEY, PARTY, DATE_NIGHT, TACOS, TEST, LAUNDRY, GOLDFISH, COLD, TIRED,
];

/// Excuses for pressing the button without picking a date.
const NO_DATE: &[&str] = &[
    "Oh i dont like money",
    "I want to party on friday",
    "Im getting laid tonight",
    "Today is tacotuesday",
    "Wednesday? That's my test date",
    "Oh no i have to do laundry",
    "Oh my goldfish is ill",
    "It's too cold",
    "I'm so tired i'm staying home",
    "It's too hot",
    "I have a headache",
    "My car won't start",
    "I lost my keys",
    "I have to walk my dog",
    "I forgot my lunch",
    "Traffic is terrible today",
    "It's to romantic season",
    "I have Jon's zoometting",
    "My hardrive is running away",
    "I have TA Jobs",
    "We have Web To Print today",
];

fn lookup(table: &[(u32, &'static [&'static str])], key: u32) -> Option<&'static [&'static str]> {
    table
        .iter()
        .find_map(|(k, pool)| (*k == key).then_some(*pool))
}

/// Pick an excuse for a date.
///
/// Day of month is checked first, then the month with a 30% chance, then the weekday.
pub fn excuse(date: NaiveDate, rng: &mut dyn RngCore) -> &'static str {
    if let Some(pool) = lookup(BY_DAY, date.day()) {
        return MessagePool::new(pool).pick(rng);
    }
    if let Some(pool) = lookup(BY_MONTH, date.month0()) {
        if rng.random_bool(MONTH_CHANCE) {
            return MessagePool::new(pool).pick(rng);
        }
    }
    let weekday = date.weekday().num_days_from_sunday() as usize;
    match BY_WEEKDAY.get(weekday) {
        Some(pool) => MessagePool::new(pool).pick(rng),
        None => MessagePool::new(RANDOM_SASS).pick(rng),
    }
}

/// Rules for the date picker page.
#[derive(Debug, Clone, Default)]
pub struct DateRules {
    last_excuse: Option<String>,
}

impl DateRules {
    /// Create the page rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageRules for DateRules {
    fn id(&self) -> PageId {
        PageId::DatePicker
    }

    fn counter(&self) -> Counter {
        Counter::Mistakes
    }

    fn parse(&self, raw: &str) -> PageInput {
        PageInput::Date(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
    }

    fn judge(&mut self, input: &PageInput, rng: &mut dyn RngCore) -> Verdict {
        let PageInput::Date(date) = input else {
            return Verdict::Ignored { note: None };
        };
        let reason = match date {
            Some(date) => excuse(*date, rng),
            None => MessagePool::new(NO_DATE).pick(rng),
        };
        self.last_excuse = Some(reason.to_string());
        Verdict::Rejected {
            message: format!("Date Rejected: {reason}"),
            live: date.map(|_| format!("💬 {reason}")),
            mistake: true,
        }
    }

    fn unlock_banner(&self) -> &'static str {
        "SYSTEM TIRED OF YOU! SUCCESSFUL."
    }

    fn hint(&self, progress: &Progress) -> String {
        format!(
            "Trigger {} more errors to reboot system.",
            progress.remaining(Counter::Mistakes)
        )
    }

    fn hint_spoken(&self) -> bool {
        true
    }

    fn prompt(&self) -> Vec<String> {
        vec![
            "Pick a date for your appointment.".to_string(),
            "Enter a date as YYYY-MM-DD.".to_string(),
        ]
    }

    fn panel_line(&self, mistakes: u32, message: &str) -> String {
        let time = Local::now().format("%H:%M:%S");
        format!("[{time}] ERR_0{mistakes}: {message}")
    }

    fn attempt_effects(&self, _progress: &Progress) -> Vec<Effect> {
        self.last_excuse
            .iter()
            .map(|reason| Effect::Speak(reason.clone()))
            .collect()
    }

    fn unlock_effects(&self) -> Vec<Effect> {
        vec![Effect::Speak(
            "System reboot successful. Safe mode engaged.".to_string(),
        )]
    }

    fn proceed_effects(&self) -> Vec<Effect> {
        vec![Effect::Speak("Redirecting to Password Input.".to_string())]
    }

    fn proceed_delay(&self) -> Option<Duration> {
        Some(Duration::from_millis(1000))
    }
}
