//! Page rules.
//!
//! Every page in the tour is the same unlock machine wearing a different
//! costume. A [`PageRules`] implementation supplies the costume: how input is
//! read, how it is judged, and what the page says along the way.

pub mod captcha;
pub mod checkbox;
pub mod color;
pub mod date;
pub mod file;
pub mod home;
pub mod password;
pub mod range;
pub mod url;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::effects::{Effect, Tone};
use crate::error::{Error, Result};
use crate::unlock::{Counter, Progress};

/// The pages of the tour, in tour order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageId {
    /// Landing page with a word CAPTCHA.
    Home,
    /// URL text field.
    Url,
    /// Password field.
    Password,
    /// Pizza topping checkboxes.
    Checkbox,
    /// Volume slider.
    Range,
    /// Hex color picker.
    ColorPicker,
    /// Date picker.
    DatePicker,
    /// File upload.
    File,
    /// Input-type CAPTCHA.
    Captcha,
}

impl PageId {
    /// Every page in tour order.
    pub const ALL: [PageId; 9] = [
        PageId::Home,
        PageId::Url,
        PageId::Password,
        PageId::Checkbox,
        PageId::Range,
        PageId::ColorPicker,
        PageId::DatePicker,
        PageId::File,
        PageId::Captcha,
    ];

    /// The page the tour moves to after this one.
    #[must_use]
    pub fn next(self) -> PageId {
        match self {
            Self::Home => Self::Url,
            Self::Url => Self::Password,
            Self::Password => Self::Checkbox,
            Self::Checkbox => Self::Range,
            Self::Range => Self::ColorPicker,
            Self::ColorPicker => Self::DatePicker,
            Self::DatePicker => Self::File,
            Self::File => Self::Captcha,
            Self::Captcha => Self::Home,
        }
    }

    /// Short name used on the command line.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Url => "url",
            Self::Password => "password",
            Self::Checkbox => "checkbox",
            Self::Range => "range",
            Self::ColorPicker => "color",
            Self::DatePicker => "date",
            Self::File => "file",
            Self::Captcha => "captcha",
        }
    }

    /// Heading shown on the page.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Url => "URL",
            Self::Password => "Password",
            Self::Checkbox => "Checkbox",
            Self::Range => "Range Slider",
            Self::ColorPicker => "Color Picker",
            Self::DatePicker => "Date Picker",
            Self::File => "File Upload",
            Self::Captcha => "CAPTCHA",
        }
    }

    /// Label stored in the `page` field of rejection entries.
    #[must_use]
    pub fn log_label(self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Url => "URL",
            Self::Password => "PASSWORD INPUT",
            Self::Checkbox => "CHECKBOX",
            Self::Range => "RANGE SLIDER",
            Self::ColorPicker => "COLOR PICKER",
            Self::DatePicker => "DATEPICKER",
            Self::File => "FILE",
            Self::Captcha => "CAPTCHA",
        }
    }

    /// Name used for abandonment entries. Home is not exit-tracked.
    #[must_use]
    pub fn exit_name(self) -> Option<&'static str> {
        match self {
            Self::Home => None,
            Self::Url => Some("URL Input"),
            Self::Password => Some("Password Input"),
            Self::Checkbox => Some("Checkbox"),
            Self::Range => Some("Range Slider"),
            Self::ColorPicker => Some("Color Picker"),
            Self::DatePicker => Some("Date Picker"),
            Self::File => Some("File Input"),
            Self::Captcha => Some("CAPTCHA"),
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for PageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace(['_', ' '], "-");
        let found = match wanted.as_str() {
            "color-picker" | "colorpicker" => Some(Self::ColorPicker),
            "date-picker" | "datepicker" => Some(Self::DatePicker),
            "upload" | "file-upload" => Some(Self::File),
            "slider" | "range-slider" => Some(Self::Range),
            other => Self::ALL.into_iter().find(|page| page.slug() == other),
        };
        found.ok_or_else(|| Error::unknown_page(s))
    }
}

/// Name and size of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// File name without directories.
    pub name: String,
    /// Size in bytes. Zero when the file could not be read.
    pub size: u64,
}

impl FileMeta {
    /// Create metadata directly.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Read metadata for a path. Missing files keep their name with size 0.
    #[must_use]
    pub fn from_path(raw: &str) -> Self {
        let path = Path::new(raw);
        let name = path
            .file_name()
            .map_or_else(|| raw.to_string(), |n| n.to_string_lossy().into_owned());
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        Self { name, size }
    }
}

/// Parsed form state submitted with an attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PageInput {
    /// Free text, already trimmed.
    Text(String),
    /// Selected toppings in list order.
    Toppings(Vec<String>),
    /// Slider position.
    Level(f64),
    /// Raw color string, uppercased.
    Color(String),
    /// Picked date, if any.
    Date(Option<NaiveDate>),
    /// Chosen file, if any.
    File(Option<FileMeta>),
}

/// How a page judged an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The input was refused and the refusal is logged.
    Rejected {
        /// Text written to the error log.
        message: String,
        /// Extra commentary shown but not logged.
        live: Option<String>,
        /// Whether this counts as a mistake.
        mistake: bool,
    },
    /// The input was fine. It changes nothing.
    Accepted {
        /// Text shown to the player.
        message: String,
        /// Whether the message is also written to the error log.
        logged: bool,
    },
    /// Nothing worth logging happened.
    Ignored {
        /// Optional inline notice.
        note: Option<String>,
    },
}

impl Verdict {
    /// A logged mistake with no commentary.
    #[must_use]
    pub fn mistake(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            live: None,
            mistake: true,
        }
    }
}

/// A repeating chaos notice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaosTimer {
    /// How often the dice are rolled.
    pub period: Duration,
    /// Chance per roll.
    pub chance: f64,
    /// Notice shown when the roll succeeds.
    pub notice: &'static str,
}

/// Per-page behavior plugged into the shared controller.
pub trait PageRules: fmt::Debug {
    /// Which page this is.
    fn id(&self) -> PageId;

    /// Which tally unlocks the page.
    fn counter(&self) -> Counter;

    /// Whether an attempt with this input counts toward the threshold.
    fn counts_attempt(&self, _input: &PageInput) -> bool {
        true
    }

    /// Turn a submitted line into form state.
    fn parse(&self, raw: &str) -> PageInput;

    /// Judge an attempt while the page is locked.
    fn judge(&mut self, input: &PageInput, rng: &mut dyn RngCore) -> Verdict;

    /// Line shown when the page gives up.
    fn unlock_banner(&self) -> &'static str;

    /// Text shown for `:hint`.
    fn hint(&self, progress: &Progress) -> String;

    /// Whether the hint is also read aloud.
    fn hint_spoken(&self) -> bool {
        false
    }

    /// Lines describing the page when it opens.
    fn prompt(&self) -> Vec<String>;

    /// Draw a new challenge. Returns the lines to show, if the page has one.
    fn refresh(&mut self, _rng: &mut dyn RngCore) -> Option<Vec<String>> {
        None
    }

    /// Whether a rejection draws a new challenge.
    fn refresh_on_rejection(&self) -> bool {
        false
    }

    /// Unlogged commentary on the current form state.
    fn live_note(&self, _input: &PageInput, _rng: &mut dyn RngCore) -> Option<String> {
        None
    }

    /// How a mistake entry appears in the on-page list.
    fn panel_line(&self, _mistakes: u32, message: &str) -> String {
        format!("ERROR: {message}")
    }

    /// Sound played on a rejection.
    fn error_tone(&self, _progress: &Progress) -> Tone {
        Tone::growl()
    }

    /// Sound played on success.
    fn success_tone(&self) -> Tone {
        Tone::chime()
    }

    /// Effects added to every locked attempt.
    fn attempt_effects(&self, _progress: &Progress) -> Vec<Effect> {
        Vec::new()
    }

    /// Effects added when the page unlocks.
    fn unlock_effects(&self) -> Vec<Effect> {
        Vec::new()
    }

    /// Effects added when the player leaves.
    fn proceed_effects(&self) -> Vec<Effect> {
        Vec::new()
    }

    /// Leave on unlock without waiting for another attempt.
    fn auto_advance(&self) -> Option<Duration> {
        None
    }

    /// Line shown while leaving.
    fn proceed_message(&self) -> &'static str {
        "Success! Redirecting..."
    }

    /// Override the regular redirect delay.
    fn proceed_delay(&self) -> Option<Duration> {
        None
    }

    /// Whether the page wants the next attempt to leave regardless of state.
    fn wants_exit(&self) -> bool {
        false
    }

    /// Whether rejections go to the durable log.
    fn persists(&self) -> bool {
        true
    }

    /// Chaos timers to run while the page is open.
    fn chaos_timers(&self) -> &'static [ChaosTimer] {
        &[]
    }

    /// Whether a chaos notice may show right now.
    fn chaos_ready(&self, _progress: &Progress) -> bool {
        false
    }

    /// Apply a chaos notice to the form state.
    fn on_chaos(&mut self) {}
}

/// Build the rules for a page.
#[must_use]
pub fn build(id: PageId, game: &GameConfig, rng: &mut dyn RngCore) -> Box<dyn PageRules> {
    match id {
        PageId::Home => Box::new(home::HomeRules::new(rng)),
        PageId::Url => Box::new(url::UrlRules::new()),
        PageId::Password => Box::new(password::PasswordRules::new(Duration::from_millis(
            game.password_delay_ms,
        ))),
        PageId::Checkbox => Box::new(checkbox::CheckboxRules::new()),
        PageId::Range => Box::new(range::RangeRules::new()),
        PageId::ColorPicker => Box::new(color::ColorRules::new(rng, game.color_tolerance)),
        PageId::DatePicker => Box::new(date::DateRules::new()),
        PageId::File => Box::new(file::FileRules::new()),
        PageId::Captcha => Box::new(captcha::CaptchaRules::new(
            rng,
            Duration::from_millis(game.captcha_delay_ms),
        )),
    }
}

/// Quote a list of strings as `"a", "b"`.
pub(crate) fn quoted(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{item}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
