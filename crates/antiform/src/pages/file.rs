//! File upload page: a validator that always finds one more thing wrong.

use std::time::Duration;

use rand::{Rng, RngCore};

use super::{ChaosTimer, FileMeta, PageId, PageInput, PageRules, Verdict};
use crate::effects::{Effect, Tone};
use crate::pool::MessagePool;
use crate::unlock::{Counter, Progress, UnlockState};

const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "jpeg", "png", "gif", "svg", "indd"];

const MAX_BYTES: u64 = 5 * 1024 * 1024;
const MIN_BYTES: u64 = 1024;
const FICKLE_CHANCE: f64 = 0.15;
const NERVOUS_CHANCE: f64 = 0.3;

/// Logged when the button is pressed with nothing selected.
pub const NO_FILE: &str = "No file selected. Choose a file first.";

const CHAOS: &[ChaosTimer] = &[
    ChaosTimer {
        period: Duration::from_secs(6),
        chance: 0.04,
        notice: "⚠️ Browser lost focus. Input reset. Classic browser move.",
    },
    ChaosTimer {
        period: Duration::from_secs(5),
        chance: 0.03,
        notice: "⚠️ Server got bored waiting. File evaporated. Select again!",
    },
];

const WRONG_FORMAT: &[&str] = &[
    "\"{}\" - PNG format not detected. Did you mean to upload a .png?",
    "\"{}\" - SVG interpreter failed. Try a .jpeg instead.",
    "\"{}\" - PDF parser failed. Maybe upload a .docx?",
    "\"{}\" - GIF sequencer failed. Switch to .jpeg.",
    "\"{}\" - PPT loader failed. Try .pdf instead.",
    "\"{}\" - AI file failed. Upload .svg instead.",
    "\"{}\" - PSD file failed. Try .ai maybe?",
    "\"{}\" - INDD parser failed. Upload .psd instead.",
    "Really? \"{}\"? That's not even a valid format.",
    "\"{}\" is garbage. Upload something real.",
];

const TOO_BIG: &[&str] = &[
    "\"{}\" is way too big. Did you upload a movie?",
    "File \"{}\" is THICC. Too thicc for us.",
    "\"{}\" ate the whole internet. Compress it.",
    "Server looked at \"{}\" and said \"absolutely not.\"",
    "\"{}\" needs its own zip code. It's massive.",
];

const TOO_SMALL: &[&str] = &[
    "\"{}\" is suspiciously small. Is it even a file?",
    "\"{}\" is basically invisible. Add some content.",
    "Is \"{}\" just air? It weighs nothing.",
    "\"{}\" is on a diet. Too skinny to process.",
];

const HAS_SPACES: &[&str] = &[
    "\"{}\" has spaces. System from 1995 can't handle it.",
    "Spaces in \"{}\" broke everything. Use underscores.",
    "\"{}\" - Those spaces? System hates them.",
    "File \"{}\" needs to remove spaces. Use _ or -",
];

const FORMAT_NOT_ACCEPTED: &[&str] = &[
    "\"{}\" - Sorry, .jpg files are not accepted at this time.",
    "\"{}\" - .png format is temporarily unavailable. Try something else.",
    "\"{}\" - We don't support .pdf files right now. Use a different format.",
    "\"{}\" - .gif files blocked by security policy. Try .jpeg instead.",
    "\"{}\" - .svg files are not allowed. Upload .png instead.",
    "\"{}\" - .docx format disabled. System update broke it.",
    "\"{}\" - .jpeg files causing server issues. Try .png.",
    "\"{}\" - .indd files rejected. Upload .pdf instead.",
    "\"{}\" - That file type is on the naughty list today.",
];

const CANNOT_LOCATE: &[&str] = &[
    "Cannot locate '{}'. Check spelling and reselect the file.",
    "File '{}' not found. Did you move it?",
    "System cannot find '{}'. Verify the file exists.",
    "'{}' is missing. Please reselect the file.",
    "Unable to locate '{}'. File may have been deleted.",
    "'{}' disappeared. Check file location and try again.",
];

const SERVER_ERROR: &[&str] = &[
    "Server error processing request. Contact support.",
    "Internal server error while uploading '{}'. Try again later.",
    "Server encountered an error. Unable to process '{}'.",
    "Upload failed: Server error 500. Contact administrator.",
    "Server crashed processing '{}'. Please retry.",
    "Backend service unavailable. Cannot upload '{}' right now.",
];

/// What the validator objected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFlaw {
    /// No extension, or one outside the accepted list.
    WrongFormat,
    /// Spaces in the name.
    HasSpaces,
    /// An accepted extension, refused anyway.
    FormatNotAccepted,
    /// Over 5 MiB.
    TooBig,
    /// Under 1 KiB.
    TooSmall,
    /// Extension not in lowercase.
    CapsLock,
    /// Nothing wrong. The file still cannot be found.
    CannotLocate,
    /// Nothing wrong. The server still fails.
    ServerError,
}

impl FileFlaw {
    fn message(self, name: &str, rng: &mut dyn RngCore) -> String {
        let pool = match self {
            Self::WrongFormat => WRONG_FORMAT,
            Self::HasSpaces => HAS_SPACES,
            Self::FormatNotAccepted => FORMAT_NOT_ACCEPTED,
            Self::TooBig => TOO_BIG,
            Self::TooSmall => TOO_SMALL,
            Self::CannotLocate => CANNOT_LOCATE,
            Self::ServerError => SERVER_ERROR,
            Self::CapsLock => {
                return format!(
                    "CAPS LOCK DETECTED! \"{name}\" needs lowercase extension. Calm down."
                )
            }
        };
        MessagePool::new(pool).pick_with(rng, name)
    }
}

/// Run the validator over a chosen file.
pub fn inspect(file: &FileMeta, rng: &mut dyn RngCore) -> FileFlaw {
    let name = file.name.as_str();
    let Some((_, extension)) = name.rsplit_once('.') else {
        return FileFlaw::WrongFormat;
    };
    if name.contains(' ') {
        return FileFlaw::HasSpaces;
    }

    let lowered = extension.to_lowercase();
    if !ACCEPTED_EXTENSIONS.contains(&lowered.as_str()) {
        return FileFlaw::WrongFormat;
    }
    if rng.random_bool(FICKLE_CHANCE) {
        return FileFlaw::FormatNotAccepted;
    }
    if file.size > MAX_BYTES {
        return FileFlaw::TooBig;
    }
    if file.size < MIN_BYTES {
        return FileFlaw::TooSmall;
    }
    if extension != lowered {
        return FileFlaw::CapsLock;
    }

    if rng.random_bool(0.5) {
        FileFlaw::CannotLocate
    } else {
        FileFlaw::ServerError
    }
}

/// Rules for the file upload page.
#[derive(Debug, Clone, Default)]
pub struct FileRules {
    selected: Option<FileMeta>,
    nervous: bool,
}

impl FileRules {
    /// Create the page rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The file currently selected, if the browser has not lost it.
    #[must_use]
    pub fn selected(&self) -> Option<&FileMeta> {
        self.selected.as_ref()
    }
}

impl PageRules for FileRules {
    fn id(&self) -> PageId {
        PageId::File
    }

    fn counter(&self) -> Counter {
        Counter::Mistakes
    }

    /// A path selects a new file. An empty line resubmits the current one.
    fn parse(&self, raw: &str) -> PageInput {
        let raw = raw.trim();
        if raw.is_empty() {
            PageInput::File(self.selected.clone())
        } else {
            PageInput::File(Some(FileMeta::from_path(raw)))
        }
    }

    fn judge(&mut self, input: &PageInput, rng: &mut dyn RngCore) -> Verdict {
        let PageInput::File(file) = input else {
            return Verdict::Ignored { note: None };
        };
        self.selected.clone_from(file);
        self.nervous = rng.random_bool(NERVOUS_CHANCE);

        match file {
            None => Verdict::mistake(NO_FILE),
            Some(file) => Verdict::mistake(inspect(file, rng).message(&file.name, rng)),
        }
    }

    fn unlock_banner(&self) -> &'static str {
        "Well done, champ—your file name was wrong. STUPID!"
    }

    fn hint(&self, _progress: &Progress) -> String {
        "Click 5 times to proceed".to_string()
    }

    fn prompt(&self) -> Vec<String> {
        vec![
            "Upload your file.".to_string(),
            "Enter a path to a file. An empty line resubmits the current file.".to_string(),
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
        if progress.attempts < 3 && self.nervous {
            vec![Effect::Jitter]
        } else {
            Vec::new()
        }
    }

    fn chaos_timers(&self) -> &'static [ChaosTimer] {
        CHAOS
    }

    fn chaos_ready(&self, progress: &Progress) -> bool {
        progress.state == UnlockState::Locked && self.selected.is_some()
    }

    fn on_chaos(&mut self) {
        self.selected = None;
    }
}
