//! URL page: a text field that finds something wrong with every address.

use std::sync::LazyLock;

use rand::RngCore;
use regex::Regex;

use super::{PageId, PageInput, PageRules, Verdict};
use crate::effects::Tone;
use crate::pool::MessagePool;
use crate::unlock::{Counter, Progress};

static WWW_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(https?://)?www\.?\s*$").expect("valid www pattern"));

static LOOKS_VALID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?[a-zA-Z0-9-]+\.[a-zA-Z]{2,}").expect("valid domain pattern")
});

const FORBIDDEN: &[char] = &['<', '>', '"', '{', '}', '|', '\\', '^', '`', ' '];

const EMPTY: &[&str] = &[
    "It's LeviOsa, not LeviOWWWsa! …Wait, wrong spell—that URL's still invalid.",
    "Did you mean www.whatdidyoutype.com? This doesn't look like a real website.",
    "Our crystal ball sees an almost-URL… but not quite. Add something like google.com.",
    "Nope, not magic enough yet. Try site.com instead of just www.",
    "Domain? More like do-mainly-missing… please include a proper website like example.com.",
    "Abra-cadabra! But seriously, where's the domain, like google.com?",
    "Mischief detected: URL still invalid. Try something like example.com.",
];

const MISSING_PROTOCOL: &[&str] = &[
    "\"{}\" - You forgot the https://. Did you think it was optional?",
    "\"{}\" - You forgot the .com Did you think it was optional?",
    "Typing \"{}\" without https:// is like showing up naked.",
    "\"{}\" needs https:// but you already knew that, right?",
    "I'm looking at \"{}\" and wondering where the https:// went.",
];

const MISSING_WWW: &[&str] = &[
    "\"{}\" is missing www. It's literally THREE characters.",
    "You typed all of \"{}\" but forgot www? Seriously?",
    "\"{}\" - So close yet so far. Add the www already.",
    "Almost had it with \"{}\" but no www. Try again.",
];

const MISSING_DOT: &[&str] = &[
    "\"{}\" has no dot. URLs need dots. Basic stuff.",
    "Looking at \"{}\" - where's the dot? Did it run away?",
    "\"{}\" without a dot is like soup without salt.",
    "You typed \"{}\" and thought dots were optional?",
];

const INVALID_FORMAT: &[&str] = &[
    "\"{}\" is not even close to a valid URL.",
    "I've seen random keyboard smashes better than \"{}\".",
    "\"{}\" - What even is this?",
    "Did you just make up \"{}\" and hope for the best?",
];

const WEBSITE_NOT_EXIST: &[&str] = &[
    "\"{}\" doesn't exist. Shocking, I know.",
    "Typed \"{}\" perfectly but it's still wrong. Ouch.",
    "\"{}\" is properly formatted garbage.",
    "Nice try with \"{}\" but that website is imaginary.",
];

/// Why an address was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlFlaw {
    /// No `www.` anywhere.
    MissingWww,
    /// No `http://` or `https://` prefix.
    MissingProtocol,
    /// The domain has no dot.
    MissingDot,
    /// Nothing after the protocol, forbidden characters, or stray dots.
    InvalidFormat,
    /// Structurally fine. Still imaginary.
    WebsiteNotExist,
}

impl UrlFlaw {
    fn pool(self) -> &'static [&'static str] {
        match self {
            Self::MissingWww => MISSING_WWW,
            Self::MissingProtocol => MISSING_PROTOCOL,
            Self::MissingDot => MISSING_DOT,
            Self::InvalidFormat => INVALID_FORMAT,
            Self::WebsiteNotExist => WEBSITE_NOT_EXIST,
        }
    }
}

/// Find the first structural problem with a non-empty address.
#[must_use]
pub fn diagnose(url: &str) -> UrlFlaw {
    if !url.contains("www.") {
        return UrlFlaw::MissingWww;
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return UrlFlaw::MissingProtocol;
    }

    let after_protocol = url.find("://").map_or("", |i| &url[i + 3..]);
    if after_protocol.is_empty() {
        return UrlFlaw::InvalidFormat;
    }

    let domain = after_protocol.split('/').next().unwrap_or_default();
    if !domain.contains('.') {
        return UrlFlaw::MissingDot;
    }
    if url.contains(FORBIDDEN) {
        return UrlFlaw::InvalidFormat;
    }
    if url.contains("..") || domain.starts_with('.') || domain.ends_with('.') {
        return UrlFlaw::InvalidFormat;
    }
    UrlFlaw::WebsiteNotExist
}

/// Rules for the URL page.
#[derive(Debug, Clone)]
pub struct UrlRules {
    empty: MessagePool,
}

impl UrlRules {
    /// Create the page rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            empty: MessagePool::new(EMPTY),
        }
    }

    fn humiliate(flaw: UrlFlaw, url: &str, rng: &mut dyn RngCore) -> String {
        MessagePool::new(flaw.pool()).pick_with(rng, url)
    }
}

impl Default for UrlRules {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRules for UrlRules {
    fn id(&self) -> PageId {
        PageId::Url
    }

    fn counter(&self) -> Counter {
        Counter::Mistakes
    }

    fn parse(&self, raw: &str) -> PageInput {
        PageInput::Text(raw.trim().to_string())
    }

    fn judge(&mut self, input: &PageInput, rng: &mut dyn RngCore) -> Verdict {
        let PageInput::Text(url) = input else {
            return Verdict::Ignored { note: None };
        };

        if url.is_empty() {
            return Verdict::mistake(self.empty.pick_fresh(rng));
        }
        if WWW_ONLY.is_match(url) {
            return Verdict::Ignored {
                note: Some("You forgot to include the domain (e.g., google.com).".to_string()),
            };
        }
        if LOOKS_VALID.is_match(url) {
            return Verdict::mistake(format!(
                "This website does not exist. Type another URL. {}",
                Self::humiliate(UrlFlaw::WebsiteNotExist, url, rng)
            ));
        }

        match diagnose(url) {
            UrlFlaw::WebsiteNotExist => Verdict::mistake(format!(
                "This website does not exist. Type another URL. {}",
                Self::humiliate(UrlFlaw::WebsiteNotExist, url, rng)
            )),
            flaw => Verdict::mistake(Self::humiliate(flaw, url, rng)),
        }
    }

    fn unlock_banner(&self) -> &'static str {
        "You are not a robot. But passed."
    }

    fn hint(&self, _progress: &Progress) -> String {
        "Click 5 times to proceed".to_string()
    }

    fn prompt(&self) -> Vec<String> {
        vec![
            "Enter a website URL.".to_string(),
            "Type an address and press Enter. :hint if you dare.".to_string(),
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn judge(raw: &str) -> Verdict {
        let mut rules = UrlRules::new();
        let mut rng = StdRng::seed_from_u64(11);
        let input = rules.parse(raw);
        rules.judge(&input, &mut rng)
    }

    fn message(verdict: Verdict) -> String {
        match verdict {
            Verdict::Rejected { message, mistake, .. } => {
                assert!(mistake);
                message
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_diagnose_priority() {
        assert_eq!(diagnose("google.com"), UrlFlaw::MissingWww);
        assert_eq!(diagnose("https://google"), UrlFlaw::MissingWww);
        assert_eq!(diagnose("www.google.com"), UrlFlaw::MissingProtocol);
        assert_eq!(diagnose("https://www"), UrlFlaw::MissingWww);
        assert_eq!(diagnose("https://www.google"), UrlFlaw::WebsiteNotExist);
        assert_eq!(diagnose("https://www..com"), UrlFlaw::InvalidFormat);
        assert_eq!(diagnose("https://www.goo gle.com"), UrlFlaw::InvalidFormat);
        assert_eq!(diagnose("https://www.google.com."), UrlFlaw::InvalidFormat);
        assert_eq!(diagnose("http://www.example.com/path"), UrlFlaw::WebsiteNotExist);
    }

    #[test]
    fn test_diagnose_missing_dot() {
        assert_eq!(diagnose("https://wwwx/www.a"), UrlFlaw::MissingDot);
    }

    #[test]
    fn test_empty_uses_fresh_pool() {
        let mut rules = UrlRules::new();
        let mut rng = StdRng::seed_from_u64(2);
        let input = rules.parse("   ");

        let seen: HashSet<String> = (0..EMPTY.len())
            .map(|_| message(rules.judge(&input, &mut rng)))
            .collect();
        assert_eq!(seen.len(), EMPTY.len());
    }

    #[test]
    fn test_www_only_is_ignored() {
        for raw in ["www", "www.", "https://www.", "WWW."] {
            assert_eq!(
                judge(raw),
                Verdict::Ignored {
                    note: Some("You forgot to include the domain (e.g., google.com).".to_string())
                }
            );
        }
    }

    #[test]
    fn test_real_looking_domain_does_not_exist() {
        let msg = message(judge("google.com"));
        assert!(msg.starts_with("This website does not exist. Type another URL. "));
        assert!(msg.contains("\"google.com\""));
    }

    #[test]
    fn test_protocol_without_www() {
        let msg = message(judge("https://wwwx"));
        assert!(MISSING_WWW
            .iter()
            .any(|t| crate::pool::fill(t, "https://wwwx") == msg));
    }

    #[test]
    fn test_missing_www_pool() {
        let pool = UrlFlaw::MissingWww.pool();
        assert_eq!(pool.len(), 4);
        assert_eq!(
            crate::pool::fill(pool[3], "example.com"),
            "Almost had it with \"example.com\" but no www. Try again."
        );
    }

    #[test]
    fn test_garbage_is_invalid_www() {
        let msg = message(judge("asdf"));
        assert!(msg.contains("\"asdf\""));
        assert!(msg.contains("www"));
    }

    #[test]
    fn test_counter_and_tones() {
        let rules = UrlRules::new();
        assert_eq!(rules.counter(), Counter::Mistakes);
        let progress = Progress {
            attempts: 3,
            mistakes: 2,
            threshold: 5,
            state: crate::unlock::UnlockState::Locked,
        };
        assert!((rules.error_tone(&progress).notes[0].volume - 0.6).abs() < 1e-9);
        assert_eq!(rules.hint(&progress), "Click 5 times to proceed");
    }
}
