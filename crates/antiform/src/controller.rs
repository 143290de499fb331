//! The shared page controller.
//!
//! One controller drives one page visit: it feeds attempts through the
//! unlock machine, asks the page rules for a verdict while locked, appends
//! rejections to the error log, and decides when the player leaves.

use std::time::Duration;

use rand::RngCore;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::effects::{Affordance, Effect};
use crate::error::Result;
use crate::errorlog::{ErrorLog, ErrorLogEntry};
use crate::pages::{PageId, PageInput, PageRules, Verdict};
use crate::render::Panel;
use crate::unlock::{Progress, Step, UnlockMachine, UnlockState};

/// Navigation requested by an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proceed {
    /// Page to open next.
    pub next: PageId,
    /// How long to wait before opening it.
    pub delay: Duration,
}

/// Everything an attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Lines to show the player.
    pub lines: Vec<String>,
    /// Cosmetic effects to play.
    pub effects: Vec<Effect>,
    /// Entries that reached the durable log.
    pub logged: Vec<ErrorLogEntry>,
    /// Page state after the attempt.
    pub state: UnlockState,
    /// Set when the player is leaving.
    pub proceed: Option<Proceed>,
}

impl Response {
    fn new(state: UnlockState) -> Self {
        Self {
            lines: Vec::new(),
            effects: Vec::new(),
            logged: Vec::new(),
            state,
            proceed: None,
        }
    }
}

/// Records a page abandonment at most once per session.
#[derive(Debug, Clone, Copy)]
pub struct ExitTracker {
    exit_name: Option<&'static str>,
    completed: bool,
}

impl ExitTracker {
    /// Track a page. Pages without an exit name are never reported.
    #[must_use]
    pub fn new(exit_name: Option<&'static str>) -> Self {
        Self {
            exit_name,
            completed: false,
        }
    }

    /// The player finished the page. Leaving is no longer abandonment.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    /// Whether the page was finished.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The page is being left. Returns `true` if an abandonment was logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the log or the session flag cannot be written.
    pub fn unload(&self, log: &mut ErrorLog) -> Result<bool> {
        if self.completed {
            return Ok(false);
        }
        let Some(name) = self.exit_name else {
            return Ok(false);
        };
        if log.exit_recorded(name) {
            debug!(page = name, "Abandonment already recorded");
            return Ok(false);
        }

        log.append(ErrorLogEntry::new(
            name,
            format!("User left {name} page without completing the task"),
        ))?;
        log.mark_exit_recorded(name)?;
        info!(page = name, "Recorded page abandonment");
        Ok(true)
    }
}

/// Drives one visit to one page.
#[derive(Debug)]
pub struct PageController {
    rules: Box<dyn PageRules>,
    machine: UnlockMachine,
    panel: Panel,
    exit: ExitTracker,
    redirect_delay: Duration,
}

impl PageController {
    /// Open a page with the given rules.
    #[must_use]
    pub fn new(rules: Box<dyn PageRules>, game: &GameConfig) -> Self {
        let machine = UnlockMachine::new(game.unlock_threshold, rules.counter());
        let exit = ExitTracker::new(rules.id().exit_name());
        Self {
            rules,
            machine,
            panel: Panel::new(),
            exit,
            redirect_delay: Duration::from_millis(game.redirect_delay_ms),
        }
    }

    /// Which page this is.
    #[must_use]
    pub fn page(&self) -> PageId {
        self.rules.id()
    }

    /// The page rules.
    #[must_use]
    pub fn rules(&self) -> &dyn PageRules {
        self.rules.as_ref()
    }

    /// Current tallies.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.machine.progress()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> UnlockState {
        self.machine.state()
    }

    /// The mistake panel.
    #[must_use]
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// The mistake panel, for print swaps.
    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    /// Whether the page was finished.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.exit.is_completed()
    }

    /// Mark the page finished.
    pub fn mark_completed(&mut self) {
        self.exit.mark_completed();
    }

    /// Lines shown when the page opens.
    #[must_use]
    pub fn opening(&self) -> Vec<String> {
        let mut lines = vec![format!("== {} ==", self.page().title())];
        lines.extend(self.rules.prompt());
        lines
    }

    /// Handle one press of the page's primary button.
    pub fn attempt(&mut self, raw: &str, log: &mut ErrorLog, rng: &mut dyn RngCore) -> Response {
        let input = self.rules.parse(raw);
        let mut response = Response::new(self.state());

        if self.rules.wants_exit() {
            self.leave(&mut response);
            return response;
        }

        match self.machine.count_attempt(self.rules.counts_attempt(&input)) {
            Step::Proceed => self.leave(&mut response),
            Step::Unlocked => {
                self.unlocked(&mut response);
                if let Some(delay) = self.rules.auto_advance() {
                    self.exit.mark_completed();
                    response.proceed = Some(Proceed {
                        next: self.page().next(),
                        delay,
                    });
                }
            }
            Step::Validate => self.validate(&input, log, rng, &mut response),
        }

        response.state = self.state();
        response
    }

    fn validate(
        &mut self,
        input: &PageInput,
        log: &mut ErrorLog,
        rng: &mut dyn RngCore,
        response: &mut Response,
    ) {
        let before = self.progress();
        if let Some(note) = self.rules.live_note(input, rng) {
            response.lines.push(note);
        }

        match self.rules.judge(input, rng) {
            Verdict::Rejected {
                message,
                live,
                mistake,
            } => {
                self.persist(&message, log, response);

                response.effects.push(Effect::Tone(self.rules.error_tone(&before)));
                response.effects.push(Effect::Shake);
                response.effects.extend(self.rules.attempt_effects(&before));

                let unlocked = mistake && self.machine.record_mistake();
                let line = self.rules.panel_line(self.progress().mistakes, &message);
                self.panel.push(line.clone());
                response.lines.push(line);
                response.lines.extend(live);

                if self.rules.refresh_on_rejection() {
                    if let Some(lines) = self.rules.refresh(rng) {
                        response.lines.extend(lines);
                    }
                }
                if unlocked {
                    self.unlocked(response);
                }
            }
            Verdict::Accepted { message, logged } => {
                if logged {
                    self.persist(&message, log, response);
                    let line = self.rules.panel_line(self.progress().mistakes, &message);
                    self.panel.push(line);
                }
                response.effects.push(Effect::Tone(self.rules.success_tone()));
                response.lines.push(message);
            }
            Verdict::Ignored { note } => response.lines.extend(note),
        }
    }

    /// Append to the durable log. A failed write costs the entry, never the attempt.
    fn persist(&self, message: &str, log: &mut ErrorLog, response: &mut Response) {
        if !self.rules.persists() {
            return;
        }
        let entry = ErrorLogEntry::new(self.page().log_label(), message);
        match log.append(entry.clone()) {
            Ok(()) => response.logged.push(entry),
            Err(e) => warn!(page = %self.page(), "Could not record error: {e}"),
        }
    }

    fn unlocked(&mut self, response: &mut Response) {
        info!(page = %self.page(), "Page gave up");
        let banner = self.rules.unlock_banner();
        if !banner.is_empty() {
            self.panel.replace(banner);
            response.lines.push(banner.to_string());
        }
        response.effects.push(Effect::Recolor(Affordance::Success));
        response.effects.push(Effect::Tone(self.rules.success_tone()));
        response.effects.extend(self.rules.unlock_effects());
    }

    fn leave(&mut self, response: &mut Response) {
        self.exit.mark_completed();
        response.lines.push(self.rules.proceed_message().to_string());
        response.effects.extend(self.rules.proceed_effects());
        response.proceed = Some(Proceed {
            next: self.page().next(),
            delay: self.rules.proceed_delay().unwrap_or(self.redirect_delay),
        });
    }

    /// The page's hint, and anything it says aloud.
    #[must_use]
    pub fn hint(&self) -> Response {
        let mut response = Response::new(self.state());
        let hint = self.rules.hint(&self.progress());
        if self.rules.hint_spoken() {
            response.effects.push(Effect::Speak(hint.clone()));
        }
        response.lines.push(hint);
        response
    }

    /// A chaos timer fired. Returns the notice if the page let it through.
    pub fn chaos(&mut self, notice: &str) -> Option<String> {
        if !self.rules.chaos_ready(&self.progress()) {
            return None;
        }
        debug!(page = %self.page(), notice, "Chaos");
        self.rules.on_chaos();
        self.panel.push(notice);
        Some(notice.to_string())
    }

    /// Draw a new challenge, for pages that have one.
    pub fn refresh(&mut self, rng: &mut dyn RngCore) -> Option<Vec<String>> {
        self.rules.refresh(rng)
    }

    /// The page is being left.
    ///
    /// # Errors
    ///
    /// Returns an error if the abandonment cannot be recorded.
    pub fn unload(&self, log: &mut ErrorLog) -> Result<bool> {
        self.exit.unload(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Mood;
    use crate::errorlog::tests::{memory_log, BrokenStore};
    use crate::pages::color::{ColorRules, Rgb};
    use crate::pages::{build, password, url};
    use crate::storage::SessionStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open(page: PageId) -> (PageController, StdRng) {
        let mut rng = StdRng::seed_from_u64(17);
        let game = GameConfig::default();
        let rules = build(page, &game, &mut rng);
        (PageController::new(rules, &game), rng)
    }

    fn tones(response: &Response, mood: Mood) -> usize {
        response
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Tone(t) if t.mood == mood))
            .count()
    }

    #[test]
    fn test_unlocks_exactly_once_at_threshold() {
        for page in [PageId::Url, PageId::Checkbox, PageId::Range, PageId::DatePicker, PageId::File] {
            let (mut controller, mut rng) = open(page);
            let mut log = memory_log();
            let mut unlocks = 0;

            for _ in 0..5 {
                let before = controller.state();
                let response = controller.attempt("", &mut log, &mut rng);
                if before == UnlockState::Locked && response.state == UnlockState::Unlocked {
                    unlocks += 1;
                }
            }
            assert_eq!(unlocks, 1, "{page:?}");
            assert_eq!(controller.state(), UnlockState::Unlocked);
        }
    }

    #[test]
    fn test_nothing_logged_after_unlock() {
        let (mut controller, mut rng) = open(PageId::Checkbox);
        let mut log = memory_log();
        for _ in 0..5 {
            controller.attempt("mint", &mut log, &mut rng);
        }
        assert_eq!(log.len(), 5);
        assert!(!controller.is_completed());

        let response = controller.attempt("mint", &mut log, &mut rng);
        assert!(response.logged.is_empty());
        assert_eq!(log.len(), 5);
        assert_eq!(
            response.proceed,
            Some(Proceed {
                next: PageId::Range,
                delay: Duration::from_millis(100),
            })
        );
        assert!(controller.is_completed());
    }

    #[test]
    fn test_mistake_unlock_shows_banner() {
        let (mut controller, mut rng) = open(PageId::Url);
        let mut log = memory_log();
        let mut last = None;
        for _ in 0..5 {
            last = Some(controller.attempt("asdf", &mut log, &mut rng));
        }
        let last = last.unwrap();

        assert_eq!(last.state, UnlockState::Unlocked);
        assert!(last.lines.contains(&"You are not a robot. But passed.".to_string()));
        assert!(last.effects.contains(&Effect::Recolor(Affordance::Success)));
        assert_eq!(tones(&last, Mood::Error), 1);
        assert_eq!(tones(&last, Mood::Success), 1);
        assert_eq!(controller.panel().lines(), ["You are not a robot. But passed.".to_string()]);
    }

    #[test]
    fn test_panel_numbers_mistakes() {
        let (mut controller, mut rng) = open(PageId::Checkbox);
        let mut log = memory_log();
        controller.attempt("", &mut log, &mut rng);
        controller.attempt("", &mut log, &mut rng);
        assert_eq!(controller.panel().lines(), [
            "Error #1: You selected nothing. Are you even trying?".to_string(),
            "Error #2: You selected nothing. Are you even trying?".to_string(),
        ]);
        assert_eq!(log.read_all()[0].page, "CHECKBOX");
    }

    #[test]
    fn test_close_color_logged_but_locked_until_fifth() {
        let game = GameConfig::default();
        let target = Rgb::parse("#3498DB").unwrap();
        let mut controller =
            PageController::new(Box::new(ColorRules::with_target(target, 15.0)), &game);
        let mut log = memory_log();
        let mut rng = StdRng::seed_from_u64(0);

        for i in 1..=4 {
            let response = controller.attempt("#3498DA", &mut log, &mut rng);
            assert_eq!(response.state, UnlockState::Locked, "attempt {i}");
            assert_eq!(response.logged.len(), 1);
            assert_eq!(response.logged[0].error, "Color is close enough!");
            assert_eq!(response.logged[0].page, "COLOR PICKER");
        }

        let fifth = controller.attempt("#3498DA", &mut log, &mut rng);
        assert_eq!(fifth.state, UnlockState::Unlocked);
        assert!(fifth.logged.is_empty());
        assert!(fifth.lines.contains(&"Are you color blind?".to_string()));
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_empty_password_logged_not_counted() {
        let (mut controller, mut rng) = open(PageId::Password);
        let mut log = memory_log();

        let response = controller.attempt("", &mut log, &mut rng);
        assert_eq!(response.logged.len(), 1);
        assert_eq!(response.logged[0].error, password::EMPTY_MESSAGE);
        assert_eq!(response.logged[0].page, "PASSWORD INPUT");
        assert_eq!(controller.progress().attempts, 0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_password_auto_advances() {
        let (mut controller, mut rng) = open(PageId::Password);
        let mut log = memory_log();
        let mut last = None;
        for _ in 0..5 {
            last = Some(controller.attempt("abc", &mut log, &mut rng));
        }
        let last = last.unwrap();

        assert_eq!(log.len(), 4);
        assert_eq!(last.state, UnlockState::Unlocked);
        assert_eq!(
            last.proceed,
            Some(Proceed {
                next: PageId::Checkbox,
                delay: Duration::from_millis(500),
            })
        );
        assert!(controller.is_completed());
    }

    #[test]
    fn test_captcha_celebrates() {
        let (mut controller, mut rng) = open(PageId::Captcha);
        let mut log = memory_log();
        for _ in 0..5 {
            controller.attempt("", &mut log, &mut rng);
        }
        let leaving = controller.attempt("", &mut log, &mut rng);
        assert!(leaving.effects.contains(&Effect::Fireworks));
        assert_eq!(
            leaving.proceed,
            Some(Proceed {
                next: PageId::Home,
                delay: Duration::from_secs(5),
            })
        );
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_home_never_logs() {
        let (mut controller, mut rng) = open(PageId::Home);
        let mut log = memory_log();
        for _ in 0..10 {
            let response = controller.attempt("zzz", &mut log, &mut rng);
            assert_eq!(response.state, UnlockState::Locked);
            assert!(response.proceed.is_none());
        }
        assert!(log.is_empty());
    }

    #[test]
    fn test_rejection_survives_broken_log() {
        let game = GameConfig::default();
        let mut controller = PageController::new(Box::new(url::UrlRules::new()), &game);
        let mut log = ErrorLog::new(Box::new(BrokenStore), Box::new(SessionStore::new()));
        let mut rng = StdRng::seed_from_u64(0);

        let response = controller.attempt("asdf", &mut log, &mut rng);
        assert!(response.logged.is_empty());
        assert_eq!(response.lines.len(), 1);
        assert_eq!(controller.progress().mistakes, 1);
    }

    #[test]
    fn test_two_unloads_one_entry() {
        let (controller, _) = open(PageId::Range);
        let mut log = memory_log();

        assert!(controller.unload(&mut log).unwrap());
        assert!(!controller.unload(&mut log).unwrap());

        let entries = log.read_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].page, "Range Slider");
        assert_eq!(
            entries[0].error,
            "User left Range Slider page without completing the task"
        );
    }

    #[test]
    fn test_clear_reenables_abandonment() {
        let (controller, _) = open(PageId::File);
        let mut log = memory_log();

        assert!(controller.unload(&mut log).unwrap());
        log.clear_all().unwrap();
        assert!(controller.unload(&mut log).unwrap());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_completed_and_home_not_tracked() {
        let mut log = memory_log();

        let (mut finished, _) = open(PageId::Url);
        finished.mark_completed();
        assert!(!finished.unload(&mut log).unwrap());

        let (home, _) = open(PageId::Home);
        assert!(!home.unload(&mut log).unwrap());
        assert!(log.is_empty());
    }

    #[test]
    fn test_spoken_hint() {
        let (controller, _) = open(PageId::DatePicker);
        let hint = controller.hint();
        assert_eq!(hint.lines, vec!["Trigger 5 more errors to reboot system.".to_string()]);
        assert_eq!(
            hint.effects,
            vec![Effect::Speak("Trigger 5 more errors to reboot system.".to_string())]
        );
    }

    #[test]
    fn test_chaos_gated_by_rules() {
        let (mut controller, mut rng) = open(PageId::Checkbox);
        let mut log = memory_log();
        assert!(controller.chaos("⚠️ Checkboxes frozen. System needs to thaw.").is_none());

        controller.attempt("", &mut log, &mut rng);
        assert_eq!(
            controller.chaos("⚠️ Checkboxes frozen. System needs to thaw."),
            Some("⚠️ Checkboxes frozen. System needs to thaw.".to_string())
        );
        assert_eq!(controller.panel().lines().len(), 2);
    }
}
