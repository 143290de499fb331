//! The interactive driver.
//!
//! A [`Tour`] owns the session and the page being visited. It is synchronous
//! and fully testable; [`run_interactive`] wires it to stdin, stdout and the
//! timer channel.

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{Config, FeedbackConfig, GameConfig};
use crate::controller::{PageController, Proceed};
use crate::effects::{Cue, Effect, FeedbackSink, Scheduler, TerminalSink};
use crate::error::Result;
use crate::errorlog::ErrorLog;
use crate::pages::{self, PageId};
use crate::render::{export_snapshot, SCREENSHOT_FAILED, SCREENSHOT_SAVED};

/// Shown after `:clear`.
pub const CLEARED: &str = "All error logs have been cleared. You can start fresh!";

const HELP: &[&str] = &[
    "Type an answer and press Enter to submit it.",
    "  :hint        show a hint",
    "  :print       show every logged error",
    "  :screenshot  save the error log to a file",
    "  :reload      reload this page",
    "  :refresh     new images (CAPTCHA and Home)",
    "  :clear       clear the error log (Home only)",
    "  :start       go to the first obstacle",
    "  :quit        leave",
];

/// What one player lives with for a whole run.
#[derive(Debug)]
pub struct Session {
    /// The durable error log and its session flags.
    pub log: ErrorLog,
    /// Dice for pages and message pools.
    pub rng: StdRng,
    /// Cosmetic feedback switches.
    pub settings: FeedbackConfig,
}

impl Session {
    /// Start a session with a seeded RNG.
    #[must_use]
    pub fn new(log: ErrorLog, seed: u64, settings: FeedbackConfig) -> Self {
        Self {
            log,
            rng: StdRng::seed_from_u64(seed),
            settings,
        }
    }
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a command is an attempt on the current page.
    Attempt(String),
    /// `:hint`
    Hint,
    /// `:print`
    Print,
    /// `:screenshot`
    Screenshot,
    /// `:reload`
    Reload,
    /// `:refresh`
    Refresh,
    /// `:clear`
    Clear,
    /// `:start`
    Start,
    /// `:quit`
    Quit,
    /// `:help`
    Help,
    /// A `:` word nobody knows.
    Unknown(String),
}

impl Command {
    /// Parse one line. Attempts keep their text untouched.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(word) = trimmed.strip_prefix(':') else {
            return Self::Attempt(line.to_string());
        };
        match word.to_lowercase().as_str() {
            "hint" | "h" => Self::Hint,
            "print" | "p" => Self::Print,
            "screenshot" | "shot" => Self::Screenshot,
            "reload" => Self::Reload,
            "refresh" | "r" => Self::Refresh,
            "clear" => Self::Clear,
            "start" => Self::Start,
            "quit" | "q" | "exit" => Self::Quit,
            "help" | "?" => Self::Help,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}

/// What the driver should do after one input or cue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Lines to print.
    pub lines: Vec<String>,
    /// Effects to play.
    pub effects: Vec<Effect>,
    /// A delayed advance to schedule.
    pub advance: Option<Proceed>,
    /// Set when a new page was opened and its timers need arming.
    pub opened: Option<PageId>,
    /// Set when the player is done.
    pub quit: bool,
}

/// A run through the pages.
#[derive(Debug)]
pub struct Tour {
    session: Session,
    game: GameConfig,
    screenshot_dir: PathBuf,
    controller: PageController,
    leaving: bool,
}

impl Tour {
    /// Open `start`.
    #[must_use]
    pub fn new(config: &Config, mut session: Session, start: PageId) -> Self {
        let rules = pages::build(start, &config.game, &mut session.rng);
        let controller = PageController::new(rules, &config.game);
        info!(page = %start, "Tour started");
        Self {
            session,
            game: config.game.clone(),
            screenshot_dir: config.screenshot_dir(),
            controller,
            leaving: false,
        }
    }

    /// Page being visited.
    #[must_use]
    pub fn page(&self) -> PageId {
        self.controller.page()
    }

    /// The current visit.
    #[must_use]
    pub fn controller(&self) -> &PageController {
        &self.controller
    }

    /// The session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether an advance is already scheduled.
    #[must_use]
    pub fn is_leaving(&self) -> bool {
        self.leaving
    }

    /// The current page's heading and prompt.
    #[must_use]
    pub fn opening(&self) -> Vec<String> {
        self.controller.opening()
    }

    /// Handle one input line.
    pub fn submit(&mut self, line: &str) -> Outcome {
        let command = Command::parse(line);
        debug!(?command, page = %self.page(), "Input");
        match command {
            Command::Attempt(raw) => self.attempt(&raw),
            Command::Hint => {
                let response = self.controller.hint();
                Outcome {
                    lines: response.lines,
                    effects: response.effects,
                    ..Outcome::default()
                }
            }
            Command::Print => self.print(),
            Command::Screenshot => self.screenshot(),
            Command::Reload => self.navigate(self.page()),
            Command::Refresh => match self.controller.refresh(&mut self.session.rng) {
                Some(lines) => lines.into(),
                None => vec!["Nothing to refresh here.".to_string()].into(),
            },
            Command::Clear => self.clear(),
            Command::Start => self.navigate(PageId::Url),
            Command::Quit => self.quit(),
            Command::Help => HELP.iter().map(|s| (*s).to_string()).collect::<Vec<_>>().into(),
            Command::Unknown(word) => vec![format!("Unknown command {word}. Try :help")].into(),
        }
    }

    fn attempt(&mut self, raw: &str) -> Outcome {
        if self.leaving {
            return Outcome::default();
        }
        let response = self
            .controller
            .attempt(raw, &mut self.session.log, &mut self.session.rng);
        if response.proceed.is_some() {
            self.leaving = true;
        }
        Outcome {
            lines: response.lines,
            effects: response.effects,
            advance: response.proceed,
            ..Outcome::default()
        }
    }

    fn print(&mut self) -> Outcome {
        let entries = self.session.log.read_all();
        let panel = self.controller.panel_mut();
        panel.begin_print(&entries);
        let mut lines = vec!["--- Print preview ---".to_string()];
        lines.extend(panel.lines().iter().cloned());
        panel.end_print();
        lines.into()
    }

    fn screenshot(&self) -> Outcome {
        let entries = self.session.log.read_all();
        let line = match export_snapshot(&entries, &self.screenshot_dir) {
            Ok(path) => format!("{SCREENSHOT_SAVED} ({})", path.display()),
            Err(e) => {
                warn!("Screenshot failed: {e}");
                SCREENSHOT_FAILED.to_string()
            }
        };
        vec![line].into()
    }

    fn clear(&mut self) -> Outcome {
        if self.page() != PageId::Home {
            return vec!["The error log can only be cleared from the Home page.".to_string()].into();
        }
        let line = match self.session.log.clear_all() {
            Ok(()) => CLEARED.to_string(),
            Err(e) => {
                warn!("Failed to clear error log: {e}");
                "Could not clear the error log.".to_string()
            }
        };
        vec![line].into()
    }

    fn quit(&mut self) -> Outcome {
        self.unload();
        info!(page = %self.page(), "Tour ended");
        Outcome {
            lines: vec!["Bye.".to_string()],
            quit: true,
            ..Outcome::default()
        }
    }

    fn unload(&mut self) {
        if let Err(e) = self.controller.unload(&mut self.session.log) {
            warn!(page = %self.page(), "Failed to record abandonment: {e}");
        }
    }

    /// Leave the current page and open `to`.
    pub fn navigate(&mut self, to: PageId) -> Outcome {
        self.unload();
        let rules = pages::build(to, &self.game, &mut self.session.rng);
        self.controller = PageController::new(rules, &self.game);
        self.leaving = false;
        info!(page = %to, "Opened page");
        Outcome {
            lines: self.opening(),
            opened: Some(to),
            ..Outcome::default()
        }
    }

    /// Handle a timer cue. Cues for pages no longer on screen are dropped.
    pub fn cue(&mut self, cue: Cue) -> Outcome {
        match cue {
            Cue::Chaos { page, notice } if page == self.page() => self
                .controller
                .chaos(notice)
                .map(|line| Outcome::from(vec![line]))
                .unwrap_or_default(),
            Cue::Advance { from } if from == self.page() && self.leaving => {
                self.navigate(from.next())
            }
            stale => {
                debug!(?stale, "Dropped stale cue");
                Outcome::default()
            }
        }
    }
}

impl From<Vec<String>> for Outcome {
    fn from(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }
}

fn arm_chaos(tour: &Tour, scheduler: &mut Scheduler) {
    scheduler.stop_all();
    if !tour.session().settings.chaos {
        return;
    }
    let page = tour.page();
    for timer in tour.controller().rules().chaos_timers() {
        scheduler.every(timer.period, timer.chance, Cue::Chaos {
            page,
            notice: timer.notice,
        });
    }
}

fn show<S: FeedbackSink>(outcome: &Outcome, sink: &mut S) {
    for line in &outcome.lines {
        println!("{line}");
    }
    sink.emit_all(&outcome.effects);
}

fn prompt() {
    print!("> ");
    if let Err(e) = std::io::stdout().flush() {
        debug!("Failed to flush prompt: {e}");
    }
}

/// Play in the terminal until `:quit`, end of input or Ctrl-C.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub async fn run_interactive(config: &Config, log: ErrorLog, start: PageId, seed: u64) -> Result<()> {
    let session = Session::new(log, seed, config.feedback.clone());
    let mut tour = Tour::new(config, session, start);
    let input = BufReader::new(tokio::io::stdin()).lines();
    play(&mut tour, input, seed, tokio::signal::ctrl_c()).await
}

/// Drive `tour` from `input` and its timers until the player leaves.
///
/// `interrupt` resolving counts as leaving, like closing the tab: the page
/// is unloaded and may record its abandonment.
///
/// # Errors
///
/// Returns an error if `input` cannot be read. The page is unloaded first.
pub async fn play<R, F>(tour: &mut Tour, mut input: Lines<R>, seed: u64, interrupt: F) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = std::io::Result<()>>,
{
    let (tx, mut rx) = mpsc::channel(32);
    let mut scheduler = Scheduler::new(tx, seed);
    let mut sink = TerminalSink::stdout(tour.session().settings.clone());
    tokio::pin!(interrupt);
    let mut listening = true;

    show(&Outcome::from(tour.opening()), &mut sink);
    arm_chaos(tour, &mut scheduler);

    loop {
        prompt();
        let outcome = tokio::select! {
            line = input.next_line() => match line {
                Ok(Some(line)) => tour.submit(&line),
                Ok(None) => tour.submit(":quit"),
                Err(e) => {
                    tour.submit(":quit");
                    scheduler.stop_all();
                    return Err(e.into());
                }
            },
            Some(cue) = rx.recv() => {
                println!();
                tour.cue(cue)
            }
            signal = &mut interrupt, if listening => match signal {
                Ok(()) => {
                    println!();
                    info!(page = %tour.page(), "Interrupted");
                    tour.submit(":quit")
                }
                Err(e) => {
                    warn!("Cannot listen for Ctrl-C: {e}");
                    listening = false;
                    Outcome::default()
                }
            },
        };

        show(&outcome, &mut sink);
        if let Some(proceed) = outcome.advance {
            scheduler.once(proceed.delay, Cue::Advance { from: tour.page() });
        }
        if outcome.opened.is_some() {
            arm_chaos(tour, &mut scheduler);
        }
        if outcome.quit {
            break;
        }
    }

    scheduler.stop_all();
    Ok(())
}
