//! Cosmetic feedback and timed cues.
//!
//! Pages never touch the terminal directly. They return [`Effect`] values and
//! a [`FeedbackSink`] decides how to render them. Delayed and repeating
//! behavior runs on the [`Scheduler`], which delivers [`Cue`]s over a channel.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::config::FeedbackConfig;
use crate::pages::PageId;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const BELL: &str = "\x07";

/// Oscillator shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Soft, used for success.
    Sine,
    /// Harsh, used for errors.
    Sawtooth,
}

/// Whether a tone celebrates or scolds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    /// Something went wrong.
    Error,
    /// Something went right, for now.
    Success,
}

/// One oscillator voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Frequency at the start, in Hz.
    pub start_hz: f64,
    /// Frequency at the end, in Hz.
    pub end_hz: f64,
    /// Offset from the start of the tone.
    pub offset: Duration,
    /// How long the note rings.
    pub duration: Duration,
    /// Peak gain between 0 and 1.
    pub volume: f64,
}

/// A short synthesized sound.
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    /// What the tone means.
    pub mood: Mood,
    /// The voices, in start order.
    pub notes: Vec<Note>,
}

impl Tone {
    /// Flat 200 Hz buzz that gets louder with every mistake.
    #[must_use]
    pub fn buzz(mistakes: u32) -> Self {
        let volume = (0.2 + f64::from(mistakes) * 0.2).min(1.0);
        Self {
            mood: Mood::Error,
            notes: vec![Note {
                waveform: Waveform::Sawtooth,
                start_hz: 200.0,
                end_hz: 200.0,
                offset: Duration::ZERO,
                duration: Duration::from_millis(500),
                volume,
            }],
        }
    }

    /// Falling 100 Hz to 50 Hz growl.
    #[must_use]
    pub fn growl() -> Self {
        Self {
            mood: Mood::Error,
            notes: vec![Note {
                waveform: Waveform::Sawtooth,
                start_hz: 100.0,
                end_hz: 50.0,
                offset: Duration::ZERO,
                duration: Duration::from_millis(300),
                volume: 0.2,
            }],
        }
    }

    /// Single C5 chime.
    #[must_use]
    pub fn chime() -> Self {
        Self {
            mood: Mood::Success,
            notes: vec![Note {
                waveform: Waveform::Sine,
                start_hz: 523.25,
                end_hz: 523.25,
                offset: Duration::ZERO,
                duration: Duration::from_millis(500),
                volume: 0.3,
            }],
        }
    }

    /// Arpeggiated C major chord.
    #[must_use]
    pub fn chord() -> Self {
        let notes = [523.25, 659.25, 783.99]
            .iter()
            .zip(0u64..)
            .map(|(&hz, i)| Note {
                waveform: Waveform::Sine,
                start_hz: hz,
                end_hz: hz,
                offset: Duration::from_millis(150 * i),
                duration: Duration::from_millis(400),
                volume: 0.3,
            })
            .collect();
        Self {
            mood: Mood::Success,
            notes,
        }
    }

    /// Total length including note offsets.
    #[must_use]
    pub fn length(&self) -> Duration {
        self.notes
            .iter()
            .map(|note| note.offset + note.duration)
            .max()
            .unwrap_or_default()
    }
}

/// Which way the action control is recolored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Green: the page gave up.
    Success,
    /// Red: the input was rejected.
    Danger,
}

/// A cosmetic reaction to an attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Play a sound.
    Tone(Tone),
    /// Shake the form.
    Shake,
    /// Recolor the action control.
    Recolor(Affordance),
    /// Read a line aloud.
    Speak(String),
    /// Celebrate.
    Fireworks,
    /// The action control wobbles nervously.
    Jitter,
}

/// Something that renders effects.
pub trait FeedbackSink {
    /// Render one effect.
    fn emit(&mut self, effect: &Effect);

    /// Render a batch of effects in order.
    fn emit_all(&mut self, effects: &[Effect]) {
        for effect in effects {
            self.emit(effect);
        }
    }
}

/// Renders effects as text, ANSI color and the terminal bell.
#[derive(Debug)]
pub struct TerminalSink<W: Write> {
    out: W,
    settings: FeedbackConfig,
}

impl TerminalSink<std::io::Stdout> {
    /// Sink writing to stdout.
    #[must_use]
    pub fn stdout(settings: FeedbackConfig) -> Self {
        Self::new(std::io::stdout(), settings)
    }
}

impl<W: Write> TerminalSink<W> {
    /// Sink writing to an arbitrary writer.
    pub fn new(out: W, settings: FeedbackConfig) -> Self {
        Self { out, settings }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.settings.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn render(&self, effect: &Effect) -> Option<String> {
        match effect {
            Effect::Tone(_) => self.settings.sound.then(|| BELL.to_string()),
            Effect::Shake => self
                .settings
                .animations
                .then(|| format!("{}\n", self.paint(RED, "  ~~ ≋ *shake* ≋ ~~"))),
            Effect::Recolor(Affordance::Success) => {
                Some(format!("{}\n", self.paint(GREEN, "  [ NEXT ▶ ]")))
            }
            Effect::Recolor(Affordance::Danger) => {
                Some(format!("{}\n", self.paint(RED, "  [ NEXT ✖ ]")))
            }
            Effect::Speak(line) => Some(format!("{}\n", self.paint(MAGENTA, &format!("  🔊 \"{line}\"")))),
            Effect::Fireworks => self.settings.animations.then(|| {
                let burst = ["      .  *  .", "   *  \\ | /  *", " .  -- ✸ --  .", "   *  / | \\  *", "      '  *  '"];
                let painted: Vec<String> = burst.iter().map(|line| self.paint(YELLOW, line)).collect();
                format!("{}\n", painted.join("\n"))
            }),
            Effect::Jitter => self
                .settings
                .animations
                .then(|| "  (the button wobbles nervously)\n".to_string()),
        }
    }
}

impl<W: Write> FeedbackSink for TerminalSink<W> {
    fn emit(&mut self, effect: &Effect) {
        let Some(text) = self.render(effect) else {
            trace!(?effect, "Effect suppressed by settings");
            return;
        };
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            debug!("Failed to render effect: {e}");
        }
    }
}

/// Collects effects for inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Every effect emitted so far.
    pub effects: Vec<Effect>,
}

impl RecordingSink {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the tones of a given mood.
    #[must_use]
    pub fn tones(&self, mood: Mood) -> usize {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Tone(tone) if tone.mood == mood))
            .count()
    }
}

impl FeedbackSink for RecordingSink {
    fn emit(&mut self, effect: &Effect) {
        self.effects.push(effect.clone());
    }
}

/// A message from a timer back to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    /// A random chaos notice for a page.
    Chaos {
        /// Page the timer belongs to.
        page: PageId,
        /// Notice to show.
        notice: &'static str,
    },
    /// Leave a page without waiting for another attempt.
    Advance {
        /// Page that scheduled the advance.
        from: PageId,
    },
}

/// Stop signal shared with a running timer.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    stop_signal: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Create a handle for a timer that is running.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the timer to stop.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }
}

/// Spawns one-shot and repeating cue timers on the tokio runtime.
///
/// Must be used from within a runtime.
#[derive(Debug)]
pub struct Scheduler {
    tx: mpsc::Sender<Cue>,
    rng: StdRng,
    handles: Vec<TimerHandle>,
}

impl Scheduler {
    /// Create a scheduler sending cues on `tx`. `seed` drives timer dice.
    #[must_use]
    pub fn new(tx: mpsc::Sender<Cue>, seed: u64) -> Self {
        Self {
            tx,
            rng: StdRng::seed_from_u64(seed),
            handles: Vec::new(),
        }
    }

    /// Send `cue` once after `delay` unless stopped first.
    pub fn once(&mut self, delay: Duration, cue: Cue) -> TimerHandle {
        let handle = TimerHandle::new();
        let task_handle = handle.clone();
        let tx = self.tx.clone();

        debug!(?cue, ?delay, "Scheduling one-shot cue");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !task_handle.should_stop() {
                let _ = tx.send(cue).await;
            }
        });

        self.handles.push(handle.clone());
        handle
    }

    /// Every `period`, send `cue` with probability `chance` until stopped.
    pub fn every(&mut self, period: Duration, chance: f64, cue: Cue) -> TimerHandle {
        let handle = TimerHandle::new();
        let task_handle = handle.clone();
        let tx = self.tx.clone();
        let mut dice = StdRng::seed_from_u64(self.rng.next_u64());
        let chance = chance.clamp(0.0, 1.0);

        debug!(?cue, ?period, chance, "Scheduling repeating cue");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                ticker.tick().await;
                if task_handle.should_stop() {
                    break;
                }
                if dice.random_bool(chance) && tx.send(cue.clone()).await.is_err() {
                    break;
                }
            }
        });

        self.handles.push(handle.clone());
        handle
    }

    /// Stop every timer spawned so far.
    pub fn stop_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.stop();
        }
    }

    /// Number of timers not yet stopped through this scheduler.
    #[must_use]
    pub fn active(&self) -> usize {
        self.handles.iter().filter(|h| !h.should_stop()).count()
    }
}
