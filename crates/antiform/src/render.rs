//! Print and screenshot rendering of the error log.
//!
//! The print layout temporarily swaps a page's mistake panel for the whole
//! log. The snapshot card is a standalone text file written atomically.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::errorlog::ErrorLogEntry;

/// Shown when the log is empty.
pub const NO_ERRORS: &str = "No errors recorded.";

/// Player feedback after a successful export.
pub const SCREENSHOT_SAVED: &str = "Screenshot saved!";

/// Player feedback after a failed export.
pub const SCREENSHOT_FAILED: &str = "Screenshot failed. Try again.";

const CARD_TITLE: &str = "Browser Characteristics - Error Log";
const CARD_SUBTITLE: &str = "All Errors Across All Pages:";

// Snapshots taken within one second get `-1`, `-2`, ... suffixes up to this.
const MAX_SUFFIX: u32 = 100;

/// Lines shown while printing: every entry, numbered across all pages.
#[must_use]
pub fn print_layout(entries: &[ErrorLogEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec![NO_ERRORS.to_string()];
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("[{}] Error #{}: {}", entry.page, i + 1, entry.error))
        .collect()
}

/// The on-page mistake list.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    lines: Vec<String>,
    saved: Option<Vec<String>>,
}

impl Panel {
    /// Create an empty panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Replace everything with a single line.
    pub fn replace(&mut self, line: impl Into<String>) {
        self.lines.clear();
        self.lines.push(line.into());
    }

    /// Current lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Check whether the print layout is showing.
    #[must_use]
    pub fn is_printing(&self) -> bool {
        self.saved.is_some()
    }

    /// Swap in the print layout. Calling it twice keeps the first saved contents.
    pub fn begin_print(&mut self, entries: &[ErrorLogEntry]) {
        let layout = print_layout(entries);
        let previous = std::mem::replace(&mut self.lines, layout);
        if self.saved.is_none() {
            self.saved = Some(previous);
        }
    }

    /// Restore the panel as it was before printing.
    pub fn end_print(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.lines = saved;
        }
    }
}

/// The screenshot card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotCard {
    /// Heading.
    pub title: &'static str,
    /// Subheading.
    pub subtitle: &'static str,
    /// One line per entry, or the empty-log notice.
    pub lines: Vec<String>,
}

impl fmt::Display for SnapshotCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .lines
            .iter()
            .map(|l| l.chars().count())
            .chain([self.title.len(), self.subtitle.len()])
            .max()
            .unwrap_or(0);
        let rule = "=".repeat(width);

        writeln!(f, "{rule}")?;
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "{}", self.subtitle)?;
        writeln!(f)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "{rule}")
    }
}

/// Build the screenshot card for a log.
#[must_use]
pub fn snapshot_card(entries: &[ErrorLogEntry]) -> SnapshotCard {
    let lines = if entries.is_empty() {
        vec![NO_ERRORS.to_string()]
    } else {
        entries
            .iter()
            .map(|entry| format!("[{}] {}", entry.page, entry.error))
            .collect()
    };
    SnapshotCard {
        title: CARD_TITLE,
        subtitle: CARD_SUBTITLE,
        lines,
    }
}

/// File name for a snapshot taken at `at`, to the second.
#[must_use]
pub fn snapshot_file_name(at: DateTime<Utc>) -> String {
    format!("browser-errors-{}.txt", at.format("%Y-%m-%dT%H-%M-%S"))
}

/// Write the snapshot card into `dir`.
///
/// The card is written to a temporary file first and moved into place
/// without replacing anything, so a failed export never leaves a partial file
/// and two exports in the same second both survive.
///
/// # Errors
///
/// Returns [`Error::Screenshot`] if the directory cannot be created or the
/// file cannot be written.
pub fn export_snapshot(entries: &[ErrorLogEntry], dir: &Path) -> Result<PathBuf> {
    export_snapshot_at(entries, dir, Utc::now())
}

fn export_snapshot_at(entries: &[ErrorLogEntry], dir: &Path, at: DateTime<Utc>) -> Result<PathBuf> {
    let name = snapshot_file_name(at);
    let first = dir.join(&name);
    std::fs::create_dir_all(dir).map_err(|e| Error::screenshot(&first, e))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::screenshot(&first, e))?;
    writeln!(file, "{}", snapshot_card(entries)).map_err(|e| Error::screenshot(&first, e))?;
    debug!(temp = %file.path().display(), "Snapshot written");

    let stem = name.trim_end_matches(".txt");
    for n in 0..MAX_SUFFIX {
        let path = if n == 0 {
            first.clone()
        } else {
            dir.join(format!("{stem}-{n}.txt"))
        };
        match file.persist_noclobber(&path) {
            Ok(_) => {
                info!(path = %path.display(), entries = entries.len(), "Snapshot exported");
                return Ok(path);
            }
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => file = e.file,
            Err(e) => return Err(Error::screenshot(&path, e.error)),
        }
    }
    Err(Error::screenshot(
        &first,
        std::io::Error::new(std::io::ErrorKind::AlreadyExists, "too many snapshots this second"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entries() -> Vec<ErrorLogEntry> {
        vec![
            ErrorLogEntry::new("URL", "\"x\" has no dot."),
            ErrorLogEntry::new("CHECKBOX", "You selected nothing. Are you even trying?"),
        ]
    }

    #[test]
    fn test_print_layout_numbers_across_pages() {
        assert_eq!(print_layout(&entries()), vec![
            "[URL] Error #1: \"x\" has no dot.".to_string(),
            "[CHECKBOX] Error #2: You selected nothing. Are you even trying?".to_string(),
        ]);
    }

    #[test]
    fn test_print_layout_empty() {
        assert_eq!(print_layout(&[]), vec![NO_ERRORS.to_string()]);
    }

    #[test]
    fn test_panel_print_round_trip() {
        let mut panel = Panel::new();
        panel.push("Error #1: first");
        panel.begin_print(&entries());
        assert!(panel.is_printing());
        assert_eq!(panel.lines().len(), 2);

        panel.begin_print(&[]);
        assert_eq!(panel.lines(), [NO_ERRORS.to_string()]);

        panel.end_print();
        assert!(!panel.is_printing());
        assert_eq!(panel.lines(), ["Error #1: first".to_string()]);
    }

    #[test]
    fn test_panel_replace() {
        let mut panel = Panel::new();
        panel.push("a");
        panel.push("b");
        panel.replace("Can you count?");
        assert_eq!(panel.lines(), ["Can you count?".to_string()]);
    }

    #[test]
    fn test_snapshot_card() {
        let card = snapshot_card(&entries());
        assert_eq!(card.title, "Browser Characteristics - Error Log");
        assert_eq!(card.subtitle, "All Errors Across All Pages:");
        assert_eq!(card.lines[0], "[URL] \"x\" has no dot.");

        let text = card.to_string();
        assert!(text.contains("All Errors Across All Pages:"));
        assert!(text.contains("[CHECKBOX] You selected nothing."));

        assert_eq!(snapshot_card(&[]).lines, vec![NO_ERRORS.to_string()]);
    }

    #[test]
    fn test_snapshot_file_name() {
        let at = Utc.with_ymd_and_hms(2025, 12, 10, 9, 5, 7).unwrap();
        assert_eq!(snapshot_file_name(at), "browser-errors-2025-12-10T09-05-07.txt");
    }

    #[test]
    fn test_export_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("shots");
        let path = export_snapshot(&entries(), &out).unwrap();

        assert!(path.starts_with(&out));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("==="));
        assert!(text.contains("[URL] \"x\" has no dot."));
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn test_same_second_exports_keep_both() {
        let dir = tempfile::tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2025, 12, 10, 9, 5, 7).unwrap();

        let first = export_snapshot_at(&entries(), dir.path(), at).unwrap();
        let second = export_snapshot_at(&entries()[..1], dir.path(), at).unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with("browser-errors-2025-12-10T09-05-07.txt"));
        assert!(second.ends_with("browser-errors-2025-12-10T09-05-07-1.txt"));
        assert!(std::fs::read_to_string(&first).unwrap().contains("[CHECKBOX]"));
        assert!(!std::fs::read_to_string(&second).unwrap().contains("[CHECKBOX]"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_export_snapshot_into_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let err = export_snapshot(&entries(), &blocker).unwrap_err();
        assert!(matches!(err, Error::Screenshot { .. }));
    }
}
