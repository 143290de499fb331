//! The persisted error log.
//!
//! Every page appends its rejections here, and the print and screenshot
//! renderers replay it. The log is a JSON array of `{page, error, timestamp}`
//! objects stored under one durable key. Abandonment flags live in the
//! session store so each page is reported at most once per session.
//!
//! The log is best-effort. A missing or corrupt value reads as an empty log.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DEFAULT_LOG_KEY;
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Prefix of the session keys that record an abandonment.
pub const EXIT_FLAG_PREFIX: &str = "exitRecorded_";

/// One rejected attempt or abandonment event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    /// Human-readable label of the originating page.
    pub page: String,
    /// What went wrong, in the game's words.
    pub error: String,
    /// When the entry was created.
    #[serde(with = "millis")]
    pub timestamp: DateTime<Utc>,
}

impl ErrorLogEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(page: impl Into<String>, error: impl Into<String>) -> Self {
        Self::at(page, error, Utc::now())
    }

    /// Create an entry with an explicit timestamp.
    #[must_use]
    pub fn at(page: impl Into<String>, error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            page: page.into(),
            error: error.into(),
            timestamp,
        }
    }

    /// The timestamp as it is written to storage.
    #[must_use]
    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
mod millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Session key of the abandonment flag for a page.
#[must_use]
pub fn exit_flag_key(page: &str) -> String {
    format!("{EXIT_FLAG_PREFIX}{page}")
}

/// Durable error log plus the session's abandonment flags.
#[derive(Debug)]
pub struct ErrorLog {
    local: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
    key: String,
}

impl ErrorLog {
    /// Create a log over the given durable and session stores.
    #[must_use]
    pub fn new(local: Box<dyn KeyValueStore>, session: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(local, session, DEFAULT_LOG_KEY)
    }

    /// Create a log stored under a custom durable key.
    #[must_use]
    pub fn with_key(
        local: Box<dyn KeyValueStore>,
        session: Box<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            local,
            session,
            key: key.into(),
        }
    }

    /// The durable key the log lives under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append an entry to the end of the log.
    ///
    /// Reads the whole log, pushes the entry, and writes it back. A corrupt
    /// stored value is replaced rather than reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable store cannot be written.
    pub fn append(&mut self, entry: ErrorLogEntry) -> Result<()> {
        let mut entries = self.read_all();
        debug!(page = %entry.page, error = %entry.error, "Appending error log entry");
        entries.push(entry);

        let encoded = serde_json::to_string(&entries)?;
        self.local.set(&self.key, &encoded)
    }

    /// Read the whole log in append order.
    ///
    /// Never fails. Storage or parse errors yield an empty log.
    #[must_use]
    pub fn read_all(&self) -> Vec<ErrorLogEntry> {
        let raw = match self.local.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Error log unreadable, treating as empty: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error log corrupt, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Number of entries in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_all().len()
    }

    /// Check whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_all().is_empty()
    }

    /// Remove the durable log and every abandonment flag.
    ///
    /// # Errors
    ///
    /// Returns an error if either store cannot be written.
    pub fn clear_all(&mut self) -> Result<()> {
        self.local.remove(&self.key)?;

        let flags: Vec<String> = self
            .session
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(EXIT_FLAG_PREFIX))
            .collect();
        for flag in &flags {
            self.session.remove(flag)?;
        }

        info!("Cleared error log and {} exit flags", flags.len());
        Ok(())
    }

    /// Whether an abandonment was already recorded for `page` this session.
    #[must_use]
    pub fn exit_recorded(&self, page: &str) -> bool {
        match self.session.get(&exit_flag_key(page)) {
            Ok(flag) => flag.is_some(),
            Err(e) => {
                warn!("Session store unreadable: {e}");
                false
            }
        }
    }

    /// Record that an abandonment was logged for `page` this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub fn mark_exit_recorded(&mut self, page: &str) -> Result<()> {
        self.session.set(&exit_flag_key(page), "true")
    }
}
