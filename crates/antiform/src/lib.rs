//! `antiform` - An obstacle course of form controls that refuse to cooperate
//!
//! This library provides the pieces of the game: the per-page unlock state
//! machine, the page rules, the persisted error log, the exit tracker, and
//! the print and screenshot renderer. The `antiform` binary plays it in a
//! terminal.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod errorlog;
pub mod logging;
pub mod pages;
pub mod pool;
pub mod render;
pub mod storage;
pub mod tour;
pub mod unlock;

pub use config::Config;
pub use controller::{ExitTracker, PageController, Proceed, Response};
pub use error::{Error, Result};
pub use errorlog::{ErrorLog, ErrorLogEntry};
pub use logging::init_logging;
pub use pages::PageId;
pub use storage::{KeyValueStore, SessionStore, SqliteStore, StorageStats};
pub use tour::{run_interactive, Session, Tour};
pub use unlock::{Counter, UnlockMachine, UnlockState};
