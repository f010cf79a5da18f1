//! Parser and progress traits the repository is driven by.
//!
//! This module defines the seams between the engine and its collaborators:
//!
//! - [`LineParser`]: turns one raw text line into a [`LogEntry`]
//! - [`ProgressReporter`]: receives progress and failure callbacks
//! - [`CancelFlag`]: lets a caller stop an in-flight open
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   parse_line()    ┌──────────────┐
//! │  LineParser  │ ────────────────> │ ParseOutcome │ (entry / continuation / discard)
//! └──────────────┘                   └──────┬───────┘
//!                                           │ fold per file
//!                                           │
//! ┌──────────────────┐  on_progress()  ┌────▼─────┐
//! │ ProgressReporter │ <────────────── │  loader  │
//! └──────────────────┘                 └──────────┘
//! ```
//!
//! The parser never sees files or other lines: the previous entry of the
//! same file is handed in, so every file can be parsed independently.

mod log_item;

pub use log_item::{LogEntry, LogLevel, LogRecord};

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Result of parsing one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// the line starts a new entry
    Entry(LogEntry),
    /// the line belongs to the previous entry's message
    Continuation,
    /// the line is not a log line and there is nothing to attach it to
    Discarded,
}

/// Trait for turning raw log lines into structured entries.
///
/// Implementations must be pure: the same line with the same previous entry
/// always produces the same outcome, and no I/O happens here.
///
/// # Contract
///
/// - A line matching the structured format yields [`ParseOutcome::Entry`]
/// - An unmatched line yields [`ParseOutcome::Continuation`] when `previous`
///   is `Some`, and [`ParseOutcome::Discarded`] otherwise
///
/// # Examples
///
/// ```rust
/// use logstitch_engine::{LineParser, LogEntry, ParseOutcome};
///
/// struct NothingMatches;
///
/// impl LineParser for NothingMatches {
///     fn parse_entry(&self, _raw_line: &str) -> Option<LogEntry> {
///         None
///     }
/// }
///
/// assert_eq!(NothingMatches.parse_line("hello", None), ParseOutcome::Discarded);
/// ```
pub trait LineParser: Send + Sync {
    /// Parse a line that starts a new entry, `None` if it does not match.
    fn parse_entry(&self, raw_line: &str) -> Option<LogEntry>;

    /// Classify a raw line given the pending entry of the same file.
    fn parse_line(&self, raw_line: &str, previous: Option<&LogEntry>) -> ParseOutcome {
        match self.parse_entry(raw_line) {
            Some(entry) => ParseOutcome::Entry(entry),
            None if previous.is_some() => ParseOutcome::Continuation,
            None => ParseOutcome::Discarded,
        }
    }
}

/// Receives progress of an open operation.
///
/// Implemented by the caller. Callbacks are always delivered from the thread
/// that drives the open, never from parser workers, so implementations do
/// not need interior mutability.
///
/// `on_progress` is called zero or more times with a non-decreasing
/// percentage; `fail_progress` is called exactly once if the open fails.
pub trait ProgressReporter {
    fn on_progress(&mut self, percent: u8, description: &str);

    fn fail_progress(&mut self);
}

/// Shared stop signal for an in-flight open.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
