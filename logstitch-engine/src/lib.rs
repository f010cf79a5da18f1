//! # logstitch-engine
//!
//! Ingestion and merge engine for Android-style log files.
//!
//! ## Overview
//!
//! The engine opens a batch of log files, parses each line into a structured
//! [`LogRecord`], groups the files into logical streams (main, system, radio,
//! events) by their names, merges each stream into one chronological sequence
//! and exposes the union of all streams through a movable visible window.
//!
//! ## Core Concepts
//!
//! ### Parser Seam
//!
//! Line parsing is injected through the [`LineParser`] trait. The engine only
//! folds lines: an entry starts a record, anything else continues the
//! previous record (stack traces), or is dropped when nothing precedes it.
//!
//! ### Streams
//!
//! A [`StreamClassifier`] maps file names to a [`StreamKind`] through an
//! ordered rule table. Files matching no rule share the `unknown` stream and
//! are merged together.
//!
//! ### Ordering
//!
//! Records are ordered by timestamp, then by the position of their file in
//! the batch, then by line order within the file. The order is total, so
//! merges are reproducible even when timestamps collide.
//!
//! ### Snapshots
//!
//! An open builds a complete [`LoadedLogs`] snapshot before anything is
//! published. A failed or cancelled open leaves the previous snapshot in place.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logstitch_engine::{
//!     Charset, FileLogsRepository, LineParser, LogEntry, LogsRepository, ProgressReporter,
//! };
//! use std::{path::PathBuf, sync::Arc};
//!
//! struct MyParser;
//!
//! impl LineParser for MyParser {
//!     fn parse_entry(&self, _raw_line: &str) -> Option<LogEntry> {
//!         None
//!     }
//! }
//!
//! struct StderrReporter;
//!
//! impl ProgressReporter for StderrReporter {
//!     fn on_progress(&mut self, percent: u8, description: &str) {
//!         eprintln!("{:>3}% {}", percent, description);
//!     }
//!
//!     fn fail_progress(&mut self) {
//!         eprintln!("failed");
//!     }
//! }
//!
//! let mut repository = FileLogsRepository::with_parser(Arc::new(MyParser));
//! let paths = vec![PathBuf::from("main.txt"), PathBuf::from("system.txt")];
//! repository.open_log_files(&paths, Charset::utf8(), &mut StderrReporter)?;
//!
//! repository.set_first_visible_index(10);
//! for record in repository.currently_opened_logs() {
//!     println!("{} {}", record.tag(), record.message());
//! }
//! # Ok::<(), logstitch_engine::OpenLogsError>(())
//! ```

pub mod provider;

mod charset;
mod error;
mod log_file;
mod merge;
mod repository;
mod stream;

// re-export commonly used types
pub use charset::Charset;
pub use error::{FileErrorKind, FileOpenError, OpenLogsError};
pub use log_file::LogFile;
pub use merge::{flatten_streams, merge_stream, record_order};
pub use provider::{
    CancelFlag, LineParser, LogEntry, LogLevel, LogRecord, ParseOutcome, ProgressReporter,
};
pub use repository::{
    FileLogsRepository, LoadedLogs, LogLoader, LogsRepository, OpenHandle, RepositoryDesc,
    SharedLogsRepository, VisibleWindow, spawn_open_log_files,
};
pub use stream::{LogStream, StreamClassifier, StreamKind};
