//! The logs repository: the state a viewer renders.
//!
//! A repository owns the files, streams and flattened view produced by the
//! last successful open, plus a visible window over the flattened view.
//! New state is always built in isolation by a [`LogLoader`] and swapped in
//! whole, so a reader sees either the old snapshot or the new one.

mod background;
mod loader;
mod window;

pub use background::{OpenHandle, SharedLogsRepository, spawn_open_log_files};
pub use loader::{LoadedLogs, LogLoader};
pub use window::VisibleWindow;

use crate::{
    charset::Charset,
    error::OpenLogsError,
    log_file::LogFile,
    provider::{CancelFlag, LineParser, LogRecord, ProgressReporter},
    stream::{LogStream, StreamClassifier, StreamKind},
};
use std::{path::PathBuf, sync::Arc};

// constants
const DEFAULT_PARALLEL_SORT_THRESHOLD: usize = 1000;

#[derive(Clone)]
pub struct RepositoryDesc {
    pub parser: Arc<dyn LineParser>,
    pub classifier: StreamClassifier,
    /// streams larger than this are sorted with rayon
    pub parallel_sort_threshold: usize,
}

impl RepositoryDesc {
    pub fn new(parser: Arc<dyn LineParser>) -> Self {
        Self {
            parser,
            classifier: StreamClassifier::new(),
            parallel_sort_threshold: DEFAULT_PARALLEL_SORT_THRESHOLD,
        }
    }
}

/// What a viewer needs from the engine: open files, read the result, move the window.
pub trait LogsRepository {
    /// Replace the current state with the content of `paths`.
    ///
    /// # Errors
    ///
    /// Fails with [`OpenLogsError`] when any path cannot be opened or decoded.
    /// `reporter.fail_progress()` fires and the previous state stays published.
    fn open_log_files(
        &mut self,
        paths: &[PathBuf],
        charset: Charset,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<(), OpenLogsError>;

    /// streams in the order they were first seen among the opened files
    fn available_streams(&self) -> &[LogStream];

    /// files that produced at least one record
    fn currently_opened_log_files(&self) -> &[LogFile];

    /// the visible part of the all-streams chronological view
    fn currently_opened_logs(&self) -> &[Arc<LogRecord>];

    fn first_visible_index(&self) -> usize;

    /// negative values reset to 0
    fn set_first_visible_index(&mut self, index: i64);

    fn last_visible_index(&self) -> usize;

    /// negative values reset to the last record
    fn set_last_visible_index(&mut self, index: i64);
}

pub struct FileLogsRepository {
    loader: Arc<LogLoader>,
    snapshot: Arc<LoadedLogs>,
    window: VisibleWindow,
}

impl FileLogsRepository {
    pub fn new(desc: RepositoryDesc) -> Self {
        Self {
            loader: Arc::new(LogLoader::new(desc)),
            snapshot: Arc::new(LoadedLogs::default()),
            window: VisibleWindow::default(),
        }
    }

    pub fn with_parser(parser: Arc<dyn LineParser>) -> Self {
        Self::new(RepositoryDesc::new(parser))
    }

    /// the loader this repository opens files with, usable without holding the repository
    pub fn loader(&self) -> Arc<LogLoader> {
        self.loader.clone()
    }

    /// [`LogsRepository::open_log_files`] with a cancel flag checked between files and phases
    pub fn open_log_files_with_cancel(
        &mut self,
        paths: &[PathBuf],
        charset: Charset,
        reporter: &mut dyn ProgressReporter,
        cancel: &CancelFlag,
    ) -> Result<(), OpenLogsError> {
        let loader = self.loader.clone();
        match loader.load(paths, charset, reporter, cancel) {
            Ok(loaded) => {
                self.publish(loaded);
                reporter.on_progress(100, "Done");
                Ok(())
            }
            Err(e) => {
                log::warn!("Open failed: {}", e);
                reporter.fail_progress();
                Err(e)
            }
        }
    }

    /// swap in a new snapshot and reset the window to its full range
    pub fn publish(&mut self, loaded: LoadedLogs) {
        log::info!(
            "Opened {} file(s), {} stream(s), {} record(s)",
            loaded.files.len(),
            loaded.streams.len(),
            loaded.logs.len()
        );
        self.window = VisibleWindow::full(loaded.logs.len());
        self.snapshot = Arc::new(loaded);
    }

    /// the published snapshot, shared so it can outlive the next open
    pub fn snapshot(&self) -> Arc<LoadedLogs> {
        self.snapshot.clone()
    }

    pub fn stream(&self, kind: StreamKind) -> Option<&LogStream> {
        self.snapshot.streams.iter().find(|s| s.kind() == kind)
    }

    /// size of the flattened view, ignoring the window
    pub fn total_logs(&self) -> usize {
        self.snapshot.logs.len()
    }

    pub fn window(&self) -> VisibleWindow {
        self.window
    }
}

impl LogsRepository for FileLogsRepository {
    fn open_log_files(
        &mut self,
        paths: &[PathBuf],
        charset: Charset,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<(), OpenLogsError> {
        self.open_log_files_with_cancel(paths, charset, reporter, &CancelFlag::new())
    }

    fn available_streams(&self) -> &[LogStream] {
        &self.snapshot.streams
    }

    fn currently_opened_log_files(&self) -> &[LogFile] {
        &self.snapshot.files
    }

    fn currently_opened_logs(&self) -> &[Arc<LogRecord>] {
        self.window.slice(&self.snapshot.logs)
    }

    fn first_visible_index(&self) -> usize {
        self.window.first()
    }

    fn set_first_visible_index(&mut self, index: i64) {
        self.window.set_first(index);
    }

    fn last_visible_index(&self) -> usize {
        self.window.last()
    }

    fn set_last_visible_index(&mut self, index: i64) {
        let len = self.snapshot.logs.len();
        self.window.set_last(index, len);
    }
}
