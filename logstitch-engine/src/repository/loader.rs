use crate::{
    charset::Charset,
    error::{FileOpenError, OpenLogsError},
    log_file::{LogFile, read_log_file},
    merge::{flatten_streams, merge_stream},
    provider::{CancelFlag, LineParser, LogRecord, ProgressReporter},
    repository::RepositoryDesc,
    stream::{LogStream, StreamClassifier, StreamKind},
};
use itertools::Itertools;
use rayon::prelude::*;
use std::{
    panic,
    path::Path,
    sync::{Arc, mpsc},
    thread,
};

// progress split between the phases of a load
const READ_PHASE_END: usize = 80;
const MERGE_PHASE_END: usize = 95;

/// everything one successful open produced, built before it is published
#[derive(Debug, Clone, Default)]
pub struct LoadedLogs {
    pub(crate) files: Vec<LogFile>,
    pub(crate) streams: Vec<LogStream>,
    pub(crate) logs: Vec<Arc<LogRecord>>,
}

impl LoadedLogs {
    pub fn files(&self) -> &[LogFile] {
        &self.files
    }

    pub fn streams(&self) -> &[LogStream] {
        &self.streams
    }

    pub fn logs(&self) -> &[Arc<LogRecord>] {
        &self.logs
    }
}

/// reads, parses, classifies and merges a batch of files
pub struct LogLoader {
    parser: Arc<dyn LineParser>,
    classifier: StreamClassifier,
    parallel_sort_threshold: usize,
}

impl LogLoader {
    pub fn new(desc: RepositoryDesc) -> Self {
        Self {
            parser: desc.parser,
            classifier: desc.classifier,
            parallel_sort_threshold: desc.parallel_sort_threshold,
        }
    }

    /// Build a new snapshot from `paths` without touching any published state.
    ///
    /// Files are parsed in parallel; progress is reported from the calling
    /// thread as each file completes. Every path that fails is collected into
    /// [`OpenLogsError::Files`]. `reporter.fail_progress()` is left to the caller.
    pub fn load<P>(
        &self,
        paths: &[P],
        charset: Charset,
        reporter: &mut dyn ProgressReporter,
        cancel: &CancelFlag,
    ) -> Result<LoadedLogs, OpenLogsError>
    where
        P: AsRef<Path> + Sync,
    {
        log::debug!(
            "Loading {} log file(s) with charset {}",
            paths.len(),
            charset
        );
        reporter.on_progress(0, "Opening log files");

        let files = self.read_all(paths, charset, reporter, cancel)?;
        let streams = self.merge_all(&files, reporter, cancel)?;

        reporter.on_progress(MERGE_PHASE_END as u8, "Sorting all streams");
        let logs = flatten_streams(&streams);

        if cancel.is_cancelled() {
            return Err(OpenLogsError::Cancelled);
        }

        Ok(LoadedLogs {
            files,
            streams,
            logs,
        })
    }

    fn read_all<P>(
        &self,
        paths: &[P],
        charset: Charset,
        reporter: &mut dyn ProgressReporter,
        cancel: &CancelFlag,
    ) -> Result<Vec<LogFile>, OpenLogsError>
    where
        P: AsRef<Path> + Sync,
    {
        let total = paths.len();
        let (done_tx, done_rx) = mpsc::channel::<String>();

        // workers only send file names; progress is reported here so it stays ordered
        let joined = thread::scope(|scope| {
            let worker = scope.spawn(move || {
                paths
                    .par_iter()
                    .enumerate()
                    .map_with(done_tx, |done_tx, (file_index, path)| {
                        if cancel.is_cancelled() {
                            return None;
                        }
                        let path = path.as_ref();
                        let result = read_log_file(
                            path,
                            file_index,
                            charset,
                            self.parser.as_ref(),
                            &self.classifier,
                        );
                        let _ = done_tx.send(display_name(path));
                        Some(result)
                    })
                    .collect::<Vec<_>>()
            });

            for (done, name) in done_rx.iter().enumerate() {
                let percent = (done + 1) * READ_PHASE_END / total.max(1);
                reporter.on_progress(percent as u8, &format!("Reading {}", name));
            }

            worker.join()
        });

        let results = joined.unwrap_or_else(|payload| panic::resume_unwind(payload));

        if cancel.is_cancelled() {
            log::debug!("Load cancelled while reading files");
            return Err(OpenLogsError::Cancelled);
        }

        let (files, failures): (Vec<LogFile>, Vec<FileOpenError>) =
            results.into_iter().flatten().partition_result();

        if !failures.is_empty() {
            for failure in &failures {
                log::warn!("Cannot open log file {}", failure);
            }
            return Err(OpenLogsError::Files(failures));
        }

        let read = files.len();
        let files: Vec<LogFile> = files.into_iter().filter(|f| !f.is_empty()).collect();
        if files.len() < read {
            log::debug!("Dropped {} file(s) without records", read - files.len());
        }

        Ok(files)
    }

    fn merge_all(
        &self,
        files: &[LogFile],
        reporter: &mut dyn ProgressReporter,
        cancel: &CancelFlag,
    ) -> Result<Vec<LogStream>, OpenLogsError> {
        let kinds: Vec<StreamKind> = files.iter().map(|f| f.stream()).unique().collect();
        let mut streams = Vec::with_capacity(kinds.len());

        for (i, kind) in kinds.iter().enumerate() {
            if cancel.is_cancelled() {
                log::debug!("Load cancelled while merging streams");
                return Err(OpenLogsError::Cancelled);
            }

            let group: Vec<&LogFile> = files.iter().filter(|f| f.stream() == *kind).collect();
            if let Some(stream) = merge_stream(*kind, &group, self.parallel_sort_threshold) {
                streams.push(stream);
            }

            let percent =
                READ_PHASE_END + (i + 1) * (MERGE_PHASE_END - READ_PHASE_END) / kinds.len();
            reporter.on_progress(percent as u8, &format!("Merging {} stream", kind));
        }

        Ok(streams)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
