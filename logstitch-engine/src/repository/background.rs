use super::FileLogsRepository;
use crate::{
    charset::Charset,
    error::OpenLogsError,
    provider::{CancelFlag, ProgressReporter},
};
use std::{
    panic,
    path::PathBuf,
    sync::{Arc, PoisonError, RwLock},
    thread,
};

/// a repository readers and a background open can share
pub type SharedLogsRepository = Arc<RwLock<FileLogsRepository>>;

/// handle on an open running in the background
pub struct OpenHandle {
    handle: thread::JoinHandle<Result<(), OpenLogsError>>,
    cancel: CancelFlag,
}

impl OpenHandle {
    /// ask the open to stop; it fails with [`OpenLogsError::Cancelled`] and publishes nothing
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// wait for the open to complete
    pub fn join(self) -> Result<(), OpenLogsError> {
        self.handle
            .join()
            .unwrap_or_else(|payload| panic::resume_unwind(payload))
    }
}

/// Spawns a thread that opens `paths` and publishes the result into `repository`.
///
/// The files are loaded without holding the lock; the write lock is taken only
/// to swap the finished snapshot in, so readers keep seeing the old state until
/// then. The reporter gets its progress calls followed by either a final
/// `on_progress(100, ..)` or exactly one `fail_progress()`.
pub fn spawn_open_log_files<R>(
    repository: SharedLogsRepository,
    paths: Vec<PathBuf>,
    charset: Charset,
    mut reporter: R,
) -> OpenHandle
where
    R: ProgressReporter + Send + 'static,
{
    let cancel = CancelFlag::new();
    let cancel_clone = cancel.clone();

    let handle = thread::spawn(move || {
        log::debug!("Open thread started");

        let loader = repository
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loader();

        let result = loader
            .load(paths.as_slice(), charset, &mut reporter, &cancel_clone)
            .and_then(|loaded| {
                let mut repository = repository.write().unwrap_or_else(PoisonError::into_inner);
                // last chance to cancel before the swap
                if cancel_clone.is_cancelled() {
                    return Err(OpenLogsError::Cancelled);
                }
                repository.publish(loaded);
                Ok(())
            });

        match &result {
            Ok(()) => reporter.on_progress(100, "Done"),
            Err(e) => {
                log::warn!("Open failed: {}", e);
                reporter.fail_progress();
            }
        }

        log::debug!("Open thread stopped");
        result
    });

    OpenHandle { handle, cancel }
}
