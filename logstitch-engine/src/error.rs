use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Failure of an open call. All failing paths of a batch are reported together.
#[derive(Debug, Error)]
pub enum OpenLogsError {
    #[error("failed to open log files: {}", describe_failures(.0))]
    Files(Vec<FileOpenError>),

    #[error("opening log files was cancelled")]
    Cancelled,
}

impl OpenLogsError {
    /// paths that could not be opened, empty for a cancelled open
    pub fn failed_paths(&self) -> Vec<&Path> {
        match self {
            OpenLogsError::Files(failures) => failures.iter().map(|f| f.path.as_path()).collect(),
            OpenLogsError::Cancelled => Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
#[error("{}: {kind}", .path.display())]
pub struct FileOpenError {
    pub path: PathBuf,
    #[source]
    pub kind: FileErrorKind,
}

impl FileOpenError {
    pub fn new(path: impl Into<PathBuf>, kind: FileErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

#[derive(Debug, Error)]
pub enum FileErrorKind {
    #[error("file does not exist")]
    NotFound,

    #[error("not a regular file")]
    NotAFile,

    #[error("unreadable ({0})")]
    Unreadable(#[source] io::Error),

    #[error("content is not valid {charset}")]
    Undecodable { charset: &'static str },
}

fn describe_failures(failures: &[FileOpenError]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
