use crate::stream::StreamKind;
use chrono::NaiveDateTime;
use std::{fmt, path::Path, sync::Arc};

/// log priority, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Assert,
}

impl LogLevel {
    /// map a priority letter to a level, `None` for anything outside `V D I W E F A`
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'V' => Some(Self::Verbose),
            'D' => Some(Self::Debug),
            'I' => Some(Self::Info),
            'W' => Some(Self::Warn),
            'E' => Some(Self::Error),
            'F' => Some(Self::Fatal),
            'A' => Some(Self::Assert),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Self::Verbose => 'V',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
            Self::Fatal => 'F',
            Self::Assert => 'A',
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// a parsed log entry that is not yet bound to its source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub pid: u32,
    pub tid: u32,
    pub level: LogLevel,
    pub tag: String,
    pub message: String,
}

impl LogEntry {
    /// stitch a continuation line onto the message, keeping the line break
    pub(crate) fn append_continuation(&mut self, raw_line: &str) {
        self.message.push('\n');
        self.message.push_str(raw_line);
    }
}

/// one logical log entry anchored to the file it was read from
///
/// Records are immutable once built and are shared between their file,
/// their stream and the flattened view.
#[derive(Debug, Clone)]
pub struct LogRecord {
    entry: LogEntry,
    origin: Arc<Path>,
    file_index: usize,
    sequence: usize,
    stream: StreamKind,
}

impl LogRecord {
    pub(crate) fn new(
        entry: LogEntry,
        origin: Arc<Path>,
        file_index: usize,
        sequence: usize,
        stream: StreamKind,
    ) -> Self {
        Self {
            entry,
            origin,
            file_index,
            sequence,
            stream,
        }
    }

    pub fn entry(&self) -> &LogEntry {
        &self.entry
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.entry.timestamp
    }

    pub fn pid(&self) -> u32 {
        self.entry.pid
    }

    pub fn tid(&self) -> u32 {
        self.entry.tid
    }

    pub fn level(&self) -> LogLevel {
        self.entry.level
    }

    pub fn tag(&self) -> &str {
        &self.entry.tag
    }

    pub fn message(&self) -> &str {
        &self.entry.message
    }

    /// path of the file this record was parsed from
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// position of the origin file in the batch passed to the open call
    pub fn file_index(&self) -> usize {
        self.file_index
    }

    /// index of the record within its origin file, unique per file
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn stream(&self) -> StreamKind {
        self.stream
    }
}
