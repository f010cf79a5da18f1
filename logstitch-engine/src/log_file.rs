use crate::{
    charset::Charset,
    error::{FileErrorKind, FileOpenError},
    provider::{LineParser, LogEntry, LogRecord, ParseOutcome},
    stream::{StreamClassifier, StreamKind},
};
use memmap2::MmapOptions;
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

/// a file that was read and parsed during an open call
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
    charset: Charset,
    stream: StreamKind,
    records: Vec<Arc<LogRecord>>,
}

impl LogFile {
    pub(crate) fn new(
        path: PathBuf,
        charset: Charset,
        stream: StreamKind,
        records: Vec<Arc<LogRecord>>,
    ) -> Self {
        Self {
            path,
            charset,
            stream,
            records,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn stream(&self) -> StreamKind {
        self.stream
    }

    /// records in file order
    pub fn records(&self) -> &[Arc<LogRecord>] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// read, decode, classify and parse one file
pub(crate) fn read_log_file(
    path: &Path,
    file_index: usize,
    charset: Charset,
    parser: &dyn LineParser,
    classifier: &StreamClassifier,
) -> Result<LogFile, FileOpenError> {
    let content = read_decoded(path, charset)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let stream = classifier.classify(&file_name);

    let origin: Arc<Path> = Arc::from(path);
    let records = parse_lines(&content, parser, |entry, sequence| {
        LogRecord::new(entry, origin.clone(), file_index, sequence, stream)
    });

    log::debug!(
        "Parsed {} records from {} (stream '{}')",
        records.len(),
        path.display(),
        stream
    );

    Ok(LogFile::new(path.to_path_buf(), charset, stream, records))
}

/// fold the lines of one file into records, carrying the pending entry forward
pub(crate) fn parse_lines<F>(
    content: &str,
    parser: &dyn LineParser,
    mut anchor: F,
) -> Vec<Arc<LogRecord>>
where
    F: FnMut(LogEntry, usize) -> LogRecord,
{
    let mut records = Vec::new();
    let mut pending: Option<LogEntry> = None;

    for raw_line in content.lines() {
        match parser.parse_line(raw_line, pending.as_ref()) {
            ParseOutcome::Entry(entry) => {
                if let Some(done) = pending.replace(entry) {
                    let sequence = records.len();
                    records.push(Arc::new(anchor(done, sequence)));
                }
            }
            ParseOutcome::Continuation => {
                if let Some(entry) = pending.as_mut() {
                    // lines() leaves the '\r' of a last line or a "\r\r\n" ending
                    entry.append_continuation(raw_line.trim_end_matches('\r'));
                }
            }
            ParseOutcome::Discarded => {}
        }
    }

    if let Some(done) = pending {
        let sequence = records.len();
        records.push(Arc::new(anchor(done, sequence)));
    }

    records
}

fn read_decoded(path: &Path, charset: Charset) -> Result<String, FileOpenError> {
    let fail = |kind| FileOpenError::new(path, kind);

    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => fail(FileErrorKind::NotFound),
        _ => fail(FileErrorKind::Unreadable(e)),
    })?;

    if !metadata.is_file() {
        return Err(fail(FileErrorKind::NotAFile));
    }

    // zero-length files cannot be mapped
    if metadata.len() == 0 {
        return Ok(String::new());
    }

    let file = File::open(path).map_err(|e| fail(FileErrorKind::Unreadable(e)))?;
    let mmap = unsafe { MmapOptions::new().map(&file) }
        .map_err(|e| fail(FileErrorKind::Unreadable(e)))?;

    charset
        .decode(&mmap)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            fail(FileErrorKind::Undecodable {
                charset: charset.name(),
            })
        })
}
