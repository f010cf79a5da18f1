use crate::{
    log_file::LogFile,
    provider::LogRecord,
    stream::{LogStream, StreamKind},
};
use itertools::Itertools;
use rayon::prelude::*;
use std::{cmp::Ordering, sync::Arc};

/// total order over records: timestamp, then file arrival, then line order
pub fn record_order(a: &LogRecord, b: &LogRecord) -> Ordering {
    a.timestamp()
        .cmp(&b.timestamp())
        .then_with(|| a.file_index().cmp(&b.file_index()))
        .then_with(|| a.sequence().cmp(&b.sequence()))
}

/// merge every file of one stream into a single sorted sequence
///
/// returns `None` when the files hold no records, so empty streams are never published
pub fn merge_stream(
    kind: StreamKind,
    files: &[&LogFile],
    parallel_threshold: usize,
) -> Option<LogStream> {
    let mut records: Vec<Arc<LogRecord>> = files
        .iter()
        .flat_map(|file| file.records().iter().cloned())
        .collect();

    if records.is_empty() {
        return None;
    }

    // both sorts are stable
    if records.len() > parallel_threshold {
        records.par_sort_by(|a, b| record_order(a, b));
    } else {
        records.sort_by(|a, b| record_order(a, b));
    }

    log::debug!(
        "Merged {} file(s) into stream '{}' ({} records)",
        files.len(),
        kind,
        records.len()
    );

    Some(LogStream::new(kind, records))
}

/// interleave already sorted streams into one all-streams chronological view
pub fn flatten_streams(streams: &[LogStream]) -> Vec<Arc<LogRecord>> {
    streams
        .iter()
        .map(|stream| stream.records().iter())
        .kmerge_by(|a, b| record_order(a, b) == Ordering::Less)
        .cloned()
        .collect()
}
