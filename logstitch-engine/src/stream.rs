use crate::provider::LogRecord;
use std::{fmt, sync::Arc};

/// logging buffer a file is believed to come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Main,
    System,
    Radio,
    Events,
    /// shared by every file whose name matches no rule
    Unknown,
}

impl StreamKind {
    pub fn name(&self) -> &'static str {
        match self {
            StreamKind::Main => "main",
            StreamKind::System => "system",
            StreamKind::Radio => "radio",
            StreamKind::Events => "events",
            StreamKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// order matters: the first matching pattern wins
const DEFAULT_RULES: &[(&str, StreamKind)] = &[
    ("main", StreamKind::Main),
    ("-m.", StreamKind::Main),
    ("system", StreamKind::System),
    ("-s.", StreamKind::System),
    ("radio", StreamKind::Radio),
    ("-r.", StreamKind::Radio),
    ("events", StreamKind::Events),
    ("-e.", StreamKind::Events),
];

/// maps file names to streams through an ordered table of substring rules
#[derive(Debug, Clone)]
pub struct StreamClassifier {
    rules: Vec<(String, StreamKind)>,
}

impl StreamClassifier {
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES
                .iter()
                .map(|(pattern, kind)| (pattern.to_lowercase(), *kind))
                .collect(),
        }
    }

    /// a classifier with no rules; every file lands in [`StreamKind::Unknown`]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// append a rule, matched after the existing ones
    pub fn with_rule(mut self, pattern: impl AsRef<str>, kind: StreamKind) -> Self {
        self.rules.push((pattern.as_ref().to_lowercase(), kind));
        self
    }

    /// insert a rule ahead of the existing ones
    pub fn with_priority_rule(mut self, pattern: impl AsRef<str>, kind: StreamKind) -> Self {
        self.rules.insert(0, (pattern.as_ref().to_lowercase(), kind));
        self
    }

    /// case-insensitive substring match on the file name, first rule wins
    pub fn classify(&self, file_name: &str) -> StreamKind {
        if file_name.is_empty() {
            return StreamKind::Unknown;
        }

        let name = file_name.to_lowercase();
        self.rules
            .iter()
            .find(|(pattern, _)| !pattern.is_empty() && name.contains(pattern.as_str()))
            .map(|(_, kind)| *kind)
            .unwrap_or(StreamKind::Unknown)
    }
}

impl Default for StreamClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// one stream and its merged, chronologically sorted records
#[derive(Debug, Clone)]
pub struct LogStream {
    kind: StreamKind,
    records: Vec<Arc<LogRecord>>,
}

impl LogStream {
    pub(crate) fn new(kind: StreamKind, records: Vec<Arc<LogRecord>>) -> Self {
        Self { kind, records }
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn records(&self) -> &[Arc<LogRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_buffer_name() {
        let classifier = StreamClassifier::new();
        assert_eq!(classifier.classify("logcat_main.txt"), StreamKind::Main);
        assert_eq!(classifier.classify("logcat_system.txt"), StreamKind::System);
        assert_eq!(classifier.classify("radio_2024.log"), StreamKind::Radio);
        assert_eq!(classifier.classify("events.txt"), StreamKind::Events);
    }

    #[test]
    fn test_classify_short_suffixes() {
        let classifier = StreamClassifier::new();
        assert_eq!(classifier.classify("bugreport-m.txt"), StreamKind::Main);
        assert_eq!(classifier.classify("bugreport-s.txt"), StreamKind::System);
        assert_eq!(classifier.classify("bugreport-r.txt"), StreamKind::Radio);
        assert_eq!(classifier.classify("bugreport-e.txt"), StreamKind::Events);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let classifier = StreamClassifier::new();
        assert_eq!(classifier.classify("SYSTEM.LOG"), StreamKind::System);
        assert_eq!(classifier.classify("Main-Buffer.txt"), StreamKind::Main);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let classifier = StreamClassifier::new();
        // both "main" and "system" appear, "main" is listed first
        assert_eq!(classifier.classify("system_main.txt"), StreamKind::Main);
    }

    #[test]
    fn test_unmatched_names_share_default_stream() {
        let classifier = StreamClassifier::new();
        assert_eq!(classifier.classify("log.txt"), StreamKind::Unknown);
        assert_eq!(classifier.classify("capture2.txt"), StreamKind::Unknown);
        assert_eq!(classifier.classify(""), StreamKind::Unknown);
    }

    #[test]
    fn test_custom_rules() {
        let classifier = StreamClassifier::empty().with_rule("kernel", StreamKind::System);
        assert_eq!(classifier.classify("kernel.log"), StreamKind::System);
        assert_eq!(classifier.classify("main.log"), StreamKind::Unknown);

        let classifier = StreamClassifier::new().with_priority_rule("crash", StreamKind::Events);
        assert_eq!(classifier.classify("crash_main.txt"), StreamKind::Events);
    }
}
