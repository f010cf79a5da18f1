use logstitch_engine::LogRecord;

/// detail level for record display: 0 = message only, 3 = every field
pub type DetailLevel = u8;

pub const MAX_DETAIL_LEVEL: DetailLevel = 3;

/// Android-specific display formatting for merged records
pub struct LogcatFormatter;

impl LogcatFormatter {
    pub fn new() -> Self {
        Self
    }

    // first non-blank line, or the content untouched when every line is blank
    fn shorten_content(content: &str) -> String {
        content
            .split('\n')
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map_or_else(|| content.to_string(), str::to_string)
    }

    /// one-line preview of a record; continuation lines are folded away
    pub fn format_preview(&self, record: &LogRecord, detail_level: DetailLevel) -> String {
        let content = Self::shorten_content(record.message());

        let time = record.timestamp().format("%m-%d %H:%M:%S%.3f").to_string();
        let tag = record.tag();
        let level = record.level().to_string();
        let stream = record.stream().name();

        let field_order = [time.as_str(), tag, level.as_str(), stream];
        let take = match detail_level {
            0 => 0, // content only
            1 => 1, // time
            2 => 2, // time + tag
            _ => field_order.len(),
        };

        let mut parts = Vec::new();
        for field_value in field_order.iter().take(take) {
            if !field_value.is_empty() {
                parts.push(format!("[{}]", field_value));
            }
        }
        parts.push(content);
        parts.join(" ")
    }

    /// the record rendered back in Android Studio layout, continuation lines included
    pub fn format_full(&self, record: &LogRecord) -> String {
        format!(
            "{} {}-{}/? {}/{}: {}",
            record.timestamp().format("%m-%d %H:%M:%S%.3f"),
            record.pid(),
            record.tid(),
            record.level(),
            record.tag(),
            record.message()
        )
    }
}

impl Default for LogcatFormatter {
    fn default() -> Self {
        Self::new()
    }
}
