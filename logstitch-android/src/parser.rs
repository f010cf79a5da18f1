use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use logstitch_engine::{LineParser, LogEntry, LogLevel};
use regex::{Captures, Regex};

// leap year, so "02-29" lines survive when the year is missing
const DEFAULT_ASSUMED_YEAR: i32 = 2000;

lazy_static! {
    // [YYYY-]MM-DD HH:MM:SS.mmm PID-TID/PACKAGE P/TAG: message
    static ref STUDIO_LINE_RE: Regex = Regex::new(
        r"(?x)
          ^(?:(?P<year>\d{4})-)?(?P<month>\d{2})-(?P<day>\d{2})\s+
          (?P<hour>\d{2}):(?P<minute>\d{2}):(?P<second>\d{2})\.(?P<millis>\d{3})\s+
          (?P<pid>\d+)-(?P<tid>\d+)/\S*\s+
          (?P<level>[A-Z])/(?P<tag>[^:]*?)\s*:\s?
          (?P<message>.*)$"
    ).unwrap();

    // [YYYY-]MM-DD HH:MM:SS.mmm  PID  TID P TAG: message  (adb logcat -v threadtime)
    static ref THREADTIME_LINE_RE: Regex = Regex::new(
        r"(?x)
          ^(?:(?P<year>\d{4})-)?(?P<month>\d{2})-(?P<day>\d{2})\s+
          (?P<hour>\d{2}):(?P<minute>\d{2}):(?P<second>\d{2})\.(?P<millis>\d{3})\s+
          (?P<pid>\d+)\s+(?P<tid>\d+)\s+
          (?P<level>[A-Z])\s+(?P<tag>.*?)\s*:\s?
          (?P<message>.*)$"
    ).unwrap();
}

/// Android log parser
///
/// Understands the Android Studio logcat layout and the `adb logcat -v threadtime`
/// layout. Lines that match neither, or carry a priority letter outside
/// `V D I W E F A`, are left to the engine as continuations.
#[derive(Debug, Clone)]
pub struct LogcatParser {
    assumed_year: i32,
}

impl LogcatParser {
    pub fn new() -> Self {
        Self {
            assumed_year: DEFAULT_ASSUMED_YEAR,
        }
    }

    /// year used for lines whose timestamp has none
    pub fn with_assumed_year(year: i32) -> Self {
        Self {
            assumed_year: year,
        }
    }

    fn entry_from_captures(&self, caps: &Captures) -> Option<LogEntry> {
        let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());

        let year = match caps.name("year") {
            Some(m) => m.as_str().parse().ok()?,
            None => self.assumed_year,
        };
        let date = NaiveDate::from_ymd_opt(year, number("month")?, number("day")?)?;
        let timestamp: NaiveDateTime = date.and_hms_milli_opt(
            number("hour")?,
            number("minute")?,
            number("second")?,
            number("millis")?,
        )?;

        let level = caps
            .name("level")
            .and_then(|m| m.as_str().chars().next())
            .and_then(LogLevel::from_letter)?;

        Some(LogEntry {
            timestamp,
            pid: number("pid")?,
            tid: number("tid")?,
            level,
            tag: caps.name("tag").map_or("", |m| m.as_str()).trim().to_string(),
            message: caps.name("message").map_or("", |m| m.as_str()).to_string(),
        })
    }
}

impl Default for LogcatParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for LogcatParser {
    fn parse_entry(&self, raw_line: &str) -> Option<LogEntry> {
        let line = raw_line.trim_end_matches('\r');

        // try the documented layout first, then threadtime
        let caps = [&*STUDIO_LINE_RE, &*THREADTIME_LINE_RE]
            .iter()
            .find_map(|re| re.captures(line))?;

        let entry = self.entry_from_captures(&caps);
        if entry.is_none() {
            log::trace!("Header-shaped line rejected, kept as continuation: {}", line);
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logstitch_engine::ParseOutcome;

    fn at(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn test_parse_studio_line() {
        let parser = LogcatParser::new();
        let entry = parser
            .parse_entry(
                "01-06 20:46:26.091 821-2168/? V/ThermalMonitor: Foreground Application Changed: com.voidcorporation.carimbaai",
            )
            .unwrap();

        assert_eq!(entry.timestamp, at(2000, 1, 6, 20, 46, 26, 91));
        assert_eq!(entry.pid, 821);
        assert_eq!(entry.tid, 2168);
        assert_eq!(entry.level, LogLevel::Verbose);
        assert_eq!(entry.tag, "ThermalMonitor");
        assert_eq!(
            entry.message,
            "Foreground Application Changed: com.voidcorporation.carimbaai"
        );
    }

    #[test]
    fn test_parse_studio_line_with_package() {
        let parser = LogcatParser::new();
        let entry = parser
            .parse_entry("01-06 20:46:39.481 25175-25175/com.example.app E/AndroidRuntime: FATAL EXCEPTION: main")
            .unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.tag, "AndroidRuntime");
        assert_eq!(entry.message, "FATAL EXCEPTION: main");
    }

    #[test]
    fn test_message_keeps_inner_indentation() {
        let parser = LogcatParser::new();
        let entry = parser
            .parse_entry("01-06 20:46:39.491 821-1054/? W/ActivityManager:   Force finishing activity")
            .unwrap();
        assert_eq!(entry.message, "  Force finishing activity");
    }

    #[test]
    fn test_parse_threadtime_line() {
        let parser = LogcatParser::new();
        let entry = parser
            .parse_entry("10-18 09:15:02.337  1234  5678 I ActivityManager: Start proc 4321:com.android.chrome")
            .unwrap();
        assert_eq!(entry.timestamp, at(2000, 10, 18, 9, 15, 2, 337));
        assert_eq!(entry.pid, 1234);
        assert_eq!(entry.tid, 5678);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.tag, "ActivityManager");
        assert_eq!(entry.message, "Start proc 4321:com.android.chrome");
    }

    #[test]
    fn test_explicit_year_wins() {
        let parser = LogcatParser::with_assumed_year(1999);
        let with_year = parser
            .parse_entry("2024-02-29 23:59:59.999 1-2/? D/Tag: leap")
            .unwrap();
        assert_eq!(with_year.timestamp, at(2024, 2, 29, 23, 59, 59, 999));

        let without_year = parser.parse_entry("03-01 00:00:00.000 1-2/? D/Tag: x").unwrap();
        assert_eq!(without_year.timestamp, at(1999, 3, 1, 0, 0, 0, 0));
    }

    #[test]
    fn test_invalid_date_is_unmatched() {
        let parser = LogcatParser::with_assumed_year(2023);
        assert!(parser.parse_entry("02-29 10:00:00.000 1-2/? D/Tag: x").is_none());
        assert!(parser.parse_entry("13-01 10:00:00.000 1-2/? D/Tag: x").is_none());
    }

    #[test]
    fn test_every_priority_letter() {
        let parser = LogcatParser::new();
        let levels: Vec<LogLevel> = "VDIWEFA"
            .chars()
            .map(|p| {
                parser
                    .parse_entry(&format!("01-01 00:00:00.000 1-1/? {}/Tag: m", p))
                    .unwrap()
                    .level
            })
            .collect();
        assert_eq!(
            levels,
            vec![
                LogLevel::Verbose,
                LogLevel::Debug,
                LogLevel::Info,
                LogLevel::Warn,
                LogLevel::Error,
                LogLevel::Fatal,
                LogLevel::Assert,
            ]
        );
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_unknown_priority_is_continuation() {
        let parser = LogcatParser::new();
        let line = "01-01 00:00:00.000 1-1/? X/Tag: m";
        assert!(parser.parse_entry(line).is_none());

        let previous = parser.parse_entry("01-01 00:00:00.000 1-1/? I/Tag: m").unwrap();
        assert_eq!(parser.parse_line(line, Some(&previous)), ParseOutcome::Continuation);
        assert_eq!(parser.parse_line(line, None), ParseOutcome::Discarded);
    }

    #[test]
    fn test_stack_trace_lines_do_not_match() {
        let parser = LogcatParser::new();
        assert!(parser.parse_entry("\tat android.os.Looper.loop(Looper.java:193)").is_none());
        assert!(parser.parse_entry("--------- beginning of main").is_none());
        assert!(parser.parse_entry("").is_none());
    }

    #[test]
    fn test_empty_message_and_carriage_return() {
        let parser = LogcatParser::new();
        let entry = parser.parse_entry("01-01 00:00:00.000 1-1/? I/Tag:\r").unwrap();
        assert_eq!(entry.tag, "Tag");
        assert_eq!(entry.message, "");
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let parser = LogcatParser::new();
        let line = "01-06 20:46:42.501 821-2810/? I/ActivityManager: Process died.";
        assert_eq!(parser.parse_entry(line), parser.parse_entry(line));
    }
}
