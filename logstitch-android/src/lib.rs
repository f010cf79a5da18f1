// logstitch-android - Android log support for logstitch
//
// This crate provides the LineParser for Android logcat text and the
// formatter used to print merged records.

mod formatter;
mod parser;

pub use formatter::{DetailLevel, LogcatFormatter, MAX_DETAIL_LEVEL};
pub use parser::LogcatParser;
