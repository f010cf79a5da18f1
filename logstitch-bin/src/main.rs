use anyhow::{Context, Result, anyhow};
use itertools::Itertools;
use logstitch_android::{DetailLevel, LogcatFormatter, LogcatParser, MAX_DETAIL_LEVEL};
use logstitch_engine::{Charset, FileLogsRepository, LogsRepository, ProgressReporter};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::{env, path::PathBuf, sync::Arc};

const DEFAULT_DETAIL_LEVEL: DetailLevel = 2;

fn print_usage() {
    eprintln!("Usage: logstitch [OPTIONS] FILE...");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --charset, -c LABEL     Charset of the log files (default: utf-8)");
    eprintln!("  --first N               First visible record (negative resets to 0)");
    eprintln!("  --last N                Last visible record (negative resets to the end)");
    eprintln!("  --detail, -d N          Fields to print: 0=message .. 3=all (default: 2)");
    eprintln!("  --full                  Print records with all continuation lines");
    eprintln!("  --verbose, -v           Enable debug logging");
    eprintln!("  --help, -h              Print this help message");
}

struct Options {
    paths: Vec<PathBuf>,
    charset: Charset,
    first: Option<i64>,
    last: Option<i64>,
    detail_level: DetailLevel,
    full: bool,
    verbose: bool,
}

enum UsageOptions {
    Run(Options),
    Help,
}

impl UsageOptions {
    fn from_args(args: &[String]) -> Result<Self> {
        let mut options = Options {
            paths: Vec::new(),
            charset: Charset::utf8(),
            first: None,
            last: None,
            detail_level: DEFAULT_DETAIL_LEVEL,
            full: false,
            verbose: false,
        };

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("Missing value for {}", name))
            };

            match arg.as_str() {
                "--help" | "-h" => return Ok(Self::Help),
                "--charset" | "-c" => {
                    let label = value(arg.as_str())?;
                    options.charset = Charset::for_label(label)
                        .ok_or_else(|| anyhow!("Unknown charset: {}", label))?;
                }
                "--first" => {
                    let index = value(arg.as_str())?;
                    options.first = Some(index.parse().with_context(|| {
                        format!("Invalid index for --first: {}", index)
                    })?);
                }
                "--last" => {
                    let index = value(arg.as_str())?;
                    options.last = Some(index.parse().with_context(|| {
                        format!("Invalid index for --last: {}", index)
                    })?);
                }
                "--detail" | "-d" => {
                    let level = value(arg.as_str())?;
                    let level: DetailLevel = level
                        .parse()
                        .with_context(|| format!("Invalid detail level: {}", level))?;
                    options.detail_level = level.min(MAX_DETAIL_LEVEL);
                }
                "--full" => options.full = true,
                "--verbose" | "-v" => options.verbose = true,
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(anyhow!("Unknown option: {}", flag));
                }
                path => options.paths.push(PathBuf::from(path)),
            }
        }

        if options.paths.is_empty() {
            return Err(anyhow!("No log files given"));
        }

        Ok(Self::Run(options))
    }
}

/// writes progress lines to stderr
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_progress(&mut self, percent: u8, description: &str) {
        eprintln!("[{:>3}%] {}", percent, description);
    }

    fn fail_progress(&mut self) {
        eprintln!("[fail] Could not open the log files");
    }
}

fn setup_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    // stdout carries the records, so logs go to stderr
    if TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        eprintln!("Logger already initialized");
    }
}

fn run(options: Options) -> Result<()> {
    setup_logger(options.verbose);

    let mut repository = FileLogsRepository::with_parser(Arc::new(LogcatParser::new()));
    repository
        .open_log_files(&options.paths, options.charset, &mut ConsoleReporter)
        .context("Failed to open log files")?;

    if let Some(first) = options.first {
        repository.set_first_visible_index(first);
    }
    if let Some(last) = options.last {
        repository.set_last_visible_index(last);
    }

    let streams = repository
        .available_streams()
        .iter()
        .map(|s| format!("{} ({})", s.name(), s.len()))
        .join(", ");
    log::info!(
        "Streams: {}",
        if streams.is_empty() { "none" } else { streams.as_str() }
    );
    log::debug!(
        "Visible window [{}, {}] of {} records",
        repository.first_visible_index(),
        repository.last_visible_index(),
        repository.total_logs()
    );

    let formatter = LogcatFormatter::new();
    for record in repository.currently_opened_logs() {
        if options.full {
            println!("{}", formatter.format_full(record));
        } else {
            println!("{}", formatter.format_preview(record, options.detail_level));
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match UsageOptions::from_args(&args) {
        Ok(UsageOptions::Run(options)) => options,
        Ok(UsageOptions::Help) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            print_usage();
            return Err(e);
        }
    };

    run(options)
}
