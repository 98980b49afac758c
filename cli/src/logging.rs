//! Logger setup. Unlike the teacher's TUI-oriented `Log` impl, this binary
//! has no status screen to feed a ring buffer into, so it writes straight
//! to stderr via `env_logger`'s simpler cousin: a minimal `Log` impl with
//! the same `RUST_LOG`-driven level the teacher's CLI reads.

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn parse_level(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Installs the global logger. `--log-level` takes precedence over
/// `RUST_LOG`, which takes precedence over the `info` default.
pub fn init(cli_level: Option<&str>) {
    let level = cli_level
        .map(parse_level)
        .or_else(|| std::env::var("RUST_LOG").ok().map(|v| parse_level(&v)))
        .unwrap_or(LevelFilter::Info);

    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}
