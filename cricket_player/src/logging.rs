use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

/// Prints every record to stdout, interleaved with the game's commentary.
pub struct StdoutLogger;

impl Log for StdoutLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let file = record.file().unwrap_or("unknown");
        let line = record.line().unwrap_or(0);
        let timestamp = format_timestamp();
        println!("{} [{}] {}:{} - {}", timestamp, record.level(), file, line, record.args());
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

/// Time of day as HH:MM:SS.mmm (UTC).
fn format_timestamp() -> String {
    let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let secs = since_epoch.as_secs() % 86400;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        since_epoch.subsec_millis()
    )
}

/// Installs `StdoutLogger` as the global logger.
///
/// Debug builds log at `Debug`, release builds at `Info`; `verbose` forces `Debug`.
/// Only the first call per process has any effect.
pub fn init_stdout_logger(verbose: bool) {
    static LOGGER: StdoutLogger = StdoutLogger;

    let max_level = if verbose || cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(max_level);
    }
}
