// ============================================================================
// vcompress-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger backend for the `log` facade
//
// Terminal output from vcompress-core is emitted at info level and printed
// as-is. Warnings, errors and debug lines carry a short level tag.
//
// USAGE:
// - default: info
// - --debug: debug
// - RUST_LOG overrides both (e.g. RUST_LOG=vcompress_core=trace)

use console::style;
use log::LevelFilter;
use std::io::Write;

/// Installs the global logger. Calling it more than once is harmless.
pub fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            let tag = match record.level() {
                log::Level::Info => return writeln!(buf, "{}", record.args()),
                log::Level::Error => style("ERROR").red().bold(),
                log::Level::Warn => style("WARN ").yellow(),
                log::Level::Debug => style("DEBUG").blue(),
                log::Level::Trace => style("TRACE").magenta(),
            };
            writeln!(buf, "{} {}", tag, record.args())
        })
        .filter_level(level);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if builder.try_init().is_ok() {
        log::debug!("Logger initialized with level: {}", level);
    }
}

/// Returns the current local time formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
