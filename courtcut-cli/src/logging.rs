// ============================================================================
// courtcut-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger backend for the log facade
//
// Terminal output from courtcut_core::terminal is emitted at info level, so
// info records are written bare. Other levels carry a short level tag.
// Everything goes to stderr; stdout is reserved for --json output.
// RUST_LOG overrides the level picked from --verbose:
// - RUST_LOG=info (default): normal output
// - RUST_LOG=debug: per-step detail from the core
// - RUST_LOG=trace: everything

use log::{Level, LevelFilter};
use std::io::Write;

/// Level used when RUST_LOG is not set.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger. Safe to call once per process.
pub fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level(verbose))
        .target(env_logger::Target::Stderr)
        .format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "[{:<5}] {}", level, record.args()),
        });

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    // A second initialization only happens in tests that share the process.
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_selects_debug() {
        assert_eq!(default_level(true), LevelFilter::Debug);
        assert_eq!(default_level(false), LevelFilter::Info);
    }
}
