//! Logger setup shared by binaries and tests.

use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Initialise terminal logging at the given level. Safe to call more
/// than once, later calls are ignored.
pub fn init_logging(level: LevelFilter) {
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_init_is_idempotent() {
        init_logging(LevelFilter::Warn);
        init_logging(LevelFilter::Debug);
    }
}
