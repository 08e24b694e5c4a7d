//! Logging setup shared by the binaries.

use crate::error::DataSourceError;

/// Map verbosity flags to a level
///
/// `quiet` wins over any verbosity. 0 is INFO, 1 is DEBUG, 2 and above TRACE.
pub fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Initializes structured logging based on verbosity level.
///
/// Can only succeed once per process; later calls return
/// `DataSourceError::Logging`.
///
/// # Example
/// ```rust,no_run
/// use datasource::logging::init_logging;
///
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<(), DataSourceError> {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| DataSourceError::logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_verbosity_levels() {
        let cases = [
            ((true, 0), tracing::Level::ERROR),
            ((true, 5), tracing::Level::ERROR),
            ((false, 0), tracing::Level::INFO),
            ((false, 1), tracing::Level::DEBUG),
            ((false, 2), tracing::Level::TRACE),
            ((false, 10), tracing::Level::TRACE),
        ];

        for ((quiet, verbose), expected) in cases {
            assert_eq!(level_for(verbose, quiet), expected, "quiet={quiet}, verbose={verbose}");
        }
    }

    #[test]
    fn test_second_init_fails() {
        // Whichever call runs first in this process may win; the second never does.
        let _ = init_logging(0, true);

        assert!(matches!(init_logging(0, true), Err(DataSourceError::Logging(_))));
    }
}
