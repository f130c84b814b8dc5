//! Command line support for the audiomatch binary

pub mod ingest;
pub mod operands;
pub mod output;

use log::LevelFilter;

/// Level to force on the logger, or `None` when `RUST_LOG` is set and
/// decides on its own. Without `RUST_LOG` logging is off unless verbose.
pub fn forced_log_level(verbose: bool, rust_log_set: bool) -> Option<LevelFilter> {
    if rust_log_set {
        None
    } else if verbose {
        Some(LevelFilter::Info)
    } else {
        Some(LevelFilter::Off)
    }
}
