//! Logger setup for the command-line solver.

use std::io::Write;

use log::LevelFilter;

/// Level for records from this crate. Other crates stay at `Warn`.
fn solver_level(debug_enabled: bool) -> LevelFilter {
    if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialize logging. `--debug` raises the solver's own records to `Debug`, which shows the
/// node and arc consistency pruning counts; `RUST_LOG=crossfill=trace` also shows every
/// candidate tried during search. Later calls are ignored.
pub fn init_logger(debug_enabled: bool) {
    let level = solver_level(debug_enabled);

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_CRATE_NAME"), level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .parse_default_env();

    if builder.try_init().is_ok() {
        log::debug!("Solver logging at {}", level);
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::{init_logger, solver_level};

    #[test]
    fn test_debug_flag_raises_solver_level() {
        assert_eq!(solver_level(false), LevelFilter::Info);
        assert_eq!(solver_level(true), LevelFilter::Debug);
    }

    #[test]
    fn test_repeated_init_is_ignored() {
        init_logger(true);
        init_logger(false);
    }
}
