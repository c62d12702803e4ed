//! Logging setup for the Breeze CLI.
//!
//! Structured logging via the `tracing` ecosystem with verbosity flags and
//! `RUST_LOG` override support.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber. Call once at program start.
///
/// The logging level is determined in this order:
/// 1. `--verbose`: debug level for breeze crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG` environment variable
/// 4. Default: info level for breeze crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("breeze_tailwind=debug,breeze_cli=debug")
    } else if quiet {
        EnvFilter::new("breeze_tailwind=error,breeze_cli=error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("breeze_tailwind=info,breeze_cli=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // tracing subscribers are process-global; these only verify that the
    // filters we construct are well-formed.

    #[test]
    fn verbose_filter_is_valid() {
        let _filter = EnvFilter::new("breeze_tailwind=debug,breeze_cli=debug");
    }

    #[test]
    fn quiet_filter_is_valid() {
        let _filter = EnvFilter::new("breeze_tailwind=error,breeze_cli=error");
    }
}
