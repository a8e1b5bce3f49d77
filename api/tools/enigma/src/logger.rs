// Copyright (C) Microsoft Corporation. All rights reserved.

use tracing::metadata::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

/// Filter from `RUST_LOG` (`Targets` syntax), else the verbosity default.
///
/// An unparsable `RUST_LOG` falls back to the default and returns the parse
/// error text so it can be reported once logging is up.
fn targets(rust_log: Option<&str>, verbose: bool) -> (Targets, Option<String>) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let fallback = Targets::new().with_default(default_level);

    match rust_log.map(str::parse::<Targets>) {
        Some(Ok(targets)) => (targets, None),
        Some(Err(err)) => (fallback, Some(err.to_string())),
        None => (fallback, None),
    }
}

/// Install the stderr subscriber. stdout carries only the JSON response.
///
/// `RUST_LOG` takes precedence over `verbose`.
pub(crate) fn init(verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let (targets, bad_filter) = targets(rust_log.as_deref(), verbose);

    let result = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(LevelFilter::TRACE)
        .finish()
        .with(targets)
        .try_init();
    if let Err(err) = result {
        eprintln!("Failed to initialize logging: {err}");
    }

    if let Some(err) = bad_filter {
        tracing::warn!(%err, "Ignoring invalid RUST_LOG");
    }
}

#[cfg(test)]
mod tests {
    use test_with_tracing::test;
    use tracing::Level;

    use super::*;

    #[test]
    fn test_default_levels() {
        let (quiet, err) = targets(None, false);
        assert!(err.is_none());
        assert!(quiet.would_enable("enigma", &Level::WARN));
        assert!(!quiet.would_enable("enigma", &Level::INFO));

        let (verbose, _) = targets(None, true);
        assert!(verbose.would_enable("enigma_api::aes", &Level::DEBUG));
        assert!(!verbose.would_enable("enigma_api::aes", &Level::TRACE));
    }

    #[test]
    fn test_rust_log_targets_syntax() {
        let (targets, err) = targets(Some("warn,enigma_ddi_native=trace"), false);
        assert!(err.is_none());
        assert!(targets.would_enable("enigma_ddi_native::library", &Level::TRACE));
        assert!(!targets.would_enable("enigma_api", &Level::INFO));
    }

    #[test]
    fn test_rust_log_overrides_verbose() {
        let (targets, _) = targets(Some("error"), true);
        assert!(!targets.would_enable("enigma", &Level::DEBUG));
    }

    #[test]
    fn test_invalid_rust_log_falls_back() {
        let (targets, err) = targets(Some("enigma=loud"), true);
        assert!(err.is_some());
        assert!(targets.would_enable("enigma", &Level::DEBUG));
    }
}
