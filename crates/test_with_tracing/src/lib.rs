// Copyright (C) Microsoft Corporation. All rights reserved.

//! Crate for defining tests that have tracing output.

#[cfg(test)]
extern crate self as test_with_tracing;

pub use test_with_tracing_macro::test;
#[doc(hidden)]
pub use tracing;
use tracing::metadata::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

/// Crates whose events are shown by default; `enigma` is the binary.
const ENIGMA_TARGETS: [&str; 5] = [
    "enigma",
    "enigma_api",
    "enigma_ddi",
    "enigma_ddi_mock",
    "enigma_ddi_native",
];

fn default_targets() -> Targets {
    ENIGMA_TARGETS
        .iter()
        .fold(Targets::new().with_default(LevelFilter::WARN), |targets, target| {
            targets.with_target(*target, LevelFilter::DEBUG)
        })
}

#[doc(hidden)]
/// Initializes `tracing` for tests.
///
/// `RUST_LOG` overrides the default of debug output for the Enigma crates and
/// warnings for everything else.
pub fn init() {
    static ONCE: std::sync::Once = std::sync::Once::new();

    ONCE.call_once(|| {
        let targets = match std::env::var("RUST_LOG") {
            Ok(var) => var.parse().unwrap_or_else(|err| {
                panic!("Failed to parse RUST_LOG environment variable: {err}")
            }),
            Err(_) => default_targets(),
        };
        tracing_subscriber::fmt()
            .with_ansi(false) // test output is often captured to files
            .log_internal_errors(true)
            .with_test_writer()
            .with_max_level(LevelFilter::TRACE)
            .finish()
            .with(targets)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::test;

    #[test]
    fn test_it() {
        tracing::debug!(target: "enigma_api", "should show");
        tracing::debug!(target: "other", "should be filtered");
    }

    #[test]
    fn test_with_return() -> Result<(), Box<dyn std::error::Error>> {
        tracing::info!("ok");
        Ok(())
    }

    #[test]
    fn test_default_targets() {
        let targets = super::default_targets();
        assert!(targets.would_enable("enigma_ddi_mock::dev", &tracing::Level::DEBUG));
        assert!(!targets.would_enable("libloading", &tracing::Level::INFO));
    }

    #[test]
    fn test_default_targets_include_binary() {
        let targets = super::default_targets();
        assert!(targets.would_enable("enigma::commands::rsa", &tracing::Level::DEBUG));
        assert!(targets.would_enable("enigma", &tracing::Level::DEBUG));
    }
}
