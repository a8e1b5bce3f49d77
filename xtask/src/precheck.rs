// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Xtask to run every check CI runs

use clap::Parser;

use crate::clippy;
use crate::copyright;
use crate::fmt;
use crate::nextest;
use crate::Xtask;
use crate::XtaskCtx;

/// Xtask to run every check CI runs
#[derive(Parser)]
#[clap(about = "Run copyright, fmt, clippy and the mock test suite")]
pub struct Precheck {
    /// Skip TOML formatting
    #[clap(long)]
    pub skip_toml: bool,
}

impl Xtask for Precheck {
    fn run(self, ctx: XtaskCtx) -> anyhow::Result<()> {
        log::trace!("running precheck");

        copyright::Copyright { fix: false }.run(ctx.clone())?;

        let fmt = fmt::Fmt {
            fix: false,
            skip_taplo: self.skip_toml,
            toolchain: None,
        };
        fmt.run(ctx.clone())?;

        clippy::Clippy {}.run(ctx.clone())?;

        // No vendor library on build machines, so tests run against the mock
        let nextest = nextest::Nextest {
            features: Some("mock".to_string()),
            package: None,
            filterset: None,
        };
        nextest.run(ctx.clone())?;

        log::trace!("done precheck");
        Ok(())
    }
}
