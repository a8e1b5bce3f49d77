// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Xtask to run formatting checks

use clap::Parser;
use xshell::cmd;

use crate::Xtask;
use crate::XtaskCtx;

/// Xtask to run formatting checks
#[derive(Parser)]
#[clap(about = "Run formatting checks")]
pub struct Fmt {
    /// Attempt to fix any formatting issues
    #[clap(long)]
    pub fix: bool,

    /// Skip TOML formatting
    #[clap(long)]
    pub skip_taplo: bool,

    /// Override toolchain to use for formatting
    #[clap(long)]
    pub toolchain: Option<String>,
}

impl Xtask for Fmt {
    fn run(self, _ctx: XtaskCtx) -> anyhow::Result<()> {
        log::trace!("running fmt");
        let sh = xshell::Shell::new()?;
        let rust_toolchain = self
            .toolchain
            .or_else(|| sh.var("RUST_TOOLCHAIN").ok())
            .map(|s| format!("+{s}"));

        let rust_toolchain_version = rust_toolchain.clone();
        cmd!(sh, "cargo {rust_toolchain_version...} fmt --version")
            .quiet()
            .run()?;

        let fmt_check = (!self.fix).then_some("--check");

        cmd!(sh, "cargo {rust_toolchain...} fmt -- {fmt_check...}")
            .quiet()
            .run()?;

        if !self.skip_taplo {
            if cmd!(sh, "taplo --version").quiet().run().is_ok() {
                log::trace!("running taplo fmt");
                cmd!(sh, "taplo fmt {fmt_check...}").quiet().run()?;
            } else {
                log::warn!("taplo not found, skipping TOML formatting");
            }
        }

        log::trace!("done fmt");
        Ok(())
    }
}
