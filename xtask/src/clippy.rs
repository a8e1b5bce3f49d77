// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Xtask to run clippy over the workspace

use clap::Parser;
use xshell::cmd;
use xshell::Shell;

use crate::Xtask;
use crate::XtaskCtx;

/// Xtask to run clippy over the workspace
#[derive(Parser)]
#[clap(about = "Run clippy for the native and mock builds")]
pub struct Clippy {}

impl Xtask for Clippy {
    fn run(self, _ctx: XtaskCtx) -> anyhow::Result<()> {
        log::trace!("running clippy");

        let sh = Shell::new()?;
        let rust_toolchain = sh.var("RUST_TOOLCHAIN").map(|s| format!("+{s}")).ok();

        // Native build: links against the vendor library at run time only
        let toolchain = rust_toolchain.clone();
        cmd!(
            sh,
            "cargo {toolchain...} clippy --workspace --all-targets -- -D warnings"
        )
        .quiet()
        .run()?;

        cmd!(
            sh,
            "cargo {rust_toolchain...} clippy --workspace --all-targets --features mock -- -D warnings"
        )
        .quiet()
        .run()?;

        log::trace!("done clippy");
        Ok(())
    }
}
