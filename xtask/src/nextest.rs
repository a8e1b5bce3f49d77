// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Xtask to run nextest

use clap::Parser;
use xshell::cmd;
use xshell::Shell;

use crate::Xtask;
use crate::XtaskCtx;

/// Xtask to run nextest
#[derive(Parser)]
#[clap(about = "Run nextest")]
pub struct Nextest {
    /// Features to include in nextest run
    #[clap(long)]
    pub features: Option<String>,

    /// Package argument to run nextest command with
    #[clap(long)]
    pub package: Option<String>,

    /// Test filterset (see https://nexte.st/docs/filtersets)
    #[clap(long, short = 'E')]
    pub filterset: Option<String>,
}

impl Nextest {
    fn command_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(features) = &self.features {
            args.extend(["--features".to_string(), features.clone()]);
        }
        if let Some(package) = &self.package {
            args.extend(["--package".to_string(), package.clone()]);
        } else {
            args.push("--workspace".to_string());
        }
        if let Some(filterset) = &self.filterset {
            args.extend(["--filterset".to_string(), filterset.clone()]);
        }
        args
    }
}

impl Xtask for Nextest {
    fn run(self, _ctx: XtaskCtx) -> anyhow::Result<()> {
        log::trace!("running nextest");

        let sh = Shell::new()?;
        let rust_toolchain = sh.var("RUST_TOOLCHAIN").map(|s| format!("+{s}")).ok();

        let rust_toolchain_version = rust_toolchain.clone();
        cmd!(sh, "cargo {rust_toolchain_version...} nextest --version")
            .quiet()
            .run()?;

        let command_args = self.command_args();
        cmd!(
            sh,
            "cargo {rust_toolchain...} nextest run --no-fail-fast {command_args...}"
        )
        .quiet()
        .run()?;

        log::trace!("done nextest");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args() {
        let nextest = Nextest {
            features: Some("mock".to_string()),
            package: None,
            filterset: None,
        };
        assert_eq!(nextest.command_args(), ["--features", "mock", "--workspace"]);

        let nextest = Nextest {
            features: None,
            package: Some("enigma_api".to_string()),
            filterset: Some("test(aes)".to_string()),
        };
        assert_eq!(
            nextest.command_args(),
            ["--package", "enigma_api", "--filterset", "test(aes)"]
        );
    }
}
