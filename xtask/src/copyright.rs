// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Xtask to check the copyright header of every Rust source

use std::path::Path;

use clap::Parser;

use crate::common;
use crate::Xtask;
use crate::XtaskCtx;

const COPYRIGHT_HEADER_TEXT: &str = "Copyright (C) Microsoft Corporation. All rights reserved.";

/// Lines searched for the header
const COPYRIGHT_PRESENT_IN_LINES: usize = 3;

/// Xtask to check the copyright header of every Rust source
#[derive(Parser)]
#[clap(about = "Check copyright headers")]
pub struct Copyright {
    /// Insert the header where it is missing
    #[clap(long)]
    pub fix: bool,
}

impl Xtask for Copyright {
    fn run(self, ctx: XtaskCtx) -> anyhow::Result<()> {
        log::trace!("running copyright");

        let mut missing = Vec::new();
        for path in common::source_files(&ctx.root, &["rs"])? {
            let content = std::fs::read_to_string(&path)?;
            if has_header(&content) {
                continue;
            }

            if self.fix {
                fix_header(&path, &content)?;
                log::info!("added copyright header to {}", path.display());
            } else {
                log::error!("copyright header not found in {}", path.display());
                missing.push(path);
            }
        }

        if !missing.is_empty() {
            anyhow::bail!("{} file(s) missing a copyright header", missing.len());
        }

        log::trace!("done copyright");
        Ok(())
    }
}

fn has_header(content: &str) -> bool {
    content
        .lines()
        .take(COPYRIGHT_PRESENT_IN_LINES)
        .any(|line| line.contains(COPYRIGHT_HEADER_TEXT))
}

fn fix_header(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, format!("// {COPYRIGHT_HEADER_TEXT}\n\n{content}"))?;
    Ok(())
}
