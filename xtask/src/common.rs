// Copyright (C) Microsoft Corporation. All rights reserved.

//! Common helper functions

use std::path::Path;
use std::path::PathBuf;

/// Directories never scanned for sources
const SKIPPED_DIRS: [&str; 3] = ["target", ".git", "examples"];

/// Files under `root` with one of `extensions`, sorted.
pub fn source_files(root: &Path, extensions: &[&str]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect(root, extensions, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect(dir: &Path, extensions: &[&str], files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

        if path.is_dir() {
            if !SKIPPED_DIRS.contains(&name) {
                collect(&path, extensions, files)?;
            }
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.contains(&ext))
        {
            files.push(path);
        }
    }
    Ok(())
}
