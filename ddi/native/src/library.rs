// Copyright (C) Microsoft Corporation. All rights reserved.

//! Shared loader for the vendor libraries

use std::path::Path;

use enigma_ddi_interface::DdiError;
use enigma_ddi_interface::DdiResult;
use libloading::Library;
use libloading::Symbol;

/// Loaded vendor library. Entry points are resolved on each call so a library
/// missing an optional export still serves the others.
#[derive(Debug)]
pub(crate) struct VendorLibrary {
    lib: Library,
}

impl VendorLibrary {
    pub(crate) fn load(path: &Path) -> DdiResult<Self> {
        tracing::debug!(path = %path.display(), "Loading vendor library");

        // SAFETY: loading runs the library's initialisers; the vendor library
        // has no initialisation-order requirements.
        let lib = unsafe { Library::new(path) }.map_err(|err| DdiError::LibraryLoad {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        Ok(Self { lib })
    }

    /// Resolves `name`, which must be the exported symbol without a trailing NUL.
    ///
    /// # Safety
    /// `T` must match the entry point's real signature.
    pub(crate) unsafe fn proc<T>(&self, name: &'static str) -> DdiResult<Symbol<'_, T>> {
        self.lib.get::<T>(name.as_bytes()).map_err(|err| {
            tracing::error!(name, error = %err, "Entry point lookup failed");
            DdiError::MissingEntryPoint(name)
        })
    }
}

impl Drop for VendorLibrary {
    fn drop(&mut self) {
        tracing::debug!("Unloading vendor library");
    }
}
