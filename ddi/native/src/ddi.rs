// Copyright (C) Microsoft Corporation. All rights reserved.

//! DDI Implementation - Native - DDI Module

use std::path::Path;
use std::path::PathBuf;

use enigma_ddi_interface::Ddi;
use enigma_ddi_interface::DdiResult;
use enigma_ddi_interface::LibraryKind;

use crate::dev::DdiNativeDev;
use crate::xmss::DdiNativeXmssDev;

/// Directory searched for the vendor libraries when no path is configured
const LIBRARY_DIR: &str = "library";

/// DDI Implementation - vendor libraries loaded with `libloading`
#[derive(Default, Debug)]
pub struct DdiNative {}

impl Ddi for DdiNative {
    type Dev = DdiNativeDev;
    type XmssDev = DdiNativeXmssDev;

    fn default_path(&self, kind: LibraryKind) -> PathBuf {
        Path::new(LIBRARY_DIR).join(libloading::library_filename(kind.stem()))
    }

    #[tracing::instrument(skip(self))]
    fn open_dev(&self, path: &Path) -> DdiResult<Self::Dev> {
        DdiNativeDev::open(path)
    }

    #[tracing::instrument(skip(self))]
    fn open_xmss_dev(&self, path: &Path) -> DdiResult<Self::XmssDev> {
        DdiNativeXmssDev::open(path)
    }
}
