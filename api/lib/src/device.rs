// Copyright (C) Microsoft Corporation. All rights reserved.

use std::path::Path;

use enigma_ddi_interface::Ddi;
use enigma_ddi_interface::DdiError;
use enigma_ddi_interface::EnigmaDev;

use crate::EnigmaResult;

/// Handle to the main vendor library
///
/// PIN, AES and RSA operations are implemented on this type in their own
/// modules.
#[derive(Debug)]
pub struct EnigmaDevice<D: EnigmaDev> {
    pub(crate) dev: D,
}

impl<D: EnigmaDev> EnigmaDevice<D> {
    /// Wrap an already opened library binding.
    pub fn new(dev: D) -> Self {
        Self { dev }
    }

    /// Load the main library at `path`.
    #[tracing::instrument(skip(ddi))]
    pub fn open<T: Ddi<Dev = D>>(ddi: &T, path: &Path) -> EnigmaResult<Self> {
        Ok(Self::new(ddi.open_dev(path)?))
    }

    /// Underlying library binding
    pub fn dev(&self) -> &D {
        &self.dev
    }

    /// Vendor library version string
    pub fn version(&self) -> EnigmaResult<String> {
        Ok(self.dev.api_version()?)
    }

    /// Fails with [`DdiError::DeviceNotFound`] unless a device is attached.
    #[tracing::instrument(skip(self))]
    pub fn detect(&self) -> EnigmaResult<()> {
        if self.dev.detect()? {
            Ok(())
        } else {
            tracing::warn!("No Enigma device attached");
            Err(DdiError::DeviceNotFound.into())
        }
    }

    /// Chip serial number, lower-case hex
    pub fn uid(&self) -> EnigmaResult<String> {
        Ok(hex::encode(self.dev.chip_sn()?))
    }
}
