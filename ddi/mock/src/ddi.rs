// Copyright (C) Microsoft Corporation. All rights reserved.

//! DDI Implementation - Enigma Mock Device - DDI Module

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use enigma_ddi_interface::Ddi;
use enigma_ddi_interface::DdiResult;
use enigma_ddi_interface::EnigmaStatus;
use enigma_ddi_interface::LibraryKind;
use parking_lot::Mutex;

use crate::dev::DdiMockDev;
use crate::state::MockConfig;
use crate::state::MockState;
use crate::xmss::DdiMockXmssDev;

/// DDI Implementation - Enigma Mock Device Interface
///
/// Devices opened from the same `DdiMock` share one device state, the way
/// separate library loads share one physical device.
#[derive(Default, Debug, Clone)]
pub struct DdiMock {
    state: Arc<Mutex<MockState>>,
}

impl DdiMock {
    /// Mock with the given configuration
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::new(config))),
        }
    }

    /// Make every call to `entry_point` fail with `status`
    pub fn fail_entry_point(&self, entry_point: &'static str, status: EnigmaStatus) {
        self.state.lock().faults.insert(entry_point, status);
    }

    /// Entry points called so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    /// Whether the mock currently considers the user logged in
    pub fn logged_in(&self) -> bool {
        self.state.lock().logged_in
    }

    /// Whether an XMSS handle is currently open
    pub fn xmss_handle_open(&self) -> bool {
        self.state.lock().xmss_open
    }
}

impl Ddi for DdiMock {
    type Dev = DdiMockDev;
    type XmssDev = DdiMockXmssDev;

    fn default_path(&self, kind: LibraryKind) -> PathBuf {
        PathBuf::from(format!("mock://{}", kind.stem()))
    }

    #[tracing::instrument(skip(self))]
    fn open_dev(&self, path: &Path) -> DdiResult<Self::Dev> {
        tracing::debug!("Opening DdiMockDev");
        Ok(DdiMockDev::new(self.state.clone()))
    }

    #[tracing::instrument(skip(self))]
    fn open_xmss_dev(&self, path: &Path) -> DdiResult<Self::XmssDev> {
        tracing::debug!("Opening DdiMockXmssDev");
        Ok(DdiMockXmssDev::new(self.state.clone()))
    }
}
