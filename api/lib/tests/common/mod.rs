// Copyright (C) Microsoft Corporation. All rights reserved.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::path::Path;

use enigma_api::*;
use enigma_ddi_interface::Ddi;
use enigma_ddi_interface::LibraryKind;
use enigma_ddi_mock::*;

pub const TEST_PIN: &str = DEFAULT_PIN;
pub const TEST_CUSTOM_ID: &str = "custom01";

pub type TestDevice = EnigmaDevice<DdiMockDev>;
pub type TestXmssDevice = XmssDevice<DdiMockXmssDev>;

pub fn common_open_device(ddi: &DdiMock) -> TestDevice {
    let path = ddi.default_path(LibraryKind::EnovaMx);
    EnigmaDevice::open(ddi, &path).unwrap()
}

pub fn common_open_xmss_device(ddi: &DdiMock) -> TestXmssDevice {
    let path = ddi.default_path(LibraryKind::MxpXmss);
    XmssDevice::open(ddi, &path).unwrap()
}

/// Runs `test` against a fresh mock device that is not logged in.
pub fn api_test<F>(test: F)
where
    F: FnOnce(&DdiMock, &TestDevice),
{
    api_test_with_config(MockConfig::default(), test)
}

pub fn api_test_with_config<F>(config: MockConfig, test: F)
where
    F: FnOnce(&DdiMock, &TestDevice),
{
    let ddi = DdiMock::with_config(config);
    let device = common_open_device(&ddi);
    test(&ddi, &device);
}

/// Runs `test` against a fresh mock device after logging in.
pub fn session_test<F>(test: F)
where
    F: FnOnce(&DdiMock, &TestDevice),
{
    api_test(|ddi, device| {
        device.login(TEST_PIN).unwrap();
        test(ddi, device);
    })
}

/// Runs `test` against a fresh XMSS mock with a scratch directory.
pub fn xmss_test<F>(test: F)
where
    F: FnOnce(&DdiMock, &TestXmssDevice, &Path),
{
    let ddi = DdiMock::default();
    let device = common_open_xmss_device(&ddi);
    let dir = tempfile::tempdir().unwrap();
    test(&ddi, &device, dir.path());
}
