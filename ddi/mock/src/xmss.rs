// Copyright (C) Microsoft Corporation. All rights reserved.

//! DDI Implementation - Enigma Mock Device - XMSS Module

use std::ffi::CStr;
use std::fs;
use std::sync::Arc;

use enigma_ddi_interface::*;
use parking_lot::Mutex;

use crate::state::MockState;

const SECRET_KEY_MAGIC: &[u8] = b"MOCK-XMSS-SK";
const PUBLIC_KEY_MAGIC: &[u8] = b"MOCK-XMSS-PK";
const SIGNATURE_MAGIC: &[u8] = b"MOCK-XMSS-SIG";
const OID_HEX_LEN: usize = 8;
const MOCK_XMSS_ID: u8 = 0x01;
const MOCK_INDEX_BYTES: u8 = 4;

/// DDI Implementation - Enigma Mock XMSS library
#[derive(Debug, Clone)]
pub struct DdiMockXmssDev {
    state: Arc<Mutex<MockState>>,
}

impl DdiMockXmssDev {
    pub(crate) fn new(state: Arc<Mutex<MockState>>) -> Self {
        Self { state }
    }
}

fn require_handle(state: &MockState) -> DdiResult<()> {
    if state.xmss_open {
        Ok(())
    } else {
        Err(DdiError::Status(EnigmaStatus::MxHandleFail))
    }
}

fn read(path: &CStr) -> DdiResult<Vec<u8>> {
    let path = path.to_str().map_err(|_| DdiError::InvalidStr)?;
    fs::read(path).map_err(|_| DdiError::Status(EnigmaStatus::SourceFileOpenFail))
}

fn write(path: &CStr, data: &[u8]) -> DdiResult<()> {
    let path = path.to_str().map_err(|_| DdiError::InvalidStr)?;
    fs::write(path, data).map_err(|_| DdiError::Status(EnigmaStatus::TargetFileOpenFail))
}

impl XmssDev for DdiMockXmssDev {
    fn open_handle(&self) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("MxpOpenHandle")?;
        if state.xmss_open {
            return Err(DdiError::Status(EnigmaStatus::MxHandleFail));
        }
        state.xmss_open = true;
        Ok(())
    }

    fn close_handle(&self) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("MxpCloseHandle")?;
        require_handle(&state)?;
        state.xmss_open = false;
        Ok(())
    }

    fn get_param(&self, param: &mut XmssParamRaw) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("MxpGetParam")?;
        require_handle(&state)?;

        *param = XmssParamRaw {
            index: state.xmss_index.to_be_bytes(),
            xmss_id: MOCK_XMSS_ID,
            index_bytes: MOCK_INDEX_BYTES,
        };
        Ok(())
    }

    fn key_gen(
        &self,
        multi_tree: bool,
        oid: &CStr,
        secret_key_file: &CStr,
        public_key_file: &CStr,
    ) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("XmssKeyGen")?;
        require_handle(&state)?;

        let oid = oid.to_bytes();
        if oid.len() != OID_HEX_LEN || !oid.iter().all(u8::is_ascii_hexdigit) {
            return Err(DdiError::Status(EnigmaStatus::FfeCmdAbort));
        }

        let variant = [u8::from(multi_tree)];
        write(secret_key_file, &[SECRET_KEY_MAGIC, &variant, oid].concat())?;
        write(public_key_file, &[PUBLIC_KEY_MAGIC, &variant, oid].concat())?;
        state.xmss_index = 0;
        Ok(())
    }

    fn sign(
        &self,
        secret_key_file: &CStr,
        message_file: &CStr,
        signature_file: &CStr,
    ) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("XmssSign")?;
        require_handle(&state)?;

        if !read(secret_key_file)?.starts_with(SECRET_KEY_MAGIC) {
            return Err(DdiError::Status(EnigmaStatus::FfeCmdAbort));
        }
        let message = read(message_file)?;

        let index = state.xmss_index.to_be_bytes();
        write(signature_file, &[SIGNATURE_MAGIC, &index, &message].concat())?;
        state.xmss_index += 1;
        Ok(())
    }

    fn verify(&self, public_key_file: &CStr, signature_file: &CStr) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("XmssVerify")?;
        require_handle(&state)?;

        if !read(public_key_file)?.starts_with(PUBLIC_KEY_MAGIC) {
            return Err(DdiError::Status(EnigmaStatus::FfeCmdAbort));
        }
        if !read(signature_file)?.starts_with(SIGNATURE_MAGIC) {
            return Err(DdiError::Status(EnigmaStatus::FfeCmdAbort));
        }
        Ok(())
    }
}
