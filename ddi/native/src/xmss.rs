// Copyright (C) Microsoft Corporation. All rights reserved.

//! DDI Implementation - Native - XMSS library

use std::ffi::c_char;
use std::ffi::CStr;
use std::path::Path;

use enigma_ddi_interface::*;
use zerocopy::IntoBytes;

use crate::library::VendorLibrary;

type FnHandle = unsafe extern "system" fn() -> u32;
type FnGetParam = unsafe extern "system" fn(param: *mut u8) -> u32;
type FnKeyGen = unsafe extern "system" fn(
    is_mt: u8,
    oid: *const c_char,
    secret_key: *const c_char,
    public_key: *const c_char,
) -> u32;
type FnSign = unsafe extern "system" fn(
    secret_key: *const c_char,
    message: *const c_char,
    signature: *const c_char,
) -> u32;
type FnVerify =
    unsafe extern "system" fn(public_key: *const c_char, signature: *const c_char) -> u32;

/// DDI Implementation - XMSS vendor library
#[derive(Debug)]
pub struct DdiNativeXmssDev {
    lib: VendorLibrary,
}

impl DdiNativeXmssDev {
    pub(crate) fn open(path: &Path) -> DdiResult<Self> {
        Ok(Self {
            lib: VendorLibrary::load(path)?,
        })
    }

    fn call_handle(&self, name: &'static str) -> DdiResult<()> {
        // SAFETY: both handle entry points take no arguments.
        let proc = unsafe { self.lib.proc::<FnHandle>(name)? };

        tracing::trace!(name, "XMSS handle call");
        // SAFETY: no arguments.
        EnigmaStatus::check(unsafe { proc() })
    }
}

impl XmssDev for DdiNativeXmssDev {
    fn open_handle(&self) -> DdiResult<()> {
        self.call_handle("MxpOpenHandle")
    }

    fn close_handle(&self) -> DdiResult<()> {
        self.call_handle("MxpCloseHandle")
    }

    fn get_param(&self, param: &mut XmssParamRaw) -> DdiResult<()> {
        // SAFETY: signature matches `MxpGetParam`.
        let proc = unsafe { self.lib.proc::<FnGetParam>("MxpGetParam")? };

        let bytes = param.as_mut_bytes();
        debug_assert_eq!(bytes.len(), XMSS_PARAM_LEN);
        // SAFETY: `bytes` covers the whole parameter block.
        EnigmaStatus::check(unsafe { proc(bytes.as_mut_ptr()) })
    }

    fn key_gen(
        &self,
        multi_tree: bool,
        oid: &CStr,
        secret_key_file: &CStr,
        public_key_file: &CStr,
    ) -> DdiResult<()> {
        // SAFETY: signature matches `XmssKeyGen`.
        let proc = unsafe { self.lib.proc::<FnKeyGen>("XmssKeyGen")? };

        tracing::debug!(multi_tree, ?oid, "XmssKeyGen");
        // SAFETY: all strings are NUL terminated and outlive the call.
        EnigmaStatus::check(unsafe {
            proc(
                u8::from(multi_tree),
                oid.as_ptr(),
                secret_key_file.as_ptr(),
                public_key_file.as_ptr(),
            )
        })
    }

    fn sign(
        &self,
        secret_key_file: &CStr,
        message_file: &CStr,
        signature_file: &CStr,
    ) -> DdiResult<()> {
        // SAFETY: signature matches `XmssSign`.
        let proc = unsafe { self.lib.proc::<FnSign>("XmssSign")? };

        // SAFETY: all strings are NUL terminated and outlive the call.
        EnigmaStatus::check(unsafe {
            proc(
                secret_key_file.as_ptr(),
                message_file.as_ptr(),
                signature_file.as_ptr(),
            )
        })
    }

    fn verify(&self, public_key_file: &CStr, signature_file: &CStr) -> DdiResult<()> {
        // SAFETY: signature matches `XmssVerify`.
        let proc = unsafe { self.lib.proc::<FnVerify>("XmssVerify")? };

        // SAFETY: all strings are NUL terminated and outlive the call.
        EnigmaStatus::check(unsafe { proc(public_key_file.as_ptr(), signature_file.as_ptr()) })
    }
}
