// Copyright (C) Microsoft Corporation. All rights reserved.

//! DDI Implementation - Native - Main library

use std::ffi::c_char;
use std::ffi::CStr;
use std::path::Path;

use enigma_ddi_interface::*;

use crate::library::VendorLibrary;

type FnVersion = unsafe extern "system" fn() -> *const c_char;
type FnDetect = unsafe extern "system" fn() -> u32;
type FnChipSn = unsafe extern "system" fn() -> *const u8;
type FnLoginStatus = unsafe extern "system" fn() -> u32;
type FnLogin = unsafe extern "system" fn(pin: *const c_char) -> u32;
type FnChangePin = unsafe extern "system" fn(old: *const c_char, new: *const c_char) -> u32;
type FnAesStream =
    unsafe extern "system" fn(input: *const u8, output: *mut u8, sectors: u32, enc: u32) -> u32;
type FnFileAes = unsafe extern "system" fn(
    source_dir: *const c_char,
    file_name: *const c_char,
    target_dir: *const c_char,
    enc: u32,
) -> u32;
type FnGenerateRsaKey = unsafe extern "system" fn(
    custom_id: *const u8,
    key_id: *mut u8,
    modulus: *mut u8,
    exponent: *mut u8,
) -> u32;
type FnStorePublicKey = unsafe extern "system" fn(
    custom_id: *const u8,
    modulus: *const u8,
    exponent: *const u8,
    key_id: *mut u8,
) -> u32;
type FnSetTransportKey =
    unsafe extern "system" fn(modulus: *const u8, exponent: *const u8, key_id: *mut u8) -> u32;
type FnListKeys =
    unsafe extern "system" fn(count: *mut u8, key_ids: *mut u8, custom_ids: *mut u8) -> u32;
type FnDeleteKey = unsafe extern "system" fn(key_id: *const u8) -> u32;
type FnResetKeys = unsafe extern "system" fn() -> u32;
type FnRsaEncrypt =
    unsafe extern "system" fn(key_id: *const u8, msg: *const u8, len: u32, out: *mut u8) -> u32;
type FnRsaDecrypt = unsafe extern "system" fn(
    key_id: *const u8,
    cipher: *const u8,
    plain: *mut u8,
    plain_len: *mut u32,
) -> u32;
type FnRsaSign =
    unsafe extern "system" fn(key_id: *const u8, msg: *const u8, len: u32, sig: *mut u8) -> u32;
type FnRsaVerify = unsafe extern "system" fn(
    key_id: *const u8,
    msg: *const u8,
    len: u32,
    sig: *const u8,
    valid: *mut u8,
) -> u32;

/// DDI Implementation - main vendor library
#[derive(Debug)]
pub struct DdiNativeDev {
    lib: VendorLibrary,
}

impl DdiNativeDev {
    pub(crate) fn open(path: &Path) -> DdiResult<Self> {
        Ok(Self {
            lib: VendorLibrary::load(path)?,
        })
    }
}

fn message_len(message: &[u8]) -> DdiResult<u32> {
    u32::try_from(message.len()).map_err(|_| DdiError::InvalidParameter)
}

impl EnigmaDev for DdiNativeDev {
    fn api_version(&self) -> DdiResult<String> {
        // SAFETY: signature matches `MXAPIVersion`.
        let proc = unsafe { self.lib.proc::<FnVersion>("MXAPIVersion")? };

        // SAFETY: no arguments; the result is checked for NULL below.
        let ptr = unsafe { proc() };
        if ptr.is_null() {
            return Err(DdiError::VersionUnavailable);
        }

        // SAFETY: the library returns a static NUL-terminated string.
        let version = unsafe { CStr::from_ptr(ptr) };
        Ok(version.to_string_lossy().into_owned())
    }

    fn detect(&self) -> DdiResult<bool> {
        // SAFETY: signature matches `mxApiDetectDev`.
        let proc = unsafe { self.lib.proc::<FnDetect>("mxApiDetectDev")? };

        // SAFETY: no arguments.
        let ret = unsafe { proc() };
        tracing::debug!(ret, "mxApiDetectDev");
        Ok(ret == 1)
    }

    fn chip_sn(&self) -> DdiResult<[u8; CHIP_SN_LEN]> {
        // SAFETY: signature matches `GetChipSN`.
        let proc = unsafe { self.lib.proc::<FnChipSn>("GetChipSN")? };

        // SAFETY: no arguments; the result is checked for NULL below.
        let ptr = unsafe { proc() };
        if ptr.is_null() {
            return Err(DdiError::UidUnavailable);
        }

        let mut sn = [0u8; CHIP_SN_LEN];
        // SAFETY: the library returns a pointer to a static 16-byte serial.
        sn.copy_from_slice(unsafe { std::slice::from_raw_parts(ptr, CHIP_SN_LEN) });
        Ok(sn)
    }

    fn login_status(&self) -> DdiResult<LoginStatusWord> {
        // SAFETY: signature matches `CheckLoginStatus`.
        let proc = unsafe { self.lib.proc::<FnLoginStatus>("CheckLoginStatus")? };

        // SAFETY: no arguments.
        let ret = unsafe { proc() };
        if ret == 0 {
            return Err(DdiError::LoginStatusUnavailable);
        }

        Ok(LoginStatusWord::from(ret))
    }

    fn login(&self, pin: &CStr) -> DdiResult<()> {
        // SAFETY: signature matches `mxLoginPIN`.
        let proc = unsafe { self.lib.proc::<FnLogin>("mxLoginPIN")? };

        // SAFETY: `pin` is NUL terminated and outlives the call.
        EnigmaStatus::check(unsafe { proc(pin.as_ptr()) })
    }

    fn change_pin(&self, old_pin: &CStr, new_pin: &CStr) -> DdiResult<()> {
        // SAFETY: signature matches `mxChangePIN`.
        let proc = unsafe { self.lib.proc::<FnChangePin>("mxChangePIN")? };

        // SAFETY: both strings are NUL terminated and outlive the call.
        EnigmaStatus::check(unsafe { proc(old_pin.as_ptr(), new_pin.as_ptr()) })
    }

    fn aes_stream(
        &self,
        input: &[u8],
        output: &mut [u8],
        sectors: u32,
        mode: AesMode,
    ) -> DdiResult<()> {
        let len = sectors as usize * SECTOR_SIZE;
        if sectors == 0 || input.len() != len || output.len() != len {
            tracing::error!(sectors, input = input.len(), output = output.len(), "bad sector buffers");
            return Err(DdiError::InvalidParameter);
        }

        // SAFETY: signature matches `AESStreamEncDec`.
        let proc = unsafe { self.lib.proc::<FnAesStream>("AESStreamEncDec")? };

        tracing::debug!(sectors, ?mode, "AESStreamEncDec");
        // SAFETY: both buffers hold `sectors` whole sectors.
        EnigmaStatus::check(unsafe {
            proc(input.as_ptr(), output.as_mut_ptr(), sectors, mode as u32)
        })
    }

    fn file_aes(
        &self,
        source_dir: &CStr,
        file_name: &CStr,
        target_dir: &CStr,
        mode: AesMode,
    ) -> DdiResult<()> {
        // SAFETY: signature matches `FileAES`.
        let proc = unsafe { self.lib.proc::<FnFileAes>("FileAES")? };

        tracing::debug!(?source_dir, ?file_name, ?target_dir, ?mode, "FileAES");
        // SAFETY: all strings are NUL terminated and outlive the call.
        EnigmaStatus::check(unsafe {
            proc(
                source_dir.as_ptr(),
                file_name.as_ptr(),
                target_dir.as_ptr(),
                mode as u32,
            )
        })
    }

    fn generate_rsa_key(
        &self,
        custom_id: &KeyId,
        key_id: &mut KeyId,
        modulus: &mut RsaField,
        exponent: &mut RsaField,
    ) -> DdiResult<()> {
        // SAFETY: signature matches `generate_rsa_key`.
        let proc = unsafe { self.lib.proc::<FnGenerateRsaKey>("generate_rsa_key")? };

        // SAFETY: every buffer has the fixed width the entry point expects.
        EnigmaStatus::check(unsafe {
            proc(
                custom_id.as_ptr(),
                key_id.as_mut_ptr(),
                modulus.as_mut_ptr(),
                exponent.as_mut_ptr(),
            )
        })
    }

    fn store_external_public_key(
        &self,
        custom_id: &KeyId,
        modulus: &RsaField,
        exponent: &RsaField,
        key_id: &mut KeyId,
    ) -> DdiResult<()> {
        // SAFETY: signature matches `store_external_public_key`.
        let proc = unsafe { self.lib.proc::<FnStorePublicKey>("store_external_public_key")? };

        // SAFETY: every buffer has the fixed width the entry point expects.
        EnigmaStatus::check(unsafe {
            proc(
                custom_id.as_ptr(),
                modulus.as_ptr(),
                exponent.as_ptr(),
                key_id.as_mut_ptr(),
            )
        })
    }

    fn set_transport_key(
        &self,
        modulus: &RsaField,
        exponent: &RsaField,
        key_id: &mut KeyId,
    ) -> DdiResult<()> {
        // SAFETY: signature matches `set_transport_key`.
        let proc = unsafe { self.lib.proc::<FnSetTransportKey>("set_transport_key")? };

        // SAFETY: every buffer has the fixed width the entry point expects.
        EnigmaStatus::check(unsafe {
            proc(modulus.as_ptr(), exponent.as_ptr(), key_id.as_mut_ptr())
        })
    }

    fn list_key_ids(
        &self,
        key_count: &mut u8,
        key_ids: &mut KeyTable,
        custom_ids: &mut KeyTable,
    ) -> DdiResult<()> {
        // SAFETY: signature matches `list_all_key_ids`.
        let proc = unsafe { self.lib.proc::<FnListKeys>("list_all_key_ids")? };

        // SAFETY: both tables hold MAX_KEY_SLOTS ids.
        EnigmaStatus::check(unsafe {
            proc(key_count, key_ids.as_mut_ptr(), custom_ids.as_mut_ptr())
        })
    }

    fn delete_key(&self, key_id: &KeyId) -> DdiResult<()> {
        // SAFETY: signature matches `delete_key`.
        let proc = unsafe { self.lib.proc::<FnDeleteKey>("delete_key")? };

        // SAFETY: `key_id` is a fixed-width id.
        EnigmaStatus::check(unsafe { proc(key_id.as_ptr()) })
    }

    fn reset_keys(&self) -> DdiResult<()> {
        // SAFETY: signature matches `reset_all_keys`.
        let proc = unsafe { self.lib.proc::<FnResetKeys>("reset_all_keys")? };

        // SAFETY: no arguments.
        EnigmaStatus::check(unsafe { proc() })
    }

    fn rsa_encrypt(
        &self,
        key_id: &KeyId,
        message: &[u8],
        cipher: &mut RsaField,
    ) -> DdiResult<()> {
        let len = message_len(message)?;

        // SAFETY: signature matches `rsa_encrypt`.
        let proc = unsafe { self.lib.proc::<FnRsaEncrypt>("rsa_encrypt")? };

        // SAFETY: `message` holds `len` bytes, `cipher` is a full RSA field.
        EnigmaStatus::check(unsafe {
            proc(key_id.as_ptr(), message.as_ptr(), len, cipher.as_mut_ptr())
        })
    }

    fn rsa_decrypt(
        &self,
        key_id: &KeyId,
        cipher: &RsaField,
        plain: &mut RsaField,
    ) -> DdiResult<usize> {
        // SAFETY: signature matches `rsa_decrypt`.
        let proc = unsafe { self.lib.proc::<FnRsaDecrypt>("rsa_decrypt")? };

        let mut plain_len = 0u32;
        // SAFETY: fixed-width buffers; `plain_len` outlives the call.
        EnigmaStatus::check(unsafe {
            proc(
                key_id.as_ptr(),
                cipher.as_ptr(),
                plain.as_mut_ptr(),
                &mut plain_len,
            )
        })?;

        Ok((plain_len as usize).min(RSA_FIELD_LEN))
    }

    fn rsa_sign(
        &self,
        key_id: &KeyId,
        message: &[u8],
        signature: &mut RsaField,
    ) -> DdiResult<()> {
        let len = message_len(message)?;

        // SAFETY: signature matches `rsa_sign`.
        let proc = unsafe { self.lib.proc::<FnRsaSign>("rsa_sign")? };

        // SAFETY: `message` holds `len` bytes, `signature` is a full RSA field.
        EnigmaStatus::check(unsafe {
            proc(key_id.as_ptr(), message.as_ptr(), len, signature.as_mut_ptr())
        })
    }

    fn rsa_verify(
        &self,
        key_id: &KeyId,
        message: &[u8],
        signature: &RsaField,
    ) -> DdiResult<bool> {
        let len = message_len(message)?;

        // SAFETY: signature matches `rsa_verify`.
        let proc = unsafe { self.lib.proc::<FnRsaVerify>("rsa_verify")? };

        let mut valid = 0u8;
        // SAFETY: `message` holds `len` bytes; `valid` outlives the call.
        EnigmaStatus::check(unsafe {
            proc(
                key_id.as_ptr(),
                message.as_ptr(),
                len,
                signature.as_ptr(),
                &mut valid,
            )
        })?;

        Ok(valid != 0)
    }
}
