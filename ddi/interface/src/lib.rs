// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]

//! Device Driver Interface (DDI) interface library
//!
//! One trait method per vendor entry point. Implementations only move bytes
//! across the library boundary; sizing, padding and encoding live in the API
//! crate.

mod error;
mod layout;
mod status;

use std::ffi::CStr;
use std::path::Path;
use std::path::PathBuf;

pub use error::DdiError;
pub use layout::*;
pub use status::EnigmaStatus;

/// DDI Result
pub type DdiResult<T> = Result<T, DdiError>;

/// Which vendor library a command needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    /// Main library (PIN, AES, RSA, device queries)
    EnovaMx,

    /// XMSS / XMSS-MT library
    MxpXmss,
}

impl LibraryKind {
    /// Platform independent library stem
    pub fn stem(&self) -> &'static str {
        match self {
            LibraryKind::EnovaMx => "EnovaMX",
            LibraryKind::MxpXmss => "mxpxmss",
        }
    }
}

/// Device Driver Interface trait
pub trait Ddi: Default {
    /// Main library binding
    type Dev: EnigmaDev;

    /// XMSS library binding
    type XmssDev: XmssDev;

    /// Default location of the given library
    fn default_path(&self, kind: LibraryKind) -> PathBuf;

    /// Load the main library
    ///
    /// # Arguments
    /// `path` - Library path
    ///
    /// # Error
    /// * `DdiError` - Error encountered while loading the library
    fn open_dev(&self, path: &Path) -> DdiResult<Self::Dev>;

    /// Load the XMSS library
    ///
    /// # Arguments
    /// `path` - Library path
    ///
    /// # Error
    /// * `DdiError` - Error encountered while loading the library
    fn open_xmss_dev(&self, path: &Path) -> DdiResult<Self::XmssDev>;
}

/// Main vendor library entry points
pub trait EnigmaDev {
    /// `MXAPIVersion`
    fn api_version(&self) -> DdiResult<String>;

    /// `mxApiDetectDev`, true when a device is attached
    fn detect(&self) -> DdiResult<bool>;

    /// `GetChipSN`
    fn chip_sn(&self) -> DdiResult<[u8; CHIP_SN_LEN]>;

    /// `CheckLoginStatus`, the raw packed word
    fn login_status(&self) -> DdiResult<LoginStatusWord>;

    /// `mxLoginPIN`
    fn login(&self, pin: &CStr) -> DdiResult<()>;

    /// `mxChangePIN`
    fn change_pin(&self, old_pin: &CStr, new_pin: &CStr) -> DdiResult<()>;

    /// `AESStreamEncDec`
    ///
    /// Both buffers hold exactly `sectors * SECTOR_SIZE` bytes.
    fn aes_stream(&self, input: &[u8], output: &mut [u8], sectors: u32, mode: AesMode)
        -> DdiResult<()>;

    /// `FileAES`
    ///
    /// # Arguments
    /// * `source_dir` - Directory holding the source file
    /// * `file_name` - Source file name, `./` prefixed
    /// * `target_dir` - Output directory
    /// * `mode` - Direction
    fn file_aes(
        &self,
        source_dir: &CStr,
        file_name: &CStr,
        target_dir: &CStr,
        mode: AesMode,
    ) -> DdiResult<()>;

    /// `generate_rsa_key`
    fn generate_rsa_key(
        &self,
        custom_id: &KeyId,
        key_id: &mut KeyId,
        modulus: &mut RsaField,
        exponent: &mut RsaField,
    ) -> DdiResult<()>;

    /// `store_external_public_key`
    fn store_external_public_key(
        &self,
        custom_id: &KeyId,
        modulus: &RsaField,
        exponent: &RsaField,
        key_id: &mut KeyId,
    ) -> DdiResult<()>;

    /// `set_transport_key`
    fn set_transport_key(
        &self,
        modulus: &RsaField,
        exponent: &RsaField,
        key_id: &mut KeyId,
    ) -> DdiResult<()>;

    /// `list_all_key_ids`
    fn list_key_ids(
        &self,
        key_count: &mut u8,
        key_ids: &mut KeyTable,
        custom_ids: &mut KeyTable,
    ) -> DdiResult<()>;

    /// `delete_key`
    fn delete_key(&self, key_id: &KeyId) -> DdiResult<()>;

    /// `reset_all_keys`
    fn reset_keys(&self) -> DdiResult<()>;

    /// `rsa_encrypt`
    fn rsa_encrypt(&self, key_id: &KeyId, message: &[u8], cipher: &mut RsaField)
        -> DdiResult<()>;

    /// `rsa_decrypt`, returns the plaintext length written to `plain`
    fn rsa_decrypt(&self, key_id: &KeyId, cipher: &RsaField, plain: &mut RsaField)
        -> DdiResult<usize>;

    /// `rsa_sign`
    fn rsa_sign(&self, key_id: &KeyId, message: &[u8], signature: &mut RsaField)
        -> DdiResult<()>;

    /// `rsa_verify`, returns the device verdict
    fn rsa_verify(&self, key_id: &KeyId, message: &[u8], signature: &RsaField)
        -> DdiResult<bool>;
}

/// XMSS vendor library entry points
///
/// Every operation other than the handle calls must run between
/// [`XmssDev::open_handle`] and [`XmssDev::close_handle`].
pub trait XmssDev {
    /// `MxpOpenHandle`
    fn open_handle(&self) -> DdiResult<()>;

    /// `MxpCloseHandle`
    fn close_handle(&self) -> DdiResult<()>;

    /// `MxpGetParam`
    fn get_param(&self, param: &mut XmssParamRaw) -> DdiResult<()>;

    /// `XmssKeyGen`
    fn key_gen(
        &self,
        multi_tree: bool,
        oid: &CStr,
        secret_key_file: &CStr,
        public_key_file: &CStr,
    ) -> DdiResult<()>;

    /// `XmssSign`
    fn sign(&self, secret_key_file: &CStr, message_file: &CStr, signature_file: &CStr)
        -> DdiResult<()>;

    /// `XmssVerify`
    fn verify(&self, public_key_file: &CStr, signature_file: &CStr) -> DdiResult<()>;
}
