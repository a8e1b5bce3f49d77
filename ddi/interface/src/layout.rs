// Copyright (C) Microsoft Corporation. All rights reserved.

//! Fixed-width buffers exchanged with the vendor libraries

use bitfield_struct::bitfield;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;
use zerocopy::KnownLayout;

/// Width of key IDs and custom key IDs
pub const KEY_ID_LEN: usize = 8;

/// Width of RSA modulus, exponent, ciphertext and signature fields
pub const RSA_FIELD_LEN: usize = 256;

/// AES block size
pub const AES_BLOCK_SIZE: usize = 16;

/// AES stream transfer unit
pub const SECTOR_SIZE: usize = 512;

/// Number of key slots reported by `list_all_key_ids`
pub const MAX_KEY_SLOTS: usize = 16;

/// Width of the chip serial number
pub const CHIP_SN_LEN: usize = 16;

/// 8-byte key or custom ID, NUL padded
pub type KeyId = [u8; KEY_ID_LEN];

/// 256-byte big-endian RSA field
pub type RsaField = [u8; RSA_FIELD_LEN];

/// Key table as returned by `list_all_key_ids`
pub type KeyTable = [u8; KEY_ID_LEN * MAX_KEY_SLOTS];

/// AES direction flag passed to `AESStreamEncDec` and `FileAES`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AesMode {
    /// Decrypt
    Decrypt = 0,

    /// Encrypt
    Encrypt = 1,
}

/// Packed word returned by `CheckLoginStatus`, least significant byte first.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct LoginStatusWord {
    /// Vendor status of the login state
    pub result: u8,

    /// Non-zero when `retry_count_left` is meaningful
    pub retry_count_valid: u8,

    /// Remaining PIN attempts
    pub retry_count_left: u8,

    #[bits(8)]
    _reserved: u8,
}

/// Output block of `MxpGetParam`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct XmssParamRaw {
    /// Next one-time signature index, device byte order
    pub index: [u8; 8],

    /// XMSS parameter set identifier
    pub xmss_id: u8,

    /// Number of significant bytes in `index`
    pub index_bytes: u8,
}

/// Size of [`XmssParamRaw`] on the wire
pub const XMSS_PARAM_LEN: usize = core::mem::size_of::<XmssParamRaw>();

#[cfg(test)]
mod tests {
    use test_with_tracing::test;

    use super::*;

    #[test]
    fn test_login_status_word_byte_order() {
        let word = LoginStatusWord::from(u32::from_le_bytes([0x33, 0x01, 0x04, 0x00]));
        assert_eq!(word.result(), 0x33);
        assert_eq!(word.retry_count_valid(), 0x01);
        assert_eq!(word.retry_count_left(), 0x04);
    }

    #[test]
    fn test_login_status_word_build() {
        let word = LoginStatusWord::new()
            .with_retry_count_valid(1)
            .with_retry_count_left(9);
        assert_eq!(u32::from(word).to_le_bytes(), [0x00, 0x01, 0x09, 0x00]);
    }

    #[test]
    fn test_xmss_param_layout() {
        assert_eq!(XMSS_PARAM_LEN, 10);

        let mut raw = XmssParamRaw::default();
        raw.as_mut_bytes()
            .copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 0x0A, 0x04]);
        assert_eq!(raw.index, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(raw.xmss_id, 0x0A);
        assert_eq!(raw.index_bytes, 0x04);
    }
}
