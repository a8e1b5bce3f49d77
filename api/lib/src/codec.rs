// Copyright (C) Microsoft Corporation. All rights reserved.

//! Byte-level conventions of the vendor ABI: padding, sector sizing,
//! fixed-width fields and the text encodings used on the command line.

use std::ffi::CString;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use enigma_ddi_interface::*;

use crate::EnigmaError;
use crate::EnigmaResult;

const PAD_MARKER: u8 = 0x80;

/// ISO/IEC 9797-1 padding method 2: append `0x80`, then zeros up to the next
/// multiple of `block_size`. Always adds at least one byte.
pub fn pad_iso9797_m2(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad_len = block_size - data.len() % block_size;

    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.push(PAD_MARKER);
    padded.resize(data.len() + pad_len, 0);
    padded
}

/// Strips ISO/IEC 9797-1 method 2 padding. Data without a marker after the
/// trailing zeros is returned unchanged.
pub fn unpad_iso9797_m2(data: &[u8]) -> &[u8] {
    match data.iter().rposition(|&b| b != 0) {
        Some(index) if data[index] == PAD_MARKER => &data[..index],
        _ => data,
    }
}

/// Number of whole transfer sectors needed for `len` bytes.
pub fn sector_count(len: usize) -> usize {
    len.div_ceil(SECTOR_SIZE)
}

/// Packs an ID into its 8-byte NUL-padded field.
pub fn pack_id(name: &'static str, value: &str) -> EnigmaResult<KeyId> {
    let bytes = value.as_bytes();
    if bytes.len() > KEY_ID_LEN {
        return Err(EnigmaError::FieldTooLong {
            name,
            max: KEY_ID_LEN,
            len: bytes.len(),
        });
    }
    if bytes.contains(&0) {
        return Err(EnigmaError::InteriorNul(name));
    }

    let mut id = [0u8; KEY_ID_LEN];
    id[..bytes.len()].copy_from_slice(bytes);
    Ok(id)
}

/// Renders an ID field as text, one character per non-NUL byte.
pub fn unpack_id(id: &[u8]) -> String {
    id.iter().filter(|&&b| b != 0).map(|&b| char::from(b)).collect()
}

/// Copies a modulus into the start of a 256-byte RSA field.
pub fn pack_modulus(value: &[u8]) -> EnigmaResult<RsaField> {
    if value.len() > RSA_FIELD_LEN {
        return Err(EnigmaError::FieldTooLong {
            name: "modulus",
            max: RSA_FIELD_LEN,
            len: value.len(),
        });
    }

    let mut field = [0u8; RSA_FIELD_LEN];
    field[..value.len()].copy_from_slice(value);
    Ok(field)
}

/// Right-aligns a big-endian value in a 256-byte RSA field.
pub fn pack_rsa_field(name: &'static str, value: &[u8]) -> EnigmaResult<RsaField> {
    let value = trim_leading_zeros(value);
    if value.len() > RSA_FIELD_LEN {
        return Err(EnigmaError::FieldTooLong {
            name,
            max: RSA_FIELD_LEN,
            len: value.len(),
        });
    }

    let mut field = [0u8; RSA_FIELD_LEN];
    field[RSA_FIELD_LEN - value.len()..].copy_from_slice(value);
    Ok(field)
}

/// Drops leading zero bytes, keeping the last byte of an all-zero value.
pub fn trim_leading_zeros(data: &[u8]) -> &[u8] {
    match data.iter().position(|&b| b != 0) {
        Some(index) => &data[index..],
        None => &data[data.len().saturating_sub(1)..],
    }
}

/// Non-empty IDs of a key table, in slot order.
pub fn parse_key_table(table: &KeyTable) -> Vec<String> {
    table
        .chunks_exact(KEY_ID_LEN)
        .filter(|slot| slot.iter().any(|&b| b != 0))
        .map(unpack_id)
        .collect()
}

/// Standard base64 with padding.
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Standard base64 with padding.
pub fn decode_base64(text: &str) -> EnigmaResult<Vec<u8>> {
    Ok(STANDARD.decode(text)?)
}

pub(crate) fn c_string(name: &'static str, value: &str) -> EnigmaResult<CString> {
    CString::new(value).map_err(|_| EnigmaError::InteriorNul(name))
}

pub(crate) fn path_c_string(name: &'static str, path: &Path) -> EnigmaResult<CString> {
    let text = path
        .to_str()
        .ok_or_else(|| EnigmaError::InvalidArgument(format!("{name} is not valid UTF-8")))?;
    c_string(name, text)
}

/// Lexically cleaned path: `.` segments and trailing separators dropped,
/// `..` folded into its parent where there is one. An empty result is `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use test_with_tracing::test;

    use super::*;

    #[test]
    fn test_pad_partial_block() {
        let padded = pad_iso9797_m2(b"hello", AES_BLOCK_SIZE);
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[..5], b"hello");
        assert_eq!(padded[5], 0x80);
        assert!(padded[6..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pad_full_block_adds_block() {
        let padded = pad_iso9797_m2(&[0x41; 16], AES_BLOCK_SIZE);
        assert_eq!(padded.len(), 32);
        assert_eq!(padded[16], 0x80);
    }

    #[test]
    fn test_pad_empty() {
        let padded = pad_iso9797_m2(&[], AES_BLOCK_SIZE);
        assert_eq!(padded.len(), 16);
        assert_eq!(padded[0], 0x80);
    }

    #[test]
    fn test_unpad() {
        let padded = pad_iso9797_m2(b"some text", AES_BLOCK_SIZE);
        assert_eq!(unpad_iso9797_m2(&padded), b"some text");
    }

    #[test]
    fn test_unpad_ignores_trailing_zeros_after_marker() {
        let mut data = pad_iso9797_m2(b"abc", AES_BLOCK_SIZE);
        data.resize(SECTOR_SIZE, 0);
        assert_eq!(unpad_iso9797_m2(&data), b"abc");
    }

    #[test]
    fn test_unpad_without_marker_is_unchanged() {
        let data = [0x41, 0x42, 0x00, 0x00];
        assert_eq!(unpad_iso9797_m2(&data), &data);
        assert_eq!(unpad_iso9797_m2(&[0u8; 4]), &[0u8; 4]);
        assert_eq!(unpad_iso9797_m2(&[]), &[] as &[u8]);
    }

    #[test]
    fn test_sector_count() {
        assert_eq!(sector_count(0), 0);
        assert_eq!(sector_count(1), 1);
        assert_eq!(sector_count(512), 1);
        assert_eq!(sector_count(513), 2);
        assert_eq!(sector_count(2064), 5);
    }

    #[test]
    fn test_pack_id() {
        assert_eq!(&pack_id("key id", "abc").unwrap(), b"abc\0\0\0\0\0");
        assert_eq!(&pack_id("key id", "enova-00").unwrap(), b"enova-00");
    }

    #[test]
    fn test_pack_id_rejects_long_and_nul() {
        let err = pack_id("custom id", "too-long-id").unwrap_err();
        assert_eq!(err.to_string(), "custom id must be at most 8 bytes, got 11");

        assert!(matches!(
            pack_id("custom id", "a\0b"),
            Err(EnigmaError::InteriorNul("custom id"))
        ));
    }

    #[test]
    fn test_unpack_id_drops_nul() {
        assert_eq!(unpack_id(b"abc\0\0\0\0\0"), "abc");
        assert_eq!(unpack_id(b"\0a\0b\0\0\0\0"), "ab");
        assert_eq!(unpack_id(&[0xE9, 0, 0, 0, 0, 0, 0, 0]), "\u{e9}");
    }

    #[test]
    fn test_pack_rsa_field_right_aligns() {
        let field = pack_rsa_field("exponent", &[0x01, 0x00, 0x01]).unwrap();
        assert!(field[..253].iter().all(|&b| b == 0));
        assert_eq!(&field[253..], &[0x01, 0x00, 0x01]);
    }

    #[test]
    fn test_pack_rsa_field_full_width() {
        let value = [0xC3u8; RSA_FIELD_LEN];
        assert_eq!(pack_rsa_field("modulus", &value).unwrap(), value);
    }

    #[test]
    fn test_pack_modulus_left_aligns() {
        let field = pack_modulus(&[0xC5; 128]).unwrap();
        assert!(field[..128].iter().all(|&b| b == 0xC5));
        assert!(field[128..].iter().all(|&b| b == 0));

        assert!(matches!(
            pack_modulus(&[0xC5; RSA_FIELD_LEN + 1]),
            Err(EnigmaError::FieldTooLong { name: "modulus", .. })
        ));
    }

    #[test]
    fn test_pack_rsa_field_too_long() {
        let value = [0x01u8; RSA_FIELD_LEN + 1];
        assert!(matches!(
            pack_rsa_field("modulus", &value),
            Err(EnigmaError::FieldTooLong { max: 256, len: 257, .. })
        ));
    }

    #[test]
    fn test_trim_leading_zeros() {
        assert_eq!(trim_leading_zeros(&[0, 0, 1, 0, 1]), &[1, 0, 1]);
        assert_eq!(trim_leading_zeros(&[0, 0, 0]), &[0]);
        assert_eq!(trim_leading_zeros(&[]), &[] as &[u8]);
    }

    #[test]
    fn test_parse_key_table_skips_empty_slots() {
        let mut table = [0u8; KEY_ID_LEN * MAX_KEY_SLOTS];
        table[..8].copy_from_slice(b"enova-00");
        table[16..21].copy_from_slice(b"abcde");

        assert_eq!(parse_key_table(&table), vec!["enova-00", "abcde"]);
    }

    #[test]
    fn test_base64() {
        assert_eq!(encode_base64(&[0x80, 0xD6, 0x41, 0xFB]), "gNZB+w==");
        assert_eq!(decode_base64("gNZB+w==").unwrap(), vec![0x80, 0xD6, 0x41, 0xFB]);

        let err = decode_base64("not base64!").unwrap_err();
        assert!(err.to_string().starts_with("Invalid base64 encoding"));
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("./out/")), PathBuf::from("out"));
        assert_eq!(
            clean_path(&Path::new("./out/").join("a.txt.emx")),
            PathBuf::from("out/a.txt.emx")
        );
        assert_eq!(clean_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(clean_path(Path::new("../x/..")), PathBuf::from(".."));
        assert_eq!(clean_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(clean_path(Path::new("./")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("")), PathBuf::from("."));
    }
}
