// Copyright (C) Microsoft Corporation. All rights reserved.

mod common;

use std::fs;

use enigma_api::codec::*;
use enigma_api::*;
use enigma_ddi_interface::EnigmaStatus;
use test_with_tracing::test;

use crate::common::*;

#[test]
fn test_aes_encrypt_decrypt() {
    session_test(|_ddi, device| {
        let cipher = device.aes_encrypt("hello enigma").unwrap();
        assert_eq!(decode_base64(&cipher).unwrap().len(), 16);

        let plain = device.aes_decrypt(&cipher).unwrap();
        assert_eq!(plain, "hello enigma");
    });
}

#[test]
fn test_aes_encrypt_block_multiple_adds_block() {
    session_test(|_ddi, device| {
        let cipher = device.encrypt_bytes(&[0x41; 32]).unwrap();
        assert_eq!(cipher.len(), 48);
        assert_eq!(device.decrypt_bytes(&cipher).unwrap(), vec![0x41; 32]);
    });
}

#[test]
fn test_aes_encrypt_spans_sectors() {
    session_test(|_ddi, device| {
        let plaintext = "x".repeat(1500);
        let cipher = device.aes_encrypt(&plaintext).unwrap();
        assert_eq!(decode_base64(&cipher).unwrap().len(), 1504);
        assert_eq!(device.aes_decrypt(&cipher).unwrap(), plaintext);
    });
}

#[test]
fn test_aes_encrypt_multibyte_text() {
    session_test(|_ddi, device| {
        let plaintext = "漢字テスト🔐".repeat(60);
        assert_eq!(plaintext.len(), 1140);

        let cipher = device.aes_encrypt(&plaintext).unwrap();
        assert_eq!(decode_base64(&cipher).unwrap().len(), 1152);
        assert_eq!(device.aes_decrypt(&cipher).unwrap(), plaintext);
    });
}

#[test]
fn test_aes_decrypt_invalid_utf8_is_replaced() {
    session_test(|_ddi, device| {
        // "漢" with its last byte cut off
        let cipher = device.encrypt_bytes(&[0xE6, 0xBC, b'!']).unwrap();
        let plain = device.aes_decrypt(&encode_base64(&cipher)).unwrap();
        assert_eq!(plain, "\u{FFFD}!");
    });
}

#[test]
fn test_aes_encrypt_empty() {
    session_test(|_ddi, device| {
        let cipher = device.encrypt_bytes(&[]).unwrap();
        assert_eq!(cipher.len(), 16);
        assert!(device.decrypt_bytes(&cipher).unwrap().is_empty());
    });
}

#[test]
fn test_aes_decrypt_invalid_base64() {
    session_test(|ddi, device| {
        let err = device.aes_decrypt("@@@").unwrap_err();
        assert!(err.to_string().starts_with("Invalid base64 encoding: "));
        assert_eq!(ddi.calls(), vec!["mxLoginPIN"]);
    });
}

#[test]
fn test_aes_decrypt_empty() {
    session_test(|_ddi, device| {
        assert!(matches!(
            device.aes_decrypt(""),
            Err(EnigmaError::InvalidArgument(_))
        ));
    });
}

#[test]
fn test_aes_requires_login() {
    api_test(|_ddi, device| {
        let err = device.aes_encrypt("secret").unwrap_err();
        assert_eq!(err.status(), Some(EnigmaStatus::EncStreamFail));
        assert_eq!(err.to_string(), "ERR_ENC_STREAM_FAIL");
    });
}

#[test]
fn test_aes_block() {
    session_test(|_ddi, device| {
        let block = *b"0123456789abcdef";
        let cipher = device.encrypt_block(&block).unwrap();
        assert_ne!(cipher, block);
        assert_eq!(device.decrypt_block(&cipher).unwrap(), block);
    });
}

#[test]
fn test_aes_file_roundtrip() {
    session_test(|_ddi, device| {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("report.txt");
        fs::write(&source, b"quarterly numbers").unwrap();

        let encrypted_dir = dir.path().join("encrypted");
        let encrypted = device.aes_encrypt_file(&source, &encrypted_dir).unwrap();
        assert_eq!(encrypted, encrypted_dir.join("report.txt.emx"));
        assert!(encrypted.exists());
        assert_ne!(fs::read(&encrypted).unwrap(), b"quarterly numbers");

        let decrypted_dir = dir.path().join("decrypted");
        let decrypted = device.aes_decrypt_file(&encrypted, &decrypted_dir).unwrap();
        assert_eq!(decrypted, decrypted_dir.join("report.txt"));
        assert_eq!(fs::read(&decrypted).unwrap(), b"quarterly numbers");
    });
}

#[test]
fn test_aes_file_target_path_is_cleaned() {
    session_test(|_ddi, device| {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"plain").unwrap();

        let target_dir = dir.path().join("./out/");
        let encrypted = device.aes_encrypt_file(&source, &target_dir).unwrap();
        assert_eq!(encrypted, dir.path().join("out").join("a.txt.emx"));
        assert!(encrypted.exists());

        let decrypted = device
            .aes_decrypt_file(&encrypted, &dir.path().join("plain/./"))
            .unwrap();
        assert_eq!(decrypted, dir.path().join("plain").join("a.txt"));
        assert_eq!(fs::read(&decrypted).unwrap(), b"plain");
    });
}

#[test]
fn test_aes_encrypt_file_missing_source() {
    session_test(|ddi, device| {
        let dir = tempfile::tempdir().unwrap();
        let err = device
            .aes_encrypt_file(&dir.path().join("missing.txt"), dir.path())
            .unwrap_err();
        assert_eq!(err.to_string(), "Source file does not exist");
        assert!(!ddi.calls().contains(&"FileAES"));
    });
}

#[test]
fn test_aes_decrypt_file_missing_source() {
    session_test(|_ddi, device| {
        let dir = tempfile::tempdir().unwrap();
        let err = device
            .aes_decrypt_file(&dir.path().join("missing.txt.emx"), dir.path())
            .unwrap_err();
        assert_eq!(err.to_string(), "Encrypted file does not exist");
    });
}

#[test]
fn test_aes_encrypt_file_target_exists() {
    session_test(|_ddi, device| {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.bin");
        fs::write(&source, [1, 2, 3]).unwrap();

        device.aes_encrypt_file(&source, dir.path()).unwrap();
        let err = device.aes_encrypt_file(&source, dir.path()).unwrap_err();
        assert_eq!(err.status(), Some(EnigmaStatus::TargetFileIsExist));
    });
}
