// Copyright (C) Microsoft Corporation. All rights reserved.

mod common;

use enigma_api::codec::*;
use enigma_api::*;
use enigma_ddi_interface::EnigmaStatus;
use enigma_ddi_interface::MAX_KEY_SLOTS;
use enigma_ddi_interface::RSA_FIELD_LEN;
use test_with_tracing::test;

use crate::common::*;

#[test]
fn test_generate_key() {
    session_test(|_ddi, device| {
        let key = device.generate_key(TEST_CUSTOM_ID).unwrap();
        assert_eq!(key.key_id, "enova-00");
        assert_eq!(key.modulus.len(), RSA_FIELD_LEN);
        assert_eq!(key.exponent, vec![0x01, 0x00, 0x01]);
        assert_eq!(encode_base64(&key.exponent), "AQAB");
    });
}

#[test]
fn test_generate_key_custom_id_too_long() {
    session_test(|ddi, device| {
        let err = device.generate_key("much-too-long").unwrap_err();
        assert!(matches!(err, EnigmaError::FieldTooLong { .. }));
        assert!(!ddi.calls().contains(&"generate_rsa_key"));
    });
}

#[test]
fn test_generate_key_requires_login() {
    api_test(|_ddi, device| {
        let err = device.generate_key(TEST_CUSTOM_ID).unwrap_err();
        assert_eq!(err.status(), Some(EnigmaStatus::MxHandleFail));
    });
}

#[test]
fn test_list_keys() {
    session_test(|_ddi, device| {
        assert_eq!(device.list_keys().unwrap(), KeyListing::default());

        device.generate_key("alpha").unwrap();
        let key = device.generate_key("beta").unwrap();
        let modulus = key.modulus.clone();
        device.import_key("gamma", &modulus, &[0x01, 0x00, 0x01]).unwrap();

        let listing = device.list_keys().unwrap();
        assert_eq!(listing.key_count, 3);
        assert_eq!(listing.key_ids, vec!["enova-00", "enova-01", "extrn-02"]);
        assert_eq!(listing.custom_key_ids, vec!["alpha", "beta", "gamma"]);
    });
}

#[test]
fn test_key_table_full() {
    session_test(|_ddi, device| {
        for i in 0..MAX_KEY_SLOTS {
            device.generate_key(&format!("key{i}")).unwrap();
        }
        let err = device.generate_key("overflow").unwrap_err();
        assert_eq!(err.to_string(), "ERR_MX_UPDATE_KEY_FAIL");
    });
}

#[test]
fn test_delete_and_reset_keys() {
    session_test(|_ddi, device| {
        let first = device.generate_key("one").unwrap();
        device.generate_key("two").unwrap();
        device.generate_key("three").unwrap();

        device.delete_key(&first.key_id).unwrap();
        let listing = device.list_keys().unwrap();
        assert_eq!(listing.key_count, 2);
        assert_eq!(listing.custom_key_ids, vec!["two", "three"]);

        let err = device.delete_key(&first.key_id).unwrap_err();
        assert_eq!(err.to_string(), "ERR_MX_NO_EXIST");

        device.reset_keys().unwrap();
        assert_eq!(device.list_keys().unwrap().key_count, 0);
    });
}

#[test]
fn test_import_key_short_fields() {
    session_test(|_ddi, device| {
        let key_id = device.import_key("short", &[0xC5; 128], &[0x03]).unwrap();
        assert_eq!(key_id, "extrn-00");
    });
}

#[test]
fn test_import_key_modulus_too_long() {
    session_test(|_ddi, device| {
        let err = device
            .import_key("big", &[0xC5; RSA_FIELD_LEN + 1], &[0x03])
            .unwrap_err();
        assert_eq!(err.to_string(), "modulus must be at most 256 bytes, got 257");
    });
}

#[test]
fn test_set_transport_key() {
    session_test(|_ddi, device| {
        let key = device.generate_key("source").unwrap();
        let key_id = device.set_transport_key(&key.modulus, &key.exponent).unwrap();
        assert_eq!(key_id, "trans-01");

        // Transport key is not part of the key table
        assert_eq!(device.list_keys().unwrap().key_count, 1);
    });
}

#[test]
fn test_rsa_encrypt_decrypt() {
    session_test(|_ddi, device| {
        let key = device.generate_key(TEST_CUSTOM_ID).unwrap();

        let cipher = device.rsa_encrypt(&key.key_id, "wire transfer").unwrap();
        assert_eq!(decode_base64(&cipher).unwrap().len(), RSA_FIELD_LEN);

        let plain = device.rsa_decrypt(&key.key_id, &cipher).unwrap();
        assert_eq!(plain, "wire transfer");
    });
}

#[test]
fn test_rsa_decrypt_wrong_length() {
    session_test(|_ddi, device| {
        let key = device.generate_key(TEST_CUSTOM_ID).unwrap();
        let err = device
            .rsa_decrypt(&key.key_id, &encode_base64(&[0u8; 16]))
            .unwrap_err();
        assert!(matches!(err, EnigmaError::InvalidArgument(_)));
    });
}

#[test]
fn test_rsa_encrypt_unknown_key() {
    session_test(|_ddi, device| {
        let err = device.rsa_encrypt("nokey", "data").unwrap_err();
        assert_eq!(err.status(), Some(EnigmaStatus::MxNoExist));
    });
}

#[test]
fn test_sign_verify() {
    session_test(|_ddi, device| {
        let key = device.generate_key(TEST_CUSTOM_ID).unwrap();

        let signature = device.sign(&key.key_id, "approve").unwrap();
        assert!(device.verify(&key.key_id, "approve", &signature).unwrap());
        assert!(!device.verify(&key.key_id, "reject", &signature).unwrap());
    });
}

#[test]
fn test_verify_bad_signature_encoding() {
    session_test(|_ddi, device| {
        let key = device.generate_key(TEST_CUSTOM_ID).unwrap();

        let err = device.verify(&key.key_id, "approve", "***").unwrap_err();
        assert!(matches!(err, EnigmaError::Base64(_)));

        let err = device
            .verify(&key.key_id, "approve", &encode_base64(b"short"))
            .unwrap_err();
        assert!(matches!(err, EnigmaError::InvalidArgument(_)));
    });
}
