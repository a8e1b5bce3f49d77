// Copyright (C) Microsoft Corporation. All rights reserved.

use std::path::Path;

use enigma_api::EnigmaDevice;
use enigma_ddi::EnigmaDev;
use serde_json::json;

use super::arg;
use crate::error::CliResult;
use crate::response::Response;

pub(super) fn aes_encrypt<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    plaintext: &Option<String>,
) -> CliResult<Response> {
    let plaintext = arg(plaintext, "Plaintext is required as an argument")?;
    let cipher = device.aes_encrypt(plaintext)?;
    Ok(Response::ok(Some(json!(cipher))))
}

pub(super) fn aes_decrypt<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    ciphertext: &Option<String>,
) -> CliResult<Response> {
    let ciphertext = arg(
        ciphertext,
        "Base64 encoded ciphertext is required as an argument",
    )?;
    let plaintext = device.aes_decrypt(ciphertext)?;
    Ok(Response::ok(Some(json!(plaintext))))
}

pub(super) fn aes_encrypt_file<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    source: &Option<String>,
    target_dir: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str = "Source file path and target directory are required arguments";
    let source = arg(source, MESSAGE)?;
    let target_dir = arg(target_dir, MESSAGE)?;

    let encrypted = device.aes_encrypt_file(Path::new(source), Path::new(target_dir))?;
    Ok(Response::ok(Some(json!({
        "encrypted_file": encrypted.display().to_string(),
    }))))
}

pub(super) fn aes_decrypt_file<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    source: &Option<String>,
    target_dir: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str = "Encrypted file path and target directory are required arguments";
    let source = arg(source, MESSAGE)?;
    let target_dir = arg(target_dir, MESSAGE)?;

    let decrypted = device.aes_decrypt_file(Path::new(source), Path::new(target_dir))?;
    Ok(Response::ok(Some(json!({
        "decrypted_file": decrypted.display().to_string(),
    }))))
}
