// Copyright (C) Microsoft Corporation. All rights reserved.

use enigma_api::codec::decode_base64;
use enigma_api::codec::encode_base64;
use enigma_api::EnigmaDevice;
use enigma_ddi::EnigmaDev;
use serde_json::json;

use super::arg;
use crate::error::CliResult;
use crate::response::Response;

pub(super) fn generate_key<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    custom_id: &Option<String>,
) -> CliResult<Response> {
    let custom_id = arg(custom_id, "Custom ID is required as an argument")?;
    let key = device.generate_key(custom_id)?;
    Ok(Response::ok(Some(json!({
        "key_id": key.key_id,
        "public_key": encode_base64(&key.modulus),
        "exponent": encode_base64(&key.exponent),
    }))))
}

pub(super) fn import_key<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    custom_id: &Option<String>,
    public_key_n: &Option<String>,
    public_key_e: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str = "Custom ID, public key N and public key E are required as arguments";
    let custom_id = arg(custom_id, MESSAGE)?;
    let modulus = decode_base64(arg(public_key_n, MESSAGE)?)?;
    let exponent = decode_base64(arg(public_key_e, MESSAGE)?)?;

    let key_id = device.import_key(custom_id, &modulus, &exponent)?;
    Ok(Response::ok(Some(json!({ "key_id": key_id }))))
}

pub(super) fn set_trans_key<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    public_key_n: &Option<String>,
    public_key_e: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str = "Public key N and public key E are required as arguments";
    let modulus = decode_base64(arg(public_key_n, MESSAGE)?)?;
    let exponent = decode_base64(arg(public_key_e, MESSAGE)?)?;

    let key_id = device.set_transport_key(&modulus, &exponent)?;
    Ok(Response::ok(Some(json!({ "key_id": key_id }))))
}

pub(super) fn rsa_encrypt<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    key_id: &Option<String>,
    message: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str = "Key ID and message are required as arguments";
    let key_id = arg(key_id, MESSAGE)?;
    let message = arg(message, MESSAGE)?;

    let cipher = device.rsa_encrypt(key_id, message)?;
    Ok(Response::ok(Some(json!(cipher))))
}

pub(super) fn rsa_decrypt<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    key_id: &Option<String>,
    ciphertext: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str = "Key ID and cipher are required as arguments";
    let key_id = arg(key_id, MESSAGE)?;
    let ciphertext = arg(ciphertext, MESSAGE)?;

    let plaintext = device.rsa_decrypt(key_id, ciphertext)?;
    Ok(Response::ok(Some(json!(plaintext))))
}

pub(super) fn sign<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    key_id: &Option<String>,
    message: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str = "Key ID and message are required as arguments";
    let key_id = arg(key_id, MESSAGE)?;
    let message = arg(message, MESSAGE)?;

    let signature = device.sign(key_id, message)?;
    Ok(Response::ok(Some(json!(signature))))
}

pub(super) fn verify<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    key_id: &Option<String>,
    message: &Option<String>,
    signature: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str = "Key ID, message, and signature are required as arguments";
    let key_id = arg(key_id, MESSAGE)?;
    let message = arg(message, MESSAGE)?;
    let signature = arg(signature, MESSAGE)?;

    let valid = device.verify(key_id, message, signature)?;
    Ok(Response::ok(Some(json!(valid))))
}

pub(super) fn delete_key<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    key_id: &Option<String>,
) -> CliResult<Response> {
    let key_id = arg(key_id, "Key ID is required as an argument")?;
    device.delete_key(key_id)?;
    Ok(Response::ok(None))
}

pub(super) fn list_keys<E: EnigmaDev>(device: &EnigmaDevice<E>) -> CliResult<Response> {
    let listing = device.list_keys()?;
    Ok(Response::ok(Some(json!({
        "key_count": listing.key_count,
        "key_ids": listing.key_ids,
        "custom_key_ids": listing.custom_key_ids,
    }))))
}

pub(super) fn reset_keys<E: EnigmaDev>(device: &EnigmaDevice<E>) -> CliResult<Response> {
    device.reset_keys()?;
    Ok(Response::ok(None))
}
