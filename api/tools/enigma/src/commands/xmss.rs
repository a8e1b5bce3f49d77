// Copyright (C) Microsoft Corporation. All rights reserved.

use std::path::Path;

use enigma_api::XmssDevice;
use enigma_ddi::XmssDev;
use serde_json::json;

use super::arg;
use crate::error::CliError;
use crate::error::CliResult;
use crate::response::Response;

pub(super) fn xmss_keygen<X: XmssDev>(
    device: &XmssDevice<X>,
    multi_tree: bool,
    oid: &str,
    secret_key: &Path,
    public_key: &Path,
) -> CliResult<Response> {
    device.key_gen(multi_tree, oid, secret_key, public_key)?;
    Ok(Response::success(
        "XMSS key pair generated successfully",
        Some(json!({
            "secretKeyFile": secret_key.display().to_string(),
            "publicKeyFile": public_key.display().to_string(),
        })),
    ))
}

pub(super) fn xmss_sign<X: XmssDev>(
    device: &XmssDevice<X>,
    secret_key_file: &Option<String>,
    message_file: &Option<String>,
    signature_file: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str =
        "Secret key file, message file, and signature file paths are required as arguments";
    let secret_key_file = arg(secret_key_file, MESSAGE)?;
    let message_file = arg(message_file, MESSAGE)?;
    let signature_file = arg(signature_file, MESSAGE)?;

    device.sign(
        Path::new(secret_key_file),
        Path::new(message_file),
        Path::new(signature_file),
    )?;
    Ok(Response::success(
        "XMSS signature created successfully",
        Some(json!({ "signatureFile": signature_file })),
    ))
}

pub(super) fn xmss_verify<X: XmssDev>(
    device: &XmssDevice<X>,
    public_key_file: &Option<String>,
    signature_file: &Option<String>,
    message_file: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str = "Public key file and signature file paths are required as arguments";
    let public_key_file = arg(public_key_file, MESSAGE)?;
    let signature_file = arg(signature_file, MESSAGE)?;
    if let Some(message_file) = message_file {
        tracing::info!(%message_file, "XmssVerify takes no message file, ignoring it");
    }

    device.verify(Path::new(public_key_file), Path::new(signature_file))?;
    Ok(Response::success(
        "XMSS signature verified successfully",
        Some(json!({ "verified": "true" })),
    ))
}

pub(super) fn xmss_param<X: XmssDev>(device: &XmssDevice<X>) -> CliResult<Response> {
    let params = device.params().map_err(CliError::XmssParam)?;
    Ok(Response::success(
        "XMSS parameters retrieved successfully",
        Some(json!({
            "index": params.index,
            "xmssID": params.xmss_id,
            "indexBytes": params.index_bytes,
        })),
    ))
}
