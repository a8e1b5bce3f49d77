// Copyright (C) Microsoft Corporation. All rights reserved.

use enigma_api::EnigmaDevice;
use enigma_ddi::EnigmaDev;
use serde_json::json;

use crate::error::CliResult;
use crate::response::Response;

pub(super) fn version<E: EnigmaDev>(device: &EnigmaDevice<E>) -> CliResult<Response> {
    let version = device.version()?;
    Ok(Response::ok(Some(json!({ "version": version }))))
}

pub(super) fn detect_device<E: EnigmaDev>(device: &EnigmaDevice<E>) -> CliResult<Response> {
    device.detect()?;
    Ok(Response::ok(Some(json!({ "detected": true }))))
}

pub(super) fn uid<E: EnigmaDev>(device: &EnigmaDevice<E>) -> CliResult<Response> {
    let uid = device.uid()?;
    Ok(Response::ok(Some(json!({ "uid": uid }))))
}
