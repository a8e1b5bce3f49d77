// Copyright (C) Microsoft Corporation. All rights reserved.

use enigma_api::EnigmaDevice;
use enigma_ddi::EnigmaDev;
use serde_json::json;
use serde_json::Value;

use super::arg;
use crate::error::CliResult;
use crate::response::Response;

fn login_data(logged_in: bool, retry_count: u8, retry_count_valid: bool) -> Value {
    json!({
        "login_status": logged_in,
        "retry_count": retry_count,
        "retry_count_valid": retry_count_valid,
    })
}

/// Reports the login state on the error path as well.
pub(super) fn login_status<E: EnigmaDev>(device: &EnigmaDevice<E>) -> CliResult<Response> {
    let state = match device.login_status() {
        Ok(state) => state,
        Err(err) => {
            return Ok(Response::error(
                err.to_string(),
                Some(login_data(false, 0, false)),
            ));
        }
    };

    let data = login_data(state.logged_in, state.retry_count, state.retry_count_valid);
    Ok(match state.check() {
        Ok(()) => Response::ok(Some(data)),
        Err(err) => Response::error(err.to_string(), Some(data)),
    })
}

pub(super) fn login<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    pin: &Option<String>,
) -> CliResult<Response> {
    let pin = arg(pin, "PIN is required as an argument")?;
    device.login(pin)?;
    Ok(Response::ok(None))
}

pub(super) fn change_pin<E: EnigmaDev>(
    device: &EnigmaDevice<E>,
    old_pin: &Option<String>,
    new_pin: &Option<String>,
) -> CliResult<Response> {
    const MESSAGE: &str = "Old pin and new pin must not be empty";
    let old_pin = arg(old_pin, MESSAGE)?;
    let new_pin = arg(new_pin, MESSAGE)?;

    device.change_pin(old_pin, new_pin)?;
    Ok(Response::ok(None))
}
