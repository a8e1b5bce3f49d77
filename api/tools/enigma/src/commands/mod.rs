// Copyright (C) Microsoft Corporation. All rights reserved.

//! One handler per subcommand, grouped by vendor feature.

mod aes;
mod device;
mod pin;
mod rsa;
mod xmss;

use enigma_api::EnigmaDevice;
use enigma_api::XmssDevice;
use enigma_ddi::Ddi;
use enigma_ddi::EnigmaDev;
use enigma_ddi::LibraryKind;
use enigma_ddi::XmssDev;

use crate::cli::CliArgs;
use crate::cli::Command;
use crate::error::CliError;
use crate::error::CliResult;
use crate::response::Response;

/// Run one invocation against `ddi`. Failures become error responses.
pub(crate) fn run<D: Ddi>(ddi: &D, args: &CliArgs) -> Response {
    match dispatch(ddi, args) {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(%err, "Command failed");
            Response::from(&err)
        }
    }
}

#[tracing::instrument(skip_all, fields(library = ?args.command.library()))]
fn dispatch<D: Ddi>(ddi: &D, args: &CliArgs) -> CliResult<Response> {
    match args.command.library() {
        LibraryKind::MxpXmss => {
            let path = args
                .xmss_library
                .clone()
                .unwrap_or_else(|| ddi.default_path(LibraryKind::MxpXmss));
            let device = XmssDevice::open(ddi, &path)?;
            run_xmss(&device, &args.command)
        }
        LibraryKind::EnovaMx => {
            let path = args
                .library
                .clone()
                .unwrap_or_else(|| ddi.default_path(LibraryKind::EnovaMx));
            let device = EnigmaDevice::open(ddi, &path)?;
            device.detect()?;

            // Probe only; commands that need a login fail on their own.
            match device.login_status() {
                Ok(state) => tracing::debug!(logged_in = state.logged_in, "Login probe"),
                Err(err) => tracing::debug!(%err, "Login probe failed"),
            }

            run_device(&device, &args.command)
        }
    }
}

fn run_device<E: EnigmaDev>(device: &EnigmaDevice<E>, command: &Command) -> CliResult<Response> {
    match command {
        Command::Version => device::version(device),
        Command::DetectDevice => device::detect_device(device),
        Command::Uid => device::uid(device),

        Command::LoginStatus => pin::login_status(device),
        Command::Login { pin } => pin::login(device, pin),
        Command::ChangePin { old_pin, new_pin } => pin::change_pin(device, old_pin, new_pin),

        Command::AesEncrypt { plaintext } => aes::aes_encrypt(device, plaintext),
        Command::AesDecrypt { ciphertext } => aes::aes_decrypt(device, ciphertext),
        Command::AesEncryptFile { source, target_dir } => {
            aes::aes_encrypt_file(device, source, target_dir)
        }
        Command::AesDecryptFile { source, target_dir } => {
            aes::aes_decrypt_file(device, source, target_dir)
        }

        Command::GenerateKey { custom_id } => rsa::generate_key(device, custom_id),
        Command::ImportKey {
            custom_id,
            public_key_n,
            public_key_e,
        } => rsa::import_key(device, custom_id, public_key_n, public_key_e),
        Command::SetTransKey {
            public_key_n,
            public_key_e,
        } => rsa::set_trans_key(device, public_key_n, public_key_e),
        Command::RsaEncrypt { key_id, message } => rsa::rsa_encrypt(device, key_id, message),
        Command::RsaDecrypt { key_id, ciphertext } => {
            rsa::rsa_decrypt(device, key_id, ciphertext)
        }
        Command::Sign { key_id, message } => rsa::sign(device, key_id, message),
        Command::Verify {
            key_id,
            message,
            signature,
        } => rsa::verify(device, key_id, message, signature),
        Command::DeleteKey { key_id } => rsa::delete_key(device, key_id),
        Command::ListKeys => rsa::list_keys(device),
        Command::ResetKeys => rsa::reset_keys(device),

        Command::XmssKeygen { .. }
        | Command::XmssSign { .. }
        | Command::XmssVerify { .. }
        | Command::XmssParam => Err(CliError::Usage(String::from(
            "XMSS commands need the XMSS library",
        ))),
    }
}

fn run_xmss<X: XmssDev>(device: &XmssDevice<X>, command: &Command) -> CliResult<Response> {
    match command {
        Command::XmssKeygen {
            mt,
            oid,
            secret_key,
            public_key,
        } => xmss::xmss_keygen(device, *mt, oid, secret_key, public_key),
        Command::XmssSign {
            secret_key_file,
            message_file,
            signature_file,
        } => xmss::xmss_sign(device, secret_key_file, message_file, signature_file),
        Command::XmssVerify {
            public_key_file,
            signature_file,
            message_file,
        } => xmss::xmss_verify(device, public_key_file, signature_file, message_file),
        Command::XmssParam => xmss::xmss_param(device),
        _ => Err(CliError::Usage(String::from(
            "only XMSS commands use the XMSS library",
        ))),
    }
}

/// Positional value, rejecting missing and empty ones with `message`.
fn arg<'a>(value: &'a Option<String>, message: &'static str) -> CliResult<&'a str> {
    match value.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CliError::MissingArgument(message)),
    }
}
