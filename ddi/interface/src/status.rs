// Copyright (C) Microsoft Corporation. All rights reserved.

//! Vendor status codes

use std::fmt;

use open_enum::open_enum;

use crate::DdiError;
use crate::DdiResult;

/// One-byte status returned by every status-bearing vendor entry point.
///
/// Unknown codes are kept as-is and render as `UNKNOWN`.
#[open_enum]
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[repr(u8)]
pub enum EnigmaStatus {
    /// Operation was successful
    StatusOk = 0x00,

    /// Library or device does not exist
    MxNoExist = 0x01,

    /// Device handle could not be obtained
    MxHandleFail = 0x02,

    /// Key table update failed
    MxUpdateKeyFail = 0x10,

    /// Login command could not be sent
    SendLoginCmdFail = 0x31,

    /// PIN length rejected by the device
    InvalidPwdLength = 0x32,

    /// Wrong PIN
    LoginFail = 0x33,

    /// PIN retry counter exhausted
    OverFailRetryCount = 0x35,

    /// Source file could not be opened
    SourceFileOpenFail = 0x50,

    /// Target file already exists
    TargetFileIsExist = 0x51,

    /// Target file could not be opened
    TargetFileOpenFail = 0x52,

    /// Encryption stream failure
    EncStreamFail = 0x54,

    /// Decryption stream failure
    DecStreamFail = 0x58,

    /// Command aborted by firmware
    FfeCmdAbort = 0x64,

    /// Library license is invalid
    MxLicenseInvalid = 0xFE,
}

impl EnigmaStatus {
    /// Static vendor name of the status code.
    pub fn message(&self) -> &'static str {
        match *self {
            EnigmaStatus::StatusOk => "STATUS_OK",
            EnigmaStatus::MxNoExist => "ERR_MX_NO_EXIST",
            EnigmaStatus::MxHandleFail => "ERR_MX_HANDLE_FAIL",
            EnigmaStatus::MxUpdateKeyFail => "ERR_MX_UPDATE_KEY_FAIL",
            EnigmaStatus::SendLoginCmdFail => "ERR_SEND_LOGIN_CMD_FAIL",
            EnigmaStatus::InvalidPwdLength => "ERR_INVALID_PWD_LENGTH",
            EnigmaStatus::LoginFail => "ERR_LOGIN_FAIL",
            EnigmaStatus::OverFailRetryCount => "ERR_OVER_FAIL_RETRY_COUNT",
            EnigmaStatus::SourceFileOpenFail => "ERR_SOURCE_FILE_OPEN_FAIL",
            EnigmaStatus::TargetFileIsExist => "ERR_TARGET_FILE_IS_EXIST",
            EnigmaStatus::TargetFileOpenFail => "ERR_TARGET_FILE_OPEN_FAIL",
            EnigmaStatus::EncStreamFail => "ERR_ENC_STREAM_FAIL",
            EnigmaStatus::DecStreamFail => "ERR_DEC_STREAM_FAIL",
            EnigmaStatus::FfeCmdAbort => "ERR_FFE_CMD_ABORT",
            EnigmaStatus::MxLicenseInvalid => "MX_LICENSE_INVALID",
            _ => "UNKNOWN",
        }
    }

    /// Converts a raw entry point return value into a result.
    ///
    /// Any non-zero return is a failure; the status is its low byte.
    pub fn check(ret: u32) -> DdiResult<()> {
        if ret == 0 {
            return Ok(());
        }

        let status = EnigmaStatus(ret as u8);
        tracing::debug!(ret, status = status.message(), "vendor call failed");
        Err(DdiError::Status(status))
    }
}

impl fmt::Display for EnigmaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
