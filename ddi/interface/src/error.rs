// Copyright (C) Microsoft Corporation. All rights reserved.

//! Device Driver Interface (DDI) library - Error module

use thiserror::Error;

use crate::EnigmaStatus;

/// Vendor library error
#[derive(Error, Debug)]
pub enum DdiError {
    /// Invalid parameter
    #[error("invalid parameter")]
    InvalidParameter,

    /// Entry point returned a non-zero vendor status
    #[error("{0}")]
    Status(EnigmaStatus),

    /// No HSM device is attached
    #[error("Device not found")]
    DeviceNotFound,

    /// `CheckLoginStatus` returned an empty status word
    #[error("Failed to check login status")]
    LoginStatusUnavailable,

    /// `MXAPIVersion` returned a null pointer
    #[error("failed to get version")]
    VersionUnavailable,

    /// `GetChipSN` returned a null pointer
    #[error("failed to get UID")]
    UidUnavailable,

    /// The vendor library could not be loaded
    #[error("failed to load library {path}: {reason}")]
    LibraryLoad {
        /// Library path as given
        path: String,
        /// Loader error text
        reason: String,
    },

    /// The vendor library does not export the entry point
    #[error("entry point {0} not found in vendor library")]
    MissingEntryPoint(&'static str),

    /// A string argument contains an interior NUL byte
    #[error("invalid C string")]
    InvalidStr,

    /// IO error
    #[error("io error")]
    IoError(#[from] std::io::Error),
}

impl DdiError {
    /// Vendor status carried by this error, if any.
    pub fn status(&self) -> Option<EnigmaStatus> {
        match self {
            DdiError::Status(status) => Some(*status),
            _ => None,
        }
    }
}

impl From<std::ffi::NulError> for DdiError {
    fn from(_: std::ffi::NulError) -> Self {
        DdiError::InvalidStr
    }
}
