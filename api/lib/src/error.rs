// Copyright (C) Microsoft Corporation. All rights reserved.

use enigma_ddi_interface::DdiError;
use enigma_ddi_interface::EnigmaStatus;
use thiserror::Error;

/// Enigma API error
///
/// The `Display` text is what the command line reports as the response message.
#[derive(Error, Debug)]
pub enum EnigmaError {
    /// Error reported by, or while talking to, the vendor library
    #[error(transparent)]
    Ddi(#[from] DdiError),

    /// Argument was not valid base64
    #[error("Invalid base64 encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Argument was not valid hex
    #[error("Invalid hex encoding: {0}")]
    Hex(#[from] hex::FromHexError),

    /// XMSS OID argument rejected
    #[error("Error parsing oid: {0}")]
    InvalidOid(String),

    /// Value does not fit its fixed-width field
    #[error("{name} must be at most {max} bytes, got {len}")]
    FieldTooLong {
        /// Field name
        name: &'static str,
        /// Field width
        max: usize,
        /// Offending length
        len: usize,
    },

    /// Value contains a NUL byte and cannot cross the C boundary
    #[error("{0} must not contain NUL bytes")]
    InteriorNul(&'static str),

    /// Argument rejected before reaching the device
    #[error("{0}")]
    InvalidArgument(String),

    /// Input file is missing
    #[error("{0} does not exist")]
    NotFound(&'static str),

    /// Output directory could not be created
    #[error("Failed to create target directory: {0}")]
    CreateTargetDir(std::io::Error),
}

impl EnigmaError {
    /// Vendor status carried by this error, if any.
    pub fn status(&self) -> Option<EnigmaStatus> {
        match self {
            EnigmaError::Ddi(err) => err.status(),
            _ => None,
        }
    }
}

/// Enigma API result
pub type EnigmaResult<T> = Result<T, EnigmaError>;
