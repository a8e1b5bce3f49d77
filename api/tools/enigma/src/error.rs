// Copyright (C) Microsoft Corporation. All rights reserved.

use enigma_api::EnigmaError;
use thiserror::Error;

/// Failure of one command line invocation
#[derive(Error, Debug)]
pub(crate) enum CliError {
    #[error(transparent)]
    Enigma(#[from] EnigmaError),

    #[error("Failed to get XMSS parameters: {0}")]
    XmssParam(EnigmaError),

    /// Positional argument missing or empty
    #[error("{0}")]
    MissingArgument(&'static str),

    /// Command line rejected by the parser
    #[error("{0}")]
    Usage(String),
}

pub(crate) type CliResult<T> = Result<T, CliError>;
