// Copyright (C) Microsoft Corporation. All rights reserved.

use enigma_ddi::EnigmaStatus;
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Status {
    Success,
    Error,
}

/// The single JSON line printed on stdout
#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct Response {
    pub(crate) status: Status,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<Value>,
}

impl Response {
    pub(crate) fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data,
        }
    }

    /// Success reported with the vendor `STATUS_OK` message
    pub(crate) fn ok(data: Option<Value>) -> Self {
        Self::success(EnigmaStatus::StatusOk.message(), data)
    }

    pub(crate) fn error(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            data,
        }
    }

    pub(crate) fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub(crate) fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(r#"{{"status":"error","message":"Failed to serialize response: {err}"}}"#)
        })
    }
}

impl From<&CliError> for Response {
    fn from(err: &CliError) -> Self {
        Self::error(err.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_with_tracing::test;

    use super::*;

    #[test]
    fn test_success_without_data() {
        let response = Response::ok(None);
        assert!(response.is_success());
        assert_eq!(
            response.to_json(),
            r#"{"status":"success","message":"STATUS_OK"}"#
        );
    }

    #[test]
    fn test_success_with_data() {
        let response = Response::ok(Some(json!({"key_id": "enova-00"})));
        assert_eq!(
            response.to_json(),
            r#"{"status":"success","message":"STATUS_OK","data":{"key_id":"enova-00"}}"#
        );
    }

    #[test]
    fn test_scalar_data() {
        let response = Response::ok(Some(json!(false)));
        assert_eq!(
            response.to_json(),
            r#"{"status":"success","message":"STATUS_OK","data":false}"#
        );
    }

    #[test]
    fn test_error_from_cli_error() {
        let response = Response::from(&CliError::MissingArgument("PIN is required as an argument"));
        assert!(!response.is_success());
        assert_eq!(
            response.to_json(),
            r#"{"status":"error","message":"PIN is required as an argument"}"#
        );
    }

    #[test]
    fn test_error_message_is_escaped() {
        let response = Response::error("bad \"quote\"", None);
        assert_eq!(
            response.to_json(),
            r#"{"status":"error","message":"bad \"quote\""}"#
        );
    }
}
