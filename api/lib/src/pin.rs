// Copyright (C) Microsoft Corporation. All rights reserved.

use enigma_ddi_interface::DdiError;
use enigma_ddi_interface::EnigmaDev;
use enigma_ddi_interface::EnigmaStatus;
use enigma_ddi_interface::LoginStatusWord;

use crate::codec::c_string;
use crate::EnigmaDevice;
use crate::EnigmaResult;

/// Decoded `CheckLoginStatus` word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginState {
    /// Device reports an active login
    pub logged_in: bool,

    /// Remaining PIN attempts
    pub retry_count: u8,

    /// Whether `retry_count` is meaningful
    pub retry_count_valid: bool,

    /// Vendor status of the login state
    pub status: EnigmaStatus,
}

impl LoginState {
    /// Decode the packed status word. A zero word means the probe failed.
    pub fn decode(word: LoginStatusWord) -> Result<Self, DdiError> {
        if word.into_bits() == 0 {
            return Err(DdiError::LoginStatusUnavailable);
        }

        // Only 1 is reported as valid, but any set flag arms the lockout check.
        let retry_count_valid = word.retry_count_valid() == 1;
        let retry_count = word.retry_count_left();
        let mut status = EnigmaStatus(word.result());
        if status == EnigmaStatus::StatusOk
            && word.retry_count_valid() != 0
            && retry_count == 0
        {
            status = EnigmaStatus::OverFailRetryCount;
        }

        Ok(Self {
            logged_in: status == EnigmaStatus::StatusOk,
            retry_count,
            retry_count_valid,
            status,
        })
    }

    /// `Ok` when logged in, otherwise the status that explains why not.
    pub fn check(&self) -> Result<(), DdiError> {
        if self.logged_in {
            Ok(())
        } else {
            Err(DdiError::Status(self.status))
        }
    }
}

impl<D: EnigmaDev> EnigmaDevice<D> {
    /// Probe the login state without failing on "not logged in".
    #[tracing::instrument(skip(self))]
    pub fn login_status(&self) -> EnigmaResult<LoginState> {
        let state = LoginState::decode(self.dev.login_status()?)?;
        tracing::debug!(
            logged_in = state.logged_in,
            retry_count = state.retry_count,
            status = %state.status,
            "Login status"
        );
        Ok(state)
    }

    /// Log in with `pin`.
    #[tracing::instrument(skip_all)]
    pub fn login(&self, pin: &str) -> EnigmaResult<()> {
        let pin = c_string("PIN", pin)?;
        self.dev.login(&pin)?;
        tracing::info!("Logged in");
        Ok(())
    }

    /// Replace `old_pin` with `new_pin`.
    #[tracing::instrument(skip_all)]
    pub fn change_pin(&self, old_pin: &str, new_pin: &str) -> EnigmaResult<()> {
        let old_pin = c_string("old PIN", old_pin)?;
        let new_pin = c_string("new PIN", new_pin)?;
        self.dev.change_pin(&old_pin, &new_pin)?;
        tracing::info!("PIN changed");
        Ok(())
    }
}
