// Copyright (C) Microsoft Corporation. All rights reserved.

//! Shared mock device state

use std::collections::HashMap;

use enigma_ddi_interface::*;

/// PIN the mock device ships with
pub const DEFAULT_PIN: &str = "000000";

const DEFAULT_RETRY_COUNT: u8 = 10;
const MIN_PIN_LEN: usize = 6;
const MAX_PIN_LEN: usize = 16;

/// Largest message accepted by the mock RSA encrypt (RSA-2048 OAEP/SHA-256)
pub(crate) const RSA_MAX_MESSAGE: usize = 190;

const MASK: [u8; AES_BLOCK_SIZE] = [
    0xA5, 0x5A, 0x3C, 0xC3, 0x96, 0x69, 0x0F, 0xF0, 0x81, 0x18, 0x42, 0x24, 0xE7, 0x7E, 0xDB, 0xBD,
];

/// Mock device configuration
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Whether `mxApiDetectDev` reports a device
    pub device_present: bool,

    /// Current PIN
    pub pin: String,

    /// PIN attempts before lock out
    pub retry_count: u8,

    /// Start logged in
    pub logged_in: bool,

    /// Version string reported by `MXAPIVersion`
    pub version: String,

    /// Serial reported by `GetChipSN`
    pub chip_sn: [u8; CHIP_SN_LEN],
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            device_present: true,
            pin: DEFAULT_PIN.to_string(),
            retry_count: DEFAULT_RETRY_COUNT,
            logged_in: false,
            version: String::from("0.1.0-mock"),
            chip_sn: [
                0x45, 0x4E, 0x49, 0x47, 0x4D, 0x41, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
                0x08, 0x09,
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MockKey {
    pub key_id: KeyId,
    pub custom_id: KeyId,
    pub modulus: RsaField,
    pub exponent: RsaField,
}

#[derive(Debug)]
pub(crate) struct MockState {
    pub config: MockConfig,
    pub logged_in: bool,
    pub retries_left: u8,
    pub keys: Vec<MockKey>,
    pub transport_key: Option<MockKey>,
    pub next_key: u32,
    pub xmss_open: bool,
    pub xmss_index: u64,
    pub calls: Vec<&'static str>,
    pub faults: HashMap<&'static str, EnigmaStatus>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

impl MockState {
    pub(crate) fn new(config: MockConfig) -> Self {
        Self {
            logged_in: config.logged_in,
            retries_left: config.retry_count,
            config,
            keys: Vec::new(),
            transport_key: None,
            next_key: 0,
            xmss_open: false,
            xmss_index: 0,
            calls: Vec::new(),
            faults: HashMap::new(),
        }
    }

    /// Records the call and applies any injected fault.
    pub(crate) fn enter(&mut self, entry_point: &'static str) -> DdiResult<()> {
        tracing::trace!(entry_point, "mock call");
        self.calls.push(entry_point);
        match self.faults.get(entry_point) {
            Some(status) => Err(DdiError::Status(*status)),
            None => Ok(()),
        }
    }

    pub(crate) fn require_login(&self, status: EnigmaStatus) -> DdiResult<()> {
        if self.logged_in {
            Ok(())
        } else {
            Err(DdiError::Status(status))
        }
    }

    pub(crate) fn login_status_word(&self) -> LoginStatusWord {
        let result = if self.logged_in {
            EnigmaStatus::StatusOk
        } else if self.retries_left == 0 {
            EnigmaStatus::OverFailRetryCount
        } else {
            EnigmaStatus::LoginFail
        };

        LoginStatusWord::new()
            .with_result(result.0)
            .with_retry_count_valid(1)
            .with_retry_count_left(self.retries_left)
    }

    pub(crate) fn check_pin(&mut self, pin: &[u8]) -> DdiResult<()> {
        if !(MIN_PIN_LEN..=MAX_PIN_LEN).contains(&pin.len()) {
            return Err(DdiError::Status(EnigmaStatus::InvalidPwdLength));
        }
        if self.retries_left == 0 {
            return Err(DdiError::Status(EnigmaStatus::OverFailRetryCount));
        }
        if pin != self.config.pin.as_bytes() {
            self.logged_in = false;
            self.retries_left -= 1;
            return Err(DdiError::Status(if self.retries_left == 0 {
                EnigmaStatus::OverFailRetryCount
            } else {
                EnigmaStatus::LoginFail
            }));
        }

        self.retries_left = self.config.retry_count;
        Ok(())
    }

    pub(crate) fn valid_new_pin(pin: &[u8]) -> bool {
        (MIN_PIN_LEN..=MAX_PIN_LEN).contains(&pin.len())
    }

    /// Allocates the next key id with the given 6-byte prefix.
    pub(crate) fn allocate_key_id(&mut self, prefix: &str) -> KeyId {
        let text = format!("{prefix}{:02}", self.next_key % 100);
        self.next_key += 1;

        let mut key_id = [0u8; KEY_ID_LEN];
        let len = text.len().min(KEY_ID_LEN);
        key_id[..len].copy_from_slice(&text.as_bytes()[..len]);
        key_id
    }

    pub(crate) fn find_key(&self, key_id: &KeyId) -> DdiResult<&MockKey> {
        self.keys
            .iter()
            .chain(self.transport_key.iter())
            .find(|key| &key.key_id == key_id)
            .ok_or(DdiError::Status(EnigmaStatus::MxNoExist))
    }
}

/// Reversible stand-in for the device transforms.
pub(crate) fn mask(input: &[u8], output: &mut [u8]) {
    for (i, (out, byte)) in output.iter_mut().zip(input).enumerate() {
        *out = byte ^ MASK[i % AES_BLOCK_SIZE];
    }
}

/// Deterministic 256-byte tag binding `message` to `modulus`.
pub(crate) fn tag(modulus: &RsaField, message: &[u8]) -> RsaField {
    let mut out = *modulus;
    for (i, byte) in message.iter().enumerate() {
        out[i % RSA_FIELD_LEN] ^= byte.rotate_left((i % 8) as u32);
        out[(i * 7 + 3) % RSA_FIELD_LEN] = out[(i * 7 + 3) % RSA_FIELD_LEN].wrapping_add(*byte);
    }
    out
}

/// Modulus derived from the custom id, top bit set like a real RSA-2048 modulus.
pub(crate) fn modulus_for(custom_id: &KeyId, serial: u32) -> RsaField {
    let mut modulus = [0u8; RSA_FIELD_LEN];
    for (i, byte) in modulus.iter_mut().enumerate() {
        *byte = custom_id[i % KEY_ID_LEN]
            .wrapping_mul(31)
            .wrapping_add(i as u8)
            .wrapping_add(serial as u8);
    }
    modulus[0] |= 0x80;
    modulus[RSA_FIELD_LEN - 1] |= 0x01;
    modulus
}

/// 65537, right aligned
pub(crate) fn default_exponent() -> RsaField {
    let mut exponent = [0u8; RSA_FIELD_LEN];
    exponent[RSA_FIELD_LEN - 3..].copy_from_slice(&[0x01, 0x00, 0x01]);
    exponent
}
