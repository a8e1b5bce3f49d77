// Copyright (C) Microsoft Corporation. All rights reserved.

use enigma_ddi_interface::*;

use crate::codec::*;
use crate::EnigmaDevice;
use crate::EnigmaError;
use crate::EnigmaResult;

/// Key pair created by `generate_rsa_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedKey {
    /// Device assigned key ID
    pub key_id: String,

    /// Full 256-byte modulus
    pub modulus: Vec<u8>,

    /// Public exponent, leading zero bytes removed
    pub exponent: Vec<u8>,
}

/// Contents of the device key table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyListing {
    /// Count reported by the device
    pub key_count: u8,

    /// Occupied key ID slots
    pub key_ids: Vec<String>,

    /// Occupied custom ID slots
    pub custom_key_ids: Vec<String>,
}

fn signature_field(signature: &[u8]) -> EnigmaResult<RsaField> {
    RsaField::try_from(signature).map_err(|_| {
        EnigmaError::InvalidArgument(format!(
            "signature must be {RSA_FIELD_LEN} bytes, got {}",
            signature.len()
        ))
    })
}

impl<D: EnigmaDev> EnigmaDevice<D> {
    /// Generate an RSA-2048 key pair tagged with `custom_id`.
    #[tracing::instrument(skip(self))]
    pub fn generate_key(&self, custom_id: &str) -> EnigmaResult<GeneratedKey> {
        let custom_id = pack_id("custom id", custom_id)?;
        let mut key_id = KeyId::default();
        let mut modulus = [0u8; RSA_FIELD_LEN];
        let mut exponent = [0u8; RSA_FIELD_LEN];

        self.dev
            .generate_rsa_key(&custom_id, &mut key_id, &mut modulus, &mut exponent)?;

        let key = GeneratedKey {
            key_id: unpack_id(&key_id),
            modulus: modulus.to_vec(),
            exponent: trim_leading_zeros(&exponent).to_vec(),
        };
        tracing::info!(key_id = %key.key_id, "Generated RSA key");
        Ok(key)
    }

    /// Store an external public key, returning the device key ID.
    #[tracing::instrument(skip(self, modulus, exponent))]
    pub fn import_key(&self, custom_id: &str, modulus: &[u8], exponent: &[u8]) -> EnigmaResult<String> {
        let custom_id = pack_id("custom id", custom_id)?;
        let modulus = pack_modulus(modulus)?;
        let exponent = pack_rsa_field("exponent", exponent)?;
        let mut key_id = KeyId::default();

        self.dev
            .store_external_public_key(&custom_id, &modulus, &exponent, &mut key_id)?;
        Ok(unpack_id(&key_id))
    }

    /// Install the transport public key, returning its key ID.
    #[tracing::instrument(skip_all)]
    pub fn set_transport_key(&self, modulus: &[u8], exponent: &[u8]) -> EnigmaResult<String> {
        let modulus = pack_modulus(modulus)?;
        let exponent = pack_rsa_field("exponent", exponent)?;
        let mut key_id = KeyId::default();

        self.dev.set_transport_key(&modulus, &exponent, &mut key_id)?;
        Ok(unpack_id(&key_id))
    }

    /// Read the key table.
    #[tracing::instrument(skip(self))]
    pub fn list_keys(&self) -> EnigmaResult<KeyListing> {
        let mut key_count = 0u8;
        let mut key_ids = [0u8; KEY_ID_LEN * MAX_KEY_SLOTS];
        let mut custom_ids = [0u8; KEY_ID_LEN * MAX_KEY_SLOTS];

        self.dev
            .list_key_ids(&mut key_count, &mut key_ids, &mut custom_ids)?;

        Ok(KeyListing {
            key_count,
            key_ids: parse_key_table(&key_ids),
            custom_key_ids: parse_key_table(&custom_ids),
        })
    }

    /// Delete one key.
    #[tracing::instrument(skip(self))]
    pub fn delete_key(&self, key_id: &str) -> EnigmaResult<()> {
        let key_id = pack_id("key id", key_id)?;
        self.dev.delete_key(&key_id)?;
        Ok(())
    }

    /// Delete every key.
    #[tracing::instrument(skip(self))]
    pub fn reset_keys(&self) -> EnigmaResult<()> {
        self.dev.reset_keys()?;
        tracing::warn!("All RSA keys removed");
        Ok(())
    }

    /// Encrypt `message` under `key_id`, returning the raw ciphertext.
    #[tracing::instrument(skip(self, message))]
    pub fn rsa_encrypt_bytes(&self, key_id: &str, message: &[u8]) -> EnigmaResult<Vec<u8>> {
        let key_id = pack_id("key id", key_id)?;
        let mut cipher = [0u8; RSA_FIELD_LEN];
        self.dev.rsa_encrypt(&key_id, message, &mut cipher)?;
        Ok(cipher.to_vec())
    }

    /// Decrypt a raw 256-byte ciphertext with `key_id`.
    #[tracing::instrument(skip(self, cipher))]
    pub fn rsa_decrypt_bytes(&self, key_id: &str, cipher: &[u8]) -> EnigmaResult<Vec<u8>> {
        let key_id = pack_id("key id", key_id)?;
        let cipher = RsaField::try_from(cipher).map_err(|_| {
            EnigmaError::InvalidArgument(format!(
                "ciphertext must be {RSA_FIELD_LEN} bytes, got {}",
                cipher.len()
            ))
        })?;
        let mut plain = [0u8; RSA_FIELD_LEN];

        let len = self.dev.rsa_decrypt(&key_id, &cipher, &mut plain)?;
        if len > RSA_FIELD_LEN {
            return Err(DdiError::InvalidParameter.into());
        }
        Ok(plain[..len].to_vec())
    }

    /// Encrypt `message`, returning base64 ciphertext.
    pub fn rsa_encrypt(&self, key_id: &str, message: &str) -> EnigmaResult<String> {
        Ok(encode_base64(&self.rsa_encrypt_bytes(key_id, message.as_bytes())?))
    }

    /// Decrypt base64 `ciphertext`, returning the text (invalid UTF-8 replaced).
    pub fn rsa_decrypt(&self, key_id: &str, ciphertext: &str) -> EnigmaResult<String> {
        let cipher = decode_base64(ciphertext)?;
        let plain = self.rsa_decrypt_bytes(key_id, &cipher)?;
        Ok(String::from_utf8_lossy(&plain).into_owned())
    }

    /// Sign `message` with `key_id`, returning a base64 signature.
    #[tracing::instrument(skip(self, message))]
    pub fn sign(&self, key_id: &str, message: &str) -> EnigmaResult<String> {
        let key_id = pack_id("key id", key_id)?;
        let mut signature = [0u8; RSA_FIELD_LEN];
        self.dev.rsa_sign(&key_id, message.as_bytes(), &mut signature)?;
        Ok(encode_base64(&signature))
    }

    /// Check a base64 `signature` over `message`.
    #[tracing::instrument(skip(self, message, signature))]
    pub fn verify(&self, key_id: &str, message: &str, signature: &str) -> EnigmaResult<bool> {
        let key_id = pack_id("key id", key_id)?;
        let signature = signature_field(&decode_base64(signature)?)?;
        Ok(self.dev.rsa_verify(&key_id, message.as_bytes(), &signature)?)
    }
}
