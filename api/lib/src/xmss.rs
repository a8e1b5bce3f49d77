// Copyright (C) Microsoft Corporation. All rights reserved.

use std::path::Path;

use enigma_ddi_interface::Ddi;
use enigma_ddi_interface::XmssDev;
use enigma_ddi_interface::XmssParamRaw;

use crate::codec::c_string;
use crate::codec::path_c_string;
use crate::EnigmaError;
use crate::EnigmaResult;

/// OID used when none is given (XMSS-SHA2_10_256)
pub const DEFAULT_XMSS_OID: &str = "00000001";

const OID_LEN: usize = 4;

/// Decoded `MxpGetParam` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmssParams {
    /// All eight index bytes, lower-case hex
    pub index: String,

    /// XMSS parameter set identifier
    pub xmss_id: u8,

    /// Number of significant index bytes
    pub index_bytes: u8,
}

impl From<XmssParamRaw> for XmssParams {
    fn from(raw: XmssParamRaw) -> Self {
        Self {
            index: hex::encode(raw.index),
            xmss_id: raw.xmss_id,
            index_bytes: raw.index_bytes,
        }
    }
}

/// Checks that `oid` is four bytes of hex.
fn validate_oid(oid: &str) -> EnigmaResult<()> {
    let bytes = hex::decode(oid).map_err(|err| EnigmaError::InvalidOid(err.to_string()))?;
    if bytes.len() != OID_LEN {
        return Err(EnigmaError::InvalidOid(format!(
            "expected {OID_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(())
}

/// Open XMSS session handle, closed on drop if not closed explicitly.
struct HandleGuard<'a, X: XmssDev> {
    dev: &'a X,
    open: bool,
}

impl<'a, X: XmssDev> HandleGuard<'a, X> {
    fn open(dev: &'a X) -> EnigmaResult<Self> {
        dev.open_handle()?;
        tracing::debug!("XMSS handle opened");
        Ok(Self { dev, open: true })
    }

    fn close(mut self) -> EnigmaResult<()> {
        self.open = false;
        self.dev.close_handle()?;
        tracing::debug!("XMSS handle closed");
        Ok(())
    }
}

impl<X: XmssDev> Drop for HandleGuard<'_, X> {
    fn drop(&mut self) {
        if self.open {
            if let Err(err) = self.dev.close_handle() {
                tracing::error!(?err, "Failed to close XMSS handle");
            }
        }
    }
}

/// Handle to the XMSS vendor library
///
/// Each operation opens a device handle, runs one entry point and closes the
/// handle again, on failure as well as on success.
#[derive(Debug)]
pub struct XmssDevice<X: XmssDev> {
    dev: X,
}

impl<X: XmssDev> XmssDevice<X> {
    /// Wrap an already opened library binding.
    pub fn new(dev: X) -> Self {
        Self { dev }
    }

    /// Load the XMSS library at `path`.
    #[tracing::instrument(skip(ddi))]
    pub fn open<T: Ddi<XmssDev = X>>(ddi: &T, path: &Path) -> EnigmaResult<Self> {
        Ok(Self::new(ddi.open_xmss_dev(path)?))
    }

    /// Underlying library binding
    pub fn dev(&self) -> &X {
        &self.dev
    }

    fn with_handle<T>(&self, op: impl FnOnce(&X) -> EnigmaResult<T>) -> EnigmaResult<T> {
        let guard = HandleGuard::open(&self.dev)?;
        let result = op(&self.dev)?;
        guard.close()?;
        Ok(result)
    }

    /// Current signing state.
    #[tracing::instrument(skip(self))]
    pub fn params(&self) -> EnigmaResult<XmssParams> {
        self.with_handle(|dev| {
            let mut raw = XmssParamRaw::default();
            dev.get_param(&mut raw)?;
            Ok(XmssParams::from(raw))
        })
    }

    /// Generate a key pair, writing both halves to the given files.
    ///
    /// # Arguments
    /// * `multi_tree` - XMSS-MT instead of single tree XMSS
    /// * `oid` - Parameter set, eight hex digits
    /// * `secret_key_file` - Secret key output path
    /// * `public_key_file` - Public key output path
    #[tracing::instrument(skip(self))]
    pub fn key_gen(
        &self,
        multi_tree: bool,
        oid: &str,
        secret_key_file: &Path,
        public_key_file: &Path,
    ) -> EnigmaResult<()> {
        validate_oid(oid)?;
        let oid = c_string("oid", oid)?;
        let secret_key_file = path_c_string("secret key file", secret_key_file)?;
        let public_key_file = path_c_string("public key file", public_key_file)?;

        self.with_handle(|dev| {
            Ok(dev.key_gen(multi_tree, &oid, &secret_key_file, &public_key_file)?)
        })
    }

    /// Sign the contents of `message_file` into `signature_file`.
    #[tracing::instrument(skip(self))]
    pub fn sign(
        &self,
        secret_key_file: &Path,
        message_file: &Path,
        signature_file: &Path,
    ) -> EnigmaResult<()> {
        let secret_key_file = path_c_string("secret key file", secret_key_file)?;
        let message_file = path_c_string("message file", message_file)?;
        let signature_file = path_c_string("signature file", signature_file)?;

        self.with_handle(|dev| Ok(dev.sign(&secret_key_file, &message_file, &signature_file)?))
    }

    /// Verify `signature_file` against `public_key_file`.
    #[tracing::instrument(skip(self))]
    pub fn verify(&self, public_key_file: &Path, signature_file: &Path) -> EnigmaResult<()> {
        let public_key_file = path_c_string("public key file", public_key_file)?;
        let signature_file = path_c_string("signature file", signature_file)?;

        self.with_handle(|dev| Ok(dev.verify(&public_key_file, &signature_file)?))
    }
}
