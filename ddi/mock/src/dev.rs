// Copyright (C) Microsoft Corporation. All rights reserved.

//! DDI Implementation - Enigma Mock Device - Device Module

use std::ffi::CStr;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use enigma_ddi_interface::*;
use parking_lot::Mutex;

use crate::state::*;

const ENCRYPTED_EXTENSION: &str = "emx";
const KEY_ID_PREFIX: &str = "enova-";
const IMPORTED_KEY_ID_PREFIX: &str = "extrn-";
const TRANSPORT_KEY_ID_PREFIX: &str = "trans-";

/// DDI Implementation - Enigma Mock Device
#[derive(Debug, Clone)]
pub struct DdiMockDev {
    state: Arc<Mutex<MockState>>,
}

impl DdiMockDev {
    pub(crate) fn new(state: Arc<Mutex<MockState>>) -> Self {
        Self { state }
    }
}

impl Drop for DdiMockDev {
    fn drop(&mut self) {
        tracing::debug!("Dropping DdiMockDev");
    }
}

fn path_of(value: &CStr) -> DdiResult<PathBuf> {
    value
        .to_str()
        .map(PathBuf::from)
        .map_err(|_| DdiError::InvalidStr)
}

fn target_name(file_name: &Path, mode: AesMode) -> Option<String> {
    let name = file_name.file_name()?.to_str()?;
    match mode {
        AesMode::Encrypt => Some(format!("{name}.{ENCRYPTED_EXTENSION}")),
        AesMode::Decrypt => Some(
            name.strip_suffix(&format!(".{ENCRYPTED_EXTENSION}"))
                .unwrap_or(name)
                .to_string(),
        ),
    }
}

impl EnigmaDev for DdiMockDev {
    fn api_version(&self) -> DdiResult<String> {
        let mut state = self.state.lock();
        state.enter("MXAPIVersion")?;
        Ok(state.config.version.clone())
    }

    fn detect(&self) -> DdiResult<bool> {
        let mut state = self.state.lock();
        state.enter("mxApiDetectDev")?;
        Ok(state.config.device_present)
    }

    fn chip_sn(&self) -> DdiResult<[u8; CHIP_SN_LEN]> {
        let mut state = self.state.lock();
        state.enter("GetChipSN")?;
        Ok(state.config.chip_sn)
    }

    fn login_status(&self) -> DdiResult<LoginStatusWord> {
        let mut state = self.state.lock();
        state.enter("CheckLoginStatus")?;
        Ok(state.login_status_word())
    }

    fn login(&self, pin: &CStr) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("mxLoginPIN")?;
        state.check_pin(pin.to_bytes())?;
        state.logged_in = true;
        Ok(())
    }

    fn change_pin(&self, old_pin: &CStr, new_pin: &CStr) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("mxChangePIN")?;
        state.check_pin(old_pin.to_bytes())?;

        let new_pin = new_pin.to_bytes();
        if !MockState::valid_new_pin(new_pin) {
            return Err(DdiError::Status(EnigmaStatus::InvalidPwdLength));
        }
        state.config.pin = String::from_utf8_lossy(new_pin).into_owned();
        Ok(())
    }

    fn aes_stream(
        &self,
        input: &[u8],
        output: &mut [u8],
        sectors: u32,
        mode: AesMode,
    ) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("AESStreamEncDec")?;

        let failure = match mode {
            AesMode::Encrypt => EnigmaStatus::EncStreamFail,
            AesMode::Decrypt => EnigmaStatus::DecStreamFail,
        };
        state.require_login(failure)?;

        let len = sectors as usize * SECTOR_SIZE;
        if sectors == 0 || input.len() != len || output.len() != len {
            return Err(DdiError::Status(failure));
        }

        mask(input, output);
        Ok(())
    }

    fn file_aes(
        &self,
        source_dir: &CStr,
        file_name: &CStr,
        target_dir: &CStr,
        mode: AesMode,
    ) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("FileAES")?;
        state.require_login(match mode {
            AesMode::Encrypt => EnigmaStatus::EncStreamFail,
            AesMode::Decrypt => EnigmaStatus::DecStreamFail,
        })?;

        let file_name = path_of(file_name)?;
        let source = path_of(source_dir)?.join(&file_name);
        let name = target_name(&file_name, mode)
            .ok_or(DdiError::Status(EnigmaStatus::SourceFileOpenFail))?;
        let target = path_of(target_dir)?.join(name);

        let data = fs::read(&source)
            .map_err(|_| DdiError::Status(EnigmaStatus::SourceFileOpenFail))?;
        if target.exists() {
            return Err(DdiError::Status(EnigmaStatus::TargetFileIsExist));
        }

        let mut out = vec![0u8; data.len()];
        mask(&data, &mut out);
        fs::write(&target, out).map_err(|_| DdiError::Status(EnigmaStatus::TargetFileOpenFail))?;

        tracing::debug!(source = %source.display(), target = %target.display(), "mock FileAES");
        Ok(())
    }

    fn generate_rsa_key(
        &self,
        custom_id: &KeyId,
        key_id: &mut KeyId,
        modulus: &mut RsaField,
        exponent: &mut RsaField,
    ) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("generate_rsa_key")?;
        state.require_login(EnigmaStatus::MxHandleFail)?;
        if state.keys.len() >= MAX_KEY_SLOTS {
            return Err(DdiError::Status(EnigmaStatus::MxUpdateKeyFail));
        }

        let serial = state.next_key;
        let key = MockKey {
            key_id: state.allocate_key_id(KEY_ID_PREFIX),
            custom_id: *custom_id,
            modulus: modulus_for(custom_id, serial),
            exponent: default_exponent(),
        };

        *key_id = key.key_id;
        *modulus = key.modulus;
        *exponent = key.exponent;
        state.keys.push(key);
        Ok(())
    }

    fn store_external_public_key(
        &self,
        custom_id: &KeyId,
        modulus: &RsaField,
        exponent: &RsaField,
        key_id: &mut KeyId,
    ) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("store_external_public_key")?;
        state.require_login(EnigmaStatus::MxHandleFail)?;
        if state.keys.len() >= MAX_KEY_SLOTS {
            return Err(DdiError::Status(EnigmaStatus::MxUpdateKeyFail));
        }

        let key = MockKey {
            key_id: state.allocate_key_id(IMPORTED_KEY_ID_PREFIX),
            custom_id: *custom_id,
            modulus: *modulus,
            exponent: *exponent,
        };

        *key_id = key.key_id;
        state.keys.push(key);
        Ok(())
    }

    fn set_transport_key(
        &self,
        modulus: &RsaField,
        exponent: &RsaField,
        key_id: &mut KeyId,
    ) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("set_transport_key")?;
        state.require_login(EnigmaStatus::MxHandleFail)?;

        let key = MockKey {
            key_id: state.allocate_key_id(TRANSPORT_KEY_ID_PREFIX),
            custom_id: [0u8; KEY_ID_LEN],
            modulus: *modulus,
            exponent: *exponent,
        };

        *key_id = key.key_id;
        state.transport_key = Some(key);
        Ok(())
    }

    fn list_key_ids(
        &self,
        key_count: &mut u8,
        key_ids: &mut KeyTable,
        custom_ids: &mut KeyTable,
    ) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("list_all_key_ids")?;
        state.require_login(EnigmaStatus::MxHandleFail)?;

        key_ids.fill(0);
        custom_ids.fill(0);
        for (slot, key) in state.keys.iter().enumerate() {
            let range = slot * KEY_ID_LEN..(slot + 1) * KEY_ID_LEN;
            key_ids[range.clone()].copy_from_slice(&key.key_id);
            custom_ids[range].copy_from_slice(&key.custom_id);
        }
        *key_count = state.keys.len() as u8;
        Ok(())
    }

    fn delete_key(&self, key_id: &KeyId) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("delete_key")?;
        state.require_login(EnigmaStatus::MxHandleFail)?;

        let before = state.keys.len();
        state.keys.retain(|key| &key.key_id != key_id);
        if state.keys.len() == before {
            return Err(DdiError::Status(EnigmaStatus::MxNoExist));
        }
        Ok(())
    }

    fn reset_keys(&self) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("reset_all_keys")?;
        state.require_login(EnigmaStatus::MxHandleFail)?;
        state.keys.clear();
        Ok(())
    }

    fn rsa_encrypt(
        &self,
        key_id: &KeyId,
        message: &[u8],
        cipher: &mut RsaField,
    ) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("rsa_encrypt")?;
        state.require_login(EnigmaStatus::EncStreamFail)?;
        state.find_key(key_id)?;
        if message.len() > RSA_MAX_MESSAGE {
            return Err(DdiError::Status(EnigmaStatus::EncStreamFail));
        }

        cipher.fill(0);
        cipher[0] = message.len() as u8;
        mask(message, &mut cipher[1..=message.len()]);
        Ok(())
    }

    fn rsa_decrypt(
        &self,
        key_id: &KeyId,
        cipher: &RsaField,
        plain: &mut RsaField,
    ) -> DdiResult<usize> {
        let mut state = self.state.lock();
        state.enter("rsa_decrypt")?;
        state.require_login(EnigmaStatus::DecStreamFail)?;
        state.find_key(key_id)?;

        let len = cipher[0] as usize;
        if len > RSA_MAX_MESSAGE {
            return Err(DdiError::Status(EnigmaStatus::DecStreamFail));
        }

        plain.fill(0);
        mask(&cipher[1..=len], &mut plain[..len]);
        Ok(len)
    }

    fn rsa_sign(
        &self,
        key_id: &KeyId,
        message: &[u8],
        signature: &mut RsaField,
    ) -> DdiResult<()> {
        let mut state = self.state.lock();
        state.enter("rsa_sign")?;
        state.require_login(EnigmaStatus::MxHandleFail)?;
        let key = state.find_key(key_id)?;

        *signature = tag(&key.modulus, message);
        Ok(())
    }

    fn rsa_verify(
        &self,
        key_id: &KeyId,
        message: &[u8],
        signature: &RsaField,
    ) -> DdiResult<bool> {
        let mut state = self.state.lock();
        state.enter("rsa_verify")?;
        state.require_login(EnigmaStatus::MxHandleFail)?;
        let key = state.find_key(key_id)?;

        Ok(&tag(&key.modulus, message) == signature)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::CString;

    use test_with_tracing::test;

    use super::*;
    use crate::DdiMock;

    fn c(path: &Path) -> CString {
        CString::new(path.to_str().unwrap()).unwrap()
    }

    fn logged_in_dev() -> DdiMockDev {
        let ddi = DdiMock::with_config(MockConfig {
            logged_in: true,
            ..Default::default()
        });
        ddi.open_dev(Path::new("mock")).unwrap()
    }

    #[test]
    fn test_target_name() {
        assert_eq!(
            target_name(Path::new("./notes.txt"), AesMode::Encrypt).as_deref(),
            Some("notes.txt.emx")
        );
        assert_eq!(
            target_name(Path::new("./notes.txt.emx"), AesMode::Decrypt).as_deref(),
            Some("notes.txt")
        );
        assert_eq!(
            target_name(Path::new("./notes.txt"), AesMode::Decrypt).as_deref(),
            Some("notes.txt")
        );
    }

    #[test]
    fn test_file_aes_roundtrip() {
        let dev = logged_in_dev();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let back = dir.path().join("back");
        fs::create_dir(&out).unwrap();
        fs::create_dir(&back).unwrap();
        fs::write(dir.path().join("notes.txt"), b"meeting at noon").unwrap();

        dev.file_aes(
            &c(dir.path()),
            c"./notes.txt",
            &c(&out),
            AesMode::Encrypt,
        )
        .unwrap();
        let encrypted = fs::read(out.join("notes.txt.emx")).unwrap();
        assert_ne!(encrypted, b"meeting at noon");

        dev.file_aes(&c(&out), c"./notes.txt.emx", &c(&back), AesMode::Decrypt)
            .unwrap();
        assert_eq!(fs::read(back.join("notes.txt")).unwrap(), b"meeting at noon");
    }

    #[test]
    fn test_file_aes_target_exists() {
        let dev = logged_in_dev();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), [1, 2, 3]).unwrap();
        fs::write(dir.path().join("a.bin.emx"), [0]).unwrap();

        let err = dev
            .file_aes(&c(dir.path()), c"./a.bin", &c(dir.path()), AesMode::Encrypt)
            .unwrap_err();
        assert_eq!(err.status(), Some(EnigmaStatus::TargetFileIsExist));
    }

    #[test]
    fn test_file_aes_missing_source() {
        let dev = logged_in_dev();
        let dir = tempfile::tempdir().unwrap();

        let err = dev
            .file_aes(&c(dir.path()), c"./gone.txt", &c(dir.path()), AesMode::Encrypt)
            .unwrap_err();
        assert_eq!(err.status(), Some(EnigmaStatus::SourceFileOpenFail));
    }

    #[test]
    fn test_file_aes_requires_login() {
        let dev = DdiMock::default().open_dev(Path::new("mock")).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = dev
            .file_aes(&c(dir.path()), c"./a.txt", &c(dir.path()), AesMode::Decrypt)
            .unwrap_err();
        assert_eq!(err.status(), Some(EnigmaStatus::DecStreamFail));
    }
}
