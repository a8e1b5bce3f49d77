// Copyright (C) Microsoft Corporation. All rights reserved.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use enigma_ddi_interface::*;

use crate::codec::*;
use crate::EnigmaDevice;
use crate::EnigmaError;
use crate::EnigmaResult;

/// Extension the device appends to encrypted files
pub const ENCRYPTED_EXTENSION: &str = "emx";

fn sectors_for(len: usize) -> EnigmaResult<(u32, usize)> {
    let sectors = sector_count(len);
    let sectors_u32 = u32::try_from(sectors)
        .map_err(|_| EnigmaError::InvalidArgument(format!("input of {len} bytes is too large")))?;
    Ok((sectors_u32, sectors * SECTOR_SIZE))
}

/// Splits `path` into the directory and `./`-prefixed name `FileAES` expects.
fn split_source(path: &Path) -> EnigmaResult<(PathBuf, String, String)> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| EnigmaError::InvalidArgument(format!("{} is not a file", path.display())))?
        .to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let relative = format!("./{name}");
    Ok((dir, relative, name))
}

impl<D: EnigmaDev> EnigmaDevice<D> {
    fn aes_stream(&self, input: &[u8], mode: AesMode) -> EnigmaResult<Vec<u8>> {
        let (sectors, buffer_len) = sectors_for(input.len())?;
        tracing::debug!(sectors, ?mode, "AESStreamEncDec");

        let mut in_buf = vec![0u8; buffer_len];
        in_buf[..input.len()].copy_from_slice(input);
        let mut out_buf = vec![0u8; buffer_len];
        self.dev.aes_stream(&in_buf, &mut out_buf, sectors, mode)?;
        Ok(out_buf)
    }

    /// Pad `plaintext` (ISO/IEC 9797-1 method 2) and encrypt it on the device.
    ///
    /// The result is `padded_len` bytes; the rest of the last sector is dropped.
    #[tracing::instrument(skip_all, fields(len = plaintext.len()))]
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> EnigmaResult<Vec<u8>> {
        let padded = pad_iso9797_m2(plaintext, AES_BLOCK_SIZE);
        let mut cipher = self.aes_stream(&padded, AesMode::Encrypt)?;
        cipher.truncate(padded.len());
        Ok(cipher)
    }

    /// Decrypt `ciphertext` on the device and strip its padding.
    #[tracing::instrument(skip_all, fields(len = ciphertext.len()))]
    pub fn decrypt_bytes(&self, ciphertext: &[u8]) -> EnigmaResult<Vec<u8>> {
        if ciphertext.is_empty() {
            return Err(EnigmaError::InvalidArgument(String::from(
                "ciphertext must not be empty",
            )));
        }

        let mut plain = self.aes_stream(ciphertext, AesMode::Decrypt)?;
        plain.truncate(ciphertext.len());
        let len = unpad_iso9797_m2(&plain).len();
        plain.truncate(len);
        Ok(plain)
    }

    /// Encrypt a single block without padding.
    pub fn encrypt_block(&self, block: &[u8; AES_BLOCK_SIZE]) -> EnigmaResult<[u8; AES_BLOCK_SIZE]> {
        self.aes_block(block, AesMode::Encrypt)
    }

    /// Decrypt a single block without unpadding.
    pub fn decrypt_block(&self, block: &[u8; AES_BLOCK_SIZE]) -> EnigmaResult<[u8; AES_BLOCK_SIZE]> {
        self.aes_block(block, AesMode::Decrypt)
    }

    fn aes_block(
        &self,
        block: &[u8; AES_BLOCK_SIZE],
        mode: AesMode,
    ) -> EnigmaResult<[u8; AES_BLOCK_SIZE]> {
        let out = self.aes_stream(block, mode)?;
        let mut result = [0u8; AES_BLOCK_SIZE];
        result.copy_from_slice(&out[..AES_BLOCK_SIZE]);
        Ok(result)
    }

    /// Encrypt `plaintext`, returning base64 ciphertext.
    pub fn aes_encrypt(&self, plaintext: &str) -> EnigmaResult<String> {
        Ok(encode_base64(&self.encrypt_bytes(plaintext.as_bytes())?))
    }

    /// Decrypt base64 `ciphertext`, returning the text (invalid UTF-8 replaced).
    pub fn aes_decrypt(&self, ciphertext: &str) -> EnigmaResult<String> {
        let cipher = decode_base64(ciphertext)?;
        let plain = self.decrypt_bytes(&cipher)?;
        Ok(String::from_utf8_lossy(&plain).into_owned())
    }

    /// Encrypt `source` into `target_dir/<name>.emx`.
    #[tracing::instrument(skip(self))]
    pub fn aes_encrypt_file(&self, source: &Path, target_dir: &Path) -> EnigmaResult<PathBuf> {
        if !source.exists() {
            return Err(EnigmaError::NotFound("Source file"));
        }
        let (source_dir, relative, name) = split_source(source)?;

        self.file_aes(&source_dir, &relative, target_dir, AesMode::Encrypt)?;
        Ok(clean_path(
            &target_dir.join(format!("{name}.{ENCRYPTED_EXTENSION}")),
        ))
    }

    /// Decrypt `source` (normally `<name>.emx`) into `target_dir/<name>`.
    #[tracing::instrument(skip(self))]
    pub fn aes_decrypt_file(&self, source: &Path, target_dir: &Path) -> EnigmaResult<PathBuf> {
        if !source.exists() {
            return Err(EnigmaError::NotFound("Encrypted file"));
        }
        let (source_dir, relative, name) = split_source(source)?;

        self.file_aes(&source_dir, &relative, target_dir, AesMode::Decrypt)?;
        let plain_name = name
            .strip_suffix(&format!(".{ENCRYPTED_EXTENSION}"))
            .unwrap_or(&name);
        Ok(clean_path(&target_dir.join(plain_name)))
    }

    fn file_aes(
        &self,
        source_dir: &Path,
        relative: &str,
        target_dir: &Path,
        mode: AesMode,
    ) -> EnigmaResult<()> {
        fs::create_dir_all(target_dir).map_err(EnigmaError::CreateTargetDir)?;

        let source_dir = path_c_string("source directory", source_dir)?;
        let file_name = c_string("file name", relative)?;
        let target = path_c_string("target directory", target_dir)?;
        self.dev.file_aes(&source_dir, &file_name, &target, mode)?;
        Ok(())
    }
}
