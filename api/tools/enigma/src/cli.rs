// Copyright (C) Microsoft Corporation. All rights reserved.

use std::path::PathBuf;

use clap::*;
use enigma_api::DEFAULT_XMSS_OID;
use enigma_ddi::LibraryKind;

#[derive(Parser, Debug)]
#[command(name = "enigma", version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct CliArgs {
    /// Main vendor library, defaults to library/<EnovaMX>
    #[arg(long, global = true, env = "ENIGMA_LIBRARY_PATH", value_name = "PATH")]
    pub(crate) library: Option<PathBuf>,

    /// XMSS vendor library, defaults to library/<mxpxmss>
    #[arg(long, global = true, env = "ENIGMA_XMSS_LIBRARY_PATH", value_name = "PATH")]
    pub(crate) xmss_library: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

// Positional arguments are optional so that a missing value is answered with
// a JSON error rather than clap's usage text.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Vendor library version
    Version,

    /// Check that a device is attached
    DetectDevice,

    /// Chip serial number
    Uid,

    /// Login state and remaining PIN attempts
    LoginStatus,

    /// Log in with a PIN
    Login {
        #[arg(value_name = "PIN")]
        pin: Option<String>,
    },

    /// Change the PIN
    ChangePin {
        #[arg(value_name = "OLD_PIN")]
        old_pin: Option<String>,
        #[arg(value_name = "NEW_PIN")]
        new_pin: Option<String>,
    },

    /// Encrypt text, printing base64 ciphertext
    AesEncrypt { plaintext: Option<String> },

    /// Decrypt base64 ciphertext
    AesDecrypt { ciphertext: Option<String> },

    /// Encrypt a file into <TARGET_DIR>/<name>.emx
    AesEncryptFile {
        source: Option<String>,
        target_dir: Option<String>,
    },

    /// Decrypt a .emx file into <TARGET_DIR>
    AesDecryptFile {
        source: Option<String>,
        target_dir: Option<String>,
    },

    /// Generate an RSA-2048 key pair on the device
    GenerateKey { custom_id: Option<String> },

    /// Store an external RSA public key
    ImportKey {
        custom_id: Option<String>,
        /// Modulus, base64
        public_key_n: Option<String>,
        /// Public exponent, base64
        public_key_e: Option<String>,
    },

    /// Install the transport public key
    SetTransKey {
        /// Modulus, base64
        public_key_n: Option<String>,
        /// Public exponent, base64
        public_key_e: Option<String>,
    },

    /// RSA encrypt a message, printing base64 ciphertext
    RsaEncrypt {
        key_id: Option<String>,
        message: Option<String>,
    },

    /// RSA decrypt base64 ciphertext
    RsaDecrypt {
        key_id: Option<String>,
        ciphertext: Option<String>,
    },

    /// RSA sign a message, printing a base64 signature
    Sign {
        key_id: Option<String>,
        message: Option<String>,
    },

    /// Verify a base64 RSA signature
    Verify {
        key_id: Option<String>,
        message: Option<String>,
        signature: Option<String>,
    },

    /// Delete one key
    DeleteKey { key_id: Option<String> },

    /// List key IDs and custom IDs
    ListKeys,

    /// Delete every key
    ResetKeys,

    /// Generate an XMSS key pair
    XmssKeygen {
        /// Use the multi-tree (XMSS-MT) variant
        #[arg(long)]
        mt: bool,

        /// Parameter set OID, 4 bytes hex
        #[arg(short, long, default_value = DEFAULT_XMSS_OID)]
        oid: String,

        /// Secret key output file
        #[arg(long, visible_alias = "sk", default_value = "xmss_secret.key")]
        secret_key: PathBuf,

        /// Public key output file
        #[arg(long, visible_alias = "pk", default_value = "xmss_public.key")]
        public_key: PathBuf,
    },

    /// Sign a file with an XMSS secret key
    XmssSign {
        secret_key_file: Option<String>,
        message_file: Option<String>,
        signature_file: Option<String>,
    },

    /// Verify an XMSS signature file
    XmssVerify {
        public_key_file: Option<String>,
        signature_file: Option<String>,

        /// Accepted for compatibility; the verify entry point does not read it
        message_file: Option<String>,
    },

    /// XMSS signing state
    XmssParam,
}

impl Command {
    /// Vendor library this command talks to
    pub(crate) fn library(&self) -> LibraryKind {
        match self {
            Command::XmssKeygen { .. }
            | Command::XmssSign { .. }
            | Command::XmssVerify { .. }
            | Command::XmssParam => LibraryKind::MxpXmss,
            _ => LibraryKind::EnovaMx,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_with_tracing::test;

    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("enigma").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_debug_assert() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommand_names() {
        assert_eq!(parse(&["detect-device"]).command, Command::DetectDevice);
        assert_eq!(parse(&["list-keys"]).command, Command::ListKeys);
        assert_eq!(
            parse(&["set-trans-key", "AQ==", "AQAB"]).command,
            Command::SetTransKey {
                public_key_n: Some(String::from("AQ==")),
                public_key_e: Some(String::from("AQAB")),
            }
        );
    }

    #[test]
    fn test_parse_missing_positional() {
        assert_eq!(
            parse(&["rsa-encrypt", "enova-00"]).command,
            Command::RsaEncrypt {
                key_id: Some(String::from("enova-00")),
                message: None,
            }
        );
    }

    #[test]
    fn test_parse_xmss_keygen_defaults() {
        assert_eq!(
            parse(&["xmss-keygen"]).command,
            Command::XmssKeygen {
                mt: false,
                oid: String::from("00000001"),
                secret_key: PathBuf::from("xmss_secret.key"),
                public_key: PathBuf::from("xmss_public.key"),
            }
        );
    }

    #[test]
    fn test_parse_xmss_keygen_aliases() {
        let args = parse(&["xmss-keygen", "--mt", "-o", "00000003", "--sk", "a.key", "--pk", "b.key"]);
        assert_eq!(
            args.command,
            Command::XmssKeygen {
                mt: true,
                oid: String::from("00000003"),
                secret_key: PathBuf::from("a.key"),
                public_key: PathBuf::from("b.key"),
            }
        );
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let args = parse(&["uid", "--library", "/opt/enigma/libEnovaMX.so", "-v"]);
        assert_eq!(args.library, Some(PathBuf::from("/opt/enigma/libEnovaMX.so")));
        assert!(args.verbose);
    }

    #[test]
    fn test_parse_unknown_subcommand() {
        let result = CliArgs::try_parse_from(["enigma", "frobnicate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_library() {
        assert_eq!(parse(&["xmss-param"]).command.library(), LibraryKind::MxpXmss);
        assert_eq!(parse(&["xmss-verify"]).command.library(), LibraryKind::MxpXmss);
        assert_eq!(parse(&["version"]).command.library(), LibraryKind::EnovaMx);
        assert_eq!(parse(&["sign"]).command.library(), LibraryKind::EnovaMx);
    }

    #[test]
    fn test_parse_xmss_verify_message_file() {
        assert_eq!(
            parse(&["xmss-verify", "pk.key", "sig.bin", "msg.txt"]).command,
            Command::XmssVerify {
                public_key_file: Some(String::from("pk.key")),
                signature_file: Some(String::from("sig.bin")),
                message_file: Some(String::from("msg.txt")),
            }
        );
        assert_eq!(
            parse(&["xmss-verify", "pk.key", "sig.bin"]).command,
            Command::XmssVerify {
                public_key_file: Some(String::from("pk.key")),
                signature_file: Some(String::from("sig.bin")),
                message_file: None,
            }
        );
    }
}
