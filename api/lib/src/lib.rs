// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]

//! Enigma HSM API
//!
//! Turns high level requests (encrypt this text, generate a key pair, sign
//! this file) into calls against the vendor library entry points exposed by
//! the DDI traits. All sizing, padding and fixed-width packing happens here.

pub mod codec;
mod aes;
mod device;
mod error;
mod pin;
mod rsa;
mod xmss;

pub use device::EnigmaDevice;
pub use error::EnigmaError;
pub use error::EnigmaResult;
pub use pin::LoginState;
pub use rsa::GeneratedKey;
pub use rsa::KeyListing;
pub use xmss::XmssDevice;
pub use xmss::XmssParams;
pub use xmss::DEFAULT_XMSS_OID;
